use glam::{Quat, Vec3, Vec4};

/// Hermite basis weights `(s0, s1, s2, s3)` for value0, out-tangent0, value1, in-tangent1.
#[inline]
fn hermite_basis(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;
    let s2 = -2.0 * t3 + 3.0 * t2;
    let s3 = t3 - t2;
    (1.0 - s2, s3 - t2 + t, s2, s3)
}

/// Derivatives of [`hermite_basis`] with respect to the segment parameter.
#[inline]
fn hermite_basis_derivative(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let d2 = -6.0 * t2 + 6.0 * t;
    (-d2, 3.0 * t2 - 4.0 * t + 1.0, d2, 3.0 * t2 - 2.0 * t)
}

/// Values that a keyframe track can carry.
///
/// Tangents follow the glTF convention: they are expressed in units per
/// second and scaled by the segment length `dt` before blending.
pub trait Interpolatable: Copy + Clone + Sized + std::fmt::Debug {
    /// Tangent of a flat curve.
    const ZERO_TANGENT: Self;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    fn interpolate_cubic(
        v0: Self,
        out_tangent0: Self,
        in_tangent1: Self,
        v1: Self,
        t: f32,
        dt: f32,
    ) -> Self;

    /// Slope of the cubic segment at `t`, in units per second.
    ///
    /// Used when a segment is split so that both halves keep the exact
    /// curve of the original.
    fn cubic_tangent(
        v0: Self,
        out_tangent0: Self,
        in_tangent1: Self,
        v1: Self,
        t: f32,
        dt: f32,
    ) -> Self;
}

impl Interpolatable for f32 {
    const ZERO_TANGENT: Self = 0.0;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);
        s0 * v0 + s1 * (out_tangent0 * dt) + s2 * v1 + s3 * (in_tangent1 * dt)
    }

    fn cubic_tangent(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        if dt <= f32::EPSILON {
            return Self::ZERO_TANGENT;
        }
        let (d0, d1, d2, d3) = hermite_basis_derivative(t);
        (d0 * v0 + d1 * (out_tangent0 * dt) + d2 * v1 + d3 * (in_tangent1 * dt)) / dt
    }
}

impl Interpolatable for Vec3 {
    const ZERO_TANGENT: Self = Vec3::ZERO;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);
        v0 * s0 + out_tangent0 * dt * s1 + v1 * s2 + in_tangent1 * dt * s3
    }

    fn cubic_tangent(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        if dt <= f32::EPSILON {
            return Self::ZERO_TANGENT;
        }
        let (d0, d1, d2, d3) = hermite_basis_derivative(t);
        (v0 * d0 + out_tangent0 * dt * d1 + v1 * d2 + in_tangent1 * dt * d3) / dt
    }
}

impl Interpolatable for Quat {
    const ZERO_TANGENT: Self = Quat::from_xyzw(0.0, 0.0, 0.0, 0.0);

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);
        let blended = Vec4::from(v0) * s0
            + Vec4::from(out_tangent0) * dt * s1
            + Vec4::from(v1) * s2
            + Vec4::from(in_tangent1) * dt * s3;
        Quat::from_vec4(blended).normalize()
    }

    fn cubic_tangent(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        if dt <= f32::EPSILON {
            return Self::ZERO_TANGENT;
        }
        let (d0, d1, d2, d3) = hermite_basis_derivative(t);
        // Tangents live in raw 4D space, no normalization.
        let slope = (Vec4::from(v0) * d0
            + Vec4::from(out_tangent0) * dt * d1
            + Vec4::from(v1) * d2
            + Vec4::from(in_tangent1) * dt * d3)
            / dt;
        Quat::from_vec4(slope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_hits_endpoint_values() {
        let (s0, _, s2, _) = hermite_basis(0.0);
        assert_eq!((s0, s2), (1.0, 0.0));
        let (s0, _, s2, _) = hermite_basis(1.0);
        assert_eq!((s0, s2), (0.0, 1.0));
    }

    #[test]
    fn tangent_of_straight_line_is_its_slope() {
        // v(t) = 2 * time over a 1.5s segment with matching tangents.
        let dt = 1.5;
        let slope = f32::cubic_tangent(0.0, 2.0, 2.0, 3.0, 0.4, dt);
        assert!((slope - 2.0).abs() < 1e-5, "got {slope}");
    }
}
