//! Pointer input: event types and scene ray casting.

pub mod pointer;
pub mod resolver;

pub use pointer::{PointerEvent, PointerKind, PointerTarget, SurfaceRect};
pub use resolver::{Intersection, PointerResolver};
