//! Application runners
//!
//! - [`winit`]: desktop window runner (feature `winit`)

#[cfg(all(feature = "winit", not(target_arch = "wasm32")))]
pub mod winit;
