//! Platform layer
//!
//! Browser bindings are compiled for wasm32 only. Native callers use
//! [`crate::sim`] directly.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebPuzzle;
