//! Canvas-2D rendering module
//!
//! A pure reader of the simulation: draws everything back-to-front each
//! frame and never mutates entity state.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod palette;
#[cfg(target_arch = "wasm32")]
pub mod sprites;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
