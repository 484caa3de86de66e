//! Rendering module
//!
//! `Scene` is a plain list of draw commands built from the game state, so the
//! drawing order and HUD text can be tested without a canvas. `CanvasRenderer`
//! replays a scene onto a Canvas 2D context in the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{DrawCommand, HUD_FONT, Scene, colors};
