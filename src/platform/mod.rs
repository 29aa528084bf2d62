//! Platform abstraction layer
//!
//! Everything that touches the browser lives here:
//! - Scene element binding (fails on missing elements)
//! - Controller, click and keyboard events
//! - Clock pumping
//! - Applying effects to the A-Frame scene

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod web;
