//! Aether engine crate.
//!
//! Platform + GPU runtime for the painter: window loop, device/surface/depth
//! management, input, frame timing, logging and the stroke renderer.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
