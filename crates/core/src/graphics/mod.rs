//! Graphics helpers shared by the systems.

pub mod color;

pub use color::{rgba16_to_rgba32, rgba32_to_rgba16, ColorOps};
