#![forbid(unsafe_code)]

//! Render: the RGBA backing buffer that paint commands draw into.

pub mod buffer;
pub mod color;

pub use buffer::PixelBuffer;
pub use color::Rgba;
