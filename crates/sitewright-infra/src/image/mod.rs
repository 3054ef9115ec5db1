//! Raster image generation adapters.

pub mod imagen;

pub use imagen::{ImagenGenerator, transparent_pixel};
