#![deny(unsafe_code)]
//! Core types for the OpenCIP procedural image engine.
//!
//! Provides the seeded `NoiseKernel`, 8-bit color math (`Rgb`, `Rgba`,
//! gradients, saturation, HSV), `Palette`, the validated `VisualContext`
//! with its builder, the `Field`/`PixelBuffer` rasters, the `Xorshift64`
//! PRNG and the shared `RenderError`.

pub mod color;
pub mod context;
pub mod error;
pub mod field;
pub mod geometry;
pub mod noise;
pub mod palette;
pub mod prng;
pub mod raster;

pub use color::{Rgb, Rgba};
pub use context::{AlgorithmKind, VisualContext, VisualContextBuilder, WeightedAlgorithm};
pub use error::RenderError;
pub use field::Field;
pub use noise::NoiseKernel;
pub use palette::Palette;
pub use prng::Xorshift64;
pub use raster::PixelBuffer;
