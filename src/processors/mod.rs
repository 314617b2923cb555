//! Image processing for the vectorization pipeline.
//!
//! Currently a single concern: preparing an uploaded photo for transmission
//! to a vision model endpoint.

mod prepare;

pub use prepare::{PreparedImage, prepare};
