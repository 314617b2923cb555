//! The vectorization pipeline.
//!
//! Combines the processing stages into the complete run: the fallback
//! orchestrator driving the model chain, and the request handler wiring the
//! external collaborators around it.

pub mod handler;
pub mod orchestrator;

pub use handler::{ImageStore, PieceStore, VectorizePipeline};
pub use orchestrator::vectorize_with_retry;
