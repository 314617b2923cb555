//! # PatternCast
//!
//! A Rust library that digitizes photographed craft patterns (sewing pieces,
//! quilting templates, stencils) into calibrated vector geometry for
//! projector-overlay display.
//!
//! ## Features
//!
//! - Image preparation: bounded-size, bounded-quality JPEG transport encoding
//! - Vision-model extraction through an ordered multi-model fallback chain
//! - Bounded-latency inference calls with per-model timeout budgets
//! - Structural validation of untrusted model output at a single seam
//! - Pixel-to-millimeter unit transformation with stable piece identifiers
//! - Collaborator traits for blob storage and piece persistence
//!
//! ## Modules
//!
//! * [`core`] - Error taxonomy, configuration, and validation utilities
//! * [`domain`] - Request, raw-output and calibrated-piece types plus the unit transform
//! * [`processors`] - Source image preparation
//! * [`inference`] - Prompt contract, chat-completions client, response validation
//! * [`pipeline`] - Fallback orchestrator and the end-to-end request handler
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use patterncast::prelude::*;
//!
//! async fn digitize<S: ImageStore, P: PieceStore>(
//!     images: S,
//!     pieces: P,
//! ) -> Result<(), VectorizeError> {
//!     // Resolve the credential once, up front; the pipeline itself never
//!     // reads the environment.
//!     let config = PipelineConfig {
//!         api_key: std::env::var("OPENROUTER_API_KEY").unwrap_or_default(),
//!         ..PipelineConfig::default()
//!     };
//!     let client = ChatCompletionsClient::from_config(&config)?;
//!     let pipeline = VectorizePipeline::new(config, images, pieces, client)?;
//!
//!     let caller = Caller::new("user-1");
//!     let request = VectorizeRequest::from_json(serde_json::json!({
//!         "project_id": "summer-dress",
//!         "image_id": "bodice-front",
//!         "mode": "sewing",
//!         "scale_mm_per_px": 0.42
//!     }))?;
//!
//!     let piece = pipeline.vectorize(Some(&caller), &request).await?;
//!     println!(
//!         "digitized piece {} ({:.1} x {:.1} mm)",
//!         piece.piece_id, piece.width_mm, piece.height_mm
//!     );
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domain;
pub mod inference;
pub mod pipeline;
pub mod processors;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use patterncast::prelude::*;
/// ```
///
/// Included items focus on the most common tasks:
/// - The pipeline and its collaborator seams (`VectorizePipeline`,
///   `ImageStore`, `PieceStore`, `InferenceProvider`)
/// - The production client (`ChatCompletionsClient`)
/// - Configuration (`PipelineConfig`, `ModelSpec`)
/// - Request/result types (`VectorizeRequest`, `VectorizeResult`, `Caller`)
/// - Error handling (`VectorizeError`, `FailureCategory`)
pub mod prelude {
    pub use crate::core::{FailureCategory, ModelSpec, PipelineConfig, VectorizeError};
    pub use crate::domain::{
        Caller, PatternMode, StoredPiece, TargetLayer, VectorizeRequest, VectorizeResult,
    };
    pub use crate::inference::{ChatCompletionsClient, InferenceProvider};
    pub use crate::pipeline::{ImageStore, PieceStore, VectorizePipeline};
}
