//! Domain types of the vectorization pipeline.
//!
//! This module groups the request/response types that cross the crate's
//! boundaries and the pure unit transformation between them:
//! - [`request`]: caller input and identity
//! - [`raw`]: untrusted, pixel-space inference output
//! - [`piece`]: the calibrated, persisted artifact
//! - [`transform`]: the pixel-to-millimeter mapping

pub mod piece;
pub mod raw;
pub mod request;
pub mod transform;

pub use piece::{PieceLayers, PointMm, QaReport, SizeMm, StoredPiece, TextBox, VectorPath, VectorizeResult};
pub use raw::{LabelRecord, PathKind, PathRecord, RawBoundingBox, RawDimensions, RawInferenceResult, RawLayers};
pub use request::{Caller, PatternMode, TargetLayer, VectorizeRequest};
pub use transform::to_result;
