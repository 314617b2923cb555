//! Untrusted structured output of an inference call.
//!
//! These types mirror the JSON schema the prompt demands from the model.
//! They are only ever produced by the response validator
//! ([`crate::inference::validate_response`]); nothing downstream touches a
//! model response that has not passed through it.
//!
//! Every field is serde-defaulted: the validator guarantees the top-level
//! shape, but individual path and label records are untrusted and a
//! degenerate record (missing id, empty points) must not fail the run.

use serde::Deserialize;

/// Kind tag of an extracted path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// Outer boundary used for cutting.
    #[default]
    Cutline,
    /// Triangular fold marking.
    Dart,
    /// Small edge mark for alignment.
    Notch,
    /// Arrow indicating fabric direction.
    Grainline,
    /// Dashed line indicating where to fold.
    FoldLine,
    /// Stitching guide offset from the cutline.
    SeamLine,
}

/// One extracted path in pixel space.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathRecord {
    /// Model-assigned identifier, e.g. `cutline_1`.
    pub id: String,
    /// Kind tag.
    pub path_type: PathKind,
    /// Whether the path is meant to be closed. By contract a closed path
    /// ends where it starts; this is a producer contract, not validated.
    pub closed: bool,
    /// Ordered `[x, y]` pixel coordinates.
    pub points: Vec<[f64; 2]>,
    /// Per-path confidence, 0-100.
    pub confidence: f32,
    /// Free-form model annotations, carried through untouched.
    pub metadata: Option<serde_json::Value>,
}

/// Axis-aligned pixel bounding box of a recognized label.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct RawBoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One recognized text label in pixel space.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelRecord {
    /// Model-assigned identifier, e.g. `label_1`.
    pub id: String,
    /// Recognized text.
    pub text: String,
    /// Bounding box in pixel space.
    pub bounding_box: RawBoundingBox,
    /// Confidence, 0-100.
    pub confidence: f32,
}

/// Image dimensions as reported by the model.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct RawDimensions {
    pub width: f64,
    pub height: f64,
}

/// The three extraction layers of a raw result.
#[derive(Debug, Clone, Default)]
pub struct RawLayers {
    /// Outer boundary paths.
    pub cutlines: Vec<PathRecord>,
    /// Internal annotation paths.
    pub markings: Vec<PathRecord>,
    /// Recognized text labels.
    pub labels: Vec<LabelRecord>,
}

/// A structurally validated (but otherwise untrusted) inference result.
#[derive(Debug, Clone, Default)]
pub struct RawInferenceResult {
    /// Model-asserted success flag.
    pub success: bool,
    /// Overall confidence, 0-100.
    pub confidence: f32,
    /// Source dimensions as the model saw them.
    pub image_dimensions: RawDimensions,
    /// Extraction layers.
    pub layers: RawLayers,
    /// Free-text warnings for the QA block.
    pub warnings: Vec<String>,
    /// Free-text notes, informational only.
    pub processing_notes: String,
}
