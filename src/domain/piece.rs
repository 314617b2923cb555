//! The calibrated output artifact of a vectorization run.
//!
//! Everything here is in physical units (millimeters) with confidences
//! normalized to 0-1, ready for projector-overlay rendering on the client.
//! A [`VectorizeResult`] is created once per successful run and never
//! mutated; re-running vectorization produces a new piece with a fresh
//! identifier. [`StoredPiece`] is the persisted form, extended with
//! server-assigned timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::raw::PathKind;

/// A point in physical space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMm {
    pub x_mm: f64,
    pub y_mm: f64,
}

/// An extent in physical space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeMm {
    pub width_mm: f64,
    pub height_mm: f64,
}

/// One calibrated vector path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPath {
    /// Identifier carried over from the extraction.
    pub path_id: String,
    /// Kind tag, unchanged from the extraction.
    pub path_type: PathKind,
    /// Whether the path is closed.
    pub closed: bool,
    /// Ordered points in millimeters, order unchanged from the extraction.
    pub points: Vec<PointMm>,
    /// Rendering hint for stroke width.
    pub stroke_hint_mm: f64,
    /// Confidence normalized to 0-1.
    pub confidence: f32,
}

/// One calibrated text label box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Identifier carried over from the extraction.
    pub label_id: String,
    /// Recognized text.
    pub text: String,
    /// Box origin in millimeters.
    pub position: PointMm,
    /// Box extent in millimeters.
    pub size: SizeMm,
    /// Confidence normalized to 0-1.
    pub confidence: f32,
}

/// The three calibrated output layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PieceLayers {
    /// Outer boundary paths.
    pub cutline: Vec<VectorPath>,
    /// Internal annotation paths.
    pub markings: Vec<VectorPath>,
    /// Text label boxes.
    pub labels: Vec<TextBox>,
}

/// Quality block attached to every piece.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaReport {
    /// Overall confidence normalized to 0-1.
    pub confidence: f32,
    /// Model warnings, passed through verbatim.
    pub warnings: Vec<String>,
}

/// The calibrated result of one vectorization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizeResult {
    /// Freshly generated piece identifier, unique per run.
    pub piece_id: String,
    /// The source photo this piece was derived from.
    pub source_image_id: String,
    /// Calibration scale the caller supplied, mm per pixel.
    pub scale_mm_per_px: f64,
    /// Overall physical width of the piece.
    pub width_mm: f64,
    /// Overall physical height of the piece.
    pub height_mm: f64,
    /// Calibrated output layers.
    pub layers: PieceLayers,
    /// Quality block.
    pub qa: QaReport,
}

/// The persisted form of a [`VectorizeResult`].
///
/// Written exactly once, after the whole pipeline has succeeded; a failed
/// run leaves no trace in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPiece {
    /// The calibrated result, flattened into the document.
    #[serde(flatten)]
    pub result: VectorizeResult,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-assigned update timestamp. Equal to `created_at` on write;
    /// pieces are immutable afterwards.
    pub updated_at: DateTime<Utc>,
}

impl StoredPiece {
    /// Stamps a result for persistence.
    pub fn stamped(result: VectorizeResult, now: DateTime<Utc>) -> Self {
        Self {
            result,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_piece_flattens_result() {
        let result = VectorizeResult {
            piece_id: "p1".into(),
            source_image_id: "img".into(),
            scale_mm_per_px: 0.5,
            width_mm: 100.0,
            height_mm: 50.0,
            layers: PieceLayers::default(),
            qa: QaReport::default(),
        };
        let stored = StoredPiece::stamped(result, Utc::now());
        let value = serde_json::to_value(&stored).unwrap();
        // Flattened: piece fields and timestamps live at the same level.
        assert_eq!(value["piece_id"], "p1");
        assert!(value.get("created_at").is_some());
        assert_eq!(value["created_at"], value["updated_at"]);
    }
}
