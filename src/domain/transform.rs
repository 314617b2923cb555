//! Pixel-to-millimeter unit transformation.
//!
//! The final pure step of the pipeline: maps a validated inference result
//! through the caller's calibration scale into the persisted output
//! representation. Has no failure modes; absent optional data defaults to
//! empty.

use tracing::warn;
use uuid::Uuid;

use crate::domain::piece::{
    PieceLayers, PointMm, QaReport, SizeMm, TextBox, VectorPath, VectorizeResult,
};
use crate::domain::raw::{LabelRecord, PathRecord, RawInferenceResult};
use crate::domain::request::{TargetLayer, VectorizeRequest};

/// Converts a validated inference result into the calibrated output
/// representation.
///
/// Every pixel coordinate is multiplied by the request's calibration scale;
/// path kind, closed flag and point order are carried through unchanged, and
/// confidences move from the raw 0-100 scale to 0-1. Layers not selected by
/// the request's target filter are left empty.
///
/// # Arguments
///
/// * `raw` - The validated inference result, still in pixel space
/// * `request` - The originating request, carrying scale and target filter
/// * `stroke_hint_mm` - Stroke-width hint attached to every output path
pub fn to_result(
    raw: &RawInferenceResult,
    request: &VectorizeRequest,
    stroke_hint_mm: f64,
) -> VectorizeResult {
    let scale = request.scale_mm_per_px;

    let transform_paths = |records: &[PathRecord]| -> Vec<VectorPath> {
        records
            .iter()
            .map(|record| transform_path(record, scale, stroke_hint_mm))
            .collect()
    };

    let layers = PieceLayers {
        cutline: if request.wants_layer(TargetLayer::Cutline) {
            transform_paths(&raw.layers.cutlines)
        } else {
            Vec::new()
        },
        markings: if request.wants_layer(TargetLayer::Markings) {
            transform_paths(&raw.layers.markings)
        } else {
            Vec::new()
        },
        labels: if request.wants_layer(TargetLayer::Labels) {
            raw.layers
                .labels
                .iter()
                .map(|label| transform_label(label, scale))
                .collect()
        } else {
            Vec::new()
        },
    };

    VectorizeResult {
        piece_id: Uuid::new_v4().to_string(),
        source_image_id: request.image_id.clone(),
        scale_mm_per_px: scale,
        width_mm: raw.image_dimensions.width * scale,
        height_mm: raw.image_dimensions.height * scale,
        layers,
        qa: QaReport {
            confidence: raw.confidence / 100.0,
            warnings: raw.warnings.clone(),
        },
    }
}

fn transform_path(record: &PathRecord, scale: f64, stroke_hint_mm: f64) -> VectorPath {
    // Closed paths should end where they start. The contract is the
    // producer's; violations are surfaced to operators but the geometry is
    // carried through unrepaired.
    if record.closed
        && record
            .points
            .first()
            .zip(record.points.last())
            .is_some_and(|(first, last)| first != last)
    {
        warn!(
            path_id = %record.id,
            "closed path does not end at its start point"
        );
    }

    VectorPath {
        path_id: record.id.clone(),
        path_type: record.path_type,
        closed: record.closed,
        points: record
            .points
            .iter()
            .map(|&[x, y]| PointMm {
                x_mm: x * scale,
                y_mm: y * scale,
            })
            .collect(),
        stroke_hint_mm,
        confidence: record.confidence / 100.0,
    }
}

fn transform_label(label: &LabelRecord, scale: f64) -> TextBox {
    TextBox {
        label_id: label.id.clone(),
        text: label.text.clone(),
        position: PointMm {
            x_mm: label.bounding_box.x * scale,
            y_mm: label.bounding_box.y * scale,
        },
        size: SizeMm {
            width_mm: label.bounding_box.width * scale,
            height_mm: label.bounding_box.height * scale,
        },
        confidence: label.confidence / 100.0,
    }
}
