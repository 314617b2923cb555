//! Structural validation of untrusted model output.
//!
//! The single seam through which every inference response enters the typed
//! world. [`validate_response`] enforces the minimal shape the unit
//! transformer needs to operate without faulting; it deliberately performs
//! no deeper per-record validation, so individually degenerate paths and
//! labels are tolerated and carried through.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::core::errors::VectorizeError;
use crate::domain::raw::{RawInferenceResult, RawLayers};

/// Validates the structural schema of a parsed model response.
///
/// Checks run in order and short-circuit on the first failure, naming the
/// offending field:
/// 1. the candidate is a non-null object
/// 2. `success` is a boolean
/// 3. `confidence` is numeric within `[0, 100]`
/// 4. `layers` is an object
/// 5. `layers.cutlines`, `layers.markings` and `layers.labels` are arrays
///
/// On success the candidate is converted into a typed
/// [`RawInferenceResult`]. Array entries that fail lenient per-record
/// decoding are dropped with a warning rather than failing the response.
pub fn validate_response(candidate: &Value) -> Result<RawInferenceResult, VectorizeError> {
    let object = candidate
        .as_object()
        .ok_or_else(|| VectorizeError::schema("response"))?;

    let success = object
        .get("success")
        .and_then(Value::as_bool)
        .ok_or_else(|| VectorizeError::schema("success"))?;

    let confidence = object
        .get("confidence")
        .and_then(Value::as_f64)
        .ok_or_else(|| VectorizeError::schema("confidence"))?;
    if !(0.0..=100.0).contains(&confidence) {
        return Err(VectorizeError::schema("confidence"));
    }

    let layers = object
        .get("layers")
        .and_then(Value::as_object)
        .ok_or_else(|| VectorizeError::schema("layers"))?;

    let cutlines = layers
        .get("cutlines")
        .and_then(Value::as_array)
        .ok_or_else(|| VectorizeError::schema("layers.cutlines"))?;
    let markings = layers
        .get("markings")
        .and_then(Value::as_array)
        .ok_or_else(|| VectorizeError::schema("layers.markings"))?;
    let labels = layers
        .get("labels")
        .and_then(Value::as_array)
        .ok_or_else(|| VectorizeError::schema("layers.labels"))?;

    Ok(RawInferenceResult {
        success,
        confidence: confidence as f32,
        image_dimensions: object
            .get("image_dimensions")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default(),
        layers: RawLayers {
            cutlines: decode_records(cutlines, "cutlines"),
            markings: decode_records(markings, "markings"),
            labels: decode_records(labels, "labels"),
        },
        warnings: object
            .get("warnings")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default(),
        processing_notes: object
            .get("processing_notes")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Decodes one layer's records leniently, dropping entries that do not
/// decode and logging what was dropped.
fn decode_records<T: DeserializeOwned>(items: &[Value], layer: &str) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(layer, %error, "dropping undecodable record");
                None
            }
        })
        .collect()
}
