//! Caller input types for a vectorization run.
//!
//! A [`VectorizeRequest`] is constructed once per invocation, either directly
//! by embedding code or from an untrusted JSON payload via
//! [`VectorizeRequest::from_json`]. Validation happens before any external
//! I/O so a malformed request never touches storage or an inference
//! endpoint.

use serde::{Deserialize, Serialize};

use crate::core::errors::VectorizeError;
use crate::core::validation::{validate_non_empty_str, validate_positive_f64};

/// What kind of craft pattern the photo shows.
///
/// Embedded in the user prompt so the model knows which conventions to
/// expect (e.g. darts and grainlines only make sense for sewing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternMode {
    Sewing,
    Quilting,
    Stencil,
    Maker,
    Custom,
}

impl std::fmt::Display for PatternMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternMode::Sewing => write!(f, "sewing"),
            PatternMode::Quilting => write!(f, "quilting"),
            PatternMode::Stencil => write!(f, "stencil"),
            PatternMode::Maker => write!(f, "maker"),
            PatternMode::Custom => write!(f, "custom"),
        }
    }
}

/// An output layer the caller can restrict the result to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetLayer {
    Cutline,
    Markings,
    Labels,
}

/// Caller input for one vectorization run. Immutable once constructed.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizeRequest {
    /// Project the resulting piece belongs to.
    pub project_id: String,
    /// Identifier of the uploaded source photo.
    pub image_id: String,
    /// Pattern mode, steers the extraction prompt.
    pub mode: PatternMode,
    /// Calibration scale in millimeters per pixel, strictly positive.
    pub scale_mm_per_px: f64,
    /// Optional subset of output layers to keep; `None` keeps all.
    #[serde(default)]
    pub targets: Option<Vec<TargetLayer>>,
}

impl VectorizeRequest {
    /// Builds a request from an untrusted JSON payload.
    ///
    /// Missing or ill-typed fields (including an absent `mode`) surface as
    /// [`VectorizeError::InvalidRequest`], and the resulting request is also
    /// run through [`VectorizeRequest::validate`].
    pub fn from_json(payload: serde_json::Value) -> Result<Self, VectorizeError> {
        let request: VectorizeRequest = serde_json::from_value(payload)
            .map_err(|e| VectorizeError::invalid_request(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    /// Validates field presence and the calibration scale.
    pub fn validate(&self) -> Result<(), VectorizeError> {
        validate_non_empty_str(&self.project_id, "project_id")?;
        validate_non_empty_str(&self.image_id, "image_id")?;
        validate_positive_f64(self.scale_mm_per_px, "scale_mm_per_px")?;
        Ok(())
    }

    /// Deterministic blob-storage key for this request's source image.
    pub fn storage_key(&self, uid: &str) -> String {
        format!("users/{uid}/uploads/{}.jpg", self.image_id)
    }

    /// Whether the given layer should appear in the output.
    pub fn wants_layer(&self, layer: TargetLayer) -> bool {
        match &self.targets {
            Some(targets) => targets.contains(&layer),
            None => true,
        }
    }
}

/// Resolved caller identity, produced by the embedding process's
/// authentication layer before the pipeline runs.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Stable user identifier, the root of the persistence hierarchy.
    pub uid: String,
}

impl Caller {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> serde_json::Value {
        json!({
            "project_id": "proj-1",
            "image_id": "img-7",
            "mode": "sewing",
            "scale_mm_per_px": 0.5
        })
    }

    #[test]
    fn test_from_json_accepts_valid_payload() {
        let request = VectorizeRequest::from_json(valid_payload()).unwrap();
        assert_eq!(request.project_id, "proj-1");
        assert_eq!(request.mode, PatternMode::Sewing);
        assert_eq!(request.scale_mm_per_px, 0.5);
        assert!(request.targets.is_none());
    }

    #[test]
    fn test_from_json_rejects_missing_mode() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("mode");
        let err = VectorizeRequest::from_json(payload).unwrap_err();
        assert!(matches!(err, VectorizeError::InvalidRequest { .. }));
    }

    #[test]
    fn test_from_json_rejects_unknown_mode() {
        let mut payload = valid_payload();
        payload["mode"] = json!("origami");
        assert!(VectorizeRequest::from_json(payload).is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_scale() {
        for scale in [0.0, -0.5] {
            let mut payload = valid_payload();
            payload["scale_mm_per_px"] = json!(scale);
            assert!(VectorizeRequest::from_json(payload).is_err(), "scale {scale}");
        }
    }

    #[test]
    fn test_validate_rejects_empty_ids() {
        let mut payload = valid_payload();
        payload["project_id"] = json!("");
        assert!(VectorizeRequest::from_json(payload).is_err());
    }

    #[test]
    fn test_storage_key_layout() {
        let request = VectorizeRequest::from_json(valid_payload()).unwrap();
        assert_eq!(request.storage_key("u123"), "users/u123/uploads/img-7.jpg");
    }

    #[test]
    fn test_targets_filter() {
        let mut payload = valid_payload();
        payload["targets"] = json!(["cutline", "labels"]);
        let request = VectorizeRequest::from_json(payload).unwrap();
        assert!(request.wants_layer(TargetLayer::Cutline));
        assert!(!request.wants_layer(TargetLayer::Markings));
        assert!(request.wants_layer(TargetLayer::Labels));

        let unfiltered = VectorizeRequest::from_json(valid_payload()).unwrap();
        assert!(unfiltered.wants_layer(TargetLayer::Markings));
    }
}
