//! Configuration for the vectorization pipeline.
//!
//! All tunables live in one explicit [`PipelineConfig`] value injected at
//! construction time: the inference credential, the ordered model chain, the
//! retry schedule, the confidence gate, and the image-preparation knobs.
//! Nothing in the crate reads the environment or any other ambient source;
//! credential resolution is the embedding process's job, done once before
//! the pipeline is built.

use serde::Deserialize;

use crate::core::errors::VectorizeError;
use crate::core::validation::{validate_positive_f32, validate_range_f32};

/// Default chat-completions endpoint the client talks to.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Maximum side length of a prepared image, in pixels.
///
/// Larger than 1024 to keep fine markings legible, smaller than 2048 to keep
/// upload size and inference latency bounded.
pub const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 1536;

/// JPEG quality used when the preparer has to re-encode.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Minimum acceptable overall confidence on the raw 0-100 scale.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 20.0;

/// Stroke-width hint attached to every output path, in millimeters.
pub const DEFAULT_STROKE_HINT_MM: f64 = 0.5;

/// One entry of the ordered fallback chain: a model identifier plus its own
/// wall-clock budget.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSpec {
    /// Provider-qualified model identifier, e.g. `google/gemini-1.5-flash`.
    pub id: String,
    /// Hard timeout for a single call to this model, in milliseconds.
    pub timeout_ms: u64,
}

impl ModelSpec {
    pub fn new(id: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            id: id.into(),
            timeout_ms,
        }
    }
}

/// Configuration for the vectorization pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bearer credential for the inference endpoint. Resolved by the
    /// embedding process; an empty value fails client construction.
    pub api_key: String,
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    /// Value for the `HTTP-Referer` attribution header.
    pub referer: String,
    /// Value for the `X-Title` attribution header.
    pub app_title: String,
    /// Ordered fallback chain, fastest/cheapest models first.
    pub model_chain: Vec<ModelSpec>,
    /// Pause before the next attempt on the same model; its length also
    /// fixes the per-model attempt count at `1 + len`.
    pub retry_delays_ms: Vec<u64>,
    /// Minimum acceptable overall confidence, raw 0-100 scale.
    pub min_confidence: f32,
    /// Maximum side length of a prepared image, in pixels.
    pub max_image_dimension: u32,
    /// JPEG quality for re-encoded images, 1-100.
    pub jpeg_quality: u8,
    /// Stroke-width hint attached to output paths, in millimeters.
    pub stroke_hint_mm: f64,
    /// Token budget requested from the model.
    pub max_tokens: u32,
    /// Sampling temperature; kept low for deterministic-leaning extraction.
    pub temperature: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            referer: "https://patterncast.app".to_string(),
            app_title: "PatternCast".to_string(),
            // Flash-class vision models first for speed, larger fallbacks
            // with a longer budget behind them.
            model_chain: vec![
                ModelSpec::new("google/gemini-2.0-flash-exp", 20_000),
                ModelSpec::new("google/gemini-1.5-flash", 20_000),
                ModelSpec::new("anthropic/claude-3-5-haiku-20241022", 25_000),
                ModelSpec::new("openai/gpt-4o-mini", 25_000),
            ],
            retry_delays_ms: vec![500, 1_000, 2_000],
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            stroke_hint_mm: DEFAULT_STROKE_HINT_MM,
            max_tokens: 4_096,
            temperature: 0.1,
        }
    }
}

impl PipelineConfig {
    /// Validates the configuration.
    ///
    /// The credential is deliberately not checked here: a missing credential
    /// is a configuration fault of the inference client, reported as
    /// [`VectorizeError::MissingCredential`] when the client is built, so it
    /// stays distinguishable from an invalid pipeline configuration.
    pub fn validate(&self) -> Result<(), VectorizeError> {
        if self.model_chain.is_empty() {
            return Err(VectorizeError::invalid_request(
                "model_chain must contain at least one model",
            ));
        }
        for model in &self.model_chain {
            if model.id.is_empty() {
                return Err(VectorizeError::invalid_request("model id cannot be empty"));
            }
            if model.timeout_ms == 0 {
                return Err(VectorizeError::invalid_request(format!(
                    "model {} has a zero timeout",
                    model.id
                )));
            }
        }
        if self.max_image_dimension == 0 {
            return Err(VectorizeError::invalid_request(
                "max_image_dimension must be positive",
            ));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(VectorizeError::invalid_request(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        validate_range_f32(self.min_confidence, 0.0, 100.0, "min_confidence")?;
        validate_range_f32(self.temperature, 0.0, 2.0, "temperature")?;
        validate_positive_f32(self.stroke_hint_mm as f32, "stroke_hint_mm")?;
        Ok(())
    }
}
