//! Error types for the vectorization pipeline.
//!
//! This module defines the crate-wide error enum covering every fault the
//! pipeline can produce, from image decoding through model inference to
//! persistence. It also carries the two classification views the rest of the
//! crate is built on: the retry class consumed by the fallback orchestrator
//! and the boundary category surfaced to callers.

use serde::Serialize;
use thiserror::Error;

/// How the fallback orchestrator should react to a failed attempt.
///
/// The classification is a pure function of the error variant. Nothing in the
/// crate inspects error message text to make a retry decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Transient failure: retry the same model per the delay schedule.
    Retry,
    /// Structural failure: further attempts against this model are pointless,
    /// advance to the next model in the chain immediately.
    NextModel,
    /// Unrecoverable failure: abort the orchestration outright.
    Terminal,
}

/// Caller-facing failure category.
///
/// Internal diagnostics never cross the boundary directly; every error maps
/// to one of these categories plus a short user-presentable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// Caller identity was absent.
    Unauthenticated,
    /// Request payload was missing fields or carried invalid values.
    InvalidArgument,
    /// The source image does not exist at its expected location.
    NotFound,
    /// Every model in the chain was exhausted without a usable result.
    Unavailable,
    /// Anything else.
    Internal,
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureCategory::Unauthenticated => write!(f, "unauthenticated"),
            FailureCategory::InvalidArgument => write!(f, "invalid-argument"),
            FailureCategory::NotFound => write!(f, "not-found"),
            FailureCategory::Unavailable => write!(f, "unavailable"),
            FailureCategory::Internal => write!(f, "internal"),
        }
    }
}

/// One failed inference attempt, recorded in the diagnostic trail.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptFailure {
    /// Identifier of the model that failed.
    pub model: String,
    /// Zero-based attempt ordinal for that model.
    pub attempt: usize,
    /// Rendered error for the attempt.
    pub error: String,
}

impl AttemptFailure {
    pub fn new(model: &str, attempt: usize, error: &VectorizeError) -> Self {
        Self {
            model: model.to_string(),
            attempt,
            error: error.to_string(),
        }
    }
}

/// Enum representing every error the vectorization pipeline can produce.
#[derive(Error, Debug)]
pub enum VectorizeError {
    /// The source image bytes could not be decoded.
    #[error("image decode")]
    ImageDecode(#[source] image::ImageError),

    /// The prepared image could not be re-encoded for transport.
    #[error("image encode")]
    ImageEncode(#[source] image::ImageError),

    /// The inference credential was not configured.
    #[error("inference credential is not configured")]
    MissingCredential,

    /// An inference call exceeded its wall-clock budget and was aborted.
    #[error("model {model} timed out after {timeout_ms}ms")]
    Timeout {
        /// Identifier of the model that timed out.
        model: String,
        /// The budget that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// The model endpoint answered with a non-success status.
    #[error("model endpoint returned status {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, carried for diagnostics.
        body: String,
    },

    /// Network-level failure talking to the model endpoint.
    #[error("transport")]
    Transport(#[source] reqwest::Error),

    /// The response envelope contained no textual payload.
    #[error("model response contained no content")]
    EmptyResponse,

    /// The textual payload was not parseable as JSON.
    #[error("model output is not valid JSON")]
    ResponseParse(#[source] serde_json::Error),

    /// The parsed payload failed structural validation.
    #[error("model output failed schema check at '{field}'")]
    Schema {
        /// The first offending field, in dotted notation.
        field: &'static str,
    },

    /// A structurally valid response fell below the confidence gate.
    #[error("confidence {confidence} below minimum {minimum}")]
    LowConfidence {
        /// The model-reported overall confidence (0-100).
        confidence: f32,
        /// The gate it failed (0-100).
        minimum: f32,
    },

    /// Every model in the chain was exhausted without a usable result.
    #[error("all models exhausted after {} failed attempts", .attempts.len())]
    ModelsExhausted {
        /// The full diagnostic trail, one entry per failed attempt.
        attempts: Vec<AttemptFailure>,
    },

    /// No caller identity was supplied.
    #[error("caller is not authenticated")]
    Unauthenticated,

    /// The request payload was malformed.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What was missing or out of range.
        message: String,
    },

    /// The source image is absent from blob storage.
    #[error("source image not found at {key}")]
    ImageNotFound {
        /// The storage key that was probed.
        key: String,
    },

    /// A blob-storage or document-store operation failed.
    #[error("storage: {message}")]
    Storage {
        /// What the backing store reported.
        message: String,
    },
}

impl VectorizeError {
    /// Creates a timeout error for the given model and budget.
    pub fn timeout(model: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            model: model.into(),
            timeout_ms,
        }
    }

    /// Creates a schema error naming the first offending field.
    pub fn schema(field: &'static str) -> Self {
        Self::Schema { field }
    }

    /// Creates a confidence-gate error on the raw 0-100 scale.
    pub fn low_confidence(confidence: f32, minimum: f32) -> Self {
        Self::LowConfidence {
            confidence,
            minimum,
        }
    }

    /// Creates an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Classifies this error for the orchestrator's retry/advance decision.
    ///
    /// Transport-class faults (timeout, HTTP, empty body, unparseable output)
    /// and the confidence gate are worth retrying against the same model. A
    /// schema fault is not: an identical request to the same model is very
    /// unlikely to change its output shape, so the chain advances instead.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            VectorizeError::Timeout { .. }
            | VectorizeError::Http { .. }
            | VectorizeError::Transport(_)
            | VectorizeError::EmptyResponse
            | VectorizeError::ResponseParse(_)
            | VectorizeError::LowConfidence { .. } => RetryClass::Retry,
            VectorizeError::Schema { .. } => RetryClass::NextModel,
            _ => RetryClass::Terminal,
        }
    }

    /// Maps this error to the caller-facing failure category.
    pub fn category(&self) -> FailureCategory {
        match self {
            VectorizeError::Unauthenticated => FailureCategory::Unauthenticated,
            VectorizeError::InvalidRequest { .. } => FailureCategory::InvalidArgument,
            VectorizeError::ImageNotFound { .. } => FailureCategory::NotFound,
            VectorizeError::ModelsExhausted { .. } => FailureCategory::Unavailable,
            _ => FailureCategory::Internal,
        }
    }

    /// A short, user-presentable message for this error.
    ///
    /// Deliberately free of internal detail; operators read `Display` and the
    /// attempt trail instead.
    pub fn user_message(&self) -> &'static str {
        match self.category() {
            FailureCategory::Unauthenticated => "Sign in to vectorize patterns",
            FailureCategory::InvalidArgument => "The request was missing or had invalid fields",
            FailureCategory::NotFound => "The photo could not be found",
            FailureCategory::Unavailable => "Couldn't analyze the pattern, please try again",
            FailureCategory::Internal => "Failed to process the pattern",
        }
    }
}

impl From<image::ImageError> for VectorizeError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageDecode(error)
    }
}

impl From<reqwest::Error> for VectorizeError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error)
    }
}
