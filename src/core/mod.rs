//! The core module of the vectorization pipeline.
//!
//! This module contains the fundamental components shared across the crate:
//! - Error handling and fault classification
//! - Pipeline configuration
//! - Parameter validation utilities
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod config;
pub mod errors;
pub mod validation;

pub use config::{ModelSpec, PipelineConfig};
pub use errors::{AttemptFailure, FailureCategory, RetryClass, VectorizeError};

/// Initializes the tracing subscriber for logging.
///
/// Sets up the subscriber with an environment filter and a formatting layer.
/// Typically called once at the start of the embedding application.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
