//! The request handler: the pipeline end to end.
//!
//! [`VectorizePipeline`] wires the external collaborators (blob storage,
//! document store, inference provider) around the pure pipeline stages and
//! maps every internal fault to a caller-facing category. One call to
//! [`VectorizePipeline::vectorize`] is one complete run: fetch → prepare →
//! infer with fallback → transform → persist. A failed run persists
//! nothing.

use async_trait::async_trait;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info};

use crate::core::config::PipelineConfig;
use crate::core::errors::VectorizeError;
use crate::domain::piece::{StoredPiece, VectorizeResult};
use crate::domain::request::{Caller, VectorizeRequest};
use crate::domain::transform::to_result;
use crate::inference::client::InferenceProvider;
use crate::pipeline::orchestrator::vectorize_with_retry;
use crate::processors::prepare;

/// Read access to uploaded source photos.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Whether an object exists at the given key.
    async fn exists(&self, key: &str) -> Result<bool, VectorizeError>;
    /// Downloads the object at the given key.
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, VectorizeError>;
}

/// Write access to the persistent piece hierarchy (owner → project → piece).
#[async_trait]
pub trait PieceStore: Send + Sync {
    /// Writes one finished piece. Called exactly once per successful run.
    async fn persist(
        &self,
        owner: &str,
        project_id: &str,
        piece: &StoredPiece,
    ) -> Result<(), VectorizeError>;
}

/// The vectorization pipeline bound to its collaborators.
pub struct VectorizePipeline<S, P, I> {
    config: PipelineConfig,
    images: S,
    pieces: P,
    provider: I,
}

impl<S, P, I> VectorizePipeline<S, P, I>
where
    S: ImageStore,
    P: PieceStore,
    I: InferenceProvider,
{
    /// Builds a pipeline after validating the configuration.
    pub fn new(
        config: PipelineConfig,
        images: S,
        pieces: P,
        provider: I,
    ) -> Result<Self, VectorizeError> {
        config.validate()?;
        Ok(Self {
            config,
            images,
            pieces,
            provider,
        })
    }

    /// Runs one vectorization from an untrusted JSON payload.
    ///
    /// Payload decoding failures surface as invalid-argument before any
    /// external I/O happens.
    pub async fn vectorize_json(
        &self,
        caller: Option<&Caller>,
        payload: serde_json::Value,
    ) -> Result<VectorizeResult, VectorizeError> {
        let request = VectorizeRequest::from_json(payload)?;
        self.vectorize(caller, &request).await
    }

    /// Runs one vectorization end to end.
    ///
    /// # Errors
    ///
    /// Every failure carries a caller-facing category via
    /// [`VectorizeError::category`]: missing identity is `unauthenticated`,
    /// a malformed request `invalid-argument`, an absent source image
    /// `not-found`, an exhausted model chain `unavailable`, anything else
    /// `internal`. Nothing is persisted unless the whole run succeeded.
    pub async fn vectorize(
        &self,
        caller: Option<&Caller>,
        request: &VectorizeRequest,
    ) -> Result<VectorizeResult, VectorizeError> {
        let caller = caller.ok_or(VectorizeError::Unauthenticated)?;
        request.validate()?;

        let started = Instant::now();

        let key = request.storage_key(&caller.uid);
        if !self.images.exists(&key).await? {
            return Err(VectorizeError::ImageNotFound { key });
        }
        let bytes = self.images.fetch(&key).await?;
        debug!(
            key = %key,
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "source image fetched"
        );

        let prepared = prepare(&bytes, &self.config)?;

        let inference_started = Instant::now();
        let raw = vectorize_with_retry(&self.provider, &self.config, &prepared, request.mode).await?;
        debug!(
            elapsed_ms = inference_started.elapsed().as_millis() as u64,
            confidence = raw.confidence,
            "inference complete"
        );

        let result = to_result(&raw, request, self.config.stroke_hint_mm);

        let stored = StoredPiece::stamped(result.clone(), Utc::now());
        self.pieces
            .persist(&caller.uid, &request.project_id, &stored)
            .await?;

        info!(
            piece_id = %result.piece_id,
            project_id = %request.project_id,
            cutlines = result.layers.cutline.len(),
            markings = result.layers.markings.len(),
            labels = result.layers.labels.len(),
            total_ms = started.elapsed().as_millis() as u64,
            "vectorization complete"
        );
        Ok(result)
    }
}
