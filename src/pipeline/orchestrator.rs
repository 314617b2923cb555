//! The ordered model-chain fallback orchestrator.
//!
//! Drives a single [`InferenceProvider`] through the configured model chain:
//! up to `1 + R` strictly sequential attempts per model (R = length of the
//! retry-delay schedule), a confidence gate on structurally valid responses,
//! and tag-driven failure classification. The first qualifying success wins;
//! full exhaustion produces one terminal error carrying the complete
//! diagnostic trail.
//!
//! There is no concurrency here on purpose: attempts and models run one at
//! a time so cost stays bounded and provider-side rate limits stay
//! predictable.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::core::config::PipelineConfig;
use crate::core::errors::{AttemptFailure, RetryClass, VectorizeError};
use crate::domain::raw::RawInferenceResult;
use crate::domain::request::PatternMode;
use crate::inference::client::InferenceProvider;
use crate::processors::PreparedImage;

/// Runs the model chain until one model yields an acceptable result.
///
/// Per attempt, the outcome is reduced to a single tagged result: a
/// structurally valid response below the confidence gate becomes a
/// [`VectorizeError::LowConfidence`] so the retry/advance decision is a pure
/// function of the error tag.
///
/// # Errors
///
/// [`VectorizeError::ModelsExhausted`] with the full attempt trail when no
/// model produced a qualifying result. An attempt error classified
/// [`RetryClass::Terminal`] aborts the orchestration and propagates as-is.
pub async fn vectorize_with_retry<P: InferenceProvider + ?Sized>(
    provider: &P,
    config: &PipelineConfig,
    image: &PreparedImage,
    mode: PatternMode,
) -> Result<RawInferenceResult, VectorizeError> {
    let mut attempts: Vec<AttemptFailure> = Vec::new();

    for model in &config.model_chain {
        'attempts: for attempt in 0..=config.retry_delays_ms.len() {
            let outcome = provider.infer(model, image, mode).await.and_then(|result| {
                if result.confidence >= config.min_confidence {
                    Ok(result)
                } else {
                    Err(VectorizeError::low_confidence(
                        result.confidence,
                        config.min_confidence,
                    ))
                }
            });

            let error = match outcome {
                Ok(result) => {
                    info!(
                        model = %model.id,
                        attempt,
                        confidence = result.confidence,
                        failed_attempts = attempts.len(),
                        "model chain produced an acceptable result"
                    );
                    return Ok(result);
                }
                Err(error) => error,
            };

            warn!(model = %model.id, attempt, error = %error, "inference attempt failed");
            attempts.push(AttemptFailure::new(&model.id, attempt, &error));

            match error.retry_class() {
                RetryClass::Retry => {
                    if let Some(&delay_ms) = config.retry_delays_ms.get(attempt) {
                        sleep(Duration::from_millis(delay_ms)).await;
                    }
                    // Schedule exhausted: fall through to the next model.
                }
                RetryClass::NextModel => break 'attempts,
                RetryClass::Terminal => return Err(error),
            }
        }
    }

    warn!(
        failed_attempts = attempts.len(),
        "every model in the chain is exhausted"
    );
    Err(VectorizeError::ModelsExhausted { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ModelSpec;
    use crate::inference::testing::{ScriptedProvider, prepared_image, raw_result};

    /// Two models, two retries each, no pauses: four attempts per run max
    /// per model, eight in total.
    fn test_config() -> PipelineConfig {
        PipelineConfig {
            model_chain: vec![
                ModelSpec::new("fast/model", 1_000),
                ModelSpec::new("slow/model", 2_000),
            ],
            retry_delays_ms: vec![0, 0],
            ..PipelineConfig::default()
        }
    }

    async fn run(
        provider: &ScriptedProvider,
        config: &PipelineConfig,
    ) -> Result<RawInferenceResult, VectorizeError> {
        vectorize_with_retry(
            provider,
            config,
            &prepared_image(),
            crate::domain::request::PatternMode::Sewing,
        )
        .await
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let provider = ScriptedProvider::new(vec![Ok(raw_result(80.0))]);
        let result = run(&provider, &test_config()).await.unwrap();
        assert_eq!(result.confidence, 80.0);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_confidence_exactly_at_threshold_accepted() {
        let provider = ScriptedProvider::new(vec![Ok(raw_result(20.0))]);
        let result = run(&provider, &test_config()).await.unwrap();
        assert_eq!(result.confidence, 20.0);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_confidence_below_threshold_retried() {
        let provider = ScriptedProvider::new(vec![
            Ok(raw_result(19.0)),
            Ok(raw_result(75.0)),
        ]);
        let result = run(&provider, &test_config()).await.unwrap();
        assert_eq!(result.confidence, 75.0);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_transport_fault_retried_on_same_model() {
        let provider = ScriptedProvider::new(vec![
            Err(VectorizeError::EmptyResponse),
            Err(VectorizeError::timeout("fast/model", 1_000)),
            Ok(raw_result(50.0)),
        ]);
        let result = run(&provider, &test_config()).await.unwrap();
        assert_eq!(result.confidence, 50.0);
        // All three attempts land on the first model's schedule.
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_schema_fault_advances_to_next_model() {
        let provider = ScriptedProvider::new(vec![
            Err(VectorizeError::schema("layers.cutlines")),
            Ok(raw_result(60.0)),
        ]);
        let result = run(&provider, &test_config()).await.unwrap();
        assert_eq!(result.confidence, 60.0);
        // One schema failure, then the second model's first attempt: the
        // first model's remaining retries were skipped.
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_exhaustion_bounds_attempts_and_keeps_trail() {
        let provider = ScriptedProvider::always_failing();
        let config = test_config();
        let err = run(&provider, &config).await.unwrap_err();

        let max_attempts = config.model_chain.len() * (1 + config.retry_delays_ms.len());
        assert_eq!(provider.call_count(), max_attempts);

        match err {
            VectorizeError::ModelsExhausted { attempts } => {
                assert_eq!(attempts.len(), max_attempts);
                assert_eq!(attempts[0].model, "fast/model");
                assert_eq!(attempts[0].attempt, 0);
                assert_eq!(attempts[2].attempt, 2);
                assert_eq!(attempts[3].model, "slow/model");
                assert!(attempts[0].error.contains("timed out"));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_schema_fault_mid_schedule_skips_remaining_retries() {
        // Model 1: transport failure, then schema failure on its second
        // attempt; the chain must advance without consuming the third slot.
        let provider = ScriptedProvider::new(vec![
            Err(VectorizeError::EmptyResponse),
            Err(VectorizeError::schema("success")),
            Ok(raw_result(90.0)),
        ]);
        let result = run(&provider, &test_config()).await.unwrap();
        assert_eq!(result.confidence, 90.0);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_trail_records_low_confidence_attempts() {
        let provider = ScriptedProvider::new(vec![Ok(raw_result(5.0))]);
        let config = PipelineConfig {
            model_chain: vec![ModelSpec::new("only/model", 1_000)],
            retry_delays_ms: vec![],
            ..PipelineConfig::default()
        };
        let err = run(&provider, &config).await.unwrap_err();
        match err {
            VectorizeError::ModelsExhausted { attempts } => {
                assert_eq!(attempts.len(), 1);
                assert!(attempts[0].error.contains("confidence 5"));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }
}
