//! The inference client.
//!
//! [`InferenceProvider`] is the seam the fallback orchestrator drives;
//! [`ChatCompletionsClient`] is its production implementation, issuing one
//! bounded-timeout chat-completions request per call to a named model
//! endpoint and funneling the response through the structural validator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::core::config::{ModelSpec, PipelineConfig};
use crate::core::errors::VectorizeError;
use crate::domain::raw::RawInferenceResult;
use crate::domain::request::PatternMode;
use crate::inference::prompt::{SYSTEM_PROMPT, user_prompt};
use crate::inference::response::validate_response;
use crate::processors::PreparedImage;

/// A single inference attempt against a named model.
///
/// Implementations perform exactly one call; retry and model-advancement
/// policy live in the orchestrator, never here.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Runs one extraction attempt and returns the structurally validated
    /// result.
    async fn infer(
        &self,
        model: &ModelSpec,
        image: &PreparedImage,
        mode: PatternMode,
    ) -> Result<RawInferenceResult, VectorizeError>;
}

/// Production [`InferenceProvider`] speaking the chat-completions protocol.
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    referer: String,
    app_title: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatCompletionsClient {
    /// Builds a client from the pipeline configuration.
    ///
    /// # Errors
    ///
    /// [`VectorizeError::MissingCredential`] when the configured credential
    /// is empty. Checked here, once, so a misconfigured deployment fails at
    /// construction instead of burning the whole model chain at request
    /// time.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, VectorizeError> {
        if config.api_key.trim().is_empty() {
            return Err(VectorizeError::MissingCredential);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            referer: config.referer.clone(),
            app_title: config.app_title.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    async fn execute(&self, body: &ChatRequest<'_>) -> Result<String, VectorizeError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.app_title)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorizeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ChatResponse = response.json().await?;
        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(VectorizeError::EmptyResponse)
    }
}

#[async_trait]
impl InferenceProvider for ChatCompletionsClient {
    async fn infer(
        &self,
        model: &ModelSpec,
        image: &PreparedImage,
        mode: PatternMode,
    ) -> Result<RawInferenceResult, VectorizeError> {
        let body = ChatRequest {
            model: &model.id,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: user_prompt(image.width, image.height, mode),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: format!("data:image/jpeg;base64,{}", image.base64),
                                detail: "high",
                            },
                        },
                    ]),
                },
            ],
        };

        debug!(model = %model.id, timeout_ms = model.timeout_ms, "inference call");

        // The timeout is a cancellation point: when the budget expires the
        // in-flight request is dropped, not awaited further.
        let content = timeout(Duration::from_millis(model.timeout_ms), self.execute(&body))
            .await
            .map_err(|_| VectorizeError::timeout(model.id.as_str(), model.timeout_ms))??;

        let parsed: serde_json::Value =
            serde_json::from_str(&content).map_err(VectorizeError::ResponseParse)?;
        validate_response(&parsed)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_credential() {
        let config = PipelineConfig::default();
        assert!(matches!(
            ChatCompletionsClient::from_config(&config),
            Err(VectorizeError::MissingCredential)
        ));

        let config = PipelineConfig {
            api_key: "sk-test".into(),
            ..PipelineConfig::default()
        };
        assert!(ChatCompletionsClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "google/gemini-1.5-flash",
            max_tokens: 4096,
            temperature: 0.1,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text("instructions".into()),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: "analyze".into(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: "data:image/jpeg;base64,QUJD".into(),
                                detail: "high",
                            },
                        },
                    ]),
                },
            ],
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "google/gemini-1.5-flash");
        assert_eq!(value["response_format"]["type"], "json_object");
        // System message content is a plain string.
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "instructions");
        // User message content is a two-part array: text then image.
        assert_eq!(value["messages"][1]["content"][0]["type"], "text");
        assert_eq!(value["messages"][1]["content"][1]["type"], "image_url");
        assert_eq!(
            value["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,QUJD"
        );
        assert_eq!(
            value["messages"][1]["content"][1]["image_url"]["detail"],
            "high"
        );
    }

    #[test]
    fn test_envelope_tolerates_missing_content() {
        let envelope: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {}}]}"#).unwrap();
        assert!(envelope.choices[0].message.content.is_none());

        let empty: ChatResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(empty.choices.is_empty());
    }
}
