//! GeminiProvider -- concrete [`LlmProvider`] for Google's native
//! `generateContent` endpoint.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and only exposed when
//! building the request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use guchat_core::llm::provider::LlmProvider;
use guchat_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, StopReason, Usage,
};

use super::types::{
    GeminiContent, GeminiErrorResponse, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig,
};

/// Google Gemini LLM provider.
///
/// A provider built without a key still constructs; every call then fails
/// with [`LlmError::AuthenticationFailed`] before touching the network.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";

    /// Create a new Gemini provider.
    pub fn new(
        api_key: Option<SecretString>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    fn to_gemini_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let mut system_parts: Vec<String> = request.system.iter().cloned().collect();
        let mut contents = Vec::with_capacity(request.messages.len());

        for msg in &request.messages {
            match msg.role {
                // Gemini has a single system instruction slot.
                MessageRole::System => system_parts.push(msg.content.clone()),
                MessageRole::User => {
                    contents.push(GeminiContent::text(Some("user"), msg.content.clone()))
                }
                MessageRole::Assistant => {
                    contents.push(GeminiContent::text(Some("model"), msg.content.clone()))
                }
            }
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(GeminiContent::text(None, system_parts.join("\n\n")))
        };

        GenerateContentRequest {
            system_instruction,
            contents,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        }
    }
}

/// Map a non-success HTTP status and body to an [`LlmError`].
fn map_status_error(
    status: reqwest::StatusCode,
    retry_after: Option<u64>,
    body: &str,
) -> LlmError {
    let message = serde_json::from_str::<GeminiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        400 if message.contains("API key not valid") || message.contains("API_KEY_INVALID") => {
            LlmError::AuthenticationFailed
        }
        400 => LlmError::InvalidRequest(message),
        429 => LlmError::RateLimited {
            retry_after_ms: retry_after.map(|s| s * 1000),
        },
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

fn map_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
            StopReason::Safety
        }
        _ => StopReason::EndTurn,
    }
}

// No Debug derive: keeps the key out of any formatted output.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or(LlmError::AuthenticationFailed)?;

        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        let body = self.to_gemini_request(request);

        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, retry_after, &error_body));
        }

        let gemini_resp: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let Some(candidate) = gemini_resp.candidates.first() else {
            if let Some(reason) = gemini_resp
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            {
                tracing::warn!(block_reason = reason, "Gemini blocked the prompt");
            }
            return Err(LlmError::EmptyResponse);
        };

        let usage = gemini_resp.usage_metadata.clone().unwrap_or_default();

        Ok(CompletionResponse {
            id: gemini_resp.response_id.clone().unwrap_or_default(),
            content: candidate.text(),
            model: gemini_resp
                .model_version
                .clone()
                .unwrap_or_else(|| model.to_string()),
            stop_reason: map_finish_reason(candidate.finish_reason.as_deref()),
            usage: Usage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::response::IntoResponse;
    use axum::{Json, Router};
    use guchat_types::llm::Message;
    use serde_json::{json, Value};

    use super::*;

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            model: String::new(),
            messages: vec![Message {
                role: MessageRole::User,
                content: text.to_string(),
            }],
            system: Some("You are Fang Yuan.".to_string()),
            max_tokens: 300,
            temperature: Some(0.8),
        }
    }

    fn provider(key: Option<&str>) -> GeminiProvider {
        GeminiProvider::new(
            key.map(|k| SecretString::from(k.to_string())),
            "gemini-2.5-flash".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[derive(Clone, Default)]
    struct Captured {
        path: Arc<Mutex<Option<String>>>,
        key: Arc<Mutex<Option<String>>>,
        body: Arc<Mutex<Option<Value>>>,
    }

    /// Serve `reply` with `status` on an ephemeral port; returns the base URL.
    async fn fake_gemini(status: StatusCode, reply: Value, captured: Captured) -> String {
        let app = Router::new().fallback(
            move |uri: Uri, headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                let reply = reply.clone();
                async move {
                    *captured.path.lock().unwrap() = Some(uri.path().to_string());
                    *captured.key.lock().unwrap() = headers
                        .get("x-goog-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *captured.body.lock().unwrap() = Some(body);
                    (status, Json(reply)).into_response()
                }
            },
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_provider_name_and_model() {
        let p = provider(Some("k"));
        assert_eq!(p.name(), "gemini");
        assert_eq!(LlmProvider::model(&p), "gemini-2.5-flash");
    }

    #[test]
    fn test_to_gemini_request_maps_roles() {
        let p = provider(Some("k"));
        let mut req = request("Hi");
        req.messages.push(Message {
            role: MessageRole::Assistant,
            content: "Speak.".to_string(),
        });

        let body = p.to_gemini_request(&req);
        assert_eq!(body.contents.len(), 2);
        assert_eq!(body.contents[0].role.as_deref(), Some("user"));
        assert_eq!(body.contents[1].role.as_deref(), Some("model"));
        assert!(body.system_instruction.is_some());
        assert_eq!(body.generation_config.max_output_tokens, 300);
    }

    #[test]
    fn test_map_status_error() {
        let invalid_key = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            map_status_error(StatusCode::BAD_REQUEST, None, invalid_key),
            LlmError::AuthenticationFailed
        ));
        assert!(matches!(
            map_status_error(StatusCode::BAD_REQUEST, None, "{}"),
            LlmError::InvalidRequest(_)
        ));
        assert!(matches!(
            map_status_error(StatusCode::FORBIDDEN, None, ""),
            LlmError::AuthenticationFailed
        ));
        assert!(matches!(
            map_status_error(StatusCode::TOO_MANY_REQUESTS, Some(2), ""),
            LlmError::RateLimited {
                retry_after_ms: Some(2000)
            }
        ));
        assert!(matches!(
            map_status_error(StatusCode::SERVICE_UNAVAILABLE, None, "overloaded"),
            LlmError::Provider { .. }
        ));
    }

    #[test]
    fn test_map_finish_reason() {
        assert_eq!(map_finish_reason(Some("STOP")), StopReason::EndTurn);
        assert_eq!(map_finish_reason(Some("MAX_TOKENS")), StopReason::MaxTokens);
        assert_eq!(map_finish_reason(Some("SAFETY")), StopReason::Safety);
        assert_eq!(map_finish_reason(None), StopReason::EndTurn);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let p = provider(None).with_base_url("http://127.0.0.1:1");
        let err = p.complete(&request("Hi")).await.unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_complete_round_trip() {
        let captured = Captured::default();
        let base = fake_gemini(
            StatusCode::OK,
            json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Greetings, mortal."}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3},
                "responseId": "resp-1"
            }),
            captured.clone(),
        )
        .await;

        let p = provider(Some("test-key")).with_base_url(base);
        let resp = p.complete(&request("Hi")).await.unwrap();

        assert_eq!(resp.content, "Greetings, mortal.");
        assert_eq!(resp.id, "resp-1");
        assert_eq!(resp.model, "gemini-2.5-flash");
        assert_eq!(resp.stop_reason, StopReason::EndTurn);
        assert_eq!(resp.usage.output_tokens, 3);

        assert_eq!(
            captured.path.lock().unwrap().as_deref(),
            Some("/v1beta/models/gemini-2.5-flash:generateContent")
        );
        assert_eq!(captured.key.lock().unwrap().as_deref(), Some("test-key"));
        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hi");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 300);
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are Fang Yuan."
        );
    }

    #[tokio::test]
    async fn test_complete_maps_rate_limit() {
        let base = fake_gemini(
            StatusCode::TOO_MANY_REQUESTS,
            json!({"error": {"code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED"}}),
            Captured::default(),
        )
        .await;

        let p = provider(Some("test-key")).with_base_url(base);
        let err = p.complete(&request("Hi")).await.unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_complete_without_candidates_is_empty_response() {
        let base = fake_gemini(
            StatusCode::OK,
            json!({"promptFeedback": {"blockReason": "SAFETY"}}),
            Captured::default(),
        )
        .await;

        let p = provider(Some("test-key")).with_base_url(base);
        let err = p.complete(&request("Hi")).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }
}
