use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::types::{
    ApiError, ChatCompletionBody, ChatCompletionResponse, CompletionRequest, ErrorEnvelope,
};
use crate::config::{ApiKey, BackendConfig, ConfigError};

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 1000;
const ERROR_SNIPPET_BYTES: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("authentication rejected: {0}")]
    Unauthorized(String),

    #[error("API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),
}

/// Chat-completion backend.
/// Implemented by `DeepSeekClient` for production; mock implementations used in tests.
#[allow(async_fn_in_trait)]
pub trait ChatClient {
    fn model(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ChatError>;
}

/// Client for DeepSeek or any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone, Debug)]
pub struct DeepSeekClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
    timeout: Duration,
    max_attempts: u32,
}

impl DeepSeekClient {
    pub fn new(http: Client, config: &BackendConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            timeout: config.timeout,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Builds a client from `DEEPSEEK_*` variables. Fails when no API key is
    /// configured, so a keyless process never holds a usable client.
    pub fn from_env(http: Client) -> Result<Self, ConfigError> {
        let config = BackendConfig::from_env()?;
        Ok(Self::new(http, &config))
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey::new("test-key"),
            model: crate::config::DEFAULT_MODEL.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(5),
            max_attempts: 1,
        }
    }

    async fn send_once(&self, request: &CompletionRequest) -> Result<String, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .header("User-Agent", crate::USER_AGENT)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("chat backend rate limited");
            return Err(ChatError::RateLimited);
        }
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|env| env.error)
                .map(api_error_message)
                .unwrap_or_else(|| format!("HTTP {status}: {}", snippet(&text)));
            warn!(status = %status, %message, "chat backend error");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ChatError::Unauthorized(message)
                }
                _ => ChatError::Api {
                    code: status.as_u16(),
                    message,
                },
            });
        }

        let body: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| ChatError::MalformedResponse(format!("invalid JSON body: {e}")))?;
        debug!(model = %self.model, bytes = text.len(), "chat completion received");
        extract_content(body)
    }

    fn transport_error(&self, e: reqwest::Error) -> ChatError {
        if e.is_timeout() {
            ChatError::Timeout(self.timeout.as_secs())
        } else {
            ChatError::Network(e)
        }
    }
}

impl ChatClient for DeepSeekClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ChatError> {
        let mut last_err = None;
        for attempt in 0..self.max_attempts {
            match self.send_once(request).await {
                Ok(content) => return Ok(content),
                Err(e) if is_retriable(&e) => {
                    last_err = Some(e);
                    if attempt + 1 < self.max_attempts {
                        let delay_ms = jittered_backoff(attempt);
                        debug!(
                            attempt = attempt + 1,
                            delay_ms, "retrying after transient error"
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or(ChatError::RateLimited))
    }
}

fn extract_content(body: ChatCompletionResponse) -> Result<String, ChatError> {
    if let Some(err) = body.error {
        return Err(ChatError::Api {
            code: 200,
            message: api_error_message(err),
        });
    }

    let choice = body
        .choices
        .and_then(|c| c.into_iter().next())
        .ok_or_else(|| ChatError::MalformedResponse("no choices in response".into()))?;

    if choice.finish_reason.as_deref() == Some("length") {
        warn!("completion stopped at the token ceiling; analysis may be cut short");
    }

    choice
        .message
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ChatError::MalformedResponse("response contained no message content".into()))
}

fn api_error_message(err: ApiError) -> String {
    match (err.message, err.kind) {
        (Some(m), _) if !m.is_empty() => m,
        (_, Some(kind)) => kind,
        _ => "Unknown error".to_string(),
    }
}

fn snippet(text: &str) -> &str {
    if text.len() > ERROR_SNIPPET_BYTES {
        &text[..text.floor_char_boundary(ERROR_SNIPPET_BYTES)]
    } else {
        text
    }
}

fn is_retriable(e: &ChatError) -> bool {
    matches!(
        e,
        ChatError::RateLimited
            | ChatError::Timeout(_)
            | ChatError::Api {
                code: 500..=599,
                ..
            }
    )
}

/// Equal jitter backoff: base/2 + rand(0, base/2).
fn jittered_backoff(attempt: u32) -> u64 {
    let base = INITIAL_BACKOFF_MS * 2u64.pow(attempt);
    let half = base / 2;
    half + fastrand::u64(..half.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{Choice, ResponseMessage};

    fn response_with(content: Option<&str>) -> ChatCompletionResponse {
        ChatCompletionResponse {
            choices: Some(vec![Choice {
                message: Some(ResponseMessage {
                    content: content.map(str::to_string),
                }),
                finish_reason: Some("stop".into()),
            }]),
            error: None,
        }
    }

    #[test]
    fn extracts_first_choice_content() {
        let content = extract_content(response_with(Some("1. 📊 **Key Values**"))).unwrap();
        assert_eq!(content, "1. 📊 **Key Values**");
    }

    #[test]
    fn empty_content_is_malformed() {
        assert!(matches!(
            extract_content(response_with(Some("  "))),
            Err(ChatError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_content(response_with(None)),
            Err(ChatError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_choices_is_malformed() {
        let body = ChatCompletionResponse {
            choices: Some(vec![]),
            error: None,
        };
        assert!(matches!(
            extract_content(body),
            Err(ChatError::MalformedResponse(_))
        ));
    }

    #[test]
    fn retriable_classification() {
        assert!(is_retriable(&ChatError::RateLimited));
        assert!(is_retriable(&ChatError::Timeout(60)));
        assert!(is_retriable(&ChatError::Api {
            code: 503,
            message: "busy".into()
        }));
        assert!(!is_retriable(&ChatError::Api {
            code: 400,
            message: "bad".into()
        }));
        assert!(!is_retriable(&ChatError::Unauthorized("no".into())));
    }

    #[test]
    fn backoff_stays_within_equal_jitter_window() {
        for attempt in 0..3 {
            let base = INITIAL_BACKOFF_MS * 2u64.pow(attempt);
            let delay = jittered_backoff(attempt);
            assert!(delay >= base / 2 && delay < base, "attempt {attempt}: {delay}");
        }
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let text = "血".repeat(100);
        let s = snippet(&text);
        assert!(s.len() <= ERROR_SNIPPET_BYTES);
        assert!(text.starts_with(s));
    }
}
