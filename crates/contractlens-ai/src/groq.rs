//! HTTP client for Groq's OpenAI-compatible chat completions endpoint.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use contractlens_core::{Prompt, ResultField};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{CompletionError, CompletionService};

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Completion service credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a credential, rejecting blank values.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Everything the client needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: ApiKey,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl CompletionConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Chat completions client.
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: ApiKey,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqClient {
    /// Build a client. `base_url` should be like `https://api.groq.com/openai/v1`.
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            api_key: config.api_key,
            temperature: config.temperature,
        })
    }

    fn request_body<'a>(&'a self, prompt: &'a Prompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
            max_tokens: prompt.max_tokens,
        }
    }
}

/// Pull the first choice's text out of a chat completions response body.
fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(CompletionError::NoChoices)?;
    Ok(choice.message.content.unwrap_or_default())
}

#[async_trait]
impl CompletionService for GroqClient {
    async fn complete(
        &self,
        field: ResultField,
        prompt: &Prompt,
    ) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(url = %url, field = %field, model = %self.model, "requesting completion");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&self.request_body(prompt))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = parse_completion(&resp.text().await?)?;
        info!(field = %field, chars = text.chars().count(), "completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractlens_core::{ClauseCategory, PromptBuilder};

    fn client(base_url: &str) -> GroqClient {
        let mut config = CompletionConfig::new(ApiKey::new("gsk_test").unwrap());
        config.base_url = base_url.to_string();
        GroqClient::new(config).unwrap()
    }

    #[test]
    fn api_key_rejects_blank() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   ").is_none());
        assert_eq!(ApiKey::new(" gsk_abc ").unwrap().expose(), "gsk_abc");
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("gsk_secret").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
        let config = CompletionConfig::new(key);
        assert!(!format!("{config:?}").contains("gsk_secret"));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = client("https://api.groq.com/openai/v1/");
        assert_eq!(client.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[test]
    fn request_body_shape() {
        let client = client(DEFAULT_API_BASE);
        let prompt = PromptBuilder::default().clause(ClauseCategory::Liability, "10. Liability");
        let body = serde_json::to_value(client.request_body(&prompt)).unwrap();

        assert_eq!(body["model"], "llama-3.1-8b-instant");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["max_tokens"], 800);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], prompt.system.as_str());
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], prompt.user.as_str());
    }

    #[test]
    fn parses_first_choice() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Either party may terminate."}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"total_tokens": 42}
        }"#;
        assert_eq!(parse_completion(body).unwrap(), "Either party may terminate.");
    }

    #[test]
    fn null_content_is_empty_text() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "");
    }

    #[test]
    fn no_choices_is_an_error() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, CompletionError::NoChoices));
    }

    #[test]
    fn malformed_body_is_json_error() {
        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, CompletionError::Json(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        let client = client("http://127.0.0.1:9");
        let prompt = PromptBuilder::default().summary("text");
        let err = client
            .complete(ResultField::Summary, &prompt)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Http(_)));
    }
}
