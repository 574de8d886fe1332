//! OpenAI REST backend.
//!
//! Request bodies are typed; responses are kept as JSON because the adapter
//! only picks a handful of fields out of them.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::llm::{BackendResult, Provider, check_status};

/// `POST /v1/chat/completions` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// `POST /v1/images/generations` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    pub n: u32,
}

/// `POST /v1/embeddings` body for a single input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: String,
}

/// `POST /v1/audio/speech` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechRequest {
    pub model: String,
    pub voice: String,
    pub input: String,
}

/// Opaque OpenAI RPC surface used by [`super::OpenAiAdapter`].
#[async_trait]
pub trait OpenAiBackend: Send + Sync + std::fmt::Debug {
    async fn chat_completion(&self, req: ChatCompletionRequest) -> BackendResult<Value>;

    async fn generate_image(&self, req: ImageRequest) -> BackendResult<Value>;

    async fn create_embedding(&self, req: EmbeddingRequest) -> BackendResult<Value>;

    /// Synthesized audio bytes (mp3).
    async fn create_speech(&self, req: SpeechRequest) -> BackendResult<Vec<u8>>;

    async fn list_models(&self) -> BackendResult<Value>;
}

/// [`OpenAiBackend`] over HTTPS with bearer authentication.
#[derive(Clone)]
pub struct HttpOpenAiBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpOpenAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpOpenAiBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpOpenAiBackend {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        Provider::build_url(&self.base_url, path)
    }

    async fn post_json<T: Serialize + Sync>(&self, path: &str, body: &T) -> BackendResult<Value> {
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        Ok(check_status(resp).await?.json().await?)
    }
}

#[async_trait]
impl OpenAiBackend for HttpOpenAiBackend {
    async fn chat_completion(&self, req: ChatCompletionRequest) -> BackendResult<Value> {
        self.post_json("/v1/chat/completions", &req).await
    }

    async fn generate_image(&self, req: ImageRequest) -> BackendResult<Value> {
        self.post_json("/v1/images/generations", &req).await
    }

    async fn create_embedding(&self, req: EmbeddingRequest) -> BackendResult<Value> {
        self.post_json("/v1/embeddings", &req).await
    }

    async fn create_speech(&self, req: SpeechRequest) -> BackendResult<Vec<u8>> {
        let resp = self
            .http
            .post(self.url("/v1/audio/speech"))
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;
        let bytes = check_status(resp).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn list_models(&self) -> BackendResult<Value> {
        let resp = self
            .http
            .get(self.url("/v1/models"))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Ok(check_status(resp).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_omits_unset_options() {
        let req = ChatCompletionRequest {
            model: "gpt-5.1".to_string(),
            messages: vec![json!({ "role": "user", "content": "hi" })],
            temperature: None,
            max_tokens: Some(64),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "model": "gpt-5.1",
                "messages": [{ "role": "user", "content": "hi" }],
                "max_tokens": 64
            })
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let backend = HttpOpenAiBackend::new("https://api.openai.com", "sk-secret");
        assert!(!format!("{backend:?}").contains("sk-secret"));
    }
}
