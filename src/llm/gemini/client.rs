//! Gemini REST backend (`v1beta` Generative Language API).

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::llm::{BackendError, BackendResult, Provider, check_status};

/// MIME type used when neither the response nor the URL says otherwise.
pub const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Base64 payload sent inline with a prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    InlineData(Blob),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(ToString::to_string),
            parts: vec![Part::Text(text.into())],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

/// Every harm category with blocking disabled.
pub fn safety_settings() -> Vec<SafetySetting> {
    HARM_CATEGORIES
        .iter()
        .map(|&category| SafetySetting {
            category,
            threshold: "BLOCK_NONE",
        })
        .collect()
}

/// `:generateContent` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "GenerationConfig::is_empty")]
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateContentRequest {
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            system_instruction: None,
            generation_config: GenerationConfig::default(),
            safety_settings: safety_settings(),
        }
    }
}

/// `:embedContent` body for a single text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentRequest {
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
}

/// `:countTokens` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountTokensRequest {
    pub contents: Vec<Content>,
}

/// Image bytes downloaded for vision prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Opaque Gemini RPC surface used by [`super::GeminiAdapter`].
#[async_trait]
pub trait GeminiBackend: Send + Sync + std::fmt::Debug {
    async fn generate_content(&self, model: &str, req: GenerateContentRequest) -> BackendResult<Value>;

    async fn embed_content(&self, model: &str, req: EmbedContentRequest) -> BackendResult<Value>;

    async fn count_tokens(&self, model: &str, req: CountTokensRequest) -> BackendResult<Value>;

    async fn fetch_image(&self, url: &str) -> BackendResult<FetchedImage>;
}

/// Joined text of the first candidate.
///
/// A response without candidates was blocked; its block reason becomes the
/// error message.
pub fn response_text(resp: &Value) -> BackendResult<String> {
    let Some(candidate) = resp["candidates"].as_array().and_then(|c| c.first()) else {
        let reason = resp["promptFeedback"]["blockReason"]
            .as_str()
            .unwrap_or("an unknown reason");
        return Err(BackendError::InvalidResponse(format!(
            "Text not available. Response was blocked due to {reason}"
        )));
    };

    Ok(candidate["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect::<String>())
        .unwrap_or_default())
}

/// MIME type of a fetched image: the response header, else a guess from the
/// URL path, else [`FALLBACK_IMAGE_MIME`].
pub fn image_mime_type(content_type: Option<&str>, image_url: &str) -> String {
    if let Some(ct) = content_type.map(str::trim).filter(|ct| !ct.is_empty()) {
        return ct.to_string();
    }
    url::Url::parse(image_url)
        .ok()
        .and_then(|u| mime_guess::from_path(u.path()).first())
        .filter(|m| m.type_() == mime_guess::mime::IMAGE)
        .map_or_else(|| FALLBACK_IMAGE_MIME.to_string(), |m| m.essence_str().to_string())
}

/// [`GeminiBackend`] over HTTPS with `x-goog-api-key` authentication.
#[derive(Clone)]
pub struct HttpGeminiBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpGeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGeminiBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpGeminiBackend {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn method_url(&self, model: &str, method: &str) -> String {
        let model = model.trim_start_matches("models/");
        Provider::build_url(&self.base_url, &format!("/v1beta/models/{model}:{method}"))
    }

    async fn call<T: Serialize + Sync>(&self, model: &str, method: &str, body: &T) -> BackendResult<Value> {
        let resp = self
            .http
            .post(self.method_url(model, method))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;
        Ok(check_status(resp).await?.json().await?)
    }
}

#[async_trait]
impl GeminiBackend for HttpGeminiBackend {
    async fn generate_content(&self, model: &str, req: GenerateContentRequest) -> BackendResult<Value> {
        self.call(model, "generateContent", &req).await
    }

    async fn embed_content(&self, model: &str, req: EmbedContentRequest) -> BackendResult<Value> {
        self.call(model, "embedContent", &req).await
    }

    async fn count_tokens(&self, model: &str, req: CountTokensRequest) -> BackendResult<Value> {
        self.call(model, "countTokens", &req).await
    }

    async fn fetch_image(&self, image_url: &str) -> BackendResult<FetchedImage> {
        let resp = check_status(self.http.get(image_url).send().await?).await?;
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        let bytes = resp.bytes().await?;

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            mime_type: image_mime_type(content_type.as_deref(), image_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let mut req = GenerateContentRequest::new(vec![Content::text(Some("user"), "hi")]);
        req.generation_config.max_output_tokens = Some(32);
        req.system_instruction = Some(Content::text(None, "be brief"));

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["contents"], json!([{ "role": "user", "parts": [{ "text": "hi" }] }]));
        assert_eq!(value["systemInstruction"], json!({ "parts": [{ "text": "be brief" }] }));
        assert_eq!(value["generationConfig"], json!({ "maxOutputTokens": 32 }));
        assert_eq!(value["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(value["safetySettings"][0]["threshold"], "BLOCK_NONE");
    }

    #[test]
    fn test_empty_generation_config_is_omitted() {
        let req = GenerateContentRequest::new(vec![]);
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn test_inline_data_part() {
        let part = Part::InlineData(Blob {
            mime_type: "image/png".to_string(),
            data: "AAAA".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&part).unwrap(),
            json!({ "inlineData": { "mimeType": "image/png", "data": "AAAA" } })
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let resp = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello, " }, { "text": "world" }] } }]
        });
        assert_eq!(response_text(&resp).unwrap(), "Hello, world");
    }

    #[test]
    fn test_blocked_response_is_error() {
        let resp = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = response_text(&resp).unwrap_err();
        assert_eq!(err.to_string(), "Text not available. Response was blocked due to SAFETY");
    }

    #[test]
    fn test_image_mime_resolution() {
        assert_eq!(image_mime_type(Some("image/webp"), "https://x/a.png"), "image/webp");
        assert_eq!(image_mime_type(None, "https://x/a.png?size=2"), "image/png");
        assert_eq!(image_mime_type(None, "https://x/photo"), "image/jpeg");
        assert_eq!(image_mime_type(Some(" "), "not a url"), "image/jpeg");
    }

    #[test]
    fn test_method_url_strips_models_prefix() {
        let backend = HttpGeminiBackend::new("https://generativelanguage.googleapis.com/", "k");
        assert_eq!(
            backend.method_url("models/gemini-1.5-pro", "countTokens"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:countTokens"
        );
    }
}
