//! OpenAI adapter.
//!
//! Maps the OpenAI tool table onto the chat, images, embeddings, speech and
//! models endpoints. Video generation (Sora) is provider-gated and answers
//! with a placeholder echoing the resolved request.

pub mod client;
pub mod tools;

pub use client::{
    ChatCompletionRequest, EmbeddingRequest, HttpOpenAiBackend, ImageRequest, OpenAiBackend,
    SpeechRequest,
};

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{
    BackendError, BackendResult, TextInput, ToolAdapter, embed_each, float_vec,
    into_tool_result, parse_args, resolve_model, summarize_embedding,
};
use crate::catalog::ModelCatalog;
use crate::mcp::registry::ToolDefinition;
use crate::normalized::ToolResult;
use tools::{
    CHAT_COMPLETION, CREATE_EMBEDDING, CREATE_IMAGE, CREATE_VIDEO, LIST_MODELS, TEXT_TO_SPEECH,
};

const VIDEO_NOTE: &str = "Sora 2 API integration requires OpenAI API access. Please check \
                          platform.openai.com/docs for the latest API documentation.";

#[derive(Debug, Deserialize)]
struct ChatCompletionParams {
    messages: Vec<Value>,
    model: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CreateImageParams {
    prompt: String,
    model: Option<String>,
    size: Option<String>,
    quality: Option<String>,
    n: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CreateEmbeddingParams {
    input: TextInput,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextToSpeechParams {
    input: String,
    model: Option<String>,
    voice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateVideoParams {
    prompt: String,
    model: Option<String>,
    size: Option<String>,
    seconds: Option<u32>,
}

/// Adapter for the OpenAI backend.
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    backend: Arc<dyn OpenAiBackend>,
    catalog: Arc<ModelCatalog>,
}

impl OpenAiAdapter {
    pub fn new(backend: Arc<dyn OpenAiBackend>, catalog: Arc<ModelCatalog>) -> Self {
        Self { backend, catalog }
    }

    /// Requested model, else the default of the category `tool` draws from.
    fn model(&self, tool: &str, requested: Option<&str>) -> BackendResult<String> {
        let category = tools::category_of(tool).ok_or_else(|| {
            BackendError::InvalidArguments(format!("tool '{tool}' takes no model"))
        })?;
        resolve_model(&self.catalog, requested, category)
    }

    async fn chat_completion(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: ChatCompletionParams = parse_args(arguments)?;
        let req = ChatCompletionRequest {
            model: self.model(CHAT_COMPLETION, params.model.as_deref())?,
            messages: params.messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let resp = self.backend.chat_completion(req).await?;
        Ok(json!({
            "id": resp["id"],
            "model": resp["model"],
            "message": resp["choices"][0]["message"],
            "usage": resp["usage"],
        }))
    }

    async fn create_image(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: CreateImageParams = parse_args(arguments)?;
        let req = ImageRequest {
            model: self.model(CREATE_IMAGE, params.model.as_deref())?,
            prompt: params.prompt,
            size: params.size.unwrap_or_else(|| "1024x1024".to_string()),
            quality: params.quality,
            n: params.n.unwrap_or(1),
        };

        let resp = self.backend.generate_image(req).await?;
        let images: Vec<Value> = resp["data"]
            .as_array()
            .map(|data| {
                data.iter()
                    .map(|img| {
                        let mut entry = Map::new();
                        for key in ["url", "revised_prompt", "b64_json"] {
                            if let Some(v) = img.get(key).filter(|v| !v.is_null()) {
                                entry.insert(key.to_string(), v.clone());
                            }
                        }
                        Value::Object(entry)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(json!({
            "created": resp["created"],
            "images": images,
        }))
    }

    async fn create_embedding(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: CreateEmbeddingParams = parse_args(arguments)?;
        let model = self.model(CREATE_EMBEDDING, params.model.as_deref())?;

        let backend = &self.backend;
        let model_ref = &model;
        let vectors = embed_each(params.input.into_vec(), |input| async move {
            let resp = backend
                .create_embedding(EmbeddingRequest {
                    model: model_ref.clone(),
                    input,
                })
                .await?;
            float_vec(&resp["data"][0]["embedding"])
        })
        .await?;

        let embeddings: Vec<Value> = vectors
            .iter()
            .enumerate()
            .map(|(i, v)| summarize_embedding(i, v))
            .collect();

        Ok(json!({
            "model": model,
            "embeddings": embeddings,
        }))
    }

    async fn text_to_speech(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: TextToSpeechParams = parse_args(arguments)?;
        let req = SpeechRequest {
            model: self.model(TEXT_TO_SPEECH, params.model.as_deref())?,
            voice: params.voice.unwrap_or_else(|| "alloy".to_string()),
            input: params.input,
        };

        let audio = self.backend.create_speech(req).await?;
        let audio_base64 = STANDARD.encode(&audio);
        Ok(json!({
            "format": "mp3",
            "base64_length": audio_base64.len(),
            "audio_base64": audio_base64,
        }))
    }

    fn create_video(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: CreateVideoParams = parse_args(arguments)?;
        Ok(json!({
            "note": VIDEO_NOTE,
            "model": self.model(CREATE_VIDEO, params.model.as_deref())?,
            "prompt": params.prompt,
            "size": params.size.unwrap_or_else(|| "1280x720".to_string()),
            "seconds": params.seconds.unwrap_or(10),
        }))
    }

    async fn list_models(&self) -> BackendResult<Value> {
        let resp = self.backend.list_models().await?;
        let data = resp["data"]
            .as_array()
            .ok_or_else(|| BackendError::InvalidResponse("model list missing 'data'".to_string()))?;

        let mut models: Vec<(String, Value)> = data
            .iter()
            .filter_map(|m| {
                let id = m["id"].as_str()?.to_string();
                Some((id, m["owned_by"].clone()))
            })
            .collect();
        models.sort_by(|a, b| a.0.cmp(&b.0));

        let models: Vec<Value> = models
            .into_iter()
            .map(|(id, owned_by)| json!({ "id": id, "owned_by": owned_by }))
            .collect();
        Ok(json!({ "models": models }))
    }
}

#[async_trait::async_trait]
impl ToolAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        super::Provider::OpenAI.server_name()
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        tools::definitions(&self.catalog)
    }

    async fn invoke(&self, tool: &str, arguments: Map<String, Value>) -> ToolResult {
        let outcome = match tool {
            CHAT_COMPLETION => self.chat_completion(arguments).await,
            CREATE_IMAGE => self.create_image(arguments).await,
            CREATE_EMBEDDING => self.create_embedding(arguments).await,
            TEXT_TO_SPEECH => self.text_to_speech(arguments).await,
            CREATE_VIDEO => self.create_video(arguments),
            LIST_MODELS => self.list_models().await,
            other => return ToolResult::unknown_tool(other),
        };
        into_tool_result(outcome)
    }
}
