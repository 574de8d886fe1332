//! Gemini adapter.
//!
//! Text, chat, vision and token counting go through `generateContent` and
//! friends. Veo video and Imagen image generation are not exposed by the
//! public API key surface and answer with placeholders.

pub mod client;
pub mod tools;

pub use client::{
    Blob, Content, CountTokensRequest, EmbedContentRequest, FetchedImage, GeminiBackend,
    GenerateContentRequest, GenerationConfig, HttpGeminiBackend, Part,
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
use client::response_text;
use tools::{
    ANALYZE_IMAGE, CHAT, COUNT_TOKENS, CREATE_VIDEO, DEFAULT_IMAGE_PROMPT, EMBED_CONTENT,
    GENERATE_CONTENT, GENERATE_IMAGE, LIST_MODELS,
};

const VIDEO_NOTE: &str = "Veo 3 API integration requires Google AI Studio access. Please check \
                          ai.google.dev for the latest API documentation.";
const IMAGE_NOTE: &str = "Imagen 3 / Nano Banana Pro API integration requires Google AI Studio \
                          access. Please check ai.google.dev for documentation.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentParams {
    prompt: String,
    model: Option<String>,
    system_instruction: Option<String>,
    temperature: Option<f64>,
    max_output_tokens: Option<u32>,
    top_p: Option<f64>,
    top_k: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatParams {
    messages: Vec<ChatMessage>,
    model: Option<String>,
    system_instruction: Option<String>,
    temperature: Option<f64>,
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentParams {
    content: TextInput,
    model: Option<String>,
    task_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountTokensParams {
    content: String,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeImageParams {
    image_url: String,
    prompt: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateVideoParams {
    prompt: String,
    model: Option<String>,
    duration: Option<u32>,
    resolution: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateImageParams {
    prompt: String,
    model: Option<String>,
    aspect_ratio: Option<String>,
    negative_prompt: Option<String>,
}

/// Adapter for the Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    backend: Arc<dyn GeminiBackend>,
    catalog: Arc<ModelCatalog>,
}

impl GeminiAdapter {
    pub fn new(backend: Arc<dyn GeminiBackend>, catalog: Arc<ModelCatalog>) -> Self {
        Self { backend, catalog }
    }

    /// Requested model, else the default of the category `tool` draws from.
    fn model(&self, tool: &str, requested: Option<&str>) -> BackendResult<String> {
        let category = tools::category_of(tool).ok_or_else(|| {
            BackendError::InvalidArguments(format!("tool '{tool}' takes no model"))
        })?;
        resolve_model(&self.catalog, requested, category)
    }

    async fn generate_content(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: GenerateContentParams = parse_args(arguments)?;
        let model = self.model(GENERATE_CONTENT, params.model.as_deref())?;

        let mut req = GenerateContentRequest::new(vec![Content::text(Some("user"), params.prompt)]);
        req.system_instruction = params.system_instruction.map(|s| Content::text(None, s));
        req.generation_config = GenerationConfig {
            temperature: params.temperature,
            max_output_tokens: params.max_output_tokens,
            top_p: params.top_p,
            top_k: params.top_k,
        };

        let resp = self.backend.generate_content(&model, req).await?;
        text_payload(&resp)
    }

    async fn chat(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: ChatParams = parse_args(arguments)?;
        let model = self.model(CHAT, params.model.as_deref())?;

        let mut messages = params.messages;
        let last = messages
            .pop()
            .ok_or_else(|| BackendError::InvalidArguments("messages must not be empty".to_string()))?;

        let mut contents: Vec<Content> = messages
            .into_iter()
            .map(|m| Content::text(Some(&m.role), m.content))
            .collect();
        contents.push(Content::text(Some("user"), last.content));

        let mut req = GenerateContentRequest::new(contents);
        req.system_instruction = params.system_instruction.map(|s| Content::text(None, s));
        req.generation_config = GenerationConfig {
            temperature: params.temperature,
            max_output_tokens: params.max_output_tokens,
            ..GenerationConfig::default()
        };

        let resp = self.backend.generate_content(&model, req).await?;
        text_payload(&resp)
    }

    async fn embed_content(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: EmbedContentParams = parse_args(arguments)?;
        let model = self.model(EMBED_CONTENT, params.model.as_deref())?;

        let backend = &self.backend;
        let model_ref = model.as_str();
        let task_type = params.task_type.as_deref();
        let vectors = embed_each(params.content.into_vec(), |text| async move {
            let req = EmbedContentRequest {
                content: Content::text(Some("user"), text),
                task_type: task_type.map(ToString::to_string),
            };
            let resp = backend.embed_content(model_ref, req).await?;
            float_vec(&resp["embedding"]["values"])
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

    async fn count_tokens(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: CountTokensParams = parse_args(arguments)?;
        let model = self.model(COUNT_TOKENS, params.model.as_deref())?;
        let req = CountTokensRequest {
            contents: vec![Content::text(Some("user"), params.content)],
        };

        let resp = self.backend.count_tokens(&model, req).await?;
        Ok(json!({ "totalTokens": resp["totalTokens"] }))
    }

    async fn analyze_image(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: AnalyzeImageParams = parse_args(arguments)?;
        let model = self.model(ANALYZE_IMAGE, params.model.as_deref())?;

        let image = self.backend.fetch_image(&params.image_url).await?;
        let prompt = params.prompt.unwrap_or_else(|| DEFAULT_IMAGE_PROMPT.to_string());
        let req = GenerateContentRequest::new(vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::InlineData(Blob {
                    mime_type: image.mime_type,
                    data: STANDARD.encode(&image.bytes),
                }),
                Part::Text(prompt),
            ],
        }]);

        let resp = self.backend.generate_content(&model, req).await?;
        Ok(json!({
            "text": response_text(&resp)?,
            "usageMetadata": resp["usageMetadata"],
        }))
    }

    fn create_video(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: CreateVideoParams = parse_args(arguments)?;
        Ok(json!({
            "note": VIDEO_NOTE,
            "model": self.model(CREATE_VIDEO, params.model.as_deref())?,
            "prompt": params.prompt,
            "duration": params.duration.unwrap_or(10),
            "resolution": params.resolution.unwrap_or_else(|| "1080p".to_string()),
        }))
    }

    fn generate_image(&self, arguments: Map<String, Value>) -> BackendResult<Value> {
        let params: GenerateImageParams = parse_args(arguments)?;
        Ok(json!({
            "note": IMAGE_NOTE,
            "model": self.model(GENERATE_IMAGE, params.model.as_deref())?,
            "prompt": params.prompt,
            "aspectRatio": params.aspect_ratio.unwrap_or_else(|| "1:1".to_string()),
            "negativePrompt": params.negative_prompt,
        }))
    }

    fn list_models(&self) -> Value {
        let models: Vec<Value> = self
            .catalog
            .list_categories()
            .into_iter()
            .flat_map(|category| {
                self.catalog
                    .models_of(category)
                    .iter()
                    .enumerate()
                    .map(move |(i, m)| {
                        json!({
                            "id": m.name,
                            "description": m.description,
                            "category": category,
                            "default": i == 0,
                        })
                    })
            })
            .collect();
        json!({ "models": models })
    }
}

fn text_payload(resp: &Value) -> BackendResult<Value> {
    Ok(json!({
        "text": response_text(resp)?,
        "usageMetadata": resp["usageMetadata"],
        "finishReason": resp["candidates"][0]["finishReason"],
    }))
}

#[async_trait::async_trait]
impl ToolAdapter for GeminiAdapter {
    fn name(&self) -> &str {
        super::Provider::Gemini.server_name()
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        tools::definitions(&self.catalog)
    }

    async fn invoke(&self, tool: &str, arguments: Map<String, Value>) -> ToolResult {
        let outcome = match tool {
            GENERATE_CONTENT => self.generate_content(arguments).await,
            CHAT => self.chat(arguments).await,
            EMBED_CONTENT => self.embed_content(arguments).await,
            COUNT_TOKENS => self.count_tokens(arguments).await,
            ANALYZE_IMAGE => self.analyze_image(arguments).await,
            CREATE_VIDEO => self.create_video(arguments),
            GENERATE_IMAGE => self.generate_image(arguments),
            LIST_MODELS => Ok(self.list_models()),
            other => return ToolResult::unknown_tool(other),
        };
        into_tool_result(outcome)
    }
}
