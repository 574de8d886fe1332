//! Provider adapters.
//!
//! Each backend (OpenAI, Gemini) gets one adapter implementing
//! [`ToolAdapter`]. An adapter owns a set of tools: it declares their
//! definitions, resolves the effective model from the [`ModelCatalog`],
//! maps validated arguments onto the backend's native request, and turns
//! the backend response (or failure) into a [`ToolResult`].
//!
//! The backends themselves sit behind per-provider traits
//! ([`openai::OpenAiBackend`], [`gemini::GeminiBackend`]) so tests can swap
//! in stubs.

pub mod gemini;
pub mod openai;
pub mod provider;

pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;
pub use provider::Provider;

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::catalog::{CatalogError, Category, ModelCatalog};
use crate::mcp::registry::ToolDefinition;
use crate::normalized::ToolResult;

/// Number of leading embedding values echoed back per item.
pub const EMBEDDING_PREVIEW_LEN: usize = 5;

/// Failure of a backend call or of mapping arguments onto it.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport-level failure.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("{status} {message}")]
    Api { status: u16, message: String },

    /// The provider answered with a body we could not interpret.
    #[error("{0}")]
    InvalidResponse(String),

    /// Validated arguments could not be mapped onto the backend request.
    #[error("{0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidArguments(e.to_string())
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Shared capability interface of every provider adapter.
#[async_trait::async_trait]
pub trait ToolAdapter: Send + Sync + std::fmt::Debug {
    /// Server name advertised to clients (e.g. `openai-mcp`).
    fn name(&self) -> &str;

    /// Definitions of every tool this adapter owns, in listing order.
    fn tool_definitions(&self) -> Vec<ToolDefinition>;

    /// Run a tool on already-validated arguments. Never fails: backend
    /// errors are returned as error-kind results.
    async fn invoke(&self, tool: &str, arguments: Map<String, Value>) -> ToolResult;
}

/// Turn an adapter outcome into the uniform envelope.
pub fn into_tool_result(outcome: BackendResult<Value>) -> ToolResult {
    match outcome {
        Ok(payload) => ToolResult::json(&payload),
        Err(e) => ToolResult::error(format!("Error: {e}")),
    }
}

/// Caller-supplied model if present, else the catalog default for `category`.
///
/// Names missing from the catalog are passed through unchanged.
pub fn resolve_model(
    catalog: &ModelCatalog,
    requested: Option<&str>,
    category: Category,
) -> BackendResult<String> {
    match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => {
            if catalog.find(name).is_err() {
                debug!(
                    name: "catalog.model.unknown",
                    model = %name,
                    category = %category,
                    "model not in catalog, passing through"
                );
            }
            Ok(name.to_string())
        }
        None => Ok(catalog.default_of(category)?.name.clone()),
    }
}

/// Accepts the `string | string[]` shape used by embedding tools.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    One(String),
    Many(Vec<String>),
}

impl TextInput {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

/// Embed every item with one backend call each, concurrently.
///
/// Results come back in input order regardless of completion order; the
/// first failure fails the whole batch.
pub async fn embed_each<F, Fut>(inputs: Vec<String>, embed: F) -> BackendResult<Vec<Vec<f64>>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = BackendResult<Vec<f64>>>,
{
    futures::future::join_all(inputs.into_iter().map(embed))
        .await
        .into_iter()
        .collect()
}

/// Bounded summary of one embedding vector.
pub fn summarize_embedding(index: usize, values: &[f64]) -> Value {
    json!({
        "index": index,
        "embedding_length": values.len(),
        "embedding_preview": &values[..values.len().min(EMBEDDING_PREVIEW_LEN)],
    })
}

/// Deserialize validated arguments into a tool's parameter struct.
pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(arguments: Map<String, Value>) -> BackendResult<T> {
    Ok(serde_json::from_value(Value::Object(arguments))?)
}

/// Parse a JSON array of numbers found at `value`.
pub(crate) fn float_vec(value: &Value) -> BackendResult<Vec<f64>> {
    value
        .as_array()
        .ok_or_else(|| BackendError::InvalidResponse("embedding values missing".to_string()))?
        .iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| BackendError::InvalidResponse("non-numeric embedding value".to_string()))
        })
        .collect()
}

/// Map a non-success HTTP response to [`BackendError::Api`], keeping the
/// provider's own error message when the body carries one.
pub(crate) async fn check_status(resp: reqwest::Response) -> BackendResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(ToString::to_string))
        .unwrap_or(body);

    Err(BackendError::Api {
        status: status.as_u16(),
        message,
    })
}
