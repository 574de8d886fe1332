//! Provider-specific configuration and detection.
//!
//! This module handles differences between the supported backends:
//! credential variable names, default endpoints, ports and server names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::ModelCatalog;

/// Supported generative-AI providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// `OpenAI` (api.openai.com)
    #[default]
    OpenAI,
    /// Google Gemini (generativelanguage.googleapis.com)
    Gemini,
}

impl Provider {
    /// Detect provider from a base URL. Unrecognized hosts map to `OpenAI`,
    /// since most compatible gateways speak its API.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let provider = Provider::detect_from_url("https://generativelanguage.googleapis.com");
    /// assert_eq!(provider, Provider::Gemini);
    /// ```
    #[must_use]
    pub fn detect_from_url(base_url: &str) -> Self {
        let lower = base_url.to_lowercase();
        if lower.contains("generativelanguage.googleapis.com") || lower.contains("gemini") {
            Self::Gemini
        } else {
            Self::OpenAI
        }
    }

    /// Name advertised in MCP `initialize` and the health endpoint.
    #[must_use]
    pub fn server_name(self) -> &'static str {
        match self {
            Self::OpenAI => "openai-mcp",
            Self::Gemini => "gemini-mcp",
        }
    }

    /// Environment variable holding the API credential.
    #[must_use]
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Environment variable overriding the API base URL.
    #[must_use]
    pub fn base_url_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_BASE_URL",
            Self::Gemini => "GEMINI_BASE_URL",
        }
    }

    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com",
            Self::Gemini => "https://generativelanguage.googleapis.com",
        }
    }

    /// HTTP port used when none is configured.
    #[must_use]
    pub fn default_port(self) -> u16 {
        match self {
            Self::OpenAI => 3500,
            Self::Gemini => 3501,
        }
    }

    /// The provider's built-in model table.
    #[must_use]
    pub fn catalog(self) -> ModelCatalog {
        match self {
            Self::OpenAI => ModelCatalog::openai(),
            Self::Gemini => ModelCatalog::gemini(),
        }
    }

    /// Join an API path onto a base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL (trailing slashes are ignored)
    /// * `path` - The API path, with or without a leading slash
    #[must_use]
    pub fn build_url(base_url: &str, path: &str) -> String {
        let base = base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
        })
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(format!("unknown provider '{other}' (expected openai or gemini)")),
        }
    }
}
