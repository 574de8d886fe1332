use crate::catalog::{CatalogError, ModelCatalog};
use crate::llm::Provider;
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (YAML, TOML or JSON)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Provider to expose (openai or gemini)
    #[arg(long, env = "MCP_PROVIDER")]
    pub provider: Option<String>,

    /// Transport to serve on (stdio or http)
    #[arg(long, env = "MCP_MODE")]
    pub transport: Option<String>,

    /// HTTP port (defaults to 3500 for OpenAI, 3501 for Gemini)
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("{var} environment variable is required")]
    MissingCredential { var: &'static str },

    #[error("{0}")]
    InvalidValue(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Stdio,
    Http,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        })
    }
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            other => Err(ConfigError::InvalidValue(format!(
                "unknown transport '{other}' (expected stdio or http)"
            ))),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub transport: Transport,
    pub host: String,
    pub port: Option<u16>,
}

#[derive(Deserialize, Clone, Default)]
pub struct ProviderConfig {
    pub kind: Option<Provider>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Per-category default model overrides, e.g. `image: dall-e-3`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ModelsConfig {
    #[serde(default)]
    pub defaults: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;

        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("server.transport", "stdio")?
            .set_default("server.host", "0.0.0.0")?;

        // 2. Config file: explicit path, else an optional ./config.{yaml,toml,json}
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // 3. Prefixed environment, e.g. GENAI_MCP_MODELS__DEFAULTS__IMAGE=dall-e-3
        builder = builder.add_source(
            Environment::with_prefix("GENAI_MCP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags and their historical variables (MCP_MODE, PORT, MCP_PROVIDER)
        if let Some(transport) = &cli.transport {
            let transport: Transport = transport.parse()?;
            builder = builder.set_override("server.transport", transport.to_string())?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(provider) = &cli.provider {
            let provider: Provider = provider.parse().map_err(ConfigError::InvalidValue)?;
            builder = builder.set_override("provider.kind", provider.to_string())?;
        }
        if cli.log_json {
            builder = builder.set_override("telemetry.json", true)?;
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.resolve_provider()?;
        cfg.build_catalog()?;
        Ok(cfg)
    }

    /// Pin the provider kind, then fill the credential and base URL from the
    /// provider's own variables (`OPENAI_API_KEY`, `GEMINI_BASE_URL`, ...).
    fn resolve_provider(&mut self) -> Result<(), ConfigError> {
        let kind = self.provider.kind.unwrap_or_else(|| {
            self.provider
                .base_url
                .as_deref()
                .map(Provider::detect_from_url)
                .unwrap_or_default()
        });
        self.provider.kind = Some(kind);

        if let Some(key) = non_empty_var(kind.api_key_var()) {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = non_empty_var(kind.base_url_var()) {
            self.provider.base_url = Some(url);
        }

        if self.provider.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            return Err(ConfigError::MissingCredential {
                var: kind.api_key_var(),
            });
        }

        if let Some(base) = &self.provider.base_url {
            url::Url::parse(base)
                .map_err(|e| ConfigError::InvalidValue(format!("invalid base URL '{base}': {e}")))?;
        }
        Ok(())
    }

    pub fn provider(&self) -> Provider {
        self.provider.kind.unwrap_or_default()
    }

    /// Configured port, else the provider's conventional one.
    pub fn effective_port(&self) -> u16 {
        self.server.port.unwrap_or_else(|| self.provider().default_port())
    }

    pub fn api_key(&self) -> &str {
        self.provider.api_key.as_deref().unwrap_or_default()
    }

    pub fn base_url(&self) -> &str {
        self.provider
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.provider().default_base_url())
    }

    /// The provider catalog with configured default overrides applied.
    pub fn build_catalog(&self) -> Result<ModelCatalog, ConfigError> {
        Ok(self.provider().catalog().with_defaults(&self.models.defaults)?)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transport() {
        assert_eq!("HTTP".parse::<Transport>().unwrap(), Transport::Http);
        assert_eq!("stdio".parse::<Transport>().unwrap(), Transport::Stdio);
        assert!(matches!(
            "sse".parse::<Transport>(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_missing_credential_message() {
        let err = ConfigError::MissingCredential {
            var: "GEMINI_API_KEY",
        };
        assert_eq!(err.to_string(), "GEMINI_API_KEY environment variable is required");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = ProviderConfig {
            kind: Some(Provider::OpenAI),
            api_key: Some("sk-secret".to_string()),
            base_url: None,
        };
        assert!(!format!("{provider:?}").contains("sk-secret"));
    }
}
