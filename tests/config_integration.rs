use genai_mcp::catalog::{CatalogError, Category};
use genai_mcp::config::{AppConfig, ConfigError, Transport};
use genai_mcp::llm::Provider;
use serial_test::serial;
use std::env;
use std::io::Write;

const MANAGED_VARS: &[&str] = &[
    "CONFIG_FILE",
    "MCP_MODE",
    "MCP_PROVIDER",
    "PORT",
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "GEMINI_API_KEY",
    "GEMINI_BASE_URL",
    "GENAI_MCP_SERVER__PORT",
    "GENAI_MCP_SERVER__HOST",
    "GENAI_MCP_MODELS__DEFAULTS__IMAGE",
    "GENAI_MCP_MODELS__DEFAULTS__WIZARDRY",
    "GENAI_MCP_MODELS__DEFAULTS__GPT",
    "GENAI_MCP_MODELS__DEFAULTS__CHAT",
];

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    for var in MANAGED_VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

fn set(var: &str, value: &str) {
    unsafe {
        env::set_var(var, value);
    }
}

fn load(args: &[&str]) -> Result<AppConfig, ConfigError> {
    let argv = std::iter::once("genai-mcp").chain(args.iter().copied());
    AppConfig::load_from_args(argv)
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();
    set("OPENAI_API_KEY", "sk-test");

    let config = load(&[]).expect("defaults should load");
    assert_eq!(config.provider(), Provider::OpenAI);
    assert_eq!(config.server.transport, Transport::Stdio);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.effective_port(), 3500);
    assert_eq!(config.base_url(), "https://api.openai.com");
    assert_eq!(config.api_key(), "sk-test");
    assert!(!config.telemetry.json);

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_credential() {
    clear_env_vars();
    set("MCP_PROVIDER", "gemini");

    let err = load(&[]).unwrap_err();
    assert!(matches!(err, ConfigError::MissingCredential { var: "GEMINI_API_KEY" }));
    assert_eq!(err.to_string(), "GEMINI_API_KEY environment variable is required");

    clear_env_vars();
}

#[test]
#[serial]
fn test_historical_variables() {
    clear_env_vars();
    set("MCP_PROVIDER", "gemini");
    set("MCP_MODE", "http");
    set("GEMINI_API_KEY", "g-key");
    set("GEMINI_BASE_URL", "http://localhost:9999");

    let config = load(&[]).expect("Failed to load config");
    assert_eq!(config.provider(), Provider::Gemini);
    assert_eq!(config.server.transport, Transport::Http);
    assert_eq!(config.effective_port(), 3501);
    assert_eq!(config.base_url(), "http://localhost:9999");

    set("PORT", "8088");
    let config = load(&[]).expect("Failed to load config");
    assert_eq!(config.effective_port(), 8088);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_flags_override_env() {
    clear_env_vars();
    set("MCP_MODE", "http");
    set("PORT", "8088");
    set("OPENAI_API_KEY", "sk-test");

    let config = load(&["--transport", "stdio", "--port", "9000", "--log-json"]).unwrap();
    assert_eq!(config.server.transport, Transport::Stdio);
    assert_eq!(config.effective_port(), 9000);
    assert!(config.telemetry.json);

    clear_env_vars();
}

#[test]
#[serial]
fn test_prefixed_env_override() {
    clear_env_vars();
    set("OPENAI_API_KEY", "sk-test");
    set("GENAI_MCP_SERVER__PORT", "9090");
    set("GENAI_MCP_MODELS__DEFAULTS__IMAGE", "dall-e-3");

    let config = load(&[]).expect("Failed to load config");
    assert_eq!(config.effective_port(), 9090);

    let catalog = config.build_catalog().unwrap();
    assert_eq!(
        catalog.default_of("image".parse().unwrap()).unwrap().name,
        "dall-e-3"
    );

    clear_env_vars();
}

#[test]
#[serial]
fn test_unknown_default_category_is_rejected() {
    clear_env_vars();
    set("OPENAI_API_KEY", "sk-test");
    set("GENAI_MCP_MODELS__DEFAULTS__WIZARDRY", "merlin-1");

    let err = load(&[]).unwrap_err();
    assert!(matches!(err, ConfigError::Catalog(_)), "got {err:?}");

    clear_env_vars();
}

#[test]
#[serial]
fn test_alias_and_category_both_set_is_rejected() {
    clear_env_vars();
    set("OPENAI_API_KEY", "sk-test");
    set("GENAI_MCP_MODELS__DEFAULTS__GPT", "gpt-6");
    set("GENAI_MCP_MODELS__DEFAULTS__CHAT", "gpt-4.1");

    let err = load(&[]).unwrap_err();
    assert!(
        matches!(err, ConfigError::Catalog(CatalogError::DuplicateCategory(Category::Chat))),
        "got {err:?}"
    );

    clear_env_vars();
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_env_vars();
    set("OPENAI_API_KEY", "sk-test");

    assert!(matches!(
        load(&["--transport", "carrier-pigeon"]),
        Err(ConfigError::InvalidValue(_))
    ));
    assert!(matches!(
        load(&["--provider", "anthropic"]),
        Err(ConfigError::InvalidValue(_))
    ));

    set("OPENAI_BASE_URL", "not a url");
    assert!(matches!(load(&[]), Err(ConfigError::InvalidValue(_))));

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();
    set("GEMINI_API_KEY", "g-key");

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    write!(
        file,
        r#"
server:
  transport: http
  port: 7070
provider:
  kind: gemini
models:
  defaults:
    chat: gemini-1.5-pro
"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let config = load(&["--config", &path]).expect("Failed to load config from file");

    assert_eq!(config.provider(), Provider::Gemini);
    assert_eq!(config.server.transport, Transport::Http);
    assert_eq!(config.effective_port(), 7070);
    let catalog = config.build_catalog().unwrap();
    assert_eq!(
        catalog.default_of("chat".parse().unwrap()).unwrap().name,
        "gemini-1.5-pro"
    );

    clear_env_vars();
}

#[test]
#[serial]
fn test_provider_detected_from_base_url() {
    clear_env_vars();
    set("GEMINI_API_KEY", "g-key");

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[provider]
base_url = "https://generativelanguage.googleapis.com"
"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let config = load(&["--config", &path]).unwrap();
    assert_eq!(config.provider(), Provider::Gemini);

    clear_env_vars();
}
