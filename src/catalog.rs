//! Static model catalog grouped by capability category.
//!
//! Each provider ships a fixed table of known model identifiers. The first
//! model of a category is that category's default. Defaults can only be
//! changed at construction time through [`ModelCatalog::with_defaults`]; the
//! catalog is read-only afterwards and shared behind an `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Capability category a model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// General text and chat generation.
    Chat,
    /// Coding-specialized models.
    Coding,
    /// Reasoning and deep-research models.
    Research,
    /// Image generation.
    Image,
    /// Video generation.
    Video,
    /// Realtime and audio-native models.
    Audio,
    /// Text-to-speech.
    Speech,
    /// Embedding models.
    Embedding,
    /// Everything else (moderation, search previews, open weights).
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 9] = [
        Category::Chat,
        Category::Coding,
        Category::Research,
        Category::Image,
        Category::Video,
        Category::Audio,
        Category::Speech,
        Category::Embedding,
        Category::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Coding => "coding",
            Self::Research => "research",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Speech => "speech",
            Self::Embedding => "embedding",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        // "gpt" and "etc" are the historical names of the chat and other groups.
        match lower.as_str() {
            "gpt" => Ok(Self::Chat),
            "etc" => Ok(Self::Other),
            _ => Self::ALL
                .into_iter()
                .find(|c| c.as_str() == lower)
                .ok_or_else(|| CatalogError::UnknownCategory(s.to_string())),
        }
    }
}

/// A known model identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub description: String,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Catalog lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No model with this name exists in any category.
    #[error("model not found: {0}")]
    NotFound(String),

    /// The category name is not one of [`Category::ALL`].
    #[error("unknown model category: {0}")]
    UnknownCategory(String),

    /// The provider's catalog does not carry this category.
    #[error("no models registered for category '{0}'")]
    EmptyCategory(Category),

    /// Two override keys resolve to the same category.
    #[error("default model for category '{0}' is configured twice")]
    DuplicateCategory(Category),
}

/// Ordered registry of models per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    categories: Vec<(Category, Vec<ModelInfo>)>,
}

impl ModelCatalog {
    /// Build a catalog from ordered category tables.
    ///
    /// Empty categories are dropped so that every listed category has a
    /// default. A category listed twice keeps its first table.
    pub fn new(categories: Vec<(Category, Vec<ModelInfo>)>) -> Self {
        let mut out: Vec<(Category, Vec<ModelInfo>)> = Vec::with_capacity(categories.len());
        for (category, models) in categories {
            if models.is_empty() || out.iter().any(|(c, _)| *c == category) {
                continue;
            }
            out.push((category, models));
        }
        Self { categories: out }
    }

    /// Apply per-category default overrides, keyed by category name.
    ///
    /// The named model moves to the front of its category. A name not yet
    /// listed is inserted at the front with a generic description. Two keys
    /// naming the same category (`gpt` and `chat`) are rejected.
    pub fn with_defaults(mut self, overrides: &HashMap<String, String>) -> Result<Self, CatalogError> {
        let mut resolved: Vec<(Category, &str)> = Vec::with_capacity(overrides.len());
        for (category_name, model_name) in overrides {
            let category: Category = category_name.parse()?;
            if resolved.iter().any(|(c, _)| *c == category) {
                return Err(CatalogError::DuplicateCategory(category));
            }
            resolved.push((category, model_name.trim()));
        }

        for (category, model_name) in resolved {
            if model_name.is_empty() {
                continue;
            }

            let idx = match self.categories.iter().position(|(c, _)| *c == category) {
                Some(idx) => idx,
                None => {
                    self.categories.push((category, Vec::new()));
                    self.categories.len() - 1
                }
            };
            let models = &mut self.categories[idx].1;

            let existing = models
                .iter()
                .position(|m| m.name.eq_ignore_ascii_case(model_name));
            let info = match existing {
                Some(pos) => models.remove(pos),
                None => ModelInfo::new(model_name, "Configured default"),
            };
            models.insert(0, info);
        }
        Ok(self)
    }

    /// Categories in declaration order.
    pub fn list_categories(&self) -> Vec<Category> {
        self.categories.iter().map(|(c, _)| *c).collect()
    }

    /// Models of a category, default first. Empty when the category is absent.
    pub fn models_of(&self, category: Category) -> &[ModelInfo] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(&[], |(_, models)| models.as_slice())
    }

    /// The category default, i.e. the first entry of [`Self::models_of`].
    pub fn default_of(&self, category: Category) -> Result<&ModelInfo, CatalogError> {
        self.models_of(category)
            .first()
            .ok_or(CatalogError::EmptyCategory(category))
    }

    /// Case-insensitive exact lookup over every category.
    pub fn find(&self, name: &str) -> Result<&ModelInfo, CatalogError> {
        self.iter()
            .map(|(_, m)| m)
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// Flattened `(category, model)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &ModelInfo)> {
        self.categories
            .iter()
            .flat_map(|(c, models)| models.iter().map(move |m| (*c, m)))
    }

    /// Names of a category's models, default first.
    pub fn names_of(&self, category: Category) -> Vec<String> {
        self.models_of(category).iter().map(|m| m.name.clone()).collect()
    }

    /// OpenAI model table.
    pub fn openai() -> Self {
        Self::new(vec![
            (
                Category::Chat,
                table(&[
                    ("gpt-5.1", "Latest GPT-5.1 model, tuned for coding and agentic tasks"),
                    ("gpt-5", "Previous-generation GPT-5 model"),
                    ("gpt-5-pro", "Enhanced GPT-5"),
                    ("gpt-5-mini", "Fast, cost-efficient GPT-5 mini"),
                    ("gpt-5-nano", "Fastest and cheapest GPT-5 nano"),
                    ("gpt-4.1", "GPT-4.1, strong at tool calling and instruction following"),
                    ("gpt-4.1-mini", "Smaller GPT-4.1"),
                    ("gpt-4.1-nano", "Nano GPT-4.1"),
                    ("gpt-4-turbo", "Previous-generation GPT-4 Turbo"),
                    ("gpt-3.5-turbo", "Legacy GPT-3.5 Turbo"),
                    ("davinci-002", "Previous-generation GPT-3 base model"),
                ]),
            ),
            (
                Category::Coding,
                table(&[
                    ("gpt-5.1-codex", "GPT-5.1 based coding model"),
                    ("gpt-5.1-codex-max", "Highest-capability Codex for long coding tasks"),
                    ("gpt-5-codex", "GPT-5 based coding model"),
                    ("gpt-5.1-codex-mini", "Lower-cost Codex mini"),
                ]),
            ),
            (
                Category::Research,
                table(&[
                    ("o3", "o-series reasoning model"),
                    ("o3-mini", "Small o3"),
                    ("o3-pro", "o3 with more compute"),
                    ("o4-mini", "Fast, cheap o4-series model"),
                    ("o3-deep-research", "Deep research model"),
                    ("o4-mini-deep-research", "Small deep research model"),
                    ("o1", "Early o-series model"),
                    ("o1-pro", "Enhanced o1"),
                    ("o1-mini", "Small o1"),
                ]),
            ),
            (
                Category::Image,
                table(&[
                    ("gpt-image-1", "GPT Image 1, supports generation and editing"),
                    ("gpt-image-1-mini", "Small GPT Image 1"),
                    ("dall-e-3", "DALL-E 3, no longer recommended"),
                    ("dall-e-2", "DALL-E 2, legacy"),
                ]),
            ),
            (
                Category::Video,
                table(&[
                    ("sora-2", "Video generation with synchronized audio"),
                    ("sora-2-pro", "Advanced Sora 2"),
                ]),
            ),
            (
                Category::Audio,
                table(&[
                    ("gpt-realtime", "Realtime text and audio model"),
                    ("gpt-realtime-mini", "Small realtime model"),
                    ("gpt-audio", "Audio input and output model"),
                    ("gpt-audio-mini", "Small audio model"),
                    ("gpt-4o-audio", "GPT-4o based audio model"),
                    ("gpt-4o-mini-audio", "Small GPT-4o audio model"),
                    ("gpt-4o-realtime", "GPT-4o based realtime model"),
                    ("gpt-4o-mini-realtime", "Small GPT-4o realtime model"),
                ]),
            ),
            (
                Category::Speech,
                table(&[
                    ("tts-1", "Text-to-speech optimized for latency"),
                    ("tts-1-hd", "Text-to-speech optimized for quality"),
                    ("gpt-4o-mini-tts", "Steerable GPT-4o mini text-to-speech"),
                ]),
            ),
            (
                Category::Embedding,
                table(&[
                    ("text-embedding-3-large", "Most capable embedding model (3072 dimensions)"),
                    ("text-embedding-3-small", "Small embedding model (1536 dimensions)"),
                    ("text-embedding-ada-002", "Legacy embedding model"),
                ]),
            ),
            (
                Category::Other,
                table(&[
                    ("computer-use-preview", "Preview model for computer-use tools"),
                    ("gpt-4o-search-preview", "GPT-4o preview tuned for web search"),
                    ("gpt-4o-mini-search-preview", "Small GPT-4o search preview"),
                    ("omni-moderation", "Flags harmful text and image content"),
                    ("gpt-oss-120b", "Apache 2.0 open-weight model (large)"),
                    ("gpt-oss-20b", "Apache 2.0 open-weight model (medium)"),
                ]),
            ),
        ])
    }

    /// Gemini model table.
    pub fn gemini() -> Self {
        Self::new(vec![
            (
                Category::Chat,
                table(&[
                    ("gemini-3.0-pro", "Gemini 3.0 Pro - Most advanced multimodal model"),
                    ("gemini-3.0-flash", "Gemini 3.0 Flash - Fast and efficient 3.0 model"),
                    ("gemini-2.0-flash-exp", "Gemini 2.0 Flash (experimental) - Advanced performance"),
                    ("gemini-exp-1206", "Gemini experimental 2024-12-06 - Advanced reasoning"),
                    ("gemini-1.5-pro-latest", "Gemini 1.5 Pro latest - Most capable 1.5 model"),
                    ("gemini-1.5-pro", "Gemini 1.5 Pro - Stable version"),
                    ("gemini-1.5-flash-latest", "Gemini 1.5 Flash latest - Fast and efficient"),
                    ("gemini-1.5-flash", "Gemini 1.5 Flash - Stable version"),
                    ("gemini-1.5-flash-8b", "Gemini 1.5 Flash 8B - Lightweight and fast"),
                ]),
            ),
            (
                Category::Embedding,
                table(&[
                    ("text-embedding-004", "Text embedding model (768 dimensions)"),
                    ("embedding-001", "Legacy embedding model"),
                ]),
            ),
            (
                Category::Video,
                table(&[("veo-3", "Veo 3 - Advanced video generation model")]),
            ),
            (
                Category::Image,
                table(&[
                    ("imagen-3", "Imagen 3 - High-quality image generation"),
                    ("nano-banana-pro", "Nano Banana Pro - Fast image generation"),
                ]),
            ),
        ])
    }
}

fn table(rows: &[(&str, &str)]) -> Vec<ModelInfo> {
    rows.iter()
        .map(|(name, description)| ModelInfo::new(*name, *description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first_model() {
        let catalog = ModelCatalog::openai();
        for category in catalog.list_categories() {
            let first = &catalog.models_of(category)[0];
            assert_eq!(catalog.default_of(category).unwrap(), first);
        }
        assert_eq!(catalog.default_of(Category::Image).unwrap().name, "gpt-image-1");
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = ModelCatalog::gemini();
        let found = catalog.find("GEMINI-1.5-FLASH").unwrap();
        assert_eq!(found.name, "gemini-1.5-flash");
    }

    #[test]
    fn test_find_missing_is_not_found() {
        let catalog = ModelCatalog::openai();
        assert_eq!(
            catalog.find("gpt-42"),
            Err(CatalogError::NotFound("gpt-42".to_string()))
        );
    }

    #[test]
    fn test_absent_category_has_no_default() {
        let catalog = ModelCatalog::gemini();
        assert!(catalog.models_of(Category::Speech).is_empty());
        assert_eq!(
            catalog.default_of(Category::Speech),
            Err(CatalogError::EmptyCategory(Category::Speech))
        );
    }

    #[test]
    fn test_override_moves_existing_model_to_front() {
        let overrides = HashMap::from([("image".to_string(), "DALL-E-3".to_string())]);
        let catalog = ModelCatalog::openai().with_defaults(&overrides).unwrap();

        let names = catalog.names_of(Category::Image);
        assert_eq!(names[0], "dall-e-3");
        assert_eq!(names.len(), 4);
        assert_eq!(names.iter().filter(|n| *n == "dall-e-3").count(), 1);
    }

    #[test]
    fn test_override_inserts_unknown_model() {
        let overrides = HashMap::from([("gpt".to_string(), "gpt-6".to_string())]);
        let catalog = ModelCatalog::openai().with_defaults(&overrides).unwrap();
        assert_eq!(catalog.default_of(Category::Chat).unwrap().name, "gpt-6");
        assert!(catalog.find("gpt-5.1").is_ok());
    }

    #[test]
    fn test_override_unknown_category_fails() {
        let overrides = HashMap::from([("hologram".to_string(), "x".to_string())]);
        let err = ModelCatalog::openai().with_defaults(&overrides).unwrap_err();
        assert_eq!(err, CatalogError::UnknownCategory("hologram".to_string()));
    }

    #[test]
    fn test_override_alias_and_canonical_name_conflict() {
        let overrides = HashMap::from([
            ("gpt".to_string(), "gpt-6".to_string()),
            ("chat".to_string(), "gpt-4.1".to_string()),
        ]);
        let err = ModelCatalog::openai().with_defaults(&overrides).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateCategory(Category::Chat));
    }

    #[test]
    fn test_empty_categories_are_dropped() {
        let catalog = ModelCatalog::new(vec![
            (Category::Chat, Vec::new()),
            (Category::Image, vec![ModelInfo::new("img", "")]),
        ]);
        assert_eq!(catalog.list_categories(), vec![Category::Image]);
    }
}
