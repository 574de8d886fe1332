//! OpenAI tool table.

use crate::catalog::{Category, ModelCatalog};
use crate::mcp::registry::ToolDefinition;
use crate::schema::SchemaNode;

pub const CHAT_COMPLETION: &str = "chat_completion";
pub const CREATE_IMAGE: &str = "create_image";
pub const CREATE_EMBEDDING: &str = "create_embedding";
pub const TEXT_TO_SPEECH: &str = "text_to_speech";
pub const CREATE_VIDEO: &str = "create_video";
pub const LIST_MODELS: &str = "list_models";

pub const IMAGE_SIZES: [&str; 8] = [
    "256x256",
    "512x512",
    "1024x1024",
    "1792x1024",
    "1024x1792",
    "1536x1024",
    "1024x1536",
    "auto",
];
pub const IMAGE_QUALITIES: [&str; 6] = ["standard", "hd", "low", "medium", "high", "auto"];
pub const VOICES: [&str; 6] = ["alloy", "echo", "fable", "onyx", "nova", "shimmer"];
pub const VIDEO_SIZES: [&str; 2] = ["1280x720", "1920x1080"];

/// Model category each tool resolves its default from.
pub fn category_of(tool: &str) -> Option<Category> {
    match tool {
        CHAT_COMPLETION => Some(Category::Chat),
        CREATE_IMAGE => Some(Category::Image),
        CREATE_EMBEDDING => Some(Category::Embedding),
        TEXT_TO_SPEECH => Some(Category::Speech),
        CREATE_VIDEO => Some(Category::Video),
        _ => None,
    }
}

/// `model` property whose default is the category default.
///
/// `closed` restricts values to the category's models.
fn model_property(catalog: &ModelCatalog, category: Category, closed: bool) -> SchemaNode {
    let names = catalog.names_of(category);
    let mut node = SchemaNode::string().describe(format!(
        "The {category} model to use ({})",
        names.join(", ")
    ));
    if let Some(default) = names.first() {
        node = node.with_default(default.clone());
    }
    if closed && !names.is_empty() {
        node = node.enumerate(names);
    }
    node
}

fn default_hint(catalog: &ModelCatalog, category: Category) -> String {
    catalog
        .default_of(category)
        .map(|m| format!(" Always use {} unless the user asks for another model.", m.name))
        .unwrap_or_default()
}

pub fn definitions(catalog: &ModelCatalog) -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            CHAT_COMPLETION,
            format!(
                "Generate a chat completion using OpenAI's GPT models. Supports conversation \
                 history with system, user, and assistant messages.{}",
                default_hint(catalog, Category::Chat)
            ),
            SchemaNode::object()
                .required_property(
                    "messages",
                    SchemaNode::array(
                        SchemaNode::object()
                            .required_property(
                                "role",
                                SchemaNode::string().enumerate(["system", "user", "assistant"]),
                            )
                            .required_property("content", SchemaNode::string()),
                    )
                    .describe("Array of messages in the conversation"),
                )
                .property("model", model_property(catalog, Category::Chat, false))
                .property(
                    "temperature",
                    SchemaNode::number()
                        .range(0.0, 2.0)
                        .describe("Sampling temperature (0-2)"),
                )
                .property(
                    "max_tokens",
                    SchemaNode::integer()
                        .min(1.0)
                        .describe("Maximum tokens to generate"),
                ),
        ),
        ToolDefinition::new(
            CREATE_IMAGE,
            format!(
                "Generate images with OpenAI image models. Returns URLs (or inline image data) \
                 for the generated images.{}",
                default_hint(catalog, Category::Image)
            ),
            SchemaNode::object()
                .required_property(
                    "prompt",
                    SchemaNode::string().describe("A text description of the desired image"),
                )
                .property("model", model_property(catalog, Category::Image, true))
                .property(
                    "size",
                    SchemaNode::string()
                        .enumerate(IMAGE_SIZES)
                        .with_default("1024x1024"),
                )
                .property(
                    "quality",
                    SchemaNode::string()
                        .enumerate(IMAGE_QUALITIES)
                        .describe("standard/hd for DALL-E, low/medium/high/auto for GPT Image"),
                )
                .property(
                    "n",
                    SchemaNode::integer()
                        .range(1.0, 10.0)
                        .with_default(1)
                        .describe("Number of images to generate"),
                ),
        ),
        ToolDefinition::new(
            CREATE_EMBEDDING,
            "Create embeddings for text using OpenAI's embedding models. Useful for semantic \
             search and similarity comparisons.",
            SchemaNode::object()
                .required_property(
                    "input",
                    SchemaNode::one_of(vec![
                        SchemaNode::string(),
                        SchemaNode::array(SchemaNode::string()).min_items(1),
                    ])
                    .describe("Text to embed (string or array of strings)"),
                )
                .property("model", model_property(catalog, Category::Embedding, false)),
        ),
        ToolDefinition::new(
            TEXT_TO_SPEECH,
            "Convert text to speech using OpenAI's TTS models. Returns audio data as base64.",
            SchemaNode::object()
                .required_property(
                    "input",
                    SchemaNode::string().describe("The text to generate audio for"),
                )
                .property("model", model_property(catalog, Category::Speech, true))
                .property(
                    "voice",
                    SchemaNode::string().enumerate(VOICES).with_default("alloy"),
                ),
        ),
        ToolDefinition::new(
            CREATE_VIDEO,
            format!(
                "Generate videos using Sora. Requires allow-listed API access; currently \
                 returns the resolved request without generating.{}",
                default_hint(catalog, Category::Video)
            ),
            SchemaNode::object()
                .required_property(
                    "prompt",
                    SchemaNode::string().describe("A text description of the desired video"),
                )
                .property("model", model_property(catalog, Category::Video, true))
                .property(
                    "size",
                    SchemaNode::string()
                        .enumerate(VIDEO_SIZES)
                        .with_default("1280x720")
                        .describe("Video resolution"),
                )
                .property(
                    "seconds",
                    SchemaNode::integer()
                        .range(1.0, 60.0)
                        .with_default(10)
                        .describe("Video duration in seconds (1-60)"),
                ),
        ),
        ToolDefinition::new(
            LIST_MODELS,
            "List all available OpenAI models",
            SchemaNode::object(),
        ),
    ]
}
