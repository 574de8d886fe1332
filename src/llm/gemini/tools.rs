//! Gemini tool table.

use crate::catalog::{Category, ModelCatalog};
use crate::mcp::registry::ToolDefinition;
use crate::schema::SchemaNode;

pub const GENERATE_CONTENT: &str = "generate_content";
pub const CHAT: &str = "chat";
pub const EMBED_CONTENT: &str = "embed_content";
pub const COUNT_TOKENS: &str = "count_tokens";
pub const ANALYZE_IMAGE: &str = "analyze_image";
pub const CREATE_VIDEO: &str = "create_video";
pub const GENERATE_IMAGE: &str = "generate_image";
pub const LIST_MODELS: &str = "list_models";

pub const DEFAULT_IMAGE_PROMPT: &str = "Describe this image in detail";

pub const TASK_TYPES: [&str; 5] = [
    "RETRIEVAL_QUERY",
    "RETRIEVAL_DOCUMENT",
    "SEMANTIC_SIMILARITY",
    "CLASSIFICATION",
    "CLUSTERING",
];
pub const RESOLUTIONS: [&str; 2] = ["720p", "1080p"];
pub const ASPECT_RATIOS: [&str; 5] = ["1:1", "16:9", "9:16", "4:3", "3:4"];

pub fn category_of(tool: &str) -> Option<Category> {
    match tool {
        GENERATE_CONTENT | CHAT | COUNT_TOKENS | ANALYZE_IMAGE => Some(Category::Chat),
        EMBED_CONTENT => Some(Category::Embedding),
        CREATE_VIDEO => Some(Category::Video),
        GENERATE_IMAGE => Some(Category::Image),
        _ => None,
    }
}

fn model_property(catalog: &ModelCatalog, category: Category) -> SchemaNode {
    let names = catalog.names_of(category);
    let mut node = SchemaNode::string().describe(format!("The model to use ({})", names.join(", ")));
    if let Some(default) = names.first() {
        node = node.with_default(default.clone());
    }
    node
}

fn temperature() -> SchemaNode {
    SchemaNode::number()
        .range(0.0, 2.0)
        .describe("Controls randomness (0-2)")
}

fn max_output_tokens() -> SchemaNode {
    SchemaNode::integer()
        .min(1.0)
        .describe("Maximum number of tokens to generate")
}

pub fn definitions(catalog: &ModelCatalog) -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            GENERATE_CONTENT,
            "Generate text content using Gemini models. Supports text generation, \
             summarization, analysis, and more.",
            SchemaNode::object()
                .required_property(
                    "prompt",
                    SchemaNode::string().describe("The prompt to generate content from"),
                )
                .property("model", model_property(catalog, Category::Chat))
                .property(
                    "systemInstruction",
                    SchemaNode::string().describe("System instruction to guide the model's behavior"),
                )
                .property("temperature", temperature())
                .property("maxOutputTokens", max_output_tokens())
                .property(
                    "topP",
                    SchemaNode::number()
                        .range(0.0, 1.0)
                        .describe("Nucleus sampling parameter"),
                )
                .property(
                    "topK",
                    SchemaNode::integer()
                        .min(1.0)
                        .describe("Top-k sampling parameter"),
                ),
        ),
        ToolDefinition::new(
            CHAT,
            "Have a multi-turn conversation with Gemini. Supports conversation history.",
            SchemaNode::object()
                .required_property(
                    "messages",
                    SchemaNode::array(
                        SchemaNode::object()
                            .required_property("role", SchemaNode::string().enumerate(["user", "model"]))
                            .required_property("content", SchemaNode::string()),
                    )
                    .describe("Array of messages in the conversation"),
                )
                .property("model", model_property(catalog, Category::Chat))
                .property(
                    "systemInstruction",
                    SchemaNode::string().describe("System instruction for the conversation"),
                )
                .property("temperature", temperature())
                .property("maxOutputTokens", max_output_tokens()),
        ),
        ToolDefinition::new(
            EMBED_CONTENT,
            "Generate embeddings for text content. Useful for semantic search and similarity.",
            SchemaNode::object()
                .required_property(
                    "content",
                    SchemaNode::one_of(vec![
                        SchemaNode::string(),
                        SchemaNode::array(SchemaNode::string()).min_items(1),
                    ])
                    .describe("Text content to embed (string or array of strings)"),
                )
                .property("model", model_property(catalog, Category::Embedding))
                .property(
                    "taskType",
                    SchemaNode::string()
                        .enumerate(TASK_TYPES)
                        .describe("The type of task for the embedding"),
                ),
        ),
        ToolDefinition::new(
            COUNT_TOKENS,
            "Count the number of tokens in a given text for a specific model.",
            SchemaNode::object()
                .required_property(
                    "content",
                    SchemaNode::string().describe("The text to count tokens for"),
                )
                .property("model", model_property(catalog, Category::Chat)),
        ),
        ToolDefinition::new(
            ANALYZE_IMAGE,
            "Analyze an image using Gemini's vision capabilities. Provide an image URL and a prompt.",
            SchemaNode::object()
                .required_property(
                    "imageUrl",
                    SchemaNode::string().describe("URL of the image to analyze"),
                )
                .property(
                    "prompt",
                    SchemaNode::string()
                        .with_default(DEFAULT_IMAGE_PROMPT)
                        .describe("The prompt/question about the image"),
                )
                .property("model", model_property(catalog, Category::Chat)),
        ),
        ToolDefinition::new(
            CREATE_VIDEO,
            "Generate videos using Google Veo. Requires Google AI Studio access; currently \
             returns the resolved request without generating.",
            SchemaNode::object()
                .required_property(
                    "prompt",
                    SchemaNode::string().describe("A text description of the desired video"),
                )
                .property("model", model_property(catalog, Category::Video))
                .property(
                    "duration",
                    SchemaNode::integer()
                        .range(1.0, 60.0)
                        .with_default(10)
                        .describe("Video duration in seconds"),
                )
                .property(
                    "resolution",
                    SchemaNode::string()
                        .enumerate(RESOLUTIONS)
                        .with_default("1080p")
                        .describe("Video resolution"),
                ),
        ),
        ToolDefinition::new(
            GENERATE_IMAGE,
            "Generate images using Imagen. Requires Google AI Studio access; currently \
             returns the resolved request without generating.",
            SchemaNode::object()
                .required_property(
                    "prompt",
                    SchemaNode::string().describe("A text description of the desired image"),
                )
                .property("model", model_property(catalog, Category::Image))
                .property(
                    "aspectRatio",
                    SchemaNode::string()
                        .enumerate(ASPECT_RATIOS)
                        .with_default("1:1")
                        .describe("Image aspect ratio"),
                )
                .property(
                    "negativePrompt",
                    SchemaNode::string().describe("What to avoid in the generated image"),
                ),
        ),
        ToolDefinition::new(LIST_MODELS, "List available Gemini models", SchemaNode::object()),
    ]
}
