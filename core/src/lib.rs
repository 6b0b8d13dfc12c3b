// Loom NLG Library
// Templated response generation for Loom agents

pub mod config;
pub mod generator;
pub mod render;
pub mod selector;
pub mod store;
pub mod telemetry;
pub mod variables;
pub mod variant;

// Export core types
pub use config::{GeneratorConfig, TemplateConfig};
pub use generator::{
    ConversationState, InMemoryConversationState, NaturalLanguageGenerator, TemplatedGenerator,
};
pub use render::{render, RenderFault, Rendering};
pub use selector::VariantSelector;
pub use store::{filter_for_channel, TemplateStore};
pub use telemetry::{RenderMetrics, RenderMetricsSnapshot, RenderObserver};
pub use variables::{resolve, Variables};
pub use variant::Variant;

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NlgError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Conversation state error: {0}")]
    State(String),

    #[error("Telemetry error: {0}")]
    Telemetry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
pub type Result<T> = std::result::Result<T, NlgError>;
