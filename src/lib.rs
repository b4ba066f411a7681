pub mod clients;
pub mod config;
pub mod encoder;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod session;

pub use clients::{build_client, BedrockImageClient, GeminiImageClient, GenerationClient};
pub use config::{BedrockConfig, GeminiConfig, GeneratorConfig, ProviderKind};
pub use encoder::{ImageEncoder, UploadedFile};
pub use error::{Result, ThumbnailError};
pub use models::*;
pub use orchestrator::{GenerationOrchestrator, GENERATION_FAILED};
pub use prompt::PromptBuilder;
pub use session::SessionState;
