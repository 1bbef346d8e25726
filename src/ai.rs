pub mod anthropic;
pub mod config;
pub mod prompts;
pub mod vision;

pub use anthropic::AnthropicClient;
pub use vision::{ImageMime, VisionModel, VisionRequest};
