use std::env;

pub const DEFAULT_VISION_MODEL: &str = "claude-3-5-sonnet-latest";

#[derive(Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub vision_model: String,
    pub messages_url: Option<String>,
}

impl AiConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = match env::var("ANTHROPIC_API_KEY") {
            Ok(k) if !k.trim().is_empty() => k,
            _ => return None,
        };
        Some(Self {
            api_key,
            vision_model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string()),
            messages_url: env::var("ANTHROPIC_URL").ok(),
        })
    }
}
