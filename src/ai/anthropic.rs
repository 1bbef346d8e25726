use base64::Engine as _;
use serde::Deserialize;
use tracing::{debug, instrument, trace, warn};

use crate::ai::config::AiConfig;
use crate::ai::vision::{VisionModel, VisionRequest};
use crate::error::ModelError;

pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

/// Build the Messages API body: one user turn with the image, then the prompt.
pub fn build_vision_body(model: &str, request: &VisionRequest<'_>) -> serde_json::Value {
    let encoded = base64::engine::general_purpose::STANDARD.encode(request.image);
    serde_json::json!({
        "model": model,
        "max_tokens": request.max_tokens,
        "messages": [
            {
                "role": "user",
                "content": [
                    {
                        "type": "image",
                        "source": {
                            "type": "base64",
                            "media_type": request.mime.as_str(),
                            "data": encoded,
                        }
                    },
                    { "type": "text", "text": request.prompt }
                ]
            }
        ]
    })
}

/// Concatenated text blocks of a Messages API reply.
pub fn parse_reply_text(raw: &str) -> Result<String, ModelError> {
    let reply: MessagesResponse = serde_json::from_str(raw)?;
    let text: String = reply
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();
    if text.trim().is_empty() {
        return Err(ModelError::EmptyReply);
    }
    Ok(text)
}

#[derive(Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl AnthropicClient {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.vision_model.clone(),
            url: config
                .messages_url
                .clone()
                .unwrap_or_else(|| ANTHROPIC_MESSAGES_URL.to_string()),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[instrument(
        level = "trace",
        skip(self, request),
        fields(model = %self.model, mime = %request.mime)
    )]
    async fn send(&self, request: VisionRequest<'_>) -> Result<String, ModelError> {
        let body = build_vision_body(&self.model, &request);
        debug!(
            url = %self.url,
            size = request.image.len(),
            max_tokens = request.max_tokens,
            "sending vision request"
        );

        let resp = self
            .http
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "Anthropic API error");
            return Err(ModelError::Status { status, body });
        }

        let raw = resp.text().await?;
        let snippet: String = raw.chars().take(200).collect();
        debug!(snippet = %snippet, "vision response body");
        trace!(raw = %raw, "vision response");
        parse_reply_text(&raw)
    }
}

impl VisionModel for AnthropicClient {
    async fn complete(&self, request: VisionRequest<'_>) -> Result<String, ModelError> {
        self.send(request).await
    }
}
