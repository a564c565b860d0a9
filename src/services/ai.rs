use crate::config::AiConfig;
use anyhow::{anyhow, Result};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;

/// The two primitives every interview feature is built on.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends a single prompt and returns the raw text of the first choice.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Transcribes an audio clip to text.
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str, mime: &str) -> Result<String>;
}

/// OpenAI-compatible client. Any provider exposing `/chat/completions` and
/// `/audio/transcriptions` under `api_base` works.
#[derive(Clone)]
pub struct AiService {
    client: Client<OpenAIConfig>,
    http: reqwest::Client,
    config: AiConfig,
}

impl AiService {
    pub fn new(config: AiConfig) -> Self {
        let openai = OpenAIConfig::new()
            .with_api_key(config.api_key.clone())
            .with_api_base(config.api_base.clone());
        Self {
            client: Client::with_config(openai),
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl LanguageModel for AiService {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into(),
        ];
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.config.model.as_str())
            .messages(messages)
            .build()?;

        let resp = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| anyhow!("chat completion failed: {e}"))?;

        let content = resp
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        tracing::debug!(chars = content.len(), "model completion received");
        Ok(content.trim().to_string())
    }

    async fn transcribe(&self, audio: Vec<u8>, file_name: &str, mime: &str) -> Result<String> {
        let form = reqwest::multipart::Form::new()
            .text("model", self.config.transcribe_model.clone())
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio)
                    .file_name(file_name.to_string())
                    .mime_str(mime)?,
            );

        let url = format!(
            "{}/audio/transcriptions",
            self.config.api_base.trim_end_matches('/')
        );
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let json: serde_json::Value = resp.json().await?;
        json.get("text")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| anyhow!("no transcription text returned"))
    }
}
