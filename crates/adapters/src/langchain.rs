// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chat-model wrapper around Vertex AI, in the style of an orchestration framework.
//!
//! Callers work with role-tagged [`ChatMessage`]s whose content is plain text
//! or a list of [`ContentBlock`]s (text and image URLs). [`ChatVertexAi`]
//! translates the message list into a `generateContent` body and returns an
//! [`AiMessage`].
//!
//! Translation rules:
//!
//! - system messages become the system instruction
//! - human messages become `user` turns, AI messages become `model` turns
//! - `data:` image URLs become inline data; `gs://` and `http(s)://` URLs
//!   become file references
//!
//! [`LangchainVertexTarget`] binds the wrapper to the benchmark. It requires
//! an image and fails before any network call when the prompt has none.

use crate::http::{join_url, require_key, send_json};
use crate::wire::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    ThinkingConfig, UsageMetadata,
};
use async_trait::async_trait;
use reqwest::Client;
use sdk_parity_core::config::{DEFAULT_VERTEX_BASE_URL, LANGCHAIN_API_KEY_ENV};
use sdk_parity_core::prompt::mime_type_for;
use sdk_parity_core::{ClientError, ClientLabel, ModelClient, Prompt, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions for the model
    System,
    /// The user
    Human,
    /// The model
    Ai,
}

/// One block of multi-part message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text
    Text {
        /// The text
        text: String,
    },
    /// An image by URL, including `data:` URLs
    ImageUrl {
        /// The URL
        image_url: String,
    },
}

impl ContentBlock {
    /// A text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// An image block.
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: url.into(),
        }
    }
}

/// Message content: a plain string or a list of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text
    Text(String),
    /// Multi-part content
    Blocks(Vec<ContentBlock>),
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<ContentBlock>> for MessageContent {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        Self::Blocks(blocks)
    }
}

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author
    pub role: ChatRole,
    /// Content
    pub content: MessageContent,
}

impl ChatMessage {
    /// A system message.
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// A human message.
    pub fn human(content: impl Into<MessageContent>) -> Self {
        Self {
            role: ChatRole::Human,
            content: content.into(),
        }
    }

    /// An AI message.
    pub fn ai(content: impl Into<MessageContent>) -> Self {
        Self {
            role: ChatRole::Ai,
            content: content.into(),
        }
    }
}

/// Token usage in the wrapper's vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub input_tokens: u32,
    /// Generated tokens
    pub output_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

impl From<&UsageMetadata> for TokenUsage {
    fn from(usage: &UsageMetadata) -> Self {
        Self {
            input_tokens: usage.prompt_token_count.unwrap_or_default(),
            output_tokens: usage.candidates_token_count.unwrap_or_default(),
            total_tokens: usage.total_token_count.unwrap_or_default(),
        }
    }
}

/// The model's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiMessage {
    /// Always `ai`
    #[serde(rename = "type")]
    pub kind: String,
    /// Concatenated reply text
    pub content: String,
    /// Backend response id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Finish reason, model version and the untouched backend response
    pub response_metadata: serde_json::Value,
    /// Token usage, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<TokenUsage>,
}

impl AiMessage {
    fn from_response(response: GenerateContentResponse) -> Result<Self, ClientError> {
        let content = response.text();
        let usage_metadata = response.usage_metadata.as_ref().map(TokenUsage::from);
        let id = response.response_id.clone();
        let raw = serde_json::to_value(&response).map_err(|e| ClientError::Decode(e.to_string()))?;
        let response_metadata = serde_json::json!({
            "finish_reason": response.finish_reason(),
            "model_version": response.model_version,
            "raw": raw,
        });

        Ok(Self {
            kind: "ai".to_string(),
            content,
            id,
            response_metadata,
            usage_metadata,
        })
    }
}

/// Configuration of [`ChatVertexAi`].
#[derive(Clone)]
pub struct ChatVertexAiConfig {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Reasoning token budget; zero disables thinking
    pub max_reasoning_tokens: Option<u32>,
    /// Output token cap
    pub max_output_tokens: Option<u32>,
    /// API key
    pub api_key: Option<String>,
    /// Base URL of the Vertex AI endpoint
    pub base_url: String,
}

impl Default for ChatVertexAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_reasoning_tokens: Some(0),
            max_output_tokens: None,
            api_key: None,
            base_url: DEFAULT_VERTEX_BASE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for ChatVertexAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatVertexAiConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_reasoning_tokens", &self.max_reasoning_tokens)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Chat model backed by Vertex AI `generateContent`.
#[derive(Debug)]
pub struct ChatVertexAi {
    http: Client,
    config: ChatVertexAiConfig,
}

impl ChatVertexAi {
    /// Create a chat model.
    pub fn new(config: ChatVertexAiConfig) -> Self {
        tracing::debug!(
            client = "langchain-vertex",
            model = %config.model,
            has_api_key = config.api_key.is_some(),
            "Creating LangChain Vertex chat model"
        );
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Translate a message list into a `generateContent` body.
    pub fn build_request(&self, messages: &[ChatMessage]) -> Result<GenerateContentRequest, ClientError> {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            match message.role {
                ChatRole::System => match &message.content {
                    MessageContent::Text(text) => system_parts.push(Part::text(text.as_str())),
                    MessageContent::Blocks(blocks) => {
                        for block in blocks {
                            match block {
                                ContentBlock::Text { text } => {
                                    system_parts.push(Part::text(text.as_str()))
                                }
                                ContentBlock::ImageUrl { .. } => {
                                    return Err(ClientError::InvalidInput(
                                        "system messages cannot contain images".to_string(),
                                    ))
                                }
                            }
                        }
                    }
                },
                ChatRole::Human => contents.push(Content::with_role("user", to_parts(&message.content)?)),
                ChatRole::Ai => contents.push(Content::with_role("model", to_parts(&message.content)?)),
            }
        }

        if contents.is_empty() {
            return Err(ClientError::InvalidInput(
                "at least one human or AI message is required".to_string(),
            ));
        }

        let system_instruction = (!system_parts.is_empty()).then(|| Content {
            role: None,
            parts: system_parts,
        });

        Ok(GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: Some(GenerationConfig {
                temperature: Some(self.config.temperature),
                max_output_tokens: self.config.max_output_tokens,
                thinking_config: self.config.max_reasoning_tokens.map(|budget| ThinkingConfig {
                    include_thoughts: false,
                    thinking_budget: budget,
                }),
            }),
        })
    }

    /// Send the messages once and return the model's reply.
    pub async fn invoke(&self, messages: &[ChatMessage]) -> Result<AiMessage, ClientError> {
        let request = self.build_request(messages)?;
        let api_key = require_key(self.config.api_key.as_deref(), LANGCHAIN_API_KEY_ENV)?;
        let url = join_url(
            &self.config.base_url,
            &format!("v1/publishers/google/models/{}:generateContent", self.config.model),
        );

        tracing::debug!(%url, messages = messages.len(), "Sending request to LangChain Vertex");
        let response: GenerateContentResponse = send_json(
            self.http
                .post(&url)
                .query(&[("key", api_key)])
                .json(&request),
        )
        .await?;

        AiMessage::from_response(response)
    }
}

fn to_parts(content: &MessageContent) -> Result<Vec<Part>, ClientError> {
    match content {
        MessageContent::Text(text) => Ok(vec![Part::text(text.as_str())]),
        MessageContent::Blocks(blocks) => blocks
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => Ok(Part::text(text.as_str())),
                ContentBlock::ImageUrl { image_url } => image_part(image_url),
            })
            .collect(),
    }
}

/// Convert an image URL into a part.
fn image_part(url: &str) -> Result<Part, ClientError> {
    if let Some(rest) = url.strip_prefix("data:") {
        let (meta, data) = rest
            .split_once(',')
            .ok_or_else(|| ClientError::InvalidInput("malformed data URL".to_string()))?;
        let mime_type = meta.strip_suffix(";base64").ok_or_else(|| {
            ClientError::InvalidInput("only base64 data URLs are supported".to_string())
        })?;
        if mime_type.is_empty() || data.is_empty() {
            return Err(ClientError::InvalidInput("empty data URL".to_string()));
        }
        return Ok(Part::inline_data(mime_type, data));
    }

    if url.starts_with("gs://") || url.starts_with("https://") || url.starts_with("http://") {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        return Ok(Part::file_data(mime_type_for(Path::new(path)), url));
    }

    Err(ClientError::InvalidInput(format!(
        "unsupported image URL scheme: {}",
        url.split(':').next().unwrap_or_default()
    )))
}

/// The framework wrapper as a benchmark target.
#[derive(Debug)]
pub struct LangchainVertexTarget {
    chat: ChatVertexAi,
}

impl LangchainVertexTarget {
    /// Bind a chat model.
    pub fn new(chat: ChatVertexAi) -> Self {
        Self { chat }
    }

    /// Messages sent for `prompt`: system instructions, then a human message
    /// with the text and the image as a data URL.
    pub fn build_messages(prompt: &Prompt) -> Result<Vec<ChatMessage>, ClientError> {
        let image = prompt.image().ok_or(ClientError::MissingImage)?;
        Ok(vec![
            ChatMessage::system(prompt.system_instructions()),
            ChatMessage::human(vec![
                ContentBlock::text(prompt.user_input()),
                ContentBlock::image_url(image.to_data_url()),
            ]),
        ])
    }
}

#[async_trait]
impl ModelClient for LangchainVertexTarget {
    fn label(&self) -> ClientLabel {
        ClientLabel::FrameworkWrapped
    }

    async fn invoke(&self, prompt: &Prompt) -> Result<serde_json::Value, ClientError> {
        let messages = Self::build_messages(prompt)?;
        let reply = self.chat.invoke(&messages).await?;
        serde_json::to_value(&reply).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
