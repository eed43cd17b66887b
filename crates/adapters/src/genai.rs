// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! Direct Generative Language API client.
//!
//! [`GenAiClient`] speaks the native `generateContent` shape. [`GenAiTarget`]
//! binds it to the benchmark: text part first, then the image as inline
//! base64 data when the prompt has one.
//!
//! # Example
//!
//! ```ignore
//! use sdk_parity_adapters::genai::{GenAiClient, GenAiTarget};
//!
//! let client = GenAiClient::new(Some(api_key));
//! let target = GenAiTarget::new(client, "gemini-2.5-flash");
//! let payload = target.invoke(&prompt).await?;
//! ```

use crate::http::{join_url, require_key, send_json};
use crate::wire::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    ThinkingConfig,
};
use async_trait::async_trait;
use reqwest::Client;
use sdk_parity_core::config::{DEFAULT_GENAI_BASE_URL, GENAI_API_KEY_ENV};
use sdk_parity_core::{ClientError, ClientLabel, ModelClient, Prompt};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Minimal client for the Generative Language API.
pub struct GenAiClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

impl std::fmt::Debug for GenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GenAiClient {
    /// Create a client against the public endpoint.
    pub fn new(api_key: Option<String>) -> Self {
        tracing::debug!(
            client = "genai",
            has_api_key = api_key.is_some(),
            "Creating Google GenAI client"
        );
        Self {
            http: Client::new(),
            api_key,
            base_url: DEFAULT_GENAI_BASE_URL.to_string(),
        }
    }

    /// Point the client at another base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Call `models/{model}:generateContent` once.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError> {
        let api_key = require_key(self.api_key.as_deref(), GENAI_API_KEY_ENV)?;
        let url = join_url(
            &self.base_url,
            &format!("v1beta/models/{}:generateContent", model),
        );

        tracing::debug!(%url, "Sending request to Google GenAI");
        send_json(
            self.http
                .post(&url)
                .header(API_KEY_HEADER, api_key)
                .json(request),
        )
        .await
    }
}

/// The direct client as a benchmark target.
#[derive(Debug)]
pub struct GenAiTarget {
    client: GenAiClient,
    model: String,
}

impl GenAiTarget {
    /// Bind a client to a model.
    pub fn new(client: GenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build the request sent for `prompt`. The image is optional here.
    pub fn build_request(prompt: &Prompt) -> GenerateContentRequest {
        let mut parts = vec![Part::text(prompt.user_input())];
        if let Some(image) = prompt.image() {
            parts.push(Part::inline_data(image.mime_type(), image.to_base64()));
        }

        GenerateContentRequest {
            contents: vec![Content::with_role("user", parts)],
            system_instruction: Some(Content::text(prompt.system_instructions())),
            generation_config: Some(GenerationConfig {
                temperature: Some(0.0),
                max_output_tokens: None,
                thinking_config: Some(ThinkingConfig::disabled()),
            }),
        }
    }
}

#[async_trait]
impl ModelClient for GenAiTarget {
    fn label(&self) -> ClientLabel {
        ClientLabel::Direct
    }

    async fn invoke(&self, prompt: &Prompt) -> Result<serde_json::Value, ClientError> {
        let request = Self::build_request(prompt);
        let response = self.client.generate_content(&self.model, &request).await?;
        serde_json::to_value(&response).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
