// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! The model client seam.
//!
//! The benchmark runner never talks to a concrete SDK. Each client is bound
//! behind [`ModelClient`], which takes the shared [`Prompt`] and returns an
//! opaque JSON payload. The shape of that payload belongs to the client.

use crate::prompt::Prompt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies which side of the comparison an invocation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientLabel {
    /// The direct generative-AI API client.
    Direct,
    /// The orchestration-framework wrapper around the same model.
    FrameworkWrapped,
}

impl ClientLabel {
    /// Both labels, in reporting order.
    pub const ALL: [ClientLabel; 2] = [ClientLabel::Direct, ClientLabel::FrameworkWrapped];

    /// Stable machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::FrameworkWrapped => "framework-wrapped",
        }
    }

    /// File stem of the persisted result record for this client.
    pub fn result_stem(&self) -> &'static str {
        match self {
            Self::Direct => "genai",
            Self::FrameworkWrapped => "langchain",
        }
    }

    /// Human-readable client name for logs and reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Direct => "Google GenAI",
            Self::FrameworkWrapped => "LangChain Vertex",
        }
    }
}

impl std::fmt::Display for ClientLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors a model client can report for a single invocation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client requires an image and the prompt has none
    #[error("image input is required by this client")]
    MissingImage,

    /// The request could not be built from the prompt
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No credential was configured for the client
    #[error("missing credential: {0} is not set")]
    MissingCredential(String),

    /// The request never produced an HTTP response
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("backend returned HTTP {status}: {body}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the backend
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// True when the error was raised before any network call was attempted.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingImage | Self::InvalidInput(_) | Self::MissingCredential(_)
        )
    }
}

/// A model client that can be benchmarked.
///
/// Implementations build their own request from the prompt, perform exactly
/// one call and return the raw response payload. They must not retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Which side of the comparison this client is.
    fn label(&self) -> ClientLabel;

    /// Invoke the model once with the given prompt.
    async fn invoke(&self, prompt: &Prompt) -> Result<serde_json::Value, ClientError>;
}
