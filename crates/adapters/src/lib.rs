// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! Model client adapters.
//!
//! This crate provides the two benchmark targets compared by SDK parity:
//!
//! - **Google GenAI** ([`genai`]): the direct `generateContent` client
//! - **LangChain Vertex** ([`langchain`]): a chat-model wrapper over Vertex AI
//!
//! Both implement [`ModelClient`](sdk_parity_core::ModelClient) and share the
//! `generateContent` schema in [`wire`].
//!
//! # Example
//!
//! ```ignore
//! use sdk_parity_adapters::build_targets;
//!
//! let (direct, framework) = build_targets(&settings, &credentials);
//! let report = run_comparison(&direct, &framework, &prompt, &options).await?;
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

mod http;

pub mod genai;
pub mod langchain;
pub mod wire;

pub use genai::{GenAiClient, GenAiTarget};
pub use langchain::{ChatVertexAi, ChatVertexAiConfig, LangchainVertexTarget};

use sdk_parity_core::{Credentials, Settings};

/// Build both benchmark targets from settings and explicit credentials.
pub fn build_targets(settings: &Settings, credentials: &Credentials) -> (GenAiTarget, LangchainVertexTarget) {
    let direct = GenAiTarget::new(
        GenAiClient::new(credentials.genai_api_key.clone()).with_base_url(&settings.genai_base_url),
        &settings.model,
    );

    let framework = LangchainVertexTarget::new(ChatVertexAi::new(ChatVertexAiConfig {
        model: settings.model.clone(),
        api_key: credentials.langchain_api_key.clone(),
        base_url: settings.vertex_base_url.clone(),
        ..Default::default()
    }));

    (direct, framework)
}
