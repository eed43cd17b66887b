// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared request plumbing for the HTTP clients.

use reqwest::RequestBuilder;
use sdk_parity_core::ClientError;
use serde::de::DeserializeOwned;

/// Send a request and decode a JSON body. Non-2xx responses become
/// [`ClientError::Backend`] carrying the raw body.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = request
        .send()
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(ClientError::Backend {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Reject an unset or empty API key before any request is built.
pub(crate) fn require_key<'a>(key: Option<&'a str>, env_var: &str) -> Result<&'a str, ClientError> {
    match key {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(ClientError::MissingCredential(env_var.to_string())),
    }
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
