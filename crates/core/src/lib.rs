// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core domain types for the SDK parity benchmark.
//!
//! This crate defines the vocabulary shared by the benchmark runner, the
//! model client adapters and the command-line harness:
//!
//! - [`prompt`] - The immutable [`Prompt`] fed to both clients, and its loader
//! - [`client`] - The [`ModelClient`] seam and the [`ClientError`] taxonomy
//! - [`comparison`] - Per-call [`ClientInvocation`] and the derived [`ComparisonOutcome`]
//! - [`config`] - Layered [`Settings`] and explicit [`Credentials`]

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod client;
pub mod comparison;
pub mod config;
pub mod prompt;

pub use crate::client::{ClientError, ClientLabel, ModelClient};
pub use crate::comparison::{ClientInvocation, ComparisonOutcome, DEFAULT_TOLERANCE_MS};
pub use crate::config::{Credentials, Settings, SettingsError};
pub use crate::prompt::{Prompt, PromptError, PromptFiles, PromptImage};

/// Default model identifier used by both clients.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
