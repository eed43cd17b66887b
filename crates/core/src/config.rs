// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark configuration.
//!
//! [`Settings`] is layered: built-in defaults, then an optional TOML file,
//! then `SDK_PARITY_*` environment variables. Credentials are kept apart in
//! [`Credentials`] and are handed to client constructors explicitly; nothing
//! in the benchmark reads the process environment mid-run.
//!
//! # Example
//!
//! ```ignore
//! use sdk_parity_core::Settings;
//!
//! let settings = Settings::load(None)?;
//! println!("tolerance: {}ms", settings.tolerance_ms);
//! ```

use crate::comparison::DEFAULT_TOLERANCE_MS;
use crate::prompt::{PromptFiles, IMAGE_FILE, SYSTEM_INSTRUCTIONS_FILE, USER_INPUT_FILE};
use crate::DEFAULT_MODEL;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "sdk-parity.toml";

/// Prefix of environment variables that override settings.
pub const ENV_PREFIX: &str = "SDK_PARITY";

/// Environment variable holding the direct client's API key.
pub const GENAI_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Environment variable holding the framework client's API key.
pub const LANGCHAIN_API_KEY_ENV: &str = "GOOGLE_LANGCHAIN_API_KEY";

/// Default Generative Language API base URL.
pub const DEFAULT_GENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Vertex AI base URL.
pub const DEFAULT_VERTEX_BASE_URL: &str = "https://aiplatform.googleapis.com";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or did not deserialize
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// A value is outside its accepted range
    #[error("invalid setting {key}: {reason}")]
    Invalid {
        /// Setting name
        key: &'static str,
        /// Why the value was rejected
        reason: &'static str,
    },
}

/// Non-secret benchmark settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Model identifier sent to both clients
    pub model: String,
    /// Maximum accepted latency difference in milliseconds
    pub tolerance_ms: u64,
    /// Directory holding the prompt documents
    pub prompt_dir: PathBuf,
    /// File name of the system instructions
    pub system_instructions_file: String,
    /// File name of the user input
    pub user_input_file: String,
    /// File name of the optional image
    pub image_file: String,
    /// Directory the result records are written to
    pub results_dir: PathBuf,
    /// Overall wall-clock budget for one run
    pub timeout_secs: u64,
    /// Delay after both calls settle, before the process exits
    pub flush_delay_ms: u64,
    /// Base URL of the direct client
    pub genai_base_url: String,
    /// Base URL of the framework client
    pub vertex_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            tolerance_ms: DEFAULT_TOLERANCE_MS,
            prompt_dir: PathBuf::from("."),
            system_instructions_file: SYSTEM_INSTRUCTIONS_FILE.to_string(),
            user_input_file: USER_INPUT_FILE.to_string(),
            image_file: IMAGE_FILE.to_string(),
            results_dir: PathBuf::from("results"),
            timeout_secs: 60,
            flush_delay_ms: 4_000,
            genai_base_url: DEFAULT_GENAI_BASE_URL.to_string(),
            vertex_base_url: DEFAULT_VERTEX_BASE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, a settings file and the environment.
    ///
    /// An explicit `path` must exist; without one, [`SETTINGS_FILE`] is used
    /// if present.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Load settings using a caller-supplied environment source.
    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(SETTINGS_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check values that deserialize fine but cannot drive a run.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.timeout_secs == 0 {
            return Err(SettingsError::Invalid {
                key: "timeout_secs",
                reason: "the time budget must be at least one second",
            });
        }
        Ok(())
    }

    /// Prompt file locations described by these settings.
    pub fn prompt_files(&self) -> PromptFiles {
        PromptFiles {
            dir: self.prompt_dir.clone(),
            system_instructions: self.system_instructions_file.clone(),
            user_input: self.user_input_file.clone(),
            image: self.image_file.clone(),
        }
    }
}

/// API keys for the two clients.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Key for the direct client
    pub genai_api_key: Option<String>,
    /// Key for the framework client
    pub langchain_api_key: Option<String>,
}

impl Credentials {
    /// Create credentials from explicit values. Empty strings count as unset.
    pub fn new(genai_api_key: Option<String>, langchain_api_key: Option<String>) -> Self {
        Self {
            genai_api_key: genai_api_key.filter(|k| !k.is_empty()),
            langchain_api_key: langchain_api_key.filter(|k| !k.is_empty()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("genai_api_key", &self.genai_api_key.as_ref().map(|_| "<SET>"))
            .field(
                "langchain_api_key",
                &self.langchain_api_key.as_ref().map(|_| "<SET>"),
            )
            .finish()
    }
}
