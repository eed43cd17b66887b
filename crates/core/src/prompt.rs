// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! The benchmark prompt and its on-disk layout.
//!
//! A [`Prompt`] is loaded once per run and handed to both clients by shared
//! reference. Nothing mutates it after loading.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Default file name of the system instructions document.
pub const SYSTEM_INSTRUCTIONS_FILE: &str = "system-instructions.md";

/// Default file name of the user input document.
pub const USER_INPUT_FILE: &str = "user-input.md";

/// Default file name of the optional snapshot image.
pub const IMAGE_FILE: &str = "snapshot.png";

/// Errors raised while loading the prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    /// A required prompt document could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Raw image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl PromptImage {
    /// Wrap raw bytes with an explicit MIME type.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Standard base64 encoding of the image bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// The image as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// The input shared by both clients for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    system_instructions: String,
    user_input: String,
    image: Option<PromptImage>,
}

impl Prompt {
    /// Create a text-only prompt.
    pub fn new(system_instructions: impl Into<String>, user_input: impl Into<String>) -> Self {
        Self {
            system_instructions: system_instructions.into(),
            user_input: user_input.into(),
            image: None,
        }
    }

    /// Attach an image.
    pub fn with_image(mut self, image: PromptImage) -> Self {
        self.image = Some(image);
        self
    }

    /// System instructions text.
    pub fn system_instructions(&self) -> &str {
        &self.system_instructions
    }

    /// User input text.
    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    /// The image, if one was supplied.
    pub fn image(&self) -> Option<&PromptImage> {
        self.image.as_ref()
    }

    /// Load the prompt from disk.
    ///
    /// Both text documents are required. The image is optional: if it cannot
    /// be read a warning is logged and the prompt carries no image.
    pub fn load(files: &PromptFiles) -> Result<Self, PromptError> {
        let system_instructions = read_text(&files.system_instructions_path())?;
        let user_input = read_text(&files.user_input_path())?;

        let image_path = files.image_path();
        let image = match fs::read(&image_path) {
            Ok(bytes) => {
                debug!(path = %image_path.display(), size_bytes = bytes.len(), "Loaded prompt image");
                Some(PromptImage::new(bytes, mime_type_for(&image_path)))
            }
            Err(err) => {
                warn!(
                    path = %image_path.display(),
                    error = %err,
                    "Image not found, proceeding without image"
                );
                None
            }
        };

        Ok(Self {
            system_instructions,
            user_input,
            image,
        })
    }
}

/// Where the prompt documents live.
#[derive(Debug, Clone)]
pub struct PromptFiles {
    /// Directory containing the prompt documents
    pub dir: PathBuf,
    /// File name of the system instructions
    pub system_instructions: String,
    /// File name of the user input
    pub user_input: String,
    /// File name of the optional image
    pub image: String,
}

impl PromptFiles {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            system_instructions: SYSTEM_INSTRUCTIONS_FILE.to_string(),
            user_input: USER_INPUT_FILE.to_string(),
            image: IMAGE_FILE.to_string(),
        }
    }

    /// Full path of the system instructions document.
    pub fn system_instructions_path(&self) -> PathBuf {
        self.dir.join(&self.system_instructions)
    }

    /// Full path of the user input document.
    pub fn user_input_path(&self) -> PathBuf {
        self.dir.join(&self.user_input)
    }

    /// Full path of the image.
    pub fn image_path(&self) -> PathBuf {
        self.dir.join(&self.image)
    }
}

fn read_text(path: &Path) -> Result<String, PromptError> {
    fs::read_to_string(path).map_err(|source| PromptError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Infer an image MIME type from the file extension. Unknown extensions are
/// treated as PNG.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_prompt_docs(dir: &Path) {
        fs::write(dir.join(SYSTEM_INSTRUCTIONS_FILE), "You are terse.").unwrap();
        fs::write(dir.join(USER_INPUT_FILE), "Describe the screenshot.").unwrap();
    }

    #[test]
    fn test_load_without_image() {
        let dir = tempfile::tempdir().unwrap();
        write_prompt_docs(dir.path());

        let prompt = Prompt::load(&PromptFiles::in_dir(dir.path())).unwrap();
        assert_eq!(prompt.system_instructions(), "You are terse.");
        assert_eq!(prompt.user_input(), "Describe the screenshot.");
        assert!(prompt.image().is_none());
    }

    #[test]
    fn test_load_with_image() {
        let dir = tempfile::tempdir().unwrap();
        write_prompt_docs(dir.path());
        fs::write(dir.path().join(IMAGE_FILE), [0x89, b'P', b'N', b'G']).unwrap();

        let prompt = Prompt::load(&PromptFiles::in_dir(dir.path())).unwrap();
        let image = prompt.image().expect("image should be loaded");
        assert_eq!(image.bytes(), &[0x89, b'P', b'N', b'G']);
        assert_eq!(image.mime_type(), "image/png");
    }

    #[test]
    fn test_missing_text_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SYSTEM_INSTRUCTIONS_FILE), "x").unwrap();

        let err = Prompt::load(&PromptFiles::in_dir(dir.path())).unwrap_err();
        assert!(err.to_string().contains(USER_INPUT_FILE));
    }

    #[test]
    fn test_data_url() {
        let image = PromptImage::new(b"hi".to_vec(), "image/png");
        assert_eq!(image.to_base64(), "aGk=");
        assert_eq!(image.to_data_url(), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("a.webp")), "image/webp");
        assert_eq!(mime_type_for(Path::new("snapshot.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("snapshot")), "image/png");
    }
}
