//! Durable store for the user's language choice.
//!
//! A single key persisted to a file: read once at startup, written on every
//! explicit language change. Invalid or missing contents fall back to the
//! given default rather than failing startup.

use crate::i18n::Language;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct LanguageStore {
    path: PathBuf,
}

impl LanguageStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the persisted language, falling back to `default` when the file
    /// is missing or holds an unsupported code.
    pub fn load(&self, default: Language) -> Language {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match Language::from_code(contents.trim()) {
                Ok(language) => language,
                Err(e) => {
                    warn!("Ignoring invalid persisted language: {}", e);
                    default
                }
            },
            Err(_) => default,
        }
    }

    /// Persist the language code, creating parent directories as needed.
    pub fn save(&self, language: Language) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        std::fs::write(&self.path, language.code())
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
