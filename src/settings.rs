//! Editor settings, layered from environment variables and `xrayfig.toml`.
//!
//! Priority, highest first: `XRAYFIG_*` environment variables, `./xrayfig.toml`,
//! then `xrayfig.toml` in the platform config directory (XDG on Linux,
//! `~/Library/Application Support` on macOS). Missing files are skipped.

use std::path::{Path, PathBuf};

use confique::Config;

use crate::error::XrayfigError;

pub const APP_NAME: &str = "xrayfig";
pub const FILE_NAME: &str = "xrayfig.toml";

#[derive(Config, Debug, Clone, PartialEq)]
pub struct EditorSettings {
    /// Xray config edited when no `--file` is given.
    #[config(env = "XRAYFIG_DOCUMENT")]
    pub document: Option<PathBuf>,

    /// Log verbosity: error, warn, info, debug or trace. `RUST_LOG` wins when set.
    #[config(env = "XRAYFIG_LOG_LEVEL", default = "warn")]
    pub log_level: String,

    /// Spaces per indentation level when writing documents.
    #[config(env = "XRAYFIG_INDENT", default = 4)]
    pub indent: usize,
}

impl EditorSettings {
    /// Load from the environment and the standard settings files.
    pub fn load() -> Result<Self, XrayfigError> {
        Self::load_from(&search_files())
    }

    /// Load from the environment and `files`, highest priority first.
    pub fn load_from(files: &[PathBuf]) -> Result<Self, XrayfigError> {
        let mut builder = Self::builder().env();
        for file in files {
            tracing::trace!(path = %file.display(), "settings source");
            builder = builder.file(file.clone());
        }
        Ok(builder.load()?)
    }

    /// Document path: an explicit one wins over the configured default.
    pub fn document_path(&self, explicit: Option<&Path>) -> Result<PathBuf, XrayfigError> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.document.clone())
            .ok_or(XrayfigError::NoDocumentPath)
    }
}

/// Settings files in priority order (highest first).
pub fn search_files() -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        files.push(cwd.join(FILE_NAME));
    }
    if let Some(proj) = directories::ProjectDirs::from("", "", APP_NAME) {
        files.push(proj.config_dir().join(FILE_NAME));
    }
    files
}

/// Commented TOML template describing every setting.
pub fn template() -> String {
    confique::toml::template::<EditorSettings>(confique::toml::FormatOptions::default())
}
