use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XrayfigError {
    #[error("Document is not valid JSON: {0}")]
    DocumentFormat(#[source] serde_json::Error),

    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Type conflict at {path}: expected {expected}, found {found}")]
    PathTypeConflict {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Field '{field}' cannot hold '{input}'")]
    Coercion { field: String, input: String },

    #[error("Not a vless link: {reason}")]
    LinkFormat { reason: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("No document loaded; load a file or create one from the template first")]
    NoDocument,

    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to access {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Refusing to overwrite {0}; pass --force to replace it")]
    FileExists(PathBuf),

    #[error("No document path; pass --file or set `document` in xrayfig.toml")]
    NoDocumentPath,

    #[error("Settings error: {0}")]
    Settings(#[from] confique::Error),
}

impl XrayfigError {
    pub(crate) fn link(reason: impl Into<String>) -> Self {
        XrayfigError::LinkFormat {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_names_field_and_input() {
        let err = XrayfigError::Coercion {
            field: "Server Port".into(),
            input: "abc".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Server Port"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn type_conflict_formats() {
        let err = XrayfigError::PathTypeConflict {
            path: "inbounds[0]".into(),
            expected: "sequence",
            found: "mapping",
        };
        let msg = err.to_string();
        assert!(msg.contains("inbounds[0]"));
        assert!(msg.contains("expected sequence"));
        assert!(msg.contains("found mapping"));
    }

    #[test]
    fn link_format_formats() {
        let err = XrayfigError::link("wrong scheme");
        assert_eq!(err.to_string(), "Not a vless link: wrong scheme");
    }

    #[test]
    fn no_document_path_mentions_flag() {
        assert!(XrayfigError::NoDocumentPath.to_string().contains("--file"));
    }
}
