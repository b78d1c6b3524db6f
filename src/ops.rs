//! Editor operations and their displayable results.
//!
//! [`handle`] runs one [`EditorAction`] against a document file: read, load
//! into a [`ConfigSession`], edit, commit, write. Nothing is written unless the
//! commit succeeds.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::XrayfigError;
use crate::persist;
use crate::session::ConfigSession;
use crate::settings::{self, EditorSettings};
use crate::types::{EditorAction, Field, FieldKind};

/// Result of an editor operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorResult {
    /// Every field in display order as `(label, kind, value)`.
    Listing {
        entries: Vec<(String, FieldKind, String)>,
    },
    /// A single field.
    FieldValue {
        label: String,
        kind: FieldKind,
        value: String,
    },
    /// Edits were written to `path`.
    Saved { path: PathBuf, updated: usize },
    /// A link was merged and the document written to `path`.
    Merged { path: PathBuf, updated: usize },
    /// A fresh document was written from the template.
    Created { path: PathBuf },
    /// The settings template.
    Template(String),
}

impl fmt::Display for EditorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorResult::Listing { entries } => {
                let width = entries.iter().map(|(l, _, _)| l.len()).max().unwrap_or(0);
                for (i, (label, kind, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{label:<width$}  ({kind})  {value}")?;
                }
                Ok(())
            }
            EditorResult::FieldValue { label, kind, value } => {
                write!(f, "{label} ({kind}) = {value}")
            }
            EditorResult::Saved { path, updated } => {
                write!(f, "Saved {updated} edit(s) to {}", path.display())
            }
            EditorResult::Merged { path, updated } => {
                write!(f, "Updated {updated} field(s) from link, saved to {}", path.display())
            }
            EditorResult::Created { path } => write!(f, "Created {}", path.display()),
            EditorResult::Template(t) => write!(f, "{t}"),
        }
    }
}

/// Run `action` against the document at `path`.
///
/// `path` may be `None` only for actions that don't touch a document.
pub fn handle(
    action: &EditorAction,
    path: Option<&Path>,
    settings: &EditorSettings,
) -> Result<EditorResult, XrayfigError> {
    let document = || settings.document_path(path);

    match action {
        EditorAction::Settings => Ok(EditorResult::Template(settings::template())),
        EditorAction::Show => {
            let path = document()?;
            let session = open(&path, settings)?;
            Ok(listing(session.fields()))
        }
        EditorAction::Get { label } => {
            let path = document()?;
            let session = open(&path, settings)?;
            let field = session
                .field(label)
                .ok_or_else(|| XrayfigError::UnknownField(label.clone()))?;
            Ok(EditorResult::FieldValue {
                label: field.label.clone(),
                kind: field.kind,
                value: field.display_value(),
            })
        }
        EditorAction::Set { edits } => {
            let path = document()?;
            let mut session = open(&path, settings)?;
            for (label, value) in edits {
                session.apply_edit(label, value.as_str())?;
            }
            save(&mut session, &path)?;
            Ok(EditorResult::Saved {
                path,
                updated: edits.len(),
            })
        }
        EditorAction::Paste { link } => {
            let link = link
                .as_deref()
                .ok_or_else(|| XrayfigError::link("no link supplied"))?;
            let path = document()?;
            let mut session = open(&path, settings)?;
            let updated = session.merge_link(link)?;
            save(&mut session, &path)?;
            Ok(EditorResult::Merged { path, updated })
        }
        EditorAction::New { force } => {
            let path = document()?;
            if path.exists() && !force {
                return Err(XrayfigError::FileExists(path));
            }
            let mut session = ConfigSession::with_indent(settings.indent);
            session.create_from_template()?;
            save(&mut session, &path)?;
            Ok(EditorResult::Created { path })
        }
    }
}

fn open(path: &Path, settings: &EditorSettings) -> Result<ConfigSession, XrayfigError> {
    let text = persist::read_document(path)?;
    let mut session = ConfigSession::with_indent(settings.indent);
    session.load(&text)?;
    Ok(session)
}

fn save(session: &mut ConfigSession, path: &Path) -> Result<(), XrayfigError> {
    let text = session.commit()?;
    persist::write_document(path, &text)
}

fn listing(fields: &[Field]) -> EditorResult {
    EditorResult::Listing {
        entries: fields
            .iter()
            .map(|f| (f.label.clone(), f.kind, f.display_value()))
            .collect(),
    }
}
