//! Clap adapter for xrayfig.
//!
//! Compiled only with the `clap` Cargo feature (on by default). The only
//! bridge to the core is [`EditorArgs::into_action()`], which converts parsed
//! arguments into an [`EditorAction`](crate::EditorAction) that
//! [`ops::handle`](crate::handle) executes.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::types::EditorAction;

/// Arguments of the `xrayfig` command line.
///
/// Embed into a clap derive with `#[command(flatten)]`.
#[derive(Debug, Args)]
pub struct EditorArgs {
    /// Xray config file to edit. Defaults to `document` from xrayfig.toml.
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub action: Option<EditorSubcommand>,
}

/// Available editor subcommands.
#[derive(Debug, Subcommand)]
pub enum EditorSubcommand {
    /// List every editable field with its kind and value.
    Show,
    /// Show one field.
    Get {
        /// Field label, e.g. "Server Port".
        label: String,
    },
    /// Change fields and save.
    Set {
        /// One or more `LABEL=VALUE` assignments, e.g. "Server Port=8443".
        #[arg(required = true, value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
    },
    /// Fill fields from a vless:// link and save.
    Paste {
        /// The link. Read from stdin when omitted.
        link: Option<String>,
    },
    /// Write a starter config from the built-in template.
    New {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print a commented xrayfig.toml template.
    Settings,
}

impl EditorArgs {
    /// Convert clap-parsed args into a framework-agnostic `EditorAction`.
    ///
    /// Bare `xrayfig` (no subcommand) maps to `EditorAction::Show`.
    pub fn into_action(self) -> EditorAction {
        match self.action {
            None | Some(EditorSubcommand::Show) => EditorAction::Show,
            Some(EditorSubcommand::Get { label }) => EditorAction::Get { label },
            Some(EditorSubcommand::Set { assignments }) => EditorAction::Set { edits: assignments },
            Some(EditorSubcommand::Paste { link }) => EditorAction::Paste { link },
            Some(EditorSubcommand::New { force }) => EditorAction::New { force },
            Some(EditorSubcommand::Settings) => EditorAction::Settings,
        }
    }
}

/// Split `LABEL=VALUE` on the first `=`. Labels never contain `=`; values may.
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (label, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=VALUE, got '{s}'"))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(format!("missing label in '{s}'"));
    }
    Ok((label.to_string(), value.to_string()))
}
