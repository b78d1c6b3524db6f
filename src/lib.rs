//! Structured editing of Xray proxy configuration files.
//!
//! An Xray `config.json` is a large, loosely-shaped JSON document. Most of it
//! (routing rules, sniffing, policy, ...) is set once and never touched. A
//! handful of values change all the time: the server address and port, the
//! user ID, the reality public key and short ID. Xrayfig exposes exactly those
//! values as a flat list of labelled, typed fields and writes edits back
//! without disturbing anything else in the file.
//!
//! ```ignore
//! let mut session = ConfigSession::new();
//! session.load(&std::fs::read_to_string("config.json")?)?;
//! session.merge_link("vless://id@edge.example.net:443?security=reality&pbk=...")?;
//! session.apply_edit("SOCKS Port", "10808")?;
//! let text = session.commit()?;
//! ```
//!
//! # Fields
//!
//! The [`schema`] module holds a static table of editable locations. Loading a
//! document walks that table and produces the [`Field`] list, one entry per
//! location the document actually has:
//!
//! | Label | Location |
//! |-------|----------|
//! | `Log Level` | `log.loglevel` |
//! | `SOCKS Port`, `SOCKS Listen`, `SOCKS UDP`, `SOCKS Auth` | first `socks` inbound |
//! | `HTTP Port`, `HTTP Listen` | first `http` inbound, if any |
//! | `DNS 1` .. `DNS 4` | `dns.servers` |
//! | `Protocol`, `Server Address`, `Server Port`, `User ID`, `Flow`, `Encryption`, `Network`, `Security` | first `vless` outbound |
//! | `PublicKey`, `ShortID`, `ServerName`, `Fingerprint`, `SPX` | its `realitySettings`, only when security is `reality` |
//!
//! Each field carries a [`KeyPath`] into the document and a [`FieldKind`].
//! Kinds follow the loaded value's JSON type, except `SOCKS UDP` and `SPX`
//! which are always booleans so that legacy string spellings (`"true"`, `"/"`)
//! are normalized on save.
//!
//! # Editing and saving
//!
//! [`ConfigSession`] owns the document and its fields. Edits and link merges
//! only change pending field values; [`commit()`](ConfigSession::commit)
//! writes every field into a copy of the loaded document and serializes it.
//! A commit is all-or-nothing: one field that can't take its value (a port of
//! `"abc"`) aborts it and names the field, and the session keeps its previous
//! document.
//!
//! # Links
//!
//! [`link::parse`] decodes `vless://id@host:port?type=..&security=..#name`
//! links into the same labels, so pasting a link fills the matching fields.
//! Link values the document has no field for (reality keys on a TLS outbound)
//! are skipped.
//!
//! # Command line
//!
//! With the `clap` feature (on by default) the [`EditorArgs`] adapter and the
//! `xrayfig` binary expose `show|get|set|paste|new|settings`. The binary reads
//! its own settings through [`EditorSettings`]: environment variables, then
//! `./xrayfig.toml`, then the platform config directory.
//!
//! # Error handling
//!
//! All fallible operations return [`XrayfigError`]. Messages are user-facing:
//! coercion errors name the field and the rejected input, path errors name the
//! offending location.

pub mod error;
pub mod link;
pub mod path;
pub mod schema;
pub mod types;

#[cfg(feature = "clap")]
mod cli;
mod coerce;
mod ops;
mod persist;
mod session;
mod settings;
mod template;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use cli::{EditorArgs, EditorSubcommand};
pub use coerce::{coerce, infer_kind};
pub use error::XrayfigError;
pub use link::ParsedLink;
pub use ops::{EditorResult, handle};
pub use persist::{read_document, write_document};
pub use session::ConfigSession;
pub use settings::EditorSettings;
pub use template::{DEFAULT_INDENT, default_document, parse_document, to_text};
pub use types::{EditorAction, Field, FieldKind, Key, KeyPath, RawValue, SessionState};
