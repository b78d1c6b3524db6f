use std::fmt;

use serde_json::Value;

/// One step into a document: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Index(usize),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

/// Ordered sequence of keys locating one scalar inside a document.
///
/// Displays in the familiar `outbounds[0].settings.vnext[0].port` form, which
/// is what error messages report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<Key>);

impl KeyPath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, key: impl Into<Key>) {
        self.0.push(key.into());
    }

    /// Builder-style append, handy for extending an anchor path.
    pub fn join(mut self, key: impl Into<Key>) -> Self {
        self.push(key);
        self
    }

    /// The path made of the first `n` keys.
    pub fn prefix(&self, n: usize) -> KeyPath {
        KeyPath(self.0[..n.min(self.0.len())].to_vec())
    }
}

impl From<Vec<Key>> for KeyPath {
    fn from(keys: Vec<Key>) -> Self {
        Self(keys)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, key) in self.0.iter().enumerate() {
            match key {
                Key::Name(name) if i == 0 => write!(f, "{name}")?,
                Key::Name(name) => write!(f, ".{name}")?,
                Key::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// Build a [`KeyPath`] from a mix of string and integer keys.
///
/// ```ignore
/// let path = key_path!["outbounds", 0, "protocol"];
/// ```
#[macro_export]
macro_rules! key_path {
    ($($key:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut path = $crate::types::KeyPath::new();
        $( path.push($key); )*
        path
    }};
}

/// Declared value kind of an editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Boolean => write!(f, "boolean"),
        }
    }
}

/// Raw input coming from a presentation layer: typed text or a toggle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Toggle(bool),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Toggle(b)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{s}"),
            RawValue::Toggle(b) => write!(f, "{b}"),
        }
    }
}

/// One editable location of the loaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: String,
    pub path: KeyPath,
    pub kind: FieldKind,
    /// Pending value. Starts as the loaded scalar (or the schema default) and
    /// is replaced by edits and link merges.
    pub value: Value,
}

impl Field {
    /// Value rendered for display in a text input.
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Lifecycle of a [`ConfigSession`](crate::ConfigSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loaded,
    Edited,
    Saved,
}

/// An editor operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// List every field with its kind and current value.
    Show,
    /// Show a single field.
    Get { label: String },
    /// Apply `(label, value)` edits and save.
    Set { edits: Vec<(String, String)> },
    /// Merge a `vless://` link and save. `None` means the caller did not
    /// supply one.
    Paste { link: Option<String> },
    /// Write the default template document.
    New { force: bool },
    /// Print the commented editor-settings template.
    Settings,
}
