//! Parser for `vless://` connection-sharing links.
//!
//! ```text
//! vless://<percent-encoded id>@<host>:<port>[/][?key=value&...][#<name>]
//! ```
//!
//! The result maps field labels (see [`labels`]) to decoded strings. Values
//! stay strings here: the session coerces them with each field's declared
//! kind, so a non-numeric port is only rejected when the edit is committed.

use percent_encoding::percent_decode_str;

use crate::error::XrayfigError;
use crate::schema::labels;

pub const SCHEME: &str = "vless://";

/// Recognized query parameters and the field each one fills.
const QUERY_LABELS: &[(&str, &str)] = &[
    ("type", labels::NETWORK),
    ("security", labels::SECURITY),
    ("pbk", labels::PUBLIC_KEY),
    ("fp", labels::FINGERPRINT),
    ("sni", labels::SERVER_NAME),
    ("sid", labels::SHORT_ID),
    ("spx", labels::SPX),
    ("flow", labels::FLOW),
    ("encryption", labels::ENCRYPTION),
];

/// Label → value pairs decoded from one link, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLink {
    entries: Vec<(&'static str, String)>,
    /// Display name from the `#fragment`, if any.
    pub name: Option<String>,
}

impl ParsedLink {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(l, v)| (*l, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace; a repeated key keeps its first position but the last value.
    fn insert(&mut self, label: &'static str, value: String) {
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }
}

/// Decode a `vless://` link.
///
/// The query section is optional: `vless://id@host:port` yields only the
/// user ID, address and port. Query keys that are absent produce no entry.
pub fn parse(uri: &str) -> Result<ParsedLink, XrayfigError> {
    let rest = uri
        .trim()
        .strip_prefix(SCHEME)
        .ok_or_else(|| XrayfigError::link("wrong scheme"))?;

    let (body, fragment) = match rest.split_once('#') {
        Some((body, fragment)) => (body, Some(fragment)),
        None => (rest, None),
    };

    let (head, query) = match body.split_once('?') {
        Some((head, query)) => (head, Some(query)),
        None => (body, None),
    };

    let mut link = parse_head(head)?;
    if let Some(query) = query {
        parse_query(query, &mut link)?;
    }
    link.name = fragment
        .map(|f| percent_decode_str(f).decode_utf8_lossy().into_owned())
        .filter(|name| !name.is_empty());

    tracing::debug!(
        entries = link.len(),
        with_query = query.is_some(),
        "parsed vless link"
    );
    Ok(link)
}

/// `id@host:port`, with an optional trailing `/` after the port.
fn parse_head(head: &str) -> Result<ParsedLink, XrayfigError> {
    let (cred, server) = head
        .split_once('@')
        .ok_or_else(|| XrayfigError::link("missing '@' between user ID and host"))?;

    let id = decode(cred, "user ID")?;
    if id.is_empty() {
        return Err(XrayfigError::link("missing user ID"));
    }

    let server = server.strip_suffix('/').unwrap_or(server);
    let (host, port) =
        split_host_port(server).ok_or_else(|| XrayfigError::link("missing ':port' after host"))?;
    if host.is_empty() {
        return Err(XrayfigError::link("missing host"));
    }
    if port.is_empty() {
        return Err(XrayfigError::link("missing port"));
    }

    let mut link = ParsedLink::default();
    link.insert(labels::USER_ID, id);
    link.insert(labels::ADDRESS, host.to_string());
    link.insert(labels::PORT, port.to_string());
    Ok(link)
}

/// Split on the first `:`, or after the closing bracket of an IPv6 literal.
fn split_host_port(server: &str) -> Option<(&str, &str)> {
    if let Some(bracketed) = server.strip_prefix('[') {
        let (host, after) = bracketed.split_once(']')?;
        let port = after.strip_prefix(':')?;
        return Some((host, port));
    }
    server.split_once(':')
}

fn parse_query(query: &str, link: &mut ParsedLink) -> Result<(), XrayfigError> {
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        match QUERY_LABELS.iter().find(|(k, _)| *k == key) {
            Some(&(_, label)) => {
                let value = decode(raw, key)?;
                link.insert(label, value);
            }
            None => tracing::debug!(key, "ignoring unrecognized link parameter"),
        }
    }
    Ok(())
}

fn decode(raw: &str, what: &str) -> Result<String, XrayfigError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| XrayfigError::link(format!("{what} is not valid UTF-8 after decoding")))
}
