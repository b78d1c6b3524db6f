//! The field registry: which locations of an Xray config are editable.
//!
//! The schema is a static table. Each entry names a label, the anchor it hangs
//! off (the document root, the first inbound/outbound with a given protocol,
//! or each DNS server), a path relative to that anchor, how its kind is
//! chosen, a default for missing data, and a predicate deciding whether the
//! entry applies to the anchor at all.
//!
//! [`build`] walks the table against a loaded document and produces the
//! ordered field list. Anchors that don't exist (no SOCKS inbound, no vless
//! outbound) simply contribute no fields.

use serde_json::Value;

use crate::coerce::infer_kind;
use crate::error::XrayfigError;
use crate::path::{self, kind_name};
use crate::types::{Field, FieldKind, Key, KeyPath};

/// Field labels. These strings are the contract with presentation layers and
/// with the link parser.
pub mod labels {
    pub const LOG_LEVEL: &str = "Log Level";

    pub const SOCKS_PORT: &str = "SOCKS Port";
    pub const SOCKS_LISTEN: &str = "SOCKS Listen";
    pub const SOCKS_UDP: &str = "SOCKS UDP";
    pub const SOCKS_AUTH: &str = "SOCKS Auth";

    pub const HTTP_PORT: &str = "HTTP Port";
    pub const HTTP_LISTEN: &str = "HTTP Listen";

    /// Prefix of the numbered DNS labels (`DNS 1` .. `DNS 4`).
    pub const DNS: &str = "DNS";

    pub const PROTOCOL: &str = "Protocol";
    pub const ADDRESS: &str = "Server Address";
    pub const PORT: &str = "Server Port";
    pub const USER_ID: &str = "User ID";
    pub const FLOW: &str = "Flow";
    pub const ENCRYPTION: &str = "Encryption";
    pub const NETWORK: &str = "Network";
    pub const SECURITY: &str = "Security";

    pub const PUBLIC_KEY: &str = "PublicKey";
    pub const SHORT_ID: &str = "ShortID";
    pub const SERVER_NAME: &str = "ServerName";
    pub const FINGERPRINT: &str = "Fingerprint";
    pub const SPX: &str = "SPX";
}

/// Protocol of the inbound whose port/listen/udp/auth are exposed.
pub const PRIMARY_INBOUND: &str = "socks";
/// Protocol of the optional second inbound.
pub const SECONDARY_INBOUND: &str = "http";
/// Protocol of the outbound carrying the tunnel settings.
pub const TUNNEL_OUTBOUND: &str = "vless";
/// Security mode that unlocks the reality sub-fields.
pub const STEALTH_SECURITY: &str = "reality";
/// At most this many DNS servers are exposed.
pub const DNS_CAP: usize = 4;

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Root,
    Inbound(&'static str),
    Outbound(&'static str),
    /// Each of the first `cap` entries of `dns.servers`; labels get a 1-based suffix.
    DnsServers { cap: usize },
}

#[derive(Debug, Clone, Copy)]
enum Seg {
    K(&'static str),
    I(usize),
}

#[derive(Debug, Clone, Copy)]
enum KindRule {
    /// Follow the loaded value's runtime type (or the default's).
    Infer,
    /// Always this kind, whatever the document stores. Used for booleans that
    /// older configs spell as strings.
    Force(FieldKind),
}

#[derive(Debug, Clone, Copy)]
enum Fallback {
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl Fallback {
    fn to_value(self) -> Value {
        match self {
            Fallback::Str(s) => Value::String(s.to_string()),
            Fallback::Int(i) => Value::from(i),
            Fallback::Bool(b) => Value::Bool(b),
        }
    }
}

struct FieldDef {
    label: &'static str,
    anchor: Anchor,
    path: &'static [Seg],
    kind: KindRule,
    default: Fallback,
    /// Receives the anchor value.
    present: fn(&Value) -> bool,
}

fn always(_: &Value) -> bool {
    true
}

fn stealth(outbound: &Value) -> bool {
    outbound
        .pointer("/streamSettings/security")
        .and_then(Value::as_str)
        == Some(STEALTH_SECURITY)
}

use Fallback::{Bool, Int, Str};
use Seg::{I, K};

const SOCKS: Anchor = Anchor::Inbound(PRIMARY_INBOUND);
const HTTP: Anchor = Anchor::Inbound(SECONDARY_INBOUND);
const VLESS: Anchor = Anchor::Outbound(TUNNEL_OUTBOUND);

#[rustfmt::skip]
static SCHEMA: &[FieldDef] = &[
    FieldDef { label: labels::LOG_LEVEL, anchor: Anchor::Root, path: &[K("log"), K("loglevel")], kind: KindRule::Infer, default: Str("warning"), present: always },

    FieldDef { label: labels::SOCKS_PORT, anchor: SOCKS, path: &[K("port")], kind: KindRule::Infer, default: Int(1080), present: always },
    FieldDef { label: labels::SOCKS_LISTEN, anchor: SOCKS, path: &[K("listen")], kind: KindRule::Infer, default: Str("127.0.0.1"), present: always },
    FieldDef { label: labels::SOCKS_UDP, anchor: SOCKS, path: &[K("settings"), K("udp")], kind: KindRule::Force(FieldKind::Boolean), default: Bool(false), present: always },
    FieldDef { label: labels::SOCKS_AUTH, anchor: SOCKS, path: &[K("settings"), K("auth")], kind: KindRule::Infer, default: Str("noauth"), present: always },

    FieldDef { label: labels::HTTP_PORT, anchor: HTTP, path: &[K("port")], kind: KindRule::Infer, default: Int(8080), present: always },
    FieldDef { label: labels::HTTP_LISTEN, anchor: HTTP, path: &[K("listen")], kind: KindRule::Infer, default: Str("127.0.0.1"), present: always },

    FieldDef { label: labels::DNS, anchor: Anchor::DnsServers { cap: DNS_CAP }, path: &[], kind: KindRule::Infer, default: Str(""), present: always },

    FieldDef { label: labels::PROTOCOL, anchor: VLESS, path: &[K("protocol")], kind: KindRule::Infer, default: Str(TUNNEL_OUTBOUND), present: always },
    FieldDef { label: labels::ADDRESS, anchor: VLESS, path: &[K("settings"), K("vnext"), I(0), K("address")], kind: KindRule::Infer, default: Str(""), present: always },
    FieldDef { label: labels::PORT, anchor: VLESS, path: &[K("settings"), K("vnext"), I(0), K("port")], kind: KindRule::Infer, default: Int(443), present: always },
    FieldDef { label: labels::USER_ID, anchor: VLESS, path: &[K("settings"), K("vnext"), I(0), K("users"), I(0), K("id")], kind: KindRule::Infer, default: Str(""), present: always },
    FieldDef { label: labels::FLOW, anchor: VLESS, path: &[K("settings"), K("vnext"), I(0), K("users"), I(0), K("flow")], kind: KindRule::Infer, default: Str(""), present: always },
    FieldDef { label: labels::ENCRYPTION, anchor: VLESS, path: &[K("settings"), K("vnext"), I(0), K("users"), I(0), K("encryption")], kind: KindRule::Infer, default: Str("none"), present: always },
    FieldDef { label: labels::NETWORK, anchor: VLESS, path: &[K("streamSettings"), K("network")], kind: KindRule::Infer, default: Str("tcp"), present: always },
    FieldDef { label: labels::SECURITY, anchor: VLESS, path: &[K("streamSettings"), K("security")], kind: KindRule::Infer, default: Str("none"), present: always },

    FieldDef { label: labels::PUBLIC_KEY, anchor: VLESS, path: &[K("streamSettings"), K("realitySettings"), K("publicKey")], kind: KindRule::Infer, default: Str(""), present: stealth },
    FieldDef { label: labels::SHORT_ID, anchor: VLESS, path: &[K("streamSettings"), K("realitySettings"), K("shortId")], kind: KindRule::Infer, default: Str(""), present: stealth },
    FieldDef { label: labels::SERVER_NAME, anchor: VLESS, path: &[K("streamSettings"), K("realitySettings"), K("serverName")], kind: KindRule::Infer, default: Str(""), present: stealth },
    FieldDef { label: labels::FINGERPRINT, anchor: VLESS, path: &[K("streamSettings"), K("realitySettings"), K("fingerprint")], kind: KindRule::Infer, default: Str(""), present: stealth },
    FieldDef { label: labels::SPX, anchor: VLESS, path: &[K("streamSettings"), K("realitySettings"), K("spx")], kind: KindRule::Force(FieldKind::Boolean), default: Bool(false), present: stealth },
];

/// A concrete instance of an anchor in one document.
struct Site<'a> {
    label: String,
    base: KeyPath,
    value: &'a Value,
}

fn sites<'a>(doc: &'a Value, anchor: Anchor, label: &str) -> Vec<Site<'a>> {
    match anchor {
        Anchor::Root => vec![Site {
            label: label.to_string(),
            base: KeyPath::new(),
            value: doc,
        }],
        Anchor::Inbound(protocol) => first_with_protocol(doc, "inbounds", protocol, label),
        Anchor::Outbound(protocol) => first_with_protocol(doc, "outbounds", protocol, label),
        Anchor::DnsServers { cap } => {
            let Some(servers) = doc.pointer("/dns/servers").and_then(Value::as_array) else {
                return Vec::new();
            };
            servers
                .iter()
                .take(cap)
                .enumerate()
                .filter_map(|(i, server)| {
                    let mut base = KeyPath::new().join("dns").join("servers").join(i);
                    // Object form: {"address": "1.1.1.1", "port": 53, ...}
                    // Objects without an address are left alone.
                    if server.is_object() {
                        server.get("address")?;
                        base.push("address");
                    }
                    Some(Site {
                        label: format!("{label} {}", i + 1),
                        base,
                        value: server,
                    })
                })
                .collect()
        }
    }
}

fn first_with_protocol<'a>(
    doc: &'a Value,
    list: &str,
    protocol: &str,
    label: &str,
) -> Vec<Site<'a>> {
    let Some(entries) = doc.get(list).and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .position(|entry| entry.get("protocol").and_then(Value::as_str) == Some(protocol))
        .map(|idx| Site {
            label: label.to_string(),
            base: KeyPath::new().join(list).join(idx),
            value: &entries[idx],
        })
        .into_iter()
        .collect()
}

/// Build the ordered field list for `doc`.
///
/// Fails with [`XrayfigError::PathTypeConflict`] when a field's location is
/// occupied by something that isn't a scalar, or when its path runs through a
/// container of the wrong kind.
pub fn build(doc: &Value) -> Result<Vec<Field>, XrayfigError> {
    let mut fields = Vec::new();
    for def in SCHEMA {
        for site in sites(doc, def.anchor, def.label) {
            if !(def.present)(site.value) {
                continue;
            }
            let mut path = site.base;
            for seg in def.path {
                path.push(match *seg {
                    Seg::K(name) => Key::from(name),
                    Seg::I(idx) => Key::from(idx),
                });
            }
            fields.push(make_field(doc, site.label, path, def)?);
        }
    }
    debug_assert!(labels_unique(&fields), "schema produced duplicate labels");
    tracing::debug!(count = fields.len(), "built field list");
    Ok(fields)
}

fn make_field(
    doc: &Value,
    label: String,
    path: KeyPath,
    def: &FieldDef,
) -> Result<Field, XrayfigError> {
    let value = match path::lookup(doc, &path)? {
        None => def.default.to_value(),
        Some(v) if v.is_null() => def.default.to_value(),
        Some(v) if v.is_array() || v.is_object() => {
            return Err(XrayfigError::PathTypeConflict {
                path: path.to_string(),
                expected: "scalar",
                found: kind_name(v),
            });
        }
        Some(v) => v.clone(),
    };
    let kind = match def.kind {
        KindRule::Force(kind) => kind,
        KindRule::Infer => infer_kind(&value),
    };
    Ok(Field {
        label,
        path,
        kind,
        value,
    })
}

fn labels_unique(fields: &[Field]) -> bool {
    let mut seen = std::collections::HashSet::new();
    fields.iter().all(|f| seen.insert(f.label.as_str()))
}
