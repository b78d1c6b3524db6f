//! The "create new" document and JSON text conversion.

use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::XrayfigError;

/// Indentation used when the caller has no preference.
pub const DEFAULT_INDENT: usize = 4;

/// Starter client config: a SOCKS inbound on 127.0.0.1:1080 and an empty
/// reality vless outbound ready to be filled from a link.
pub fn default_document() -> Value {
    json!({
        "log": {
            "loglevel": "warning"
        },
        "inbounds": [
            {
                "tag": "socks-in",
                "port": 1080,
                "listen": "127.0.0.1",
                "protocol": "socks",
                "settings": {
                    "auth": "noauth",
                    "udp": true
                }
            }
        ],
        "outbounds": [
            {
                "tag": "proxy",
                "protocol": "vless",
                "settings": {
                    "vnext": [
                        {
                            "address": "",
                            "port": 443,
                            "users": [
                                {
                                    "id": "",
                                    "encryption": "none",
                                    "flow": ""
                                }
                            ]
                        }
                    ]
                },
                "streamSettings": {
                    "network": "tcp",
                    "security": "reality",
                    "realitySettings": {
                        "publicKey": "",
                        "shortId": "",
                        "serverName": "",
                        "fingerprint": "",
                        "spx": ""
                    }
                }
            }
        ],
        "dns": {
            "servers": ["8.8.8.8", "1.1.1.1"]
        }
    })
}

/// Parse document text. Anything but well-formed JSON is a
/// [`DocumentFormat`](XrayfigError::DocumentFormat) error.
pub fn parse_document(text: &str) -> Result<Value, XrayfigError> {
    serde_json::from_str(text).map_err(XrayfigError::DocumentFormat)
}

/// Pretty-print `doc` with `indent` spaces per level. Key order is preserved.
pub fn to_text(doc: &Value, indent: usize) -> Result<String, XrayfigError> {
    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = Serializer::with_formatter(&mut out, formatter);
    doc.serialize(&mut ser).map_err(XrayfigError::Serialize)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}
