//! The editing session: one loaded document plus its pending field values.
//!
//! ```text
//! Empty ──load / create_from_template──▶ Loaded ──apply_edit / merge_link──▶ Edited
//!                                          ▲                                  │
//!                                          └────────── load ◀── Saved ◀── commit
//! ```
//!
//! Edits only touch the field list. The document itself changes on
//! [`commit`](ConfigSession::commit), which writes every field into a copy of
//! the baseline and adopts that copy only once it has serialized cleanly.

use serde_json::Value;

use crate::coerce::{coerce, settle};
use crate::error::XrayfigError;
use crate::link;
use crate::path;
use crate::schema;
use crate::template::{self, DEFAULT_INDENT};
use crate::types::{Field, RawValue, SessionState};

#[derive(Debug, Clone)]
pub struct ConfigSession {
    state: SessionState,
    baseline: Option<Value>,
    fields: Vec<Field>,
    indent: usize,
}

impl Default for ConfigSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSession {
    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    /// A session whose commits indent with `indent` spaces.
    pub fn with_indent(indent: usize) -> Self {
        Self {
            state: SessionState::Empty,
            baseline: None,
            fields: Vec::new(),
            indent,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The last loaded or committed document.
    pub fn document(&self) -> Option<&Value> {
        self.baseline.as_ref()
    }

    /// Fields in display order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, label: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.label == label)
    }

    /// Parse `text` and make it the session's document.
    ///
    /// On failure the session keeps whatever it held before.
    pub fn load(&mut self, text: &str) -> Result<(), XrayfigError> {
        let doc = template::parse_document(text)?;
        self.load_value(doc)
    }

    /// Start from the built-in template document.
    pub fn create_from_template(&mut self) -> Result<(), XrayfigError> {
        self.load_value(template::default_document())
    }

    fn load_value(&mut self, doc: Value) -> Result<(), XrayfigError> {
        let fields = schema::build(&doc)?;
        tracing::debug!(fields = fields.len(), "document loaded");
        self.baseline = Some(doc);
        self.fields = fields;
        self.state = SessionState::Loaded;
        Ok(())
    }

    /// Record a new pending value for the field labelled `label`.
    ///
    /// The value is coerced to the field's kind right away when possible.
    /// Text that doesn't fit yet (a port of `"44x3"`) is kept as typed and
    /// rejected by [`commit`](Self::commit), so nothing is lost before the
    /// user gets to see the error.
    pub fn apply_edit(
        &mut self,
        label: &str,
        raw: impl Into<RawValue>,
    ) -> Result<(), XrayfigError> {
        if self.baseline.is_none() {
            return Err(XrayfigError::NoDocument);
        }
        let raw = raw.into();
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.label == label)
            .ok_or_else(|| XrayfigError::UnknownField(label.to_string()))?;

        field.value = match coerce(label, &raw, field.kind) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%err, "keeping uncoerced value until commit");
                Value::String(raw.to_string().trim().to_string())
            }
        };
        self.state = SessionState::Edited;
        Ok(())
    }

    /// Copy the values of a `vless://` link into matching fields.
    ///
    /// Link entries without a counterpart in this document (reality keys on a
    /// TLS outbound, say) are skipped. Returns how many fields were updated.
    /// A malformed link leaves every field untouched.
    pub fn merge_link(&mut self, uri: &str) -> Result<usize, XrayfigError> {
        if self.baseline.is_none() {
            return Err(XrayfigError::NoDocument);
        }
        let parsed = link::parse(uri)?;

        let mut updated = 0;
        for (label, value) in parsed.iter() {
            if self.field(label).is_none() {
                tracing::debug!(label, "link value has no field in this document");
                continue;
            }
            self.apply_edit(label, value)?;
            updated += 1;
        }
        tracing::debug!(updated, "merged link");
        Ok(updated)
    }

    /// Write every field into a copy of the baseline and serialize it.
    ///
    /// All-or-nothing: if any field fails to coerce or its path conflicts with
    /// the document, the error is returned and the session is unchanged.
    /// On success the new document becomes the baseline and the field list is
    /// rebuilt from it, picking up sections the edits revealed.
    pub fn commit(&mut self) -> Result<String, XrayfigError> {
        let baseline = self.baseline.as_ref().ok_or(XrayfigError::NoDocument)?;

        let mut doc = baseline.clone();
        write_fields(&mut doc, &self.fields)?;
        // Materialize defaults of fields the edits just revealed, so that a
        // second commit without edits produces the same text.
        let revealed = schema::build(&doc)?;
        write_fields(&mut doc, &revealed)?;

        let text = template::to_text(&doc, self.indent)?;
        let fields = schema::build(&doc)?;

        tracing::debug!(fields = fields.len(), bytes = text.len(), "committed document");
        self.baseline = Some(doc);
        self.fields = fields;
        self.state = SessionState::Saved;
        Ok(text)
    }
}

fn write_fields(doc: &mut Value, fields: &[Field]) -> Result<(), XrayfigError> {
    for field in fields {
        let value = settle(&field.label, &field.value, field.kind)?;
        path::set_in(doc, &field.path, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{FULL_CONFIG, TLS_CONFIG};
    use crate::schema::labels;
    use serde_json::json;

    const LINK: &str = "vless://abc-123@example.com:443?type=tcp&security=reality&pbk=KEY1&sni=host.name&sid=ab12&flow=xtls-rprx-vision&encryption=none#MyNode";

    fn loaded(text: &str) -> ConfigSession {
        let mut session = ConfigSession::new();
        session.load(text).unwrap();
        session
    }

    fn value<'a>(session: &'a ConfigSession, label: &str) -> &'a Value {
        &session
            .field(label)
            .unwrap_or_else(|| panic!("missing field {label}"))
            .value
    }

    #[test]
    fn new_session_is_empty() {
        let mut session = ConfigSession::new();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.fields().is_empty());
        assert!(matches!(
            session.apply_edit(labels::PORT, "1"),
            Err(XrayfigError::NoDocument)
        ));
        assert!(matches!(session.commit(), Err(XrayfigError::NoDocument)));
        assert!(matches!(
            session.merge_link(LINK),
            Err(XrayfigError::NoDocument)
        ));
    }

    #[test]
    fn load_builds_fields() {
        let session = loaded(FULL_CONFIG);
        assert_eq!(session.state(), SessionState::Loaded);
        assert_eq!(session.fields().len(), 24);
        assert_eq!(value(&session, labels::PORT), &json!(8443));
    }

    #[test]
    fn malformed_load_keeps_previous_document() {
        let mut session = loaded(TLS_CONFIG);
        let before = session.document().cloned();
        let result = session.load("{ not json");
        assert!(matches!(result, Err(XrayfigError::DocumentFormat(_))));
        assert_eq!(session.document().cloned(), before);
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn apply_edit_coerces_without_touching_document() {
        let mut session = loaded(FULL_CONFIG);
        session.apply_edit(labels::PORT, " 9000 ").unwrap();
        assert_eq!(value(&session, labels::PORT), &json!(9000));
        assert_eq!(session.state(), SessionState::Edited);
        let doc = session.document().unwrap();
        assert_eq!(doc["outbounds"][1]["settings"]["vnext"][0]["port"], 8443);
    }

    #[test]
    fn apply_edit_unknown_label() {
        let mut session = loaded(FULL_CONFIG);
        let err = session.apply_edit("Nope", "1").unwrap_err();
        assert!(matches!(err, XrayfigError::UnknownField(l) if l == "Nope"));
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn apply_edit_toggle() {
        let mut session = loaded(TLS_CONFIG);
        session.apply_edit(labels::SOCKS_UDP, false).unwrap();
        assert_eq!(value(&session, labels::SOCKS_UDP), &json!(false));
    }

    #[test]
    fn commit_writes_edits_and_keeps_everything_else() {
        let mut session = loaded(FULL_CONFIG);
        session.apply_edit(labels::ADDRESS, "new.example.com").unwrap();
        session.apply_edit(labels::LOG_LEVEL, "debug").unwrap();
        let text = session.commit().unwrap();

        let doc: Value = serde_json::from_str(&text).unwrap();
        let vnext = &doc["outbounds"][1]["settings"]["vnext"][0];
        assert_eq!(vnext["address"], "new.example.com");
        assert_eq!(doc["log"]["loglevel"], "debug");
        assert_eq!(doc["log"]["access"], "/var/log/xray/access.log");
        assert_eq!(doc["routing"]["domainStrategy"], "IPIfNonMatch");
        assert_eq!(doc["inbounds"][0]["protocol"], "dokodemo-door");
        assert_eq!(doc["dns"]["servers"][4], "localhost");
        assert!(text.contains("\n    \"log\": {"));
        assert_eq!(session.state(), SessionState::Saved);
    }

    #[test]
    fn commit_normalizes_legacy_booleans() {
        let mut session = loaded(FULL_CONFIG);
        let text = session.commit().unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["inbounds"][1]["settings"]["udp"], json!(true));
        assert_eq!(
            doc["outbounds"][1]["streamSettings"]["realitySettings"]["spx"],
            json!(true)
        );
    }

    #[test]
    fn bad_integer_aborts_whole_commit() {
        let mut session = loaded(FULL_CONFIG);
        let before = session.document().cloned();
        session.apply_edit(labels::LOG_LEVEL, "debug").unwrap();
        session.apply_edit(labels::SOCKS_PORT, " abc ").unwrap();
        assert_eq!(value(&session, labels::SOCKS_PORT), &json!("abc"));

        let err = session.commit().unwrap_err();
        match err {
            XrayfigError::Coercion { field, input } => {
                assert_eq!(field, labels::SOCKS_PORT);
                assert_eq!(input, "abc");
            }
            other => panic!("Expected Coercion, got {other:?}"),
        }
        assert_eq!(session.document().cloned(), before);
        assert_eq!(session.state(), SessionState::Edited);
    }

    #[test]
    fn commit_is_idempotent() {
        let mut session = loaded(FULL_CONFIG);
        session.apply_edit(labels::USER_ID, "fresh").unwrap();
        let first = session.commit().unwrap();
        let second = session.commit().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn switching_to_reality_reveals_fields_and_stays_idempotent() {
        let mut session = loaded(TLS_CONFIG);
        assert!(session.field(labels::PUBLIC_KEY).is_none());
        session.apply_edit(labels::SECURITY, "reality").unwrap();
        let first = session.commit().unwrap();
        assert!(session.field(labels::PUBLIC_KEY).is_some());
        let doc: Value = serde_json::from_str(&first).unwrap();
        assert_eq!(
            doc["outbounds"][0]["streamSettings"]["realitySettings"]["spx"],
            json!(false)
        );
        assert_eq!(session.commit().unwrap(), first);
    }

    #[test]
    fn committed_text_round_trips() {
        let mut session = loaded(FULL_CONFIG);
        session.merge_link(LINK).unwrap();
        let text = session.commit().unwrap();
        let committed = session.document().cloned().unwrap();

        let reloaded = loaded(&text);
        assert_eq!(reloaded.document(), Some(&committed));
        assert_eq!(reloaded.fields(), session.fields());
    }

    #[test]
    fn merge_link_updates_matching_fields() {
        let mut session = loaded(FULL_CONFIG);
        let updated = session.merge_link(LINK).unwrap();
        assert_eq!(updated, 10);
        assert_eq!(value(&session, labels::USER_ID), &json!("abc-123"));
        assert_eq!(value(&session, labels::ADDRESS), &json!("example.com"));
        assert_eq!(value(&session, labels::PORT), &json!(443));
        assert_eq!(value(&session, labels::PUBLIC_KEY), &json!("KEY1"));
        // Not in the link: left alone.
        assert_eq!(value(&session, labels::FINGERPRINT), &json!("chrome"));
        assert_eq!(session.state(), SessionState::Edited);
    }

    #[test]
    fn merge_link_skips_labels_missing_from_document() {
        let mut session = loaded(TLS_CONFIG);
        let updated = session.merge_link(LINK).unwrap();
        // User ID, address, port, network, security, flow, encryption.
        assert_eq!(updated, 7);
        assert!(session.field(labels::PUBLIC_KEY).is_none());
        assert_eq!(value(&session, labels::USER_ID), &json!("abc-123"));
        assert_eq!(value(&session, labels::ADDRESS), &json!("example.com"));
        assert_eq!(value(&session, labels::PORT), &json!(443));
    }

    #[test]
    fn merge_bad_link_touches_nothing() {
        let mut session = loaded(FULL_CONFIG);
        let before = session.fields().to_vec();
        let result = session.merge_link("https://example.com");
        assert!(matches!(result, Err(XrayfigError::LinkFormat { .. })));
        assert_eq!(session.fields(), &before[..]);
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn malformed_link_port_caught_at_commit() {
        let mut session = loaded(FULL_CONFIG);
        session.merge_link("vless://id@example.com:44x3").unwrap();
        assert_eq!(value(&session, labels::PORT), &json!("44x3"));
        assert!(matches!(
            session.commit(),
            Err(XrayfigError::Coercion { field, .. }) if field == labels::PORT
        ));
    }

    #[test]
    fn template_session_fill_from_link() {
        let mut session = ConfigSession::new();
        session.create_from_template().unwrap();
        assert_eq!(session.state(), SessionState::Loaded);
        session
            .merge_link("vless://id-1@srv.example:8443?security=reality&pbk=PK&spx=%2F")
            .unwrap();
        let text = session.commit().unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        let out = &doc["outbounds"][0];
        assert_eq!(out["settings"]["vnext"][0]["address"], "srv.example");
        assert_eq!(out["settings"]["vnext"][0]["port"], 8443);
        assert_eq!(out["settings"]["vnext"][0]["users"][0]["id"], "id-1");
        assert_eq!(out["streamSettings"]["realitySettings"]["publicKey"], "PK");
        assert_eq!(out["streamSettings"]["realitySettings"]["spx"], true);
    }

    #[test]
    fn custom_indent() {
        let mut session = ConfigSession::with_indent(2);
        session.load(TLS_CONFIG).unwrap();
        let text = session.commit().unwrap();
        assert!(text.starts_with("{\n  \"log\""));
    }

    #[test]
    fn load_after_save_resets_to_loaded() {
        let mut session = loaded(FULL_CONFIG);
        session.commit().unwrap();
        session.load(TLS_CONFIG).unwrap();
        assert_eq!(session.state(), SessionState::Loaded);
        assert!(session.field(labels::HTTP_PORT).is_none());
    }

    #[test]
    fn unedited_float_port_stays_a_number() {
        let mut session = loaded(
            r#"{"outbounds": [{"protocol": "vless", "settings": {"vnext": [{"address": "a", "port": 443.0, "users": [{"id": "x"}]}]}}]}"#,
        );
        let text = session.commit().unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["outbounds"][0]["settings"]["vnext"][0]["port"], json!(443.0));
        assert!(text.contains("\"port\": 443.0"));
    }

    #[test]
    fn unedited_port_beyond_i64_commits() {
        let mut session =
            loaded(r#"{"inbounds": [{"protocol": "socks", "port": 18446744073709551615}]}"#);
        let text = session.commit().unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["inbounds"][0]["port"], json!(u64::MAX));
        session.apply_edit(labels::SOCKS_PORT, "1080").unwrap();
        session.commit().unwrap();
        assert_eq!(value(&session, labels::SOCKS_PORT), &json!(1080));
    }
}
