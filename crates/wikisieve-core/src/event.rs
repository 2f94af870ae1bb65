//! Decoded recent-change event model.
//!
//! One [`ChangeEvent`] is the structured form of a single edit notification
//! from the recent-changes stream. The feed is loosely shaped: any field may
//! be missing, so every field is optional and downstream stages decide per
//! field how absence is treated. A record whose present fields carry the
//! wrong JSON type fails to decode as a whole; there is no partial decoding.

use serde::Deserialize;

use crate::Result;

/// Kind of change reported by the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// An edit to an existing page.
    Edit,
    /// Creation of a new page.
    New,
    /// A log action (deletions, blocks, uploads, ...).
    Log,
    /// A category membership change.
    Categorize,
    /// Anything the stream may add in the future.
    #[serde(other)]
    Other,
}

/// Stream metadata envelope. Only the canonical page URL is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventMeta {
    /// Canonical URL of the affected page.
    #[serde(default)]
    pub uri: Option<String>,
}

/// Page size before and after the change, in characters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LengthPair {
    #[serde(default)]
    pub old: Option<i64>,
    #[serde(default)]
    pub new: Option<i64>,
}

/// A single decoded edit notification.
///
/// Unknown fields in the raw record are ignored; the feed carries many more
/// than the pipeline consumes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeEvent {
    /// Page title, including any namespace prefix (e.g. `Talk:Rome`).
    #[serde(default)]
    pub title: Option<String>,

    /// Metadata envelope carrying the canonical page URL.
    #[serde(default)]
    pub meta: Option<EventMeta>,

    /// Author of the change (account name or IP).
    #[serde(default)]
    pub user: Option<String>,

    /// Edit summary. Frequently empty, sometimes absent entirely.
    #[serde(default)]
    pub comment: Option<String>,

    /// Seconds since epoch at which the change happened.
    #[serde(default)]
    pub timestamp: Option<i64>,

    /// Whether the author is a registered bot account.
    #[serde(default)]
    pub bot: Option<bool>,

    /// Whether the author flagged the edit as minor.
    #[serde(default)]
    pub minor: Option<bool>,

    /// Kind of change. Only `edit` and `new` are of interest.
    #[serde(rename = "type", default)]
    pub kind: Option<EventKind>,

    /// Identifier of the source site (e.g. `enwiki`).
    #[serde(default)]
    pub wiki: Option<String>,

    /// Numeric namespace of the page. Absent from some feed records.
    #[serde(default)]
    pub namespace: Option<i64>,

    /// Page size before/after the change.
    #[serde(default)]
    pub length: Option<LengthPair>,
}

impl ChangeEvent {
    /// Decode a raw stream record into an event.
    ///
    /// The caller is expected to have skipped empty (heartbeat) records; a
    /// non-empty record that is not a valid JSON object is an error.
    pub fn parse(record: &str) -> Result<Self> {
        Ok(serde_json::from_str(record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_event() {
        let record = r#"{
            "title": "Rome",
            "meta": {"uri": "https://en.wikipedia.org/wiki/Rome", "id": "abc"},
            "user": "Historian42",
            "comment": "expanded the Republic section",
            "timestamp": 1700000000,
            "bot": false,
            "minor": false,
            "type": "edit",
            "wiki": "enwiki",
            "namespace": 0,
            "length": {"old": 1000, "new": 4500}
        }"#;

        let event = ChangeEvent::parse(record).unwrap();
        assert_eq!(event.title.as_deref(), Some("Rome"));
        assert_eq!(
            event.meta.unwrap().uri.as_deref(),
            Some("https://en.wikipedia.org/wiki/Rome")
        );
        assert_eq!(event.kind, Some(EventKind::Edit));
        assert_eq!(event.namespace, Some(0));
        let length = event.length.unwrap();
        assert_eq!(length.old, Some(1000));
        assert_eq!(length.new, Some(4500));
    }

    #[test]
    fn parse_sparse_event() {
        // The feed omits fields freely; decoding must still succeed.
        let event = ChangeEvent::parse(r#"{"title": "Rome", "type": "log"}"#).unwrap();
        assert_eq!(event.kind, Some(EventKind::Log));
        assert!(event.bot.is_none());
        assert!(event.length.is_none());
        assert!(event.namespace.is_none());
    }

    #[test]
    fn parse_unknown_kind_maps_to_other() {
        let event = ChangeEvent::parse(r#"{"type": "external"}"#).unwrap();
        assert_eq!(event.kind, Some(EventKind::Other));
    }

    #[test]
    fn parse_ignores_unknown_fields() {
        let event =
            ChangeEvent::parse(r#"{"title": "Rome", "server_name": "en.wikipedia.org"}"#).unwrap();
        assert_eq!(event.title.as_deref(), Some("Rome"));
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(ChangeEvent::parse("not json").is_err());
        assert!(ChangeEvent::parse("{\"title\": ").is_err());
    }

    #[test]
    fn parse_rejects_wrong_field_type_as_whole() {
        // No partial decoding: one mistyped field rejects the record.
        assert!(ChangeEvent::parse(r#"{"title": "Rome", "bot": "yes"}"#).is_err());
        assert!(ChangeEvent::parse(r#"{"length": {"old": "big"}}"#).is_err());
    }
}
