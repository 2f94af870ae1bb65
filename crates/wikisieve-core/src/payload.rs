//! Delivery payload contract and its builder.

use serde::Serialize;
use uuid::Uuid;

use crate::event::ChangeEvent;

/// The normalized payload delivered downstream, one per candidate.
///
/// Every field is present and type-correct; a payload is never constructed
/// from an event that fails the contract checks in [`build_payload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidatePayload {
    /// Fresh correlation identifier, generated per candidate. Lets the
    /// downstream side deduplicate and correlate log lines across the
    /// delivery boundary.
    pub request_id: Uuid,
    pub title: String,
    pub url: String,
    pub user: String,
    /// Edit summary; may be empty.
    pub comment: String,
    /// Signed size difference, `new - old`. Negative for deletions.
    pub change_size: i64,
    pub timestamp: i64,
}

/// Map a filtered event into a delivery payload, or `None` when the event
/// violates the payload contract.
///
/// The caller generates `request_id` (one fresh id per candidate, never
/// derived from event content) before calling, so that rejections can be
/// logged under the same identifier.
///
/// Contract: `title`, `url`, and `user` must be non-empty after trimming;
/// `comment` is text, possibly empty; `timestamp` must be positive; both
/// length fields must be explicitly present. Unlike the filter, absent
/// lengths do NOT default to 0 here: a malformed size must not silently
/// propagate as a wrong `change_size`.
pub fn build_payload(event: &ChangeEvent, request_id: Uuid) -> Option<CandidatePayload> {
    let title = non_empty(event.title.as_deref())?;
    let url = non_empty(event.meta.as_ref().and_then(|m| m.uri.as_deref()))?;
    let user = non_empty(event.user.as_deref())?;
    let timestamp = event.timestamp.filter(|ts| *ts > 0)?;

    let length = event.length?;
    let (old, new) = (length.old?, length.new?);

    Some(CandidatePayload {
        request_id,
        title: title.to_string(),
        url: url.to_string(),
        user: user.to_string(),
        comment: event.comment.clone().unwrap_or_default(),
        change_size: new - old,
        timestamp,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventMeta, LengthPair};

    fn valid_event() -> ChangeEvent {
        ChangeEvent {
            title: Some("Rome".to_string()),
            meta: Some(EventMeta {
                uri: Some("https://en.wikipedia.org/wiki/Rome".to_string()),
            }),
            user: Some("Historian42".to_string()),
            comment: Some("expanded the Republic section".to_string()),
            timestamp: Some(1_700_000_000),
            length: Some(LengthPair {
                old: Some(1000),
                new: Some(4500),
            }),
            ..ChangeEvent::default()
        }
    }

    #[test]
    fn builds_payload_from_valid_event() {
        let id = Uuid::new_v4();
        let payload = build_payload(&valid_event(), id).unwrap();

        assert_eq!(payload.request_id, id);
        assert_eq!(payload.title, "Rome");
        assert_eq!(payload.url, "https://en.wikipedia.org/wiki/Rome");
        assert_eq!(payload.user, "Historian42");
        assert_eq!(payload.change_size, 3500);
        assert_eq!(payload.timestamp, 1_700_000_000);
    }

    #[test]
    fn change_size_keeps_deletion_sign() {
        let mut event = valid_event();
        event.length = Some(LengthPair {
            old: Some(5000),
            new: Some(100),
        });
        let payload = build_payload(&event, Uuid::new_v4()).unwrap();
        assert_eq!(payload.change_size, -4900);
    }

    #[test]
    fn missing_required_text_fields_rejected() {
        for mutate in [
            (|e: &mut ChangeEvent| e.title = None) as fn(&mut ChangeEvent),
            |e| e.title = Some("   ".to_string()),
            |e| e.meta = None,
            |e| e.meta = Some(EventMeta { uri: None }),
            |e| e.meta = Some(EventMeta { uri: Some("  ".to_string()) }),
            |e| e.user = None,
            |e| e.user = Some(String::new()),
        ] {
            let mut event = valid_event();
            mutate(&mut event);
            assert!(build_payload(&event, Uuid::new_v4()).is_none());
        }
    }

    #[test]
    fn non_positive_timestamp_rejected() {
        for ts in [None, Some(0), Some(-5)] {
            let mut event = valid_event();
            event.timestamp = ts;
            assert!(build_payload(&event, Uuid::new_v4()).is_none());
        }
    }

    #[test]
    fn absent_length_fields_rejected() {
        // Stricter than the filter: no defaulting to 0 here.
        let mut event = valid_event();
        event.length = None;
        assert!(build_payload(&event, Uuid::new_v4()).is_none());

        event.length = Some(LengthPair {
            old: None,
            new: Some(4500),
        });
        assert!(build_payload(&event, Uuid::new_v4()).is_none());

        event.length = Some(LengthPair {
            old: Some(1000),
            new: None,
        });
        assert!(build_payload(&event, Uuid::new_v4()).is_none());
    }

    #[test]
    fn absent_comment_becomes_empty_text() {
        let mut event = valid_event();
        event.comment = None;
        let payload = build_payload(&event, Uuid::new_v4()).unwrap();
        assert_eq!(payload.comment, "");
    }

    #[test]
    fn title_and_url_are_trimmed() {
        let mut event = valid_event();
        event.title = Some("  Rome  ".to_string());
        let payload = build_payload(&event, Uuid::new_v4()).unwrap();
        assert_eq!(payload.title, "Rome");
    }

    #[test]
    fn fresh_ids_never_collide() {
        // The correlation id is generated per candidate at the call site;
        // two generations must never repeat.
        assert_ne!(Uuid::new_v4(), Uuid::new_v4());
    }

    #[test]
    fn payload_serializes_with_contract_field_names() {
        let payload = build_payload(&valid_event(), Uuid::new_v4()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        for key in [
            "request_id",
            "title",
            "url",
            "user",
            "comment",
            "change_size",
            "timestamp",
        ] {
            assert!(json.get(key).is_some(), "missing field {key}");
        }
        assert_eq!(json["change_size"], 3500);
    }
}
