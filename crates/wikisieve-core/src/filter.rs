//! Candidate predicate: which stream events count as significant human edits.

use crate::event::{ChangeEvent, EventKind};

/// Namespace id of the main (article) content area.
pub const MAIN_NAMESPACE: i64 = 0;

/// Title prefixes that mark non-article pages.
///
/// Namespace metadata is not always present on feed records, so this
/// title-based exclusion is layered on top of the numeric namespace check.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &[
    "Talk:",
    "User:",
    "User talk:",
    "Wikipedia:",
    "Wikipedia talk:",
    "Template:",
    "Template talk:",
    "Category:",
    "Category talk:",
    "File:",
    "File talk:",
    "Help:",
    "Portal:",
    "Draft:",
    "MediaWiki:",
    "Module:",
    "Special:",
];

/// Pure predicate deciding whether a decoded event qualifies as a
/// significant, human-authored article edit.
///
/// An event qualifies iff all of the following hold:
/// 1. not flagged as a bot (absent flag counts as human)
/// 2. kind is `edit` or `new`
/// 3. not flagged as minor (absent flag counts as not-minor)
/// 4. source wiki equals the configured target exactly
/// 5. namespace, when present, is the main namespace; absent passes
/// 6. title does not start with an excluded non-article prefix
/// 7. `|length.new - length.old| >= significance_threshold`, absent
///    lengths counting as 0 (inclusive boundary)
#[derive(Debug, Clone)]
pub struct EditFilter {
    target_wiki: String,
    main_namespace: i64,
    significance_threshold: i64,
    excluded_prefixes: Vec<String>,
}

impl EditFilter {
    /// Create a filter for the given wiki and significance threshold, with
    /// the default prefix exclusions and main namespace.
    pub fn new(target_wiki: impl Into<String>, significance_threshold: i64) -> Self {
        Self {
            target_wiki: target_wiki.into(),
            main_namespace: MAIN_NAMESPACE,
            significance_threshold,
            excluded_prefixes: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }

    /// Replace the excluded title prefixes.
    pub fn with_excluded_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.excluded_prefixes = prefixes;
        self
    }

    /// The configured significance threshold, in characters.
    pub fn significance_threshold(&self) -> i64 {
        self.significance_threshold
    }

    /// Whether the event qualifies as a candidate. Pure and deterministic.
    pub fn is_candidate(&self, event: &ChangeEvent) -> bool {
        if event.bot.unwrap_or(false) {
            return false;
        }

        if !matches!(event.kind, Some(EventKind::Edit | EventKind::New)) {
            return false;
        }

        if event.minor.unwrap_or(false) {
            return false;
        }

        if event.wiki.as_deref() != Some(self.target_wiki.as_str()) {
            return false;
        }

        // Namespace absent is deliberately lenient: some feed records omit
        // the field, and the title prefix check below still applies.
        if let Some(namespace) = event.namespace
            && namespace != self.main_namespace
        {
            return false;
        }

        if let Some(title) = event.title.as_deref()
            && self
                .excluded_prefixes
                .iter()
                .any(|prefix| title.starts_with(prefix.as_str()))
        {
            return false;
        }

        // Both large insertions and large deletions are interesting, hence
        // the absolute difference.
        self.length_delta(event) >= self.significance_threshold
    }

    /// Absolute size difference of the change, with absent lengths as 0.
    fn length_delta(&self, event: &ChangeEvent) -> i64 {
        let (old, new) = event
            .length
            .map(|l| (l.old.unwrap_or(0), l.new.unwrap_or(0)))
            .unwrap_or((0, 0));
        (new - old).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventMeta, LengthPair};

    /// A fully qualifying event, to be broken one field at a time.
    fn candidate_event() -> ChangeEvent {
        ChangeEvent {
            title: Some("Rome".to_string()),
            meta: Some(EventMeta {
                uri: Some("https://en.wikipedia.org/wiki/Rome".to_string()),
            }),
            user: Some("Historian42".to_string()),
            comment: Some("expanded the Republic section".to_string()),
            timestamp: Some(1_700_000_000),
            bot: Some(false),
            minor: Some(false),
            kind: Some(EventKind::Edit),
            wiki: Some("enwiki".to_string()),
            namespace: Some(0),
            length: Some(LengthPair {
                old: Some(1000),
                new: Some(4500),
            }),
        }
    }

    fn filter() -> EditFilter {
        EditFilter::new("enwiki", 1000)
    }

    #[test]
    fn qualifying_event_passes() {
        assert!(filter().is_candidate(&candidate_event()));
    }

    #[test]
    fn bot_edits_rejected_regardless_of_other_fields() {
        let mut event = candidate_event();
        event.bot = Some(true);
        assert!(!filter().is_candidate(&event));
    }

    #[test]
    fn absent_bot_flag_counts_as_human() {
        let mut event = candidate_event();
        event.bot = None;
        assert!(filter().is_candidate(&event));
    }

    #[test]
    fn log_and_categorize_kinds_rejected() {
        for kind in [EventKind::Log, EventKind::Categorize, EventKind::Other] {
            let mut event = candidate_event();
            event.kind = Some(kind);
            assert!(!filter().is_candidate(&event));
        }

        let mut event = candidate_event();
        event.kind = None;
        assert!(!filter().is_candidate(&event));
    }

    #[test]
    fn new_pages_pass() {
        let mut event = candidate_event();
        event.kind = Some(EventKind::New);
        assert!(filter().is_candidate(&event));
    }

    #[test]
    fn minor_edits_rejected() {
        let mut event = candidate_event();
        event.minor = Some(true);
        assert!(!filter().is_candidate(&event));
    }

    #[test]
    fn other_wikis_rejected() {
        let mut event = candidate_event();
        event.wiki = Some("dewiki".to_string());
        assert!(!filter().is_candidate(&event));

        event.wiki = None;
        assert!(!filter().is_candidate(&event));
    }

    #[test]
    fn nonzero_namespace_rejected_but_absent_passes() {
        let mut event = candidate_event();
        event.namespace = Some(4);
        assert!(!filter().is_candidate(&event));

        // Absent namespace metadata is deliberately lenient.
        event.namespace = None;
        assert!(filter().is_candidate(&event));
    }

    #[test]
    fn excluded_prefix_rejected_even_at_namespace_zero() {
        let mut event = candidate_event();
        event.title = Some("Talk:Rome".to_string());
        event.namespace = Some(0);
        assert!(!filter().is_candidate(&event));
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let mut event = candidate_event();

        event.length = Some(LengthPair {
            old: Some(0),
            new: Some(999),
        });
        assert!(!filter().is_candidate(&event));

        event.length = Some(LengthPair {
            old: Some(0),
            new: Some(1000),
        });
        assert!(filter().is_candidate(&event));
    }

    #[test]
    fn large_deletion_passes() {
        let mut event = candidate_event();
        event.length = Some(LengthPair {
            old: Some(5000),
            new: Some(100),
        });
        assert!(filter().is_candidate(&event));
    }

    #[test]
    fn missing_lengths_count_as_zero_change() {
        let mut event = candidate_event();
        event.length = None;
        assert!(!filter().is_candidate(&event));

        event.length = Some(LengthPair {
            old: None,
            new: Some(500),
        });
        assert!(!filter().is_candidate(&event));
    }

    #[test]
    fn zero_threshold_accepts_zero_change() {
        let mut event = candidate_event();
        event.length = None;
        assert!(EditFilter::new("enwiki", 0).is_candidate(&event));
    }

    #[test]
    fn custom_prefix_list_replaces_defaults() {
        let filter =
            EditFilter::new("enwiki", 1000).with_excluded_prefixes(vec!["Draft:".to_string()]);

        let mut event = candidate_event();
        event.title = Some("Talk:Rome".to_string());
        assert!(filter.is_candidate(&event));

        event.title = Some("Draft:Rome".to_string());
        assert!(!filter.is_candidate(&event));
    }
}
