use chrono::{DateTime, FixedOffset};

/// A fully converted note: formatted body text plus extracted metadata.
#[derive(Debug, Clone, Default)]
pub struct Note {
    pub title: String,
    /// Body with inline markers, list bullets, and header prefixes.
    pub content: String,
    pub last_change: Option<DateTime<FixedOffset>>,
    /// Plain tags in document order, `system:` prefix stripped.
    pub tags: Vec<String>,
    /// Notebook membership, carried by a `system:notebook:NAME` tag
    /// rather than appearing in `tags`.
    pub notebook: Option<String>,
}
