use chrono::{DateTime, Utc};

/// One syndication record, shared by the RSS and Atom renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub updated: DateTime<Utc>,
    pub author: Option<String>,
    pub link: String,
    /// Upstream flair. `None` means no `category` element at all.
    pub category: Option<String>,
    pub summary: Option<String>,
    pub thumbnail: Option<String>,
}

/// A complete feed, built once per request and rendered once.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub title: String,
    /// URL this feed is served from.
    pub self_link: String,
    /// Upstream listing URL the entries came from.
    pub source_link: String,
    /// Latest entry timestamp, or the build time for an empty feed.
    pub updated: DateTime<Utc>,
    pub entries: Vec<FeedEntry>,
}

impl FeedDocument {
    /// `now` is only used when `entries` is empty.
    pub fn new(
        title: impl Into<String>,
        self_link: impl Into<String>,
        source_link: impl Into<String>,
        entries: Vec<FeedEntry>,
        now: DateTime<Utc>,
    ) -> Self {
        let updated = latest_updated(&entries).unwrap_or(now);
        Self {
            title: title.into(),
            self_link: self_link.into(),
            source_link: source_link.into(),
            updated,
            entries,
        }
    }
}

pub fn latest_updated(entries: &[FeedEntry]) -> Option<DateTime<Utc>> {
    entries.iter().map(|e| e.updated).max()
}
