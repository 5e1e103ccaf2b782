//! RSS 2.0 and Atom 1.0 renderers over [`FeedDocument`].
//!
//! Entries are written in document order, one `item`/`entry` each.

use chrono::{DateTime, SecondsFormat, Utc};

use super::document::{FeedDocument, FeedEntry};
use super::xml::{to_document, Element, RenderError};

pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml";
pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml";

/// RFC 1123 form used by RSS, e.g. `Tue, 14 Nov 2023 22:13:20 GMT`.
pub fn rfc1123(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// ISO 8601 form used by Atom, e.g. `2023-11-14T22:13:20.000Z`.
pub fn iso8601(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Renders an RSS 2.0 channel. Each item's `guid` is its link.
pub fn render_rss(doc: &FeedDocument) -> Result<String, RenderError> {
    let channel = Element::new("channel")
        .child(
            Element::new("atom:link")
                .attr("href", doc.self_link.as_str())
                .attr("rel", "self")
                .attr("type", RSS_CONTENT_TYPE),
        )
        .child(Element::with_text("title", doc.title.as_str()))
        .child(Element::with_text("link", doc.source_link.as_str()))
        .children(doc.entries.iter().map(rss_item));

    let rss = Element::new("rss")
        .attr("version", "2.0")
        .attr("xmlns:atom", ATOM_NAMESPACE)
        .child(channel);

    to_document(&rss)
}

fn rss_item(entry: &FeedEntry) -> Element {
    Element::new("item")
        .child(Element::with_text("title", entry.title.as_str()))
        .child(Element::with_text("pubDate", rfc1123(entry.updated)))
        .child(Element::with_text("link", entry.link.as_str()))
        .child(Element::with_text("guid", entry.link.as_str()))
}

/// Renders an Atom 1.0 feed. The feed `id` and self link are both the URL
/// the feed was requested at.
pub fn render_atom(doc: &FeedDocument) -> Result<String, RenderError> {
    let feed = Element::new("feed")
        .attr("xmlns", ATOM_NAMESPACE)
        .child(Element::with_text("id", doc.self_link.as_str()))
        .child(
            Element::new("link")
                .attr("href", doc.self_link.as_str())
                .attr("rel", "self"),
        )
        .child(Element::with_text("title", doc.title.as_str()))
        .child(Element::with_text("updated", iso8601(doc.updated)))
        .children(doc.entries.iter().map(atom_entry));

    to_document(&feed)
}

fn atom_entry(entry: &FeedEntry) -> Element {
    let mut element = Element::new("entry")
        .child(Element::with_text("id", entry.id.as_str()))
        .child(Element::with_text("title", entry.title.as_str()))
        .child(Element::with_text("updated", iso8601(entry.updated)));

    if let Some(author) = &entry.author {
        element = element
            .child(Element::new("author").child(Element::with_text("name", author.as_str())));
    }

    element = element.child(
        Element::new("link")
            .attr("href", entry.link.as_str())
            .attr("rel", "alternate"),
    );

    if let Some(category) = &entry.category {
        element = element.child(Element::new("category").attr("term", category.as_str()));
    }

    if let Some(summary) = &entry.summary {
        element = element.child(Element::with_text("summary", summary.as_str()));
    }

    element
}
