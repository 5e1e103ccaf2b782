//! Maps upstream posts to feed entries.
//!
//! Two variants: [`subreddit_entry`] for the generic Atom feed and
//! [`video_entry`] for the haiku RSS feed. Both return `None` for posts that
//! should not appear in the feed; nothing here fails the batch.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use super::document::FeedEntry;
use super::embed::extract_embed;
use crate::reddit::RawPost;

static BRACKET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]").expect("Invalid bracket tag pattern"));

const PERMALINK_BASE: &str = "https://www.reddit.com";
const DELETED_AUTHOR: &str = "[deleted]";

/// Why a post has no usable embed source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmbedSourceError {
    #[error("post has no media embed and no url")]
    Missing,
}

/// Removes every `[...]` tag group and trims the result.
pub fn clean_title(title: &str) -> String {
    BRACKET_TAG.replace_all(title, "").trim().to_string()
}

/// `created_utc` in seconds to a UTC timestamp, at millisecond precision.
fn post_timestamp(post: &RawPost) -> Option<DateTime<Utc>> {
    let secs = post.created_utc.filter(|s| s.is_finite())?;
    DateTime::from_timestamp_millis((secs * 1000.0) as i64)
}

/// Posts with a missing or zero score are never published.
fn has_score(post: &RawPost) -> bool {
    matches!(post.score, Some(score) if score != 0)
}

fn permalink_url(post: &RawPost) -> Option<String> {
    post.permalink
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", PERMALINK_BASE, p))
}

/// Generic entry for the subreddit Atom feed.
///
/// Dropped when the cleaned title is empty, the score is zero or missing, or
/// the post has no usable timestamp or link.
pub fn subreddit_entry(post: &RawPost) -> Option<FeedEntry> {
    if !has_score(post) {
        return None;
    }
    let title = clean_title(post.title.as_deref()?);
    if title.is_empty() {
        return None;
    }
    let updated = post_timestamp(post)?;

    let permalink = permalink_url(post);
    let link = post
        .url
        .clone()
        .filter(|u| !u.is_empty())
        .or_else(|| permalink.clone())?;
    let id = permalink.unwrap_or_else(|| link.clone());

    Some(FeedEntry {
        id,
        title,
        updated,
        author: Some(
            post.author
                .clone()
                .unwrap_or_else(|| DELETED_AUTHOR.to_string()),
        ),
        link,
        category: post.link_flair_text.clone(),
        summary: Some(post.selftext.clone().unwrap_or_default()),
        thumbnail: None,
    })
}

/// Text to scan for a video: oEmbed HTML, then oEmbed URL, then the post URL.
/// Empty strings are skipped.
pub fn embed_source(post: &RawPost) -> Result<&str, EmbedSourceError> {
    let oembed = post.media.as_ref().and_then(|m| m.oembed.as_ref());
    oembed
        .and_then(|o| o.html.as_deref())
        .filter(|s| !s.is_empty())
        .or_else(|| oembed.and_then(|o| o.url.as_deref()).filter(|s| !s.is_empty()))
        .or_else(|| post.url.as_deref().filter(|s| !s.is_empty()))
        .ok_or(EmbedSourceError::Missing)
}

/// Video entry for the haiku RSS feed, linking straight to YouTube.
///
/// Dropped when no video ID can be recovered, the score is zero or missing,
/// or the post has no title or timestamp. Posts without any embed source are
/// logged in full.
pub fn video_entry(post: &RawPost) -> Option<FeedEntry> {
    let source = match embed_source(post) {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!(post = ?post, error = %e, "Skipping post without embed source");
            return None;
        }
    };

    let embed = extract_embed(source);
    let Some(link) = embed.watch_url() else {
        tracing::debug!(source = %source, "No video ID in embed source");
        return None;
    };

    if !has_score(post) {
        return None;
    }
    let title = clean_title(post.title.as_deref()?);
    let updated = post_timestamp(post)?;

    Some(FeedEntry {
        id: link.clone(),
        title,
        updated,
        author: post.author.clone(),
        link,
        category: None,
        summary: None,
        thumbnail: post.thumbnail.clone(),
    })
}
