//! Listing-to-feed transformation.
//!
//! - [`embed`] - video ID and offset extraction, watch URL construction
//! - [`normalize`] - upstream post to [`FeedEntry`], with filtering
//! - [`document`] - the per-request feed model
//! - [`xml`] - typed element tree and serialization
//! - [`render`] - RSS 2.0 and Atom 1.0 output
//!
//! # Example
//!
//! ```ignore
//! use crate::feed::{render_atom, subreddit_entry, FeedDocument};
//!
//! let entries = listing.into_posts().filter_map(|p| subreddit_entry(&p)).collect();
//! let doc = FeedDocument::new("/r/rust", self_link, listing_url, entries, Utc::now());
//! let body = render_atom(&doc)?;
//! ```

pub mod embed;
pub mod normalize;
pub mod xml;

mod document;
mod render;

pub use document::{latest_updated, FeedDocument, FeedEntry};
pub use embed::{extract_embed, VideoEmbed};
pub use normalize::{clean_title, subreddit_entry, video_entry};
pub use render::{
    iso8601, render_atom, render_rss, rfc1123, ATOM_CONTENT_TYPE, ATOM_NAMESPACE,
    RSS_CONTENT_TYPE,
};
pub use xml::RenderError;
