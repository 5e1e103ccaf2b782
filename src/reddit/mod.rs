//! Upstream side: listing URLs, the listing data model, and the fetch.
//!
//! - [`listing`] - builds `/r/{subreddit}/{category}.json` request URLs
//! - [`types`] - tolerant serde model of the listing JSON
//! - [`client`] - single-shot HTTP fetch with timeout and size cap

mod client;
mod listing;
mod types;

pub use client::{build_client, fetch_listing, FetchError};
pub use listing::{Category, ListingUrlBuilder, ListingUrlError};
pub use types::{Child, Listing, ListingData, Media, Oembed, RawPost};
