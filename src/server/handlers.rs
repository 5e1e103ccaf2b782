use axum::{
    extract::{OriginalUri, Path, RawQuery, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use super::error::AppResult;
use super::state::AppState;
use crate::feed::{
    render_atom, render_rss, subreddit_entry, video_entry, FeedDocument, ATOM_CONTENT_TYPE,
    RSS_CONTENT_TYPE,
};
use crate::reddit::{fetch_listing, Category, Listing};

/// Liveness check.
pub async fn index() -> &'static str {
    "Hello, world."
}

pub async fn subreddit_feed(
    State(state): State<AppState>,
    Path(subreddit): Path<String>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    let body =
        build_subreddit_feed(&state, &subreddit, None, query.as_deref(), &uri.to_string()).await?;
    Ok(([(header::CONTENT_TYPE, ATOM_CONTENT_TYPE)], body).into_response())
}

pub async fn subreddit_category_feed(
    State(state): State<AppState>,
    Path((subreddit, category)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    let body = build_subreddit_feed(
        &state,
        &subreddit,
        Some(category.as_str()),
        query.as_deref(),
        &uri.to_string(),
    )
    .await?;
    Ok(([(header::CONTENT_TYPE, ATOM_CONTENT_TYPE)], body).into_response())
}

pub async fn haiku_feed(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    let body = build_haiku_feed(&state, None, query.as_deref(), uri.path()).await?;
    Ok(([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], body).into_response())
}

pub async fn haiku_category_feed(
    State(state): State<AppState>,
    Path(category): Path<String>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    let body =
        build_haiku_feed(&state, Some(category.as_str()), query.as_deref(), uri.path()).await?;
    Ok(([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], body).into_response())
}

/// Parses a raw query string into ordered pairs, forwarded upstream as-is.
pub fn extra_params(query: Option<&str>) -> Vec<(String, String)> {
    query
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

async fn fetch(
    state: &AppState,
    subreddit: &str,
    category: Option<&str>,
    query: Option<&str>,
) -> AppResult<(url::Url, Listing)> {
    let url = state.listing_urls.build(
        subreddit,
        Category::from_segment(category),
        &extra_params(query),
    );
    let listing = fetch_listing(
        &state.client,
        &url,
        state.config.request_timeout(),
        state.config.max_listing_bytes,
    )
    .await?;
    Ok((url, listing))
}

/// Fetches `/r/{subreddit}` and renders it as Atom.
///
/// `request_uri` is the path and query the feed was requested at; joined
/// with the public base URL it becomes the feed `id` and self link.
pub async fn build_subreddit_feed(
    state: &AppState,
    subreddit: &str,
    category: Option<&str>,
    query: Option<&str>,
    request_uri: &str,
) -> AppResult<String> {
    let (url, listing) = fetch(state, subreddit, category, query).await?;

    let total = listing.data.children.len();
    let entries: Vec<_> = listing
        .into_posts()
        .filter_map(|post| subreddit_entry(&post))
        .collect();
    tracing::debug!(
        subreddit = %subreddit,
        posts = total,
        entries = entries.len(),
        "Normalized subreddit listing"
    );

    let self_link = format!("{}{}", state.config.public_base_url(), request_uri);
    let doc = FeedDocument::new(
        format!("/r/{}", subreddit),
        self_link,
        url.as_str(),
        entries,
        Utc::now(),
    );
    Ok(render_atom(&doc)?)
}

/// Fetches the haiku subreddit and renders its videos as RSS.
///
/// `request_path` becomes the channel's self link.
pub async fn build_haiku_feed(
    state: &AppState,
    category: Option<&str>,
    query: Option<&str>,
    request_path: &str,
) -> AppResult<String> {
    let subreddit = state.config.haiku_subreddit.as_str();
    let (url, listing) = fetch(state, subreddit, category, query).await?;

    let total = listing.data.children.len();
    let entries: Vec<_> = listing
        .into_posts()
        .filter_map(|post| video_entry(&post))
        .collect();
    tracing::debug!(
        subreddit = %subreddit,
        posts = total,
        videos = entries.len(),
        "Normalized haiku listing"
    );

    let self_link = format!("{}{}", state.config.public_base_url(), request_path);
    let doc = FeedDocument::new(
        state.config.haiku_title.as_str(),
        self_link,
        url.as_str(),
        entries,
        Utc::now(),
    );
    Ok(render_rss(&doc)?)
}
