use std::sync::Arc;

use super::error::StateError;
use crate::config::Config;
use crate::reddit::{build_client, ListingUrlBuilder};

/// Shared, read-only state. Requests never write to it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: reqwest::Client,
    pub listing_urls: Arc<ListingUrlBuilder>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, StateError> {
        let client = build_client()?;
        Self::with_client(config, client)
    }

    pub fn with_client(config: Config, client: reqwest::Client) -> Result<Self, StateError> {
        let listing_urls = ListingUrlBuilder::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            client,
            listing_urls: Arc::new(listing_urls),
        })
    }
}
