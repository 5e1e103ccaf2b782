use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Top-level body of a subreddit listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Child {
    /// `None` when the child carried no usable post object.
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<RawPost>,
}

/// A post as returned upstream.
///
/// Every field is optional and tolerant of the wrong JSON type: a field that
/// is missing, `null`, or shaped unexpectedly deserializes to `None` instead of
/// failing the whole listing. Whether a post is usable is decided later by
/// the normalizers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub permalink: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub thumbnail: Option<String>,
    /// Seconds since the Unix epoch. Upstream sends this as a float.
    #[serde(default, deserialize_with = "lenient")]
    pub created_utc: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub selftext: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub link_flair_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub media: Option<Media>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    #[serde(default, deserialize_with = "lenient")]
    pub oembed: Option<Oembed>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Oembed {
    #[serde(default, deserialize_with = "lenient")]
    pub html: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

impl Listing {
    /// Posts in listing order, skipping children without a post object.
    pub fn into_posts(self) -> impl Iterator<Item = RawPost> {
        self.data.children.into_iter().filter_map(|c| c.data)
    }
}

/// Deserializes any JSON value, mapping values of the wrong shape to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
