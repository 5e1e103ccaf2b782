use thiserror::Error;
use url::Url;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ListingUrlError {
    #[error("Invalid listing base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Listing base URL cannot carry a path: {0}")]
    CannotBeABase(String),
}

/// Listing sort order, taken from the optional category path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    New,
    Top,
    Rising,
    #[default]
    Hot,
}

impl Category {
    /// Resolves a path segment. Anything unrecognized, or no segment at all,
    /// means `Hot`.
    pub fn from_segment(segment: Option<&str>) -> Self {
        match segment {
            Some("new") => Category::New,
            Some("top") => Category::Top,
            Some("rising") => Category::Rising,
            _ => Category::Hot,
        }
    }

    pub fn listing_file(self) -> &'static str {
        match self {
            Category::New => "new.json",
            Category::Top => "top.json",
            Category::Rising => "rising.json",
            Category::Hot => "hot.json",
        }
    }

    /// Value of the `sort` query parameter, only sent for `new` and `top`.
    pub fn sort(self) -> Option<&'static str> {
        match self {
            Category::New => Some("new"),
            Category::Top => Some("top"),
            Category::Rising | Category::Hot => None,
        }
    }
}

/// Builds upstream listing URLs of the form
/// `{base}/r/{subreddit}/{category}.json?limit=N[&sort=..][&extra..]`.
#[derive(Debug, Clone)]
pub struct ListingUrlBuilder {
    base_url: Url,
    limit: u32,
}

impl ListingUrlBuilder {
    pub fn new(base_url: &str, limit: u32) -> Result<Self, ListingUrlError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ListingUrlError::CannotBeABase(base_url.to_string()));
        }
        Ok(Self { base_url, limit })
    }

    pub fn from_config(config: &Config) -> Result<Self, ListingUrlError> {
        Self::new(&config.reddit_base_url, config.posts_request_limit)
    }

    /// Builds the listing URL. Pure string work, no validation of `subreddit`:
    /// the name is pushed as a single path segment and upstream decides
    /// whether it exists.
    ///
    /// `extra` is applied last, in order, so caller-supplied keys replace
    /// `limit` and `sort`.
    pub fn build(&self, subreddit: &str, category: Category, extra: &[(String, String)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);

        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["r", subreddit, category.listing_file()]);
        }

        let mut params: Vec<(String, String)> = Vec::new();
        set_param(&mut params, "limit", &self.limit.to_string());
        if let Some(sort) = category.sort() {
            set_param(&mut params, "sort", sort);
        }
        for (key, value) in extra {
            set_param(&mut params, key, value);
        }

        url.query_pairs_mut().extend_pairs(params.iter());
        url
    }
}

/// Replaces the first pair with `key` and drops any later duplicates, or
/// appends the pair when the key is new.
fn set_param(params: &mut Vec<(String, String)>, key: &str, value: &str) {
    match params.iter().position(|(k, _)| k == key) {
        Some(index) => {
            params[index].1 = value.to_string();
            let mut seen = 0;
            params.retain(|(k, _)| {
                if k != key {
                    return true;
                }
                seen += 1;
                seen == 1
            });
        }
        None => params.push((key.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn builder() -> ListingUrlBuilder {
        ListingUrlBuilder::new("https://www.reddit.com", 50).unwrap()
    }

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_category_paths_and_sort() {
        let cases = [
            (Some("new"), "/r/rust/new.json", Some("new")),
            (Some("top"), "/r/rust/top.json", Some("top")),
            (Some("rising"), "/r/rust/rising.json", None),
            (Some("hot"), "/r/rust/hot.json", None),
            (Some("controversial"), "/r/rust/hot.json", None),
            (None, "/r/rust/hot.json", None),
        ];

        for (segment, path, sort) in cases {
            let url = builder().build("rust", Category::from_segment(segment), &[]);
            assert_eq!(url.path(), path, "segment {:?}", segment);
            let sort_param = url
                .query_pairs()
                .find(|(k, _)| k == "sort")
                .map(|(_, v)| v.into_owned());
            assert_eq!(sort_param.as_deref(), sort, "segment {:?}", segment);
        }
    }

    #[test]
    fn test_limit_always_set() {
        let url = ListingUrlBuilder::new("https://www.reddit.com", 7)
            .unwrap()
            .build("rust", Category::Rising, &[]);
        assert_eq!(url.as_str(), "https://www.reddit.com/r/rust/rising.json?limit=7");
    }

    #[test]
    fn test_extra_params_override_defaults() {
        let extra = vec![
            ("limit".to_string(), "5".to_string()),
            ("sort".to_string(), "hot".to_string()),
            ("t".to_string(), "week".to_string()),
        ];
        let url = builder().build("rust", Category::Top, &extra);
        assert_eq!(url.path(), "/r/rust/top.json");
        assert_eq!(
            pairs(&url),
            vec![
                ("limit".to_string(), "5".to_string()),
                ("sort".to_string(), "hot".to_string()),
                ("t".to_string(), "week".to_string()),
            ]
        );
    }

    #[test]
    fn test_repeated_extra_key_last_wins() {
        let extra = vec![
            ("t".to_string(), "day".to_string()),
            ("t".to_string(), "all".to_string()),
        ];
        let url = builder().build("rust", Category::Hot, &extra);
        assert_eq!(url.query(), Some("limit=50&t=all"));
    }

    #[test]
    fn test_base_url_with_path_and_trailing_slash() {
        let url = ListingUrlBuilder::new("http://127.0.0.1:9000/proxy/", 50)
            .unwrap()
            .build("pics", Category::New, &[]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/proxy/r/pics/new.json?limit=50&sort=new"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            ListingUrlBuilder::new("not a url", 50),
            Err(ListingUrlError::InvalidUrl(_))
        ));
        assert!(matches!(
            ListingUrlBuilder::new("mailto:someone@example.com", 50),
            Err(ListingUrlError::CannotBeABase(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_unknown_category_resolves_to_hot(segment in "[a-z]{1,12}") {
            prop_assume!(!["new", "top", "rising", "hot"].contains(&segment.as_str()));
            let url = builder().build("rust", Category::from_segment(Some(segment.as_str())), &[]);
            prop_assert_eq!(url.path(), "/r/rust/hot.json");
            prop_assert!(url.query_pairs().all(|(k, _)| k != "sort"));
        }

        #[test]
        fn prop_extra_value_always_wins(
            key in prop_oneof![Just("limit".to_string()), Just("sort".to_string()), "[a-z]{1,8}"],
            value in "[a-zA-Z0-9]{1,10}",
            segment in prop_oneof![Just("new"), Just("top"), Just("rising"), Just("hot")],
        ) {
            let extra = vec![(key.clone(), value.clone())];
            let url = builder().build("rust", Category::from_segment(Some(segment)), &extra);
            let found: Vec<String> = url
                .query_pairs()
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v.into_owned())
                .collect();
            prop_assert_eq!(found, vec![value]);
        }
    }
}
