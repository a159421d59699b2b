//! Request URL construction.

use gifpick_core::{PickerConfig, Query, SearchError};
use url::Url;

/// Everything needed to turn a `Query` into a request URL.
///
/// Built once from the configuration; the API key never changes afterwards.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    api_key: String,
    limit: Option<u32>,
    rating: Option<String>,
}

impl Endpoints {
    pub fn from_config(config: &PickerConfig) -> Self {
        Self {
            base: config.endpoint.clone(),
            api_key: config.api_key().to_string(),
            limit: config.limit,
            rating: config.rating.clone(),
        }
    }

    /// Build the GET URL for a query.
    ///
    /// Parameters are form-url-encoded, so `funny cat` becomes `q=funny+cat`.
    pub fn url_for(&self, query: &Query) -> Result<Url, SearchError> {
        let path = match query {
            Query::Trending => "trending",
            Query::Search(_) => "search",
        };

        let mut url = self
            .base
            .join(path)
            .map_err(|e| SearchError::InvalidUrl(e.to_string()))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            if let Some(keywords) = query.keywords() {
                pairs.append_pair("q", keywords);
            }
            if let Some(limit) = self.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
            if let Some(rating) = &self.rating {
                pairs.append_pair("rating", rating);
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints::from_config(&PickerConfig::new("KEY").unwrap())
    }

    #[test]
    fn test_trending_url() {
        let url = endpoints().url_for(&Query::Trending).unwrap();
        insta::assert_snapshot!(url.as_str(), @"https://api.giphy.com/v1/gifs/trending?api_key=KEY");
    }

    #[test]
    fn test_search_url_encodes_keywords() {
        let endpoints = endpoints();

        let url = endpoints
            .url_for(&Query::Search("funny cat".into()))
            .unwrap();
        insta::assert_snapshot!(url.as_str(), @"https://api.giphy.com/v1/gifs/search?api_key=KEY&q=funny+cat");

        let url = endpoints
            .url_for(&Query::Search("cats & dogs?".into()))
            .unwrap();
        insta::assert_snapshot!(url.as_str(), @"https://api.giphy.com/v1/gifs/search?api_key=KEY&q=cats+%26+dogs%3F");
    }

    #[test]
    fn test_optional_parameters() {
        let mut config = PickerConfig::new("KEY")
            .unwrap()
            .with_endpoint("http://127.0.0.1:9000/proxy")
            .unwrap();
        config.limit = Some(10);
        config.rating = Some("pg".into());

        let url = Endpoints::from_config(&config)
            .url_for(&Query::Search("wave".into()))
            .unwrap();
        insta::assert_snapshot!(url.as_str(), @"http://127.0.0.1:9000/proxy/search?api_key=KEY&q=wave&limit=10&rating=pg");
    }
}
