//! Search result and query types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SearchError;

/// A single GIF returned by the search API.
///
/// The raw JSON object is kept verbatim so the host receives exactly what the
/// API sent. The picker only interprets the fixed-width thumbnail rendition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct SearchResult {
    raw: Value,
    thumbnail_url: String,
    id: Option<String>,
    title: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// The slice of an item's shape the picker depends on.
#[derive(Deserialize)]
struct ItemShape {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    images: ImagesShape,
}

#[derive(Deserialize)]
struct ImagesShape {
    fixed_width: RenditionShape,
}

#[derive(Deserialize)]
struct RenditionShape {
    url: String,
    #[serde(default)]
    width: Option<Value>,
    #[serde(default)]
    height: Option<Value>,
}

/// Metadata is informational; anything but a string is dropped.
fn string_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// Giphy encodes dimensions as decimal strings; accept plain numbers too.
fn parse_dimension(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

impl SearchResult {
    /// URL of the fixed-width thumbnail (`images.fixed_width.url`).
    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    /// Provider id, if the item carries one.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Provider title, if non-empty.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Thumbnail size in pixels, when both dimensions are present.
    pub fn thumbnail_size(&self) -> Option<(u32, u32)> {
        Some((self.width?, self.height?))
    }

    /// The item exactly as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Consume into the raw JSON object.
    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl TryFrom<Value> for SearchResult {
    type Error = SearchError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let shape = ItemShape::deserialize(&raw)
            .map_err(|e| SearchError::Malformed(format!("invalid item: {e}")))?;
        let rendition = shape.images.fixed_width;

        if rendition.url.trim().is_empty() {
            return Err(SearchError::Malformed(
                "item has an empty fixed_width url".to_string(),
            ));
        }

        Ok(Self {
            width: parse_dimension(rendition.width.as_ref()),
            height: parse_dimension(rendition.height.as_ref()),
            thumbnail_url: rendition.url,
            id: string_field(shape.id),
            title: string_field(shape.title),
            raw,
        })
    }
}

impl From<SearchResult> for Value {
    fn from(result: SearchResult) -> Self {
        result.raw
    }
}

// =============================================================================
// Query
// =============================================================================

/// A query against the search API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    /// Default keyword-less result set.
    Trending,
    /// Keyword search. Always trimmed and non-empty.
    Search(String),
}

impl Query {
    /// Build a keyword query from raw input. Returns `None` for blank input.
    pub fn from_input(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::Search(trimmed.to_string()))
        }
    }

    /// Keywords for a search query.
    pub fn keywords(&self) -> Option<&str> {
        match self {
            Query::Trending => None,
            Query::Search(text) => Some(text),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Trending => f.write_str("<trending>"),
            Query::Search(text) => write!(f, "{text:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_result_from_minimal_item() {
        let item = json!({"images": {"fixed_width": {"url": "a.gif"}}});
        let result = SearchResult::try_from(item.clone()).unwrap();

        assert_eq!(result.thumbnail_url(), "a.gif");
        assert_eq!(result.id(), None);
        assert_eq!(result.thumbnail_size(), None);
        assert_eq!(result.raw(), &item);
    }

    #[test]
    fn test_search_result_metadata() {
        let item = json!({
            "id": "xT9IgG50Fb7Mi0prBC",
            "title": "cat typing",
            "images": {
                "fixed_width": {"url": "https://media.giphy.com/a.gif", "width": "200", "height": "113"},
                "original": {"url": "https://media.giphy.com/full.gif"}
            }
        });
        let result = SearchResult::try_from(item).unwrap();

        assert_eq!(result.id(), Some("xT9IgG50Fb7Mi0prBC"));
        assert_eq!(result.title(), Some("cat typing"));
        assert_eq!(result.thumbnail_size(), Some((200, 113)));
    }

    #[test]
    fn test_empty_title_is_none() {
        let item = json!({"title": "", "images": {"fixed_width": {"url": "a.gif"}}});
        let result = SearchResult::try_from(item).unwrap();
        assert_eq!(result.title(), None);
    }

    #[test]
    fn test_non_string_metadata_is_ignored() {
        let item = json!({"id": 42, "title": 7, "images": {"fixed_width": {"url": "a.gif"}}});
        let result = SearchResult::try_from(item.clone()).unwrap();

        assert_eq!(result.thumbnail_url(), "a.gif");
        assert_eq!(result.id(), None);
        assert_eq!(result.title(), None);
        assert_eq!(result.raw(), &item);
    }

    #[test]
    fn test_numeric_dimensions() {
        let item = json!({"images": {"fixed_width": {"url": "a.gif", "width": 200, "height": 150}}});
        let result = SearchResult::try_from(item).unwrap();
        assert_eq!(result.thumbnail_size(), Some((200, 150)));
    }

    #[test]
    fn test_missing_thumbnail_is_malformed() {
        let missing_images = json!({"id": "1"});
        assert!(matches!(
            SearchResult::try_from(missing_images),
            Err(SearchError::Malformed(_))
        ));

        let missing_url = json!({"images": {"fixed_width": {"width": "200"}}});
        assert!(matches!(
            SearchResult::try_from(missing_url),
            Err(SearchError::Malformed(_))
        ));

        let blank_url = json!({"images": {"fixed_width": {"url": "  "}}});
        assert!(matches!(
            SearchResult::try_from(blank_url),
            Err(SearchError::Malformed(_))
        ));
    }

    #[test]
    fn test_serialize_is_passthrough() {
        let item = json!({
            "id": "abc",
            "images": {"fixed_width": {"url": "a.gif"}},
            "user": {"display_name": "someone"}
        });
        let result: SearchResult = serde_json::from_value(item.clone()).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), item);
    }

    #[test]
    fn test_query_from_input() {
        assert_eq!(Query::from_input(""), None);
        assert_eq!(Query::from_input("   "), None);
        assert_eq!(
            Query::from_input("  funny cat "),
            Some(Query::Search("funny cat".to_string()))
        );
    }

    #[test]
    fn test_query_keywords() {
        assert_eq!(Query::Trending.keywords(), None);
        assert_eq!(Query::Search("cat".into()).keywords(), Some("cat"));
    }
}
