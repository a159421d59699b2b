//! Response decoding - the validation boundary for untrusted JSON.

use gifpick_core::{SearchError, SearchResult};
use serde::Deserialize;
use serde_json::Value;

/// Success envelope: `{ "data": [ ... ], "meta": ..., "pagination": ... }`.
#[derive(Deserialize)]
struct Envelope {
    data: Vec<Value>,
}

/// Error envelope. Giphy uses `meta.msg`; gateways in front of it use `message`.
#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    meta: Option<Meta>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct Meta {
    #[serde(default)]
    msg: Option<String>,
}

/// Decode a success body into results, preserving order.
///
/// One bad item rejects the whole response rather than silently shrinking it.
pub fn decode_results(body: &[u8]) -> Result<Vec<SearchResult>, SearchError> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| SearchError::Malformed(format!("invalid envelope: {e}")))?;

    envelope
        .data
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            SearchResult::try_from(item).map_err(|e| match e {
                SearchError::Malformed(msg) => SearchError::Malformed(format!("data[{index}]: {msg}")),
                other => other,
            })
        })
        .collect()
}

/// Best-effort extraction of an error message from a failure body.
pub fn error_message(body: &[u8]) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_slice(body).ok()?;
    envelope
        .meta
        .and_then(|m| m.msg)
        .or(envelope.message)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_preserves_order() {
        let body = br#"{
            "data": [
                {"id": "1", "images": {"fixed_width": {"url": "one.gif"}}},
                {"id": "2", "images": {"fixed_width": {"url": "two.gif"}}},
                {"id": "3", "images": {"fixed_width": {"url": "three.gif"}}}
            ],
            "meta": {"status": 200, "msg": "OK"},
            "pagination": {"count": 3, "offset": 0}
        }"#;

        let results = decode_results(body).unwrap();
        let urls: Vec<_> = results.iter().map(|r| r.thumbnail_url()).collect();
        assert_eq!(urls, vec!["one.gif", "two.gif", "three.gif"]);
    }

    #[test]
    fn test_decode_empty_data() {
        assert!(decode_results(br#"{"data": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_bad_envelope() {
        let bodies: [&[u8]; 4] = [b"not json", br#"{"items": []}"#, br#"{"data": {}}"#, b"[]"];
        for body in bodies {
            assert!(
                matches!(decode_results(body), Err(SearchError::Malformed(_))),
                "accepted {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_decode_rejects_bad_item_with_index() {
        let body = br#"{"data": [
            {"images": {"fixed_width": {"url": "ok.gif"}}},
            {"images": {}}
        ]}"#;

        match decode_results(body) {
            Err(SearchError::Malformed(msg)) => assert!(msg.starts_with("data[1]"), "{msg}"),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_tolerates_odd_metadata() {
        let body = br#"{"data": [
            {"id": 42, "title": null, "images": {"fixed_width": {"url": "a.gif"}}},
            {"id": "b", "title": ["x"], "images": {"fixed_width": {"url": "b.gif"}}}
        ]}"#;

        let results = decode_results(body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id(), None);
        assert_eq!(results[1].id(), Some("b"));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(br#"{"meta": {"status": 401, "msg": "No API key found in request."}}"#),
            Some("No API key found in request.".to_string())
        );
        assert_eq!(
            error_message(br#"{"message": "Invalid authentication credentials"}"#),
            Some("Invalid authentication credentials".to_string())
        );
        assert_eq!(error_message(br#"{"meta": {"msg": ""}}"#), None);
        assert_eq!(error_message(b"<html>Bad Gateway</html>"), None);
    }
}
