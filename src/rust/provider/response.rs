use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SearchError;
use crate::thumbnails::{Thumbnails, THUMBNAIL_COUNT};

#[derive(Debug, Deserialize)]
struct ImageSearchResponse {
    value: Vec<Value>,
}

/// Extracts the thumbnail URLs from an image search response body.
///
/// Only the first [`THUMBNAIL_COUNT`] entries of `value` are examined; an
/// entry that is not an object with a string `thumbnailUrl` is skipped, not
/// replaced by a later one. Fewer than [`THUMBNAIL_COUNT`] usable URLs is a
/// failure.
pub fn parse_thumbnails(body: &str) -> Result<Thumbnails, SearchError> {
    if body.trim().is_empty() {
        return Err(SearchError::Parse("empty response".to_string()));
    }

    let response: ImageSearchResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Parse(e.to_string()))?;

    let urls: Vec<String> = response
        .value
        .iter()
        .take(THUMBNAIL_COUNT)
        .filter_map(|image| {
            let url = image.get("thumbnailUrl").and_then(Value::as_str);
            if url.is_none() {
                debug!("Skipping malformed image entry: {}", image);
            }
            url.map(str::to_string)
        })
        .collect();

    Thumbnails::try_from(urls).map_err(|found| SearchError::Incomplete {
        found,
        expected: THUMBNAIL_COUNT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_first_three() {
        let body = r#"{
            "_type": "Images",
            "value": [
                {"name": "a", "thumbnailUrl": "https://tse1.mm.bing.net/th?id=1"},
                {"name": "b", "thumbnailUrl": "https://tse1.mm.bing.net/th?id=2"},
                {"name": "c", "thumbnailUrl": "https://tse1.mm.bing.net/th?id=3"},
                {"name": "d", "thumbnailUrl": "https://tse1.mm.bing.net/th?id=4"}
            ]
        }"#;
        let thumbnails = parse_thumbnails(body).unwrap();
        assert_eq!(
            thumbnails.urls(),
            &[
                "https://tse1.mm.bing.net/th?id=1".to_string(),
                "https://tse1.mm.bing.net/th?id=2".to_string(),
                "https://tse1.mm.bing.net/th?id=3".to_string(),
            ]
        );
    }

    #[test]
    fn test_malformed_entry_is_skipped_not_backfilled() {
        let body = r#"{"value": [
            {"thumbnailUrl": "u1"},
            "not an object",
            {"thumbnailUrl": "u3"},
            {"thumbnailUrl": "u4"}
        ]}"#;
        assert_eq!(
            parse_thumbnails(body),
            Err(SearchError::Incomplete { found: 2, expected: 3 })
        );

        let body = r#"{"value": [{"thumbnailUrl": "u1"}, {"name": "x"}, {"thumbnailUrl": 7}]}"#;
        assert_eq!(
            parse_thumbnails(body),
            Err(SearchError::Incomplete { found: 1, expected: 3 })
        );
    }

    #[test]
    fn test_two_results_is_incomplete() {
        let body = r#"{"value": [{"thumbnailUrl": "u1"}, {"thumbnailUrl": "u2"}]}"#;
        let err = parse_thumbnails(body).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_bad_bodies() {
        assert!(matches!(parse_thumbnails(""), Err(SearchError::Parse(_))));
        assert!(matches!(parse_thumbnails("<html>"), Err(SearchError::Parse(_))));
        assert!(matches!(
            parse_thumbnails(r#"{"_type": "ErrorResponse"}"#),
            Err(SearchError::Parse(_))
        ));
    }
}
