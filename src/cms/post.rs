// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FeedError, FetchError, PipelineError};

/// Fields requested from the content API, in request order
pub const POST_FIELDS: &[&str] = &[
    "title",
    "slug",
    "published_at",
    "meta_description",
    "custom_excerpt",
    "feature_image",
    "url",
];

/// A post as served by the Ghost content API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    /// ISO-8601 timestamp
    pub published_at: Option<String>,
    /// Holds the episode's audio URL on podcast posts
    pub meta_description: Option<String>,
    pub custom_excerpt: Option<String>,
    pub feature_image: Option<String>,
    /// Canonical URL of the post
    pub url: Option<String>,
}

/// Decode a content API response body into its list of posts
pub fn parse_posts_response(body: &[u8]) -> Result<Vec<Post>, PipelineError> {
    let mut document: Value = serde_json::from_slice(body).map_err(FetchError::InvalidJson)?;

    let items = match document.get_mut("posts").map(Value::take) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Err(invalid_shape("missing 'posts' list")),
        Some(other) => {
            return Err(invalid_shape(format!(
                "'posts' is {}, expected a list",
                json_kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| invalid_shape(format!("post #{}: {}", index + 1, e)))
        })
        .collect()
}

fn invalid_shape(reason: impl Into<String>) -> PipelineError {
    FeedError::InvalidResponseShape {
        reason: reason.into(),
    }
    .into()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid_shape(result: Result<Vec<Post>, PipelineError>) {
        match result {
            Err(PipelineError::Feed(FeedError::InvalidResponseShape { .. })) => {}
            other => panic!("Expected InvalidResponseShape, got {other:?}"),
        }
    }

    #[test]
    fn parses_full_post() {
        let body = br#"{"posts": [{
            "title": "Episode 1",
            "slug": "episode-1",
            "published_at": "2024-01-15T12:00:00.000+00:00",
            "meta_description": " https://cdn.example.com/ep1.mp3 ",
            "custom_excerpt": "First transmission",
            "feature_image": "https://example.com/ep1.png",
            "url": "https://example.com/episode-1/"
        }], "meta": {"pagination": {"total": 1}}}"#;

        let posts = parse_posts_response(body).unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Episode 1");
        assert_eq!(posts[0].slug, "episode-1");
        assert_eq!(
            posts[0].meta_description.as_deref(),
            Some(" https://cdn.example.com/ep1.mp3 ")
        );
        assert_eq!(posts[0].url.as_deref(), Some("https://example.com/episode-1/"));
    }

    #[test]
    fn optional_fields_may_be_null_or_absent() {
        let body = br#"{"posts": [{
            "title": "Bare",
            "slug": "bare",
            "custom_excerpt": null
        }]}"#;

        let posts = parse_posts_response(body).unwrap();

        assert!(posts[0].published_at.is_none());
        assert!(posts[0].meta_description.is_none());
        assert!(posts[0].custom_excerpt.is_none());
        assert!(posts[0].feature_image.is_none());
    }

    #[test]
    fn missing_title_and_slug_default_to_empty() {
        let body = br#"{"posts": [{"meta_description": "Just words"}]}"#;

        let posts = parse_posts_response(body).unwrap();

        assert_eq!(posts[0].title, "");
        assert_eq!(posts[0].slug, "");
    }

    #[test]
    fn empty_post_list_is_valid() {
        let posts = parse_posts_response(br#"{"posts": []}"#).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn null_posts_is_invalid_shape() {
        assert_invalid_shape(parse_posts_response(br#"{"posts": null}"#));
    }

    #[test]
    fn missing_posts_is_invalid_shape() {
        assert_invalid_shape(parse_posts_response(br#"{"errors": [{"message": "Unknown Content API Key"}]}"#));
    }

    #[test]
    fn non_list_posts_is_invalid_shape() {
        assert_invalid_shape(parse_posts_response(br#"{"posts": {"title": "x"}}"#));
    }

    #[test]
    fn top_level_list_is_invalid_shape() {
        assert_invalid_shape(parse_posts_response(br#"[{"title": "x", "slug": "x"}]"#));
    }

    #[test]
    fn undecodable_post_is_invalid_shape() {
        assert_invalid_shape(parse_posts_response(br#"{"posts": [{"title": 7, "slug": "x"}]}"#));
    }

    #[test]
    fn non_json_body_is_fetch_error() {
        let result = parse_posts_response(b"<html>Bad Gateway</html>");
        assert!(matches!(
            result,
            Err(PipelineError::Fetch(FetchError::InvalidJson(_)))
        ));
    }
}
