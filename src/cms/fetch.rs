// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use url::Url;

use crate::config::FeedConfig;
use crate::error::{FetchError, PipelineError};
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

use super::post::{POST_FIELDS, Post, parse_posts_response};

const POSTS_PATH: &str = "ghost/api/content/posts/";
const REDACTED: &str = "REDACTED";

/// Build the content API query for every public post carrying the podcast tag
pub fn posts_url(config: &FeedConfig) -> Url {
    let mut url = config.base_url.clone();
    let path = format!("{}/{}", url.path().trim_end_matches('/'), POSTS_PATH);
    url.set_path(&path);

    url.query_pairs_mut()
        .clear()
        .append_pair("key", &config.content_key)
        .append_pair("filter", &format!("tag:{},visibility:public", config.tag))
        .append_pair("limit", "all")
        .append_pair("fields", &POST_FIELDS.join(","));

    url
}

/// Render a URL with its `key` query parameter hidden, for logs and errors
pub fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "key" {
                REDACTED.to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Fetch all podcast posts from the content API
pub async fn fetch_posts<C: HttpClient>(
    client: &C,
    config: &FeedConfig,
    reporter: &SharedProgressReporter,
) -> Result<Vec<Post>, PipelineError> {
    let url = posts_url(config);
    let display_url = redact_key(&url);

    reporter.report(ProgressEvent::FetchingPosts {
        url: display_url.clone(),
    });

    let response = client
        .get(url.as_str())
        .await
        .map_err(|e| FetchError::RequestFailed {
            url: display_url.clone(),
            source: e.without_url(),
        })?;

    tracing::debug!(status = response.status, bytes = response.body.len(), "content API responded");

    if response.status >= 400 {
        return Err(FetchError::HttpStatus {
            url: display_url,
            status: response.status,
        }
        .into());
    }

    let posts = parse_posts_response(&response.body)?;

    reporter.report(ProgressEvent::PostsReceived { count: posts.len() });

    Ok(posts)
}
