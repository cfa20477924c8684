// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use serde::Serialize;

use crate::cms::fetch_posts;
use crate::config::FeedConfig;
use crate::episode::select_episodes;
use crate::error::PipelineError;
use crate::feed::{build_channel, current_year, render_feed, write_feed};
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Result of a feed generation run
#[derive(Debug, Clone, Serialize)]
pub struct FeedReport {
    /// Posts returned by the content API
    pub posts: usize,
    /// Items written to the feed
    pub episodes: usize,
    /// Posts left out for lack of an mp3 reference
    pub skipped: usize,
    /// Location of the feed file
    pub path: PathBuf,
    /// Size of the feed file in bytes
    pub bytes: u64,
    /// `sha256:<hex>` of the feed file
    pub content_hash: String,
}

/// Regenerate the podcast feed
///
/// This is the single entry point shared by every trigger. It:
/// 1. Fetches the podcast posts from the content API
/// 2. Keeps the posts that reference an mp3, mapped to episodes
/// 3. Builds and renders the RSS document
/// 4. Writes it to the output directory
///
/// Nothing is written unless every earlier step succeeded.
pub async fn generate_feed<C: HttpClient>(
    client: &C,
    config: &FeedConfig,
    reporter: SharedProgressReporter,
) -> Result<FeedReport, PipelineError> {
    let posts = fetch_posts(client, config, &reporter).await?;

    let selection = select_episodes(&posts, config, &reporter)?;

    let channel = build_channel(config, &selection.episodes, current_year());
    let document = render_feed(&channel)?;

    reporter.report(ProgressEvent::FeedBuilt {
        episodes: selection.episodes.len(),
        bytes: document.len(),
    });

    let written = write_feed(&config.output_dir, &document).await?;

    reporter.report(ProgressEvent::FeedWritten {
        path: written.path.clone(),
        content_hash: written.content_hash.clone(),
    });

    Ok(FeedReport {
        posts: posts.len(),
        episodes: selection.episodes.len(),
        skipped: selection.skipped,
        path: written.path,
        bytes: written.bytes,
        content_hash: written.content_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use async_trait::async_trait;
    use bytes::Bytes;
    use tempfile::tempdir;

    use crate::error::{FeedError, FetchError};
    use crate::http::HttpResponse;
    use crate::progress::NoopReporter;

    #[derive(Clone)]
    struct MockHttpClient {
        body: String,
        status: u16,
    }

    impl MockHttpClient {
        fn ok(body: &str) -> Self {
            Self {
                body: body.to_string(),
                status: 200,
            }
        }
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn get(&self, _url: &str) -> Result<HttpResponse, reqwest::Error> {
            Ok(HttpResponse {
                status: self.status,
                body: Bytes::from(self.body.clone()),
            })
        }
    }

    const THREE_POSTS: &str = r#"{"posts": [
        {
            "title": "First Transmission",
            "slug": "first-transmission",
            "published_at": "2025-07-01T10:00:00.000+00:00",
            "meta_description": "https://cdn.example.com/first.mp3 ",
            "custom_excerpt": "The first one",
            "feature_image": "https://example.com/first.png",
            "url": "https://example.com/first-transmission/"
        },
        {
            "title": "Written Notes",
            "slug": "written-notes",
            "published_at": "2025-07-02T10:00:00.000+00:00",
            "meta_description": "A post about https://cdn.example.com/notes.wav",
            "custom_excerpt": null,
            "feature_image": null,
            "url": "https://example.com/written-notes/"
        },
        {
            "title": "Third Transmission",
            "slug": "third-transmission",
            "published_at": "2025-07-03T10:00:00.000+00:00",
            "meta_description": "https://cdn.example.com/third.mp3",
            "custom_excerpt": null,
            "feature_image": null,
            "url": "https://example.com/third-transmission/"
        }
    ]}"#;

    fn make_config(output_dir: &Path) -> FeedConfig {
        let mut config =
            FeedConfig::new("https://example.com", Some("test-key".to_string())).unwrap();
        config.output_dir = output_dir.to_path_buf();
        config
    }

    fn read_channel(path: &Path) -> rss::Channel {
        let bytes = std::fs::read(path).unwrap();
        rss::Channel::read_from(&bytes[..]).unwrap()
    }

    #[tokio::test]
    async fn generate_skips_non_mp3_posts_in_order() {
        let dir = tempdir().unwrap();
        let config = make_config(dir.path());

        let report = generate_feed(&MockHttpClient::ok(THREE_POSTS), &config, NoopReporter::shared())
            .await
            .unwrap();

        assert_eq!(report.posts, 3);
        assert_eq!(report.episodes, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.path, dir.path().join("podcast.xml"));

        let channel = read_channel(&report.path);
        let titles: Vec<_> = channel.items().iter().filter_map(|i| i.title()).collect();
        assert_eq!(titles, vec!["First Transmission", "Third Transmission"]);

        let first = &channel.items()[0];
        assert_eq!(first.link(), Some("https://example.com/blog/first-transmission/"));
        assert_eq!(first.pub_date(), Some("Tue, 01 Jul 2025 10:00:00 +0000"));

        for item in channel.items() {
            let enclosure = item.enclosure().unwrap();
            assert!(!enclosure.url().ends_with(' '));
            assert_eq!(enclosure.mime_type(), "audio/mpeg");
        }
        assert_eq!(
            first.enclosure().unwrap().url(),
            "https://cdn.example.com/first.mp3"
        );
    }

    #[tokio::test]
    async fn generate_stamps_current_year() {
        let dir = tempdir().unwrap();
        let config = make_config(dir.path());

        let report = generate_feed(&MockHttpClient::ok(THREE_POSTS), &config, NoopReporter::shared())
            .await
            .unwrap();

        let channel = read_channel(&report.path);
        let copyright = channel.copyright().unwrap();
        assert!(copyright.contains(&current_year().to_string()));
    }

    #[tokio::test]
    async fn generate_reports_hash_of_written_file() {
        let dir = tempdir().unwrap();
        let config = make_config(dir.path());

        let report = generate_feed(&MockHttpClient::ok(THREE_POSTS), &config, NoopReporter::shared())
            .await
            .unwrap();

        let bytes = std::fs::read(&report.path).unwrap();
        assert_eq!(report.bytes, bytes.len() as u64);
        assert_eq!(report.content_hash, crate::feed::content_hash(&bytes));
    }

    #[tokio::test]
    async fn null_posts_writes_nothing() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("public");
        let config = make_config(&output_dir);

        let result = generate_feed(
            &MockHttpClient::ok(r#"{"posts": null}"#),
            &config,
            NoopReporter::shared(),
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::Feed(FeedError::InvalidResponseShape { .. }))
        ));
        assert!(!output_dir.exists());
    }

    #[tokio::test]
    async fn http_failure_writes_nothing() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("public");
        let config = make_config(&output_dir);

        let client = MockHttpClient {
            body: "upstream unavailable".to_string(),
            status: 503,
        };

        let result = generate_feed(&client, &config, NoopReporter::shared()).await;

        assert!(matches!(
            result,
            Err(PipelineError::Fetch(FetchError::HttpStatus { status: 503, .. }))
        ));
        assert!(!output_dir.exists());
    }

    #[tokio::test]
    async fn invalid_date_writes_nothing() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("public");
        let config = make_config(&output_dir);

        let body = r#"{"posts": [{
            "title": "Broken",
            "slug": "broken",
            "published_at": "sometime",
            "meta_description": "https://cdn.example.com/broken.mp3"
        }]}"#;

        let result = generate_feed(&MockHttpClient::ok(body), &config, NoopReporter::shared()).await;

        assert!(matches!(
            result,
            Err(PipelineError::Feed(FeedError::InvalidDate { .. }))
        ));
        assert!(!output_dir.exists());
    }

    #[tokio::test]
    async fn zero_qualifying_posts_writes_empty_channel() {
        let dir = tempdir().unwrap();
        let config = make_config(dir.path());

        let body = r#"{"posts": [{"title": "Notes", "slug": "notes", "meta_description": null}]}"#;

        let report = generate_feed(&MockHttpClient::ok(body), &config, NoopReporter::shared())
            .await
            .unwrap();

        assert_eq!(report.episodes, 0);
        assert_eq!(report.skipped, 1);

        let channel = read_channel(&report.path);
        assert!(channel.items().is_empty());
        assert_eq!(channel.title(), "SoulPrym Transmissions");
    }

    #[tokio::test]
    async fn text_post_without_slug_is_skipped() {
        let dir = tempdir().unwrap();
        let config = make_config(dir.path());

        let body = r#"{"posts": [
            {"title": "Notes", "meta_description": null},
            {
                "title": "Episode",
                "slug": "episode",
                "published_at": "2025-07-01T10:00:00.000+00:00",
                "meta_description": "https://cdn.example.com/episode.mp3"
            }
        ]}"#;

        let report = generate_feed(&MockHttpClient::ok(body), &config, NoopReporter::shared())
            .await
            .unwrap();

        assert_eq!(report.episodes, 1);
        assert_eq!(report.skipped, 1);

        let channel = read_channel(&report.path);
        assert_eq!(channel.items()[0].title(), Some("Episode"));
    }

    #[tokio::test]
    async fn creates_missing_output_directory() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("nested").join("public");
        let config = make_config(&output_dir);

        let report = generate_feed(&MockHttpClient::ok(THREE_POSTS), &config, NoopReporter::shared())
            .await
            .unwrap();

        assert!(output_dir.is_dir());
        assert!(report.path.exists());
    }

    #[tokio::test]
    async fn rerun_overwrites_feed() {
        let dir = tempdir().unwrap();
        let config = make_config(dir.path());

        generate_feed(&MockHttpClient::ok(THREE_POSTS), &config, NoopReporter::shared())
            .await
            .unwrap();
        let report = generate_feed(
            &MockHttpClient::ok(r#"{"posts": []}"#),
            &config,
            NoopReporter::shared(),
        )
        .await
        .unwrap();

        assert!(read_channel(&report.path).items().is_empty());
    }
}
