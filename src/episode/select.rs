// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset};

use crate::cms::Post;
use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::progress::{ProgressEvent, SharedProgressReporter};

use super::date::parse_published_at;

/// Marker that turns a post into a podcast episode
pub const AUDIO_MARKER: &str = ".mp3";

/// MIME type announced for every enclosure
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// A feed item derived from one qualifying post
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub title: String,
    pub link: String,
    /// Same value as `link`, so renaming a slug creates a new episode for subscribers
    pub guid: String,
    pub pub_date: DateTime<FixedOffset>,
    /// Custom excerpt, or empty
    pub summary: String,
    pub image_url: Option<String>,
    pub enclosure: Enclosure,
}

/// The audio file attached to an episode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: String,
}

/// Outcome of filtering a post list
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Episodes in source order
    pub episodes: Vec<Episode>,
    /// Number of posts left out
    pub skipped: usize,
}

/// The audio URL field of a post, if it points at an mp3
pub fn audio_reference(post: &Post) -> Option<&str> {
    post.meta_description
        .as_deref()
        .filter(|field| field.contains(AUDIO_MARKER))
}

/// Public link of a post on the blog
pub fn episode_link(config: &FeedConfig, slug: &str) -> String {
    config.site_url(&format!("/blog/{slug}/"))
}

/// Map a qualifying post to an episode
pub fn map_post(post: &Post, audio_url: &str, config: &FeedConfig) -> Result<Episode, FeedError> {
    let date_str = post.published_at.as_deref().unwrap_or_default();
    let pub_date = parse_published_at(date_str).ok_or_else(|| FeedError::InvalidDate {
        title: post.title.clone(),
        date_str: date_str.to_string(),
    })?;

    let link = episode_link(config, &post.slug);

    Ok(Episode {
        title: post.title.clone(),
        guid: link.clone(),
        link,
        pub_date,
        summary: post.custom_excerpt.clone().unwrap_or_default(),
        image_url: post
            .feature_image
            .clone()
            .filter(|image| !image.trim().is_empty()),
        enclosure: Enclosure {
            url: audio_url.trim().to_string(),
            mime_type: AUDIO_MIME_TYPE.to_string(),
        },
    })
}

/// Keep the posts that reference an mp3 and map them to episodes, in order.
///
/// Every skipped post is reported; skipping is never an error.
pub fn select_episodes(
    posts: &[Post],
    config: &FeedConfig,
    reporter: &SharedProgressReporter,
) -> Result<Selection, FeedError> {
    let mut selection = Selection::default();

    for post in posts {
        let Some(audio_url) = audio_reference(post) else {
            reporter.report(ProgressEvent::EpisodeSkipped {
                title: post.title.clone(),
                reason: "no .mp3 link in meta description".to_string(),
            });
            selection.skipped += 1;
            continue;
        };

        selection.episodes.push(map_post(post, audio_url, config)?);
    }

    Ok(selection)
}
