// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the Ghost content API key
pub const CONTENT_KEY_VAR: &str = "GHOST_CONTENT_KEY";

pub const DEFAULT_BASE_URL: &str = "https://enadko.com";
pub const DEFAULT_TAG: &str = "soulprymcast";
pub const DEFAULT_OUTPUT_DIR: &str = "public";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything one feed generation run needs to know
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Root of the Ghost site, used for the API and for episode links
    pub base_url: Url,
    /// Content API key
    pub content_key: String,
    /// Tag selecting podcast posts
    pub tag: String,
    /// Directory receiving `podcast.xml`
    pub output_dir: PathBuf,
    /// Upper bound for the content API request
    pub timeout: Duration,
    /// Channel-level metadata
    pub channel: ChannelConfig,
}

impl FeedConfig {
    /// Create a config with default tag, output directory, timeout and channel.
    ///
    /// An absent or empty content key is rejected here so that no work
    /// starts without one.
    pub fn new(base_url: &str, content_key: Option<String>) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source: e,
        })?;

        let content_key = content_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingContentKey {
                var: CONTENT_KEY_VAR,
            })?;

        Ok(Self {
            base_url,
            content_key,
            tag: DEFAULT_TAG.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout: DEFAULT_TIMEOUT,
            channel: ChannelConfig::default(),
        })
    }

    /// Absolute URL for a path on the site, or `path` itself if it already is one
    pub fn site_url(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }

        let root = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{root}{path}")
        } else {
            format!("{root}/{path}")
        }
    }
}

/// Channel metadata written at the top of every feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub title: String,
    /// Site path (or absolute URL) of the podcast landing page
    pub link: String,
    pub description: String,
    pub language: String,
    pub author: String,
    /// Rendered as `©️ {year} {copyright_holder}`
    pub copyright_holder: String,
    pub explicit: bool,
    /// Site path (or absolute URL) of the cover artwork
    pub image: String,
    /// Site path (or absolute URL) the feed is served from
    pub self_link: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            title: "SoulPrym Transmissions".to_string(),
            link: "/soulprym/".to_string(),
            description:
                "Audible glyph-seeds from the ORIGIN | Field. Transmissions of remembrance."
                    .to_string(),
            language: "en-us".to_string(),
            author: "ENADKO | SoulPrym".to_string(),
            copyright_holder: "ENADKO | SoulPrym".to_string(),
            explicit: false,
            image: "/content/images/2025/07/Seal-1.png".to_string(),
            self_link: "/soulprym/podcast/rss/".to_string(),
        }
    }
}

/// Read channel metadata from a JSON file. Missing keys keep their defaults.
pub fn read_channel_config(path: &Path) -> Result<ChannelConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ChannelReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::ChannelParseFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
