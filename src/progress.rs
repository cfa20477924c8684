// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted during a feed generation run
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Posts are being requested; the URL has its API key redacted
    FetchingPosts { url: String },

    /// The content API answered with a well-formed post list
    PostsReceived { count: usize },

    /// A post was left out of the feed
    EpisodeSkipped { title: String, reason: String },

    /// The RSS document has been assembled
    FeedBuilt { episodes: usize, bytes: usize },

    /// The feed file is in place
    FeedWritten { path: PathBuf, content_hash: String },
}

/// Trait for reporting progress events during a run.
///
/// Implementations can use this to display spinners, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

/// Forwards every event to `tracing`. Used by the HTTP trigger and quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingPosts { url } => {
                tracing::info!(%url, "fetching posts from content API");
            }
            ProgressEvent::PostsReceived { count } => {
                tracing::info!(count, "received posts, building feed");
            }
            ProgressEvent::EpisodeSkipped { title, reason } => {
                tracing::warn!(%title, %reason, "skipping post");
            }
            ProgressEvent::FeedBuilt { episodes, bytes } => {
                tracing::info!(episodes, bytes, "feed document built");
            }
            ProgressEvent::FeedWritten { path, content_hash } => {
                tracing::info!(path = %path.display(), %content_hash, "podcast feed written");
            }
        }
    }
}

impl TracingReporter {
    /// Create a new TracingReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
