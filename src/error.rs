// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling the run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing content API key: set {var} or pass --content-key")]
    MissingContentKey { var: &'static str },

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to read channel file {path}: {source}")]
    ChannelReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse channel JSON in {path}: {source}")]
    ChannelParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while talking to the content API
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Response body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

/// Errors that can occur while turning posts into a feed document
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Unexpected response structure: {reason}")]
    InvalidResponseShape { reason: String },

    #[error("Post '{title}' has an unusable publish date '{date_str}'")]
    InvalidDate { title: String, date_str: String },

    #[error("Failed to render RSS document: {0}")]
    RenderFailed(#[from] rss::Error),
}

/// Errors that can occur while persisting the feed file
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write feed file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} into place at {to}: {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level errors for a feed generation run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}
