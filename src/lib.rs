pub mod cms;
pub mod config;
pub mod episode;
pub mod error;
pub mod feed;
pub mod http;
pub mod pipeline;
pub mod progress;
pub mod server;

// Re-export main types for convenience
pub use cms::{Post, fetch_posts, parse_posts_response};
pub use config::{ChannelConfig, FeedConfig, read_channel_config};
pub use episode::{Enclosure, Episode, select_episodes};
pub use error::{ConfigError, FeedError, FetchError, PipelineError, WriteError};
pub use feed::{build_channel, render_feed, write_feed};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use pipeline::{FeedReport, generate_feed};
pub use progress::{
    NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter, TracingReporter,
};
