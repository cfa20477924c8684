mod build;
mod write;

pub use build::{build_channel, current_year, render_feed};
pub use write::{FEED_FILENAME, WrittenFeed, content_hash, write_feed};
