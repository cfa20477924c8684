mod fetch;
mod post;

pub use fetch::{fetch_posts, posts_url, redact_key};
pub use post::{POST_FIELDS, Post, parse_posts_response};
