mod date;
mod select;

pub use date::{format_pub_date, parse_published_at};
pub use select::{
    AUDIO_MARKER, AUDIO_MIME_TYPE, Enclosure, Episode, Selection, audio_reference, episode_link,
    map_post, select_episodes,
};
