// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{Datelike, Local};
use rss::extension::atom::{AtomExtension, Link};
use rss::extension::itunes::{ITunesChannelExtensionBuilder, ITunesItemExtensionBuilder};
use rss::{Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, Item, ItemBuilder};

use crate::config::FeedConfig;
use crate::episode::{Episode, format_pub_date};
use crate::error::FeedError;

const FEED_MIME_TYPE: &str = "application/rss+xml";

/// Copyright sign with the emoji presentation selector
const COPYRIGHT_SIGN: &str = "\u{a9}\u{fe0f}";

/// Unknown enclosure sizes are announced as zero bytes
const UNKNOWN_LENGTH: &str = "0";

/// Year used for the copyright line, from the local wall clock
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Assemble the RSS channel: fixed metadata followed by one item per episode
pub fn build_channel(config: &FeedConfig, episodes: &[Episode], year: i32) -> Channel {
    let channel = &config.channel;

    let itunes = ITunesChannelExtensionBuilder::default()
        .author(Some(channel.author.clone()))
        .explicit(Some(if channel.explicit { "yes" } else { "no" }.to_string()))
        .image(Some(config.site_url(&channel.image)))
        .build();

    let mut self_link = Link::default();
    self_link.set_href(config.site_url(&channel.self_link));
    self_link.set_rel("self");
    self_link.set_mime_type(Some(FEED_MIME_TYPE.to_string()));

    let mut atom = AtomExtension::default();
    atom.set_links(vec![self_link]);

    let items: Vec<Item> = episodes.iter().map(episode_to_item).collect();

    ChannelBuilder::default()
        .title(channel.title.clone())
        .link(config.site_url(&channel.link))
        .description(channel.description.clone())
        .language(Some(channel.language.clone()))
        .copyright(Some(format!("{} {} {}", COPYRIGHT_SIGN, year, channel.copyright_holder)))
        .itunes_ext(Some(itunes))
        .atom_ext(Some(atom))
        .items(items)
        .build()
}

fn episode_to_item(episode: &Episode) -> Item {
    let enclosure = EnclosureBuilder::default()
        .url(episode.enclosure.url.clone())
        .length(UNKNOWN_LENGTH.to_string())
        .mime_type(episode.enclosure.mime_type.clone())
        .build();

    let itunes = ITunesItemExtensionBuilder::default()
        .summary(Some(episode.summary.clone()))
        .image(episode.image_url.clone())
        .build();

    ItemBuilder::default()
        .title(Some(episode.title.clone()))
        .link(Some(episode.link.clone()))
        .guid(Some(
            GuidBuilder::default()
                .value(episode.guid.clone())
                .permalink(true)
                .build(),
        ))
        .pub_date(Some(format_pub_date(&episode.pub_date)))
        .description(Some(episode.summary.clone()))
        .itunes_ext(Some(itunes))
        .enclosure(Some(enclosure))
        .build()
}

/// Serialize a channel as pretty-printed UTF-8 XML with a declaration
pub fn render_feed(channel: &Channel) -> Result<Vec<u8>, FeedError> {
    Ok(channel.pretty_write_to(Vec::new(), b' ', 2)?)
}
