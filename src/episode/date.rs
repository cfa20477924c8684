// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// `EEE, dd MMM yyyy HH:mm:ss ±hhmm`
const RFC2822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Parse an ISO-8601 publish timestamp.
///
/// RFC 3339 timestamps keep their offset. Timestamps without an offset,
/// and bare dates, are taken as UTC.
pub fn parse_published_at(date_str: &str) -> Option<DateTime<FixedOffset>> {
    let date_str = date_str.trim();

    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc().fixed_offset())
        })
}

/// Render a timestamp the way RSS `pubDate` expects
pub fn format_pub_date(date: &DateTime<FixedOffset>) -> String {
    date.format(RFC2822_FORMAT).to_string()
}
