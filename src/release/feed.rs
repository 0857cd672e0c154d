// src/release/feed.rs

//! Release metadata feed parsing
//!
//! The feed is the maven `maven-metadata.xml` of the AGP artifact, listing
//! every published version under `<versioning><versions><version>`.

use crate::error::{Error, Result};
use crate::version::{ReleaseVersion, ShortVersion};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::BTreeMap;
use tracing::debug;

/// Collect the text of every `<version>` element in the feed
pub fn published_versions(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut versions = Vec::new();
    let mut in_version = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"version" => in_version = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"version" => in_version = false,
            Ok(Event::Text(text)) if in_version => {
                let value = text
                    .unescape()
                    .map_err(|e| Error::MalformedFeed(e.to_string()))?;
                versions.push(value.trim().to_string());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::MalformedFeed(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    Ok(versions)
}

/// Find the latest published release for each requested `major.minor`
///
/// Entries that are not valid release strings are ignored. Short versions
/// with no published release are absent from the result.
pub fn find_latest_versions(
    xml: &str,
    shorts: &[ShortVersion],
) -> Result<BTreeMap<ShortVersion, ReleaseVersion>> {
    let mut latest: BTreeMap<ShortVersion, ReleaseVersion> = BTreeMap::new();

    for text in published_versions(xml)? {
        let Some(short) = shorts.iter().find(|s| s.matches_prefix(&text)) else {
            continue;
        };

        let release = match ReleaseVersion::parse(&text) {
            Ok(release) => release,
            Err(e) => {
                debug!("Skipping feed entry: {}", e);
                continue;
            }
        };

        latest
            .entry(*short)
            .and_modify(|current| {
                if release > *current {
                    *current = release;
                }
            })
            .or_insert(release);
    }

    Ok(latest)
}

/// Find the latest published release for a single `X.Y` query
///
/// Fails with `MalformedVersion` when the query is not of the form `X.Y`.
pub fn find_latest_version(xml: &str, query: &str) -> Result<Option<ReleaseVersion>> {
    let short = ShortVersion::parse(query).ok_or_else(|| {
        Error::MalformedVersion(format!(
            "{query} (must be formatted as \"X.Y\", where X and Y are positive whole numbers)"
        ))
    })?;

    Ok(find_latest_versions(xml, &[short])?.remove(&short))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Four major/minor combinations:
    ///   8.1 - latest version is 8.1.1
    ///   8.2 - latest version is 8.2.0-rc02
    ///   8.3 - latest version is 8.3.0-beta02
    ///   8.4 - latest version is 8.4.0-alpha02
    const FEED: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<metadata>
    <groupId>com.android.tools.build</groupId>
    <artifactId>gradle</artifactId>
    <versioning>
        <latest>8.4.0-alpha02</latest>
        <release>8.4.0-alpha02</release>
        <versions>
            <version>8.1.0-alpha01</version>
            <version>8.1.0-beta01</version>
            <version>8.1.0-rc01</version>
            <version>8.1.0</version>
            <version>8.1.1</version>
            <version>8.2.0-alpha01</version>
            <version>8.2.0-beta01</version>
            <version>8.2.0-rc01</version>
            <version>8.2.0-rc02</version>
            <version>8.3.0-alpha01</version>
            <version>8.3.0-beta01</version>
            <version>8.3.0-beta02</version>
            <version>8.4.0-alpha01</version>
            <version>8.4.0-alpha02</version>
        </versions>
        <lastUpdated>20240112173158</lastUpdated>
    </versioning>
</metadata>"#;

    fn latest(query: &str) -> Option<String> {
        find_latest_version(FEED, query)
            .unwrap()
            .map(|v| v.to_string())
    }

    #[test]
    fn test_find_latest_version() {
        assert_eq!(latest("8.1").as_deref(), Some("8.1.1"));
        assert_eq!(latest("8.2").as_deref(), Some("8.2.0-rc02"));
        assert_eq!(latest("8.3").as_deref(), Some("8.3.0-beta02"));
        assert_eq!(latest("8.4").as_deref(), Some("8.4.0-alpha02"));
        assert_eq!(latest("8.5"), None);
    }

    #[test]
    fn test_query_must_be_short() {
        assert!(matches!(
            find_latest_version(FEED, "8.1.0"),
            Err(Error::MalformedVersion(_))
        ));
    }

    #[test]
    fn test_find_latest_versions_for_many() {
        let shorts = [
            ShortVersion::new(8, 1),
            ShortVersion::new(8, 3),
            ShortVersion::new(9, 0),
        ];
        let map = find_latest_versions(FEED, &shorts).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&ShortVersion::new(8, 3)].to_string(), "8.3.0-beta02");
    }

    #[test]
    fn test_unparsable_entries_are_ignored() {
        let feed = "<metadata><versioning><versions>\
            <version>8.1.0</version>\
            <version>8.1.5-custom</version>\
            <version>8.1.x</version>\
            </versions></versioning></metadata>";
        assert_eq!(
            find_latest_version(feed, "8.1").unwrap().map(|v| v.to_string()),
            Some("8.1.0".to_string())
        );
    }

    #[test]
    fn test_only_version_elements_are_read() {
        let versions = published_versions(FEED).unwrap();
        assert_eq!(versions.len(), 14);
        assert!(!versions.contains(&"20240112173158".to_string()));
    }

    #[test]
    fn test_malformed_feed() {
        let err = published_versions("<metadata><version>8.1.0</metadata>").unwrap_err();
        assert!(matches!(err, Error::MalformedFeed(_)));
    }
}
