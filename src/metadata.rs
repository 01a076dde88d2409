// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Metadata of music files.

use std::path::Path;

use anyhow::{Context, Result};
use lofty::{
    file::TaggedFileExt,
    tag::{Accessor, ItemKey, Tag},
};

use crate::track::{RawTags, TrackRecord};

/// Parses metadata.
#[cfg_attr(test, mockall::automock)]
pub trait MetadataParser {
    /// Reads the tags of a music file into a track record.
    fn parse(&self, file: &Path) -> Result<TrackRecord>;
}

/// Parses `N/M` into its number and total. Either side may be missing.
fn get_number_pair(text: &str) -> (Option<u32>, Option<u32>) {
    let (number, total) = text.split_once('/').unwrap_or((text, ""));

    (number.trim().parse().ok(), total.trim().parse().ok())
}

fn get_number_from_tag(key: &ItemKey, tag: &Tag) -> Option<u32> {
    tag.get_string(key).and_then(|text| get_number_pair(text).0)
}

fn get_text(tag: &Tag, key: &ItemKey) -> Option<String> {
    tag.get_string(key)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_owned())
}

pub struct LoftyMetadataParser;

impl LoftyMetadataParser {
    fn get_album_artist(tag: &Tag) -> Option<String> {
        // ItemKey::AlbumArtist is "ALBUMARTIST" for ogg, so the spaced variant is read too.
        get_text(tag, &ItemKey::AlbumArtist)
            .or_else(|| get_text(tag, &ItemKey::Unknown("ALBUM ARTIST".to_owned())))
    }

    fn get_track_number(tag: &Tag) -> Option<u32> {
        tag.track()
            .or_else(|| get_number_from_tag(&ItemKey::TrackNumber, tag))
    }

    fn get_disk_number(tag: &Tag) -> Option<u32> {
        tag.disk()
            .or_else(|| get_number_from_tag(&ItemKey::DiscNumber, tag))
    }

    fn get_raw_tags(tag: &Tag) -> RawTags {
        RawTags {
            title: tag.title().map(|title| title.into_owned()),
            artist: tag.artist().map(|artist| artist.into_owned()),
            album_artist: LoftyMetadataParser::get_album_artist(tag),
            album: tag.album().map(|album| album.into_owned()),
            genre: tag.genre().map(|genre| genre.into_owned()),
            track_number: LoftyMetadataParser::get_track_number(tag),
            disc_number: LoftyMetadataParser::get_disk_number(tag),
        }
    }
}

impl MetadataParser for LoftyMetadataParser {
    fn parse(&self, path: &Path) -> Result<TrackRecord> {
        let tagged_file = lofty::read_from_path(path)
            .with_context(|| format!("Metadata of {path:?} could not be read"))?;

        let tags = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .map(LoftyMetadataParser::get_raw_tags)
            .unwrap_or_default();

        Ok(TrackRecord::from_tags(path, tags))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn track_number_from_track_and_album_number() {
        let number_pair = get_number_pair("1/2");

        assert_eq!(Some(1), number_pair.0);
        assert_eq!(Some(2), number_pair.1);
    }

    #[test]
    fn track_number_from_track_and_album_number_without_album_number() {
        let number_pair = get_number_pair("1/");

        assert_eq!(Some(1), number_pair.0);
        assert!(number_pair.1.is_none());
    }

    #[test]
    fn track_number_without_total() {
        assert_eq!((Some(7), None), get_number_pair(" 7 "));
    }

    #[test]
    fn track_number_that_is_not_a_number() {
        assert_eq!((None, None), get_number_pair("side A"));
    }

    #[test]
    fn parse_file_that_is_not_music() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("notes.txt");
        fs::write(&path, b"plain text").unwrap();

        assert!(LoftyMetadataParser.parse(&path).is_err());
    }

    #[test]
    fn parse_missing_file() {
        let directory = tempdir().unwrap();

        assert!(LoftyMetadataParser
            .parse(&directory.path().join("missing.flac"))
            .is_err());
    }
}
