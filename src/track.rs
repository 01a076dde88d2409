// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Track records stored in the jukebox database.

use std::path::{Path, PathBuf};

use crate::query::Column;

pub const UNKNOWN_ARTIST: &str = "unknown artist";
pub const UNKNOWN_ALBUM: &str = "unknown album";
pub const UNKNOWN_GENRE: &str = "unknown genre";

/// A track in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub track_number: u32,
    pub disc_number: u32,
    pub path: PathBuf,
}

/// Tags read from a media file before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl TrackRecord {
    /// Builds a record, filling missing tags with fixed defaults.
    ///
    /// The album artist wins over the track artist so that compilations and
    /// featured artists stay grouped under one name.
    pub fn from_tags(path: &Path, tags: RawTags) -> Self {
        let title = non_empty(tags.title).unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        TrackRecord {
            title,
            artist: non_empty(tags.album_artist)
                .or_else(|| non_empty(tags.artist))
                .unwrap_or_else(|| UNKNOWN_ARTIST.to_owned()),
            album: non_empty(tags.album).unwrap_or_else(|| UNKNOWN_ALBUM.to_owned()),
            genre: non_empty(tags.genre).unwrap_or_else(|| UNKNOWN_GENRE.to_owned()),
            track_number: tags.track_number.unwrap_or(0),
            disc_number: tags.disc_number.unwrap_or(0),
            path: path.to_path_buf(),
        }
    }

    pub fn text(&self, column: Column) -> &str {
        match column {
            Column::Genre => &self.genre,
            Column::Artist => &self.artist,
            Column::Album => &self.album,
            Column::Title => &self.title,
        }
    }
}
