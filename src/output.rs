// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Output of search results: JSON documents and the numbered listing.

use std::{collections::BTreeMap, io::Write, path::Path};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::track::TrackRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    /// Writes `{title, path}` objects instead of bare titles.
    pub show_paths: bool,

    /// Spaces per level. Zero writes compact JSON.
    pub indent: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            show_paths: false,
            indent: 2,
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonTrack<'a> {
    Title(&'a str),
    Detailed { title: &'a str, path: &'a Path },
}

type AlbumMap<'a> = BTreeMap<&'a str, Vec<JsonTrack<'a>>>;

/// Writes tracks as `{artist: {album: [track, ...]}}`.
pub fn write_json<W: Write>(
    writer: W,
    tracks: &[TrackRecord],
    options: JsonOptions,
) -> serde_json::Result<()> {
    let mut hierarchy: BTreeMap<&str, AlbumMap> = BTreeMap::new();

    for track in tracks {
        let json_track = if options.show_paths {
            JsonTrack::Detailed {
                title: &track.title,
                path: &track.path,
            }
        } else {
            JsonTrack::Title(&track.title)
        };

        hierarchy
            .entry(track.artist.as_str())
            .or_default()
            .entry(track.album.as_str())
            .or_default()
            .push(json_track);
    }

    if options.indent == 0 {
        serde_json::to_writer(writer, &hierarchy)
    } else {
        let indent = " ".repeat(options.indent);
        let mut serializer =
            Serializer::with_formatter(writer, PrettyFormatter::with_indent(indent.as_bytes()));

        hierarchy.serialize(&mut serializer)
    }
}

/// Writes tracks numbered from 1 under artist and album headings.
pub fn write_listing<W: Write>(mut writer: W, tracks: &[TrackRecord]) -> std::io::Result<()> {
    let width = tracks.len().to_string().len();
    let mut previous: Option<&TrackRecord> = None;

    for (index, track) in tracks.iter().enumerate() {
        let new_artist = previous.map_or(true, |previous| previous.artist != track.artist);
        let new_album = new_artist || previous.map_or(true, |previous| previous.album != track.album);

        if new_artist {
            writeln!(writer, "\n {}", track.artist)?;
            writeln!(writer, "{}", "=".repeat(track.artist.chars().count() + 1))?;
        }
        if new_album {
            writeln!(writer, "\n  {}", track.album)?;
            writeln!(writer, "  {}", "-".repeat(track.album.chars().count()))?;
        }

        writeln!(writer, "    [ {:>width$} ] {}", index + 1, track.title)?;

        previous = Some(track);
    }

    Ok(())
}
