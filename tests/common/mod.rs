use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Result};
use simple_media_jukebox::{
    metadata::MetadataParser,
    store::{SqliteStore, TrackStore},
    track::{RawTags, TrackRecord},
};
use tempfile::{tempdir, TempDir};

pub fn track(artist: &str, album: &str, number: u32, title: &str) -> TrackRecord {
    TrackRecord {
        title: title.to_owned(),
        artist: artist.to_owned(),
        album: album.to_owned(),
        genre: "Jazz".to_owned(),
        track_number: number,
        disc_number: 1,
        path: PathBuf::from(format!("/music/{artist}/{album}/{number:02}.flac")),
    }
}

pub fn titles(tracks: &[TrackRecord]) -> Vec<&str> {
    tracks.iter().map(|track| track.title.as_str()).collect()
}

pub fn jazz_store() -> SqliteStore {
    let mut store = SqliteStore::open_in_memory().unwrap();

    store
        .insert_batch(&[
            track("Miles Davis", "Kind of Blue", 1, "So What"),
            track("Miles Davis", "Kind of Blue", 2, "Freddie Freeloader"),
            track("Miles Davis", "Kind of Blue", 3, "Blue in Green"),
            track("Miles Davis", "Bitches Brew", 1, "Pharaoh's Dance"),
            track("John Coltrane", "Blue Train", 1, "Blue Train"),
            track("Charles Mingus", "Mingus Ah Um", 1, "Better Git It in Your Soul"),
        ])
        .unwrap();

    store
}

/// Reads the artist and title from a file name like `Artist - Title.flac`.
pub struct FileNameParser;

impl MetadataParser for FileNameParser {
    fn parse(&self, file: &Path) -> Result<TrackRecord> {
        let stem = file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();

        let Some((artist, title)) = stem.split_once(" - ") else {
            bail!("No artist in {file:?}");
        };

        Ok(TrackRecord::from_tags(
            file,
            RawTags {
                title: Some(title.to_owned()),
                artist: Some(artist.to_owned()),
                ..RawTags::default()
            },
        ))
    }
}

pub fn create_library(filenames: &[&str]) -> Result<TempDir> {
    let directory = tempdir()?;

    for filename in filenames {
        let path = directory.path().join(filename);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, b"")?;
    }

    Ok(directory)
}
