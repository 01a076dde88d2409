// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Indexing of a music folder into the track store.

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant, SystemTime},
};

use log::{debug, info};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::{
    metadata::MetadataParser,
    store::{StoreError, TrackStore},
    track::TrackRecord,
    utilities,
};

pub const MEDIA_EXTENSIONS: &[&str] = &["m4a", "mp3", "ogg", "oga", "flac"];

/// Number of tracks parsed and written per transaction.
pub const BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOptions {
    /// Parses metadata on the rayon thread pool.
    pub parallel: bool,

    /// Only files modified after this time are indexed.
    pub newer_than: Option<SystemTime>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions {
            parallel: true,
            newer_than: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexReport {
    pub indexed: usize,
    pub elapsed: Duration,
}

pub fn is_media_file<P: AsRef<Path>>(file: P) -> bool {
    MEDIA_EXTENSIONS
        .iter()
        .any(|extension| utilities::has_extension(extension, &file))
}

fn is_newer(entry: &walkdir::DirEntry, newer_than: Option<SystemTime>) -> bool {
    let Some(reference) = newer_than else {
        return true;
    };

    entry
        .metadata()
        .ok()
        .and_then(|metadata| metadata.modified().ok())
        .map_or(false, |modified| modified > reference)
}

/// Lists media files under `root`, following symbolic links.
pub fn find_media_files<P: AsRef<Path>>(root: P, newer_than: Option<SystemTime>) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|error| debug!("Skips an unreadable entry: {error}"))
                .ok()
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_media_file(entry.path()))
        .filter(|entry| {
            let is_utf8 = entry.path().to_str().is_some();

            if !is_utf8 {
                debug!("Skips a path that is not UTF-8: {:?}", entry.path());
            }

            is_utf8
        })
        .filter(|entry| is_newer(entry, newer_than))
        .map(|entry| entry.into_path())
        .collect()
}

fn parse_batch<P: MetadataParser + Sync + ?Sized>(
    parser: &P,
    paths: &[PathBuf],
    parallel: bool,
) -> Vec<TrackRecord> {
    let parse = |path: &PathBuf| match parser.parse(path) {
        Ok(track) => {
            debug!("Parsed: {track:?}");

            Some(track)
        }
        Err(error) => {
            debug!("Skips {path:?}: {error:#}");

            None
        }
    };

    if parallel {
        paths.par_iter().filter_map(parse).collect()
    } else {
        paths.iter().filter_map(parse).collect()
    }
}

/// Parses the media files under `root` and writes them into the store.
pub fn index<S, P>(
    store: &mut S,
    parser: &P,
    root: &Path,
    options: IndexOptions,
) -> Result<IndexReport, StoreError>
where
    S: TrackStore + ?Sized,
    P: MetadataParser + Sync + ?Sized,
{
    let start = Instant::now();
    let paths = find_media_files(root, options.newer_than);

    debug!("Found {} media files in {:?}", paths.len(), root);

    let mut indexed = 0;

    for batch in paths.chunks(BATCH_SIZE) {
        let tracks = parse_batch(parser, batch, options.parallel);

        store.insert_batch(&tracks)?;
        indexed += tracks.len();
    }

    let report = IndexReport {
        indexed,
        elapsed: start.elapsed(),
    };

    info!(
        "{} indexed {} {}files in {:.2} seconds.",
        if options.parallel { "Parallelly" } else { "Serially" },
        utilities::group_thousands(report.indexed),
        if options.newer_than.is_some() { "newer " } else { "" },
        report.elapsed.as_secs_f64()
    );

    Ok(report)
}

/// Removes tracks whose files no longer exist.
pub fn prune<S: TrackStore + ?Sized>(store: &mut S) -> Result<usize, StoreError> {
    let stale_paths: Vec<PathBuf> = store
        .all_paths()?
        .into_iter()
        .filter(|path| !path.exists())
        .collect();

    debug!("Stale files: {stale_paths:?}");

    let removed = store.remove_paths(&stale_paths)?;

    info!("Removed {removed} stale files.");

    Ok(removed)
}
