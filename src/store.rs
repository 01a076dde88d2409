// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! SQLite storage of the library.

use std::path::{Path, PathBuf};

use log::debug;
use rusqlite::{functions::FunctionFlags, params, params_from_iter, Connection, Row};
use thiserror::Error;

use crate::{
    predicate::{self, Predicate},
    track::TrackRecord,
};

/// Error about the library database.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Path is not valid UTF-8: {0:?}")]
    InvalidPath(PathBuf),
}

/// Storage of track records.
#[cfg_attr(test, mockall::automock)]
pub trait TrackStore {
    /// Inserts tracks, replacing any record with the same path.
    fn insert_batch(&mut self, batch: &[TrackRecord]) -> Result<(), StoreError>;

    fn count(&self) -> Result<usize, StoreError>;

    /// Tracks matching the predicate, ordered by artist, album, disc and track.
    fn search(&self, predicate: &Predicate) -> Result<Vec<TrackRecord>, StoreError>;

    fn all_paths(&self) -> Result<Vec<PathBuf>, StoreError>;

    /// Deletes the records of the paths and returns how many were removed.
    fn remove_paths(&mut self, paths: &[PathBuf]) -> Result<usize, StoreError>;
}

const CONTAINS_FUNCTION: &str = "contains_folded";

const FOLDED_COLLATION: &str = "FOLDED";

const SELECT_TRACKS: &str =
    "SELECT title, artist, album, genre, tracknumber, discnumber, path FROM media";

const ORDER_TRACKS: &str =
    " ORDER BY artist COLLATE FOLDED, album COLLATE FOLDED, discnumber, tracknumber";

pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        debug!("Opens the database: {:?}", path.as_ref());

        SqliteStore::initialize(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        SqliteStore::initialize(Connection::open_in_memory()?)
    }

    fn initialize(connection: Connection) -> Result<Self, StoreError> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS media (
                title TEXT NOT NULL,
                artist TEXT NOT NULL,
                album TEXT NOT NULL,
                genre TEXT NOT NULL,
                tracknumber INTEGER NOT NULL,
                discnumber INTEGER NOT NULL,
                path TEXT NOT NULL UNIQUE
            )",
            [],
        )?;

        connection.create_scalar_function(
            CONTAINS_FUNCTION,
            2,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |context| {
                let haystack = context.get::<Option<String>>(0)?.unwrap_or_default();
                let needle = context.get::<Option<String>>(1)?.unwrap_or_default();

                Ok(predicate::contains_folded(&haystack, &needle))
            },
        )?;

        connection.create_collation(FOLDED_COLLATION, predicate::compare_folded)?;

        Ok(SqliteStore { connection })
    }

    fn row_to_track(row: &Row) -> rusqlite::Result<TrackRecord> {
        Ok(TrackRecord {
            title: row.get(0)?,
            artist: row.get(1)?,
            album: row.get(2)?,
            genre: row.get(3)?,
            track_number: row.get(4)?,
            disc_number: row.get(5)?,
            path: PathBuf::from(row.get::<_, String>(6)?),
        })
    }
}

fn path_text(path: &Path) -> Result<&str, StoreError> {
    path.to_str()
        .ok_or_else(|| StoreError::InvalidPath(path.to_path_buf()))
}

/// Builds the WHERE clause of a predicate.
///
/// Only column names are written into the statement; texts are bound in the
/// order returned by [`Predicate::texts`].
pub fn where_clause(predicate: &Predicate) -> Option<String> {
    if predicate.is_universal() {
        return None;
    }

    let groups: Vec<String> = predicate
        .groups()
        .iter()
        .map(|group| {
            let leaves: Vec<String> = group
                .leaves
                .iter()
                .map(|leaf| format!("{CONTAINS_FUNCTION}({}, ?)", leaf.column.name()))
                .collect();

            format!("({})", leaves.join(" OR "))
        })
        .collect();

    Some(groups.join(" AND "))
}

impl TrackStore for SqliteStore {
    fn insert_batch(&mut self, batch: &[TrackRecord]) -> Result<(), StoreError> {
        let transaction = self.connection.transaction()?;

        {
            let mut statement = transaction.prepare_cached(
                "INSERT OR REPLACE INTO media
                 (title, artist, album, genre, tracknumber, discnumber, path)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            for track in batch {
                statement.execute(params![
                    track.title,
                    track.artist,
                    track.album,
                    track.genre,
                    track.track_number,
                    track.disc_number,
                    path_text(&track.path)?,
                ])?;
            }
        }

        transaction.commit()?;

        Ok(())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .connection
            .query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn search(&self, predicate: &Predicate) -> Result<Vec<TrackRecord>, StoreError> {
        let sql = match where_clause(predicate) {
            Some(condition) => format!("{SELECT_TRACKS} WHERE {condition}{ORDER_TRACKS}"),
            None => format!("{SELECT_TRACKS}{ORDER_TRACKS}"),
        };

        debug!("Search for {predicate}: {sql}");

        let mut statement = self.connection.prepare(&sql)?;
        let tracks = statement
            .query_map(params_from_iter(predicate.texts()), SqliteStore::row_to_track)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tracks)
    }

    fn all_paths(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut statement = self.connection.prepare("SELECT path FROM media")?;
        let paths = statement
            .query_map([], |row| row.get::<_, String>(0))?
            .map(|path| path.map(PathBuf::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(paths)
    }

    fn remove_paths(&mut self, paths: &[PathBuf]) -> Result<usize, StoreError> {
        let transaction = self.connection.transaction()?;
        let mut removed = 0;

        {
            let mut statement = transaction.prepare_cached("DELETE FROM media WHERE path = ?1")?;

            for path in paths {
                removed += statement.execute(params![path_text(path)?])?;
            }
        }

        transaction.commit()?;

        Ok(removed)
    }
}
