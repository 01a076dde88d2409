// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::store::StoreError;

/// Error of the jukebox.
#[derive(Error, Debug)]
pub enum JukeboxError {
    #[error("Cannot scan a nonexistent path: {0:?}")]
    LocationNotFound(PathBuf),

    #[error("The database {0:?} cannot be removed: {1}")]
    DatabaseCannotBeRemoved(PathBuf, io::Error),

    #[error("Database is failed: {0}")]
    Store(#[from] StoreError),

    #[error("JSON cannot be written: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
