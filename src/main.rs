// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::process::exit;

use clap::Parser;

use env_logger::Env;
use log::error;
use simple_media_jukebox::{
    jukebox::{run, Setting},
    jukebox_error::JukeboxError,
};

fn initialize_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_target(false)
        .format_timestamp(None)
        .init();
}

fn main() {
    let setting = Setting::parse();

    initialize_logging(setting.debug());

    if let Err(error) = run(&setting) {
        match error {
            JukeboxError::LocationNotFound(location) => {
                error!("The music folder {location:?} is not found.");
            }
            JukeboxError::DatabaseCannotBeRemoved(database, error) => {
                error!("{database:?} cannot be removed. Detail: {error}");
            }
            JukeboxError::Store(error) => {
                error!("The database is failed. Detail: {error}");
            }
            JukeboxError::Json(error) => {
                error!("JSON cannot be written. Detail: {error}");
            }
            JukeboxError::Io(error) => {
                error!("Input or output is failed. Detail: {error}");
            }
        }

        exit(1);
    }
}
