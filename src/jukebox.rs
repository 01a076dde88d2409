// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Command line settings, library updates and the choice between JSON,
//! a single query and the interactive prompt.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
    time::SystemTime,
};

use clap::Parser;
use log::{debug, info};
use rand::Rng;

use crate::{
    indexer::{self, IndexOptions},
    jukebox_error::JukeboxError,
    metadata::{LoftyMetadataParser, MetadataParser},
    output::{self, JsonOptions},
    player::{ExternalPlayer, Player, DEFAULT_PLAYER},
    selector,
    session,
    store::{SqliteStore, TrackStore},
    syntax::SYNTAX_GUIDE,
    utilities,
};

/// The struct for setting.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Search a music folder and play the matches."
)]
pub struct Setting {
    #[arg(
        short,
        long,
        value_name = "DIRECTORY",
        default_value = "~/Music",
        value_parser = utilities::true_path,
        help = "A music folder that is indexed."
    )]
    location: PathBuf,

    #[arg(
        short,
        long,
        short_alias = 'Q',
        alias = "smj-query",
        help = "A query with an optional playlist command after \";\". Prompts for queries if omitted."
    )]
    query: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        default_value = "~/.smj.sqlite",
        value_parser = utilities::true_path,
        help = "A database file of the index."
    )]
    database: PathBuf,

    #[arg(long, help = "Indexes files modified after the database.")]
    freshen: bool,

    #[arg(long, help = "Removes missing files from the database.")]
    prune: bool,

    #[arg(long, help = "Deletes the database and indexes from scratch.")]
    force_rescan: bool,

    #[arg(long, help = "Prints the matches as JSON instead of playing them.")]
    json: bool,

    #[arg(long, requires = "json", help = "Includes paths of tracks in JSON.")]
    show_paths: bool,

    #[arg(
        short,
        long,
        default_value_t = 2,
        help = "Spaces of JSON indentation. 0 prints compact JSON."
    )]
    indent: usize,

    #[arg(long, help = "Parses metadata on a single thread.")]
    force_serial: bool,

    #[arg(
        long,
        value_name = "COMMAND",
        default_value = DEFAULT_PLAYER,
        help = "A command that plays a track."
    )]
    player: String,

    #[arg(long, help = "Prints the query syntax.")]
    syntax: bool,

    #[arg(short, long, help = "Prints debug logs.")]
    debug: bool,
}

impl Setting {
    pub fn debug(&self) -> bool {
        self.debug
    }

    fn index_options(&self, newer_than: Option<SystemTime>) -> IndexOptions {
        IndexOptions {
            parallel: !self.force_serial,
            newer_than,
        }
    }

    fn json_options(&self) -> JsonOptions {
        JsonOptions {
            show_paths: self.show_paths,
            indent: self.indent,
        }
    }
}

fn remove_database(setting: &Setting) -> Result<(), JukeboxError> {
    info!("Removes the database {:?}", setting.database);

    match fs::remove_file(&setting.database) {
        Err(error) if error.kind() != io::ErrorKind::NotFound => Err(
            JukeboxError::DatabaseCannotBeRemoved(setting.database.clone(), error),
        ),
        _ => Ok(()),
    }
}

/// Brings the store up to date with the music folder.
///
/// `freshen_since` is the time the database was last written. An empty store
/// is always indexed in full.
fn update_library<S, P>(
    setting: &Setting,
    store: &mut S,
    parser: &P,
    freshen_since: Option<SystemTime>,
) -> Result<(), JukeboxError>
where
    S: TrackStore + ?Sized,
    P: MetadataParser + Sync + ?Sized,
{
    let mut indexed = false;

    if setting.force_rescan {
        indexer::index(store, parser, &setting.location, setting.index_options(None))?;
        indexed = true;
    } else if setting.freshen {
        debug!("Freshens files modified after {freshen_since:?}");

        indexer::index(
            store,
            parser,
            &setting.location,
            setting.index_options(freshen_since),
        )?;
        indexed = true;
    }

    if setting.prune {
        indexer::prune(store)?;
    }

    if !indexed && store.count()? == 0 {
        info!("The database is empty. Indexes {:?}", setting.location);

        indexer::index(store, parser, &setting.location, setting.index_options(None))?;
    }

    Ok(())
}

/// Prints JSON, runs a single query or prompts for queries.
fn serve<S, P, R, I, W>(
    setting: &Setting,
    store: &S,
    player: &P,
    rng: &mut R,
    input: &mut I,
    output: &mut W,
) -> Result<(), JukeboxError>
where
    S: TrackStore + ?Sized,
    P: Player + ?Sized,
    R: Rng + ?Sized,
    I: BufRead + ?Sized,
    W: Write + ?Sized,
{
    if setting.json {
        let query = setting
            .query
            .as_deref()
            .map_or("", |query| selector::split_query(query).0);
        let results = session::search(store, query)?;

        output::write_json(&mut *output, &results, setting.json_options())?;
        writeln!(output)?;

        return Ok(());
    }

    match &setting.query {
        Some(query) => {
            session::run_query(store, player, query, rng, output)?;

            Ok(())
        }
        None => session::run_interactive(store, player, rng, input, output),
    }
}

/// Indexes the music folder and searches it, then plays or prints the matches.
pub fn run(setting: &Setting) -> Result<(), JukeboxError> {
    if setting.syntax {
        println!("{SYNTAX_GUIDE}");

        return Ok(());
    }

    debug!("Setting: {setting:?}");

    if !setting.location.is_dir() {
        return Err(JukeboxError::LocationNotFound(setting.location.clone()));
    }

    if setting.force_rescan {
        remove_database(setting)?;
    }

    let freshen_since = utilities::modified_time(&setting.database);
    let mut store = SqliteStore::open(&setting.database)?;

    update_library(setting, &mut store, &LoftyMetadataParser, freshen_since)?;

    let player = ExternalPlayer::new(setting.player.as_str());

    serve(
        setting,
        &store,
        &player,
        &mut rand::thread_rng(),
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
    )
}
