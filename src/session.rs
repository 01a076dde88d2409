// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! One-shot queries and the interactive prompt.

use std::io::{BufRead, Write};

use log::debug;
use rand::Rng;

use crate::{
    jukebox_error::JukeboxError,
    output,
    player::{self, Player},
    predicate,
    query,
    selector::{self, Directive, DIRECTIVE_SEPARATOR},
    store::{StoreError, TrackStore},
    track::TrackRecord,
    utilities,
};

const NO_RESULTS: &str = "No results found.";

/// Searches the store with a query without a directive.
pub fn search<S: TrackStore + ?Sized>(
    store: &S,
    query: &str,
) -> Result<Vec<TrackRecord>, StoreError> {
    let predicate = predicate::compile(&query::tokenize(query));

    debug!("Crafted predicate: {predicate}");

    store.search(&predicate)
}

/// Plays the tracks chosen by a directive. Bad directives are reported only.
pub fn play_selection<P, R, W>(
    player: &P,
    results: &[TrackRecord],
    directive: &str,
    rng: &mut R,
    output: &mut W,
) -> Result<usize, JukeboxError>
where
    P: Player + ?Sized,
    R: Rng + ?Sized,
    W: Write + ?Sized,
{
    let selection = directive
        .parse::<Directive>()
        .and_then(|directive| selector::select(results, directive, rng));

    match selection {
        Ok(playlist) => Ok(player::play_all(player, &playlist, output)?),
        Err(error) => {
            writeln!(output, "{error}")?;

            Ok(0)
        }
    }
}

/// Runs `query[;directive]` once.
pub fn run_query<S, P, R, W>(
    store: &S,
    player: &P,
    raw_query: &str,
    rng: &mut R,
    output: &mut W,
) -> Result<usize, JukeboxError>
where
    S: TrackStore + ?Sized,
    P: Player + ?Sized,
    R: Rng + ?Sized,
    W: Write + ?Sized,
{
    let (query, directive) = selector::split_query(raw_query);
    let results = search(store, query)?;

    if results.is_empty() {
        writeln!(output, "{NO_RESULTS}")?;

        return Ok(0);
    }

    play_selection(player, &results, directive, rng, output)
}

fn prompt<I, W>(
    input: &mut I,
    output: &mut W,
    text: &str,
) -> Result<Option<String>, JukeboxError>
where
    I: BufRead + ?Sized,
    W: Write + ?Sized,
{
    write!(output, "{text}")?;
    output.flush()?;

    let mut line = String::new();

    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}

/// Prompts for queries until the input ends.
///
/// A single match plays at once. Several matches are listed and a play
/// command is asked for, unless the query already carries a directive.
pub fn run_interactive<S, P, R, I, W>(
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
    let count = utilities::group_thousands(store.count()?);

    writeln!(output, "For help with the query syntax, run with --syntax")?;
    writeln!(
        output,
        "Examples: just a query; !genre, @artist name, #album name, $track name"
    )?;

    loop {
        let Some(line) = prompt(input, output, &format!("\n[SMJ | {count} files] > "))? else {
            break;
        };

        let (query, directive) = match line.split_once(DIRECTIVE_SEPARATOR) {
            Some((query, directive)) => (query, Some(directive)),
            None => (line.as_str(), None),
        };

        let results = search(store, query)?;

        if results.is_empty() {
            writeln!(output, "{NO_RESULTS}")?;
            continue;
        }

        if let Some(directive) = directive {
            play_selection(player, &results, directive, rng, output)?;
            continue;
        }

        if results.len() == 1 {
            player::play_all(player, &results, output)?;
            continue;
        }

        output::write_listing(&mut *output, &results)?;
        writeln!(
            output,
            "\nEnter # to play, or one of: (A)ll, (R)andom choice, or (S)huffle all"
        )?;

        let Some(choice) = prompt(input, output, "\n[Play command] > ")? else {
            break;
        };

        play_selection(player, &results, &choice, rng, output)?;
    }

    writeln!(output, "\nGoodbye.")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, path::PathBuf};

    use mockall::{predicate::function, Sequence};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        player::{MockPlayer, PlaybackStatus},
        store::SqliteStore,
    };

    fn track(artist: &str, album: &str, number: u32, title: &str) -> TrackRecord {
        TrackRecord {
            title: title.to_owned(),
            artist: artist.to_owned(),
            album: album.to_owned(),
            genre: "Jazz".to_owned(),
            track_number: number,
            disc_number: 1,
            path: PathBuf::from(format!("/music/{artist}/{album}/{number}.flac")),
        }
    }

    fn store() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();

        store
            .insert_batch(&[
                track("Miles Davis", "Kind of Blue", 1, "So What"),
                track("Miles Davis", "Kind of Blue", 2, "Freddie Freeloader"),
                track("Miles Davis", "Kind of Blue", 3, "Blue in Green"),
                track("Nirvana", "Nevermind", 1, "Smells Like Teen Spirit"),
            ])
            .unwrap();

        store
    }

    fn expect_titles(player: &mut MockPlayer, titles: &[&'static str]) {
        let mut sequence = Sequence::new();

        for &title in titles {
            player
                .expect_play()
                .with(function(move |track: &TrackRecord| track.title == title))
                .times(1)
                .in_sequence(&mut sequence)
                .returning(|_| Ok(PlaybackStatus::Finished));
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    fn interact(player: &MockPlayer, input: &str) -> String {
        let mut output = Vec::new();

        run_interactive(
            &store(),
            player,
            &mut rng(),
            &mut Cursor::new(input.as_bytes()),
            &mut output,
        )
        .unwrap();

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn query_plays_from_index() {
        let mut player = MockPlayer::new();
        expect_titles(&mut player, &["Freddie Freeloader", "Blue in Green"]);

        let played =
            run_query(&store(), &player, "@miles; 2", &mut rng(), &mut Vec::new()).unwrap();

        assert_eq!(2, played);
    }

    #[test]
    fn query_without_directive_plays_all() {
        let mut player = MockPlayer::new();
        expect_titles(&mut player, &["So What", "Freddie Freeloader", "Blue in Green"]);

        let played =
            run_query(&store(), &player, "#kind of blue", &mut rng(), &mut Vec::new()).unwrap();

        assert_eq!(3, played);
    }

    #[test]
    fn query_out_of_range_plays_nothing() {
        let mut player = MockPlayer::new();
        player.expect_play().never();
        let mut output = Vec::new();

        let played = run_query(&store(), &player, "@miles;5", &mut rng(), &mut output).unwrap();

        assert_eq!(0, played);
        assert!(String::from_utf8(output).unwrap().contains("out of range"));
    }

    #[test]
    fn query_with_unrecognized_directive() {
        let mut player = MockPlayer::new();
        player.expect_play().never();
        let mut output = Vec::new();

        run_query(&store(), &player, "@miles; x", &mut rng(), &mut output).unwrap();

        assert!(String::from_utf8(output)
            .unwrap()
            .contains("Not a valid playlist command"));
    }

    #[test]
    fn query_without_results() {
        let mut player = MockPlayer::new();
        player.expect_play().never();
        let mut output = Vec::new();

        run_query(&store(), &player, "@coltrane", &mut rng(), &mut output).unwrap();

        assert_eq!("No results found.\n", String::from_utf8(output).unwrap());
    }

    #[test]
    fn random_one_plays_a_single_match() {
        let mut player = MockPlayer::new();
        player
            .expect_play()
            .with(function(|track: &TrackRecord| track.artist == "Miles Davis"))
            .times(1)
            .returning(|_| Ok(PlaybackStatus::Finished));

        run_query(&store(), &player, "@miles; r", &mut rng(), &mut Vec::new()).unwrap();
    }

    #[test]
    fn interactive_single_match_plays_at_once() {
        let mut player = MockPlayer::new();
        expect_titles(&mut player, &["Smells Like Teen Spirit"]);

        let output = interact(&player, "nirvana\n");

        assert!(output.contains("[SMJ | 4 files] > "));
        assert!(output.ends_with("\nGoodbye.\n"));
    }

    #[test]
    fn interactive_lists_and_asks_for_command() {
        let mut player = MockPlayer::new();
        expect_titles(&mut player, &["Blue in Green"]);

        let output = interact(&player, "@miles\n3\n");

        assert!(output.contains("    [ 1 ] So What\n"));
        assert!(output.contains("[Play command] > "));
    }

    #[test]
    fn interactive_query_with_directive_skips_prompt() {
        let mut player = MockPlayer::new();
        expect_titles(&mut player, &["So What", "Freddie Freeloader", "Blue in Green"]);

        let output = interact(&player, "@miles; a\n");

        assert!(!output.contains("[Play command] > "));
    }

    #[test]
    fn interactive_reports_no_results_and_continues() {
        let mut player = MockPlayer::new();
        expect_titles(&mut player, &["Smells Like Teen Spirit"]);

        let output = interact(&player, "@coltrane\n$teen\n");

        assert!(output.contains("No results found.\n"));
    }

    #[test]
    fn interactive_ends_while_asking_for_command() {
        let mut player = MockPlayer::new();
        player.expect_play().never();

        let output = interact(&player, "@miles\n");

        assert!(output.ends_with("\nGoodbye.\n"));
    }
}
