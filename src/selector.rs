// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Playlist directives and the selection of tracks to play.

use std::str::FromStr;

use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

/// Separates a query from its playlist directive.
pub const DIRECTIVE_SEPARATOR: char = ';';

/// How the matched tracks are turned into a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Plays the Nth track (1-based) and every track after it.
    Index(usize),
    All,
    RandomOne,
    ShuffleAll,
}

/// Error about playlist selection.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Selection out of range, enter a value from 1 to {len}.")]
    OutOfRange { index: usize, len: usize },

    #[error("Not a valid playlist command: \"{0}\".")]
    Unrecognized(String),
}

impl FromStr for Directive {
    type Err = SelectionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim().to_lowercase();

        if !text.is_empty() && text.chars().all(|character| character.is_ascii_digit()) {
            // Too many digits for usize can only be out of range.
            return Ok(Directive::Index(text.parse().unwrap_or(usize::MAX)));
        }

        match text.chars().next() {
            None | Some('a') => Ok(Directive::All),
            Some('r') => Ok(Directive::RandomOne),
            Some('s') => Ok(Directive::ShuffleAll),
            Some(_) => Err(SelectionError::Unrecognized(text)),
        }
    }
}

/// Splits a one-shot query at the first separator.
///
/// Without a separator the directive is `a`, playing every match.
pub fn split_query(raw: &str) -> (&str, &str) {
    raw.split_once(DIRECTIVE_SEPARATOR).unwrap_or((raw, "a"))
}

/// Orders `results` for playback according to `directive`.
pub fn select<T: Clone, R: Rng + ?Sized>(
    results: &[T],
    directive: Directive,
    rng: &mut R,
) -> Result<Vec<T>, SelectionError> {
    match directive {
        Directive::Index(index) => {
            if (1..=results.len()).contains(&index) {
                Ok(results[index - 1..].to_vec())
            } else {
                Err(SelectionError::OutOfRange {
                    index,
                    len: results.len(),
                })
            }
        }
        Directive::All => Ok(results.to_vec()),
        Directive::RandomOne => Ok(results.choose(rng).cloned().into_iter().collect()),
        Directive::ShuffleAll => {
            let mut shuffled = results.to_vec();

            shuffled.shuffle(rng);

            Ok(shuffled)
        }
    }
}
