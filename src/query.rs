// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Tokenizer of jukebox queries.
//!
//! A query is a comma-separated list of clauses. Each clause may start with a
//! sigil that scopes it to a single field:
//!
//! | Sigil | Field  |
//! |-------|--------|
//! | `!`   | genre  |
//! | `@`   | artist |
//! | `#`   | album  |
//! | `$`   | title  |
//! | none  | any    |

use std::fmt;

/// A searchable text column of a track record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Genre,
    Artist,
    Album,
    Title,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Genre => "genre",
            Column::Artist => "artist",
            Column::Album => "album",
            Column::Title => "title",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The field a clause is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Genre,
    Artist,
    Album,
    Title,
    Any,
}

impl Field {
    fn from_sigil(sigil: char) -> Option<Field> {
        match sigil {
            '!' => Some(Field::Genre),
            '@' => Some(Field::Artist),
            '#' => Some(Field::Album),
            '$' => Some(Field::Title),
            _ => None,
        }
    }

    /// Columns compared against the text of a clause of this field.
    pub fn columns(self) -> &'static [Column] {
        match self {
            Field::Genre => &[Column::Genre],
            Field::Artist => &[Column::Artist],
            Field::Album => &[Column::Album],
            Field::Title => &[Column::Title],
            Field::Any => &[Column::Artist, Column::Album, Column::Title],
        }
    }
}

/// One field-scoped search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub field: Field,
    pub text: String,
}

impl Clause {
    pub fn new<T: Into<String>>(field: Field, text: T) -> Self {
        Clause {
            field,
            text: text.into(),
        }
    }

    fn parse(segment: &str) -> Option<Clause> {
        let segment = segment.trim();
        let mut characters = segment.chars();

        let (field, text) = match characters.next().and_then(Field::from_sigil) {
            Some(field) => (field, characters.as_str().trim()),
            None => (Field::Any, segment),
        };

        if text.is_empty() {
            None
        } else {
            Some(Clause::new(field, text))
        }
    }
}

/// Splits a query into clauses in order of appearance.
///
/// Empty segments and segments holding only a sigil are dropped, so any input
/// is valid.
pub fn tokenize(query: &str) -> Vec<Clause> {
    query.split(',').filter_map(Clause::parse).collect()
}
