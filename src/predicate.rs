// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Compiles clauses into a structured filter.
//!
//! A predicate is an AND of groups, one group per distinct field in the query.
//! Each group is an OR of leaf comparisons. Clauses of the same field share a
//! group, and an `any` clause contributes one leaf per column it spans.

use std::{cmp::Ordering, fmt};

use crate::{
    query::{Clause, Column, Field},
    track::TrackRecord,
};

/// Case-insensitive substring containment.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive ordering, consistent with [`contains_folded`].
pub fn compare_folded(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

/// A single `column ~ text` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub column: Column,
    pub text: String,
}

impl Leaf {
    pub fn matches(&self, track: &TrackRecord) -> bool {
        contains_folded(track.text(self.column), &self.text)
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.column, self.text)
    }
}

/// The OR of every leaf produced by the clauses of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub field: Field,
    pub leaves: Vec<Leaf>,
}

impl Group {
    pub fn matches(&self, track: &TrackRecord) -> bool {
        self.leaves.iter().any(|leaf| leaf.matches(track))
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;

        for (index, leaf) in self.leaves.iter().enumerate() {
            if index > 0 {
                f.write_str(" OR ")?;
            }
            write!(f, "{leaf}")?;
        }

        f.write_str(")")
    }
}

/// The AND of groups. Without groups it matches every track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    groups: Vec<Group>,
}

impl Predicate {
    pub fn universal() -> Self {
        Predicate::default()
    }

    pub fn is_universal(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Leaf texts in the order they appear in the predicate.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|group| group.leaves.iter())
            .map(|leaf| leaf.text.as_str())
    }

    pub fn matches(&self, track: &TrackRecord) -> bool {
        self.groups.iter().all(|group| group.matches(track))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_universal() {
            return f.write_str("TRUE");
        }

        for (index, group) in self.groups.iter().enumerate() {
            if index > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{group}")?;
        }

        Ok(())
    }
}

/// Compiles clauses into a predicate.
///
/// Groups are ordered by the first appearance of their field. Clauses with
/// blank text contribute nothing, so a group is never empty.
pub fn compile(clauses: &[Clause]) -> Predicate {
    let mut groups: Vec<Group> = Vec::new();

    for clause in clauses {
        let text = clause.text.trim();

        if text.is_empty() {
            continue;
        }

        let leaves = clause.field.columns().iter().map(|&column| Leaf {
            column,
            text: text.to_owned(),
        });

        match groups.iter_mut().find(|group| group.field == clause.field) {
            Some(group) => group.leaves.extend(leaves),
            None => groups.push(Group {
                field: clause.field,
                leaves: leaves.collect(),
            }),
        }
    }

    Predicate { groups }
}
