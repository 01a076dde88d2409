// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

pub mod indexer;
pub mod jukebox;
pub mod jukebox_error;
pub mod metadata;
pub mod output;
pub mod player;
pub mod predicate;
pub mod query;
pub mod selector;
pub mod session;
pub mod store;
pub mod syntax;
pub mod track;
pub mod utilities;
