// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

/// Guide printed by `--syntax`.
pub const SYNTAX_GUIDE: &str = r#"
# Query Syntax

Queries chain search terms together using single-character notation. You can
combine multiple terms; like-type terms are logically ORed and unlike-type terms
are logically ANDed together.

!<some string>                      - Search for genres matching the string
@<some string>                      - Search for artists matching the string
#<some string>                      - Search for albums matching the string
$<some string>                      - Search for tracks matching the string
<some string>                       - Search for artists, albums, or tracks matching the string

## Combinations

Terms are comma-separated, and combined logically as mentioned above. All strings
are searched case-insensitively and will match on partial hits.

@artist1, @artist2                  - Any songs by either artist1 or artist2
@artist1, #album1                   - Any albums with "album1" in it by any artist with "artist1" in it
something1                          - Anything matching "something1", in any field
something1, $track1                 - Any tracks matching "track1" that have "something1" related to them

## Common Uses

term1, term2, term3                 - Keep searching everything until the additional terms yield the specificity you wish
@artist1, @artist2, #greatest hits  - Play the "Greatest Hits" albums by both artist1 and artist2
@artist, #album, $tracknumber       - Play a specific track off of a specific album, useful when live albums exist alongside

## Examples

@mingus, @coltrane, @brubeck        - Plays some assorted jazz tracks by these 3 artists
@rolling stones, #greatest          - Matches "Greatest Hits" by "The Rolling Stones"
@decemberists, #live, $infanta      - Plays the live version of "Infanta" by "The Decemberists"

## Playlist post-commands

When invoking from the command line, put the query in quotes so that your shell
passes it as a single argument.

To add a playlist command, append a semicolon ";" to your query and follow it with one of:

#                                   - Play the #th song and every song after it
a                                   - Play all matching songs
r                                   - Play a single, random matching song
s                                   - Play all matching songs, shuffled

### Examples of queries plus commands

smj -q "@rolling stones, #greatest; a"   - Plays all songs matching the query
smj -q "@decemberists, #live; s"         - Plays all songs matching the query, in a random order
"#;
