// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Playback of tracks through an external player.

use std::{
    io::{self, Write},
    process::{Command, ExitStatus},
    thread,
    time::Duration,
};

use log::{debug, warn};
use thiserror::Error;
use which::which;

use crate::track::TrackRecord;

pub const DEFAULT_PLAYER: &str = "mplayer";

/// Error about playback.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Command {command} is not found: {error}")]
    CommandNotFound {
        command: String,
        error: which::Error,
    },

    #[error("Command {command} cannot be executed: {error}")]
    CommandCannotExecuted {
        command: String,
        error: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// The track played to the end.
    Finished,

    /// The player quit early, usually because the user interrupted it.
    Stopped,
}

#[cfg_attr(test, mockall::automock)]
pub trait Player {
    fn play(&self, track: &TrackRecord) -> Result<PlaybackStatus, PlaybackError>;
}

/// Plays tracks with a player command found on `PATH`.
///
/// The command is looked up on every track, so a missing player only fails
/// playback, not searching.
#[derive(Debug, Clone)]
pub struct ExternalPlayer {
    name: String,
}

impl ExternalPlayer {
    pub fn new<T: Into<String>>(name: T) -> Self {
        ExternalPlayer { name: name.into() }
    }

    fn get_command(&self) -> Result<Command, PlaybackError> {
        let command_path = which(&self.name).map_err(|error| PlaybackError::CommandNotFound {
            command: self.name.clone(),
            error,
        })?;

        debug!("Player: {command_path:?}");

        Ok(Command::new(command_path))
    }

    fn run(&self, command: &mut Command) -> Result<ExitStatus, PlaybackError> {
        #[cfg(unix)]
        let _guard = interrupt::IgnoreGuard::new();

        command
            .status()
            .map_err(|error| PlaybackError::CommandCannotExecuted {
                command: self.name.clone(),
                error,
            })
    }
}

impl Player for ExternalPlayer {
    fn play(&self, track: &TrackRecord) -> Result<PlaybackStatus, PlaybackError> {
        let mut command = self.get_command()?;
        command.arg(&track.path);

        #[cfg(unix)]
        interrupt::restore_default_in_child(&mut command);

        let status = self.run(&mut command)?;

        debug!("{} exited: {status}", self.name);

        if status.success() {
            Ok(PlaybackStatus::Finished)
        } else {
            Ok(PlaybackStatus::Stopped)
        }
    }
}

/// Ctrl-C reaches both the jukebox and the player. Only the player should stop.
#[cfg(unix)]
mod interrupt {
    use std::{os::unix::process::CommandExt, process::Command};

    pub struct IgnoreGuard {
        previous: libc::sighandler_t,
    }

    impl IgnoreGuard {
        pub fn new() -> Self {
            // SAFETY: SIG_IGN is a valid disposition for SIGINT.
            let previous = unsafe { libc::signal(libc::SIGINT, libc::SIG_IGN) };

            IgnoreGuard { previous }
        }
    }

    impl Drop for IgnoreGuard {
        fn drop(&mut self) {
            if self.previous != libc::SIG_ERR {
                // SAFETY: restores the disposition returned by libc::signal.
                unsafe {
                    libc::signal(libc::SIGINT, self.previous);
                }
            }
        }
    }

    /// Ignored signals stay ignored across exec, so the child resets SIGINT.
    pub fn restore_default_in_child(command: &mut Command) {
        // SAFETY: signal(2) is async-signal-safe.
        unsafe {
            command.pre_exec(|| {
                libc::signal(libc::SIGINT, libc::SIG_DFL);

                Ok(())
            });
        }
    }
}

/// Time for the player to finish writing to the terminal after it is stopped.
const SETTLE_TIME: Duration = Duration::from_millis(250);

/// Plays tracks in order and returns how many played to the end.
///
/// Playback stops at the first track that is stopped or fails. Neither is an
/// error for the caller.
pub fn play_all<P, W>(player: &P, tracks: &[TrackRecord], output: &mut W) -> io::Result<usize>
where
    P: Player + ?Sized,
    W: Write + ?Sized,
{
    let mut finished = 0;

    for track in tracks {
        writeln!(
            output,
            "\n--> Playing \"{}\" off of \"{}\" by \"{}\" -->\n",
            track.title, track.album, track.artist
        )?;
        output.flush()?;

        match player.play(track) {
            Ok(PlaybackStatus::Finished) => finished += 1,
            Ok(PlaybackStatus::Stopped) => {
                thread::sleep(SETTLE_TIME);
                break;
            }
            Err(error) => {
                warn!("Playback is stopped: {error}");
                break;
            }
        }
    }

    Ok(finished)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use mockall::{predicate, Sequence};

    use super::*;

    fn track(title: &str) -> TrackRecord {
        TrackRecord {
            title: title.to_owned(),
            artist: "artist".to_owned(),
            album: "album".to_owned(),
            genre: "genre".to_owned(),
            track_number: 1,
            disc_number: 1,
            path: PathBuf::from(format!("/music/{title}.flac")),
        }
    }

    #[test]
    fn play_every_track_in_order() {
        let tracks = vec![track("one"), track("two"), track("three")];
        let mut player = MockPlayer::new();
        let mut sequence = Sequence::new();

        for expected in tracks.clone() {
            player
                .expect_play()
                .with(predicate::eq(expected))
                .times(1)
                .in_sequence(&mut sequence)
                .returning(|_| Ok(PlaybackStatus::Finished));
        }

        assert_eq!(3, play_all(&player, &tracks, &mut io::sink()).unwrap());
    }

    #[test]
    fn stop_when_player_is_stopped() {
        let tracks = vec![track("one"), track("two"), track("three")];
        let mut player = MockPlayer::new();
        let mut sequence = Sequence::new();

        player
            .expect_play()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(PlaybackStatus::Finished));
        player
            .expect_play()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(PlaybackStatus::Stopped));

        assert_eq!(1, play_all(&player, &tracks, &mut io::sink()).unwrap());
    }

    #[test]
    fn stop_when_player_fails() {
        let tracks = vec![track("one"), track("two")];
        let mut player = MockPlayer::new();

        player.expect_play().times(1).returning(|_| {
            Err(PlaybackError::CommandCannotExecuted {
                command: "mplayer".to_owned(),
                error: io::Error::new(io::ErrorKind::Other, "error"),
            })
        });

        assert_eq!(0, play_all(&player, &tracks, &mut io::sink()).unwrap());
    }

    #[test]
    fn play_nothing() {
        let mut player = MockPlayer::new();

        player.expect_play().never();

        assert_eq!(0, play_all(&player, &[], &mut io::sink()).unwrap());
    }

    #[test]
    fn missing_player_command() {
        let error = ExternalPlayer::new("no-such-player-for-the-jukebox")
            .play(&track("one"))
            .unwrap_err();

        assert!(matches!(
            error,
            PlaybackError::CommandNotFound { command, .. } if command == "no-such-player-for-the-jukebox"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn finished_and_stopped_by_exit_status() {
        let finished = ExternalPlayer::new("true");
        let stopped = ExternalPlayer::new("false");

        assert_eq!(PlaybackStatus::Finished, finished.play(&track("one")).unwrap());
        assert_eq!(PlaybackStatus::Stopped, stopped.play(&track("one")).unwrap());
    }
}
