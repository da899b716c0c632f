// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::PathBuf;

/// Typed error for conversion failures so callers can tell a bad argument from
/// a bad file without string matching.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("There is no file at '{}'", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unable to decode MIDI file {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: midly::Error,
    },

    #[error("MIDI file {} uses timecode timing, only metrical timing is supported", .0.display())]
    UnsupportedTiming(PathBuf),

    #[error("Pitch {pitch} has no note name with an octave offset of {octave_offset}")]
    OutOfRange { pitch: u8, octave_offset: u8 },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config load/parse error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Wraps an IO error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
