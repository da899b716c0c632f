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
use std::env;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::debug;

use crate::config::{Declaration, Options};
use crate::error::{Error, Result};
use crate::notes::PitchNamer;
use crate::resample::Timeline;

const NOTE_SUFFIX: &str = "f";
const VELOCITY_SUFFIX: &str = "a";

/// Renders timelines as C array literals.
pub struct Formatter<'a> {
    prefix: &'a str,
    velocity: bool,
    declaration: &'a Declaration,
    namer: PitchNamer,
}

impl<'a> Formatter<'a> {
    /// Creates a formatter from the run options.
    pub fn new(options: &'a Options) -> Formatter<'a> {
        Formatter {
            prefix: &options.prefix,
            velocity: options.velocity,
            declaration: &options.declaration,
            namer: PitchNamer::new(options.octave_offset),
        }
    }

    /// Formats every timeline. Channels are numbered from one in the order given.
    pub fn format(&self, timelines: &[Timeline]) -> Result<String> {
        let blocks = timelines
            .iter()
            .enumerate()
            .map(|(i, timeline)| self.format_channel(i + 1, timeline))
            .collect::<Result<Vec<String>>>()?;
        Ok(blocks.join("\n"))
    }

    /// Formats the note array, and the velocity array if enabled, for one channel.
    pub fn format_channel(&self, channel: usize, timeline: &Timeline) -> Result<String> {
        let notes = timeline
            .pitches()
            .map(|pitch| self.namer.token(pitch))
            .collect::<Result<Vec<String>>>()?;
        let mut output = self.array(channel, NOTE_SUFFIX, &notes);

        if self.velocity {
            let velocities: Vec<String> = timeline
                .velocities()
                .map(|velocity| velocity.to_string())
                .collect();
            output.push('\n');
            output.push_str(&self.array(channel, VELOCITY_SUFFIX, &velocities));
        }

        Ok(output)
    }

    fn array(&self, channel: usize, suffix: &str, tokens: &[String]) -> String {
        let mut header = String::new();
        if !self.declaration.qualifier.is_empty() {
            header.push_str(&self.declaration.qualifier);
            header.push(' ');
        }
        header.push_str(&format!("{}{}{}[]", self.prefix, channel, suffix));
        if !self.declaration.attribute.is_empty() {
            header.push(' ');
            header.push_str(&self.declaration.attribute);
        }

        format!("{} = {{\n{}\n}};\n", header, tokens.join(","))
    }
}

/// Where the generated text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

impl Sink {
    /// Creates a sink for an optional output path, defaulting to stdout.
    pub fn new(path: Option<PathBuf>) -> Sink {
        match path {
            Some(path) => Sink::File(path),
            None => Sink::Stdout,
        }
    }

    /// Writes the text. For files, returns the absolute path that was written.
    pub fn emit(&self, text: &str) -> Result<Option<PathBuf>> {
        match self {
            Sink::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", text).map_err(|e| Error::io("<stdout>", e))?;
                Ok(None)
            }
            Sink::File(path) => write_atomically(path, text).map(Some),
        }
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => write!(f, "stdout"),
            Sink::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Writes the text to a temporary file next to the target and renames it into place,
/// so a failed run never leaves a partial file behind.
fn write_atomically(path: &Path, text: &str) -> Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map_err(|e| Error::io(path, e))?
            .join(path)
    };
    let directory = path.parent().unwrap_or(Path::new("/"));

    // An existing target keeps its mode; a new one gets the same mode a plain create would.
    let existing = fs::metadata(&path).ok().map(|metadata| metadata.permissions());
    let mut builder = Builder::new();
    builder.prefix(".midiarray");
    if existing.is_none() {
        new_file_permissions(&mut builder);
    }

    let mut file = builder
        .tempfile_in(directory)
        .map_err(|e| Error::io(&path, e))?;
    file.write_all(text.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| Error::io(&path, e))?;
    if let Some(permissions) = existing {
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| Error::io(&path, e))?;
    }
    debug!(temp = ?file.path(), target = ?path, "Committing output file");
    file.persist(&path).map_err(|e| Error::io(&path, e.error))?;

    Ok(path)
}

// The process umask still applies, as it would for File::create.
#[cfg(unix)]
fn new_file_permissions(builder: &mut Builder<'_, '_>) {
    use std::os::unix::fs::PermissionsExt;

    builder.permissions(fs::Permissions::from_mode(0o666));
}

#[cfg(not(unix))]
fn new_file_permissions(_: &mut Builder<'_, '_>) {}
