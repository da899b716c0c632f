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
use std::path::Path;

use config::{Config, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::notes::DEFAULT_OCTAVE_OFFSET;
use crate::resample::{SampleRate, Strategy};

const DEFAULT_PREFIX: &str = "song_ch";
const DEFAULT_QUALIFIER: &str = "__prog__ unsigned short";
const DEFAULT_ATTRIBUTE: &str = "__attribute__((space(prog)))";

/// A YAML representation of the conversion settings. Every field is optional so that
/// settings from several places can be layered.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Settings {
    /// The number of samples per beat.
    pub sample_rate: Option<u32>,

    /// The prefix for the generated array names.
    pub prefix: Option<String>,

    /// Whether to emit velocity arrays.
    pub velocity: Option<bool>,

    /// How samples are picked.
    pub strategy: Option<Strategy>,

    /// The number of octaves subtracted when naming pitches.
    pub octave_offset: Option<u8>,

    /// The C declaration wrapped around each array.
    pub declaration: Option<Declaration>,
}

impl Settings {
    /// Layers the given settings on top of these. Values present in `overrides` win.
    pub fn merge(self, overrides: Settings) -> Settings {
        Settings {
            sample_rate: overrides.sample_rate.or(self.sample_rate),
            prefix: overrides.prefix.or(self.prefix),
            velocity: overrides.velocity.or(self.velocity),
            strategy: overrides.strategy.or(self.strategy),
            octave_offset: overrides.octave_offset.or(self.octave_offset),
            declaration: overrides.declaration.or(self.declaration),
        }
    }

    /// Fills in defaults and validates the result.
    pub fn resolve(self) -> Result<Options> {
        let sample_rate = match self.sample_rate {
            Some(sample_rate) => SampleRate::new(sample_rate)?,
            None => SampleRate::default(),
        };

        Ok(Options {
            sample_rate,
            prefix: self.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            velocity: self.velocity.unwrap_or(false),
            strategy: self.strategy.unwrap_or_default(),
            octave_offset: self.octave_offset.unwrap_or(DEFAULT_OCTAVE_OFFSET),
            declaration: self.declaration.unwrap_or_default(),
        })
    }
}

/// Loads settings from a YAML file.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let settings: Settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Yaml))
        .build()?
        .try_deserialize()?;
    debug!(file = ?path, ?settings, "Loaded settings");

    Ok(settings)
}

/// The type and attribute placed around each generated array.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Everything in front of the array name, e.g. `const unsigned short`.
    #[serde(default = "default_qualifier")]
    pub qualifier: String,

    /// Everything between the brackets and the `=`. May be empty.
    #[serde(default = "default_attribute")]
    pub attribute: String,
}

fn default_qualifier() -> String {
    DEFAULT_QUALIFIER.to_string()
}

fn default_attribute() -> String {
    DEFAULT_ATTRIBUTE.to_string()
}

impl Default for Declaration {
    fn default() -> Self {
        Declaration {
            qualifier: default_qualifier(),
            attribute: default_attribute(),
        }
    }
}

/// Fully resolved options for a conversion run.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub sample_rate: SampleRate,
    pub prefix: String,
    pub velocity: bool,
    pub strategy: Strategy,
    pub octave_offset: u8,
    pub declaration: Declaration,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            sample_rate: SampleRate::default(),
            prefix: DEFAULT_PREFIX.to_string(),
            velocity: false,
            strategy: Strategy::default(),
            octave_offset: DEFAULT_OCTAVE_OFFSET,
            declaration: Declaration::default(),
        }
    }
}
