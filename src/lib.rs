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
//! Converts MIDI files into note and velocity arrays that can be compiled into firmware.
//!
//! Each track is resampled onto a fixed grid of `resolution / sample_rate` ticks and
//! every sample is named after the pitch sounding at that point.

pub mod config;
pub mod convert;
pub mod error;
pub mod midi;
pub mod notes;
pub mod output;
pub mod resample;
#[cfg(test)]
mod testutil;

pub use convert::{convert_file, convert_song};
pub use error::{Error, Result};
