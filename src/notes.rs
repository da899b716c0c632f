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
use crate::error::{Error, Result};

/// Pitch class names, spelled with flats to match the board's note header.
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// The token emitted for a rest. The board treats it as "no note".
pub const REST: &str = "1";

/// The default octave offset. MIDI pitch 64 is named E3 with this offset.
pub const DEFAULT_OCTAVE_OFFSET: u8 = 2;

/// Maps MIDI pitch numbers to symbolic note names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchNamer {
    octave_offset: u8,
}

impl PitchNamer {
    /// Creates a new pitch namer that subtracts the given offset from the raw MIDI octave.
    pub fn new(octave_offset: u8) -> PitchNamer {
        PitchNamer { octave_offset }
    }

    /// Names a single pitch, e.g. 64 -> "E3". Pitches that would land in a negative
    /// octave are rejected rather than clamped.
    pub fn name(&self, pitch: u8) -> Result<String> {
        let octave = pitch / 12;
        if pitch > 127 || octave < self.octave_offset {
            return Err(Error::OutOfRange {
                pitch,
                octave_offset: self.octave_offset,
            });
        }

        Ok(format!(
            "{}{}",
            PITCH_CLASSES[usize::from(pitch % 12)],
            octave - self.octave_offset
        ))
    }

    /// Names an optional pitch, mapping `None` to the rest token.
    pub fn token(&self, pitch: Option<u8>) -> Result<String> {
        match pitch {
            Some(pitch) => self.name(pitch),
            None => Ok(REST.to_string()),
        }
    }
}

impl Default for PitchNamer {
    fn default() -> Self {
        PitchNamer::new(DEFAULT_OCTAVE_OFFSET)
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use crate::error;

    use super::{PitchNamer, REST};

    #[test]
    fn default_names() -> Result<(), Box<dyn Error>> {
        let namer = PitchNamer::default();
        assert_eq!("E3", namer.name(64)?);
        assert_eq!("C3", namer.name(60)?);
        assert_eq!("Ab3", namer.name(68)?);
        assert_eq!("Bb2", namer.name(58)?);
        assert_eq!("C0", namer.name(24)?);
        assert_eq!("G8", namer.name(127)?);
        Ok(())
    }

    #[test]
    fn zero_offset_uses_raw_octave() -> Result<(), Box<dyn Error>> {
        let namer = PitchNamer::new(0);
        assert_eq!("E5", namer.name(64)?);
        assert_eq!("C0", namer.name(0)?);
        Ok(())
    }

    #[test]
    fn rest_token() -> Result<(), Box<dyn Error>> {
        let namer = PitchNamer::default();
        assert_eq!(REST, namer.token(None)?);
        assert_eq!("Gb4", namer.token(Some(78))?);
        Ok(())
    }

    #[test]
    fn out_of_range() {
        let namer = PitchNamer::default();
        assert_eq!("C0", namer.name(24).unwrap());
        assert!(matches!(
            namer.name(23),
            Err(error::Error::OutOfRange {
                pitch: 23,
                octave_offset: 2
            })
        ));
        assert!(matches!(
            namer.name(128),
            Err(error::Error::OutOfRange { pitch: 128, .. })
        ));
    }
}
