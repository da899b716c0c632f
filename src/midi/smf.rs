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
use std::fs;
use std::path::Path;

use midly::{MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use tracing::debug;

use crate::error::{Error, Result};

use super::{Event, Song, Track};

/// Reads and decodes the MIDI file at the given path.
pub fn read_song(path: &Path) -> Result<Song> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let buf: Vec<u8> = fs::read(path).map_err(|e| Error::io(path, e))?;
    parse_song(path, &buf)
}

/// Decodes an in-memory MIDI file. The path is only used for error reporting.
pub fn parse_song(path: &Path, buf: &[u8]) -> Result<Song> {
    let smf = Smf::parse(buf).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let resolution = match smf.header.timing {
        Timing::Metrical(ticks_per_beat) => ticks_per_beat.as_int(),
        Timing::Timecode(..) => return Err(Error::UnsupportedTiming(path.to_path_buf())),
    };

    let tracks: Vec<Track> = smf.tracks.iter().map(|track| note_events(track)).collect();
    debug!(
        file = ?path,
        resolution,
        tracks = tracks.len(),
        "Decoded MIDI file"
    );

    Ok(Song::new(resolution, tracks))
}

/// Converts delta-timed track events into absolute note events. Everything that is not
/// a note on or note off is dropped, though its delta still advances the clock.
fn note_events(track: &[TrackEvent]) -> Track {
    let mut tick: u64 = 0;
    let mut events = Vec::new();

    for event in track {
        tick += u64::from(event.delta.as_int());
        let TrackEventKind::Midi { message, .. } = event.kind else {
            continue;
        };

        match message {
            // A note on with zero velocity is a note off.
            MidiMessage::NoteOn { key, vel } if vel.as_int() == 0 => {
                events.push(Event::note_off(tick, key.as_int()))
            }
            MidiMessage::NoteOn { key, vel } => {
                events.push(Event::note_on(tick, key.as_int(), vel.as_int()))
            }
            MidiMessage::NoteOff { key, .. } => events.push(Event::note_off(tick, key.as_int())),
            _ => {}
        }
    }

    Track::new(events)
}
