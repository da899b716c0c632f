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
use std::{error::Error, fs, path::Path};

use midly::{
    num::{u15, u28, u4, u7},
    Format, Fps, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent,
    TrackEventKind,
};

/// A delta-timed note message used to build test MIDI files.
#[derive(Clone, Copy)]
pub struct NoteSpec {
    delta: u32,
    key: u8,
    vel: u8,
    on: bool,
}

impl NoteSpec {
    /// A note on after `delta` ticks.
    pub fn on(delta: u32, key: u8, vel: u8) -> NoteSpec {
        NoteSpec {
            delta,
            key,
            vel,
            on: true,
        }
    }

    /// A note off after `delta` ticks.
    pub fn off(delta: u32, key: u8) -> NoteSpec {
        NoteSpec {
            delta,
            key,
            vel: 0,
            on: false,
        }
    }

    fn to_track_event(self) -> TrackEvent<'static> {
        let message = if self.on {
            MidiMessage::NoteOn {
                key: u7::new(self.key),
                vel: u7::new(self.vel),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(self.key),
                vel: u7::new(self.vel),
            }
        };

        TrackEvent {
            delta: u28::new(self.delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message,
            },
        }
    }
}

fn build_track(notes: Vec<NoteSpec>) -> Track<'static> {
    let mut track: Track<'static> = vec![TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(b"test")),
    }];
    track.extend(notes.into_iter().map(NoteSpec::to_track_event));
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}

/// Builds a parallel MIDI file in memory with one track per entry.
pub fn smf_bytes(resolution: u16, tracks: Vec<Vec<NoteSpec>>) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(resolution)),
    ));
    smf.tracks.extend(tracks.into_iter().map(build_track));

    let mut buf = Vec::new();
    smf.write(&mut buf)?;
    Ok(buf)
}

/// Builds a MIDI file that uses SMPTE timecode timing.
pub fn timecode_smf_bytes() -> Result<Vec<u8>, Box<dyn Error>> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Timecode(Fps::Fps25, 40),
    ));
    smf.tracks
        .push(build_track(vec![NoteSpec::on(0, 60, 64), NoteSpec::off(40, 60)]));

    let mut buf = Vec::new();
    smf.write(&mut buf)?;
    Ok(buf)
}

/// Writes a parallel MIDI file to disk.
pub fn write_smf(
    path: &Path,
    resolution: u16,
    tracks: Vec<Vec<NoteSpec>>,
) -> Result<(), Box<dyn Error>> {
    fs::write(path, smf_bytes(resolution, tracks)?)?;
    Ok(())
}
