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
mod smf;

pub use smf::{parse_song, read_song};

/// A single note change at an absolute tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// The absolute tick of the event, counted from the start of the track.
    pub tick: u64,
    /// What happened at this tick.
    pub kind: EventKind,
}

/// The kinds of events the resampler cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A note begins sounding.
    NoteOn { pitch: u8, velocity: u8 },
    /// A note stops sounding.
    NoteOff { pitch: u8 },
}

impl Event {
    /// Creates a note on event.
    pub fn note_on(tick: u64, pitch: u8, velocity: u8) -> Event {
        Event {
            tick,
            kind: EventKind::NoteOn { pitch, velocity },
        }
    }

    /// Creates a note off event.
    pub fn note_off(tick: u64, pitch: u8) -> Event {
        Event {
            tick,
            kind: EventKind::NoteOff { pitch },
        }
    }

    // Note offs sort ahead of note ons on the same tick.
    fn order_key(&self) -> (u64, u8) {
        match self.kind {
            EventKind::NoteOff { .. } => (self.tick, 0),
            EventKind::NoteOn { .. } => (self.tick, 1),
        }
    }
}

/// The note events of a single track, ordered by tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    events: Vec<Event>,
}

impl Track {
    /// Creates a new track. Events are stably ordered by tick, with note offs placed
    /// before note ons that share a tick.
    pub fn new(mut events: Vec<Event>) -> Track {
        events.sort_by_key(Event::order_key);
        Track { events }
    }

    /// Returns the ordered events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns the tick of the last event, if there is one.
    pub fn last_tick(&self) -> Option<u64> {
        self.events.last().map(|event| event.tick)
    }

    /// Returns true if the track carries no note events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A decoded MIDI file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    /// Ticks per beat.
    resolution: u16,
    /// One entry per track chunk in the file, including empty ones.
    tracks: Vec<Track>,
}

impl Song {
    /// Creates a new song.
    pub fn new(resolution: u16, tracks: Vec<Track>) -> Song {
        Song { resolution, tracks }
    }

    /// Returns the resolution in ticks per beat.
    pub fn resolution(&self) -> u16 {
        self.resolution
    }

    /// Returns all tracks.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}
