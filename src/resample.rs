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
use std::fmt;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::midi::{Event, EventKind, Track};

/// The most samples a single track may resample to.
pub const MAX_SAMPLES: u64 = 1 << 24;

/// The number of samples taken per beat. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SampleRate(u32);

impl SampleRate {
    /// Creates a sample rate, rejecting zero.
    pub fn new(rate: u32) -> Result<SampleRate> {
        if rate < 1 {
            return Err(Error::InvalidArgument(format!(
                "sample rate must be at least 1, got {}",
                rate
            )));
        }
        Ok(SampleRate(rate))
    }

    /// Returns the raw rate.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        SampleRate(1)
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How each sample is chosen from the ticks it covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Take whatever is sounding exactly at each grid point.
    #[default]
    Point,
    /// Take whatever sounds longest within each step.
    Majority,
}

/// The state of a track at one grid point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sample {
    /// The sounding pitch, or `None` for a rest.
    pub pitch: Option<u8>,
    /// The velocity of the sounding pitch, zero during a rest.
    pub velocity: u8,
}

impl Sample {
    /// Silence: no pitch and zero velocity.
    pub const REST: Sample = Sample {
        pitch: None,
        velocity: 0,
    };

    /// Creates a sounding sample.
    pub fn note(pitch: u8, velocity: u8) -> Sample {
        Sample {
            pitch: Some(pitch),
            velocity,
        }
    }

    /// Applies an event to this state. The most recent note on wins. A note off only
    /// silences the track if it closes the pitch that is currently sounding.
    fn apply(&mut self, event: &Event) {
        match event.kind {
            EventKind::NoteOn { pitch, velocity } => *self = Sample::note(pitch, velocity),
            EventKind::NoteOff { pitch } if self.pitch == Some(pitch) => *self = Sample::REST,
            EventKind::NoteOff { .. } => {}
        }
    }
}

/// A uniformly spaced sequence of samples covering a whole track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    samples: Vec<Sample>,
}

impl Timeline {
    /// Returns the samples.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterates over the sounding pitches.
    pub fn pitches(&self) -> impl Iterator<Item = Option<u8>> + '_ {
        self.samples.iter().map(|sample| sample.pitch)
    }

    /// Iterates over the velocities.
    pub fn velocities(&self) -> impl Iterator<Item = u8> + '_ {
        self.samples.iter().map(|sample| sample.velocity)
    }
}

impl From<Vec<Sample>> for Timeline {
    fn from(samples: Vec<Sample>) -> Self {
        Timeline { samples }
    }
}

/// Converts note events onto a fixed grid of `resolution / sample_rate` ticks.
///
/// The step is kept as an exact fraction: sample `i` sits at tick
/// `i * resolution / sample_rate`, and all comparisons are scaled by the sample
/// rate so long tracks never drift.
#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    resolution: u64,
    rate: u64,
    strategy: Strategy,
}

impl Resampler {
    /// Creates a new resampler for a file with the given ticks per beat.
    pub fn new(resolution: u16, sample_rate: SampleRate, strategy: Strategy) -> Result<Resampler> {
        if resolution == 0 {
            return Err(Error::InvalidArgument(
                "MIDI resolution must be at least one tick per beat".to_string(),
            ));
        }
        if sample_rate.get() > u32::from(resolution) {
            return Err(Error::InvalidArgument(format!(
                "sample rate {} is larger than the resolution of {} ticks per beat, the step would be zero ticks",
                sample_rate, resolution
            )));
        }

        Ok(Resampler {
            resolution: u64::from(resolution),
            rate: u64::from(sample_rate.get()),
            strategy,
        })
    }

    /// The number of samples the given track resamples to.
    fn sample_count(&self, track: &Track) -> u64 {
        match (track.last_tick(), self.strategy) {
            (None, _) => 0,
            (Some(last), Strategy::Point) => self.grid_points(last) + 1,
            (Some(last), Strategy::Majority) => self.grid_points(last),
        }
    }

    /// Resamples a track. Fails without allocating if the track would need more than
    /// [`MAX_SAMPLES`] samples.
    pub fn resample(&self, track: &Track) -> Result<Timeline> {
        let count = self.sample_count(track);
        if count > MAX_SAMPLES {
            return Err(Error::InvalidArgument(format!(
                "track would resample to {} samples, the limit is {}; lower the sample rate",
                count, MAX_SAMPLES
            )));
        }

        let samples = match self.strategy {
            Strategy::Point => self.point(track.events(), count),
            Strategy::Majority => self.majority(track.events(), count),
        };
        Ok(Timeline { samples })
    }

    // Number of whole or partial steps needed to reach the last tick.
    fn grid_points(&self, last_tick: u64) -> u64 {
        (last_tick * self.rate).div_ceil(self.resolution)
    }

    fn point(&self, events: &[Event], count: u64) -> Vec<Sample> {
        let mut samples = Vec::with_capacity(count as usize);
        let mut state = Sample::REST;
        let mut pending = events.iter().peekable();

        for i in 0..count {
            let position = i * self.resolution;
            while let Some(event) = pending.next_if(|event| event.tick * self.rate <= position) {
                state.apply(event);
            }
            samples.push(state);
        }

        samples
    }

    fn majority(&self, events: &[Event], windows: u64) -> Vec<Sample> {
        let segments = segments(events);
        let mut first = 0;
        let mut samples = Vec::with_capacity(windows as usize);

        for window in 0..windows {
            let low = window * self.resolution;
            let high = low + self.resolution;

            while first < segments.len() && segments[first].end * self.rate <= low {
                first += 1;
            }

            // Tally in order of first appearance so ties go to the earliest state.
            let mut tally: Vec<(Sample, u64)> = Vec::new();
            for segment in &segments[first..] {
                let start = segment.start * self.rate;
                if start >= high {
                    break;
                }
                let weight = (segment.end * self.rate).min(high) - start.max(low);
                match tally.iter_mut().find(|(sample, _)| *sample == segment.sample) {
                    Some((_, total)) => *total += weight,
                    None => tally.push((segment.sample, weight)),
                }
            }

            let mut winner: Option<(Sample, u64)> = None;
            for (sample, weight) in tally {
                if winner.map_or(true, |(_, best)| weight > best) {
                    winner = Some((sample, weight));
                }
            }
            samples.push(winner.map(|(sample, _)| sample).unwrap_or_default());
        }

        samples
    }
}

/// A run of ticks `[start, end)` over which the track state does not change.
#[derive(Debug, PartialEq, Eq)]
struct Segment {
    start: u64,
    end: u64,
    sample: Sample,
}

// The state at tick t includes every event at or before t. The tick of the last event
// closes the track, so the final state gets no segment.
fn segments(events: &[Event]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut state = Sample::REST;
    let mut start = 0;
    let mut events = events.iter().peekable();

    while let Some(tick) = events.peek().map(|event| event.tick) {
        if tick > start {
            segments.push(Segment {
                start,
                end: tick,
                sample: state,
            });
            start = tick;
        }
        while let Some(event) = events.next_if(|event| event.tick == tick) {
            state.apply(event);
        }
    }

    segments
}

/// Point-samples a track at `resolution / sample_rate` ticks per sample.
pub fn resample(track: &Track, resolution: u16, sample_rate: u32) -> Result<Timeline> {
    let resampler = Resampler::new(resolution, SampleRate::new(sample_rate)?, Strategy::Point)?;
    resampler.resample(track)
}
