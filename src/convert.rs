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
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Options;
use crate::error::Result;
use crate::midi::{self, Song};
use crate::output::{Formatter, Sink};
use crate::resample::{Resampler, Timeline};

/// Resamples every track of the song. Tracks that produce no samples are dropped, so
/// the returned timelines map onto consecutive output channels.
pub fn timelines(song: &Song, options: &Options) -> Result<Vec<Timeline>> {
    let resampler = Resampler::new(song.resolution(), options.sample_rate, options.strategy)?;

    let mut timelines: Vec<Timeline> = Vec::new();
    for (index, track) in song.tracks().iter().enumerate() {
        let timeline = resampler.resample(track)?;
        debug!(
            track = index,
            events = track.events().len(),
            samples = timeline.len(),
            "Resampled track"
        );
        if !timeline.is_empty() {
            timelines.push(timeline);
        }
    }

    if timelines.is_empty() {
        warn!("No note events found, output will be empty");
    }
    Ok(timelines)
}

/// Converts a decoded song into array text.
pub fn convert_song(song: &Song, options: &Options) -> Result<String> {
    let timelines = timelines(song, options)?;
    Formatter::new(options).format(&timelines)
}

/// Reads a MIDI file, converts it and writes the result to the sink. Nothing is written
/// unless the whole conversion succeeds. Returns the absolute path for file sinks.
pub fn convert_file(input: &Path, sink: &Sink, options: &Options) -> Result<Option<PathBuf>> {
    info!(
        file = ?input,
        sample_rate = %options.sample_rate,
        strategy = ?options.strategy,
        output = %sink,
        "Converting MIDI file"
    );

    let song = midi::read_song(input)?;
    let text = convert_song(&song, options)?;
    sink.emit(&text)
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::fs;
    use std::path::Path;

    use crate::config::Options;
    use crate::error;
    use crate::midi::{Event, Song, Track};
    use crate::output::Sink;
    use crate::resample::{SampleRate, Strategy};
    use crate::testutil::{write_smf, NoteSpec};

    use super::{convert_file, convert_song, timelines};

    fn song() -> Song {
        Song::new(
            480,
            vec![
                Track::default(),
                Track::new(vec![
                    Event::note_on(1440, 64, 100),
                    Event::note_off(2880, 64),
                ]),
                Track::new(vec![Event::note_on(0, 60, 50), Event::note_off(960, 60)]),
            ],
        )
    }

    #[test]
    fn empty_tracks_are_skipped() -> Result<(), Box<dyn Error>> {
        let timelines = timelines(&song(), &Options::default())?;
        assert_eq!(2, timelines.len());
        assert_eq!(7, timelines[0].len());
        assert_eq!(3, timelines[1].len());
        Ok(())
    }

    #[test]
    fn converts_all_channels() -> Result<(), Box<dyn Error>> {
        let options = Options {
            sample_rate: SampleRate::new(2)?,
            ..Default::default()
        };
        let text = convert_song(&song(), &options)?;
        assert_eq!(
            concat!(
                "__prog__ unsigned short song_ch1f[] __attribute__((space(prog))) = {\n",
                "1,1,1,1,1,1,E3,E3,E3,E3,E3,E3,1\n",
                "};\n",
                "\n",
                "__prog__ unsigned short song_ch2f[] __attribute__((space(prog))) = {\n",
                "C3,C3,C3,C3,1\n",
                "};\n",
            ),
            text
        );
        Ok(())
    }

    #[test]
    fn majority_strategy() -> Result<(), Box<dyn Error>> {
        let options = Options {
            strategy: Strategy::Majority,
            velocity: true,
            ..Default::default()
        };
        let song = Song::new(
            480,
            vec![Track::new(vec![
                Event::note_on(0, 64, 100),
                Event::note_on(400, 67, 90),
                Event::note_off(960, 67),
            ])],
        );
        let text = convert_song(&song, &options)?;
        assert!(text.contains("= {\nE3,G3\n};"));
        assert!(text.contains("= {\n100,90\n};"));
        Ok(())
    }

    #[test]
    fn no_notes_gives_no_output() -> Result<(), Box<dyn Error>> {
        let song = Song::new(480, vec![Track::default()]);
        assert_eq!("", convert_song(&song, &Options::default())?);
        Ok(())
    }

    #[test]
    fn file_to_file() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let input = tempdir.path().join("song.mid");
        let output = tempdir.path().join("song.h");
        write_smf(
            &input,
            480,
            vec![vec![NoteSpec::on(0, 64, 100), NoteSpec::off(480, 64)]],
        )?;

        let written = convert_file(&input, &Sink::File(output.clone()), &Options::default())?;
        assert_eq!(Some(output.clone()), written);
        assert_eq!(
            "__prog__ unsigned short song_ch1f[] __attribute__((space(prog))) = {\nE3,1\n};\n",
            fs::read_to_string(&output)?
        );
        Ok(())
    }

    #[test]
    fn failures_leave_no_output() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let input = tempdir.path().join("low.mid");
        let output = tempdir.path().join("low.h");
        // Pitch 10 has no name with the default octave offset.
        write_smf(
            &input,
            480,
            vec![vec![NoteSpec::on(0, 10, 100), NoteSpec::off(480, 10)]],
        )?;

        assert!(matches!(
            convert_file(&input, &Sink::File(output.clone()), &Options::default()),
            Err(error::Error::OutOfRange { pitch: 10, .. })
        ));
        assert!(!output.exists());

        assert!(matches!(
            convert_file(
                Path::new("/definitely/not/here.mid"),
                &Sink::File(output.clone()),
                &Options::default()
            ),
            Err(error::Error::FileNotFound(_))
        ));
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn step_too_small_for_file() -> Result<(), Box<dyn Error>> {
        let tempdir = tempfile::tempdir()?;
        let input = tempdir.path().join("coarse.mid");
        write_smf(
            &input,
            4,
            vec![vec![NoteSpec::on(0, 64, 100), NoteSpec::off(4, 64)]],
        )?;
        let options = Options {
            sample_rate: SampleRate::new(8)?,
            ..Default::default()
        };

        assert!(matches!(
            convert_file(&input, &Sink::Stdout, &options),
            Err(error::Error::InvalidArgument(_))
        ));
        Ok(())
    }
}
