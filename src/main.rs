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
use std::process::ExitCode;

use clap::{crate_version, Parser};
use midiarray::config::{self, Settings};
use midiarray::output::Sink;
use midiarray::resample::Strategy;
use midiarray::{convert_file, Error};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Converts MIDI files to the note arrays expected by the LayerOne demo board."
)]
struct Cli {
    /// The MIDI file to convert.
    #[arg(value_name = "MIDI_FILE")]
    midi_file: PathBuf,

    /// The number of samples to take per beat. Must not exceed the file's resolution.
    #[arg(short, long)]
    sample_rate: Option<u32>,

    /// Include velocity arrays in the output.
    #[arg(short, long)]
    velocity: bool,

    /// Leave out velocity arrays even if the settings file asks for them.
    #[arg(long, conflicts_with = "velocity")]
    no_velocity: bool,

    /// Write to the given file instead of stdout.
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<PathBuf>,

    /// The prefix for the array names. Defaults to "song_ch".
    #[arg(short, long)]
    prefix: Option<String>,

    /// How each sample is picked from the ticks it covers. Defaults to point.
    #[arg(short = 'm', long, value_enum)]
    strategy: Option<Strategy>,

    /// The number of octaves subtracted when naming notes. Defaults to 2, which names
    /// MIDI note 64 as E3.
    #[arg(long)]
    octave_offset: Option<u8>,

    /// A YAML settings file. Command line flags take precedence over its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// The settings given on the command line.
    fn overrides(&self) -> Settings {
        Settings {
            sample_rate: self.sample_rate,
            prefix: self.prefix.clone(),
            velocity: match (self.velocity, self.no_velocity) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            },
            strategy: self.strategy,
            octave_offset: self.octave_offset,
            declaration: None,
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let settings = match &cli.config {
        Some(path) => config::load_settings(path)?,
        None => Settings::default(),
    };
    let options = settings.merge(cli.overrides()).resolve()?;
    debug!(?options, "Resolved options");

    let sink = Sink::new(cli.output);
    if let Some(path) = convert_file(&cli.midi_file, &sink, &options)? {
        println!("Output saved to: {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    exit_code(run(cli))
}

/// Reports the outcome of a run and maps it to the process exit code.
fn exit_code(result: Result<(), Error>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(err = %e, "Conversion failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
