//! ramhog grabs memory one chunk at a time until it hits a configured
//! ceiling or the system refuses to give out more, then sits on it until it
//! receives SIGINT or SIGTERM.
//!
//! It is meant for exercising out-of-memory handling, container memory
//! limits and swap pressure.

use clap::error::ErrorKind;
use clap::Parser;
use ramhog::config::{Config, SpeedMode, DEFAULT_CHUNK_SIZE_MB, DEFAULT_MAX_ALLOCATION_MB};
use ramhog::utils::size::{chunk_size_megabytes, max_allocation_megabytes};
use std::ffi::OsString;

const AFTER_HELP: &str = "\
Size format examples:
  100      - 100 MB
  2G       - 2 GB
  1024M    - 1024 MB

Speed modes:
  aggressive - Allocate as fast as possible
  gentle     - Allocate with 100ms delay between chunks

The program will run until manually terminated (Ctrl+C).";

#[derive(Debug, Parser)]
#[command(
    name = "ramhog",
    about = "RAM Hog - Memory allocation utility",
    after_help = AFTER_HELP,
    args_override_self = true
)]
pub struct Ramhog {
    /// Chunk size in MB
    #[arg(
        short = 'c',
        long = "chunk-size",
        value_name = "SIZE",
        default_value_t = DEFAULT_CHUNK_SIZE_MB,
        value_parser = chunk_size_megabytes,
        allow_hyphen_values = true
    )]
    chunk_size: usize,

    /// Maximum allocation (MB/GB, 0=unlimited)
    #[arg(
        short = 'm',
        long = "max-alloc",
        value_name = "SIZE",
        default_value_t = DEFAULT_MAX_ALLOCATION_MB,
        value_parser = max_allocation_megabytes,
        allow_hyphen_values = true
    )]
    max_alloc: usize,

    /// Allocation speed
    #[arg(
        short = 's',
        long = "speed",
        value_name = "MODE",
        value_enum,
        default_value_t = SpeedMode::Aggressive,
        allow_hyphen_values = true
    )]
    speed: SpeedMode,
}

impl Ramhog {
    fn into_config(self) -> Config {
        Config::from_megabytes(self.chunk_size, self.max_alloc, self.speed)
    }
}

pub enum ParseOutcome {
    /// Help output was requested, nothing else should happen.
    Help(clap::Error),
    /// The command line was rejected.
    Invalid(clap::Error),
    Run(Config),
}

pub fn parse_args<I, T>(args: I) -> ParseOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Ramhog::try_parse_from(args) {
        Ok(args) => ParseOutcome::Run(args.into_config()),
        Err(err) if err.kind() == ErrorKind::DisplayHelp => ParseOutcome::Help(err),
        Err(err) => ParseOutcome::Invalid(err),
    }
}
