use crate::utils::size::{bytes_to_megabytes, megabytes_to_bytes};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_CHUNK_SIZE_MB: usize = 100;
pub const DEFAULT_MAX_ALLOCATION_MB: usize = 0;
pub const GENTLE_DELAY: Duration = Duration::from_millis(100);
pub const HOLD_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, clap::ValueEnum)]
pub enum SpeedMode {
    /// Allocate as fast as possible
    #[default]
    Aggressive,
    /// Allocate with a short delay between chunks
    Gentle,
}

impl SpeedMode {
    /// How long to wait after each successful chunk.
    pub fn pause(self) -> Option<Duration> {
        match self {
            SpeedMode::Aggressive => None,
            SpeedMode::Gentle => Some(GENTLE_DELAY),
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            SpeedMode::Aggressive => "aggressive",
            SpeedMode::Gentle => "gentle",
        }
    }
}

impl fmt::Display for SpeedMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// What to allocate and how fast. Built once at startup and only read
/// afterwards.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Config {
    /// Bytes requested per chunk, never zero.
    pub chunk_size: usize,
    /// Ceiling on the total bytes held. `None` means unlimited.
    pub max_allocation: Option<usize>,
    pub speed: SpeedMode,
}

impl Config {
    /// Builds a configuration from sizes in megabytes. A zero maximum is
    /// the same as not setting one.
    pub fn from_megabytes(chunk_size_mb: usize, max_allocation_mb: usize, speed: SpeedMode) -> Self {
        Config {
            chunk_size: megabytes_to_bytes(chunk_size_mb),
            max_allocation: match megabytes_to_bytes(max_allocation_mb) {
                0 => None,
                bytes => Some(bytes),
            },
            speed,
        }
    }

    /// Whether allocating one more chunk on top of `total` bytes would go
    /// past the configured maximum.
    pub fn would_exceed(&self, total: usize) -> bool {
        match self.max_allocation {
            Some(max) => total
                .checked_add(self.chunk_size)
                .map_or(true, |next| next > max),
            None => false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::from_megabytes(
            DEFAULT_CHUNK_SIZE_MB,
            DEFAULT_MAX_ALLOCATION_MB,
            SpeedMode::default(),
        )
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "chunk size: {:.2} MB, ", bytes_to_megabytes(self.chunk_size))?;
        match self.max_allocation {
            Some(max) => write!(f, "maximum allocation: {:.2} MB, ", bytes_to_megabytes(max))?,
            None => write!(f, "maximum allocation: unlimited, ")?,
        }
        write!(f, "speed mode: {}", self.speed)
    }
}
