//! The allocation loop.
//!
//! Growth keeps appending chunks until the configured ceiling, memory
//! exhaustion or a stop request. If it stopped on its own, the memory is then
//! held until a stop request arrives. Everything is released at the end.

use crate::config::{Config, HOLD_INTERVAL};
use crate::prelude::*;
use crate::registry::{ChunkRegistry, RegistryError, Summary};
use crate::shutdown::RunState;
use crate::utils::size::bytes_to_megabytes;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GrowthOutcome {
    /// The next chunk would have gone past the configured maximum.
    LimitReached,
    /// The system refused to hand out more memory.
    Exhausted,
    /// A stop was requested while still growing.
    Interrupted,
}

pub struct Hog<'a> {
    config: &'a Config,
    state: &'a RunState,
    registry: ChunkRegistry,
}

impl<'a> Hog<'a> {
    pub fn new(config: &'a Config, state: &'a RunState) -> Self {
        Hog {
            config,
            state,
            registry: ChunkRegistry::new(),
        }
    }

    pub fn registry(&self) -> &ChunkRegistry {
        &self.registry
    }

    pub fn grow(&mut self) -> GrowthOutcome {
        while self.state.is_running() {
            if self.config.would_exceed(self.registry.total_bytes()) {
                info!(
                    "reached maximum allocation limit of {:.2} MB, stopping allocation",
                    bytes_to_megabytes(self.config.max_allocation.unwrap_or_default())
                );
                return GrowthOutcome::LimitReached;
            }

            match self.registry.append(self.config.chunk_size) {
                Ok(count) => info!(
                    "allocated {:.2} MB so far (chunk #{})",
                    bytes_to_megabytes(self.registry.total_bytes()),
                    count
                ),
                Err(err @ RegistryError::Grow { .. }) => {
                    error!(
                        "allocation failed after {:.2} MB: {}",
                        bytes_to_megabytes(self.registry.total_bytes()),
                        err
                    );
                    return GrowthOutcome::Exhausted;
                }
                Err(err @ RegistryError::Chunk { .. }) => {
                    info!(
                        "allocation failed after {:.2} MB: {}",
                        bytes_to_megabytes(self.registry.total_bytes()),
                        err
                    );
                    return GrowthOutcome::Exhausted;
                }
            }

            if let Some(delay) = self.config.speed.pause() {
                self.state.pause(delay);
            }
        }

        GrowthOutcome::Interrupted
    }

    /// Keeps the memory around, untouched, until a stop is requested.
    pub fn hold(&self) {
        info!("allocation complete, holding memory until interrupted (press Ctrl+C to exit)");
        while self.state.pause(HOLD_INTERVAL) {}
    }

    /// Grows, holds if growth ended on its own, then frees everything.
    pub fn run(mut self) -> Summary {
        let outcome = self.grow();
        if outcome != GrowthOutcome::Interrupted && self.state.is_running() {
            self.hold();
        }

        info!("cleaning up...");
        let summary = self.registry.release();
        info!(
            "total memory allocated: {:.2} MB in {} chunks",
            bytes_to_megabytes(summary.bytes),
            summary.chunks
        );
        summary
    }
}
