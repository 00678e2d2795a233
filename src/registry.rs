//! Ownership of every block the hog has allocated.
//!
//! All memory requests go through the fallible reservation APIs so running
//! out of memory surfaces as an error instead of aborting the process. A
//! failed request never disturbs what is already held.

use crate::prelude::*;
use std::hint::black_box;

pub const INITIAL_CAPACITY: usize = 16;
pub const TOUCH_PATTERN: u8 = 0xAA;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to expand the chunk list to {capacity} entries")]
    Grow { capacity: usize },
    #[error("failed to allocate a chunk of {size} bytes")]
    Chunk { size: usize },
}

/// A block of memory whose every byte has been written to.
pub struct Chunk {
    data: Vec<u8>,
}

impl Chunk {
    fn allocate(size: usize) -> Result<Self, RegistryError> {
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| RegistryError::Chunk { size })?;

        // Fresh pages are only mapped lazily by the OS, writing to them is
        // what forces it to actually back them.
        data.resize(size, TOUCH_PATTERN);

        Ok(Chunk {
            data: black_box(data),
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct Summary {
    pub chunks: usize,
    pub bytes: usize,
}

#[derive(Default)]
pub struct ChunkRegistry {
    chunks: Vec<Chunk>,
    total_bytes: usize,
}

impl ChunkRegistry {
    pub fn new() -> Self {
        ChunkRegistry::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.chunks.capacity()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            chunks: self.chunks.len(),
            bytes: self.total_bytes,
        }
    }

    /// Makes room for one more chunk, doubling the list when it's full.
    pub fn ensure_capacity(&mut self) -> Result<(), RegistryError> {
        if self.chunks.len() < self.chunks.capacity() {
            return Ok(());
        }

        let capacity = match self.chunks.capacity() {
            0 => INITIAL_CAPACITY,
            current => current.saturating_mul(2),
        };
        self.reserve_to(capacity)?;

        debug!("chunk list expanded to {} entries", self.chunks.capacity());
        Ok(())
    }

    /// Grows the list to hold at least `capacity` chunks. A failed attempt
    /// leaves the list and every chunk in it untouched.
    fn reserve_to(&mut self, capacity: usize) -> Result<(), RegistryError> {
        self.chunks
            .try_reserve_exact(capacity.saturating_sub(self.chunks.len()))
            .map_err(|_| RegistryError::Grow { capacity })
    }

    /// Allocates and touches a new chunk of `size` bytes, returning how many
    /// chunks are held afterwards. On error nothing held changes.
    pub fn append(&mut self, size: usize) -> Result<usize, RegistryError> {
        self.ensure_capacity()?;
        let chunk = Chunk::allocate(size)?;

        self.chunks.push(chunk);
        self.total_bytes += size;
        Ok(self.chunks.len())
    }

    /// Frees every chunk along with the list holding them.
    pub fn release(self) -> Summary {
        let summary = self.summary();
        drop(self.chunks);
        summary
    }
}
