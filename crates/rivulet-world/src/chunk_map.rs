use crate::chunk::{Chunk, ChunkState};
use rivulet_core::types::ChunkCoord;
use std::collections::HashMap;

/// Spatial container for all loaded chunks.
#[derive(Debug, Default)]
pub struct ChunkMap {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an empty chunk at the given coordinate. Loading an already
    /// loaded chunk keeps its contents. Returns true if newly loaded.
    pub fn load_chunk(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }
        self.chunks.insert(coord, Chunk::new_empty(coord));
        true
    }

    /// Get a chunk by coordinate.
    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    /// Get a mutable chunk by coordinate.
    pub fn get_mut(&mut self, coord: &ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(coord)
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.chunks.contains_key(coord)
    }

    /// Mark every loaded chunk clean.
    pub fn mark_all_clean(&mut self) {
        for chunk in self.chunks.values_mut() {
            chunk.mark_clean();
        }
    }

    /// Number of loaded chunks.
    pub fn loaded_count(&self) -> u32 {
        self.chunks.len() as u32
    }

    /// Get counts: (total_loaded, modified, clean)
    pub fn chunk_counts(&self) -> (u32, u32, u32) {
        let mut modified = 0u32;
        let mut clean = 0u32;
        for chunk in self.chunks.values() {
            match chunk.state {
                ChunkState::Modified => modified += 1,
                ChunkState::Clean => clean += 1,
            }
        }
        (self.chunks.len() as u32, modified, clean)
    }
}
