pub mod chunk;
pub mod chunk_map;
pub mod store;

use chunk_map::ChunkMap;
use glam::IVec3;
use rivulet_core::math::{world_to_chunk, world_to_local};
use rivulet_core::types::{ChunkCoord, ContentId, Node, VoxelCoord};

pub use store::VoxelStore;

/// In-memory chunked voxel world.
///
/// Positions outside loaded chunks read as [`Node::IGNORE`]. Writes into
/// unloaded chunks and writes of the `IGNORE` sentinel are refused.
#[derive(Debug, Default)]
pub struct World {
    chunk_map: ChunkMap,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every chunk overlapping the inclusive voxel box `min..=max`.
    /// Returns the number of newly loaded chunks.
    pub fn load_region(&mut self, min: VoxelCoord, max: VoxelCoord) -> u32 {
        let (lo, hi) = (world_to_chunk(min.min(max)), world_to_chunk(min.max(max)));
        let mut loaded = 0;
        for cx in lo.x..=hi.x {
            for cy in lo.y..=hi.y {
                for cz in lo.z..=hi.z {
                    if self.chunk_map.load_chunk(IVec3::new(cx, cy, cz)) {
                        loaded += 1;
                    }
                }
            }
        }
        log::debug!("Loaded {loaded} chunks for region {min}..={max}");
        loaded
    }

    /// Write `node` to every voxel in the inclusive box `min..=max`.
    /// Returns how many writes were accepted.
    pub fn fill(&mut self, min: VoxelCoord, max: VoxelCoord, node: Node) -> usize {
        let (lo, hi) = (min.min(max), min.max(max));
        let mut written = 0;
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    if self.try_set_node(IVec3::new(x, y, z), node) {
                        written += 1;
                    }
                }
            }
        }
        written
    }

    fn try_set_node(&mut self, pos: VoxelCoord, node: Node) -> bool {
        if node.content == ContentId::IGNORE {
            log::warn!("Refusing to store the ignore sentinel at {pos}");
            return false;
        }
        let Some(chunk) = self.chunk_map.get_mut(&world_to_chunk(pos)) else {
            log::warn!("Refusing write at {pos}: chunk not loaded");
            return false;
        };
        chunk.set(world_to_local(pos), node);
        true
    }

    /// Get the chunk map for reading.
    pub fn chunk_map(&self) -> &ChunkMap {
        &self.chunk_map
    }

    /// Get counts: (total_loaded, modified, clean)
    pub fn chunk_counts(&self) -> (u32, u32, u32) {
        self.chunk_map.chunk_counts()
    }

    /// Forget which chunks were written. Chunks written afterwards show up
    /// as modified in [`World::chunk_counts`].
    pub fn mark_all_clean(&mut self) {
        self.chunk_map.mark_all_clean();
    }
}

impl VoxelStore for World {
    fn get_node(&self, pos: VoxelCoord) -> Node {
        self.chunk_map
            .get(&world_to_chunk(pos))
            .map_or(Node::IGNORE, |chunk| chunk.get(world_to_local(pos)))
    }

    fn set_node(&mut self, pos: VoxelCoord, node: Node) {
        self.try_set_node(pos, node);
    }

    fn resolve_chunk(&self, pos: VoxelCoord) -> Option<ChunkCoord> {
        let coord = world_to_chunk(pos);
        self.chunk_map.contains(&coord).then_some(coord)
    }
}
