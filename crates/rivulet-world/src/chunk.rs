use glam::IVec3;
use rivulet_core::constants::VOXELS_PER_CHUNK;
use rivulet_core::math::local_index;
use rivulet_core::types::{ChunkCoord, Node};

/// Chunk lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// Written to since it was loaded or last marked clean.
    Modified,
    /// No writes since it was loaded or last marked clean.
    Clean,
}

/// A 16^3 block of nodes.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Chunk coordinate in chunk-space.
    pub coord: ChunkCoord,
    /// Current lifecycle state.
    pub state: ChunkState,
    nodes: Vec<Node>,
}

impl Chunk {
    /// Create a chunk filled with air.
    pub fn new_empty(coord: ChunkCoord) -> Self {
        Self {
            coord,
            state: ChunkState::Clean,
            nodes: vec![Node::AIR; VOXELS_PER_CHUNK as usize],
        }
    }

    /// Node at a local offset (each component in `0..CHUNK_SIZE`).
    pub fn get(&self, local: IVec3) -> Node {
        self.nodes[local_index(local)]
    }

    /// Replace the node at a local offset. Returns the previous node.
    pub fn set(&mut self, local: IVec3, node: Node) -> Node {
        let old = std::mem::replace(&mut self.nodes[local_index(local)], node);
        self.state = ChunkState::Modified;
        old
    }

    pub fn mark_clean(&mut self) {
        self.state = ChunkState::Clean;
    }

    pub fn is_modified(&self) -> bool {
        self.state == ChunkState::Modified
    }
}
