use rivulet_core::types::{ChunkCoord, Node, VoxelCoord};

/// Node-level access to a voxel world.
///
/// Reads of positions whose chunk is not loaded return [`Node::IGNORE`].
/// Implementations decide which writes they accept.
pub trait VoxelStore {
    fn get_node(&self, pos: VoxelCoord) -> Node;

    fn set_node(&mut self, pos: VoxelCoord, node: Node);

    /// Coordinate of the loaded chunk owning `pos`, if any.
    fn resolve_chunk(&self, pos: VoxelCoord) -> Option<ChunkCoord>;
}
