use crate::constants::CHUNK_SIZE;
use crate::types::{ChunkCoord, VoxelCoord};
use glam::IVec3;

/// Convert a world-space voxel coordinate to its containing chunk coordinate.
pub fn world_to_chunk(world: VoxelCoord) -> ChunkCoord {
    let cs = CHUNK_SIZE as i32;
    IVec3::new(
        world.x.div_euclid(cs),
        world.y.div_euclid(cs),
        world.z.div_euclid(cs),
    )
}

/// Convert a world-space voxel coordinate to its local offset within a chunk.
pub fn world_to_local(world: VoxelCoord) -> IVec3 {
    let cs = CHUNK_SIZE as i32;
    IVec3::new(
        world.x.rem_euclid(cs),
        world.y.rem_euclid(cs),
        world.z.rem_euclid(cs),
    )
}

/// Linear index of a local offset inside a chunk's node array.
pub fn local_index(local: IVec3) -> usize {
    let cs = CHUNK_SIZE as usize;
    local.x as usize + local.y as usize * cs + local.z as usize * cs * cs
}
