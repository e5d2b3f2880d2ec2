use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::constants::{LIGHT_DAY_MASK, LIGHT_NIGHT_MASK, LIQUID_FLOW_DOWN_MASK, LIQUID_LEVEL_MASK};

/// Newtype for content-type identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentId(pub u16);

impl ContentId {
    /// Empty space. Floodable, never a liquid.
    pub const AIR: ContentId = ContentId(0);
    /// Placeholder for voxels whose chunk is not loaded. Never stored.
    pub const IGNORE: ContentId = ContentId(1);
    /// First id handed out to registered content.
    pub const FIRST_USER: ContentId = ContentId(2);
}

impl Default for ContentId {
    fn default() -> Self {
        Self::AIR
    }
}

/// Chunk coordinate in chunk-space (each unit = CHUNK_SIZE voxels).
pub type ChunkCoord = IVec3;

/// World coordinate in voxel-space.
pub type VoxelCoord = IVec3;

/// Which of the two light banks stored in `param1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightBank {
    Day,
    Night,
}

/// One voxel: a content id plus two parameter bytes.
///
/// `param1` holds the light banks (day in the low nibble, night in the high
/// nibble). `param2` is content specific; for flowing liquids bits 0..=2 are
/// the fill level and bit 3 is the flowing-down flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Node {
    pub content: ContentId,
    pub param1: u8,
    pub param2: u8,
}

impl Node {
    pub const AIR: Node = Node::new(ContentId::AIR);
    pub const IGNORE: Node = Node::new(ContentId::IGNORE);

    pub const fn new(content: ContentId) -> Self {
        Self {
            content,
            param1: 0,
            param2: 0,
        }
    }

    pub const fn with_param2(content: ContentId, param2: u8) -> Self {
        Self {
            content,
            param1: 0,
            param2,
        }
    }

    /// Liquid fill level stored in param2. Only meaningful for flowing content.
    pub fn liquid_level(self) -> u8 {
        self.param2 & LIQUID_LEVEL_MASK
    }

    /// Whether the flowing-down bit is set. Only meaningful for flowing content.
    pub fn is_flowing_down(self) -> bool {
        self.param2 & LIQUID_FLOW_DOWN_MASK == LIQUID_FLOW_DOWN_MASK
    }

    /// Replace the liquid bits of param2 with a level and flowing-down flag.
    pub fn set_liquid(&mut self, level: u8, flowing_down: bool) {
        let flow = if flowing_down { LIQUID_FLOW_DOWN_MASK } else { 0 };
        self.param2 = flow | (level & LIQUID_LEVEL_MASK);
    }

    /// Clear the liquid bits of param2, leaving the rest untouched.
    pub fn clear_liquid(&mut self) {
        self.param2 &= !(LIQUID_LEVEL_MASK | LIQUID_FLOW_DOWN_MASK);
    }

    pub fn light(self, bank: LightBank) -> u8 {
        match bank {
            LightBank::Day => self.param1 & LIGHT_DAY_MASK,
            LightBank::Night => (self.param1 & LIGHT_NIGHT_MASK) >> 4,
        }
    }

    pub fn set_light(&mut self, bank: LightBank, value: u8) {
        let value = value & 0x0F;
        match bank {
            LightBank::Day => self.param1 = (self.param1 & LIGHT_NIGHT_MASK) | value,
            LightBank::Night => self.param1 = (self.param1 & LIGHT_DAY_MASK) | (value << 4),
        }
    }
}
