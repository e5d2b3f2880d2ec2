//! Single source of truth for shared constants.
//! Node bit layouts and liquid tuning values live here so the world store
//! and the liquid engine agree on them.

/// Side length of a chunk in voxels.
pub const CHUNK_SIZE: u32 = 16;

/// Total voxels per chunk (16^3).
pub const VOXELS_PER_CHUNK: u32 = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// param2 bits holding the fill level of a flowing liquid.
pub const LIQUID_LEVEL_MASK: u8 = 0x07;

/// param2 bit set while a flowing liquid is falling straight down.
pub const LIQUID_FLOW_DOWN_MASK: u8 = 0x08;

/// Highest fill level a flowing liquid can carry.
pub const LIQUID_LEVEL_MAX: i8 = LIQUID_LEVEL_MASK as i8;

/// Implied level of a liquid source (one above the flowing maximum).
pub const LIQUID_LEVEL_SOURCE: i8 = LIQUID_LEVEL_MAX + 1;

/// Bonus added to the level of a flowing liquid directly above.
pub const WATER_DROP_BOOST: i8 = 4;

/// param1 bits holding the day light bank.
pub const LIGHT_DAY_MASK: u8 = 0x0F;

/// param1 bits holding the night light bank.
pub const LIGHT_NIGHT_MASK: u8 = 0xF0;

/// Default number of voxels one liquid invocation may process.
pub const DEFAULT_LIQUID_LOOP_MAX: u32 = 100_000;

/// Rollback suspect lookup radius (in voxels) for liquid changes.
pub const ROLLBACK_SUSPECT_RANGE: u32 = 83;

/// Rollback suspect lookup nearness for liquid changes.
pub const ROLLBACK_SUSPECT_NEARNESS: u32 = 1;
