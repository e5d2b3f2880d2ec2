use glam::IVec3;
use rivulet_core::content::ContentRegistry;
use rivulet_core::types::{ContentId, Node, VoxelCoord};
use rivulet_world::{VoxelStore, World};

use crate::error::BenchError;

/// Content ids the scenes place, looked up by name in the loaded registry.
#[derive(Debug, Clone, Copy)]
pub struct SceneContents {
    pub water: ContentId,
    pub lava: ContentId,
    pub stone: ContentId,
    pub torch: ContentId,
    pub boat: ContentId,
}

impl SceneContents {
    pub fn resolve(registry: &ContentRegistry) -> Result<Self, BenchError> {
        let id = |name: &str| {
            registry
                .id_of(name)
                .ok_or_else(|| BenchError::MissingContent(name.to_string()))
        };
        Ok(Self {
            water: id("water_source")?,
            lava: id("lava_source")?,
            stone: id("stone")?,
            torch: id("torch")?,
            boat: id("boat")?,
        })
    }
}

/// Configuration for a single liquid scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub description: &'static str,
    /// Inclusive corners of the loaded region.
    pub region_min: [i32; 3],
    pub region_max: [i32; 3],
    /// Place terrain and liquids. Returns the voxels to schedule.
    pub build: fn(&mut World, &SceneContents) -> Vec<VoxelCoord>,
}

impl SceneConfig {
    /// Load the scene region into a fresh world and populate it.
    pub fn instantiate(&self, contents: &SceneContents) -> (World, Vec<VoxelCoord>) {
        let mut world = World::new();
        world.load_region(IVec3::from(self.region_min), IVec3::from(self.region_max));
        let seeds = (self.build)(&mut world, contents);
        (world, seeds)
    }
}

const HALF: i32 = 48;
const FLOOR_TOP: i32 = -1;

fn stone_floor(world: &mut World, contents: &SceneContents) {
    world.fill(
        IVec3::new(-HALF, -16, -HALF),
        IVec3::new(HALF - 1, FLOOR_TOP, HALF - 1),
        Node::new(contents.stone),
    );
}

fn place(world: &mut World, pos: VoxelCoord, content: ContentId) -> VoxelCoord {
    world.set_node(pos, Node::new(content));
    pos
}

fn build_spring(world: &mut World, contents: &SceneContents) -> Vec<VoxelCoord> {
    stone_floor(world, contents);
    vec![place(world, IVec3::ZERO, contents.water)]
}

fn build_waterfall(world: &mut World, contents: &SceneContents) -> Vec<VoxelCoord> {
    stone_floor(world, contents);
    // Ledge holding the source high above the floor.
    world.fill(IVec3::new(-2, 23, -2), IVec3::new(2, 23, 2), Node::new(contents.stone));
    vec![place(world, IVec3::new(0, 24, 0), contents.water)]
}

fn build_lava_pool(world: &mut World, contents: &SceneContents) -> Vec<VoxelCoord> {
    stone_floor(world, contents);
    vec![place(world, IVec3::ZERO, contents.lava)]
}

fn build_flooded_camp(world: &mut World, contents: &SceneContents) -> Vec<VoxelCoord> {
    stone_floor(world, contents);
    for x in (-12..=12).step_by(4) {
        for z in (-12..=12).step_by(4) {
            world.set_node(IVec3::new(x, 0, z), Node::new(contents.torch));
        }
    }
    world.set_node(IVec3::new(3, 1, 3), Node::new(contents.boat));
    world.set_node(IVec3::new(3, 0, 3), Node::new(contents.water));
    vec![
        place(world, IVec3::new(-14, 0, 0), contents.water),
        IVec3::new(3, 0, 3),
    ]
}

fn build_sheet(world: &mut World, contents: &SceneContents) -> Vec<VoxelCoord> {
    stone_floor(world, contents);
    let mut seeds = Vec::new();
    for x in (-HALF + 4..HALF - 4).step_by(6) {
        for z in (-HALF + 4..HALF - 4).step_by(6) {
            seeds.push(place(world, IVec3::new(x, 0, z), contents.water));
        }
    }
    seeds
}

/// Return the standard suite of liquid scenes.
pub fn standard_scenes() -> Vec<SceneConfig> {
    let region_min = [-HALF, -16, -HALF];
    let region_max = [HALF - 1, 31, HALF - 1];
    vec![
        SceneConfig {
            name: "spring",
            description: "single water source on a flat floor",
            region_min,
            region_max,
            build: build_spring,
        },
        SceneConfig {
            name: "waterfall",
            description: "water source on a ledge 24 voxels up",
            region_min,
            region_max,
            build: build_waterfall,
        },
        SceneConfig {
            name: "lava-pool",
            description: "viscous short-range lava source",
            region_min,
            region_max,
            build: build_lava_pool,
        },
        SceneConfig {
            name: "flooded-camp",
            description: "water spreading over floodable torches and under a boat",
            region_min,
            region_max,
            build: build_flooded_camp,
        },
        SceneConfig {
            name: "sheet",
            description: "grid of renewable sources filling the floor",
            region_min,
            region_max,
            build: build_sheet,
        },
    ]
}

/// Look up a scene by name.
pub fn find_scene(name: &str) -> Option<SceneConfig> {
    standard_scenes().into_iter().find(|s| s.name == name)
}
