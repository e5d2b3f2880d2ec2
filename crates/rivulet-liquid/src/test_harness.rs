//! Deterministic fixtures and end-to-end scenarios for the liquid system.
//!
//! Every scenario uses a 64^3 world centred on the origin: air everywhere,
//! dirt for y <= 6, nothing loaded outside -32..=31 on any axis.

use std::sync::Arc;

use glam::IVec3;
use rivulet_core::content::{ContentDef, ContentRegistry, LiquidRole};
use rivulet_core::types::{ChunkCoord, ContentId, Node, VoxelCoord};
use rivulet_world::{VoxelStore, World};

use crate::clock::ManualClock;
use crate::config::LiquidConfig;
use crate::hooks::{ChangeRecord, LiquidHooks};
use crate::rollback::{RollbackJournal, RollbackLog};
use crate::system::LiquidSystem;

pub const WORLD_MIN: i32 = -32;
pub const WORLD_MAX: i32 = 31;
pub const FLOOR_Y: i32 = 6;

/// Registry of test content plus the ids tests refer to.
pub struct Water {
    pub registry: Arc<ContentRegistry>,
    pub source: ContentId,
    pub flowing: ContentId,
    pub dirt: ContentId,
    pub lava: ContentId,
    pub torch: ContentId,
    pub boat: ContentId,
}

impl Water {
    pub fn source_node(&self) -> Node {
        Node::new(self.source)
    }

    pub fn flowing_node(&self, level: u8, flowing_down: bool) -> Node {
        let mut node = Node::new(self.flowing);
        node.set_liquid(level, flowing_down);
        node
    }

    /// Node from a two-character code: content (' ' air, 'w' flowing,
    /// 'W' source, 'D' dirt, anything else ignore) then a param2 digit.
    pub fn node(&self, code: &str) -> Node {
        let mut chars = code.chars();
        let content = match chars.next() {
            Some(' ') => ContentId::AIR,
            Some('w') => self.flowing,
            Some('W') => self.source,
            Some('D') => self.dirt,
            _ => ContentId::IGNORE,
        };
        let param2 = chars.next().and_then(|c| c.to_digit(10)).unwrap_or(0) as u8;
        Node::with_param2(content, param2)
    }
}

fn liquid_def(
    name: &str,
    role: LiquidRole,
    flowing: Option<&str>,
    source: Option<&str>,
    viscosity: u8,
    range: u8,
    renewable: bool,
) -> ContentDef {
    ContentDef {
        liquid: role,
        flowing_alternative: flowing.map(str::to_owned),
        source_alternative: source.map(str::to_owned),
        renewable,
        viscosity,
        range,
        ..ContentDef::solid(name)
    }
}

fn build(water_source: ContentDef, water_flowing: ContentDef) -> Water {
    let lava = liquid_def("lava", LiquidRole::Source, Some("lava_flowing"), Some("lava"), 1, 8, true);
    let lava_flowing = liquid_def(
        "lava_flowing",
        LiquidRole::Flowing,
        Some("lava_flowing"),
        Some("lava"),
        1,
        8,
        true,
    );
    let torch = ContentDef {
        floodable: true,
        ..ContentDef::solid("torch")
    };
    let boat = ContentDef {
        floats: true,
        ..ContentDef::solid("boat")
    };

    let mut registry = ContentRegistry::new();
    let ids = registry
        .register_all(&[
            water_source,
            water_flowing,
            ContentDef::solid("dirt"),
            lava,
            lava_flowing,
            torch,
            boat,
        ])
        .unwrap();
    assert!(registry.resolve_crossrefs().is_empty());

    Water {
        registry: Arc::new(registry),
        source: ids[0],
        flowing: ids[1],
        dirt: ids[2],
        lava: ids[3],
        torch: ids[5],
        boat: ids[6],
    }
}

/// Correctly paired water: both forms name each other.
pub fn water_with(viscosity: u8, range: u8, renewable: bool) -> Water {
    let def = |name, role| {
        liquid_def(
            name,
            role,
            Some("water_flowing"),
            Some("water_source"),
            viscosity,
            range,
            renewable,
        )
    };
    build(
        def("water_source", LiquidRole::Source),
        def("water_flowing", LiquidRole::Flowing),
    )
}

pub fn paired_water(viscosity: u8, range: u8) -> Water {
    water_with(viscosity, range, true)
}

/// Water set up the way the reference acceptance trace expects: no source
/// alternatives, and the flowing form names the source as its flowing
/// alternative.
pub fn mispaired_water() -> Water {
    build(
        liquid_def("water_source", LiquidRole::Source, Some("water_flowing"), None, 7, 7, true),
        liquid_def("water_flowing", LiquidRole::Flowing, Some("water_source"), None, 7, 7, true),
    )
}

pub fn water_world(water: &Water) -> World {
    let mut world = World::new();
    world.load_region(IVec3::splat(WORLD_MIN), IVec3::splat(WORLD_MAX));
    world.fill(
        IVec3::splat(WORLD_MIN),
        IVec3::new(WORLD_MAX, FLOOR_Y, WORLD_MAX),
        Node::new(water.dirt),
    );
    world
}

pub fn system_for(water: &Water, config: LiquidConfig) -> LiquidSystem<ManualClock> {
    LiquidSystem::new(water.registry.clone(), config, ManualClock::new(0)).unwrap()
}

/// Hooks that record every call.
#[derive(Default)]
pub struct Recorder {
    pub veto_floods: bool,
    pub floods: Vec<(VoxelCoord, Node, Node)>,
    pub lighting_batches: Vec<usize>,
    pub falling: Vec<VoxelCoord>,
    pub transformed: Vec<Vec<ChangeRecord>>,
    pub journal: Option<RollbackJournal>,
}

impl LiquidHooks for Recorder {
    fn on_flood(&mut self, pos: VoxelCoord, old: Node, new: Node) -> bool {
        self.floods.push((pos, old, new));
        self.veto_floods
    }

    fn update_lighting(&mut self, changes: &[ChangeRecord]) {
        self.lighting_batches.push(changes.len());
    }

    fn check_for_falling(&mut self, pos: VoxelCoord) {
        self.falling.push(pos);
    }

    fn on_liquid_transformed(&mut self, changes: &[ChangeRecord]) {
        self.transformed.push(changes.to_vec());
    }

    fn rollback(&mut self) -> Option<&mut dyn RollbackLog> {
        self.journal.as_mut().map(|j| j as &mut dyn RollbackLog)
    }
}

/// Run until the queue drains. Returns the number of runs taken.
pub fn run_until_settled<S: VoxelStore>(
    system: &mut LiquidSystem<ManualClock>,
    store: &mut S,
    hooks: &mut Recorder,
    max_runs: usize,
) -> usize {
    for runs in 1..=max_runs {
        system.run(store, hooks);
        if system.queue_len() == 0 {
            return runs;
        }
    }
    panic!("liquid did not settle within {max_runs} runs");
}

/// In-memory store with no chunks: every write lands, nothing is resident.
#[derive(Default)]
pub struct LooseStore {
    nodes: std::collections::HashMap<VoxelCoord, Node>,
}

impl VoxelStore for LooseStore {
    fn get_node(&self, pos: VoxelCoord) -> Node {
        self.nodes.get(&pos).copied().unwrap_or(Node::AIR)
    }

    fn set_node(&mut self, pos: VoxelCoord, node: Node) {
        self.nodes.insert(pos, node);
    }

    fn resolve_chunk(&self, _pos: VoxelCoord) -> Option<ChunkCoord> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivulet_core::types::LightBank;

    fn at(x: i32, y: i32, z: i32) -> IVec3 {
        IVec3::new(x, y, z)
    }

    #[test]
    fn test_reference_trace() {
        let water = mispaired_water();
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let mut hooks = Recorder::default();
        let content = |world: &World, p: IVec3| world.get_node(p).content;

        assert_eq!(content(&world, at(0, 10, 0)), ContentId::AIR);
        world.set_node(at(0, 10, 0), water.node("W0"));
        assert_eq!(content(&world, at(0, 10, 0)), water.source);
        system.schedule(at(0, 10, 0));

        system.run(&mut world, &mut hooks);
        system.run(&mut world, &mut hooks);
        assert_eq!(hooks.transformed.len(), 2);
        assert_eq!(content(&world, at(0, 10, 0)), water.source);
        assert_eq!(content(&world, at(0, 9, 0)), water.flowing);
        assert_eq!(content(&world, at(0, 8, 0)), ContentId::AIR);

        hooks.transformed.clear();
        system.run(&mut world, &mut hooks);
        assert_eq!(hooks.transformed.len(), 1);
        assert_eq!(content(&world, at(0, 8, 0)), water.source);
        assert_eq!(content(&world, at(0, 7, 0)), ContentId::AIR);

        let sides = [at(-1, 7, 0), at(1, 7, 0), at(0, 7, -1), at(0, 7, 1)];
        let diagonals = [at(-1, 7, 1), at(1, 7, 1), at(-1, 7, -1), at(1, 7, -1)];

        hooks.transformed.clear();
        system.run(&mut world, &mut hooks);
        assert_eq!(hooks.transformed.len(), 1);
        assert_eq!(content(&world, at(0, 7, 0)), water.flowing);
        assert_eq!(content(&world, at(0, 6, 0)), water.dirt);
        for p in sides {
            assert_eq!(content(&world, p), ContentId::AIR, "{p}");
        }

        hooks.transformed.clear();
        system.run(&mut world, &mut hooks);
        assert_eq!(hooks.transformed.len(), 1);
        assert_eq!(content(&world, at(0, 7, 0)), water.flowing);
        for p in sides {
            assert_eq!(content(&world, p), water.source, "{p}");
        }
        for p in diagonals {
            assert_eq!(content(&world, p), ContentId::AIR, "{p}");
        }
    }

    #[test]
    fn test_paired_source_falls() {
        let water = paired_water(1, 8);
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let mut hooks = Recorder::default();

        let mut lit = Node::AIR;
        lit.set_light(LightBank::Day, 15);
        world.set_node(at(0, 9, 0), lit);
        world.set_node(at(0, 10, 0), water.source_node());
        system.schedule(at(0, 10, 0));

        let first = system.run(&mut world, &mut hooks);
        assert_eq!(first.changed, 0, "a paired source is already settled");
        assert_eq!(first.queue_len, 5);
        assert!(hooks.transformed.is_empty());
        assert!(hooks.lighting_batches.is_empty());

        let second = system.run(&mut world, &mut hooks);
        assert_eq!(second.changed, 5);
        assert_eq!(hooks.lighting_batches, vec![5]);
        assert_eq!(hooks.transformed.len(), 1);
        // x = -1 and z = -1 sit in neighboring chunks
        assert_eq!(second.modified_chunks.len(), 3);

        assert_eq!(world.get_node(at(0, 10, 0)), water.source_node());
        assert_eq!(world.get_node(at(0, 9, 0)), water.flowing_node(7, true));
        assert_eq!(world.get_node(at(0, 10, 1)), water.flowing_node(7, true));
        assert_eq!(world.get_node(at(0, 8, 0)), Node::AIR);
        assert_eq!(world.get_node(at(0, 9, 0)).light(LightBank::Day), 0);

        let record = hooks.transformed[0]
            .iter()
            .find(|r| r.pos == at(0, 9, 0))
            .unwrap();
        assert_eq!(record.old, lit);
    }

    #[test]
    fn test_settled_world_is_fixed_point() {
        let water = paired_water(1, 8);
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let mut hooks = Recorder::default();
        world.set_node(at(0, 7, 0), water.source_node());
        system.schedule(at(0, 7, 0));
        run_until_settled(&mut system, &mut world, &mut hooks, 100);

        for x in -10..=10 {
            for z in -10..=10 {
                for y in 7..=8 {
                    system.schedule(at(x, y, z));
                }
            }
        }
        let mut quiet = Recorder::default();
        let report = system.run(&mut world, &mut quiet);
        assert!(report.processed > 0);
        assert_eq!(report.changed, 0);
        assert!(report.modified_chunks.is_empty());
        assert!(quiet.transformed.is_empty());
        assert!(quiet.lighting_batches.is_empty());
    }

    #[test]
    fn test_pool_levels_fall_with_distance() {
        let water = paired_water(1, 8);
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let mut hooks = Recorder::default();
        world.set_node(at(0, 7, 0), water.source_node());
        system.schedule(at(0, 7, 0));
        run_until_settled(&mut system, &mut world, &mut hooks, 100);

        for d in 1..=8 {
            assert_eq!(
                world.get_node(at(d, 7, 0)),
                water.flowing_node(8 - d as u8, false),
                "distance {d}"
            );
        }
        assert_eq!(world.get_node(at(9, 7, 0)), Node::AIR);
        assert_eq!(world.get_node(at(2, 7, 2)), water.flowing_node(4, false));
        assert_eq!(world.get_node(at(0, 8, 0)), Node::AIR);
    }

    #[test]
    fn test_range_cutoff() {
        let water = paired_water(1, 3);
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let mut hooks = Recorder::default();
        world.set_node(at(0, 7, 0), water.source_node());
        system.schedule(at(0, 7, 0));
        run_until_settled(&mut system, &mut world, &mut hooks, 100);

        assert_eq!(world.get_node(at(3, 7, 0)), water.flowing_node(5, false));
        assert_eq!(world.get_node(at(4, 7, 0)), Node::AIR);
        for x in -10..=10 {
            for z in -10..=10 {
                let node = world.get_node(at(x, 7, z));
                if node.content == water.flowing {
                    assert!(node.liquid_level() >= 5, "({x}, 7, {z}) at level {}", node.liquid_level());
                }
            }
        }
    }

    #[test]
    fn test_two_sources_make_a_third() {
        let water = paired_water(1, 8);
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let mut hooks = Recorder::default();
        world.set_node(at(0, 7, 0), water.source_node());
        world.set_node(at(2, 7, 0), water.source_node());
        system.schedule(at(0, 7, 0));
        system.schedule(at(2, 7, 0));

        system.run(&mut world, &mut hooks);
        assert!(system.is_queued(at(1, 7, 0)));
        system.run(&mut world, &mut hooks);
        assert_eq!(world.get_node(at(1, 7, 0)), water.source_node());
        assert_eq!(world.get_node(at(-1, 7, 0)), water.flowing_node(7, false));
    }

    #[test]
    fn test_viscosity_climbs_one_level_per_run() {
        let water = paired_water(7, 8);
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let mut hooks = Recorder::default();
        // Held at level 6 by the unloaded voxels at x = -33
        let feeder = at(WORLD_MIN, 7, 5);
        let target = at(WORLD_MIN + 1, 7, 5);
        world.set_node(feeder, water.flowing_node(6, false));
        system.schedule(target);

        for expected in 0..=5u8 {
            system.run(&mut world, &mut hooks);
            assert_eq!(
                world.get_node(target),
                water.flowing_node(expected, false),
                "after run {}",
                expected + 1
            );
        }
        for _ in 0..3 {
            system.run(&mut world, &mut hooks);
        }
        assert_eq!(world.get_node(target), water.flowing_node(5, false));
        assert_eq!(world.get_node(feeder), water.flowing_node(6, false));
    }

    #[test]
    fn test_purge_bounds_queue() {
        let water = paired_water(1, 8);
        let mut world = water_world(&water);
        let config = LiquidConfig {
            loop_max: 1,
            queue_purge_secs: 1,
        };
        let mut system = system_for(&water, config);
        let mut hooks = Recorder::default();
        world.set_node(at(0, 10, 0), water.source_node());
        system.schedule(at(0, 10, 0));

        let mut purged_at = None;
        for run in 0..10 {
            let report = system.run(&mut world, &mut hooks);
            if report.purged > 0 {
                assert_eq!(report.queue_len, 1);
                assert_eq!(system.queue_len(), 1);
                purged_at = Some(run);
                break;
            }
            system.clock().advance(600);
        }
        assert!(purged_at.is_some(), "queue was never purged");
    }

    #[test]
    fn test_purge_disabled_keeps_queue() {
        let water = paired_water(1, 8);
        let mut world = water_world(&water);
        let config = LiquidConfig {
            loop_max: 1,
            queue_purge_secs: 0,
        };
        let mut system = system_for(&water, config);
        let mut hooks = Recorder::default();
        world.set_node(at(0, 10, 0), water.source_node());
        system.schedule(at(0, 10, 0));

        for _ in 0..5 {
            let report = system.run(&mut world, &mut hooks);
            assert_eq!(report.purged, 0);
            system.clock().advance(5_000);
        }
        assert!(system.queue_len() > 1);
    }

    fn torch_scene(veto: bool) -> (Water, World, LiquidSystem<ManualClock>, Recorder) {
        let water = paired_water(1, 8);
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let hooks = Recorder {
            veto_floods: veto,
            ..Recorder::default()
        };
        world.set_node(at(0, 7, 0), water.source_node());
        world.set_node(at(1, 7, 0), Node::new(water.torch));
        system.schedule(at(0, 7, 0));
        (water, world, system, hooks)
    }

    #[test]
    fn test_flood_veto_keeps_content() {
        let (water, mut world, mut system, mut hooks) = torch_scene(true);
        system.run(&mut world, &mut hooks);
        let report = system.run(&mut world, &mut hooks);

        assert_eq!(hooks.floods.len(), 1);
        let (pos, old, new) = hooks.floods[0];
        assert_eq!(pos, at(1, 7, 0));
        assert_eq!(old.content, water.torch);
        assert_eq!(new, water.flowing_node(7, false));

        assert_eq!(world.get_node(at(1, 7, 0)).content, water.torch);
        assert_eq!(report.changed, 3, "the other three sides still flood");
        assert!(hooks.transformed[0].iter().all(|r| r.pos != at(1, 7, 0)));
        assert!(!system.is_queued(at(2, 7, 0)));
    }

    #[test]
    fn test_vetoed_flood_under_boat_leaves_no_trace() {
        let (water, mut world, mut system, mut hooks) = torch_scene(true);
        world.set_node(at(1, 8, 0), Node::new(water.boat));
        system.run(&mut world, &mut hooks);
        system.run(&mut world, &mut hooks);

        assert_eq!(hooks.floods.len(), 1);
        assert!(hooks.falling.is_empty());
        assert_eq!(hooks.lighting_batches, vec![3]);
        assert_eq!(hooks.transformed.len(), 1);
        assert_eq!(hooks.transformed[0].len(), 3);
        assert!(hooks.transformed[0].iter().all(|r| r.pos != at(1, 7, 0)));
        assert_eq!(world.get_node(at(1, 7, 0)).content, water.torch);
        assert_eq!(world.get_node(at(1, 8, 0)).content, water.boat);
    }

    #[test]
    fn test_flood_without_veto_replaces_content() {
        let (water, mut world, mut system, mut hooks) = torch_scene(false);
        system.run(&mut world, &mut hooks);
        let report = system.run(&mut world, &mut hooks);

        assert_eq!(hooks.floods.len(), 1);
        assert_eq!(report.changed, 4);
        assert_eq!(world.get_node(at(1, 7, 0)), water.flowing_node(7, false));
        assert!(system.is_queued(at(2, 7, 0)));
    }

    #[test]
    fn test_rollback_attributes_actor() {
        let water = paired_water(1, 8);
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let mut journal = RollbackJournal::new();
        journal.mark_actor(at(0, 7, 0), "alice");
        let mut hooks = Recorder {
            journal: Some(journal),
            ..Recorder::default()
        };
        world.set_node(at(0, 7, 0), water.source_node());
        system.schedule(at(0, 7, 0));

        system.run(&mut world, &mut hooks);
        let report = system.run(&mut world, &mut hooks);
        assert_eq!(report.changed, 4);

        let actions = hooks.journal.as_ref().unwrap().actions();
        assert_eq!(actions.len(), 4);
        assert_eq!(
            actions[0],
            crate::rollback::RollbackAction::SetNode {
                pos: at(0, 7, 1),
                old: Node::AIR,
                new: water.flowing_node(7, false),
                actor: "alice".into(),
            }
        );
    }

    #[test]
    fn test_rollback_without_suspect_reports_nothing() {
        let water = paired_water(1, 8);
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let mut hooks = Recorder {
            journal: Some(RollbackJournal::new()),
            ..Recorder::default()
        };
        world.set_node(at(0, 7, 0), water.source_node());
        system.schedule(at(0, 7, 0));
        system.run(&mut world, &mut hooks);
        system.run(&mut world, &mut hooks);

        assert!(hooks.journal.as_ref().unwrap().actions().is_empty());
        assert_eq!(world.get_node(at(0, 7, 1)), water.flowing_node(7, false));
    }

    #[test]
    fn test_missing_chunk_writes_but_does_not_record() {
        let water = paired_water(1, 8);
        let mut store = LooseStore::default();
        let mut system = system_for(&water, LiquidConfig::default());
        let mut hooks = Recorder::default();
        store.set_node(IVec3::ZERO, water.source_node());
        system.schedule(IVec3::ZERO);

        system.run(&mut store, &mut hooks);
        let report = system.run(&mut store, &mut hooks);
        assert_eq!(report.changed, 5);
        assert!(report.modified_chunks.is_empty());
        assert!(hooks.transformed.is_empty());
        assert!(hooks.lighting_batches.is_empty());
        assert_eq!(store.get_node(at(0, -1, 0)), water.flowing_node(7, true));
    }

    #[test]
    fn test_drained_flow_checks_for_falling() {
        let water = paired_water(1, 8);
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let mut hooks = Recorder::default();
        world.set_node(at(5, 7, 5), water.flowing_node(3, false));
        world.set_node(at(5, 8, 5), Node::new(water.boat));
        system.schedule(at(5, 7, 5));

        let report = system.run(&mut world, &mut hooks);
        assert_eq!(report.changed, 1);
        assert_eq!(world.get_node(at(5, 7, 5)), Node::AIR);
        assert_eq!(hooks.falling, vec![at(5, 7, 5)]);
        assert_eq!(world.get_node(at(5, 8, 5)).content, water.boat);
    }

    #[test]
    fn test_unsupported_flows_drain() {
        let water = paired_water(1, 8);
        let mut world = water_world(&water);
        let mut system = system_for(&water, LiquidConfig::default());
        let mut hooks = Recorder::default();
        world.set_node(at(0, 7, 0), water.flowing_node(2, false));
        world.set_node(at(1, 7, 0), water.flowing_node(1, false));
        system.schedule(at(0, 7, 0));

        system.run(&mut world, &mut hooks);
        assert_eq!(world.get_node(at(0, 7, 0)), water.flowing_node(0, false));
        assert!(system.is_queued(at(1, 7, 0)));

        run_until_settled(&mut system, &mut world, &mut hooks, 20);
        assert_eq!(world.get_node(at(0, 7, 0)), Node::AIR);
        assert_eq!(world.get_node(at(1, 7, 0)), Node::AIR);
    }
}
