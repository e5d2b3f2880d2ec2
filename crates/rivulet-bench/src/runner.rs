use std::sync::Arc;
use std::time::Instant;

use glam::IVec3;
use rivulet_core::content::{ContentRegistry, LiquidRole};
use rivulet_core::loader::build_registry;
use rivulet_core::types::{Node, VoxelCoord};
use rivulet_liquid::{ChangeRecord, LiquidConfig, LiquidHooks, LiquidSystem};
use rivulet_world::{VoxelStore, World};

use crate::error::BenchError;
use crate::scenes::{SceneConfig, SceneContents};

/// Timing data for a single scene run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub chunk_count: u32,
    pub tick_count: u32,
    pub processed: u64,
    pub changed: u64,
    pub purged: u64,
    pub final_queue: usize,
    /// First tick after which the queue was empty.
    pub settled_at: Option<u32>,
    /// Most chunks written by a single invocation.
    pub peak_modified_chunks: u32,
    pub liquid_voxels: u32,
    pub floods: u32,
    pub falling_checks: u32,
    /// Invocations that delivered a transformed notification.
    pub transformed_batches: u32,
    pub timings: TimingSeries,
}

/// Hooks that only count what the liquid system reports.
#[derive(Debug, Default)]
pub struct CountingHooks {
    pub floods: u32,
    pub falling_checks: u32,
    pub transformed_batches: u32,
}

impl LiquidHooks for CountingHooks {
    fn on_flood(&mut self, _pos: VoxelCoord, _old: Node, _new: Node) -> bool {
        self.floods += 1;
        false
    }

    fn check_for_falling(&mut self, _pos: VoxelCoord) {
        self.falling_checks += 1;
    }

    fn on_liquid_transformed(&mut self, _changes: &[ChangeRecord]) {
        self.transformed_batches += 1;
    }
}

/// Build the content registry from the bundled RON data.
pub fn load_registry() -> Result<ContentRegistry, BenchError> {
    let liquids_ron = include_str!("../../../data/contents/liquids.ron");
    let solids_ron = include_str!("../../../data/contents/solids.ron");

    let loaded = build_registry(&[liquids_ron, solids_ron])?;
    for warning in &loaded.warnings {
        log::warn!("Content warning: {warning}");
    }
    Ok(loaded.registry)
}

/// Runs liquid scenes headlessly and times each invocation.
pub struct ScenarioRunner {
    registry: Arc<ContentRegistry>,
    contents: SceneContents,
    config: LiquidConfig,
    tick_count: u32,
}

impl ScenarioRunner {
    pub fn new(
        registry: ContentRegistry,
        config: LiquidConfig,
        tick_count: u32,
    ) -> Result<Self, BenchError> {
        config.validate()?;
        let contents = SceneContents::resolve(&registry)?;
        Ok(Self {
            registry: Arc::new(registry),
            contents,
            config,
            tick_count,
        })
    }

    /// Run a single scene and return its statistics.
    pub fn run_scene(&self, scene: &SceneConfig) -> Result<BenchmarkResult, BenchError> {
        log::info!("Running scene '{}' ({})...", scene.name, scene.description);

        let (mut world, seeds) = scene.instantiate(&self.contents);
        let mut system = LiquidSystem::with_wall_clock(self.registry.clone(), self.config)?;
        for pos in seeds {
            system.schedule(pos);
        }
        let mut hooks = CountingHooks::default();
        world.mark_all_clean();
        let mut peak_modified_chunks = 0;

        let mut frame_times = Vec::with_capacity(self.tick_count as usize);
        let (mut processed, mut changed, mut purged) = (0u64, 0u64, 0u64);
        let mut settled_at = None;

        for tick in 0..self.tick_count {
            let frame_start = Instant::now();
            let report = system.run(&mut world, &mut hooks);
            frame_times.push(frame_start.elapsed().as_secs_f64() * 1000.0);

            let (_, modified, _) = world.chunk_counts();
            peak_modified_chunks = peak_modified_chunks.max(modified);
            world.mark_all_clean();

            processed += report.processed as u64;
            changed += report.changed as u64;
            purged += report.purged as u64;
            if report.queue_len == 0 && settled_at.is_none() {
                settled_at = Some(tick + 1);
            }
        }

        let timings = compute_timings(&frame_times);
        let liquid_voxels = count_liquid(&world, &self.registry, scene);
        log::info!(
            "  Done: changed={}, liquid={}, mean={:.3}ms, p95={:.3}ms",
            changed,
            liquid_voxels,
            timings.mean_ms,
            timings.p95_ms
        );

        Ok(BenchmarkResult {
            scene_name: scene.name.to_string(),
            chunk_count: world.chunk_map().loaded_count(),
            tick_count: self.tick_count,
            processed,
            changed,
            purged,
            final_queue: system.queue_len(),
            settled_at,
            peak_modified_chunks,
            liquid_voxels,
            floods: hooks.floods,
            falling_checks: hooks.falling_checks,
            transformed_batches: hooks.transformed_batches,
            timings,
        })
    }
}

fn count_liquid(world: &World, registry: &ContentRegistry, scene: &SceneConfig) -> u32 {
    let (lo, hi) = (IVec3::from(scene.region_min), IVec3::from(scene.region_max));
    let mut count = 0;
    for x in lo.x..=hi.x {
        for y in lo.y..=hi.y {
            for z in lo.z..=hi.z {
                let node = world.get_node(IVec3::new(x, y, z));
                if registry.get(node.content).liquid != LiquidRole::None {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Compute timing statistics from a list of frame times in milliseconds.
fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
