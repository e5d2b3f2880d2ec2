use std::collections::HashSet;
use std::sync::Arc;

use rivulet_core::content::{ContentRegistry, LiquidRole};
use rivulet_core::direction::NeighborRole;
use rivulet_core::types::{ChunkCoord, ContentId, VoxelCoord};
use rivulet_world::VoxelStore;

use crate::apply::commit;
use crate::backpressure::Backpressure;
use crate::clock::{Clock, MonotonicClock};
use crate::config::{ConfigError, LiquidConfig};
use crate::decision::{decide, encode, is_unchanged};
use crate::hooks::{ChangeRecord, LiquidHooks};
use crate::neighbors::{classify, Bucket, Classification};
use crate::queue::UniqueQueue;

/// Outcome of one [`LiquidSystem::run`] invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Voxels taken off the queue.
    pub processed: u32,
    /// Voxels written to the store.
    pub changed: u32,
    /// Loaded chunks holding at least one recorded change.
    pub modified_chunks: HashSet<ChunkCoord>,
    /// Queue entries dropped by the backpressure controller.
    pub purged: usize,
    /// Queue length when the invocation returned.
    pub queue_len: usize,
}

/// Work-queue driven liquid propagation.
///
/// Voxels are scheduled with [`LiquidSystem::schedule`]; each call to
/// [`LiquidSystem::run`] processes at most the voxels queued when it
/// started, capped by `loop_max`. Voxels scheduled during a run wait for
/// the next one.
pub struct LiquidSystem<C: Clock = MonotonicClock> {
    registry: Arc<ContentRegistry>,
    config: LiquidConfig,
    clock: C,
    queue: UniqueQueue<VoxelCoord>,
    backpressure: Backpressure,
}

impl LiquidSystem<MonotonicClock> {
    pub fn with_wall_clock(
        registry: Arc<ContentRegistry>,
        config: LiquidConfig,
    ) -> Result<Self, ConfigError> {
        Self::new(registry, config, MonotonicClock::new())
    }
}

impl<C: Clock> LiquidSystem<C> {
    pub fn new(
        registry: Arc<ContentRegistry>,
        config: LiquidConfig,
        clock: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry,
            config,
            clock,
            queue: UniqueQueue::new(),
            backpressure: Backpressure::new(),
        })
    }

    /// Queue a voxel for evaluation. Already queued voxels are not duplicated.
    pub fn schedule(&mut self, pos: VoxelCoord) -> bool {
        self.queue.push(pos)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_queued(&self, pos: VoxelCoord) -> bool {
        self.queue.contains(&pos)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Process one bounded batch of queued voxels.
    pub fn run<S, H>(&mut self, store: &mut S, hooks: &mut H) -> RunReport
    where
        S: VoxelStore + ?Sized,
        H: LiquidHooks + ?Sized,
    {
        let budget = self.queue.len().min(self.config.loop_max as usize);
        let mut report = RunReport::default();
        let mut must_reflow = Vec::new();
        let mut changes = Vec::new();
        let mut falling = Vec::new();

        while report.processed < budget as u32 {
            let Some(pos) = self.queue.pop_front() else {
                break;
            };
            report.processed += 1;

            let Some(c) = classify(&*store, &self.registry, pos) else {
                continue;
            };
            for npos in c.eager_schedule() {
                self.queue.push(npos);
            }

            let decision = decide(&c, &self.registry);
            if decision.must_reflow {
                must_reflow.push(pos);
            }

            let old = store.get_node(pos);
            if is_unchanged(old, &decision, c.flowing_down, &self.registry) {
                continue;
            }
            let new = encode(old, &decision, c.flowing_down, &self.registry);
            if !commit(store, hooks, pos, old, new, c.current.floodable) {
                continue;
            }
            report.changed += 1;

            if let Some(chunk) = store.resolve_chunk(pos) {
                report.modified_chunks.insert(chunk);
                changes.push(ChangeRecord { pos, old });
            }
            if c.floating_above && decision.content == ContentId::AIR {
                falling.push(pos);
            }
            self.reenqueue(&c, decision.content);
        }

        for pos in must_reflow {
            self.queue.push(pos);
        }
        if !changes.is_empty() {
            hooks.update_lighting(&changes);
        }
        for pos in falling {
            hooks.check_for_falling(pos);
        }
        if !changes.is_empty() {
            hooks.on_liquid_transformed(&changes);
        }

        report.purged = self.manage_queue();
        report.queue_len = self.queue.len();
        if report.processed > 0 {
            log::debug!(
                "Liquid run: processed={} changed={} chunks={} queue={}",
                report.processed,
                report.changed,
                report.modified_chunks.len(),
                report.queue_len
            );
        }
        report
    }

    /// Schedule the neighbors affected by a voxel turning into `content`.
    fn reenqueue(&mut self, c: &Classification, content: ContentId) {
        match self.registry.get(content).liquid {
            LiquidRole::Source | LiquidRole::Flowing => {
                for bucket in [Bucket::Flow, Bucket::Air] {
                    for n in c.in_bucket(bucket) {
                        if n.role != NeighborRole::Upper {
                            self.queue.push(n.pos);
                        }
                    }
                }
            }
            // Drained: dependent flows may have to drain too.
            LiquidRole::None => {
                for n in c.in_bucket(Bucket::Flow) {
                    self.queue.push(n.pos);
                }
            }
        }
    }

    /// Drop the oldest entries when the queue keeps growing past what one
    /// run can process. Returns how many entries were dropped.
    fn manage_queue(&mut self) -> usize {
        let Some(window_ms) = self.config.purge_window_ms() else {
            return 0;
        };
        let now = self.clock.now_ms();
        let cap = self.config.loop_max as usize;
        match self.backpressure.update(self.queue.len(), now, window_ms, cap) {
            Some(excess) => {
                let dropped = self.queue.drop_front(excess);
                log::info!("Liquid queue overloaded: dropped {dropped} oldest entries");
                dropped
            }
            None => 0,
        }
    }
}
