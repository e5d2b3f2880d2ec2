use rivulet_core::types::{Node, VoxelCoord};

use crate::rollback::RollbackLog;

/// A voxel changed by the liquid system, with the node it held before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRecord {
    pub pos: VoxelCoord,
    pub old: Node,
}

/// Collaborators the liquid system notifies while it runs.
///
/// Every method has a no-op default, so callers implement only what they
/// care about.
pub trait LiquidHooks {
    /// Called before liquid replaces floodable content other than air.
    /// Return true to veto the change.
    fn on_flood(&mut self, _pos: VoxelCoord, _old: Node, _new: Node) -> bool {
        false
    }

    /// Recompute light around the changed voxels. Called once per invocation.
    fn update_lighting(&mut self, _changes: &[ChangeRecord]) {}

    /// Content above `pos` may have lost its support.
    fn check_for_falling(&mut self, _pos: VoxelCoord) {}

    /// Called once per invocation with every recorded change.
    fn on_liquid_transformed(&mut self, _changes: &[ChangeRecord]) {}

    /// Audit log to attribute changes to, if any.
    fn rollback(&mut self) -> Option<&mut dyn RollbackLog> {
        None
    }
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl LiquidHooks for NoHooks {}
