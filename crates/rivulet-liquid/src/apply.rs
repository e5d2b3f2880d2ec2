use rivulet_core::constants::{ROLLBACK_SUSPECT_NEARNESS, ROLLBACK_SUSPECT_RANGE};
use rivulet_core::types::{ContentId, LightBank, Node, VoxelCoord};
use rivulet_world::VoxelStore;

use crate::hooks::LiquidHooks;
use crate::rollback::RollbackAction;

/// Write `new` over `old` at `pos`. Returns false if the flood hook vetoed
/// the change, in which case nothing was written.
pub(crate) fn commit<S, H>(
    store: &mut S,
    hooks: &mut H,
    pos: VoxelCoord,
    old: Node,
    mut new: Node,
    floodable: ContentId,
) -> bool
where
    S: VoxelStore + ?Sized,
    H: LiquidHooks + ?Sized,
{
    if floodable != ContentId::AIR && hooks.on_flood(pos, old, new) {
        log::trace!("Flood of {pos} vetoed");
        return false;
    }

    // Light is recomputed by the lighting pass after the run.
    new.set_light(LightBank::Day, 0);
    new.set_light(LightBank::Night, 0);

    let actor = hooks
        .rollback()
        .and_then(|journal| journal.suspect(pos, ROLLBACK_SUSPECT_RANGE, ROLLBACK_SUSPECT_NEARNESS));
    match actor {
        Some(actor) => {
            let before = store.get_node(pos);
            store.set_node(pos, new);
            let after = store.get_node(pos);
            if let Some(journal) = hooks.rollback() {
                journal.report(RollbackAction::SetNode {
                    pos,
                    old: before,
                    new: after,
                    actor,
                });
            }
        }
        None => store.set_node(pos, new),
    }
    true
}
