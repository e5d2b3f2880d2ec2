use rivulet_core::types::{Node, VoxelCoord};

/// An audited world edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackAction {
    /// A node was replaced on behalf of `actor`.
    SetNode {
        pos: VoxelCoord,
        old: Node,
        new: Node,
        actor: String,
    },
}

/// Audit log that can attribute automatic changes to a recent actor.
pub trait RollbackLog {
    /// Name of the actor most plausibly responsible for a change at `pos`.
    /// Only actors within `range` voxels are considered; one within
    /// `nearness` voxels is accepted immediately.
    fn suspect(&self, pos: VoxelCoord, range: u32, nearness: u32) -> Option<String>;

    fn report(&mut self, action: RollbackAction);
}

/// In-memory rollback log.
#[derive(Debug, Default)]
pub struct RollbackJournal {
    /// Recent actor activity, oldest first.
    marks: Vec<(VoxelCoord, String)>,
    actions: Vec<RollbackAction>,
}

impl RollbackJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember that `actor` just acted at `pos`.
    pub fn mark_actor(&mut self, pos: VoxelCoord, actor: impl Into<String>) {
        self.marks.push((pos, actor.into()));
    }

    pub fn actions(&self) -> &[RollbackAction] {
        &self.actions
    }
}

impl RollbackLog for RollbackJournal {
    fn suspect(&self, pos: VoxelCoord, range: u32, nearness: u32) -> Option<String> {
        let mut best: Option<(u32, &str)> = None;
        for (mark, actor) in self.marks.iter().rev() {
            let distance = (*mark - pos).abs().max_element() as u32;
            if distance > range {
                continue;
            }
            if distance <= nearness {
                return Some(actor.clone());
            }
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, actor));
            }
        }
        best.map(|(_, actor)| actor.to_owned())
    }

    fn report(&mut self, action: RollbackAction) {
        log::trace!("Rollback: {action:?}");
        self.actions.push(action);
    }
}
