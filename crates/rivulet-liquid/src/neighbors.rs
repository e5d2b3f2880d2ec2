use rivulet_core::constants::LIQUID_LEVEL_SOURCE;
use rivulet_core::content::{ContentRegistry, LiquidRole};
use rivulet_core::direction::{NeighborRole, LIQUID_DIRECTIONS};
use rivulet_core::types::{ContentId, Node, VoxelCoord};
use rivulet_world::VoxelStore;

/// How a neighbor takes part in the liquid decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Floodable non-liquid.
    Air,
    /// Solid, unloaded, or a liquid of another family.
    Neutral,
    /// Source of the same family, above or beside.
    Source,
    /// Flowing liquid of the same family.
    Flow,
    /// Source of the same family directly below. Not counted.
    Uncounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub pos: VoxelCoord,
    pub node: Node,
    pub role: NeighborRole,
    pub bucket: Bucket,
}

/// Liquid state of the voxel being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentState {
    pub role: LiquidRole,
    /// `LIQUID_LEVEL_SOURCE` for sources, -1 for non-liquids.
    pub level: i8,
    /// Flowing content of the liquid family, once known.
    pub family: Option<ContentId>,
    /// Content left in place when liquid cannot reach this voxel.
    pub floodable: ContentId,
}

impl CurrentState {
    pub fn is_liquid(&self) -> bool {
        self.role != LiquidRole::None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub current: CurrentState,
    /// In `LIQUID_DIRECTIONS` order.
    pub neighbors: [Neighbor; 6],
    pub flowing_down: bool,
    pub unknown_source_nearby: bool,
    pub floating_above: bool,
}

impl Classification {
    pub fn in_bucket(&self, bucket: Bucket) -> impl Iterator<Item = &Neighbor> {
        self.neighbors.iter().filter(move |n| n.bucket == bucket)
    }

    pub fn count(&self, bucket: Bucket) -> usize {
        self.in_bucket(bucket).count()
    }

    /// Air neighbors a liquid voxel pushes onto the queue whether or not it
    /// changes itself.
    pub fn eager_schedule(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        let liquid = self.current.is_liquid();
        self.in_bucket(Bucket::Air)
            .filter(move |n| liquid && n.role != NeighborRole::Upper)
            .map(|n| n.pos)
    }
}

/// Derive the current state of `node`. Returns None for content liquid
/// can neither occupy nor flood.
pub fn current_state(node: Node, registry: &ContentRegistry) -> Option<CurrentState> {
    let desc = registry.get(node.content);
    let state = match desc.liquid {
        LiquidRole::Source => CurrentState {
            role: LiquidRole::Source,
            level: LIQUID_LEVEL_SOURCE,
            family: Some(desc.flowing_alternative),
            floodable: ContentId::AIR,
        },
        LiquidRole::Flowing => CurrentState {
            role: LiquidRole::Flowing,
            level: node.liquid_level() as i8,
            family: Some(node.content),
            floodable: ContentId::AIR,
        },
        LiquidRole::None if desc.floodable => CurrentState {
            role: LiquidRole::None,
            level: -1,
            family: None,
            floodable: node.content,
        },
        LiquidRole::None => return None,
    };
    Some(state)
}

/// Read the voxel at `pos` and its six neighbors and bucket them.
pub fn classify<S: VoxelStore + ?Sized>(
    store: &S,
    registry: &ContentRegistry,
    pos: VoxelCoord,
) -> Option<Classification> {
    let mut current = current_state(store.get_node(pos), registry)?;
    let mut flowing_down = false;
    let mut unknown_source_nearby = false;
    let mut floating_above = false;

    let neighbors = std::array::from_fn(|i| {
        let dir = LIQUID_DIRECTIONS[i];
        let role = dir.role();
        let npos = pos + dir.offset();
        let node = store.get_node(npos);
        let desc = registry.get(node.content);

        if role == NeighborRole::Upper && desc.floats {
            floating_above = true;
        }

        let bucket = match desc.liquid {
            LiquidRole::None if desc.floodable => {
                if role == NeighborRole::Lower {
                    flowing_down = true;
                }
                Bucket::Air
            }
            LiquidRole::None => {
                if node.content == ContentId::IGNORE {
                    // Unloaded below: hold the liquid up. Elsewhere: it may hide a source.
                    if role == NeighborRole::Lower {
                        flowing_down = true;
                    } else {
                        unknown_source_nearby = true;
                    }
                }
                Bucket::Neutral
            }
            LiquidRole::Source => {
                let family = *current.family.get_or_insert(desc.flowing_alternative);
                if desc.flowing_alternative != family {
                    Bucket::Neutral
                } else if role == NeighborRole::Lower {
                    Bucket::Uncounted
                } else {
                    Bucket::Source
                }
            }
            LiquidRole::Flowing => {
                // Liquid falling past on the same level cannot flow here.
                if role != NeighborRole::SameLevel || !node.is_flowing_down() {
                    current.family.get_or_insert(desc.flowing_alternative);
                }
                if current.family != Some(desc.flowing_alternative) {
                    Bucket::Neutral
                } else {
                    if role == NeighborRole::Lower {
                        flowing_down = true;
                    }
                    Bucket::Flow
                }
            }
        };

        Neighbor {
            pos: npos,
            node,
            role,
            bucket,
        }
    });

    Some(Classification {
        current,
        neighbors,
        flowing_down,
        unknown_source_nearby,
        floating_above,
    })
}
