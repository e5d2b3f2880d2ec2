use rivulet_core::constants::{LIQUID_LEVEL_MAX, WATER_DROP_BOOST};
use rivulet_core::content::{ContentRegistry, LiquidRole};
use rivulet_core::direction::NeighborRole;
use rivulet_core::types::{ContentId, Node};

use crate::neighbors::{Bucket, Classification};

/// What a voxel should become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub content: ContentId,
    /// Fill level, -1 when no level applies.
    pub level: i8,
    /// Viscosity held the level back; the voxel must be evaluated again.
    pub must_reflow: bool,
}

/// Step from `current` toward `target`, moving at most a `viscosity`-th of
/// the gap and at least one level.
pub fn apply_viscosity(current: i8, target: i8, viscosity: u8) -> i8 {
    let inc = target as i16 - current as i16;
    let visc = viscosity.max(1) as i16;
    let next = if inc.abs() > visc {
        current as i16 + inc / visc
    } else {
        current as i16 + inc.signum()
    };
    next as i8
}

/// Highest level any same-family flowing neighbor can feed into this voxel.
pub fn candidate_level(c: &Classification) -> i8 {
    c.in_bucket(Bucket::Flow)
        .filter_map(|n| {
            let level = n.node.liquid_level() as i8;
            match n.role {
                NeighborRole::Upper => Some((level + WATER_DROP_BOOST).min(LIQUID_LEVEL_MAX)),
                NeighborRole::SameLevel if !n.node.is_flowing_down() && level > 0 => {
                    Some(level - 1)
                }
                _ => None,
            }
        })
        .fold(-1, i8::max)
}

/// Decide the new content and level of a classified voxel.
pub fn decide(c: &Classification, registry: &ContentRegistry) -> Decision {
    let current = &c.current;
    let Some(family) = current.family else {
        return Decision {
            content: current.floodable,
            level: -1,
            must_reflow: false,
        };
    };
    let desc = registry.get(family);
    let threshold = LIQUID_LEVEL_MAX + 1 - desc.liquid_range() as i8;
    let visible = |level: i8| {
        if level >= threshold {
            family
        } else {
            current.floodable
        }
    };
    let sources = c.count(Bucket::Source);

    if (sources >= 2 && desc.renewable) || current.role == LiquidRole::Source {
        return Decision {
            content: desc.source_alternative,
            level: -1,
            must_reflow: false,
        };
    }
    if sources >= 1 {
        return Decision {
            content: visible(LIQUID_LEVEL_MAX),
            level: LIQUID_LEVEL_MAX,
            must_reflow: false,
        };
    }
    if c.unknown_source_nearby && current.level >= 0 {
        // An unloaded neighbor may be feeding this liquid; hold it.
        return Decision {
            content: family,
            level: current.level,
            must_reflow: false,
        };
    }

    let candidate = candidate_level(c);
    let (level, must_reflow) = if desc.viscosity > 1 && candidate != current.level {
        let level = apply_viscosity(current.level, candidate, desc.viscosity);
        (level, level != candidate)
    } else {
        (candidate, false)
    };
    Decision {
        content: visible(candidate),
        level,
        must_reflow,
    }
}

/// Whether writing `decision` would leave `node` as it is.
pub fn is_unchanged(
    node: Node,
    decision: &Decision,
    flowing_down: bool,
    registry: &ContentRegistry,
) -> bool {
    if decision.content != node.content {
        return false;
    }
    if registry.get(node.content).liquid != LiquidRole::Flowing {
        return true;
    }
    node.liquid_level() == decision.level as u8 && node.is_flowing_down() == flowing_down
}

/// Node written for `decision`, starting from the voxel's current node.
pub fn encode(
    mut node: Node,
    decision: &Decision,
    flowing_down: bool,
    registry: &ContentRegistry,
) -> Node {
    if registry.get(decision.content).liquid == LiquidRole::Flowing {
        node.set_liquid(decision.level as u8, flowing_down);
    } else {
        node.clear_liquid();
    }
    node.content = decision.content;
    node
}
