//! Agent-versus-scenery collision resolution
//!
//! The resolver runs once per frame for the camera agent:
//!
//! 1. Broad phase: the spatial grid returns objects in the 27 cells around
//!    the agent.
//! 2. Narrow phase: candidates are tested against the agent's cylinder in
//!    scan order; the first hit wins and the rest are not examined.
//! 3. Response: a direction heuristic nudges every supplied rig out of the
//!    obstacle in world space and reports whether the agent is standing on it.
//!
//! The heuristic prefers treating contacts as landings, which lets the
//! player step up onto low blocks instead of stopping dead against them.

use std::collections::HashSet;

use crate::core::config::{GridConfig, ResolverConfig};
use crate::foundation::math::{utils, Axis, Vec3};
use crate::physics::collision_filter::IgnoreSet;
use crate::rig::Rig;
use crate::scene::{Collidable, ObjectId, Scene};
use crate::spatial::SpatialGrid;

/// Result of a single collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionOutcome {
    /// Nothing near the agent intersects it
    NoCollision,
    /// The agent was pushed by the given world-space vector
    Blocked(Vec3),
    /// The agent is supported by the object below it
    Grounded,
}

impl CollisionOutcome {
    /// Whether vertical motion should treat the agent as supported
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Grounded)
    }

    /// Whether any object was hit
    pub fn is_collision(&self) -> bool {
        !matches!(self, Self::NoCollision)
    }
}

/// Outcome of a check together with the object that caused it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionReport {
    /// What happened
    pub outcome: CollisionOutcome,
    /// The first intersecting candidate, if any
    pub hit: Option<ObjectId>,
}

impl CollisionReport {
    /// Report for a frame without contact
    pub fn none() -> Self {
        Self {
            outcome: CollisionOutcome::NoCollision,
            hit: None,
        }
    }
}

/// Broad and narrow phase plus push-out response for one agent
#[derive(Debug)]
pub struct CollisionResolver {
    config: ResolverConfig,
    grid: SpatialGrid,
    ignore: IgnoreSet,
    excluded: HashSet<ObjectId>,
    candidates: Vec<ObjectId>,
}

impl CollisionResolver {
    /// Create a resolver; `ignore` is fixed for the resolver's lifetime
    pub fn new(grid: &GridConfig, config: ResolverConfig, ignore: IgnoreSet) -> Self {
        Self {
            config,
            grid: SpatialGrid::new(grid),
            ignore,
            excluded: HashSet::new(),
            candidates: Vec::new(),
        }
    }

    /// Never report contact with `id`, e.g. a prop the agent carries
    pub fn exclude(&mut self, id: ObjectId) {
        self.excluded.insert(id);
    }

    /// Builder-style variant of [`exclude`](Self::exclude)
    pub fn with_exclusions(mut self, ids: impl IntoIterator<Item = ObjectId>) -> Self {
        self.excluded.extend(ids);
        self
    }

    /// Whether contact with `id` is suppressed
    pub fn is_excluded(&self, id: ObjectId) -> bool {
        self.excluded.contains(&id)
    }

    /// Current tuning
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The broad-phase grid as of the last rebuild
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Objects kept out of the grid
    pub fn ignore_set(&self) -> &IgnoreSet {
        &self.ignore
    }

    /// Re-bucket the scene at its current positions
    pub fn rebuild(&mut self, scene: &Scene) {
        self.grid.rebuild(scene.positions(), &self.ignore);
    }

    /// Test the agent against nearby scenery and push the rigs out of the
    /// first object it overlaps
    ///
    /// Rigs are moved as a side effect, so calling this twice in one frame
    /// may push twice.
    pub fn check_collisions(
        &mut self,
        scene: &Scene,
        agent: &dyn Collidable,
        rigs: &mut [&mut dyn Rig],
        delta_time: f32,
    ) -> CollisionReport {
        if self.config.rebuild_each_check {
            self.rebuild(scene);
        }

        let agent_id = agent.object_id();
        self.grid.query_neighbors_into(&agent.global_position(), &mut self.candidates);
        log::trace!("{} collision candidates near agent", self.candidates.len());

        for &id in &self.candidates {
            if Some(id) == agent_id || self.excluded.contains(&id) {
                continue;
            }

            let Ok(candidate) = scene.placed(id) else {
                log::debug!("Grid entry {:?} no longer in scene; rebuild pending", id);
                continue;
            };

            if agent.intersects(&candidate) {
                let outcome = self.resolve_direction(&candidate, agent, rigs, delta_time);
                log::debug!(
                    "Agent hit {:?} ({}): {:?}",
                    id,
                    scene.get(id).map_or("?", |o| o.name.as_str()),
                    outcome
                );
                return CollisionReport {
                    outcome,
                    hit: Some(id),
                };
            }
        }

        CollisionReport::none()
    }

    /// Work out which way the agent hit `candidate` and push every rig away
    ///
    /// When the agent stands above the candidate's top plus clearance, the
    /// dominant axis of the biased contact direction decides the response;
    /// a strongly downward contact is a landing and reports
    /// [`CollisionOutcome::Grounded`], with a small climb assist when the
    /// agent is close above the candidate. Otherwise the contact is a side
    /// hit and only X and Z are considered.
    pub fn resolve_direction(
        &self,
        candidate: &dyn Collidable,
        agent: &dyn Collidable,
        rigs: &mut [&mut dyn Rig],
        delta_time: f32,
    ) -> CollisionOutcome {
        let cfg = &self.config;
        let agent_pos = agent.global_position();
        let candidate_pos = candidate.global_position();

        let mut contact = candidate_pos - agent_pos;
        contact.y -= cfg.vertical_bias;

        let direction = match utils::try_normalize(&contact) {
            Some(d) if utils::is_finite(&d) => d,
            _ => {
                log::debug!("Degenerate contact vector {:?}; no push applied", contact);
                return CollisionOutcome::NoCollision;
            }
        };

        let top = candidate_pos.y + candidate.bounding_cylinder().height / 2.0;
        let standable = top + cfg.platform_clearance <= agent_pos.y;

        let (ax, ay, az) = (direction.x.abs(), direction.y.abs(), direction.z.abs());

        let axis = if standable {
            if ax > ay && ax > az {
                Axis::X
            } else if ay > ax && ay > az {
                Axis::Y
            } else {
                Axis::Z
            }
        } else if ax > az {
            Axis::X
        } else {
            Axis::Z
        };

        if axis == Axis::Y && direction.y <= cfg.below_threshold {
            if agent_pos.y - candidate_pos.y <= cfg.climb_gap {
                let lift = Vec3::new(0.0, delta_time * cfg.climb_speed, 0.0);
                Self::push(rigs, lift);
            }
            return CollisionOutcome::Grounded;
        }

        let push = if axis == Axis::Y {
            -axis.unit() * cfg.push_step
        } else {
            let away = if axis.component(&direction) > 0.0 { -1.0 } else { 1.0 };
            axis.unit() * (away * cfg.push_step)
        };
        Self::push(rigs, push);
        CollisionOutcome::Blocked(push)
    }

    fn push(rigs: &mut [&mut dyn Rig], delta: Vec3) {
        for rig in rigs.iter_mut() {
            rig.translate(delta, false);
        }
    }
}
