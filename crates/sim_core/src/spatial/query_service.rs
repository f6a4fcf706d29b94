//! Spatial query service driving the per-tick rebuild cycle
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.2:
//! "Spatial partitioning schemes... allow us to quickly cull out pairs of
//! objects that cannot possibly be colliding."
//!
//! The service owns the quadtree and a snapshot cache for the current tick.
//! Collaborators never touch the tree directly: each tick the external
//! store publishes snapshots, [`SpatialQueryService::rebuild`] re-indexes
//! them from scratch, and every query answers from that index until the
//! next rebuild. Query results are therefore allowed to be one tick stale.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::config::SimConfig;
use crate::foundation::math::{Rect, Vec2};
use crate::foundation::time::Stopwatch;
use crate::physics::collision::{Circle, RayHit};
use crate::spatial::quadtree::{QuadTree, QuadTreeConfig, SpatialEntry};
use crate::world::{EntityId, EntitySnapshot};

/// Unordered pair of entities that may be colliding
///
/// The smaller entity id is always stored first, so the same two entities
/// produce the same pair no matter the discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidatePair {
    /// Entity with the smaller id
    pub a: EntityId,
    /// Entity with the larger id
    pub b: EntityId,
}

impl CandidatePair {
    /// Create a normalized pair (always stores the smaller entity id first)
    pub fn new(a: EntityId, b: EntityId) -> Self {
        if a < b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }
}

/// Index statistics refreshed by every rebuild
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialStats {
    /// Entities indexed by the last rebuild
    pub entity_count: usize,

    /// Quadtree nodes after the last rebuild
    pub node_count: usize,

    /// Wall-clock duration of the last rebuild
    pub last_rebuild: Duration,

    /// Lifetime count of insertions clamped back into the world bounds
    pub clamped_inserts: u64,
}

/// Central spatial query service
///
/// All spatial reads in the simulation (collision candidates, targeting
/// queries, view culling, line-of-sight rays) go through this type.
pub struct SpatialQueryService {
    /// Quadtree rebuilt from scratch every tick
    tree: QuadTree,

    /// Snapshot lookup for the current tick, keyed by entity id
    snapshots: HashMap<EntityId, EntitySnapshot>,

    /// Statistics from the last rebuild
    stats: SpatialStats,
}

impl SpatialQueryService {
    /// Create a service over the given world bounds
    pub fn new(world_bounds: Rect, config: QuadTreeConfig) -> Self {
        Self {
            tree: QuadTree::new(world_bounds, config),
            snapshots: HashMap::new(),
            stats: SpatialStats::default(),
        }
    }

    /// Create a service from a simulation config
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.world_bounds, config.tree)
    }

    /// Re-index the world from this tick's snapshots
    ///
    /// Clears the tree and snapshot cache, then inserts every snapshot in
    /// slice order. Entity ids must be unique within one tick; a duplicate
    /// id leaves the index holding both entries but only the last snapshot.
    pub fn rebuild(&mut self, snapshots: &[EntitySnapshot]) {
        let stopwatch = Stopwatch::start_new();
        let clamped_before = self.tree.clamped_inserts();

        self.tree.clear();
        self.snapshots.clear();
        for snapshot in snapshots {
            self.tree
                .insert(snapshot.id, snapshot.position, snapshot.collision_radius());
            self.snapshots.insert(snapshot.id, *snapshot);
        }

        self.stats = SpatialStats {
            entity_count: self.tree.entity_count(),
            node_count: self.tree.node_count(),
            last_rebuild: stopwatch.elapsed(),
            clamped_inserts: self.tree.clamped_inserts(),
        };

        let clamped = self.tree.clamped_inserts() - clamped_before;
        if clamped > 0 {
            log::warn!("Spatial rebuild clamped {} out-of-bounds positions", clamped);
        }
        log::debug!(
            "Spatial index rebuilt: {} entities in {} nodes ({:.3} ms)",
            self.stats.entity_count,
            self.stats.node_count,
            self.stats.last_rebuild.as_secs_f32() * 1000.0
        );
    }

    /// Entities whose indexed position lies inside a rectangle
    pub fn query_rect(&self, rect: &Rect) -> Vec<EntityId> {
        self.tree
            .query_rect(rect)
            .into_iter()
            .map(|entry| entry.id)
            .collect()
    }

    /// Entities whose indexed position lies within a radius of a point
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        self.tree
            .query_radius(center, radius)
            .into_iter()
            .map(|entry| entry.id)
            .collect()
    }

    /// The entity nearest to a point, out to `max_radius`
    pub fn find_nearest(&self, point: Vec2, max_radius: f32) -> Option<SpatialEntry> {
        self.tree.find_nearest(point, max_radius)
    }

    /// The nearest entity whose snapshot satisfies a predicate
    ///
    /// Candidates are gathered out to `max_radius` and reduced to the
    /// minimum by (distance, id), so the winner is the true nearest match
    /// even when closer non-matching entities surround it.
    pub fn find_nearest_matching(
        &self,
        point: Vec2,
        max_radius: f32,
        predicate: impl Fn(&EntitySnapshot) -> bool,
    ) -> Option<SpatialEntry> {
        self.tree
            .query_radius(point, max_radius)
            .into_iter()
            .filter(|entry| self.snapshots.get(&entry.id).map_or(false, &predicate))
            .map(|entry| ((entry.position - point).magnitude(), entry))
            .min_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.1.id.cmp(&b.1.id))
            })
            .map(|(_, entry)| entry)
    }

    /// Entities inside the world rectangle seen by a camera
    ///
    /// The visible rectangle is centered on the camera and spans the
    /// viewport divided by zoom. A non-positive zoom sees nothing.
    pub fn query_camera_view(
        &self,
        camera_position: Vec2,
        viewport_size: Vec2,
        zoom: f32,
    ) -> Vec<EntityId> {
        if zoom <= 0.0 {
            return Vec::new();
        }
        let view = Rect::from_center_extents(camera_position, viewport_size * 0.5 / zoom);
        self.query_rect(&view)
    }

    /// Cast a ray and return every entity hit within `max_distance`,
    /// ordered nearest first
    pub fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Vec<RayHit> {
        self.tree.raycast(origin, direction, max_distance)
    }

    /// Deduplicated broad-phase collision candidate pairs for this tick
    ///
    /// Walks pairs sharing a node or an ancestor path and keeps those whose
    /// indexed circles actually overlap; exactly touching bounds do not
    /// pair. The output is sorted by (a, b) and free of duplicates.
    pub fn potential_collision_pairs(&self) -> Vec<CandidatePair> {
        let mut seen: HashSet<CandidatePair> = HashSet::new();
        let mut pairs = Vec::new();

        self.tree.for_each_nearby_pair(|x, y| {
            let circle_x = Circle::new(x.position, x.radius);
            let circle_y = Circle::new(y.position, y.radius);
            if circle_x.overlaps(&circle_y) {
                let pair = CandidatePair::new(x.id, y.id);
                if seen.insert(pair) {
                    pairs.push(pair);
                }
            }
        });

        pairs.sort_unstable();
        pairs
    }

    /// Snapshot published for an entity this tick, if any
    pub fn snapshot(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.snapshots.get(&id)
    }

    /// Statistics from the last rebuild
    pub fn stats(&self) -> SpatialStats {
        self.stats
    }

    /// Bounds of every index node (for debug rendering)
    pub fn node_bounds(&self) -> Vec<Rect> {
        self.tree.node_bounds()
    }

    /// World bounds covered by the index
    pub fn world_bounds(&self) -> Rect {
        self.tree.bounds()
    }
}
