//! Quadtree spatial partitioning structure
//!
//! Efficiently divides 2D space into hierarchical regions for fast
//! spatial queries. Each node subdivides into 4 quadrants when entity
//! density exceeds a threshold.
//!
//! Entries are stored at the deepest node that fully contains their
//! circular bound: an entry whose circle straddles a split line stays at
//! the parent. Two overlapping circles therefore always share a node or
//! lie on one ancestor path, which is what the pair walk in
//! [`crate::spatial::query_service`] relies on.

use crate::foundation::math::{Rect, Vec2};
use crate::physics::collision::{Circle, Ray, RayHit};
use crate::world::EntityId;

/// Configuration for quadtree behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuadTreeConfig {
    /// Maximum entries per node before subdivision
    pub max_entries_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_entries_per_node: 8,
            max_depth: 8,
        }
    }
}

/// Entity stored in the quadtree with position and bound radius
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    /// Entity identifier
    pub id: EntityId,
    /// World-space position
    pub position: Vec2,
    /// Circular bound radius
    pub radius: f32,
}

/// Single node in the quadtree hierarchy
#[derive(Debug, Clone)]
pub struct QuadTreeNode {
    /// World-space bounds of this node
    pub bounds: Rect,

    /// Entries stored at this node
    ///
    /// Leaves hold everything that reached them; internal nodes hold the
    /// entries whose circle does not fit any single child quadrant.
    pub entries: Vec<SpatialEntry>,

    /// Child nodes (4 quadrants), None if this is a leaf
    pub children: Option<Box<[QuadTreeNode; 4]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl QuadTreeNode {
    /// Create a new leaf node
    pub fn new(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Subdivide this node into 4 children and push entries down
    ///
    /// Entries whose circle straddles a split line stay at this node.
    /// Redistribution inserts recursively, so a child that ends up over
    /// capacity splits again immediately.
    fn subdivide(&mut self, config: &QuadTreeConfig) {
        if self.children.is_some() {
            return; // Already subdivided
        }

        let quads = self.bounds.quadrants();
        let child_depth = self.depth + 1;
        self.children = Some(Box::new([
            QuadTreeNode::new(quads[0], child_depth),
            QuadTreeNode::new(quads[1], child_depth),
            QuadTreeNode::new(quads[2], child_depth),
            QuadTreeNode::new(quads[3], child_depth),
        ]));

        let entries_to_distribute = std::mem::take(&mut self.entries);
        for entry in entries_to_distribute {
            let quadrant = self.bounds.quadrant_index(entry.position);
            if let Some(ref mut children) = self.children {
                if children[quadrant].bounds.contains_circle(entry.position, entry.radius) {
                    children[quadrant].insert(entry, config);
                } else {
                    self.entries.push(entry);
                }
            }
        }
    }

    /// Insert an entry into this node or a descendant
    ///
    /// The caller guarantees the entry position lies within this node's
    /// bounds; the root clamps before descending.
    pub fn insert(&mut self, entry: SpatialEntry, config: &QuadTreeConfig) {
        if self.is_leaf() {
            self.entries.push(entry);
            if self.entries.len() > config.max_entries_per_node && self.depth < config.max_depth {
                self.subdivide(config);
            }
            return;
        }

        // Branch node: descend only while a single quadrant fully contains
        // the entry's circle
        let quadrant = self.bounds.quadrant_index(entry.position);
        if let Some(ref mut children) = self.children {
            if children[quadrant].bounds.contains_circle(entry.position, entry.radius) {
                children[quadrant].insert(entry, config);
                return;
            }
        }
        self.entries.push(entry);
    }

    /// Query all entries whose position lies inside a rectangle
    pub fn query_rect(&self, rect: &Rect, results: &mut Vec<SpatialEntry>) {
        if !self.bounds.intersects(rect) {
            return; // Rectangle doesn't reach this node
        }

        for entry in &self.entries {
            if rect.contains_point(entry.position) {
                results.push(*entry);
            }
        }

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_rect(rect, results);
            }
        }
    }

    /// Query all entries whose position lies within a radius of a point
    pub fn query_radius(&self, center: Vec2, radius: f32, results: &mut Vec<SpatialEntry>) {
        // Quick bounds check - if the circle doesn't reach this node, skip
        let closest_point = self.bounds.closest_point(center);
        let distance_sq = (closest_point - center).magnitude_squared();
        if distance_sq > radius * radius {
            return;
        }

        for entry in &self.entries {
            let entry_distance_sq = (entry.position - center).magnitude_squared();
            if entry_distance_sq <= radius * radius {
                results.push(*entry);
            }
        }

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_radius(center, radius, results);
            }
        }
    }

    /// Find the nearest entry to a point, searching best-first
    ///
    /// `best` carries the running winner and its distance. A subtree is
    /// skipped only when its bounds cannot hold anything strictly closer
    /// than the current best, so equal-distance candidates are still
    /// visited and the ascending-id tie-break stays exact.
    fn find_nearest(&self, point: Vec2, max_radius: f32, best: &mut Option<(SpatialEntry, f32)>) {
        let bounds_distance = (self.bounds.closest_point(point) - point).magnitude();
        if bounds_distance > max_radius {
            return;
        }
        if let Some((_, best_distance)) = *best {
            if bounds_distance > best_distance {
                return;
            }
        }

        for entry in &self.entries {
            let distance = (entry.position - point).magnitude();
            if distance > max_radius {
                continue;
            }
            let is_better = match *best {
                None => true,
                Some((best_entry, best_distance)) => {
                    distance < best_distance
                        || (distance == best_distance && entry.id < best_entry.id)
                }
            };
            if is_better {
                *best = Some((*entry, distance));
            }
        }

        if let Some(ref children) = self.children {
            // Visit nearer quadrants first so the prune cuts the rest
            let mut distances = [0.0f32; 4];
            for (i, child) in children.iter().enumerate() {
                distances[i] = (child.bounds.closest_point(point) - point).magnitude_squared();
            }
            let mut order = [0usize, 1, 2, 3];
            order.sort_by(|&a, &b| {
                distances[a]
                    .partial_cmp(&distances[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            for &i in &order {
                children[i].find_nearest(point, max_radius, best);
            }
        }
    }

    /// Collect entries in nodes a ray passes through
    ///
    /// Bounds are expanded by the largest entry radius in the tree so that
    /// clamped entries poking past the root boundary are still found.
    fn query_ray(
        &self,
        ray: &Ray,
        max_distance: f32,
        max_entity_radius: f32,
        results: &mut Vec<SpatialEntry>,
    ) {
        let expanded_bounds = if max_entity_radius > 0.0 {
            self.bounds.expanded(max_entity_radius)
        } else {
            self.bounds
        };

        match expanded_bounds.intersect_ray(ray.origin, ray.direction) {
            None => return,
            Some(entry_distance) if entry_distance > max_distance => return,
            Some(_) => {}
        }

        results.extend_from_slice(&self.entries);

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_ray(ray, max_distance, max_entity_radius, results);
            }
        }
    }

    /// Visit every unordered pair of entries that share a node, plus every
    /// pair formed by an entry and one stored at an ancestor node
    ///
    /// Together with the containment rule for straddling entries this
    /// visits every pair of overlapping circles exactly once.
    pub(crate) fn for_each_nearby_pair<'a>(
        &'a self,
        ancestors: &mut Vec<&'a [SpatialEntry]>,
        f: &mut impl FnMut(&SpatialEntry, &SpatialEntry),
    ) {
        for i in 0..self.entries.len() {
            for j in (i + 1)..self.entries.len() {
                f(&self.entries[i], &self.entries[j]);
            }
        }

        for entry in &self.entries {
            for ancestor_entries in ancestors.iter() {
                for ancestor in *ancestor_entries {
                    f(ancestor, entry);
                }
            }
        }

        if let Some(ref children) = self.children {
            ancestors.push(&self.entries);
            for child in children.iter() {
                child.for_each_nearby_pair(ancestors, f);
            }
            ancestors.pop();
        }
    }

    /// Count entries in this node and all children
    pub fn count_entries(&self) -> usize {
        let mut count = self.entries.len();

        if let Some(ref children) = self.children {
            for child in children.iter() {
                count += child.count_entries();
            }
        }

        count
    }

    /// Count nodes in this subtree, including this node
    pub fn count_nodes(&self) -> usize {
        let mut count = 1;

        if let Some(ref children) = self.children {
            for child in children.iter() {
                count += child.count_nodes();
            }
        }

        count
    }

    /// Collect the bounds of every node in this subtree (for visualization)
    pub fn collect_bounds(&self, out: &mut Vec<Rect>) {
        out.push(self.bounds);

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.collect_bounds(out);
            }
        }
    }
}

/// Quadtree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct QuadTree {
    /// Root node covering the entire world space
    pub root: QuadTreeNode,

    /// Configuration
    config: QuadTreeConfig,

    /// Cached maximum entry radius in the tree (updated on insert)
    max_entity_radius: f32,

    /// Lifetime count of insertions whose position had to be clamped
    clamped_inserts: u64,
}

impl QuadTree {
    /// Create a new quadtree with given world bounds
    pub fn new(world_bounds: Rect, config: QuadTreeConfig) -> Self {
        Self {
            root: QuadTreeNode::new(world_bounds, 0),
            config,
            max_entity_radius: 0.0,
            clamped_inserts: 0,
        }
    }

    /// World bounds covered by this tree
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Configuration in effect
    pub fn config(&self) -> QuadTreeConfig {
        self.config
    }

    /// Insert an entity into the quadtree
    ///
    /// A position outside the world bounds is clamped to the nearest point
    /// on the boundary and counted; insertion never fails. A negative
    /// radius is treated as zero.
    pub fn insert(&mut self, id: EntityId, position: Vec2, radius: f32) {
        let clamped = self.root.bounds.closest_point(position);
        if clamped != position {
            self.clamped_inserts += 1;
            log::trace!("Clamped insert of {} from {:?} to {:?}", id, position, clamped);
        }

        let radius = radius.max(0.0);
        if radius > self.max_entity_radius {
            self.max_entity_radius = radius;
        }

        let entry = SpatialEntry {
            id,
            position: clamped,
            radius,
        };
        self.root.insert(entry, &self.config);
    }

    /// Query all entries whose position lies inside a rectangle
    pub fn query_rect(&self, rect: &Rect) -> Vec<SpatialEntry> {
        let mut results = Vec::new();
        self.root.query_rect(rect, &mut results);
        results
    }

    /// Query all entries whose position lies within a radius of a point
    ///
    /// A zero or negative radius matches nothing.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<SpatialEntry> {
        if radius <= 0.0 {
            return Vec::new();
        }
        let mut results = Vec::new();
        self.root.query_radius(center, radius, &mut results);
        results
    }

    /// Find the entry nearest to a point, out to `max_radius`
    ///
    /// Returns the global minimum by Euclidean distance; equal distances
    /// are broken by ascending entity id. A zero or negative `max_radius`
    /// matches nothing.
    pub fn find_nearest(&self, point: Vec2, max_radius: f32) -> Option<SpatialEntry> {
        if max_radius <= 0.0 {
            return None;
        }
        let mut best = None;
        self.root.find_nearest(point, max_radius, &mut best);
        best.map(|(entry, _)| entry)
    }

    /// Cast a ray and return every entry whose circular bound it hits
    /// within `max_distance`, ordered nearest first
    ///
    /// Equal hit distances are ordered by ascending entity id. A zero
    /// direction or non-positive `max_distance` yields no hits.
    pub fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Vec<RayHit> {
        if max_distance <= 0.0 || direction.magnitude_squared() <= f32::EPSILON {
            return Vec::new();
        }

        let ray = Ray::new(origin, direction);
        let mut candidates = Vec::new();
        self.root
            .query_ray(&ray, max_distance, self.max_entity_radius, &mut candidates);

        let mut hits = Vec::new();
        for entry in candidates {
            let circle = Circle::new(entry.position, entry.radius);
            if let Some((distance, point, normal)) = circle.intersect_ray(&ray) {
                if distance <= max_distance {
                    hits.push(RayHit {
                        entity: entry.id,
                        distance,
                        point,
                        normal,
                    });
                }
            }
        }

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.entity.cmp(&b.entity))
        });
        hits
    }

    /// Visit every unordered pair of entries sharing a node or an
    /// ancestor path
    pub fn for_each_nearby_pair(&self, mut f: impl FnMut(&SpatialEntry, &SpatialEntry)) {
        let mut ancestors = Vec::new();
        self.root.for_each_nearby_pair(&mut ancestors, &mut f);
    }

    /// Get total entry count
    pub fn entity_count(&self) -> usize {
        self.root.count_entries()
    }

    /// Get total node count
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Get the bounds of every node (for debug rendering)
    pub fn node_bounds(&self) -> Vec<Rect> {
        let mut bounds = Vec::new();
        self.root.collect_bounds(&mut bounds);
        bounds
    }

    /// Lifetime count of clamped insertions
    pub fn clamped_inserts(&self) -> u64 {
        self.clamped_inserts
    }

    /// Clear the quadtree, keeping bounds and configuration
    pub fn clear(&mut self) {
        self.root = QuadTreeNode::new(self.root.bounds, 0);
        self.max_entity_radius = 0.0;
    }
}
