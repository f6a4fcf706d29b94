//! Collision resolution and event classification
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! The resolver is the narrow phase. It consumes the candidate pairs the
//! spatial service produced, re-tests each pair against the entity store's
//! current snapshots, and classifies confirmed overlaps into physical
//! contacts and trigger notifications (GEA 13.3.10: collision event
//! callbacks). It owns no entity state beyond the pair sets needed for
//! enter/exit edge detection.

use std::collections::HashSet;

use crate::foundation::math::Vec2;
use crate::physics::collision::Circle;
use crate::spatial::query_service::{CandidatePair, SpatialQueryService};
use crate::world::{EntityId, EntitySnapshot};

/// When overlap events are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventMode {
    /// Emit an event on every tick a pair keeps overlapping
    #[default]
    EveryTick,

    /// Emit only on the tick a pair starts overlapping
    OnEnter,
}

/// Physical contact between two solid entities
///
/// `a` always carries the smaller entity id; the normal points from `a`
/// toward `b`.
#[derive(Debug, Clone, Copy)]
pub struct ContactEvent {
    /// Participant with the smaller id
    pub a: EntityId,
    /// Participant with the larger id
    pub b: EntityId,
    /// Midpoint between the two centers
    pub point: Vec2,
    /// Unit vector from `a`'s center toward `b`'s center
    pub normal: Vec2,
}

/// A trigger volume overlapped by another entity
#[derive(Debug, Clone, Copy)]
pub struct TriggerEvent {
    /// The trigger volume
    pub trigger: EntityId,
    /// The entity inside it
    pub other: EntityId,
}

/// Narrow-phase collision resolver
///
/// Holds the overlap sets of the current and previous tick so enter/exit
/// transitions can be derived by set difference.
pub struct CollisionResolver {
    mode: EventMode,

    /// Pairs confirmed overlapping this tick
    current_pairs: HashSet<CandidatePair>,

    /// Pairs confirmed overlapping last tick
    previous_pairs: HashSet<CandidatePair>,

    contacts: Vec<ContactEvent>,
    triggers: Vec<TriggerEvent>,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionResolver {
    /// Create a resolver that re-fires events every tick
    pub fn new() -> Self {
        Self::with_mode(EventMode::EveryTick)
    }

    /// Create a resolver with an explicit event mode
    pub fn with_mode(mode: EventMode) -> Self {
        Self {
            mode,
            current_pairs: HashSet::new(),
            previous_pairs: HashSet::new(),
            contacts: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Event mode in effect
    pub fn mode(&self) -> EventMode {
        self.mode
    }

    /// Run the narrow phase over this tick's candidate pairs
    ///
    /// `lookup` reads the external entity store. A pair whose participant
    /// has disappeared from the store (destroyed earlier in the tick) is
    /// skipped silently. If both snapshots resolve, the pair is re-tested
    /// with an exact circle-circle check before any event is emitted, so a
    /// stale candidate that no longer overlaps stays quiet too.
    pub fn resolve<F>(&mut self, pairs: &[CandidatePair], lookup: F)
    where
        F: Fn(EntityId) -> Option<EntitySnapshot>,
    {
        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();
        self.contacts.clear();
        self.triggers.clear();

        for &pair in pairs {
            let (a, b) = match (lookup(pair.a), lookup(pair.b)) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };

            let circle_a = Circle::new(a.position, a.collision_radius());
            let circle_b = Circle::new(b.position, b.collision_radius());
            if !circle_a.overlaps(&circle_b) {
                continue;
            }

            self.current_pairs.insert(pair);
            if self.mode == EventMode::OnEnter && self.previous_pairs.contains(&pair) {
                continue;
            }
            self.emit(&a, &b);
        }
    }

    /// Convenience wrapper that takes both pairs and snapshots from the
    /// spatial service
    ///
    /// Any mid-tick store mutation is invisible here; drive [`Self::resolve`]
    /// directly when the store can change between rebuild and resolution.
    pub fn resolve_from_service(&mut self, service: &SpatialQueryService) {
        let pairs = service.potential_collision_pairs();
        self.resolve(&pairs, |id| service.snapshot(id).copied());
    }

    fn emit(&mut self, a: &EntitySnapshot, b: &EntitySnapshot) {
        if a.is_trigger || b.is_trigger {
            // Each trigger participant observes the other; a trigger pair
            // produces no physical contact
            if a.is_trigger {
                self.triggers.push(TriggerEvent {
                    trigger: a.id,
                    other: b.id,
                });
            }
            if b.is_trigger {
                self.triggers.push(TriggerEvent {
                    trigger: b.id,
                    other: a.id,
                });
            }
            return;
        }

        let point = (a.position + b.position) * 0.5;
        let delta = b.position - a.position;
        let distance = delta.magnitude();
        // Coincident centers have no meaningful direction; fall back to +X
        let normal = if distance > f32::EPSILON {
            delta / distance
        } else {
            Vec2::new(1.0, 0.0)
        };

        self.contacts.push(ContactEvent {
            a: a.id,
            b: b.id,
            point,
            normal,
        });
    }

    /// Physical contact events from the last resolve
    pub fn contacts(&self) -> &[ContactEvent] {
        &self.contacts
    }

    /// Trigger events from the last resolve
    pub fn triggers(&self) -> &[TriggerEvent] {
        &self.triggers
    }

    /// All pairs confirmed overlapping this tick
    pub fn overlapping_pairs(&self) -> &HashSet<CandidatePair> {
        &self.current_pairs
    }

    /// Pairs that started overlapping this tick
    pub fn pairs_entered(&self) -> Vec<CandidatePair> {
        self.current_pairs
            .difference(&self.previous_pairs)
            .copied()
            .collect()
    }

    /// Pairs that stopped overlapping this tick
    pub fn pairs_exited(&self) -> Vec<CandidatePair> {
        self.previous_pairs
            .difference(&self.current_pairs)
            .copied()
            .collect()
    }

    /// Forget all overlap history and pending events
    pub fn clear(&mut self) {
        self.current_pairs.clear();
        self.previous_pairs.clear();
        self.contacts.clear();
        self.triggers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Rect;
    use crate::spatial::QuadTreeConfig;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn snap(raw_id: u32, x: f32, y: f32, radius: f32) -> EntitySnapshot {
        EntitySnapshot::new(EntityId::new(raw_id), Vec2::new(x, y)).with_radius(radius)
    }

    fn store(snapshots: &[EntitySnapshot]) -> HashMap<EntityId, EntitySnapshot> {
        snapshots.iter().map(|s| (s.id, *s)).collect()
    }

    fn pair(a: u32, b: u32) -> CandidatePair {
        CandidatePair::new(EntityId::new(a), EntityId::new(b))
    }

    #[test]
    fn test_contact_midpoint_and_normal() {
        let snapshots = [snap(1, 0.0, 0.0, 10.0), snap(2, 15.0, 0.0, 10.0)];
        let store = store(&snapshots);
        let mut resolver = CollisionResolver::new();
        resolver.resolve(&[pair(1, 2)], |id| store.get(&id).copied());

        assert_eq!(resolver.contacts().len(), 1);
        let contact = resolver.contacts()[0];
        assert_eq!(contact.a, EntityId::new(1));
        assert_eq!(contact.b, EntityId::new(2));
        assert_relative_eq!(contact.point.x, 7.5);
        assert_relative_eq!(contact.point.y, 0.0);
        assert_relative_eq!(contact.normal.x, 1.0);
        assert_relative_eq!(contact.normal.y, 0.0);
    }

    #[test]
    fn test_normal_points_from_smaller_to_larger_id() {
        // The smaller id sits to the right, so the normal points -X
        let snapshots = [snap(1, 15.0, 0.0, 10.0), snap(2, 0.0, 0.0, 10.0)];
        let store = store(&snapshots);
        let mut resolver = CollisionResolver::new();
        resolver.resolve(&[pair(2, 1)], |id| store.get(&id).copied());

        let contact = resolver.contacts()[0];
        assert_eq!(contact.a, EntityId::new(1));
        assert_relative_eq!(contact.normal.x, -1.0);
    }

    #[test]
    fn test_coincident_centers_fall_back_to_plus_x() {
        let snapshots = [snap(1, 3.0, 4.0, 5.0), snap(2, 3.0, 4.0, 5.0)];
        let store = store(&snapshots);
        let mut resolver = CollisionResolver::new();
        resolver.resolve(&[pair(1, 2)], |id| store.get(&id).copied());

        let contact = resolver.contacts()[0];
        assert_relative_eq!(contact.point.x, 3.0);
        assert_relative_eq!(contact.point.y, 4.0);
        assert_relative_eq!(contact.normal.x, 1.0);
        assert_relative_eq!(contact.normal.y, 0.0);
    }

    #[test]
    fn test_trigger_pair_emits_notification_not_contact() {
        let snapshots = [
            snap(1, 0.0, 0.0, 10.0),
            snap(2, 5.0, 0.0, 10.0).as_trigger(),
        ];
        let store = store(&snapshots);
        let mut resolver = CollisionResolver::new();
        resolver.resolve(&[pair(1, 2)], |id| store.get(&id).copied());

        assert!(resolver.contacts().is_empty());
        assert_eq!(resolver.triggers().len(), 1);
        let trigger = resolver.triggers()[0];
        assert_eq!(trigger.trigger, EntityId::new(2));
        assert_eq!(trigger.other, EntityId::new(1));
    }

    #[test]
    fn test_two_triggers_notify_each_other() {
        let snapshots = [
            snap(1, 0.0, 0.0, 10.0).as_trigger(),
            snap(2, 5.0, 0.0, 10.0).as_trigger(),
        ];
        let store = store(&snapshots);
        let mut resolver = CollisionResolver::new();
        resolver.resolve(&[pair(1, 2)], |id| store.get(&id).copied());

        assert!(resolver.contacts().is_empty());
        assert_eq!(resolver.triggers().len(), 2);
    }

    #[test]
    fn test_every_tick_mode_refires_while_overlap_lasts() {
        let snapshots = [snap(1, 0.0, 0.0, 10.0), snap(2, 15.0, 0.0, 10.0)];
        let store = store(&snapshots);
        let mut resolver = CollisionResolver::new();

        resolver.resolve(&[pair(1, 2)], |id| store.get(&id).copied());
        assert_eq!(resolver.contacts().len(), 1);
        assert_eq!(resolver.pairs_entered(), vec![pair(1, 2)]);

        resolver.resolve(&[pair(1, 2)], |id| store.get(&id).copied());
        assert_eq!(resolver.contacts().len(), 1);
        assert!(resolver.pairs_entered().is_empty());
        assert!(resolver.pairs_exited().is_empty());
    }

    #[test]
    fn test_on_enter_mode_fires_on_transitions_only() {
        let overlapping = [snap(1, 0.0, 0.0, 10.0), snap(2, 15.0, 0.0, 10.0)];
        let apart = [snap(1, 0.0, 0.0, 10.0), snap(2, 500.0, 0.0, 10.0)];
        let mut resolver = CollisionResolver::with_mode(EventMode::OnEnter);

        let store_overlap = store(&overlapping);
        resolver.resolve(&[pair(1, 2)], |id| store_overlap.get(&id).copied());
        assert_eq!(resolver.contacts().len(), 1);

        // Still overlapping: confirmed but silent
        resolver.resolve(&[pair(1, 2)], |id| store_overlap.get(&id).copied());
        assert!(resolver.contacts().is_empty());
        assert_eq!(resolver.overlapping_pairs().len(), 1);

        // Separated: exit edge reported, nothing fires
        let store_apart = store(&apart);
        resolver.resolve(&[pair(1, 2)], |id| store_apart.get(&id).copied());
        assert!(resolver.contacts().is_empty());
        assert_eq!(resolver.pairs_exited(), vec![pair(1, 2)]);

        // Overlapping again: fires again
        resolver.resolve(&[pair(1, 2)], |id| store_overlap.get(&id).copied());
        assert_eq!(resolver.contacts().len(), 1);
    }

    #[test]
    fn test_stale_pair_is_skipped() {
        let snapshots = [snap(1, 0.0, 0.0, 10.0)];
        let store = store(&snapshots);
        let mut resolver = CollisionResolver::new();
        resolver.resolve(&[pair(1, 99)], |id| store.get(&id).copied());

        assert!(resolver.contacts().is_empty());
        assert!(resolver.triggers().is_empty());
        assert!(resolver.overlapping_pairs().is_empty());
    }

    #[test]
    fn test_touching_candidates_are_rejected_by_narrow_phase() {
        let snapshots = [snap(1, 0.0, 0.0, 10.0), snap(2, 20.0, 0.0, 10.0)];
        let store = store(&snapshots);
        let mut resolver = CollisionResolver::new();
        resolver.resolve(&[pair(1, 2)], |id| store.get(&id).copied());

        assert!(resolver.contacts().is_empty());
        assert!(resolver.overlapping_pairs().is_empty());
    }

    #[test]
    fn test_resolve_from_service_end_to_end() {
        let world = Rect::new(Vec2::new(-1000.0, -1000.0), Vec2::new(1000.0, 1000.0));
        let mut service = SpatialQueryService::new(world, QuadTreeConfig::default());
        service.rebuild(&[
            snap(1, 0.0, 0.0, 10.0),
            snap(2, 15.0, 0.0, 10.0),
            snap(3, 500.0, 500.0, 10.0),
        ]);

        let mut resolver = CollisionResolver::new();
        resolver.resolve_from_service(&service);

        assert_eq!(resolver.contacts().len(), 1);
        let contact = resolver.contacts()[0];
        assert_eq!((contact.a, contact.b), (EntityId::new(1), EntityId::new(2)));
    }
}
