//! Target acquisition for armed entities
//!
//! Each tick an armed entity asks for a fresh [`TargetState`]: candidates
//! inside the profile's range are filtered (faction, tags, liveness, plus
//! any caller predicate), ranked by the profile's priority, optionally
//! checked for line of sight, and the winner gets a lead position solved
//! against its current velocity. Acquisition holds no state between ticks,
//! so a destroyed or newly invalid target is simply never produced again.

use crate::foundation::math::Vec2;
use crate::spatial::query_service::SpatialQueryService;
use crate::world::{EntityId, EntitySnapshot, EntityTags, FactionId};

/// How filtered candidates are ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPriority {
    /// Closest candidate first; ties broken by ascending entity id
    #[default]
    Nearest,

    /// Lowest health first; ties broken by ascending entity id.
    /// Candidates without a health value rank last.
    Weakest,
}

/// Per-entity targeting configuration
#[derive(Debug, Clone, Copy)]
pub struct TargetingProfile {
    /// Maximum acquisition range
    pub max_range: f32,

    /// Ranking applied to filtered candidates
    pub priority: TargetPriority,

    /// Require an unobstructed ray to the candidate
    pub require_line_of_sight: bool,

    /// Projectile speed used for lead prediction; zero disables leading
    pub projectile_speed: f32,

    /// Candidates of this faction are never targeted
    pub exclude_faction: Option<FactionId>,

    /// Candidates carrying any of these tags are never targeted
    pub exclude_tags: EntityTags,
}

impl Default for TargetingProfile {
    fn default() -> Self {
        Self {
            max_range: 500.0,
            priority: TargetPriority::Nearest,
            require_line_of_sight: false,
            projectile_speed: 0.0,
            exclude_faction: None,
            exclude_tags: EntityTags::empty(),
        }
    }
}

impl TargetingProfile {
    /// Create a profile with the given range and defaults elsewhere
    pub fn new(max_range: f32) -> Self {
        Self {
            max_range,
            ..Default::default()
        }
    }

    /// Set the ranking priority
    pub fn with_priority(mut self, priority: TargetPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Require (or not) an unobstructed line of sight
    pub fn with_line_of_sight(mut self, required: bool) -> Self {
        self.require_line_of_sight = required;
        self
    }

    /// Set the projectile speed used for lead prediction
    pub fn with_projectile_speed(mut self, speed: f32) -> Self {
        self.projectile_speed = speed;
        self
    }

    /// Exclude a faction (typically the shooter's own)
    pub fn with_excluded_faction(mut self, faction: FactionId) -> Self {
        self.exclude_faction = Some(faction);
        self
    }

    /// Exclude candidates carrying any of these tags
    pub fn with_excluded_tags(mut self, tags: EntityTags) -> Self {
        self.exclude_tags = tags;
        self
    }
}

/// Result of one acquisition pass
#[derive(Debug, Clone, Copy)]
pub struct TargetState {
    /// Selected target, if any candidate survived filtering
    pub target: Option<EntityId>,

    /// Distance from shooter to target position
    pub distance: f32,

    /// Unit vector from shooter toward the target's current position
    pub direction: Vec2,

    /// Position to aim at so a projectile meets the moving target
    pub lead_position: Vec2,

    /// Whether the target lies within the profile's range
    pub in_range: bool,

    /// Whether the ray to the target was unobstructed
    pub has_line_of_sight: bool,
}

impl TargetState {
    /// State representing "no target this tick"
    pub fn none() -> Self {
        Self {
            target: None,
            distance: 0.0,
            direction: Vec2::zeros(),
            lead_position: Vec2::zeros(),
            in_range: false,
            has_line_of_sight: false,
        }
    }

    /// Whether a target was acquired
    pub fn is_acquired(&self) -> bool {
        self.target.is_some()
    }
}

/// Stateless per-tick target selection
pub struct TargetAcquisition;

impl Default for TargetAcquisition {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetAcquisition {
    /// Create a target acquisition system
    pub fn new() -> Self {
        Self
    }

    /// Acquire a target for the shooter using the profile's filters only
    pub fn acquire(
        &self,
        service: &SpatialQueryService,
        shooter_id: EntityId,
        profile: &TargetingProfile,
    ) -> TargetState {
        self.acquire_with(service, shooter_id, profile, |_| true)
    }

    /// Acquire a target with an additional caller-supplied predicate
    ///
    /// The predicate sees each candidate snapshot after the profile filters
    /// pass; returning false removes the candidate. A shooter id unknown to
    /// the service yields no target.
    pub fn acquire_with(
        &self,
        service: &SpatialQueryService,
        shooter_id: EntityId,
        profile: &TargetingProfile,
        predicate: impl Fn(&EntitySnapshot) -> bool,
    ) -> TargetState {
        let shooter = match service.snapshot(shooter_id) {
            Some(snapshot) => *snapshot,
            None => return TargetState::none(),
        };

        let mut candidates: Vec<(f32, EntitySnapshot)> = Vec::new();
        for id in service.query_radius(shooter.position, profile.max_range) {
            if id == shooter_id {
                continue;
            }
            let candidate = match service.snapshot(id) {
                Some(snapshot) => *snapshot,
                None => continue,
            };
            if !passes_profile(&candidate, profile) || !predicate(&candidate) {
                continue;
            }
            let distance = (candidate.position - shooter.position).magnitude();
            candidates.push((distance, candidate));
        }

        match profile.priority {
            TargetPriority::Nearest => candidates.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.1.id.cmp(&b.1.id))
            }),
            TargetPriority::Weakest => candidates.sort_by(|a, b| {
                let health_a = a.1.health.unwrap_or(f32::INFINITY);
                let health_b = b.1.health.unwrap_or(f32::INFINITY);
                health_a
                    .partial_cmp(&health_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.1.id.cmp(&b.1.id))
            }),
        }

        for (distance, candidate) in candidates {
            let line_of_sight = has_line_of_sight(service, &shooter, &candidate, distance);
            if profile.require_line_of_sight && !line_of_sight {
                continue;
            }

            let direction = if distance > f32::EPSILON {
                (candidate.position - shooter.position) / distance
            } else {
                Vec2::zeros()
            };
            let lead_position = intercept_position(
                shooter.position,
                candidate.position,
                candidate.velocity_or_zero(),
                profile.projectile_speed,
            )
            .unwrap_or(candidate.position);

            return TargetState {
                target: Some(candidate.id),
                distance,
                direction,
                lead_position,
                in_range: distance <= profile.max_range,
                has_line_of_sight: line_of_sight,
            };
        }

        TargetState::none()
    }
}

/// Profile filters shared by both acquisition entry points
fn passes_profile(candidate: &EntitySnapshot, profile: &TargetingProfile) -> bool {
    if profile.exclude_faction.is_some() && candidate.faction == profile.exclude_faction {
        return false;
    }
    if candidate.tags.intersects(profile.exclude_tags) {
        return false;
    }
    candidate.is_alive()
}

/// Whether the segment from shooter to candidate is free of other entities
///
/// Only hits strictly before the candidate's position block the line; the
/// shooter's and candidate's own bounds are ignored.
fn has_line_of_sight(
    service: &SpatialQueryService,
    shooter: &EntitySnapshot,
    candidate: &EntitySnapshot,
    distance: f32,
) -> bool {
    if distance <= f32::EPSILON {
        return true;
    }
    let direction = (candidate.position - shooter.position) / distance;
    let hits = service.raycast(shooter.position, direction, distance);
    !hits.iter().any(|hit| {
        hit.entity != shooter.id && hit.entity != candidate.id && hit.distance < distance
    })
}

/// Position to aim at so a projectile fired now meets the target
///
/// Solves |target + v*t - origin| = speed*t for the smallest positive t.
/// Returns None when no positive-time intercept exists (for example a
/// target receding faster than the projectile).
pub fn intercept_position(
    origin: Vec2,
    target: Vec2,
    target_velocity: Vec2,
    projectile_speed: f32,
) -> Option<Vec2> {
    if projectile_speed <= 0.0 {
        return None;
    }

    let to_target = target - origin;
    let c = to_target.magnitude_squared();
    if c <= f32::EPSILON {
        return Some(target);
    }

    let a = target_velocity.magnitude_squared() - projectile_speed * projectile_speed;
    let b = 2.0 * to_target.dot(&target_velocity);

    let t = if a.abs() <= f32::EPSILON {
        // Speeds match; the quadratic degenerates to a linear equation
        if b >= 0.0 {
            return None;
        }
        -c / b
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_discriminant = discriminant.sqrt();
        let t1 = (-b - sqrt_discriminant) / (2.0 * a);
        let t2 = (-b + sqrt_discriminant) / (2.0 * a);
        match (t1 > 0.0, t2 > 0.0) {
            (true, true) => t1.min(t2),
            (true, false) => t1,
            (false, true) => t2,
            (false, false) => return None,
        }
    };

    Some(target + target_velocity * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Rect;
    use crate::spatial::QuadTreeConfig;
    use approx::assert_relative_eq;

    fn service_with(snapshots: &[EntitySnapshot]) -> SpatialQueryService {
        let world = Rect::new(Vec2::new(-1000.0, -1000.0), Vec2::new(1000.0, 1000.0));
        let mut service = SpatialQueryService::new(world, QuadTreeConfig::default());
        service.rebuild(snapshots);
        service
    }

    fn id(raw: u32) -> EntityId {
        EntityId::new(raw)
    }

    fn shooter(raw_id: u32, faction: u32) -> EntitySnapshot {
        EntitySnapshot::new(id(raw_id), Vec2::new(0.0, 0.0))
            .with_radius(1.0)
            .with_faction(FactionId::new(faction))
    }

    fn hostile(raw_id: u32, x: f32, y: f32, health: f32) -> EntitySnapshot {
        EntitySnapshot::new(id(raw_id), Vec2::new(x, y))
            .with_radius(1.0)
            .with_faction(FactionId::new(1))
            .with_health(health)
    }

    #[test]
    fn test_nearest_priority_picks_closest() {
        let service = service_with(&[
            shooter(1, 0),
            hostile(2, 50.0, 0.0, 80.0),
            hostile(3, 90.0, 0.0, 20.0),
        ]);
        let profile = TargetingProfile::new(200.0).with_excluded_faction(FactionId::new(0));

        let state = TargetAcquisition::new().acquire(&service, id(1), &profile);
        assert_eq!(state.target, Some(id(2)));
        assert_relative_eq!(state.distance, 50.0);
        assert_relative_eq!(state.direction.x, 1.0);
        assert!(state.in_range);
    }

    #[test]
    fn test_weakest_priority_picks_lowest_health() {
        let service = service_with(&[
            shooter(1, 0),
            hostile(2, 50.0, 0.0, 80.0),
            hostile(3, 90.0, 0.0, 20.0),
        ]);
        let profile = TargetingProfile::new(200.0)
            .with_excluded_faction(FactionId::new(0))
            .with_priority(TargetPriority::Weakest);

        let state = TargetAcquisition::new().acquire(&service, id(1), &profile);
        assert_eq!(state.target, Some(id(3)));
    }

    #[test]
    fn test_weakest_ranks_healthless_candidates_last() {
        let indestructible = EntitySnapshot::new(id(2), Vec2::new(10.0, 0.0))
            .with_radius(1.0)
            .with_faction(FactionId::new(1));
        let service = service_with(&[shooter(1, 0), indestructible, hostile(3, 90.0, 0.0, 500.0)]);
        let profile = TargetingProfile::new(200.0)
            .with_excluded_faction(FactionId::new(0))
            .with_priority(TargetPriority::Weakest);

        let state = TargetAcquisition::new().acquire(&service, id(1), &profile);
        assert_eq!(state.target, Some(id(3)));
    }

    #[test]
    fn test_line_of_sight_flag_reports_blocker() {
        let blocker = EntitySnapshot::new(id(2), Vec2::new(100.0, 0.0))
            .with_radius(20.0)
            .with_tags(EntityTags::STRUCTURE);
        let service = service_with(&[shooter(1, 0), blocker, hostile(3, 200.0, 0.0, 50.0)]);
        let profile = TargetingProfile::new(500.0)
            .with_excluded_faction(FactionId::new(0))
            .with_excluded_tags(EntityTags::STRUCTURE);

        let state = TargetAcquisition::new().acquire(&service, id(1), &profile);
        assert_eq!(state.target, Some(id(3)));
        assert!(!state.has_line_of_sight);
    }

    #[test]
    fn test_required_line_of_sight_falls_through_to_clear_candidate() {
        let blocker = EntitySnapshot::new(id(2), Vec2::new(100.0, 0.0))
            .with_radius(20.0)
            .with_tags(EntityTags::STRUCTURE);
        let service = service_with(&[
            shooter(1, 0),
            blocker,
            hostile(3, 200.0, 0.0, 50.0),
            hostile(4, 0.0, 300.0, 50.0),
        ]);
        let profile = TargetingProfile::new(500.0)
            .with_excluded_faction(FactionId::new(0))
            .with_excluded_tags(EntityTags::STRUCTURE)
            .with_line_of_sight(true);

        let state = TargetAcquisition::new().acquire(&service, id(1), &profile);
        assert_eq!(state.target, Some(id(4)));
        assert!(state.has_line_of_sight);
    }

    #[test]
    fn test_filters_exclude_allied_dead_and_tagged() {
        let ally = hostile(2, 30.0, 0.0, 50.0).with_faction(FactionId::new(0));
        let dead = hostile(3, 40.0, 0.0, 0.0);
        let debris = hostile(4, 50.0, 0.0, 50.0).with_tags(EntityTags::DEBRIS);
        let valid = hostile(5, 60.0, 0.0, 50.0);
        let service = service_with(&[shooter(1, 0), ally, dead, debris, valid]);
        let profile = TargetingProfile::new(200.0)
            .with_excluded_faction(FactionId::new(0))
            .with_excluded_tags(EntityTags::DEBRIS);

        let state = TargetAcquisition::new().acquire(&service, id(1), &profile);
        assert_eq!(state.target, Some(id(5)));
    }

    #[test]
    fn test_caller_predicate_refines_candidates() {
        let service = service_with(&[
            shooter(1, 0),
            hostile(2, 50.0, 0.0, 80.0),
            hostile(3, 90.0, 0.0, 20.0),
        ]);
        let profile = TargetingProfile::new(200.0).with_excluded_faction(FactionId::new(0));

        let state = TargetAcquisition::new().acquire_with(&service, id(1), &profile, |s| {
            s.id != id(2)
        });
        assert_eq!(state.target, Some(id(3)));
    }

    #[test]
    fn test_unknown_shooter_and_empty_field_yield_none() {
        let service = service_with(&[shooter(1, 0)]);
        let profile = TargetingProfile::new(200.0);

        let missing = TargetAcquisition::new().acquire(&service, id(42), &profile);
        assert!(!missing.is_acquired());

        let lonely = TargetAcquisition::new().acquire(&service, id(1), &profile);
        assert!(!lonely.is_acquired());
        assert_eq!(lonely.distance, 0.0);
    }

    #[test]
    fn test_acquisition_is_deterministic_across_identical_rebuilds() {
        // Candidates 2 and 3 are equidistant; the lower id must win, and
        // the answer must not depend on which rebuild produced the index
        let snapshots = [
            shooter(1, 0),
            hostile(2, 50.0, 0.0, 80.0),
            hostile(3, 50.0, 0.0, 80.0),
            hostile(4, 90.0, 0.0, 20.0),
        ];
        let profile = TargetingProfile::new(200.0).with_excluded_faction(FactionId::new(0));
        let acquisition = TargetAcquisition::new();

        let first = acquisition.acquire(&service_with(&snapshots), id(1), &profile);
        let second = acquisition.acquire(&service_with(&snapshots), id(1), &profile);

        assert_eq!(first.target, Some(id(2)));
        assert_eq!(first.target, second.target);
        assert_eq!(first.distance, second.distance);
    }

    #[test]
    fn test_destroyed_target_is_replaced_on_next_acquire() {
        let mut service = service_with(&[
            shooter(1, 0),
            hostile(2, 50.0, 0.0, 80.0),
            hostile(3, 90.0, 0.0, 20.0),
        ]);
        let profile = TargetingProfile::new(200.0).with_excluded_faction(FactionId::new(0));
        let acquisition = TargetAcquisition::new();

        let first = acquisition.acquire(&service, id(1), &profile);
        assert_eq!(first.target, Some(id(2)));

        // Entity 2 destroyed; the next pass immediately selects a new target
        service.rebuild(&[shooter(1, 0), hostile(3, 90.0, 0.0, 20.0)]);
        let second = acquisition.acquire(&service, id(1), &profile);
        assert_eq!(second.target, Some(id(3)));
    }

    #[test]
    fn test_lead_position_meets_moving_target() {
        let origin = Vec2::new(0.0, 0.0);
        let target = Vec2::new(100.0, 0.0);
        let velocity = Vec2::new(0.0, 50.0);
        let speed = 200.0;

        let lead = intercept_position(origin, target, velocity, speed).unwrap();

        // The projectile and the target reach the lead point at the same time
        let time_of_flight = (lead - origin).magnitude() / speed;
        let target_at_impact = target + velocity * time_of_flight;
        assert_relative_eq!(lead.x, target_at_impact.x, epsilon = 1e-3);
        assert_relative_eq!(lead.y, target_at_impact.y, epsilon = 1e-3);
        assert!(lead.y > 0.0);
    }

    #[test]
    fn test_lead_used_in_target_state() {
        let mover = hostile(2, 100.0, 0.0, 50.0).with_velocity(Vec2::new(0.0, 50.0));
        let service = service_with(&[shooter(1, 0), mover]);
        let profile = TargetingProfile::new(500.0)
            .with_excluded_faction(FactionId::new(0))
            .with_projectile_speed(200.0);

        let state = TargetAcquisition::new().acquire(&service, id(1), &profile);
        assert_eq!(state.target, Some(id(2)));
        assert!(state.lead_position.y > 0.0);
        assert_relative_eq!(state.lead_position.x, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_uninterceptable_target_falls_back_to_current_position() {
        let runner = hostile(2, 100.0, 0.0, 50.0).with_velocity(Vec2::new(80.0, 0.0));
        let service = service_with(&[shooter(1, 0), runner]);
        let profile = TargetingProfile::new(500.0)
            .with_excluded_faction(FactionId::new(0))
            .with_projectile_speed(10.0);

        let state = TargetAcquisition::new().acquire(&service, id(1), &profile);
        assert_eq!(state.target, Some(id(2)));
        assert_eq!(state.lead_position, Vec2::new(100.0, 0.0));

        assert!(intercept_position(
            Vec2::zeros(),
            Vec2::new(100.0, 0.0),
            Vec2::new(80.0, 0.0),
            10.0
        )
        .is_none());
    }

    #[test]
    fn test_zero_projectile_speed_disables_leading() {
        let state_target = Vec2::new(50.0, 50.0);
        assert!(intercept_position(Vec2::zeros(), state_target, Vec2::new(5.0, 0.0), 0.0).is_none());
    }

    #[test]
    fn test_matched_speeds_use_linear_solution() {
        // Target crossing toward the shooter line at the same speed as the
        // projectile still yields an intercept
        let lead = intercept_position(
            Vec2::zeros(),
            Vec2::new(100.0, 0.0),
            Vec2::new(-50.0, 0.0),
            50.0,
        )
        .unwrap();
        assert_relative_eq!(lead.x, 50.0, epsilon = 1e-3);
        assert_relative_eq!(lead.y, 0.0, epsilon = 1e-3);
    }
}
