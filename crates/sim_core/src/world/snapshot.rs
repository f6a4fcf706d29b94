//! Per-tick entity snapshots published by the external store

use bitflags::bitflags;

use crate::foundation::math::Vec2;
use crate::world::entity::{EntityId, FactionId};

/// Collision radius assumed for entities that publish no radius of their own
pub const DEFAULT_RADIUS: f32 = 1.0;

bitflags! {
    /// Category tags carried by an entity snapshot
    ///
    /// Tags classify what an entity is, not which side it is on; sides are
    /// expressed through [`FactionId`]. Target acquisition filters on both.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntityTags: u32 {
        /// Crewed or autonomous ships
        const SHIP = 1 << 0;
        /// Static structures (stations, turrets, obstacles)
        const STRUCTURE = 1 << 1;
        /// Projectiles in flight
        const PROJECTILE = 1 << 2;
        /// Inert debris
        const DEBRIS = 1 << 3;
        /// Pickups and collectibles
        const PICKUP = 1 << 4;
        /// Non-physical sensor volumes
        const SENSOR = 1 << 5;
    }
}

/// Immutable per-tick view of one entity, as published by the external store
///
/// Everything the spatial index, collision detection, targeting and culling
/// need for one tick lives here. Only `id` and `position` are mandatory;
/// the rest are optional capabilities an entity may or may not have.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    /// Stable identifier issued by the external store
    pub id: EntityId,

    /// World-space position at the start of the tick
    pub position: Vec2,

    /// Circular bound radius, if the entity participates in collision
    pub radius: Option<f32>,

    /// Faction the entity belongs to, if any
    pub faction: Option<FactionId>,

    /// Category tags
    pub tags: EntityTags,

    /// Current health, if the entity is damageable
    pub health: Option<f32>,

    /// Velocity at the start of the tick, used for lead prediction
    pub velocity: Option<Vec2>,

    /// Whether the entity should be considered by view culling
    pub renderable: bool,

    /// Trigger volumes generate events but no physical contact response
    pub is_trigger: bool,
}

impl EntitySnapshot {
    /// Create a snapshot with the mandatory fields and default capabilities
    pub fn new(id: EntityId, position: Vec2) -> Self {
        Self {
            id,
            position,
            radius: None,
            faction: None,
            tags: EntityTags::empty(),
            health: None,
            velocity: None,
            renderable: true,
            is_trigger: false,
        }
    }

    /// Set the collision radius
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Set the faction
    pub fn with_faction(mut self, faction: FactionId) -> Self {
        self.faction = Some(faction);
        self
    }

    /// Set the category tags
    pub fn with_tags(mut self, tags: EntityTags) -> Self {
        self.tags = tags;
        self
    }

    /// Set the current health
    pub fn with_health(mut self, health: f32) -> Self {
        self.health = Some(health);
        self
    }

    /// Set the velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Set whether view culling sees the entity (defaults to true)
    pub fn with_renderable(mut self, enabled: bool) -> Self {
        self.renderable = enabled;
        self
    }

    /// Mark this as a trigger volume
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Collision radius, falling back to [`DEFAULT_RADIUS`] when unset
    pub fn collision_radius(&self) -> f32 {
        self.radius.unwrap_or(DEFAULT_RADIUS)
    }

    /// Velocity, falling back to zero when unset
    pub fn velocity_or_zero(&self) -> Vec2 {
        self.velocity.unwrap_or_else(Vec2::zeros)
    }

    /// Whether the entity counts as alive
    ///
    /// Entities without a health value are indestructible and always alive.
    pub fn is_alive(&self) -> bool {
        self.health.map_or(true, |h| h > 0.0)
    }
}
