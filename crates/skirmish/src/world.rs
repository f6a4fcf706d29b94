//! Authoritative entity store for the demo
//!
//! Owns every actor's position, velocity and health. The simulation core
//! only ever sees per-tick snapshots of this store; events coming back from
//! collision resolution are applied here.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_core::prelude::*;

use crate::config::SpawnConfig;

const SHIP_RADIUS: f32 = 8.0;
const SHIP_HEALTH: f32 = 100.0;
const PICKUP_RADIUS: f32 = 8.0;
const PICKUP_HEAL: f32 = 15.0;
const CONTACT_DAMAGE: f32 = 1.0;

/// One entity owned by the demo store
#[derive(Debug, Clone)]
pub struct Actor {
    /// Stable identifier published to the simulation core
    pub id: EntityId,
    /// World-space position
    pub position: Vec2,
    /// Velocity in world units per second
    pub velocity: Vec2,
    /// Circular bound radius
    pub radius: f32,
    /// Faction, for ships
    pub faction: Option<FactionId>,
    /// Category tags
    pub tags: EntityTags,
    /// Health, for damageable actors
    pub health: Option<f32>,
    /// Trigger volumes overlap without physical response
    pub is_trigger: bool,
    /// Cleared when the actor is destroyed or collected
    pub alive: bool,
}

impl Actor {
    /// Structures never move or take damage
    fn is_static(&self) -> bool {
        self.tags.contains(EntityTags::STRUCTURE)
    }
}

/// Demo entity store
pub struct DemoWorld {
    bounds: Rect,
    actors: Vec<Actor>,
    next_id: u32,
}

impl DemoWorld {
    /// Create an empty world over the given bounds
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            actors: Vec::new(),
            next_id: 1,
        }
    }

    /// Populate a world from spawn settings, deterministically by seed
    pub fn generate(bounds: Rect, spawn: &SpawnConfig) -> Self {
        let mut world = Self::new(bounds);
        let mut rng = StdRng::seed_from_u64(spawn.seed);

        // Keep spawns away from the boundary so nothing starts clamped
        let inner = Rect::new(
            bounds.min + bounds.size() * 0.1,
            bounds.max - bounds.size() * 0.1,
        );
        let mut random_position = |rng: &mut StdRng| {
            Vec2::new(
                rng.gen_range(inner.min.x..inner.max.x),
                rng.gen_range(inner.min.y..inner.max.y),
            )
        };

        for faction in 0..2u32 {
            for _ in 0..spawn.ships_per_faction {
                let position = random_position(&mut rng);
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                let velocity = Vec2::new(angle.cos(), angle.sin()) * spawn.ship_speed;
                world.spawn_ship(position, velocity, FactionId::new(faction));
            }
        }
        for _ in 0..spawn.structure_count {
            let position = random_position(&mut rng);
            let radius = rng.gen_range(30.0..60.0);
            world.spawn_structure(position, radius);
        }
        for _ in 0..spawn.pickup_count {
            let position = random_position(&mut rng);
            world.spawn_pickup(position);
        }

        log::info!(
            "Spawned {} ships per faction, {} structures, {} pickups",
            spawn.ships_per_faction,
            spawn.structure_count,
            spawn.pickup_count
        );
        world
    }

    fn next_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn a ship for a faction
    pub fn spawn_ship(&mut self, position: Vec2, velocity: Vec2, faction: FactionId) -> EntityId {
        let id = self.next_id();
        self.actors.push(Actor {
            id,
            position,
            velocity,
            radius: SHIP_RADIUS,
            faction: Some(faction),
            tags: EntityTags::SHIP,
            health: Some(SHIP_HEALTH),
            is_trigger: false,
            alive: true,
        });
        id
    }

    /// Spawn a static, indestructible structure
    pub fn spawn_structure(&mut self, position: Vec2, radius: f32) -> EntityId {
        let id = self.next_id();
        self.actors.push(Actor {
            id,
            position,
            velocity: Vec2::zeros(),
            radius,
            faction: None,
            tags: EntityTags::STRUCTURE,
            health: None,
            is_trigger: false,
            alive: true,
        });
        id
    }

    /// Spawn a pickup trigger
    pub fn spawn_pickup(&mut self, position: Vec2) -> EntityId {
        let id = self.next_id();
        self.actors.push(Actor {
            id,
            position,
            velocity: Vec2::zeros(),
            radius: PICKUP_RADIUS,
            faction: None,
            tags: EntityTags::PICKUP,
            health: None,
            is_trigger: true,
            alive: true,
        });
        id
    }

    /// World bounds actors are kept inside
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Advance positions by one timestep, bouncing off the world boundary
    pub fn integrate(&mut self, dt: f32) {
        for actor in &mut self.actors {
            if !actor.alive {
                continue;
            }
            actor.position += actor.velocity * dt;

            if actor.position.x - actor.radius < self.bounds.min.x && actor.velocity.x < 0.0 {
                actor.velocity.x = -actor.velocity.x;
            }
            if actor.position.x + actor.radius > self.bounds.max.x && actor.velocity.x > 0.0 {
                actor.velocity.x = -actor.velocity.x;
            }
            if actor.position.y - actor.radius < self.bounds.min.y && actor.velocity.y < 0.0 {
                actor.velocity.y = -actor.velocity.y;
            }
            if actor.position.y + actor.radius > self.bounds.max.y && actor.velocity.y > 0.0 {
                actor.velocity.y = -actor.velocity.y;
            }
        }
    }

    /// Per-tick snapshots of every living actor
    pub fn snapshots(&self) -> Vec<EntitySnapshot> {
        self.actors
            .iter()
            .filter(|actor| actor.alive)
            .map(|actor| {
                let mut snapshot = EntitySnapshot::new(actor.id, actor.position)
                    .with_radius(actor.radius)
                    .with_tags(actor.tags)
                    .with_velocity(actor.velocity);
                if let Some(faction) = actor.faction {
                    snapshot = snapshot.with_faction(faction);
                }
                if let Some(health) = actor.health {
                    snapshot = snapshot.with_health(health);
                }
                if actor.is_trigger {
                    snapshot = snapshot.as_trigger();
                }
                snapshot
            })
            .collect()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.actors.iter().position(|a| a.id == id && a.alive)
    }

    /// Apply physical contacts: separate the participants, bounce the ones
    /// moving toward each other, and wear down their health
    pub fn apply_contacts(&mut self, contacts: &[ContactEvent]) {
        for contact in contacts {
            let (ia, ib) = match (self.index_of(contact.a), self.index_of(contact.b)) {
                (Some(ia), Some(ib)) => (ia, ib),
                _ => continue,
            };

            let delta = self.actors[ib].position - self.actors[ia].position;
            let penetration = self.actors[ia].radius + self.actors[ib].radius - delta.magnitude();
            if penetration <= 0.0 {
                continue;
            }
            let push = contact.normal * (penetration * 0.5);

            if !self.actors[ia].is_static() {
                let actor = &mut self.actors[ia];
                actor.position -= push;
                let approach = actor.velocity.dot(&contact.normal);
                if approach > 0.0 {
                    actor.velocity -= contact.normal * (2.0 * approach);
                }
            }
            if !self.actors[ib].is_static() {
                let actor = &mut self.actors[ib];
                actor.position += push;
                let approach = actor.velocity.dot(&contact.normal);
                if approach < 0.0 {
                    actor.velocity -= contact.normal * (2.0 * approach);
                }
            }

            self.damage(ia, CONTACT_DAMAGE);
            self.damage(ib, CONTACT_DAMAGE);
        }
    }

    /// Apply trigger events: ships collect pickups
    pub fn apply_triggers(&mut self, triggers: &[TriggerEvent]) {
        for trigger in triggers {
            let (it, io) = match (self.index_of(trigger.trigger), self.index_of(trigger.other)) {
                (Some(it), Some(io)) => (it, io),
                _ => continue,
            };
            if !self.actors[it].tags.contains(EntityTags::PICKUP)
                || !self.actors[io].tags.contains(EntityTags::SHIP)
            {
                continue;
            }

            self.actors[it].alive = false;
            if let Some(health) = &mut self.actors[io].health {
                *health = (*health + PICKUP_HEAL).min(SHIP_HEALTH);
            }
            log::info!("Pickup {} collected by {}", trigger.trigger, trigger.other);
        }
    }

    fn damage(&mut self, index: usize, amount: f32) {
        let actor = &mut self.actors[index];
        if let Some(health) = &mut actor.health {
            *health -= amount;
            if *health <= 0.0 {
                actor.alive = false;
                log::info!("{} destroyed in collision", actor.id);
            }
        }
    }

    /// Point a ship's velocity at a world position, preserving its speed
    pub fn steer(&mut self, id: EntityId, toward: Vec2) {
        if let Some(index) = self.index_of(id) {
            let actor = &mut self.actors[index];
            let delta = toward - actor.position;
            let distance = delta.magnitude();
            let speed = actor.velocity.magnitude();
            if distance > f32::EPSILON && speed > f32::EPSILON {
                actor.velocity = delta * (speed / distance);
            }
        }
    }

    /// Drop destroyed and collected actors from the store
    pub fn remove_dead(&mut self) {
        let before = self.actors.len();
        self.actors.retain(|actor| actor.alive);
        let removed = before - self.actors.len();
        if removed > 0 {
            log::debug!("Removed {} dead actors", removed);
        }
    }

    /// Ids and factions of every living ship
    pub fn armed_ships(&self) -> Vec<(EntityId, FactionId)> {
        self.actors
            .iter()
            .filter(|actor| actor.alive && actor.tags.contains(EntityTags::SHIP))
            .filter_map(|actor| actor.faction.map(|faction| (actor.id, faction)))
            .collect()
    }

    /// Living ships belonging to a faction
    pub fn ship_count(&self, faction: FactionId) -> usize {
        self.actors
            .iter()
            .filter(|actor| {
                actor.alive
                    && actor.tags.contains(EntityTags::SHIP)
                    && actor.faction == Some(faction)
            })
            .count()
    }

    /// Average position of living ships, for camera following
    pub fn center_of_action(&self) -> Option<Vec2> {
        let mut sum = Vec2::zeros();
        let mut count = 0;
        for actor in &self.actors {
            if actor.alive && actor.tags.contains(EntityTags::SHIP) {
                sum += actor.position;
                count += 1;
            }
        }
        if count > 0 {
            Some(sum / count as f32)
        } else {
            None
        }
    }
}
