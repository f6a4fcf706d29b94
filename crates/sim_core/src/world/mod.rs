//! World module - Entity identity and per-tick snapshots
//!
//! The simulation core does not own entity state. An external store (game
//! logic, an ECS, a replication layer) owns positions, health and velocities,
//! and publishes an [`EntitySnapshot`] per entity each tick. Everything in
//! this crate operates on those snapshots and refers to entities only by
//! their stable [`EntityId`].

pub mod entity;
pub mod snapshot;

pub use entity::{EntityId, FactionId};
pub use snapshot::{EntitySnapshot, EntityTags, DEFAULT_RADIUS};
