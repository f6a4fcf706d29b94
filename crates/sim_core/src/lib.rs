//! # Sim Core
//!
//! A spatially indexed 2D simulation core for top-down games and
//! large-scale entity simulations.
//!
//! ## Features
//!
//! - **Quadtree Spatial Index**: circle-aware insertion with rect, radius,
//!   nearest-neighbor and ray queries
//! - **Collision Detection**: broad-phase pair generation with circle-circle
//!   narrow phase, physical contacts and trigger events
//! - **Target Acquisition**: filtered and prioritized target selection with
//!   line-of-sight checks and lead prediction
//! - **View Culling**: camera-driven visibility narrowing for renderers
//! - **File Configuration**: TOML and RON configuration with validation
//!
//! ## Quick Start
//!
//! ```rust
//! use sim_core::prelude::*;
//!
//! let config = SimConfig::default();
//! let mut service = SpatialQueryService::from_config(&config);
//!
//! // Mirror the authoritative world into the index once per tick
//! service.rebuild(&[
//!     EntitySnapshot::new(EntityId::new(1), Vec2::new(0.0, 0.0)).with_radius(10.0),
//!     EntitySnapshot::new(EntityId::new(2), Vec2::new(15.0, 0.0)).with_radius(10.0),
//! ]);
//!
//! // Broad phase, then exact circle tests
//! let pairs = service.potential_collision_pairs();
//! let mut resolver = CollisionResolver::new();
//! resolver.resolve(&pairs, |id| service.snapshot(id).copied());
//! assert_eq!(resolver.contacts().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;
pub mod spatial;
pub mod targeting;
pub mod world;

/// Common imports for simulation users
pub mod prelude {
    pub use crate::{
        config::{CameraConfig, Config, ConfigError, SimConfig},
        foundation::{
            math::{Rect, Vec2},
            time::{Stopwatch, Timer},
        },
        physics::{
            Circle, CollisionResolver, ContactEvent, EventMode, Ray, RayHit, TriggerEvent,
        },
        scene::{Camera2D, ViewCuller},
        spatial::{
            CandidatePair, QuadTree, QuadTreeConfig, SpatialEntry, SpatialQueryService,
            SpatialStats,
        },
        targeting::{
            intercept_position, TargetAcquisition, TargetPriority, TargetState, TargetingProfile,
        },
        world::{EntityId, EntitySnapshot, EntityTags, FactionId},
    };
}
