//! Physics module - collision primitives and narrow-phase resolution
//!
//! The broad phase lives in [`crate::spatial`]; this module holds the
//! geometric primitives shared with ray queries and the resolver that
//! turns candidate pairs into contact and trigger events.

pub mod collision;
pub mod resolver;

pub use collision::{Circle, Ray, RayHit};
pub use resolver::{CollisionResolver, ContactEvent, EventMode, TriggerEvent};
