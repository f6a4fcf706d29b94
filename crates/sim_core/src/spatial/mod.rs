//! Spatial partitioning and query services
//!
//! Provides efficient spatial indexing for collision detection,
//! ray casting, and proximity queries in 2D space.

pub mod quadtree;
pub mod query_service;

pub use quadtree::{QuadTree, QuadTreeConfig, QuadTreeNode, SpatialEntry};
pub use query_service::{CandidatePair, SpatialQueryService, SpatialStats};
