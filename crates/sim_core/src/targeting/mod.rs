//! Target selection built on top of the spatial query service

pub mod acquisition;

pub use acquisition::{
    intercept_position, TargetAcquisition, TargetPriority, TargetState, TargetingProfile,
};
