//! Systems module - all ECS systems for the combat core.

pub mod aim;
pub mod animation;
pub mod cadence;
pub mod debug;
pub mod firing;
pub mod input;
pub mod movement;
pub mod spread;
pub mod targeting;
pub mod vfx;
