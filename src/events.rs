//! Messages for the shooter combat system.
//!
//! All of these are buffered `Message`s: write them with `MessageWriter`, read with `MessageReader`.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::types::{MontageId, ParticleEffect, SoundCue};

/// Discrete combat buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum CombatAction {
    FirePressed,
    FireReleased,
    AimPressed,
    AimReleased,
}

/// Button event delivered by the input-binding layer.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_shooter_combat::events::{CombatAction, CombatInput};
///
/// let input = CombatInput::new(Entity::PLACEHOLDER, CombatAction::FirePressed);
/// assert_eq!(input.action, CombatAction::FirePressed);
/// ```
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct CombatInput {
    pub shooter: Entity,
    pub action: CombatAction,
}

impl CombatInput {
    pub fn new(shooter: Entity, action: CombatAction) -> Self {
        Self { shooter, action }
    }
}

/// Origin of an analog look value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum LookSource {
    /// Normalized stick deflection, scaled by turn rate and frame time
    Gamepad,
    /// Raw motion delta, scaled by mouse sensitivity
    Mouse,
}

/// Per-frame analog look value. `value.x` turns, `value.y` looks up.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct LookInput {
    pub shooter: Entity,
    pub source: LookSource,
    pub value: Vec2,
}

/// Cosmetic spawn requested by the fire sequence.
///
/// Consumed by the VFX plugin, or by a game's own particle and audio layer.
#[derive(Message, Clone, Debug)]
pub enum CosmeticRequest {
    Sound {
        cue: SoundCue,
        location: Vec3,
    },
    Particles {
        effect: ParticleEffect,
        transform: Transform,
    },
    /// Beam anchored at `origin` with its target parameter set to `target`
    Beam {
        effect: ParticleEffect,
        origin: Transform,
        target: Vec3,
    },
}

/// Montage command for the animation layer.
#[derive(Clone, Debug, PartialEq, Eq, Reflect)]
pub enum MontageCommand {
    Play,
    JumpToSection(String),
}

/// Montage playback requested for a shooter.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct MontageRequest {
    pub shooter: Entity,
    pub montage: MontageId,
    pub command: MontageCommand,
}

/// Sent after every accepted shot has run through the fire sequence.
///
/// # Fields
/// * `shooter` - Entity that fired
/// * `muzzle` - World-space barrel position
/// * `aim_point` - Screen-centre target, `None` if deprojection failed
/// * `impact` - Weapon-trace impact, `None` if not confirmed
/// * `shot_index` - Running shot count of the shooter, starting at 1
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct ShotFired {
    pub shooter: Entity,
    pub muzzle: Vec3,
    pub aim_point: Option<Vec3>,
    pub impact: Option<Vec3>,
    pub shot_index: u64,
}
