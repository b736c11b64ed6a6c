//! Combat input handling and the default mouse/gamepad bindings.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

use crate::components::{AimState, FireCadence, PlayerControlled, Shooter};
use crate::events::{CombatAction, CombatInput, LookInput, LookSource};
use crate::resources::ShooterCombatConfig;

/// Apply button messages to aim state and the fire cadence.
///
/// Runs first in the combat chain so this frame's tick already sees the
/// new aim state and any accepted shot.
pub fn handle_combat_input(
    config: Res<ShooterCombatConfig>,
    mut inputs: MessageReader<CombatInput>,
    mut shooters: Query<(&mut AimState, &mut FireCadence), With<Shooter>>,
) {
    for input in inputs.read() {
        let Ok((mut aim, mut cadence)) = shooters.get_mut(input.shooter) else {
            trace!("combat input for non-shooter {}", input.shooter);
            continue;
        };

        match input.action {
            CombatAction::FirePressed => {
                if !cadence.on_fire_pressed(&config.fire) {
                    trace!("shooter {}: fire press dropped while cooling", input.shooter);
                }
            }
            CombatAction::FireReleased => cadence.on_fire_released(),
            CombatAction::AimPressed | CombatAction::AimReleased => {
                let aiming = input.action == CombatAction::AimPressed;
                if aim.is_aiming() != aiming {
                    debug!("shooter {} aiming: {aiming}", input.shooter);
                }
                aim.set_aiming(aiming);
            }
        }
    }
}

/// Translate mouse and gamepad state into combat messages.
///
/// Left mouse or right trigger fires, right mouse or left trigger aims.
/// Mouse motion is sent as a raw delta with Y flipped so moving the mouse
/// up looks up. The right stick is sent as a rate.
pub fn read_default_bindings(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    gamepads: Query<&Gamepad>,
    players: Query<Entity, (With<Shooter>, With<PlayerControlled>)>,
    mut combat_inputs: MessageWriter<CombatInput>,
    mut look_inputs: MessageWriter<LookInput>,
) {
    let gamepad = gamepads.iter().next();
    let actions = button_actions(&mouse_buttons, gamepad);

    let mouse_delta = Vec2::new(mouse_motion.delta.x, -mouse_motion.delta.y);
    let stick = gamepad.map(Gamepad::right_stick).unwrap_or(Vec2::ZERO);

    for shooter in players.iter() {
        combat_inputs.write_batch(
            actions
                .iter()
                .map(|action| CombatInput::new(shooter, *action)),
        );
        if mouse_delta != Vec2::ZERO {
            look_inputs.write(LookInput {
                shooter,
                source: LookSource::Mouse,
                value: mouse_delta,
            });
        }
        if stick != Vec2::ZERO {
            look_inputs.write(LookInput {
                shooter,
                source: LookSource::Gamepad,
                value: stick,
            });
        }
    }
}

fn button_actions(
    mouse: &ButtonInput<MouseButton>,
    gamepad: Option<&Gamepad>,
) -> Vec<CombatAction> {
    let pressed = |button: MouseButton, pad: GamepadButton| {
        mouse.just_pressed(button) || gamepad.is_some_and(|g| g.just_pressed(pad))
    };
    let released = |button: MouseButton, pad: GamepadButton| {
        mouse.just_released(button) || gamepad.is_some_and(|g| g.just_released(pad))
    };

    let mut actions = Vec::new();
    if pressed(MouseButton::Left, GamepadButton::RightTrigger2) {
        actions.push(CombatAction::FirePressed);
    }
    if released(MouseButton::Left, GamepadButton::RightTrigger2) {
        actions.push(CombatAction::FireReleased);
    }
    if pressed(MouseButton::Right, GamepadButton::LeftTrigger2) {
        actions.push(CombatAction::AimPressed);
    }
    if released(MouseButton::Right, GamepadButton::LeftTrigger2) {
        actions.push(CombatAction::AimReleased);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_buttons_map_to_actions() {
        let mut mouse = ButtonInput::<MouseButton>::default();
        mouse.press(MouseButton::Left);
        mouse.press(MouseButton::Right);

        assert_eq!(
            button_actions(&mouse, None),
            vec![CombatAction::FirePressed, CombatAction::AimPressed]
        );

        mouse.clear();
        mouse.release(MouseButton::Left);
        assert_eq!(button_actions(&mouse, None), vec![CombatAction::FireReleased]);
    }

    #[test]
    fn test_no_buttons_no_actions() {
        let mouse = ButtonInput::<MouseButton>::default();
        assert!(button_actions(&mouse, None).is_empty());
    }
}
