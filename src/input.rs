use bevy::prelude::*;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::animation::{parameter_names, StrafeAnimationParameters};
use crate::StrafeToggle;

/// The logical actions a character responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum StrafeActionKind {
    /// Continuous 2D axis.
    Move,
    /// Held button.
    Run,
    /// Pointer movement.
    Aim,
    /// One-shot trigger.
    Fire,
}

/// A single performed/canceled transition of an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrafeActionEdge {
    /// The move axis changed. The axis' `y` is forward.
    MovePerformed(Vec2),
    MoveCanceled,
    RunPerformed,
    RunCanceled,
    /// The pointer moved to this position, in viewport coordinates.
    AimPerformed(Vec2),
    /// The pointer stopped moving.
    AimCanceled,
    FirePerformed,
}

impl StrafeActionEdge {
    pub fn action(&self) -> StrafeActionKind {
        match self {
            StrafeActionEdge::MovePerformed(_) | StrafeActionEdge::MoveCanceled => {
                StrafeActionKind::Move
            }
            StrafeActionEdge::RunPerformed | StrafeActionEdge::RunCanceled => StrafeActionKind::Run,
            StrafeActionEdge::AimPerformed(_) | StrafeActionEdge::AimCanceled => {
                StrafeActionKind::Aim
            }
            StrafeActionEdge::FirePerformed => StrafeActionKind::Fire,
        }
    }
}

/// Send this event to make a character act.
///
/// `StrafeKeyboardMouseInputPlugin` sends these from the keyboard and mouse, but any system can
/// send them - e.g. for gamepads, AI or replays. The edges are applied to the character's
/// [`StrafeInputState`] once per tick, before the controller logic runs, in the order they were
/// sent.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StrafeInput {
    pub character: Entity,
    pub edge: StrafeActionEdge,
}

/// The input as the controller sees it - the accumulation of all the edges received so far.
#[derive(Component, Default, Debug, Clone, PartialEq)]
pub struct StrafeInputState {
    pub move_axis: Vec2,
    pub is_running: bool,
    /// The last known pointer position, in viewport coordinates.
    pub pointer: Option<Vec2>,
    /// Set when an aim edge arrives. The controller clears it on its next tick, when it reads
    /// the aim target from the sensors (which it does every tick regardless).
    pub aim_refresh_requested: bool,
}

impl StrafeInputState {
    pub fn apply(&mut self, edge: StrafeActionEdge, animation: &mut StrafeAnimationParameters) {
        match edge {
            StrafeActionEdge::MovePerformed(axis) => {
                self.move_axis = axis;
            }
            StrafeActionEdge::MoveCanceled => {
                self.move_axis = Vec2::ZERO;
            }
            StrafeActionEdge::RunPerformed => {
                self.is_running = true;
            }
            StrafeActionEdge::RunCanceled => {
                self.is_running = false;
            }
            StrafeActionEdge::AimPerformed(pointer) => {
                self.pointer = Some(pointer);
                self.aim_refresh_requested = true;
            }
            StrafeActionEdge::AimCanceled => {
                self.aim_refresh_requested = true;
            }
            StrafeActionEdge::FirePerformed => {
                animation.set_trigger(parameter_names::FIRE);
            }
        }
    }

    /// Cancel all in-progress actions.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}

pub(crate) fn handle_toggle_transitions_system(
    mut query: Query<(Entity, &StrafeToggle, &mut StrafeInputState), Changed<StrafeToggle>>,
) {
    for (entity, strafe_toggle, mut input) in query.iter_mut() {
        match strafe_toggle {
            StrafeToggle::Disabled => {
                info!("Strafe controls disabled for {entity}");
                input.cancel();
            }
            StrafeToggle::SenseOnly => {
                info!("Strafe controls of {entity} set to sense only");
            }
            StrafeToggle::Enabled => {
                info!("Strafe controls enabled for {entity}");
            }
        }
    }
}

pub(crate) fn apply_input_edges_system(
    mut reader: EventReader<StrafeInput>,
    mut query: Query<(
        &mut StrafeInputState,
        &mut StrafeAnimationParameters,
        Option<&StrafeToggle>,
    )>,
) {
    for StrafeInput { character, edge } in reader.read() {
        let Ok((mut input, mut animation, strafe_toggle)) = query.get_mut(*character) else {
            continue;
        };
        if !strafe_toggle.copied().unwrap_or_default().accepts_input() {
            continue;
        }
        match edge {
            StrafeActionEdge::MovePerformed(axis) => {
                debug!("Movement input for {character}: {axis}");
            }
            StrafeActionEdge::MoveCanceled => {
                debug!("Movement input for {character} canceled");
            }
            StrafeActionEdge::RunPerformed => {
                debug!("Run input for {character}");
            }
            StrafeActionEdge::RunCanceled => {
                debug!("Run input for {character} released");
            }
            StrafeActionEdge::AimPerformed(_) | StrafeActionEdge::AimCanceled => {}
            StrafeActionEdge::FirePerformed => {
                debug!("Fire input for {character}");
            }
        }
        input.apply(*edge, &mut animation);
    }
}
