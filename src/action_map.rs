//! Keyboard and mouse as a source of [`StrafeInput`] edges.
use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::input::mouse::MouseButtonInput;
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved};

use crate::input::{apply_input_edges_system, StrafeActionEdge, StrafeInput};
use crate::{StrafePipelineSystems, StrafeToggle};

/// Marks the characters controlled by the keyboard and the mouse.
#[derive(Component, Default, Debug)]
pub struct StrafePlayer;

/// One of the four directions of the move composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrafeMoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// Thrown by [`StrafeActionMapBuilder::build`] when the bindings would leave an action that cannot
/// be performed. Aim follows the cursor, so it has no variant here.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum StrafeActionMapError {
    #[error("No key moves the character {0:?}")]
    UnboundMoveDirection(StrafeMoveDirection),
    #[error("No key makes the character run")]
    UnboundRun,
    #[error("No mouse button fires")]
    UnboundFire,
}

/// Keyboard and mouse bindings of the strafe actions.
///
/// Aim always follows the mouse cursor and cannot be rebound.
#[derive(Resource, Debug, Clone)]
pub struct StrafeActionMap {
    move_forward: Vec<KeyCode>,
    move_backward: Vec<KeyCode>,
    move_left: Vec<KeyCode>,
    move_right: Vec<KeyCode>,
    run: Vec<KeyCode>,
    fire: Vec<MouseButton>,
}

impl Default for StrafeActionMap {
    /// WASD or the arrow keys to move, Shift to run, left mouse button to fire.
    fn default() -> Self {
        Self {
            move_forward: vec![KeyCode::KeyW, KeyCode::ArrowUp],
            move_backward: vec![KeyCode::KeyS, KeyCode::ArrowDown],
            move_left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            move_right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            run: vec![KeyCode::ShiftLeft, KeyCode::ShiftRight],
            fire: vec![MouseButton::Left],
        }
    }
}

impl StrafeActionMap {
    pub fn builder() -> StrafeActionMapBuilder {
        StrafeActionMapBuilder::default()
    }

    /// The move composite, clamped to length 1 so that diagonals are not faster.
    pub fn move_axis(&self, keyboard: &ButtonInput<KeyCode>) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if keyboard.any_pressed(self.move_forward.iter().copied()) {
            axis += Vec2::Y;
        }
        if keyboard.any_pressed(self.move_backward.iter().copied()) {
            axis -= Vec2::Y;
        }
        if keyboard.any_pressed(self.move_left.iter().copied()) {
            axis -= Vec2::X;
        }
        if keyboard.any_pressed(self.move_right.iter().copied()) {
            axis += Vec2::X;
        }
        axis.clamp_length_max(1.0)
    }

    pub fn run_pressed(&self, keyboard: &ButtonInput<KeyCode>) -> bool {
        keyboard.any_pressed(self.run.iter().copied())
    }

    /// How many of the button events are presses of a fire button.
    ///
    /// Works on the raw events rather than on `ButtonInput<MouseButton>`, whose "just pressed"
    /// state lasts for a whole frame and would be seen again by every run of a fixed schedule.
    pub fn fire_presses<'a>(
        &self,
        events: impl IntoIterator<Item = &'a MouseButtonInput>,
    ) -> usize {
        events
            .into_iter()
            .filter(|event| {
                event.state == ButtonState::Pressed && self.fire.contains(&event.button)
            })
            .count()
    }
}

/// Builds a [`StrafeActionMap`] from scratch. Every action must get at least one binding.
#[derive(Default, Debug)]
pub struct StrafeActionMapBuilder {
    move_forward: Vec<KeyCode>,
    move_backward: Vec<KeyCode>,
    move_left: Vec<KeyCode>,
    move_right: Vec<KeyCode>,
    run: Vec<KeyCode>,
    fire: Vec<MouseButton>,
}

impl StrafeActionMapBuilder {
    pub fn move_key(mut self, direction: StrafeMoveDirection, key: KeyCode) -> Self {
        match direction {
            StrafeMoveDirection::Forward => self.move_forward.push(key),
            StrafeMoveDirection::Backward => self.move_backward.push(key),
            StrafeMoveDirection::Left => self.move_left.push(key),
            StrafeMoveDirection::Right => self.move_right.push(key),
        }
        self
    }

    /// Bind four keys to forward, left, backward and right - e.g. `W`, `A`, `S`, `D`.
    pub fn move_keys(self, forward: KeyCode, left: KeyCode, backward: KeyCode, right: KeyCode) -> Self {
        self.move_key(StrafeMoveDirection::Forward, forward)
            .move_key(StrafeMoveDirection::Left, left)
            .move_key(StrafeMoveDirection::Backward, backward)
            .move_key(StrafeMoveDirection::Right, right)
    }

    pub fn run_key(mut self, key: KeyCode) -> Self {
        self.run.push(key);
        self
    }

    pub fn fire_button(mut self, button: MouseButton) -> Self {
        self.fire.push(button);
        self
    }

    pub fn build(self) -> Result<StrafeActionMap, StrafeActionMapError> {
        for (keys, direction) in [
            (&self.move_forward, StrafeMoveDirection::Forward),
            (&self.move_backward, StrafeMoveDirection::Backward),
            (&self.move_left, StrafeMoveDirection::Left),
            (&self.move_right, StrafeMoveDirection::Right),
        ] {
            if keys.is_empty() {
                return Err(StrafeActionMapError::UnboundMoveDirection(direction));
            }
        }
        if self.run.is_empty() {
            return Err(StrafeActionMapError::UnboundRun);
        }
        if self.fire.is_empty() {
            return Err(StrafeActionMapError::UnboundFire);
        }
        Ok(StrafeActionMap {
            move_forward: self.move_forward,
            move_backward: self.move_backward,
            move_left: self.move_left,
            move_right: self.move_right,
            run: self.run,
            fire: self.fire,
        })
    }
}

/// Add this plugin to control the [`StrafePlayer`] characters with the keyboard and the mouse.
///
/// This plugin should be used in addition to `StrafeControllerPlugin`, with the same schedule.
pub struct StrafeKeyboardMouseInputPlugin {
    schedule: InternedScheduleLabel,
    action_map: StrafeActionMap,
}

impl StrafeKeyboardMouseInputPlugin {
    pub fn new(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
            action_map: Default::default(),
        }
    }

    pub fn with_action_map(mut self, action_map: StrafeActionMap) -> Self {
        self.action_map = action_map;
        self
    }
}

impl Default for StrafeKeyboardMouseInputPlugin {
    fn default() -> Self {
        Self::new(Update)
    }
}

impl Plugin for StrafeKeyboardMouseInputPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.action_map.clone());
        app.add_systems(
            self.schedule,
            emit_keyboard_mouse_edges_system
                .before(apply_input_edges_system)
                .in_set(StrafePipelineSystems::Input),
        );
    }
}

/// The keys and cursor as of the last run, so that only changes become edges.
#[derive(Default)]
pub(crate) struct KeyboardMouseEdgesState {
    move_axis: Vec2,
    running: bool,
    cursor_moving: bool,
}

impl KeyboardMouseEdgesState {
    /// Edges that bring a character with no input up to the keys currently held.
    fn held_edges(&self) -> impl Iterator<Item = StrafeActionEdge> {
        let moving = self.move_axis != Vec2::ZERO;
        [
            moving.then_some(StrafeActionEdge::MovePerformed(self.move_axis)),
            self.running.then_some(StrafeActionEdge::RunPerformed),
        ]
        .into_iter()
        .flatten()
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn emit_keyboard_mouse_edges_system(
    action_map: Res<StrafeActionMap>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mouse_button_reader: EventReader<MouseButtonInput>,
    mut cursor_moved_reader: EventReader<CursorMoved>,
    mut cursor_left_reader: EventReader<CursorLeft>,
    mut state: Local<KeyboardMouseEdgesState>,
    players_query: Query<(Entity, Ref<StrafePlayer>, Option<Ref<StrafeToggle>>)>,
    mut writer: EventWriter<StrafeInput>,
) {
    let mut edges = Vec::new();

    let move_axis = action_map.move_axis(&keyboard);
    if move_axis != state.move_axis {
        state.move_axis = move_axis;
        edges.push(if move_axis == Vec2::ZERO {
            StrafeActionEdge::MoveCanceled
        } else {
            StrafeActionEdge::MovePerformed(move_axis)
        });
    }

    let running = action_map.run_pressed(&keyboard);
    if running != state.running {
        state.running = running;
        edges.push(if running {
            StrafeActionEdge::RunPerformed
        } else {
            StrafeActionEdge::RunCanceled
        });
    }

    let cursor_left = cursor_left_reader.read().count() > 0;
    if let Some(cursor_moved) = cursor_moved_reader.read().last() {
        state.cursor_moving = true;
        edges.push(StrafeActionEdge::AimPerformed(cursor_moved.position));
    } else if state.cursor_moving || cursor_left {
        state.cursor_moving = false;
        edges.push(StrafeActionEdge::AimCanceled);
    }

    for _ in 0..action_map.fire_presses(mouse_button_reader.read()) {
        edges.push(StrafeActionEdge::FirePerformed);
    }

    for (character, player, strafe_toggle) in players_query.iter() {
        // New players, and players whose input was just turned back on, have an empty input
        // state and would otherwise wait for the held keys to change.
        let needs_held_keys = player.is_added()
            || strafe_toggle
                .is_some_and(|toggle| toggle.is_changed() && toggle.accepts_input());
        let held_edges = needs_held_keys
            .then(|| state.held_edges())
            .into_iter()
            .flatten();
        writer.write_batch(
            held_edges
                .chain(edges.iter().copied())
                .map(|edge| StrafeInput { character, edge }),
        );
    }
}
