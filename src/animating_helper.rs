use std::mem::discriminant;

use bevy::prelude::*;

/// Utility for deciding when to switch animation clips.
///
/// The user animation system builds a state (usually an enum describing what the character is
/// doing, derived from [`StrafeController`](crate::StrafeController) and
/// [`StrafeAnimationParameters`](crate::StrafeAnimationParameters)) on every frame, and feeds it
/// to [`by_value`](Self::by_value) or [`by_discriminant`](Self::by_discriminant). The returned
/// directive says whether the state changed - meaning a new clip should be started - or not -
/// meaning the running clip should be kept, maybe with adjusted speed or blend weights.
#[derive(Component)]
pub struct StrafeAnimatingState<State> {
    state: Option<State>,
}

impl<State> Default for StrafeAnimatingState<State> {
    fn default() -> Self {
        Self { state: None }
    }
}

pub enum StrafeAnimatingStateDirective<'a, State> {
    /// The state did not change.
    Maintain { state: &'a State },
    /// The state changed. `old_state` is `None` on the very first update.
    Alter {
        old_state: Option<State>,
        state: &'a State,
    },
}

impl<State> StrafeAnimatingState<State> {
    /// Replace the state, using `comparison` to decide if it changed.
    pub fn update_by(
        &mut self,
        new_state: State,
        comparison: impl FnOnce(&State, &State) -> bool,
    ) -> StrafeAnimatingStateDirective<'_, State> {
        let is_same = self
            .state
            .as_ref()
            .is_some_and(|old_state| comparison(old_state, &new_state));
        let old_state = self.state.replace(new_state);
        let state = self.state.as_ref().expect("state was just placed there");
        if is_same {
            StrafeAnimatingStateDirective::Maintain { state }
        } else {
            StrafeAnimatingStateDirective::Alter { old_state, state }
        }
    }

    pub fn by_value(&mut self, new_state: State) -> StrafeAnimatingStateDirective<'_, State>
    where
        State: PartialEq,
    {
        self.update_by(new_state, |a, b| a == b)
    }

    /// Only consider the state changed when the enum variant changes, ignoring the payload.
    pub fn by_discriminant(&mut self, new_state: State) -> StrafeAnimatingStateDirective<'_, State> {
        self.update_by(new_state, |a, b| discriminant(a) == discriminant(b))
    }

    pub fn get(&self) -> Option<&State> {
        self.state.as_ref()
    }
}
