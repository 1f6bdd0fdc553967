//! Per-frame Player Input
//!
//! The only thing the outside world feeds into a step. Inputs are recorded
//! verbatim, so every field here is part of the session file format.

use serde::{Serialize, Deserialize};

use crate::core::pt::Pt;
use crate::game::state::Intent;

/// Input state for a single frame.
///
/// Encoded as 16 bytes of position followed by 7 one-byte flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Pointer position in world subunits.
    pub position: Pt,
    /// Pointer pressed this frame.
    pub pick: bool,
    /// Pointer released this frame.
    pub release: bool,
    /// Switch intent to moving left.
    pub move_left: bool,
    /// Switch intent to moving right.
    pub move_right: bool,
    /// Switch intent to moving up.
    pub move_up: bool,
    /// Switch intent to moving down.
    pub move_down: bool,
    /// Switch intent back to chasing the food.
    pub move_to_food: bool,
}

impl PlayerInput {
    /// Encoded size in bytes.
    pub const SIZE: usize = 23;

    /// Input that changes nothing.
    pub const fn idle() -> Self {
        Self {
            position: Pt::ZERO,
            pick: false,
            release: false,
            move_left: false,
            move_right: false,
            move_up: false,
            move_down: false,
            move_to_food: false,
        }
    }

    /// Idle input with the pointer at `position`.
    pub const fn at(position: Pt) -> Self {
        let mut input = Self::idle();
        input.position = position;
        input
    }

    /// Pointer pressed at `position`.
    pub const fn pick_at(position: Pt) -> Self {
        let mut input = Self::at(position);
        input.pick = true;
        input
    }

    /// Pointer released at `position`.
    pub const fn release_at(position: Pt) -> Self {
        let mut input = Self::at(position);
        input.release = true;
        input
    }

    /// Idle input requesting `intent`.
    pub fn with_intent(intent: Intent) -> Self {
        let mut input = Self::idle();
        match intent {
            Intent::MoveToFood => input.move_to_food = true,
            Intent::MoveLeft => input.move_left = true,
            Intent::MoveRight => input.move_right = true,
            Intent::MoveUp => input.move_up = true,
            Intent::MoveDown => input.move_down = true,
        }
        input
    }

    /// Intent requested this frame, if any.
    ///
    /// Flags are applied left, right, up, down, food; the last one set wins.
    pub fn requested_intent(&self) -> Option<Intent> {
        [
            (self.move_left, Intent::MoveLeft),
            (self.move_right, Intent::MoveRight),
            (self.move_up, Intent::MoveUp),
            (self.move_down, Intent::MoveDown),
            (self.move_to_food, Intent::MoveToFood),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, intent)| intent)
        .last()
    }

    /// Check if this frame carries no action.
    ///
    /// The pointer position alone is not an action.
    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.pick && !self.release && self.requested_intent().is_none()
    }
}

// =============================================================================
// TESTS
// =============================================================================
