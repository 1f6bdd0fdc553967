//! Authoritative Simulation Step
//!
//! The per-frame transition that must be 100% deterministic.
//! Replaying a recording runs exactly this code, frame by frame.

use crate::core::geometry::{line_squares_intersection, Line};
use crate::core::hash::StateHash;
use crate::core::int::Int;
use crate::core::pt::Pt;
use crate::error::{Result, SimError};
use crate::game::input::PlayerInput;
use crate::game::recording::Recording;
use crate::game::state::{WorldConfig, World};

/// What happened during one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The character changed position.
    pub moved: bool,
    /// The character reached the food this frame.
    pub ate_food: bool,
}

/// Pure form of [`tick`]: returns the next world, leaves `world` untouched.
pub fn step(world: &World, input: &PlayerInput) -> Result<World> {
    let mut next = world.clone();
    tick(&mut next, input)?;
    Ok(next)
}

/// Run one simulation frame in place.
///
/// # Determinism
///
/// This function is 100% deterministic:
/// - Integer arithmetic only, every operation checked
/// - Randomness only from `world.rng`
/// - No system calls, no floating point
///
/// On error the world may be partially updated and should be discarded.
pub fn tick(world: &mut World, input: &PlayerInput) -> Result<StepOutcome> {
    let mut outcome = StepOutcome::default();
    let start = world.character.pos;

    // 1. Pick / release
    if input.pick && world.character.bounding_rect()?.contains_pt(input.position) {
        world.character.pick();
    }
    if input.release {
        world.character.release();
    }

    // 2. Move: follow the pointer while picked, otherwise the intent
    if world.character.picked {
        world.character.waypoint = None;
        let target = world.character.closest_valid_pos(input.position);
        change_pos(world, target)?;
    } else {
        if let Some(intent) = input.requested_intent() {
            world.character.intent = intent;
        }
        apply_intent(world)?;
    }
    outcome.moved = world.character.pos != start;

    // 3. Eat
    if world.character.pos.dist_to(world.food.pos)?.leq(world.eat_distance) {
        world.food_eaten.inc()?;
        world.relocate_food()?;
        outcome.ate_food = true;
    }

    // 4. Advance frame counter
    world.time_step.inc()?;
    if world.time_step.eq(Int::MAX) {
        return Err(SimError::FrameLimitReached(world.time_step));
    }

    #[cfg(feature = "debug-tracing")]
    tracing::trace!(
        time_step = world.time_step.to_i64(),
        pos = ?world.character.pos,
        moved = outcome.moved,
        ate_food = outcome.ate_food,
        "tick"
    );

    Ok(outcome)
}

/// Move the character to `new_pos` if it is inside the movement limits and
/// not on an obstacle tile.
fn change_pos(world: &mut World, new_pos: Pt) -> Result<bool> {
    if !world.character.move_limits.contains_pt(new_pos) || world.is_blocked(new_pos)? {
        return Ok(false);
    }
    world.character.pos = new_pos;
    Ok(true)
}

fn apply_intent(world: &mut World) -> Result<()> {
    match world.character.intent.direction() {
        Some(dir) => {
            world.character.waypoint = None;
            let offset = dir.with_len(world.character.speed)?;
            let new_pos = world.character.pos.plus(offset)?;
            change_pos(world, new_pos)?;
        }
        None => move_to_food(world)?,
    }
    Ok(())
}

/// Walk toward the food.
///
/// Straight line when nothing is in the way. Otherwise the character walks
/// to the center of its own tile, then from tile center to tile center along
/// the pathfinder's route, committing to each center until it gets there.
fn move_to_food(world: &mut World) -> Result<()> {
    let pos = world.character.pos;
    let food = world.food.pos;

    if pos.dist_to(food)?.leq(world.eat_distance) {
        return Ok(());
    }

    let blocked = line_squares_intersection(Line::new(pos, food), world.obstacle_squares())?.is_some();
    let target = if blocked {
        match next_waypoint(world)? {
            Some(target) => target,
            // Food unreachable: wait.
            None => return Ok(()),
        }
    } else {
        world.character.waypoint = None;
        food
    };

    let new_pos = step_toward(pos, target, world.character.speed)?;
    if !change_pos(world, new_pos)? {
        // Re-plan from the current tile next frame.
        world.character.waypoint = None;
    }
    Ok(())
}

fn next_waypoint(world: &mut World) -> Result<Option<Pt>> {
    let pos = world.character.pos;
    if let Some(waypoint) = world.character.waypoint {
        if waypoint != pos {
            return Ok(Some(waypoint));
        }
    }

    let tile = world.tile_of(pos)?;
    let center = world.tile_center(tile)?;
    let next = if pos != center {
        Some(center)
    } else {
        let food_tile = world.tile_of(world.food.pos)?;
        let path = world.pathfinder_mut().find_path(tile, food_tile)?;
        match path.get(1) {
            Some(next) => Some(world.tile_center(*next)?),
            None if path.is_empty() => None,
            // Same tile as the food.
            None => Some(world.food.pos),
        }
    };
    world.character.waypoint = next;
    Ok(next)
}

/// One step of at most `speed` from `pos` toward `target`, never past it.
fn step_toward(pos: Pt, target: Pt, speed: Int) -> Result<Pt> {
    let offset = pos.to(target)?;
    if offset.len()?.leq(speed) {
        return Ok(target);
    }
    Ok(pos.plus(offset.with_len(speed)?)?)
}

// =============================================================================
// REPLAY
// =============================================================================

/// Replay a recording from scratch and return the final world.
pub fn replay(recording: &Recording, config: &WorldConfig) -> Result<World> {
    let mut world = World::new(recording.seed, recording.difficulty, config)?;
    for input in &recording.inputs {
        tick(&mut world, input)?;
    }
    Ok(world)
}

/// Replay a recording and check the final state hash.
pub fn verify_replay(recording: &Recording, config: &WorldConfig, expected: &StateHash) -> Result<World> {
    let world = replay(recording, config)?;
    let computed = world.compute_hash();
    if computed != *expected {
        return Err(SimError::ReplayMismatch { expected: *expected, computed });
    }
    Ok(world)
}

// =============================================================================
// TESTS
// =============================================================================
