//! Simulation State Definitions
//!
//! Everything a step reads or writes lives in [`World`]. All quantities are
//! [`Int`]/[`Pt`] in subunits; the world's only source of randomness is its
//! own seeded [`DeterministicRng`].
//!
//! ## Tiles
//!
//! ```text
//!   0      tile    2*tile   3*tile
//!   ┌───────┬───────┬───────┐
//!   │ (0,0) │ (1,0) │ (2,0) │   tile (x, y) covers
//!   ├───────┼───────┼───────┤   [x*tile, (x+1)*tile) horizontally
//!   │ (0,1) │ ##### │ (2,1) │
//!   └───────┴───────┴───────┘   ##### = obstacle tile
//! ```

use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::geometry::{Rectangle, Square};
use crate::core::hash::{compute_state_hash, StateHash, StateHasher};
use crate::core::int::{Int, NumericResult};
use crate::core::pt::Pt;
use crate::core::rng::DeterministicRng;
use crate::core::unit::UNIT;
use crate::error::{Result, SimError};
use crate::grid::{MatBool, Pathfinder};

/// Environment variable holding the path of a JSON world config.
pub const CONFIG_ENV_VAR: &str = "VLOK_CONFIG";

// =============================================================================
// CONFIG
// =============================================================================

/// World construction parameters.
///
/// Lengths are in subunits. The defaults are integer literals so no
/// conversion happens at load time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Obstacle grid size in tiles (columns, rows).
    pub grid_size: Pt,
    /// Side of one tile.
    pub tile_size: Int,
    /// Character start position.
    pub character_start: Pt,
    /// Character bounding box.
    pub character_size: Pt,
    /// Distance covered per frame.
    pub character_speed: Int,
    /// Starting and maximum health.
    pub max_health: Int,
    /// Food bounding box.
    pub food_size: Pt,
    /// The character eats when this close to the food, and stops chasing it.
    pub eat_distance: Int,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: Pt::from_ints(16, 16),
            tile_size: Int::new(50 * UNIT),
            character_start: Pt::from_ints(75 * UNIT, 75 * UNIT),
            character_size: Pt::from_ints(40 * UNIT, 40 * UNIT),
            character_speed: Int::new(5 * UNIT),
            max_health: Int::new(3),
            food_size: Pt::from_ints(30 * UNIT, 30 * UNIT),
            eat_distance: Int::new(3 * UNIT),
        }
    }
}

impl WorldConfig {
    /// Parse from JSON. Missing fields take their default.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from the file named by `VLOK_CONFIG`, or the defaults if unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// World size in subunits.
    pub fn world_size(&self) -> NumericResult<Pt> {
        self.grid_size.times(self.tile_size)
    }

    /// Check that a world can be built from this config.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("grid width", self.grid_size.x),
            ("grid height", self.grid_size.y),
            ("tile size", self.tile_size),
            ("character width", self.character_size.x),
            ("character height", self.character_size.y),
            ("character speed", self.character_speed),
            ("max health", self.max_health),
            ("food width", self.food_size.x),
            ("food height", self.food_size.y),
        ];
        for (name, value) in positive {
            if !value.is_positive() {
                return Err(SimError::InvalidConfig(format!("{} must be positive, got {}", name, value)));
            }
        }
        if self.eat_distance.is_negative() {
            return Err(SimError::InvalidConfig(format!(
                "eat distance must not be negative, got {}",
                self.eat_distance
            )));
        }
        let limits = character_limits(self.world_size()?, self.character_size)?;
        if !limits.contains_pt(self.character_start) {
            return Err(SimError::InvalidConfig(format!(
                "character start {:?} outside movement limits {:?}",
                self.character_start, limits
            )));
        }
        Ok(())
    }
}

/// Area the character's center may occupy: the world inset by half the
/// character's size.
fn character_limits(world_size: Pt, character_size: Pt) -> NumericResult<Rectangle> {
    let half = character_size.div_by(Int::TWO)?;
    Ok(Rectangle::new(half, world_size.minus(half)?))
}

// =============================================================================
// CHARACTER
// =============================================================================

/// What the character does when not picked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Walk toward the food, around obstacles.
    #[default]
    MoveToFood,
    /// Walk left every frame.
    MoveLeft,
    /// Walk right every frame.
    MoveRight,
    /// Walk up every frame.
    MoveUp,
    /// Walk down every frame.
    MoveDown,
}

impl Intent {
    /// Unit direction of a directional intent, in subunits.
    pub fn direction(self) -> Option<Pt> {
        match self {
            Intent::MoveToFood => None,
            Intent::MoveLeft => Some(Pt::from_ints(-UNIT, 0)),
            Intent::MoveRight => Some(Pt::from_ints(UNIT, 0)),
            Intent::MoveUp => Some(Pt::from_ints(0, -UNIT)),
            Intent::MoveDown => Some(Pt::from_ints(0, UNIT)),
        }
    }

    fn index(self) -> u8 {
        match self {
            Intent::MoveToFood => 0,
            Intent::MoveLeft => 1,
            Intent::MoveRight => 2,
            Intent::MoveUp => 3,
            Intent::MoveDown => 4,
        }
    }
}

/// The single controllable entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Center position.
    pub pos: Pt,
    /// Bounding box size.
    pub size: Pt,
    /// Maximum health
    pub max_health: Int,
    /// Current health
    pub health: Int,
    /// Held by the pointer.
    pub picked: bool,
    /// Distance per frame.
    pub speed: Int,
    /// Current movement intent.
    pub intent: Intent,
    /// Tile center being walked to while routing around obstacles.
    pub waypoint: Option<Pt>,
    /// Rectangle the center must stay in.
    pub move_limits: Rectangle,
}

impl Character {
    /// Create a character from config.
    pub fn new(config: &WorldConfig) -> Result<Self> {
        Ok(Self {
            pos: config.character_start,
            size: config.character_size,
            max_health: config.max_health,
            health: config.max_health,
            picked: false,
            speed: config.character_speed,
            intent: Intent::default(),
            waypoint: None,
            move_limits: character_limits(config.world_size()?, config.character_size)?,
        })
    }

    /// Bounding rectangle around the current position.
    pub fn bounding_rect(&self) -> NumericResult<Rectangle> {
        let half = self.size.div_by(Int::TWO)?;
        Ok(Rectangle::new(self.pos.minus(half)?, self.pos.plus(half)?))
    }

    /// `pos` clamped into the movement limits.
    pub fn closest_valid_pos(&self, pos: Pt) -> Pt {
        self.move_limits.closest_pt(pos)
    }

    /// Attach the character to the pointer.
    pub fn pick(&mut self) {
        self.picked = true;
    }

    /// Detach the character from the pointer.
    pub fn release(&mut self) {
        self.picked = false;
    }

    fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_pt(self.pos);
        hasher.update_pt(self.size);
        hasher.update_int(self.max_health);
        hasher.update_int(self.health);
        hasher.update_bool(self.picked);
        hasher.update_int(self.speed);
        hasher.update_u8(self.intent.index());
        hasher.update_bool(self.waypoint.is_some());
        hasher.update_pt(self.waypoint.unwrap_or_default());
        hasher.update_pt(self.move_limits.corner1);
        hasher.update_pt(self.move_limits.corner2);
    }
}

/// The thing the character chases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    /// Center position.
    pub pos: Pt,
    /// Bounding box size.
    pub size: Pt,
}

// =============================================================================
// WORLD
// =============================================================================

/// Complete simulation state.
#[derive(Clone, Debug)]
pub struct World {
    /// Seed the world was built from.
    pub seed: Int,
    /// Number of obstacle tiles placed at construction.
    pub difficulty: Int,
    /// World size in subunits.
    pub size: Pt,
    /// Side of one tile.
    pub tile_size: Int,
    /// The character.
    pub character: Character,
    /// The food.
    pub food: Food,
    /// Eat radius.
    pub eat_distance: Int,
    /// Obstacle tiles.
    pub obstacles: MatBool,
    /// Frames stepped so far.
    pub time_step: Int,
    /// Food eaten so far.
    pub food_eaten: Int,
    /// Deterministic RNG state
    pub rng: DeterministicRng,
    obstacle_squares: Vec<Square>,
    pathfinder: Pathfinder,
}

impl World {
    /// Build a world with `difficulty` random obstacle tiles.
    ///
    /// The character's start tile never gets an obstacle. Food goes on a
    /// random free tile other than the start tile.
    pub fn new(seed: Int, difficulty: Int, config: &WorldConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = DeterministicRng::from_seed(seed);

        let mut obstacles = MatBool::new(config.grid_size)?;
        let start_tile = config.character_start.div_by(config.tile_size)?;

        // Obstacles plus the start tile and the food tile must fit.
        let tiles = config.grid_size.x.times(config.grid_size.y)?;
        let max_difficulty = tiles.minus(Int::TWO)?;
        if difficulty.is_negative() || difficulty.gt(max_difficulty) {
            return Err(SimError::InvalidConfig(format!(
                "difficulty {} outside [0, {}]",
                difficulty, max_difficulty
            )));
        }

        let mut occupied = obstacles.clone();
        occupied.set(start_tile)?;
        let mut placed = Int::ZERO;
        while placed.lt(difficulty) {
            let tile = occupied.occupy_random_pos(&mut rng)?;
            obstacles.set(tile)?;
            placed.inc()?;
        }

        Self::with_obstacles(seed, difficulty, obstacles, rng, config)
    }

    /// Build a world around a given obstacle layout.
    ///
    /// `rng` continues from wherever the caller left it; food placement is
    /// its first draw here.
    pub fn with_obstacles(
        seed: Int,
        difficulty: Int,
        obstacles: MatBool,
        rng: DeterministicRng,
        config: &WorldConfig,
    ) -> Result<Self> {
        config.validate()?;
        if obstacles.size() != config.grid_size {
            return Err(SimError::InvalidConfig(format!(
                "obstacle grid {:?} does not match grid size {:?}",
                obstacles.size(),
                config.grid_size
            )));
        }

        // The start tile and the food tile must both stay free.
        let tiles = config.grid_size.x.times(config.grid_size.y)?;
        let blocked = Int::from_index(obstacles.count())?;
        if blocked.plus(Int::TWO)?.gt(tiles) {
            return Err(SimError::InvalidConfig(format!(
                "{} obstacle tiles leave no free tile for the food in a {}-tile grid",
                blocked, tiles
            )));
        }

        let character = Character::new(config)?;
        let start_tile = character.pos.div_by(config.tile_size)?;
        if obstacles.at(start_tile)? {
            return Err(SimError::InvalidConfig(format!(
                "character starts on obstacle tile {:?}",
                start_tile
            )));
        }

        let obstacle_squares = obstacles
            .to_points()
            .into_iter()
            .map(|tile| {
                Ok(Square {
                    center: tile_center(tile, config.tile_size)?,
                    size: config.tile_size,
                })
            })
            .collect::<NumericResult<Vec<_>>>()?;
        let pathfinder = Pathfinder::new(obstacles.as_matrix(), &false)?;

        let mut world = Self {
            seed,
            difficulty,
            size: config.world_size()?,
            tile_size: config.tile_size,
            character,
            food: Food { pos: Pt::ZERO, size: config.food_size },
            eat_distance: config.eat_distance,
            obstacles,
            time_step: Int::ZERO,
            food_eaten: Int::ZERO,
            rng,
            obstacle_squares,
            pathfinder,
        };
        world.relocate_food()?;

        debug!(
            seed = seed.to_i64(),
            difficulty = difficulty.to_i64(),
            obstacles = world.obstacles.count(),
            food = ?world.food.pos,
            "world created"
        );
        Ok(world)
    }

    /// Tile containing `pos`.
    pub fn tile_of(&self, pos: Pt) -> NumericResult<Pt> {
        pos.div_by(self.tile_size)
    }

    /// Center of `tile` in subunits.
    pub fn tile_center(&self, tile: Pt) -> NumericResult<Pt> {
        tile_center(tile, self.tile_size)
    }

    /// True if `pos` lies on an obstacle tile or outside the grid.
    pub fn is_blocked(&self, pos: Pt) -> Result<bool> {
        // Division truncates toward zero, so (-1, 0) would land on tile 0.
        if pos.x.is_negative() || pos.y.is_negative() {
            return Ok(true);
        }
        let tile = self.tile_of(pos)?;
        if !self.obstacles.in_bounds(tile) {
            return Ok(true);
        }
        self.obstacles.at(tile)
    }

    /// Squares covering the obstacle tiles, in row-major tile order.
    pub fn obstacle_squares(&self) -> &[Square] {
        &self.obstacle_squares
    }

    pub(crate) fn pathfinder_mut(&mut self) -> &mut Pathfinder {
        &mut self.pathfinder
    }

    /// Move the food to a random free tile the character is not on.
    pub(crate) fn relocate_food(&mut self) -> Result<()> {
        let mut occupied = self.obstacles.clone();
        occupied.set(self.tile_of(self.character.pos)?)?;
        let tile = occupied.random_unoccupied_pos(&mut self.rng)?;
        self.food.pos = self.tile_center(tile)?;
        self.character.waypoint = None;
        debug!(time_step = self.time_step.to_i64(), food = ?self.food.pos, "food relocated");
        Ok(())
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.time_step, self.seed, |hasher| {
            hasher.update_int(self.difficulty);
            hasher.update_pt(self.size);
            hasher.update_int(self.tile_size);

            self.character.hash_into(hasher);

            hasher.update_pt(self.food.pos);
            hasher.update_pt(self.food.size);
            hasher.update_int(self.eat_distance);
            hasher.update_int(self.food_eaten);

            for cell in self.obstacles.as_matrix().cells() {
                hasher.update_bool(*cell);
            }

            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
        })
    }
}

/// Observable state only; the pathfinder's scratch buffers are ignored.
impl PartialEq for World {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
            && self.difficulty == other.difficulty
            && self.size == other.size
            && self.tile_size == other.tile_size
            && self.character == other.character
            && self.food == other.food
            && self.eat_distance == other.eat_distance
            && self.obstacles == other.obstacles
            && self.time_step == other.time_step
            && self.food_eaten == other.food_eaten
            && self.rng == other.rng
    }
}

impl Eq for World {}

fn tile_center(tile: Pt, tile_size: Int) -> NumericResult<Pt> {
    let half = tile_size.div_by(Int::TWO)?;
    tile.times(tile_size)?.plus(Pt::new(half, half))
}

// =============================================================================
// TESTS
// =============================================================================
