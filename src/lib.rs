//! Blast Maze - a single-level Bomberman-style maze game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, bombs, collision, enemy AI, game state)
//! - `level`: Parsed level descriptions consumed by the simulation
//!
//! Rendering, audio, input polling and level-file parsing live outside this
//! crate. The simulation consumes a [`level::LevelSpec`] plus a per-tick
//! [`sim::TickInput`], and produces read-only snapshots and discrete
//! [`sim::GameEvent`]s for those layers.

pub mod level;
pub mod sim;

pub use level::LevelSpec;
pub use sim::{GameEvent, GamePhase, GameState, TickInput, tick};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one logical tick per rendered frame at 60 Hz)
    pub const TICK_DT: f32 = 1.0 / 60.0;

    /// Grid dimensions of the shipped level
    pub const GRID_COLS: i32 = 13;
    pub const GRID_ROWS: i32 = 11;
    /// Tile edge length in logical units. Dimension metadata for the
    /// rendering layer; collision math works in tile units throughout.
    pub const TILE_SIZE: u32 = 48;

    /// Player defaults (tile units, tiles per second)
    pub const PLAYER_HALF_EXTENT: f32 = 0.35;
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_SPEED_CAP: f32 = PLAYER_SPEED * 1.5;
    /// Speed gained per Speed powerup
    pub const SPEED_BONUS: f32 = PLAYER_SPEED * 0.2;

    /// Enemy defaults
    pub const ENEMY_HALF_EXTENT: f32 = 0.3;
    pub const ENEMY_BASIC_SPEED: f32 = 1.8;
    pub const ENEMY_CHASE_SPEED: f32 = 2.0;
    /// Manhattan radius inside which a Chase enemy pursues the player
    pub const CHASE_RANGE: i32 = 5;
    /// Seconds between Basic-AI direction decisions
    pub const AI_DECISION_SECS: f32 = 0.5;
    /// Chance per decision to re-roll the direction even when unblocked
    pub const AI_REROLL_CHANCE: f64 = 0.1;
    /// How close to a cell center an enemy must be before it may turn
    pub const AI_TURN_EPS: f32 = 0.1;

    /// Bomb defaults
    pub const BOMB_FUSE_SECS: f32 = 2.0;
    pub const FLAME_SECS: f32 = 0.3;
    pub const INITIAL_FLAME_RANGE: i32 = 1;
    pub const INITIAL_BOMB_CAPACITY: u32 = 1;
    pub const MAX_FLAME_RANGE: i32 = 4;
    pub const MAX_BOMB_CAPACITY: u32 = 3;
    /// Seconds before another bomb may be armed
    pub const BOMB_COOLDOWN_SECS: f32 = 0.2;

    /// Probability that a destroyed soft wall drops a powerup
    pub const POWERUP_DROP_CHANCE: f64 = 0.5;

    /// Hitboxes shrink by this factor for damage and contact checks,
    /// so grazing a flame or an enemy by a sliver does not kill
    pub const DAMAGE_SHRINK: f32 = 0.8;
}

/// Grid cell containing a position (tile units)
#[inline]
pub fn cell_of(pos: Vec2) -> (i32, i32) {
    (pos.x.floor() as i32, pos.y.floor() as i32)
}

/// Center of a grid cell in tile units
#[inline]
pub fn cell_center(col: i32, row: i32) -> Vec2 {
    Vec2::new(col as f32 + 0.5, row as f32 + 0.5)
}
