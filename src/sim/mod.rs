//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ai;
pub mod bomb;
pub mod collision;
pub mod grid;
pub mod state;
pub mod tick;

pub use collision::{aabb_overlap, aabb_overlaps_cell, overlapped_cells, resolve_move};
pub use grid::{Grid, GridError, Tile};
pub use state::{
    ActorKind, Bomb, Direction, Enemy, EnemyKind, EntityView, Explosion, FlameCell, GameEvent,
    GamePhase, GameState, Player, Powerup, PowerupKind, Snapshot,
};
pub use tick::{TickInput, tick};
