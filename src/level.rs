//! Parsed level descriptions
//!
//! Level-file parsing happens outside this crate; what arrives here is the
//! already-parsed grid of tile codes plus spawn points and the simulation
//! constants for the level. [`LevelSpec::classic`] is the shipped level,
//! built in so the demo binary and tests need no files.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::grid::Tile;
use crate::sim::state::EnemyKind;

/// A grid cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPos {
    pub col: i32,
    pub row: i32,
}

/// One enemy spawn point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub col: i32,
    pub row: i32,
    /// Tiles per second; defaults per kind when absent
    #[serde(default)]
    pub speed: Option<f32>,
    /// Manhattan pursuit radius for Chase enemies
    #[serde(default)]
    pub chase_range: Option<i32>,
}

/// Simulation constants a level may override
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimRules {
    pub fuse_secs: f32,
    pub flame_secs: f32,
    pub flame_range: i32,
}

impl Default for SimRules {
    fn default() -> Self {
        Self {
            fuse_secs: BOMB_FUSE_SECS,
            flame_secs: FLAME_SECS,
            flame_range: INITIAL_FLAME_RANGE,
        }
    }
}

/// A complete, already-parsed level description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSpec {
    pub cols: i32,
    pub rows: i32,
    /// Tile edge in logical units; metadata for the rendering layer only
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Row-major tile codes, `rows` rows of `cols` cells each
    pub tiles: Vec<Vec<Tile>>,
    pub player: CellPos,
    pub enemies: Vec<EnemySpawn>,
    /// The one exit cell, hidden until every enemy is dead
    pub exit: CellPos,
    #[serde(default)]
    pub rules: SimRules,
}

fn default_tile_size() -> u32 {
    TILE_SIZE
}

impl LevelSpec {
    /// The shipped 13x11 level: bordered lattice of hard walls, a field of
    /// soft walls, four enemies, exit tucked into the far corner.
    pub fn classic() -> Self {
        const MAP: [&str; 11] = [
            "#############",
            "#  . .   .  #",
            "# #.#.#.# # #",
            "#  .  . ..  #",
            "# #.# #.#.# #",
            "# .  ..  .  #",
            "# #.#.# #.# #",
            "#.  .  . . .#",
            "# #.# #.#.# #",
            "#  ..  .  .X#",
            "#############",
        ];

        let tiles = MAP
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        '#' => Tile::HardWall,
                        '.' => Tile::SoftWall,
                        'X' => Tile::Exit,
                        _ => Tile::Empty,
                    })
                    .collect()
            })
            .collect();

        Self {
            cols: GRID_COLS,
            rows: GRID_ROWS,
            tile_size: TILE_SIZE,
            tiles,
            player: CellPos { col: 1, row: 1 },
            enemies: vec![
                EnemySpawn { kind: EnemyKind::Basic, col: 1, row: 3, speed: Some(1.8), chase_range: None },
                EnemySpawn { kind: EnemyKind::Basic, col: 11, row: 3, speed: Some(1.8), chase_range: None },
                EnemySpawn { kind: EnemyKind::Basic, col: 1, row: 5, speed: Some(1.7), chase_range: None },
                EnemySpawn { kind: EnemyKind::Chase, col: 11, row: 5, speed: Some(2.0), chase_range: Some(5) },
            ],
            exit: CellPos { col: 11, row: 9 },
            rules: SimRules::default(),
        }
    }
}
