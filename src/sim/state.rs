//! Game state and core simulation types
//!
//! The registry here exclusively owns every entity. Other sim components
//! borrow it for the duration of a tick and refer to entities by stable id,
//! never by retained pointer; dead entities are compacted away only at end
//! of tick, so ids stay valid across the phases of the tick that killed them.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::cell_center;
use crate::consts::*;
use crate::level::LevelSpec;
use super::grid::{Grid, Tile};

/// Cardinal movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Cell offset for one step in this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn vec(self) -> Vec2 {
        let (dx, dy) = self.delta();
        Vec2::new(dx as f32, dy as f32)
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Enemy behavior variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Wanders at random
    Basic,
    /// Greedy pursuit of the player, no pathfinding
    Chase,
}

/// Powerup kinds dropped by soft walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerupKind {
    /// +1 flame range
    Fire,
    /// +1 bomb capacity
    BombCount,
    /// +20% move speed
    Speed,
}

/// Which kind of actor an `EntityKilled` event names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Enemy,
}

/// The player
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    /// Center position in tile units
    pub pos: Vec2,
    pub half_extent: f32,
    /// Tiles per second
    pub speed: f32,
    pub bomb_capacity: u32,
    pub flame_range: i32,
    /// Bombs currently armed; never exceeds `bomb_capacity`
    pub bombs_armed: u32,
    /// Seconds until another bomb may be armed
    pub bomb_cooldown: f32,
    pub alive: bool,
}

/// An enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub half_extent: f32,
    pub speed: f32,
    pub facing: Option<Direction>,
    /// Seconds until the next Basic-AI direction decision
    pub decide_timer: f32,
    /// Manhattan pursuit radius (Chase only)
    pub chase_range: i32,
    pub alive: bool,
}

/// An armed bomb. Occupies exactly one cell and blocks movement onto it,
/// except for its owner while the owner still stands on the cell.
#[derive(Debug, Clone)]
pub struct Bomb {
    pub id: u32,
    /// Back-reference to the arming entity, not ownership
    pub owner: u32,
    pub cell: (i32, i32),
    /// Seconds until detonation
    pub fuse: f32,
    /// Captured from the owner at arming time
    pub flame_range: i32,
    pub detonated: bool,
}

/// One burning cell of an explosion
#[derive(Debug, Clone, Copy)]
pub struct FlameCell {
    pub cell: (i32, i32),
    /// Seconds of burn left
    pub ttl: f32,
}

/// A detonation's flames. The cell set is computed once at detonation and
/// only shrinks as cells expire.
#[derive(Debug, Clone)]
pub struct Explosion {
    pub id: u32,
    pub origin: (i32, i32),
    /// Origin bomb's range, kept for chain bookkeeping
    pub flame_range: i32,
    pub cells: Vec<FlameCell>,
}

impl Explosion {
    pub fn covers(&self, cell: (i32, i32)) -> bool {
        self.cells.iter().any(|fc| fc.cell == cell)
    }
}

/// A dropped powerup waiting on its cell
#[derive(Debug, Clone)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub cell: (i32, i32),
    pub collected: bool,
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Player reached the revealed exit
    Won,
    /// Player died
    Lost,
}

/// Discrete events emitted during a tick, drained by the audio/UI layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    WallDestroyed { col: i32, row: i32 },
    PowerupSpawned { kind: PowerupKind, col: i32, row: i32 },
    PowerupCollected { kind: PowerupKind },
    BombArmed { id: u32, col: i32, row: i32 },
    ExplosionTriggered { col: i32, row: i32 },
    ExitRevealed { col: i32, row: i32 },
    EntityKilled { id: u32, kind: ActorKind },
    GameWon,
    GameLost,
}

/// Read-only view of one live entity, for the rendering layer
#[derive(Debug, Clone)]
pub enum EntityView {
    Player { id: u32, pos: Vec2, alive: bool },
    Enemy { id: u32, kind: EnemyKind, pos: Vec2, facing: Option<Direction> },
    Bomb { id: u32, cell: (i32, i32), fuse: f32 },
    Explosion { id: u32, cells: Vec<(i32, i32)> },
    Powerup { id: u32, kind: PowerupKind, cell: (i32, i32) },
}

/// Per-tick read-only snapshot of terrain and live entities
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub cols: i32,
    pub rows: i32,
    pub tiles: Vec<Tile>,
    pub exit_revealed: bool,
    pub phase: GamePhase,
    pub entities: Vec<EntityView>,
}

/// Complete simulation state for one match
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Kept so an external restart can reinitialize from it
    pub level: LevelSpec,
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub grid: Grid,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bombs: Vec<Bomb>,
    pub explosions: Vec<Explosion>,
    pub powerups: Vec<Powerup>,
    /// Events emitted by the current tick, cleared when the next begins
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Initialize a match from a level description with an explicit seed.
    /// Every stochastic decision in the run draws from this one seed.
    pub fn new(seed: u64, level: &LevelSpec) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: level.clone(),
            time_ticks: 0,
            phase: GamePhase::Playing,
            grid: Grid::from_level(level),
            player: Player {
                id: 0,
                pos: cell_center(level.player.col, level.player.row),
                half_extent: PLAYER_HALF_EXTENT,
                speed: PLAYER_SPEED,
                bomb_capacity: INITIAL_BOMB_CAPACITY,
                flame_range: level.rules.flame_range,
                bombs_armed: 0,
                bomb_cooldown: 0.0,
                alive: true,
            },
            enemies: Vec::with_capacity(level.enemies.len()),
            bombs: Vec::new(),
            explosions: Vec::new(),
            powerups: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        state.player.id = state.next_entity_id();
        for spawn in &level.enemies {
            let id = state.next_entity_id();
            let default_speed = match spawn.kind {
                EnemyKind::Basic => ENEMY_BASIC_SPEED,
                EnemyKind::Chase => ENEMY_CHASE_SPEED,
            };
            state.enemies.push(Enemy {
                id,
                kind: spawn.kind,
                pos: cell_center(spawn.col, spawn.row),
                half_extent: ENEMY_HALF_EXTENT,
                speed: spawn.speed.unwrap_or(default_speed),
                facing: None,
                decide_timer: 0.0,
                chase_range: spawn.chase_range.unwrap_or(CHASE_RANGE),
                alive: true,
            });
        }
        state
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Synchronous reinitialization from the stored level description.
    /// The seed is kept, so a restarted run replays identically.
    pub fn restart(&mut self) {
        let level = self.level.clone();
        *self = Self::new(self.seed, &level);
    }

    /// Drop dead entities so the next tick's queries never see them
    pub fn compact(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.bombs.retain(|b| !b.detonated);
        self.explosions.retain(|e| !e.cells.is_empty());
        self.powerups.retain(|p| !p.collected);
    }

    /// Read-only snapshot for the rendering layer
    pub fn snapshot(&self) -> Snapshot {
        let mut entities = Vec::with_capacity(
            1 + self.enemies.len() + self.bombs.len() + self.explosions.len() + self.powerups.len(),
        );
        entities.push(EntityView::Player {
            id: self.player.id,
            pos: self.player.pos,
            alive: self.player.alive,
        });
        for enemy in &self.enemies {
            entities.push(EntityView::Enemy {
                id: enemy.id,
                kind: enemy.kind,
                pos: enemy.pos,
                facing: enemy.facing,
            });
        }
        for bomb in &self.bombs {
            entities.push(EntityView::Bomb { id: bomb.id, cell: bomb.cell, fuse: bomb.fuse });
        }
        for explosion in &self.explosions {
            entities.push(EntityView::Explosion {
                id: explosion.id,
                cells: explosion.cells.iter().map(|fc| fc.cell).collect(),
            });
        }
        for powerup in &self.powerups {
            entities.push(EntityView::Powerup {
                id: powerup.id,
                kind: powerup.kind,
                cell: powerup.cell,
            });
        }
        Snapshot {
            cols: self.grid.cols(),
            rows: self.grid.rows(),
            tiles: self.grid.tiles().to_vec(),
            exit_revealed: self.grid.exit_revealed(),
            phase: self.phase,
            entities,
        }
    }
}
