//! Fixed timestep simulation tick
//!
//! The per-tick orchestrator. Phase order is fixed and authoritative:
//! intents, movement, bombs, damage, pickups, terminal evaluation. All
//! intents are computed against the state at tick start, before any
//! movement applies, so entity iteration order cannot leak into outcomes.

use glam::Vec2;
use log::info;

use crate::consts::*;
use crate::cell_of;
use super::ai;
use super::bomb;
use super::collision::{aabb_overlap, aabb_overlaps_cell, overlapped_cells, resolve_move};
use super::grid::GridError;
use super::state::{
    ActorKind, Bomb, Direction, GameEvent, GamePhase, GameState, PowerupKind,
};

/// Input intent for a single tick, already decoded and debounced by the
/// input layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Desired movement; zero means hold still. Diagonals are fine, the
    /// collision resolver handles each axis on its own.
    pub dir: Vec2,
    pub place_bomb: bool,
    /// Reinitialize from the level description before anything else runs
    pub restart: bool,
}

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), GridError> {
    state.events.clear();

    // restart aborts the tick and rebuilds synchronously
    if input.restart {
        state.restart();
        return Ok(());
    }
    // terminal states halt the simulation until restarted
    if state.phase != GamePhase::Playing {
        return Ok(());
    }
    state.time_ticks += 1;

    // --- phase 1: intents against the tick-start snapshot ---
    let enemy_moves = collect_intents(state, dt);
    state.player.bomb_cooldown = (state.player.bomb_cooldown - dt).max(0.0);
    if input.place_bomb {
        try_arm_bomb(state);
    }

    // --- phase 2: collision-resolved movement ---
    apply_movement(state, input.dir, &enemy_moves, dt);

    // --- phase 3: fuses, detonations (chains included), flame aging ---
    bomb::update(state, dt)?;

    // --- phase 4: explosion and contact damage ---
    apply_damage(state);

    // --- phase 5: powerup pickup ---
    collect_powerups(state);

    // --- phase 6: terminal evaluation ---
    evaluate_terminal(state);

    // dead entities are invisible to the next tick
    state.compact();
    Ok(())
}

/// One AI intent per living enemy, all computed before anything moves
fn collect_intents(state: &mut GameState, dt: f32) -> Vec<(usize, Direction)> {
    let GameState { grid, enemies, player, rng, .. } = state;
    let player_cell = cell_of(player.pos);
    let mut moves = Vec::with_capacity(enemies.len());
    for (idx, enemy) in enemies.iter_mut().enumerate() {
        if !enemy.alive {
            continue;
        }
        if let Some(dir) = ai::intent(enemy, grid, player_cell, dt, rng) {
            moves.push((idx, dir));
        }
    }
    moves
}

/// Arm a bomb under the player. Over capacity, on cooldown or on an
/// occupied cell this is a silent no-op; the input layer already filters
/// the rest.
fn try_arm_bomb(state: &mut GameState) {
    let player = &state.player;
    if !player.alive
        || player.bombs_armed >= player.bomb_capacity
        || player.bomb_cooldown > 0.0
    {
        return;
    }
    let (col, row) = cell_of(player.pos);
    if !state.grid.can_place_bomb(col, row) {
        return;
    }
    let id = state.next_entity_id();
    state.bombs.push(Bomb {
        id,
        owner: state.player.id,
        cell: (col, row),
        fuse: state.level.rules.fuse_secs,
        flame_range: state.player.flame_range,
        detonated: false,
    });
    state.grid.add_bomb(col, row, id);
    state.player.bombs_armed += 1;
    state.player.bomb_cooldown = BOMB_COOLDOWN_SECS;
    state.events.push(GameEvent::BombArmed { id, col, row });
}

fn apply_movement(state: &mut GameState, player_dir: Vec2, enemy_moves: &[(usize, Direction)], dt: f32) {
    let GameState { grid, player, enemies, .. } = state;

    if player.alive && player_dir != Vec2::ZERO {
        let delta = player_dir.normalize_or_zero() * player.speed * dt;
        // the cell the player already stands on stays passable, which is
        // what lets an owner walk off a bomb armed underfoot but not back on
        let exempt = overlapped_cells(player.pos, player.half_extent);
        player.pos = resolve_move(player.pos, player.half_extent, delta, |col, row| {
            grid.is_terrain_solid(col, row)
                || (grid.has_bomb(col, row) && !exempt.contains(&(col, row)))
        });
    }

    for &(idx, dir) in enemy_moves {
        let enemy = &mut enemies[idx];
        let delta = dir.vec() * enemy.speed * dt;
        enemy.facing = Some(dir);
        enemy.pos = resolve_move(enemy.pos, enemy.half_extent, delta, |col, row| {
            grid.is_solid(col, row)
        });
    }
}

/// Kill everything overlapping a live flame cell, then resolve
/// player-enemy contact, fatal to both sides
fn apply_damage(state: &mut GameState) {
    let GameState { player, enemies, explosions, events, .. } = state;
    let in_flames = |pos: Vec2, half: f32| {
        let half = half * DAMAGE_SHRINK;
        explosions
            .iter()
            .any(|e| e.cells.iter().any(|fc| aabb_overlaps_cell(pos, half, fc.cell)))
    };

    if player.alive && in_flames(player.pos, player.half_extent) {
        player.alive = false;
        events.push(GameEvent::EntityKilled { id: player.id, kind: ActorKind::Player });
    }
    for enemy in enemies.iter_mut() {
        if enemy.alive && in_flames(enemy.pos, enemy.half_extent) {
            enemy.alive = false;
            events.push(GameEvent::EntityKilled { id: enemy.id, kind: ActorKind::Enemy });
        }
    }

    if player.alive {
        let mut touched = false;
        for enemy in enemies.iter_mut() {
            if enemy.alive
                && aabb_overlap(
                    player.pos,
                    player.half_extent * DAMAGE_SHRINK,
                    enemy.pos,
                    enemy.half_extent * DAMAGE_SHRINK,
                )
            {
                enemy.alive = false;
                events.push(GameEvent::EntityKilled { id: enemy.id, kind: ActorKind::Enemy });
                touched = true;
            }
        }
        if touched {
            player.alive = false;
            events.push(GameEvent::EntityKilled { id: player.id, kind: ActorKind::Player });
        }
    }
}

/// Pick up an uncollected powerup under the player; effects apply
/// immediately and a collected powerup is inert.
fn collect_powerups(state: &mut GameState) {
    let GameState { player, powerups, events, .. } = state;
    if !player.alive {
        return;
    }
    let player_cell = cell_of(player.pos);
    for powerup in powerups.iter_mut() {
        if powerup.collected || powerup.cell != player_cell {
            continue;
        }
        powerup.collected = true;
        match powerup.kind {
            PowerupKind::Fire => {
                player.flame_range = (player.flame_range + 1).min(MAX_FLAME_RANGE);
            }
            PowerupKind::BombCount => {
                player.bomb_capacity = (player.bomb_capacity + 1).min(MAX_BOMB_CAPACITY);
            }
            PowerupKind::Speed => {
                player.speed = (player.speed + SPEED_BONUS).min(PLAYER_SPEED_CAP);
            }
        }
        events.push(GameEvent::PowerupCollected { kind: powerup.kind });
    }
}

/// Win/lose checks. The exit reveals the tick the last enemy dies and is
/// traversable from the next tick on.
fn evaluate_terminal(state: &mut GameState) {
    if !state.grid.exit_revealed() && state.enemies.iter().all(|e| !e.alive) {
        let (col, row) = state.grid.reveal_exit();
        state.events.push(GameEvent::ExitRevealed { col, row });
        info!("exit revealed at ({col}, {row})");
    }

    if !state.player.alive {
        state.phase = GamePhase::Lost;
        state.events.push(GameEvent::GameLost);
        info!("game lost on tick {}", state.time_ticks);
    } else if state.grid.exit_revealed() && cell_of(state.player.pos) == state.grid.exit_cell() {
        state.phase = GamePhase::Won;
        state.events.push(GameEvent::GameWon);
        info!("game won on tick {}", state.time_ticks);
    }
}
