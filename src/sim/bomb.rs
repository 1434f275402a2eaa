//! Bomb fuses, detonation, flame propagation
//!
//! Chain reactions resolve fully inside the tick that triggers them: the
//! detonation walks an explicit work-list with a visited set, so a bomb
//! fires exactly once no matter how blast radii overlap or cycle. Soft
//! walls destroyed by an earlier bomb in the chain open the way for later
//! bombs in the same chain.

use std::collections::HashSet;

use log::debug;

use super::grid::{GridError, Tile};
use super::state::{Direction, Explosion, FlameCell, GameEvent, GameState, Powerup};

/// Advance fuses, fire everything that is due (with chains), age flames.
pub fn update(state: &mut GameState, dt: f32) -> Result<(), GridError> {
    let mut due = Vec::new();
    for bomb in &mut state.bombs {
        if bomb.detonated {
            continue;
        }
        bomb.fuse -= dt;
        if bomb.fuse <= 0.0 {
            due.push(bomb.id);
        }
    }
    detonate(state, due)?;

    for explosion in &mut state.explosions {
        for cell in &mut explosion.cells {
            cell.ttl -= dt;
        }
        explosion.cells.retain(|fc| fc.ttl > 0.0);
    }
    Ok(())
}

/// Detonate the given bombs plus every armed bomb their flames reach.
/// An abandoned bomb whose owner already died still fires.
pub fn detonate(state: &mut GameState, mut work: Vec<u32>) -> Result<(), GridError> {
    let mut visited: HashSet<u32> = HashSet::new();
    while let Some(id) = work.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(idx) = state.bombs.iter().position(|b| b.id == id && !b.detonated) else {
            continue;
        };
        let (origin, range, owner) = {
            let bomb = &state.bombs[idx];
            (bomb.cell, bomb.flame_range, bomb.owner)
        };
        state.bombs[idx].detonated = true;
        state.grid.remove_bomb(origin.0, origin.1);
        if state.player.id == owner {
            // free capacity for a new bomb
            state.player.bombs_armed = state.player.bombs_armed.saturating_sub(1);
        }

        let cells = propagate(state, origin, range)?;
        debug!("bomb {id} detonated at {origin:?}, {} flame cells", cells.len());

        // force-detonate any armed bomb standing in the flames
        for fc in &cells {
            if let Some(other) = state.grid.bomb_at(fc.cell.0, fc.cell.1) {
                work.push(other);
            }
        }

        let eid = state.next_entity_id();
        state.explosions.push(Explosion { id: eid, origin, flame_range: range, cells });
        state.events.push(GameEvent::ExplosionTriggered { col: origin.0, row: origin.1 });
    }
    Ok(())
}

/// Flame cells for one detonation: the origin plus up to `range` cells in
/// each cardinal direction. A hard wall (or the hidden exit) stops a
/// direction short of the wall; a soft wall burns, is destroyed, and stops
/// the direction there.
fn propagate(
    state: &mut GameState,
    origin: (i32, i32),
    range: i32,
) -> Result<Vec<FlameCell>, GridError> {
    let ttl = state.level.rules.flame_secs;
    let mut cells = vec![FlameCell { cell: origin, ttl }];
    for dir in Direction::ALL {
        let (dx, dy) = dir.delta();
        for step in 1..=range {
            let cell = (origin.0 + dx * step, origin.1 + dy * step);
            let Ok(tile) = state.grid.tile_at(cell.0, cell.1) else {
                break;
            };
            match tile {
                Tile::HardWall => break,
                Tile::Exit if !state.grid.exit_revealed() => break,
                Tile::SoftWall => {
                    cells.push(FlameCell { cell, ttl });
                    let drop = state.grid.destroy_soft_wall(cell.0, cell.1, &mut state.rng)?;
                    state.events.push(GameEvent::WallDestroyed { col: cell.0, row: cell.1 });
                    if let Some(kind) = drop {
                        let id = state.next_entity_id();
                        state.powerups.push(Powerup { id, kind, cell, collected: false });
                        state.events.push(GameEvent::PowerupSpawned {
                            kind,
                            col: cell.0,
                            row: cell.1,
                        });
                    }
                    break;
                }
                Tile::Empty | Tile::Exit => cells.push(FlameCell { cell, ttl }),
            }
        }
    }
    Ok(cells)
}
