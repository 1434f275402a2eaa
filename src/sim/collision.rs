//! Grid-aware movement resolution
//!
//! The tricky part of Blast Maze: turning continuous displacement into
//! movement that never penetrates solid tiles. Each axis resolves
//! independently (horizontal, then vertical) and clamps the entity's leading
//! edge to the face of the first solid tile along that axis. Resolving the
//! combined vector instead makes entities snag on wall corners when sliding
//! diagonally along a wall edge.

use glam::Vec2;

/// Gap kept between a clamped entity edge and the tile face
const SKIN: f32 = 1e-4;

/// Resolve a desired displacement against solid cells. `is_solid` answers
/// whether a cell blocks this particular mover, which lets callers exempt
/// e.g. the bomb the mover is still standing on.
pub fn resolve_move(
    pos: Vec2,
    half: f32,
    delta: Vec2,
    mut is_solid: impl FnMut(i32, i32) -> bool,
) -> Vec2 {
    let x = slide(pos.x, pos.y, half, delta.x, |a, c| is_solid(a, c));
    let y = slide(pos.y, x, half, delta.y, |a, c| is_solid(c, a));
    Vec2::new(x, y)
}

/// Move along one axis, clamping the leading edge at the first solid cell.
/// `along` is the moving coordinate, `cross` the fixed one; `solid` takes
/// (along-cell, cross-cell).
fn slide(
    along: f32,
    cross: f32,
    half: f32,
    delta: f32,
    mut solid: impl FnMut(i32, i32) -> bool,
) -> f32 {
    if delta == 0.0 {
        return along;
    }
    let lo = (cross - half + SKIN).floor() as i32;
    let hi = (cross + half - SKIN).floor() as i32;
    let target = along + delta;
    let (lead_now, lead_target) = if delta > 0.0 {
        (along + half - SKIN, target + half)
    } else {
        (along - half + SKIN, target - half)
    };
    let step = if delta > 0.0 { 1 } else { -1 };
    let last = lead_target.floor() as i32;
    // walk the cells the leading edge would newly enter, nearest first
    let mut cell = lead_now.floor() as i32 + step;
    while if step > 0 { cell <= last } else { cell >= last } {
        if (lo..=hi).any(|c| solid(cell, c)) {
            return if step > 0 {
                cell as f32 - half - SKIN
            } else {
                (cell + 1) as f32 + half + SKIN
            };
        }
        cell += step;
    }
    target
}

/// Cells currently overlapped by an axis-aligned box
pub fn overlapped_cells(pos: Vec2, half: f32) -> Vec<(i32, i32)> {
    let c0 = (pos.x - half + SKIN).floor() as i32;
    let c1 = (pos.x + half - SKIN).floor() as i32;
    let r0 = (pos.y - half + SKIN).floor() as i32;
    let r1 = (pos.y + half - SKIN).floor() as i32;
    let mut cells = Vec::with_capacity(4);
    for row in r0..=r1 {
        for col in c0..=c1 {
            cells.push((col, row));
        }
    }
    cells
}

/// Does an axis-aligned box overlap a grid cell?
pub fn aabb_overlaps_cell(pos: Vec2, half: f32, cell: (i32, i32)) -> bool {
    pos.x + half > cell.0 as f32
        && pos.x - half < (cell.0 + 1) as f32
        && pos.y + half > cell.1 as f32
        && pos.y - half < (cell.1 + 1) as f32
}

/// Do two axis-aligned boxes overlap?
pub fn aabb_overlap(a: Vec2, a_half: f32, b: Vec2, b_half: f32) -> bool {
    (a.x - b.x).abs() < a_half + b_half && (a.y - b.y).abs() < a_half + b_half
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HALF: f32 = 0.35;

    /// Solid border plus a single pillar at (2, 2), open elsewhere
    fn pillar(col: i32, row: i32) -> bool {
        !(0..13).contains(&col) || !(0..11).contains(&row)
            || col == 0 || col == 12 || row == 0 || row == 10
            || (col, row) == (2, 2)
    }

    #[test]
    fn free_movement_is_unclamped() {
        let pos = Vec2::new(5.5, 5.5);
        let out = resolve_move(pos, HALF, Vec2::new(0.08, -0.05), pillar);
        assert!((out - Vec2::new(5.58, 5.45)).abs().max_element() < 1e-6);
    }

    #[test]
    fn leading_edge_clamps_to_wall_face() {
        // moving right into the border at col 12
        let pos = Vec2::new(11.5, 5.5);
        let out = resolve_move(pos, HALF, Vec2::new(0.5, 0.0), pillar);
        assert!((out.x - (12.0 - HALF - 1e-4)).abs() < 1e-3);
        assert_eq!(out.y, 5.5);
        // and left into col 0
        let out = resolve_move(Vec2::new(1.5, 5.5), HALF, Vec2::new(-0.8, 0.0), pillar);
        assert!((out.x - (1.0 + HALF + 1e-4)).abs() < 1e-3);
    }

    #[test]
    fn diagonal_near_corner_resolves_per_axis() {
        // entity left of the pillar at (2,2), pushing diagonally into its
        // corner: the x axis clamps, the y axis must still slide
        let pos = Vec2::new(1.64, 2.5);
        let delta = Vec2::new(0.1, 0.1);
        let out = resolve_move(pos, HALF, delta, pillar);
        assert!((out.x - (2.0 - HALF - 1e-4)).abs() < 1e-3, "x clamps at the pillar face");
        assert!((out.y - 2.6).abs() < 1e-6, "y keeps sliding along the wall");

        // combined-vector resolution would have rejected the whole move;
        // per-axis must match resolving each axis independently
        let x_only = resolve_move(pos, HALF, Vec2::new(delta.x, 0.0), pillar);
        let y_only = resolve_move(Vec2::new(x_only.x, pos.y), HALF, Vec2::new(0.0, delta.y), pillar);
        assert_eq!(out, y_only);
    }

    #[test]
    fn sliding_down_past_the_pillar_does_not_snag() {
        // entity hugging the pillar's left face, moving down-right: x stays
        // clamped every tick, y keeps moving, so the entity walks past
        let mut pos = Vec2::new(2.0 - HALF - 1e-4, 1.8);
        for _ in 0..30 {
            pos = resolve_move(pos, HALF, Vec2::new(0.05, 0.05), pillar);
        }
        assert!(pos.y > 3.2, "entity cleared the pillar instead of sticking: {pos}");
    }

    #[test]
    fn exempt_cells_stay_passable() {
        // a bomb cell blocks unless exempted (owner still standing on it)
        let bomb = (5, 5);
        let solid = |c: i32, r: i32| pillar(c, r) || (c, r) == bomb;
        let pos = Vec2::new(5.5, 4.5);
        let blocked = resolve_move(pos, HALF, Vec2::new(0.0, 0.4), solid);
        assert!(blocked.y < 5.0 - HALF + 1e-3);

        let exempt = vec![bomb];
        let solid_exempt =
            |c: i32, r: i32| pillar(c, r) || ((c, r) == bomb && !exempt.contains(&(c, r)));
        let free = resolve_move(pos, HALF, Vec2::new(0.0, 0.4), solid_exempt);
        assert!((free.y - 4.9).abs() < 1e-6);
    }

    #[test]
    fn overlapped_cells_spans_edges() {
        assert_eq!(overlapped_cells(Vec2::new(5.5, 5.5), HALF), vec![(5, 5)]);
        let cells = overlapped_cells(Vec2::new(5.95, 5.5), HALF);
        assert!(cells.contains(&(5, 5)) && cells.contains(&(6, 5)));
    }

    proptest! {
        /// Collision soundness: however the entity is pushed around, it
        /// never ends a move overlapping a solid cell.
        #[test]
        fn never_ends_inside_a_wall(
            start_col in 1i32..12,
            start_row in 1i32..10,
            moves in prop::collection::vec((-0.4f32..0.4, -0.4f32..0.4), 1..200),
        ) {
            prop_assume!(!pillar(start_col, start_row));
            let mut pos = Vec2::new(start_col as f32 + 0.5, start_row as f32 + 0.5);
            for (dx, dy) in moves {
                pos = resolve_move(pos, HALF, Vec2::new(dx, dy), pillar);
                for (col, row) in overlapped_cells(pos, HALF) {
                    prop_assert!(!pillar(col, row), "entity at {pos} overlaps solid ({col},{row})");
                }
            }
        }
    }
}
