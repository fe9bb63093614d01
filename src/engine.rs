//! Transition rule for the forest fire automaton.
//!
//! Burning cells burn out after exactly one tick. An unburned cell looks at its
//! four orthogonal neighbours (top, left, right, bottom) and each burning one
//! gets an independent chance to ignite it; the first success wins. Only
//! committed states are read and only staged states are written, so a cell never
//! sees a neighbour's state from the same tick. Visit order only decides which
//! cell consumes which random draw.

use crate::grid::{CellState, Grid};
use crate::rng::RandomSource;

/// Neighbour offsets in the order they are checked: top, left, right, bottom.
/// The order decides which draw is consumed first, so keep it fixed.
pub const NEIGHBOR_ORDER: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// One Bernoulli trial with `burn_chance` percent odds of success
fn burn_chance_happens<R: RandomSource + ?Sized>(rng: &mut R, burn_chance: u8) -> bool {
    rng.random_int(0, 100) < burn_chance as usize
}

/// Compute the next state of interior cell (x, y) from the committed grid
pub fn next_state<R: RandomSource + ?Sized>(
    grid: &Grid,
    x: usize,
    y: usize,
    burn_chance: u8,
    rng: &mut R,
) -> CellState {
    match grid.get(x, y) {
        CellState::Burning => CellState::Burnt,
        CellState::Burnt => CellState::Burnt,
        CellState::Unburned => {
            let ignited = NEIGHBOR_ORDER.iter().any(|&(dx, dy)| {
                // Interior cells always have all four neighbours in range
                let nx = x.wrapping_add_signed(dx);
                let ny = y.wrapping_add_signed(dy);
                grid.get(nx, ny) == CellState::Burning && burn_chance_happens(rng, burn_chance)
            });
            if ignited {
                CellState::Burning
            } else {
                CellState::Unburned
            }
        }
    }
}

/// Stage the next state of every interior cell. Does not commit.
/// Cells are visited column by column (x outer, y inner); that order decides
/// which cell consumes which random draw.
pub fn stage_next_states<R: RandomSource + ?Sized>(grid: &mut Grid, burn_chance: u8, rng: &mut R) {
    for x in 1..grid.width() - 1 {
        for y in 1..grid.height() - 1 {
            let state = next_state(grid, x, y, burn_chance, rng);
            grid.stage_next(x, y, state);
        }
    }
}
