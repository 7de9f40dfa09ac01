//! No-guess board generation: retries mine placement until the solver can
//! clear the whole board from a fixed starting cell.

use std::sync::Arc;

use rand::Rng;

use crate::board::Board;
use crate::error::{Error, GenerationError};
use crate::solver::Solver;
use crate::topology::{Topology, TopologyKind};

/// Maximum placement/solve attempts before giving up on a configuration.
pub const MAX_RETRY: u32 = 2000;

/// Width, height, mine count and surface kind for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    pub topology: TopologyKind,
}

impl GeneratorConfig {
    pub const fn new(width: usize, height: usize, mines: usize, topology: TopologyKind) -> Self {
        Self {
            width,
            height,
            mines,
            topology,
        }
    }
}

/// Builds a `Topology` once, then retries placement + solvability against it
/// until `MAX_RETRY` attempts are spent. `on_progress` is called once per
/// attempt (including the first) so a host can pace redraws or cancel.
///
/// On success the returned board has every cell HIDDEN except `start_idx`,
/// already opened, ready to hand to a player.
pub fn generate(
    config: &GeneratorConfig,
    start_idx: usize,
    rng: &mut impl Rng,
    mut on_progress: impl FnMut(u32),
) -> Result<Board, Error> {
    let topology = Arc::new(Topology::build(config.width, config.height, config.topology)?);

    for attempt in 1..=MAX_RETRY {
        on_progress(attempt);

        let mut board = Board::new(Arc::clone(&topology));
        if board.place_mines(config.mines, start_idx, rng).is_err() {
            continue;
        }

        let solved = {
            let mut solver = Solver::new(&mut board, config.mines);
            solver.check_solvability(start_idx)
        };
        if !solved {
            continue;
        }

        board.reset_status();
        board.open(start_idx);
        return Ok(board);
    }

    Err(Error::Generation(GenerationError::Exhausted {
        attempts: MAX_RETRY,
    }))
}
