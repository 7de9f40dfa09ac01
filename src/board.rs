//! Mine placement, per-cell state, and flood-open for a single game.

use std::sync::Arc;

use rand::Rng;

use crate::cellset::CellSet;
use crate::error::BoardError;
use crate::topology::Topology;

/// Visible per-cell state. The hidden mine truth is never part of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Hidden,
    Opened,
    Flagged,
}

/// Render-facing projection of a single cell, combining `status` and
/// `neighborMineCounts` (and, only when explicitly requested, the mine
/// truth) into one value a UI can match on directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
}

/// The read-only projection of a `Board` handed to the `Solver`: status and
/// neighbour counts, but never the mine array. Deduction code built against
/// this type cannot accidentally read ground truth.
pub struct BoardView<'a> {
    topology: &'a Topology,
    status: &'a [Status],
    neighbor_mine_counts: &'a [i8],
}

impl<'a> BoardView<'a> {
    pub fn topology(&self) -> &'a Topology {
        self.topology
    }

    pub fn status(&self, idx: usize) -> Status {
        self.status[idx]
    }

    pub fn neighbor_mine_count(&self, idx: usize) -> i8 {
        self.neighbor_mine_counts[idx]
    }

    pub fn cell_count(&self) -> usize {
        self.status.len()
    }
}

/// Owns mine placement, derived neighbour counts, and player-visible status
/// for one game. Shares its `Topology` with clones and with any `Board`
/// produced from the same generation attempt.
#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) topology: Arc<Topology>,
    pub(crate) mines: Vec<bool>,
    pub(crate) status: Vec<Status>,
    pub(crate) neighbor_mine_counts: Vec<i8>,
    pub(crate) placed: bool,
}

impl Board {
    pub fn new(topology: Arc<Topology>) -> Self {
        let n = topology.cell_count();
        Self {
            topology,
            mines: vec![false; n],
            status: vec![Status::Hidden; n],
            neighbor_mine_counts: vec![0; n],
            placed: false,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn width(&self) -> usize {
        self.topology.width()
    }

    pub fn height(&self) -> usize {
        self.topology.height()
    }

    pub fn cell_count(&self) -> usize {
        self.topology.cell_count()
    }

    /// Places `mine_count` mines uniformly at random outside `startIdx`'s
    /// safe zone, then fills `neighborMineCounts` in one pass.
    ///
    /// Must be called exactly once per board; calling it twice is a caller
    /// bug, not a recoverable error, so it panics in debug builds.
    pub fn place_mines(
        &mut self,
        mine_count: usize,
        start_idx: usize,
        rng: &mut impl Rng,
    ) -> Result<(), BoardError> {
        debug_assert!(!self.placed, "place_mines called twice on the same board");

        let n = self.cell_count();
        let mut safe_zone = CellSet::new(n);
        safe_zone.insert(start_idx);
        for &neighbour in self.topology.neighbours(start_idx) {
            safe_zone.insert(neighbour);
        }

        let capacity = n - safe_zone.len();
        if mine_count > capacity {
            return Err(BoardError::PlacementInfeasible {
                requested: mine_count,
                capacity,
            });
        }

        let mut placed = CellSet::new(n);
        let max_attempts = 20 * n;
        let mut attempts = 0usize;
        while placed.len() < mine_count {
            if attempts >= max_attempts {
                return Err(BoardError::PlacementInfeasible {
                    requested: mine_count,
                    capacity,
                });
            }
            attempts += 1;
            let candidate = rng.random_range(0..n);
            if safe_zone.contains(candidate) {
                continue;
            }
            placed.insert(candidate);
        }

        for idx in placed.iter() {
            self.mines[idx] = true;
        }
        for idx in 0..n {
            self.neighbor_mine_counts[idx] = if self.mines[idx] {
                -1
            } else {
                self.topology
                    .neighbours(idx)
                    .iter()
                    .filter(|&&n| self.mines[n])
                    .count() as i8
            };
        }

        self.placed = true;
        Ok(())
    }

    pub fn status(&self, idx: usize) -> Status {
        self.status[idx]
    }

    pub fn neighbor_mine_count(&self, idx: usize) -> i8 {
        self.neighbor_mine_counts[idx]
    }

    pub fn is_mine(&self, idx: usize) -> bool {
        self.mines[idx]
    }

    /// The read-only view handed to a `Solver`: status and neighbour counts
    /// only, never `mines`.
    pub fn view(&self) -> BoardView<'_> {
        BoardView {
            topology: &self.topology,
            status: &self.status,
            neighbor_mine_counts: &self.neighbor_mine_counts,
        }
    }

    /// Opens `idx`. Returns `true` iff it was a mine. No-op (returns
    /// `false`) on any cell that is not `Hidden`, including flagged cells.
    /// Zero-count cells cascade through their neighbours via an explicit
    /// work-list so stack depth never depends on board size.
    pub fn open(&mut self, idx: usize) -> bool {
        if self.status[idx] != Status::Hidden {
            return false;
        }
        if self.mines[idx] {
            self.status[idx] = Status::Opened;
            return true;
        }

        let mut work = vec![idx];
        while let Some(i) = work.pop() {
            if self.status[i] != Status::Hidden {
                continue;
            }
            self.status[i] = Status::Opened;
            if self.neighbor_mine_counts[i] == 0 {
                for &n in self.topology.neighbours(i) {
                    if self.status[n] == Status::Hidden {
                        work.push(n);
                    }
                }
            }
        }
        false
    }

    /// HIDDEN <-> FLAGGED. No-op on an opened cell.
    pub fn toggle_flag(&mut self, idx: usize) {
        match self.status[idx] {
            Status::Hidden => self.status[idx] = Status::Flagged,
            Status::Flagged => self.status[idx] = Status::Hidden,
            Status::Opened => {}
        }
    }

    pub fn count_flags(&self) -> usize {
        self.status
            .iter()
            .filter(|&&s| s == Status::Flagged)
            .count()
    }

    /// True iff every non-mine cell is opened. Mine cells may be hidden or
    /// flagged; their state does not affect victory.
    pub fn check_win(&self) -> bool {
        (0..self.cell_count()).all(|idx| self.mines[idx] || self.status[idx] == Status::Opened)
    }

    /// Resets every cell to `Hidden` without touching `mines` or the cached
    /// neighbour counts. Used by the generator to discard the solver's
    /// proof-opening before seeding the real game.
    pub fn reset_status(&mut self) {
        self.status.fill(Status::Hidden);
    }

    /// Render-facing status for `idx`. `reveal_mines` should only be `true`
    /// in a LOST or review state; the renderer must not interpret a mine
    /// while the game is still playing.
    pub fn cell_status(&self, idx: usize, reveal_mines: bool) -> CellStatus {
        if reveal_mines && self.mines[idx] {
            return CellStatus::Mine;
        }
        match self.status[idx] {
            Status::Hidden => CellStatus::Hidden,
            Status::Flagged => CellStatus::Flagged,
            Status::Opened => CellStatus::Revealed(self.neighbor_mine_counts[idx].max(0) as u8),
        }
    }
}
