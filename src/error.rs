//! Error taxonomy for the core crate.
//!
//! `Board`, `Topology` and the generator each have exactly one way to fail;
//! everything else is total. `ContradictionDetected` is deliberately absent
//! here — it is an internal `Solver` signal and never surfaces through this
//! module.

use thiserror::Error;

use crate::topology::TopologyKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("invalid dimensions {width}x{height} for {kind:?} topology")]
    InvalidDimensions {
        width: usize,
        height: usize,
        kind: TopologyKind,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("cannot place {requested} mines, only {capacity} cells available outside the safe zone")]
    PlacementInfeasible { requested: usize, capacity: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("failed to generate a guess-free board after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Top-level error, aggregating every fallible boundary the host can see.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
