#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod app;
pub mod board;
pub mod cellset;
pub mod difficulty;
pub mod error;
pub mod generator;
pub mod input;
pub mod solver;
pub mod topology;
pub mod ui;

pub use board::{Board, BoardView, CellStatus, Status};
pub use difficulty::Difficulty;
pub use error::{BoardError, Error, GenerationError, Result, TopologyError};
pub use generator::{generate, GeneratorConfig, MAX_RETRY};
pub use solver::Solver;
pub use topology::{Topology, TopologyKind};
