#![deny(clippy::all)]
#![warn(clippy::pedantic)]

use clap::{Parser, ValueEnum};

use toposweeper::app::App;
use toposweeper::difficulty::Difficulty;
use toposweeper::generator::GeneratorConfig;
use toposweeper::topology::TopologyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TopologyArg {
    Square,
    Torus,
    Mobius,
    Klein,
    Projective,
}

impl From<TopologyArg> for TopologyKind {
    fn from(value: TopologyArg) -> Self {
        match value {
            TopologyArg::Square => TopologyKind::Square,
            TopologyArg::Torus => TopologyKind::Torus,
            TopologyArg::Mobius => TopologyKind::Mobius,
            TopologyArg::Klein => TopologyKind::Klein,
            TopologyArg::Projective => TopologyKind::Projective,
        }
    }
}

/// A terminal minesweeper played on non-Euclidean surfaces.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Board width in cells. Requires --height and --mines.
    #[arg(long, requires_all = ["height", "mines"])]
    width: Option<usize>,

    /// Board height in cells.
    #[arg(long)]
    height: Option<usize>,

    /// Number of mines to place.
    #[arg(long)]
    mines: Option<usize>,

    /// Surface the board wraps on. Defaults to Square unless overridden.
    #[arg(long, value_enum, default_value_t = TopologyArg::Square)]
    topology: TopologyArg,

    /// Seed the board generator for a reproducible layout.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut app = match (cli.width, cli.height, cli.mines) {
        (Some(width), Some(height), Some(mines)) => {
            let config = GeneratorConfig::new(width, height, mines, cli.topology.into());
            App::with_config(config, cli.seed)?
        }
        _ => App::new(Difficulty::Easy)?,
    };

    app.run()?;
    Ok(())
}
