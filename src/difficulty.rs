//! Preset board configurations cycled by keypress in the demo, each pairing
//! classic `(width, height, mines)` values with a surface kind.

use crate::topology::TopologyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Maniac,
}

impl Difficulty {
    /// Return the board parameters for this difficulty as (width, height, mines).
    /// Classic Minesweeper values:
    /// - Easy/Beginner: 9x9 with 10 mines
    /// - Medium/Intermediate: 16x16 with 40 mines
    /// - Hard/Expert: 30x16 with 99 mines
    /// - Maniac: 48x24 with 256 mines, wrapped on a torus
    pub const fn parameters(self) -> (usize, usize, usize) {
        match self {
            Self::Easy => (9, 9, 10),
            Self::Medium => (16, 16, 40),
            Self::Hard => (30, 16, 99),
            Self::Maniac => (48, 24, 256),
        }
    }

    /// Surface the board is laid out on. The classic three keep the bounded
    /// grid players expect; Maniac wraps on a torus so its density is only
    /// survivable with wraparound deductions in play.
    pub const fn topology(self) -> TopologyKind {
        match self {
            Self::Easy | Self::Medium | Self::Hard => TopologyKind::Square,
            Self::Maniac => TopologyKind::Torus,
        }
    }

    /// Cycle to the next difficulty in order: Easy -> Medium -> Hard -> Maniac -> Easy
    pub const fn cycle(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Maniac,
            Self::Maniac => Self::Easy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Difficulty;
    use crate::topology::TopologyKind;

    #[test]
    fn parameters_match_classic_values() {
        assert_eq!(Difficulty::Easy.parameters(), (9, 9, 10));
        assert_eq!(Difficulty::Medium.parameters(), (16, 16, 40));
        assert_eq!(Difficulty::Hard.parameters(), (30, 16, 99));
        assert_eq!(Difficulty::Maniac.parameters(), (48, 24, 256));
    }

    #[test]
    fn cycle_rotates_in_order() {
        assert_eq!(Difficulty::Easy.cycle(), Difficulty::Medium);
        assert_eq!(Difficulty::Medium.cycle(), Difficulty::Hard);
        assert_eq!(Difficulty::Hard.cycle(), Difficulty::Maniac);
        assert_eq!(Difficulty::Maniac.cycle(), Difficulty::Easy);
    }

    #[test]
    fn only_maniac_wraps_on_a_torus() {
        assert_eq!(Difficulty::Easy.topology(), TopologyKind::Square);
        assert_eq!(Difficulty::Medium.topology(), TopologyKind::Square);
        assert_eq!(Difficulty::Hard.topology(), TopologyKind::Square);
        assert_eq!(Difficulty::Maniac.topology(), TopologyKind::Torus);
    }
}
