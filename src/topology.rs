//! Adjacency graphs for the surfaces a board can be laid out on.
//!
//! A [`Topology`] is built once from a width, height and [`TopologyKind`] and
//! never mutates afterwards: every cell's neighbour list is resolved up
//! front so the solver's hot loops never re-derive wrap arithmetic.

use crate::error::TopologyError;

/// The surface a board's cells are identified on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyKind {
    /// Classic bounded grid; out-of-range neighbours are simply absent.
    Square,
    /// Both axes wrap around (donut).
    Torus,
    /// Horizontal axis wraps with a vertical flip; vertical axis is bounded.
    Mobius,
    /// Horizontal axis wraps with a vertical flip; vertical axis also wraps, without a flip.
    Klein,
    /// Both axes wrap, each flipping the other axis's coordinate.
    Projective,
}

/// Immutable `(width, height, kind)` adjacency table.
#[derive(Debug, Clone)]
pub struct Topology {
    width: usize,
    height: usize,
    kind: TopologyKind,
    adjacency: Vec<Vec<usize>>,
}

impl Topology {
    /// Builds the adjacency table for `width * height` cells under `kind`.
    ///
    /// Fails with [`TopologyError::InvalidDimensions`] if either dimension is
    /// zero, or if `kind` needs at least two columns to wrap (Mobius, Klein,
    /// Projective) and `width < 2`.
    pub fn build(width: usize, height: usize, kind: TopologyKind) -> Result<Self, TopologyError> {
        let needs_wrap_width = matches!(
            kind,
            TopologyKind::Mobius | TopologyKind::Klein | TopologyKind::Projective
        );
        if width < 1 || height < 1 || (needs_wrap_width && width < 2) {
            return Err(TopologyError::InvalidDimensions {
                width,
                height,
                kind,
            });
        }

        let n = width * height;
        let mut adjacency = Vec::with_capacity(n);
        for idx in 0..n {
            let (x, y) = Self::index_to_coord(width, idx);
            adjacency.push(Self::cell_neighbours(width, height, kind, x, y));
        }

        let topology = Self {
            width,
            height,
            kind,
            adjacency,
        };
        debug_assert!(topology.is_symmetric(), "adjacency must be symmetric");
        Ok(topology)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn kind(&self) -> TopologyKind {
        self.kind
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Borrowed, ordered, duplicate-free list of `idx`'s neighbours.
    pub fn neighbours(&self, idx: usize) -> &[usize] {
        &self.adjacency[idx]
    }

    pub fn to_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn to_coord(&self, idx: usize) -> (usize, usize) {
        Self::index_to_coord(self.width, idx)
    }

    fn index_to_coord(width: usize, idx: usize) -> (usize, usize) {
        (idx % width, idx / width)
    }

    fn is_symmetric(&self) -> bool {
        self.adjacency.iter().enumerate().all(|(i, neighbours)| {
            neighbours
                .iter()
                .all(|&j| self.adjacency[j].contains(&i) && j != i)
        })
    }

    /// Resolves the 8 offsets around `(x, y)` into deduplicated, in-bounds
    /// neighbour indices according to `kind`'s identification rule.
    fn cell_neighbours(
        width: usize,
        height: usize,
        kind: TopologyKind,
        x: usize,
        y: usize,
    ) -> Vec<usize> {
        const OFFSETS: [(isize, isize); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];

        let mut out = Vec::with_capacity(8);
        for &(dx, dy) in &OFFSETS {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if let Some((fx, fy)) = Self::resolve(width, height, kind, nx, ny) {
                let target = fy * width + fx;
                let self_idx = y * width + x;
                if target != self_idx && !out.contains(&target) {
                    out.push(target);
                }
            }
        }
        out
    }

    /// Applies the surface's wrap/flip identification to a raw (possibly
    /// out-of-range) candidate coordinate. Returns `None` if the candidate is
    /// discarded by the kind's rule.
    fn resolve(
        width: usize,
        height: usize,
        kind: TopologyKind,
        nx: isize,
        ny: isize,
    ) -> Option<(usize, usize)> {
        let w = width as isize;
        let h = height as isize;
        let x_in_range = (0..w).contains(&nx);
        let y_in_range = (0..h).contains(&ny);

        match kind {
            TopologyKind::Square => {
                if x_in_range && y_in_range {
                    Some((nx as usize, ny as usize))
                } else {
                    None
                }
            }
            TopologyKind::Torus => {
                Some((nx.rem_euclid(w) as usize, ny.rem_euclid(h) as usize))
            }
            TopologyKind::Mobius => {
                if !y_in_range {
                    return None;
                }
                if x_in_range {
                    Some((nx as usize, ny as usize))
                } else {
                    let wrapped_x = nx.rem_euclid(w) as usize;
                    let flipped_y = (height - 1) - ny as usize;
                    Some((wrapped_x, flipped_y))
                }
            }
            TopologyKind::Klein => {
                let wrapped_y = ny.rem_euclid(h) as usize;
                if x_in_range {
                    Some((nx as usize, wrapped_y))
                } else {
                    let wrapped_x = nx.rem_euclid(w) as usize;
                    let flipped_y = (height - 1) - wrapped_y;
                    Some((wrapped_x, flipped_y))
                }
            }
            TopologyKind::Projective => {
                let wrapped_x = nx.rem_euclid(w) as usize;
                let wrapped_y = ny.rem_euclid(h) as usize;
                let final_y = if !x_in_range {
                    (height - 1) - wrapped_y
                } else {
                    wrapped_y
                };
                let final_x = if !y_in_range {
                    (width - 1) - wrapped_x
                } else {
                    wrapped_x
                };
                Some((final_x, final_y))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn assert_symmetric(topology: &Topology) {
        for idx in 0..topology.cell_count() {
            for &n in topology.neighbours(idx) {
                assert!(
                    topology.neighbours(n).contains(&idx),
                    "{idx} -> {n} is not reciprocated"
                );
                assert_ne!(n, idx, "self-loop at {idx}");
            }
        }
    }

    #[test]
    fn square_corners_edges_interior_have_expected_degree() {
        let t = Topology::build(4, 4, TopologyKind::Square).unwrap();
        assert_eq!(t.neighbours(t.to_index(0, 0)).len(), 3);
        assert_eq!(t.neighbours(t.to_index(1, 0)).len(), 5);
        assert_eq!(t.neighbours(t.to_index(1, 1)).len(), 8);
        assert_symmetric(&t);
    }

    #[test]
    fn torus_every_cell_has_eight_neighbours() {
        let t = Topology::build(4, 4, TopologyKind::Torus).unwrap();
        for idx in 0..t.cell_count() {
            assert_eq!(t.neighbours(idx).len(), 8);
        }
        assert_symmetric(&t);
    }

    /// Every wrapping surface kind, at a handful of sizes, stays symmetric
    /// and keeps every cell's degree within the 8-neighbour ceiling.
    #[rstest]
    #[case::mobius_small(TopologyKind::Mobius, 2, 3)]
    #[case::mobius_wide(TopologyKind::Mobius, 6, 5)]
    #[case::klein_small(TopologyKind::Klein, 2, 2)]
    #[case::klein_wide(TopologyKind::Klein, 6, 5)]
    #[case::projective_small(TopologyKind::Projective, 2, 2)]
    #[case::projective_wide(TopologyKind::Projective, 6, 5)]
    #[case::torus_wide(TopologyKind::Torus, 6, 5)]
    fn non_square_kinds_are_symmetric_across_sizes(
        #[case] kind: TopologyKind,
        #[case] width: usize,
        #[case] height: usize,
    ) {
        let t = Topology::build(width, height, kind).unwrap();
        assert_symmetric(&t);
        for idx in 0..t.cell_count() {
            let deg = t.neighbours(idx).len();
            assert!((3..=8).contains(&deg), "{kind:?} degree {deg} out of range");
        }
    }

    /// Square is the only kind that tolerates width 1 (a single column with
    /// no horizontal wrap); every kind that wraps horizontally needs two.
    #[rstest]
    #[case(TopologyKind::Square, 1, 4, true)]
    #[case(TopologyKind::Torus, 1, 4, true)]
    #[case(TopologyKind::Mobius, 1, 4, false)]
    #[case(TopologyKind::Mobius, 2, 4, true)]
    #[case(TopologyKind::Klein, 1, 4, false)]
    #[case(TopologyKind::Projective, 1, 4, false)]
    fn width_one_is_only_ever_valid_for_kinds_without_a_flip_wrap(
        #[case] kind: TopologyKind,
        #[case] width: usize,
        #[case] height: usize,
        #[case] expect_ok: bool,
    ) {
        assert_eq!(Topology::build(width, height, kind).is_ok(), expect_ok);
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(Topology::build(0, 4, TopologyKind::Square).is_err());
        assert!(Topology::build(4, 0, TopologyKind::Torus).is_err());
    }

    #[rstest]
    #[case(7, 5, TopologyKind::Square)]
    #[case(6, 5, TopologyKind::Torus)]
    #[case(6, 5, TopologyKind::Klein)]
    fn to_index_to_coord_roundtrip(
        #[case] width: usize,
        #[case] height: usize,
        #[case] kind: TopologyKind,
    ) {
        let t = Topology::build(width, height, kind).unwrap();
        for idx in 0..t.cell_count() {
            let (x, y) = t.to_coord(idx);
            assert_eq!(t.to_index(x, y), idx);
        }
    }
}
