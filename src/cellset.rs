//! Fixed-universe bitset used for `knownMines`/`knownSafe` and similar
//! dense small sets of cell indices, where every member is bounded by the
//! board's cell count.

use bitvec::vec::BitVec;

#[derive(Debug, Clone)]
pub struct CellSet {
    bits: BitVec,
}

impl CellSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, capacity),
        }
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.bits[idx]
    }

    /// Inserts `idx`, returning whether it was newly added.
    pub fn insert(&mut self, idx: usize) -> bool {
        let was_set = self.bits[idx];
        self.bits.set(idx, true);
        !was_set
    }

    pub fn remove(&mut self, idx: usize) -> bool {
        let was_set = self.bits[idx];
        self.bits.set(idx, false);
        was_set
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_novelty() {
        let mut set = CellSet::new(8);
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert_eq!(set.len(), 1);
        assert!(set.contains(3));
    }

    #[test]
    fn remove_and_iterate() {
        let mut set = CellSet::new(8);
        set.insert(1);
        set.insert(5);
        assert!(set.remove(1));
        assert!(!set.remove(1));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![5]);
    }
}
