use std::fmt;

/// Fixed-width bitset over compacted valve indices.
///
/// The search keys states by the set of valves already opened; a bitset
/// makes equality, hashing and the disjointness check of the two-agent
/// combiner O(1) instead of walking a collection per comparison.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValveSet(u64);

/// Hard capacity of `ValveSet`. Searches stay tractable well below this;
/// anything past ~20 interesting valves is already 2^20 subsets.
pub const VALVE_SET_CAPACITY: usize = 64;

impl ValveSet {
    pub const EMPTY: ValveSet = ValveSet(0);

    pub fn contains(&self, index: usize) -> bool {
        debug_assert!(index < VALVE_SET_CAPACITY);
        self.0 & (1u64 << index) != 0
    }

    #[must_use]
    pub fn with(&self, index: usize) -> ValveSet {
        debug_assert!(index < VALVE_SET_CAPACITY);
        ValveSet(self.0 | (1u64 << index))
    }

    pub fn is_disjoint(&self, other: &ValveSet) -> bool {
        self.0 & other.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if every member is below `bound`. The search engine asserts
    /// this against the interesting-valve count after each expansion.
    pub fn within(&self, bound: usize) -> bool {
        bound >= VALVE_SET_CAPACITY || self.0 >> bound == 0
    }
}

impl fmt::Debug for ValveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValveSet({:#b})", self.0)
    }
}

/// One node of the explicit search worklist.
///
/// Two states with the same (at, time_left, opened) are interchangeable
/// for all future decisions; only the larger `released` needs to survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchState {
    /// Row index into the distance table (interesting valve, or the
    /// start row).
    pub at: usize,
    pub time_left: u32,
    pub opened: ValveSet,
    pub released: usize,
}

impl SearchState {
    pub fn key(&self) -> (usize, u32, ValveSet) {
        (self.at, self.time_left, self.opened)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valve_set_insert_contains() {
        let set = ValveSet::EMPTY.with(0).with(5);
        assert!(set.contains(0));
        assert!(set.contains(5));
        assert!(!set.contains(1));
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_valve_set_disjoint() {
        let a = ValveSet::EMPTY.with(0).with(2);
        let b = ValveSet::EMPTY.with(1).with(3);
        let c = ValveSet::EMPTY.with(2);
        assert!(a.is_disjoint(&b));
        assert!(!a.is_disjoint(&c));
        assert!(ValveSet::EMPTY.is_disjoint(&a));
    }

    #[test]
    fn test_valve_set_within() {
        let set = ValveSet::EMPTY.with(3);
        assert!(set.within(4));
        assert!(!set.within(3));
        assert!(ValveSet::EMPTY.within(0));
    }
}
