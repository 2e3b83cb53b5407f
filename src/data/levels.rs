//! Bond level table
//!
//! Ordered (level, cumulative experience) pairs with binary-search lookups.

use serde::{Deserialize, Serialize};

use super::DataError;

/// Highest level the built-in table covers
pub const MAX_LEVEL: u32 = 100;

/// A single row of the level table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEntry {
    /// Level this row describes
    pub level: u32,
    /// Total experience required to reach this level from level 1
    pub cumulative_exp: u64,
}

/// The bond level table, sorted ascending by level
///
/// Cumulative experience is a monotonic staircase: it never decreases as
/// the level increases. Both properties are checked once at construction so
/// lookups can binary search without re-validating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    entries: Vec<LevelEntry>,
}

impl LevelTable {
    /// Build a table from raw rows, sorting and validating them
    pub fn new(mut entries: Vec<LevelEntry>) -> Result<Self, DataError> {
        entries.sort_by_key(|e| e.level);
        for pair in entries.windows(2) {
            if pair[0].level == pair[1].level {
                return Err(DataError::DuplicateLevel(pair[0].level));
            }
            if pair[0].cumulative_exp > pair[1].cumulative_exp {
                return Err(DataError::NonMonotonicLevel(pair[1].level));
            }
        }
        Ok(Self { entries })
    }

    /// Cumulative experience required to reach `level`, if tabulated
    pub fn get(&self, level: u32) -> Option<u64> {
        self.entries
            .binary_search_by_key(&level, |e| e.level)
            .ok()
            .map(|i| self.entries[i].cumulative_exp)
    }

    /// Cumulative experience required to reach `level`
    ///
    /// Levels absent from the table cost nothing (level 1 usually has no
    /// explicit zero row).
    pub fn cumulative_exp_for(&self, level: u32) -> u64 {
        self.get(level).unwrap_or(0)
    }

    /// Highest tabulated level at or above `start_level` whose cumulative
    /// requirement fits within `total_exp`
    ///
    /// Returns `start_level` unchanged when no entry qualifies. Recomputed on
    /// every edit, so both scans are binary searches rather than a walk from
    /// the front of the table.
    pub fn highest_level_reachable(&self, total_exp: u64, start_level: u32) -> u32 {
        let from = self.entries.partition_point(|e| e.level < start_level);
        let candidates = &self.entries[from..];
        let within = candidates.partition_point(|e| e.cumulative_exp <= total_exp);
        if within == 0 {
            start_level
        } else {
            candidates[within - 1].level
        }
    }

    /// Highest level the table covers, if any rows exist
    pub fn max_level(&self) -> Option<u32> {
        self.entries.last().map(|e| e.level)
    }

    /// All rows, sorted ascending by level
    pub fn entries(&self) -> &[LevelEntry] {
        &self.entries
    }

    /// Number of tabulated levels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Experience needed to advance from `level` to `level + 1` in the built-in
/// table
fn exp_to_advance(level: u32) -> u64 {
    let l = level as u64;
    match level {
        1 => 15,
        2..=19 => 20 + 5 * (l / 2),
        20..=49 => 60 + 10 * ((l - 20) / 5),
        _ => 120 + 15 * ((l - 50) / 10),
    }
}

/// Built-in level table covering levels 1 through [`MAX_LEVEL`]
pub fn default_level_table() -> LevelTable {
    let mut entries = Vec::with_capacity(MAX_LEVEL as usize);
    let mut cumulative = 0u64;
    for level in 1..=MAX_LEVEL {
        entries.push(LevelEntry {
            level,
            cumulative_exp: cumulative,
        });
        cumulative += exp_to_advance(level);
    }
    // Generated ascending with non-decreasing increments; no re-validation
    LevelTable { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> LevelTable {
        LevelTable::new(vec![
            LevelEntry { level: 1, cumulative_exp: 0 },
            LevelEntry { level: 2, cumulative_exp: 100 },
            LevelEntry { level: 3, cumulative_exp: 250 },
        ])
        .unwrap()
    }

    #[test]
    fn test_cumulative_exp_lookup() {
        let table = small_table();
        assert_eq!(table.cumulative_exp_for(1), 0);
        assert_eq!(table.cumulative_exp_for(2), 100);
        assert_eq!(table.cumulative_exp_for(3), 250);
        // Absent levels cost nothing
        assert_eq!(table.cumulative_exp_for(42), 0);
    }

    #[test]
    fn test_highest_level_reachable() {
        let table = small_table();
        assert_eq!(table.highest_level_reachable(0, 1), 1);
        assert_eq!(table.highest_level_reachable(99, 1), 1);
        assert_eq!(table.highest_level_reachable(100, 1), 2);
        assert_eq!(table.highest_level_reachable(249, 1), 2);
        assert_eq!(table.highest_level_reachable(250, 1), 3);
    }

    #[test]
    fn test_reachable_never_below_start() {
        let table = small_table();
        // Nothing at or above level 2 fits in 50 exp
        assert_eq!(table.highest_level_reachable(50, 2), 2);
        // Start level beyond the table is returned unchanged
        assert_eq!(table.highest_level_reachable(1_000_000, 7), 7);
    }

    #[test]
    fn test_reachable_is_idempotent() {
        let table = small_table();
        let first = table.highest_level_reachable(180, 1);
        let second = table.highest_level_reachable(180, 1);
        assert_eq!(first, second);
        assert_eq!(first, 2);
    }

    #[test]
    fn test_overflow_past_table_caps_at_max() {
        let table = small_table();
        assert_eq!(table.highest_level_reachable(u64::MAX, 1), 3);
        assert_eq!(table.max_level(), Some(3));
    }

    #[test]
    fn test_rejects_duplicate_level() {
        let result = LevelTable::new(vec![
            LevelEntry { level: 2, cumulative_exp: 100 },
            LevelEntry { level: 2, cumulative_exp: 100 },
        ]);
        assert!(matches!(result, Err(DataError::DuplicateLevel(2))));
    }

    #[test]
    fn test_rejects_decreasing_exp() {
        let result = LevelTable::new(vec![
            LevelEntry { level: 1, cumulative_exp: 100 },
            LevelEntry { level: 2, cumulative_exp: 50 },
        ]);
        assert!(matches!(result, Err(DataError::NonMonotonicLevel(2))));
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let table = LevelTable::new(vec![
            LevelEntry { level: 3, cumulative_exp: 250 },
            LevelEntry { level: 1, cumulative_exp: 0 },
            LevelEntry { level: 2, cumulative_exp: 100 },
        ])
        .unwrap();
        assert_eq!(table.highest_level_reachable(120, 1), 2);
    }

    #[test]
    fn test_default_table_is_monotonic() {
        let table = default_level_table();
        assert_eq!(table.len(), MAX_LEVEL as usize);
        assert_eq!(table.cumulative_exp_for(1), 0);
        for pair in table.entries().windows(2) {
            assert!(pair[0].level < pair[1].level);
            assert!(pair[0].cumulative_exp <= pair[1].cumulative_exp);
        }
    }
}
