#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::HashMap;

use crate::{error::EntrypointError, results::TestRecord};

/// Concatenates caller-supplied parts and harness tests, extra parts first.
/// Each source keeps its own order.
pub fn merge_tests(extra_parts: Vec<TestRecord>, harness_tests: Vec<TestRecord>) -> Vec<TestRecord> {
    let mut tests = extra_parts;
    tests.extend(harness_tests);
    tests
}

/// Sums `(points, max_points)` over `tests`.
pub fn totals(tests: &[TestRecord]) -> (f64, f64) {
    tests
        .iter()
        .fold((0f64, 0f64), |acc, t| (acc.0 + t.points_value(), acc.1 + t.max_points_value()))
}

/// Total points earned over total points available.
///
/// Errors when the available total is zero, which includes an empty test
/// list.
pub fn score(tests: &[TestRecord]) -> Result<f64, EntrypointError> {
    let (points, max_points) = totals(tests);
    if max_points == 0.0 {
        return Err(EntrypointError::UndefinedScore { tests: tests.len() });
    }
    Ok(points / max_points)
}

/// Maps each test name to its position in the merged list.
///
/// Built in a single pass, so when a name repeats the last occurrence wins.
/// The test list itself still holds every record.
#[derive(Debug, Default, Clone)]
pub struct PartIndex(HashMap<String, usize>);

impl PartIndex {
    /// Indexes `tests` by name.
    pub fn build(tests: &[TestRecord]) -> Self {
        let mut index = HashMap::with_capacity(tests.len());
        for (i, test) in tests.iter().enumerate() {
            index.insert(test.name.clone(), i);
        }
        Self(index)
    }

    /// Position of the record named `name`, if any.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.0.get(name).copied()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no names are indexed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
