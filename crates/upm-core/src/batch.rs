//! Batch splitting
//!
//! The ID-mapping service caps the number of identifiers per job, so a
//! request is cut into consecutive, order-preserving chunks.

use crate::error::{MapperError, Result};

/// An immutable, indexed slice of the input identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    index: usize,
    identifiers: Vec<String>,
}

impl Batch {
    pub fn new(index: usize, identifiers: Vec<String>) -> Self {
        Self { index, identifiers }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Identifiers joined the way the submission form expects them
    pub fn joined(&self) -> String {
        self.identifiers.join(",")
    }
}

/// Partition `identifiers` into `ceil(n / batch_size)` batches
///
/// Concatenating the batches in index order reproduces the input exactly.
pub fn split(identifiers: &[String], batch_size: usize) -> Result<Vec<Batch>> {
    if identifiers.is_empty() {
        return Err(MapperError::invalid_input("no identifiers to split"));
    }
    if batch_size < 1 {
        return Err(MapperError::invalid_input("batch_size must be at least 1"));
    }

    Ok(identifiers
        .chunks(batch_size)
        .enumerate()
        .map(|(index, chunk)| Batch::new(index, chunk.to_vec()))
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("P{:05}", i)).collect()
    }

    #[test]
    fn test_split_uneven() {
        let batches = split(&ids(1201), 500).unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 500);
        assert_eq!(batches[1].len(), 500);
        assert_eq!(batches[2].len(), 201);
        assert_eq!(batches[2].index(), 2);
        assert_eq!(batches[2].identifiers()[0], "P01000");
    }

    #[test]
    fn test_split_batch_size_equals_length() {
        let batches = split(&ids(7), 7).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].identifiers(), ids(7).as_slice());
    }

    #[test]
    fn test_split_batch_size_one() {
        let batches = split(&ids(4), 1).unwrap();
        assert_eq!(batches.len(), 4);
        assert!(batches.iter().enumerate().all(|(i, b)| b.index() == i));
    }

    #[test]
    fn test_split_rejects_bad_input() {
        assert!(matches!(split(&[], 10), Err(MapperError::InvalidInput(_))));
        assert!(matches!(
            split(&ids(3), 0),
            Err(MapperError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_joined() {
        let batch = Batch::new(0, vec!["P30542".into(), "Q16678".into()]);
        assert_eq!(batch.joined(), "P30542,Q16678");
    }

    proptest! {
        #[test]
        fn prop_split_covers_input_in_order(n in 1usize..400, b in 1usize..120) {
            let input = ids(n);
            let batches = split(&input, b).unwrap();

            prop_assert_eq!(batches.len(), n.div_ceil(b));
            prop_assert!(batches.iter().all(|batch| !batch.is_empty() && batch.len() <= b));

            let rejoined: Vec<String> = batches
                .iter()
                .flat_map(|batch| batch.identifiers().iter().cloned())
                .collect();
            prop_assert_eq!(rejoined, input);
        }
    }
}
