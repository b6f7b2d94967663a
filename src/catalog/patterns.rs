//! Pattern catalog: directed adjacency facts with observed frequencies
//!
//! A pattern `(a, b, offset)` asserts that module `b` may sit at `offset` from
//! module `a`. Patterns keep their insertion order so that pattern indices,
//! and therefore seeded solves, are reproducible.

use std::collections::HashMap;

use crate::catalog::modules::{ModuleId, ModuleRegistry};
use crate::io::error::{Result, TilewaveError};
use crate::spatial::neighborhood::{NEIGHBORHOOD_SIZE, Offset};

/// Key identifying a pattern regardless of its frequency
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternKey {
    /// Module at the origin cell
    pub point_a: ModuleId,
    /// Module at the offset cell
    pub point_b: ModuleId,
    /// Position of `point_b` relative to `point_a`
    pub offset: Offset,
}

impl PatternKey {
    /// Create a pattern key
    pub const fn new(point_a: ModuleId, point_b: ModuleId, offset: Offset) -> Self {
        Self {
            point_a,
            point_b,
            offset,
        }
    }
}

/// A directed adjacency fact with its observation count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pattern {
    /// Module at the origin cell
    pub point_a: ModuleId,
    /// Module at the offset cell
    pub point_b: ModuleId,
    /// Position of `point_b` relative to `point_a`
    pub offset: Offset,
    /// How many times this exact triple was observed
    pub frequency: usize,
}

impl Pattern {
    /// Key of this pattern
    pub const fn key(&self) -> PatternKey {
        PatternKey::new(self.point_a, self.point_b, self.offset)
    }
}

/// Ordered set of patterns with a per-direction index
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternCatalog {
    patterns: Vec<Pattern>,
    index: HashMap<PatternKey, usize>,
    by_direction: [Vec<usize>; NEIGHBORHOOD_SIZE],
}

impl PatternCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of a pattern
    ///
    /// Returns whether the key was newly inserted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the offset is not one of the sampled
    /// directions
    pub fn record(&mut self, key: PatternKey, count: usize) -> Result<bool> {
        if let Some(&position) = self.index.get(&key) {
            if let Some(pattern) = self.patterns.get_mut(position) {
                pattern.frequency += count;
            }
            return Ok(false);
        }

        let direction = key.offset.direction_index().ok_or_else(|| {
            crate::io::error::invalid_parameter(
                "offset",
                &key.offset,
                &"not in the 18-direction neighbourhood",
            )
        })?;

        let position = self.patterns.len();
        self.patterns.push(Pattern {
            point_a: key.point_a,
            point_b: key.point_b,
            offset: key.offset,
            frequency: count,
        });
        self.index.insert(key, position);
        if let Some(bucket) = self.by_direction.get_mut(direction) {
            bucket.push(position);
        }
        Ok(true)
    }

    /// Sum another catalog into this one
    ///
    /// # Errors
    ///
    /// Propagates offset validation failures from [`Self::record`]
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        for pattern in &other.patterns {
            self.record(pattern.key(), pattern.frequency)?;
        }
        Ok(())
    }

    /// Number of distinct patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the catalog holds no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Pattern at a catalog index
    pub fn pattern(&self, index: usize) -> Option<&Pattern> {
        self.patterns.get(index)
    }

    /// Catalog index of a key
    pub fn position(&self, key: &PatternKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Observed frequency of a key
    ///
    /// # Errors
    ///
    /// Returns `UnknownPattern` if the key was never recorded
    pub fn frequency_of(&self, key: &PatternKey) -> Result<usize> {
        self.position(key)
            .and_then(|position| self.patterns.get(position))
            .map(|pattern| pattern.frequency)
            .ok_or(TilewaveError::UnknownPattern {
                point_a: key.point_a,
                point_b: key.point_b,
                offset: key.offset,
                position: None,
            })
    }

    /// Indices of every pattern whose offset is `offset`
    pub fn with_offset(&self, offset: Offset) -> &[usize] {
        offset
            .direction_index()
            .and_then(|direction| self.by_direction.get(direction))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate over patterns in index order
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// Total number of observations across all patterns
    pub fn total_observations(&self) -> usize {
        self.patterns.iter().map(|pattern| pattern.frequency).sum()
    }

    /// Confirm every referenced module exists in `registry`
    ///
    /// # Errors
    ///
    /// Returns `UnknownModule` for the first pattern that references an
    /// unregistered id
    pub fn validate_against(&self, registry: &ModuleRegistry) -> Result<()> {
        for pattern in &self.patterns {
            for id in [pattern.point_a, pattern.point_b] {
                if !registry.contains(id) {
                    return Err(TilewaveError::UnknownModule {
                        id,
                        registered: registry.len(),
                    });
                }
            }
        }
        Ok(())
    }
}
