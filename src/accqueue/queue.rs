//! Per-level carry buffers
//!
//! A [`Queue`] is a base-`hash_length` counter whose digits are field
//! elements. Each level buffers up to `hash_length - 1` values; the value that
//! would complete a level is hashed together with the buffered ones and the
//! digest is carried to the level above.

use ark_ff::Zero;

use crate::crypto::hasher::HashFunction;
use crate::errors::CryptoError;
use crate::types::FieldElement;

/// Whether the top level's slot counter advances on insertion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TopLevel {
    /// The top level holds a single value that is overwritten in place
    Pinned,
    /// The top level buffers like every other level
    Advancing,
}

/// Partial-node buffers for each tree level
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Queue {
    levels: Vec<Vec<FieldElement>>,
    indices: Vec<usize>,
}

impl Queue {
    /// Creates a queue of `num_levels` empty levels with `hash_length` slots each
    pub(crate) fn new(num_levels: usize, hash_length: usize) -> Self {
        Self {
            levels: vec![vec![FieldElement::zero(); hash_length]; num_levels],
            indices: vec![0; num_levels],
        }
    }

    /// Returns the number of values buffered at `level`
    pub(crate) fn index(&self, level: usize) -> usize { self.indices[level] }

    /// Returns the value in slot `position` of `level`
    pub(crate) fn get(&self, level: usize, position: usize) -> FieldElement {
        self.levels[level][position]
    }

    /// Overwrites slot `position` of `level`
    pub(crate) fn set(&mut self, level: usize, position: usize, value: FieldElement) {
        self.levels[level][position] = value;
    }

    /// Inserts `value` at `level`, carrying completed levels upwards
    ///
    /// Values carried past `top` are discarded.
    pub(crate) fn insert<H: HashFunction>(
        &mut self,
        value: FieldElement,
        level: usize,
        top: usize,
        top_level: TopLevel,
        hasher: &H,
    ) -> Result<(), CryptoError> {
        let last_slot = hasher.arity() - 1;
        let mut value = value;

        for level in level..=top {
            let n = self.indices[level];
            if n != last_slot {
                self.levels[level][n] = value;
                if level != top || top_level == TopLevel::Advancing {
                    self.indices[level] += 1;
                }
                return Ok(());
            }

            let mut children = self.levels[level][..n].to_vec();
            children.push(value);
            value = hasher.hash(&children)?;
            self.reset_level(level);
            tracing::trace!(level, "carry");
        }

        Ok(())
    }

    /// Pads a partially filled level with `zero`, hashes it and clears it
    ///
    /// # Returns
    /// The digest, or `None` if the level was empty
    pub(crate) fn pad_and_hash<H: HashFunction>(
        &mut self,
        level: usize,
        zero: FieldElement,
        hasher: &H,
    ) -> Result<Option<FieldElement>, CryptoError> {
        let n = self.indices[level];
        if n == 0 {
            return Ok(None);
        }

        let mut children = self.levels[level][..n].to_vec();
        children.resize(hasher.arity(), zero);
        let digest = hasher.hash(&children)?;
        self.reset_level(level);
        Ok(Some(digest))
    }

    /// Clears every slot of `level`
    pub(crate) fn reset_level(&mut self, level: usize) {
        self.levels[level].fill(FieldElement::zero());
        self.indices[level] = 0;
    }

    /// Clears every level
    pub(crate) fn reset(&mut self) {
        for level in 0..self.levels.len() {
            self.reset_level(level);
        }
    }
}
