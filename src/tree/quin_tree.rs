//! Incremental n-ary Merkle tree
//!
//! Leaves are appended left to right. Every ancestor of a changed leaf is
//! recomputed by hashing its full set of `arity` children, so a tree of arity
//! 5 is a true quinary tree rather than a binary tree with wide leaves.
//!
//! # Node numbering
//!
//! Nodes are numbered level by level from the bottom: leaves occupy
//! `0..capacity`, the next level follows contiguously, and the root is the
//! last node. Only nodes that have been written are stored; every other node
//! reads as the root of an all-zero subtree of its height.

use std::collections::HashMap;

use crate::crypto::hasher::{HashFunction, PoseidonHasher};
use crate::errors::TreeError;
use crate::tree::proof::{verify_merkle_proof, MerkleProof};
use crate::types::FieldElement;

/// An incremental Merkle tree of configurable arity and depth
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncrementalQuinTree<H: HashFunction = PoseidonHasher> {
    depth: usize,
    arity: usize,
    zero_value: FieldElement,
    hasher: H,
    /// `zeros[i]` is the root of an all-zero subtree of height `i`; `zeros[depth]` is the empty root
    zeros: Vec<FieldElement>,
    /// First node index of each level, plus the total node count at `[depth + 1]`
    level_offsets: Vec<u64>,
    nodes: HashMap<u64, FieldElement>,
    root: FieldElement,
    next_index: u64,
    capacity: u64,
}

impl IncrementalQuinTree<PoseidonHasher> {
    /// Creates a tree hashed with circom Poseidon of the tree's arity
    ///
    /// # Errors
    /// As [`IncrementalQuinTree::new`], plus [`TreeError::Crypto`] if no
    /// Poseidon instance of that arity exists
    pub fn poseidon(depth: usize, zero_value: FieldElement, arity: usize) -> Result<Self, TreeError> {
        if arity < 2 {
            return Err(TreeError::InvalidArity { arity, hash_arity: arity });
        }
        Self::new(depth, zero_value, arity, PoseidonHasher::new(arity)?)
    }
}

impl<H: HashFunction> IncrementalQuinTree<H> {
    /// Creates an empty tree
    ///
    /// # Arguments
    /// * `depth` - Number of levels above the leaves; depth 0 holds a single leaf
    /// * `zero_value` - Value of every unfilled leaf
    /// * `arity` - Children per node; must equal `hasher.arity()` and be at least 2
    /// * `hasher` - Hash function combining `arity` children into a parent
    ///
    /// # Errors
    /// * [`TreeError::InvalidArity`] if the arity is below 2 or differs from the hasher's
    /// * [`TreeError::DepthTooLarge`] if the node count does not fit in a `u64`
    pub fn new(
        depth: usize,
        zero_value: FieldElement,
        arity: usize,
        hasher: H,
    ) -> Result<Self, TreeError> {
        if arity < 2 || arity != hasher.arity() {
            return Err(TreeError::InvalidArity { arity, hash_arity: hasher.arity() });
        }

        let too_large = || TreeError::DepthTooLarge { depth, arity };
        let arity_u64 = u64::try_from(arity).map_err(|_| too_large())?;
        let depth_u32 = u32::try_from(depth).map_err(|_| too_large())?;
        let capacity = arity_u64.checked_pow(depth_u32).ok_or_else(too_large)?;

        let mut level_offsets = Vec::with_capacity(depth + 2);
        let mut offset = 0u64;
        let mut width = capacity;
        for _ in 0..=depth {
            level_offsets.push(offset);
            offset = offset.checked_add(width).ok_or_else(too_large)?;
            width /= arity_u64;
        }
        level_offsets.push(offset);

        let mut zeros = Vec::with_capacity(depth + 1);
        zeros.push(zero_value);
        for level in 0..depth {
            let children = vec![zeros[level]; arity];
            zeros.push(hasher.hash(&children)?);
        }
        let root = zeros[depth];

        Ok(Self {
            depth,
            arity,
            zero_value,
            hasher,
            zeros,
            level_offsets,
            nodes: HashMap::new(),
            root,
            next_index: 0,
            capacity,
        })
    }

    /// Returns the current root
    pub fn root(&self) -> FieldElement { self.root }

    /// Returns the number of levels above the leaves
    pub fn depth(&self) -> usize { self.depth }

    /// Returns the number of children per node
    pub fn arity(&self) -> usize { self.arity }

    /// Returns the number of leaf slots, `arity^depth`
    pub fn capacity(&self) -> u64 { self.capacity }

    /// Returns the index the next inserted leaf will occupy
    pub fn next_index(&self) -> u64 { self.next_index }

    /// Returns the value of unfilled leaves
    pub fn zero_value(&self) -> FieldElement { self.zero_value }

    /// Returns the zero-subtree roots by height, `depth + 1` entries
    pub fn zeros(&self) -> &[FieldElement] { &self.zeros }

    /// Returns the tree's hash function
    pub fn hasher(&self) -> &H { &self.hasher }

    /// Returns a fully independent copy of the tree
    pub fn copy(&self) -> Self
    where
        H: Clone,
    {
        self.clone()
    }

    /// Appends a leaf
    ///
    /// # Returns
    /// The index the leaf was written to
    ///
    /// # Errors
    /// [`TreeError::TreeFull`] if every slot is occupied
    pub fn insert(&mut self, leaf: FieldElement) -> Result<u64, TreeError> {
        if self.next_index >= self.capacity {
            return Err(TreeError::TreeFull { capacity: self.capacity });
        }
        let index = self.next_index;
        self.set_leaf(index, leaf)?;
        self.next_index += 1;
        Ok(index)
    }

    /// Overwrites a previously inserted leaf
    ///
    /// # Errors
    /// [`TreeError::IndexOutOfBounds`] unless `index < next_index`
    pub fn update(&mut self, index: u64, leaf: FieldElement) -> Result<(), TreeError> {
        if index >= self.next_index {
            return Err(TreeError::IndexOutOfBounds { index, limit: self.next_index });
        }
        self.set_leaf(index, leaf)
    }

    /// Returns a node by its flat index, falling back to its level's zero value
    ///
    /// # Errors
    /// [`TreeError::IndexOutOfBounds`] if the index is past the root
    pub fn get_node(&self, index: u64) -> Result<FieldElement, TreeError> {
        let num_nodes = self.level_offsets[self.depth + 1];
        if index >= num_nodes {
            return Err(TreeError::IndexOutOfBounds { index, limit: num_nodes });
        }
        let level = self.level_offsets.partition_point(|&offset| offset <= index) - 1;
        Ok(self.node_at(level, index - self.level_offsets[level]))
    }

    /// Returns the leaf at `index`, or the zero value if it was never written
    ///
    /// # Errors
    /// [`TreeError::IndexOutOfBounds`] unless `index < capacity`
    pub fn get_leaf(&self, index: u64) -> Result<FieldElement, TreeError> {
        if index >= self.capacity {
            return Err(TreeError::IndexOutOfBounds { index, limit: self.capacity });
        }
        Ok(self.node_at(0, index))
    }

    /// Generates an inclusion proof for the leaf at `index`
    ///
    /// Unfilled slots may be proven too; their leaf is the zero value.
    ///
    /// # Errors
    /// [`TreeError::IndexOutOfBounds`] unless `index < capacity`
    pub fn gen_proof(&self, index: u64) -> Result<MerkleProof, TreeError> {
        let leaf = self.get_leaf(index)?;
        let arity = self.arity as u64;

        let mut path_elements = Vec::with_capacity(self.depth);
        let mut path_indices = Vec::with_capacity(self.depth);
        let mut position = index;
        for level in 0..self.depth {
            let offset = position % arity;
            let first = position - offset;
            let siblings = (first..first + arity)
                .filter(|&p| p != position)
                .map(|p| self.node_at(level, p))
                .collect();
            path_elements.push(siblings);
            path_indices.push(offset as usize);
            position /= arity;
        }

        Ok(MerkleProof { leaf, path_elements, path_indices, root: self.root })
    }

    /// Verifies a proof against this tree's hash function
    ///
    /// The proof's own root is used, so a proof from another tree with the same
    /// hash function verifies too.
    pub fn verify_proof(proof: &MerkleProof, hasher: &H) -> Result<bool, TreeError> {
        verify_merkle_proof(proof, hasher)
    }

    /// Generates a proof that the leaves `start_index..end_index` form a subtree
    ///
    /// The returned proof's leaf is the root of that subtree and its path
    /// covers only the levels above it.
    ///
    /// # Errors
    /// [`TreeError::InvalidSubrootRange`] unless the range is non-empty, its
    /// size is a power of the arity below the capacity, it starts on a
    /// multiple of its size and it lies inside the tree
    pub fn gen_subroot_proof(
        &self,
        start_index: u64,
        end_index: u64,
    ) -> Result<MerkleProof, TreeError>
    where
        H: Clone,
    {
        let invalid = |reason: &str| TreeError::InvalidSubrootRange {
            start: start_index,
            end: end_index,
            reason: reason.to_string(),
        };

        if end_index <= start_index {
            return Err(invalid("end index must be greater than start index"));
        }
        let size = end_index - start_index;
        let sub_depth = exact_log(size, self.arity as u64)
            .filter(|&d| d >= 1)
            .ok_or_else(|| invalid("range size must be a positive power of the arity"))?;
        if size >= self.capacity {
            return Err(invalid("range size must be below the tree capacity"));
        }
        if start_index % size != 0 {
            return Err(invalid("start index must be a multiple of the range size"));
        }
        if end_index > self.capacity {
            return Err(invalid("range must lie inside the tree"));
        }

        let mut subtree =
            IncrementalQuinTree::new(sub_depth, self.zero_value, self.arity, self.hasher.clone())?;
        for index in start_index..end_index {
            subtree.insert(self.node_at(0, index))?;
        }

        let mut proof = self.gen_proof(start_index)?;
        proof.path_elements = proof.path_elements.split_off(sub_depth);
        proof.path_indices = proof.path_indices.split_off(sub_depth);
        proof.leaf = subtree.root();
        Ok(proof)
    }

    fn node_at(&self, level: usize, position: u64) -> FieldElement {
        self.nodes
            .get(&(self.level_offsets[level] + position))
            .copied()
            .unwrap_or(self.zeros[level])
    }

    /// Writes a leaf and rehashes its ancestors
    ///
    /// All new values are computed before any is stored, so a hashing failure
    /// leaves the tree untouched.
    fn set_leaf(&mut self, index: u64, leaf: FieldElement) -> Result<(), TreeError> {
        let arity = self.arity as u64;
        let mut updates = Vec::with_capacity(self.depth + 1);
        let mut children = Vec::with_capacity(self.arity);

        let mut position = index;
        let mut current = leaf;
        updates.push((self.level_offsets[0] + position, current));
        for level in 0..self.depth {
            let first = position - position % arity;
            children.clear();
            for p in first..first + arity {
                children.push(if p == position { current } else { self.node_at(level, p) });
            }
            current = self.hasher.hash(&children)?;
            position /= arity;
            updates.push((self.level_offsets[level + 1] + position, current));
        }

        tracing::trace!(index, depth = self.depth, "quin tree leaf written");
        self.nodes.extend(updates);
        self.root = current;
        Ok(())
    }
}

/// Returns `d` such that `base^d == value`, if one exists
fn exact_log(mut value: u64, base: u64) -> Option<usize> {
    let mut exponent = 0;
    while value > 1 {
        if value % base != 0 {
            return None;
        }
        value /= base;
        exponent += 1;
    }
    (value == 1).then_some(exponent)
}
