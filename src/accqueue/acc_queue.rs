//! Two-phase accumulator queue
//!
//! Leaves are accumulated into small subtrees of depth `sub_depth`. Each
//! completed subtree contributes one subroot. Merging happens in two steps:
//! [`AccQueue::merge_sub_roots`] folds the subroots into the smallest tree that
//! fits them (the subroot tree, SRT), and [`AccQueue::merge`] extends that root
//! with zero subtrees up to any requested depth.
//!
//! The carry order, zero padding and resumable subroot merging reproduce the
//! on-chain accumulator step for step, so both sides arrive at the same roots
//! for the same call sequence.

use std::collections::BTreeMap;

use ark_ff::Zero;

use super::config::AccQueueConfig;
use super::queue::{Queue, TopLevel};
use crate::crypto::hasher::{HashFunction, PoseidonHasher};
use crate::errors::AccQueueError;
use crate::tree::IncrementalQuinTree;
use crate::types::{FieldElement, MAX_DEPTH, SUPPORTED_HASH_LENGTHS};

type Result<T> = std::result::Result<T, AccQueueError>;

/// An accumulator queue mirroring the on-chain `AccQueue` contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccQueue {
    sub_depth: usize,
    hash_length: usize,
    zero_value: FieldElement,
    hasher: PoseidonHasher,
    /// `zeros[i]` is the root of an all-zero subtree of height `i`
    zeros: Vec<FieldElement>,
    sub_tree_capacity: u128,
    max_leaves: u128,
    num_leaves: u128,
    leaf_queue: Queue,
    sub_roots: Vec<FieldElement>,
    sub_root_queue: Queue,
    next_sr_index_to_queue: usize,
    small_srt_root: FieldElement,
    main_roots: BTreeMap<usize, FieldElement>,
    sub_trees_merged: bool,
}

impl AccQueue {
    /// Creates an empty queue
    ///
    /// # Arguments
    /// * `sub_depth` - Depth of each subtree, between 1 and [`MAX_DEPTH`]
    /// * `hash_length` - Leaves per node, 2 or 5
    /// * `zero_value` - Value of unfilled leaves
    ///
    /// # Errors
    /// * [`AccQueueError::UnsupportedHashLength`] unless `hash_length` is 2 or 5
    /// * [`AccQueueError::InvalidSubDepth`] if `sub_depth` is 0 or above [`MAX_DEPTH`]
    pub fn new(sub_depth: usize, hash_length: usize, zero_value: FieldElement) -> Result<Self> {
        if !SUPPORTED_HASH_LENGTHS.contains(&hash_length) {
            return Err(AccQueueError::UnsupportedHashLength(hash_length));
        }
        if sub_depth == 0 || sub_depth > MAX_DEPTH {
            return Err(AccQueueError::InvalidSubDepth { sub_depth, max_depth: MAX_DEPTH });
        }

        let hasher = PoseidonHasher::new(hash_length)?;
        let mut zeros = Vec::with_capacity(MAX_DEPTH + 1);
        zeros.push(zero_value);
        for level in 0..MAX_DEPTH {
            let children = vec![zeros[level]; hash_length];
            zeros.push(hasher.hash(&children)?);
        }

        let base = hash_length as u128;
        Ok(Self {
            sub_depth,
            hash_length,
            zero_value,
            hasher,
            zeros,
            sub_tree_capacity: base.pow(sub_depth as u32),
            max_leaves: base.pow(MAX_DEPTH as u32),
            num_leaves: 0,
            leaf_queue: Queue::new(sub_depth + 1, hash_length),
            sub_roots: Vec::new(),
            sub_root_queue: Queue::new(MAX_DEPTH + 1, hash_length),
            next_sr_index_to_queue: 0,
            small_srt_root: FieldElement::zero(),
            main_roots: BTreeMap::new(),
            sub_trees_merged: false,
        })
    }

    /// Creates an empty queue from a config
    pub fn from_config(config: &AccQueueConfig) -> Result<Self> {
        Self::new(config.sub_depth, config.hash_length, config.zero_value)
    }

    /// Returns the subtree depth
    pub fn sub_depth(&self) -> usize { self.sub_depth }

    /// Returns the number of leaves per node
    pub fn hash_length(&self) -> usize { self.hash_length }

    /// Returns the value of unfilled leaves
    pub fn zero_value(&self) -> FieldElement { self.zero_value }

    /// Returns the zero-subtree roots by height, `MAX_DEPTH + 1` entries
    pub fn zeros(&self) -> &[FieldElement] { &self.zeros }

    /// Returns the number of leaves a subtree holds, `hash_length^sub_depth`
    pub fn sub_tree_capacity(&self) -> u128 { self.sub_tree_capacity }

    /// Returns the number of leaves accounted for, including fill padding
    pub fn num_leaves(&self) -> u128 { self.num_leaves }

    /// Returns the index of the subtree currently being filled
    pub fn current_subtree_index(&self) -> usize { self.sub_roots.len() }

    /// Returns the root of a completed subtree
    pub fn sub_root(&self, index: usize) -> Option<FieldElement> { self.sub_roots.get(index).copied() }

    /// Returns the roots of every completed subtree
    pub fn sub_roots(&self) -> &[FieldElement] { &self.sub_roots }

    /// Returns the index of the next subroot `merge_sub_roots` will queue
    pub fn next_sr_index_to_queue(&self) -> usize { self.next_sr_index_to_queue }

    /// Returns the SRT root, or zero while subtrees are unmerged
    pub fn small_srt_root(&self) -> FieldElement { self.small_srt_root }

    /// Returns whether `merge_sub_roots` has completed since the last mutation
    pub fn sub_trees_merged(&self) -> bool { self.sub_trees_merged }

    /// Returns the main root computed for `depth`, if any
    pub fn root(&self, depth: usize) -> Option<FieldElement> { self.main_roots.get(&depth).copied() }

    /// Returns whether a main root has been computed for `depth`
    pub fn has_root(&self, depth: usize) -> bool { self.main_roots.contains_key(&depth) }

    /// Returns a fully independent copy of the queue
    pub fn copy(&self) -> Self { self.clone() }

    /// Hashes exactly `hash_length` values with the queue's hash function
    pub fn hash(&self, leaves: &[FieldElement]) -> Result<FieldElement> {
        Ok(self.hasher.hash(leaves)?)
    }

    /// Appends a leaf
    ///
    /// Completing a subtree records its root in the subroot list and starts a
    /// fresh subtree.
    ///
    /// # Returns
    /// The zero-based index of the leaf
    ///
    /// # Errors
    /// [`AccQueueError::QueueFull`] once `hash_length^MAX_DEPTH` leaves are held
    pub fn enqueue(&mut self, leaf: FieldElement) -> Result<u128> {
        if self.num_leaves >= self.max_leaves {
            return Err(AccQueueError::QueueFull);
        }

        let leaf_index = self.num_leaves;
        self.enqueue_op(leaf, 0)?;
        self.num_leaves += 1;
        self.invalidate_merge();

        if self.num_leaves % self.sub_tree_capacity == 0 {
            let sub_root = self.leaf_queue.get(self.sub_depth, 0);
            tracing::debug!(index = self.sub_roots.len(), "subtree complete");
            self.sub_roots.push(sub_root);
            self.leaf_queue.set(self.sub_depth, 0, FieldElement::zero());
        }

        Ok(leaf_index)
    }

    /// Closes the current subtree, padding its empty slots with zeros
    ///
    /// An empty current subtree contributes the all-zero subtree root. In both
    /// cases `num_leaves` snaps forward to the next subtree boundary.
    ///
    /// # Errors
    /// [`AccQueueError::QueueFull`] if the queue already holds `hash_length^MAX_DEPTH` leaves
    pub fn fill(&mut self) -> Result<()> {
        // max_leaves is a multiple of the subtree capacity, so a partial
        // subtree always fits
        if self.num_leaves >= self.max_leaves {
            return Err(AccQueueError::QueueFull);
        }

        let sub_root = if self.num_leaves % self.sub_tree_capacity == 0 {
            self.zeros[self.sub_depth]
        } else {
            self.fill_op()?;
            let sub_root = self.leaf_queue.get(self.sub_depth, 0);
            self.leaf_queue.reset();
            sub_root
        };

        self.invalidate_merge();
        self.sub_roots.push(sub_root);
        self.num_leaves = self.sub_roots.len() as u128 * self.sub_tree_capacity;
        tracing::debug!(index = self.sub_roots.len() - 1, num_leaves = %self.num_leaves, "subtree filled");
        Ok(())
    }

    /// Registers the root of a subtree built elsewhere
    ///
    /// # Errors
    /// [`AccQueueError::QueueFull`] if a whole subtree no longer fits
    pub fn insert_sub_tree(&mut self, sub_root: FieldElement) -> Result<()> {
        if self.num_leaves + self.sub_tree_capacity > self.max_leaves {
            return Err(AccQueueError::QueueFull);
        }

        self.invalidate_merge();
        self.sub_roots.push(sub_root);
        self.num_leaves += self.sub_tree_capacity;
        tracing::debug!(index = self.sub_roots.len() - 1, "subtree inserted");
        Ok(())
    }

    /// Merges the subroots into the subroot tree
    ///
    /// A partially filled subtree is closed with [`AccQueue::fill`] first. With
    /// `num_ops > 0` at most that many subroots are queued per call, and later
    /// calls resume where the previous one stopped; the merge completes on the
    /// call that queues the last subroot.
    ///
    /// # Errors
    /// * [`AccQueueError::SubTreesAlreadyMerged`] if nothing changed since the last merge
    /// * [`AccQueueError::NoLeaves`] if the queue is empty
    pub fn merge_sub_roots(&mut self, num_ops: usize) -> Result<()> {
        if self.sub_trees_merged {
            return Err(AccQueueError::SubTreesAlreadyMerged);
        }
        if self.num_leaves == 0 {
            return Err(AccQueueError::NoLeaves);
        }

        if self.num_leaves % self.sub_tree_capacity != 0 {
            self.fill()?;
        }

        let num_sub_roots = self.sub_roots.len();
        if num_sub_roots == 1 {
            self.small_srt_root = self.sub_roots[0];
            self.sub_trees_merged = true;
            tracing::debug!("single subtree merged");
            return Ok(());
        }

        let depth = self.srt_depth_above_subtrees(num_sub_roots);
        let mut queued = 0;
        while self.next_sr_index_to_queue < num_sub_roots {
            if num_ops != 0 && queued == num_ops {
                tracing::debug!(
                    next = self.next_sr_index_to_queue,
                    total = num_sub_roots,
                    "subroot merge paused"
                );
                return Ok(());
            }
            let sub_root = self.sub_roots[self.next_sr_index_to_queue];
            self.queue_sub_root(sub_root, depth)?;
            self.next_sr_index_to_queue += 1;
            queued += 1;
        }

        let zero_sub_root = self.zeros[self.sub_depth];
        let width = self.hash_length.pow(depth as u32);
        for _ in num_sub_roots..width {
            self.queue_sub_root(zero_sub_root, depth)?;
        }

        self.small_srt_root = self.sub_root_queue.get(depth, 0);
        self.sub_trees_merged = true;
        tracing::debug!(sub_roots = num_sub_roots, depth, "subroots merged");
        Ok(())
    }

    /// Computes the main root of a tree of `depth` from the subroot tree
    ///
    /// Calling it again with the same depth and no mutation in between yields
    /// the same root.
    ///
    /// # Returns
    /// The main root, which is also retrievable via [`AccQueue::root`]
    ///
    /// # Errors
    /// * [`AccQueueError::SubTreesNotMerged`] before `merge_sub_roots` completes
    /// * [`AccQueueError::ZeroDepth`] if `depth` is 0
    /// * [`AccQueueError::DepthExceedsMax`] if `depth` is above [`MAX_DEPTH`]
    /// * [`AccQueueError::DepthTooShallow`] if the subtrees do not fit in `depth`
    pub fn merge(&mut self, depth: usize) -> Result<FieldElement> {
        if !self.sub_trees_merged {
            return Err(AccQueueError::SubTreesNotMerged);
        }
        let srt_depth = self.check_merge_depth(depth)?;

        let mut root = self.small_srt_root;
        for level in srt_depth..depth {
            let mut children = vec![self.zeros[level]; self.hash_length];
            children[0] = root;
            root = self.hasher.hash(&children)?;
        }

        tracing::debug!(depth, srt_depth, "main root computed");
        self.main_roots.insert(depth, root);
        Ok(root)
    }

    /// Computes the main root of a tree of `depth` in one pass
    ///
    /// Fills the current subtree and inserts every subroot into a fresh tree
    /// of depth `depth - sub_depth`. Agrees with `merge_sub_roots` followed by
    /// `merge`, but does not touch the subroot tree state.
    ///
    /// # Errors
    /// * [`AccQueueError::NoLeaves`] if the queue is empty
    /// * [`AccQueueError::DepthExceedsMax`] if `depth` is above [`MAX_DEPTH`]
    /// * [`AccQueueError::DepthTooShallow`] if the subtrees do not fit in `depth`
    /// * [`AccQueueError::Tree`] if the tree of subroots cannot be indexed
    pub fn merge_direct(&mut self, depth: usize) -> Result<FieldElement> {
        if self.num_leaves == 0 {
            return Err(AccQueueError::NoLeaves);
        }
        self.check_merge_depth(depth)?;

        let mut tree = IncrementalQuinTree::new(
            depth - self.sub_depth,
            self.zeros[self.sub_depth],
            self.hash_length,
            self.hasher,
        )?;
        if self.num_leaves % self.sub_tree_capacity != 0 {
            self.fill()?;
        }
        for sub_root in &self.sub_roots {
            tree.insert(*sub_root)?;
        }

        let root = tree.root();
        self.main_roots.insert(depth, root);
        Ok(root)
    }

    /// Returns the depth of the smallest tree that holds every leaf
    ///
    /// Never less than `sub_depth`.
    pub fn calc_srt_depth(&self) -> usize {
        let base = self.hash_length as u128;
        let mut depth = self.sub_depth;
        while base.pow(depth as u32) < self.num_leaves {
            depth += 1;
        }
        depth
    }

    fn check_merge_depth(&self, depth: usize) -> Result<usize> {
        if depth == 0 {
            return Err(AccQueueError::ZeroDepth);
        }
        if depth > MAX_DEPTH {
            return Err(AccQueueError::DepthExceedsMax { depth, max_depth: MAX_DEPTH });
        }
        let srt_depth = self.calc_srt_depth();
        if depth < srt_depth {
            return Err(AccQueueError::DepthTooShallow { depth, srt_depth });
        }
        Ok(srt_depth)
    }

    /// Smallest `d >= 1` with `hash_length^d >= num_sub_roots`
    fn srt_depth_above_subtrees(&self, num_sub_roots: usize) -> usize {
        let mut depth = 1;
        while self.hash_length.pow(depth as u32) < num_sub_roots {
            depth += 1;
        }
        depth
    }

    fn invalidate_merge(&mut self) {
        self.sub_trees_merged = false;
        self.small_srt_root = FieldElement::zero();
    }

    fn enqueue_op(&mut self, leaf: FieldElement, level: usize) -> Result<()> {
        self.leaf_queue.insert(leaf, level, self.sub_depth, TopLevel::Pinned, &self.hasher)?;
        Ok(())
    }

    /// Pads every partial level below the subtree root and carries the digests up
    fn fill_op(&mut self) -> Result<()> {
        for level in 0..self.sub_depth {
            let zero = self.zeros[level];
            if let Some(digest) = self.leaf_queue.pad_and_hash(level, zero, &self.hasher)? {
                self.enqueue_op(digest, level + 1)?;
            }
        }
        Ok(())
    }

    fn queue_sub_root(&mut self, sub_root: FieldElement, depth: usize) -> Result<()> {
        self.sub_root_queue.insert(sub_root, 0, depth, TopLevel::Advancing, &self.hasher)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::poseidon::hash_left_right;
    use crate::errors::CryptoError;

    fn fe(n: u64) -> FieldElement { FieldElement::from(n) }

    fn binary(sub_depth: usize) -> AccQueue { AccQueue::new(sub_depth, 2, fe(0)).expect("valid queue") }

    fn quinary(sub_depth: usize) -> AccQueue { AccQueue::new(sub_depth, 5, fe(0)).expect("valid queue") }

    fn tree_root(depth: usize, arity: usize, zero: FieldElement, leaves: &[FieldElement]) -> FieldElement {
        let mut tree = IncrementalQuinTree::poseidon(depth, zero, arity).expect("valid tree");
        for leaf in leaves {
            tree.insert(*leaf).expect("insert should succeed");
        }
        tree.root()
    }

    #[test]
    fn test_new_validates() {
        assert_eq!(AccQueue::new(2, 3, fe(0)), Err(AccQueueError::UnsupportedHashLength(3)));
        assert_eq!(
            AccQueue::new(0, 2, fe(0)),
            Err(AccQueueError::InvalidSubDepth { sub_depth: 0, max_depth: 32 })
        );
        assert!(AccQueue::new(33, 5, fe(0)).is_err());
        let queue = AccQueue::from_config(&AccQueueConfig::message_tree(2)).expect("valid config");
        assert_eq!(queue.hash_length(), 5);
        assert_eq!(queue.zeros().len(), MAX_DEPTH + 1);
    }

    #[test]
    fn test_zeros() {
        let queue = binary(2);
        let z1 = hash_left_right(fe(0), fe(0)).expect("arity 2");
        assert_eq!(queue.zeros()[0], fe(0));
        assert_eq!(queue.zeros()[1], z1);
        assert_eq!(queue.zeros()[2], hash_left_right(z1, z1).expect("arity 2"));
    }

    #[test]
    fn test_binary_single_subtree() {
        let mut queue = binary(2);
        let leaves: Vec<_> = (1..=4).map(fe).collect();
        for (i, leaf) in leaves.iter().enumerate() {
            assert_eq!(queue.enqueue(*leaf).expect("enqueue should succeed"), i as u128);
        }

        assert_eq!(queue.current_subtree_index(), 1);
        assert_eq!(queue.sub_root(0), Some(tree_root(2, 2, fe(0), &leaves)));

        queue.merge_sub_roots(0).expect("merge should succeed");
        assert_eq!(queue.small_srt_root(), queue.sub_roots()[0]);

        let root = queue.merge(3).expect("merge should succeed");
        let expected = hash_left_right(queue.sub_roots()[0], queue.zeros()[2]).expect("arity 2");
        assert_eq!(root, expected);
        assert_eq!(queue.root(3), Some(expected));
        assert!(queue.has_root(3));
        assert!(!queue.has_root(4));
    }

    #[test]
    fn test_quinary_many_subtrees() {
        let mut queue = quinary(2);
        let leaf = fe(123);
        let mut all_leaves = Vec::new();
        for _ in 0..26 {
            for _ in 0..25 {
                queue.enqueue(leaf).expect("enqueue should succeed");
                all_leaves.push(leaf);
            }
        }
        assert_eq!(queue.current_subtree_index(), 26);

        queue.merge_sub_roots(0).expect("merge should succeed");
        let root = queue.merge(6).expect("merge should succeed");

        let direct = tree_root(4, 5, queue.zeros()[2], queue.sub_roots());
        assert_eq!(root, direct);
        assert_eq!(root, tree_root(6, 5, fe(0), &all_leaves));
    }

    #[test]
    fn test_partial_subtree_is_filled() {
        let mut queue = binary(2);
        let leaves: Vec<_> = (1..=6).map(fe).collect();
        for leaf in &leaves {
            queue.enqueue(*leaf).expect("enqueue should succeed");
        }
        assert_eq!(queue.num_leaves(), 6);

        queue.merge_sub_roots(0).expect("merge should succeed");
        assert_eq!(queue.num_leaves(), 8);
        assert_eq!(queue.calc_srt_depth(), 3);

        let root = queue.merge(5).expect("merge should succeed");
        assert_eq!(root, tree_root(5, 2, fe(0), &leaves));
    }

    #[test]
    fn test_fill_empty_subtree() {
        let mut queue = quinary(1);
        queue.fill().expect("fill should succeed");
        assert_eq!(queue.sub_roots(), &[queue.zeros()[1]]);
        assert_eq!(queue.num_leaves(), 5);

        queue.enqueue(fe(3)).expect("enqueue should succeed");
        queue.fill().expect("fill should succeed");
        assert_eq!(queue.num_leaves(), 10);
        assert_eq!(queue.sub_root(1), Some(tree_root(1, 5, fe(0), &[fe(3)])));
    }

    #[test]
    fn test_insert_sub_tree() {
        let mut queue = binary(2);
        let mut reference = binary(2);
        for i in 0..4 {
            reference.enqueue(fe(i)).expect("enqueue should succeed");
        }
        queue.insert_sub_tree(reference.sub_roots()[0]).expect("insert should succeed");
        queue.insert_sub_tree(reference.sub_roots()[0]).expect("insert should succeed");
        for i in 0..4 {
            reference.enqueue(fe(i)).expect("enqueue should succeed");
        }
        assert_eq!(queue.num_leaves(), 8);

        queue.merge_sub_roots(0).expect("merge should succeed");
        reference.merge_sub_roots(0).expect("merge should succeed");
        assert_eq!(queue.merge(4), reference.merge(4));
    }

    #[test]
    fn test_resumable_merge() {
        let mut one_shot = quinary(1);
        for i in 0..42 {
            one_shot.enqueue(fe(i)).expect("enqueue should succeed");
        }
        let mut stepped = one_shot.copy();

        one_shot.merge_sub_roots(0).expect("merge should succeed");

        let mut calls = 0;
        while !stepped.sub_trees_merged() {
            stepped.merge_sub_roots(2).expect("merge should succeed");
            calls += 1;
        }
        // 9 subroots, two per call
        assert_eq!(calls, 5);
        assert_eq!(stepped.next_sr_index_to_queue(), 9);
        assert_eq!(stepped.small_srt_root(), one_shot.small_srt_root());
        assert_eq!(stepped.merge(4), one_shot.merge(4));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut queue = quinary(2);
        for i in 0..30 {
            queue.enqueue(fe(i)).expect("enqueue should succeed");
        }
        queue.merge_sub_roots(0).expect("merge should succeed");
        let first = queue.merge(10).expect("merge should succeed");
        let second = queue.merge(10).expect("merge should succeed");
        assert_eq!(first, second);
    }

    #[test]
    fn test_merge_direct_agrees() {
        for count in [1u64, 7, 25, 26, 130] {
            let mut queue = quinary(2);
            for i in 0..count {
                queue.enqueue(fe(i + 1)).expect("enqueue should succeed");
            }
            let mut direct = queue.copy();

            queue.merge_sub_roots(0).expect("merge should succeed");
            let two_phase = queue.merge(8).expect("merge should succeed");
            let one_pass = direct.merge_direct(8).expect("merge should succeed");
            assert_eq!(two_phase, one_pass, "{count} leaves");
        }
    }

    #[test]
    fn test_merge_errors() {
        let mut queue = binary(2);
        assert_eq!(queue.merge_sub_roots(0), Err(AccQueueError::NoLeaves));
        assert_eq!(queue.merge_direct(4), Err(AccQueueError::NoLeaves));

        for i in 0..9 {
            queue.enqueue(fe(i)).expect("enqueue should succeed");
        }
        assert_eq!(queue.merge(5), Err(AccQueueError::SubTreesNotMerged));

        queue.merge_sub_roots(0).expect("merge should succeed");
        assert_eq!(queue.merge_sub_roots(0), Err(AccQueueError::SubTreesAlreadyMerged));
        assert_eq!(queue.merge(0), Err(AccQueueError::ZeroDepth));
        assert_eq!(queue.merge(3), Err(AccQueueError::DepthTooShallow { depth: 3, srt_depth: 4 }));
        assert_eq!(
            queue.merge(33),
            Err(AccQueueError::DepthExceedsMax { depth: 33, max_depth: 32 })
        );
        assert!(queue.merge(4).is_ok());
    }

    #[test]
    fn test_enqueue_invalidates_merge() {
        let mut queue = binary(1);
        queue.enqueue(fe(1)).expect("enqueue should succeed");
        queue.merge_sub_roots(0).expect("merge should succeed");
        assert!(queue.sub_trees_merged());
        assert_ne!(queue.small_srt_root(), fe(0));

        queue.enqueue(fe(2)).expect("enqueue should succeed");
        assert!(!queue.sub_trees_merged());
        assert_eq!(queue.small_srt_root(), fe(0));
    }

    #[test]
    fn test_queue_full() {
        let mut queue = binary(2);
        queue.num_leaves = 1u128 << 32;
        assert_eq!(queue.enqueue(fe(1)), Err(AccQueueError::QueueFull));
        assert_eq!(queue.insert_sub_tree(fe(1)), Err(AccQueueError::QueueFull));
        assert_eq!(queue.fill(), Err(AccQueueError::QueueFull));
        assert_eq!(queue.num_leaves(), 1u128 << 32);
        assert!(queue.sub_roots().is_empty());

        queue.num_leaves = (1u128 << 32) - 1;
        assert_eq!(queue.enqueue(fe(1)), Ok((1u128 << 32) - 1));
    }

    #[test]
    fn test_hash_checks_length() {
        let queue = quinary(1);
        assert_eq!(
            queue.hash(&[fe(1), fe(2)]),
            Err(AccQueueError::Crypto(CryptoError::InvalidArity { expected: 5, actual: 2 }))
        );
        assert!(queue.hash(&[fe(1); 5]).is_ok());
    }

    #[test]
    fn test_copy_is_independent() {
        let mut queue = binary(2);
        for i in 0..5 {
            queue.enqueue(fe(i)).expect("enqueue should succeed");
        }
        let snapshot = queue.copy();
        let mut copy = queue.copy();
        copy.enqueue(fe(9)).expect("enqueue should succeed");
        copy.merge_sub_roots(0).expect("merge should succeed");
        copy.merge(3).expect("merge should succeed");

        assert_eq!(queue, snapshot);
        assert_eq!(queue.num_leaves(), 5);
        assert!(!queue.has_root(3));
    }
}
