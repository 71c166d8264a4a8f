//! Accumulator queue parameters

use serde::{Deserialize, Serialize};

use crate::types::{FieldElement, NOTHING_UP_MY_SLEEVE};

/// Leaves per node of the protocol's quinary queues
pub const QUINARY_HASH_LENGTH: usize = 5;

/// Subtree depth of the signup queue
pub const STATE_TREE_SUB_DEPTH: usize = 2;

/// Subtree depth of the message queue unless a poll chooses another
pub const DEFAULT_MESSAGE_TREE_SUB_DEPTH: usize = 2;

/// Construction parameters of an [`AccQueue`](super::AccQueue)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccQueueConfig {
    /// Depth of each subtree batched before merging
    pub sub_depth: usize,
    /// Leaves per node, 2 or 5
    pub hash_length: usize,
    /// Value of unfilled leaves
    #[serde(with = "crate::utils::serde_field")]
    pub zero_value: FieldElement,
}

impl AccQueueConfig {
    /// Creates a config from its parts
    pub fn new(sub_depth: usize, hash_length: usize, zero_value: FieldElement) -> Self {
        Self { sub_depth, hash_length, zero_value }
    }

    /// Signup queue: quinary, subtree depth 2, unfilled leaves are the blank state leaf hash
    pub fn state_tree(blank_state_leaf_hash: FieldElement) -> Self {
        Self::new(STATE_TREE_SUB_DEPTH, QUINARY_HASH_LENGTH, blank_state_leaf_hash)
    }

    /// Message queue: quinary, unfilled leaves are [`NOTHING_UP_MY_SLEEVE`]
    pub fn message_tree(sub_depth: usize) -> Self {
        Self::new(sub_depth, QUINARY_HASH_LENGTH, *NOTHING_UP_MY_SLEEVE)
    }
}

impl Default for AccQueueConfig {
    fn default() -> Self { Self::message_tree(DEFAULT_MESSAGE_TREE_SUB_DEPTH) }
}
