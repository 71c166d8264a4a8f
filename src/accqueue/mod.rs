//! Accumulator queue
//!
//! Batches leaves into fixed-size subtrees and merges the subtree roots into
//! main roots of any depth, matching the on-chain accumulator root for root.

mod acc_queue;
mod config;
mod queue;

pub use acc_queue::AccQueue;
pub use config::{
    AccQueueConfig, DEFAULT_MESSAGE_TREE_SUB_DEPTH, QUINARY_HASH_LENGTH, STATE_TREE_SUB_DEPTH,
};
