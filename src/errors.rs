//! Error types for the accumulator library
//!
//! Every failure in this crate is a precondition violation. Each component
//! has its own error enum so callers and tests can assert on the exact cause,
//! and the top-level [`Error`] wraps them transparently.

use thiserror::Error;

/// The main error type for the accumulator library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Field, hash, key, signature and cipher errors
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Incremental Merkle tree errors
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Accumulator queue errors
    #[error(transparent)]
    AccQueue(#[from] AccQueueError),
}

/// Errors raised by the field and hash primitives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CryptoError {
    /// A fixed-arity hash received the wrong number of inputs
    #[error("Invalid hash input length: expected {expected}, got {actual}")]
    InvalidArity {
        /// The arity of the hash function
        expected: usize,
        /// The number of inputs supplied
        actual: usize,
    },

    /// A padding hash received more inputs than it can absorb
    #[error("Too many hash inputs: maximum {max}, got {actual}")]
    TooManyInputs {
        /// The maximum number of inputs
        max: usize,
        /// The number of inputs supplied
        actual: usize,
    },

    /// No Poseidon parameters exist for the requested state width
    #[error("Unsupported Poseidon state width: {0}")]
    UnsupportedWidth(usize),

    /// An integer is not a canonical field element
    #[error("Value is not below the field modulus: {0}")]
    NotInField(String),

    /// A string could not be parsed as an integer
    #[error("Malformed integer string: {0}")]
    MalformedInteger(String),

    /// A ciphertext is malformed or fails authentication
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// A point is not on the Baby Jubjub curve
    #[error("Point is not on the Baby Jubjub curve")]
    InvalidPoint,
}

/// Errors raised by the incremental Merkle tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeError {
    /// Tree arity must be at least 2 and match the hash function
    #[error("Invalid arity {arity}: hash function absorbs {hash_arity} inputs")]
    InvalidArity {
        /// The requested tree arity
        arity: usize,
        /// The arity of the injected hash function
        hash_arity: usize,
    },

    /// The tree's node count does not fit in a 64-bit index
    #[error("Tree of depth {depth} and arity {arity} is too large to index")]
    DepthTooLarge {
        /// The requested depth
        depth: usize,
        /// The requested arity
        arity: usize,
    },

    /// All leaf slots are occupied
    #[error("Tree is full: capacity {capacity}")]
    TreeFull {
        /// The leaf capacity of the tree
        capacity: u64,
    },

    /// A leaf index lies outside the permitted range
    #[error("Leaf index {index} out of bounds (limit {limit})")]
    IndexOutOfBounds {
        /// The requested index
        index: u64,
        /// The exclusive upper bound
        limit: u64,
    },

    /// A subroot proof range is not a well-formed subtree
    #[error("Invalid subroot range [{start}, {end}): {reason}")]
    InvalidSubrootRange {
        /// Inclusive start index
        start: u64,
        /// Exclusive end index
        end: u64,
        /// Why the range was rejected
        reason: String,
    },

    /// A proof does not have the shape required for verification
    #[error("Malformed proof: {0}")]
    MalformedProof(String),

    /// Hashing failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Errors raised by the accumulator queue
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccQueueError {
    /// Only 2 or 5 leaves per node are supported
    #[error("Unsupported hash length {0}: must be 2 or 5")]
    UnsupportedHashLength(usize),

    /// Subtree depth must be between 1 and the maximum depth
    #[error("Invalid subtree depth {sub_depth}: must be between 1 and {max_depth}")]
    InvalidSubDepth {
        /// The requested subtree depth
        sub_depth: usize,
        /// The maximum supported depth
        max_depth: usize,
    },

    /// The queue already holds `hash_length^MAX_DEPTH` leaves
    #[error("AccQueue is full")]
    QueueFull,

    /// `merge_sub_roots` was called after the subtrees were merged
    #[error("Subtrees are already merged")]
    SubTreesAlreadyMerged,

    /// A merge was requested on an empty queue
    #[error("AccQueue has no leaves to merge")]
    NoLeaves,

    /// `merge` was called before `merge_sub_roots` completed
    #[error("Subtrees must be merged before merging to a main root")]
    SubTreesNotMerged,

    /// The requested main tree is too shallow to hold every subtree
    #[error("Depth {depth} is too shallow: the subroot tree needs depth {srt_depth}")]
    DepthTooShallow {
        /// The requested depth
        depth: usize,
        /// The minimal depth that fits all subtrees
        srt_depth: usize,
    },

    /// The requested main tree is deeper than the maximum depth
    #[error("Depth {depth} exceeds the maximum depth {max_depth}")]
    DepthExceedsMax {
        /// The requested depth
        depth: usize,
        /// The maximum supported depth
        max_depth: usize,
    },

    /// A main root of depth zero was requested
    #[error("Cannot merge to a tree of depth 0")]
    ZeroDepth,

    /// Hashing failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Building the direct-merge tree failed
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
