//! Inclusion proofs for incremental quin trees

use serde::{Deserialize, Serialize};

use crate::crypto::hasher::HashFunction;
use crate::errors::TreeError;
use crate::types::FieldElement;

/// Merkle inclusion proof for a leaf (or subroot) of an n-ary tree
///
/// Level `i` of the proof holds the `arity - 1` siblings of the running node
/// at that level, in left-to-right order with the running node removed, and
/// the running node's position among its `arity` siblings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof {
    /// The proven value: a leaf, or a subtree root for subroot proofs
    #[serde(with = "crate::utils::serde_field")]
    pub leaf: FieldElement,
    /// Sibling values per level, from the bottom up
    #[serde(with = "crate::utils::serde_field_vec2")]
    pub path_elements: Vec<Vec<FieldElement>>,
    /// Position of the running node among its siblings, per level
    pub path_indices: Vec<usize>,
    /// The root the proof claims membership in
    #[serde(with = "crate::utils::serde_field")]
    pub root: FieldElement,
}

impl MerkleProof {
    /// Returns the number of levels the proof spans
    pub fn depth(&self) -> usize { self.path_elements.len() }
}

/// Recomputes the root of a proof and compares it with the claimed root
///
/// At each level the running hash is spliced into the sibling set at its
/// stated position and the full set is hashed.
///
/// # Arguments
/// * `proof` - The proof to check
/// * `hasher` - The hash function of the tree the proof came from
///
/// # Returns
/// `Ok(true)` if the recomputed root equals `proof.root`, `Ok(false)` otherwise
///
/// # Errors
/// [`TreeError::MalformedProof`] if the proof's shape does not match the hasher's arity
pub fn verify_merkle_proof<H: HashFunction>(
    proof: &MerkleProof,
    hasher: &H,
) -> Result<bool, TreeError> {
    let arity = hasher.arity();
    if proof.path_elements.len() != proof.path_indices.len() {
        return Err(TreeError::MalformedProof(format!(
            "{} sibling levels but {} path indices",
            proof.path_elements.len(),
            proof.path_indices.len()
        )));
    }

    let mut current = proof.leaf;
    let mut children = Vec::with_capacity(arity);
    for (level, (siblings, &position)) in
        proof.path_elements.iter().zip(&proof.path_indices).enumerate()
    {
        if siblings.len() != arity - 1 {
            return Err(TreeError::MalformedProof(format!(
                "level {level} has {} siblings, expected {}",
                siblings.len(),
                arity - 1
            )));
        }
        if position >= arity {
            return Err(TreeError::MalformedProof(format!(
                "level {level} position {position} is not below arity {arity}"
            )));
        }

        children.clear();
        children.extend_from_slice(&siblings[..position]);
        children.push(current);
        children.extend_from_slice(&siblings[position..]);
        current = hasher.hash(&children)?;
    }

    Ok(current == proof.root)
}
