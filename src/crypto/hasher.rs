//! Hash function injection for trees and queues
//!
//! Trees and accumulator queues are parameterized by a [`HashFunction`] fixed
//! at construction. The only implementation the protocol needs is Poseidon of
//! a fixed arity, but tests and callers may supply their own.

use crate::crypto::poseidon::poseidon_arity;
use crate::errors::CryptoError;
use crate::types::FieldElement;

/// A pure function from a fixed number of field elements to one field element
///
/// # Example
///
/// ```rust
/// use quin_accumulator::crypto::hasher::{HashFunction, PoseidonHasher};
/// use quin_accumulator::FieldElement;
///
/// let hasher = PoseidonHasher::new(2)?;
/// assert_eq!(hasher.arity(), 2);
/// let parent = hasher.hash(&[FieldElement::from(1u64), FieldElement::from(2u64)])?;
/// # let _ = parent;
/// # Ok::<(), quin_accumulator::errors::CryptoError>(())
/// ```
pub trait HashFunction {
    /// Returns the number of inputs the function absorbs
    fn arity(&self) -> usize;

    /// Hashes exactly [`arity`](HashFunction::arity) inputs
    ///
    /// # Errors
    /// [`CryptoError::InvalidArity`] if `inputs.len() != self.arity()`
    fn hash(&self, inputs: &[FieldElement]) -> Result<FieldElement, CryptoError>;
}

impl<H: HashFunction + ?Sized> HashFunction for &H {
    fn arity(&self) -> usize { (**self).arity() }

    fn hash(&self, inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
        (**self).hash(inputs)
    }
}

/// Fixed-arity circom Poseidon
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoseidonHasher {
    arity: usize,
}

/// Smallest arity a tree hash may have
pub const MIN_HASH_ARITY: usize = 2;

/// Largest arity with an on-chain Poseidon library
pub const MAX_HASH_ARITY: usize = 5;

/// Poseidon over 2 inputs (`PoseidonT3`)
pub const POSEIDON_T3: PoseidonHasher = PoseidonHasher { arity: 2 };
/// Poseidon over 3 inputs (`PoseidonT4`)
pub const POSEIDON_T4: PoseidonHasher = PoseidonHasher { arity: 3 };
/// Poseidon over 4 inputs (`PoseidonT5`)
pub const POSEIDON_T5: PoseidonHasher = PoseidonHasher { arity: 4 };
/// Poseidon over 5 inputs (`PoseidonT6`)
pub const POSEIDON_T6: PoseidonHasher = PoseidonHasher { arity: 5 };

impl PoseidonHasher {
    /// Creates a Poseidon hasher of the given arity
    ///
    /// # Errors
    /// [`CryptoError::UnsupportedWidth`] unless `2 <= arity <= 5`
    pub fn new(arity: usize) -> Result<Self, CryptoError> {
        if !(MIN_HASH_ARITY..=MAX_HASH_ARITY).contains(&arity) {
            return Err(CryptoError::UnsupportedWidth(arity + 1));
        }
        Ok(Self { arity })
    }
}

impl HashFunction for PoseidonHasher {
    fn arity(&self) -> usize { self.arity }

    fn hash(&self, inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
        poseidon_arity(self.arity, inputs)
    }
}
