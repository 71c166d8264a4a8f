//! Poseidon hash functions over the BN254 scalar field
//!
//! The parameters are the circom-compatible x^5 Poseidon parameters, so every
//! digest agrees with circomlib's `Poseidon(n)` template and the on-chain
//! `PoseidonT3`..`PoseidonT6` libraries.

use std::collections::HashMap;

use ark_ff::{Field, Zero};
use light_poseidon::parameters::bn254_x5::get_poseidon_parameters;
use light_poseidon::PoseidonParameters;
use once_cell::sync::Lazy;

use crate::errors::CryptoError;
use crate::types::FieldElement;

/// Smallest supported state width (one input plus capacity)
pub const MIN_WIDTH: usize = 2;

/// Largest supported state width (twelve inputs plus capacity)
pub const MAX_WIDTH: usize = 13;

/// Number of inputs absorbed by [`hash13`]
pub const HASH13_INPUTS: usize = 13;

static PARAMETERS: Lazy<HashMap<usize, PoseidonParameters<FieldElement>>> = Lazy::new(|| {
    (MIN_WIDTH..=MAX_WIDTH)
        .filter_map(|width| {
            let t = u8::try_from(width).ok()?;
            get_poseidon_parameters::<FieldElement>(t).ok().map(|params| (width, params))
        })
        .collect()
});

fn parameters(width: usize) -> Result<&'static PoseidonParameters<FieldElement>, CryptoError> {
    PARAMETERS.get(&width).ok_or(CryptoError::UnsupportedWidth(width))
}

/// Applies the Poseidon permutation to a full state
///
/// The state width selects the parameter set. The whole output state is
/// returned, which is what the sponge-based cipher needs; hashing is the
/// special case of a zero capacity element and taking the first output.
///
/// # Errors
/// [`CryptoError::UnsupportedWidth`] if no parameters exist for `state.len()`
pub fn poseidon_perm(state: &[FieldElement]) -> Result<Vec<FieldElement>, CryptoError> {
    let params = parameters(state.len())?;
    let width = params.width;
    let half_full = params.full_rounds / 2;
    let all_rounds = params.full_rounds + params.partial_rounds;
    let alpha = [params.alpha];

    let mut state = state.to_vec();
    for round in 0..all_rounds {
        for (i, element) in state.iter_mut().enumerate() {
            *element += params.ark[round * width + i];
        }

        if round < half_full || round >= half_full + params.partial_rounds {
            for element in state.iter_mut() {
                *element = element.pow(alpha);
            }
        } else {
            state[0] = state[0].pow(alpha);
        }

        state = params
            .mds
            .iter()
            .map(|row| row.iter().zip(state.iter()).map(|(m, s)| *m * s).sum())
            .collect();
    }

    Ok(state)
}

/// Hashes `inputs` with the circom Poseidon of matching arity
///
/// # Errors
/// [`CryptoError::UnsupportedWidth`] if `inputs` is empty or longer than 12
pub fn poseidon(inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    let mut state = Vec::with_capacity(inputs.len() + 1);
    state.push(FieldElement::zero());
    state.extend_from_slice(inputs);
    Ok(poseidon_perm(&state)?[0])
}

/// Strict fixed-arity Poseidon: fails unless exactly `arity` inputs are supplied
pub fn poseidon_arity(arity: usize, inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    if inputs.len() != arity {
        return Err(CryptoError::InvalidArity { expected: arity, actual: inputs.len() });
    }
    poseidon(inputs)
}

/// Poseidon with a 3-element state (2 inputs)
pub fn poseidon_t3(inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    poseidon_arity(2, inputs)
}

/// Poseidon with a 4-element state (3 inputs)
pub fn poseidon_t4(inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    poseidon_arity(3, inputs)
}

/// Poseidon with a 5-element state (4 inputs)
pub fn poseidon_t5(inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    poseidon_arity(4, inputs)
}

/// Poseidon with a 6-element state (5 inputs)
pub fn poseidon_t6(inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    poseidon_arity(5, inputs)
}

/// Right-pads `elements` with zeros to `n` inputs and hashes them
///
/// # Errors
/// [`CryptoError::TooManyInputs`] if more than `n` elements are supplied
pub fn hash_up_to_n(n: usize, elements: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    if elements.len() > n {
        return Err(CryptoError::TooManyInputs { max: n, actual: elements.len() });
    }
    let mut padded = elements.to_vec();
    padded.resize(n, FieldElement::zero());
    poseidon_arity(n, &padded)
}

/// Hashes up to 2 elements
pub fn hash2(elements: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    hash_up_to_n(2, elements)
}

/// Hashes up to 3 elements
pub fn hash3(elements: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    hash_up_to_n(3, elements)
}

/// Hashes up to 4 elements
pub fn hash4(elements: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    hash_up_to_n(4, elements)
}

/// Hashes up to 5 elements
pub fn hash5(elements: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    hash_up_to_n(5, elements)
}

/// Hashes up to 13 elements with a composite of arity-5 hashes
///
/// With the input zero-padded to `e[0..13]`, the digest is
/// `H5(e0, H5(e1..e6), H5(e6..e11), e11, e12)`.
pub fn hash13(elements: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    if elements.len() > HASH13_INPUTS {
        return Err(CryptoError::TooManyInputs { max: HASH13_INPUTS, actual: elements.len() });
    }
    let mut padded = elements.to_vec();
    padded.resize(HASH13_INPUTS, FieldElement::zero());

    poseidon_t6(&[
        padded[0],
        poseidon_t6(&padded[1..6])?,
        poseidon_t6(&padded[6..11])?,
        padded[11],
        padded[12],
    ])
}

/// Hashes two siblings into their parent
pub fn hash_left_right(left: FieldElement, right: FieldElement) -> Result<FieldElement, CryptoError> {
    poseidon_t3(&[left, right])
}

/// Hashes a single element as `hash_left_right(value, 0)`
pub fn hash_one(value: FieldElement) -> Result<FieldElement, CryptoError> {
    hash_left_right(value, FieldElement::zero())
}
