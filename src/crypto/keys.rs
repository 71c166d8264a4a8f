//! Key generation and Diffie–Hellman key agreement
//!
//! A private key is a random field element. The scalar actually multiplied
//! into the curve is derived from it the way circomlib's EdDSA does: BLAKE-512
//! of the key, pruned, read little-endian and divided by the cofactor. The
//! hashed bytes are the key's minimal big-endian encoding, so a key below
//! `2^248` hashes fewer than 32 bytes.

use blake_hash::{Blake512, Digest};
use num_bigint::BigUint;
use num_traits::One;
use once_cell::sync::Lazy;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::crypto::babyjub::{self, mul_point_escalar, Point, BASE8};
use crate::errors::CryptoError;
use crate::types::{Bytes32, FieldElement, SNARK_FIELD_SIZE};
use crate::utils::{be_bytes_to_bigint, field_to_be_bytes, field_to_biguint, le_bytes_to_bigint};

/// Rejection-sampling bound `2^256 mod p`
static RANDOM_MIN: Lazy<BigUint> = Lazy::new(|| (BigUint::one() << 256u32) % &*SNARK_FIELD_SIZE);

/// A shared secret produced by [`gen_ecdh_shared_key`]
pub type SharedKey = Point;

/// A private key: a uniformly random field element
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey(#[serde(with = "crate::utils::serde_field")] FieldElement);

impl PrivateKey {
    /// Wraps a raw private key
    pub fn new(raw: FieldElement) -> Self { Self(raw) }

    /// Samples a fresh private key
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self { Self(gen_random_babyjub_value(rng)) }

    /// Returns the raw private key
    pub fn raw(&self) -> FieldElement { self.0 }

    /// Returns the raw key as a 32-byte big-endian buffer
    pub fn to_bytes(&self) -> Bytes32 { field_to_be_bytes(&self.0) }

    /// Returns the bytes hashed by key derivation: the minimal big-endian
    /// encoding, a single zero byte for the zero key
    pub fn to_buffer(&self) -> Vec<u8> { field_to_biguint(&self.0).to_bytes_be() }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PrivateKey").field(&"<redacted>").finish()
    }
}

/// A public key: a point in the prime-order subgroup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "crate::crypto::babyjub::serde_point")] Point);

impl PublicKey {
    /// Wraps a curve point, rejecting points off the curve
    pub fn new(point: Point) -> Result<Self, CryptoError> {
        babyjub::point_from_coordinates(point.x, point.y).map(Self)
    }

    /// Returns the underlying point
    pub fn point(&self) -> &Point { &self.0 }

    /// Returns the coordinates `[x, y]`
    pub fn as_array(&self) -> [FieldElement; 2] { [self.0.x, self.0.y] }

    /// Compresses the key into 32 bytes
    pub fn pack(&self) -> Bytes32 { babyjub::pack_point(&self.0) }

    /// Decompresses a key produced by [`PublicKey::pack`]
    pub fn unpack(packed: &Bytes32) -> Result<Self, CryptoError> {
        babyjub::unpack_point(packed).map(Self)
    }
}

/// A private key together with its public key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keypair {
    /// The private key
    pub private_key: PrivateKey,
    /// The public key derived from `private_key`
    pub public_key: PublicKey,
}

impl Keypair {
    /// Generates a fresh keypair
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from_private_key(PrivateKey::random(rng))
    }

    /// Derives the keypair of an existing private key
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        Self { private_key, public_key: gen_pub_key(&private_key) }
    }
}

/// Samples a uniformly random field element
///
/// 256-bit integers below `2^256 mod p` are rejected so that reducing the
/// accepted values modulo `p` introduces no bias.
pub fn gen_random_babyjub_value<R: RngCore + CryptoRng>(rng: &mut R) -> FieldElement {
    loop {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        let candidate = be_bytes_to_bigint(&bytes);
        if candidate >= *RANDOM_MIN {
            return FieldElement::from(candidate % &*SNARK_FIELD_SIZE);
        }
    }
}

/// Samples a random private key
pub fn gen_priv_key<R: RngCore + CryptoRng>(rng: &mut R) -> PrivateKey { PrivateKey::random(rng) }

/// Samples a random salt
pub fn gen_random_salt<R: RngCore + CryptoRng>(rng: &mut R) -> FieldElement {
    gen_random_babyjub_value(rng)
}

/// BLAKE-512 (the SHA-3 finalist, not BLAKE2)
pub(crate) fn blake512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Blake512::new();
    hasher.update(data);
    let mut out = [0u8; 64];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Clears the cofactor bits and fixes the top bits of a scalar buffer
pub(crate) fn prune_buffer(buffer: &mut [u8; 32]) {
    buffer[0] &= 0xF8;
    buffer[31] &= 0x7F;
    buffer[31] |= 0x40;
}

/// Returns `BLAKE512(secret)` and the pruned EdDSA scalar `s` (before
/// division by the cofactor)
pub(crate) fn secret_scalar(secret: &[u8]) -> ([u8; 64], BigUint) {
    let digest = blake512(secret);
    let mut s_buffer = [0u8; 32];
    s_buffer.copy_from_slice(&digest[..32]);
    prune_buffer(&mut s_buffer);
    (digest, le_bytes_to_bigint(&s_buffer))
}

/// Derives the scalar that multiplies the base point for a private key
pub fn format_priv_key_for_babyjub(private_key: &PrivateKey) -> BigUint {
    let (_, s) = secret_scalar(&private_key.to_buffer());
    s >> 3u32
}

/// Derives the public key of a raw EdDSA secret
pub(crate) fn pub_key_from_secret(secret: &[u8]) -> Point {
    let (_, s) = secret_scalar(secret);
    mul_point_escalar(&BASE8, &(s >> 3u32))
}

/// Derives the public key of a private key
pub fn gen_pub_key(private_key: &PrivateKey) -> PublicKey {
    PublicKey(pub_key_from_secret(&private_key.to_buffer()))
}

/// Derives the Diffie–Hellman shared key between a private and a public key
///
/// `gen_ecdh_shared_key(a, B) == gen_ecdh_shared_key(b, A)` for keypairs
/// `(a, A)` and `(b, B)`.
pub fn gen_ecdh_shared_key(private_key: &PrivateKey, public_key: &PublicKey) -> SharedKey {
    mul_point_escalar(public_key.point(), &format_priv_key_for_babyjub(private_key))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::crypto::babyjub::{in_curve, SUB_ORDER};
    use crate::utils::field_from_str;

    fn fe(s: &str) -> FieldElement { field_from_str(s).expect("decimal") }

    // A large key with a full 32-byte encoding
    const BIG_KEY: &str =
        "12345678901234567890123456789012345678901234567890123456789012345678901234567";

    #[test]
    fn test_random_min() {
        let expected =
            "6350874878119819312338956282401532410528162663560392320966563075034087161851";
        assert_eq!(RANDOM_MIN.to_string(), expected);
    }

    #[test]
    fn test_priv_key_in_field() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            let key = gen_priv_key(&mut rng);
            assert!(field_to_biguint(&key.raw()) < *SNARK_FIELD_SIZE);
        }
        assert_ne!(gen_random_salt(&mut rng), gen_random_salt(&mut rng));
    }

    #[test]
    fn test_prune_buffer() {
        let mut buffer = [0xffu8; 32];
        prune_buffer(&mut buffer);
        assert_eq!(buffer[0], 0xF8);
        assert_eq!(buffer[31], 0x7F);

        let mut zeros = [0u8; 32];
        prune_buffer(&mut zeros);
        assert_eq!(zeros[31], 0x40);
    }

    #[test]
    fn test_formatted_key_bit_length() {
        let mut rng = StdRng::seed_from_u64(11);
        let key = gen_priv_key(&mut rng);
        let scalar = format_priv_key_for_babyjub(&key);
        // bit 254 of the pruned scalar survives the shift by 3
        assert_eq!(scalar.bits(), 252);
        assert_eq!(
            mul_point_escalar(&BASE8, &scalar),
            mul_point_escalar(&BASE8, &(&scalar % &*SUB_ORDER))
        );
    }

    #[test]
    fn test_pub_key_deterministic_and_on_curve() {
        let key = PrivateKey::new(FieldElement::from(42u64));
        let public_key = gen_pub_key(&key);
        assert!(in_curve(public_key.point()));
        assert_eq!(public_key, gen_pub_key(&key));
        assert_ne!(public_key, gen_pub_key(&PrivateKey::new(FieldElement::from(43u64))));
    }

    #[test]
    fn test_ecdh_symmetric() {
        let mut rng = StdRng::seed_from_u64(3);
        let alice = Keypair::random(&mut rng);
        let bob = Keypair::random(&mut rng);

        let ab = gen_ecdh_shared_key(&alice.private_key, &bob.public_key);
        let ba = gen_ecdh_shared_key(&bob.private_key, &alice.public_key);

        assert_eq!(ab, ba);
        assert!(in_curve(&ab));
    }

    #[test]
    fn test_pack_round_trip() {
        let mut rng = StdRng::seed_from_u64(5);
        let keypair = Keypair::random(&mut rng);
        let packed = keypair.public_key.pack();
        assert_eq!(PublicKey::unpack(&packed).expect("valid key"), keypair.public_key);
    }

    #[test]
    fn test_key_buffer_is_minimal() {
        assert_eq!(PrivateKey::new(FieldElement::from(0u64)).to_buffer(), vec![0]);
        assert_eq!(PrivateKey::new(FieldElement::from(42u64)).to_buffer(), vec![0x2a]);
        assert_eq!(PrivateKey::new(FieldElement::from(0x1234u64)).to_buffer(), vec![0x12, 0x34]);
        assert_eq!(PrivateKey::new(fe(BIG_KEY)).to_buffer().len(), 32);
    }

    #[test]
    fn test_circomlib_prv2pub_vector() {
        let secret = hex::decode("0001020304050607080900010203040506070809000102030405060708090001")
            .expect("hex");
        let public_key = pub_key_from_secret(&secret);
        assert_eq!(
            public_key.x,
            fe("13277427435165878497778222415993513565335242147425444199013288855685581939618")
        );
        assert_eq!(
            public_key.y,
            fe("13622229784656158136036771217484571176836296686641868549125388198837476602820")
        );
    }

    #[test]
    fn test_pub_key_vectors() {
        let small = PrivateKey::new(FieldElement::from(42u64));
        assert_eq!(
            format_priv_key_for_babyjub(&small).to_string(),
            "5962410309518488697482044710549089597585819527138539903027069059408442011567"
        );
        assert_eq!(
            gen_pub_key(&small).as_array(),
            [
                fe("21181334338000848989544959177277644406544162716281600682622119196593866165505"),
                fe("18139485871043077332027812855422086973263289297886002904684899519349454367399"),
            ]
        );

        let big = PrivateKey::new(fe(BIG_KEY));
        assert_eq!(
            gen_pub_key(&big).as_array(),
            [
                fe("19380790452564735995879530312325905147823294582615187792828782822025881234468"),
                fe("11109217245860190137950966670918823575406796541299530266649878063530515897212"),
            ]
        );
    }

    #[test]
    fn test_ecdh_vector() {
        let small = Keypair::from_private_key(PrivateKey::new(FieldElement::from(42u64)));
        let big = Keypair::from_private_key(PrivateKey::new(fe(BIG_KEY)));
        let expected = [
            fe("14861785288882760303988065089060658853576053816051717876631392522431691265925"),
            fe("15412355139324061085512300890363966504235925073778057575251457698545815316388"),
        ];

        let shared = gen_ecdh_shared_key(&big.private_key, &small.public_key);
        assert_eq!([shared.x, shared.y], expected);
        let shared = gen_ecdh_shared_key(&small.private_key, &big.public_key);
        assert_eq!([shared.x, shared.y], expected);
    }

    #[test]
    fn test_private_key_debug_redacted() {
        let key = PrivateKey::new(FieldElement::from(99u64));
        assert!(!format!("{key:?}").contains("99"));
    }

    #[test]
    fn test_keypair_serde() {
        let keypair = Keypair::from_private_key(PrivateKey::new(FieldElement::from(1234u64)));
        let json = serde_json::to_string(&keypair).expect("serializable");
        assert!(json.contains("\"1234\""));
        let decoded: Keypair = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(decoded, keypair);
    }
}
