//! Baby Jubjub curve helpers
//!
//! Baby Jubjub is the twisted Edwards curve `168700·x² + y² = 1 + 168696·x²·y²`
//! over the BN254 scalar field, so its coordinates are [`FieldElement`]s and
//! its arithmetic is cheap inside a circuit. `ark-ed-on-bn254` ships the same
//! curve rescaled to `a = 1`, whose coordinates differ from circomlib's, so
//! the circomlib form is declared here as its own `ark-ec` curve config. The
//! subgroup order and cofactor are shared with `ark-ed-on-bn254`.

use ark_ec::models::CurveConfig;
use ark_ec::twisted_edwards::{Affine, MontCurveConfig, TECurveConfig};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, MontFp, PrimeField, Zero};
use num_bigint::BigUint;
use once_cell::sync::Lazy;

use crate::errors::CryptoError;
use crate::types::{Bytes32, FieldElement, SNARK_FIELD_SIZE};
use crate::utils::{bigint_to_le_bytes32, field_to_biguint, le_bytes_to_bigint};

/// Baby Jubjub in circomlib's coordinates: `a = 168700`, `d = 168696`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BabyJubjubConfig;

impl CurveConfig for BabyJubjubConfig {
    type BaseField = FieldElement;
    type ScalarField = ark_ed_on_bn254::Fr;

    const COFACTOR: &'static [u64] = &[8];

    /// 8⁻¹ mod l
    const COFACTOR_INV: ark_ed_on_bn254::Fr =
        MontFp!("2394026564107420727433200628387514462817212225638746351800188703329891451411");
}

impl TECurveConfig for BabyJubjubConfig {
    const COEFF_A: FieldElement = MontFp!("168700");
    const COEFF_D: FieldElement = MontFp!("168696");
    const GENERATOR: Point = BASE8;

    type MontCurveConfig = BabyJubjubConfig;
}

// By² = x³ + Ax² + x with A = 2(a + d)/(a - d) and B = 4/(a - d)
impl MontCurveConfig for BabyJubjubConfig {
    const COEFF_A: FieldElement = MontFp!("168698");
    const COEFF_B: FieldElement = MontFp!("1");

    type TECurveConfig = BabyJubjubConfig;
}

/// An affine point on Baby Jubjub
pub type Point = Affine<BabyJubjubConfig>;

/// The generator of the prime-order subgroup used by circomlib (`Base8`)
pub const BASE8: Point = Point::new_unchecked(
    MontFp!("5299619240641551281634865583518297030282874472190772894086521144482721001553"),
    MontFp!("16950150798460657717958625567821834550301663161624707787222815936182638968203"),
);

/// Order of the prime subgroup generated by [`BASE8`]
pub static SUB_ORDER: Lazy<BigUint> = Lazy::new(|| ark_ed_on_bn254::Fr::MODULUS.into());

/// `(p - 1) / 2`, the largest "non-negative" field element in circomlib's sign convention
static HALF_MODULUS: Lazy<BigUint> = Lazy::new(|| (&*SNARK_FIELD_SIZE - 1u32) >> 1);

/// Multiplies a point by an arbitrary non-negative integer
pub fn mul_point_escalar(point: &Point, scalar: &BigUint) -> Point {
    point.mul_bigint(scalar.to_u64_digits()).into_affine()
}

/// Adds two points
pub fn add_point(a: &Point, b: &Point) -> Point {
    let mut sum = a.into_group();
    sum += b;
    sum.into_affine()
}

/// Returns whether a point satisfies the curve equation
pub fn in_curve(point: &Point) -> bool { point.is_on_curve() }

/// Builds a point from coordinates, rejecting points that are not on the curve
pub fn point_from_coordinates(x: FieldElement, y: FieldElement) -> Result<Point, CryptoError> {
    let point = Point::new_unchecked(x, y);
    if !in_curve(&point) {
        return Err(CryptoError::InvalidPoint);
    }
    Ok(point)
}

/// Returns whether a coordinate is "negative", i.e. greater than `(p - 1) / 2`
fn is_negative(value: &FieldElement) -> bool { field_to_biguint(value) > *HALF_MODULUS }

/// Compresses a point into 32 bytes
///
/// The y coordinate is written little-endian and the top bit of the last byte
/// carries the sign of x.
pub fn pack_point(point: &Point) -> Bytes32 {
    let mut packed = bigint_to_le_bytes32(&field_to_biguint(&point.y));
    if is_negative(&point.x) {
        packed[31] |= 0x80;
    }
    packed
}

/// Decompresses a point produced by [`pack_point`]
///
/// # Errors
/// [`CryptoError::InvalidPoint`] if the bytes do not encode a curve point
pub fn unpack_point(packed: &Bytes32) -> Result<Point, CryptoError> {
    let mut bytes = *packed;
    let sign = bytes[31] & 0x80 != 0;
    bytes[31] &= 0x7F;

    let y_int = le_bytes_to_bigint(&bytes);
    if y_int >= *SNARK_FIELD_SIZE {
        return Err(CryptoError::InvalidPoint);
    }
    let y = FieldElement::from(y_int);

    // x² = (1 - y²) / (a - d·y²)
    let y2 = y.square();
    let numerator = FieldElement::from(1u64) - y2;
    let denominator = <BabyJubjubConfig as TECurveConfig>::COEFF_A
        - <BabyJubjubConfig as TECurveConfig>::COEFF_D * y2;
    let denominator_inv = denominator.inverse().ok_or(CryptoError::InvalidPoint)?;
    let mut x = (numerator * denominator_inv).sqrt().ok_or(CryptoError::InvalidPoint)?;

    if is_negative(&x) {
        x = -x;
    }
    if sign {
        if x.is_zero() {
            return Err(CryptoError::InvalidPoint);
        }
        x = -x;
    }

    point_from_coordinates(x, y)
}

/// Serde adapter encoding a point as a pair of decimal strings
pub mod serde_point {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{point_from_coordinates, Point};
    use crate::utils::{field_from_str, field_to_string};

    /// Serializes a point as `[x, y]`
    pub fn serialize<S: Serializer>(point: &Point, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq([field_to_string(&point.x), field_to_string(&point.y)])
    }

    /// Deserializes `[x, y]`, rejecting points off the curve
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Point, D::Error> {
        let [x, y] = <[String; 2]>::deserialize(deserializer)?;
        let x = field_from_str(&x).map_err(serde::de::Error::custom)?;
        let y = field_from_str(&y).map_err(serde::de::Error::custom)?;
        point_from_coordinates(x, y).map_err(serde::de::Error::custom)
    }
}
