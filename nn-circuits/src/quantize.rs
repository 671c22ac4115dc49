//! Fixed-point quantization into the proof-system field.
//!
//! Real values are represented as `round(value * precision)` integers before
//! they enter the field, with `round` being half-away-from-zero. The field is
//! unsigned, so signed quantities use modulus-offset encoding: a negative `q`
//! is represented by its canonical representative `p - |q|` for the BN254
//! scalar modulus `p`. The encoding is only decodable while
//! `|q| <= (p - 1) / 2`; the quantizer enforces the stricter bound
//! `|q| * precision < (p - 1) / 2` so that one rescaled in-circuit product
//! cannot cross the sign boundary. The same convention applies to weights,
//! gradients, and activation coefficients in every step of a session.

use crate::errors::CircuitError;
use ark_bn254::Fr;
use ark_ff::{BigInt, BigInteger, PrimeField};

/// A quantized signed integer validated against the field sign bound.
///
/// Construction goes through [`quantize`] (real inputs) or [`encode`]
/// (values already expressed in fixed-point units, e.g. the demo weights).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantized(i128);

impl Quantized {
    /// The signed fixed-point value.
    pub fn value(self) -> i128 {
        self.0
    }

    /// Canonical field representative; negative values map to `p - |q|`.
    pub fn to_field(self) -> Fr {
        if self.0 < 0 {
            -Fr::from(self.0.unsigned_abs())
        } else {
            Fr::from(self.0 as u128)
        }
    }

    /// Decimal literal as baked into rendered circuit source.
    ///
    /// Non-negative values render as plain decimals. Negative values render
    /// as the decimal form of their field encoding, which is what the
    /// downstream constraint compiler expects for an unsigned field.
    pub fn literal(self) -> String {
        if self.0 < 0 {
            self.to_field().into_bigint().to_string()
        } else {
            self.0.to_string()
        }
    }
}

fn half_modulus() -> BigInt<4> {
    let mut m = Fr::MODULUS;
    m.div2();
    m
}

/// Quantize a real value: `round(value * precision)`, half away from zero.
///
/// Deterministic for identical inputs. Values whose scaled magnitude cannot
/// be represented under the field sign bound are rejected with
/// `PrecisionOverflow` rather than silently wrapping.
pub fn quantize(value: f64, precision: u64) -> Result<Quantized, CircuitError> {
    let rounded = (value * precision as f64).round();
    if !rounded.is_finite() || rounded.abs() >= i128::MAX as f64 {
        return Err(CircuitError::PrecisionOverflow {
            magnitude: format!("{}", value.abs()),
            precision,
        });
    }
    encode(rounded as i128, precision)
}

/// Validate a value that is already in fixed-point units under the same
/// bound as [`quantize`].
pub fn encode(value: i128, precision: u64) -> Result<Quantized, CircuitError> {
    if precision == 0 {
        return Err(CircuitError::InvalidConfig(
            "precision must be positive".to_string(),
        ));
    }

    let magnitude = value.unsigned_abs();
    let overflow = || CircuitError::PrecisionOverflow {
        magnitude: magnitude.to_string(),
        precision,
    };

    // One factor of precision headroom: a single rescaled product of two
    // in-bound values stays below the sign boundary.
    let scaled = magnitude.checked_mul(precision as u128).ok_or_else(overflow)?;
    let scaled = BigInt::<4>::new([scaled as u64, (scaled >> 64) as u64, 0, 0]);
    if scaled >= half_modulus() {
        return Err(overflow());
    }

    Ok(Quantized(value))
}
