//! Quantized coefficients of the sigmoid approximation.
//!
//! The circuits evaluate `sigmoid(x) ~= C0 + C1 * x - C3 * x^3` with the
//! fixed coefficients from [`crate::constants`]. Only the non-negative
//! magnitudes are quantized here; the sign of the cubic term lives in the
//! circuit templates, so the host never emits a signed coefficient.

use crate::constants::{SIGMOID_C0, SIGMOID_C1, SIGMOID_C3};
use crate::errors::CircuitError;
use crate::quantize::{self, Quantized};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Quantized sigmoid-approximation coefficients for one precision value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivationParams {
    /// Constant term, `round(0.5 * precision)`.
    pub w0: Quantized,
    /// Linear term, `round(0.1501 * precision)`.
    pub w1s: Quantized,
    /// Cubic term magnitude, `round(0.0016 * precision)`; subtracted in the
    /// templates.
    pub w3: Quantized,
}

/// Quantize the approximation coefficients for `precision`.
///
/// Coefficients only depend on the precision, so results are cached for the
/// lifetime of the process and later calls with the same precision return
/// the cached value.
pub fn coefficients(precision: u64) -> Result<ActivationParams, CircuitError> {
    static CACHE: OnceLock<Mutex<HashMap<u64, ActivationParams>>> = OnceLock::new();

    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().expect("activation cache lock");

    if let Some(params) = cache.get(&precision) {
        return Ok(*params);
    }

    let params = ActivationParams {
        w0: quantize::quantize(SIGMOID_C0, precision)?,
        w1s: quantize::quantize(SIGMOID_C1, precision)?,
        w3: quantize::quantize(SIGMOID_C3, precision)?,
    };
    cache.insert(precision, params);
    Ok(params)
}
