//! Crate-wide constants used by the quantizer, renderer, and runner defaults.

/// Coefficients of the cubic sigmoid approximation
/// `sigmoid(x) ~= SIGMOID_C0 + SIGMOID_C1 * x - SIGMOID_C3 * x^3`.
///
/// Least-squares fit on [-5, 5]. The absolute error stays below 0.06 on the
/// fit interval and below 0.02 on [-4, 4]. The proof statement covers correct
/// evaluation of this approximation, not of the exact sigmoid, so the degree
/// and interval are fixed design constants rather than runtime inputs.
pub const SIGMOID_C0: f64 = 0.5;
pub const SIGMOID_C1: f64 = 0.1501;
pub const SIGMOID_C3: f64 = 0.0016;

/// Default fixed-point scale factor.
///
/// All real quantities entering a circuit are represented as
/// `round(value * precision)` integers. A single precision value must be used
/// for every artifact of one proof session; mixing precisions corrupts the
/// arithmetic silently.
pub const DEFAULT_PRECISION: u64 = 1000;

/// Default circuit shape: two input features feeding two hidden neurons.
pub const DEFAULT_FEATURES: usize = 2;
pub const DEFAULT_NEURONS: usize = 2;

/// Default learning rate, already expressed in fixed-point units. The value
/// is baked into the update circuit and never enters host-side arithmetic.
pub const DEFAULT_LEARNING_RATE: u64 = 10;

/// File the rendered circuit source is written to inside a working scope.
pub const CIRCUIT_FILE: &str = "circuit.zok";

/// File the ordered witness schema is written to for the external compiler.
pub const WITNESS_FILE: &str = "witness.json";

/// File the external tool's combined stdout/stderr is captured to.
pub const LOG_FILE: &str = "circ.log.txt";

/// Environment variable overriding the standard circuit library location.
pub const STDLIB_ENV: &str = "CIRC_STDLIB";
