//! Pipeline configuration.
//!
//! One immutable [`PipelineConfig`] value is built at startup and passed into
//! every core call. There is no process-wide mutable configuration: two steps
//! compiled with different configs never observe each other.

use crate::constants::{
    DEFAULT_FEATURES, DEFAULT_LEARNING_RATE, DEFAULT_NEURONS, DEFAULT_PRECISION, STDLIB_ENV,
};
use crate::errors::CircuitError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Circuit shape: input feature count and hidden neuron count.
///
/// Determines every witness array dimension; immutable for the duration of a
/// compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkShape {
    pub features: usize,
    pub neurons: usize,
}

/// Model parameters baked into the rendered circuits as public constants.
///
/// Values are already expressed in fixed-point units; the renderer validates
/// them against the field sign bound but applies no further scaling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    /// Hidden layer weights, `[neurons][features]`.
    pub w0: Vec<Vec<i64>>,
    /// Hidden layer biases, `[neurons]`.
    pub b0: Vec<i64>,
    /// Output layer weights, `[neurons]`.
    pub w1: Vec<i64>,
    /// Output layer bias.
    pub b1: i64,
}

impl Weights {
    /// The demo model shipped with the pipeline.
    pub fn demo() -> Self {
        Self {
            w0: vec![vec![1, 2], vec![3, 4]],
            b0: vec![0, 0],
            w1: vec![5, 6],
            b1: 0,
        }
    }

    /// Check that every tensor matches `shape`.
    ///
    /// A mismatch would render a circuit whose constants disagree with the
    /// declared witness dimensions, so it is a fatal configuration error.
    pub fn validate(&self, shape: &NetworkShape) -> Result<(), CircuitError> {
        if self.w0.len() != shape.neurons || self.w0.iter().any(|row| row.len() != shape.features) {
            return Err(CircuitError::InvalidConfig(format!(
                "w0 must be [{}][{}]",
                shape.neurons, shape.features
            )));
        }
        if self.b0.len() != shape.neurons {
            return Err(CircuitError::InvalidConfig(format!(
                "b0 must have length {}",
                shape.neurons
            )));
        }
        if self.w1.len() != shape.neurons {
            return Err(CircuitError::InvalidConfig(format!(
                "w1 must have length {}",
                shape.neurons
            )));
        }
        Ok(())
    }
}

/// Immutable configuration for one pipeline invocation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root of the external constraint-compiler checkout.
    pub circ_path: PathBuf,

    /// Standard circuit library staged into every working scope. Required;
    /// defaults to `$CIRC_STDLIB` or `{circ_path}/stdlib`.
    pub stdlib_dir: PathBuf,

    /// Poseidon hash gadget library staged when present. Optional.
    pub poseidon_dir: Option<PathBuf>,

    /// Directory of `{step}.zok.tmpl` overrides; the built-in templates are
    /// used when unset.
    pub template_dir: Option<PathBuf>,

    /// Parent directory of the per-step working scopes.
    pub working_dir: PathBuf,

    /// Fixed-point scale factor shared by every artifact of a session.
    pub precision: u64,

    pub shape: NetworkShape,

    /// Fixed-point learning rate, consumed only by the update circuit.
    pub learning_rate: u64,

    /// Model constants baked into the rendered circuits.
    pub weights: Weights,

    /// Forwarded to the external toolchain for verbose diagnostics.
    pub debug: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let circ_path = PathBuf::from("/root/circ");
        let stdlib_dir = std::env::var_os(STDLIB_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| circ_path.join("stdlib"));

        Self {
            circ_path,
            stdlib_dir,
            poseidon_dir: Some(PathBuf::from("templates/poseidon")),
            template_dir: None,
            working_dir: PathBuf::from("/tmp/nn_steps"),
            precision: DEFAULT_PRECISION,
            shape: NetworkShape {
                features: DEFAULT_FEATURES,
                neurons: DEFAULT_NEURONS,
            },
            learning_rate: DEFAULT_LEARNING_RATE,
            weights: Weights::demo(),
            debug: false,
        }
    }
}

impl PipelineConfig {
    /// Reject configurations that could only fail later, mid-pipeline.
    pub fn validate(&self) -> Result<(), CircuitError> {
        if self.precision == 0 {
            return Err(CircuitError::InvalidConfig(
                "precision must be positive".to_string(),
            ));
        }
        if self.shape.features == 0 || self.shape.neurons == 0 {
            return Err(CircuitError::InvalidConfig(
                "feature and neuron counts must be positive".to_string(),
            ));
        }
        self.weights.validate(&self.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn shape_mismatches_are_fatal() {
        let mut config = PipelineConfig::default();
        config.shape = NetworkShape {
            features: 3,
            neurons: 2,
        };
        assert!(matches!(
            config.validate(),
            Err(CircuitError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_precision_is_rejected() {
        let mut config = PipelineConfig::default();
        config.precision = 0;
        assert!(matches!(
            config.validate(),
            Err(CircuitError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.precision, config.precision);
        assert_eq!(back.shape, config.shape);
        assert_eq!(back.weights, config.weights);
    }

    #[test]
    fn partial_json_files_fall_back_to_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"precision": 2000}"#).unwrap();
        assert_eq!(config.precision, 2000);
        assert_eq!(config.shape.features, DEFAULT_FEATURES);
    }
}
