//! Training-step kinds and their witness schemas.

use crate::config::NetworkShape;
use crate::errors::CircuitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The training-step kinds the pipeline can compile.
///
/// Closed set: `witnesses_for` and the renderer match exhaustively, so adding
/// a kind is a compile-time-checked change. Arbitrary names only appear at
/// the parsing boundary, where anything else is `UnknownStep`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Forward,
    Backward,
    Update,
}

impl StepKind {
    pub const ALL: [StepKind; 3] = [StepKind::Forward, StepKind::Backward, StepKind::Update];

    pub fn name(self) -> &'static str {
        match self {
            StepKind::Forward => "forward",
            StepKind::Backward => "backward",
            StepKind::Update => "update",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StepKind {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(StepKind::Forward),
            "backward" => Ok(StepKind::Backward),
            "update" => Ok(StepKind::Update),
            other => Err(CircuitError::UnknownStep(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// Shape of one witness variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WitnessType {
    Scalar,
    Vector(usize),
    Matrix(usize, usize),
}

impl WitnessType {
    /// Wire-type descriptor in the external compiler's input language.
    pub fn descriptor(self) -> String {
        match self {
            WitnessType::Scalar => "u64".to_string(),
            WitnessType::Vector(n) => format!("u64[{n}]"),
            WitnessType::Matrix(rows, cols) => format!("u64[{rows}][{cols}]"),
        }
    }
}

/// Placeholder value handed to the compiler for witness slot sizing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WitnessValue {
    Scalar(u64),
    Vector(Vec<u64>),
    Matrix(Vec<Vec<u64>>),
}

/// One entry of the ordered witness schema.
#[derive(Clone, Debug, PartialEq)]
pub struct WitnessDeclaration {
    pub visibility: Visibility,
    pub name: &'static str,
    pub ty: WitnessType,
    pub value: WitnessValue,
}

/// Build the witness schema for one step.
///
/// IMPORTANT: Declaration order and shapes MUST match the parameter order of
/// the rendered circuit's `main` exactly; the external compiler binds them
/// positionally.
pub fn witnesses_for(
    step: StepKind,
    shape: &NetworkShape,
    precision: u64,
) -> Vec<WitnessDeclaration> {
    let features = shape.features;
    let neurons = shape.neurons;

    match step {
        StepKind::Forward => vec![WitnessDeclaration {
            visibility: Visibility::Private,
            name: "x",
            ty: WitnessType::Vector(features),
            value: WitnessValue::Vector(vec![1; features]),
        }],

        StepKind::Backward => {
            let mut declarations = witnesses_for(StepKind::Forward, shape, precision);
            declarations.push(WitnessDeclaration {
                visibility: Visibility::Private,
                name: "y",
                ty: WitnessType::Scalar,
                value: WitnessValue::Scalar(precision),
            });
            declarations
        }

        StepKind::Update => vec![
            WitnessDeclaration {
                visibility: Visibility::Private,
                name: "dw0",
                ty: WitnessType::Matrix(neurons, features),
                value: WitnessValue::Matrix(vec![vec![1; features]; neurons]),
            },
            WitnessDeclaration {
                visibility: Visibility::Private,
                name: "dw1",
                ty: WitnessType::Vector(neurons),
                value: WitnessValue::Vector(vec![1; neurons]),
            },
            WitnessDeclaration {
                visibility: Visibility::Private,
                name: "db0",
                ty: WitnessType::Vector(neurons),
                value: WitnessValue::Vector(vec![1; neurons]),
            },
            WitnessDeclaration {
                visibility: Visibility::Private,
                name: "db1",
                ty: WitnessType::Scalar,
                value: WitnessValue::Scalar(1),
            },
        ],
    }
}
