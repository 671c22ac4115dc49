//! Adapter for the external CirC constraint-compiler checkout.
//!
//! The toolchain is a black box: this module materializes the circuit source
//! and witness schema into the scope, invokes the compiler binary with the
//! scope as working directory, and captures its combined output to
//! `circ.log.txt`. Nothing here interprets the compiled artifacts.

use nn_circuits::compile::{parse_constraint_count, CompilationResult, ConstraintCompiler};
use nn_circuits::config::PipelineConfig;
use nn_circuits::constants::{CIRCUIT_FILE, LOG_FILE, WITNESS_FILE};
use nn_circuits::errors::CircuitError;
use nn_circuits::render::RenderedCircuit;
use nn_circuits::steps::WitnessDeclaration;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// How many trailing log lines a `CompilationFailure` carries.
const LOG_TAIL_LINES: usize = 20;

/// Spawns the compiler binary from a CirC checkout.
pub struct CircToolchain {
    bin: PathBuf,
    debug: bool,
}

impl CircToolchain {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            bin: config.circ_path.join("target/release/examples/circ"),
            debug: config.debug,
        }
    }

    /// Serialize the ordered witness schema to the compiler's input format.
    ///
    /// Each declaration becomes a `[visibility, name, type, value]` tuple;
    /// array order IS the positional binding order.
    fn witness_json(witnesses: &[WitnessDeclaration]) -> serde_json::Value {
        let tuples: Vec<serde_json::Value> = witnesses
            .iter()
            .map(|w| json!([w.visibility.as_str(), w.name, w.ty.descriptor(), &w.value]))
            .collect();
        json!(tuples)
    }
}

impl ConstraintCompiler for CircToolchain {
    fn compile(
        &self,
        circuit: &RenderedCircuit,
        witnesses: &[WitnessDeclaration],
        scope: &Path,
    ) -> Result<CompilationResult, CircuitError> {
        // Check before spawning so a bad checkout path reads as a setup
        // problem, not a compiler crash.
        if !self.bin.is_file() {
            return Err(CircuitError::DependencyMissing(format!(
                "circ binary not found: {}",
                self.bin.display()
            )));
        }

        std::fs::write(scope.join(CIRCUIT_FILE), circuit.source())?;
        let witness_bytes = serde_json::to_vec_pretty(&Self::witness_json(witnesses))
            .expect("in-memory serialization");
        std::fs::write(scope.join(WITNESS_FILE), witness_bytes)?;

        let mut command = Command::new(&self.bin);
        command
            .current_dir(scope)
            .args([CIRCUIT_FILE, "r1cs", "--proof-impl", "spartan", "--action", "setup"])
            .args(["--inputs", WITNESS_FILE]);
        if self.debug {
            command.env("RUST_LOG", "debug");
        }

        debug!(step = %circuit.step(), bin = %self.bin.display(), "invoking constraint compiler");
        let output = command.output()?;

        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&output.stderr));
        std::fs::write(scope.join(LOG_FILE), &log)?;

        if !output.status.success() {
            return Err(CircuitError::CompilationFailure(log_tail(&log)));
        }

        Ok(CompilationResult {
            constraints: parse_constraint_count(&log),
            log,
        })
    }
}

fn log_tail(log: &str) -> String {
    let lines: Vec<&str> = log.lines().collect();
    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    lines[start..].join("\n")
}
