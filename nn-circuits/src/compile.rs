//! Constraint-compiler boundary.
//!
//! The core crate never spawns the external toolchain itself; it defines the
//! [`ConstraintCompiler`] seam and the log scraping that turns a compiler run
//! into a [`CompilationResult`]. The binary crate provides the real adapter,
//! tests provide fakes.

use crate::errors::CircuitError;
use crate::render::RenderedCircuit;
use crate::steps::WitnessDeclaration;
use std::path::Path;

/// Marker line the external compiler prints once the R1CS is finalized.
pub const R1CS_SIZE_MARKER: &str = "final R1CS size:";

/// Outcome of one successful compiler run.
///
/// `constraints` is `None` when the run succeeded but the log carried no
/// parseable size line. That is a reporting gap, not a failure; the compiled
/// artifacts in the scope are still valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilationResult {
    pub constraints: Option<u64>,
    pub log: String,
}

/// Compiles one rendered circuit inside a prepared working scope.
///
/// Implementations may assume the scope already holds the staged circuit
/// libraries; they are responsible for materializing the circuit source and
/// witness file and for running the compiler.
pub trait ConstraintCompiler {
    fn compile(
        &self,
        circuit: &RenderedCircuit,
        witnesses: &[WitnessDeclaration],
        scope: &Path,
    ) -> Result<CompilationResult, CircuitError>;
}

/// Scrape the constraint count from a compiler log.
///
/// The first marker line wins; anything after the marker is trimmed and
/// parsed as a decimal count. A missing or malformed line yields `None`.
pub fn parse_constraint_count(log: &str) -> Option<u64> {
    log.lines()
        .find_map(|line| line.split_once(R1CS_SIZE_MARKER))
        .and_then(|(_, tail)| tail.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_size_line() {
        let log = "reading circuit.zok\nfinal R1CS size: 4096\nsetup done\n";
        assert_eq!(parse_constraint_count(log), Some(4096));
    }

    #[test]
    fn first_marker_line_wins() {
        let log = "final R1CS size: 12\nfinal R1CS size: 99\n";
        assert_eq!(parse_constraint_count(log), Some(12));
    }

    #[test]
    fn missing_marker_yields_none() {
        assert_eq!(parse_constraint_count(""), None);
        assert_eq!(parse_constraint_count("setup done\n"), None);
    }

    #[test]
    fn malformed_counts_yield_none() {
        assert_eq!(parse_constraint_count("final R1CS size: lots\n"), None);
        assert_eq!(parse_constraint_count("final R1CS size:\n"), None);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert_eq!(parse_constraint_count("  final R1CS size:   77  \n"), Some(77));
    }
}
