//! Per-step compilation pipeline.
//!
//! `run_step` drives one step through its stages: initialize the working
//! scope, render the circuit, compile, report. The first error is terminal;
//! there are no retries because every input is fixed for the invocation.

use nn_circuits::compile::ConstraintCompiler;
use nn_circuits::config::PipelineConfig;
use nn_circuits::errors::CircuitError;
use nn_circuits::render::{self, TemplateSet};
use nn_circuits::steps::{witnesses_for, StepKind};
use std::path::Path;
use tracing::{info, warn};

/// Outcome of one compiled step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub step: StepKind,
    /// `None` when the compiler succeeded but reported no size line.
    pub constraints: Option<u64>,
}

/// Compile one step inside its own scope under `config.working_dir`.
///
/// Library staging runs first: a missing standard library aborts before any
/// rendering, so the compiler is never invoked against a scope it cannot
/// resolve imports in.
pub fn run_step(
    step: StepKind,
    config: &PipelineConfig,
    compiler: &impl ConstraintCompiler,
) -> Result<StepReport, CircuitError> {
    config.validate()?;

    let scope = config.working_dir.join(step.name());
    std::fs::create_dir_all(&scope)?;
    stage_libraries(config, &scope)?;

    let templates = match &config.template_dir {
        Some(dir) => TemplateSet::from_dir(dir)?,
        None => TemplateSet::builtin(),
    };
    let circuit = render::render(step, config, &templates)?;
    let witnesses = witnesses_for(step, &config.shape, config.precision);

    info!(%step, scope = %scope.display(), witnesses = witnesses.len(), "compiling step");
    let result = compiler.compile(&circuit, &witnesses, &scope)?;

    match result.constraints {
        Some(count) => info!(%step, constraints = count, "step compiled"),
        None => warn!(%step, "step compiled but the log carried no constraint count"),
    }

    Ok(StepReport {
        step,
        constraints: result.constraints,
    })
}

/// Stage the circuit libraries the rendered source imports.
///
/// The Poseidon gadget tree is optional; the standard library is required
/// and its absence is a `DependencyMissing` error.
fn stage_libraries(config: &PipelineConfig, scope: &Path) -> Result<(), CircuitError> {
    if let Some(poseidon) = &config.poseidon_dir {
        if poseidon.is_dir() {
            copy_tree(poseidon, &scope.join("poseidon"))?;
        }
    }

    if !config.stdlib_dir.is_dir() {
        return Err(CircuitError::DependencyMissing(format!(
            "standard circuit library not found: {}",
            config.stdlib_dir.display()
        )));
    }
    copy_tree(&config.stdlib_dir, &scope.join("stdlib"))
}

/// Copy a directory tree, overwriting files that already exist.
///
/// Re-running a step against the same scope restages the libraries instead
/// of failing on leftovers from the previous run.
fn copy_tree(src: &Path, dst: &Path) -> Result<(), CircuitError> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
