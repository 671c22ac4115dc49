//! Circuit parameterization for verifiable neural-network training steps.
//!
//! This crate contains:
//! - Fixed-point quantization of real values into the proof-system field.
//! - The cubic sigmoid approximation evaluated inside the circuits.
//! - Per-step witness schemas (forward / backward / update).
//! - Rendering of parameterized circuit templates into concrete source text.
//! - The adapter boundary to the external constraint compiler.
//!
//! Everything here is pure host-side logic: no process is spawned and no file
//! is written by this crate. The `nn-steps` binary owns working scopes and the
//! external toolchain invocation.

pub mod activation;
pub mod compile;
pub mod config;
pub mod constants;
pub mod errors;
pub mod quantize;
pub mod render;
pub mod steps;
