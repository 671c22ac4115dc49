//! Circuit source rendering.
//!
//! Each step has one template with `{{name}}` placeholders. Rendering binds
//! the full variable set (shape, precision, learning rate, model constants,
//! activation coefficients) regardless of which placeholders a template
//! actually uses, so a template override never changes the binding contract.
//! Rendering is pure: identical config and templates produce byte-identical
//! source.

use crate::activation;
use crate::config::PipelineConfig;
use crate::errors::CircuitError;
use crate::quantize;
use crate::steps::StepKind;
use std::collections::BTreeMap;
use std::path::Path;

/// The three step templates, resolved once per pipeline invocation.
#[derive(Clone, Debug)]
pub struct TemplateSet {
    forward: String,
    backward: String,
    update: String,
}

impl TemplateSet {
    /// Templates compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            forward: include_str!("../templates/forward.zok.tmpl").to_string(),
            backward: include_str!("../templates/backward.zok.tmpl").to_string(),
            update: include_str!("../templates/update.zok.tmpl").to_string(),
        }
    }

    /// Load `{step}.zok.tmpl` for every step from `dir`.
    ///
    /// The set is all-or-nothing: a directory override replaces every
    /// template, and a missing file is `TemplateNotFound` for that step.
    pub fn from_dir(dir: &Path) -> Result<Self, CircuitError> {
        let read = |step: StepKind| -> Result<String, CircuitError> {
            let path = dir.join(format!("{step}.zok.tmpl"));
            if !path.is_file() {
                return Err(CircuitError::TemplateNotFound(step));
            }
            Ok(std::fs::read_to_string(path)?)
        };
        Ok(Self {
            forward: read(StepKind::Forward)?,
            backward: read(StepKind::Backward)?,
            update: read(StepKind::Update)?,
        })
    }

    pub fn get(&self, step: StepKind) -> &str {
        match step {
            StepKind::Forward => &self.forward,
            StepKind::Backward => &self.backward,
            StepKind::Update => &self.update,
        }
    }
}

/// Circuit source for one step, ready to hand to the constraint compiler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedCircuit {
    step: StepKind,
    source: String,
}

impl RenderedCircuit {
    pub fn step(&self) -> StepKind {
        self.step
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Render the circuit source for `step`.
///
/// Model constants pass through the quantizer's sign-bound validation before
/// they are baked in, so an out-of-range weight fails here instead of
/// producing a circuit the compiler accepts but the prover cannot decode.
pub fn render(
    step: StepKind,
    config: &PipelineConfig,
    templates: &TemplateSet,
) -> Result<RenderedCircuit, CircuitError> {
    let source = substitute(templates.get(step), &bindings(config)?)?;
    Ok(RenderedCircuit { step, source })
}

fn bindings(config: &PipelineConfig) -> Result<BTreeMap<&'static str, String>, CircuitError> {
    let precision = config.precision;
    let coefficients = activation::coefficients(precision)?;

    let literal = |value: i64| -> Result<String, CircuitError> {
        Ok(quantize::encode(value as i128, precision)?.literal())
    };
    let vector = |values: &[i64]| -> Result<String, CircuitError> {
        let rendered: Vec<String> = values.iter().map(|&v| literal(v)).collect::<Result<_, _>>()?;
        Ok(format!("[{}]", rendered.join(", ")))
    };
    let matrix = |rows: &[Vec<i64>]| -> Result<String, CircuitError> {
        let rendered: Vec<String> = rows.iter().map(|row| vector(row)).collect::<Result<_, _>>()?;
        Ok(format!("[{}]", rendered.join(", ")))
    };

    let mut vars = BTreeMap::new();
    vars.insert("precision", precision.to_string());
    vars.insert("no_features", config.shape.features.to_string());
    vars.insert("no_neurons", config.shape.neurons.to_string());
    vars.insert("lr", config.learning_rate.to_string());
    vars.insert("w0", matrix(&config.weights.w0)?);
    vars.insert("b0", vector(&config.weights.b0)?);
    vars.insert("w1", vector(&config.weights.w1)?);
    vars.insert("b1", literal(config.weights.b1)?);
    vars.insert("W0", coefficients.w0.literal());
    vars.insert("W1S", coefficients.w1s.literal());
    vars.insert("W3", coefficients.w3.literal());
    Ok(vars)
}

/// Replace every `{{name}}` placeholder with its bound value.
///
/// An unbound name or an unterminated placeholder is a `Substitution` error;
/// silently leaving `{{` in circuit source would surface as an opaque parse
/// failure in the external compiler.
fn substitute(
    template: &str,
    vars: &BTreeMap<&'static str, String>,
) -> Result<String, CircuitError> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| {
            CircuitError::Substitution("unterminated `{{` placeholder".to_string())
        })?;
        let name = after[..end].trim();
        let value = vars.get(name).ok_or_else(|| {
            CircuitError::Substitution(format!("no binding for `{name}`"))
        })?;
        output.push_str(value);
        rest = &after[end + 2..];
    }
    output.push_str(rest);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepKind;

    #[test]
    fn builtin_templates_render_without_leftover_placeholders() {
        let config = PipelineConfig::default();
        let templates = TemplateSet::builtin();
        for step in StepKind::ALL {
            let circuit = render(step, &config, &templates).unwrap();
            assert_eq!(circuit.step(), step);
            assert!(
                !circuit.source().contains("{{"),
                "{step} still has placeholders"
            );
            assert!(!circuit.source().is_empty());
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = PipelineConfig::default();
        let templates = TemplateSet::builtin();
        let a = render(StepKind::Forward, &config, &templates).unwrap();
        let b = render(StepKind::Forward, &config, &templates).unwrap();
        assert_eq!(a.source(), b.source());
    }

    #[test]
    fn demo_weights_are_baked_in_as_literals() {
        let config = PipelineConfig::default();
        let circuit = render(StepKind::Forward, &config, &TemplateSet::builtin()).unwrap();
        assert!(circuit.source().contains("[[1, 2], [3, 4]]"));
        assert!(circuit.source().contains("[5, 6]"));
        assert!(circuit.source().contains("1000"));
    }

    #[test]
    fn negative_weights_render_as_field_representatives() {
        let mut config = PipelineConfig::default();
        config.weights.b1 = -3;
        let circuit = render(StepKind::Forward, &config, &TemplateSet::builtin()).unwrap();
        let encoded = quantize::encode(-3, config.precision).unwrap().literal();
        assert!(circuit.source().contains(&encoded));
        assert!(!circuit.source().contains("-3"));
    }

    #[test]
    fn unbound_placeholders_are_rejected() {
        let vars = bindings(&PipelineConfig::default()).unwrap();
        assert!(matches!(
            substitute("x = {{ nonsense }}", &vars),
            Err(CircuitError::Substitution(_))
        ));
        assert!(matches!(
            substitute("x = {{precision", &vars),
            Err(CircuitError::Substitution(_))
        ));
    }

    #[test]
    fn placeholder_whitespace_is_insignificant() {
        let vars = bindings(&PipelineConfig::default()).unwrap();
        let tight = substitute("p = {{precision}}", &vars).unwrap();
        let spaced = substitute("p = {{ precision }}", &vars).unwrap();
        assert_eq!(tight, spaced);
        assert_eq!(tight, "p = 1000");
    }

    #[test]
    fn missing_template_files_name_the_step() {
        let err = TemplateSet::from_dir(Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, CircuitError::TemplateNotFound(StepKind::Forward)));
    }
}
