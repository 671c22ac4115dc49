mod circ;
mod orchestrate;

use clap::{Arg, ArgAction, ArgMatches, Command};
use nn_circuits::config::PipelineConfig;
use nn_circuits::errors::CircuitError;
use nn_circuits::steps::StepKind;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("nn-steps")
        .about("Compile neural-network training-step circuits with the CirC toolchain")
        .arg(
            Arg::new("step")
                .long("step")
                .required(true)
                .value_name("STEP")
                .help("forward, backward, update, or all"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON pipeline configuration; missing fields use the defaults"),
        )
        .arg(
            Arg::new("precision")
                .long("precision")
                .value_name("N")
                .value_parser(clap::value_parser!(u64))
                .help("fixed-point scale factor override"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("verbose diagnostics from the external toolchain"),
        )
}

fn load_config(matches: &ArgMatches) -> Result<PipelineConfig, CircuitError> {
    let mut config: PipelineConfig = match matches.get_one::<String>("config") {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)
            .map_err(|e| CircuitError::InvalidConfig(e.to_string()))?,
        None => PipelineConfig::default(),
    };
    if let Some(precision) = matches.get_one::<u64>("precision") {
        config.precision = *precision;
    }
    if matches.get_flag("debug") {
        config.debug = true;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let matches = cli().get_matches();

    // `all` is a runner convenience; individual names go through the parser
    // so an unknown step reports the expected kinds.
    let step_arg = matches.get_one::<String>("step").expect("required by clap");
    let steps: Vec<StepKind> = if step_arg == "all" {
        StepKind::ALL.to_vec()
    } else {
        match step_arg.parse() {
            Ok(step) => vec![step],
            Err(e) => {
                error!("{e}");
                return ExitCode::from(2);
            }
        }
    };

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(2);
        }
    };

    // One isolated scope per step; the external compilations are CPU and
    // process bound, so each runs on a blocking thread.
    let mut handles = Vec::with_capacity(steps.len());
    for step in steps {
        let config = config.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let toolchain = circ::CircToolchain::new(&config);
            orchestrate::run_step(step, &config, &toolchain)
        }));
    }

    let mut failed = false;
    for handle in handles {
        match handle.await {
            Ok(Ok(report)) => match report.constraints {
                Some(count) => println!("{} constraints: {count}", report.step),
                None => warn!(step = %report.step, "constraint count unavailable"),
            },
            Ok(Err(e)) => {
                error!("{e}");
                failed = true;
            }
            Err(e) => {
                error!("step task failed: {e}");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_and_debug_flags_override_the_config() {
        let matches = cli()
            .try_get_matches_from(["nn-steps", "--step", "forward", "--precision", "2000", "--debug"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.precision, 2000);
        assert!(config.debug);
    }

    #[test]
    fn config_files_may_be_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        std::fs::write(&path, r#"{"learning_rate": 25}"#).unwrap();

        let matches = cli()
            .try_get_matches_from(["nn-steps", "--step", "all", "--config", path.to_str().unwrap()])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.learning_rate, 25);
        assert_eq!(config.precision, 1000);
    }

    #[test]
    fn invalid_config_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        std::fs::write(&path, r#"{"precision": 0}"#).unwrap();

        let matches = cli()
            .try_get_matches_from(["nn-steps", "--step", "forward", "--config", path.to_str().unwrap()])
            .unwrap();
        assert!(matches!(
            load_config(&matches).unwrap_err(),
            CircuitError::InvalidConfig(_)
        ));
    }

    #[test]
    fn missing_step_argument_is_a_usage_error() {
        assert!(cli().try_get_matches_from(["nn-steps"]).is_err());
    }
}
