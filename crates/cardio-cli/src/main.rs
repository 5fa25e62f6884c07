use anyhow::{Context, Result};
use clap::ArgMatches;
use log::LevelFilter;
use std::path::PathBuf;

use cardio_cli::cli::build_cli;
use cardio_cli::pipeline::input::{record_from_arguments, RunConfig};
use cardio_cli::pipeline::run;

fn main() {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CARDIO_LOG", "error,cardio=info"))
        .init();

    let matches = build_cli().get_matches();

    // every failure, config or pipeline, ends here with exit code 1
    if let Err(e) = dispatch(&matches) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn dispatch(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("preview", sub_m)) => handle_preview(sub_m),
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("form", _)) => {
            run::print_form();
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn run_config(matches: &ArgMatches) -> Result<RunConfig> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    if let Some(path) = config_path {
        log::info!("[cardio] Using config: {:?}", path);
    }
    RunConfig::from_arguments(config_path, matches)
}

fn handle_preview(matches: &ArgMatches) -> Result<()> {
    let config = run_config(matches)?;
    let rows = matches.get_one::<usize>("rows").copied().unwrap_or(5);
    run::run_preview(&config, rows).context("Preview failed")
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let config = run_config(matches)?;

    if config.data.is_none() && config.kaggle_dataset.is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        eprintln!("[cardio] No dataset given; printing a configuration template.");
        println!("{}", default_json);
        return Ok(());
    }

    let session = run::run_training(&config).context("Training failed")?;
    if let Some(model) = session.model() {
        println!(
            "Trained {} on {} rows ({} held out); features: {}",
            model.model_name(),
            model.partition.train.len(),
            model.partition.test.len(),
            model.feature_columns.join(", ")
        );
    }
    Ok(())
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let config = run_config(matches)?;
    let raw = record_from_arguments(matches)?;
    let prediction = run::run_prediction(&config, raw).context("Prediction failed")?;
    println!("Prediction: {}", prediction.label);
    Ok(())
}
