use clap::{Arg, ArgAction, Command, ValueHint};
use std::path::PathBuf;

fn data_args() -> Vec<Arg> {
    vec![
        Arg::new("config")
            .short('c')
            .long("config")
            .help("Path to a pipeline JSON configuration file")
            .value_parser(clap::value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath),
        Arg::new("data")
            .short('d')
            .long("data")
            .value_parser(clap::builder::NonEmptyStringValueParser::new())
            .help(
                "Path to a CSV/TSV dataset. Overrides the data file \
                 specified in the configuration file.",
            )
            .value_hint(ValueHint::FilePath)
            .conflicts_with("kaggle"),
        Arg::new("kaggle")
            .short('k')
            .long("kaggle")
            .value_parser(clap::builder::NonEmptyStringValueParser::new())
            .help(
                "Kaggle dataset as owner/name. Credentials come from KAGGLE_USERNAME/KAGGLE_KEY \
                 or kaggle.json.",
            )
            .value_hint(ValueHint::Other),
        Arg::new("label")
            .long("label")
            .value_parser(clap::builder::NonEmptyStringValueParser::new())
            .help("Name of the label column.")
            .value_hint(ValueHint::Other),
    ]
}

fn pipeline_args() -> Vec<Arg> {
    vec![
        Arg::new("normalize")
            .short('n')
            .long("normalize")
            .help("Numeric columns to min-max normalize (comma separated or repeated).")
            .value_delimiter(',')
            .action(ArgAction::Append)
            .value_hint(ValueHint::Other),
        Arg::new("nan_policy")
            .long("nan-policy")
            .help("Missing value handling.")
            .value_parser(["drop-rows", "fill-mean"])
            .value_hint(ValueHint::Other),
        Arg::new("test_fraction")
            .long("test-fraction")
            .help("Share of rows held out from training, in [0, 1).")
            .value_parser(clap::value_parser!(f64)),
        Arg::new("seed")
            .long("seed")
            .help("Seed of the train/test partition.")
            .value_parser(clap::value_parser!(u64)),
        Arg::new("model_type")
            .long("model-type")
            .help("Override the model type from the JSON config.")
            .value_parser(["gbdt"])
            .value_hint(ValueHint::Other),
    ]
}

pub fn build_cli() -> Command {
    Command::new("cardio")
        .version(clap::crate_version!())
        .about("\u{2764} cardio - Heart Disease preprocessing, training and prediction")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("preview")
                .about("Load a dataset and show its first rows, column roles and missing values")
                .args(data_args())
                .arg(
                    Arg::new("rows")
                        .long("rows")
                        .help("Number of rows to show.")
                        .default_value("5")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("train")
                .about("Preprocess a dataset and train a classifier on it")
                .args(data_args())
                .args(pipeline_args()),
        )
        .subcommand(
            Command::new("predict")
                .about("Train on a dataset, then predict one record from form answers")
                .args(data_args())
                .args(pipeline_args())
                .arg(
                    Arg::new("field")
                        .short('f')
                        .long("field")
                        .help("Form answer as name=value. Repeat for every field.")
                        .action(ArgAction::Append)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("fields_json")
                        .long("fields-json")
                        .help("JSON object of form answers. --field values take precedence.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(Command::new("form").about("List the Heart Disease form fields"))
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}
