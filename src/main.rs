use chrono::Local;
use clap::{Args, Parser, Subcommand};
use mammo_screen::config::AppConfig;
use mammo_screen::error::AppError;
use mammo_screen::predictor::HttpPredictionService;
use mammo_screen::screening::{
    import, Diagnosis, ExamplePreset, FeatureVector, SubmissionController, SubmissionError,
    SubmitOutcome, ValidationPolicy, FEATURE_NAMES,
};
use mammo_screen::telemetry;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Mammo Screen",
    about = "Validate cell-morphology measurements and interpret classifier predictions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a measurement vector to the prediction service
    Predict(PredictArgs),
    /// List every measurement field with its advisory range and description
    Fields,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Start from a canonical example vector (benign or malignant)
    #[arg(long, value_parser = parse_preset, conflicts_with = "input")]
    preset: Option<ExamplePreset>,
    /// Load measurements from a feature,value CSV export
    #[arg(long)]
    input: Option<PathBuf>,
    /// Override individual fields as name=value (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,
    /// Accept out-of-range values without prompting
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Predict(args) => run_predict(&config, args).await,
        Command::Fields => {
            render_fields(&ValidationPolicy::standard());
            Ok(())
        }
    }
}

fn parse_preset(raw: &str) -> Result<ExamplePreset, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "benign" => Ok(ExamplePreset::Benign),
        "malignant" => Ok(ExamplePreset::Malignant),
        other => Err(format!("unknown preset '{other}', expected benign or malignant")),
    }
}

fn parse_set_arg(raw: &str) -> Result<(&str, &str), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim(), value))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}

fn build_vector(args: &PredictArgs) -> Result<FeatureVector, AppError> {
    let mut vector = match (&args.preset, &args.input) {
        (Some(preset), _) => {
            let mut vector = FeatureVector::new();
            vector.load_preset(*preset);
            vector
        }
        (None, Some(path)) => import::vector_from_path(path)?,
        (None, None) => FeatureVector::new(),
    };

    for assignment in &args.set {
        let (name, value) = parse_set_arg(assignment).map_err(AppError::InvalidArgument)?;
        vector.set_field(name, value)?;
    }

    Ok(vector)
}

async fn run_predict(config: &AppConfig, args: PredictArgs) -> Result<(), AppError> {
    let vector = build_vector(&args)?;
    let service = HttpPredictionService::new(&config.predictor)?;
    let mut controller = SubmissionController::new(service);

    info!(endpoint = %config.predictor.endpoint, "submitting measurement vector");

    let mut outcome = controller.submit(&vector).await;
    if let SubmitOutcome::ConfirmationRequired { out_of_range } = &outcome {
        render_out_of_range(controller.policy(), &vector, out_of_range);
        if args.yes || confirm_on_stdin()? {
            outcome = controller.confirm_override(&vector).await;
        } else {
            controller.cancel_override();
            println!("Submission cancelled; no request was sent.");
            return Ok(());
        }
    }

    conclude(outcome)
}

/// Render the attempt's outcome and fold failures into the single error
/// path `main` exits through.
fn conclude(outcome: SubmitOutcome) -> Result<(), AppError> {
    match outcome {
        SubmitOutcome::Blocked { missing } => {
            println!("Cannot submit: {} field(s) are empty.", missing.len());
            for name in &missing {
                println!("- {name}");
            }
            Err(AppError::Submission(SubmissionError::IncompleteInput {
                fields: missing,
            }))
        }
        SubmitOutcome::Completed(diagnosis) => {
            render_report(&diagnosis);
            Ok(())
        }
        SubmitOutcome::Failed(err) => Err(AppError::Submission(err)),
        SubmitOutcome::Busy => {
            // Single-shot CLI never has a second in-flight attempt.
            println!("A submission is already in progress.");
            Ok(())
        }
        SubmitOutcome::ConfirmationRequired { .. } => {
            println!("Submission still requires confirmation; nothing was sent.");
            Ok(())
        }
    }
}

fn confirm_on_stdin() -> Result<bool, AppError> {
    print!("Submit anyway? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn render_out_of_range(policy: &ValidationPolicy, vector: &FeatureVector, names: &[&'static str]) {
    println!("{} value(s) fall outside their typical range:", names.len());
    for name in names {
        let raw = vector.field(name).unwrap_or("");
        println!("- {name} = {raw} ({})", policy.describe(name, raw));
    }
}

fn render_fields(policy: &ValidationPolicy) {
    println!("Measurement fields");
    for name in FEATURE_NAMES {
        match policy.rule(name) {
            Some(rule) => println!(
                "- {name}: [{} .. {}] {}",
                rule.range.0, rule.range.1, rule.description
            ),
            None => println!("- {name}: unconstrained"),
        }
    }
}

fn render_report(diagnosis: &Diagnosis) {
    println!(
        "Diagnosis report (generated {})",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    println!("Predicted class: {}", diagnosis.predicted_class);
    println!(
        "Benign probability: {:.2}%",
        diagnosis.benign_probability * 100.0
    );
    println!(
        "Malignant probability: {:.2}%",
        diagnosis.malignant_probability * 100.0
    );

    if diagnosis.is_malignant {
        println!("\nWARNING: consult a specialist urgently.");
    }

    if diagnosis.top_features.is_empty() {
        println!("\nMost relevant characteristics: not reported");
    } else {
        println!("\nMost relevant characteristics");
        for feature in &diagnosis.top_features {
            println!(
                "- {}: {:.1}%",
                feature.display_name, feature.importance_percent
            );
        }
    }

    println!("\nInterpretation");
    println!("{}", diagnosis.narrative.headline);
    for recommendation in diagnosis.narrative.recommendations {
        println!("- {recommendation}");
    }
    println!("{}", diagnosis.narrative.precision_note);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_parsing_is_case_insensitive() {
        assert_eq!(parse_preset("Benign"), Ok(ExamplePreset::Benign));
        assert_eq!(parse_preset(" MALIGNANT "), Ok(ExamplePreset::Malignant));
        assert!(parse_preset("unknown").is_err());
    }

    #[test]
    fn set_arguments_split_on_the_first_equals() {
        assert_eq!(parse_set_arg("radius_mean=15"), Ok(("radius_mean", "15")));
        assert_eq!(parse_set_arg("texture_mean="), Ok(("texture_mean", "")));
        assert!(parse_set_arg("no-equals").is_err());
        assert!(parse_set_arg("=5").is_err());
    }

    #[test]
    fn malformed_set_arguments_become_invalid_argument_errors() {
        let args = PredictArgs {
            preset: None,
            input: None,
            set: vec!["no-equals".to_string()],
            yes: false,
        };

        match build_vector(&args) {
            Err(AppError::InvalidArgument(message)) => {
                assert!(message.contains("no-equals"));
            }
            other => panic!("expected an invalid-argument error, got {other:?}"),
        }
    }

    #[test]
    fn blocked_and_failed_outcomes_flow_through_the_error_path() {
        let blocked = conclude(SubmitOutcome::Blocked {
            missing: vec!["radius_mean"],
        });
        assert!(matches!(
            blocked,
            Err(AppError::Submission(SubmissionError::IncompleteInput { .. }))
        ));

        let failed = conclude(SubmitOutcome::Failed(SubmissionError::IncompleteInput {
            fields: vec!["texture_se"],
        }));
        assert!(matches!(failed, Err(AppError::Submission(_))));
    }

    #[test]
    fn build_vector_applies_preset_then_overrides() {
        let args = PredictArgs {
            preset: Some(ExamplePreset::Benign),
            input: None,
            set: vec!["radius_mean=99".to_string()],
            yes: false,
        };

        let vector = build_vector(&args).expect("vector builds");
        assert_eq!(vector.field("radius_mean"), Some("99"));
        assert_eq!(vector.field("texture_mean"), Some("14.36"));
    }
}
