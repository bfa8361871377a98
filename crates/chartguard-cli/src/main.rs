mod logging;
mod settings;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use chartguard_contrast::{audit_palette, check_compliance, TextSize, WcagLevel};
use chartguard_core::Error as CoreError;
use chartguard_validate::{
    chart_payload_json_schema, sanitize_chart_label, sanitize_file_name,
    sanitize_tooltip_content, ChartValidator, UrlPolicy,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use logging::{init_logging, LoggingError};
use serde::Serialize;
use settings::{load_settings, Settings, SettingsError};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "chartguard",
    version,
    about = "WCAG contrast checks and chart payload validation"
)]
struct Cli {
    /// Settings file (defaults to ./chartguard.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    /// Enable debug logging.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the contrast of a foreground/background pair.
    Contrast(ContrastArgs),
    /// Check every palette color against a background.
    Palette(PaletteArgs),
    /// Validate a chart payload JSON file ("-" reads stdin).
    Validate(ValidateArgs),
    /// Sanitize a single untrusted value.
    Sanitize(SanitizeArgs),
    /// Print the JSON Schema of a normalized chart payload.
    Schema,
}

#[derive(Args, Debug)]
struct WcagArgs {
    /// Conformance level (AA or AAA).
    #[arg(long)]
    level: Option<WcagLevel>,
    /// Text size (normal or large).
    #[arg(long)]
    size: Option<TextSize>,
}

#[derive(Args, Debug)]
struct ContrastArgs {
    foreground: String,
    background: String,
    #[command(flatten)]
    wcag: WcagArgs,
}

#[derive(Args, Debug)]
struct PaletteArgs {
    background: String,
    #[arg(required = true)]
    colors: Vec<String>,
    #[command(flatten)]
    wcag: WcagArgs,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(value_name = "FILE")]
    input: String,
    /// Strip markup from text cells and the description.
    #[arg(long, default_value_t = false)]
    sanitize_text: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SanitizeKind {
    Label,
    Tooltip,
    Url,
    FileName,
}

#[derive(Args, Debug)]
struct SanitizeArgs {
    kind: SanitizeKind,
    input: String,
    /// Allowed domain for `url`; replaces the configured allow-list.
    #[arg(long = "allow-domain", value_name = "DOMAIN")]
    allow_domains: Vec<String>,
    /// Accept plain http URLs.
    #[arg(long, default_value_t = false)]
    allow_http: bool,
}

fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_json, cli.verbose)?;
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Contrast(args) => run_contrast(args, &settings),
        Command::Palette(args) => run_palette(args, &settings),
        Command::Validate(args) => run_validate(args, &settings),
        Command::Sanitize(args) => run_sanitize(args, &settings),
        Command::Schema => {
            print_json(&chart_payload_json_schema())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_contrast(args: ContrastArgs, settings: &Settings) -> Result<ExitCode, CliError> {
    let (level, size) = resolve_wcag(&args.wcag, settings);
    let result = check_compliance(&args.foreground, &args.background, level, size)?;
    tracing::info!(
        event = "contrast_checked",
        ratio = result.ratio,
        passes = result.passes
    );
    print_json(&result)?;
    Ok(exit_status(result.passes))
}

fn run_palette(args: PaletteArgs, settings: &Settings) -> Result<ExitCode, CliError> {
    let (level, size) = resolve_wcag(&args.wcag, settings);
    let audit = audit_palette(args.colors.as_slice(), &args.background, level, size)?;
    print_json(&audit)?;
    Ok(exit_status(audit.all_pass()))
}

fn run_validate(args: ValidateArgs, settings: &Settings) -> Result<ExitCode, CliError> {
    let content = read_input(&args.input)?;
    let payload: serde_json::Value = serde_json::from_str(&content)?;

    let mut schema = settings.limits.clone();
    schema.sanitize_text |= args.sanitize_text;
    let outcome = ChartValidator::new(schema).validate(&payload);

    tracing::info!(
        event = "payload_validated",
        input = %args.input,
        valid = outcome.is_valid(),
        errors = outcome.errors().len()
    );
    print_json(&outcome)?;
    Ok(exit_status(outcome.is_valid()))
}

fn run_sanitize(args: SanitizeArgs, settings: &Settings) -> Result<ExitCode, CliError> {
    let sanitized = match args.kind {
        SanitizeKind::Label => sanitize_chart_label(&args.input),
        SanitizeKind::Tooltip => sanitize_tooltip_content(&args.input),
        SanitizeKind::FileName => sanitize_file_name(&args.input)?,
        SanitizeKind::Url => {
            let policy = url_policy(&args, settings);
            policy.sanitize_url(&args.input)?
        }
    };
    println!("{sanitized}");
    Ok(ExitCode::SUCCESS)
}

fn url_policy(args: &SanitizeArgs, settings: &Settings) -> UrlPolicy {
    let mut policy = settings.url.clone();
    if !args.allow_domains.is_empty() {
        policy.allowed_domains = args.allow_domains.clone();
    }
    if args.allow_http {
        policy.require_https = false;
    }
    policy
}

fn resolve_wcag(args: &WcagArgs, settings: &Settings) -> (WcagLevel, TextSize) {
    (
        args.level.unwrap_or(settings.wcag.level),
        args.size.unwrap_or(settings.wcag.size),
    )
}

fn read_input(input: &str) -> Result<String, CliError> {
    let read_error = |source: std::io::Error| CliError::Read {
        path: input.to_string(),
        source,
    };
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(read_error)?;
        Ok(content)
    } else {
        std::fs::read_to_string(input).map_err(read_error)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_status(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
