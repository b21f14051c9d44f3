//! gh-reconcile CLI entrypoint.
//!
//! This is the main entrypoint for the gh-reconcile command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gh_reconcile::cli::{Cli, Commands, OutputFormatter};
use gh_reconcile::config::{
    ConfigParser, ConfigValidator, DesiredState, LocalOverrides, find_config_file,
};
use gh_reconcile::error::Result;
use gh_reconcile::github::GitHubClient;
use gh_reconcile::planner::Category;
use gh_reconcile::reconciler::{PlanOptions, Reconciler};

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit code when `--detailed-exitcode` is set and the plan has changes.
const EXIT_CHANGES: u8 = 2;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    init_logging(cli.verbose, cli.json_logs());

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system. Logs go to stderr so stdout stays
/// parseable; `RUST_LOG` wins over the verbosity flag.
fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<ExitCode> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Validate { warnings } => {
            cmd_validate(cli.config.as_ref(), warnings, &formatter)
        }
        Commands::Plan {
            only,
            sync_delete,
            no_secrets,
            no_variables,
            env_file,
            invert,
            detailed_exitcode,
        } => {
            let options = PlanOptions {
                categories: (!only.is_empty()).then_some(only),
                sync_delete,
                secrets: !no_secrets,
                variables: !no_variables,
            };
            let request = PlanRequest {
                options,
                env_file,
                invert,
                detailed_exitcode,
            };
            cmd_plan(cli.config.as_ref(), request, &formatter).await
        }
    }
}

/// Flags of the `plan` command.
struct PlanRequest {
    options: PlanOptions,
    env_file: PathBuf,
    invert: bool,
    detailed_exitcode: bool,
}

/// Validate command.
fn cmd_validate(
    config_path: Option<&PathBuf>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;

    let result = ConfigValidator::new().check(&config);
    write_stdout(&formatter.format_validation(&result, show_warnings))?;

    Ok(if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Plan command.
async fn cmd_plan(
    config_path: Option<&PathBuf>,
    request: PlanRequest,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let result = ConfigValidator::new().validate(&config)?;
    for warning in &result.warnings {
        debug!("Configuration warning: {warning}");
    }

    let token = ConfigParser::get_github_token()?;
    let mut client = GitHubClient::new(
        &token,
        &config.repository.owner,
        &config.repository.name,
    )?;
    if let Some(url) = ConfigParser::get_api_url() {
        debug!("Using API base URL: {url}");
        client = client.with_base_url(url);
    }

    let overrides = if request.options.includes(Category::Secrets)
        || request.options.includes(Category::Variables)
    {
        LocalOverrides::load(&request.env_file)?
    } else {
        LocalOverrides::empty()
    };

    let report = Reconciler::new(&config, &client, &overrides)
        .with_options(request.options)
        .plan()
        .await;

    let plan = if request.invert {
        report.plan.invert()
    } else {
        report.plan
    };

    write_stdout(&formatter.format_plan(&plan))?;

    if !report.failures.is_empty() {
        eprint!("{}", formatter.format_failures(&report.failures));
        return Ok(ExitCode::FAILURE);
    }

    if request.detailed_exitcode && !plan.is_empty() {
        return Ok(ExitCode::from(EXIT_CHANGES));
    }

    Ok(ExitCode::SUCCESS)
}

/// Loads the configuration file with environment overrides applied.
fn load_config(config_path: Option<&PathBuf>) -> Result<DesiredState> {
    let _ = dotenvy::dotenv();

    let config_file = resolve_config_path(config_path)?;
    debug!("Loading configuration from: {}", config_file.display());

    ConfigParser::new().load_with_env(&config_file)
}

/// Resolves the configuration file path.
fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    config_path.map_or_else(|| find_config_file(Path::new(".")), |path| Ok(path.clone()))
}

/// Writes command output to stdout.
fn write_stdout(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
