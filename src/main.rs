mod cli;
mod core;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::run_cmd::RunMode;
use crate::core::logging::{self, LogTarget};

#[derive(Parser)]
#[command(
    name = "cost-report",
    about = "Email a weekly AWS Cost Explorer spend report through SES",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: $COST_REPORT_CONFIG or ~/.config/cost-report/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the report now and email it
    Run {
        /// Query Cost Explorer and print the report without sending
        #[arg(long)]
        dry_run: bool,

        /// Print the email HTML instead of sending
        #[arg(long, conflicts_with = "dry_run")]
        html: bool,
    },
    /// Serve scheduled invocations as an AWS Lambda function
    Lambda,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate the effective config (file plus environment overrides)
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let output_opts = cli::output::OutputOptions {
        format: if cli.json {
            cli::output::OutputFormat::Json
        } else {
            match cli.format.as_deref() {
                Some("json") => cli::output::OutputFormat::Json,
                _ => cli::output::OutputFormat::Text,
            }
        },
        pretty: cli.pretty,
        use_color: cli::output::detect_color(!cli.no_color),
    };

    let serve_lambda = match cli.command {
        Some(Commands::Lambda) => true,
        None => cli::lambda_cmd::running_in_lambda(),
        _ => false,
    };
    let log_target = if serve_lambda {
        LogTarget::Lambda
    } else {
        LogTarget::Terminal
    };
    logging::init(log_target, cli.verbose);

    let config_path = cli.config.as_deref();
    match cli.command {
        Some(Commands::Lambda) => cli::lambda_cmd::serve(cli.config.clone()).await?,
        None if serve_lambda => cli::lambda_cmd::serve(cli.config.clone()).await?,
        None => cli::run_cmd::run(config_path, RunMode::Send, &output_opts).await?,
        Some(Commands::Run { dry_run, html }) => {
            let mode = if html {
                RunMode::Html
            } else if dry_run {
                RunMode::DryRun
            } else {
                RunMode::Send
            };
            cli::run_cmd::run(config_path, mode, &output_opts).await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init(config_path, &output_opts)?,
            ConfigAction::Check => cli::config_cmd::check(config_path, &output_opts)?,
        },
    }

    Ok(())
}
