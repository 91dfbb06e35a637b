use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::cli::output::{to_json, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::billing::CostExplorerSource;
use crate::core::config::AppConfig;
use crate::core::html::render_document;
use crate::core::job;
use crate::core::mailer::SesMailer;

/// What `run` should do with the assembled report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Send,
    /// Query and print, never send.
    DryRun,
    /// Query and print the email body, never send.
    Html,
}

pub async fn run(config_path: Option<&Path>, mode: RunMode, opts: &OutputOptions) -> Result<()> {
    let config = AppConfig::load(config_path).context("Failed to load configuration")?;
    let today = Utc::now().date_naive();
    let billing = CostExplorerSource::new(&config.report.billing_region).await;

    match mode {
        RunMode::Send => {
            let mailer = SesMailer::new(&config.email.region).await;
            let summary = job::run_report(&config, today, &billing, &mailer).await?;
            match opts.format {
                OutputFormat::Json => println!("{}", to_json(&summary, opts)?),
                OutputFormat::Text => println!(
                    "Sent cost report for {} ({}, {} rows) as message {}",
                    summary.window, summary.total_cost, summary.rows, summary.message_id
                ),
            }
        }
        RunMode::DryRun => {
            let report = job::collect_report(&config, today, &billing).await?;
            match opts.format {
                OutputFormat::Json => println!("{}", to_json(&report, opts)?),
                OutputFormat::Text => {
                    println!("{}", renderer::render_report(&report, opts.use_color))
                }
            }
        }
        RunMode::Html => {
            let report = job::collect_report(&config, today, &billing).await?;
            print!(
                "{}",
                render_document(&report, &config.report.account_label, &config.report.caption)
            );
        }
    }

    Ok(())
}
