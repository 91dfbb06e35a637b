use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::core::aggregate::build_report;
use crate::core::billing::CostSource;
use crate::core::config::AppConfig;
use crate::core::error::{ReportError, ReportResult};
use crate::core::html::render_document;
use crate::core::mailer::{Mailer, OutboundEmail};
use crate::core::models::cost::CostQuery;
use crate::core::models::report::Report;
use crate::core::models::window::DateWindow;

/// What a completed invocation reports back.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub message_id: String,
    pub window: DateWindow,
    pub total_cost: String,
    pub rows: usize,
}

/// Query both views of the window and assemble the report. Nothing is sent.
pub async fn collect_report(
    config: &AppConfig,
    today: NaiveDate,
    billing: &dyn CostSource,
) -> ReportResult<Report> {
    let issues = config.validate();
    if !issues.is_empty() {
        return Err(ReportError::Config(issues));
    }

    let window = DateWindow::trailing(today, config.report.lookback_days);
    info!(%window, "Querying Cost Explorer");

    let totals = billing
        .cost_and_usage(&CostQuery::total(window.start_str(), window.end_str()))
        .await?;
    let detail = billing
        .cost_and_usage(&CostQuery::by_service_and_usage(
            window.start_str(),
            window.end_str(),
        ))
        .await?;

    let report = build_report(window, &totals, &detail, &config.report.currency_symbol);
    info!(
        total_segments = totals.len(),
        detail_segments = detail.len(),
        total_cost = %report.total_cost,
        rows = report.rows.len(),
        estimated = report.estimated,
        "Report assembled"
    );
    Ok(report)
}

pub fn compose_email(config: &AppConfig, report: &Report) -> OutboundEmail {
    OutboundEmail {
        sender: config.email.sender.clone(),
        recipients: config.email.recipients.clone(),
        subject: config.email.subject.clone(),
        html_body: render_document(report, &config.report.account_label, &config.report.caption),
    }
}

/// Run the whole job once: query, aggregate, render, send one email.
pub async fn run_report(
    config: &AppConfig,
    today: NaiveDate,
    billing: &dyn CostSource,
    mailer: &dyn Mailer,
) -> ReportResult<RunSummary> {
    let report = collect_report(config, today, billing).await?;
    let email = compose_email(config, &report);

    let message_id = mailer.send(&email).await?;
    info!(
        %message_id,
        recipients = email.recipients.len(),
        "Cost report sent"
    );

    Ok(RunSummary {
        message_id,
        window: report.window,
        total_cost: report.total_cost,
        rows: report.rows.len(),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::core::billing::CostSource;
    use crate::core::error::{ReportError, ReportResult};
    use crate::core::mailer::{Mailer, OutboundEmail};
    use crate::core::models::cost::{CostQuery, CostSegment};

    /// Answers total and grouped queries from canned segments and records every query.
    #[derive(Default)]
    pub struct FakeCostSource {
        pub totals: Vec<CostSegment>,
        pub detail: Vec<CostSegment>,
        pub fail: bool,
        pub queries: Mutex<Vec<CostQuery>>,
    }

    #[async_trait]
    impl CostSource for FakeCostSource {
        async fn cost_and_usage(&self, query: &CostQuery) -> ReportResult<Vec<CostSegment>> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(ReportError::Billing("AccessDeniedException".into()));
            }
            if query.group_by.is_empty() {
                Ok(self.totals.clone())
            } else {
                Ok(self.detail.clone())
            }
        }
    }

    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<OutboundEmail>>,
        pub fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutboundEmail) -> ReportResult<String> {
            if self.fail {
                return Err(ReportError::Email("MessageRejected".into()));
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push(email.clone());
            Ok(format!("msg-{}", sent.len()))
        }
    }
}
