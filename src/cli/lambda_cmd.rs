use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

use crate::core::billing::{CostExplorerSource, CostSource};
use crate::core::config::AppConfig;
use crate::core::error::ReportResult;
use crate::core::job::{self, RunSummary};
use crate::core::mailer::{Mailer, SesMailer};

/// Set by the Lambda runtime in every execution environment.
pub const RUNTIME_API_VAR: &str = "AWS_LAMBDA_RUNTIME_API";

pub fn running_in_lambda() -> bool {
    std::env::var(RUNTIME_API_VAR).is_ok()
}

/// Serve invocations until the runtime shuts the process down.
pub async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let config_path = config_path.clone();
        async move { handle(event, config_path).await }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}

/// One scheduled invocation. Clients live for this call only.
async fn handle(event: LambdaEvent<Value>, config_path: Option<PathBuf>) -> Result<RunSummary, Error> {
    info!(request_id = %event.context.request_id, "Cost report invocation");

    let config = AppConfig::load(config_path.as_deref())?;
    let billing = CostExplorerSource::new(&config.report.billing_region).await;
    let mailer = SesMailer::new(&config.email.region).await;

    let summary = invoke(&event.payload, &config, Utc::now().date_naive(), &billing, &mailer).await?;
    Ok(summary)
}

/// The trigger payload (usually an EventBridge schedule event) carries nothing
/// the report needs and is ignored.
async fn invoke(
    _payload: &Value,
    config: &AppConfig,
    today: NaiveDate,
    billing: &dyn CostSource,
    mailer: &dyn Mailer,
) -> ReportResult<RunSummary> {
    job::run_report(config, today, billing, mailer).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::testing::{FakeCostSource, RecordingMailer};
    use crate::core::models::cost::CostSegment;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn billing() -> FakeCostSource {
        FakeCostSource {
            totals: vec![CostSegment {
                total: Decimal::new(105, 1),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn payload_does_not_change_the_report() {
        let config = AppConfig::default();
        let scheduled = json!({
            "source": "aws.events",
            "detail-type": "Scheduled Event",
            "time": "2019-01-01T00:00:00Z",
            "detail": {}
        });

        let mut totals = Vec::new();
        for payload in [json!(null), json!({}), scheduled] {
            let mailer = RecordingMailer::default();
            let summary = invoke(&payload, &config, today(), &billing(), &mailer)
                .await
                .unwrap();
            assert_eq!(mailer.sent.lock().unwrap().len(), 1);
            totals.push(summary.total_cost);
        }
        assert!(totals.iter().all(|t| t == "$10.5"), "{:?}", totals);
    }

    #[tokio::test]
    async fn response_serializes_summary_fields() {
        let config = AppConfig::default();
        let mailer = RecordingMailer::default();

        let summary = invoke(&json!({}), &config, today(), &billing(), &mailer)
            .await
            .unwrap();
        let body = serde_json::to_value(&summary).unwrap();

        assert_eq!(
            body,
            json!({
                "message_id": "msg-1",
                "window": { "start": "2024-06-08", "end": "2024-06-15" },
                "total_cost": "$10.5",
                "rows": 0
            })
        );
    }
}
