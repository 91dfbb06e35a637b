//! Cost Explorer access.
//!
//! The rest of the crate only sees [`CostSource`]; [`CostExplorerSource`] is the
//! AWS-backed implementation.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::operation::get_cost_and_usage::GetCostAndUsageOutput;
use aws_sdk_costexplorer::types::{
    DateInterval, Granularity, GroupDefinition, GroupDefinitionType, MetricValue, ResultByTime,
};
use aws_sdk_costexplorer::Client;
use rust_decimal::Decimal;
use tracing::debug;

use crate::core::error::{ReportError, ReportResult};
use crate::core::models::cost::{CostQuery, CostSegment, GroupedCost, UNBLENDED_COST};

/// Issues `GetCostAndUsage` requests at monthly granularity for the unblended cost metric.
#[async_trait]
pub trait CostSource: Send + Sync {
    /// Return every time segment for the query, in API order.
    async fn cost_and_usage(&self, query: &CostQuery) -> ReportResult<Vec<CostSegment>>;
}

pub struct CostExplorerSource {
    client: Client,
}

impl CostExplorerSource {
    /// Build a client from the ambient credential chain, pinned to `region`.
    pub async fn new(region: &str) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl CostSource for CostExplorerSource {
    async fn cost_and_usage(&self, query: &CostQuery) -> ReportResult<Vec<CostSegment>> {
        let period = DateInterval::builder()
            .start(&query.start)
            .end(&query.end)
            .build()
            .map_err(|e| ReportError::Billing(e.to_string()))?;

        let group_by: Vec<GroupDefinition> = query
            .group_by
            .iter()
            .map(|dim| {
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key(dim.key())
                    .build()
            })
            .collect();

        let mut segments = Vec::new();
        let mut next_page: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get_cost_and_usage()
                .time_period(period.clone())
                .granularity(Granularity::Monthly)
                .metrics(UNBLENDED_COST)
                .set_next_page_token(next_page.take());
            if !group_by.is_empty() {
                request = request.set_group_by(Some(group_by.clone()));
            }

            let output = request
                .send()
                .await
                .map_err(|e| ReportError::Billing(DisplayErrorContext(&e).to_string()))?;

            let token = absorb_page(&output, &mut segments)?;

            debug!(
                start = %query.start,
                end = %query.end,
                grouped = !group_by.is_empty(),
                segments = segments.len(),
                "Cost Explorer page received"
            );

            match token {
                Some(token) => next_page = Some(token),
                None => break,
            }
        }

        Ok(segments)
    }
}

/// Append a page's segments and return the token for the next page, if any.
/// An empty token ends pagination.
fn absorb_page(
    output: &GetCostAndUsageOutput,
    segments: &mut Vec<CostSegment>,
) -> ReportResult<Option<String>> {
    for result in output.results_by_time() {
        segments.push(segment_from_result(result)?);
    }
    Ok(output
        .next_page_token()
        .filter(|token| !token.is_empty())
        .map(String::from))
}

fn segment_from_result(result: &ResultByTime) -> ReportResult<CostSegment> {
    let (start, end) = result
        .time_period()
        .map(|p| (p.start().to_string(), p.end().to_string()))
        .unwrap_or_default();

    // Grouped queries leave Total empty and put the cost on each group.
    let total = match result.total() {
        Some(metrics) if !metrics.is_empty() => unblended_amount(metrics)?,
        _ => Decimal::ZERO,
    };

    let groups = result
        .groups()
        .iter()
        .map(|group| {
            let metrics = group.metrics().ok_or_else(|| {
                ReportError::MalformedResponse(format!(
                    "group {:?} in period starting {} has no metrics",
                    group.keys(),
                    start
                ))
            })?;
            Ok(GroupedCost {
                keys: group.keys().to_vec(),
                amount: unblended_amount(metrics)?,
            })
        })
        .collect::<ReportResult<Vec<_>>>()?;

    Ok(CostSegment {
        start,
        end,
        total,
        estimated: result.estimated(),
        groups,
    })
}

fn unblended_amount(metrics: &HashMap<String, MetricValue>) -> ReportResult<Decimal> {
    let raw = metrics
        .get(UNBLENDED_COST)
        .and_then(|m| m.amount())
        .ok_or_else(|| {
            ReportError::MalformedResponse(format!("{} amount missing", UNBLENDED_COST))
        })?;
    parse_amount(raw)
}

/// Cost Explorer sends amounts as decimal strings, sometimes in exponent form.
pub fn parse_amount(raw: &str) -> ReportResult<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| ReportError::MalformedResponse(format!("unparsable amount '{}'", raw)))
}
