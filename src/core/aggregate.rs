use rust_decimal::Decimal;

use crate::core::formatter::format_currency;
use crate::core::models::cost::{CostSegment, LineItem};
use crate::core::models::report::{Report, ReportRow};
use crate::core::models::window::DateWindow;

/// Sum of the segment totals, in API order.
pub fn total_cost(segments: &[CostSegment]) -> Decimal {
    segments.iter().map(|s| s.total).sum()
}

/// Flatten grouped entries across all segments into line items.
///
/// Segment order is kept, then entry order within each segment. Entries whose
/// amount is not strictly positive are dropped. Identical service/usage pairs
/// from different segments stay separate rows.
pub fn line_items(segments: &[CostSegment]) -> Vec<LineItem> {
    let mut items = Vec::new();
    for segment in segments {
        for group in &segment.groups {
            if group.amount <= Decimal::ZERO {
                continue;
            }
            if group.keys.len() < 2 {
                tracing::warn!(
                    keys = ?group.keys,
                    period_start = %segment.start,
                    period_end = %segment.end,
                    "Grouped cost entry has fewer than two keys"
                );
            }
            let key = |i: usize| group.keys.get(i).cloned().unwrap_or_default();
            items.push(LineItem {
                service: key(0),
                usage_type: key(1),
                cost: group.amount,
            });
        }
    }
    items
}

/// Combine the aggregate and grouped query results into a [`Report`].
pub fn build_report(
    window: DateWindow,
    totals: &[CostSegment],
    detail: &[CostSegment],
    currency_symbol: &str,
) -> Report {
    let rows = line_items(detail)
        .into_iter()
        .map(|item| ReportRow {
            service: item.service,
            usage_type: item.usage_type,
            cost: format_currency(item.cost, currency_symbol),
        })
        .collect();

    Report {
        window,
        total_cost: format_currency(total_cost(totals), currency_symbol),
        rows,
        estimated: totals.iter().chain(detail).any(|s| s.estimated),
    }
}
