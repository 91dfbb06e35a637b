use serde::Serialize;

use crate::core::models::window::DateWindow;

/// A line item with its cost already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub service: String,
    pub usage_type: String,
    pub cost: String,
}

/// Everything the email needs. Built once per invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub window: DateWindow,
    pub total_cost: String,
    pub rows: Vec<ReportRow>,
    /// Set when Cost Explorer flagged any segment as not yet final.
    pub estimated: bool,
}
