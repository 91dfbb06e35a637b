use rust_decimal::Decimal;

/// The metric every query asks for.
pub const UNBLENDED_COST: &str = "UnblendedCost";

/// One monthly bucket returned by Cost Explorer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CostSegment {
    pub start: String,
    pub end: String,
    /// Zero for grouped queries, where Cost Explorer leaves the total empty.
    pub total: Decimal,
    pub estimated: bool,
    pub groups: Vec<GroupedCost>,
}

/// A grouped entry inside a segment, keyed by the requested dimensions in order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedCost {
    pub keys: Vec<String>,
    pub amount: Decimal,
}

/// A dimension Cost Explorer can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Service,
    UsageType,
}

impl Dimension {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Service => "SERVICE",
            Self::UsageType => "USAGE_TYPE",
        }
    }
}

/// A single `GetCostAndUsage` request over a report window.
#[derive(Debug, Clone, PartialEq)]
pub struct CostQuery {
    pub start: String,
    pub end: String,
    pub group_by: Vec<Dimension>,
}

impl CostQuery {
    pub fn total(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            group_by: Vec::new(),
        }
    }

    pub fn by_service_and_usage(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            group_by: vec![Dimension::Service, Dimension::UsageType],
        }
    }
}

/// One row of the report table.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub service: String,
    pub usage_type: String,
    pub cost: Decimal,
}
