use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places shown for every cost.
pub const COST_DECIMALS: u32 = 3;

/// Round to [`COST_DECIMALS`] places, halves away from zero.
pub fn round_cost(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(COST_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns "$1.235" style strings: rounded to three places, trailing zeros
/// dropped, but always at least one fractional digit ("$10.0").
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = round_cost(amount).normalize();
    if rounded.scale() == 0 {
        format!("{}{}.0", symbol, rounded)
    } else {
        format!("{}{}", symbol, rounded)
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
