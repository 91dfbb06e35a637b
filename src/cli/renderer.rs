use colored::{control, Colorize};

use crate::core::models::report::Report;

/// Render a report for the terminal.
///
/// Layout:
/// ```text
///  Cost report 2024-02-25 to 2024-03-03
///   Total      $3.75
///   Service                          Usage Type                  Cost
///   Amazon Simple Storage Service    TimedStorage-ByteHrs        $1.5
/// ```
pub fn render_report(report: &Report, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(" Cost report {}", report.window).bold().to_string());

    let total = if report.estimated {
        format!("{} {}", report.total_cost.green(), "(estimated)".dimmed())
    } else {
        report.total_cost.green().to_string()
    };
    lines.push(format!("  {}      {}", "Total".cyan(), total));

    if report.rows.is_empty() {
        lines.push(format!("  {}", "No charges in this window".dimmed()));
        return lines.join("\n");
    }

    let service_width = column_width(report.rows.iter().map(|r| r.service.as_str()), "Service");
    let usage_width = column_width(
        report.rows.iter().map(|r| r.usage_type.as_str()),
        "Usage Type",
    );

    lines.push(format!(
        "  {}",
        format!(
            "{:<sw$}  {:<uw$}  {}",
            "Service",
            "Usage Type",
            "Cost",
            sw = service_width,
            uw = usage_width
        )
        .cyan()
    ));
    for row in &report.rows {
        lines.push(format!(
            "  {:<sw$}  {:<uw$}  {}",
            row.service,
            row.usage_type,
            row.cost,
            sw = service_width,
            uw = usage_width
        ));
    }

    lines.join("\n")
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::report::ReportRow;
    use crate::core::models::window::DateWindow;
    use chrono::NaiveDate;

    fn make_report(rows: Vec<ReportRow>) -> Report {
        Report {
            window: DateWindow::trailing(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(), 7),
            total_cost: "$3.75".to_string(),
            rows,
            estimated: false,
        }
    }

    #[test]
    fn render_contains_window_and_total() {
        let output = render_report(&make_report(vec![]), false);
        assert!(output.contains("2024-02-25 to 2024-03-03"));
        assert!(output.contains("$3.75"));
        assert!(output.contains("No charges"));
    }

    #[test]
    fn render_aligns_rows() {
        let output = render_report(
            &make_report(vec![
                ReportRow {
                    service: "Amazon Simple Storage Service".into(),
                    usage_type: "TimedStorage-ByteHrs".into(),
                    cost: "$1.5".into(),
                },
                ReportRow {
                    service: "AWS Lambda".into(),
                    usage_type: "Request".into(),
                    cost: "$2.25".into(),
                },
            ]),
            false,
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        let cost_col = lines[3].find("$1.5").unwrap();
        assert_eq!(lines[4].find("$2.25").unwrap(), cost_col);
    }

    #[test]
    fn render_marks_estimates() {
        let mut report = make_report(vec![]);
        report.estimated = true;
        assert!(render_report(&report, false).contains("(estimated)"));
    }
}
