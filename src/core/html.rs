use crate::core::formatter::escape_html;
use crate::core::models::report::{Report, ReportRow};

const COLUMNS: [&str; 3] = ["Service", "Usage Type", "Cost"];

const STYLE: &str = r#"      body {
        font-family: Arial, sans-serif;
        color: black;
        background-color: white;
        text-align: center;
      }
      h2 {
        color: white;
        font-size: 25px;
        text-align: center;
      }
      h1 {
        color: white;
        font-size: 40px;
        text-align: center;
        background-color: orange;
      }
      p {
        color: black;
        font-size: 30px;
        line-height: 1.5;
        margin-bottom: 20px;
        text-align: center;
      }
      p1 {
        font-size: 10px;
        text-align: center;
      }
      table.costs {
        margin: 0 auto;
        border-collapse: collapse;
      }
      table.costs th, table.costs td {
        border: 1px solid black;
        padding: 4px 8px;
      }
"#;

/// Render the line items as a bordered table, header row first, no index column.
pub fn render_table(rows: &[ReportRow]) -> String {
    let mut out = String::new();
    out.push_str("<table border=\"1\" class=\"costs\">\n");
    out.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
    for col in COLUMNS {
        out.push_str(&format!("      <th>{}</th>\n", col));
    }
    out.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    for row in rows {
        out.push_str("    <tr>\n");
        for cell in [&row.service, &row.usage_type, &row.cost] {
            out.push_str(&format!("      <td>{}</td>\n", escape_html(cell)));
        }
        out.push_str("    </tr>\n");
    }
    out.push_str("  </tbody>\n</table>");
    out
}

/// Render the full email body.
pub fn render_document(report: &Report, account_label: &str, caption: &str) -> String {
    let estimated_note = if report.estimated {
        "\n    <p1>Figures for the current month are estimated and may change.</p1><br>"
    } else {
        ""
    };

    format!(
        r#"<html>
  <head>
    <style>
{style}    </style>
  </head>
  <body>
    <p> {label} account report for the week {start} and {end} </p>
    <h2> {caption} </h2>
    <h1> <strong> <em> {total} </em></strong> </h1>{note}
    <p1>{table}</p1>
  </body>
</html>
"#,
        style = STYLE,
        label = escape_html(account_label),
        start = report.window.start_str(),
        end = report.window.end_str(),
        caption = escape_html(caption),
        total = escape_html(&report.total_cost),
        note = estimated_note,
        table = render_table(&report.rows),
    )
}
