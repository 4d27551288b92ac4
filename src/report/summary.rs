//! Fairness metrics table rendering

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{
    MetricsTable, CORRELATION_COLUMN, DI_COLUMN, GROUP_COLUMN, SCORE_COLUMN, SPD_COLUMN,
};

/// Format a metric to 3 decimal places; undefined values print as `NaN`
pub fn format_metric(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.3}", value)
    }
}

fn metric_cell(value: f64) -> Cell {
    let cell = Cell::new(format_metric(value)).set_alignment(CellAlignment::Right);
    if value.is_nan() {
        cell.fg(Color::DarkGrey)
    } else {
        cell
    }
}

/// Build the display table, one row per non-reference group
pub fn render_metrics_table(table: &MetricsTable) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);
    out.set_header(
        [
            GROUP_COLUMN,
            SPD_COLUMN,
            DI_COLUMN,
            CORRELATION_COLUMN,
            SCORE_COLUMN,
        ]
        .into_iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );

    for row in table.rows() {
        let spd_color = if row.statistical_parity_difference < 0.0 {
            Color::Red
        } else {
            Color::Green
        };

        out.add_row(vec![
            Cell::new(&row.label),
            metric_cell(row.statistical_parity_difference).fg(spd_color),
            metric_cell(row.disparate_impact),
            metric_cell(row.correlation),
            metric_cell(row.weighted_fairness_score).add_attribute(Attribute::Bold),
        ]);
    }

    out
}

/// Print the metrics table with its heading
pub fn display_metrics(table: &MetricsTable) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("FAIRNESS METRICS BY GROUP").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!(
        "      Reference group: {}   Association: {} ({})",
        style(&table.reference().label).cyan().bold(),
        style(table.method()).yellow(),
        format_metric(table.association().value)
    );
    println!();

    if table.is_empty() {
        println!(
            "      {}",
            style("No comparison groups: the demographic column has a single value").dim()
        );
        return;
    }

    // Indent the table
    for line in render_metrics_table(table).to_string().lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{analyze_fairness, FairnessConfig};
    use polars::prelude::*;

    #[test]
    fn test_format_metric() {
        assert_eq!(format_metric(-2.0 / 3.0), "-0.667");
        assert_eq!(format_metric(1.0 / 3.0), "0.333");
        assert_eq!(format_metric(f64::NAN), "NaN");
    }

    #[test]
    fn test_render_contains_groups_and_values() {
        let df = df! {
            "gender" => ["A", "A", "B", "B", "B"],
            "hired" => ["1", "1", "0", "0", "1"],
        }
        .unwrap();
        let report = analyze_fairness(&df, &FairnessConfig::new("gender", "hired")).unwrap();

        let rendered = render_metrics_table(&report.table).to_string();

        assert!(rendered.contains("Statistical Parity Difference"));
        assert!(rendered.contains("B"));
        assert!(rendered.contains("-0.667"));
        assert!(rendered.contains("0.333"));
    }
}
