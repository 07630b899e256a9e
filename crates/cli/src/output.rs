//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use pricing_lib::EstimatorReport;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Log line format on stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Summary row for one estimator
#[derive(Tabled)]
pub struct ReportRow {
    #[tabled(rename = "Estimator")]
    pub estimator: String,
    #[tabled(rename = "R^2")]
    pub r_squared: String,
    #[tabled(rename = "MAE")]
    pub mae: String,
    #[tabled(rename = "Predicted Price")]
    pub predicted_price: String,
}

impl From<&EstimatorReport> for ReportRow {
    fn from(report: &EstimatorReport) -> Self {
        Self {
            estimator: report.estimator.title().to_string(),
            r_squared: format!("{:.4}", report.r_squared),
            mae: format_thousands(report.mae, 2),
            predicted_price: format_currency(report.predicted_price),
        }
    }
}

/// Print a table from a list of items
pub fn print_table<T: Tabled>(items: &[T]) {
    if items.is_empty() {
        println!("{}", "No results".yellow());
        return;
    }
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Fixed decimals with comma thousands separators, e.g. `15,320.50`
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    let negative = value < 0.0 && formatted.bytes().any(|b| (b'1'..=b'9').contains(&b));
    if negative {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Format a dollar amount, e.g. `$452,000.00`
pub fn format_currency(amount: f64) -> String {
    let formatted = format_thousands(amount, 2);
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", formatted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricing_lib::EstimatorKind;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(15320.0, 2), "15,320.00");
        assert_eq!(format_thousands(999.994, 2), "999.99");
        assert_eq!(format_thousands(999.995, 0), "1,000");
        assert_eq!(format_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_thousands(0.0, 2), "0.00");
        assert_eq!(format_thousands(-2500.5, 1), "-2,500.5");
        assert_eq!(format_thousands(-0.001, 2), "0.00");
        assert_eq!(format_thousands(f64::NAN, 2), "NaN");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(452000.0), "$452,000.00");
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(-1500.0), "-$1,500.00");
    }

    #[test]
    fn test_report_row() {
        let report = EstimatorReport::new(EstimatorKind::DecisionTree, 0.912345, 15320.456, 452000.0);
        let row = ReportRow::from(&report);

        assert_eq!(row.estimator, "Decision Tree");
        assert_eq!(row.r_squared, "0.9123");
        assert_eq!(row.mae, "15,320.46");
        assert_eq!(row.predicted_price, "$452,000.00");
    }
}
