use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

use crate::models::quote::Quote;

const MISSING: &str = "-";

pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_header(&self, text: &str) -> String {
        format!("\n=== {} ===", text.bright_white().bold())
    }

    pub fn format_colored_change(&self, change: f64, percent: Option<f64>) -> String {
        let text = match percent {
            Some(p) => format!("{:+.2} ({:+.2}%)", change, p),
            None => format!("{:+.2}", change),
        };
        if change >= 0.0 {
            text.green().to_string()
        } else {
            text.red().to_string()
        }
    }

    pub fn format_price(&self, amount: Option<f64>) -> String {
        amount.map_or_else(|| MISSING.to_string(), |a| format!("₹{:.2}", a))
    }

    pub fn format_volume(&self, volume: Option<f64>) -> String {
        volume.map_or_else(|| MISSING.to_string(), |v| format!("{:.0}", v))
    }

    pub fn format_quote_summary(&self, quote: &Quote) -> String {
        let title = match &quote.company_name {
            Some(name) => format!("{} ({})", quote.symbol, name),
            None => quote.symbol.clone(),
        };

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        // Change column carries the percentage when NSE reports one
        let change = quote.change.map_or_else(
            || MISSING.to_string(),
            |c| self.format_colored_change(c, quote.change_percent),
        );

        let rows = [
            ("Price", self.format_price(quote.latest_price)),
            ("Change", change),
            ("Day High", self.format_price(quote.day_high)),
            ("Day Low", self.format_price(quote.day_low)),
            ("Volume", self.format_volume(quote.volume)),
            ("Industry", quote.industry.clone().unwrap_or_else(|| MISSING.to_string())),
            ("Last Updated", quote.last_updated.clone().unwrap_or_else(|| MISSING.to_string())),
        ];

        // Add data rows
        for (label, value) in rows {
            table.add_row(Row::new(vec![
                Cell::new(label).style_spec("b"),
                Cell::new(&value),
            ]));
        }

        format!("{}\n{}", self.format_header(&title), table)
    }
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote() -> Quote {
        Quote {
            symbol: "TCS".into(),
            latest_price: Some(4120.5),
            change: Some(-12.35),
            change_percent: Some(-0.3),
            day_high: Some(4150.25),
            day_low: None,
            volume: Some(1834521.0),
            last_updated: None,
            company_name: Some("Tata Consultancy Services Limited".into()),
            industry: None,
        }
    }

    #[test]
    fn test_summary_contains_fields() {
        colored::control::set_override(false);
        let out = DisplayFormatter::new().format_quote_summary(&quote());
        assert!(out.contains("TCS (Tata Consultancy Services Limited)"));
        assert!(out.contains("₹4120.50"));
        assert!(out.contains("-12.35 (-0.30%)"));
        assert!(out.contains("1834521"));
    }

    #[test]
    fn test_missing_values_render_placeholder() {
        let display = DisplayFormatter::new();
        assert_eq!(display.format_price(None), "-");
        assert_eq!(display.format_volume(None), "-");
    }
}
