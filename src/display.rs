//! Terminal rendering of ranked flips.
//!
//! Builds the result table as a plain string (testable), with colour
//! applied only where the terminal supports it.

use owo_colors::{OwoColorize, Stream};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::types::ItemProfit;

/// One rendered table row.
#[derive(Tabled)]
struct FlipRow {
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Buy")]
    buy: String,
    #[tabled(rename = "Sell")]
    sell: String,
    #[tabled(rename = "Margin")]
    margin: String,
    #[tabled(rename = "Profit/gp")]
    ratio: String,
    #[tabled(rename = "Max Units")]
    units: String,
}

impl From<&ItemProfit> for FlipRow {
    fn from(item: &ItemProfit) -> Self {
        Self {
            name: item.name.clone(),
            buy: format_gp(item.buy_price),
            sell: format_gp(item.sell_price),
            margin: format_gp(item.unit_profit),
            ratio: format!("{:.4}", item.profit_ratio),
            units: format_gp(item.capped_units),
        }
    }
}

/// Format a gp amount with thousands separators ("2500000" → "2,500,000").
pub fn format_gp(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render the ranked flips as a table.
pub fn render_table(flips: &[ItemProfit]) -> String {
    let rows: Vec<FlipRow> = flips.iter().map(FlipRow::from).collect();
    Table::new(rows).with(Style::sharp()).to_string()
}

/// One-line summary shown under the table.
pub fn render_summary(flips: &[ItemProfit], budget: u64) -> String {
    let combined: u64 = flips.iter().map(|f| f.total_profit).sum();
    format!(
        "Projected profit: {} gp | Your gold: {} gp",
        format_gp(combined),
        format_gp(budget),
    )
}

/// Print results to stdout. An empty list is informative, not an error.
pub fn print_results(flips: &[ItemProfit], budget: u64) {
    if flips.is_empty() {
        println!(
            "{}",
            "No profitable flips within your budget right now."
                .if_supports_color(Stream::Stdout, |t| t.yellow())
        );
        return;
    }

    println!("{}", render_table(flips));
    println!(
        "\n{}\n",
        render_summary(flips, budget).if_supports_color(Stream::Stdout, |t| t.cyan())
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
