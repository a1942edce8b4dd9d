//! Plain-text rendering of valuation and risk results.
//!
//! Formatting only: the sign of the performance figure comes from
//! [`PortfolioSummary::is_loss`](crate::types::PortfolioSummary::is_loss),
//! and a loss is marked the ledger way, in parentheses and red.

use std::fmt::Write;

use crate::types::RiskMetrics;
use crate::valuation::ValuationReport;

const RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

/// Render the full valuation report: positions table, totals, and the
/// failed and excluded symbol lists.
pub fn render_valuation_report(report: &ValuationReport) -> String {
    let mut out = String::new();

    let header = format!(
        "{:<14}  {:<6}  {:>10}  {:>14}  {:>13}  {:>13}  {:>12}",
        "Asset Type", "Symbol", "Quantity", "Purchase Price", "Current Price", "Current Value", "Gain/Loss"
    );
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "-".repeat(header.len()));

    for position in &report.positions {
        let _ = writeln!(
            out,
            "{:<14}  {:<6}  {:>10.2}  {:>14.2}  {:>13}  {:>13}  {:>12}",
            position.holding.asset_class,
            position.holding.symbol,
            position.holding.quantity,
            position.holding.purchase_price,
            money(position.current_price),
            money(position.current_value),
            money(position.gain_loss),
        );
    }

    let summary = &report.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "Current portfolio value: ${:.2}", summary.total_value);
    let _ = writeln!(out, "Total investment: ${:.2}", summary.total_investment);
    if summary.is_loss() {
        let _ = writeln!(
            out,
            "{RED}Current performance: (${:.2}){RESET}",
            summary.performance.abs()
        );
    } else {
        let _ = writeln!(out, "Current performance: ${:.2}", summary.performance);
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Unpriced symbols (still counted in the investment total):");
        for failure in &report.failures {
            let _ = writeln!(out, "  - {}", failure.reason);
        }
    }

    if !report.rejected.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Excluded holdings:");
        for failure in &report.rejected {
            let _ = writeln!(out, "  - {}", failure.reason);
        }
    }

    out
}

/// Render per-symbol risk metrics as a table; absent statistics show as
/// a dash.
pub fn render_risk_table(metrics: &[RiskMetrics]) -> String {
    let confidence = metrics
        .first()
        .map(|m| m.confidence_level * 100.0)
        .unwrap_or(95.0);

    let mut out = String::new();
    let header = format!(
        "{:<8}  {:>12}  {:>10}  {:>12}  {:>12}",
        "Symbol",
        "Volatility",
        "Sharpe",
        format!("VaR({confidence:.0}%)"),
        format!("CVaR({confidence:.0}%)"),
    );
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "-".repeat(header.len()));

    for m in metrics {
        let _ = writeln!(
            out,
            "{:<8}  {:>12}  {:>10}  {:>12}  {:>12}",
            m.symbol,
            stat(m.volatility),
            stat(m.sharpe_ratio),
            stat(m.var),
            stat(m.cvar),
        );
    }

    out
}

fn money(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::StaticPriceSource;
    use crate::types::{AssetClass, Holding, PricePoint, PriceSeries};
    use crate::valuation::value_portfolio;
    use chrono::NaiveDate;

    fn report_for(prices: &[(&str, f64)], holdings: &[Holding]) -> ValuationReport {
        let mut source = StaticPriceSource::new();
        for (symbol, close) in prices {
            source.insert(PriceSeries::new(
                symbol,
                vec![PricePoint::new(
                    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                    *close,
                )],
            ));
        }
        value_portfolio(&source, holdings)
    }

    fn holding(symbol: &str, quantity: f64, purchase_price: f64) -> Holding {
        Holding::new(AssetClass::Stock, symbol, quantity, purchase_price).unwrap()
    }

    #[test]
    fn test_gain_renders_without_markers() {
        let report = report_for(
            &[("AAPL", 150.0), ("MSFT", 180.0)],
            &[holding("AAPL", 10.0, 100.0), holding("MSFT", 5.0, 200.0)],
        );

        let text = render_valuation_report(&report);
        assert!(text.contains("Current portfolio value: $2400.00"));
        assert!(text.contains("Current performance: $400.00"));
        assert!(!text.contains(RED));
        assert!(!text.contains('('));
    }

    #[test]
    fn test_loss_renders_red_parenthesized() {
        let report = report_for(
            &[("AAPL", 150.0)],
            &[holding("AAPL", 10.0, 100.0), holding("MSFT", 5.0, 200.0)],
        );

        let text = render_valuation_report(&report);
        assert!(text.contains("($500.00)"));
        assert!(text.contains(RED));
        assert!(text.contains("Unpriced symbols"));
        assert!(text.contains("MSFT"));
    }

    #[test]
    fn test_unpriced_position_shows_dashes() {
        let report = report_for(&[], &[holding("AAPL", 10.0, 100.0)]);
        let text = render_valuation_report(&report);

        let row = text
            .lines()
            .find(|l| l.contains("AAPL"))
            .expect("position row");
        assert!(row.contains('-'));
    }

    #[test]
    fn test_risk_table_mixes_present_and_absent() {
        let metrics = vec![
            RiskMetrics {
                symbol: "AAPL".to_string(),
                confidence_level: 0.95,
                volatility: Some(0.2134),
                sharpe_ratio: Some(1.02),
                var: Some(-0.0213),
                cvar: Some(-0.0345),
            },
            RiskMetrics::unavailable("MSFT", 0.95),
        ];

        let text = render_risk_table(&metrics);
        assert!(text.contains("VaR(95%)"));
        assert!(text.contains("0.2134"));
        assert!(text.contains("-0.0213"));

        let msft_row = text
            .lines()
            .find(|l| l.starts_with("MSFT"))
            .expect("MSFT row");
        assert!(msft_row.contains('-'));
        assert!(!msft_row.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_risk_table_header_follows_confidence() {
        let metrics = vec![RiskMetrics::unavailable("AAPL", 0.99)];
        let text = render_risk_table(&metrics);
        assert!(text.contains("VaR(99%)"));
    }
}
