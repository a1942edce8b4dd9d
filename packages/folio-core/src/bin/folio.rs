//! Folio CLI - valuation and risk reports from holdings files.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_core::holdings::{load_holdings, sample_holdings, write_holdings_file};
use folio_core::market::{CsvPriceSource, PriceSource, SyntheticPriceSource};
use folio_core::report::{render_risk_table, render_valuation_report};
use folio_core::{Period, RiskAnalyzer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio valuation and risk reports", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample holdings file
    Generate {
        /// Output CSV path
        #[arg(short, long, default_value = "investment_portfolio.csv")]
        output: PathBuf,

        /// Generator seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Value a holdings file against market data
    Value {
        /// Holdings CSV path
        #[arg(short = 'f', long, default_value = "investment_portfolio.csv")]
        holdings: PathBuf,

        /// Directory of per-symbol price CSVs; synthetic data when omitted
        #[arg(long)]
        prices: Option<PathBuf>,

        /// Seed for synthetic market data
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Per-symbol risk metrics for the symbols in a holdings file
    Risk {
        /// Holdings CSV path
        #[arg(short = 'f', long, default_value = "investment_portfolio.csv")]
        holdings: PathBuf,

        /// Directory of per-symbol price CSVs; synthetic data when omitted
        #[arg(long)]
        prices: Option<PathBuf>,

        /// Seed for synthetic market data
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Historical lookback (1d, 5d, 1mo, 3mo, 6mo, 1y, 5y, ytd, max)
        #[arg(long, default_value = "1y")]
        period: String,

        /// VaR/CVaR confidence level, strictly between 0 and 1
        #[arg(long, default_value_t = 0.95)]
        confidence: f64,

        /// Annual risk-free rate
        #[arg(long, default_value_t = 0.01)]
        risk_free_rate: f64,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate { output, seed } => generate(&output, seed),
        Commands::Value {
            holdings,
            prices,
            seed,
            json,
        } => value(&holdings, prices, seed, json),
        Commands::Risk {
            holdings,
            prices,
            seed,
            period,
            confidence,
            risk_free_rate,
            json,
        } => risk(&holdings, prices, seed, &period, confidence, risk_free_rate, json),
    }
}

fn market_source(prices: Option<PathBuf>, seed: u64) -> Box<dyn PriceSource> {
    match prices {
        Some(dir) => Box::new(CsvPriceSource::new(dir)),
        None => Box::new(SyntheticPriceSource::new(seed)),
    }
}

fn generate(output: &PathBuf, seed: u64) -> anyhow::Result<()> {
    let holdings = sample_holdings(seed);
    write_holdings_file(output, &holdings)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote {} holdings to {}", holdings.len(), output.display());
    Ok(())
}

fn value(
    holdings_path: &PathBuf,
    prices: Option<PathBuf>,
    seed: u64,
    json: bool,
) -> anyhow::Result<()> {
    let holdings = load_holdings(holdings_path)
        .with_context(|| format!("loading {}", holdings_path.display()))?;
    let source = market_source(prices, seed);
    let report = folio_core::value_portfolio(source.as_ref(), &holdings);

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", render_valuation_report(&report));
    }
    Ok(())
}

fn risk(
    holdings_path: &PathBuf,
    prices: Option<PathBuf>,
    seed: u64,
    period: &str,
    confidence: f64,
    risk_free_rate: f64,
    json: bool,
) -> anyhow::Result<()> {
    let holdings = load_holdings(holdings_path)
        .with_context(|| format!("loading {}", holdings_path.display()))?;
    let period: Period = period.parse()?;
    let analyzer = RiskAnalyzer::new(risk_free_rate).with_confidence(confidence)?;
    let source = market_source(prices, seed);

    // Each symbol is analyzed once, in first-seen order.
    let mut symbols: Vec<String> = Vec::new();
    for holding in &holdings {
        if !symbols.contains(&holding.symbol) {
            symbols.push(holding.symbol.clone());
        }
    }

    let metrics: Vec<_> = symbols
        .iter()
        .map(|symbol| analyzer.analyze(source.as_ref(), symbol, period))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        print!("{}", render_risk_table(&metrics));
    }
    Ok(())
}
