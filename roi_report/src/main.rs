/// main.rs — Futures ROI & PNL Calculator
///
/// Command-line front end for `roi_engine`.  Inputs come from (lowest to
/// highest precedence) built-in defaults, the environment / .env, and flags.
///
/// Usage:
///   cargo run --bin roi_calc -- calc --entry-price 3339 --take-profit 3450 --stop-loss 3290
///   cargo run --bin roi_calc -- calc --chart roi_vs_price.svg --terminal-chart
///   cargo run --bin roi_calc -- calc --csv-dir ./reports --json ./reports/projection.json
///   cargo run --bin roi_calc -- check --leverage 50
///   cargo run --bin roi_calc -- --help
use std::path::PathBuf;

use anyhow::{Result, ensure};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use roi_engine::config::{MAX_DECIMAL_PLACES, MIN_CAPITAL};
use roi_engine::sweep::{price_step, sweep_len};
use roi_engine::{CalculatorConfig, Direction, Projection};
use roi_report::chart;
use roi_report::reporting::render_console;
use roi_report::{ReportConfig, ReportGenerator};

/// Row cap per table unless overridden (`--max-rows 0` disables it)
const DEFAULT_MAX_ROWS: usize = 5_000_000;

#[derive(Parser)]
#[command(name = "roi_calc")]
#[command(about = "Futures ROI & PNL Calculator - leveraged long PNL / ROI / margin ratio over a price sweep")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute and print both projection tables
    Calc {
        #[command(flatten)]
        inputs: InputArgs,

        /// Write the ROI vs Price chart as SVG to this file
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Also draw the chart in the terminal
        #[arg(long)]
        terminal_chart: bool,

        /// Write price_up.csv / price_down.csv into this directory
        #[arg(long)]
        csv_dir: Option<PathBuf>,

        /// Write the full projection as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Validate inputs strictly and report sweep sizes without computing
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Current price / entry price
    #[arg(short, long)]
    pub entry_price: Option<f64>,

    /// Capital (USDT)
    #[arg(short, long)]
    pub capital: Option<f64>,

    /// Leverage (e.g. 10x, 20x)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub leverage: Option<u32>,

    /// Take profit / close position price
    #[arg(short, long)]
    pub take_profit: Option<f64>,

    /// Stop loss price
    #[arg(short, long)]
    pub stop_loss: Option<f64>,

    /// Decimal digits after the price (2 for 0.01, 4 for 0.0001)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=10))]
    pub decimal_places: Option<u32>,

    /// Reject misplaced bounds instead of printing empty tables
    #[arg(long)]
    pub strict: bool,

    /// Maximum rows per table (0 = unlimited)
    #[arg(long)]
    pub max_rows: Option<usize>,
}

impl InputArgs {
    /// Overlay flags on top of the env / default configuration.
    pub fn apply(&self, cfg: &mut CalculatorConfig) {
        if let Some(v) = self.entry_price {
            cfg.entry_price = v;
        }
        if let Some(v) = self.capital {
            cfg.capital = v;
        }
        if let Some(v) = self.leverage {
            cfg.leverage = v;
        }
        if let Some(v) = self.take_profit {
            cfg.take_profit = v;
        }
        if let Some(v) = self.stop_loss {
            cfg.stop_loss = v;
        }
        if let Some(v) = self.decimal_places {
            cfg.decimal_places = v;
        }
        cfg.strict |= self.strict;
        cfg.max_sweep_len = match self.max_rows {
            Some(0) => None,
            Some(n) => Some(n),
            None => cfg.max_sweep_len.or(Some(DEFAULT_MAX_ROWS)),
        };
    }
}

/// Input ranges every run must satisfy, whatever the validation mode.
pub fn check_input_ranges(cfg: &CalculatorConfig) -> Result<()> {
    for (name, v) in [
        ("entry price", cfg.entry_price),
        ("capital", cfg.capital),
        ("take profit", cfg.take_profit),
        ("stop loss", cfg.stop_loss),
    ] {
        ensure!(v.is_finite(), "{name} must be a finite number, got {v}");
    }
    ensure!(cfg.entry_price >= 0.0, "entry price must be >= 0, got {}", cfg.entry_price);
    ensure!(cfg.capital >= MIN_CAPITAL, "capital must be >= {MIN_CAPITAL}, got {}", cfg.capital);
    ensure!(cfg.leverage >= 1, "leverage must be >= 1");
    ensure!(cfg.take_profit >= 0.0, "take profit must be >= 0, got {}", cfg.take_profit);
    ensure!(cfg.stop_loss >= 0.0, "stop loss must be >= 0, got {}", cfg.stop_loss);
    ensure!(
        cfg.decimal_places <= MAX_DECIMAL_PLACES,
        "decimal places must be in 0..={MAX_DECIMAL_PLACES}, got {}",
        cfg.decimal_places
    );
    Ok(())
}

pub struct CalculatorApp {
    cli: Cli,
}

impl CalculatorApp {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Calc {
                inputs,
                chart: chart_path,
                terminal_chart,
                csv_dir,
                json,
            } => {
                let cfg = resolve_config(inputs)?;
                let projection = Projection::compute(&cfg.position_params(), &cfg.sweep_options())?;

                print!("{}", render_console(&projection)?);

                let series = projection.roi_series();
                if let Some(path) = chart_path {
                    chart::render_svg(&series, path)?;
                }
                if *terminal_chart {
                    chart::print_terminal(&series);
                }

                ReportGenerator::new(ReportConfig {
                    csv_dir: csv_dir.clone(),
                    json_path: json.clone(),
                })
                .export(&projection)?;
                Ok(())
            }
            Commands::Check { inputs } => {
                let cfg = resolve_config(inputs)?;
                cfg.position_params().validate()?;

                let step = price_step(cfg.decimal_places);
                let up = sweep_len(cfg.entry_price, cfg.take_profit, step, Direction::Up);
                let down = sweep_len(cfg.entry_price, cfg.stop_loss, step, Direction::Down);
                println!("Inputs OK");
                println!("  Price step      : {step}");
                println!("  Price up rows   : {up}");
                println!("  Price down rows : {down}");
                if let Some(max) = cfg.max_sweep_len {
                    ensure!(
                        up <= max && down <= max,
                        "sweep exceeds {max} rows; raise --max-rows or lower --decimal-places"
                    );
                }
                Ok(())
            }
        }
    }
}

fn resolve_config(inputs: &InputArgs) -> Result<CalculatorConfig> {
    let mut cfg = CalculatorConfig::from_env()?;
    inputs.apply(&mut cfg);
    check_input_ranges(&cfg)?;
    info!(
        "Inputs: entry={} capital={} leverage={}x tp={} sl={} dp={} strict={} max_rows={:?}",
        cfg.entry_price,
        cfg.capital,
        cfg.leverage,
        cfg.take_profit,
        cfg.stop_loss,
        cfg.decimal_places,
        cfg.strict,
        cfg.max_sweep_len
    );
    Ok(cfg)
}

fn main() {
    let cli = Cli::parse();

    // ── Logging ──────────────────────────────────────────────────────────
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let app = CalculatorApp::new(cli);
    if let Err(e) = app.run() {
        error!("Application error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_calc_parsing() {
        let cli = parse(&[
            "roi_calc",
            "calc",
            "--entry-price", "3339",
            "--capital", "250",
            "-l", "20",
            "--take-profit", "3500.5",
            "--stop-loss", "3200",
            "--decimal-places", "1",
            "--csv-dir", "./reports",
        ]);

        if let Commands::Calc { inputs, csv_dir, chart, .. } = cli.command {
            assert_eq!(inputs.entry_price, Some(3339.0));
            assert_eq!(inputs.capital, Some(250.0));
            assert_eq!(inputs.leverage, Some(20));
            assert_eq!(inputs.take_profit, Some(3500.5));
            assert_eq!(inputs.decimal_places, Some(1));
            assert_eq!(csv_dir, Some(PathBuf::from("./reports")));
            assert_eq!(chart, None);
        } else {
            panic!("Expected Calc command");
        }
    }

    #[test]
    fn test_chart_is_opt_in() {
        let cli = parse(&["roi_calc", "calc", "--chart", "out/roi.svg", "--terminal-chart"]);
        if let Commands::Calc { chart, terminal_chart, json, .. } = cli.command {
            assert_eq!(chart, Some(PathBuf::from("out/roi.svg")));
            assert!(terminal_chart);
            assert_eq!(json, None);
        } else {
            panic!("Expected Calc command");
        }
        assert!(Cli::try_parse_from(["roi_calc", "calc", "--no-chart"]).is_err());
    }

    #[test]
    fn test_out_of_range_flags_rejected() {
        assert!(Cli::try_parse_from(["roi_calc", "calc", "--leverage", "0"]).is_err());
        assert!(Cli::try_parse_from(["roi_calc", "calc", "--decimal-places", "11"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let inputs = InputArgs {
            take_profit: Some(3400.0),
            leverage: Some(5),
            strict: true,
            ..Default::default()
        };
        let mut cfg = CalculatorConfig::default();
        inputs.apply(&mut cfg);
        assert_eq!(cfg.take_profit, 3400.0);
        assert_eq!(cfg.leverage, 5);
        assert_eq!(cfg.entry_price, 3339.0);
        assert!(cfg.strict);
        assert_eq!(cfg.max_sweep_len, Some(DEFAULT_MAX_ROWS));
    }

    #[test]
    fn test_max_rows_zero_disables_cap() {
        let inputs = InputArgs { max_rows: Some(0), ..Default::default() };
        let mut cfg = CalculatorConfig { max_sweep_len: Some(10), ..Default::default() };
        inputs.apply(&mut cfg);
        assert_eq!(cfg.max_sweep_len, None);
    }

    #[test]
    fn test_input_ranges() {
        assert!(check_input_ranges(&CalculatorConfig::default()).is_ok());

        let low_capital = CalculatorConfig { capital: 0.5, ..Default::default() };
        assert!(check_input_ranges(&low_capital).is_err());

        let negative_sl = CalculatorConfig { stop_loss: -1.0, ..Default::default() };
        assert!(check_input_ranges(&negative_sl).is_err());

        // misplaced bounds are a validation-mode concern, not a range error
        let inverted = CalculatorConfig { take_profit: 10.0, ..Default::default() };
        assert!(check_input_ranges(&inverted).is_ok());
    }
}
