/// reporting.rs — Projection tables, summary and exports
///
/// Turns a `Projection` into what the user sees:
/// - two DataFrames (price increasing / price decreasing) for the console
/// - the take-profit / stop-loss summary lines
/// - optional CSV (one file per table) and JSON (full report) exports
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use roi_engine::{MetricRecord, Projection};

pub const COL_PRICE: &str = "Price";
pub const COL_PNL: &str = "Unrealized PNL (USDT)";
pub const COL_ROI: &str = "ROI (%)";
pub const COL_MARGIN: &str = "Margin Ratio (%)";

pub const UP_CSV: &str = "price_up.csv";
pub const DOWN_CSV: &str = "price_down.csv";

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub generator: String,
    pub version: String,
    pub quote_currency: String,
}

impl ReportMetadata {
    pub fn now() -> Self {
        Self {
            generated_at: Utc::now(),
            generator: "roi_calc".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            quote_currency: "USDT".to_string(),
        }
    }
}

/// JSON export layout
#[derive(Debug, Serialize)]
pub struct ProjectionReport<'a> {
    pub metadata: ReportMetadata,
    pub projection: &'a Projection,
}

/// Where to write exports; `None` skips that format.
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    pub csv_dir: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Write every enabled export and return the paths written.
    pub fn export(&self, projection: &Projection) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if let Some(dir) = &self.config.csv_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating CSV directory {}", dir.display()))?;
            for (name, rows) in [(UP_CSV, &projection.up), (DOWN_CSV, &projection.down)] {
                let path = dir.join(name);
                write_csv(rows, &path)?;
                written.push(path);
            }
        }

        if let Some(path) = &self.config.json_path {
            write_json(projection, path)?;
            written.push(path.clone());
        }

        for path in &written {
            info!("Report written: {}", path.display());
        }
        Ok(written)
    }
}

/// One DataFrame row per metric record, columns in display order.
pub fn metrics_frame(rows: &[MetricRecord]) -> Result<DataFrame> {
    let df = df!(
        COL_PRICE => rows.iter().map(|r| r.price).collect::<Vec<f64>>(),
        COL_PNL => rows.iter().map(|r| r.unrealized_pnl).collect::<Vec<f64>>(),
        COL_ROI => rows.iter().map(|r| r.roi_pct).collect::<Vec<f64>>(),
        COL_MARGIN => rows.iter().map(|r| r.margin_ratio_pct).collect::<Vec<f64>>()
    )?;
    Ok(df)
}

pub fn write_csv(rows: &[MetricRecord], path: &Path) -> Result<()> {
    let mut df = metrics_frame(rows)?;
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn write_json(projection: &Projection, path: &Path) -> Result<()> {
    let report = ProjectionReport {
        metadata: ReportMetadata::now(),
        projection,
    };
    let json = serde_json::to_string_pretty(&report)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Console report: inputs, both tables, summary lines.
pub fn render_console(projection: &Projection) -> Result<String> {
    let p = &projection.params;
    let pos = &projection.position;
    let mut out = String::new();

    out.push_str(&format!("{}\n", "=".repeat(60)));
    out.push_str("FUTURES ROI & PNL CALCULATOR\n");
    out.push_str(&format!("{}\n", "=".repeat(60)));
    out.push_str(&format!("  Entry Price    : {}\n", p.entry_price));
    out.push_str(&format!("  Capital        : {} USDT\n", p.capital));
    out.push_str(&format!("  Leverage       : {}x\n", p.leverage));
    out.push_str(&format!("  Take Profit    : {}\n", p.take_profit));
    out.push_str(&format!("  Stop Loss      : {}\n", p.stop_loss));
    out.push_str(&format!("  Decimal Places : {}\n", p.decimal_places));
    out.push_str(&format!("  Position Size  : {:.2} USDT\n", pos.position_size));
    out.push_str(&format!("  Quantity       : {:.6}\n", pos.quantity));
    out.push('\n');

    out.push_str(&format!("PRICE INCREASING TABLE ({} rows)\n", projection.up.len()));
    out.push_str(&format!("{}\n\n", metrics_frame(&projection.up)?));
    out.push_str(&format!("PRICE DECREASING TABLE ({} rows)\n", projection.down.len()));
    out.push_str(&format!("{}\n\n", metrics_frame(&projection.down)?));

    out.push_str(&format!("{}\n", "-".repeat(60)));
    out.push_str(&format!("{}\n", projection.summary.profit_line()));
    out.push_str(&format!("{}\n", projection.summary.loss_line()));

    Ok(out)
}
