/// projection.rs — Sweep + metrics pipeline
///
/// inputs ─► Position ─► sweep::generate_capped (up, down)
///                   └─► metrics::calculate_metrics (up, down)
///                   └─► Summary at both bounds
///
/// Single pass, no state kept between calls.
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::metrics::{calculate_metrics, PNL_DECIMALS};
use crate::models::{Direction, MetricRecord, Position, PositionParams, RoiSeries, Summary};
use crate::rounding::round_to;
use crate::sweep;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Misplaced bounds give empty tables, degenerate inputs give
    /// degenerate numbers
    #[default]
    Permissive,
    /// Run `PositionParams::validate` first
    Strict,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepOptions {
    pub mode: ValidationMode,
    /// Per-direction row cap
    pub max_len: Option<usize>,
}

/// Both result tables plus the bound summary for one set of inputs.
#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    pub params: PositionParams,
    pub position: Position,
    /// Entry → take-profit
    pub up: Vec<MetricRecord>,
    /// Entry − step → stop-loss
    pub down: Vec<MetricRecord>,
    pub summary: Summary,
}

impl Projection {
    pub fn compute(params: &PositionParams, opts: &SweepOptions) -> Result<Self> {
        if opts.mode == ValidationMode::Strict {
            params.validate()?;
        }

        let position = Position::from_params(params);

        let up_prices = sweep::generate_capped(
            Direction::Up,
            params.entry_price,
            params.take_profit,
            params.decimal_places,
            opts.max_len,
        )?;
        let down_prices = sweep::generate_capped(
            Direction::Down,
            params.entry_price,
            params.stop_loss,
            params.decimal_places,
            opts.max_len,
        )?;

        let up = calculate_metrics(&up_prices, &position);
        let down = calculate_metrics(&down_prices, &position);
        let summary = summarize(params, &position);

        info!(
            "Projection: entry={} size={:.2} qty={:.6} up_rows={} down_rows={} tp_pnl={} sl_pnl={}",
            params.entry_price,
            position.position_size,
            position.quantity,
            up.len(),
            down.len(),
            summary.profit_at_take_profit,
            summary.loss_at_stop_loss,
        );

        Ok(Self { params: *params, position, up, down, summary })
    }

    pub fn table(&self, direction: Direction) -> &[MetricRecord] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    /// ROI vs price, one series per sweep direction.
    pub fn roi_series(&self) -> [RoiSeries; 2] {
        [
            roi_series("ROI Up", Direction::Up, &self.up),
            roi_series("ROI Down", Direction::Down, &self.down),
        ]
    }
}

/// PNL at both bounds, computed from the unrounded bound prices.
pub fn summarize(params: &PositionParams, position: &Position) -> Summary {
    let at = |bound: f64| round_to((bound - params.entry_price) * position.quantity, PNL_DECIMALS);
    Summary {
        take_profit: params.take_profit,
        stop_loss: params.stop_loss,
        profit_at_take_profit: at(params.take_profit),
        loss_at_stop_loss: at(params.stop_loss),
    }
}

fn roi_series(label: &str, direction: Direction, rows: &[MetricRecord]) -> RoiSeries {
    RoiSeries {
        label: label.to_string(),
        direction,
        points: rows.iter().map(|r| (r.price, r.roi_pct)).collect(),
    }
}
