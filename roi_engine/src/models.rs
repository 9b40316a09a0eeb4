use serde::{Deserialize, Serialize, Serializer};

use crate::config::{
    DEFAULT_CAPITAL, DEFAULT_DECIMAL_PLACES, DEFAULT_ENTRY_PRICE, DEFAULT_LEVERAGE,
    DEFAULT_STOP_LOSS, DEFAULT_TAKE_PROFIT, MAX_DECIMAL_PLACES, MIN_CAPITAL,
};
use crate::error::{Bound, CalcError, Result};

/// Sweep direction relative to the entry price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Entry → take-profit, entry included
    Up,
    /// Entry → stop-loss, entry excluded
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "ascending"),
            Direction::Down => write!(f, "descending"),
        }
    }
}

/// The six scalar inputs of a projection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PositionParams {
    pub entry_price: f64,
    /// Margin posted, in quote currency (USDT)
    pub capital: f64,
    pub leverage: u32,
    pub take_profit: f64,
    pub stop_loss: f64,
    /// Price precision; the sweep step is 10^-decimal_places
    pub decimal_places: u32,
}

impl Default for PositionParams {
    fn default() -> Self {
        Self {
            entry_price: DEFAULT_ENTRY_PRICE,
            capital: DEFAULT_CAPITAL,
            leverage: DEFAULT_LEVERAGE,
            take_profit: DEFAULT_TAKE_PROFIT,
            stop_loss: DEFAULT_STOP_LOSS,
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl PositionParams {
    /// Strict validation: every range check plus bound placement.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("entry_price", self.entry_price),
            ("capital", self.capital),
            ("take_profit", self.take_profit),
            ("stop_loss", self.stop_loss),
        ] {
            if !value.is_finite() {
                return Err(CalcError::InvalidInput(format!("{name} must be finite, got {value}")));
            }
        }
        if self.entry_price <= 0.0 {
            return Err(CalcError::InvalidInput(format!(
                "entry_price must be > 0, got {}",
                self.entry_price
            )));
        }
        if self.capital < MIN_CAPITAL {
            return Err(CalcError::InvalidInput(format!(
                "capital must be >= {MIN_CAPITAL}, got {}",
                self.capital
            )));
        }
        if self.leverage < 1 {
            return Err(CalcError::InvalidInput("leverage must be >= 1".into()));
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(CalcError::InvalidInput(format!(
                "decimal_places must be in 0..={MAX_DECIMAL_PLACES}, got {}",
                self.decimal_places
            )));
        }
        if self.take_profit < self.entry_price {
            return Err(CalcError::InvalidBound {
                bound: Bound::TakeProfit,
                price: self.take_profit,
                entry: self.entry_price,
            });
        }
        if self.stop_loss > self.entry_price {
            return Err(CalcError::InvalidBound {
                bound: Bound::StopLoss,
                price: self.stop_loss,
                entry: self.entry_price,
            });
        }
        Ok(())
    }
}

/// Position sizing derived once per projection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub entry_price: f64,
    pub capital: f64,
    pub leverage: u32,
    /// Notional controlled: capital × leverage
    pub position_size: f64,
    /// Units of the underlying: position_size / entry_price
    pub quantity: f64,
}

impl Position {
    pub fn from_params(params: &PositionParams) -> Self {
        let position_size = params.capital * params.leverage as f64;
        Self {
            entry_price: params.entry_price,
            capital: params.capital,
            leverage: params.leverage,
            position_size,
            quantity: position_size / params.entry_price,
        }
    }
}

/// One row of a projection table.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MetricRecord {
    pub price: f64,
    pub unrealized_pnl: f64,
    pub roi_pct: f64,
    /// `+inf` when capital + PNL is exactly zero
    #[serde(serialize_with = "serialize_ratio")]
    pub margin_ratio_pct: f64,
}

impl MetricRecord {
    pub fn margin_ratio_undefined(&self) -> bool {
        self.margin_ratio_pct.is_infinite()
    }
}

/// JSON has no infinity; write the sentinel as a string instead of `null`.
fn serialize_ratio<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("nan")
    } else if *value > 0.0 {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

/// Outcome at the two bounds, rounded to 4 decimals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub take_profit: f64,
    pub stop_loss: f64,
    pub profit_at_take_profit: f64,
    pub loss_at_stop_loss: f64,
}

impl Summary {
    pub fn profit_line(&self) -> String {
        format!(
            "Profit at Take Profit ({:?}): {:?} USDT",
            self.take_profit, self.profit_at_take_profit
        )
    }

    pub fn loss_line(&self) -> String {
        format!(
            "Loss at Stop Loss ({:?}): {:?} USDT",
            self.stop_loss, self.loss_at_stop_loss
        )
    }
}

/// ROI% as a function of price for one sweep direction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoiSeries {
    pub label: String,
    pub direction: Direction,
    /// (price, roi_pct) in sweep order
    pub points: Vec<(f64, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let p = PositionParams::default();
        assert_eq!(p.entry_price, 3339.0);
        assert_eq!(p.capital, 100.0);
        assert_eq!(p.leverage, 30);
        assert_eq!(p.take_profit, 3450.0);
        assert_eq!(p.stop_loss, 3290.0);
        assert_eq!(p.decimal_places, 2);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_position_sizing() {
        let pos = Position::from_params(&PositionParams::default());
        assert_eq!(pos.position_size, 3000.0);
        assert!((pos.quantity - 0.898_472).abs() < 1e-6, "qty = {}", pos.quantity);
    }

    #[test]
    fn test_validate_rejects_misplaced_bounds() {
        let p = PositionParams { take_profit: 3300.0, ..Default::default() };
        assert!(matches!(
            p.validate(),
            Err(CalcError::InvalidBound { bound: Bound::TakeProfit, .. })
        ));

        let p = PositionParams { stop_loss: 3400.0, ..Default::default() };
        assert!(matches!(
            p.validate(),
            Err(CalcError::InvalidBound { bound: Bound::StopLoss, .. })
        ));
    }

    #[test]
    fn test_validate_ranges() {
        let cases = [
            PositionParams { entry_price: 0.0, ..Default::default() },
            PositionParams { capital: 0.5, ..Default::default() },
            PositionParams { leverage: 0, ..Default::default() },
            PositionParams { decimal_places: 11, ..Default::default() },
            PositionParams { take_profit: f64::NAN, ..Default::default() },
        ];
        for p in cases {
            assert!(matches!(p.validate(), Err(CalcError::InvalidInput(_))), "{p:?}");
        }
    }

    #[test]
    fn test_margin_sentinel_serializes_as_string() {
        let rec = MetricRecord {
            price: 0.0,
            unrealized_pnl: -100.0,
            roi_pct: -100.0,
            margin_ratio_pct: f64::INFINITY,
        };
        assert!(rec.margin_ratio_undefined());
        let json = serde_json::to_value(rec).unwrap();
        assert_eq!(json["margin_ratio_pct"], "inf");
    }

    #[test]
    fn test_summary_lines() {
        let s = Summary {
            take_profit: 3450.0,
            stop_loss: 3290.0,
            profit_at_take_profit: 99.7305,
            loss_at_stop_loss: -44.0252,
        };
        assert_eq!(s.profit_line(), "Profit at Take Profit (3450.0): 99.7305 USDT");
        assert_eq!(s.loss_line(), "Loss at Stop Loss (3290.0): -44.0252 USDT");
    }
}
