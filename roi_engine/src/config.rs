/// config.rs — Calculator configuration loaded from .env
///
/// Every input of a projection has a named default here.  The command line
/// starts from `CalculatorConfig::from_env()` and overrides individual fields.
use std::env;

use crate::error::{CalcError, Result};
use crate::models::PositionParams;
use crate::projection::{SweepOptions, ValidationMode};

/// Default inputs (ETHUSDT-style example position)
pub const DEFAULT_ENTRY_PRICE: f64 = 3339.0;
pub const DEFAULT_CAPITAL: f64 = 100.0;
pub const DEFAULT_LEVERAGE: u32 = 30;
pub const DEFAULT_TAKE_PROFIT: f64 = 3450.0;
pub const DEFAULT_STOP_LOSS: f64 = 3290.0;
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Input ranges
pub const MIN_CAPITAL: f64 = 1.0;
pub const MAX_DECIMAL_PLACES: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorConfig {
    // ── Position ─────────────────────────────────────────────────────
    pub entry_price: f64,
    /// Margin in USDT
    pub capital: f64,
    pub leverage: u32,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub decimal_places: u32,

    // ── Sweep behaviour ──────────────────────────────────────────────
    /// Reject misplaced bounds / out-of-range inputs instead of
    /// producing empty or degenerate tables
    pub strict: bool,
    /// Refuse sweeps longer than this (None = unbounded)
    pub max_sweep_len: Option<usize>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            entry_price: DEFAULT_ENTRY_PRICE,
            capital: DEFAULT_CAPITAL,
            leverage: DEFAULT_LEVERAGE,
            take_profit: DEFAULT_TAKE_PROFIT,
            stop_loss: DEFAULT_STOP_LOSS,
            decimal_places: DEFAULT_DECIMAL_PLACES,
            strict: false,
            max_sweep_len: None,
        }
    }
}

impl CalculatorConfig {
    /// Load configuration from environment variables (after dotenv).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // ignore missing .env
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key → value source; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_sweep_len = match parse_var(&lookup, "MAX_SWEEP_LEN", 0usize)? {
            0 => None,
            n => Some(n),
        };

        Ok(Self {
            entry_price: parse_var(&lookup, "ENTRY_PRICE", DEFAULT_ENTRY_PRICE)?,
            capital: parse_var(&lookup, "CAPITAL", DEFAULT_CAPITAL)?,
            leverage: parse_var(&lookup, "LEVERAGE", DEFAULT_LEVERAGE)?,
            take_profit: parse_var(&lookup, "TAKE_PROFIT", DEFAULT_TAKE_PROFIT)?,
            stop_loss: parse_var(&lookup, "STOP_LOSS", DEFAULT_STOP_LOSS)?,
            decimal_places: parse_var(&lookup, "DECIMAL_PLACES", DEFAULT_DECIMAL_PLACES)?,

            strict: lookup("STRICT_VALIDATION")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            max_sweep_len,
        })
    }

    pub fn position_params(&self) -> PositionParams {
        PositionParams {
            entry_price: self.entry_price,
            capital: self.capital,
            leverage: self.leverage,
            take_profit: self.take_profit,
            stop_loss: self.stop_loss,
            decimal_places: self.decimal_places,
        }
    }

    pub fn sweep_options(&self) -> SweepOptions {
        SweepOptions {
            mode: if self.strict {
                ValidationMode::Strict
            } else {
                ValidationMode::Permissive
            },
            max_len: self.max_sweep_len,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|e| CalcError::Config(format!("key {key}: {e}"))),
        None => Ok(default),
    }
}
