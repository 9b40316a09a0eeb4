use thiserror::Error;

use crate::models::Direction;

/// Which side of the sweep a bound belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    TakeProfit,
    StopLoss,
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::TakeProfit => write!(f, "take-profit"),
            Bound::StopLoss => write!(f, "stop-loss"),
        }
    }
}

/// Errors raised by the projection engine.
///
/// Permissive mode never produces `InvalidInput` or `InvalidBound`; those are
/// only reported once strict validation is requested.
#[derive(Debug, Error)]
pub enum CalcError {
    /// A position parameter is outside its accepted range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A bound sits on the wrong side of the entry price
    #[error("Invalid bound: {bound} {price} is on the wrong side of entry price {entry}")]
    InvalidBound { bound: Bound, price: f64, entry: f64 },

    /// A sweep would exceed the configured row cap
    #[error("Sweep too large: {direction} sweep has {len} prices (max {max})")]
    SweepTooLarge {
        direction: Direction,
        len: usize,
        max: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;
