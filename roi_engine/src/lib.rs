/// lib.rs — Futures ROI engine
///
/// Leveraged long-position projection: price sweeps from the entry price
/// toward take-profit and stop-loss, with PNL / ROI / margin ratio per price.
/// No presentation code lives here.
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod projection;
pub mod rounding;
pub mod sweep;

pub use config::CalculatorConfig;
pub use error::{Bound, CalcError, Result};
pub use models::*;
pub use projection::{Projection, SweepOptions, ValidationMode};
