/// sweep.rs — Price Sweep Generator
///
/// ─────────────────────────────────────────────────────────────────────────
/// DEFINITION
/// ─────────────────────────────────────────────────────────────────────────
///
///   step S = 10^(−decimal_places)
///
///   UP   (entry E → take-profit T, T ≥ E)
///     n  = ⌊(T − E) / S⌋ + 1
///     p_i = round(E + i·S),   i = 0 … n−1      (p_0 = E)
///
///   DOWN (entry E → stop-loss T, T ≤ E)
///     n  = ⌊(E − T) / S⌋
///     p_i = round(E − i·S),   i = 1 … n        (E excluded)
///
///   A bound on the wrong side gives n ≤ 0 → empty sweep.
/// ─────────────────────────────────────────────────────────────────────────
use tracing::debug;

use crate::error::{CalcError, Result};
use crate::models::Direction;
use crate::rounding::round_to;

/// Minimum price increment for a given precision.
pub fn price_step(decimal_places: u32) -> f64 {
    1.0 / 10f64.powi(decimal_places as i32)
}

/// Number of prices a sweep will contain, without generating it.
///
/// Returns 0 for a bound on the wrong side, a non-positive step, or any
/// non-finite intermediate.
pub fn sweep_len(entry: f64, target: f64, step: f64, direction: Direction) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let span = match direction {
        Direction::Up => target - entry,
        Direction::Down => entry - target,
    };
    let steps = (span / step).floor();
    let count = match direction {
        Direction::Up => steps + 1.0,
        Direction::Down => steps,
    };
    if !count.is_finite() || count < 1.0 {
        0
    } else {
        count as usize
    }
}

/// Entry price up to take-profit, entry included.
pub fn ascending(entry: f64, take_profit: f64, decimal_places: u32) -> Vec<f64> {
    let step = price_step(decimal_places);
    let n = sweep_len(entry, take_profit, step, Direction::Up);
    (0..n)
        .map(|i| round_to(entry + i as f64 * step, decimal_places))
        .collect()
}

/// One step below entry price down to stop-loss.
pub fn descending(entry: f64, stop_loss: f64, decimal_places: u32) -> Vec<f64> {
    let step = price_step(decimal_places);
    let n = sweep_len(entry, stop_loss, step, Direction::Down);
    (1..=n)
        .map(|i| round_to(entry - i as f64 * step, decimal_places))
        .collect()
}

pub fn generate(direction: Direction, entry: f64, target: f64, decimal_places: u32) -> Vec<f64> {
    match direction {
        Direction::Up => ascending(entry, target, decimal_places),
        Direction::Down => descending(entry, target, decimal_places),
    }
}

/// `generate`, refusing to allocate more than `max_len` prices.
pub fn generate_capped(
    direction: Direction,
    entry: f64,
    target: f64,
    decimal_places: u32,
    max_len: Option<usize>,
) -> Result<Vec<f64>> {
    let len = sweep_len(entry, target, price_step(decimal_places), direction);
    if let Some(max) = max_len {
        if len > max {
            return Err(CalcError::SweepTooLarge { direction, len, max });
        }
    }
    debug!(%direction, entry, target, decimal_places, len, "generating price sweep");
    Ok(generate(direction, entry, target, decimal_places))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_from_precision() {
        assert_eq!(price_step(0), 1.0);
        assert_eq!(price_step(2), 0.01);
        assert_eq!(price_step(4), 0.0001);
    }

    #[test]
    fn ascending_default_scenario() {
        let prices = ascending(3339.0, 3450.0, 2);
        assert_eq!(prices.len(), 11_101);
        assert_eq!(prices[0], 3339.0);
        assert_eq!(prices[1], 3339.01);
        assert_eq!(*prices.last().unwrap(), 3450.0);
    }

    #[test]
    fn descending_default_scenario() {
        let prices = descending(3339.0, 3290.0, 2);
        assert_eq!(prices.len(), 4_900);
        assert_eq!(prices[0], 3338.99);
        assert_eq!(*prices.last().unwrap(), 3290.0);
        assert!(!prices.contains(&3339.0));
    }

    #[test]
    fn sweeps_are_monotonic() {
        let up = ascending(101.3, 104.0, 1);
        assert!(up.windows(2).all(|w| w[0] <= w[1]));
        let down = descending(101.3, 97.25, 1);
        assert!(down.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn degenerate_bound_at_entry() {
        assert_eq!(ascending(3339.0, 3339.0, 2), vec![3339.0]);
        assert!(descending(3339.0, 3339.0, 2).is_empty());
    }

    #[test]
    fn bound_on_wrong_side_is_empty() {
        assert!(ascending(3339.0, 3300.0, 2).is_empty());
        assert!(descending(3339.0, 3400.0, 2).is_empty());
        // less than one step below entry
        assert!(ascending(3339.0, 3338.995, 2).is_empty());
    }

    #[test]
    fn partial_last_step_is_dropped() {
        // 2.5 steps of 1.0 → floor
        assert_eq!(ascending(10.0, 12.5, 0), vec![10.0, 11.0, 12.0]);
        assert_eq!(descending(10.0, 7.5, 0), vec![9.0, 8.0]);
    }

    #[test]
    fn invalid_step_gives_zero_len() {
        assert_eq!(sweep_len(1.0, 2.0, 0.0, Direction::Up), 0);
        assert_eq!(sweep_len(1.0, 2.0, -0.1, Direction::Up), 0);
        assert_eq!(sweep_len(f64::NAN, 2.0, 0.1, Direction::Up), 0);
        assert_eq!(sweep_len(0.0, f64::INFINITY, 0.1, Direction::Up), 0);
    }

    #[test]
    fn cap_rejects_before_generating() {
        let err = generate_capped(Direction::Up, 3339.0, 3450.0, 2, Some(10_000)).unwrap_err();
        assert!(matches!(
            err,
            CalcError::SweepTooLarge { direction: Direction::Up, len: 11_101, max: 10_000 }
        ));
        let ok = generate_capped(Direction::Down, 3339.0, 3290.0, 2, Some(4_900)).unwrap();
        assert_eq!(ok.len(), 4_900);
    }
}
