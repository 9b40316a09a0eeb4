/// metrics.rs — Per-price Position Metrics
///
/// ─────────────────────────────────────────────────────────────────────────
/// DEFINITIONS
/// ─────────────────────────────────────────────────────────────────────────
///
/// UNREALIZED PNL (long only)
///   Q      = (C × L) / E
///   PNL(p) = (p − E) × Q
///
/// ROI
///   ROI(p) = PNL(p) / C × 100
///
/// MARGIN RATIO
///   MR(p)  = C / (C + PNL(p)) × 100,    C + PNL(p) ≠ 0
///          = +∞                          C + PNL(p) = 0
///
///   where E = entry price, C = capital, L = leverage, p = swept price.
///
/// ROUNDING
///   PNL and ROI → 4 dp, MR → 2 dp, each computed from the unrounded PNL.
///   p is the sweep's already-rounded price.
/// ─────────────────────────────────────────────────────────────────────────
use crate::models::{MetricRecord, Position};
use crate::rounding::round_to;

pub const PNL_DECIMALS: u32 = 4;
pub const ROI_DECIMALS: u32 = 4;
pub const MARGIN_RATIO_DECIMALS: u32 = 2;

pub fn unrealized_pnl(price: f64, position: &Position) -> f64 {
    (price - position.entry_price) * position.quantity
}

pub fn roi_pct(pnl: f64, capital: f64) -> f64 {
    (pnl / capital) * 100.0
}

/// Capital as a percentage of capital + PNL; `+inf` when that sum is zero.
pub fn margin_ratio_pct(pnl: f64, capital: f64) -> f64 {
    let equity = capital + pnl;
    if equity == 0.0 {
        f64::INFINITY
    } else {
        (capital / equity) * 100.0
    }
}

pub fn metric_record(price: f64, position: &Position) -> MetricRecord {
    let pnl = unrealized_pnl(price, position);
    MetricRecord {
        price,
        unrealized_pnl: round_to(pnl, PNL_DECIMALS),
        roi_pct: round_to(roi_pct(pnl, position.capital), ROI_DECIMALS),
        margin_ratio_pct: round_to(margin_ratio_pct(pnl, position.capital), MARGIN_RATIO_DECIMALS),
    }
}

/// One record per price, in input order.
pub fn calculate_metrics(prices: &[f64], position: &Position) -> Vec<MetricRecord> {
    prices.iter().map(|&p| metric_record(p, position)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PositionParams;

    fn default_position() -> Position {
        Position::from_params(&PositionParams::default())
    }

    #[test]
    fn record_at_entry_is_flat() {
        let rec = metric_record(3339.0, &default_position());
        assert_eq!(rec.unrealized_pnl, 0.0);
        assert_eq!(rec.roi_pct, 0.0);
        assert_eq!(rec.margin_ratio_pct, 100.0);
    }

    #[test]
    fn record_at_take_profit() {
        let rec = metric_record(3450.0, &default_position());
        assert_eq!(rec.unrealized_pnl, 99.7305);
        assert_eq!(rec.roi_pct, 99.7305);
        // 100 / 199.7305 × 100
        assert_eq!(rec.margin_ratio_pct, 50.07);
    }

    #[test]
    fn pnl_sign_follows_price() {
        let pos = default_position();
        assert!(unrealized_pnl(3339.01, &pos) > 0.0);
        assert!(unrealized_pnl(3338.99, &pos) < 0.0);
        assert_eq!(unrealized_pnl(3339.0, &pos), 0.0);
    }

    #[test]
    fn margin_ratio_sentinel_on_total_loss() {
        assert_eq!(margin_ratio_pct(-100.0, 100.0), f64::INFINITY);

        // entry 100, capital 10, 10x → qty 1; price 90 wipes capital exactly
        let pos = Position::from_params(&PositionParams {
            entry_price: 100.0,
            capital: 10.0,
            leverage: 10,
            take_profit: 110.0,
            stop_loss: 90.0,
            decimal_places: 0,
        });
        let rec = metric_record(90.0, &pos);
        assert_eq!(rec.unrealized_pnl, -10.0);
        assert_eq!(rec.roi_pct, -100.0);
        assert!(rec.margin_ratio_undefined());
    }

    #[test]
    fn margin_ratio_past_liquidation_goes_negative() {
        // equity below zero is still a finite ratio
        assert_eq!(margin_ratio_pct(-200.0, 100.0), -100.0);
    }

    #[test]
    fn order_is_preserved() {
        let pos = default_position();
        let prices = [3340.0, 3339.0, 3340.0, 3338.0];
        let out = calculate_metrics(&prices, &pos);
        let back: Vec<f64> = out.iter().map(|r| r.price).collect();
        assert_eq!(back, prices);
        assert_eq!(out[0], out[2]);
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(calculate_metrics(&[], &default_position()).is_empty());
    }
}
