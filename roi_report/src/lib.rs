/// lib.rs — Projection presentation
///
/// Console tables, ROI chart and file exports for `roi_engine` projections.
/// The `roi_calc` binary wires these to the command line.
pub mod chart;
pub mod reporting;

pub use reporting::{ReportConfig, ReportGenerator};
