/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ranking length of the `context` block when neither `--top` nor config `top` is set;
/// `breakdown` lists every value unless one of them is
pub(crate) const DEFAULT_TOP: usize = 10;

/// Printed instead of any report when no rows were loaded at all
pub(crate) const NO_DATA: &str = "No order data available.";
