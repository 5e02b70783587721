//! Column names of the weather dataset.
//!
//! Names are compared after whitespace normalization, so `" MAX TEMP "` in a
//! raw header matches [`MAX_TEMP`].

pub const YEAR: &str = "YEAR";
pub const MONTH: &str = "MONTH";
pub const DAY: &str = "DAY";
pub const MAX_TEMP: &str = "MAX TEMP";
pub const MIN_TEMP: &str = "MIN TEMP";
pub const MEAN_TEMP: &str = "MEAN TEMP";
pub const PRECIPITATION: &str = "PRECIPITATION";

/// Date index column added by the cleaner. Always the first column of a cleaned table.
pub const DATE: &str = "DATE";

/// Columns holding floating point measurements that may carry sentinel codes.
pub const MEASUREMENT_COLUMNS: [&str; 4] = [MAX_TEMP, MIN_TEMP, MEAN_TEMP, PRECIPITATION];

/// Columns the date index is derived from.
pub const DATE_PART_COLUMNS: [&str; 3] = [YEAR, MONTH, DAY];

/// Literal values the source data uses instead of a missing marker.
pub const SENTINEL_VALUES: [f64; 2] = [-99.9, -99.99];

/// Returns `true` if `value` is exactly one of the [`SENTINEL_VALUES`].
pub fn is_sentinel(value: f64) -> bool {
    SENTINEL_VALUES.iter().any(|sentinel| *sentinel == value)
}
