//! Cleaning stage: header normalization, sentinel replacement, row filtering and the
//! date index.
//!
//! Rows are dropped in three phases (missing temperatures, invalid dates, then any
//! remaining missing temperature or precipitation). The final row set does not depend on
//! that order, but the shapes recorded in [`CleaningReport`] do.

use crate::types::columns::{
    DATE, DAY, MAX_TEMP, MEASUREMENT_COLUMNS, MIN_TEMP, MONTH, PRECIPITATION, SENTINEL_VALUES,
    YEAR,
};
use crate::types::weather_table::{epoch_days, CleanedWeather, WeatherTable};
use crate::weather_data::error::WeatherDataError;
use chrono::NaiveDate;
use log::{debug, info};
use polars::prelude::*;

/// Columns that must exist for the table to be cleaned at all.
const REQUIRED_COLUMNS: [&str; 6] = [YEAR, MONTH, DAY, MAX_TEMP, MIN_TEMP, PRECIPITATION];

/// Shapes of the table after each drop phase, as `(rows, columns)`.
///
/// Column counts leave out the derived date index, so a table that lost no rows keeps the
/// width it was loaded with. An input `DATE` column counts until it becomes the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleaningReport {
    pub loaded_shape: (usize, usize),
    pub after_temperature_drop: (usize, usize),
    pub after_date_drop: (usize, usize),
    pub final_shape: (usize, usize),
}

impl CleaningReport {
    /// Total number of rows removed by cleaning.
    pub fn dropped_rows(&self) -> usize {
        self.loaded_shape.0 - self.final_shape.0
    }
}

/// Cleans a raw weather table.
///
/// Steps, in order:
/// 1. strip whitespace around column names,
/// 2. cast the measurement columns to `Float64` and replace every value exactly equal to
///    -99.9 or -99.99 in a floating point column with null,
/// 3. drop rows where `MAX TEMP` or `MIN TEMP` is null,
/// 4. derive a date from `YEAR`/`MONTH`/`DAY` and drop rows where that is not a valid
///    calendar date,
/// 5. make the date the index (first column `DATE`, replacing any existing one),
/// 6. drop rows where `MAX TEMP`, `MIN TEMP` or `PRECIPITATION` is null.
///
/// Invalid dates are not an error, the rows are silently dropped.
///
/// # Errors
///
/// Returns [`WeatherDataError::MissingColumn`] if one of `YEAR`, `MONTH`, `DAY`,
/// `MAX TEMP`, `MIN TEMP` or `PRECIPITATION` is absent after header normalization, and
/// [`WeatherDataError::DataFrameProcessing`] if a Polars operation fails (for example two
/// headers that only differ in surrounding whitespace).
pub fn clean_weather_table(
    table: WeatherTable,
) -> Result<(CleanedWeather, CleaningReport), WeatherDataError> {
    let loaded_shape = table.shape();
    let mut df = table.frame;

    strip_column_names(&mut df)?;
    require_columns(&df)?;
    let had_date_column = df.get_column_index(DATE).is_some();

    let df = replace_sentinels(df)?;

    let df = drop_missing(df, &[MAX_TEMP, MIN_TEMP])?;
    let after_temperature_drop = df.shape();
    info!(
        "Shape after removing missing temperatures: {:?}",
        after_temperature_drop
    );

    let dates = date_index(&df)?;
    let mut df = df;
    df.with_column(dates)?;
    let df = drop_missing(df, &[DATE])?;
    // Not yet the index: only a freshly derived DATE column is left out.
    let after_date_drop = (df.height(), df.width() - usize::from(!had_date_column));
    info!("Shape after removing invalid dates: {:?}", after_date_drop);

    let df = move_index_first(df)?;
    let df = drop_missing(df, &[MAX_TEMP, MIN_TEMP, PRECIPITATION])?;
    let final_shape = shape_without_index(&df);
    info!("Final cleaned shape: {:?}", final_shape);

    let report = CleaningReport {
        loaded_shape,
        after_temperature_drop,
        after_date_drop,
        final_shape,
    };
    Ok((CleanedWeather::new(df), report))
}

fn strip_column_names(df: &mut DataFrame) -> PolarsResult<()> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    df.set_column_names(names)
}

fn require_columns(df: &DataFrame) -> Result<(), WeatherDataError> {
    for column in REQUIRED_COLUMNS {
        if df.get_column_index(column).is_none() {
            return Err(WeatherDataError::MissingColumn {
                column: column.to_string(),
                available: df
                    .get_column_names()
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
            });
        }
    }
    Ok(())
}

fn replace_sentinels(df: DataFrame) -> PolarsResult<DataFrame> {
    let casts: Vec<Expr> = MEASUREMENT_COLUMNS
        .iter()
        .filter(|name| df.get_column_index(name).is_some())
        .map(|name| col(*name).cast(DataType::Float64))
        .collect();
    let df = df.lazy().with_columns(casts).collect()?;

    let replacements: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype().is_float())
        .map(|column| sentinel_to_null(column.name().as_str()))
        .collect();
    debug!("Replacing sentinel values in {} columns", replacements.len());

    df.lazy().with_columns(replacements).collect()
}

fn sentinel_to_null(name: &str) -> Expr {
    let is_sentinel = SENTINEL_VALUES
        .iter()
        .map(|sentinel| col(name).eq(lit(*sentinel)))
        .reduce(|a, b| a.or(b))
        .unwrap_or(lit(false));

    when(is_sentinel)
        .then(lit(NULL).cast(DataType::Float64))
        .otherwise(col(name))
        .alias(name)
}

fn drop_missing(df: DataFrame, columns: &[&str]) -> PolarsResult<DataFrame> {
    let all_present = columns
        .iter()
        .map(|name| col(*name).is_not_null())
        .reduce(|a, b| a.and(b))
        .unwrap_or(lit(true));
    df.lazy().filter(all_present).collect()
}

/// Builds the `DATE` column. Rows without a valid calendar date get null.
fn date_index(df: &DataFrame) -> PolarsResult<Series> {
    let year = df.column(YEAR)?.cast(&DataType::Float64)?;
    let month = df.column(MONTH)?.cast(&DataType::Float64)?;
    let day = df.column(DAY)?.cast(&DataType::Float64)?;

    let days: Vec<Option<i32>> = year
        .f64()?
        .into_iter()
        .zip(month.f64()?.into_iter())
        .zip(day.f64()?.into_iter())
        .map(|((year, month), day)| calendar_date(year?, month?, day?).map(epoch_days))
        .collect();

    Series::new(DATE.into(), days).cast(&DataType::Date)
}

/// Resolves a year/month/day triple to a date, `None` if any part is not an integer or
/// the combination does not exist (e.g. February 30th).
pub(crate) fn calendar_date(year: f64, month: f64, day: f64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        integral_part(year)?,
        integral_part(month)?,
        integral_part(day)?,
    )
}

fn integral_part<T: TryFrom<i64>>(value: f64) -> Option<T> {
    if value.fract() != 0.0 {
        return None;
    }
    T::try_from(value as i64).ok()
}

fn move_index_first(df: DataFrame) -> PolarsResult<DataFrame> {
    let mut order = vec![DATE.to_string()];
    order.extend(
        df.get_column_names()
            .iter()
            .filter(|name| name.as_str() != DATE)
            .map(|name| name.to_string()),
    );
    df.select(order)
}

/// Shape of a table whose first column is the `DATE` index, leaving the index out.
fn shape_without_index(df: &DataFrame) -> (usize, usize) {
    (df.height(), df.width().saturating_sub(1))
}
