//! Frame wrappers for the raw and the cleaned weather table.

use crate::types::columns::DATE;
use crate::weather_data::error::WeatherDataError;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Polars stores `Date` as days since 1970-01-01; chrono counts days from 0001-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub(crate) fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub(crate) fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// The weather table as read from disk: original column names, raw values.
///
/// Obtained from [`crate::load_weather_csv`] and consumed by
/// [`crate::clean_weather_table`].
#[derive(Debug, Clone)]
pub struct WeatherTable {
    /// The underlying Polars DataFrame.
    pub frame: DataFrame,
}

impl WeatherTable {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn head(&self, rows: usize) -> DataFrame {
        self.frame.head(Some(rows))
    }
}

/// A weather table after cleaning.
///
/// Every row has non-null `MAX TEMP`, `MIN TEMP` and `PRECIPITATION` values and a
/// valid calendar date. Polars frames have no row index, so the date index is kept
/// as the [`DATE`] column, which is always the first column. Row order is the input
/// order minus dropped rows.
///
/// Instances are created by [`crate::clean_weather_table`].
#[derive(Debug, Clone)]
pub struct CleanedWeather {
    /// The underlying Polars DataFrame, `DATE` first.
    pub frame: DataFrame,
}

impl CleanedWeather {
    pub(crate) fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// `(rows, columns)`, the date index included.
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn head(&self, rows: usize) -> DataFrame {
        self.frame.head(Some(rows))
    }

    /// Dates of the index, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherDataError::DataFrameProcessing`] if the `DATE` column is missing
    /// or cannot be read as a date.
    pub fn dates(&self) -> Result<Vec<NaiveDate>, WeatherDataError> {
        let days = self.index_days()?;
        Ok(days
            .i32()?
            .into_iter()
            .flatten()
            .filter_map(date_from_epoch_days)
            .collect())
    }

    /// Earliest and latest date of the index, or `None` for an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherDataError::DataFrameProcessing`] if the `DATE` column is missing
    /// or cannot be read as a date.
    pub fn date_range(&self) -> Result<Option<(NaiveDate, NaiveDate)>, WeatherDataError> {
        let range = self.day_span()?.and_then(|(first, last)| {
            date_from_epoch_days(first).zip(date_from_epoch_days(last))
        });
        Ok(range)
    }

    /// First and last day of the index as days since 1970-01-01, `None` for an empty table.
    pub(crate) fn day_span(&self) -> PolarsResult<Option<(i32, i32)>> {
        let days = self.index_days()?;
        let days = days.i32()?;
        Ok(days.min().zip(days.max()))
    }

    /// Pairs of (days since epoch, value) for `column`, skipping rows where the value is null.
    pub(crate) fn series_points(&self, column: &str) -> PolarsResult<Vec<(i32, f64)>> {
        let days = self.index_days()?;
        let values = self.frame.column(column)?.cast(&DataType::Float64)?;
        let points = days
            .i32()?
            .into_iter()
            .zip(values.f64()?.into_iter())
            .filter_map(|(day, value)| Some((day?, value?)))
            .collect();
        Ok(points)
    }

    /// Triples of (days since epoch, upper, lower) for rows where both values are present.
    pub(crate) fn band_points(&self, upper: &str, lower: &str) -> PolarsResult<Vec<(i32, f64, f64)>> {
        let days = self.index_days()?;
        let upper = self.frame.column(upper)?.cast(&DataType::Float64)?;
        let lower = self.frame.column(lower)?.cast(&DataType::Float64)?;
        let points = days
            .i32()?
            .into_iter()
            .zip(upper.f64()?.into_iter())
            .zip(lower.f64()?.into_iter())
            .filter_map(|((day, upper), lower)| Some((day?, upper?, lower?)))
            .collect();
        Ok(points)
    }

    /// Hands the cleaned frame back as a plain table, e.g. to clean it again.
    pub fn into_table(self) -> WeatherTable {
        WeatherTable::new(self.frame)
    }

    fn index_days(&self) -> PolarsResult<Column> {
        self.frame.column(DATE)?.cast(&DataType::Int32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_days_round_trip() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(epoch_days(epoch), 0);

        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(epoch_days(date), 18_321);
        assert_eq!(date_from_epoch_days(18_321), Some(date));
    }

    #[test]
    fn test_date_from_epoch_days_rejects_overflow() {
        assert_eq!(date_from_epoch_days(i32::MAX), None);
    }

    #[test]
    fn test_table_shape_and_names() -> Result<(), PolarsError> {
        let table = WeatherTable::new(df!(
            "YEAR" => [2020i64, 2020],
            "MAX TEMP" => [40.0f64, 45.0],
        )?);
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.column_names(), vec!["YEAR", "MAX TEMP"]);
        assert_eq!(table.head(1).height(), 1);
        Ok(())
    }

    #[test]
    fn test_date_range_of_empty_table_is_none() -> Result<(), Box<dyn std::error::Error>> {
        let dates = Series::new(DATE.into(), Vec::<i32>::new()).cast(&DataType::Date)?;
        let cleaned = CleanedWeather::new(DataFrame::new(vec![dates.into()])?);
        assert!(cleaned.is_empty());
        assert_eq!(cleaned.date_range()?, None);
        assert_eq!(cleaned.day_span()?, None);
        assert!(cleaned.dates()?.is_empty());
        Ok(())
    }
}
