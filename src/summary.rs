//! Temperature statistics over a cleaned table.

use crate::types::columns::{MAX_TEMP, MIN_TEMP};
use crate::types::weather_table::CleanedWeather;
use crate::weather_data::error::WeatherDataError;
use polars::prelude::*;
use std::fmt;

/// Extremes of the daily maximum and minimum temperatures.
///
/// Every field is `None` when the cleaned table has no rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSummary {
    pub highest_max_temp: Option<f64>,
    pub lowest_max_temp: Option<f64>,
    pub highest_min_temp: Option<f64>,
    pub lowest_min_temp: Option<f64>,
}

impl TemperatureSummary {
    /// Computes the summary. Reads `MAX TEMP` and `MIN TEMP` only.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherDataError::DataFrameProcessing`] if either column is missing or
    /// not numeric.
    pub fn from_cleaned(cleaned: &CleanedWeather) -> Result<Self, WeatherDataError> {
        let max_temp = cleaned.frame.column(MAX_TEMP)?.cast(&DataType::Float64)?;
        let min_temp = cleaned.frame.column(MIN_TEMP)?.cast(&DataType::Float64)?;
        let max_temp = max_temp.f64()?;
        let min_temp = min_temp.f64()?;

        Ok(Self {
            highest_max_temp: max_temp.max(),
            lowest_max_temp: max_temp.min(),
            highest_min_temp: min_temp.max(),
            lowest_min_temp: min_temp.min(),
        })
    }
}

/// Whole values keep their `.0`, fractions print in full.
struct Fahrenheit(Option<f64>);

impl fmt::Display for Fahrenheit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{:?}°F", value),
            None => write!(f, "n/a"),
        }
    }
}

impl fmt::Display for TemperatureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Highest Max Temp: {}", Fahrenheit(self.highest_max_temp))?;
        writeln!(f, "Lowest Max Temp: {}", Fahrenheit(self.lowest_max_temp))?;
        writeln!(f, "Highest Min Temp: {}", Fahrenheit(self.highest_min_temp))?;
        write!(f, "Lowest Min Temp: {}", Fahrenheit(self.lowest_min_temp))
    }
}
