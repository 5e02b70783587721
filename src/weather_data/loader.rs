//! Reads the weather CSV into a [`WeatherTable`].

use crate::types::weather_table::WeatherTable;
use crate::weather_data::error::WeatherDataError;
use log::{debug, info};
use polars::prelude::*;
use std::path::Path;
use std::str::FromStr;

/// Loads a CSV file with a header row into a [`WeatherTable`].
///
/// Column names are kept exactly as they appear in the header, whitespace included.
/// String columns whose non-empty values are all numbers once trimmed (the source data
/// pads values with spaces) are converted to `Int64` when written as integers and to
/// `Float64` otherwise, as the reader would have inferred them without the padding.
///
/// # Errors
///
/// Returns [`WeatherDataError::InputMissing`] if `path` does not exist and
/// [`WeatherDataError::CsvRead`] if the file cannot be parsed as CSV.
pub fn load_weather_csv(path: &Path) -> Result<WeatherTable, WeatherDataError> {
    if !path.exists() {
        return Err(WeatherDataError::InputMissing(path.to_path_buf()));
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| WeatherDataError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .finish()
        .map_err(|e| WeatherDataError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    recover_numeric_text(&mut df)?;

    info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(WeatherTable::new(df))
}

fn recover_numeric_text(df: &mut DataFrame) -> PolarsResult<()> {
    let recovered: Vec<Series> = df
        .get_columns()
        .iter()
        .filter_map(parse_numeric_text)
        .collect();

    for series in recovered {
        debug!(
            "Recovered padded numeric column '{}' as {}",
            series.name(),
            series.dtype()
        );
        df.with_column(series)?;
    }
    Ok(())
}

/// Parses a string column as numbers, or `None` if any non-empty value is not a number.
///
/// The column is `Int64` only if every value is written as an integer, so `" 1.0"` stays
/// a float.
fn parse_numeric_text(column: &Column) -> Option<Series> {
    let text = column.str().ok()?;
    let trimmed: Vec<Option<&str>> = text
        .into_iter()
        .map(|value| value.map(str::trim).filter(|value| !value.is_empty()))
        .collect();

    let name = column.name().clone();
    if let Some(integers) = parse_all::<i64>(&trimmed) {
        return Some(Series::new(name, integers));
    }
    parse_all::<f64>(&trimmed).map(|floats| Series::new(name, floats))
}

/// Parses every present value as `T`, `None` if any of them fails.
fn parse_all<T: FromStr>(values: &[Option<&str>]) -> Option<Vec<Option<T>>> {
    values
        .iter()
        .copied()
        .map(|value| value.map(str::parse::<T>).transpose().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("data.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_reports_shape_and_raw_names() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = write_csv(
            &dir,
            "YEAR,MONTH,DAY, MAX TEMP ,MIN TEMP,MEAN TEMP,PRECIPITATION\n\
             2020,1,1,40.0,20.0,30.0,0.0\n\
             2020,1,2,45.0,22.0,33.5,0.5\n",
        );

        let table = load_weather_csv(&path)?;

        assert_eq!(table.shape(), (2, 7));
        assert_eq!(
            table.column_names(),
            vec![
                "YEAR",
                "MONTH",
                "DAY",
                " MAX TEMP ",
                "MIN TEMP",
                "MEAN TEMP",
                "PRECIPITATION"
            ]
        );
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_weather_csv(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(WeatherDataError::InputMissing(_))));
    }

    #[test]
    fn test_load_recovers_padded_numbers() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = write_csv(
            &dir,
            "YEAR, MAX TEMP, STATION\n2020, 40.5, north\n2021, -99.9, south\n",
        );

        let table = load_weather_csv(&path)?;

        let year = table.frame.column("YEAR")?;
        assert_eq!(year.dtype(), &DataType::Int64);

        let max_temp = table.frame.column(" MAX TEMP")?;
        assert_eq!(max_temp.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = max_temp.f64()?.into_iter().collect();
        assert_eq!(values, vec![Some(40.5), Some(-99.9)]);

        let station = table.frame.column(" STATION")?;
        assert_eq!(station.dtype(), &DataType::String);
        Ok(())
    }

    #[test]
    fn test_parse_numeric_text_keeps_text_columns() -> PolarsResult<()> {
        let column: Column = Series::new("name".into(), ["1", "two"]).into();
        assert!(parse_numeric_text(&column).is_none());

        let column: Column = Series::new("n".into(), [Some(" 3 "), None, Some("")]).into();
        let parsed = parse_numeric_text(&column).unwrap();
        assert_eq!(parsed.dtype(), &DataType::Int64);
        assert_eq!(parsed.null_count(), 2);
        Ok(())
    }

    #[test]
    fn test_load_keeps_padded_decimals_as_float() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = write_csv(&dir, "YEAR, SNOW, DEPTH
2020, 1.0, 3
2021, 2.0, 1e2
");

        let table = load_weather_csv(&path)?;

        assert_eq!(table.frame.column("YEAR")?.dtype(), &DataType::Int64);
        let snow = table.frame.column(" SNOW")?;
        assert_eq!(snow.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = snow.f64()?.into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0)]);
        assert_eq!(table.frame.column(" DEPTH")?.dtype(), &DataType::Float64);
        Ok(())
    }
}
