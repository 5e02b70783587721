use crate::types::weather_table::CleanedWeather;
use crate::weather_data::error::WeatherDataError;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Writes the cleaned table to `path` as CSV, overwriting any existing file.
///
/// The date index is written as the first column, `DATE`, formatted `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns [`WeatherDataError::OutputCreate`] if the file cannot be created and
/// [`WeatherDataError::CsvWrite`] if encoding fails.
pub fn export_cleaned_csv(cleaned: &CleanedWeather, path: &Path) -> Result<(), WeatherDataError> {
    let file =
        File::create(path).map_err(|e| WeatherDataError::OutputCreate(path.to_path_buf(), e))?;

    // CsvWriter needs `&mut DataFrame`
    let mut df = cleaned.frame.clone();
    CsvWriter::new(file)
        .include_header(true)
        .with_date_format(Some(DATE_FORMAT.to_string()))
        .finish(&mut df)
        .map_err(|e| WeatherDataError::CsvWrite(path.to_path_buf(), e))?;

    info!("Wrote {} cleaned rows to {}", df.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::weather_table::WeatherTable;
    use crate::weather_data::cleaner::clean_weather_table;
    use std::fs;
    use tempfile::TempDir;

    fn cleaned(years: &[i64]) -> Result<CleanedWeather, Box<dyn std::error::Error>> {
        let n = years.len();
        let frame = df!(
            "YEAR" => years.to_vec(),
            "MONTH" => vec![3i64; n],
            "DAY" => vec![7i64; n],
            "MAX TEMP" => vec![40.0; n],
            "MIN TEMP" => vec![20.0; n],
            "PRECIPITATION" => vec![0.25; n],
        )?;
        Ok(clean_weather_table(WeatherTable::new(frame))?.0)
    }

    #[test]
    fn test_export_writes_date_index_first() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("cleaned_weather_data.csv");

        export_cleaned_csv(&cleaned(&[2021, 2022])?, &path)?;

        let contents = fs::read_to_string(&path)?;
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("DATE,YEAR,MONTH,DAY,MAX TEMP,MIN TEMP,PRECIPITATION")
        );
        assert!(lines.next().unwrap().starts_with("2021-03-07,2021,3,7,"));
        assert!(lines.next().unwrap().starts_with("2022-03-07,2022,3,7,"));
        assert_eq!(lines.next(), None);
        Ok(())
    }

    #[test]
    fn test_export_overwrites_existing_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("out.csv");
        fs::write(&path, "stale\nstale\nstale\nstale\n")?;

        export_cleaned_csv(&cleaned(&[2021])?, &path)?;

        assert_eq!(fs::read_to_string(&path)?.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn test_export_into_missing_directory_fails() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("missing").join("out.csv");

        let result = export_cleaned_csv(&cleaned(&[2021])?, &path);

        assert!(matches!(result, Err(WeatherDataError::OutputCreate(..))));
        Ok(())
    }
}
