//! Runs the five stages (load, clean, summarize, visualize, export) in order.

use crate::charts::renderer::render_charts;
use crate::error::WeatherPipelineError;
use crate::summary::TemperatureSummary;
use crate::types::weather_table::WeatherTable;
use crate::weather_data::cleaner::{clean_weather_table, CleaningReport};
use crate::weather_data::exporter::export_cleaned_csv;
use crate::weather_data::loader::load_weather_csv;
use bon::bon;
use chrono::NaiveDate;
use log::{info, warn};
use polars::prelude::DataFrame;
use std::fmt;
use std::path::{Path, PathBuf};

/// Input file read when no other path is given.
pub const DEFAULT_INPUT_FILE: &str = "data.csv";
/// File name of the cleaned CSV export.
pub const CLEANED_CSV_FILE: &str = "cleaned_weather_data.csv";

const HEAD_ROWS: usize = 5;
const BANNER_WIDTH: usize = 50;

/// The weather cleaning pipeline.
///
/// Reads `data.csv` and writes the three charts and `cleaned_weather_data.csv` into the
/// working directory unless told otherwise.
///
/// # Examples
///
/// ```no_run
/// use weather_pipeline::WeatherPipeline;
///
/// # fn main() -> Result<(), weather_pipeline::WeatherPipelineError> {
/// let report = WeatherPipeline::default().run()?;
/// println!("{}", report);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WeatherPipeline {
    input_path: PathBuf,
    output_dir: PathBuf,
}

#[bon]
impl WeatherPipeline {
    /// Creates a pipeline.
    ///
    /// # Arguments
    ///
    /// * `.input_path(impl Into<PathBuf>)`: Optional. CSV file to read. Defaults to `data.csv`.
    /// * `.output_dir(impl Into<PathBuf>)`: Optional. Directory receiving the charts and the
    ///   cleaned CSV. Defaults to the working directory.
    #[builder]
    pub fn new(
        #[builder(into)] input_path: Option<PathBuf>,
        #[builder(into)] output_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            input_path: input_path.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_FILE)),
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn export_path(&self) -> PathBuf {
        self.output_dir.join(CLEANED_CSV_FILE)
    }

    /// Runs every stage once.
    ///
    /// Charts are skipped when cleaning leaves no rows, the export still runs and
    /// writes a header-only CSV.
    ///
    /// # Errors
    ///
    /// Any stage failure is returned as is; nothing is retried. Invalid dates in the input
    /// are not failures, those rows are dropped.
    pub fn run(&self) -> Result<PipelineReport, WeatherPipelineError> {
        let table = load_weather_csv(&self.input_path)?;
        let loaded = LoadedOverview::of(&table);

        let (cleaned, cleaning) = clean_weather_table(table)?;
        let summary = TemperatureSummary::from_cleaned(&cleaned)?;
        let date_range = cleaned.date_range()?;

        let charts = if cleaned.is_empty() {
            warn!("No rows left after cleaning, skipping charts");
            Vec::new()
        } else {
            render_charts(&cleaned, &self.output_dir)?
        };

        let export_path = self.export_path();
        export_cleaned_csv(&cleaned, &export_path)?;

        info!(
            "Processed {} records from {}",
            cleaned.height(),
            self.input_path.display()
        );

        Ok(PipelineReport {
            loaded_shape: loaded.shape,
            column_names: loaded.column_names,
            loaded_head: loaded.head,
            cleaning,
            cleaned_head: cleaned.head(HEAD_ROWS),
            summary,
            date_range,
            charts,
            export_path,
            total_records: cleaned.height(),
        })
    }
}

impl Default for WeatherPipeline {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// What is printed about the table before it is consumed by cleaning.
struct LoadedOverview {
    shape: (usize, usize),
    column_names: Vec<String>,
    head: DataFrame,
}

impl LoadedOverview {
    fn of(table: &WeatherTable) -> Self {
        Self {
            shape: table.shape(),
            column_names: table.column_names(),
            head: table.head(HEAD_ROWS),
        }
    }
}

/// Outcome of a pipeline run.
///
/// Its `Display` output is the console report of the binary.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub loaded_shape: (usize, usize),
    /// Column names as found in the file, before whitespace normalization.
    pub column_names: Vec<String>,
    pub loaded_head: DataFrame,
    pub cleaning: CleaningReport,
    pub cleaned_head: DataFrame,
    pub summary: TemperatureSummary,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Written chart images, empty when the cleaned table had no rows.
    pub charts: Vec<PathBuf>,
    pub export_path: PathBuf,
    pub total_records: usize,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Loaded data shape: {:?}", self.loaded_shape)?;
        writeln!(f, "\nFirst {} rows:\n{}", HEAD_ROWS, self.loaded_head)?;
        writeln!(f, "\nColumn names:\n{:?}", self.column_names)?;

        writeln!(
            f,
            "\nCleaned data shape (after removing missing temps): {:?}",
            self.cleaning.after_temperature_drop
        )?;
        writeln!(f, "\nTemperature Statistics:\n{}", self.summary)?;
        writeln!(
            f,
            "\nData shape (after removing invalid dates): {:?}",
            self.cleaning.after_date_drop
        )?;
        writeln!(f, "\nFinal cleaned data shape: {:?}", self.cleaning.final_shape)?;
        writeln!(
            f,
            "\nFirst {} rows of final cleaned data:\n{}",
            HEAD_ROWS, self.cleaned_head
        )?;

        writeln!(f)?;
        for chart in &self.charts {
            writeln!(f, "Plot saved as '{}'", chart.display())?;
        }
        if self.charts.is_empty() {
            writeln!(f, "No plots saved: no rows left after cleaning")?;
        }
        writeln!(f, "Cleaned data saved as '{}'", self.export_path.display())?;

        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(f, "\n{}", rule)?;
        writeln!(f, "DATA PROCESSING COMPLETE")?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "Total records processed: {}",
            group_thousands(self.total_records)
        )?;
        if let Some((first, last)) = self.date_range {
            writeln!(
                f,
                "Date range: {} to {}",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            )?;
        }
        writeln!(f, "Plots saved:")?;
        for (number, chart) in self.charts.iter().enumerate() {
            let name = chart
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();
            writeln!(f, "  {}. {}", number + 1, name)?;
        }
        write!(f, "{}", rule)
    }
}

/// Formats `n` with `,` between groups of three digits.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_default_paths() {
        let pipeline = WeatherPipeline::default();
        assert_eq!(pipeline.input_path(), Path::new(DEFAULT_INPUT_FILE));
        assert_eq!(
            pipeline.export_path(),
            Path::new(".").join(CLEANED_CSV_FILE)
        );
    }

    #[test]
    fn test_builder_overrides_paths() {
        let pipeline = WeatherPipeline::builder()
            .input_path("in/weather.csv")
            .output_dir("out")
            .build();
        assert_eq!(pipeline.input_path(), Path::new("in/weather.csv"));
        assert_eq!(pipeline.export_path(), Path::new("out/cleaned_weather_data.csv"));
    }
}
