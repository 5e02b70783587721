//! Cleans a daily weather CSV, summarizes its temperatures, charts it over time and
//! writes the cleaned table back out.
//!
//! The stages can be used on their own ([`load_weather_csv`], [`clean_weather_table`],
//! [`TemperatureSummary::from_cleaned`], [`render_charts`], [`export_cleaned_csv`]) or
//! run together through [`WeatherPipeline`].

mod charts;
mod error;
mod pipeline;
mod summary;
mod types;
mod weather_data;

pub use error::WeatherPipelineError;
pub use pipeline::*;
pub use summary::TemperatureSummary;

pub use types::columns::*;
pub use types::weather_table::{CleanedWeather, WeatherTable};

pub use weather_data::cleaner::{clean_weather_table, CleaningReport};
pub use weather_data::exporter::export_cleaned_csv;
pub use weather_data::loader::load_weather_csv;

pub use charts::renderer::{render_chart, render_charts};
pub use charts::style::{
    ChartSpec, LineStyle, ALL_CHARTS, MEAN_TEMPERATURE_CHART, PRECIPITATION_CHART,
    TEMPERATURE_CHART,
};

pub use charts::error::ChartError;
pub use weather_data::error::WeatherDataError;
