//! Draws the charts with the plotters bitmap backend.
//!
//! The x axis holds days since 1970-01-01 (the physical value of a Polars `Date`), tick
//! labels are formatted back into calendar dates.

use crate::charts::error::ChartError;
use crate::charts::style::{
    ChartSpec, LineStyle, ALL_CHARTS, AXIS_DESC_FONT_SIZE, BAND_ALPHA, BAND_COLOR, DASH_LENGTH,
    DASH_SPACING, FONT, GRID_ALPHA, LEGEND_FONT_SIZE, TICK_FONT_SIZE, TITLE_FONT_SIZE,
};
use crate::types::weather_table::{date_from_epoch_days, CleanedWeather};
use log::info;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

const MARGIN: u32 = 60;
const X_LABEL_AREA: u32 = 260;
const Y_LABEL_AREA: u32 = 200;
const X_TICKS: usize = 12;
const LEGEND_SAMPLE_LENGTH: i32 = 80;
const VALUE_PADDING: f64 = 0.05;
const EMPTY_VALUE_RANGE: Range<f64> = 0.0..1.0;

/// Renders the temperature, precipitation and mean temperature charts into `output_dir`.
///
/// Each chart is drawn on its own canvas, which is written and released before the next
/// one is created. Existing files are overwritten.
///
/// # Returns
///
/// The paths of the written images, in drawing order.
///
/// # Errors
///
/// Returns [`ChartError::EmptySeries`] if the table has no rows, [`ChartError::Data`] if a
/// plotted column is missing and [`ChartError::Render`] if drawing or writing the image
/// fails. A column without any value is drawn as an empty series.
pub fn render_charts(
    cleaned: &CleanedWeather,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, ChartError> {
    ALL_CHARTS
        .iter()
        .map(|spec| render_chart(cleaned, spec, output_dir))
        .collect()
}

/// Renders a single chart into `output_dir`, returning the written path.
pub fn render_chart(
    cleaned: &CleanedWeather,
    spec: &ChartSpec,
    output_dir: &Path,
) -> Result<PathBuf, ChartError> {
    let path = output_dir.join(spec.file_name);

    let series = spec
        .lines
        .iter()
        .map(|line| Ok((line, cleaned.series_points(line.column)?)))
        .collect::<Result<Vec<_>, ChartError>>()?;

    let band = match spec.band {
        Some((upper, lower)) => Some(band_polygon(&cleaned.band_points(upper, lower)?)),
        None => None,
    };

    let (first, last) = cleaned
        .day_span()?
        .ok_or_else(|| ChartError::EmptySeries(spec.file_name.to_string()))?;
    let x_range = day_range(first, last);
    let y_range = value_range(
        series
            .iter()
            .flat_map(|(_, points)| points.iter().map(|&(_, value)| value)),
    );

    draw(&path, spec, &series, band.as_deref(), x_range, y_range).map_err(|e| {
        ChartError::Render {
            path: path.clone(),
            message: e.to_string(),
        }
    })?;

    info!("Chart '{}' saved to {}", spec.title, path.display());
    Ok(path)
}

fn draw(
    path: &Path,
    spec: &ChartSpec,
    series: &[(&LineStyle, Vec<(i32, f64)>)],
    band: Option<&[(i32, f64)]>,
    x_range: Range<i32>,
    y_range: Range<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, spec.size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            spec.title,
            (FONT, TITLE_FONT_SIZE).into_font().style(FontStyle::Bold),
        )
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(spec.y_desc)
        .axis_desc_style((FONT, AXIS_DESC_FONT_SIZE))
        .x_labels(X_TICKS)
        .x_label_formatter(&format_tick)
        .x_label_style(
            (FONT, TICK_FONT_SIZE)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_label_style((FONT, TICK_FONT_SIZE))
        .bold_line_style(BLACK.mix(GRID_ALPHA))
        .light_line_style(TRANSPARENT)
        .draw()?;

    if let Some(polygon) = band {
        chart.draw_series(std::iter::once(Polygon::new(
            polygon.to_vec(),
            BAND_COLOR.mix(BAND_ALPHA).filled(),
        )))?;
    }

    for (line, points) in series {
        let color = line.color;
        let width = line.stroke_width;
        let style = color.stroke_width(width);
        let annotation = if line.dashed {
            chart.draw_series(DashedLineSeries::new(
                points.iter().copied(),
                DASH_LENGTH,
                DASH_SPACING,
                style,
            ))?
        } else {
            chart.draw_series(LineSeries::new(points.iter().copied(), style))?
        };
        annotation.label(line.label).legend(move |(x, y)| {
            PathElement::new(
                vec![(x, y), (x + LEGEND_SAMPLE_LENGTH, y)],
                color.stroke_width(width),
            )
        });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, LEGEND_FONT_SIZE))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn format_tick(day: &i32) -> String {
    date_from_epoch_days(*day)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Outline of the area between two lines: the upper values left to right, then the lower
/// values back.
fn band_polygon(points: &[(i32, f64, f64)]) -> Vec<(i32, f64)> {
    points
        .iter()
        .map(|&(day, upper, _)| (day, upper))
        .chain(points.iter().rev().map(|&(day, _, lower)| (day, lower)))
        .collect()
}

/// Date axis spanning the index. A single day is widened by a day on each side, since
/// plotters cannot map an empty range.
fn day_range(first: i32, last: i32) -> Range<i32> {
    if last > first {
        first..last
    } else {
        first.saturating_sub(1)..last.saturating_add(1)
    }
}

/// Value axis covering all finite values, padded by 5%. A flat series is padded by one
/// unit and a series without finite values gets [`EMPTY_VALUE_RANGE`].
fn value_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let bounds = values
        .filter(|value| value.is_finite())
        .fold(None, |bounds, value| {
            Some(match bounds {
                None => (value, value),
                Some((low, high)) => (value.min(low), value.max(high)),
            })
        });

    let Some((low, high)) = bounds else {
        return EMPTY_VALUE_RANGE;
    };
    let padding = if high > low {
        (high - low) * VALUE_PADDING
    } else {
        1.0
    };
    (low - padding)..(high + padding)
}
