//! Fixed layout of the three charts.

use crate::types::columns::{MAX_TEMP, MEAN_TEMP, MIN_TEMP, PRECIPITATION};
use plotters::style::RGBColor;

/// Pixels per inch of the written images.
pub const DPI: u32 = 300;

pub const FONT: &str = "sans-serif";
pub const TITLE_FONT_SIZE: u32 = 16 * DPI / 72;
pub const AXIS_DESC_FONT_SIZE: u32 = 12 * DPI / 72;
pub const TICK_FONT_SIZE: u32 = 10 * DPI / 72;
pub const LEGEND_FONT_SIZE: u32 = 11 * DPI / 72;

pub const GRID_ALPHA: f64 = 0.3;
pub const BAND_COLOR: RGBColor = RGBColor(173, 216, 230);
pub const BAND_ALPHA: f64 = 0.3;

pub const DASH_LENGTH: u32 = 24;
pub const DASH_SPACING: u32 = 12;

/// One plotted column.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub column: &'static str,
    pub label: &'static str,
    pub color: RGBColor,
    pub stroke_width: u32,
    pub dashed: bool,
}

/// Everything needed to draw one chart besides the data.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub file_name: &'static str,
    /// Width and height in pixels.
    pub size: (u32, u32),
    pub title: &'static str,
    pub y_desc: &'static str,
    pub lines: &'static [LineStyle],
    /// Upper and lower column of a shaded band drawn under the lines.
    pub band: Option<(&'static str, &'static str)>,
}

/// Pixel width of a line given in tenths of a point.
const fn points(tenths: u32) -> u32 {
    tenths * DPI / 720
}

pub const TEMPERATURE_CHART: ChartSpec = ChartSpec {
    file_name: "temperatures_over_time.png",
    size: (12 * DPI, 8 * DPI),
    title: "Max and Min Temperatures Over Time",
    y_desc: "Temperature (°F)",
    lines: &[
        LineStyle {
            column: MAX_TEMP,
            label: "Max Temperature",
            color: RGBColor(0xFF, 0x6B, 0x6B),
            stroke_width: points(15),
            dashed: false,
        },
        LineStyle {
            column: MIN_TEMP,
            label: "Min Temperature",
            color: RGBColor(0x4D, 0x96, 0xFF),
            stroke_width: points(15),
            dashed: false,
        },
    ],
    band: Some((MAX_TEMP, MIN_TEMP)),
};

pub const PRECIPITATION_CHART: ChartSpec = ChartSpec {
    file_name: "precipitation_over_time.png",
    size: (12 * DPI, 6 * DPI),
    title: "Precipitation Over Time",
    y_desc: "Precipitation (inches)",
    lines: &[LineStyle {
        column: PRECIPITATION,
        label: "Precipitation",
        color: RGBColor(0x45, 0xB7, 0xD1),
        stroke_width: points(15),
        dashed: true,
    }],
    band: None,
};

pub const MEAN_TEMPERATURE_CHART: ChartSpec = ChartSpec {
    file_name: "mean_temperature_over_time.png",
    size: (12 * DPI, 6 * DPI),
    title: "Mean Temperature Over Time",
    y_desc: "Temperature (°F)",
    lines: &[LineStyle {
        column: MEAN_TEMP,
        label: "Mean Temperature",
        color: RGBColor(0x10, 0xB9, 0x81),
        stroke_width: points(20),
        dashed: false,
    }],
    band: None,
};

/// The charts in the order they are written.
pub const ALL_CHARTS: [ChartSpec; 3] = [TEMPERATURE_CHART, PRECIPITATION_CHART, MEAN_TEMPERATURE_CHART];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_match_figure_inches_at_dpi() {
        assert_eq!(TEMPERATURE_CHART.size, (3600, 2400));
        assert_eq!(PRECIPITATION_CHART.size, (3600, 1800));
        assert_eq!(MEAN_TEMPERATURE_CHART.size, (3600, 1800));
    }

    #[test]
    fn test_only_precipitation_is_dashed() {
        for chart in ALL_CHARTS {
            for line in chart.lines {
                assert_eq!(line.dashed, line.column == PRECIPITATION, "{}", line.column);
            }
        }
    }

    #[test]
    fn test_file_names_are_distinct() {
        let mut names: Vec<&str> = ALL_CHARTS.iter().map(|chart| chart.file_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_point_conversion() {
        assert_eq!(points(15), 6);
        assert_eq!(points(20), 8);
        assert_eq!(TITLE_FONT_SIZE, 66);
    }
}
