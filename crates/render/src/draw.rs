//! Drawing primitives shared by both charts.
//!
//! Trend lines are drawn as chart series. Markers and text boxes are drawn
//! in pixel space on the root area, using the chart only to map data
//! coordinates.

use crate::style::{Marker, NOTE_BACKGROUND};
use anyhow::Result;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

pub(crate) type Root<'b> = DrawingArea<BitMapBackend<'b>, Shift>;
pub(crate) type Chart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

pub(crate) const FONT: &str = "sans-serif";
pub(crate) const TITLE_FONT_SIZE: u32 = 30;
pub(crate) const AXIS_LABEL_FONT_SIZE: u32 = 22;
pub(crate) const TICK_LABEL_FONT_SIZE: u32 = 18;
pub(crate) const LEGEND_FONT_SIZE: u32 = 18;
pub(crate) const ANNOTATION_FONT_SIZE: u32 = 15;
pub(crate) const NOTE_FONT_SIZE: u32 = 15;

const DASH: u32 = 10;
const DASH_GAP: u32 = 6;
const BOX_PADDING: i32 = 4;

/// Axis descriptions, tick formats and grid.
pub(crate) fn configure_mesh(chart: &mut Chart<'_, '_>) -> Result<()> {
    chart
        .configure_mesh()
        .x_desc("End-to-End Latency (s)")
        .y_desc("Token Throughput (tok/s)")
        .x_label_formatter(&|x| format!("{:.1}", x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .label_style((FONT, TICK_LABEL_FONT_SIZE))
        .axis_desc_style((FONT, AXIS_LABEL_FONT_SIZE))
        .bold_line_style(BLACK.mix(0.12))
        .light_line_style(BLACK.mix(0.04))
        .draw()?;
    Ok(())
}

/// Pixel position of a data point.
pub(crate) fn to_pixel(chart: &Chart<'_, '_>, point: (f64, f64)) -> (i32, i32) {
    chart.plotting_area().map_coordinate(&point)
}

/// Filled marker with an optional black edge.
pub(crate) fn draw_marker(
    root: &Root<'_>,
    center: (i32, i32),
    marker: Marker,
    size: u32,
    fill: RGBAColor,
    edge_width: u32,
) -> Result<()> {
    let outline = marker.outline(center, size);
    root.draw(&Polygon::new(outline.clone(), fill.filled()))?;

    if edge_width > 0 {
        let mut closed = outline;
        let first = closed[0];
        closed.push(first);
        root.draw(&PathElement::new(closed, BLACK.stroke_width(edge_width)))?;
    }
    Ok(())
}

/// Dashed line through data points, in the given order.
pub(crate) fn draw_trend(
    chart: &mut Chart<'_, '_>,
    points: Vec<(f64, f64)>,
    colour: RGBAColor,
    width: u32,
) -> Result<()> {
    chart.draw_series(DashedLineSeries::new(
        points,
        DASH,
        DASH_GAP,
        colour.stroke_width(width),
    ))?;
    Ok(())
}

/// Boxed multi-line text with its top-left corner at `origin`.
pub(crate) fn draw_text_box(
    root: &Root<'_>,
    origin: (i32, i32),
    lines: &[String],
    font_size: u32,
    background: RGBAColor,
    border: ShapeStyle,
) -> Result<()> {
    if lines.is_empty() {
        return Ok(());
    }

    let style = (FONT, font_size).into_font().color(&BLACK);
    let mut width = 0;
    let mut line_height = font_size as i32;
    for line in lines {
        let (w, h) = root.estimate_text_size(line, &style)?;
        width = width.max(w as i32);
        line_height = line_height.max(h as i32);
    }
    let height = line_height * lines.len() as i32;

    let (x, y) = origin;
    let corners = [
        (x, y),
        (x + width + 2 * BOX_PADDING, y + height + 2 * BOX_PADDING),
    ];
    root.draw(&Rectangle::new(corners, background.filled()))?;
    root.draw(&Rectangle::new(corners, border))?;

    for (i, line) in lines.iter().enumerate() {
        let top = y + BOX_PADDING + line_height * i as i32;
        root.draw(&Text::new(line.as_str(), (x + BOX_PADDING, top), style.clone()))?;
    }
    Ok(())
}

/// Point annotation offset from its marker.
pub(crate) fn draw_annotation(
    root: &Root<'_>,
    anchor: (i32, i32),
    offset: (i32, i32),
    lines: &[String],
    colour: RGBColor,
    border_width: u32,
) -> Result<()> {
    draw_text_box(
        root,
        (anchor.0 + offset.0, anchor.1 + offset.1),
        lines,
        ANNOTATION_FONT_SIZE,
        WHITE.mix(0.8),
        colour.stroke_width(border_width),
    )
}

/// Note box in the upper-left corner of the plotting area.
pub(crate) fn draw_note(chart: &Chart<'_, '_>, root: &Root<'_>, lines: &[String]) -> Result<()> {
    let (x_range, y_range) = chart.plotting_area().get_pixel_range();
    draw_text_box(
        root,
        (x_range.start + 12, y_range.start + 12),
        lines,
        NOTE_FONT_SIZE,
        NOTE_BACKGROUND.mix(0.6),
        BLACK.mix(0.3).stroke_width(1),
    )
}

/// Register a legend entry showing `marker` without drawing any data.
pub(crate) fn legend_entry(
    chart: &mut Chart<'_, '_>,
    name: &str,
    marker: Marker,
    colour: RGBColor,
) -> Result<()> {
    let style = colour.filled();
    chart
        .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
        .label(name)
        .legend(move |(x, y)| Polygon::new(marker.outline((x + 10, y), 7), style));
    Ok(())
}

/// Legend box in the upper-right corner.
pub(crate) fn draw_legend<'a, 'b: 'a>(chart: &mut Chart<'a, 'b>) -> Result<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK.mix(0.5))
        .label_font((FONT, LEGEND_FONT_SIZE))
        .draw()?;
    Ok(())
}
