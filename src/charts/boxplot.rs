use std::path::Path;

use plotters::prelude::*;

use super::{
    area_err, category_label, category_range, config_err, draw_err, padded_range, title_font,
    ChartError, ChartSize, Result, FONT,
};
use crate::analysis::distribution::BoxSummary;
use crate::color::ColorMap;

/// Half the width of a box, in category units.
const BOX_HALF_WIDTH: f64 = 0.3;

/// Axis text for a box plot.
pub struct BoxPlotLabels<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
}

/// Draw one vertical box per `(label, summary)` pair, left to right.
///
/// Boxes span Q1..Q3 with a median line, whiskers reach the most extreme
/// observations inside the 1.5·IQR fences and outliers are drawn as dots.
pub fn render_boxes(
    boxes: &[(String, &BoxSummary)],
    labels: &BoxPlotLabels<'_>,
    output_path: &Path,
    size: ChartSize,
) -> Result<()> {
    if boxes.is_empty() {
        return Err(ChartError::InvalidData("No boxes to draw".to_string()));
    }

    let names: Vec<String> = boxes.iter().map(|(name, _)| name.clone()).collect();
    let colors = ColorMap::new(names.as_slice());
    let y_min = boxes.iter().map(|(_, b)| b.min).fold(f64::INFINITY, f64::min);
    let y_max = boxes.iter().map(|(_, b)| b.max).fold(f64::NEG_INFINITY, f64::max);

    let root = BitMapBackend::new(output_path, size.dims()).into_drawing_area();
    root.fill(&WHITE).map_err(area_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(category_range(boxes.len()), padded_range(y_min, y_max, 0.05))
        .map_err(config_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(boxes.len())
        .x_label_formatter(&|v| category_label(&names, *v))
        .x_desc(labels.x_desc)
        .y_desc(labels.y_desc)
        .axis_desc_style((FONT, 24))
        .label_style((FONT, 20))
        .draw()
        .map_err(draw_err)?;

    for (i, (name, b)) in boxes.iter().enumerate() {
        let x = i as f64;
        let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
        let cap = BOX_HALF_WIDTH / 2.0;
        let outline = BLACK.stroke_width(2);

        chart
            .draw_series([
                Rectangle::new([(left, b.q1), (right, b.q3)], colors.color_for(name).filled()),
                Rectangle::new([(left, b.q1), (right, b.q3)], outline),
            ])
            .map_err(draw_err)?;

        chart
            .draw_series([
                // Median
                PathElement::new(vec![(left, b.median), (right, b.median)], outline),
                // Whiskers and caps
                PathElement::new(vec![(x, b.q3), (x, b.whisker_high)], outline),
                PathElement::new(vec![(x, b.q1), (x, b.whisker_low)], outline),
                PathElement::new(vec![(x - cap, b.whisker_high), (x + cap, b.whisker_high)], outline),
                PathElement::new(vec![(x - cap, b.whisker_low), (x + cap, b.whisker_low)], outline),
            ])
            .map_err(draw_err)?;

        chart
            .draw_series(
                b.outliers
                    .iter()
                    .map(|&v| Circle::new((x, v), 4, BLACK.stroke_width(1))),
            )
            .map_err(draw_err)?;
    }

    root.present().map_err(draw_err)?;
    Ok(())
}
