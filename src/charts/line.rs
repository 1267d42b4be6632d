use std::path::Path;

use plotters::prelude::*;

use super::{
    area_err, config_err, draw_err, padded_range, title_font, ChartError, ChartSize, Result, FONT,
};

/// Line chart with circle markers through `points`, which must be sorted by x.
pub fn render_line(
    points: &[(f64, f64)],
    title: &str,
    x_desc: &str,
    y_desc: &str,
    output_path: &Path,
    size: ChartSize,
) -> Result<()> {
    if points.is_empty() {
        return Err(ChartError::InvalidData("Data cannot be empty".to_string()));
    }
    if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(ChartError::InvalidData(
            "Points must have finite coordinates".to_string(),
        ));
    }

    let x_min = points.first().map(|(x, _)| *x).unwrap_or(0.0);
    let x_max = points.last().map(|(x, _)| *x).unwrap_or(0.0);
    let y_min = points.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let y_max = points.iter().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max);

    let root = BitMapBackend::new(output_path, size.dims()).into_drawing_area();
    root.fill(&WHITE).map_err(area_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(
            padded_range(x_min, x_max, 0.02),
            padded_range(y_min, y_max, 0.08),
        )
        .map_err(config_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(BLACK.mix(0.05))
        .axis_desc_style((FONT, 24))
        .label_style((FONT, 20))
        .draw()
        .map_err(draw_err)?;

    let line_color = BLUE.mix(0.7);
    chart
        .draw_series(LineSeries::new(points.iter().copied(), line_color.stroke_width(2)))
        .map_err(draw_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, line_color.filled())),
        )
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_non_finite_points() {
        let path = std::env::temp_dir().join("invalid_line.png");
        let size = ChartSize::default();
        let result = render_line(&[], "t", "x", "y", &path, size);
        assert!(matches!(result, Err(ChartError::InvalidData(_))));
        let result = render_line(&[(1.0, f64::NAN)], "t", "x", "y", &path, size);
        assert!(matches!(result, Err(ChartError::InvalidData(_))));
    }

    #[test]
    fn renders_line_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.png");
        let points = [(18.0, 15000.0), (19.0, 14200.0), (20.0, 16100.0)];
        render_line(&points, "t", "x", "y", &path, ChartSize::default()).unwrap();
        assert!(path.exists());
    }
}
