use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{
    area_err, category_label, category_range, config_err, draw_err, title_font, ChartError,
    ChartSize, Result, FONT,
};
use crate::analysis::correlation::CorrelationMatrix;
use crate::color::diverging;

/// Draw the correlation matrix as an annotated colour grid.
///
/// Row `i` of the matrix is drawn top to bottom, column `j` left to right;
/// each cell carries its coefficient to two decimals.
pub fn render_heatmap(
    matrix: &CorrelationMatrix,
    title: &str,
    output_path: &Path,
    size: ChartSize,
) -> Result<()> {
    if matrix.is_empty() {
        return Err(ChartError::InvalidData(
            "Correlation matrix cannot be empty".to_string(),
        ));
    }
    let n = matrix.len();
    // Flip rows so the first column name sits at the top.
    let row_y = |i: usize| (n - 1 - i) as f64;
    let row_labels: Vec<String> = matrix.columns.iter().rev().cloned().collect();

    let root = BitMapBackend::new(output_path, size.dims()).into_drawing_area();
    root.fill(&WHITE).map_err(area_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(120)
        .build_cartesian_2d(category_range(n), category_range(n))
        .map_err(config_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&|v| category_label(&matrix.columns, *v))
        .y_label_formatter(&|v| category_label(&row_labels, *v))
        .label_style((FONT, 20))
        .draw()
        .map_err(draw_err)?;

    let cells = (0..n).flat_map(|i| (0..n).map(move |j| (i, j)));

    chart
        .draw_series(cells.clone().map(|(i, j)| {
            let (x, y) = (j as f64, row_y(i));
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                diverging(matrix.get(i, j)).filled(),
            )
        }))
        .map_err(draw_err)?;

    // Cell borders
    chart
        .draw_series(cells.clone().map(|(i, j)| {
            let (x, y) = (j as f64, row_y(i));
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                WHITE.stroke_width(2),
            )
        }))
        .map_err(draw_err)?;

    let annotation = (FONT, 22)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series(cells.map(|(i, j)| {
            let value = matrix.get(i, j);
            let text = if value.is_nan() {
                "nan".to_string()
            } else {
                format!("{value:.2}")
            };
            Text::new(text, (j as f64, row_y(i)), annotation.clone())
        }))
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matrix_is_rejected() {
        let matrix = CorrelationMatrix {
            columns: Vec::new(),
            values: Vec::new(),
        };
        let path = std::env::temp_dir().join("empty_heatmap.png");
        let result = render_heatmap(&matrix, "Test", &path, ChartSize::default());
        assert!(matches!(result, Err(ChartError::InvalidData(_))));
    }

    #[test]
    fn renders_heatmap_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap.png");
        let matrix = CorrelationMatrix {
            columns: vec!["a".into(), "b".into()],
            values: vec![vec![1.0, -0.3], vec![-0.3, 1.0]],
        };
        render_heatmap(&matrix, "Test", &path, ChartSize::default()).unwrap();
        assert!(path.exists());
    }
}
