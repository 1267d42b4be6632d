use std::path::Path;

use plotters::prelude::*;

use super::{
    area_err, category_label, category_range, config_err, draw_err, title_font, ChartError,
    ChartSize, Result, FONT,
};
use crate::analysis::crosstab::CrossTab;
use crate::color::ColorMap;

const BAR_HALF_WIDTH: f64 = 0.35;

/// Draw a cross-tab as stacked bars: one bar per row key, one coloured
/// segment per column key, with a legend of column keys.
pub fn render_stacked_bars(
    table: &CrossTab,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    output_path: &Path,
    size: ChartSize,
) -> Result<()> {
    if table.rows.is_empty() || table.columns.is_empty() {
        return Err(ChartError::InvalidData("Cross-tab cannot be empty".to_string()));
    }

    let colors = ColorMap::new(table.columns.as_slice());
    let tallest = (0..table.rows.len())
        .map(|i| table.row_total(i))
        .max()
        .unwrap_or(0) as f64;

    let root = BitMapBackend::new(output_path, size.dims()).into_drawing_area();
    root.fill(&WHITE).map_err(area_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(category_range(table.rows.len()), 0.0..(tallest * 1.1).max(1.0))
        .map_err(config_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(table.rows.len())
        .x_label_formatter(&|v| category_label(&table.rows, *v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style((FONT, 24))
        .label_style((FONT, 20))
        .draw()
        .map_err(draw_err)?;

    // Running top of each bar as segments are stacked.
    let mut base = vec![0.0f64; table.rows.len()];
    for (j, column) in table.columns.iter().enumerate() {
        let color = colors.color_for(column);
        let segments: Vec<Rectangle<(f64, f64)>> = base
            .iter_mut()
            .enumerate()
            .map(|(i, bottom)| {
                let top = *bottom + table.counts[i][j] as f64;
                let x = i as f64;
                let rect = Rectangle::new(
                    [(x - BAR_HALF_WIDTH, *bottom), (x + BAR_HALF_WIDTH, top)],
                    color.filled(),
                );
                *bottom = top;
                rect
            })
            .collect();

        chart
            .draw_series(segments)
            .map_err(draw_err)?
            .label(column.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font((FONT, 20))
        .draw()
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_is_rejected() {
        let table = CrossTab {
            row_label: "gender".into(),
            column_label: "platform".into(),
            rows: Vec::new(),
            columns: Vec::new(),
            counts: Vec::new(),
        };
        let path = std::env::temp_dir().join("empty_bars.png");
        let result = render_stacked_bars(&table, "t", "x", "y", &path, ChartSize::default());
        assert!(matches!(result, Err(ChartError::InvalidData(_))));
    }

    #[test]
    fn renders_stacked_bars_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.png");
        let table = CrossTab {
            row_label: "gender".into(),
            column_label: "platform".into(),
            rows: vec!["female".into(), "male".into()],
            columns: vec!["Facebook".into(), "YouTube".into()],
            counts: vec![vec![3, 1], vec![0, 4]],
        };
        render_stacked_bars(&table, "t", "x", "y", &path, ChartSize::default()).unwrap();
        assert!(path.exists());
    }
}
