//! Chart rendering
//!
//! Every chart is drawn with the [`plotters`] bitmap backend and saved as a
//! PNG, so rendering works headless (Docker/CI) without a display. Category
//! axes are laid out on an `f64` range with one unit per category centred on
//! the integers `0..n`.

pub mod bar;
pub mod boxplot;
pub mod heatmap;
pub mod line;

use std::fmt::Display;

use plotters::style::{FontDesc, FontStyle, IntoFont};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save chart to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = core::result::Result<T, ChartError>;

/// Pixel size of every rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        ChartSize {
            width: 1200,
            height: 800,
        }
    }
}

impl ChartSize {
    pub(crate) fn dims(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

pub(crate) fn area_err<E: Display>(e: E) -> ChartError {
    ChartError::DrawingArea(e.to_string())
}

pub(crate) fn config_err<E: Display>(e: E) -> ChartError {
    ChartError::ChartConfig(e.to_string())
}

pub(crate) fn draw_err<E: Display>(e: E) -> ChartError {
    ChartError::Drawing(e.to_string())
}

pub(crate) const FONT: &str = "sans-serif";

/// Bold caption font shared by every chart.
pub(crate) fn title_font() -> FontDesc<'static> {
    (FONT, 32).into_font().style(FontStyle::Bold)
}

/// Axis range covering `n` categories centred on `0..n`.
pub(crate) fn category_range(n: usize) -> std::ops::Range<f64> {
    -0.5..(n as f64 - 0.5)
}

/// Label for a tick at `v` on a category axis; ticks between categories get
/// no label.
pub(crate) fn category_label(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// `lo..hi` widened by `pad` of its span on both sides; a zero span is
/// widened by one unit.
pub(crate) fn padded_range(lo: f64, hi: f64, pad: f64) -> std::ops::Range<f64> {
    let span = hi - lo;
    if span <= 0.0 || !span.is_finite() {
        return (lo - 1.0)..(hi + 1.0);
    }
    (lo - span * pad)..(hi + span * pad)
}
