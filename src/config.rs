use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::charts::ChartSize;
use crate::error::{AnalysisError, Result};

/// Input file read when no configuration overrides it.
pub const DEFAULT_DATA_PATH: &str = "dummy_data.csv";

/// Optional configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = "analysis.json";

/// What a chart stage produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// PNG images.
    #[default]
    Image,
    /// The computed chart data as JSON.
    Data,
    Both,
}

impl RenderMode {
    pub fn images(self) -> bool {
        matches!(self, RenderMode::Image | RenderMode::Both)
    }

    pub fn data(self) -> bool {
        matches!(self, RenderMode::Data | RenderMode::Both)
    }
}

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Run configuration. Every field has a default, so a configuration file
/// only needs the keys it changes:
///
/// ```json
/// { "data_path": "survey.csv", "render": "both", "fail_fast": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data_path: PathBuf,
    /// Where charts and chart data are written.
    pub output_dir: PathBuf,
    pub render: RenderMode,
    pub chart_size: ChartSize,
    /// Stop at the first failing stage instead of running the rest.
    pub fail_fast: bool,
    /// Display order for the demographic groups; unlisted groups follow in
    /// first-seen order.
    pub demographic_order: Option<Vec<String>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            output_dir: PathBuf::from("charts"),
            render: RenderMode::default(),
            chart_size: ChartSize::default(),
            fail_fast: false,
            demographic_order: None,
        }
    }
}

impl AnalysisConfig {
    /// Read `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no {} found, using default configuration", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Config(format!("reading {}: {e}", path.display())))?;
        let config = Self::from_json(&text)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| AnalysisError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.chart_size.width == 0 || self.chart_size.height == 0 {
            return Err(AnalysisError::Config(
                "chart_size must be non-zero in both dimensions".to_string(),
            ));
        }
        Ok(())
    }
}
