use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analysis::correlation::{correlation_matrix, CorrelationMatrix};
use crate::analysis::crosstab::{cross_tabulate, CrossTab};
use crate::analysis::describe::{describe, DescribeReport};
use crate::analysis::distribution::{column_distribution, grouped_distribution, BoxSummary, GroupBox};
use crate::analysis::grouped_mean::{grouped_mean, GroupMean};
use crate::charts::bar::render_stacked_bars;
use crate::charts::boxplot::{render_boxes, BoxPlotLabels};
use crate::charts::heatmap::render_heatmap;
use crate::charts::line::render_line;
use crate::config::AnalysisConfig;
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::data::schema::{self, AGE, DEMOGRAPHICS, GENDER, INCOME, PLATFORM};
use crate::error::{AnalysisError, Result};
use crate::report::format_describe;

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// One step of the analysis, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Describe,
    AgeDistribution,
    IncomeByDemographics,
    PlatformByGender,
    IncomeByAge,
    Correlation,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Describe,
        Stage::AgeDistribution,
        Stage::IncomeByDemographics,
        Stage::PlatformByGender,
        Stage::IncomeByAge,
        Stage::Correlation,
    ];

    /// Base name of the files a stage writes.
    pub fn file_stem(self) -> &'static str {
        match self {
            Stage::Describe => "describe",
            Stage::AgeDistribution => "age_distribution",
            Stage::IncomeByDemographics => "income_by_demographics",
            Stage::PlatformByGender => "platform_by_gender",
            Stage::IncomeByAge => "income_by_age",
            Stage::Correlation => "correlation_heatmap",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Describe => "Data Description",
            Stage::AgeDistribution => "Age Distribution",
            Stage::IncomeByDemographics => "Income Distribution by Demographics",
            Stage::PlatformByGender => "Platform Usage by Gender",
            Stage::IncomeByAge => "Average Income by Age",
            Stage::Correlation => "Correlation Heatmap of Numerical and Boolean Features",
        }
    }

    /// `(x, y)` axis descriptions of the stage's chart.
    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            Stage::Describe | Stage::Correlation => ("", ""),
            Stage::AgeDistribution => ("", "Age"),
            Stage::IncomeByDemographics => ("Demographics", "Income"),
            Stage::PlatformByGender => ("Gender", "Number of Users"),
            Stage::IncomeByAge => ("Age", "Average Income"),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Computed result of a stage, before anything is printed or drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StageOutput {
    Describe(DescribeReport),
    AgeDistribution(Option<BoxSummary>),
    IncomeByDemographics(Vec<GroupBox>),
    PlatformByGender(CrossTab),
    IncomeByAge(Vec<GroupMean>),
    Correlation(CorrelationMatrix),
}

impl StageOutput {
    /// True when there is nothing to draw.
    fn is_empty(&self) -> bool {
        match self {
            StageOutput::Describe(_) => false,
            StageOutput::AgeDistribution(summary) => summary.is_none(),
            StageOutput::IncomeByDemographics(groups) => groups.is_empty(),
            StageOutput::PlatformByGender(table) => table.rows.is_empty(),
            StageOutput::IncomeByAge(means) => means.is_empty(),
            StageOutput::Correlation(matrix) => matrix.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisPipeline
// ---------------------------------------------------------------------------

/// Stages that finished and stages that failed, in execution order.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    pub completed: Vec<Stage>,
    pub failures: Vec<(Stage, AnalysisError)>,
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs every stage over one loaded dataset.
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    dataset: Dataset,
}

impl AnalysisPipeline {
    /// Load `config.data_path`; a failure here aborts every stage.
    pub fn load(config: AnalysisConfig) -> Result<Self> {
        let dataset = load_file(&config.data_path)?;
        log::info!(
            "loaded {} rows x {} columns from {}",
            dataset.len(),
            dataset.column_names.len(),
            config.data_path.display()
        );
        if dataset.is_empty() {
            log::warn!("{} has a header but no rows", config.data_path.display());
        }
        Ok(Self::from_dataset(config, dataset))
    }

    pub fn from_dataset(config: AnalysisConfig, dataset: Dataset) -> Self {
        Self { config, dataset }
    }

    /// Run all stages in order. Unless `fail_fast` is set, a failing stage
    /// does not stop the ones after it.
    pub fn run(&self) -> PipelineOutcome {
        let schema_report = schema::validate(&self.dataset);
        if schema_report.is_complete() {
            log::debug!("all expected columns present");
        }
        for issue in &schema_report.issues {
            log::warn!("schema: {issue}");
        }

        let mut outcome = PipelineOutcome::default();
        for stage in Stage::ALL {
            log::info!("running stage {stage}");
            match self.compute(stage).and_then(|output| self.emit(stage, &output)) {
                Ok(()) => outcome.completed.push(stage),
                Err(e) => {
                    log::error!("stage {stage} failed: {e}");
                    outcome.failures.push((stage, e));
                    if self.config.fail_fast {
                        break;
                    }
                }
            }
        }
        outcome
    }

    /// Compute a stage's result without side effects.
    pub fn compute(&self, stage: Stage) -> Result<StageOutput> {
        let ds = &self.dataset;
        Ok(match stage {
            Stage::Describe => StageOutput::Describe(describe(ds)?),
            Stage::AgeDistribution => StageOutput::AgeDistribution(column_distribution(ds, AGE)?),
            Stage::IncomeByDemographics => StageOutput::IncomeByDemographics(grouped_distribution(
                ds,
                DEMOGRAPHICS,
                INCOME,
                self.config.demographic_order.as_deref(),
            )?),
            Stage::PlatformByGender => {
                StageOutput::PlatformByGender(cross_tabulate(ds, GENDER, PLATFORM)?)
            }
            Stage::IncomeByAge => StageOutput::IncomeByAge(grouped_mean(ds, AGE, INCOME)?),
            Stage::Correlation => StageOutput::Correlation(correlation_matrix(ds)?),
        })
    }

    fn emit(&self, stage: Stage, output: &StageOutput) -> Result<()> {
        if let StageOutput::Describe(report) = output {
            println!("{}", format_describe(report));
        }

        let render = self.config.render;
        if render.data() {
            self.write_data(stage, output)?;
        }
        if render.images() && stage != Stage::Describe {
            if output.is_empty() {
                log::warn!("{stage}: no data to plot, skipping chart");
            } else {
                self.write_chart(stage, output)?;
            }
        }
        Ok(())
    }

    fn output_path(&self, stage: Stage, extension: &str) -> Result<PathBuf> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|source| AnalysisError::Output {
            path: dir.clone(),
            source,
        })?;
        Ok(dir.join(format!("{}.{extension}", stage.file_stem())))
    }

    fn write_data(&self, stage: Stage, output: &StageOutput) -> Result<()> {
        let path = self.output_path(stage, "json")?;
        let json = serde_json::to_string_pretty(output).map_err(|e| AnalysisError::Output {
            path: path.clone(),
            source: e.into(),
        })?;
        fs::write(&path, json).map_err(|source| AnalysisError::Output {
            path: path.clone(),
            source,
        })?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    fn write_chart(&self, stage: Stage, output: &StageOutput) -> Result<()> {
        let path = self.output_path(stage, "png")?;
        draw(stage, output, &path, &self.config)?;
        log::debug!("saved chart to {}", path.display());
        Ok(())
    }
}

fn draw(stage: Stage, output: &StageOutput, path: &Path, config: &AnalysisConfig) -> Result<()> {
    let size = config.chart_size;
    let title = stage.title();
    let (x_desc, y_desc) = stage.axis_labels();
    match output {
        StageOutput::Describe(_) => {}
        StageOutput::AgeDistribution(summary) => {
            if let Some(summary) = summary {
                let labels = BoxPlotLabels {
                    title,
                    x_desc,
                    y_desc,
                };
                render_boxes(&[(AGE.to_string(), summary)], &labels, path, size)?;
            }
        }
        StageOutput::IncomeByDemographics(groups) => {
            let boxes: Vec<(String, &BoxSummary)> = groups
                .iter()
                .map(|g| (g.group.clone(), &g.summary))
                .collect();
            let labels = BoxPlotLabels {
                title,
                x_desc,
                y_desc,
            };
            render_boxes(&boxes, &labels, path, size)?;
        }
        StageOutput::PlatformByGender(table) => {
            render_stacked_bars(table, title, x_desc, y_desc, path, size)?;
        }
        StageOutput::IncomeByAge(means) => {
            let points: Vec<(f64, f64)> = means.iter().map(|m| (m.key, m.mean)).collect();
            render_line(&points, title, x_desc, y_desc, path, size)?;
        }
        StageOutput::Correlation(matrix) => {
            render_heatmap(matrix, title, path, size)?;
        }
    }
    Ok(())
}
