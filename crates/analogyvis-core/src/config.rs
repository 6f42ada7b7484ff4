// crates/analogyvis-core/src/config.rs
//! Study configuration, loaded from TOML. Every field has a default so an
//! empty file (or no file) describes the pilot study layout.

use std::fs;
use std::path::{Path, PathBuf};

use analogyvis_parser::ExportOptions;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudyConfig {
    pub export: ExportConfig,
    pub timing: TimingRules,
    pub vark: VarkConfig,
    pub filter: FilterConfig,
    pub sketches: SketchConfig,
}

impl StudyConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    pub metadata_rows: usize,
}

impl ExportConfig {
    pub fn options(&self) -> ExportOptions {
        ExportOptions {
            metadata_rows: self.metadata_rows,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingRules {
    /// Questions per timed task; every one needs a first and last click.
    pub question_count: u32,
    /// Attempts at or below this many seconds were skipped or abandoned.
    pub qualifying_threshold_secs: f64,
}

impl Default for TimingRules {
    fn default() -> Self {
        Self {
            question_count: 8,
            qualifying_threshold_secs: 900.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VarkConfig {
    pub column_prefix: String,
    pub item_count: u32,
}

impl Default for VarkConfig {
    fn default() -> Self {
        Self {
            column_prefix: "VARK".to_string(),
            item_count: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    pub columns: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            columns: vec![
                "ResponseId".to_string(),
                "PROLIFIC_PID".to_string(),
                "ChartType".to_string(),
            ],
        }
    }
}

/// Sketch folder pair for one chart type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartFolders {
    pub keyword: String,
    pub actual: String,
    pub analogy: String,
}

impl ChartFolders {
    fn new(keyword: &str, actual: &str, analogy: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            actual: actual.to_string(),
            analogy: analogy.to_string(),
        }
    }
}

static DEFAULT_CHARTS: Lazy<Vec<ChartFolders>> = Lazy::new(|| {
    vec![
        ChartFolders::new("bar", "BarActual", "BarAnalogy"),
        ChartFolders::new("heatmap", "HeatmapActual", "HeatmapAnalogy"),
        ChartFolders::new("sunburst", "Sunburst Draw", "SunburstAnalogy"),
        ChartFolders::new("histogram", "HistogramActual", "HistogramAnalogy"),
        ChartFolders::new("treemap", "TreemapActual", "TreemapAnalogy"),
        ChartFolders::new("bubble", "BubbleActual", "BubbleAnalogy"),
        ChartFolders::new("waterfall", "WaterfallActual", "WaterfallAnalogy"),
        ChartFolders::new("butterfly", "ButterflyActual", "ButterflyAnalogy"),
        ChartFolders::new("sankey", "Sankey Draw", "SankeyAnalogy"),
    ]
});

pub fn default_chart_folders() -> &'static [ChartFolders] {
    DEFAULT_CHARTS.as_slice()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SketchConfig {
    pub root: PathBuf,
    pub file_suffix: String,
    /// Analogy folders whose path is written even when the file is missing.
    pub always_link_analogy: Vec<String>,
    /// Checked in order; the first keyword found in the chart type wins.
    pub charts: Vec<ChartFolders>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("sketches"),
            file_suffix: "_signature.png".to_string(),
            always_link_analogy: vec!["WaterfallAnalogy".to_string()],
            charts: default_chart_folders().to_vec(),
        }
    }
}
