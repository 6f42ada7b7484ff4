// crates/analogyvis-core/src/sketches.rs
//! Links survey rows to the participant sketches saved on disk.
//!
//! Chart types are free text typed by the study team ("Bar Chart",
//! "heat-map", ...). Both the chart type and the keywords are reduced to
//! lowercase letters before matching.

use std::path::{Path, PathBuf};

use analogyvis_parser::schema::{CHART_TYPE_COLUMN, RESPONSE_ID_COLUMN};
use analogyvis_parser::{ParserError, SurveyExport};
use tracing::{debug, info};

use crate::columns::CsvTable;
use crate::config::{ChartFolders, SketchConfig};
use crate::error::Result;

pub fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Resolved sketch paths for one row; `None` when there is no file to link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SketchPaths {
    pub actual: Option<PathBuf>,
    pub analogy: Option<PathBuf>,
}

pub struct SketchResolver<'a> {
    config: &'a SketchConfig,
    exists: Box<dyn Fn(&Path) -> bool + 'a>,
}

impl<'a> SketchResolver<'a> {
    pub fn new(config: &'a SketchConfig) -> Self {
        Self {
            config,
            exists: Box::new(|path: &Path| path.exists()),
        }
    }

    /// Resolver that asks `exists` instead of the filesystem.
    pub fn with_exists(config: &'a SketchConfig, exists: impl Fn(&Path) -> bool + 'a) -> Self {
        Self {
            config,
            exists: Box::new(exists),
        }
    }

    pub fn folders_for(&self, chart_type: &str) -> Option<&'a ChartFolders> {
        let normalized = normalize(chart_type);
        self.config
            .charts
            .iter()
            .find(|folders| normalized.contains(&normalize(&folders.keyword)))
    }

    pub fn resolve(&self, chart_type: &str, response_id: &str) -> SketchPaths {
        let Some(folders) = self.folders_for(chart_type) else {
            debug!(chart_type, "no sketch folders match chart type");
            return SketchPaths::default();
        };

        let actual = self.sketch_path(&folders.actual, response_id);
        let analogy = self.sketch_path(&folders.analogy, response_id);

        let actual = (self.exists)(&actual).then_some(actual);
        let analogy = if (self.exists)(&analogy)
            || self
                .config
                .always_link_analogy
                .iter()
                .any(|folder| folder == &folders.analogy)
        {
            Some(analogy)
        } else {
            None
        };

        SketchPaths { actual, analogy }
    }

    fn sketch_path(&self, folder: &str, response_id: &str) -> PathBuf {
        self.config
            .root
            .join(folder)
            .join(format!("{response_id}{}", self.config.file_suffix))
    }
}

/// The export with `actual` and `analogy` path columns appended.
pub fn link_sketches(export: &SurveyExport, resolver: &SketchResolver<'_>) -> Result<CsvTable> {
    let chart_type_column = required_column(export, CHART_TYPE_COLUMN)?;
    let response_id_column = required_column(export, RESPONSE_ID_COLUMN)?;

    let mut columns = export.header.columns().to_vec();
    columns.push("actual".to_string());
    columns.push("analogy".to_string());

    let mut linked = 0;
    let rows = export
        .rows
        .iter()
        .map(|row| {
            let chart_type = row.raw(chart_type_column).unwrap_or_default();
            let response_id = row.raw(response_id_column).unwrap_or_default();
            let paths = resolver.resolve(chart_type, response_id);
            if paths.actual.is_some() || paths.analogy.is_some() {
                linked += 1;
            }

            let mut fields: Vec<String> = (0..export.header.len())
                .map(|column| row.raw(column).unwrap_or_default().to_string())
                .collect();
            fields.push(display_path(paths.actual.as_deref()));
            fields.push(display_path(paths.analogy.as_deref()));
            fields
        })
        .collect();

    info!(rows = export.rows.len(), linked, "linked participant sketches");

    Ok(CsvTable { columns, rows })
}

fn required_column(export: &SurveyExport, name: &str) -> Result<usize> {
    export.header.position(name).ok_or_else(|| {
        ParserError::MissingColumn {
            column: name.to_string(),
        }
        .into()
    })
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string())
        .unwrap_or_default()
}
