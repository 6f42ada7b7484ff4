use std::fs;
use std::path::{Path, PathBuf};

use analogyvis_core::columns::filter_columns;
use analogyvis_core::config::{FilterConfig, SketchConfig};
use analogyvis_core::error::PipelineError;
use analogyvis_core::sketches::{link_sketches, SketchResolver};
use analogyvis_parser::{read_survey_export, ExportOptions, ParserError, SurveyExport};
use tempfile::TempDir;

fn fixture_export() -> SurveyExport {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../analogyvis-parser/tests/data/qualtrics_export.csv");
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {err}", path.display()));
    read_survey_export(&content, ExportOptions { metadata_rows: 2 }).expect("parse fixture")
}

fn touch(root: &Path, folder: &str, response_id: &str) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).expect("create sketch folder");
    fs::write(dir.join(format!("{response_id}_signature.png")), b"png").expect("write sketch");
}

#[test]
fn links_existing_sketches_per_chart_type() {
    let root = TempDir::new().expect("temp dir");
    touch(root.path(), "BarActual", "R_1");
    touch(root.path(), "BarAnalogy", "R_1");
    touch(root.path(), "Sunburst Draw", "R_3");
    // wrong folder for a heat map; must not be linked
    touch(root.path(), "BarActual", "R_2");

    let config = SketchConfig {
        root: root.path().to_path_buf(),
        ..SketchConfig::default()
    };
    let resolver = SketchResolver::new(&config);
    let table = link_sketches(&fixture_export(), &resolver).expect("link sketches");

    let width = table.columns.len();
    assert_eq!(&table.columns[width - 2..], ["actual", "analogy"]);
    assert_eq!(table.rows.len(), 5);

    let path = |folder: &str, id: &str| {
        root.path()
            .join(folder)
            .join(format!("{id}_signature.png"))
            .display()
            .to_string()
    };
    let links: Vec<(&str, &str)> = table
        .rows
        .iter()
        .map(|row| (row[width - 2].as_str(), row[width - 1].as_str()))
        .collect();

    let expected_bar = (path("BarActual", "R_1"), path("BarAnalogy", "R_1"));
    let expected_sunburst = path("Sunburst Draw", "R_3");
    let expected_waterfall = path("WaterfallAnalogy", "R_4");
    assert_eq!(links[0], (expected_bar.0.as_str(), expected_bar.1.as_str()));
    assert_eq!(links[1], ("", ""));
    assert_eq!(links[2], (expected_sunburst.as_str(), ""));
    assert_eq!(links[3], ("", expected_waterfall.as_str()));
    assert_eq!(links[4], ("", ""));
}

#[test]
fn input_fields_are_carried_through() {
    let config = SketchConfig::default();
    let resolver = SketchResolver::with_exists(&config, |_| false);
    let export = fixture_export();
    let table = link_sketches(&export, &resolver).expect("link sketches");

    assert_eq!(table.columns.len(), export.header.len() + 2);
    assert_eq!(table.rows[0][1], "R_1");
    assert_eq!(table.rows[0][4], "Bar Chart");
}

#[test]
fn missing_chart_type_column_is_reported() {
    let export = read_survey_export("ResponseId,PROLIFIC_PID\nR_1,P1\n", ExportOptions::default())
        .expect("parse export");
    let config = SketchConfig::default();
    let resolver = SketchResolver::with_exists(&config, |_| true);

    let err = link_sketches(&export, &resolver).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Parser(ParserError::MissingColumn { ref column }) if column == "ChartType"
    ));
}

#[test]
fn default_filter_keeps_identity_and_chart_columns() {
    let table = filter_columns(&fixture_export(), &FilterConfig::default().columns);

    assert_eq!(table.columns, ["ResponseId", "PROLIFIC_PID", "ChartType"]);
    assert_eq!(table.rows.len(), 5);
    assert_eq!(table.rows[3], ["R_4", "P4", "waterfall"]);

    let root = TempDir::new().expect("temp dir");
    let out = root.path().join("filtered.csv");
    let file = fs::File::create(&out).expect("create output");
    table.write_csv(file).expect("write csv");
    let written = fs::read_to_string(&out).expect("read output");
    assert!(written.starts_with("ResponseId,PROLIFIC_PID,ChartType\nR_1,P1,Bar Chart\n"));
}
