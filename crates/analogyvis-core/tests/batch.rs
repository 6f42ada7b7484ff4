use std::fs;
use std::path::PathBuf;

use analogyvis_core::batch::{compute_hash, process_export_str, ErrorPolicy};
use analogyvis_core::config::{ExportConfig, StudyConfig, TimingRules};
use analogyvis_core::error::PipelineError;
use analogyvis_core::records::{
    records_to_dataframe, technique_means, write_task_table, TaskOrder, Technique, OUTPUT_COLUMNS,
};
use analogyvis_core::vark::LearningStyle;

fn fixture() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../analogyvis-parser/tests/data/qualtrics_export.csv");
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {err}", path.display()))
}

fn study_config() -> StudyConfig {
    StudyConfig {
        export: ExportConfig { metadata_rows: 2 },
        ..StudyConfig::default()
    }
}

#[test]
fn fixture_batch_reconstructs_complete_participants() {
    let content = fixture();
    let output =
        process_export_str(&content, &study_config(), ErrorPolicy::Skip).expect("process batch");

    let summary = &output.summary;
    assert_eq!(summary.rows, 5);
    assert_eq!(summary.participants_complete, 2);
    assert_eq!(summary.participants_incomplete, 2);
    assert_eq!(summary.participants_rejected, 1);
    assert_eq!(summary.records, 4);
    assert_eq!(summary.export_hash, compute_hash(content.as_bytes()));
    assert_eq!(summary.rejected.len(), 1);
    assert!(summary.rejected[0].reason.contains("P4"));

    let rows: Vec<_> = output
        .records
        .iter()
        .map(|record| {
            (
                record.participant_id.as_str(),
                record.order,
                record.technique,
                record.elapsed_secs,
                record.learning_style,
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            (
                "P1",
                TaskOrder::First,
                Technique::Analogy,
                1000.0,
                Some(LearningStyle::Visual)
            ),
            (
                "P1",
                TaskOrder::Second,
                Technique::Baseline,
                1200.0,
                Some(LearningStyle::Visual)
            ),
            (
                "P2",
                TaskOrder::Second,
                Technique::Analogy,
                960.0,
                Some(LearningStyle::Kinesthetic)
            ),
            (
                "P2",
                TaskOrder::First,
                Technique::Baseline,
                1040.0,
                Some(LearningStyle::Kinesthetic)
            ),
        ]
    );
}

#[test]
fn halt_policy_surfaces_configuration_error() {
    let err = process_export_str(&fixture(), &study_config(), ErrorPolicy::Halt).unwrap_err();
    assert!(matches!(err, PipelineError::Reconstruction(_)));
    assert!(err.to_string().contains("unknown group '3'"));
}

#[test]
fn wrong_metadata_row_count_shifts_first_participant() {
    // Reading the metadata rows as participants leaves them without timings.
    let output = process_export_str(&fixture(), &StudyConfig::default(), ErrorPolicy::Skip)
        .expect("process batch");
    assert_eq!(output.summary.rows, 7);
    assert_eq!(output.summary.participants_incomplete, 4);
    assert_eq!(output.summary.participants_complete, 2);
}

#[test]
fn task_table_is_written_with_fixed_header() {
    let output =
        process_export_str(&fixture(), &study_config(), ErrorPolicy::Skip).expect("process batch");
    let mut df = records_to_dataframe(&output.records).expect("build dataframe");

    let mut buffer = Vec::new();
    write_task_table(&mut df, &mut buffer).expect("write csv");
    let text = String::from_utf8(buffer).expect("utf8 output");
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some(OUTPUT_COLUMNS.join(",").as_str()));
    let first = lines.next().expect("first record");
    assert!(first.starts_with("P1,R_1,first,analogy,"));
    assert!(first.ends_with(",,,,V"));
    assert_eq!(lines.count(), 3);
}

#[test]
fn technique_means_cover_both_techniques() {
    let output =
        process_export_str(&fixture(), &study_config(), ErrorPolicy::Skip).expect("process batch");
    let df = records_to_dataframe(&output.records).expect("build dataframe");
    let means = technique_means(&df).expect("aggregate");

    assert_eq!(means.height(), 2);
    let means_col = means.column("MeanTime").expect("mean column");
    let values: Vec<Option<f64>> = means_col.f64().expect("f64 means").into_iter().collect();
    // analogy sorts before baseline
    assert_eq!(values, vec![Some(980.0), Some(1120.0)]);
}

#[test]
fn rejected_rows_report_file_lines_past_multiline_metadata() {
    let content = "PROLIFIC_PID,ResponseId,Group,\
                   Timer 1_First Click,Timer 1_Last Click,\
                   Timer 1_First Click,Timer 1_Last Click\n\
                   \"Prolific\nparticipant\nID\",Response ID,Group,t,t,t,t\n\
                   {},{},{},{},{},{},{}\n\
                   P9,R_9,3,0,1000,0,1000\n";
    let config = StudyConfig {
        export: ExportConfig { metadata_rows: 2 },
        timing: TimingRules {
            question_count: 1,
            ..TimingRules::default()
        },
        ..StudyConfig::default()
    };

    let output = process_export_str(content, &config, ErrorPolicy::Skip).expect("process batch");
    assert_eq!(output.summary.participants_rejected, 1);
    assert_eq!(output.summary.rejected[0].line_index, 6);
    assert!(output.summary.rejected[0].reason.contains("line 6"));
}
