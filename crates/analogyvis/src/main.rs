use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use analogyvis_core::batch::{process_export_str, BatchSummary, ErrorPolicy};
use analogyvis_core::columns::filter_columns;
use analogyvis_core::config::StudyConfig;
use analogyvis_core::parser::read_survey_export;
use analogyvis_core::records::{records_to_dataframe, technique_means, write_task_table};
use analogyvis_core::sketches::{link_sketches, SketchResolver};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use polars::prelude::DataFrame;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "ANALOGYVIS_CONFIG";

#[derive(Parser, Debug)]
#[command(author, version, about = "Analogy visualization study tooling", long_about = None)]
struct Cli {
    /// Study configuration file (falls back to $ANALOGYVIS_CONFIG, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Rows between the header and the first participant
    #[arg(long, global = true)]
    metadata_rows: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruct per-technique task times from a survey export
    Timing(TimingArgs),
    /// Keep a subset of the export's columns
    Filter(FilterArgs),
    /// Link each response to its saved sketch images
    Sketches(SketchesArgs),
}

#[derive(Args, Debug)]
struct TimingArgs {
    /// Survey export CSV
    #[arg(long)]
    input: PathBuf,
    /// Destination of the task table
    #[arg(long)]
    output: PathBuf,
    /// Abort on the first row with an invalid group instead of skipping it
    #[arg(long)]
    halt_on_error: bool,
    /// Also write the batch summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: PathBuf,
    /// Comma-separated columns to keep, in output order
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,
}

#[derive(Args, Debug)]
struct SketchesArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: PathBuf,
    /// Directory holding the per-chart sketch folders
    #[arg(long)]
    sketch_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(metadata_rows) = cli.metadata_rows {
        config.export.metadata_rows = metadata_rows;
    }

    match cli.command {
        Command::Timing(args) => handle_timing(args, &config),
        Command::Filter(args) => handle_filter(args, &config),
        Command::Sketches(args) => handle_sketches(args, config),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<StudyConfig> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

    match path {
        Some(path) => {
            info!(path = %path.display(), "loading study configuration");
            StudyConfig::load(&path)
                .with_context(|| format!("failed to load configuration {}", path.display()))
        }
        None => Ok(StudyConfig::default()),
    }
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn handle_timing(args: TimingArgs, config: &StudyConfig) -> Result<()> {
    let content = read_input(&args.input)?;
    let policy = if args.halt_on_error {
        ErrorPolicy::Halt
    } else {
        ErrorPolicy::Skip
    };

    let output = process_export_str(&content, config, policy)
        .with_context(|| format!("failed to process {}", args.input.display()))?;

    let mut df = records_to_dataframe(&output.records).context("failed to build task table")?;
    write_task_table(&mut df, create_output(&args.output)?)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    if let Some(path) = &args.summary_json {
        output
            .summary
            .write_json(create_output(path)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    print_summary(&output.summary);
    if df.height() > 0 {
        print_technique_means(&df)?;
    }

    info!(
        output = %args.output.display(),
        records = output.summary.records,
        "task table written"
    );
    Ok(())
}

fn handle_filter(args: FilterArgs, config: &StudyConfig) -> Result<()> {
    let content = read_input(&args.input)?;
    let export = read_survey_export(&content, config.export.options())
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    let columns = args.columns.unwrap_or_else(|| config.filter.columns.clone());
    let table = filter_columns(&export, &columns);
    table
        .write_csv(create_output(&args.output)?)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Wrote {} rows with {} columns to {}",
        table.rows.len(),
        table.columns.len(),
        args.output.display()
    );
    Ok(())
}

fn handle_sketches(args: SketchesArgs, mut config: StudyConfig) -> Result<()> {
    if let Some(dir) = args.sketch_dir {
        config.sketches.root = dir;
    }

    let content = read_input(&args.input)?;
    let export = read_survey_export(&content, config.export.options())
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    let resolver = SketchResolver::new(&config.sketches);
    let table = link_sketches(&export, &resolver)?;
    table
        .write_csv(create_output(&args.output)?)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Linked sketches for {} rows into {}",
        table.rows.len(),
        args.output.display()
    );
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    let mut table = Table::new();
    table.set_header(vec!["Rows", "Complete", "Incomplete", "Rejected", "Records"]);
    table.add_row(vec![
        summary.rows.to_string(),
        summary.participants_complete.to_string(),
        summary.participants_incomplete.to_string(),
        summary.participants_rejected.to_string(),
        summary.records.to_string(),
    ]);
    println!("{table}");

    if !summary.rejected.is_empty() {
        let mut rejected = Table::new();
        rejected.set_header(vec!["Line", "Reason"]);
        for row in &summary.rejected {
            rejected.add_row(vec![row.line_index.to_string(), row.reason.clone()]);
        }
        println!("{rejected}");
    }
}

fn print_technique_means(df: &DataFrame) -> Result<()> {
    let means = technique_means(df).context("failed to aggregate task times")?;
    let techniques = means.column("Technique")?.str()?;
    let mean_times = means.column("MeanTime")?.f64()?;
    let counts = means.column("Records")?;

    let mut table = Table::new();
    table.set_header(vec!["Technique", "Mean time (s)", "Records"]);
    for idx in 0..means.height() {
        table.add_row(vec![
            techniques.get(idx).unwrap_or_default().to_string(),
            mean_times
                .get(idx)
                .map(|mean| format!("{mean:.1}"))
                .unwrap_or_default(),
            counts.get(idx)?.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
