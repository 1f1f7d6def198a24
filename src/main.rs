use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use equipstat::{
    read_csv, AnalysisError, Analyzer, Comparison, DiffError, DiffRow, Differ, Settings, Side,
    Stats, Table,
};
use prettytable::{format, Cell, Row, Table as TextTable};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Summary statistics and name-keyed diffs for equipment sensor CSV files"
)]
struct Cli {
    /// YAML settings file (required column names, preview size)
    #[arg(long, global = true, env = "EQUIPSTAT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print statistics for one CSV file as JSON
    Analyze {
        file: PathBuf,
        /// Dataset identifier copied into the output
        #[arg(long)]
        file_id: Option<String>,
        /// Upload time copied into the output (RFC 3339); defaults to the file's mtime
        #[arg(long)]
        uploaded_at: Option<DateTime<Utc>>,
        /// Only keep preview rows and records of this type (repeatable)
        #[arg(long = "type", value_name = "TYPE")]
        types: Vec<String>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Compare two CSV files by equipment name
    Diff {
        file_a: PathBuf,
        file_b: PathBuf,
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

fn main() -> Result<ExitCode> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) settings ─────────────────────────────────────────────────
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let analyzer = Analyzer::from_settings(&settings);

    // ─── 3) run ──────────────────────────────────────────────────────
    match cli.command {
        Command::Analyze {
            file,
            file_id,
            uploaded_at,
            types,
            compact,
        } => run_analyze(&analyzer, &file, file_id, uploaded_at, &types, compact),
        Command::Diff {
            file_a,
            file_b,
            format,
            compact,
        } => run_diff(Differ::new(analyzer), &file_a, &file_b, format, compact),
    }
}

fn run_analyze(
    analyzer: &Analyzer,
    path: &Path,
    file_id: Option<String>,
    uploaded_at: Option<DateTime<Utc>>,
    types: &[String],
    compact: bool,
) -> Result<ExitCode> {
    info!(path = %path.display(), "analyzing");
    let uploaded_at = uploaded_at.or_else(|| modified_at(path));

    let analyzed = load(path)
        .and_then(|t| analyzer.analyze(&t, file_id.map(file_id_value), uploaded_at));
    let stats = match analyzed {
        Ok(stats) => stats,
        Err(e) => return report_failure(&e.to_string()),
    };

    let stats = if types.is_empty() {
        stats
    } else {
        let kind = analyzer.columns().kind.as_str();
        Stats {
            preview: stats.preview_of_type(kind, types).cloned().collect(),
            records: stats.records_of_type(kind, types).cloned().collect(),
            ..stats
        }
    };

    print_json(&stats, compact)?;
    Ok(ExitCode::SUCCESS)
}

fn run_diff(
    differ: Differ,
    path_a: &Path,
    path_b: &Path,
    format: Format,
    compact: bool,
) -> Result<ExitCode> {
    info!(a = %path_a.display(), b = %path_b.display(), "comparing");
    let table_a = load(path_a).map_err(|e| DiffError::new(Side::A, e));
    let table_b = load(path_b).map_err(|e| DiffError::new(Side::B, e));
    let compared = table_a.and_then(|a| differ.compare(&a, &table_b?));
    let comparison = match compared {
        Ok(c) => c,
        Err(e) => {
            error!(side = %e.side, "{}", e.source);
            let body = serde_json::json!({ "error": e.source.to_string(), "side": e.side });
            println!("{}", body);
            return Ok(ExitCode::FAILURE);
        }
    };

    match format {
        Format::Json => print_json(&comparison, compact)?,
        Format::Table => print_table(&comparison),
    }
    Ok(ExitCode::SUCCESS)
}

/// Read a CSV file; I/O failures surface as parse errors like any other
/// unreadable input.
fn load(path: &Path) -> Result<Table, AnalysisError> {
    let file = File::open(path)
        .map_err(|e| AnalysisError::Parse(format!("{}: {}", path.display(), e)))?;
    read_csv(BufReader::new(file))
}

fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Utc>::from(modified))
}

/// Numeric ids stay numbers in the JSON output.
fn file_id_value(id: String) -> serde_json::Value {
    match id.parse::<i64>() {
        Ok(n) => serde_json::Value::from(n),
        Err(_) => serde_json::Value::String(id),
    }
}

fn report_failure(message: &str) -> Result<ExitCode> {
    error!("{}", message);
    println!("{}", serde_json::json!({ "error": message }));
    Ok(ExitCode::FAILURE)
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("serializing output")?;
    println!("{}", text);
    Ok(())
}

fn print_table(comparison: &Comparison) {
    let mut table = TextTable::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table.add_row(Row::new(
        [
            "Equipment", "Type A", "Type B", "Flow A", "Flow B", "Δ Flow", "Press A", "Press B",
            "Δ Press", "Temp A", "Temp B", "Δ Temp", "Status",
        ]
        .iter()
        .map(|h| Cell::new(h).style_spec("bFg"))
        .collect(),
    ));
    for row in &comparison.diff.rows {
        table.add_row(diff_row(row));
    }

    let summary = comparison.diff.summary;
    println!(
        "\n--- {} rows in A, {} rows in B ---",
        comparison.file_a.total_count, comparison.file_b.total_count
    );
    table.printstd();
    println!(
        "only in A: {}  only in B: {}  in both: {}",
        summary.only_in_a, summary.only_in_b, summary.in_both
    );
}

fn diff_row(row: &DiffRow) -> Row {
    let num = |v: Option<f64>| {
        Cell::new(&v.map(|n| n.to_string()).unwrap_or_default()).style_spec("r")
    };
    let text = |v: &Option<equipstat::Value>| {
        Cell::new(&v.as_ref().map(|v| v.to_string()).unwrap_or_default())
    };
    Row::new(vec![
        Cell::new(&row.equipment_name),
        text(&row.type_a),
        text(&row.type_b),
        num(row.flowrate_a),
        num(row.flowrate_b),
        num(row.flowrate_delta),
        num(row.pressure_a),
        num(row.pressure_b),
        num(row.pressure_delta),
        num(row.temperature_a),
        num(row.temperature_b),
        num(row.temperature_delta),
        Cell::new(row.status.as_str()),
    ])
}
