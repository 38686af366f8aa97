//! spf - Speaker prospect filtering command line
//!
//! Classifies a CSV export or the live Airtable table for one event and
//! writes the report files, plus diagnostics for figuring out why an event
//! returns nothing.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spf_common::config::{AirtableSettings, TomlConfig};
use spf_common::diagnostics::{check_columns, suggest_event_names, tag_distribution, ColumnCheck};
use spf_common::report::{Report, ReportFormat};
use spf_common::source::{CsvTable, RecordSource};
use spf_common::{Classifier, Record};

const SAMPLE_ROWS: usize = 3;

/// Command-line arguments for spf
#[derive(Parser, Debug)]
#[command(name = "spf")]
#[command(about = "Filter speaker prospects for an event")]
#[command(version)]
struct Cli {
    /// Config file (overrides SPF_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify speakers for an event and write report files
    Classify {
        /// Event tag prefix, e.g. "2511 Barclays"
        event_name: String,

        /// Full event title used for content-fit analysis
        #[arg(long, default_value = "")]
        event_title: String,

        /// CSV export to read instead of Airtable
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file base name; a timestamp and extension are appended
        #[arg(short, long, default_value = "speaker_report")]
        output: String,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::All)]
        format: OutputFormat,
    },

    /// Show columns, sample rows and tag statistics of a CSV export
    Inspect {
        /// CSV file to inspect
        file: PathBuf,
    },

    /// Fetch the Airtable table and check the column mapping against it
    TestConnection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
    Text,
    All,
}

impl OutputFormat {
    fn report_formats(self) -> Vec<ReportFormat> {
        match self {
            OutputFormat::Csv => vec![ReportFormat::Csv],
            OutputFormat::Json => vec![ReportFormat::Json],
            OutputFormat::Text => vec![ReportFormat::Text],
            OutputFormat::All => ReportFormat::ALL.to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spf_cli=info,spf_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = run(cli).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    let config =
        TomlConfig::resolve(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Classify {
            event_name,
            event_title,
            input,
            output,
            format,
        } => classify(&config, &event_name, &event_title, input, &output, format).await,
        Command::Inspect { file } => inspect(&config, &file),
        Command::TestConnection => test_connection(&config).await,
    }
}

async fn classify(
    config: &TomlConfig,
    event_name: &str,
    event_title: &str,
    input: Option<PathBuf>,
    output: &str,
    format: OutputFormat,
) -> Result<()> {
    // Validate before touching the source
    let classifier = Classifier::new(event_name, config.classifier_config())
        .context("Invalid classification settings")?;

    let source = match input {
        Some(path) => RecordSource::CsvFile(path),
        None => RecordSource::Airtable(
            AirtableSettings::resolve(&config.airtable)
                .context("Airtable is not configured (use --input for a CSV file)")?,
        ),
    };

    let records = source
        .fetch()
        .await
        .with_context(|| format!("Failed to load records from {}", source))?;

    let classification = classifier.classify(&records);
    let report = Report::new(classifier.event_name(), event_title.trim(), classification);

    for report_format in format.report_formats() {
        let path = PathBuf::from(report.file_name(output, report_format));
        write_report(&report, report_format, &path)?;
        println!("Wrote {}", path.display());
    }

    let summary = report.classification.summary();
    println!();
    println!("Event: {}", report.event_name);
    println!("  Confirmed: {}", summary.confirmed_count);
    println!("  Intended:  {}", summary.intended_count);
    println!("  Endorsed:  {}", summary.endorsed_count);
    println!("  Total:     {}", summary.total_count);

    if summary.total_count == 0 {
        warn!(
            "No speakers matched '{}'. Run `spf inspect` on a CSV export to see which event names the data contains.",
            report.event_name
        );
    }

    Ok(())
}

fn write_report(report: &Report, format: ReportFormat, path: &Path) -> Result<()> {
    let content = report
        .render(format)
        .with_context(|| format!("Failed to render {} report", format))?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {} report to {}", format, path.display());
    Ok(())
}

fn inspect(config: &TomlConfig, file: &Path) -> Result<()> {
    let table = CsvTable::from_path(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let columns = &config.columns;

    println!("File: {}", file.display());
    println!("Rows: {}  Columns: {}", table.row_count(), table.column_count());
    println!();
    println!("Columns:");
    for (i, column) in table.columns.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, column);
    }

    println!();
    print_column_checks(&check_columns(&table.columns, columns));

    println!();
    println!("Sample rows:");
    for (i, record) in table.sample(SAMPLE_ROWS).iter().enumerate() {
        println!(
            "  {}. {} | {} | {}",
            i + 1,
            record.get(&columns.name).to_text(),
            record.get(&columns.company).to_text(),
            record.get(&columns.tags).to_text()
        );
    }

    if !table.has_column(&columns.tags) {
        bail!(
            "Tag column '{}' not found; set [columns] tags in the config file",
            columns.tags
        );
    }

    println!();
    println!("Tag distribution ({}):", columns.tags);
    for count in tag_distribution(table.column_values(&columns.tags)) {
        println!("  {:<10} {}", count.keyword, count.rows);
    }

    let events = suggest_event_names(table.column_values(&columns.tags));
    println!();
    if events.is_empty() {
        println!("No \"<event> <Status>\" tags found.");
    } else {
        println!("Event names found in tags:");
        for event in events {
            println!("  {}", event);
        }
    }

    Ok(())
}

async fn test_connection(config: &TomlConfig) -> Result<()> {
    let settings =
        AirtableSettings::resolve(&config.airtable).context("Airtable is not configured")?;
    let source = RecordSource::Airtable(settings);

    let records = source
        .fetch()
        .await
        .with_context(|| format!("Failed to fetch {}", source))?;
    println!("Connected to {}: {} records", source, records.len());

    let columns = observed_columns(&records);
    println!("Columns seen: {}", columns.len());
    println!();
    print_column_checks(&check_columns(&columns, &config.columns));

    let tags = &config.columns.tags;
    let events = suggest_event_names(records.iter().map(|r| r.get(tags)));
    if !events.is_empty() {
        println!();
        println!("Event names found in tags: {}", events.join(", "));
    }

    Ok(())
}

/// Union of column names across records; Airtable omits empty cells
fn observed_columns(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.columns())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn print_column_checks(checks: &[ColumnCheck]) {
    println!("Column mapping:");
    for check in checks {
        let mark = if check.present { "✓" } else { "✗" };
        print!("  {} {:<18} '{}'", mark, check.field, check.column);
        if !check.suggestions.is_empty() {
            print!("  (similar: {})", check.suggestions.join(", "));
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_args() {
        let cli = Cli::try_parse_from([
            "spf",
            "classify",
            "2511 Barclays",
            "--input",
            "speakers.csv",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Command::Classify {
                event_name,
                event_title,
                input,
                output,
                format,
            } => {
                assert_eq!(event_name, "2511 Barclays");
                assert_eq!(event_title, "");
                assert_eq!(input, Some(PathBuf::from("speakers.csv")));
                assert_eq!(output, "speaker_report");
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli = Cli::try_parse_from(["spf", "inspect", "speakers.csv", "--config", "spf.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("spf.toml")));
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(Cli::try_parse_from(["spf", "classify", "X", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_all_formats() {
        assert_eq!(OutputFormat::All.report_formats(), ReportFormat::ALL.to_vec());
        assert_eq!(OutputFormat::Text.report_formats(), vec![ReportFormat::Text]);
    }

    #[test]
    fn test_observed_columns_union() {
        let records = vec![
            Record::new().with("Name", "A").with("Workshops", "x"),
            Record::new().with("Name", "B").with("Company", "Acme"),
        ];
        assert_eq!(observed_columns(&records), vec!["Company", "Name", "Workshops"]);
    }
}
