mod display;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use retrofit_core::{AnnotationStatus, TeamReport};
use retrofit_store::{AnnotationStore, apply_rules, apply_settings, load_report};

/// Apply usage-report findings to a project without duplicating anything.
#[derive(Parser)]
#[command(name = "retrofit", version)]
struct Cli {
    /// Project root directory.
    #[arg(long, global = true, env = "RETROFIT_PROJECT_DIR", default_value = ".")]
    project: PathBuf,

    /// Annotation file [default: <project>/.retrofit/annotations.json].
    #[arg(long, global = true, env = "RETROFIT_ANNOTATIONS")]
    annotations: Option<PathBuf>,

    /// Log match decisions.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a verdict on a friction title (replaces a similar earlier verdict).
    Mark {
        title: String,
        /// Noise to filter from future runs (the default).
        #[arg(long, conflicts_with = "useful")]
        false_positive: bool,
        /// A real friction worth acting on.
        #[arg(long)]
        useful: bool,
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove annotations similar to a title, or all annotations.
    Unmark { title: Option<String> },
    /// List recorded annotations.
    Marks,
    /// Filter a report's frictions and merge its rules and settings into the project.
    Apply {
        report: PathBuf,
        /// Rule document [default: <project>/CLAUDE.md].
        #[arg(long)]
        rules_file: Option<PathBuf>,
        /// Settings file [default: <project>/.claude/settings.json].
        #[arg(long)]
        settings_file: Option<PathBuf>,
    },
    /// Aggregate several members' reports into one team view.
    Team {
        #[arg(required = true)]
        reports: Vec<PathBuf>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn annotations_path(&self) -> PathBuf {
        self.annotations
            .clone()
            .unwrap_or_else(|| self.project.join(".retrofit").join("annotations.json"))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let annotations_path = cli.annotations_path();

    match cli.command {
        Command::Mark {
            title,
            useful,
            note,
            ..
        } => {
            let status = if useful {
                AnnotationStatus::Useful
            } else {
                AnnotationStatus::FalsePositive
            };
            let mut store = AnnotationStore::open(&annotations_path);
            let annotation = store
                .set(&title, status, note)
                .context("saving annotation")?;
            display::print_annotation(&annotation);
        }
        Command::Unmark { title } => {
            let mut store = AnnotationStore::open(&annotations_path);
            let removed = store
                .clear(title.as_deref())
                .context("saving annotations")?;
            println!("Removed {removed} annotation(s)");
        }
        Command::Marks => {
            let store = AnnotationStore::open(&annotations_path);
            display::print_annotations(store.list(), store.path());
        }
        Command::Apply {
            report,
            rules_file,
            settings_file,
        } => {
            let rules_file = rules_file.unwrap_or_else(|| cli.project.join("CLAUDE.md"));
            let settings_file = settings_file
                .unwrap_or_else(|| cli.project.join(".claude").join("settings.json"));
            run_apply(&report, &annotations_path, &rules_file, &settings_file)?;
        }
        Command::Team { reports, json } => {
            let reports = reports
                .iter()
                .map(|p| load_report(p))
                .collect::<Result<Vec<_>, _>>()
                .context("loading team reports")?;
            let team = TeamReport::from_reports(&reports);
            if json {
                println!("{}", serde_json::to_string_pretty(&team)?);
            } else {
                display::print_team(&team);
            }
        }
    }

    Ok(())
}

fn run_apply(
    report_path: &Path,
    annotations_path: &Path,
    rules_file: &Path,
    settings_file: &Path,
) -> anyhow::Result<()> {
    let report = load_report(report_path).context("loading report")?;
    let store = AnnotationStore::open(annotations_path);

    let rule_paragraphs = report.rule_paragraphs();
    let filtered = store.filter_out(report.frictions);
    display::print_filtered(&filtered);

    let rules = apply_rules(rules_file, &rule_paragraphs)
        .with_context(|| format!("merging rules into {}", rules_file.display()))?;
    display::print_document_merge(rules_file, &rules);

    if let Some(fragment) = &report.settings {
        let settings = apply_settings(settings_file, fragment)
            .with_context(|| format!("merging settings into {}", settings_file.display()))?;
        display::print_settings_merge(settings_file, &settings);
    }

    Ok(())
}
