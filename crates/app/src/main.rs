use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use research_index_core::{DocumentKind, Indexer, IndexerConfig};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "research-index", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Project root that holds public/resources and src/data
    #[arg(long, env = "RESEARCH_INDEX_ROOT", default_value = ".", global = true)]
    root: PathBuf,

    /// Work log directory (defaults to <root>/public/resources/work_logs)
    #[arg(long, env = "RESEARCH_INDEX_WORK_LOGS", global = true)]
    work_logs_dir: Option<PathBuf>,

    /// Presentation directory (defaults to <root>/public/resources/presentations)
    #[arg(long, env = "RESEARCH_INDEX_PRESENTATIONS", global = true)]
    presentations_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the site metadata and search corpus from scratch.
    Build {
        /// Site metadata output (defaults to <root>/src/data/content.json)
        #[arg(long, env = "RESEARCH_INDEX_CONTENT_OUT")]
        content_out: Option<PathBuf>,
        /// Search corpus output (defaults to <root>/src/data/search-index.json)
        #[arg(long, env = "RESEARCH_INDEX_SEARCH_OUT")]
        search_out: Option<PathBuf>,
        /// Also write a static HTML page listing every work log.
        #[arg(long)]
        legacy_index: Option<PathBuf>,
    },
    /// Show how a single file would be indexed, without writing anything.
    Inspect {
        /// Collection the file belongs to.
        #[arg(long, value_enum)]
        kind: KindArg,
        /// File to process.
        file: PathBuf,
        /// Maximum number of characters of extracted text to print.
        #[arg(long, default_value = "400")]
        max_chars: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    WorkLog,
    Presentation,
}

impl From<KindArg> for DocumentKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::WorkLog => DocumentKind::WorkLog,
            KindArg::Presentation => DocumentKind::Presentation,
        }
    }
}

fn base_config(cli: &Cli) -> IndexerConfig {
    let mut config = IndexerConfig::rooted_at(&cli.root);
    if let Some(dir) = &cli.work_logs_dir {
        config.work_logs.source_dir = dir.clone();
    }
    if let Some(dir) = &cli.presentations_dir {
        config.presentations.source_dir = dir.clone();
    }
    config
}

fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = base_config(&cli);

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "research-index boot"
    );

    match cli.command {
        Command::Build {
            content_out,
            search_out,
            legacy_index,
        } => {
            if let Some(path) = content_out {
                config.output.site_metadata = path;
            }
            if let Some(path) = search_out {
                config.output.search_corpus = path;
            }
            config.output.legacy_index = legacy_index;

            let output = config.output.clone();
            let indexer =
                Indexer::new(config).map_err(|error| anyhow::anyhow!(error.to_string()))?;
            let report = indexer
                .run(Utc::now())
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            if !report.skipped_files.is_empty() {
                warn!(
                    "skipped_files={} left out of the search corpus",
                    report.skipped_files.len()
                );
                for skipped in &report.skipped_files {
                    warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped document");
                }
            }
            if !report.undated.is_empty() {
                warn!(
                    "undated_files={} kept without createdDate",
                    report.undated.len()
                );
                for path in &report.undated {
                    debug!(path = %path.display(), "no date in filename");
                }
            }
            for degraded in &report.degraded_files {
                warn!(path = %degraded.path.display(), reason = %degraded.reason, "degraded document");
            }

            println!(
                "Wrote {} work logs and {} presentations to {}",
                report.work_logs,
                report.presentations,
                output.site_metadata.display()
            );
            println!(
                "Wrote {} search entries to {} (sha256 {})",
                report.search_records,
                output.search_corpus.display(),
                report.corpus_digest.as_deref().unwrap_or("-")
            );
        }
        Command::Inspect {
            kind,
            file,
            max_chars,
        } => {
            let indexer =
                Indexer::new(config).map_err(|error| anyhow::anyhow!(error.to_string()))?;
            let inspection = indexer.inspect(kind.into(), &file);
            let record = &inspection.record;

            println!("kind: {}", record.kind);
            println!("file: {}", record.file_name);
            println!("title: {}", record.title);
            println!("url: {}", record.url);
            println!(
                "created: {}",
                record.created_date.as_deref().unwrap_or("Unknown")
            );
            if let Some(slides) = record.slides {
                println!("slides: {slides}");
            }

            match &inspection.search {
                Some(search) => {
                    println!("tokens: {}", search.text_length);
                    let preview: String = search.text.chars().take(max_chars).collect();
                    println!("text:\n{preview}");
                    if search.text.chars().count() > max_chars {
                        println!("... output truncated to first {max_chars} character(s)");
                    }
                }
                None => {
                    for skipped in &inspection.report.skipped_files {
                        println!("  unable_to_read_document: {}", skipped.reason);
                    }
                }
            }
        }
    }

    Ok(())
}
