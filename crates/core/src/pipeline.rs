use crate::aggregate::{presentation_title, sort_descending, OrderedCollection, SortableRecord};
use crate::collect::discover_files;
use crate::dates::DateResolver;
use crate::error::{ExtractError, IndexError};
use crate::extractor::{Extraction, ExtractorRegistry};
use crate::models::{
    CollectionConfig, DocumentKind, DocumentRecord, IndexerConfig, SearchRecord, SiteMetadata,
};
use crate::output::{generated_at, RenderedOutputs};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A file left out of the search corpus.
#[derive(Debug, Clone)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// A file kept in every output but with degraded fields.
#[derive(Debug, Clone)]
pub struct DegradedDocument {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub work_logs: usize,
    pub presentations: usize,
    pub search_records: usize,
    pub undated: Vec<PathBuf>,
    pub skipped_files: Vec<SkippedDocument>,
    pub degraded_files: Vec<DegradedDocument>,
    /// SHA-256 of the serialized search corpus; set once the corpus is rendered.
    pub corpus_digest: Option<String>,
}

/// Aggregated artifacts of one run, before serialization.
#[derive(Debug, Clone)]
pub struct IndexOutput {
    pub metadata: SiteMetadata,
    pub corpus: Vec<SearchRecord>,
    pub report: IndexReport,
}

/// Result of processing a single file in isolation.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub record: DocumentRecord,
    pub search: Option<SearchRecord>,
    pub report: IndexReport,
}

pub struct Indexer {
    config: IndexerConfig,
    registry: ExtractorRegistry,
    work_log_dates: DateResolver,
    presentation_dates: DateResolver,
}

impl Indexer {
    pub fn new(config: IndexerConfig) -> Result<Self, IndexError> {
        Self::with_registry(config, ExtractorRegistry::default())
    }

    pub fn with_registry(
        config: IndexerConfig,
        registry: ExtractorRegistry,
    ) -> Result<Self, IndexError> {
        for collection in config.collections() {
            if registry.for_extension(&collection.extension).is_none() {
                return Err(IndexError::InvalidConfig(format!(
                    "no extractor for .{} files ({})",
                    collection.extension, collection.kind
                )));
            }
        }

        Ok(Self {
            work_log_dates: DateResolver::new(&config.work_logs.date_rule)?,
            presentation_dates: DateResolver::new(&config.presentations.date_rule)?,
            config,
            registry,
        })
    }

    fn collection(&self, kind: DocumentKind) -> (&CollectionConfig, &DateResolver) {
        match kind {
            DocumentKind::WorkLog => (&self.config.work_logs, &self.work_log_dates),
            DocumentKind::Presentation => (&self.config.presentations, &self.presentation_dates),
        }
    }

    /// Collects, extracts and orders both collections without touching the outputs.
    pub fn build(&self, now: DateTime<Utc>) -> IndexOutput {
        let mut report = IndexReport::default();

        let work_logs = self.collect(DocumentKind::WorkLog, &mut report);
        let presentations = self.collect(DocumentKind::Presentation, &mut report);

        report.work_logs = work_logs.records.len();
        report.presentations = presentations.records.len();

        let mut corpus = work_logs.search;
        corpus.extend(presentations.search);
        report.search_records = corpus.len();

        IndexOutput {
            metadata: SiteMetadata {
                generated_at: generated_at(now),
                work_logs: work_logs.records,
                presentations: presentations.records,
            },
            corpus,
            report,
        }
    }

    /// Full rebuild: both artifacts are rendered first and written only afterwards.
    pub fn run(&self, now: DateTime<Utc>) -> Result<IndexReport, IndexError> {
        let IndexOutput {
            metadata,
            corpus,
            mut report,
        } = self.build(now);

        let rendered = RenderedOutputs::render(
            &metadata,
            &corpus,
            self.config.output.legacy_index.is_some(),
        )?;
        report.corpus_digest = Some(rendered.corpus_digest());
        rendered.write(&self.config.output)?;

        info!(
            work_logs = report.work_logs,
            presentations = report.presentations,
            search_records = report.search_records,
            "index rebuilt"
        );
        Ok(report)
    }

    /// Processes one file as if it were part of the `kind` collection.
    pub fn inspect(&self, kind: DocumentKind, path: &Path) -> Inspection {
        let mut report = IndexReport::default();
        let (collection, resolver) = self.collection(kind);
        let entry = self.process_file(collection, resolver, path, &mut report);
        let search = entry
            .text
            .as_ref()
            .map(|text| SearchRecord::from_document(&entry.record, text.clone()));

        Inspection {
            record: entry.record,
            search,
            report,
        }
    }

    fn collect(&self, kind: DocumentKind, report: &mut IndexReport) -> OrderedCollection {
        let (collection, resolver) = self.collection(kind);
        let files = discover_files(&collection.source_dir, &collection.extension);
        info!(kind = %kind, path = %collection.source_dir.display(), files = files.len(), "collecting");

        let entries = files
            .iter()
            .map(|path| self.process_file(collection, resolver, path, report))
            .collect::<Vec<_>>();

        sort_descending(entries)
    }

    fn process_file(
        &self,
        collection: &CollectionConfig,
        resolver: &DateResolver,
        path: &Path,
        report: &mut IndexReport,
    ) -> SortableRecord {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let timestamp = resolver.resolve(&file_name);
        if timestamp.is_none() {
            report.undated.push(path.to_path_buf());
        }

        let title = match (collection.kind, resolver.timestamp_width()) {
            (DocumentKind::Presentation, Some(width)) => presentation_title(&file_name, width),
            _ => file_name.clone(),
        };

        let mut entry = SortableRecord::new(
            collection.kind,
            &file_name,
            title,
            collection.url_for(&file_name),
            timestamp,
        );

        let paged = collection.kind == DocumentKind::Presentation;

        let extraction = match self.registry.extract(path) {
            Ok(extraction) => {
                if extraction.failed_pages > 0 {
                    report.degraded_files.push(DegradedDocument {
                        path: path.to_path_buf(),
                        reason: format!("{} page(s) without text", extraction.failed_pages),
                    });
                }
                Some(extraction)
            }
            Err(error @ ExtractError::UnopenableDocument { .. }) => {
                warn!(path = %path.display(), reason = %error, "reading as zero pages");
                report.degraded_files.push(DegradedDocument {
                    path: path.to_path_buf(),
                    reason: error.to_string(),
                });
                Some(Extraction::unopened())
            }
            Err(error) => {
                warn!(path = %path.display(), reason = %error, "left out of search corpus");
                report.skipped_files.push(SkippedDocument {
                    path: path.to_path_buf(),
                    reason: error.to_string(),
                });
                None
            }
        };

        if paged {
            entry.record.slides = Some(
                extraction
                    .as_ref()
                    .and_then(|extraction| extraction.pages)
                    .unwrap_or(0),
            );
        }
        entry.text = extraction.map(|extraction| extraction.text);

        entry
    }
}

/// Rebuilds both artifacts described by `config`, stamped with the current time.
pub fn run_pipeline(config: IndexerConfig) -> Result<IndexReport, IndexError> {
    Indexer::new(config)?.run(Utc::now())
}
