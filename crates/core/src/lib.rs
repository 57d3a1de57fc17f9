pub mod aggregate;
pub mod collect;
pub mod dates;
pub mod error;
pub mod extractor;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod text;

pub use aggregate::{presentation_title, sort_descending, OrderedCollection, SortKey, SortableRecord};
pub use collect::discover_files;
pub use dates::{iso_date, DateResolver};
pub use error::{ExtractError, IndexError};
pub use extractor::{
    Extraction, ExtractorRegistry, MarkupExtractor, PagedExtractor, TextExtractor,
};
pub use models::{
    CollectionConfig, DateRule, DocumentKind, DocumentRecord, IndexerConfig, OutputConfig,
    SearchRecord, SiteMetadata,
};
pub use output::{render_legacy_index, write_atomic, RenderedOutputs};
pub use pipeline::{
    run_pipeline, DegradedDocument, IndexOutput, IndexReport, Indexer, Inspection,
    SkippedDocument,
};
pub use text::{count_word_tokens, normalize_whitespace};
