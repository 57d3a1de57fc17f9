use crate::error::ExtractError;
use crate::models::DocumentKind;
use crate::text::join_normalized;
use lopdf::Document;
use scraper::{Html, Node};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Normalized text pulled from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    /// Page count for paged documents, `None` for markup.
    pub pages: Option<u32>,
    /// Pages whose text could not be read and contributed nothing.
    pub failed_pages: u32,
}

impl Extraction {
    /// Degraded result for a paged document that could not be opened.
    pub fn unopened() -> Self {
        Self {
            text: String::new(),
            pages: Some(0),
            failed_pages: 0,
        }
    }
}

pub trait TextExtractor {
    fn kind(&self) -> DocumentKind;

    /// Extensions (lowercase, no dot) this extractor is selected for.
    fn extensions(&self) -> &[&'static str];

    fn extract(&self, path: &Path) -> Result<Extraction, ExtractError>;
}

const HIDDEN_ELEMENTS: [&str; 2] = ["script", "style"];

/// Visible text of HTML documents, with script and style content dropped.
#[derive(Debug, Default)]
pub struct MarkupExtractor;

impl MarkupExtractor {
    pub fn extract_from_str(&self, source: &str) -> String {
        let document = Html::parse_document(source);
        let mut pieces = Vec::new();

        for node in document.tree.root().descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };

            let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(element) => HIDDEN_ELEMENTS.contains(&element.name()),
                _ => false,
            });

            if !hidden {
                pieces.push(&**text);
            }
        }

        join_normalized(pieces)
    }
}

impl TextExtractor for MarkupExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::WorkLog
    }

    fn extensions(&self) -> &[&'static str] {
        &["html", "htm"]
    }

    fn extract(&self, path: &Path) -> Result<Extraction, ExtractError> {
        let bytes = fs::read(path).map_err(|error| ExtractError::UnparsableMarkup {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

        let source = decode_dropping_invalid(&bytes);

        Ok(Extraction {
            text: self.extract_from_str(&source),
            pages: None,
            failed_pages: 0,
        })
    }
}

/// UTF-8 decode that skips invalid byte sequences instead of substituting U+FFFD.
fn decode_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                decoded.push_str(valid);
                return decoded;
            }
            Err(error) => {
                let (valid, rest) = bytes.split_at(error.valid_up_to());
                decoded.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let skip = error.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

/// Page-by-page text of PDF documents.
#[derive(Debug, Default)]
pub struct PagedExtractor;

impl PagedExtractor {
    fn open(&self, path: &Path) -> Result<Document, ExtractError> {
        Document::load(path).map_err(|error| ExtractError::UnopenableDocument {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })
    }
}

impl TextExtractor for PagedExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Presentation
    }

    fn extensions(&self) -> &[&'static str] {
        &["pdf"]
    }

    fn extract(&self, path: &Path) -> Result<Extraction, ExtractError> {
        let document = self.open(path)?;

        // BTreeMap iteration yields pages in stored order.
        let page_texts = document
            .get_pages()
            .into_keys()
            .map(|page_no| (page_no, document.extract_text(&[page_no])));

        Ok(join_page_texts(path, page_texts))
    }
}

/// Joins per-page text in order. A page whose text cannot be read contributes an empty
/// string and is counted in `failed_pages`; later pages are still read.
pub fn join_page_texts<I, E>(path: &Path, page_texts: I) -> Extraction
where
    I: IntoIterator<Item = (u32, Result<String, E>)>,
    E: fmt::Display,
{
    let mut texts = Vec::new();
    let mut failed_pages = 0u32;

    for (page_no, result) in page_texts {
        match result {
            Ok(text) => texts.push(text),
            Err(error) => {
                warn!(path = %path.display(), page = page_no, reason = %error, "failed to extract page text");
                failed_pages += 1;
                texts.push(String::new());
            }
        }
    }

    let pages = u32::try_from(texts.len()).unwrap_or(u32::MAX);
    debug!(path = %path.display(), pages, failed_pages, "extracted pdf");

    Extraction {
        text: join_normalized(texts),
        pages: Some(pages),
        failed_pages,
    }
}

/// Extractors keyed by file extension.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn TextExtractor>>,
    by_extension: HashMap<String, usize>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
            by_extension: HashMap::new(),
        }
    }

    pub fn register<E: TextExtractor + 'static>(&mut self, extractor: E) {
        let slot = self.extractors.len();
        for extension in extractor.extensions() {
            self.by_extension.insert(extension.to_ascii_lowercase(), slot);
        }
        self.extractors.push(Box::new(extractor));
    }

    pub fn for_extension(&self, extension: &str) -> Option<&dyn TextExtractor> {
        self.by_extension
            .get(&extension.to_ascii_lowercase())
            .map(|slot| self.extractors[*slot].as_ref())
    }

    pub fn extract(&self, path: &Path) -> Result<Extraction, ExtractError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let extractor = self
            .for_extension(extension)
            .ok_or_else(|| ExtractError::UnsupportedExtension(extension.to_string()))?;
        extractor.extract(path)
    }
}

impl Default for ExtractorRegistry {
    /// HTML work logs and PDF presentations.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(MarkupExtractor);
        registry.register(PagedExtractor);
        registry
    }
}
