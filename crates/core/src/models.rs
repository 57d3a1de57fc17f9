use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    WorkLog,
    Presentation,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::WorkLog => "work-log",
            DocumentKind::Presentation => "presentation",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public metadata record for one source file, as rendered into the site metadata document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub kind: DocumentKind,
    pub file_name: String,
    pub title: String,
    pub url: String,
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<u32>,
}

/// One entry of the flat full-text search corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub kind: DocumentKind,
    pub title: String,
    pub file_name: String,
    pub url: String,
    pub created_date: Option<String>,
    pub text: String,
    pub text_length: usize,
}

impl SearchRecord {
    pub fn from_document(record: &DocumentRecord, text: String) -> Self {
        let text_length = crate::text::count_word_tokens(&text);
        Self {
            kind: record.kind,
            title: record.title.clone(),
            file_name: record.file_name.clone(),
            url: record.url.clone(),
            created_date: record.created_date.clone(),
            text,
            text_length,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    pub generated_at: String,
    pub work_logs: Vec<DocumentRecord>,
    pub presentations: Vec<DocumentRecord>,
}

/// How a collection's filenames encode their creation date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum DateRule {
    /// First substring matching `pattern`, parsed with the chrono `format`.
    EmbeddedPattern { pattern: String, format: String },
    /// Fixed-width timestamp of `width` characters sitting right before the extension.
    TrailingTimestamp { format: String, width: usize },
}

impl DateRule {
    pub fn work_log_default() -> Self {
        DateRule::EmbeddedPattern {
            pattern: r"[0-9]{2}_[0-9]{2}_[0-9]{4}".to_string(),
            format: "%d_%m_%Y".to_string(),
        }
    }

    pub fn presentation_default() -> Self {
        DateRule::TrailingTimestamp {
            format: "%Y-%m-%d_%H-%M-%S".to_string(),
            width: 19,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionConfig {
    pub kind: DocumentKind,
    pub source_dir: PathBuf,
    /// Extension without the leading dot, matched case-insensitively.
    pub extension: String,
    /// Prefix joined with the file name to build each record's `url`.
    pub web_path: String,
    pub date_rule: DateRule,
}

impl CollectionConfig {
    pub fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.web_path.trim_end_matches('/'), file_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    pub site_metadata: PathBuf,
    pub search_corpus: PathBuf,
    #[serde(default)]
    pub legacy_index: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexerConfig {
    pub work_logs: CollectionConfig,
    pub presentations: CollectionConfig,
    pub output: OutputConfig,
}

impl IndexerConfig {
    /// Standard site layout below a project root.
    pub fn rooted_at(root: &Path) -> Self {
        let resources = root.join("public").join("resources");
        let data = root.join("src").join("data");

        Self {
            work_logs: CollectionConfig {
                kind: DocumentKind::WorkLog,
                source_dir: resources.join("work_logs"),
                extension: "html".to_string(),
                web_path: "resources/work_logs".to_string(),
                date_rule: DateRule::work_log_default(),
            },
            presentations: CollectionConfig {
                kind: DocumentKind::Presentation,
                source_dir: resources.join("presentations"),
                extension: "pdf".to_string(),
                web_path: "resources/presentations".to_string(),
                date_rule: DateRule::presentation_default(),
            },
            output: OutputConfig {
                site_metadata: data.join("content.json"),
                search_corpus: data.join("search-index.json"),
                legacy_index: None,
            },
        }
    }

    pub fn collections(&self) -> [&CollectionConfig; 2] {
        [&self.work_logs, &self.presentations]
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self::rooted_at(Path::new("."))
    }
}
