use crate::error::IndexError;
use crate::models::{DocumentRecord, OutputConfig, SearchRecord, SiteMetadata};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn generated_at(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Two-space indented JSON with a trailing newline.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, IndexError> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    Ok(rendered)
}

pub fn digest_text(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Static page linking every work log, for hosting without the client app.
pub fn render_legacy_index(work_logs: &[DocumentRecord]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
         <title>Index of Work Logs</title>\n</head>\n<body>\n    <h1>Index of Work Logs</h1>\n    <ul>\n",
    );

    for record in work_logs {
        html.push_str(&format!(
            "        <li><a href=\"{}\">{}</a></li>\n",
            escape_html(&record.url),
            escape_html(&record.title)
        ));
    }

    html.push_str("    </ul>\n</body>\n</html>\n");
    html
}

/// Every artifact of one run, rendered in memory before anything touches the disk.
#[derive(Debug, Clone)]
pub struct RenderedOutputs {
    pub site_metadata: String,
    pub search_corpus: String,
    pub legacy_index: Option<String>,
}

impl RenderedOutputs {
    pub fn render(
        metadata: &SiteMetadata,
        corpus: &[SearchRecord],
        with_legacy_index: bool,
    ) -> Result<Self, IndexError> {
        Ok(Self {
            site_metadata: render_json(metadata)?,
            search_corpus: render_json(corpus)?,
            legacy_index: with_legacy_index.then(|| render_legacy_index(&metadata.work_logs)),
        })
    }

    pub fn corpus_digest(&self) -> String {
        digest_text(&self.search_corpus)
    }

    /// Whole-file overwrite of each configured artifact.
    pub fn write(&self, output: &OutputConfig) -> Result<(), IndexError> {
        write_atomic(&output.site_metadata, &self.site_metadata)?;
        write_atomic(&output.search_corpus, &self.search_corpus)?;

        if let (Some(path), Some(html)) = (&output.legacy_index, &self.legacy_index) {
            write_atomic(path, html)?;
        }

        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes to a sibling staging file, then renames it over `path`.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), IndexError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| IndexError::OutputDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let staging = staging_path(path);
    fs::write(&staging, contents).map_err(|source| IndexError::OutputWrite {
        path: staging.clone(),
        source,
    })?;
    fs::rename(&staging, path).map_err(|source| {
        let _ = fs::remove_file(&staging);
        IndexError::OutputWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}
