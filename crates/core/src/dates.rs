//! Creation dates recovered from filename conventions.
//!
//! Resolution is a pure function of the file name: file content is never inspected and a
//! name that does not follow its collection's convention simply has no date.

use crate::error::IndexError;
use crate::models::DateRule;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use tracing::warn;

#[derive(Debug, Clone)]
pub enum DateResolver {
    EmbeddedPattern { pattern: Regex, format: String },
    TrailingTimestamp { format: String, width: usize },
}

impl DateResolver {
    pub fn new(rule: &DateRule) -> Result<Self, IndexError> {
        match rule {
            DateRule::EmbeddedPattern { pattern, format } => Ok(Self::EmbeddedPattern {
                pattern: Regex::new(pattern)?,
                format: format.clone(),
            }),
            DateRule::TrailingTimestamp { format, width } => {
                if *width == 0 {
                    return Err(IndexError::InvalidConfig(
                        "trailing timestamp width must be positive".to_string(),
                    ));
                }
                Ok(Self::TrailingTimestamp {
                    format: format.clone(),
                    width: *width,
                })
            }
        }
    }

    /// Timestamp encoded in `file_name`, or `None` when the convention is not followed.
    ///
    /// Date-only conventions resolve to midnight.
    pub fn resolve(&self, file_name: &str) -> Option<NaiveDateTime> {
        match self {
            Self::EmbeddedPattern { pattern, format } => {
                let candidate = pattern.find(file_name)?.as_str();
                match NaiveDate::parse_from_str(candidate, format) {
                    Ok(date) => Some(date.and_time(NaiveTime::MIN)),
                    Err(error) => {
                        warn!(file = file_name, candidate, %error, "embedded date is not a calendar date");
                        None
                    }
                }
            }
            Self::TrailingTimestamp { format, width } => {
                let parsed = trailing_timestamp(file_name, *width)
                    .and_then(|candidate| NaiveDateTime::parse_from_str(candidate, format).ok());
                if parsed.is_none() {
                    warn!(file = file_name, "failed to extract date from filename");
                }
                parsed
            }
        }
    }

    /// Width of the trailing timestamp, for title derivation.
    pub fn timestamp_width(&self) -> Option<usize> {
        match self {
            Self::EmbeddedPattern { .. } => None,
            Self::TrailingTimestamp { width, .. } => Some(*width),
        }
    }
}

/// `YYYY-MM-DD` rendering used for `createdDate`.
pub fn iso_date(timestamp: &NaiveDateTime) -> String {
    timestamp.date().format("%Y-%m-%d").to_string()
}

/// File name without its final `.extension`.
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => file_name,
    }
}

/// Splits `text` so the second half holds its last `count` characters.
pub fn split_tail(text: &str, count: usize) -> Option<(&str, &str)> {
    if count == 0 {
        return Some((text, ""));
    }
    text.char_indices()
        .rev()
        .nth(count - 1)
        .map(|(index, _)| text.split_at(index))
}

fn trailing_timestamp(file_name: &str, width: usize) -> Option<&str> {
    split_tail(file_stem(file_name), width).map(|(_, tail)| tail)
}
