//! Ordering of collected records.
//!
//! Records carry an internal [`SortKey`] only while they are being ordered; the public
//! [`DocumentRecord`] and [`SearchRecord`] shapes never contain it.

use crate::dates::{file_stem, iso_date, split_tail};
use crate::models::{DocumentKind, DocumentRecord, SearchRecord};
use chrono::NaiveDateTime;

/// Ordering key derived from a resolved timestamp. `Undated` compares below every date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Undated,
    Dated(NaiveDateTime),
}

impl From<Option<NaiveDateTime>> for SortKey {
    fn from(value: Option<NaiveDateTime>) -> Self {
        value.map_or(SortKey::Undated, SortKey::Dated)
    }
}

/// A record in the middle of aggregation.
#[derive(Debug, Clone)]
pub struct SortableRecord {
    pub key: SortKey,
    pub record: DocumentRecord,
    /// Extracted text; `None` keeps the record out of the search corpus.
    pub text: Option<String>,
}

impl SortableRecord {
    pub fn new(
        kind: DocumentKind,
        file_name: &str,
        title: String,
        url: String,
        timestamp: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            key: SortKey::from(timestamp),
            record: DocumentRecord {
                kind,
                file_name: file_name.to_string(),
                title,
                url,
                created_date: timestamp.as_ref().map(iso_date),
                slides: None,
            },
            text: None,
        }
    }
}

/// Records of one collection after ordering, with the sort key stripped.
#[derive(Debug, Clone, Default)]
pub struct OrderedCollection {
    pub records: Vec<DocumentRecord>,
    pub search: Vec<SearchRecord>,
}

/// Newest first; undated records trail. The sort is stable, so ties and undated
/// records keep their input order.
pub fn sort_descending(mut entries: Vec<SortableRecord>) -> OrderedCollection {
    entries.sort_by(|left, right| right.key.cmp(&left.key));

    let mut ordered = OrderedCollection {
        records: Vec::with_capacity(entries.len()),
        search: Vec::with_capacity(entries.len()),
    };

    for entry in entries {
        if let Some(text) = entry.text {
            ordered
                .search
                .push(SearchRecord::from_document(&entry.record, text));
        }
        ordered.records.push(entry.record);
    }

    ordered
}

/// Display title for a presentation: the file name minus its separator, trailing
/// timestamp and extension, when the name is long enough to carry one.
pub fn presentation_title(file_name: &str, timestamp_width: usize) -> String {
    let stem = file_stem(file_name);
    if stem.chars().count() <= timestamp_width {
        return file_name.to_string();
    }

    match split_tail(stem, timestamp_width + 1) {
        Some((head, _)) => head.to_string(),
        None => file_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(|date| date.and_hms_opt(hour, 0, 0))
    }

    fn entry(name: &str, timestamp: Option<NaiveDateTime>) -> SortableRecord {
        SortableRecord::new(
            DocumentKind::WorkLog,
            name,
            name.to_string(),
            format!("resources/work_logs/{name}"),
            timestamp,
        )
    }

    fn names(records: &[DocumentRecord]) -> Vec<&str> {
        records.iter().map(|record| record.file_name.as_str()).collect()
    }

    #[test]
    fn undated_sorts_below_every_date() {
        assert!(SortKey::Undated < SortKey::from(at(1, 1, 1, 0)));
        assert!(SortKey::from(at(2024, 1, 1, 0)) < SortKey::from(at(2024, 1, 1, 1)));
    }

    #[test]
    fn newest_first_with_undated_trailing_in_input_order() {
        let entries = vec![
            entry("u1", None),
            entry("old", at(2023, 1, 1, 0)),
            entry("u2", None),
            entry("new", at(2024, 6, 1, 0)),
            entry("tie-a", at(2023, 6, 1, 0)),
            entry("tie-b", at(2023, 6, 1, 0)),
            entry("u3", None),
        ];

        let ordered = sort_descending(entries);
        assert_eq!(
            names(&ordered.records),
            vec!["new", "tie-a", "tie-b", "old", "u1", "u2", "u3"]
        );
    }

    #[test]
    fn records_without_text_stay_out_of_search() {
        let mut with_text = entry("a", at(2024, 1, 2, 0));
        with_text.text = Some("Hello world".to_string());
        let without_text = entry("b", at(2024, 1, 3, 0));

        let ordered = sort_descending(vec![with_text, without_text]);
        assert_eq!(names(&ordered.records), vec!["b", "a"]);
        assert_eq!(ordered.search.len(), 1);
        assert_eq!(ordered.search[0].file_name, "a");
        assert_eq!(ordered.search[0].text_length, 2);
        assert_eq!(ordered.search[0].created_date.as_deref(), Some("2024-01-02"));
    }

    #[test]
    fn title_drops_separator_and_timestamp() {
        assert_eq!(presentation_title("Talk_2024-05-01_10-30-00.pdf", 19), "Talk");
        assert_eq!(
            presentation_title("Group meeting_2024-05-01_10-30-00.pdf", 19),
            "Group meeting"
        );
    }

    #[test]
    fn short_title_is_verbatim() {
        assert_eq!(presentation_title("deck.pdf", 19), "deck.pdf");
        assert_eq!(
            presentation_title("2024-05-01_10-30-00.pdf", 19),
            "2024-05-01_10-30-00.pdf"
        );
    }

    #[test]
    fn long_name_without_timestamp_is_truncated_by_length() {
        assert_eq!(
            presentation_title("A fairly long presentation name.pdf", 19),
            "A fairly lo"
        );
    }
}
