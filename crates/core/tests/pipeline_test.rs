//! End-to-end rebuild over a temporary site tree.

use chrono::{TimeZone, Utc};
use research_index_core::{DocumentKind, Indexer, IndexerConfig, SearchRecord, SiteMetadata};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_work_logs(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;
    fs::write(
        dir.join("Notes_15_03_2024.html"),
        "<html><head><script>var x = 1;</script></head><body><p>Hello</p>\n<p>world</p></body></html>",
    )?;
    fs::write(dir.join("readme.html"), "<html><body>About</body></html>")?;
    fs::write(dir.join("ignored.txt"), "not a work log")?;
    Ok(())
}

#[test]
fn work_log_scenario_produces_sorted_metadata_and_corpus() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = IndexerConfig::rooted_at(dir.path());
    write_work_logs(&config.work_logs.source_dir)?;
    let output = config.output.clone();

    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let report = Indexer::new(config)?.run(now)?;
    assert_eq!(report.work_logs, 2);
    assert_eq!(report.presentations, 0);

    let metadata: SiteMetadata = serde_json::from_str(&fs::read_to_string(&output.site_metadata)?)?;
    assert_eq!(metadata.generated_at, "2024-06-01T12:00:00.000000Z");
    assert!(metadata.presentations.is_empty());

    let names = metadata
        .work_logs
        .iter()
        .map(|record| (record.file_name.as_str(), record.created_date.as_deref()))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            ("Notes_15_03_2024.html", Some("2024-03-15")),
            ("readme.html", None),
        ]
    );
    assert_eq!(metadata.work_logs[0].url, "resources/work_logs/Notes_15_03_2024.html");
    assert_eq!(metadata.work_logs[0].title, "Notes_15_03_2024.html");

    let corpus: Vec<SearchRecord> =
        serde_json::from_str(&fs::read_to_string(&output.search_corpus)?)?;
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus[0].kind, DocumentKind::WorkLog);
    assert_eq!(corpus[0].text, "Hello world");
    assert_eq!(corpus[0].text_length, 2);
    assert_eq!(corpus[1].text, "About");
    assert_eq!(corpus[1].text_length, 1);
    Ok(())
}

#[test]
fn serialized_fields_match_the_site_contract() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = IndexerConfig::rooted_at(dir.path());
    write_work_logs(&config.work_logs.source_dir)?;
    let output = config.output.clone();

    Indexer::new(config)?.run(Utc::now())?;

    let metadata: Value = serde_json::from_str(&fs::read_to_string(&output.site_metadata)?)?;
    assert!(metadata["generatedAt"].is_string());
    assert!(metadata["workLogs"][1]["createdDate"].is_null());
    assert!(metadata["workLogs"][0].get("slides").is_none());
    assert!(metadata.get("_sort_key").is_none());
    assert!(metadata["workLogs"][0].get("sortKey").is_none());

    let corpus: Value = serde_json::from_str(&fs::read_to_string(&output.search_corpus)?)?;
    assert!(corpus.is_array());
    assert_eq!(corpus[0]["textLength"], 2);
    assert_eq!(corpus[0]["fileName"], "Notes_15_03_2024.html");
    Ok(())
}

#[test]
fn rerun_is_identical_apart_from_timestamp() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = IndexerConfig::rooted_at(dir.path());
    write_work_logs(&config.work_logs.source_dir)?;
    fs::write(config.work_logs.source_dir.join("Plan_01_02_2024.html"), "<p>plan</p>")?;
    fs::write(config.work_logs.source_dir.join("zeta.html"), "<p>z</p>")?;
    let output = config.output.clone();
    let indexer = Indexer::new(config)?;

    let first = indexer.run(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())?;
    let first_metadata: SiteMetadata =
        serde_json::from_str(&fs::read_to_string(&output.site_metadata)?)?;

    let second = indexer.run(Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap())?;
    let second_metadata: SiteMetadata =
        serde_json::from_str(&fs::read_to_string(&output.site_metadata)?)?;

    assert_eq!(first.corpus_digest, second.corpus_digest);
    assert_ne!(first_metadata.generated_at, second_metadata.generated_at);
    assert_eq!(first_metadata.work_logs, second_metadata.work_logs);

    let order = second_metadata
        .work_logs
        .iter()
        .map(|record| record.file_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        order,
        vec!["Notes_15_03_2024.html", "Plan_01_02_2024.html", "readme.html", "zeta.html"]
    );
    Ok(())
}
