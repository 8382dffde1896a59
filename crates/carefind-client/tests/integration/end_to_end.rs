//! Full pipeline over canned pages: mock fetcher, real parsers, real CSV sink.

use carefind_client::parsers;
use carefind_core::Harvester;
use carefind_core::models::{ACCEPTED, FIELD_COUNT, Field, SENTINEL};
use carefind_core::selectors::SelectorTable;
use carefind_core::testutil::MockFetcher;
use carefind_sink::CsvSink;

use crate::common::*;

#[tokio::test]
async fn single_postal_code_writes_one_row_per_listing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output_data.csv");

    let fetcher = MockFetcher::routed()
        .route(SEARCH_73012, SEARCH_PAGE)
        .route(PROVIDER_123, DETAIL_PAGE)
        .route(PROVIDER_456, SPARSE_PAGE);
    let (listings, records) = parsers(&SelectorTable::default()).unwrap();
    let sink = CsvSink::create(&output).unwrap();

    let mut harvester = Harvester::new(fetcher.clone(), listings, records, sink, site());
    let summary = harvester.run(&["73012"]).await.unwrap();

    assert_eq!(summary.listings_found, 2);
    assert_eq!(summary.records_written, 2);
    assert_eq!(
        fetcher.requests(),
        vec![SEARCH_73012, PROVIDER_123, PROVIDER_456]
    );

    let (header, rows) = read_table(&output);
    assert_eq!(header, Field::header().map(String::from).to_vec());
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.len() == FIELD_COUNT));

    let col = |field: Field| Field::ALL.iter().position(|f| *f == field).unwrap();
    assert_eq!(rows[0][col(Field::Url)], PROVIDER_123);
    assert_eq!(rows[0][col(Field::ChildCareName)], "Little Sprouts Learning Center");
    assert_eq!(rows[0][col(Field::Infants)], ACCEPTED);
    assert_eq!(rows[0][col(Field::ComplianceVisits)], "3");
    assert_eq!(rows[1][col(Field::Url)], PROVIDER_456);
    assert_eq!(rows[1][col(Field::ChildCareCenter)], SENTINEL);
    assert_eq!(rows[1][col(Field::SchoolAge)], ACCEPTED);
}

#[tokio::test]
async fn many_postal_codes_share_one_header() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output_data.csv");

    let fetcher = MockFetcher::routed()
        .route(SEARCH_73012, SEARCH_PAGE)
        .fail(SEARCH_73013, "connection refused")
        .route(SEARCH_73020, SEARCH_PAGE)
        .route(PROVIDER_123, DETAIL_PAGE)
        .fail(PROVIDER_456, "timed out");
    let (listings, records) = parsers(&SelectorTable::default()).unwrap();
    let sink = CsvSink::create(&output).unwrap();

    let mut harvester = Harvester::new(fetcher, listings, records, sink, site());
    let summary = harvester.run(&["73012", "73013", "73020"]).await.unwrap();

    assert_eq!(summary.postal_codes, 3);
    assert_eq!(summary.empty_postal_codes, 1);
    assert_eq!(summary.records_written, 2);
    assert_eq!(summary.listings_skipped, 2);

    let raw = std::fs::read_to_string(&output).unwrap();
    assert_eq!(raw.lines().filter(|l| l.starts_with("URL,")).count(), 1);

    let (_, rows) = read_table(&output);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r[0] == PROVIDER_123));
}

#[tokio::test]
async fn resumed_table_keeps_single_header() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output_data.csv");

    for zip in ["73012", "73020"] {
        let search = format!("https://childcarefind.okdhs.org/providers?zip-code={zip}");
        let fetcher = MockFetcher::routed()
            .route(&search, SEARCH_PAGE)
            .route(PROVIDER_123, DETAIL_PAGE)
            .route(PROVIDER_456, SPARSE_PAGE);
        let (listings, records) = parsers(&SelectorTable::default()).unwrap();
        let sink = CsvSink::open_append(&output).unwrap();
        let mut harvester = Harvester::new(fetcher, listings, records, sink, site());
        harvester.run(&[zip]).await.unwrap();
    }

    let raw = std::fs::read_to_string(&output).unwrap();
    assert_eq!(raw.lines().filter(|l| l.starts_with("URL,")).count(), 1);
    let (_, rows) = read_table(&output);
    assert_eq!(rows.len(), 4);
}
