use anyhow::Result;
use econ_etl::api::params::ObservationParams;
use econ_etl::core::export::{Delimiter, ExportOptions};
use econ_etl::core::flatten::{flatten_observations, SEGMENT_CODE_COLUMN, SEGMENT_DESCRIPTION_COLUMN};
use econ_etl::core::resolve::fetch_observations;
use econ_etl::{EconomicDataClient, EtlEngine, LocalStorage, ObservationPipeline, SeriesEntry};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn segments() -> Vec<SeriesEntry> {
    vec![
        SeriesEntry::new("TLRESCONS", "Residential"),
        SeriesEntry::new("TLNRESCONS", "Nonresidential"),
        SeriesEntry::new("TLPBLCONS", "Public"),
    ]
}

fn mock_observations(server: &MockServer, series_id: &str, dates: &[&str]) {
    let series_id = series_id.to_string();
    let observations: Vec<serde_json::Value> = dates
        .iter()
        .map(|d| json!({"realtime_start": "2024-01-01", "date": d, "value": "100.0"}))
        .collect();
    server.mock(move |when, then| {
        when.method(GET)
            .path("/series/observations")
            .query_param("series_id", series_id.as_str());
        then.status(200)
            .json_body(json!({"count": observations.len(), "observations": observations}));
    });
}

#[tokio::test]
async fn test_failed_fetch_does_not_shift_segment_labels() {
    let server = MockServer::start();
    mock_observations(&server, "TLRESCONS", &["2020-01-01", "2020-02-01"]);
    server.mock(|when, then| {
        when.method(GET)
            .path("/series/observations")
            .query_param("series_id", "TLNRESCONS");
        then.status(500);
    });
    mock_observations(&server, "TLPBLCONS", &["2020-01-01", "2020-02-01", "2020-03-01"]);

    let client = EconomicDataClient::new(server.base_url(), "test-key");
    let fetched = fetch_observations(&client, &segments(), &ObservationParams::default()).await;

    assert_eq!(fetched.len(), 3);
    assert!(!fetched[1].response.is_success());

    let result = flatten_observations(&fetched);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.tables.len(), 2);

    let public = &result.tables[1];
    assert_eq!(public.len(), 3);
    for row in public.rows() {
        assert_eq!(row.get(SEGMENT_CODE_COLUMN), Some(&json!("TLPBLCONS")));
        assert_eq!(row.get(SEGMENT_DESCRIPTION_COLUMN), Some(&json!("Public")));
    }
}

#[tokio::test]
async fn test_stamped_row_count_matches_observation_count() {
    let server = MockServer::start();
    mock_observations(&server, "TLRESCONS", &["2020-01-01"]);
    mock_observations(&server, "TLNRESCONS", &["2020-01-01", "2020-02-01", "2020-03-01", "2020-04-01"]);
    mock_observations(&server, "TLPBLCONS", &[]);

    let client = EconomicDataClient::new(server.base_url(), "test-key");
    let fetched = fetch_observations(&client, &segments(), &ObservationParams::default()).await;
    let result = flatten_observations(&fetched);

    let counts: Vec<usize> = result.tables.iter().map(|t| t.len()).collect();
    assert_eq!(counts, vec![1, 4, 0]);
    for (table, segment) in result.tables.iter().zip(segments()) {
        assert!(table
            .rows()
            .iter()
            .all(|row| row.get(SEGMENT_CODE_COLUMN) == Some(&json!(segment.code))));
    }
}

#[tokio::test]
async fn test_observation_phase_writes_tab_separated_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    mock_observations(&server, "TLRESCONS", &["2020-01-01"]);
    mock_observations(&server, "TLNRESCONS", &["2020-01-01", "2020-02-01"]);
    mock_observations(&server, "TLPBLCONS", &["2020-01-01"]);

    let pipeline = ObservationPipeline::new(
        EconomicDataClient::new(server.base_url(), "test-key"),
        LocalStorage::new(output_path.clone()),
        segments(),
        ObservationParams::default(),
        ExportOptions::new("observation_dataframe", Delimiter::Tsv),
    );

    let summary = EtlEngine::new(pipeline).run().await?;
    assert_eq!(summary.files.len(), 3);

    let second = std::fs::read_to_string(temp_dir.path().join("observation_dataframe_1.tsv"))?;
    let lines: Vec<&str> = second.lines().collect();
    assert_eq!(
        lines[0],
        "realtime_start\tdate\tvalue\tsegment_code\tsegment_description"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1..].iter().all(|l| l.ends_with("\tTLNRESCONS\tNonresidential")));

    Ok(())
}
