use crate::api::params::{CategorySeriesParams, ObservationParams};
use crate::api::EconomicDataClient;
use crate::core::export::{write_tables, ExportOptions};
use crate::core::flatten::{flatten_observations, flatten_responses};
use crate::core::resolve::{
    fetch_category_series, fetch_observations, resolve_category_ids, CategorySeries,
    SegmentObservations,
};
use crate::core::{Pipeline, SeriesEntry, Storage, TransformResult};
use crate::utils::error::Result;

/// Series codes → their categories → every series listed in those categories.
pub struct CategoryPipeline<S: Storage> {
    client: EconomicDataClient,
    storage: S,
    series: Vec<SeriesEntry>,
    params: CategorySeriesParams,
    export: ExportOptions,
}

impl<S: Storage> CategoryPipeline<S> {
    pub fn new(
        client: EconomicDataClient,
        storage: S,
        series: Vec<SeriesEntry>,
        params: CategorySeriesParams,
        export: ExportOptions,
    ) -> Self {
        Self {
            client,
            storage,
            series,
            params,
            export,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for CategoryPipeline<S> {
    type Extracted = CategorySeries;

    fn name(&self) -> &str {
        "categories"
    }

    async fn extract(&self) -> Result<CategorySeries> {
        // Unresolved series stay in the list as the sentinel
        let category_ids = resolve_category_ids(&self.client, &self.series).await;
        tracing::info!("Resolved category ids: {:?}", category_ids);

        Ok(fetch_category_series(&self.client, &category_ids, &self.params).await)
    }

    async fn transform(&self, data: CategorySeries) -> Result<TransformResult> {
        Ok(flatten_responses(
            data.iter().map(|(id, response)| (id.as_str(), response)),
            "seriess",
        ))
    }

    async fn load(&self, result: TransformResult) -> Result<Vec<String>> {
        write_tables(&self.storage, &result.tables, &self.export).await
    }
}

/// Curated segment codes → their observations, stamped with the segment.
pub struct ObservationPipeline<S: Storage> {
    client: EconomicDataClient,
    storage: S,
    segments: Vec<SeriesEntry>,
    params: ObservationParams,
    export: ExportOptions,
}

impl<S: Storage> ObservationPipeline<S> {
    pub fn new(
        client: EconomicDataClient,
        storage: S,
        segments: Vec<SeriesEntry>,
        params: ObservationParams,
        export: ExportOptions,
    ) -> Self {
        Self {
            client,
            storage,
            segments,
            params,
            export,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for ObservationPipeline<S> {
    type Extracted = Vec<SegmentObservations>;

    fn name(&self) -> &str {
        "observations"
    }

    async fn extract(&self) -> Result<Vec<SegmentObservations>> {
        Ok(fetch_observations(&self.client, &self.segments, &self.params).await)
    }

    async fn transform(&self, data: Vec<SegmentObservations>) -> Result<TransformResult> {
        Ok(flatten_observations(&data))
    }

    async fn load(&self, result: TransformResult) -> Result<Vec<String>> {
        write_tables(&self.storage, &result.tables, &self.export).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::Delimiter;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_count(&self) -> usize {
            self.files.lock().await.len()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn location(&self, path: &str) -> String {
            format!("mock://{}", path)
        }
    }

    fn category_pipeline(server: &MockServer, storage: MockStorage, series: Vec<SeriesEntry>) -> CategoryPipeline<MockStorage> {
        CategoryPipeline::new(
            EconomicDataClient::new(server.base_url(), "test-key"),
            storage,
            series,
            CategorySeriesParams::default(),
            ExportOptions::new("category_dataframe", Delimiter::Csv),
        )
    }

    #[tokio::test]
    async fn test_category_pipeline_extract_deduplicates_categories() {
        let server = MockServer::start();
        let lookup_a = server.mock(|when, then| {
            when.method(GET)
                .path("/series/categories")
                .query_param("series_id", "USCONS");
            then.status(200).json_body(serde_json::json!({"categories": [{"id": 32310}]}));
        });
        let lookup_b = server.mock(|when, then| {
            when.method(GET)
                .path("/series/categories")
                .query_param("series_id", "CES2000000003");
            then.status(200).json_body(serde_json::json!({"categories": [{"id": 32310}]}));
        });
        let listing = server.mock(|when, then| {
            when.method(GET)
                .path("/category/series")
                .query_param("category_id", "32310");
            then.status(200).json_body(serde_json::json!({"seriess": [{"id": "USCONS"}, {"id": "CES2000000003"}]}));
        });

        let pipeline = category_pipeline(
            &server,
            MockStorage::new(),
            vec![
                SeriesEntry::new("USCONS", "Employees in Construction"),
                SeriesEntry::new("CES2000000003", "Average Hourly Earnings"),
            ],
        );

        let extracted = pipeline.extract().await.unwrap();

        lookup_a.assert();
        lookup_b.assert();
        listing.assert_hits(1);
        assert_eq!(extracted.len(), 1);
        assert!(extracted["32310"].is_success());
    }

    #[tokio::test]
    async fn test_category_pipeline_unresolved_series_issues_no_listing() {
        let server = MockServer::start();
        let lookup = server.mock(|when, then| {
            when.method(GET).path("/series/categories");
            then.status(400)
                .json_body(serde_json::json!({"error_code": 400, "error_message": "Bad Request. The series does not exist."}));
        });
        let listing = server.mock(|when, then| {
            when.method(GET).path("/category/series");
            then.status(200).json_body(serde_json::json!({"seriess": []}));
        });

        let pipeline = category_pipeline(&server, MockStorage::new(), vec![SeriesEntry::new("NOPE", "Missing")]);
        let extracted = pipeline.extract().await.unwrap();

        lookup.assert();
        listing.assert_hits(0);
        assert!(extracted.is_empty());
    }

    #[tokio::test]
    async fn test_category_pipeline_load_writes_one_file_per_table() {
        let server = MockServer::start();
        let storage = MockStorage::new();
        let pipeline = category_pipeline(&server, storage.clone(), vec![]);

        let mut data = CategorySeries::new();
        data.insert(
            "1".to_string(),
            crate::api::ApiResponse::Success(serde_json::json!({"seriess": [{"id": "A"}]})),
        );
        data.insert(
            "2".to_string(),
            crate::api::ApiResponse::Success(serde_json::json!({"no_key": []})),
        );
        data.insert(
            "3".to_string(),
            crate::api::ApiResponse::Success(serde_json::json!({"seriess": [{"id": "B"}, {"id": "C"}]})),
        );

        let result = pipeline.transform(data).await.unwrap();
        assert_eq!(result.tables.len(), 2);
        assert_eq!(result.skipped, 1);

        let written = pipeline.load(result).await.unwrap();

        assert_eq!(
            written,
            vec!["mock://category_dataframe_0.csv", "mock://category_dataframe_1.csv"]
        );
        assert_eq!(storage.file_count().await, 2);
        let second = storage.get_file("category_dataframe_1.csv").await.unwrap();
        assert_eq!(String::from_utf8(second).unwrap(), "id\nB\nC\n");
    }

    #[tokio::test]
    async fn test_observation_pipeline_end_to_end_with_mock_storage() {
        let server = MockServer::start();
        let observations = server.mock(|when, then| {
            when.method(GET)
                .path("/series/observations")
                .query_param("series_id", "TLRESCONS")
                .query_param("realtime_start", "2011-01-01");
            then.status(200).json_body(serde_json::json!({
                "observations": [
                    {"date": "2011-01-01", "value": "230000"},
                    {"date": "2011-02-01", "value": "231000"}
                ]
            }));
        });

        let storage = MockStorage::new();
        let pipeline = ObservationPipeline::new(
            EconomicDataClient::new(server.base_url(), "test-key"),
            storage.clone(),
            vec![SeriesEntry::new("TLRESCONS", "Residential")],
            ObservationParams::default().with_realtime_start(Some("2011-01-01".to_string())),
            ExportOptions::new("observation_dataframe", Delimiter::Csv),
        );

        let extracted = pipeline.extract().await.unwrap();
        let result = pipeline.transform(extracted).await.unwrap();
        pipeline.load(result).await.unwrap();

        observations.assert();
        let file = storage.get_file("observation_dataframe_0.csv").await.unwrap();
        assert_eq!(
            String::from_utf8(file).unwrap(),
            "date,value,segment_code,segment_description\n\
             2011-01-01,230000,TLRESCONS,Residential\n\
             2011-02-01,231000,TLRESCONS,Residential\n"
        );
    }
}
