use crate::api::params::{CategorySeriesParams, ObservationParams, RealtimeWindow};
use crate::api::{ApiResponse, EconomicDataClient};
use crate::domain::model::{SeriesEntry, NOT_FOUND};
use std::collections::{BTreeMap, BTreeSet};

/// Raw `category/series` responses keyed by category id.
pub type CategorySeries = BTreeMap<String, ApiResponse>;

/// An observations response together with the segment it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentObservations {
    pub segment: SeriesEntry,
    pub response: ApiResponse,
}

/// First category id of a `series/categories` response, if any.
pub fn first_category_id(response: &ApiResponse) -> Option<String> {
    let id = response.nested_array("categories")?.first()?.get("id")?;
    match id {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Looks up each series' category, in input order. Series without one map to
/// [`NOT_FOUND`].
pub async fn resolve_category_ids(client: &EconomicDataClient, series: &[SeriesEntry]) -> Vec<String> {
    let mut category_ids = Vec::with_capacity(series.len());

    for entry in series {
        // The lookup never carries the vintage window
        let response = client
            .series_categories(&entry.code, &RealtimeWindow::default())
            .await;
        let category_id = first_category_id(&response).unwrap_or_else(|| NOT_FOUND.to_string());
        tracing::info!("{}: {}", entry.description, category_id);
        category_ids.push(category_id);
    }

    category_ids
}

/// Fetches the series listing of every distinct category id.
pub async fn fetch_category_series(
    client: &EconomicDataClient,
    category_ids: &[String],
    params: &CategorySeriesParams,
) -> CategorySeries {
    let unique: BTreeSet<&str> = category_ids.iter().map(String::as_str).collect();
    let mut fetched = CategorySeries::new();

    for category_id in unique {
        if category_id == NOT_FOUND {
            tracing::warn!("Skipping series listing for unresolved category");
            continue;
        }

        let response = client.category_series(category_id, params).await;
        if response.is_success() {
            tracing::info!("Extracted {}'s series", category_id);
        }
        fetched.insert(category_id.to_string(), response);
    }

    fetched
}

/// Fetches observations for each segment, keeping the pairing explicit.
pub async fn fetch_observations(
    client: &EconomicDataClient,
    segments: &[SeriesEntry],
    params: &ObservationParams,
) -> Vec<SegmentObservations> {
    let mut fetched = Vec::with_capacity(segments.len());

    for segment in segments {
        let response = client.series_observations(&segment.code, params).await;
        if response.is_success() {
            tracing::info!("Extracted observations for {} ({})", segment.code, segment.description);
        }
        fetched.push(SegmentObservations {
            segment: segment.clone(),
            response,
        });
    }

    fetched
}
