//! Query filters for the statistics API endpoints.
//!
//! Every optional field is only sent when set; the API applies its own
//! defaults otherwise. Dates are `YYYY-MM-DD` strings passed through as-is.

use serde::{Deserialize, Serialize};

pub(crate) type QueryPairs = Vec<(&'static str, String)>;

fn push_opt(pairs: &mut QueryPairs, key: &'static str, value: Option<impl ToString>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

fn push_list(pairs: &mut QueryPairs, key: &'static str, values: &[String], separator: &str) {
    if !values.is_empty() {
        pairs.push((key, values.join(separator)));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Sort key for series listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesOrderBy {
    #[default]
    SeriesId,
    Title,
    Units,
    Frequency,
    SeasonalAdjustment,
    RealtimeStart,
    RealtimeEnd,
    LastUpdated,
    ObservationStart,
    ObservationEnd,
    Popularity,
    GroupPopularity,
}

impl SeriesOrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesOrderBy::SeriesId => "series_id",
            SeriesOrderBy::Title => "title",
            SeriesOrderBy::Units => "units",
            SeriesOrderBy::Frequency => "frequency",
            SeriesOrderBy::SeasonalAdjustment => "seasonal_adjustment",
            SeriesOrderBy::RealtimeStart => "realtime_start",
            SeriesOrderBy::RealtimeEnd => "realtime_end",
            SeriesOrderBy::LastUpdated => "last_updated",
            SeriesOrderBy::ObservationStart => "observation_start",
            SeriesOrderBy::ObservationEnd => "observation_end",
            SeriesOrderBy::Popularity => "popularity",
            SeriesOrderBy::GroupPopularity => "group_popularity",
        }
    }
}

/// Series attribute that `filter_value` is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterVariable {
    Frequency,
    Units,
    SeasonalAdjustment,
}

impl FilterVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterVariable::Frequency => "frequency",
            FilterVariable::Units => "units",
            FilterVariable::SeasonalAdjustment => "seasonal_adjustment",
        }
    }
}

/// How observations are combined when `frequency` lowers the native frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMethod {
    Avg,
    Sum,
    Eop,
}

impl AggregationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::Avg => "avg",
            AggregationMethod::Sum => "sum",
            AggregationMethod::Eop => "eop",
        }
    }
}

/// Shape of vintage data in an observations response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    /// One row per observation per real-time period.
    RealtimePeriod,
    /// One column per vintage date, all observations.
    VintageDatesAll,
    /// One column per vintage date, new and revised observations only.
    VintageDatesNew,
    /// Initial release only.
    InitialRelease,
}

impl OutputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::RealtimePeriod => "1",
            OutputType::VintageDatesAll => "2",
            OutputType::VintageDatesNew => "3",
            OutputType::InitialRelease => "4",
        }
    }
}

/// As-of vintage window accepted by every endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeWindow {
    /// First vintage date to include.
    pub realtime_start: Option<String>,
    /// Last vintage date to include.
    pub realtime_end: Option<String>,
}

impl RealtimeWindow {
    pub(crate) fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "realtime_start", self.realtime_start.as_deref());
        push_opt(&mut pairs, "realtime_end", self.realtime_end.as_deref());
        pairs
    }
}

/// Filters for `category/series`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySeriesParams {
    pub window: RealtimeWindow,
    /// Maximum rows returned; anything past it is dropped by the API.
    pub limit: u32,
    /// Rows skipped before the first returned one.
    pub offset: u32,
    pub order_by: SeriesOrderBy,
    pub sort_order: SortOrder,
    /// Only keep series whose `filter_variable` equals `filter_value`.
    pub filter_variable: Option<FilterVariable>,
    pub filter_value: Option<String>,
    /// Only keep series carrying all of these tags.
    pub tag_names: Vec<String>,
    /// Drop series carrying any of these tags.
    pub exclude_tag_names: Vec<String>,
}

impl Default for CategorySeriesParams {
    fn default() -> Self {
        Self {
            window: RealtimeWindow::default(),
            limit: 1000,
            offset: 0,
            order_by: SeriesOrderBy::SeriesId,
            sort_order: SortOrder::Asc,
            filter_variable: None,
            filter_value: None,
            tag_names: Vec::new(),
            exclude_tag_names: Vec::new(),
        }
    }
}

impl CategorySeriesParams {
    pub fn with_realtime_start(mut self, start: Option<String>) -> Self {
        self.window.realtime_start = start;
        self
    }

    pub(crate) fn query_pairs(&self) -> QueryPairs {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("order_by", self.order_by.as_str().to_string()),
            ("sort_order", self.sort_order.as_str().to_string()),
        ];
        pairs.extend(self.window.query_pairs());
        push_opt(&mut pairs, "filter_variable", self.filter_variable.map(|v| v.as_str()));
        push_opt(&mut pairs, "filter_value", self.filter_value.as_deref());
        push_list(&mut pairs, "tag_names", &self.tag_names, ";");
        push_list(&mut pairs, "exclude_tag_names", &self.exclude_tag_names, ";");
        pairs
    }
}

/// Filters for `series/observations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationParams {
    pub window: RealtimeWindow,
    /// Maximum observations returned (API maximum 100000).
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort_order: Option<SortOrder>,
    /// First observation date to include.
    pub observation_start: Option<String>,
    /// Last observation date to include.
    pub observation_end: Option<String>,
    /// Data transformation code such as `lin`, `chg`, `pch` or `log`.
    pub units: Option<String>,
    /// Target frequency code such as `m`, `q` or `a`; must not exceed the native one.
    pub frequency: Option<String>,
    pub aggregation_method: Option<AggregationMethod>,
    pub output_type: Option<OutputType>,
    /// Explicit vintage dates, sent comma separated.
    pub vintage_dates: Vec<String>,
}

impl ObservationParams {
    pub fn with_realtime_start(mut self, start: Option<String>) -> Self {
        self.window.realtime_start = start;
        self
    }

    pub(crate) fn query_pairs(&self) -> QueryPairs {
        let mut pairs = self.window.query_pairs();
        push_opt(&mut pairs, "limit", self.limit);
        push_opt(&mut pairs, "offset", self.offset);
        push_opt(&mut pairs, "sort_order", self.sort_order.map(|s| s.as_str()));
        push_opt(&mut pairs, "observation_start", self.observation_start.as_deref());
        push_opt(&mut pairs, "observation_end", self.observation_end.as_deref());
        push_opt(&mut pairs, "units", self.units.as_deref());
        push_opt(&mut pairs, "frequency", self.frequency.as_deref());
        push_opt(&mut pairs, "aggregation_method", self.aggregation_method.map(|m| m.as_str()));
        push_opt(&mut pairs, "output_type", self.output_type.map(|o| o.as_str()));
        push_list(&mut pairs, "vintage_dates", &self.vintage_dates, ",");
        pairs
    }
}
