use crate::api::params::{CategorySeriesParams, ObservationParams};
use crate::api::DEFAULT_BASE_URL;
use crate::core::export::{Delimiter, ExportOptions};
use crate::core::{ConfigProvider, SeriesEntry};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_date, validate_existing_dir, validate_non_empty_string, validate_range, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const API_KEY_ENV: &str = "ECONOMIC_DATA_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub source: SourceConfig,
    /// Series whose categories drive the category phase.
    pub series: Vec<SeriesEntry>,
    /// Curated segments fetched in the observation phase, in output order.
    pub segments: Vec<SeriesEntry>,
    pub filters: FilterConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    /// Falls back to `ECONOMIC_DATA_API_KEY` when empty.
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Sent as `realtime_start` on the series listing and observation calls.
    pub start_date: Option<String>,
    /// Row limit for category series listings.
    pub limit: u32,
    /// Row limit for observation calls; the API default applies when unset.
    pub observation_limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
    pub delimiter: Delimiter,
    pub category_prefix: String,
    pub observation_prefix: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            limit: 1000,
            observation_limit: None,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: "datasets/generated_by_main/".to_string(),
            delimiter: Delimiter::Csv,
            category_prefix: "category_dataframe".to_string(),
            observation_prefix: "observation_dataframe".to_string(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            series: default_series(),
            segments: default_segments(),
            filters: FilterConfig::default(),
            load: LoadConfig::default(),
        }
    }
}

/// Construction-industry series used to discover categories.
pub fn default_series() -> Vec<SeriesEntry> {
    vec![
        SeriesEntry::new("TTLCONS", "Total Construction Spending"),
        SeriesEntry::new("USCONS", "Employees in Construction"),
        SeriesEntry::new(
            "CES2000000003",
            "Average Hourly Earnings of employees in Construction",
        ),
        SeriesEntry::new("WPUSI012011", "Average Price Index for Construction"),
    ]
}

/// Construction spending broken down by segment.
pub fn default_segments() -> Vec<SeriesEntry> {
    vec![
        SeriesEntry::new("TLRESCONS", "Total Construction Spending: Residential"),
        SeriesEntry::new("TLNRESCONS", "Total Construction Spending: Nonresidential"),
        SeriesEntry::new("TLPBLCONS", "Total Construction Spending: Public"),
        SeriesEntry::new("TLPRVCONS", "Total Construction Spending: Private"),
        SeriesEntry::new("TLCOMCONS", "Total Construction Spending: Commercial"),
        SeriesEntry::new("TLMFGCONS", "Total Construction Spending: Manufacturing"),
        SeriesEntry::new("TLHLTHCONS", "Total Construction Spending: Health Care"),
    ]
}

impl RunConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        // Substitute environment variables before parsing
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables become empty.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!("Environment variable {} is not set", var_name);
                String::new()
            })
        });

        Ok(result.to_string())
    }

    /// Fills an empty API key from the environment. A key that stays empty
    /// is only warned about; the API will reject the requests.
    pub fn apply_env_api_key(&mut self) {
        if !self.source.api_key.is_empty() {
            return;
        }
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => self.source.api_key = key.trim().to_string(),
            _ => tracing::warn!("{} is not set; requests will fail authentication", API_KEY_ENV),
        }
    }

    pub fn category_params(&self) -> CategorySeriesParams {
        CategorySeriesParams {
            limit: self.filters.limit,
            ..CategorySeriesParams::default()
        }
        .with_realtime_start(self.filters.start_date.clone())
    }

    pub fn observation_params(&self) -> ObservationParams {
        ObservationParams {
            limit: self.filters.observation_limit,
            ..ObservationParams::default()
        }
        .with_realtime_start(self.filters.start_date.clone())
    }

    pub fn category_export(&self) -> ExportOptions {
        ExportOptions::new(self.load.category_prefix.clone(), self.load.delimiter)
    }

    pub fn observation_export(&self) -> ExportOptions {
        ExportOptions::new(self.load.observation_prefix.clone(), self.load.delimiter)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("source.base_url", &self.source.base_url)?;
        validate_existing_dir("load.output_path", &self.load.output_path)?;
        validate_non_empty_string("load.category_prefix", &self.load.category_prefix)?;
        validate_non_empty_string("load.observation_prefix", &self.load.observation_prefix)?;

        if let Some(start_date) = &self.filters.start_date {
            validate_date("filters.start_date", start_date)?;
        }
        validate_range("filters.limit", self.filters.limit, 1, 1000)?;
        if let Some(limit) = self.filters.observation_limit {
            validate_range("filters.observation_limit", limit, 1, 100_000)?;
        }

        for entry in self.series.iter().chain(&self.segments) {
            validate_non_empty_string("series.code", &entry.code)?;
        }

        Ok(())
    }
}

impl ConfigProvider for RunConfig {
    fn base_url(&self) -> &str {
        &self.source.base_url
    }

    fn api_key(&self) -> &str {
        &self.source.api_key
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
