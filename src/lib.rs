pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Phase};

pub use api::{ApiResponse, EconomicDataClient};
pub use config::{cli::LocalStorage, run_config::RunConfig};
pub use core::{
    etl::{EtlEngine, RunSummary},
    pipeline::{CategoryPipeline, ObservationPipeline},
};
pub use domain::model::{SeriesEntry, Table};
pub use utils::error::{EtlError, Result};
