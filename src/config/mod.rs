pub mod cli;
pub mod run_config;

#[cfg(feature = "cli")]
pub use self::args::{CliConfig, Phase};

#[cfg(feature = "cli")]
mod args {
    use super::run_config::RunConfig;
    use crate::core::export::Delimiter;
    use crate::utils::error::Result;
    use clap::{Parser, ValueEnum};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum Phase {
        /// Series → categories → series listings.
        Categories,
        /// Curated segments → observations.
        Observations,
        All,
    }

    impl Phase {
        pub fn runs_categories(&self) -> bool {
            matches!(self, Phase::Categories | Phase::All)
        }

        pub fn runs_observations(&self) -> bool {
            matches!(self, Phase::Observations | Phase::All)
        }
    }

    #[derive(Debug, Clone, Parser)]
    #[command(name = "econ-etl")]
    #[command(about = "Pull economic series metadata and observations into delimited files")]
    pub struct CliConfig {
        /// Path to a TOML run configuration
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Existing directory receiving the output files
        #[arg(long)]
        pub output_path: Option<String>,

        /// API base URL
        #[arg(long)]
        pub base_url: Option<String>,

        /// Vintage start date (YYYY-MM-DD) for series listings and observations
        #[arg(long)]
        pub start_date: Option<String>,

        /// Ask for the start date interactively; blank keeps the configured one
        #[arg(long, conflicts_with = "start_date")]
        pub prompt_start_date: bool,

        #[arg(long, value_enum, default_value_t = Phase::All)]
        pub phase: Phase,

        #[arg(long, value_enum)]
        pub delimiter: Option<Delimiter>,

        /// Enable verbose output
        #[arg(short, long)]
        pub verbose: bool,

        /// Emit logs as JSON lines
        #[arg(long)]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// File (or built-in defaults), then command line overrides, then the
        /// API key from the environment if none was configured.
        pub fn to_run_config(&self) -> Result<RunConfig> {
            let mut config = match &self.config {
                Some(path) => RunConfig::from_file(path)?,
                None => RunConfig::default(),
            };

            // Command line flags win over the file
            if let Some(output_path) = &self.output_path {
                config.load.output_path = output_path.clone();
            }
            if let Some(base_url) = &self.base_url {
                config.source.base_url = base_url.clone();
            }
            if let Some(start_date) = &self.start_date {
                config.filters.start_date = Some(start_date.clone());
            }
            if let Some(delimiter) = self.delimiter {
                config.load.delimiter = delimiter;
            }

            // Only fills an empty key
            config.apply_env_api_key();
            Ok(config)
        }
    }

}
