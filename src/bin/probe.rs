use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use econ_etl::api::params::{CategorySeriesParams, ObservationParams, RealtimeWindow};
use econ_etl::api::DEFAULT_BASE_URL;
use econ_etl::config::run_config::API_KEY_ENV;
use econ_etl::utils::logger;
use econ_etl::{ApiResponse, EconomicDataClient};

/// Issue a single API call and print the raw JSON.
#[derive(Parser)]
#[command(name = "probe")]
struct Args {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Vintage start date (YYYY-MM-DD)
    #[arg(long, global = true)]
    realtime_start: Option<String>,

    /// Vintage end date (YYYY-MM-DD)
    #[arg(long, global = true)]
    realtime_end: Option<String>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Categories of a series
    Categories { series_id: String },
    /// Series listed in a category
    CategorySeries {
        category_id: u64,
        #[arg(long, default_value_t = 1000)]
        limit: u32,
    },
    /// Child categories of a category
    Children { category_id: u64 },
    /// Observations of a series
    Observations {
        series_id: String,
        #[arg(long)]
        observation_start: Option<String>,
        #[arg(long)]
        units: Option<String>,
    },
    /// Metadata of a series
    Series { series_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let api_key = std::env::var(API_KEY_ENV).with_context(|| format!("{} must be set", API_KEY_ENV))?;
    let client = EconomicDataClient::new(args.base_url.clone(), api_key);
    let window = RealtimeWindow {
        realtime_start: args.realtime_start.clone(),
        realtime_end: args.realtime_end.clone(),
    };

    let response = match &args.command {
        Command::Categories { series_id } => client.series_categories(series_id, &window).await,
        Command::CategorySeries { category_id, limit } => {
            let params = CategorySeriesParams {
                window,
                limit: *limit,
                ..CategorySeriesParams::default()
            };
            client.category_series(&category_id.to_string(), &params).await
        }
        Command::Children { category_id } => {
            client.category_children(&category_id.to_string(), &window).await
        }
        Command::Observations {
            series_id,
            observation_start,
            units,
        } => {
            let params = ObservationParams {
                window,
                observation_start: observation_start.clone(),
                units: units.clone(),
                ..ObservationParams::default()
            };
            client.series_observations(series_id, &params).await
        }
        Command::Series { series_id } => client.series(series_id, &window).await,
    };

    match response {
        ApiResponse::Success(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        ApiResponse::Failure { status: Some(code), reason } => bail!("request failed with {}: {}", code, reason),
        ApiResponse::Failure { status: None, reason } => bail!("request failed: {}", reason),
    }
}
