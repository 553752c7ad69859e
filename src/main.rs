use clap::Parser;
use econ_etl::utils::{logger, prompt::prompt_start_date, validation::Validate};
use econ_etl::{
    CategoryPipeline, CliConfig, EconomicDataClient, EtlEngine, EtlError, LocalStorage,
    ObservationPipeline, RunSummary,
};

fn exit_with(e: &EtlError) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}

fn report(summary: &RunSummary) {
    println!(
        "✅ {}: {} files written, {} responses skipped",
        summary.pipeline,
        summary.files.len(),
        summary.skipped
    );
    for file in &summary.files {
        println!("📁 {}", file);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // Initialize logging
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting econ-etl");
    tracing::debug!("CLI config: {:?}", cli);

    let mut config = cli.to_run_config().unwrap_or_else(|e| exit_with(&e));

    // A blank answer keeps the date from the config file, if any
    if cli.prompt_start_date {
        let configured = config.filters.start_date.take();
        config.filters.start_date = prompt_start_date(configured).unwrap_or_else(|e| exit_with(&e));
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed");
        exit_with(&e);
    }

    // Run the requested phases
    let client = EconomicDataClient::from_config(&config);
    let storage = LocalStorage::from_config(&config);

    if cli.phase.runs_categories() {
        let pipeline = CategoryPipeline::new(
            client.clone(),
            storage.clone(),
            config.series.clone(),
            config.category_params(),
            config.category_export(),
        );
        match EtlEngine::new(pipeline).run().await {
            Ok(summary) => report(&summary),
            Err(e) => exit_with(&e),
        }
    }

    if cli.phase.runs_observations() {
        let pipeline = ObservationPipeline::new(
            client,
            storage,
            config.segments.clone(),
            config.observation_params(),
            config.observation_export(),
        );
        match EtlEngine::new(pipeline).run().await {
            Ok(summary) => report(&summary),
            Err(e) => exit_with(&e),
        }
    }

    Ok(())
}
