use vitaminav_db_builder::{config::Config, orchestration};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let summary = match orchestration::run(&config).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Database build failed: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::to_string(&summary) {
        Ok(json) => tracing::info!(summary = %json, "Run summary"),
        Err(e) => tracing::warn!(error = %e, "Failed to render run summary"),
    }

    if !summary.is_clean() {
        for failure in &summary.report.failures {
            eprintln!("Row failed: {}", failure);
        }
        eprintln!(
            "{} row(s) were not loaded into {}",
            summary.report.failures.len(),
            config.target_database.display()
        );
        std::process::exit(1);
    }
}
