use agent_commission::config::Config;
use agent_commission::reports::ReportService;
use agent_commission::transactions::RawTable;
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("agent_commission={}", config.app.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.app.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting agent commission calculation");
    tracing::info!("Environment: {}", config.app.env);

    let input_path = std::env::args()
        .nth(1)
        .context("Usage: agent-commission <input.json>")?;
    let input = std::fs::read_to_string(&input_path)
        .with_context(|| format!("Failed to read {}", input_path))?;
    let table: RawTable = serde_json::from_str(&input)
        .with_context(|| format!("{} is not a valid transaction table", input_path))?;

    let service = ReportService::from_config(&config).context("Failed to load commission rules")?;
    let report = service.generate(&table)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
