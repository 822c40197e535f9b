use airq_monitor::domain::ports::AirQualityApi;
use airq_monitor::server;
use airq_monitor::utils::error::ErrorSeverity;
use airq_monitor::utils::monitor::SystemMonitor;
use airq_monitor::utils::{logger, validation::Validate};
use airq_monitor::{AirQualityService, CliConfig, OpenWeatherClient, Settings};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // One-shot queries log human-readable output; the server logs JSON.
    if config.location.is_some() {
        logger::init_cli_logger(config.verbose);
    } else {
        logger::init_server_logger();
    }

    tracing::info!("Starting airq-monitor");

    let settings = match Settings::from_cli(&config) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration loading failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let monitor = SystemMonitor::new(config.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    let client = match OpenWeatherClient::new(&settings) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("❌ Failed to build API client: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    let service = AirQualityService::new(client);

    let result = match &config.location {
        Some(location) => run_query(&service, location).await,
        None => server::serve(service, settings.port).await,
    };

    monitor.log_final_stats();

    if let Err(e) = result {
        tracing::error!(
            "❌ Monitor failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run_query<A: AirQualityApi>(
    service: &AirQualityService<A>,
    location: &str,
) -> airq_monitor::Result<()> {
    let report = service.check(location).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
