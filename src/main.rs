use gryphon_vantage::adapters::outbound::{
    init_buffered_logger, init_combined_logger, init_console_logger, init_event_log, FilesystemArenaSource,
};
use gryphon_vantage::application::ViewPlanningService;
use gryphon_vantage::Config;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let mut config_path = std::env::var("VANTAGE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let mut arena_name = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                config_path = args.next().ok_or("--config needs a path")?;
            }
            _ => arena_name = Some(arg),
        }
    }

    let config = if Path::new(&config_path).exists() {
        Config::from_file(&config_path).await?
    } else {
        Config::default()
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)))
        .init();
    info!("Starting gryphon-vantage");

    let sink = match &config.logging.file {
        Some(file) => init_combined_logger(file, &config.logging.file_level),
        None => init_console_logger("vantage"),
    };
    let (logger, log_drain) = if config.logging.buffer_capacity > 0 {
        let (logger, drain) = init_buffered_logger(sink, config.logging.buffer_capacity);
        (logger, Some(drain))
    } else {
        (sink, None)
    };

    let (event_tx, events) = init_event_log(64);

    let source = Arc::new(FilesystemArenaSource::new(config.data.base_dir.clone()));
    let service = ViewPlanningService::new(config.planner_settings(), source, logger).with_event_sender(event_tx);

    match arena_name {
        Some(name) => match service.plan_named(&name).await {
            Ok(outcome) => println!("{}", serde_json::to_string_pretty(&outcome)?),
            Err(e) => error!("Planning {} failed: {}", name, e),
        },
        None => {
            for name in service.available_arenas()? {
                println!("{}", name);
            }
        }
    }

    drop(service);
    let published = events.await?;
    if let Some(drain) = log_drain {
        drain.await?;
    }
    info!(events = published, "Shutting down gryphon-vantage");
    Ok(())
}
