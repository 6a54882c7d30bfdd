mod cli;
mod replay;
mod windowed;

use std::process::ExitCode;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use webbridge_config::schema::BridgeConfig;
use webbridge_common::ConfigError;
use winit::event_loop::EventLoop;

use cli::Mode;

fn load_config(args: &cli::Args) -> Result<BridgeConfig, ConfigError> {
    match &args.config {
        Some(path) => webbridge_config::load_config_from(path),
        None => webbridge_config::load_config(),
    }
}

fn init_logging(args: &cli::Args, config: &BridgeConfig) {
    let directive = match &args.log_level {
        Some(level) => cli::log_directive(level),
        None => config.logging.level.as_directive().to_string(),
    };
    let directive = directive.parse().unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = cli::parse();

    // logging needs the configured level, so the load error is reported after init
    let loaded = load_config(&args);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => BridgeConfig::default(),
    };
    init_logging(&args, &config);

    tracing::info!("webbridge v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("using config override: {}", path.display());
    }
    if let Err(e) = loaded {
        tracing::warn!("config load failed, using defaults: {e}");
    }

    match args.mode() {
        Mode::Replay { session } => {
            let stdout = std::io::stdout();
            match replay::run_file(&session, &config, &mut stdout.lock()) {
                Ok(count) => {
                    tracing::info!(messages = count, "replay finished");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("replay failed: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Mode::Open { url, html } => {
            let event_loop = match EventLoop::new() {
                Ok(event_loop) => event_loop,
                Err(e) => {
                    tracing::error!("failed to create event loop: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let mut app = windowed::WindowedHost::new(config, windowed::initial_source(url, html));

            tracing::info!("entering event loop");
            if let Err(e) = event_loop.run_app(&mut app) {
                tracing::error!("event loop error: {e}");
                return ExitCode::FAILURE;
            }
            tracing::info!("shutdown complete");
            ExitCode::SUCCESS
        }
    }
}
