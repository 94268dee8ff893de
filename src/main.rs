use automuteus::bot::{DiscordBackends, commands};
use automuteus::config::logging::init_tracing;
use automuteus::config::{LocaleCatalog, LoggingSettings};
use automuteus::lifecycle::shutdown::ShutdownSignal;
use automuteus::lifecycle::{self, AppContext, BuildInfo};
use dotenvy::dotenv;
use std::env;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 2. Initialize tracing before anything else can log
    let lookup = |key: &str| env::var(key).ok();
    let log_sink = match init_tracing(&LoggingSettings::from_lookup(&lookup)) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let build = BuildInfo::current();
    info!(
        version = build.version,
        commit = build.commit,
        date = build.date,
        "Starting AutoMuteUs"
    );
    if let Some(path) = log_sink.file() {
        info!("Writing logs to {:?}", path);
    }

    // 3. Resolve configuration; nothing external is touched on failure
    let ctx = match AppContext::from_lookup(lookup, log_sink, build.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Critical error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 4. Listen for termination before any dependency or command is touched
    let shutdown_signal = match ShutdownSignal::install() {
        Ok(signal) => signal,
        Err(e) => {
            error!("Failed to install signal handlers: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 5. Run the shard until a termination signal
    let locale = LocaleCatalog::load(&ctx.config.locale);
    let backends = DiscordBackends::new(locale, build);
    let catalog = commands::definitions();

    match lifecycle::run(&ctx, &backends, &catalog, shutdown_signal.recv()).await {
        Ok(()) => {
            info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Shard terminated: {}", e);
            ExitCode::FAILURE
        }
    }
}
