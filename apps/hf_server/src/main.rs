use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use hf_server::{build_state, router, AppConfig, Overrides, StartupError};

#[derive(Debug, Parser)]
#[command(
    name = "hf_server",
    version,
    about = "Heart failure risk predictor",
    long_about = "hf_server serves an interactive form that collects twelve patient\n\
        measurements, scores them with a pre-trained classifier and shows the\n\
        predicted heart-failure risk with bar and donut probability charts.\n\n\
        EXAMPLES:\n\
        \n  hf_server                                   Serve with ./hf_server.toml or defaults\n\
        \n  hf_server --model models/rf.json -p 8080    Override model and port\n\
        \n  hf_server -c /etc/hf_server.toml -vv        Explicit config, trace logging"
)]
struct Cli {
    /// Configuration file (default: ./hf_server.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Model artifact to load instead of the configured one
    #[arg(short, long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Increase verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    config.apply(&Overrides {
        model: cli.model,
        host: cli.host,
        port: cli.port,
    });

    let level = match config.log_filter(cli.verbose) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &AppConfig) -> Result<(), StartupError> {
    let addr = config.socket_addr()?;
    let state = build_state(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    log::info!("hf_server listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;
    log::info!("hf_server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
