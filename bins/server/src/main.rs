use clap::Parser;
use configs::{AppConfig, BackendKind};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "contact-server", version, about = "Contact directory HTTP service")]
struct Cli {
    /// Storage backend: memory|file|elastic (overrides STORAGE_BACKEND and config.toml)
    #[arg(short = 'd', long = "storage")]
    storage: Option<String>,

    /// Path to config.toml (overrides CONFIG_PATH)
    #[arg(short, long)]
    config: Option<String>,

    /// Emit JSON structured logs
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(json: bool) {
    if json {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }
    info!(service = "contact-server", event = "logger_init", "tracing subscriber initialized");
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut cfg = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_and_validate()?,
    };
    if let Some(kind) = &cli.storage {
        cfg.storage.backend = kind.parse::<BackendKind>()?;
        cfg.storage.validate()?;
    }
    Ok(cfg)
}

fn main() -> std::process::ExitCode {
    // .env first so RUST_LOG and storage variables take effect
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "contact-server",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "contact-server", event = "config_invalid", error = %e, "cannot load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    let worker_threads = cfg.server.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "contact-server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "contact-server",
        event = "start",
        %service_id,
        pid,
        version,
        backend = %cfg.storage.backend,
        threads = worker_threads.unwrap_or_default(),
        "contact server starting"
    );

    rt.block_on(async move {
        let server_task = tokio::spawn(async move {
            if let Err(e) = server::run(cfg).await {
                error!(service = "contact-server", event = "run_failed", error = %e, "server::run returned error");
                Err(e)
            } else {
                Ok(())
            }
        });

        tokio::select! {
            res = server_task => {
                match res {
                    Ok(Ok(())) => {
                        info!(service = "contact-server", event = "stop", %service_id, pid, "server stopped normally");
                        std::process::ExitCode::SUCCESS
                    }
                    Ok(Err(_)) => std::process::ExitCode::FAILURE,
                    Err(e) => {
                        error!(service = "contact-server", event = "task_join_error", error = %e, "server task join error");
                        std::process::ExitCode::FAILURE
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!(service = "contact-server", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                std::process::ExitCode::SUCCESS
            }
        }
    })
}
