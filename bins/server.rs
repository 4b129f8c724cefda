use std::process::ExitCode;

use tracing::{error, info, Instrument};
use uuid::Uuid;

/// Worker count from the config file, else `TOKIO_WORKER_THREADS`, else tokio's default.
fn worker_threads() -> Option<usize> {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg.server.worker_threads,
        Err(_) => std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse().ok()),
    }
}

fn build_runtime(worker_threads: Option<usize>) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = worker_threads {
        builder.worker_threads(n);
    }
    builder.build()
}

fn main() -> ExitCode {
    // .env before the subscriber so RUST_LOG and LOG_FORMAT apply
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let instance_id = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |panic| {
        error!(%instance_id, message = %panic, "panic");
    }));

    let threads = worker_threads();
    let rt = match build_runtime(threads) {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };
    info!(%instance_id, version = env!("CARGO_PKG_VERSION"), threads, "starting");

    let span = tracing::info_span!("directory", %instance_id);
    match rt.block_on(server::run().instrument(span)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(%instance_id, error = %format!("{e:#}"), "server exited with error");
            ExitCode::FAILURE
        }
    }
}
