use clap::Parser;
use std::num::NonZeroUsize;
use std::process::ExitCode;
use std::sync::Arc;

use nocache_serve::config::{AppState, Cli, Config};
use nocache_serve::server::{self, ShutdownSignal};
use nocache_serve::{logger, ServerError};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match start(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn start(cli: &Cli) -> Result<(), ServerError> {
    let cfg = Config::load(cli)?;
    logger::init(&cfg.logging)?;

    // Create the Tokio runtime, thread count from `server.workers`
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers.get());
    }
    let runtime = runtime_builder.build()?;

    let result = runtime.block_on(async_main(cfg));

    // In-flight connections are dropped, not drained
    runtime.shutdown_background();
    result
}

async fn async_main(cfg: Config) -> Result<(), ServerError> {
    let addr = cfg.socket_addr()?;
    let workers = cfg.server.workers.map(NonZeroUsize::get);
    let state = Arc::new(AppState::new(cfg)?);

    let listener = server::bind(addr)?;
    let local_addr = listener.local_addr()?;
    let signals = ShutdownSignal::register()?;

    println!("Serving at port {}", local_addr.port());
    logger::log_server_start(&local_addr, &state.root, workers);

    server::run(listener, state, async move {
        let reason = signals.recv().await;
        logger::log_shutdown(reason);
    })
    .await;

    Ok(())
}
