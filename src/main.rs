use clap::Parser;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

mod api;
mod config;
mod handler;
mod http;
mod logger;
mod poetry;
mod server;

/// Poetry query service with an MCP-style describe/call interface
#[derive(Parser, Debug)]
#[command(name = "poetry-mcp")]
#[command(about = "Serve classical Chinese poems to tool-calling language models")]
struct Args {
    /// Configuration file path without extension (e.g. "config" for config.toml)
    #[arg(short, long, default_value = "config")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let cfg = config::Config::load_from(&args.config)?;
    logger::init(&cfg)?;

    let catalog = poetry::Catalog::embedded()?;
    if catalog.is_empty() {
        logger::log_warning("Poem catalog is empty, every query will report no match");
    }

    // 创建 Tokio 运行时，根据 workers 配置设置线程数
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, catalog))
}

async fn async_main(
    cfg: config::Config,
    catalog: poetry::Catalog,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&addr, &cfg, catalog.len());

    let grace = Duration::from_secs(cfg.performance.write_timeout);
    let state = Arc::new(config::AppState::new(cfg, catalog));

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    let active_connections = server::run_server_loop(listener, state, shutdown).await;
    drain_connections(&active_connections, grace).await;

    logger::log_server_stop();
    Ok(())
}

/// Wait for in-flight connections to finish, at most `grace`
async fn drain_connections(active: &AtomicUsize, grace: Duration) {
    let deadline = Instant::now() + grace;
    loop {
        let remaining = active.load(Ordering::SeqCst);
        if remaining == 0 {
            return;
        }
        if Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutting down with {remaining} connection(s) still open"
            ));
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
