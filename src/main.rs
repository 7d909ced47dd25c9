//! gcprobe: runtime memory and GC statistics over HTTP.
//! Used by: binary entrypoint.

pub mod console;
pub mod counters;
pub mod encode;
pub mod endpoint;
pub mod error;
pub mod handlers;
pub mod sampler;
pub mod server;
pub mod state;
pub mod stats;
pub mod workload;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let version = format!("gcprobe {}", env!("CARGO_PKG_VERSION"));
    let state = state::build_state(&version)?;

    let threads = std::thread::available_parallelism()
        .map(|n| n.get() as i64)
        .unwrap_or(1);
    state.counters.set_threads(threads);

    // demo workload so the endpoint has something to report
    workload::spawn(state.counters.clone());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    console::print_banner();
    console::print_startup(&addr);
    tracing::info!("starting gcprobe on {}", addr);

    server::run(state, &addr).await?;
    Ok(())
}
