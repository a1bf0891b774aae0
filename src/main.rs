#![warn(clippy::all)]

use tracing_subscriber::fmt::format::FmtSpan;

mod config;
mod quiz;
mod routes;
mod store;
mod types;

#[tokio::main]
async fn main() -> Result<(), handle_errors::Error> {
    let config = config::Config::new()?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_filter());

    tracing_subscriber::fmt()
        // Use the filter we built above to determine which traces to record.
        .with_env_filter(log_filter)
        // Record an event when each span closes.
        // This can be used to time our routes' durations!
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let store = if config.in_memory {
        tracing::info!("serving the bundled trivia dataset from memory");
        store::Store::in_memory()?
    } else {
        let store = store::Store::new(&config.database_url()).await?;
        store.migrate().await?;
        store
    };

    let routes = routes::build(store, routes::ApiSettings::from(&config));

    tracing::info!("Trivia API listening on port {}", config.port);
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;

    Ok(())
}
