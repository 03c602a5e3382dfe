use anyhow::{Context, Result};
use clap::Parser;
use scoreboard_relay::{router, AppState, Config};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{filter::EnvFilter, fmt::format::JsonFields, layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[tokio::main]
async fn main() -> Result<()> {
	dotenv::dotenv().ok();
	let config = Config::parse();
	init_tracing(&config);

	let config = Arc::new(config);
	let shutdown_token = CancellationToken::new();
	let state = AppState::build(config.clone(), shutdown_token.clone())?;
	let app = router(state);

	let listener = TcpListener::bind(config.bind_addr()).await.with_context(|| format!("binding {}", config.bind_addr()))?;
	tracing::info!("⚾ Scoreboard relay listening on http://{}", listener.local_addr()?);

	let signal_shutdown_token = shutdown_token.clone();
	tokio::spawn(async move {
		tokio::signal::ctrl_c().await.ok();
		tracing::info!("Received Ctrl+C, initiating shutdown...");
		signal_shutdown_token.cancel();
	});

	let server_token = shutdown_token.clone();
	axum::serve(listener, app)
		.with_graceful_shutdown(async move {
			server_token.cancelled().await;
		})
		.await?;

	tracing::info!("Shutdown complete");
	Ok(())
}

fn init_tracing(config: &Config) {
	let filter = EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::registry()
		.with(if config.log_json {
			Box::new(
				tracing_subscriber::fmt::layer()
					.fmt_fields(JsonFields::default())
					.event_format(tracing_subscriber::fmt::format().json().flatten_event(true).with_span_list(false))
					.with_filter(filter),
			) as Box<dyn Layer<_> + Send + Sync>
		} else {
			Box::new(
				tracing_subscriber::fmt::layer()
					.event_format(tracing_subscriber::fmt::format().pretty())
					.with_filter(filter),
			)
		})
		.init();
}
