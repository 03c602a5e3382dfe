mod chime;
mod config;
mod engine;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use cue_timeline::{load_cue_sheet, PullScheduler};
use engine::RodioEngine;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{filter::EnvFilter, fmt::format::JsonFields, layer::SubscriberExt, util::SubscriberInitExt, Layer};

// The rodio output stream is tied to this thread, so the scheduler runs on a
// current-thread runtime and is awaited rather than spawned.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	dotenv::dotenv().ok();
	let config = Config::parse();
	init_tracing(&config);

	let timeline = load_cue_sheet(&config.cue_sheet).with_context(|| format!("loading cue sheet {}", config.cue_sheet.display()))?;
	tracing::info!(events = timeline.len(), cycle_secs = config.cycle_secs, "✅ Cue sheet ready");

	let engine = RodioEngine::try_default().context("opening audio output")?;
	if config.startup_chime {
		if let Err(e) = chime::play_startup_chime(engine.handle()) {
			tracing::warn!(error = %e, "Start-up chime failed");
		}
	}

	let scheduler = PullScheduler::new(Arc::new(timeline), config.scheduler_config(), engine)?;

	let shutdown_token = CancellationToken::new();
	let signal_shutdown_token = shutdown_token.clone();
	tokio::spawn(async move {
		tokio::signal::ctrl_c().await.ok();
		tracing::info!("Received Ctrl+C, initiating shutdown...");
		signal_shutdown_token.cancel();
	});

	let engine = scheduler.run(shutdown_token).await;
	drop(engine);

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
