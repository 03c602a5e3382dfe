pub mod config;
pub mod sinks;
pub mod ws;

pub use config::Config;

use anyhow::Context;
use axum::{http::Method, http::StatusCode, routing::get, Router};
use cue_timeline::{load_scenario, CueSinks, DisplaySink, LedSink, ScoreCue, SoundCueSink, Timeline};
use sinks::{SerialLedSink, UdpSoundSink};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared by every playback session. Only immutable data and thread-safe sinks.
#[derive(Clone)]
pub struct AppState {
	pub config: Arc<Config>,
	pub timeline: Arc<Timeline<ScoreCue>>,
	pub sound: Option<Arc<dyn SoundCueSink>>,
	pub led: Option<Arc<dyn LedSink>>,
	pub shutdown: CancellationToken,
}

impl AppState {
	/// Load the scenario and attach whichever devices are reachable.
	///
	/// A missing scenario is fatal. Missing devices only disable their sink.
	pub fn build(config: Arc<Config>, shutdown: CancellationToken) -> anyhow::Result<Self> {
		let timeline = load_scenario(&config.scenario_file).with_context(|| format!("loading scenario {}", config.scenario_file.display()))?;
		info!(events = timeline.len(), last_offset = timeline.last_offset(), "⚾ Scenario loaded");

		let sound = config.speaker_addr.and_then(|addr| match UdpSoundSink::bind(addr) {
			Ok(sink) => Some(Arc::new(sink) as Arc<dyn SoundCueSink>),
			Err(e) => {
				warn!(%addr, error = %e, "Speaker socket unavailable, sound cues disabled");
				None
			}
		});

		let led = config.led_device.as_deref().and_then(|path| match SerialLedSink::open(path, config.led_settle()) {
			Ok(sink) => Some(Arc::new(sink) as Arc<dyn LedSink>),
			Err(e) => {
				warn!(path = %path.display(), error = %e, "⚠️ LED controller not connected, continuing without it");
				None
			}
		});

		Ok(Self::new(config, Arc::new(timeline), shutdown).with_sinks(sound, led))
	}

	pub fn new(config: Arc<Config>, timeline: Arc<Timeline<ScoreCue>>, shutdown: CancellationToken) -> Self {
		Self {
			config,
			timeline,
			sound: None,
			led: None,
			shutdown,
		}
	}

	#[must_use]
	pub fn with_sinks(mut self, sound: Option<Arc<dyn SoundCueSink>>, led: Option<Arc<dyn LedSink>>) -> Self {
		self.sound = sound;
		self.led = led;
		self
	}

	/// Sink set for one session, rendering to that session's display
	pub fn sinks(&self, display: impl DisplaySink + 'static) -> CueSinks {
		CueSinks::new(Arc::new(display))
			.with_optional_sound(self.sound.clone())
			.with_optional_led(self.led.clone())
	}
}

async fn health() -> (StatusCode, &'static str) {
	(StatusCode::OK, "ok")
}

pub fn router(state: AppState) -> Router {
	let cors = CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]).allow_headers(Any);
	let static_dir = state.config.static_dir.clone();

	let mut app = Router::new()
		.route("/health", get(health))
		.layer(cors)
		.merge(ws::router())
		.with_state(state);

	if let Some(dir) = static_dir {
		info!(dir = %dir.display(), "Serving playback page");
		app = app.fallback_service(ServeDir::new(dir));
	}

	app.layer(TraceLayer::new_for_http())
}
