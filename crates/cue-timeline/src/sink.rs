use crate::error::SinkError;
use crate::event::{ScoreCue, TimedEvent};
use crate::led::LedCode;
use std::sync::Arc;
use tracing::{debug, warn};

pub type SinkResult = std::result::Result<(), SinkError>;

/// Receives every fired scoreboard cue for rendering
pub trait DisplaySink: Send + Sync {
	fn show(&self, event: &TimedEvent<ScoreCue>) -> SinkResult;
}

/// Remote speaker taking a sound-cue identifier
pub trait SoundCueSink: Send + Sync {
	fn send_cue(&self, cue: &str) -> SinkResult;
}

/// LED controller taking a single pattern code
pub trait LedSink: Send + Sync {
	fn write_code(&self, code: LedCode) -> SinkResult;
}

/// The set of side-effect targets a push session dispatches to.
///
/// Dispatch is best-effort: each sink is tried independently and a failure
/// is logged, counted and otherwise ignored.
#[derive(Clone)]
pub struct CueSinks {
	display: Arc<dyn DisplaySink>,
	sound: Option<Arc<dyn SoundCueSink>>,
	led: Option<Arc<dyn LedSink>>,
}

impl CueSinks {
	pub fn new(display: Arc<dyn DisplaySink>) -> Self {
		Self { display, sound: None, led: None }
	}

	pub fn with_sound(mut self, sound: Arc<dyn SoundCueSink>) -> Self {
		self.sound = Some(sound);
		self
	}

	pub fn with_led(mut self, led: Arc<dyn LedSink>) -> Self {
		self.led = Some(led);
		self
	}

	pub fn with_optional_sound(mut self, sound: Option<Arc<dyn SoundCueSink>>) -> Self {
		self.sound = sound;
		self
	}

	pub fn with_optional_led(mut self, led: Option<Arc<dyn LedSink>>) -> Self {
		self.led = led;
		self
	}

	/// Dispatch one fired cue. Returns the number of sinks that failed.
	pub fn dispatch(&self, event: &TimedEvent<ScoreCue>) -> usize {
		let cue = &event.payload;
		let mut failures = 0;

		if let Err(e) = self.display.show(event) {
			warn!(offset = event.offset, error = %e, "Display update failed");
			failures += 1;
		}

		if let Some(sound) = cue.sound.as_deref() {
			match &self.sound {
				Some(sink) => {
					if let Err(e) = sink.send_cue(sound) {
						warn!(offset = event.offset, sound, error = %e, "Sound cue send failed");
						failures += 1;
					}
				}
				None => debug!(sound, "No speaker configured, skipping sound cue"),
			}
		}

		if let Some(code) = cue.led {
			match &self.led {
				Some(sink) => {
					if let Err(e) = sink.write_code(code) {
						warn!(offset = event.offset, %code, error = %e, "LED write failed");
						failures += 1;
					}
				}
				None => debug!(%code, "No LED device attached, skipping"),
			}
		}

		failures
	}
}
