use crate::error::ConfigError;
use crate::event::Seconds;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Pull scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
	/// Length of one pass over the cue sheet
	pub cycle_duration: Seconds,
	pub tick_interval_ms: u64,
	pub fade_out_ms: u64,
	/// Directory clip names are resolved against
	pub clip_dir: PathBuf,
}

impl SchedulerConfig {
	pub fn new(cycle_duration: Seconds) -> Self {
		Self {
			cycle_duration,
			..Self::default()
		}
	}

	pub fn with_tick_interval(mut self, ms: u64) -> Self {
		self.tick_interval_ms = ms;
		self
	}

	pub fn with_fade_out(mut self, ms: u64) -> Self {
		self.fade_out_ms = ms;
		self
	}

	pub fn with_clip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.clip_dir = dir.into();
		self
	}

	pub const fn tick_interval(&self) -> Duration {
		Duration::from_millis(self.tick_interval_ms)
	}

	pub const fn fade_out(&self) -> Duration {
		Duration::from_millis(self.fade_out_ms)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.cycle_duration.is_finite() || self.cycle_duration <= 0.0 {
			return Err(ConfigError::CycleDuration(self.cycle_duration));
		}
		if self.tick_interval_ms == 0 {
			return Err(ConfigError::TickInterval);
		}
		Ok(())
	}
}

impl Default for SchedulerConfig {
	fn default() -> Self {
		Self {
			cycle_duration: 3382.91,
			tick_interval_ms: 50,
			fade_out_ms: 500,
			clip_dir: PathBuf::from("mp3"),
		}
	}
}
