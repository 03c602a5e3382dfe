use crate::sink::SinkResult;
use std::path::Path;
use std::time::Duration;

/// Local playback device driven by the pull scheduler.
///
/// Every call must return promptly: the scheduler issues these from inside
/// its tick loop.
pub trait AudioEngine {
	fn clip_exists(&self, clip: &Path) -> bool {
		clip.is_file()
	}

	/// Start `clip`, replacing whatever is playing. `loops` counts extra plays.
	fn play(&mut self, clip: &Path, loops: u32) -> SinkResult;

	fn stop(&mut self) -> SinkResult;

	/// Ramp the current clip down to silence over `fade`, then stop it
	fn fade_out(&mut self, fade: Duration) -> SinkResult;

	fn is_busy(&self) -> bool;
}
