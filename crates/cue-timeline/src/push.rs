use crate::error::DispatchError;
use crate::event::{ScoreCue, Seconds, TimedEvent};
use crate::sink::CueSinks;
use crate::timeline::{Cursor, Timeline};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushState {
	/// No timeline loaded
	Idle,
	/// Cursor is valid for the loaded timeline
	Synced,
}

/// Fires scoreboard cues from externally reported playback times.
///
/// One dispatcher per session. It is not shared: callers serialize
/// `report`/`seek` by owning it (or by wrapping it in a mutex).
pub struct PushDispatcher {
	timeline: Option<Arc<Timeline<ScoreCue>>>,
	cursor: Cursor,
	sinks: CueSinks,
}

impl PushDispatcher {
	pub const fn new(sinks: CueSinks) -> Self {
		Self {
			timeline: None,
			cursor: Cursor::new(),
			sinks,
		}
	}

	pub fn with_timeline(timeline: Arc<Timeline<ScoreCue>>, sinks: CueSinks) -> Self {
		let mut dispatcher = Self::new(sinks);
		dispatcher.load(timeline);
		dispatcher
	}

	/// Load (or replace) the timeline and rewind to its start
	pub fn load(&mut self, timeline: Arc<Timeline<ScoreCue>>) {
		info!(events = timeline.len(), "Timeline loaded");
		self.timeline = Some(timeline);
		self.cursor.reset();
	}

	pub const fn state(&self) -> PushState {
		if self.timeline.is_some() {
			PushState::Synced
		} else {
			PushState::Idle
		}
	}

	pub const fn cursor(&self) -> Cursor {
		self.cursor
	}

	/// Fire every cue due at `time` and dispatch it to the sinks.
	///
	/// Returns the fired cues in order. Sink failures are logged by the sinks
	/// and never change which cues count as fired.
	pub fn report(&mut self, time: Seconds) -> Result<Vec<TimedEvent<ScoreCue>>, DispatchError> {
		let timeline = self.synced_timeline(time)?;
		let fired = self.cursor.advance(&timeline, time);

		for event in fired {
			info!(offset = event.offset, text = %event.payload.text, "Cue fired");
			self.sinks.dispatch(event);
		}

		Ok(fired.to_vec())
	}

	/// Re-synchronize to `time` without dispatching anything.
	/// Returns the new cursor position.
	pub fn seek(&mut self, time: Seconds) -> Result<usize, DispatchError> {
		let timeline = self.synced_timeline(time)?;
		let position = self.cursor.seek(&timeline, time);
		debug!(time, next_event = position, "Seeked");
		Ok(position)
	}

	fn synced_timeline(&self, time: Seconds) -> Result<Arc<Timeline<ScoreCue>>, DispatchError> {
		if !time.is_finite() {
			return Err(DispatchError::InvalidTime(time));
		}
		self.timeline.clone().ok_or(DispatchError::Idle)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::led::LedCode;
	use crate::sink::testing::RecordingSink;

	fn scenario() -> Arc<Timeline<ScoreCue>> {
		Arc::new(Timeline::build(vec![
			TimedEvent::new(0.0, ScoreCue::new("A")),
			TimedEvent::new(5.0, ScoreCue::new("B").with_sound("ball.mp3")),
			TimedEvent::new(12.0, ScoreCue::new("C").with_led(LedCode::Homerun)),
		]))
	}

	fn texts(events: &[TimedEvent<ScoreCue>]) -> Vec<String> {
		events.iter().map(|e| e.payload.text.clone()).collect()
	}

	fn dispatcher() -> (PushDispatcher, Arc<RecordingSink>) {
		let recorder = Arc::new(RecordingSink::default());
		let sinks = CueSinks::new(recorder.clone()).with_sound(recorder.clone()).with_led(recorder.clone());
		(PushDispatcher::with_timeline(scenario(), sinks), recorder)
	}

	#[test]
	fn idle_until_loaded() {
		let recorder = Arc::new(RecordingSink::default());
		let mut dispatcher = PushDispatcher::new(CueSinks::new(recorder));

		assert_eq!(dispatcher.state(), PushState::Idle);
		assert_eq!(dispatcher.report(1.0).unwrap_err(), DispatchError::Idle);
		assert_eq!(dispatcher.seek(1.0).unwrap_err(), DispatchError::Idle);

		dispatcher.load(scenario());
		assert_eq!(dispatcher.state(), PushState::Synced);
		assert_eq!(texts(&dispatcher.report(1.0).unwrap()), vec!["A"]);
	}

	#[test]
	fn reports_fire_scenario_in_order() {
		let (mut dispatcher, recorder) = dispatcher();

		assert_eq!(texts(&dispatcher.report(0.0).unwrap()), vec!["A"]);
		assert!(dispatcher.report(3.0).unwrap().is_empty());
		assert_eq!(texts(&dispatcher.report(6.0).unwrap()), vec!["B"]);
		assert_eq!(texts(&dispatcher.report(12.0).unwrap()), vec!["C"]);
		assert!(dispatcher.report(20.0).unwrap().is_empty());

		assert_eq!(*recorder.shown.lock().unwrap(), vec!["A", "B", "C"]);
		assert_eq!(*recorder.sounds.lock().unwrap(), vec!["ball.mp3"]);
		assert_eq!(*recorder.leds.lock().unwrap(), vec![LedCode::Homerun]);
	}

	#[test]
	fn seek_is_silent() {
		let (mut dispatcher, recorder) = dispatcher();

		assert_eq!(dispatcher.seek(6.0).unwrap(), 2);
		assert!(dispatcher.report(6.0).unwrap().is_empty());
		assert!(recorder.shown.lock().unwrap().is_empty());

		assert_eq!(texts(&dispatcher.report(13.0).unwrap()), vec!["C"]);
	}

	#[test]
	fn invalid_time_leaves_cursor_alone() {
		let (mut dispatcher, _) = dispatcher();
		dispatcher.report(5.0).unwrap();

		assert!(matches!(dispatcher.report(f64::NAN), Err(DispatchError::InvalidTime(_))));
		assert!(matches!(dispatcher.seek(f64::INFINITY), Err(DispatchError::InvalidTime(_))));
		assert_eq!(dispatcher.cursor().position(), 2);
	}

	#[test]
	fn sink_failures_still_count_as_fired() {
		let broken = Arc::new(RecordingSink::failing());
		let sinks = CueSinks::new(broken.clone()).with_sound(broken.clone()).with_led(broken.clone());
		let mut dispatcher = PushDispatcher::with_timeline(scenario(), sinks);

		assert_eq!(dispatcher.report(100.0).unwrap().len(), 3);
		assert_eq!(dispatcher.cursor().position(), 3);
		assert!(dispatcher.report(100.0).unwrap().is_empty());
		assert_eq!(broken.shown.lock().unwrap().len(), 3);
	}

	#[test]
	fn reload_rewinds() {
		let (mut dispatcher, _) = dispatcher();
		dispatcher.report(100.0).unwrap();
		dispatcher.load(scenario());
		assert_eq!(dispatcher.cursor().position(), 0);
	}
}
