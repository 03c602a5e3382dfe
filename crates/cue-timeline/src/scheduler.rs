use crate::audio::AudioEngine;
use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::event::{ClipAction, ClipCue, ClipPlay, Seconds, TimedEvent};
use crate::segment::ActiveSegment;
use crate::timeline::{Cursor, Timeline};
use std::sync::Arc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
	pub elapsed: Seconds,
	pub restarted: bool,
	pub faded: bool,
	pub fired: usize,
}

/// Plays clips from a cue sheet against a repeating local clock.
///
/// Owns the cursor, the active segment and the cycle clock exclusively.
/// `tick` takes the current instant from the caller. `run` drives it from a
/// tokio interval.
pub struct PullScheduler<A: AudioEngine> {
	timeline: Arc<Timeline<ClipCue>>,
	config: SchedulerConfig,
	engine: A,
	cursor: Cursor,
	segment: Option<ActiveSegment>,
	cycle_start: Option<Instant>,
	cycle: u64,
}

impl<A: AudioEngine> PullScheduler<A> {
	pub fn new(timeline: Arc<Timeline<ClipCue>>, config: SchedulerConfig, engine: A) -> Result<Self, SchedulerError> {
		config.validate()?;

		Ok(Self {
			timeline,
			config,
			engine,
			cursor: Cursor::new(),
			segment: None,
			cycle_start: None,
			cycle: 0,
		})
	}

	pub const fn cursor(&self) -> Cursor {
		self.cursor
	}

	pub const fn segment(&self) -> Option<&ActiveSegment> {
		self.segment.as_ref()
	}

	/// Number of completed cycle restarts
	pub const fn cycle(&self) -> u64 {
		self.cycle
	}

	pub const fn engine(&self) -> &A {
		&self.engine
	}

	pub const fn config(&self) -> &SchedulerConfig {
		&self.config
	}

	/// Begin the first cycle at `now`
	pub fn start(&mut self, now: Instant) {
		self.cursor.reset();
		self.segment = None;
		self.cycle_start = Some(now);
		info!(events = self.timeline.len(), cycle_secs = self.config.cycle_duration, "🎬 Cycle started");
	}

	/// Seconds since the current cycle began
	pub fn elapsed(&self, now: Instant) -> Seconds {
		self.cycle_start.map_or(0.0, |start| now.saturating_duration_since(start).as_secs_f64())
	}

	/// Run one scheduling step at `now`.
	///
	/// A cycle restart takes precedence over everything else in the tick:
	/// nothing fires in the tick that restarts.
	pub fn tick(&mut self, now: Instant) -> Result<TickReport, SchedulerError> {
		if self.cycle_start.is_none() {
			self.start(now);
		}

		let elapsed = self.elapsed(now);
		let mut report = TickReport {
			elapsed,
			restarted: false,
			faded: false,
			fired: 0,
		};

		if elapsed >= self.config.cycle_duration {
			report.restarted = true;
			self.restart(now)?;
			return Ok(report);
		}

		report.faded = self.enforce_limit(elapsed);

		let timeline = Arc::clone(&self.timeline);
		let fired = self.cursor.advance(&timeline, elapsed);
		for event in fired {
			self.apply(event, elapsed);
		}
		report.fired = fired.len();

		Ok(report)
	}

	/// Drive `tick` at the configured interval until `cancel` fires
	pub async fn run(mut self, cancel: CancellationToken) -> A {
		let mut ticker = interval(self.config.tick_interval());
		ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

		self.start(Instant::now());

		loop {
			tokio::select! {
				_ = ticker.tick() => {
					match self.tick(Instant::now()) {
						Ok(report) => trace!(?report, "tick"),
						Err(e) => error!(error = %e, "Tick failed, continuing"),
					}
				}
				() = cancel.cancelled() => {
					info!("Pull scheduler cancelled");
					break;
				}
			}
		}

		self.teardown();
		self.engine
	}

	fn restart(&mut self, now: Instant) -> Result<(), SchedulerError> {
		self.cursor.reset();
		self.segment = None;
		self.cycle_start = Some(now);
		self.cycle += 1;
		info!(cycle = self.cycle, "🎬 New cycle");

		self.engine.stop()?;
		Ok(())
	}

	fn enforce_limit(&mut self, elapsed: Seconds) -> bool {
		let Some(segment) = self.segment.as_mut() else {
			return false;
		};
		if !segment.is_expired(elapsed) {
			return false;
		}

		segment.clear_limit();
		if !self.engine.is_busy() {
			return false;
		}

		match self.engine.fade_out(self.config.fade_out()) {
			Ok(()) => {
				info!(elapsed = %format!("{elapsed:.1}"), clip = %segment.clip.display(), "Duration limit reached, fading out");
				true
			}
			Err(e) => {
				warn!(error = %e, "Fade-out failed");
				false
			}
		}
	}

	fn apply(&mut self, event: &TimedEvent<ClipCue>, elapsed: Seconds) {
		info!(elapsed = %format!("{elapsed:.1}"), line = %event.payload.source_line, "⏰ Cue fired");

		match &event.payload.action {
			ClipAction::Stop => {
				if let Err(e) = self.engine.stop() {
					warn!(error = %e, "Stop failed");
				}
				self.segment = None;
			}
			ClipAction::Play(play) => self.play(play, elapsed),
		}
	}

	fn play(&mut self, play: &ClipPlay, elapsed: Seconds) {
		let path = self.config.clip_dir.join(&play.clip);

		if !self.engine.clip_exists(&path) {
			warn!(clip = %path.display(), "Clip not found, skipping");
			return;
		}

		match self.engine.play(&path, play.loops) {
			Ok(()) => {
				debug!(clip = %path.display(), loops = play.loops, limit = ?play.limit, "Clip started");
				self.segment = Some(ActiveSegment::begin(path, play.loops, elapsed, play.limit));
			}
			Err(e) => error!(clip = %path.display(), error = %e, "Playback failed"),
		}
	}

	fn teardown(&mut self) {
		if let Err(e) = self.engine.stop() {
			warn!(error = %e, "Stop on shutdown failed");
		}
		self.segment = None;
		self.cursor.reset();
		self.cycle_start = None;
	}
}
