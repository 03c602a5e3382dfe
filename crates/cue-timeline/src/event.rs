use crate::led::LedCode;
use serde::{Deserialize, Serialize};

/// Seconds from the timeline origin
pub type Seconds = f64;

/// A payload scheduled at a fixed offset on a timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent<P> {
	pub offset: Seconds,
	pub payload: P,
}

impl<P> TimedEvent<P> {
	pub const fn new(offset: Seconds, payload: P) -> Self {
		Self { offset, payload }
	}
}

/// Scoreboard cue fired by the push dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCue {
	pub text: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sound: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub led: Option<LedCode>,
	/// Renderer-only fields, forwarded untouched
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ScoreCue {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			sound: None,
			led: None,
			extra: serde_json::Map::new(),
		}
	}

	pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
		self.sound = Some(sound.into());
		self
	}

	pub fn with_led(mut self, led: LedCode) -> Self {
		self.led = Some(led);
		self
	}
}

/// Clip command fired by the pull scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipCue {
	pub action: ClipAction,
	/// Cue-sheet line this cue came from
	pub source_line: String,
}

impl ClipCue {
	pub fn play(clip: impl Into<String>, loops: u32, limit: Option<Seconds>) -> Self {
		let play = ClipPlay {
			clip: clip.into(),
			loops,
			limit,
		};
		let source_line = play.clip.clone();
		Self {
			action: ClipAction::Play(play),
			source_line,
		}
	}

	pub fn stop() -> Self {
		Self {
			action: ClipAction::Stop,
			source_line: "STOP".to_string(),
		}
	}

	pub fn with_source_line(mut self, line: impl Into<String>) -> Self {
		self.source_line = line.into();
		self
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClipAction {
	Play(ClipPlay),
	Stop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipPlay {
	/// Clip file name, relative to the clip directory
	pub clip: String,
	/// Extra repetitions after the first play
	pub loops: u32,
	/// Fade the clip out this many seconds after it starts
	pub limit: Option<Seconds>,
}
