use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimelineError>;

/// Load-time failures. These abort start-up.
#[derive(Error, Debug)]
pub enum TimelineError {
	#[error("Failed to read timeline {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Malformed scenario document: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Timeline has no valid events")]
	Empty,
}

/// Why a single scenario entry was discarded
#[derive(Error, Debug, PartialEq)]
pub enum EntryError {
	#[error("entry is not an object")]
	NotAnObject,

	#[error("missing `time` field")]
	MissingOffset,

	#[error("unparseable offset: {0}")]
	InvalidOffset(String),

	#[error("negative offset: {0}")]
	NegativeOffset(f64),

	#[error("field `{0}` must be a string")]
	InvalidField(&'static str),
}

/// Why a single cue-sheet line was discarded
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LineError {
	#[error("expected at least 2 fields, found {0}")]
	TooFewFields(usize),

	#[error("unparseable offset: {0:?}")]
	InvalidOffset(String),

	#[error("empty clip name")]
	EmptyClip,
}

#[derive(Error, Debug)]
#[error("unknown LED code: {0}")]
pub struct UnknownLedCode(pub String);

/// Best-effort side-effect failures. Logged, never propagated into dispatch state.
#[derive(Error, Debug)]
pub enum SinkError {
	#[error("{sink} unavailable: {source}")]
	Io {
		sink: &'static str,
		#[source]
		source: std::io::Error,
	},

	#[error("{0} disconnected")]
	Disconnected(&'static str),

	#[error("{0} queue full, dropping")]
	QueueFull(&'static str),

	#[error("Clip not found: {}", .0.display())]
	MissingClip(PathBuf),

	#[error("Playback error: {0}")]
	Playback(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum DispatchError {
	#[error("No timeline loaded")]
	Idle,

	#[error("Invalid report time: {0}")]
	InvalidTime(f64),
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
	#[error("cycle duration must be positive and finite, got {0}")]
	CycleDuration(f64),

	#[error("tick interval must be non-zero")]
	TickInterval,
}

#[derive(Error, Debug)]
pub enum SchedulerError {
	#[error("Invalid scheduler config: {0}")]
	InvalidConfig(#[from] ConfigError),

	#[error("Audio engine error: {0}")]
	Engine(#[from] SinkError),
}
