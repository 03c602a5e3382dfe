use clap::{ArgAction, Parser};
use cue_timeline::SchedulerConfig;
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Plays a looping cue sheet of audio clips", long_about = None)]
pub struct Config {
	/// Use JSON formatting for tracing
	#[arg(long, env = "LOG_JSON", default_value = "false")]
	pub log_json: bool,

	/// Log filter directives
	#[arg(long, env = "RUST_LOG", default_value = "info")]
	pub rust_log: String,

	/// Cue sheet (`offset|clip|option` per line)
	#[arg(long, env = "CUE_SHEET", default_value = "rasptimeline.txt")]
	pub cue_sheet: PathBuf,

	/// Directory holding the `.mp3` clips
	#[arg(long, env = "CLIP_DIR", default_value = "mp3")]
	pub clip_dir: PathBuf,

	/// Length of the video the sheet follows, in seconds
	#[arg(long, env = "CYCLE_SECS", default_value = "3382.91")]
	pub cycle_secs: f64,

	#[arg(long, env = "TICK_MS", default_value = "50")]
	pub tick_ms: u64,

	#[arg(long, env = "FADE_MS", default_value = "500")]
	pub fade_ms: u64,

	/// Play the C-D-E chime before the first cycle
	#[arg(long, env = "STARTUP_CHIME", default_value_t = true, action = ArgAction::Set)]
	pub startup_chime: bool,
}

impl Config {
	pub fn scheduler_config(&self) -> SchedulerConfig {
		SchedulerConfig::new(self.cycle_secs)
			.with_tick_interval(self.tick_ms)
			.with_fade_out(self.fade_ms)
			.with_clip_dir(self.clip_dir.clone())
	}
}
