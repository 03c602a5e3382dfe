use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[command(author, version, about = "Relays playback-time reports into scoreboard cues", long_about = None)]
pub struct Config {
	/// Use JSON formatting for tracing
	#[arg(long, env = "LOG_JSON", default_value = "false")]
	pub log_json: bool,

	/// Log filter directives
	#[arg(long, env = "RUST_LOG", default_value = "info")]
	pub rust_log: String,

	/// Server host
	#[arg(long, env = "HOST", default_value = "127.0.0.1")]
	pub host: String,

	/// Server port
	#[arg(long, env = "PORT", default_value = "5000")]
	pub port: u16,

	/// Scenario document (JSON array of timed cues)
	#[arg(long, env = "SCENARIO_FILE", default_value = "scenario.json")]
	pub scenario_file: PathBuf,

	/// Remote speaker taking UDP sound cues, e.g. 192.168.0.20:12345
	#[arg(long, env = "SPEAKER_ADDR")]
	pub speaker_addr: Option<SocketAddr>,

	/// Serial device node of the LED controller
	#[arg(long, env = "LED_DEVICE")]
	pub led_device: Option<PathBuf>,

	/// Wait after opening the LED device before writing, in milliseconds.
	/// The controller resets when its port opens.
	#[arg(long, env = "LED_SETTLE_MS", default_value = "2000")]
	pub led_settle_ms: u64,

	/// Directory with the playback page
	#[arg(long, env = "STATIC_DIR")]
	pub static_dir: Option<PathBuf>,
}

impl Config {
	pub fn bind_addr(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}

	pub const fn led_settle(&self) -> Duration {
		Duration::from_millis(self.led_settle_ms)
	}
}
