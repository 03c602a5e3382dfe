use crate::error::UnknownLedCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patterns understood by the scoreboard LED controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedCode {
	#[serde(alias = "STRIKE_RED")]
	Strike,
	#[serde(alias = "BALL_YELLOW")]
	Ball,
	#[serde(alias = "HIT_GREEN")]
	Hit,
	#[serde(alias = "HOME_RUN")]
	Homerun,
	Reset,
}

impl LedCode {
	pub const ALL: [Self; 5] = [Self::Strike, Self::Ball, Self::Hit, Self::Homerun, Self::Reset];

	/// Byte written to the serial line for this pattern
	pub const fn command_byte(self) -> u8 {
		match self {
			Self::Strike => b'S',
			Self::Ball => b'B',
			Self::Hit => b'H',
			Self::Homerun => b'R',
			Self::Reset => b'0',
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Strike => "STRIKE",
			Self::Ball => "BALL",
			Self::Hit => "HIT",
			Self::Homerun => "HOMERUN",
			Self::Reset => "RESET",
		}
	}
}

impl fmt::Display for LedCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LedCode {
	type Err = UnknownLedCode;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"STRIKE" | "STRIKE_RED" => Ok(Self::Strike),
			"BALL" | "BALL_YELLOW" => Ok(Self::Ball),
			"HIT" | "HIT_GREEN" => Ok(Self::Hit),
			"HOMERUN" | "HOME_RUN" => Ok(Self::Homerun),
			"RESET" => Ok(Self::Reset),
			_ => Err(UnknownLedCode(s.to_string())),
		}
	}
}
