use crate::event::Seconds;
use std::path::PathBuf;

/// The clip the pull scheduler is currently playing
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSegment {
	pub clip: PathBuf,
	/// Extra plays requested when the clip started. Not reset by a fade-out.
	pub loops: u32,
	pub started_at: Seconds,
	/// Cycle-elapsed time at which the clip is faded out
	pub expiry: Option<Seconds>,
}

impl ActiveSegment {
	pub fn begin(clip: PathBuf, loops: u32, started_at: Seconds, limit: Option<Seconds>) -> Self {
		Self {
			clip,
			loops,
			started_at,
			expiry: limit.map(|limit| started_at + limit),
		}
	}

	pub fn is_expired(&self, elapsed: Seconds) -> bool {
		self.expiry.is_some_and(|expiry| elapsed >= expiry)
	}

	pub fn clear_limit(&mut self) {
		self.expiry = None;
	}
}
