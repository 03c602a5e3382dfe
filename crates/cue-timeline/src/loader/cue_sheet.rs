use super::read_source;
use crate::error::{LineError, Result, TimelineError};
use crate::event::{ClipCue, Seconds, TimedEvent};
use crate::timeline::Timeline;
use std::path::Path;
use tracing::{info, warn};

pub const FIELD_DELIMITER: char = '|';
pub const COMMENT_MARKER: char = '#';

const CLIP_EXTENSION: &str = ".mp3";

/// Parse one cue-sheet line. Blank lines and comments yield `Ok(None)`.
///
/// `<offset>|<clip or STOP>[|xN or Ns]`
pub fn parse_cue_line(line: &str) -> std::result::Result<Option<TimedEvent<ClipCue>>, LineError> {
	let trimmed = line.trim();
	if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
		return Ok(None);
	}

	let fields: Vec<&str> = trimmed.split(FIELD_DELIMITER).map(str::trim).collect();
	if fields.len() < 2 {
		return Err(LineError::TooFewFields(fields.len()));
	}

	let offset = fields[0]
		.parse::<u32>()
		.map_err(|_| LineError::InvalidOffset(fields[0].to_string()))?;
	let offset = Seconds::from(offset);

	let name = fields[1];
	if name.eq_ignore_ascii_case("STOP") {
		return Ok(Some(TimedEvent::new(offset, ClipCue::stop().with_source_line(trimmed))));
	}
	if name.is_empty() {
		return Err(LineError::EmptyClip);
	}

	let (loops, limit) = fields.get(2).map_or((0, None), |option| parse_option(option));
	let cue = ClipCue::play(format!("{name}{CLIP_EXTENSION}"), loops, limit).with_source_line(trimmed);

	Ok(Some(TimedEvent::new(offset, cue)))
}

/// `xN` plays the clip N times; `Ns` fades it out after N seconds
fn parse_option(option: &str) -> (u32, Option<Seconds>) {
	let option = option.to_ascii_lowercase();

	if let Some(count) = option.strip_prefix('x') {
		let loops = count.parse::<u32>().map_or(0, |plays| plays.saturating_sub(1));
		return (loops, None);
	}
	if let Some(secs) = option.strip_suffix('s') {
		let limit = secs.parse::<u32>().ok().filter(|&n| n > 0).map(Seconds::from);
		return (0, limit);
	}
	(0, None)
}

/// Parse a whole cue sheet, dropping malformed lines
pub fn parse_cue_sheet(source: &str) -> Timeline<ClipCue> {
	let events: Vec<_> = source
		.lines()
		.enumerate()
		.filter_map(|(index, line)| match parse_cue_line(line) {
			Ok(event) => event,
			Err(e) => {
				warn!(line = index + 1, content = line, error = %e, "Discarding cue line");
				None
			}
		})
		.collect();

	Timeline::build(events)
}

pub fn load_cue_sheet(path: &Path) -> Result<Timeline<ClipCue>> {
	let timeline = parse_cue_sheet(&read_source(path)?);
	if timeline.is_empty() {
		return Err(TimelineError::Empty);
	}

	info!(path = %path.display(), events = timeline.len(), "Cue sheet loaded");
	Ok(timeline)
}
