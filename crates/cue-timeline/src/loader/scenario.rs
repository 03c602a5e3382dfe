use super::read_source;
use crate::error::{EntryError, Result, TimelineError};
use crate::event::{ScoreCue, Seconds, TimedEvent};
use crate::led::LedCode;
use crate::timeline::Timeline;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, warn};

/// Parse a scenario document: a JSON array of `{time, text, sound?, led?, ...}`
pub fn parse_scenario(source: &str) -> Result<Timeline<ScoreCue>> {
	let entries: Vec<Value> = serde_json::from_str(source)?;
	let total = entries.len();

	let events: Vec<_> = entries
		.into_iter()
		.enumerate()
		.filter_map(|(index, entry)| match parse_scenario_entry(entry) {
			Ok(event) => Some(event),
			Err(e) => {
				warn!(index, error = %e, "Discarding scenario entry");
				None
			}
		})
		.collect();

	let timeline = Timeline::build(events);
	if timeline.is_empty() {
		return Err(TimelineError::Empty);
	}

	info!(loaded = timeline.len(), discarded = total - timeline.len(), "Scenario parsed");
	Ok(timeline)
}

pub fn load_scenario(path: &Path) -> Result<Timeline<ScoreCue>> {
	parse_scenario(&read_source(path)?)
}

/// Convert one scenario entry. Unrecognized fields are kept for the renderer.
pub fn parse_scenario_entry(entry: Value) -> std::result::Result<TimedEvent<ScoreCue>, EntryError> {
	let Value::Object(mut fields) = entry else {
		return Err(EntryError::NotAnObject);
	};

	let offset = parse_offset(fields.remove("time").ok_or(EntryError::MissingOffset)?)?;
	let text = take_string(&mut fields, "text")?.unwrap_or_default();
	let sound = take_string(&mut fields, "sound")?.filter(|s| !s.trim().is_empty());
	let led = take_string(&mut fields, "led")?.map(|name| {
		name.parse::<LedCode>().unwrap_or_else(|e| {
			warn!(error = %e, "Unknown LED code, sending reset");
			LedCode::Reset
		})
	});

	Ok(TimedEvent::new(
		offset,
		ScoreCue {
			text,
			sound,
			led,
			extra: fields,
		},
	))
}

fn parse_offset(value: Value) -> std::result::Result<Seconds, EntryError> {
	let offset = match &value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	}
	.filter(|offset| offset.is_finite())
	.ok_or_else(|| EntryError::InvalidOffset(value.to_string()))?;

	if offset < 0.0 {
		return Err(EntryError::NegativeOffset(offset));
	}
	Ok(offset)
}

fn take_string(fields: &mut Map<String, Value>, key: &'static str) -> std::result::Result<Option<String>, EntryError> {
	match fields.remove(key) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(s)) => Ok(Some(s)),
		Some(_) => Err(EntryError::InvalidField(key)),
	}
}
