//! Timeline sources: the JSON scoreboard scenario and the text cue sheet.
//!
//! Malformed entries are dropped with a warning. Only document-level problems
//! (unreadable file, bad JSON, nothing usable) are errors.

mod cue_sheet;
mod scenario;

pub use cue_sheet::{load_cue_sheet, parse_cue_line, parse_cue_sheet, COMMENT_MARKER, FIELD_DELIMITER};
pub use scenario::{load_scenario, parse_scenario, parse_scenario_entry};

use crate::error::{Result, TimelineError};
use std::path::Path;

fn read_source(path: &Path) -> Result<String> {
	std::fs::read_to_string(path).map_err(|source| TimelineError::Read {
		path: path.to_path_buf(),
		source,
	})
}
