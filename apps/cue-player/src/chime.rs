use anyhow::{anyhow, Context, Result};
use rodio::source::{SineWave, Source, Zero};
use rodio::{OutputStreamHandle, Sink};
use std::time::Duration;
use tracing::info;

const CHIME_NOTES: [&str; 3] = ["C4", "D4", "E4"];
const NOTE_LENGTH: Duration = Duration::from_millis(500);
const NOTE_SPACING: Duration = Duration::from_millis(600);
const SAMPLE_RATE: u32 = 44_100;
const AMPLITUDE: f32 = 0.3;

/// Convert a musical note (e.g. "A4", "C#5") to its frequency in Hz
pub fn note_to_frequency(note: &str) -> Result<f32> {
	let note = note.trim().to_uppercase();
	let split = match note.char_indices().last() {
		Some((split, _)) if split > 0 => split,
		_ => return Err(anyhow!("Note too short: {note:?}")),
	};

	let (name, octave) = note.split_at(split);
	let octave: i32 = octave.parse().context("Invalid octave")?;

	let semitones = match name {
		"C" => -9,
		"C#" | "DB" => -8,
		"D" => -7,
		"D#" | "EB" => -6,
		"E" => -5,
		"F" => -4,
		"F#" | "GB" => -3,
		"G" => -2,
		"G#" | "AB" => -1,
		"A" => 0,
		"A#" | "BB" => 1,
		"B" => 2,
		_ => return Err(anyhow!("Unsupported note: {name}")),
	} + (octave - 4) * 12;

	// A4 = 440 Hz, twelve-tone equal temperament
	Ok(440.0 * 2.0_f32.powf(semitones as f32 / 12.0))
}

/// Play the rising start-up chime and block until it has finished
pub fn play_startup_chime(handle: &OutputStreamHandle) -> Result<()> {
	let sink = Sink::try_new(handle).context("Failed to open chime sink")?;
	let gap = NOTE_SPACING.saturating_sub(NOTE_LENGTH);

	for note in CHIME_NOTES {
		let frequency = note_to_frequency(note)?;
		sink.append(SineWave::new(frequency).take_duration(NOTE_LENGTH).amplify(AMPLITUDE));
		sink.append(Zero::<f32>::new(1, SAMPLE_RATE).take_duration(gap));
	}

	info!("🔔 Start-up chime");
	sink.sleep_until_end();
	Ok(())
}
