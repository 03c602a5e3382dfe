use cue_timeline::{AudioEngine, SinkError, SinkResult};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const FADE_STEPS: u16 = 20;

/// `AudioEngine` over the default rodio output device.
///
/// Holds the output stream, so it must stay on the thread that opened it.
pub struct RodioEngine {
	_stream: OutputStream,
	handle: OutputStreamHandle,
	current: Option<Sink>,
}

impl RodioEngine {
	pub fn try_default() -> Result<Self, SinkError> {
		let (stream, handle) = OutputStream::try_default().map_err(|e| SinkError::Playback(e.to_string()))?;
		Ok(Self {
			_stream: stream,
			handle,
			current: None,
		})
	}

	pub const fn handle(&self) -> &OutputStreamHandle {
		&self.handle
	}
}

impl AudioEngine for RodioEngine {
	fn play(&mut self, clip: &Path, loops: u32) -> SinkResult {
		if !self.clip_exists(clip) {
			return Err(SinkError::MissingClip(clip.to_path_buf()));
		}

		let file = File::open(clip).map_err(|source| SinkError::Io { sink: "audio", source })?;
		let source = Decoder::new(BufReader::new(file)).map_err(|e| SinkError::Playback(e.to_string()))?.buffered();
		let sink = Sink::try_new(&self.handle).map_err(|e| SinkError::Playback(e.to_string()))?;

		for _ in 0..=loops {
			sink.append(source.clone());
		}

		if let Some(previous) = self.current.replace(sink) {
			previous.stop();
		}
		Ok(())
	}

	fn stop(&mut self) -> SinkResult {
		if let Some(sink) = self.current.take() {
			sink.stop();
			debug!("Playback stopped");
		}
		Ok(())
	}

	fn fade_out(&mut self, fade: Duration) -> SinkResult {
		let Some(sink) = self.current.take() else {
			return Ok(());
		};

		let step = fade / u32::from(FADE_STEPS);
		let start = sink.volume();
		thread::Builder::new()
			.name("fade-out".to_string())
			.spawn(move || {
				for level in fade_levels(start, FADE_STEPS) {
					sink.set_volume(level);
					thread::sleep(step);
				}
				sink.stop();
			})
			.map_err(|source| SinkError::Io { sink: "audio", source })?;
		Ok(())
	}

	fn is_busy(&self) -> bool {
		self.current.as_ref().is_some_and(|sink| !sink.empty())
	}
}

impl Drop for RodioEngine {
	fn drop(&mut self) {
		if self.stop().is_err() {
			warn!("Failed to stop playback on drop");
		}
	}
}

/// Linear ramp from just below `start` down to silence
fn fade_levels(start: f32, steps: u16) -> impl Iterator<Item = f32> {
	(0..steps).rev().map(move |remaining| start * f32::from(remaining) / f32::from(steps))
}
