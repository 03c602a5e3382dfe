use crate::ws::{DisplayUpdate, ServerMessage};
use cue_timeline::{DisplaySink, LedCode, LedSink, ScoreCue, SinkError, SinkResult, SoundCueSink, TimedEvent};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::net::{SocketAddr, UdpSocket};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Sends sound-cue identifiers to the remote speaker as UDP datagrams
#[derive(Debug)]
pub struct UdpSoundSink {
	socket: UdpSocket,
	target: SocketAddr,
}

impl UdpSoundSink {
	pub fn bind(target: SocketAddr) -> std::io::Result<Self> {
		let local: SocketAddr = if target.is_ipv4() { ([0, 0, 0, 0], 0).into() } else { ([0u16; 8], 0).into() };
		let socket = UdpSocket::bind(local)?;
		socket.set_nonblocking(true)?;
		info!(%target, "🔊 Speaker sink ready");
		Ok(Self { socket, target })
	}

	pub const fn target(&self) -> SocketAddr {
		self.target
	}
}

impl SoundCueSink for UdpSoundSink {
	fn send_cue(&self, cue: &str) -> SinkResult {
		let sent = self
			.socket
			.send_to(cue.as_bytes(), self.target)
			.map_err(|source| SinkError::Io { sink: "speaker", source })?;
		debug!(cue, bytes = sent, target = %self.target, "Sound cue sent");
		Ok(())
	}
}

/// Commands waiting for the LED writer thread
pub const LED_QUEUE: usize = 16;

/// Writes one command byte per cue to the LED controller's device node.
///
/// Writes happen on a dedicated thread, so a stalled tty never blocks
/// dispatch. The line settings (9600 8N1) are expected to be configured on
/// the device beforehand, e.g. with `stty`.
#[derive(Debug)]
pub struct SerialLedSink {
	tx: Option<SyncSender<LedCode>>,
	writer: Option<JoinHandle<()>>,
	path: PathBuf,
}

impl SerialLedSink {
	/// Open the device and start its writer.
	///
	/// Commands queued during `settle` are held back until the controller
	/// has finished the reset it does when the port opens.
	pub fn open(path: &Path, settle: Duration) -> std::io::Result<Self> {
		let device = OpenOptions::new().write(true).open(path)?;
		let (tx, rx) = sync_channel(LED_QUEUE);
		let writer = thread::Builder::new().name("led-writer".to_string()).spawn(move || write_codes(device, &rx, settle))?;

		info!(path = %path.display(), settle = ?settle, "💡 LED controller attached");
		Ok(Self {
			tx: Some(tx),
			writer: Some(writer),
			path: path.to_path_buf(),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

fn write_codes(mut device: File, rx: &Receiver<LedCode>, settle: Duration) {
	thread::sleep(settle);
	for code in rx {
		match device.write_all(&[code.command_byte()]).and_then(|()| device.flush()) {
			Ok(()) => debug!(%code, "LED code written"),
			Err(e) => warn!(%code, error = %e, "LED write failed"),
		}
	}
}

impl LedSink for SerialLedSink {
	fn write_code(&self, code: LedCode) -> SinkResult {
		let tx = self.tx.as_ref().ok_or(SinkError::Disconnected("led"))?;
		tx.try_send(code).map_err(|e| match e {
			TrySendError::Full(_) => SinkError::QueueFull("led"),
			TrySendError::Disconnected(_) => SinkError::Disconnected("led"),
		})
	}
}

impl Drop for SerialLedSink {
	fn drop(&mut self) {
		drop(self.tx.take());
		if let Some(writer) = self.writer.take() {
			if writer.join().is_err() {
				warn!("LED writer panicked");
			}
		}
	}
}

/// Forwards fired cues to one websocket connection's writer task
#[derive(Debug, Clone)]
pub struct ChannelDisplaySink {
	tx: mpsc::Sender<ServerMessage>,
}

impl ChannelDisplaySink {
	pub const fn new(tx: mpsc::Sender<ServerMessage>) -> Self {
		Self { tx }
	}
}

impl DisplaySink for ChannelDisplaySink {
	fn show(&self, event: &TimedEvent<ScoreCue>) -> SinkResult {
		let update = DisplayUpdate {
			time: event.offset,
			cue: event.payload.clone(),
		};
		self.tx.try_send(ServerMessage::UpdateUi(update)).map_err(|e| match e {
			mpsc::error::TrySendError::Full(_) => SinkError::QueueFull("display"),
			mpsc::error::TrySendError::Closed(_) => SinkError::Disconnected("display"),
		})
	}
}
