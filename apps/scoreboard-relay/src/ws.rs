use crate::sinks::ChannelDisplaySink;
use crate::AppState;
use axum::{
	extract::{
		ws::{Message, WebSocket, WebSocketUpgrade},
		State,
	},
	response::IntoResponse,
	routing::get,
	Router,
};
use cue_timeline::{DispatchError, PushDispatcher, ScoreCue, Seconds};
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Outgoing messages buffered per session
pub const SESSION_QUEUE: usize = 100;

/// Messages sent by the playback page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
	/// Periodic playback position
	TimeUpdate { time: Seconds },
	/// The viewer jumped to a new position
	SeekEvent { time: Seconds },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
	UpdateUi(DisplayUpdate),
	Error { message: String },
}

/// A fired cue as the page renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayUpdate {
	pub time: Seconds,
	#[serde(flatten)]
	pub cue: ScoreCue,
}

pub fn router() -> Router<AppState> {
	Router::new().route("/ws", get(websocket_handler))
}

async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
	ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Apply one client message to this session's dispatcher.
/// Returns how many cues fired (always 0 for a seek).
pub fn apply_message(dispatcher: &mut PushDispatcher, message: ClientMessage) -> Result<usize, DispatchError> {
	match message {
		ClientMessage::TimeUpdate { time } => dispatcher.report(time).map(|fired| fired.len()),
		ClientMessage::SeekEvent { time } => {
			let next = dispatcher.seek(time)?;
			info!(time = %format!("{time:.2}"), next_event = next, "⏩ Playback seeked");
			Ok(0)
		}
	}
}

async fn handle_socket(socket: WebSocket, state: AppState) {
	let (sender, receiver) = socket.split();
	run_session(sender, receiver, state).await;
}

/// Drive one playback session until the client leaves or the relay shuts down.
///
/// One connection is one dispatch session with its own cursor. Outgoing
/// messages go through a bounded queue; when the client stops reading, new
/// messages are dropped instead of queued.
pub async fn run_session<S, R, E>(mut sender: S, mut receiver: R, state: AppState)
where
	S: Sink<Message> + Unpin + Send + 'static,
	S::Error: Display,
	R: Stream<Item = Result<Message, E>> + Unpin,
	E: Display,
{
	let (tx, mut rx) = mpsc::channel::<ServerMessage>(SESSION_QUEUE);

	let sinks = state.sinks(ChannelDisplaySink::new(tx.clone()));
	let mut dispatcher = PushDispatcher::with_timeline(state.timeline.clone(), sinks);
	info!("Playback session opened");

	let writer = tokio::spawn(async move {
		while let Some(message) = rx.recv().await {
			let text = match serde_json::to_string(&message) {
				Ok(text) => text,
				Err(err) => {
					error!("Failed to serialize message: {}", err);
					continue;
				}
			};
			if let Err(err) = sender.send(Message::Text(text)).await {
				debug!("Session writer closed: {}", err);
				break;
			}
		}
	});

	loop {
		let frame = tokio::select! {
			frame = receiver.next() => frame,
			() = state.shutdown.cancelled() => break,
		};

		match frame {
			Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientMessage>(&text) {
				Ok(message) => {
					if let Err(err) = apply_message(&mut dispatcher, message) {
						warn!(error = %err, "Rejected client message");
						reply_error(&tx, err.to_string());
					}
				}
				Err(err) => {
					warn!("Failed to parse client message: {}", err);
					reply_error(&tx, format!("Invalid message format: {err}"));
				}
			},
			Some(Ok(Message::Close(reason))) => {
				debug!(?reason, "Client closed connection");
				break;
			}
			Some(Ok(_)) => {}
			Some(Err(err)) => {
				error!("WebSocket error: {}", err);
				break;
			}
			None => break,
		}
	}

	drop(dispatcher);
	drop(tx);
	let _ = writer.await;
	info!("Playback session closed");
}

fn reply_error(tx: &mpsc::Sender<ServerMessage>, message: String) {
	if let Err(err) = tx.try_send(ServerMessage::Error { message }) {
		warn!("Error reply dropped: {}", err);
	}
}
