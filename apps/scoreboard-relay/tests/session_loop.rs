use axum::extract::ws::Message;
use clap::Parser;
use cue_timeline::{ScoreCue, TimedEvent, Timeline};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use scoreboard_relay::ws::{run_session, ServerMessage};
use scoreboard_relay::{AppState, Config};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

const WAIT: Duration = Duration::from_secs(2);

struct Client {
	input: UnboundedSender<Result<Message, axum::Error>>,
	output: UnboundedReceiver<Message>,
	session: JoinHandle<()>,
}

impl Client {
	fn connect(state: &AppState) -> Self {
		let (input, frames) = unbounded();
		let (replies, output) = unbounded();
		let session = tokio::spawn(run_session(replies, frames, state.clone()));
		Self { input, output, session }
	}

	fn send(&self, text: &str) {
		self.input.unbounded_send(Ok(Message::Text(text.to_string()))).unwrap();
	}

	async fn next(&mut self) -> ServerMessage {
		let frame = timeout(WAIT, self.output.next()).await.expect("no reply in time").expect("session closed");
		let Message::Text(text) = frame else { panic!("unexpected frame {frame:?}") };
		serde_json::from_str(&text).unwrap()
	}

	async fn next_cue(&mut self) -> String {
		match self.next().await {
			ServerMessage::UpdateUi(update) => update.cue.text,
			other => panic!("expected a display update, got {other:?}"),
		}
	}

	async fn closed(self) {
		timeout(WAIT, self.session).await.expect("session still running").unwrap();
	}
}

fn state() -> AppState {
	let timeline = Timeline::build(vec![
		TimedEvent::new(0.0, ScoreCue::new("A")),
		TimedEvent::new(5.0, ScoreCue::new("B")),
		TimedEvent::new(12.0, ScoreCue::new("C")),
	]);
	AppState::new(Arc::new(Config::parse_from(["scoreboard-relay"])), Arc::new(timeline), CancellationToken::new())
}

#[tokio::test]
async fn bad_frame_gets_an_error_and_the_session_continues() {
	let state = state();
	let mut client = Client::connect(&state);

	client.send("{not json");
	assert!(matches!(client.next().await, ServerMessage::Error { message } if message.starts_with("Invalid message format")));

	client.send(r#"{"type":"time_update","time":6.0}"#);
	assert_eq!(client.next_cue().await, "A");
	assert_eq!(client.next_cue().await, "B");
}

#[tokio::test]
async fn close_frame_ends_the_session() {
	let state = state();
	let client = Client::connect(&state);

	client.input.unbounded_send(Ok(Message::Close(None))).unwrap();
	client.closed().await;
}

#[tokio::test]
async fn dropped_connection_ends_the_session() {
	let state = state();
	let mut client = Client::connect(&state);

	client.input.close_channel();
	assert!(timeout(WAIT, client.output.next()).await.unwrap().is_none());
	client.closed().await;
}

#[tokio::test]
async fn shutdown_ends_open_sessions() {
	let state = state();
	let first = Client::connect(&state);
	let second = Client::connect(&state);

	state.shutdown.cancel();
	first.closed().await;
	second.closed().await;
}

#[tokio::test]
async fn sessions_keep_their_own_position() {
	let state = state();
	let mut ahead = Client::connect(&state);
	let mut behind = Client::connect(&state);

	ahead.send(r#"{"type":"seek_event","time":11.0}"#);
	ahead.send(r#"{"type":"time_update","time":12.0}"#);
	assert_eq!(ahead.next_cue().await, "C");

	behind.send(r#"{"type":"time_update","time":6.0}"#);
	assert_eq!(behind.next_cue().await, "A");
	assert_eq!(behind.next_cue().await, "B");

	behind.send(r#"{"type":"time_update","time":12.5}"#);
	assert_eq!(behind.next_cue().await, "C");
}
