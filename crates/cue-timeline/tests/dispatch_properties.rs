// Behavioural properties of the push dispatcher and pull scheduler,
// exercised through the public API only.

use cue_timeline::*;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

// ============================================================================
// Test harness
// ============================================================================

#[derive(Default)]
struct Screen {
	shown: Mutex<Vec<String>>,
}

impl DisplaySink for Screen {
	fn show(&self, event: &TimedEvent<ScoreCue>) -> SinkResult {
		self.shown.lock().unwrap().push(event.payload.text.clone());
		Ok(())
	}
}

impl Screen {
	fn drain(&self) -> Vec<String> {
		std::mem::take(&mut *self.shown.lock().unwrap())
	}
}

#[derive(Default)]
struct Speaker {
	log: Vec<String>,
	busy: bool,
}

impl AudioEngine for Speaker {
	fn clip_exists(&self, _clip: &Path) -> bool {
		true
	}

	fn play(&mut self, clip: &Path, loops: u32) -> SinkResult {
		self.log.push(format!("play {} x{}", clip.display(), loops + 1));
		self.busy = true;
		Ok(())
	}

	fn stop(&mut self) -> SinkResult {
		self.log.push("stop".to_string());
		self.busy = false;
		Ok(())
	}

	fn fade_out(&mut self, fade: Duration) -> SinkResult {
		self.log.push(format!("fade {}ms", fade.as_millis()));
		self.busy = false;
		Ok(())
	}

	fn is_busy(&self) -> bool {
		self.busy
	}
}

fn numbered_timeline(offsets: &[f64]) -> Arc<Timeline<ScoreCue>> {
	Arc::new(Timeline::build(offsets.iter().map(|&offset| TimedEvent::new(offset, ScoreCue::new(format!("{offset}"))))))
}

fn push(timeline: Arc<Timeline<ScoreCue>>) -> (PushDispatcher, Arc<Screen>) {
	let screen = Arc::new(Screen::default());
	(PushDispatcher::with_timeline(timeline, CueSinks::new(screen.clone())), screen)
}

fn texts(events: &[TimedEvent<ScoreCue>]) -> Vec<String> {
	events.iter().map(|e| e.payload.text.clone()).collect()
}

// ============================================================================
// Push dispatcher
// ============================================================================

#[test]
fn non_decreasing_reports_fire_each_due_event_once() {
	let offsets = [0.0, 0.5, 1.0, 1.0, 2.5, 4.0, 7.25, 9.0];
	let (mut dispatcher, screen) = push(numbered_timeline(&offsets));

	for time in [0.0, 0.4, 1.0, 1.0, 3.0, 3.0, 8.0] {
		dispatcher.report(time).unwrap();
	}

	let expected: Vec<String> = offsets.iter().filter(|&&o| o <= 8.0).map(|o| format!("{o}")).collect();
	assert_eq!(screen.drain(), expected);
}

#[test]
fn seek_then_advance_fires_only_the_gap() {
	let (mut dispatcher, _) = push(numbered_timeline(&[1.0, 2.0, 3.0, 4.0, 5.0]));

	dispatcher.seek(2.0).unwrap();
	assert!(dispatcher.report(2.0).unwrap().is_empty());
	assert_eq!(texts(&dispatcher.report(4.0).unwrap()), vec!["3", "4"]);
}

#[test]
fn backward_seek_does_not_refire_below_seek_point() {
	let (mut dispatcher, screen) = push(numbered_timeline(&[1.0, 2.0, 3.0, 4.0, 5.0]));

	dispatcher.report(4.5).unwrap();
	screen.drain();

	dispatcher.seek(2.5).unwrap();
	dispatcher.report(5.0).unwrap();
	assert_eq!(screen.drain(), vec!["3", "4", "5"]);
}

#[test]
fn jitter_backwards_keeps_the_cursor() {
	let (mut dispatcher, _) = push(numbered_timeline(&[1.0, 2.0, 3.0]));

	dispatcher.report(2.0).unwrap();
	assert!(dispatcher.report(1.5).unwrap().is_empty());
	assert_eq!(dispatcher.cursor().position(), 2);
	assert_eq!(texts(&dispatcher.report(3.0).unwrap()), vec!["3"]);
}

#[test]
fn scenario_document_end_to_end() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("scenario.json");
	std::fs::write(&path, r#"[{"time":0,"text":"A"},{"time":5,"text":"B"},{"time":12,"text":"C"}]"#).unwrap();

	let (mut dispatcher, _) = push(Arc::new(load_scenario(&path).unwrap()));
	let fired: Vec<Vec<String>> = [0.0, 3.0, 6.0, 12.0, 20.0]
		.into_iter()
		.map(|t| texts(&dispatcher.report(t).unwrap()))
		.collect();

	assert_eq!(fired, vec![vec!["A"], vec![], vec!["B"], vec!["C"], vec![]]);
}

// ============================================================================
// Pull scheduler
// ============================================================================

fn pull(sheet: &str, cycle: f64) -> PullScheduler<Speaker> {
	let timeline = Arc::new(parse_cue_sheet(sheet));
	let config = SchedulerConfig::new(cycle).with_clip_dir("mp3");
	PullScheduler::new(timeline, config, Speaker::default()).unwrap()
}

fn at(start: Instant, secs: f64) -> Instant {
	start + Duration::from_secs_f64(secs)
}

#[test]
fn cue_line_with_loop_option() {
	let event = parse_cue_line("5|intro|x2").unwrap().unwrap();
	assert_eq!(event.offset, 5.0);
	assert_eq!(
		event.payload.action,
		ClipAction::Play(ClipPlay {
			clip: "intro.mp3".to_string(),
			loops: 1,
			limit: None,
		})
	);
}

#[test]
fn limited_clip_fades_ten_seconds_after_start() {
	let start = Instant::now();
	let mut scheduler = pull("3|walkup|10s", 100.0);
	scheduler.start(start);

	let faded_at = (0..400_u64)
		.map(|step| step * 50)
		.find(|&ms| scheduler.tick(start + Duration::from_millis(ms)).unwrap().faded);

	assert_eq!(faded_at, Some(13_000));
	assert_eq!(scheduler.engine().log, vec!["play mp3/walkup.mp3 x1", "fade 500ms"]);
}

#[test]
fn restart_evaluates_from_the_first_event() {
	let start = Instant::now();
	let mut scheduler = pull("1|intro\n8|walkup\n", 10.0);
	scheduler.start(start);

	assert_eq!(scheduler.tick(at(start, 9.0)).unwrap().fired, 2);
	assert!(scheduler.tick(at(start, 10.0)).unwrap().restarted);
	assert_eq!(scheduler.cursor().position(), 0);
	assert!(scheduler.segment().is_none());

	let restart = at(start, 10.0);
	assert_eq!(scheduler.tick(at(restart, 1.0)).unwrap().fired, 1);
	assert_eq!(
		scheduler.engine().log,
		vec!["play mp3/intro.mp3 x1", "play mp3/walkup.mp3 x1", "stop", "play mp3/intro.mp3 x1"]
	);
}

#[tokio::test(start_paused = true)]
async fn cancelled_scheduler_stops_playback() {
	let scheduler = pull("0|intro|x3", 60.0);
	let cancel = tokio_util::sync::CancellationToken::new();
	let handle = tokio::spawn(scheduler.run(cancel.clone()));

	tokio::time::sleep(Duration::from_millis(500)).await;
	cancel.cancel();
	let speaker = handle.await.unwrap();

	assert_eq!(speaker.log.first().map(String::as_str), Some("play mp3/intro.mp3 x3"));
	assert_eq!(speaker.log.last().map(String::as_str), Some("stop"));
	assert!(!speaker.busy);
}
