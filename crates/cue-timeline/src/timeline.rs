use crate::event::{Seconds, TimedEvent};
use tracing::warn;

/// An immutable, sorted timeline of events
#[derive(Debug, Clone)]
pub struct Timeline<P> {
	events: Box<[TimedEvent<P>]>,
}

impl<P> Timeline<P> {
	/// Build a timeline from events in any order.
	///
	/// Events with a negative or non-finite offset are dropped. The sort is
	/// stable, so events sharing an offset fire in the order they were given.
	pub fn build(events: impl IntoIterator<Item = TimedEvent<P>>) -> Self {
		let mut events: Vec<_> = events
			.into_iter()
			.filter(|event| {
				let valid = event.offset.is_finite() && event.offset >= 0.0;
				if !valid {
					warn!(offset = event.offset, "Discarding event with invalid offset");
				}
				valid
			})
			.collect();

		events.sort_by(|a, b| a.offset.total_cmp(&b.offset));

		Self {
			events: events.into_boxed_slice(),
		}
	}

	pub fn len(&self) -> usize {
		self.events.len()
	}

	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	pub fn events(&self) -> &[TimedEvent<P>] {
		&self.events
	}

	pub fn get(&self, index: usize) -> Option<&TimedEvent<P>> {
		self.events.get(index)
	}

	/// Offset of the last event, or 0 for an empty timeline
	pub fn last_offset(&self) -> Seconds {
		self.events.last().map_or(0.0, |e| e.offset)
	}

	/// Index of the first event scheduled strictly after `time`.
	/// Returns `len()` when every event is due.
	pub fn seek_index(&self, time: Seconds) -> usize {
		self.events.partition_point(|e| e.offset <= time)
	}

	pub const fn cursor(&self) -> Cursor {
		Cursor::new()
	}
}

/// Per-session position in a timeline.
///
/// Every event below `position` has fired, or was skipped by a seek.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
	position: usize,
}

impl Cursor {
	pub const fn new() -> Self {
		Self { position: 0 }
	}

	pub const fn position(&self) -> usize {
		self.position
	}

	pub fn reset(&mut self) {
		self.position = 0;
	}

	pub fn is_exhausted<P>(&self, timeline: &Timeline<P>) -> bool {
		self.position >= timeline.len()
	}

	/// Move past every event due at `time` and return them in firing order.
	///
	/// This is the only method that fires events. A `time` earlier than
	/// already-fired offsets yields nothing and leaves the cursor in place.
	pub fn advance<'t, P>(&mut self, timeline: &'t Timeline<P>, time: Seconds) -> &'t [TimedEvent<P>] {
		let events = timeline.events();
		let start = self.position.min(events.len());
		let mut end = start;

		while end < events.len() && events[end].offset <= time {
			end += 1;
		}

		self.position = end;
		&events[start..end]
	}

	/// Reposition to `time` without firing anything, in either direction
	pub fn seek<P>(&mut self, timeline: &Timeline<P>, time: Seconds) -> usize {
		self.position = timeline.seek_index(time);
		self.position
	}
}
