pub mod audio;
pub mod config;
pub mod error;
pub mod event;
pub mod led;
pub mod loader;
pub mod push;
pub mod scheduler;
pub mod segment;
pub mod sink;
pub mod timeline;

pub use audio::AudioEngine;
pub use config::SchedulerConfig;
pub use error::{ConfigError, DispatchError, EntryError, LineError, Result, SchedulerError, SinkError, TimelineError};
pub use event::{ClipAction, ClipCue, ClipPlay, ScoreCue, Seconds, TimedEvent};
pub use led::LedCode;
pub use loader::{load_cue_sheet, load_scenario, parse_cue_line, parse_cue_sheet, parse_scenario};
pub use push::{PushDispatcher, PushState};
pub use scheduler::{PullScheduler, TickReport};
pub use segment::ActiveSegment;
pub use sink::{CueSinks, DisplaySink, LedSink, SinkResult, SoundCueSink};
pub use timeline::{Cursor, Timeline};
