use derive_more::From;

/// Requests handled by the dispatch loop. The button sends `Toggle` on a
/// double press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordingEvent {
    Start,
    Stop,
    Toggle,
}

#[derive(Debug, From)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Recording(RecordingEvent),
}
