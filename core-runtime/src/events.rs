//! # Event Bus System
//!
//! Typed events broadcast from the reader core to whoever renders it, using
//! `tokio::sync::broadcast`.
//!
//! ```text
//! ┌────────────────┐  emit   ┌───────────┐  subscribe  ┌───────────────┐
//! │ Source resolve ├────────>│           ├────────────>│ UI projection │
//! └────────────────┘         │ EventBus  │             └───────────────┘
//! ┌────────────────┐  emit   │           │  subscribe  ┌───────────────┐
//! │ Playback       ├────────>│           ├────────────>│ Logger / test │
//! └────────────────┘         └───────────┘             └───────────────┘
//! ```
//!
//! Emitting with no subscribers is not an error for the emitter; call sites
//! discard the `SendError` with `.ok()`.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, ContentEvent, EventBus, EventStream};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut failures = EventStream::new(bus.subscribe())
//!     .filter(|event| matches!(event, CoreEvent::Content(ContentEvent::LoadFailed { .. })));
//!
//! bus.emit(CoreEvent::Content(ContentEvent::LoadFailed {
//!     surah_number: 2,
//!     message: "All content sources failed".to_string(),
//!     retryable: true,
//! }))
//! .ok();
//!
//! assert!(failures.recv().await.is_ok());
//! # }
//! ```
//!
//! ## Lagging
//!
//! A subscriber that falls more than the buffer size behind receives
//! `RecvError::Lagged(n)` and continues from the oldest retained event.
//! `RecvError::Closed` means every `EventBus` clone has been dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Surah resolution and catalog events
    Content(ContentEvent),
    /// Verse playback events
    Playback(PlaybackEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Content(e) => e.description(),
            CoreEvent::Playback(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Content(ContentEvent::LoadFailed { .. }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::Error { .. }) => EventSeverity::Error,
            CoreEvent::Content(ContentEvent::TierFailed { .. })
            | CoreEvent::Content(ContentEvent::CatalogFallback { .. }) => EventSeverity::Warning,
            CoreEvent::Content(ContentEvent::LoadCompleted { .. })
            | CoreEvent::Playback(PlaybackEvent::QueueExhausted) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Content Events
// ============================================================================

/// Events raised while resolving surah content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ContentEvent {
    /// A surah was requested.
    LoadStarted { surah_number: u16 },
    /// One source tier failed; the resolver moves on to the next.
    TierFailed {
        surah_number: u16,
        tier: String,
        message: String,
    },
    /// A surah session is ready.
    LoadCompleted {
        surah_number: u16,
        verse_count: usize,
        /// Tier that produced the content (`bundled`, `cache`, `primary`, `backup`)
        source: String,
    },
    /// Every tier failed, or the number was invalid.
    LoadFailed {
        surah_number: u16,
        message: String,
        /// Whether re-invoking the same load can succeed
        retryable: bool,
    },
    /// A resolution finished after a different surah had been selected.
    LoadDiscarded { surah_number: u16 },
    /// The remote catalog was unreachable and the bundled list was used.
    CatalogFallback { message: String },
}

impl ContentEvent {
    fn description(&self) -> &str {
        match self {
            ContentEvent::LoadStarted { .. } => "Surah load started",
            ContentEvent::TierFailed { .. } => "Content source failed",
            ContentEvent::LoadCompleted { .. } => "Surah loaded",
            ContentEvent::LoadFailed { .. } => "Surah load failed",
            ContentEvent::LoadDiscarded { .. } => "Stale surah load discarded",
            ContentEvent::CatalogFallback { .. } => "Using bundled surah list",
        }
    }
}

// ============================================================================
// Playback Events
// ============================================================================

/// How a verse is being voiced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackMode {
    /// Reciter audio from the CDN or proxy
    RecordedAudio,
    /// Translation read out by the speech synthesizer
    SynthesizedSpeech,
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackMode::RecordedAudio => f.write_str("recorded-audio"),
            PlaybackMode::SynthesizedSpeech => f.write_str("synthesized-speech"),
        }
    }
}

/// Events related to verse playback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A verse started playing.
    Started {
        /// In-surah verse number
        verse_number: u16,
        mode: PlaybackMode,
    },
    Paused { verse_number: u16 },
    Resumed { verse_number: u16 },
    /// Playback was torn down by request.
    Stopped,
    /// Playback position changed (recorded audio only).
    PositionChanged {
        verse_number: u16,
        position_ms: u64,
        duration_ms: Option<u64>,
    },
    /// A verse finished naturally.
    Completed {
        verse_number: u16,
        mode: PlaybackMode,
    },
    /// The last queued verse finished.
    QueueExhausted,
    /// Playback error occurred.
    Error {
        verse_number: Option<u16>,
        /// User-facing message
        message: String,
        /// Whether trying again is reasonable
        recoverable: bool,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Started { .. } => "Playback started",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Resumed { .. } => "Playback resumed",
            PlaybackEvent::Stopped => "Playback stopped",
            PlaybackEvent::PositionChanged { .. } => "Playback position changed",
            PlaybackEvent::Completed { .. } => "Verse completed",
            PlaybackEvent::QueueExhausted => "Playback queue finished",
            PlaybackEvent::Error { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Cloning the bus yields another sender on the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified per-subscriber buffer.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Subscribe and wrap the receiver in an [`EventStream`].
    pub fn stream(&self) -> EventStream {
        EventStream::new(self.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional predicate.
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned from `recv`/`try_recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` once all senders are gone.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Returns `None` if no matching event is currently buffered.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drain every matching event that is already buffered.
    pub fn drain(&mut self) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        while let Some(Ok(event)) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn started(verse_number: u16) -> CoreEvent {
        CoreEvent::Playback(PlaybackEvent::Started {
            verse_number,
            mode: PlaybackMode::RecordedAudio,
        })
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _rx1 = bus.subscribe();
        let _rx2 = bus.stream();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::default();
        assert!(bus.emit(CoreEvent::Playback(PlaybackEvent::Stopped)).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.emit(started(3)).unwrap(), 2);
        assert_eq!(rx1.recv().await.unwrap(), started(3));
        assert_eq!(rx2.recv().await.unwrap(), started(3));
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut content_only = bus
            .stream()
            .filter(|event| matches!(event, CoreEvent::Content(_)));

        bus.emit(started(1)).unwrap();
        bus.emit(CoreEvent::Content(ContentEvent::LoadStarted { surah_number: 36 }))
            .unwrap();

        let event = content_only.recv().await.unwrap();
        assert_eq!(
            event,
            CoreEvent::Content(ContentEvent::LoadStarted { surah_number: 36 })
        );
        assert!(content_only.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();

        for verse in 1..=5 {
            bus.emit(started(verse)).unwrap();
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(_))));
        assert!(rx.recv().await.is_ok());
    }

    #[test]
    fn test_event_severity() {
        let failed = CoreEvent::Content(ContentEvent::LoadFailed {
            surah_number: 2,
            message: "offline".to_string(),
            retryable: true,
        });
        assert_eq!(failed.severity(), EventSeverity::Error);

        let tier = CoreEvent::Content(ContentEvent::TierFailed {
            surah_number: 2,
            tier: "primary".to_string(),
            message: "HTTP 503".to_string(),
        });
        assert_eq!(tier.severity(), EventSeverity::Warning);

        assert_eq!(
            CoreEvent::Playback(PlaybackEvent::QueueExhausted).severity(),
            EventSeverity::Info
        );
        assert_eq!(started(1).severity(), EventSeverity::Debug);
    }

    #[test]
    fn test_event_description() {
        assert_eq!(started(1).description(), "Playback started");
        assert_eq!(
            CoreEvent::Content(ContentEvent::LoadDiscarded { surah_number: 4 }).description(),
            "Stale surah load discarded"
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Playback(PlaybackEvent::Completed {
            verse_number: 7,
            mode: PlaybackMode::SynthesizedSpeech,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Playback");
        assert_eq!(json["payload"]["event"], "Completed");
        assert_eq!(json["payload"]["mode"], "synthesized-speech");

        let back: CoreEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[tokio::test]
    async fn test_drain_collects_buffered_events() {
        let bus = EventBus::new(10);
        let mut stream = bus.stream();

        bus.emit(started(1)).unwrap();
        bus.emit(CoreEvent::Playback(PlaybackEvent::Stopped)).unwrap();

        assert_eq!(
            stream.drain(),
            vec![started(1), CoreEvent::Playback(PlaybackEvent::Stopped)]
        );
        assert!(stream.drain().is_empty());
    }
}
