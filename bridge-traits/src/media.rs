//! Media output bridges: recorded audio and speech synthesis.
//!
//! The core never talks to an audio element or a speech engine directly. It
//! binds a [`PlaybackSessionId`] to each thing it starts and hands the adapter
//! a [`MediaSignalSender`]. Adapters report lifecycle changes by sending
//! [`MediaSignal`]s tagged with that id, which lets the core drop signals that
//! belong to a session it has already torn down.

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Identity of one play attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaybackSessionId(Uuid);

impl PlaybackSessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlaybackSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaybackSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What happened to a media session.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSignalKind {
    /// Output actually began (audio `playing`, speech `start`).
    Started,
    /// Periodic position report. `duration` is `None` until metadata is known.
    Progress {
        position: Duration,
        duration: Option<Duration>,
    },
    /// Natural end of the audio or utterance.
    Ended,
    /// Media or synthesis failure.
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaSignal {
    pub session: PlaybackSessionId,
    pub kind: MediaSignalKind,
}

impl MediaSignal {
    pub fn new(session: PlaybackSessionId, kind: MediaSignalKind) -> Self {
        Self { session, kind }
    }

    pub fn ended(session: PlaybackSessionId) -> Self {
        Self::new(session, MediaSignalKind::Ended)
    }

    pub fn failed(session: PlaybackSessionId, message: impl Into<String>) -> Self {
        Self::new(
            session,
            MediaSignalKind::Failed {
                message: message.into(),
            },
        )
    }
}

pub type MediaSignalSender = mpsc::UnboundedSender<MediaSignal>;
pub type MediaSignalReceiver = mpsc::UnboundedReceiver<MediaSignal>;

/// Create the channel an engine hands to its adapters.
pub fn media_signal_channel() -> (MediaSignalSender, MediaSignalReceiver) {
    mpsc::unbounded_channel()
}

/// Text plus the voice parameters to speak it with.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 language tag, e.g. `en-US`.
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Recorded audio output (an HTML audio element, a native player, ...).
///
/// An adapter holds at most one loaded source. Loading a new source replaces
/// the previous one; calls naming a session that is no longer loaded should
/// fail with [`BridgeError::InactiveSession`](crate::error::BridgeError::InactiveSession).
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait AudioOutput: PlatformSendSync {
    /// Bind `url` to the output, positioned at zero, and start reporting
    /// signals for `session` on `signals`.
    async fn load(
        &self,
        session: PlaybackSessionId,
        url: &str,
        signals: MediaSignalSender,
    ) -> Result<()>;

    async fn play(&self, session: PlaybackSessionId) -> Result<()>;

    async fn pause(&self, session: PlaybackSessionId) -> Result<()>;

    /// Halt output, rewind, and release the source. No signals for `session`
    /// may be sent afterwards.
    async fn stop(&self, session: PlaybackSessionId) -> Result<()>;

    async fn seek(&self, session: PlaybackSessionId, position: Duration) -> Result<()>;

    /// Total duration once the source metadata has loaded.
    async fn duration(&self, session: PlaybackSessionId) -> Result<Option<Duration>>;
}

/// Text-to-speech output.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait SpeechSynthesizer: PlatformSendSync {
    /// Whether the host environment offers speech synthesis at all.
    fn is_supported(&self) -> bool;

    async fn speak(
        &self,
        session: PlaybackSessionId,
        utterance: Utterance,
        signals: MediaSignalSender,
    ) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    async fn resume(&self) -> Result<()>;

    /// Drop the current and any queued utterances. Must not report `Ended`
    /// for the cancelled utterance.
    async fn cancel(&self) -> Result<()>;
}
