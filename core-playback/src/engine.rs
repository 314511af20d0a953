//! # Playback Engine
//!
//! Owns the single live playback session and drives the host's audio output
//! and speech synthesizer.
//!
//! ```text
//!  idle ──play──> playing ──pause──> paused
//!                   │  ^───resume─────┘ │
//!                   ├──Ended──> ended    │
//!                   └──Failed─> errored <┘
//!  ended / errored ──acknowledge or stop──> idle
//! ```
//!
//! Every `play` mints a fresh [`PlaybackSessionId`] after tearing the previous
//! session down, and adapters tag their [`MediaSignal`]s with it. Signals for
//! any other id are dropped, so a late `Ended` from a cancelled verse can
//! never advance the queue.

use crate::error::{PlaybackError, Result};
use crate::voice::VoiceProfiles;
use bridge_traits::{
    media_signal_channel, AudioOutput, MediaSignal, MediaSignalKind, MediaSignalReceiver,
    MediaSignalSender, PlaybackSessionId, SpeechSynthesizer,
};
use core_content::{TranslationMode, Verse};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent, PlaybackMode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Paused,
    Ended,
    Errored,
}

/// The live playback session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub id: PlaybackSessionId,
    pub mode: PlaybackMode,
    pub verse_index: usize,
    pub verse_number: u16,
    pub status: PlaybackStatus,
    pub position: Duration,
    /// Known once the audio output reports it. Always `None` for speech.
    pub duration: Option<Duration>,
}

/// Terminal transitions reported by [`PlaybackEngine::handle_signal`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Ended {
        verse_index: usize,
        mode: PlaybackMode,
    },
    Errored {
        verse_index: usize,
        error: PlaybackError,
    },
}

pub struct PlaybackEngine {
    audio: Arc<dyn AudioOutput>,
    speech: Arc<dyn SpeechSynthesizer>,
    voices: VoiceProfiles,
    speech_enabled: bool,
    session: Option<PlaybackSession>,
    signal_tx: MediaSignalSender,
    signal_rx: Option<MediaSignalReceiver>,
    event_bus: Option<EventBus>,
}

impl PlaybackEngine {
    pub fn new(audio: Arc<dyn AudioOutput>, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        let (signal_tx, signal_rx) = media_signal_channel();
        Self {
            audio,
            speech,
            voices: VoiceProfiles::default(),
            speech_enabled: true,
            session: None,
            signal_tx,
            signal_rx: Some(signal_rx),
            event_bus: None,
        }
    }

    pub fn with_voices(mut self, voices: VoiceProfiles) -> Self {
        self.voices = voices;
        self
    }

    /// Turn synthesized speech off regardless of host support.
    pub fn with_speech_enabled(mut self, enabled: bool) -> Self {
        self.speech_enabled = enabled;
        self
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn set_event_bus(&mut self, bus: EventBus) {
        self.event_bus = Some(bus);
    }

    pub fn status(&self) -> PlaybackStatus {
        self.session
            .as_ref()
            .map_or(PlaybackStatus::Idle, |session| session.status)
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn voices(&self) -> &VoiceProfiles {
        &self.voices
    }

    /// Sender handed to adapters; also handy for injecting signals in tests.
    pub fn signal_sender(&self) -> MediaSignalSender {
        self.signal_tx.clone()
    }

    /// Take the adapter signal stream to pump it from elsewhere. After this,
    /// [`next_signal`](Self::next_signal) returns `None`.
    pub fn take_signal_receiver(&mut self) -> Option<MediaSignalReceiver> {
        self.signal_rx.take()
    }

    pub async fn next_signal(&mut self) -> Option<MediaSignal> {
        self.signal_rx.as_mut()?.recv().await
    }

    /// Start `verse` in `mode`, tearing down any previous session first.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::AudioUnavailable`] if the verse has no audio; the
    ///   engine stays idle
    /// - [`PlaybackError::SpeechUnsupported`] if speech is off or missing
    /// - [`PlaybackError::PlaybackFailed`] / [`PlaybackError::SynthesisError`]
    ///   if the adapter rejects the request; the engine is left `Errored`
    #[instrument(skip(self, verse), fields(verse_number = verse.number))]
    pub async fn play(
        &mut self,
        verse: &Verse,
        mode: PlaybackMode,
        translation_mode: TranslationMode,
    ) -> Result<PlaybackSessionId> {
        self.stop().await;

        let id = PlaybackSessionId::new();
        match mode {
            PlaybackMode::RecordedAudio => {
                let Some(url) = verse.audio_ref.as_deref() else {
                    let err = PlaybackError::AudioUnavailable {
                        verse_number: verse.number,
                    };
                    self.emit_error(Some(verse.number), &err);
                    return Err(err);
                };

                self.session = Some(new_session(id, mode, verse));
                if let Err(e) = self.start_audio(id, url).await {
                    return Err(self.fail_start(PlaybackError::PlaybackFailed(e.to_string())));
                }
            }
            PlaybackMode::SynthesizedSpeech => {
                if !self.speech_enabled || !self.speech.is_supported() {
                    let err = PlaybackError::SpeechUnsupported;
                    self.emit_error(Some(verse.number), &err);
                    return Err(err);
                }

                let utterance = self
                    .voices
                    .for_mode(translation_mode)
                    .utterance(verse.speech_text(translation_mode));

                self.session = Some(new_session(id, mode, verse));
                if let Err(e) = self.speech.speak(id, utterance, self.signal_tx.clone()).await {
                    return Err(self.fail_start(PlaybackError::SynthesisError(e.to_string())));
                }
            }
        }

        info!(session = %id, verse_index = verse.index, %mode, "Playback started");
        self.emit(PlaybackEvent::Started {
            verse_number: verse.number,
            mode,
        });
        Ok(id)
    }

    /// Cancel whatever is playing and return to idle. Safe to call at any time.
    pub async fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        match session.mode {
            PlaybackMode::RecordedAudio => {
                if let Err(e) = self.audio.stop(session.id).await {
                    warn!(session = %session.id, error = %e, "Audio output failed to stop");
                }
            }
            PlaybackMode::SynthesizedSpeech => {
                if let Err(e) = self.speech.cancel().await {
                    warn!(session = %session.id, error = %e, "Speech cancel failed");
                }
            }
        }

        debug!(session = %session.id, "Playback session torn down");
        self.emit(PlaybackEvent::Stopped);
    }

    /// No-op unless playing.
    pub async fn pause(&mut self) -> Result<()> {
        let Some((id, mode, verse_number)) = self.active(PlaybackStatus::Playing) else {
            return Ok(());
        };

        let result = match mode {
            PlaybackMode::RecordedAudio => self.audio.pause(id).await,
            PlaybackMode::SynthesizedSpeech => self.speech.pause().await,
        };
        result.map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

        self.set_status(PlaybackStatus::Paused);
        self.emit(PlaybackEvent::Paused { verse_number });
        Ok(())
    }

    /// No-op unless paused.
    pub async fn resume(&mut self) -> Result<()> {
        let Some((id, mode, verse_number)) = self.active(PlaybackStatus::Paused) else {
            return Ok(());
        };

        let result = match mode {
            PlaybackMode::RecordedAudio => self.audio.play(id).await,
            PlaybackMode::SynthesizedSpeech => self.speech.resume().await,
        };
        result.map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

        self.set_status(PlaybackStatus::Playing);
        self.emit(PlaybackEvent::Resumed { verse_number });
        Ok(())
    }

    /// Jump to `fraction` (clamped to `0.0..=1.0`) of the recorded audio.
    ///
    /// No-op for speech, when nothing is playing or paused, or while the
    /// duration is unknown.
    pub async fn seek(&mut self, fraction: f64) -> Result<()> {
        if !fraction.is_finite() {
            return Ok(());
        }

        let (id, known_duration) = match &self.session {
            Some(session)
                if session.mode == PlaybackMode::RecordedAudio
                    && matches!(
                        session.status,
                        PlaybackStatus::Playing | PlaybackStatus::Paused
                    ) =>
            {
                (session.id, session.duration)
            }
            _ => return Ok(()),
        };

        let duration = match known_duration {
            Some(duration) => Some(duration),
            None => self
                .audio
                .duration(id)
                .await
                .map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?,
        };
        let Some(duration) = duration.filter(|d| !d.is_zero()) else {
            debug!(session = %id, "Seek ignored, duration unknown");
            return Ok(());
        };

        let position = duration.mul_f64(fraction.clamp(0.0, 1.0));
        self.audio
            .seek(id, position)
            .await
            .map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

        if let Some(session) = self.session.as_mut() {
            session.position = position;
            session.duration = Some(duration);
        }
        Ok(())
    }

    /// Return from `Ended` or `Errored` to idle.
    pub async fn acknowledge(&mut self) {
        if matches!(
            self.status(),
            PlaybackStatus::Ended | PlaybackStatus::Errored
        ) {
            self.stop().await;
        }
    }

    /// Apply an adapter signal. Signals for any session other than the live
    /// one are dropped.
    pub fn handle_signal(&mut self, signal: MediaSignal) -> Option<EngineEvent> {
        let Some(session) = self.session.as_mut() else {
            debug!(session = %signal.session, "Dropping signal, no live session");
            return None;
        };
        if session.id != signal.session {
            debug!(
                session = %signal.session,
                live = %session.id,
                "Dropping signal from a torn-down session"
            );
            return None;
        }

        let live = matches!(
            session.status,
            PlaybackStatus::Playing | PlaybackStatus::Paused
        );
        let verse_index = session.verse_index;
        let verse_number = session.verse_number;
        let mode = session.mode;

        match signal.kind {
            MediaSignalKind::Started => None,
            MediaSignalKind::Progress { position, duration } => {
                session.position = position;
                if duration.is_some() {
                    session.duration = duration;
                }
                let duration_ms = session.duration.map(|d| d.as_millis() as u64);
                self.emit(PlaybackEvent::PositionChanged {
                    verse_number,
                    position_ms: position.as_millis() as u64,
                    duration_ms,
                });
                None
            }
            MediaSignalKind::Ended if live => {
                session.status = PlaybackStatus::Ended;
                debug!(verse_index, "Verse finished");
                self.emit(PlaybackEvent::Completed { verse_number, mode });
                Some(EngineEvent::Ended { verse_index, mode })
            }
            MediaSignalKind::Failed { message } if live => {
                session.status = PlaybackStatus::Errored;
                let error = match mode {
                    PlaybackMode::RecordedAudio => PlaybackError::PlaybackFailed(message),
                    PlaybackMode::SynthesizedSpeech => PlaybackError::SynthesisError(message),
                };
                warn!(verse_index, error = %error, "Playback failed");
                self.emit_error(Some(verse_number), &error);
                Some(EngineEvent::Errored { verse_index, error })
            }
            MediaSignalKind::Ended | MediaSignalKind::Failed { .. } => None,
        }
    }

    async fn start_audio(
        &self,
        id: PlaybackSessionId,
        url: &str,
    ) -> bridge_traits::error::Result<()> {
        self.audio.load(id, url, self.signal_tx.clone()).await?;
        self.audio.play(id).await
    }

    fn fail_start(&mut self, error: PlaybackError) -> PlaybackError {
        warn!(error = %error, "Adapter rejected playback");
        let verse_number = self.session.as_ref().map(|s| s.verse_number);
        self.set_status(PlaybackStatus::Errored);
        self.emit_error(verse_number, &error);
        error
    }

    fn active(&self, status: PlaybackStatus) -> Option<(PlaybackSessionId, PlaybackMode, u16)> {
        self.session
            .as_ref()
            .filter(|session| session.status == status)
            .map(|session| (session.id, session.mode, session.verse_number))
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if let Some(session) = self.session.as_mut() {
            session.status = status;
        }
    }

    fn emit_error(&self, verse_number: Option<u16>, error: &PlaybackError) {
        self.emit(PlaybackEvent::Error {
            verse_number,
            message: error.user_message(),
            recoverable: error.is_recoverable(),
        });
    }

    fn emit(&self, event: PlaybackEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Playback(event)).ok();
        }
    }
}

fn new_session(id: PlaybackSessionId, mode: PlaybackMode, verse: &Verse) -> PlaybackSession {
    PlaybackSession {
        id,
        mode,
        verse_index: verse.index,
        verse_number: verse.number,
        status: PlaybackStatus::Playing,
        position: Duration::ZERO,
        duration: None,
    }
}
