//! # Playback Controller
//!
//! Couples the [`PlaybackQueue`] to the [`PlaybackEngine`]: the engine reports
//! what happened to a verse, the controller decides what plays next.
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = PlaybackController::new(engine);
//! controller.load_surah(session).await;
//! controller.play_all(PlaybackMode::RecordedAudio).await?;
//!
//! while let Some(outcome) = controller.process_next_signal().await {
//!     if let Some(QueueOutcome::Halted { error }) = outcome {
//!         show_toast(&error.user_message());
//!     }
//! }
//! ```

use crate::engine::{EngineEvent, PlaybackEngine, PlaybackStatus};
use crate::error::{PlaybackError, Result};
use crate::queue::{PlaybackQueue, QueueStep};
use bridge_traits::{MediaSignal, PlaybackSessionId};
use core_content::{SurahSession, TranslationMode};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent, PlaybackMode};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the controller did in response to a finished or failed verse.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueOutcome {
    /// The next queued verse started.
    Advanced { verse_index: usize },
    /// Nothing left to play; the engine is idle.
    Finished,
    /// Playback failed. The engine is idle and the queue cleared.
    Halted { error: PlaybackError },
}

pub struct PlaybackController {
    engine: PlaybackEngine,
    queue: PlaybackQueue,
    surah: Option<Arc<SurahSession>>,
    translation_mode: TranslationMode,
    last_mode: PlaybackMode,
    event_bus: Option<EventBus>,
}

impl PlaybackController {
    pub fn new(engine: PlaybackEngine) -> Self {
        Self {
            engine,
            queue: PlaybackQueue::new(),
            surah: None,
            translation_mode: TranslationMode::default(),
            last_mode: PlaybackMode::RecordedAudio,
            event_bus: None,
        }
    }

    /// Publish events from both the controller and its engine on `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.engine.set_event_bus(bus.clone());
        self.event_bus = Some(bus);
        self
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PlaybackEngine {
        &mut self.engine
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    pub fn status(&self) -> PlaybackStatus {
        self.engine.status()
    }

    /// Verse index of the live session.
    pub fn current_verse(&self) -> Option<usize> {
        self.engine.session().map(|session| session.verse_index)
    }

    pub fn surah(&self) -> Option<&Arc<SurahSession>> {
        self.surah.as_ref()
    }

    /// Replace the loaded surah. Stops playback and clears the queue.
    pub async fn load_surah(&mut self, surah: Arc<SurahSession>) {
        self.stop().await;
        info!(
            surah_number = surah.surah_number(),
            verses = surah.verse_count(),
            "Surah loaded for playback"
        );
        self.surah = Some(surah);
    }

    /// Stop playback, clear the queue and drop the loaded surah.
    pub async fn unload_surah(&mut self) {
        self.stop().await;
        if let Some(surah) = self.surah.take() {
            debug!(surah_number = surah.surah_number(), "Surah unloaded");
        }
    }

    pub fn translation_mode(&self) -> TranslationMode {
        self.translation_mode
    }

    /// Applies from the next verse spoken. Nothing is refetched.
    pub fn set_translation_mode(&mut self, mode: TranslationMode) {
        self.translation_mode = mode;
    }

    /// Play one verse on its own. The queue is left as it is.
    pub async fn play_verse(
        &mut self,
        verse_index: usize,
        mode: PlaybackMode,
    ) -> Result<PlaybackSessionId> {
        self.last_mode = mode;
        let result = self.start(verse_index, mode).await;
        if let Err(e) = &result {
            if halts_playback(e) {
                self.halt().await;
            }
        }
        result
    }

    /// Queue every verse of the surah and start the first.
    pub async fn play_all(&mut self, mode: PlaybackMode) -> Result<()> {
        let surah = self.surah.clone().ok_or(PlaybackError::NoSurahLoaded)?;
        self.last_mode = mode;
        self.queue.load(surah.verse_indices());

        match self.play_queued().await {
            QueueOutcome::Halted { error } => Err(error),
            _ => Ok(()),
        }
    }

    /// Skip to the next queued verse. No-op without a queue.
    pub async fn next(&mut self) -> Option<QueueOutcome> {
        match self.queue.advance() {
            QueueStep::Next(_) => Some(self.play_queued().await),
            QueueStep::Exhausted => Some(self.finish_queue().await),
            QueueStep::Empty => None,
        }
    }

    /// Go back one queued verse. At the first verse, or without a queue, this
    /// does nothing.
    pub async fn previous(&mut self) -> Option<QueueOutcome> {
        if self.queue.retreat() {
            Some(self.play_queued().await)
        } else {
            None
        }
    }

    /// Pause when playing, resume when paused.
    pub async fn toggle(&mut self) -> Result<()> {
        match self.engine.status() {
            PlaybackStatus::Playing => self.engine.pause().await,
            PlaybackStatus::Paused => self.engine.resume().await,
            _ => Ok(()),
        }
    }

    /// Stop playback and drop the queue.
    pub async fn stop(&mut self) {
        self.engine.stop().await;
        self.queue.clear();
    }

    pub async fn seek(&mut self, fraction: f64) -> Result<()> {
        self.engine.seek(fraction).await
    }

    /// Feed one adapter signal through the engine and react to the result.
    pub async fn handle_signal(&mut self, signal: MediaSignal) -> Option<QueueOutcome> {
        match self.engine.handle_signal(signal)? {
            EngineEvent::Ended { verse_index, .. } => {
                debug!(verse_index, "Advancing after verse end");
                Some(match self.queue.advance() {
                    QueueStep::Next(_) => self.play_queued().await,
                    QueueStep::Exhausted => self.finish_queue().await,
                    QueueStep::Empty => {
                        self.engine.stop().await;
                        QueueOutcome::Finished
                    }
                })
            }
            EngineEvent::Errored { verse_index, error } => {
                warn!(verse_index, error = %error, "Stopping after playback error");
                self.halt().await;
                Some(QueueOutcome::Halted { error })
            }
        }
    }

    /// Wait for the next adapter signal and handle it. `None` once the signal
    /// channel is gone or has been taken from the engine.
    pub async fn process_next_signal(&mut self) -> Option<Option<QueueOutcome>> {
        let signal = self.engine.next_signal().await?;
        Some(self.handle_signal(signal).await)
    }

    /// Play the verse at the queue cursor in the last used mode. Verses
    /// without recorded audio are skipped.
    async fn play_queued(&mut self) -> QueueOutcome {
        loop {
            let Some(verse_index) = self.queue.current() else {
                return self.finish_queue().await;
            };

            match self.start(verse_index, self.last_mode).await {
                Ok(_) => return QueueOutcome::Advanced { verse_index },
                Err(PlaybackError::AudioUnavailable { verse_number }) => {
                    warn!(verse_number, "Skipping verse without audio");
                    if let QueueStep::Exhausted | QueueStep::Empty = self.queue.advance() {
                        return self.finish_queue().await;
                    }
                }
                Err(error) => {
                    self.halt().await;
                    return QueueOutcome::Halted { error };
                }
            }
        }
    }

    async fn start(&mut self, verse_index: usize, mode: PlaybackMode) -> Result<PlaybackSessionId> {
        let surah = self.surah.clone().ok_or(PlaybackError::NoSurahLoaded)?;
        let verse = surah
            .verse(verse_index)
            .ok_or(PlaybackError::InvalidVerseIndex(verse_index))?;
        self.engine.play(verse, mode, self.translation_mode).await
    }

    async fn finish_queue(&mut self) -> QueueOutcome {
        self.engine.stop().await;
        self.queue.clear();
        info!("Playback queue finished");
        self.emit(PlaybackEvent::QueueExhausted);
        QueueOutcome::Finished
    }

    async fn halt(&mut self) {
        self.engine.stop().await;
        self.queue.clear();
    }

    fn emit(&self, event: PlaybackEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Playback(event)).ok();
        }
    }
}

fn halts_playback(error: &PlaybackError) -> bool {
    matches!(
        error,
        PlaybackError::PlaybackFailed(_) | PlaybackError::SynthesisError(_)
    )
}
