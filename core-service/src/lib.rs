//! Reader façade and bootstrap helpers.
//!
//! This crate wires the host-provided bridges (HTTP, audio output, speech
//! synthesis) into the content resolver and the playback controller, and
//! exposes the operations a reader UI calls. Desktop tools typically enable
//! the `desktop-shims` feature, which supplies a `reqwest` HTTP client; hosts
//! that play audio always bring their own media adapters.
//!
//! A reader has at most one pending surah load. Results for any other surah
//! are discarded on arrival, so quickly switching surahs never shows content
//! for the one the user already left.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{AudioOutput, MediaSignal, MediaSignalReceiver, SpeechSynthesizer};
use core_content::{HealthStatus, SourceResolver, SurahMeta, SurahSession, TranslationMode};
use core_playback::{
    PlaybackController, PlaybackEngine, PlaybackSession, PlaybackStatus, QueueOutcome,
    VoiceProfiles,
};
use core_runtime::config::ReaderConfig;
use core_runtime::events::{ContentEvent, CoreEvent, EventBus, EventStream, PlaybackMode};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

/// Aggregated handle to everything the reader needs from its host.
pub struct ReaderDependencies {
    pub config: ReaderConfig,
    pub audio: Arc<dyn AudioOutput>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    /// Speech voices per translation mode, checked in [`QuranReader::new`]
    pub voices: VoiceProfiles,
}

impl ReaderDependencies {
    pub fn new(
        config: ReaderConfig,
        audio: Arc<dyn AudioOutput>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            config,
            audio,
            speech,
            voices: VoiceProfiles::default(),
        }
    }

    pub fn with_voices(mut self, voices: VoiceProfiles) -> Self {
        self.voices = voices;
        self
    }
}

/// Proof that a load was started. Handed back to [`QuranReader::complete_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    surah_number: u16,
}

impl LoadTicket {
    pub fn surah_number(&self) -> u16 {
        self.surah_number
    }
}

#[derive(Debug, Default)]
struct LoadState {
    pending: Option<u16>,
    last_failed: Option<u16>,
}

struct ReaderInner {
    resolver: SourceResolver,
    playback: tokio::sync::Mutex<PlaybackController>,
    event_bus: EventBus,
    loads: Mutex<LoadState>,
}

/// Primary façade exposed to host applications.
///
/// Cheap to clone; clones share the same resolver, playback state and event
/// bus.
#[derive(Clone)]
pub struct QuranReader {
    inner: Arc<ReaderInner>,
}

impl QuranReader {
    /// Create a reader from the provided dependencies.
    pub fn new(deps: ReaderDependencies) -> Result<Self> {
        let ReaderDependencies {
            config,
            audio,
            speech,
            voices,
        } = deps;
        config.validate()?;
        voices.validate().map_err(core_runtime::Error::Config)?;

        let event_bus = EventBus::new(config.event_buffer_size);
        let resolver = SourceResolver::new(&config).with_event_bus(event_bus.clone());
        let engine = PlaybackEngine::new(audio, speech)
            .with_voices(voices)
            .with_speech_enabled(config.features.enable_speech);
        let controller = PlaybackController::new(engine).with_event_bus(event_bus.clone());

        info!(proxy = config.endpoints.is_proxy(), "Reader initialized");

        Ok(Self {
            inner: Arc::new(ReaderInner {
                resolver,
                playback: tokio::sync::Mutex::new(controller),
                event_bus,
                loads: Mutex::new(LoadState::default()),
            }),
        })
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    /// Subscribe to content and playback events.
    pub fn events(&self) -> EventStream {
        self.inner.event_bus.stream()
    }

    pub fn resolver(&self) -> &SourceResolver {
        &self.inner.resolver
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// The surah list, falling back to the bundled catalog.
    pub async fn list_surahs(&self) -> Vec<SurahMeta> {
        self.inner.resolver.list_surahs().await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        Ok(self.inner.resolver.health().await?)
    }

    /// Mark `surah_number` as the surah the user wants. Any earlier pending
    /// load becomes stale, and the loaded surah is dropped with its playback.
    pub async fn begin_load(&self, surah_number: u16) -> LoadTicket {
        {
            let mut loads = self.inner.loads.lock();
            if let Some(previous) = loads.pending.replace(surah_number) {
                if previous != surah_number {
                    debug!(previous, surah_number, "Superseding pending load");
                }
            }
        }
        self.inner.playback.lock().await.unload_surah().await;
        LoadTicket { surah_number }
    }

    /// Hand a resolution result back to the reader.
    ///
    /// Returns `Ok(None)` when the ticket is stale: another surah was selected
    /// after this load began. A stale result is dropped whether it succeeded
    /// or failed. A current success replaces the loaded surah; a current
    /// failure leaves no surah loaded.
    pub async fn complete_load(
        &self,
        ticket: LoadTicket,
        result: core_content::Result<Arc<SurahSession>>,
    ) -> Result<Option<Arc<SurahSession>>> {
        let surah_number = ticket.surah_number;
        let mut playback = self.inner.playback.lock().await;
        {
            let mut loads = self.inner.loads.lock();
            if loads.pending != Some(surah_number) {
                drop(loads);
                info!(surah_number, "Discarding result of a superseded load");
                self.emit(ContentEvent::LoadDiscarded { surah_number });
                return Ok(None);
            }
            loads.pending = None;
            loads.last_failed = match &result {
                Err(e) if e.is_retryable() => Some(surah_number),
                _ => None,
            };
        }

        match result {
            Ok(session) => {
                playback.load_surah(Arc::clone(&session)).await;
                Ok(Some(session))
            }
            Err(e) => {
                playback.unload_surah().await;
                Err(e.into())
            }
        }
    }

    /// Resolve and load a surah. `Ok(None)` means a newer selection won.
    #[instrument(skip(self))]
    pub async fn load_surah(&self, surah_number: u16) -> Result<Option<Arc<SurahSession>>> {
        let ticket = self.begin_load(surah_number).await;
        let result = self.inner.resolver.resolve(surah_number).await;
        self.complete_load(ticket, result).await
    }

    /// Run the last failed load again.
    ///
    /// # Errors
    ///
    /// [`CoreError::NothingToRetry`] if no retryable load has failed since
    /// the last successful one.
    pub async fn retry_load(&self) -> Result<Option<Arc<SurahSession>>> {
        let surah_number = self
            .inner
            .loads
            .lock()
            .last_failed
            .ok_or(CoreError::NothingToRetry)?;
        info!(surah_number, "Retrying failed load");
        self.load_surah(surah_number).await
    }

    /// Surah whose load failed and can be retried.
    pub fn failed_load(&self) -> Option<u16> {
        self.inner.loads.lock().last_failed
    }

    pub fn pending_load(&self) -> Option<u16> {
        self.inner.loads.lock().pending
    }

    pub async fn current_surah(&self) -> Option<Arc<SurahSession>> {
        self.inner.playback.lock().await.surah().cloned()
    }

    pub async fn translation_mode(&self) -> TranslationMode {
        self.inner.playback.lock().await.translation_mode()
    }

    /// Switch the translation shown and spoken. Takes effect from the next
    /// verse played; nothing is refetched.
    pub async fn set_translation_mode(&self, mode: TranslationMode) {
        self.inner.playback.lock().await.set_translation_mode(mode);
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    pub async fn play_verse(&self, verse_index: usize, mode: PlaybackMode) -> Result<()> {
        self.inner
            .playback
            .lock()
            .await
            .play_verse(verse_index, mode)
            .await?;
        Ok(())
    }

    pub async fn play_all(&self, mode: PlaybackMode) -> Result<()> {
        Ok(self.inner.playback.lock().await.play_all(mode).await?)
    }

    pub async fn next(&self) -> Option<QueueOutcome> {
        self.inner.playback.lock().await.next().await
    }

    pub async fn previous(&self) -> Option<QueueOutcome> {
        self.inner.playback.lock().await.previous().await
    }

    pub async fn toggle(&self) -> Result<()> {
        Ok(self.inner.playback.lock().await.toggle().await?)
    }

    pub async fn stop(&self) {
        self.inner.playback.lock().await.stop().await;
    }

    pub async fn seek(&self, fraction: f64) -> Result<()> {
        Ok(self.inner.playback.lock().await.seek(fraction).await?)
    }

    pub async fn status(&self) -> PlaybackStatus {
        self.inner.playback.lock().await.status()
    }

    pub async fn playback_session(&self) -> Option<PlaybackSession> {
        self.inner.playback.lock().await.engine().session().cloned()
    }

    /// Apply one adapter signal. Hosts that deliver signals themselves call
    /// this instead of running [`run_signal_loop`](Self::run_signal_loop).
    pub async fn handle_signal(&self, signal: MediaSignal) -> Option<QueueOutcome> {
        self.inner.playback.lock().await.handle_signal(signal).await
    }

    /// Detach the adapter signal stream for a host-driven pump.
    pub async fn take_signals(&self) -> Result<MediaSignalReceiver> {
        self.inner
            .playback
            .lock()
            .await
            .engine_mut()
            .take_signal_receiver()
            .ok_or(CoreError::SignalsTaken)
    }

    /// Feed adapter signals to the controller until the stream closes.
    /// Usually spawned once per reader.
    ///
    /// # Errors
    ///
    /// [`CoreError::SignalsTaken`] if the stream was already detached.
    pub async fn run_signal_loop(&self) -> Result<()> {
        let mut signals = self.take_signals().await?;
        while let Some(signal) = signals.recv().await {
            if let Some(QueueOutcome::Halted { error }) = self.handle_signal(signal).await {
                warn!(error = %error, "Playback halted");
            }
        }
        debug!("Media signal stream closed");
        Ok(())
    }

    fn emit(&self, event: ContentEvent) {
        self.inner.event_bus.emit(CoreEvent::Content(event)).ok();
    }
}

/// Convenience bootstrapper for desktop hosts. The HTTP client comes from
/// `bridge-desktop`; every other setting keeps its default.
///
/// ```ignore
/// let reader = core_service::bootstrap_desktop(audio, speech)?;
/// tokio::spawn({
///     let reader = reader.clone();
///     async move { reader.run_signal_loop().await }
/// });
/// reader.load_surah(1).await?;
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(
    audio: Arc<dyn AudioOutput>,
    speech: Arc<dyn SpeechSynthesizer>,
) -> Result<QuranReader> {
    let config = ReaderConfig::builder().build()?;
    QuranReader::new(ReaderDependencies::new(config, audio, speech))
}
