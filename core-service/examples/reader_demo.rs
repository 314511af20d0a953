//! # Reader Usage Example
//!
//! Lists surahs, loads one and "plays" it through an audio output that only
//! prints what it was asked to do and reports each verse as finished a moment
//! later.
//!
//! Run with: `cargo run --example reader_demo --package core-service -- 112`

use anyhow::Context;
use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    AudioOutput, MediaSignal, MediaSignalSender, PlaybackSessionId, SpeechSynthesizer, Utterance,
};
use core_runtime::events::{CoreEvent, PlaybackEvent, PlaybackMode};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Console adapters
// ============================================================================

struct ConsoleAudio;

#[async_trait]
impl AudioOutput for ConsoleAudio {
    async fn load(
        &self,
        session: PlaybackSessionId,
        url: &str,
        signals: MediaSignalSender,
    ) -> BridgeResult<()> {
        println!("  ♪ {}", url);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            signals.send(MediaSignal::ended(session)).ok();
        });
        Ok(())
    }

    async fn play(&self, _session: PlaybackSessionId) -> BridgeResult<()> {
        Ok(())
    }

    async fn pause(&self, _session: PlaybackSessionId) -> BridgeResult<()> {
        Ok(())
    }

    async fn stop(&self, _session: PlaybackSessionId) -> BridgeResult<()> {
        Ok(())
    }

    async fn seek(&self, _session: PlaybackSessionId, _position: Duration) -> BridgeResult<()> {
        Ok(())
    }

    async fn duration(&self, _session: PlaybackSessionId) -> BridgeResult<Option<Duration>> {
        Ok(None)
    }
}

/// No speech engine on a terminal.
struct NoSpeech;

#[async_trait]
impl SpeechSynthesizer for NoSpeech {
    fn is_supported(&self) -> bool {
        false
    }

    async fn speak(
        &self,
        _session: PlaybackSessionId,
        _utterance: Utterance,
        _signals: MediaSignalSender,
    ) -> BridgeResult<()> {
        Ok(())
    }

    async fn pause(&self) -> BridgeResult<()> {
        Ok(())
    }

    async fn resume(&self) -> BridgeResult<()> {
        Ok(())
    }

    async fn cancel(&self) -> BridgeResult<()> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))?;

    let surah_number: u16 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()
        .context("surah number must be between 1 and 114")?
        .unwrap_or(1);

    let reader = core_service::bootstrap_desktop(Arc::new(ConsoleAudio), Arc::new(NoSpeech))?;
    tokio::spawn({
        let reader = reader.clone();
        async move { reader.run_signal_loop().await }
    });

    let surahs = reader.list_surahs().await;
    println!("{} surahs available", surahs.len());

    let Some(session) = reader.load_surah(surah_number).await? else {
        return Ok(());
    };
    println!(
        "\n{} ({}) - {} verses from {}\n",
        session.meta.english_name,
        session.meta.name,
        session.verses.len(),
        session.source
    );
    for verse in &session.verses {
        println!("{:>3}. {}", verse.number, verse.arabic_text);
        println!("     {}", verse.translations.english);
    }

    let mut events = reader.events();
    println!("\nPlaying recitation:");
    reader.play_all(PlaybackMode::RecordedAudio).await?;
    loop {
        match events.recv().await? {
            CoreEvent::Playback(PlaybackEvent::QueueExhausted) => break,
            CoreEvent::Playback(PlaybackEvent::Error { message, .. }) => {
                println!("{}", message);
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
