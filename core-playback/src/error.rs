//! # Playback Error Types

use thiserror::Error;

/// Toast shown for any media failure.
pub const PLAYBACK_FAILED_MESSAGE: &str = "Audio playback error. Please try again.";

/// Errors that can occur during verse playback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// The verse has no recorded-audio reference. Only this play attempt
    /// fails; the queue is left alone.
    #[error("No recorded audio for verse {verse_number}")]
    AudioUnavailable { verse_number: u16 },

    /// No surah is loaded into the controller.
    #[error("No surah loaded")]
    NoSurahLoaded,

    /// Verse index outside the loaded surah.
    #[error("Verse index {0} is out of range")]
    InvalidVerseIndex(usize),

    // ========================================================================
    // Speech Errors
    // ========================================================================
    /// The speech engine failed while speaking.
    #[error("Speech synthesis failed: {0}")]
    SynthesisError(String),

    /// The host offers no speech synthesis, or it is disabled.
    #[error("Speech synthesis is not supported")]
    SpeechUnsupported,

    // ========================================================================
    // Media Errors
    // ========================================================================
    /// Generic media failure reported by the audio output.
    #[error("Playback operation failed: {0}")]
    PlaybackFailed(String),
}

impl PlaybackError {
    /// Whether playing again (this verse or another) is reasonable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            PlaybackError::SpeechUnsupported
                | PlaybackError::NoSurahLoaded
                | PlaybackError::InvalidVerseIndex(_)
        )
    }

    /// Returns `true` for both speech failure kinds.
    pub fn is_synthesis_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::SynthesisError(_) | PlaybackError::SpeechUnsupported
        )
    }

    /// Non-fatal message for a toast.
    pub fn user_message(&self) -> String {
        match self {
            PlaybackError::AudioUnavailable { verse_number } => {
                format!("Audio is not available for verse {}.", verse_number)
            }
            PlaybackError::NoSurahLoaded => "Please select a surah first.".to_string(),
            PlaybackError::InvalidVerseIndex(_) => "That verse does not exist.".to_string(),
            PlaybackError::SynthesisError(_) => {
                "Translation audio error. Please try again.".to_string()
            }
            PlaybackError::SpeechUnsupported => {
                "Translation audio is not supported on this device.".to_string()
            }
            PlaybackError::PlaybackFailed(_) => PLAYBACK_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
