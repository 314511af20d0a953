use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Reader initialization failed: {0}")]
    InitializationFailed(#[from] core_runtime::Error),

    #[error("Content error: {0}")]
    Content(#[from] core_content::ContentError),

    #[error("Playback error: {0}")]
    Playback(#[from] core_playback::PlaybackError),

    #[error("No failed load to retry")]
    NothingToRetry,

    #[error("Media signal stream already taken")]
    SignalsTaken,
}

impl CoreError {
    /// Text suitable for a toast or inline error view.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Content(e) => e.user_message(),
            CoreError::Playback(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
