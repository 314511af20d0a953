//! # Verse Playback Module
//!
//! Plays verses as recorded recitation or synthesized speech.
//!
//! ## Overview
//!
//! This module handles:
//! - The playback queue used by "play all"
//! - A single-flight playback engine over host audio and speech bridges
//! - Voice profiles per translation mode
//! - Queue advancement when a verse ends, and teardown when one fails

pub mod controller;
pub mod engine;
pub mod error;
pub mod queue;
pub mod voice;

pub use controller::{PlaybackController, QueueOutcome};
pub use engine::{EngineEvent, PlaybackEngine, PlaybackSession, PlaybackStatus};
pub use error::{PlaybackError, Result, PLAYBACK_FAILED_MESSAGE};
pub use queue::{PlaybackQueue, QueueStep};
pub use voice::{VoiceProfile, VoiceProfiles};
