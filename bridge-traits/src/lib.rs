//! # Host Bridge Traits
//!
//! Capabilities the reader core needs from whatever hosts it.
//!
//! ## Overview
//!
//! The core resolves surah content over HTTP and drives two kinds of media
//! output. None of those can be implemented portably, so each is a trait here
//! and every host supplies adapters.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Single-shot async HTTP; retries are scheduled by the caller from a [`RetryPolicy`](http::RetryPolicy)
//!
//! ### Media
//! - [`AudioOutput`](media::AudioOutput) - Recorded verse audio
//! - [`SpeechSynthesizer`](media::SpeechSynthesizer) - Spoken translations
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic cache expiry
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | HTTP only |
//! | Web      | host supplied       | All traits |
//!
//! ## Error Handling
//!
//! All bridge traits return [`BridgeError`](error::BridgeError). Adapters
//! should translate platform errors into it with enough context (URL, session)
//! for the log line to be useful on its own.
//!
//! ## Thread Safety
//!
//! Bridges are bounded by [`PlatformSendSync`](platform::PlatformSendSync):
//! `Send + Sync` natively, unbounded on `wasm32`.

pub mod error;
pub mod http;
pub mod media;
pub mod platform;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{Backoff, HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use media::{
    media_signal_channel, AudioOutput, MediaSignal, MediaSignalKind, MediaSignalReceiver,
    MediaSignalSender, PlaybackSessionId, SpeechSynthesizer, Utterance,
};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
