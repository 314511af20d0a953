//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the reader crates:
//! - Reader configuration with injected endpoints
//! - Logging and tracing setup
//! - Event bus for content and playback events
//!
//! Nothing in here knows about surahs or verses beyond the URLs that address
//! them; domain logic lives in `core-content` and `core-playback`.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{ApiEndpoints, ContentLanguage, EditionSet, FeatureFlags, ReaderConfig};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, EventStream, PlaybackMode};
