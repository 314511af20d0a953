//! Workspace umbrella crate.
//!
//! This crate exposes feature flags that map to the individual workspace
//! crates (`core-service`, `core-content`, `core-playback`). Host
//! applications can depend on `quran-reader-workspace` and enable the
//! documented features without wiring each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;

#[cfg(feature = "content")]
pub use core_content as content;

#[cfg(feature = "playback")]
pub use core_playback as playback;
