//! # Surah Content Module
//!
//! Resolves surah text, translations and audio references.
//!
//! ## Overview
//!
//! This module handles:
//! - Bundled surahs (1, 112, 113, 114) served without the network
//! - Primary and backup remote editions with per-request retry
//! - Placeholder text when a translation is shorter than the Arabic text
//! - A TTL cache of resolved surahs
//! - The surah catalog, with a bundled fallback

pub mod bundled;
pub mod cache;
pub mod catalog;
pub mod error;
pub mod models;
pub mod remote;
pub mod resolver;
pub mod retry;

pub use error::{ContentError, Result};
pub use models::{
    AudioRef, RevelationType, SourceTier, SurahMeta, SurahSession, TranslationMode, Translations,
    Verse, ENGLISH_PLACEHOLDER, SURAH_COUNT, URDU_PLACEHOLDER,
};
pub use remote::{HealthStatus, RemoteSource};
pub use resolver::SourceResolver;
