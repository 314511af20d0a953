//! # Source Resolver
//!
//! Turns a surah number into a [`SurahSession`], trying sources in order and
//! stopping at the first that succeeds:
//!
//! 1. bundled content (no I/O)
//! 2. the TTL cache
//! 3. the primary remote editions
//! 4. the backup remote editions
//!
//! If every tier fails the caller gets [`ContentError::SourceUnavailable`]
//! carrying the last tier's error. Numbers outside `1..=114` are rejected
//! before anything else happens.

use crate::bundled;
use crate::cache::SurahCache;
use crate::catalog;
use crate::error::{ContentError, Result};
use crate::models::{is_valid_surah_number, AudioRef, SourceTier, SurahMeta, SurahSession};
use crate::remote::{HealthStatus, RemoteSource};
use core_runtime::config::{EditionSet, FeatureFlags, ReaderConfig};
use core_runtime::events::{ContentEvent, CoreEvent, EventBus};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct SourceResolver {
    remote: RemoteSource,
    primary: EditionSet,
    backup: EditionSet,
    audio: AudioRef,
    cache: SurahCache,
    features: FeatureFlags,
    event_bus: Option<EventBus>,
}

impl SourceResolver {
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            remote: RemoteSource::from_config(config),
            primary: config.primary_editions.clone(),
            backup: config.backup_editions.clone(),
            audio: AudioRef::from_config(config),
            cache: SurahCache::new(
                config.cache_capacity,
                config.cache_ttl,
                Arc::clone(&config.clock),
            ),
            features: config.features,
            event_bus: None,
        }
    }

    /// Publish [`ContentEvent`]s on `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Resolve a surah through the fallback chain.
    ///
    /// # Errors
    ///
    /// - [`ContentError::InvalidSurahNumber`] without any I/O
    /// - [`ContentError::SourceUnavailable`] when both remote tiers fail
    #[instrument(skip(self))]
    pub async fn resolve(&self, surah_number: u16) -> Result<Arc<SurahSession>> {
        if !is_valid_surah_number(surah_number) {
            let err = ContentError::InvalidSurahNumber(surah_number);
            self.emit(ContentEvent::LoadFailed {
                surah_number,
                message: err.user_message(),
                retryable: false,
            });
            return Err(err);
        }

        self.emit(ContentEvent::LoadStarted { surah_number });

        if self.features.enable_bundled_content {
            if let Some(session) = bundled::load(surah_number, &self.audio) {
                return Ok(self.completed(Arc::new(session)));
            }
        }

        if self.features.enable_response_cache {
            if let Some(session) = self.cache.get(surah_number) {
                let session = Arc::new(session.as_ref().clone().with_source(SourceTier::Cache));
                return Ok(self.completed(session));
            }
        }

        let mut last_error = None;
        for (tier, editions) in [
            (SourceTier::Primary, &self.primary),
            (SourceTier::Backup, &self.backup),
        ] {
            match self.remote.fetch_surah(surah_number, editions, tier).await {
                Ok(session) => {
                    let session = Arc::new(session);
                    if self.features.enable_response_cache {
                        self.cache.insert(Arc::clone(&session));
                    }
                    return Ok(self.completed(session));
                }
                Err(e) => {
                    warn!(surah_number, tier = %tier, error = %e, "Content tier failed");
                    self.emit(ContentEvent::TierFailed {
                        surah_number,
                        tier: tier.to_string(),
                        message: e.to_string(),
                    });
                    last_error = Some(e);
                }
            }
        }

        let err = ContentError::SourceUnavailable {
            surah_number,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no remote source configured".to_string()),
        };
        self.emit(ContentEvent::LoadFailed {
            surah_number,
            message: err.user_message(),
            retryable: err.is_retryable(),
        });
        Err(err)
    }

    /// The surah list. Falls back to the bundled catalog when the remote one
    /// cannot be fetched, so this never fails.
    pub async fn list_surahs(&self) -> Vec<SurahMeta> {
        match self.remote.fetch_catalog().await {
            Ok(surahs) => surahs,
            Err(e) => {
                warn!(error = %e, "Remote catalog unavailable, using bundled list");
                self.emit(ContentEvent::CatalogFallback {
                    message: e.to_string(),
                });
                catalog::all_surahs()
            }
        }
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.remote.health().await
    }

    /// Drop every cached surah.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    fn completed(&self, session: Arc<SurahSession>) -> Arc<SurahSession> {
        info!(
            surah_number = session.surah_number(),
            verse_count = session.verse_count(),
            source = %session.source,
            "Surah resolved"
        );
        self.emit(ContentEvent::LoadCompleted {
            surah_number: session.surah_number(),
            verse_count: session.verse_count(),
            source: session.source.to_string(),
        });
        session
    }

    fn emit(&self, event: ContentEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Content(event)).ok();
        }
    }
}
