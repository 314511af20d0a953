//! # Reader Configuration
//!
//! Everything the reader core needs to know about where content comes from,
//! resolved once at startup and injected.
//!
//! ## Overview
//!
//! [`ReaderConfig`] is built with [`ReaderConfigBuilder`] and validated on
//! `build()`. The content backend is an explicit [`ApiEndpoints`] value: either
//! the public API and audio CDN directly, or the caching proxy. Nothing here
//! inspects the host environment to guess which one applies.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - defaulted to `ReqwestHttpClient` when the `desktop-shims`
//!   feature is enabled
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{ApiEndpoints, ReaderConfig};
//! use std::sync::Arc;
//!
//! let config = ReaderConfig::builder()
//!     .endpoints(ApiEndpoints::proxy("http://localhost:3000"))
//!     .http_client(Arc::new(MyHttpClient))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{Clock, HttpClient, RetryPolicy, SystemClock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.alquran.cloud/v1";
pub const DEFAULT_AUDIO_CDN_BASE: &str = "https://cdn.islamic.network/quran/audio";
pub const DEFAULT_RECITER: &str = "ar.alafasy";
pub const DEFAULT_AUDIO_BITRATE: u32 = 128;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Every surah fits in the cache by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 114;

/// A text language the content API can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLanguage {
    Arabic,
    English,
    Urdu,
}

impl ContentLanguage {
    pub const ALL: [ContentLanguage; 3] = [
        ContentLanguage::Arabic,
        ContentLanguage::English,
        ContentLanguage::Urdu,
    ];

    /// Value of the proxy's `language` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            ContentLanguage::Arabic => "arabic",
            ContentLanguage::English => "english",
            ContentLanguage::Urdu => "urdu",
        }
    }
}

impl fmt::Display for ContentLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// Edition identifiers requested from the content API for one source tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionSet {
    pub arabic: String,
    pub english: String,
    pub urdu: String,
    /// Edition whose ayahs carry per-verse `audio` URLs. `None` skips the
    /// audio-index request and derives audio URLs instead.
    pub audio: Option<String>,
}

impl EditionSet {
    pub fn primary() -> Self {
        Self {
            arabic: "quran-uthmani".to_string(),
            english: "en.asad".to_string(),
            urdu: "ur.jalandhry".to_string(),
            audio: Some(DEFAULT_RECITER.to_string()),
        }
    }

    pub fn backup() -> Self {
        Self {
            arabic: "ar.alafasy".to_string(),
            english: "en.pickthall".to_string(),
            urdu: "ur.ahmedali".to_string(),
            audio: None,
        }
    }

    pub fn edition_for(&self, language: ContentLanguage) -> &str {
        match language {
            ContentLanguage::Arabic => &self.arabic,
            ContentLanguage::English => &self.english,
            ContentLanguage::Urdu => &self.urdu,
        }
    }

    fn validate(&self, tier: &str) -> Result<()> {
        for language in ContentLanguage::ALL {
            if self.edition_for(language).trim().is_empty() {
                return Err(Error::Config(format!(
                    "{} edition for {} cannot be empty",
                    tier, language
                )));
            }
        }
        if matches!(&self.audio, Some(audio) if audio.trim().is_empty()) {
            return Err(Error::Config(format!(
                "{} audio edition cannot be empty; use None to disable it",
                tier
            )));
        }
        Ok(())
    }
}

/// Where surah content and audio are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiEndpoints {
    /// Public content API plus audio CDN.
    Direct {
        api_base: String,
        audio_cdn_base: String,
    },
    /// The caching proxy (`/api/surahs`, `/api/surah`, `/api/audio`, `/api/health`).
    Proxy { base_url: String },
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self::direct(DEFAULT_API_BASE, DEFAULT_AUDIO_CDN_BASE)
    }
}

impl ApiEndpoints {
    pub fn direct(api_base: impl Into<String>, audio_cdn_base: impl Into<String>) -> Self {
        Self::Direct {
            api_base: trim_base(api_base.into()),
            audio_cdn_base: trim_base(audio_cdn_base.into()),
        }
    }

    pub fn proxy(base_url: impl Into<String>) -> Self {
        Self::Proxy {
            base_url: trim_base(base_url.into()),
        }
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self, ApiEndpoints::Proxy { .. })
    }

    /// Surah metadata list.
    pub fn catalog_url(&self) -> String {
        match self {
            ApiEndpoints::Direct { api_base, .. } => format!("{}/meta", api_base),
            ApiEndpoints::Proxy { base_url } => format!("{}/api/surahs", base_url),
        }
    }

    /// Verse text of one surah in one language.
    pub fn surah_text_url(
        &self,
        surah_number: u16,
        language: ContentLanguage,
        editions: &EditionSet,
    ) -> String {
        match self {
            ApiEndpoints::Direct { api_base, .. } => format!(
                "{}/surah/{}/{}",
                api_base,
                surah_number,
                editions.edition_for(language)
            ),
            ApiEndpoints::Proxy { base_url } => format!(
                "{}/api/surah?number={}&language={}",
                base_url,
                surah_number,
                language.as_query()
            ),
        }
    }

    /// Edition listing per-verse audio URLs. The proxy does not expose one.
    pub fn audio_index_url(&self, surah_number: u16, editions: &EditionSet) -> Option<String> {
        match self {
            ApiEndpoints::Direct { api_base, .. } => editions
                .audio
                .as_ref()
                .map(|audio| format!("{}/surah/{}/{}", api_base, surah_number, audio)),
            ApiEndpoints::Proxy { .. } => None,
        }
    }

    /// Recorded audio for one verse, addressed by its global ayah number.
    pub fn verse_audio_url(&self, global_ayah: u32, reciter: &str, bitrate: u32) -> String {
        match self {
            ApiEndpoints::Direct { audio_cdn_base, .. } => format!(
                "{}/{}/{}/{}.mp3",
                audio_cdn_base, bitrate, reciter, global_ayah
            ),
            ApiEndpoints::Proxy { base_url } => {
                format!("{}/api/audio?ayahNumber={}", base_url, global_ayah)
            }
        }
    }

    /// Liveness endpoint, only served by the proxy.
    pub fn health_url(&self) -> Option<String> {
        match self {
            ApiEndpoints::Direct { .. } => None,
            ApiEndpoints::Proxy { base_url } => Some(format!("{}/api/health", base_url)),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            ApiEndpoints::Direct {
                api_base,
                audio_cdn_base,
            } => {
                validate_base_url("API base URL", api_base)?;
                validate_base_url("Audio CDN base URL", audio_cdn_base)
            }
            ApiEndpoints::Proxy { base_url } => validate_base_url("Proxy base URL", base_url),
        }
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn validate_base_url(name: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(Error::Config(format!("{} cannot be empty", name)));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::Config(format!(
            "{} must start with http:// or https://, got '{}'",
            name, url
        )));
    }
    Ok(())
}

/// Feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Serve bundled surahs without touching the network
    pub enable_bundled_content: bool,
    /// Keep resolved surahs in the TTL cache
    pub enable_response_cache: bool,
    /// Allow synthesized-speech playback of translations
    pub enable_speech: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_bundled_content: true,
            enable_response_cache: true,
            enable_speech: true,
        }
    }
}

/// Resolved reader configuration.
#[derive(Clone)]
pub struct ReaderConfig {
    pub endpoints: ApiEndpoints,
    pub primary_editions: EditionSet,
    pub backup_editions: EditionSet,
    /// Reciter identifier used when deriving verse audio URLs
    pub reciter: String,
    /// CDN bitrate in kbps
    pub audio_bitrate: u32,
    /// Per-fetch retry schedule
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub event_buffer_size: usize,
    pub features: FeatureFlags,
    pub http_client: Arc<dyn HttpClient>,
    pub clock: Arc<dyn Clock>,
}

impl fmt::Debug for ReaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderConfig")
            .field("endpoints", &self.endpoints)
            .field("primary_editions", &self.primary_editions)
            .field("backup_editions", &self.backup_editions)
            .field("reciter", &self.reciter)
            .field("audio_bitrate", &self.audio_bitrate)
            .field("retry", &self.retry)
            .field("request_timeout", &self.request_timeout)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_capacity", &self.cache_capacity)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("features", &self.features)
            .field("http_client", &"HttpClient { ... }")
            .finish()
    }
}

impl ReaderConfig {
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::default()
    }

    /// Checks every value that cannot be enforced by types.
    pub fn validate(&self) -> Result<()> {
        self.endpoints.validate()?;
        self.primary_editions.validate("Primary")?;
        self.backup_editions.validate("Backup")?;

        if self.reciter.trim().is_empty() {
            return Err(Error::Config("Reciter cannot be empty".to_string()));
        }
        if self.audio_bitrate == 0 {
            return Err(Error::Config("Audio bitrate must be greater than 0".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config(
                "Retry policy needs at least one attempt".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::Config("Request timeout must be non-zero".to_string()));
        }
        if self.cache_ttl.is_zero() {
            return Err(Error::Config("Cache TTL must be non-zero".to_string()));
        }
        if self.cache_capacity == 0 {
            return Err(Error::Config("Cache capacity must be at least 1".to_string()));
        }
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// URL of the recorded audio for a verse under the configured reciter.
    pub fn verse_audio_url(&self, global_ayah: u32) -> String {
        self.endpoints
            .verse_audio_url(global_ayah, &self.reciter, self.audio_bitrate)
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout).map_err(|e| Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: e.to_string(),
    })?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client provided. Use .http_client() or enable the \
                  desktop-shims feature."
            .to_string(),
    })
}

/// Builder for [`ReaderConfig`].
#[derive(Default)]
pub struct ReaderConfigBuilder {
    endpoints: Option<ApiEndpoints>,
    primary_editions: Option<EditionSet>,
    backup_editions: Option<EditionSet>,
    reciter: Option<String>,
    audio_bitrate: Option<u32>,
    retry: Option<RetryPolicy>,
    request_timeout: Option<Duration>,
    cache_ttl: Option<Duration>,
    cache_capacity: Option<usize>,
    event_buffer_size: Option<usize>,
    features: FeatureFlags,
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
}

impl ReaderConfigBuilder {
    pub fn endpoints(mut self, endpoints: ApiEndpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    pub fn primary_editions(mut self, editions: EditionSet) -> Self {
        self.primary_editions = Some(editions);
        self
    }

    pub fn backup_editions(mut self, editions: EditionSet) -> Self {
        self.backup_editions = Some(editions);
        self
    }

    pub fn reciter(mut self, reciter: impl Into<String>) -> Self {
        self.reciter = Some(reciter.into());
        self
    }

    pub fn audio_bitrate(mut self, kbps: u32) -> Self {
        self.audio_bitrate = Some(kbps);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    pub fn enable_bundled_content(mut self, enabled: bool) -> Self {
        self.features.enable_bundled_content = enabled;
        self
    }

    pub fn enable_response_cache(mut self, enabled: bool) -> Self {
        self.features.enable_response_cache = enabled;
        self
    }

    pub fn enable_speech(mut self, enabled: bool) -> Self {
        self.features.enable_speech = enabled;
        self
    }

    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Apply defaults, fill in platform bridges, and validate.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] if no `HttpClient` is available
    /// - [`Error::Config`] if any value fails validation
    pub fn build(self) -> Result<ReaderConfig> {
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let config = ReaderConfig {
            endpoints: self.endpoints.unwrap_or_default(),
            primary_editions: self.primary_editions.unwrap_or_else(EditionSet::primary),
            backup_editions: self.backup_editions.unwrap_or_else(EditionSet::backup),
            reciter: self.reciter.unwrap_or_else(|| DEFAULT_RECITER.to_string()),
            audio_bitrate: self.audio_bitrate.unwrap_or(DEFAULT_AUDIO_BITRATE),
            retry: self.retry.unwrap_or_default(),
            request_timeout,
            cache_ttl: self.cache_ttl.unwrap_or(DEFAULT_CACHE_TTL),
            cache_capacity: self.cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY),
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(crate::events::DEFAULT_EVENT_BUFFER_SIZE),
            features: self.features,
            http_client,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpRequest, HttpResponse};

    struct NoopHttpClient;

    #[async_trait]
    impl HttpClient for NoopHttpClient {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Ok(HttpResponse::new(200, "{}"))
        }
    }

    fn builder() -> ReaderConfigBuilder {
        ReaderConfig::builder().http_client(Arc::new(NoopHttpClient))
    }

    #[test]
    fn test_defaults() {
        let config = builder().build().unwrap();

        assert_eq!(config.endpoints, ApiEndpoints::default());
        assert_eq!(config.primary_editions, EditionSet::primary());
        assert_eq!(config.backup_editions, EditionSet::backup());
        assert_eq!(config.reciter, "ar.alafasy");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay_after(1), Duration::from_millis(1000));
        assert_eq!(config.cache_ttl, Duration::from_secs(86_400));
        assert!(config.features.enable_bundled_content);
    }

    #[test]
    fn test_direct_urls() {
        let endpoints = ApiEndpoints::default();
        let editions = EditionSet::primary();

        assert_eq!(endpoints.catalog_url(), "https://api.alquran.cloud/v1/meta");
        assert_eq!(
            endpoints.surah_text_url(2, ContentLanguage::English, &editions),
            "https://api.alquran.cloud/v1/surah/2/en.asad"
        );
        assert_eq!(
            endpoints.audio_index_url(2, &editions).as_deref(),
            Some("https://api.alquran.cloud/v1/surah/2/ar.alafasy")
        );
        assert_eq!(
            endpoints.verse_audio_url(6231, "ar.alafasy", 128),
            "https://cdn.islamic.network/quran/audio/128/ar.alafasy/6231.mp3"
        );
        assert_eq!(endpoints.health_url(), None);
    }

    #[test]
    fn test_proxy_urls() {
        let endpoints = ApiEndpoints::proxy("http://localhost:3000/");
        let editions = EditionSet::backup();

        assert_eq!(endpoints.catalog_url(), "http://localhost:3000/api/surahs");
        assert_eq!(
            endpoints.surah_text_url(18, ContentLanguage::Urdu, &editions),
            "http://localhost:3000/api/surah?number=18&language=urdu"
        );
        assert_eq!(endpoints.audio_index_url(18, &EditionSet::primary()), None);
        assert_eq!(
            endpoints.verse_audio_url(10, "ar.alafasy", 128),
            "http://localhost:3000/api/audio?ayahNumber=10"
        );
        assert_eq!(
            endpoints.health_url().as_deref(),
            Some("http://localhost:3000/api/health")
        );
    }

    #[test]
    fn test_rejects_relative_base_url() {
        let err = builder()
            .endpoints(ApiEndpoints::proxy("/api"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("Proxy base URL")));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let policy = RetryPolicy::linear(0, Duration::from_secs(1));
        let err = builder().retry_policy(policy).build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_blank_edition() {
        let mut editions = EditionSet::backup();
        editions.urdu = " ".to_string();

        let err = builder().backup_editions(editions).build().unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("urdu")));
    }

    #[test]
    fn test_feature_toggles() {
        let config = builder()
            .enable_bundled_content(false)
            .enable_speech(false)
            .build()
            .unwrap();

        assert!(!config.features.enable_bundled_content);
        assert!(config.features.enable_response_cache);
        assert!(!config.features.enable_speech);
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_http_client() {
        let err = ReaderConfig::builder().build().unwrap_err();
        assert!(matches!(err, Error::CapabilityMissing { capability, .. } if capability == "HttpClient"));
    }
}
