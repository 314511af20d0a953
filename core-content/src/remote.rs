//! # Remote Content Source
//!
//! Fetches surah text from the content API (or the caching proxy) and zips
//! the per-language responses into a [`SurahSession`].
//!
//! One tier issues the Arabic, English and Urdu requests, plus the audio index
//! when the edition set names one, concurrently. The tier waits for all of
//! them and fails if any one fails. Each request is retried on its own with
//! the configured [`RetryPolicy`].
//!
//! Upstream payloads are parsed leniently: absent fields fall back to the
//! bundled catalog or to placeholder text, so schema drift degrades the
//! content instead of failing the load.

use crate::catalog;
use crate::error::{ContentError, Result};
use crate::models::{
    AudioRef, RevelationType, SourceTier, SurahMeta, SurahSession, Translations, Verse,
    ENGLISH_PLACEHOLDER, URDU_PLACEHOLDER,
};
use crate::retry::with_retry;
use bridge_traits::{HttpClient, HttpRequest, RetryPolicy};
use core_runtime::config::{ApiEndpoints, ContentLanguage, EditionSet, ReaderConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SurahPayload {
    number: Option<u16>,
    name: Option<String>,
    english_name: Option<String>,
    english_name_translation: Option<String>,
    number_of_ayahs: Option<u16>,
    revelation_type: Option<String>,
    ayahs: Vec<AyahPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AyahPayload {
    number: Option<u32>,
    text: Option<String>,
    number_in_surah: Option<u16>,
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    /// `/meta` shape, also passed through by the proxy
    Meta { surahs: CatalogReferences },
    /// `/surah` shape
    List(Vec<SurahPayload>),
}

#[derive(Debug, Deserialize)]
struct CatalogReferences {
    references: Vec<SurahPayload>,
}

/// Proxy liveness report from `/api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub cache_size: Option<u64>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

// ============================================================================
// Remote source
// ============================================================================

/// HTTP-backed content source shared by the primary and backup tiers.
pub struct RemoteSource {
    http: Arc<dyn HttpClient>,
    endpoints: ApiEndpoints,
    retry: RetryPolicy,
    timeout: Duration,
    audio: AudioRef,
}

impl RemoteSource {
    pub fn new(
        http: Arc<dyn HttpClient>,
        endpoints: ApiEndpoints,
        retry: RetryPolicy,
        timeout: Duration,
        audio: AudioRef,
    ) -> Self {
        Self {
            http,
            endpoints,
            retry,
            timeout,
            audio,
        }
    }

    pub fn from_config(config: &ReaderConfig) -> Self {
        Self::new(
            Arc::clone(&config.http_client),
            config.endpoints.clone(),
            config.retry.clone(),
            config.request_timeout,
            AudioRef::from_config(config),
        )
    }

    /// Fetch one surah from the editions of a single tier.
    #[instrument(skip(self, editions, tier), fields(tier = %tier))]
    pub async fn fetch_surah(
        &self,
        surah_number: u16,
        editions: &EditionSet,
        tier: SourceTier,
    ) -> Result<SurahSession> {
        let arabic_url = self
            .endpoints
            .surah_text_url(surah_number, ContentLanguage::Arabic, editions);
        let english_url = self
            .endpoints
            .surah_text_url(surah_number, ContentLanguage::English, editions);
        let urdu_url = self
            .endpoints
            .surah_text_url(surah_number, ContentLanguage::Urdu, editions);
        let audio_url = self.endpoints.audio_index_url(surah_number, editions);

        let audio_index = async {
            match &audio_url {
                Some(url) => self.fetch_payload(url, "audio").await.map(Some),
                None => Ok(None),
            }
        };

        let (arabic, english, urdu, audio) = futures::join!(
            self.fetch_payload(&arabic_url, "arabic"),
            self.fetch_payload(&english_url, "english"),
            self.fetch_payload(&urdu_url, "urdu"),
            audio_index,
        );

        let session = self.assemble(surah_number, arabic?, english?, urdu?, audio?, tier)?;
        debug!(
            surah_number,
            verse_count = session.verse_count(),
            "Remote surah assembled"
        );
        Ok(session)
    }

    /// Fetch the surah list from the remote catalog endpoint.
    #[instrument(skip(self))]
    pub async fn fetch_catalog(&self) -> Result<Vec<SurahMeta>> {
        let url = self.endpoints.catalog_url();
        let payload: CatalogPayload = with_retry(&self.retry, "catalog", || self.get_data(&url)).await?;

        let entries = match payload {
            CatalogPayload::Meta { surahs } => surahs.references,
            CatalogPayload::List(list) => list,
        };

        let surahs: Vec<SurahMeta> = entries
            .iter()
            .filter_map(|entry| entry.number.map(|n| merge_meta(n, entry)))
            .collect();

        if surahs.is_empty() {
            return Err(ContentError::Inconsistent(
                "catalog response contained no surahs".to_string(),
            ));
        }
        Ok(surahs)
    }

    /// Query the proxy's health endpoint. Not retried.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoints.health_url().ok_or_else(|| {
            ContentError::Inconsistent("health endpoint is only served by the proxy".to_string())
        })?;
        let response = self.get(&url).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    async fn fetch_payload(&self, url: &str, label: &str) -> Result<SurahPayload> {
        with_retry(&self.retry, label, || self.get_data::<SurahPayload>(url)).await
    }

    async fn get_data<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get(url).await?;
        let envelope: Envelope<T> = serde_json::from_slice(&response.body)?;
        Ok(envelope.data)
    }

    async fn get(&self, url: &str) -> Result<bridge_traits::HttpResponse> {
        let request = HttpRequest::get(url).accept_json().timeout(self.timeout);
        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(ContentError::Status {
                status: response.status,
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    fn assemble(
        &self,
        surah_number: u16,
        arabic: SurahPayload,
        english: SurahPayload,
        urdu: SurahPayload,
        audio: Option<SurahPayload>,
        tier: SourceTier,
    ) -> Result<SurahSession> {
        if let Some(number) = arabic.number {
            if number != surah_number {
                return Err(ContentError::Inconsistent(format!(
                    "requested surah {} but received surah {}",
                    surah_number, number
                )));
            }
        }
        if arabic.ayahs.is_empty() {
            return Err(ContentError::Inconsistent(format!(
                "surah {} has no verses",
                surah_number
            )));
        }

        let mut meta = merge_meta(surah_number, &arabic);
        let declared = arabic.number_of_ayahs.unwrap_or(meta.verse_count);
        if usize::from(declared) != arabic.ayahs.len() {
            return Err(ContentError::Inconsistent(format!(
                "surah {} declares {} verses but {} were returned",
                surah_number,
                declared,
                arabic.ayahs.len()
            )));
        }
        meta.verse_count = declared;

        let first_global = catalog::first_global_ayah(surah_number).unwrap_or(1);
        let audio_ayahs = audio.map(|payload| payload.ayahs).unwrap_or_default();

        let verses = arabic
            .ayahs
            .into_iter()
            .enumerate()
            .map(|(index, ayah)| {
                let number = ayah.number_in_surah.unwrap_or(index as u16 + 1);
                let global_number = ayah.number.unwrap_or(first_global + index as u32);
                let audio_ref = audio_ayahs
                    .get(index)
                    .and_then(|a| a.audio.clone())
                    .or_else(|| ayah.audio.clone())
                    .unwrap_or_else(|| self.audio.url_for(global_number));

                Verse {
                    index,
                    number,
                    global_number,
                    arabic_text: ayah.text.unwrap_or_default(),
                    translations: Translations {
                        english: translation_at(&english, index, ENGLISH_PLACEHOLDER),
                        urdu: translation_at(&urdu, index, URDU_PLACEHOLDER),
                    },
                    audio_ref: Some(audio_ref),
                }
            })
            .collect();

        Ok(SurahSession {
            meta,
            verses,
            source: tier,
        })
    }
}

fn translation_at(payload: &SurahPayload, index: usize, placeholder: &str) -> String {
    payload
        .ayahs
        .get(index)
        .and_then(|ayah| ayah.text.as_deref())
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

/// Remote metadata with gaps filled from the bundled catalog.
fn merge_meta(surah_number: u16, payload: &SurahPayload) -> SurahMeta {
    let fallback = catalog::surah_meta(surah_number);
    let revelation_type = match RevelationType::parse(payload.revelation_type.as_deref()) {
        RevelationType::Unknown => fallback
            .as_ref()
            .map(|m| m.revelation_type)
            .unwrap_or(RevelationType::Unknown),
        known => known,
    };

    SurahMeta {
        number: surah_number,
        name: payload
            .name
            .clone()
            .or_else(|| fallback.as_ref().map(|m| m.name.clone()))
            .unwrap_or_default(),
        english_name: payload
            .english_name
            .clone()
            .or_else(|| fallback.as_ref().map(|m| m.english_name.clone()))
            .unwrap_or_else(|| format!("Surah {}", surah_number)),
        english_name_translation: payload
            .english_name_translation
            .clone()
            .or_else(|| fallback.as_ref().map(|m| m.english_name_translation.clone()))
            .unwrap_or_default(),
        verse_count: payload
            .number_of_ayahs
            .or_else(|| fallback.as_ref().map(|m| m.verse_count))
            .unwrap_or(0),
        revelation_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> SurahPayload {
        serde_json::from_str::<Envelope<SurahPayload>>(json).unwrap().data
    }

    #[test]
    fn missing_fields_do_not_fail_parsing() {
        let parsed = payload(r#"{"code":200,"data":{"ayahs":[{"text":"x"},{}]}}"#);
        assert_eq!(parsed.ayahs.len(), 2);
        assert!(parsed.number.is_none());
        assert!(parsed.ayahs[1].text.is_none());
    }

    #[test]
    fn blank_translation_uses_placeholder() {
        let parsed = payload(r#"{"data":{"ayahs":[{"text":"  "}]}}"#);
        assert_eq!(translation_at(&parsed, 0, ENGLISH_PLACEHOLDER), ENGLISH_PLACEHOLDER);
        assert_eq!(translation_at(&parsed, 5, URDU_PLACEHOLDER), URDU_PLACEHOLDER);
    }

    #[test]
    fn meta_gaps_filled_from_catalog() {
        let parsed = payload(r#"{"data":{"number":36,"revelationType":"bogus","ayahs":[]}}"#);
        let meta = merge_meta(36, &parsed);
        assert_eq!(meta.english_name, "Yaseen");
        assert_eq!(meta.verse_count, 83);
        assert_eq!(meta.revelation_type, RevelationType::Meccan);
    }

    #[test]
    fn catalog_shapes() {
        let meta: Envelope<CatalogPayload> = serde_json::from_str(
            r#"{"data":{"surahs":{"count":1,"references":[{"number":1,"name":"الفاتحة"}]}}}"#,
        )
        .unwrap();
        assert!(matches!(meta.data, CatalogPayload::Meta { .. }));

        let list: Envelope<CatalogPayload> =
            serde_json::from_str(r#"{"data":[{"number":2,"englishName":"Al-Baqara"}]}"#).unwrap();
        assert!(matches!(list.data, CatalogPayload::List(ref l) if l.len() == 1));
    }

    #[test]
    fn health_payload() {
        let status: HealthStatus = serde_json::from_str(
            r#"{"status":"healthy","timestamp":"2024-01-01T00:00:00.000Z","cache_size":12}"#,
        )
        .unwrap();
        assert!(status.is_healthy());
        assert_eq!(status.cache_size, Some(12));
    }
}
