//! Integration tests for the source resolver's fallback chain.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{Clock, HttpClient, HttpRequest, HttpResponse, RetryPolicy};
use chrono::{DateTime, TimeZone, Utc};
use core_content::{
    ContentError, SourceResolver, SourceTier, ENGLISH_PLACEHOLDER, URDU_PLACEHOLDER,
};
use core_runtime::config::{ApiEndpoints, EditionSet, ReaderConfig};
use core_runtime::events::{ContentEvent, CoreEvent, EventBus};
use mockall::mock;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        async fn is_connected(&self) -> bool;
    }
}

struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        )))
    }

    fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += chrono::Duration::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

fn editions(prefix: &str) -> EditionSet {
    EditionSet {
        arabic: format!("{}-ar", prefix),
        english: format!("{}-en", prefix),
        urdu: format!("{}-ur", prefix),
        audio: None,
    }
}

fn builder(http: MockHttpClient) -> core_runtime::config::ReaderConfigBuilder {
    ReaderConfig::builder()
        .http_client(Arc::new(http))
        .primary_editions(editions("primary"))
        .backup_editions(editions("backup"))
}

/// `{"code":200,"data":{...}}` for a surah with one ayah per text.
fn surah_body(number: u16, first_global: u32, texts: &[&str]) -> HttpResponse {
    let ayahs: Vec<_> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            json!({
                "number": first_global + i as u32,
                "text": text,
                "numberInSurah": i + 1,
            })
        })
        .collect();

    let body = json!({
        "code": 200,
        "status": "OK",
        "data": {
            "number": number,
            "name": "سورة",
            "englishName": format!("Surah {}", number),
            "englishNameTranslation": "Test",
            "numberOfAyahs": texts.len(),
            "revelationType": "Meccan",
            "ayahs": ayahs,
        }
    });
    HttpResponse::new(200, body.to_string())
}

fn unavailable() -> HttpResponse {
    HttpResponse::new(503, r#"{"error":"Service unavailable"}"#)
}

#[tokio::test]
async fn bundled_surah_makes_no_requests() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let resolver = SourceResolver::new(&builder(http).build().unwrap());
    let session = resolver.resolve(1).await.unwrap();

    assert_eq!(session.source, SourceTier::Bundled);
    assert_eq!(session.verses.len(), 7);
    assert_eq!(session.verses.len(), usize::from(session.meta.verse_count));
    assert_eq!(
        session.verses[0].audio_ref.as_deref(),
        Some("https://cdn.islamic.network/quran/audio/128/ar.alafasy/1.mp3")
    );
}

#[tokio::test]
async fn invalid_numbers_are_rejected_before_io() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let resolver = SourceResolver::new(&builder(http).build().unwrap());

    for number in [0, 115, 999] {
        let err = resolver.resolve(number).await.unwrap_err();
        assert!(matches!(err, ContentError::InvalidSurahNumber(n) if n == number));
        assert!(!err.is_retryable());
    }
}

#[tokio::test]
async fn short_translation_is_padded_with_placeholders() {
    let mut http = MockHttpClient::new();
    http.expect_execute().returning(|request| {
        let url = request.url.as_str();
        Ok(if url.ends_with("/surah/1/primary-ar") {
            surah_body(1, 1, &["a1", "a2", "a3"])
        } else if url.ends_with("/surah/1/primary-en") {
            surah_body(1, 1, &["e1", "e2"])
        } else if url.ends_with("/surah/1/primary-ur") {
            surah_body(1, 1, &["u1"])
        } else {
            unavailable()
        })
    });

    let config = builder(http).enable_bundled_content(false).build().unwrap();
    let session = SourceResolver::new(&config).resolve(1).await.unwrap();

    assert_eq!(session.source, SourceTier::Primary);
    assert_eq!(session.verses.len(), 3);
    assert_eq!(session.verses[1].translations.english, "e2");
    assert_eq!(session.verses[2].translations.english, ENGLISH_PLACEHOLDER);
    assert_eq!(session.verses[0].translations.urdu, "u1");
    assert_eq!(session.verses[1].translations.urdu, URDU_PLACEHOLDER);
    assert_eq!(session.verses[2].arabic_text, "a3");
}

#[tokio::test(start_paused = true)]
async fn primary_failure_falls_back_to_backup() {
    let mut http = MockHttpClient::new();
    http.expect_execute().returning(|request| {
        let url = request.url.as_str();
        Ok(if url.contains("/surah/2/backup-") {
            surah_body(2, 8, &["x"; 286])
        } else {
            unavailable()
        })
    });

    let bus = EventBus::new(64);
    let mut events = bus.stream();
    let resolver = SourceResolver::new(&builder(http).build().unwrap()).with_event_bus(bus);

    let session = resolver.resolve(2).await.unwrap();
    assert_eq!(session.source, SourceTier::Backup);
    assert_eq!(session.verses.len(), 286);
    assert_eq!(session.verses[0].global_number, 8);

    let events = events.drain();
    assert!(events.contains(&CoreEvent::Content(ContentEvent::LoadStarted {
        surah_number: 2
    })));
    assert!(events.iter().any(|e| matches!(
        e,
        CoreEvent::Content(ContentEvent::TierFailed { tier, .. }) if tier == "primary"
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        CoreEvent::Content(ContentEvent::LoadCompleted { source, .. }) if source == "backup"
    )));
}

#[tokio::test(start_paused = true)]
async fn every_tier_failing_reports_source_unavailable() {
    let mut http = MockHttpClient::new();
    // 2 tiers x 3 languages x 3 attempts
    http.expect_execute()
        .times(18)
        .returning(|_| Err(BridgeError::OperationFailed("connection refused".to_string())));

    let bus = EventBus::new(64);
    let mut failures = bus
        .stream()
        .filter(|e| matches!(e, CoreEvent::Content(ContentEvent::LoadFailed { .. })));
    let resolver = SourceResolver::new(&builder(http).build().unwrap()).with_event_bus(bus);

    let err = resolver.resolve(18).await.unwrap_err();
    match &err {
        ContentError::SourceUnavailable {
            surah_number,
            last_error,
        } => {
            assert_eq!(*surah_number, 18);
            assert!(last_error.contains("connection refused"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());

    let failed = failures.drain();
    assert_eq!(failed.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn retry_waits_linearly_between_attempts() {
    let arabic_calls = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&arabic_calls);

    let mut http = MockHttpClient::new();
    http.expect_execute().returning(move |request| {
        let url = request.url.as_str();
        if url.ends_with("primary-ar") {
            let mut calls = counter.lock().unwrap();
            *calls += 1;
            if *calls < 3 {
                return Err(BridgeError::Timeout(Duration::from_secs(30)));
            }
        }
        Ok(surah_body(112, 6222, &["1", "2", "3", "4"]))
    });

    let config = builder(http).enable_bundled_content(false).build().unwrap();
    let resolver = SourceResolver::new(&config);

    let started = Instant::now();
    let session = resolver.resolve(112).await.unwrap();

    assert_eq!(session.source, SourceTier::Primary);
    assert_eq!(*arabic_calls.lock().unwrap(), 3);
    assert_eq!(started.elapsed(), Duration::from_millis(3000));
}

#[tokio::test]
async fn inconsistent_verse_count_fails_the_tier() {
    let mut http = MockHttpClient::new();
    http.expect_execute().returning(|request| {
        let url = request.url.as_str();
        if url.ends_with("primary-ar") {
            let mut response = surah_body(3, 294, &["only one"]);
            let mut body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
            body["data"]["numberOfAyahs"] = json!(200);
            response.body = body.to_string().into();
            Ok(response)
        } else {
            Ok(surah_body(3, 294, &["x"; 200]))
        }
    });

    let config = builder(http)
        .retry_policy(RetryPolicy::no_retry())
        .build()
        .unwrap();
    let session = SourceResolver::new(&config).resolve(3).await.unwrap();

    assert_eq!(session.source, SourceTier::Backup);
    assert_eq!(session.verses.len(), 200);
}

#[tokio::test]
async fn resolved_surahs_are_cached_until_ttl() {
    let mut http = MockHttpClient::new();
    // one tier, three languages, fetched twice
    http.expect_execute()
        .times(6)
        .returning(|_| Ok(surah_body(108, 6205, &["a", "b", "c"])));

    let clock = ManualClock::new();
    let config = builder(http)
        .cache_ttl(Duration::from_secs(3600))
        .clock(clock.clone())
        .build()
        .unwrap();
    let resolver = SourceResolver::new(&config);

    assert_eq!(resolver.resolve(108).await.unwrap().source, SourceTier::Primary);
    assert_eq!(resolver.resolve(108).await.unwrap().source, SourceTier::Cache);
    assert_eq!(resolver.cached_count(), 1);

    clock.advance(Duration::from_secs(3600));
    assert_eq!(resolver.resolve(108).await.unwrap().source, SourceTier::Primary);
}

#[tokio::test]
async fn proxy_mode_requests_languages_and_derives_audio() {
    let urls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&urls);

    let mut http = MockHttpClient::new();
    http.expect_execute().returning(move |request| {
        seen.lock().unwrap().push(request.url.clone());
        Ok(surah_body(108, 6205, &["a", "b", "c"]))
    });

    let config = builder(http)
        .endpoints(ApiEndpoints::proxy("http://localhost:3000"))
        .build()
        .unwrap();
    let session = SourceResolver::new(&config).resolve(108).await.unwrap();

    let mut requested = urls.lock().unwrap().clone();
    requested.sort();
    assert_eq!(
        requested,
        vec![
            "http://localhost:3000/api/surah?number=108&language=arabic",
            "http://localhost:3000/api/surah?number=108&language=english",
            "http://localhost:3000/api/surah?number=108&language=urdu",
        ]
    );
    assert_eq!(
        session.verses[2].audio_ref.as_deref(),
        Some("http://localhost:3000/api/audio?ayahNumber=6207")
    );
}

#[tokio::test]
async fn audio_index_overrides_derived_urls() {
    let mut http = MockHttpClient::new();
    http.expect_execute().returning(|request| {
        if request.url.ends_with("primary-audio") {
            let body = json!({
                "data": {
                    "number": 108,
                    "ayahs": [
                        {"number": 6205, "audio": "https://audio.test/6205.mp3"},
                        {"number": 6206, "audio": "https://audio.test/6206.mp3"},
                        {"number": 6207},
                    ]
                }
            });
            Ok(HttpResponse::new(200, body.to_string()))
        } else {
            Ok(surah_body(108, 6205, &["a", "b", "c"]))
        }
    });

    let mut primary = editions("primary");
    primary.audio = Some("primary-audio".to_string());
    let config = builder(http).primary_editions(primary).build().unwrap();
    let session = SourceResolver::new(&config).resolve(108).await.unwrap();

    assert_eq!(
        session.verses[0].audio_ref.as_deref(),
        Some("https://audio.test/6205.mp3")
    );
    assert_eq!(
        session.verses[2].audio_ref.as_deref(),
        Some("https://cdn.islamic.network/quran/audio/128/ar.alafasy/6207.mp3")
    );
}

#[tokio::test]
async fn catalog_falls_back_to_bundled_list() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(1).returning(|_| Ok(unavailable()));

    let bus = EventBus::new(8);
    let mut events = bus.stream();
    let config = builder(http)
        .retry_policy(RetryPolicy::no_retry())
        .build()
        .unwrap();
    let resolver = SourceResolver::new(&config).with_event_bus(bus);

    let surahs = resolver.list_surahs().await;
    assert_eq!(surahs.len(), 114);
    assert_eq!(surahs[113].english_name, "An-Naas");
    assert!(events
        .drain()
        .iter()
        .any(|e| matches!(e, CoreEvent::Content(ContentEvent::CatalogFallback { .. }))));
}

#[tokio::test]
async fn catalog_from_meta_endpoint() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|request| request.url == "https://api.alquran.cloud/v1/meta")
        .returning(|_| {
            let body = json!({
                "code": 200,
                "data": {
                    "surahs": {
                        "count": 2,
                        "references": [
                            {"number": 1, "name": "سُورَةُ ٱلْفَاتِحَةِ", "englishName": "Al-Faatiha",
                             "englishNameTranslation": "The Opening", "numberOfAyahs": 7,
                             "revelationType": "Meccan"},
                            {"number": 2, "englishName": "Al-Baqara"}
                        ]
                    }
                }
            });
            Ok(HttpResponse::new(200, body.to_string()))
        });

    let resolver = SourceResolver::new(&builder(http).build().unwrap());
    let surahs = resolver.list_surahs().await;

    assert_eq!(surahs.len(), 2);
    assert_eq!(surahs[0].verse_count, 7);
    assert_eq!(surahs[1].verse_count, 286);
}

#[tokio::test]
async fn health_is_proxy_only() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|request| request.url == "http://localhost:3000/api/health")
        .times(1)
        .returning(|_| {
            Ok(HttpResponse::new(
                200,
                r#"{"status":"healthy","timestamp":"2024-03-01T12:00:00.000Z","cache_size":4}"#,
            ))
        });

    let config = builder(http)
        .endpoints(ApiEndpoints::proxy("http://localhost:3000"))
        .build()
        .unwrap();
    let status = SourceResolver::new(&config).health().await.unwrap();
    assert!(status.is_healthy());
    assert_eq!(status.cache_size, Some(4));

    let mut direct = MockHttpClient::new();
    direct.expect_execute().times(0);
    let resolver = SourceResolver::new(&builder(direct).build().unwrap());
    assert!(matches!(
        resolver.health().await,
        Err(ContentError::Inconsistent(_))
    ));
}
