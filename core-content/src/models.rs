//! Surah and verse models produced by the resolver.

use core_runtime::config::ReaderConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Number of surahs; valid surah numbers are `1..=SURAH_COUNT`.
pub const SURAH_COUNT: u16 = 114;

/// Shown when the English translation has fewer verses than the Arabic text.
pub const ENGLISH_PLACEHOLDER: &str = "Translation not available";

/// Shown when the Urdu translation has fewer verses than the Arabic text.
pub const URDU_PLACEHOLDER: &str = "اردو ترجمہ دستیاب نہیں";

pub fn is_valid_surah_number(surah_number: u16) -> bool {
    (1..=SURAH_COUNT).contains(&surah_number)
}

/// Active display and voice language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationMode {
    #[default]
    ArabicOnly,
    English,
    Urdu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevelationType {
    Meccan,
    Medinan,
    #[serde(other)]
    Unknown,
}

impl RevelationType {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("meccan") => RevelationType::Meccan,
            Some(value) if value.eq_ignore_ascii_case("medinan") => RevelationType::Medinan,
            _ => RevelationType::Unknown,
        }
    }
}

impl fmt::Display for RevelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevelationType::Meccan => f.write_str("Meccan"),
            RevelationType::Medinan => f.write_str("Medinan"),
            RevelationType::Unknown => f.write_str("Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurahMeta {
    pub number: u16,
    /// Arabic name
    pub name: String,
    /// Transliterated name, e.g. `Al-Faatiha`
    pub english_name: String,
    pub english_name_translation: String,
    pub verse_count: u16,
    pub revelation_type: RevelationType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translations {
    pub english: String,
    pub urdu: String,
}

/// One verse of the loaded surah. Immutable once the session is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// 0-based position within the surah
    pub index: usize,
    /// 1-based verse number within the surah
    pub number: u16,
    /// 1-based position across the whole Quran
    pub global_number: u32,
    pub arabic_text: String,
    pub translations: Translations,
    /// Recorded recitation, if any source provided one
    pub audio_ref: Option<String>,
}

impl Verse {
    /// Translation to display under the Arabic text. `None` in Arabic-only mode.
    pub fn translation_text(&self, mode: TranslationMode) -> Option<&str> {
        match mode {
            TranslationMode::ArabicOnly => None,
            TranslationMode::English => Some(&self.translations.english),
            TranslationMode::Urdu => Some(&self.translations.urdu),
        }
    }

    /// Text handed to the speech synthesizer. Arabic-only mode speaks the
    /// Arabic text itself.
    pub fn speech_text(&self, mode: TranslationMode) -> &str {
        self.translation_text(mode).unwrap_or(&self.arabic_text)
    }
}

/// Which source tier produced a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
    Bundled,
    Cache,
    Primary,
    Backup,
}

impl SourceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTier::Bundled => "bundled",
            SourceTier::Cache => "cache",
            SourceTier::Primary => "primary",
            SourceTier::Backup => "backup",
        }
    }
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved surah: metadata plus its verses in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurahSession {
    pub meta: SurahMeta,
    pub verses: Vec<Verse>,
    pub source: SourceTier,
}

impl SurahSession {
    pub fn surah_number(&self) -> u16 {
        self.meta.number
    }

    pub fn verse(&self, index: usize) -> Option<&Verse> {
        self.verses.get(index)
    }

    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }

    /// Every verse index in order, ready to seed a playback queue.
    pub fn verse_indices(&self) -> Vec<usize> {
        (0..self.verse_count()).collect()
    }

    pub(crate) fn with_source(mut self, source: SourceTier) -> Self {
        self.source = source;
        self
    }
}

/// How a verse's recorded audio URL is obtained.
#[derive(Clone)]
pub enum AudioRef {
    /// The same URL for every verse.
    Fixed(String),
    /// Derived from the verse's global ayah number.
    PerVerse(Arc<dyn Fn(u32) -> String + Send + Sync>),
}

impl AudioRef {
    pub fn per_verse<F>(f: F) -> Self
    where
        F: Fn(u32) -> String + Send + Sync + 'static,
    {
        AudioRef::PerVerse(Arc::new(f))
    }

    /// Per-verse URLs for the configured endpoints and reciter.
    pub fn from_config(config: &ReaderConfig) -> Self {
        let endpoints = config.endpoints.clone();
        let reciter = config.reciter.clone();
        let bitrate = config.audio_bitrate;
        Self::per_verse(move |global_ayah| endpoints.verse_audio_url(global_ayah, &reciter, bitrate))
    }

    pub fn url_for(&self, global_ayah: u32) -> String {
        match self {
            AudioRef::Fixed(url) => url.clone(),
            AudioRef::PerVerse(derive) => derive(global_ayah),
        }
    }
}

impl fmt::Debug for AudioRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioRef::Fixed(url) => f.debug_tuple("Fixed").field(url).finish(),
            AudioRef::PerVerse(_) => f.write_str("PerVerse(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse() -> Verse {
        Verse {
            index: 0,
            number: 1,
            global_number: 6222,
            arabic_text: "قُلْ هُوَ اللَّهُ أَحَدٌ".to_string(),
            translations: Translations {
                english: "Say: He is Allah, the One!".to_string(),
                urdu: URDU_PLACEHOLDER.to_string(),
            },
            audio_ref: None,
        }
    }

    #[test]
    fn translation_text_follows_mode() {
        let verse = verse();
        assert_eq!(verse.translation_text(TranslationMode::ArabicOnly), None);
        assert_eq!(
            verse.translation_text(TranslationMode::English),
            Some("Say: He is Allah, the One!")
        );
        assert_eq!(
            verse.translation_text(TranslationMode::Urdu),
            Some(URDU_PLACEHOLDER)
        );
    }

    #[test]
    fn arabic_only_speaks_arabic() {
        let verse = verse();
        assert_eq!(verse.speech_text(TranslationMode::ArabicOnly), verse.arabic_text);
        assert_eq!(
            verse.speech_text(TranslationMode::English),
            verse.translations.english
        );
    }

    #[test]
    fn surah_number_range() {
        assert!(!is_valid_surah_number(0));
        assert!(is_valid_surah_number(1));
        assert!(is_valid_surah_number(114));
        assert!(!is_valid_surah_number(115));
    }

    #[test]
    fn audio_ref_variants() {
        let fixed = AudioRef::Fixed("https://example.com/bismillah.mp3".to_string());
        assert_eq!(fixed.url_for(7), "https://example.com/bismillah.mp3");

        let per_verse = AudioRef::per_verse(|n| format!("https://cdn.test/{}.mp3", n));
        assert_eq!(per_verse.url_for(6231), "https://cdn.test/6231.mp3");
        assert_eq!(format!("{:?}", per_verse), "PerVerse(..)");
    }

    #[test]
    fn revelation_type_parsing_is_lenient() {
        assert_eq!(RevelationType::parse(Some("Meccan")), RevelationType::Meccan);
        assert_eq!(RevelationType::parse(Some(" medinan ")), RevelationType::Medinan);
        assert_eq!(RevelationType::parse(Some("Makki")), RevelationType::Unknown);
        assert_eq!(RevelationType::parse(None), RevelationType::Unknown);
    }
}
