//! # Voice Profiles
//!
//! Language tag and prosody used when a verse is spoken by the speech
//! synthesizer, one profile per translation mode.

use bridge_traits::Utterance;
use core_content::TranslationMode;
use serde::{Deserialize, Serialize};

/// Voice parameters for one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// BCP 47 language tag
    pub lang: String,
    /// Speaking rate, 1.0 is the engine default
    pub rate: f32,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl VoiceProfile {
    pub fn new(lang: impl Into<String>, rate: f32) -> Self {
        Self {
            lang: lang.into(),
            rate,
            pitch: default_pitch(),
            volume: default_volume(),
        }
    }

    pub fn utterance(&self, text: impl Into<String>) -> Utterance {
        Utterance {
            text: text.into(),
            lang: self.lang.clone(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        }
    }

    fn validate(&self, name: &str) -> Result<(), String> {
        if self.lang.trim().is_empty() {
            return Err(format!("{} voice needs a language tag", name));
        }
        if !(0.1..=10.0).contains(&self.rate) {
            return Err(format!("{} voice rate must be between 0.1 and 10.0", name));
        }
        if !(0.0..=2.0).contains(&self.pitch) {
            return Err(format!("{} voice pitch must be between 0.0 and 2.0", name));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(format!("{} voice volume must be between 0.0 and 1.0", name));
        }
        Ok(())
    }
}

/// Profiles keyed by [`TranslationMode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfiles {
    #[serde(default = "default_english")]
    pub english: VoiceProfile,
    #[serde(default = "default_urdu")]
    pub urdu: VoiceProfile,
    /// Used in Arabic-only mode, which speaks the Arabic text itself.
    #[serde(default = "default_arabic")]
    pub arabic: VoiceProfile,
}

impl Default for VoiceProfiles {
    fn default() -> Self {
        Self {
            english: default_english(),
            urdu: default_urdu(),
            arabic: default_arabic(),
        }
    }
}

impl VoiceProfiles {
    pub fn for_mode(&self, mode: TranslationMode) -> &VoiceProfile {
        match mode {
            TranslationMode::ArabicOnly => &self.arabic,
            TranslationMode::English => &self.english,
            TranslationMode::Urdu => &self.urdu,
        }
    }

    /// Validate every profile.
    pub fn validate(&self) -> Result<(), String> {
        self.english.validate("English")?;
        self.urdu.validate("Urdu")?;
        self.arabic.validate("Arabic")
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_pitch() -> f32 {
    1.0
}

fn default_volume() -> f32 {
    0.8
}

fn default_english() -> VoiceProfile {
    VoiceProfile::new("en-US", 0.8)
}

fn default_urdu() -> VoiceProfile {
    VoiceProfile::new("ur-PK", 0.7)
}

fn default_arabic() -> VoiceProfile {
    VoiceProfile::new("ar-SA", 0.8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profiles_per_language() {
        let voices = VoiceProfiles::default();

        let english = voices.for_mode(TranslationMode::English);
        assert_eq!(english.lang, "en-US");
        assert_eq!(english.rate, 0.8);

        let urdu = voices.for_mode(TranslationMode::Urdu);
        assert_eq!(urdu.lang, "ur-PK");
        assert_eq!(urdu.rate, 0.7);

        let arabic = voices.for_mode(TranslationMode::ArabicOnly);
        assert_eq!(arabic.lang, "ar-SA");

        for profile in [english, urdu, arabic] {
            assert_eq!(profile.pitch, 1.0);
            assert_eq!(profile.volume, 0.8);
        }
        assert!(voices.validate().is_ok());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let voices: VoiceProfiles =
            serde_json::from_str(r#"{"urdu":{"lang":"ur-IN","rate":0.9}}"#).unwrap();
        assert_eq!(voices.urdu.lang, "ur-IN");
        assert_eq!(voices.urdu.volume, 0.8);
        assert_eq!(voices.english, default_english());
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let mut voices = VoiceProfiles::default();
        voices.english.volume = 1.5;
        assert!(voices.validate().unwrap_err().contains("volume"));
    }

    #[test]
    fn utterance_carries_profile() {
        let utterance = VoiceProfiles::default()
            .for_mode(TranslationMode::Urdu)
            .utterance("کہو کہ وہ الله ایک ہے");
        assert_eq!(utterance.lang, "ur-PK");
        assert_eq!(utterance.rate, 0.7);
        assert_eq!(utterance.text, "کہو کہ وہ الله ایک ہے");
    }
}
