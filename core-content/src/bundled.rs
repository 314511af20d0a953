//! Surahs shipped with the crate so they render without a network round trip.

use crate::catalog;
use crate::models::{AudioRef, SourceTier, SurahSession, Translations, Verse};

struct BundledVerse {
    arabic: &'static str,
    english: &'static str,
    urdu: &'static str,
}

const fn verse(arabic: &'static str, english: &'static str, urdu: &'static str) -> BundledVerse {
    BundledVerse {
        arabic,
        english,
        urdu,
    }
}

const AL_FATIHA: [BundledVerse; 7] = [
    verse(
        "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ",
        "In the name of Allah, the Beneficent, the Merciful.",
        "شروع الله کا نام لے کر جو بڑا مہربان نہایت رحم والا ہے",
    ),
    verse(
        "الْحَمْدُ لِلَّهِ رَبِّ الْعَالَمِينَ",
        "Praise be to Allah, Lord of the Worlds,",
        "سب طرح کی تعریف خدا ہی کو (سزاوار) ہے جو تمام مخلوقات کا پروردگار ہے",
    ),
    verse(
        "الرَّحْمَٰنِ الرَّحِيمِ",
        "The Beneficent, the Merciful.",
        "بڑا مہربان نہایت رحم والا",
    ),
    verse(
        "مَالِكِ يَوْمِ الدِّينِ",
        "Master of the Day of Judgment,",
        "انصاف کے دن کا حاکم",
    ),
    verse(
        "إِيَّاكَ نَعْبُدُ وَإِيَّاكَ نَسْتَعِينُ",
        "Thee (alone) we worship; Thee (alone) we ask for help.",
        "(اے پروردگار) ہم تیری ہی عبادت کرتے ہیں اور تجھ ہی سے مدد مانگتے ہیں",
    ),
    verse(
        "اهْدِنَا الصِّرَاطَ الْمُسْتَقِيمَ",
        "Show us the straight path,",
        "ہم کو سیدھے رستے چلا",
    ),
    verse(
        "صِرَاطَ الَّذِينَ أَنْعَمْتَ عَلَيْهِمْ غَيْرِ الْمَغْضُوبِ عَلَيْهِمْ وَلَا الضَّالِّينَ",
        "The path of those whom Thou hast favoured; Not the (path) of those who earn Thine anger nor of those who go astray.",
        "ان لوگوں کے رستے جن پر تو اپنا فضل وکرم کرتا رہا نہ ان کے جن پر غصے ہوتا رہا اور نہ گمراہوں کے",
    ),
];

const AL_IKHLAS: [BundledVerse; 4] = [
    verse(
        "قُلْ هُوَ اللَّهُ أَحَدٌ",
        "Say: He is Allah, the One!",
        "کہو کہ وہ (ذات پاک جس کا نام) الله (ہے) ایک ہے",
    ),
    verse(
        "اللَّهُ الصَّمَدُ",
        "Allah, the eternally Besought of all!",
        "معبود برحق جو بےنیاز ہے",
    ),
    verse(
        "لَمْ يَلِدْ وَلَمْ يُولَدْ",
        "He begetteth not nor was begotten.",
        "نہ کسی کا باپ ہے اور نہ کسی کا بیٹا",
    ),
    verse(
        "وَلَمْ يَكُن لَّهُ كُفُوًا أَحَدٌ",
        "And there is none comparable unto Him.",
        "اور کوئی اس کا ہمسر نہیں",
    ),
];

const AL_FALAQ: [BundledVerse; 5] = [
    verse(
        "قُلْ أَعُوذُ بِرَبِّ الْفَلَقِ",
        "Say: I seek refuge in the Lord of the Daybreak",
        "کہو کہ میں صبح کے پروردگار کی پناہ مانگتا ہوں",
    ),
    verse(
        "مِن شَرِّ مَا خَلَقَ",
        "From the evil of that which He created;",
        "ہر چیز کی بدی سے جو اس نے پیدا کی",
    ),
    verse(
        "وَمِن شَرِّ غَاسِقٍ إِذَا وَقَبَ",
        "From the evil of the darkness when it is intense,",
        "اور شب تاریکی کی برائی سے جب اس کا اندھیرا چھا جائے",
    ),
    verse(
        "وَمِن شَرِّ النَّفَّاثَاتِ فِي الْعُقَدِ",
        "And from the evil of malignant witchcraft,",
        "اور گنڈوں پر (پڑھ پڑھ کر) پھونکنے والیوں کی برائی سے",
    ),
    verse(
        "وَمِن شَرِّ حَاسِدٍ إِذَا حَسَدَ",
        "And from the evil of the envier when he envieth.",
        "اور حسد کرنے والے کی برائی سے جب حسد کرنے لگے",
    ),
];

const AN_NAS: [BundledVerse; 6] = [
    verse(
        "قُلْ أَعُوذُ بِرَبِّ النَّاسِ",
        "Say: I seek refuge in the Lord of mankind,",
        "کہو کہ میں لوگوں کے پروردگار کی پناہ مانگتا ہوں",
    ),
    verse(
        "مَلِكِ النَّاسِ",
        "The King of mankind,",
        "(یعنی) لوگوں کے حقیقی بادشاہ کی",
    ),
    verse(
        "إِلَٰهِ النَّاسِ",
        "The god of mankind,",
        "لوگوں کے معبود برحق کی",
    ),
    verse(
        "مِن شَرِّ الْوَسْوَاسِ الْخَنَّاسِ",
        "From the evil of the sneaking whisperer,",
        "(شیطان) وسوسہ انداز کی برائی سے جو (خدا کا نام سن کر) پیچھے ہٹ جاتا ہے",
    ),
    verse(
        "الَّذِي يُوَسْوِسُ فِي صُدُورِ النَّاسِ",
        "Who whispereth in the hearts of mankind,",
        "جو لوگوں کے دلوں میں وسوسے ڈالتا ہے",
    ),
    verse(
        "مِنَ الْجِنَّةِ وَالنَّاسِ",
        "Of the jinn and of mankind.",
        "وہ جنّات میں سے (ہو) یا انسانوں میں سے",
    ),
];

/// Surah numbers that resolve without the network.
pub const BUNDLED_SURAHS: [u16; 4] = [1, 112, 113, 114];

fn verses_for(surah_number: u16) -> Option<&'static [BundledVerse]> {
    match surah_number {
        1 => Some(&AL_FATIHA),
        112 => Some(&AL_IKHLAS),
        113 => Some(&AL_FALAQ),
        114 => Some(&AN_NAS),
        _ => None,
    }
}

pub fn is_bundled(surah_number: u16) -> bool {
    verses_for(surah_number).is_some()
}

/// Build a session for a bundled surah, or `None` if it is not bundled.
///
/// Audio URLs come from `audio`, keyed by each verse's global ayah number.
pub fn load(surah_number: u16, audio: &AudioRef) -> Option<SurahSession> {
    let verses = verses_for(surah_number)?;
    let meta = catalog::surah_meta(surah_number)?;
    let first_global = catalog::first_global_ayah(surah_number)?;

    let verses = verses
        .iter()
        .enumerate()
        .map(|(index, bundled)| {
            let global_number = first_global + index as u32;
            Verse {
                index,
                number: index as u16 + 1,
                global_number,
                arabic_text: bundled.arabic.to_string(),
                translations: Translations {
                    english: bundled.english.to_string(),
                    urdu: bundled.urdu.to_string(),
                },
                audio_ref: Some(audio.url_for(global_number)),
            }
        })
        .collect();

    Some(SurahSession {
        meta,
        verses,
        source: SourceTier::Bundled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio() -> AudioRef {
        AudioRef::per_verse(|n| format!("https://cdn.test/{}.mp3", n))
    }

    #[test]
    fn bundled_counts_match_catalog() {
        for number in BUNDLED_SURAHS {
            let session = load(number, &audio()).unwrap();
            assert_eq!(
                session.verses.len(),
                usize::from(session.meta.verse_count),
                "surah {}",
                number
            );
            assert_eq!(session.source, SourceTier::Bundled);
        }
    }

    #[test]
    fn an_nas_global_numbers() {
        let session = load(114, &audio()).unwrap();
        let globals: Vec<u32> = session.verses.iter().map(|v| v.global_number).collect();
        assert_eq!(globals, vec![6231, 6232, 6233, 6234, 6235, 6236]);
        assert_eq!(
            session.verses[5].audio_ref.as_deref(),
            Some("https://cdn.test/6236.mp3")
        );
    }

    #[test]
    fn fatiha_verses_are_numbered_in_order() {
        let session = load(1, &audio()).unwrap();
        for (i, verse) in session.verses.iter().enumerate() {
            assert_eq!(verse.index, i);
            assert_eq!(usize::from(verse.number), i + 1);
            assert_eq!(verse.global_number, i as u32 + 1);
        }
    }

    #[test]
    fn unbundled_surah() {
        assert!(!is_bundled(2));
        assert!(load(2, &audio()).is_none());
    }
}
