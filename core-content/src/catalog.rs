//! Static metadata for all 114 surahs.
//!
//! Used when the remote catalog cannot be reached and to compute global ayah
//! numbers (the 1-based position of a verse across the whole Quran).

use crate::models::{RevelationType, SurahMeta, SURAH_COUNT};

struct CatalogEntry {
    name: &'static str,
    english_name: &'static str,
    english_name_translation: &'static str,
    verse_count: u16,
    revelation_type: RevelationType,
}

const fn entry(
    name: &'static str,
    english_name: &'static str,
    english_name_translation: &'static str,
    verse_count: u16,
    revelation_type: RevelationType,
) -> CatalogEntry {
    CatalogEntry {
        name,
        english_name,
        english_name_translation,
        verse_count,
        revelation_type,
    }
}

use RevelationType::{Meccan, Medinan};

#[rustfmt::skip]
const CATALOG: [CatalogEntry; SURAH_COUNT as usize] = [
    entry("الفاتحة", "Al-Faatiha", "The Opening", 7, Meccan),
    entry("البقرة", "Al-Baqara", "The Cow", 286, Medinan),
    entry("آل عمران", "Aal-i-Imraan", "The Family of Imraan", 200, Medinan),
    entry("النساء", "An-Nisaa", "The Women", 176, Medinan),
    entry("المائدة", "Al-Maaida", "The Table", 120, Medinan),
    entry("الأنعام", "Al-An'aam", "The Cattle", 165, Meccan),
    entry("الأعراف", "Al-A'raaf", "The Heights", 206, Meccan),
    entry("الأنفال", "Al-Anfaal", "The Spoils of War", 75, Medinan),
    entry("التوبة", "At-Tawba", "The Repentance", 129, Medinan),
    entry("يونس", "Yunus", "Jonas", 109, Meccan),
    entry("هود", "Hud", "Hud", 123, Meccan),
    entry("يوسف", "Yusuf", "Joseph", 111, Meccan),
    entry("الرعد", "Ar-Ra'd", "The Thunder", 43, Medinan),
    entry("ابراهيم", "Ibrahim", "Abraham", 52, Meccan),
    entry("الحجر", "Al-Hijr", "The Rock", 99, Meccan),
    entry("النحل", "An-Nahl", "The Bee", 128, Meccan),
    entry("الإسراء", "Al-Israa", "The Night Journey", 111, Meccan),
    entry("الكهف", "Al-Kahf", "The Cave", 110, Meccan),
    entry("مريم", "Maryam", "Mary", 98, Meccan),
    entry("طه", "Taa-Haa", "Taa-Haa", 135, Meccan),
    entry("الأنبياء", "Al-Anbiyaa", "The Prophets", 112, Meccan),
    entry("الحج", "Al-Hajj", "The Pilgrimage", 78, Medinan),
    entry("المؤمنون", "Al-Muminoon", "The Believers", 118, Meccan),
    entry("النور", "An-Noor", "The Light", 64, Medinan),
    entry("الفرقان", "Al-Furqaan", "The Criterion", 77, Meccan),
    entry("الشعراء", "Ash-Shu'araa", "The Poets", 227, Meccan),
    entry("النمل", "An-Naml", "The Ant", 93, Meccan),
    entry("القصص", "Al-Qasas", "The Stories", 88, Meccan),
    entry("العنكبوت", "Al-Ankaboot", "The Spider", 69, Meccan),
    entry("الروم", "Ar-Room", "The Romans", 60, Meccan),
    entry("لقمان", "Luqman", "Luqman", 34, Meccan),
    entry("السجدة", "As-Sajda", "The Prostration", 30, Meccan),
    entry("الأحزاب", "Al-Ahzaab", "The Clans", 73, Medinan),
    entry("سبإ", "Saba", "Sheba", 54, Meccan),
    entry("فاطر", "Faatir", "The Originator", 45, Meccan),
    entry("يس", "Yaseen", "Yaseen", 83, Meccan),
    entry("الصافات", "As-Saaffaat", "Those drawn up in Ranks", 182, Meccan),
    entry("ص", "Saad", "The letter Saad", 88, Meccan),
    entry("الزمر", "Az-Zumar", "The Groups", 75, Meccan),
    entry("غافر", "Ghafir", "The Forgiver", 85, Meccan),
    entry("فصلت", "Fussilat", "Explained in detail", 54, Meccan),
    entry("الشورى", "Ash-Shura", "Consultation", 53, Meccan),
    entry("الزخرف", "Az-Zukhruf", "Ornaments of gold", 89, Meccan),
    entry("الدخان", "Ad-Dukhaan", "The Smoke", 59, Meccan),
    entry("الجاثية", "Al-Jaathiya", "Crouching", 37, Meccan),
    entry("الأحقاف", "Al-Ahqaf", "The Dunes", 35, Meccan),
    entry("محمد", "Muhammad", "Muhammad", 38, Medinan),
    entry("الفتح", "Al-Fath", "The Victory", 29, Medinan),
    entry("الحجرات", "Al-Hujuraat", "The Inner Apartments", 18, Medinan),
    entry("ق", "Qaaf", "The letter Qaaf", 45, Meccan),
    entry("الذاريات", "Adh-Dhaariyat", "The Winnowing Winds", 60, Meccan),
    entry("الطور", "At-Tur", "The Mount", 49, Meccan),
    entry("النجم", "An-Najm", "The Star", 62, Meccan),
    entry("القمر", "Al-Qamar", "The Moon", 55, Meccan),
    entry("الرحمن", "Ar-Rahmaan", "The Beneficent", 78, Medinan),
    entry("الواقعة", "Al-Waaqia", "The Inevitable", 96, Meccan),
    entry("الحديد", "Al-Hadid", "The Iron", 29, Medinan),
    entry("المجادلة", "Al-Mujaadila", "The Pleading Woman", 22, Medinan),
    entry("الحشر", "Al-Hashr", "The Exile", 24, Medinan),
    entry("الممتحنة", "Al-Mumtahana", "She that is to be examined", 13, Medinan),
    entry("الصف", "As-Saff", "The Ranks", 14, Medinan),
    entry("الجمعة", "Al-Jumu'a", "Friday", 11, Medinan),
    entry("المنافقون", "Al-Munaafiqoon", "The Hypocrites", 11, Medinan),
    entry("التغابن", "At-Taghaabun", "Mutual Disillusion", 18, Medinan),
    entry("الطلاق", "At-Talaaq", "Divorce", 12, Medinan),
    entry("التحريم", "At-Tahrim", "The Prohibition", 12, Medinan),
    entry("الملك", "Al-Mulk", "The Sovereignty", 30, Meccan),
    entry("القلم", "Al-Qalam", "The Pen", 52, Meccan),
    entry("الحاقة", "Al-Haaqqa", "The Reality", 52, Meccan),
    entry("المعارج", "Al-Ma'aarij", "The Ascending Stairways", 44, Meccan),
    entry("نوح", "Nooh", "Noah", 28, Meccan),
    entry("الجن", "Al-Jinn", "The Jinn", 28, Meccan),
    entry("المزمل", "Al-Muzzammil", "The Enshrouded One", 20, Meccan),
    entry("المدثر", "Al-Muddaththir", "The Cloaked One", 56, Meccan),
    entry("القيامة", "Al-Qiyaama", "The Resurrection", 40, Meccan),
    entry("الانسان", "Al-Insaan", "Man", 31, Medinan),
    entry("المرسلات", "Al-Mursalaat", "The Emissaries", 50, Meccan),
    entry("النبإ", "An-Naba", "The Announcement", 40, Meccan),
    entry("النازعات", "An-Naazi'aat", "Those who drag forth", 46, Meccan),
    entry("عبس", "Abasa", "He frowned", 42, Meccan),
    entry("التكوير", "At-Takwir", "The Overthrowing", 29, Meccan),
    entry("الإنفطار", "Al-Infitaar", "The Cleaving", 19, Meccan),
    entry("المطففين", "Al-Mutaffifin", "Defrauding", 36, Meccan),
    entry("الإنشقاق", "Al-Inshiqaaq", "The Splitting Open", 25, Meccan),
    entry("البروج", "Al-Burooj", "The Constellations", 22, Meccan),
    entry("الطارق", "At-Taariq", "The Morning Star", 17, Meccan),
    entry("الأعلى", "Al-A'laa", "The Most High", 19, Meccan),
    entry("الغاشية", "Al-Ghaashiya", "The Overwhelming", 26, Meccan),
    entry("الفجر", "Al-Fajr", "The Dawn", 30, Meccan),
    entry("البلد", "Al-Balad", "The City", 20, Meccan),
    entry("الشمس", "Ash-Shams", "The Sun", 15, Meccan),
    entry("الليل", "Al-Lail", "The Night", 21, Meccan),
    entry("الضحى", "Ad-Dhuhaa", "The Morning Hours", 11, Meccan),
    entry("الشرح", "Ash-Sharh", "The Consolation", 8, Meccan),
    entry("التين", "At-Tin", "The Fig", 8, Meccan),
    entry("العلق", "Al-Alaq", "The Clot", 19, Meccan),
    entry("القدر", "Al-Qadr", "The Power, Fate", 5, Meccan),
    entry("البينة", "Al-Bayyina", "The Evidence", 8, Medinan),
    entry("الزلزلة", "Az-Zalzala", "The Earthquake", 8, Medinan),
    entry("العاديات", "Al-Aadiyaat", "The Chargers", 11, Meccan),
    entry("القارعة", "Al-Qaari'a", "The Calamity", 11, Meccan),
    entry("التكاثر", "At-Takaathur", "Competition", 8, Meccan),
    entry("العصر", "Al-Asr", "The Declining Day, Epoch", 3, Meccan),
    entry("الهمزة", "Al-Humaza", "The Traducer", 9, Meccan),
    entry("الفيل", "Al-Fil", "The Elephant", 5, Meccan),
    entry("قريش", "Quraish", "Quraysh", 4, Meccan),
    entry("الماعون", "Al-Maa'un", "Almsgiving", 7, Meccan),
    entry("الكوثر", "Al-Kawthar", "Abundance", 3, Meccan),
    entry("الكافرون", "Al-Kaafiroon", "The Disbelievers", 6, Meccan),
    entry("النصر", "An-Nasr", "Divine Support", 3, Medinan),
    entry("المسد", "Al-Masad", "The Palm Fibre", 5, Meccan),
    entry("الإخلاص", "Al-Ikhlaas", "Sincerity", 4, Meccan),
    entry("الفلق", "Al-Falaq", "The Dawn", 5, Meccan),
    entry("الناس", "An-Naas", "Mankind", 6, Meccan),
];

/// Total number of verses in the Quran.
pub const TOTAL_VERSES: u32 = 6236;

/// Metadata for one surah, or `None` outside 1..=114.
pub fn surah_meta(surah_number: u16) -> Option<SurahMeta> {
    let index = usize::from(surah_number).checked_sub(1)?;
    CATALOG.get(index).map(|entry| SurahMeta {
        number: surah_number,
        name: entry.name.to_string(),
        english_name: entry.english_name.to_string(),
        english_name_translation: entry.english_name_translation.to_string(),
        verse_count: entry.verse_count,
        revelation_type: entry.revelation_type,
    })
}

/// The full bundled list, in surah order.
pub fn all_surahs() -> Vec<SurahMeta> {
    (1..=SURAH_COUNT).filter_map(surah_meta).collect()
}

/// Global ayah number of the first verse of `surah_number`.
pub fn first_global_ayah(surah_number: u16) -> Option<u32> {
    let index = usize::from(surah_number).checked_sub(1)?;
    if index >= CATALOG.len() {
        return None;
    }
    let preceding: u32 = CATALOG[..index]
        .iter()
        .map(|entry| u32::from(entry.verse_count))
        .sum();
    Some(preceding + 1)
}

/// Global ayah number of verse `number_in_surah` of `surah_number`.
pub fn global_ayah(surah_number: u16, number_in_surah: u16) -> Option<u32> {
    let meta = CATALOG.get(usize::from(surah_number).checked_sub(1)?)?;
    if number_in_surah == 0 || number_in_surah > meta.verse_count {
        return None;
    }
    first_global_ayah(surah_number).map(|first| first + u32::from(number_in_surah) - 1)
}
