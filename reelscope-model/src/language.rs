/// A display language the catalog can localize responses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// BCP-47 style code sent as the `language` query parameter
    pub code: &'static str,
    /// Native name of the language
    pub name: &'static str,
    pub flag: &'static str,
}

/// Language used when nothing usable has been persisted.
pub const DEFAULT_LANGUAGE_CODE: &str = "tr-TR";

pub const SUPPORTED_LANGUAGES: [Language; 8] = [
    Language { code: "en-US", name: "English", flag: "🇺🇸" },
    Language { code: "tr-TR", name: "Türkçe", flag: "🇹🇷" },
    Language { code: "es-ES", name: "Español", flag: "🇪🇸" },
    Language { code: "fr-FR", name: "Français", flag: "🇫🇷" },
    Language { code: "de-DE", name: "Deutsch", flag: "🇩🇪" },
    Language { code: "it-IT", name: "Italiano", flag: "🇮🇹" },
    Language { code: "ja-JP", name: "日本語", flag: "🇯🇵" },
    Language { code: "ko-KR", name: "한국어", flag: "🇰🇷" },
];

/// Look up a supported language, ignoring ASCII case.
pub fn find_language(code: &str) -> Option<&'static Language> {
    let code = code.trim();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| lang.code.eq_ignore_ascii_case(code))
}
