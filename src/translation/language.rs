//! Language code lookup and supported languages.

use anyhow::{Result, bail};
use isolang::Language;

use crate::ui::Style;

/// Supported language codes (ISO 639-1) and their English display names.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("az", "Azerbaijani"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("es-419", "Spanish (Latin America)"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fil", "Filipino"),
    ("fr", "French"),
    ("ga", "Irish"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ka", "Georgian"),
    ("kk", "Kazakh"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("la", "Latin"),
    ("lo", "Lao"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("mt", "Maltese"),
    ("my", "Myanmar (Burmese)"),
    ("nb", "Norwegian Bokmål"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("ps", "Pashto"),
    ("pt", "Portuguese"),
    ("pt-BR", "Portuguese (Brazil)"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tl", "Tagalog"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese (Simplified)"),
    ("zh-CN", "Chinese (Simplified)"),
    ("zh-HK", "Chinese (Hong Kong)"),
    ("zh-TW", "Chinese (Traditional)"),
];

/// Prints all supported language codes to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Supported language codes (ISO 639-1)"));
    for (code, name) in SUPPORTED_LANGUAGES {
        println!("  {:6} {}", Style::code(code), Style::secondary(name));
    }
}

fn lookup(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// English name of any ISO 639-1 or 639-3 code, table entries first.
fn language_name(code: &str) -> Option<&'static str> {
    lookup(code).or_else(|| {
        let code = code.to_ascii_lowercase();
        let language = match code.len() {
            2 => Language::from_639_1(&code),
            3 => Language::from_639_3(&code),
            _ => None,
        };
        language.map(|language| language.to_name())
    })
}

/// Resolves a language code to the display name sent to the model.
///
/// Table entries win (`ja` -> `Japanese`, `zh-TW` -> `Chinese (Traditional)`);
/// any other ISO 639-1 or 639-3 code resolves to its English name
/// (`zu` -> `Zulu`). Regional variants fall back to their primary subtag and
/// keep the full code for context (`fr-CA` -> `French (fr-CA)`).
///
/// # Errors
///
/// Returns an error if neither the code nor its primary subtag is a known
/// language.
pub fn code_to_language_name(code: &str) -> Result<String> {
    let code = code.trim();
    if let Some(name) = language_name(code) {
        return Ok(name.to_string());
    }

    let primary = code.split(['-', '_']).next().unwrap_or_default();
    if primary != code
        && let Some(name) = language_name(primary)
    {
        return Ok(format!("{name} ({code})"));
    }

    bail!(
        "Invalid language code: '{code}'\n\n\
         Use an ISO 639-1 or 639-3 code such as ja, en, zh, ko, fr, de, es, ...\n\
         Run 'translator languages' to see all supported codes."
    )
}
