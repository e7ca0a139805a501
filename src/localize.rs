//! Translation of user-facing strings.
//!
//! A [`Localizer`] is injected wherever text is displayed; there is no
//! global language state. Unknown keys either pass through unchanged
//! ([`LocalizationMode::Lenient`]) or fail ([`LocalizationMode::Strict`]).

use std::borrow::Cow;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Swedish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalizationMode {
    /// Unknown keys are returned unchanged.
    #[default]
    Lenient,
    /// Unknown keys fail with [`LocalizationError::MissingKey`].
    Strict,
}

#[derive(Debug, Error)]
pub enum LocalizationError {
    #[error("no translation for \"{0}\"")]
    MissingKey(String),
}

const SWEDISH: &[(&str, &str)] = &[
    // Titles
    ("Simplest model", "Enklaste modellen"),
    ("With greenhouse effect", "Med växthuseffekt"),
    (
        "With greenhouse effect and solar absorption",
        "Med växthuseffekt och absorption av solstrålning",
    ),
    // Descriptions
    ("Surface temperature", "Markens temperatur"),
    ("Atmospheric temperature", "Atmosfärens temperatur"),
    // Sliders
    ("Temperature", "Temperatur"),
    (
        "Solar intensity (% of present value)",
        "Solens intensitet (% av dagens värde)",
    ),
    ("Planet albedo (fraction)", "Planetens albedo (andel)"),
    ("Infrared emissivity (fraction)", "Infraröd emissivitet (andel)"),
    (
        "Optical absorptivity (fraction)",
        "Optisk absorptionsförmåga (andel)",
    ),
];

/// Side-effect-free string translator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Localizer {
    language: Language,
    mode: LocalizationMode,
}

impl Localizer {
    pub fn new(language: Language, mode: LocalizationMode) -> Self {
        Self { language, mode }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Translate `text` into the configured language.
    ///
    /// English is the key language, so it always passes through. For other
    /// languages a missing table entry is an error only in strict mode.
    pub fn localize<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, LocalizationError> {
        let table = match self.language {
            Language::English => return Ok(Cow::Borrowed(text)),
            Language::Swedish => SWEDISH,
        };
        match table.iter().find(|(key, _)| *key == text) {
            Some((_, translated)) => Ok(Cow::Borrowed(translated)),
            None => match self.mode {
                LocalizationMode::Lenient => Ok(Cow::Borrowed(text)),
                LocalizationMode::Strict => {
                    Err(LocalizationError::MissingKey(text.to_string()))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_passes_through() {
        let loc = Localizer::default();
        assert_eq!(loc.localize("Surface temperature").unwrap(), "Surface temperature");
    }

    #[test]
    fn swedish_translates_known_keys() {
        let loc = Localizer::new(Language::Swedish, LocalizationMode::Lenient);
        assert_eq!(loc.localize("Surface temperature").unwrap(), "Markens temperatur");
        assert_eq!(loc.localize("Simplest model").unwrap(), "Enklaste modellen");
    }

    #[test]
    fn lenient_mode_passes_unknown_keys_through() {
        let loc = Localizer::new(Language::Swedish, LocalizationMode::Lenient);
        assert_eq!(loc.localize("Not a key").unwrap(), "Not a key");
    }

    #[test]
    fn strict_mode_fails_on_unknown_keys() {
        let loc = Localizer::new(Language::Swedish, LocalizationMode::Strict);
        assert!(matches!(
            loc.localize("Not a key"),
            Err(LocalizationError::MissingKey(_))
        ));
    }
}
