//! Supported document languages.

use std::{fmt, str};

use serde::{Deserialize, Serialize};
use stop_words::LANGUAGE;

/// A document language with a stop-word list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// German.
    De,
    /// French.
    Fr,
    /// Spanish.
    Es,
    /// Italian.
    It,
    /// Portuguese.
    Pt,
    /// Dutch.
    Nl,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Self; 7] = [
        Self::En,
        Self::De,
        Self::Fr,
        Self::Es,
        Self::It,
        Self::Pt,
        Self::Nl,
    ];

    /// Returns the two-letter tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Es => "es",
            Self::It => "it",
            Self::Pt => "pt",
            Self::Nl => "nl",
        }
    }

    /// Parses a tag, falling back to English for anything unrecognized.
    pub fn from_tag_or_default(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    /// Returns the raw stop-word list for this language.
    pub(crate) fn stop_word_list(self) -> &'static [&'static str] {
        let language = match self {
            Self::En => LANGUAGE::English,
            Self::De => LANGUAGE::German,
            Self::Fr => LANGUAGE::French,
            Self::Es => LANGUAGE::Spanish,
            Self::It => LANGUAGE::Italian,
            Self::Pt => LANGUAGE::Portuguese,
            Self::Nl => LANGUAGE::Dutch,
        };
        stop_words::get(language)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "de" | "german" => Ok(Self::De),
            "fr" | "french" => Ok(Self::Fr),
            "es" | "spanish" => Ok(Self::Es),
            "it" | "italian" => Ok(Self::It),
            "pt" | "portuguese" => Ok(Self::Pt),
            "nl" | "dutch" => Ok(Self::Nl),
            _ => Err(format!(
                "unknown language '{s}', expected one of: en, de, fr, es, it, pt, nl"
            )),
        }
    }
}
