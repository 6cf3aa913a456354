// src/types/language.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Languages the interview generator supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    En,
    Es,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported language: {0}. Use fr, en or es")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    pub const ALL: [Language; 3] = [Language::Fr, Language::En, Language::Es];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
            Language::Es => "es",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::Fr => "French",
            Language::En => "English",
            Language::Es => "Spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fr" | "french" | "français" | "francais" => Ok(Language::Fr),
            "en" | "english" | "anglais" => Ok(Language::En),
            "es" | "spanish" | "español" | "espanol" => Ok(Language::Es),
            _ => Err(UnsupportedLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!("fr".parse::<Language>(), Ok(Language::Fr));
        assert_eq!("French".parse::<Language>(), Ok(Language::Fr));
        assert_eq!(" EN ".parse::<Language>(), Ok(Language::En));
        assert_eq!("español".parse::<Language>(), Ok(Language::Es));
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_codes_and_labels() {
        let codes: Vec<_> = Language::ALL.iter().map(Language::code).collect();
        assert_eq!(codes, vec!["fr", "en", "es"]);
        assert_eq!(Language::Es.label(), "Spanish");
        assert_eq!(Language::En.to_string(), "en");
    }
}
