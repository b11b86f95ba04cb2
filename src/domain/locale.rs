//! POSIX locale names: `language[_COUNTRY][.codeset][@modifier]`.
//!
//! The format locale (numbers, dates) and the display locale (UI language)
//! are read from different environment categories and may differ.

use serde::Serialize;

use crate::encoding::{normalize_codeset, ISO_8859_15};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Locale {
    pub language: Option<String>,
    pub script: Option<String>,
    pub country: Option<String>,
    pub variant: Option<String>,
    /// Codeset named in the locale string, normalized.
    pub codeset: Option<String>,
}

/// Which locale category a lookup is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Format,
    Display,
}

impl Category {
    /// Environment variables consulted, in order of precedence.
    pub fn env_vars(self) -> [&'static str; 3] {
        match self {
            Category::Format => ["LC_ALL", "LC_CTYPE", "LANG"],
            Category::Display => ["LC_ALL", "LC_MESSAGES", "LANG"],
        }
    }
}

impl Locale {
    /// Parse a POSIX locale name. Returns `None` for an empty name.
    pub fn parse(name: &str) -> Option<Locale> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let (rest, modifier) = match name.split_once('@') {
            Some((rest, modifier)) => (rest, Some(modifier)),
            None => (name, None),
        };
        let (rest, codeset) = match rest.split_once('.') {
            Some((rest, codeset)) => (rest, Some(codeset)),
            None => (rest, None),
        };
        let (language, country) = match rest.split_once('_') {
            Some((language, country)) => (language, Some(country)),
            None => (rest, None),
        };
        let codeset = codeset.and_then(|c| non_empty(normalize_codeset(c).to_string()));

        if language == "C" || language == "POSIX" {
            return Some(Locale {
                language: Some("en".into()),
                codeset,
                ..Locale::default()
            });
        }

        let mut locale = Locale {
            language: non_empty(language.to_ascii_lowercase()),
            country: country.and_then(|c| non_empty(c.to_ascii_uppercase())),
            codeset,
            ..Locale::default()
        };

        match modifier {
            Some("euro") => {
                if locale.codeset.is_none() {
                    locale.codeset = Some(ISO_8859_15.to_string());
                }
            }
            Some("latin") => locale.script = Some("Latn".into()),
            Some("cyrillic") => locale.script = Some("Cyrl".into()),
            Some("devanagari") => locale.script = Some("Deva".into()),
            Some(other) => locale.variant = non_empty(other.to_ascii_uppercase()),
            None => {}
        }

        Some(locale)
    }

    /// Resolve the locale name for `category` from an environment lookup.
    ///
    /// Empty values are skipped; with nothing set the result is `C`.
    pub fn resolve_name<F>(category: Category, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        category
            .env_vars()
            .iter()
            .filter_map(|&var| lookup(var))
            .find(|value| !value.is_empty())
            .unwrap_or_else(|| "C".to_string())
    }

    /// Resolve and parse the locale for `category` from the process environment.
    pub fn from_env(category: Category) -> Option<Locale> {
        let name = Self::resolve_name(category, |var| std::env::var(var).ok());
        Self::parse(&name)
    }

    /// BCP 47 style tag, e.g. `sr-Latn-RS`.
    pub fn tag(&self) -> String {
        [&self.language, &self.script, &self.country, &self.variant]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("-")
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_full_locale_name() {
        let locale = Locale::parse("de_DE.ISO8859-1").unwrap();
        assert_eq!(locale.language.as_deref(), Some("de"));
        assert_eq!(locale.country.as_deref(), Some("DE"));
        assert_eq!(locale.codeset.as_deref(), Some("ISO-8859-1"));
        assert_eq!(locale.script, None);
        assert_eq!(locale.variant, None);
    }

    #[test]
    fn c_and_posix_are_english_without_codeset() {
        for name in ["C", "POSIX"] {
            let locale = Locale::parse(name).unwrap();
            assert_eq!(locale.language.as_deref(), Some("en"));
            assert_eq!(locale.country, None);
            assert_eq!(locale.codeset, None);
        }
    }

    #[test]
    fn c_utf8_is_english_with_utf8_codeset() {
        for name in ["C.UTF-8", "C.utf8", "POSIX.UTF-8"] {
            let locale = Locale::parse(name).unwrap();
            assert_eq!(locale.language.as_deref(), Some("en"));
            assert_eq!(locale.country, None);
            assert_eq!(locale.codeset.as_deref(), Some("UTF-8"));
        }
    }

    #[test]
    fn empty_name_is_absent() {
        assert_eq!(Locale::parse(""), None);
        assert_eq!(Locale::parse("  "), None);
    }

    #[test]
    fn case_is_normalized() {
        let locale = Locale::parse("EN_us.utf8").unwrap();
        assert_eq!(locale.language.as_deref(), Some("en"));
        assert_eq!(locale.country.as_deref(), Some("US"));
        assert_eq!(locale.codeset.as_deref(), Some("UTF-8"));
    }

    #[test]
    fn euro_modifier_implies_latin9_only_without_codeset() {
        let locale = Locale::parse("fr_FR@euro").unwrap();
        assert_eq!(locale.codeset.as_deref(), Some("ISO-8859-15"));

        let locale = Locale::parse("fr_FR.UTF-8@euro").unwrap();
        assert_eq!(locale.codeset.as_deref(), Some("UTF-8"));
        assert_eq!(locale.variant, None);
    }

    #[test]
    fn script_modifiers_set_script() {
        let locale = Locale::parse("sr_RS.UTF-8@latin").unwrap();
        assert_eq!(locale.script.as_deref(), Some("Latn"));
        assert_eq!(locale.tag(), "sr-Latn-RS");

        let locale = Locale::parse("uz_UZ@cyrillic").unwrap();
        assert_eq!(locale.script.as_deref(), Some("Cyrl"));
    }

    #[test]
    fn unknown_modifier_becomes_variant() {
        let locale = Locale::parse("ca_ES@valencia").unwrap();
        assert_eq!(locale.variant.as_deref(), Some("VALENCIA"));
        assert_eq!(locale.tag(), "ca-ES-VALENCIA");
    }

    #[test]
    fn format_and_display_use_different_categories() {
        let env: HashMap<&str, &str> = [("LC_CTYPE", "de_DE.UTF-8"), ("LC_MESSAGES", "en_GB"), ("LANG", "fr_FR")]
            .into_iter()
            .collect();
        let lookup = |var: &str| env.get(var).map(|v| v.to_string());

        assert_eq!(Locale::resolve_name(Category::Format, lookup), "de_DE.UTF-8");
        assert_eq!(Locale::resolve_name(Category::Display, lookup), "en_GB");
    }

    #[test]
    fn lc_all_wins_and_empty_values_are_skipped() {
        let env: HashMap<&str, &str> = [("LC_ALL", ""), ("LC_CTYPE", ""), ("LANG", "ja_JP.eucJP")]
            .into_iter()
            .collect();
        let lookup = |var: &str| env.get(var).map(|v| v.to_string());
        assert_eq!(Locale::resolve_name(Category::Format, lookup), "ja_JP.eucJP");

        let lookup = |var: &str| (var == "LC_ALL").then(|| "pt_BR".to_string());
        assert_eq!(Locale::resolve_name(Category::Display, lookup), "pt_BR");
    }

    #[test]
    fn unset_environment_falls_back_to_c() {
        assert_eq!(Locale::resolve_name(Category::Format, |_| None), "C");
    }
}
