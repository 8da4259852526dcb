//! Language selector shown on the form, history and dashboard views.
//!
//! Translation itself is done by an external service; this controller only
//! owns which language is picked and which view currently hosts the selector.
//! A view mounts it on entry and tears it down on exit.

use thiserror::Error;

/// Language the app is written in.
pub const PAGE_LANGUAGE: &str = "en";

/// Languages offered by the selector, in display order.
pub const INCLUDED_LANGUAGES: [(&str, &str); 17] = [
    ("ta", "Tamil"),
    ("hi", "Hindi"),
    ("en", "English"),
    ("te", "Telugu"),
    ("ml", "Malayalam"),
    ("kn", "Kannada"),
    ("bn", "Bengali"),
    ("mr", "Marathi"),
    ("gu", "Gujarati"),
    ("pa", "Punjabi"),
    ("ur", "Urdu"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Language {0} is not offered")]
pub struct UnknownLanguage(pub String);

pub fn language_name(code: &str) -> Option<&'static str> {
    INCLUDED_LANGUAGES
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationController {
    selected: &'static str,
    host: Option<&'static str>,
}

impl Default for TranslationController {
    fn default() -> Self {
        Self {
            selected: PAGE_LANGUAGE,
            host: None,
        }
    }
}

impl TranslationController {
    /// Start with a remembered language; unknown codes fall back to the page language.
    pub fn new(remembered: Option<&str>) -> Self {
        let mut controller = Self::default();
        if let Some(code) = remembered
            && controller.select(code).is_err()
        {
            tracing::warn!(code, "ignoring unknown remembered language");
        }
        controller
    }

    /// Host the selector in `view`, replacing any previous host.
    pub fn mount(&mut self, view: &'static str) {
        if let Some(previous) = self.host.replace(view)
            && previous != view
        {
            tracing::debug!(from = previous, to = view, "translation selector moved");
        }
    }

    /// Tear the selector down if `view` hosts it.
    pub fn unmount(&mut self, view: &'static str) {
        if self.host == Some(view) {
            self.host = None;
        }
    }

    pub fn host(&self) -> Option<&'static str> {
        self.host
    }

    pub fn is_mounted_in(&self, view: &str) -> bool {
        self.host == Some(view)
    }

    /// Pick a language. Returns whether the selection changed.
    pub fn select(&mut self, code: &str) -> Result<bool, UnknownLanguage> {
        let code = code.trim();
        let (known, _) = INCLUDED_LANGUAGES
            .iter()
            .find(|(candidate, _)| *candidate == code)
            .ok_or_else(|| UnknownLanguage(code.to_string()))?;
        let changed = self.selected != *known;
        self.selected = known;
        Ok(changed)
    }

    pub fn selected(&self) -> &'static str {
        self.selected
    }

    pub fn selected_name(&self) -> &'static str {
        language_name(self.selected).unwrap_or("English")
    }
}
