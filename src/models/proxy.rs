use serde::{Deserialize, Serialize};

use super::validation::{Validate, Validator};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityLocation {
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub lat: f64,
    pub lng: f64,
}

impl Validate for CityQuery {
    fn validate(&self, v: &mut Validator) {
        v.between("lat", self.lat, -90.0, 90.0);
        v.between("lng", self.lng, -180.0, 180.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeeplLanguage {
    Da,
    De,
    El,
    En,
    Es,
    Fr,
    Hu,
    It,
    Ja,
    Ko,
    Nl,
    Pl,
    Pt,
    Ru,
    Zh,
}

impl DeeplLanguage {
    /// Code DeepL expects for `source_lang`.
    pub fn source_code(&self) -> &'static str {
        match self {
            Self::Da => "DA",
            Self::De => "DE",
            Self::El => "EL",
            Self::En => "EN",
            Self::Es => "ES",
            Self::Fr => "FR",
            Self::Hu => "HU",
            Self::It => "IT",
            Self::Ja => "JA",
            Self::Ko => "KO",
            Self::Nl => "NL",
            Self::Pl => "PL",
            Self::Pt => "PT",
            Self::Ru => "RU",
            Self::Zh => "ZH",
        }
    }

    /// Code DeepL expects for `target_lang`; a few targets need a regional variant.
    pub fn target_code(&self) -> &'static str {
        match self {
            Self::En => "EN-US",
            Self::Pt => "PT-PT",
            Self::Zh => "ZH-HANS",
            other => other.source_code(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: String,
    #[serde(alias = "source_lang")]
    pub source_lang: DeeplLanguage,
    #[serde(alias = "target_lang")]
    pub target_lang: DeeplLanguage,
}

impl Validate for TranslationRequest {
    fn validate(&self, v: &mut Validator) {
        v.str_len("text", &self.text, 1, None);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub original: String,
    pub translation: String,
    pub source_lang: DeeplLanguage,
    pub target_lang: DeeplLanguage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn regional_targets() {
        assert_eq!(DeeplLanguage::En.target_code(), "EN-US");
        assert_eq!(DeeplLanguage::En.source_code(), "EN");
        assert_eq!(DeeplLanguage::Pt.target_code(), "PT-PT");
        assert_eq!(DeeplLanguage::Zh.target_code(), "ZH-HANS");
        assert_eq!(DeeplLanguage::Hu.target_code(), "HU");
    }

    #[test]
    fn request_accepts_both_casings_and_rejects_unknown_languages() {
        let a: TranslationRequest =
            serde_json::from_value(json!({ "text": "szia", "sourceLang": "hu", "targetLang": "en" })).unwrap();
        let b: TranslationRequest =
            serde_json::from_value(json!({ "text": "szia", "source_lang": "hu", "target_lang": "en" })).unwrap();
        assert_eq!(a.source_lang, b.source_lang);
        assert_eq!(a.target_lang, DeeplLanguage::En);

        let bad = serde_json::from_value::<TranslationRequest>(json!({ "text": "x", "sourceLang": "xx", "targetLang": "en" }));
        assert!(bad.is_err());
    }
}
