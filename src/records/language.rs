use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-language metadata (`info.yaml`).
///
/// Every field except `notes` is regenerated by the fetch stage. Empty values
/// are skipped when serializing so that re-runs produce byte-identical files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageInfo {
    pub name: String,
    pub iso_639_3: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_639_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_french: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub altnames: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub countries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endangerment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glottocode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glottocode_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wikipedia: Option<WikiInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scriptsource_url: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub resource_links: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tech_resources: BTreeMap<String, TechResource>,
    /// Labels of large multilingual models that cover this language
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub model_coverage: Vec<String>,
    /// Researcher notes. Hand-edited; never produced by a fetcher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LanguageInfo {
    /// Carry hand-edited fields from the previous version of the record.
    pub fn preserve_manual_fields(&mut self, previous: &LanguageInfo) {
        if previous.notes.is_some() {
            self.notes = previous.notes.clone();
        }
    }

    /// Leading integer of the population text, for sorting.
    pub fn population_value(&self) -> u64 {
        parse_population(self.population.as_deref())
    }

    pub fn family(&self) -> Option<&str> {
        self.wikipedia.as_ref().and_then(|w| w.family.as_deref())
    }
}

/// Encyclopedia infobox fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speakers_l1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speakers_l2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writing_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glottolog: Option<String>,
}

impl WikiInfo {
    pub fn is_empty(&self) -> bool {
        *self == WikiInfo::default()
    }
}

/// A technology resource flag from the language grid: either a checkmark or a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TechResource {
    Flag(bool),
    Text(String),
}

impl TechResource {
    pub fn link(&self) -> Option<&str> {
        match self {
            TechResource::Text(t) if t.starts_with("http") => Some(t),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            TechResource::Flag(b) => *b,
            TechResource::Text(t) => !t.is_empty(),
        }
    }
}

/// One language of the full regional list (`wca_all_languages.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WcaLanguage {
    pub name: String,
    pub iso_639_3: String,
    pub countries: Vec<String>,
    pub wca_countries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endangerment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl WcaLanguage {
    pub fn population_value(&self) -> u64 {
        parse_population(self.population.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WcaLanguageList {
    pub languages: Vec<WcaLanguage>,
    pub total: usize,
}

fn parse_population(text: Option<&str>) -> u64 {
    let Some(text) = text else { return 0 };
    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | ' '))
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
