//! Language-metadata reference dataset (`African-language-grid/all_africa.yaml`).
//!
//! Rows are loosely typed: a cell is a scalar, or a `{text, url}` map when
//! the source spreadsheet carried a hyperlink.

use crate::error::{LandscapeError, LandscapeResult};
use crate::languages::countries;
use crate::records::{LanguageInfo, TechResource, WcaLanguage, WikiInfo};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, warn};

const MAX_ALTNAMES: usize = 15;

/// Glyphs the grid uses to mark "available".
const CHECKMARKS: &[&str] = &["✅", "√", "🆔", "🌻", "🤬", "🌳", "🇶🇦"];

const RESOURCE_FIELDS: &[(&str, &str)] = &[
    ("lanfrica", "Lanfrica"),
    ("olac", "OLAC"),
    ("grambank", "Grambank"),
    ("wals", "WALS"),
    ("elar", "ELAR"),
    ("elp", "Endangered Languages Project"),
    ("cldr", "CLDR"),
    ("africarxiv", "AfricArXiv"),
    ("webonary", "Webonary"),
    ("resource_page", "Resource page"),
    ("acalan_commission", "ACALAN commission"),
];

const TECH_FIELDS: &[(&str, &str)] = &[
    ("afrolid", "AfroLID"),
    ("google_translate", "Google Translate"),
    ("mbert", "mBERT"),
    ("nllb_200", "NLLB-200"),
    ("mbart_50", "mBart-50"),
    ("m2m_100", "M2M-100"),
    ("common_voice", "Mozilla Common Voice"),
    ("madlad_400_docs", "MADLAD-400 Docs"),
    ("madlad_400_sentences", "MADLAD-400 Sentences"),
    ("aya_101", "Aya-101"),
    ("fineweb2", "Fineweb2"),
    ("fleurs", "FLEURS"),
    ("afrihate", "AfriHate"),
    ("cmu_wilderness", "CMU Wilderness"),
    ("mafand", "MAFAND"),
    ("naija_voices", "NaijaVoices"),
];

#[derive(Debug, Default, Deserialize)]
struct GridFile {
    #[serde(default)]
    languages: Vec<Mapping>,
}

/// The grid, indexed by ISO 639-3 code.
#[derive(Debug, Default)]
pub struct LanguageGrid {
    rows: Vec<Mapping>,
    by_iso: HashMap<String, usize>,
}

impl LanguageGrid {
    /// Load the grid. A missing file yields an empty grid.
    pub fn load(path: &Path) -> LandscapeResult<Self> {
        let Some(raw) = crate::store::read_optional(path)? else {
            warn!("Language grid not found at {}", path.display());
            return Ok(Self::default());
        };
        Self::from_yaml(&raw, path)
    }

    pub fn from_yaml(raw: &str, path: &Path) -> LandscapeResult<Self> {
        let file: GridFile =
            serde_yaml::from_str(raw).map_err(|e| LandscapeError::malformed(path, e))?;

        let mut by_iso = HashMap::new();
        for (index, row) in file.languages.iter().enumerate() {
            if let Some(iso) = cell(row, "iso_639_3").map(|v| cell_text(v)).filter(|s| !s.is_empty()) {
                by_iso.entry(iso).or_insert(index);
            }
        }
        debug!("Loaded {} grid languages", file.languages.len());

        Ok(Self {
            rows: file.languages,
            by_iso,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, iso: &str) -> bool {
        self.by_iso.contains_key(iso)
    }

    /// Normalized language metadata, or `None` when the grid has no row for `iso`.
    pub fn language_info(&self, iso: &str) -> Option<LanguageInfo> {
        let row = &self.rows[*self.by_iso.get(iso)?];

        let (iso3, iso3_url) = cell(row, "iso_639_3").map(text_and_url).unwrap_or_default();
        let (glottocode, glottocode_url) = cell(row, "glottocode").map(text_and_url).unwrap_or_default();
        let (_, wiki_url) = cell(row, "wikipedia").map(text_and_url).unwrap_or_default();

        let mut resource_links = BTreeMap::new();
        for (key, label) in RESOURCE_FIELDS {
            if let Some((text, url)) = cell(row, key).map(text_and_url) {
                match url {
                    Some(url) => {
                        resource_links.insert(label.to_string(), url);
                    }
                    None if text.starts_with("http") => {
                        resource_links.insert(label.to_string(), text);
                    }
                    None => {}
                }
            }
        }

        let mut tech_resources = BTreeMap::new();
        for (key, label) in TECH_FIELDS {
            if let Some(resource) = cell(row, key).and_then(tech_resource) {
                tech_resources.insert(label.to_string(), resource);
            }
        }

        Some(LanguageInfo {
            name: text_field(row, "name").unwrap_or_else(|| iso.to_string()),
            iso_639_3: non_empty(iso3).unwrap_or_else(|| iso.to_string()),
            iso_639_1: text_field(row, "iso_639_1"),
            name_french: text_field(row, "name_french"),
            altnames: split_list(cell(row, "alternate_names"))
                .into_iter()
                .take(MAX_ALTNAMES)
                .collect(),
            countries: split_list(cell(row, "countries")),
            population: text_field(row, "population"),
            population_order: text_field(row, "population_order"),
            endangerment: text_field(row, "endangerment"),
            official_status: text_field(row, "official_status"),
            glottocode: non_empty(glottocode),
            glottocode_url,
            wikipedia: wiki_url.map(|url| WikiInfo {
                url: Some(url),
                ..Default::default()
            }),
            scriptsource_url: iso3_url,
            resource_links,
            tech_resources,
            model_coverage: Vec::new(),
            notes: None,
        })
    }

    /// Every grid language spoken in at least one WCA country, sorted by name.
    pub fn wca_languages(&self) -> Vec<WcaLanguage> {
        let mut languages: Vec<WcaLanguage> = self
            .rows
            .iter()
            .filter_map(|row| {
                let (name, name_url) = cell(row, "name").map(text_and_url)?;
                let iso = cell(row, "iso_639_3").map(cell_text)?;
                if name.is_empty() || iso.is_empty() {
                    return None;
                }
                let all_countries = split_list(cell(row, "countries"));
                let wca: Vec<String> = countries::filter_wca(&all_countries)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                if wca.is_empty() {
                    return None;
                }
                let (_, wiki_url) = cell(row, "wikipedia").map(text_and_url).unwrap_or_default();

                Some(WcaLanguage {
                    name,
                    iso_639_3: iso,
                    countries: all_countries,
                    wca_countries: wca,
                    population: text_field(row, "population"),
                    population_order: text_field(row, "population_order"),
                    endangerment: text_field(row, "endangerment"),
                    url: wiki_url.or(name_url),
                })
            })
            .collect();
        languages.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.iso_639_3.cmp(&b.iso_639_3)));
        languages
    }
}

fn cell<'a>(row: &'a Mapping, key: &str) -> Option<&'a Value> {
    row.get(key).filter(|v| !v.is_null())
}

/// Scalar text of a cell; for `{text, url}` cells the text part.
fn cell_text(value: &Value) -> String {
    text_and_url(value).0
}

fn text_and_url(value: &Value) -> (String, Option<String>) {
    match value {
        Value::Mapping(map) => {
            let text = map.get("text").map(scalar).unwrap_or_default();
            let url = map
                .get("url")
                .map(scalar)
                .filter(|u| !u.is_empty());
            (text, url)
        }
        other => (scalar(other), None),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn text_field(row: &Mapping, key: &str) -> Option<String> {
    cell(row, key).map(cell_text).and_then(non_empty)
}

/// A comma-separated cell or a YAML list.
fn split_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(items)) => items.iter().map(cell_text).filter(|s| !s.is_empty()).collect(),
        Some(other) => cell_text(other)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn tech_resource(value: &Value) -> Option<TechResource> {
    if let Value::Bool(b) = value {
        return b.then_some(TechResource::Flag(true));
    }
    let (text, url) = text_and_url(value);
    if CHECKMARKS.contains(&text.as_str()) {
        Some(TechResource::Flag(true))
    } else if let Some(url) = url {
        Some(TechResource::Text(url))
    } else {
        non_empty(text).map(TechResource::Text)
    }
}
