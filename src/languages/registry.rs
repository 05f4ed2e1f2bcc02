//! Focus-language registry: single source of truth for the languages under research.
//!
//! The built-in list is a singleton initialized with `OnceLock`. A project can
//! override it with `Research/focused_languages.yaml`, which has the shape
//! `{priority: [iso...], extended: [iso...]}` (a bare list means all priority).

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

/// Grouping tier of a focus language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Priority,
    Extended,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Priority => "Priority",
            Tier::Extended => "Extended",
        }
    }
}

/// A tracked language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// ISO 639-3 language code (e.g., "hau", "wol")
    pub code: String,

    /// English display name (e.g., "Hausa")
    pub name: String,

    pub tier: Tier,
}

/// Registry of tracked languages, in file order.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static BUILTIN: OnceLock<LanguageRegistry> = OnceLock::new();

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FocusFile {
    Tiered {
        #[serde(default)]
        priority: Vec<String>,
        #[serde(default)]
        extended: Vec<String>,
    },
    Flat(Vec<String>),
}

impl LanguageRegistry {
    /// Get the built-in registry instance.
    pub fn builtin() -> &'static LanguageRegistry {
        BUILTIN.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Load the registry from a focus-language file.
    ///
    /// A missing file falls back to the built-in list. Codes that are not
    /// well-formed ISO 639-3 are rejected so that they never become directory names.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "{} not found, using built-in focus languages",
                path.display()
            );
            return Ok(Self::builtin().clone());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("Invalid focus file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let file: FocusFile = serde_yaml::from_str(raw).context("Failed to parse focus languages")?;
        let (priority, extended) = match file {
            FocusFile::Tiered { priority, extended } => (priority, extended),
            FocusFile::Flat(codes) => (codes, Vec::new()),
        };

        let mut languages: Vec<LanguageConfig> = Vec::new();
        let tagged = priority
            .into_iter()
            .map(|c| (c, Tier::Priority))
            .chain(extended.into_iter().map(|c| (c, Tier::Extended)));

        for (code, tier) in tagged {
            let code = code.trim().to_lowercase();
            if !is_valid_iso_639_3(&code) {
                bail!("'{}' is not an ISO 639-3 code", code);
            }
            if languages.iter().any(|l| l.code == code) {
                warn!("Duplicate focus language '{}' ignored", code);
                continue;
            }
            let name = Self::builtin()
                .get_by_code(&code)
                .map(|l| l.name.clone())
                .unwrap_or_else(|| code.clone());
            languages.push(LanguageConfig { code, name, tier });
        }

        Ok(Self { languages })
    }

    pub fn from_languages(languages: Vec<LanguageConfig>) -> Self {
        Self { languages }
    }

    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    pub fn list_all(&self) -> &[LanguageConfig] {
        &self.languages
    }

    pub fn by_tier(&self, tier: Tier) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.tier == tier).collect()
    }

    pub fn tier_of(&self, code: &str) -> Option<Tier> {
        self.get_by_code(code).map(|lang| lang.tier)
    }

    pub fn codes(&self) -> Vec<&str> {
        self.languages.iter().map(|lang| lang.code.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// Check that a code is three lowercase ASCII letters.
pub fn is_valid_iso_639_3(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_lowercase())
}

fn lang(code: &str, name: &str, tier: Tier) -> LanguageConfig {
    LanguageConfig {
        code: code.to_string(),
        name: name.to_string(),
        tier,
    }
}

/// Default focus languages for the West and Central Africa region.
fn default_languages() -> Vec<LanguageConfig> {
    use Tier::{Extended, Priority};
    vec![
        lang("hau", "Hausa", Priority),
        lang("yor", "Yoruba", Priority),
        lang("ibo", "Igbo", Priority),
        lang("wol", "Wolof", Priority),
        lang("fuc", "Pulaar", Priority),
        lang("bam", "Bambara", Priority),
        lang("twi", "Twi", Priority),
        lang("ewe", "Ewe", Priority),
        lang("fon", "Fon", Priority),
        lang("lin", "Lingala", Priority),
        lang("aka", "Akan", Extended),
        lang("gaa", "Ga", Extended),
        lang("dyu", "Dyula", Extended),
        lang("fuf", "Pular", Extended),
        lang("mos", "Mooré", Extended),
        lang("sus", "Susu", Extended),
        lang("kri", "Krio", Extended),
        lang("sag", "Sango", Extended),
    ]
}
