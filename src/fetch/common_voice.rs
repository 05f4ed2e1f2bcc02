//! Speech-corpus statistics from the Common Voice release metadata file.

use crate::error::{LandscapeError, LandscapeResult};
use crate::records::CommonVoiceStats;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
struct CorpusFile {
    #[serde(default)]
    locales: BTreeMap<String, LocaleEntry>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct LocaleEntry {
    /// Total audio duration in milliseconds
    duration: f64,
    clips: u64,
    buckets: Buckets,
    splits: Splits,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct Buckets {
    validated: u64,
    train: u64,
    dev: u64,
    test: u64,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
struct Splits {
    gender: BTreeMap<String, f64>,
}

/// Per-locale corpus statistics.
#[derive(Debug, Default)]
pub struct CommonVoiceData {
    locales: BTreeMap<String, LocaleEntry>,
}

impl CommonVoiceData {
    /// Load the metadata file. A missing file yields no statistics.
    pub fn load(path: &Path) -> LandscapeResult<Self> {
        let Some(raw) = crate::store::read_optional(path)? else {
            warn!("Common Voice data not found at {}", path.display());
            return Ok(Self::default());
        };
        Self::from_json(&raw, path)
    }

    pub fn from_json(raw: &str, path: &Path) -> LandscapeResult<Self> {
        let file: CorpusFile =
            serde_json::from_str(raw).map_err(|e| LandscapeError::malformed(path, e))?;
        Ok(Self {
            locales: file.locales,
        })
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Statistics for a language, matched by ISO 639-3, then ISO 639-1, then a
    /// regional `{639-1}-XX` locale.
    pub fn stats_for(&self, iso_639_3: &str, iso_639_1: Option<&str>) -> Option<CommonVoiceStats> {
        let iso_639_1 = iso_639_1.filter(|c| !c.is_empty());
        let (locale, entry) = self
            .locales
            .get_key_value(iso_639_3)
            .or_else(|| iso_639_1.and_then(|c| self.locales.get_key_value(c)))
            .or_else(|| {
                let prefix = format!("{}-", iso_639_1?);
                self.locales.iter().find(|(k, _)| k.starts_with(&prefix))
            })?;

        let gender = |key: &str| round1(entry.splits.gender.get(key).copied().unwrap_or(0.0) * 100.0);

        Some(CommonVoiceStats {
            locale: locale.clone(),
            total_hours: round1(entry.duration / 3_600_000.0),
            validated_clips: entry.buckets.validated,
            total_clips: entry.clips,
            train_clips: entry.buckets.train,
            dev_clips: entry.buckets.dev,
            test_clips: entry.buckets.test,
            male_percent: gender("male_masculine"),
            female_percent: gender("female_feminine"),
        })
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = r#"{
      "locales": {
        "ha": {
          "duration": 45000000,
          "clips": 9000,
          "buckets": {"validated": 7000, "train": 5000, "dev": 1000, "test": 1000},
          "splits": {"gender": {"male_masculine": 0.6234, "female_feminine": 0.2}}
        },
        "tw-GH": {"duration": 3600000, "clips": 10},
        "ibo": {"duration": 0}
      }
    }"#;

    fn data() -> CommonVoiceData {
        CommonVoiceData::from_json(CORPUS, Path::new("cv.json")).unwrap()
    }

    #[test]
    fn test_lookup_by_iso_639_1() {
        let stats = data().stats_for("hau", Some("ha")).unwrap();
        assert_eq!(stats.locale, "ha");
        assert_eq!(stats.total_hours, 12.5);
        assert_eq!(stats.validated_clips, 7000);
        assert_eq!(stats.total_clips, 9000);
        assert_eq!(stats.male_percent, 62.3);
        assert_eq!(stats.female_percent, 20.0);
    }

    #[test]
    fn test_lookup_prefers_iso_639_3() {
        assert_eq!(data().stats_for("ibo", Some("ig")).unwrap().locale, "ibo");
    }

    #[test]
    fn test_lookup_by_region_suffix() {
        let stats = data().stats_for("twi", Some("tw")).unwrap();
        assert_eq!(stats.locale, "tw-GH");
        assert_eq!(stats.total_hours, 1.0);
    }

    #[test]
    fn test_absent_language() {
        assert!(data().stats_for("fon", None).is_none());
        assert!(data().stats_for("wol", Some("wo")).is_none());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let data = CommonVoiceData::load(Path::new("/nonexistent/cv.json")).unwrap();
        assert!(data.is_empty());
    }
}
