//! Coverage lists of large multilingual models (`Source data/Multilingual-models/*.yaml`).
//!
//! Each file names a label and the languages it supports. With
//! `multitask: true` a language gets one `{LABEL}-{TASK}` label per true flag.
//! Pivot languages (`role: pivot`) are skipped.

use crate::error::{LandscapeError, LandscapeResult};
use crate::store::yaml_files;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Entry keys that describe the language rather than a task.
const META_FIELDS: &[&str] = &["name", "role"];

#[derive(Debug, Deserialize)]
struct CoverageFile {
    #[serde(default)]
    tech_resources_label: Option<String>,
    #[serde(default)]
    multitask: bool,
    #[serde(default)]
    languages: BTreeMap<String, Value>,
}

/// Model-coverage labels by ISO 639-3 code.
#[derive(Debug, Default)]
pub struct CoverageIndex {
    by_language: BTreeMap<String, Vec<String>>,
}

impl CoverageIndex {
    /// Load every coverage file in `dir`, in file-name order.
    ///
    /// A malformed file is skipped and returned alongside the index.
    pub fn load(dir: &Path) -> LandscapeResult<(Self, Vec<LandscapeError>)> {
        let mut index = Self::default();
        let mut problems = Vec::new();

        if !dir.exists() {
            warn!("Coverage directory not found at {}", dir.display());
            return Ok((index, problems));
        }

        for path in yaml_files(dir)? {
            let raw = std::fs::read_to_string(&path).map_err(|e| LandscapeError::io(&path, e))?;
            if let Err(e) = index.add_file(&raw, &path) {
                warn!("Skipping coverage file: {}", e);
                problems.push(e);
            }
        }
        debug!("Loaded coverage for {} languages", index.by_language.len());
        Ok((index, problems))
    }

    pub fn add_file(&mut self, raw: &str, path: &Path) -> LandscapeResult<()> {
        let file: CoverageFile =
            serde_yaml::from_str(raw).map_err(|e| LandscapeError::malformed(path, e))?;
        let Some(label) = file.tech_resources_label.filter(|l| !l.is_empty()) else {
            return Ok(());
        };

        for (iso, entry) in file.languages {
            let Value::Mapping(entry) = entry else {
                continue;
            };
            if entry.get("role").and_then(Value::as_str) == Some("pivot") {
                continue;
            }
            let labels = self.by_language.entry(iso).or_default();
            if file.multitask {
                labels.extend(task_labels(&label, &entry));
            } else {
                labels.push(label.clone());
            }
        }
        Ok(())
    }

    pub fn labels_for(&self, iso: &str) -> Vec<String> {
        self.by_language.get(iso).cloned().unwrap_or_default()
    }
}

fn task_labels(label: &str, entry: &Mapping) -> Vec<String> {
    entry
        .iter()
        .filter_map(|(key, value)| {
            let key = key.as_str()?;
            if META_FIELDS.contains(&key) || value.as_bool() != Some(true) {
                return None;
            }
            Some(format!("{}-{}", label, key.to_uppercase()))
        })
        .collect()
}
