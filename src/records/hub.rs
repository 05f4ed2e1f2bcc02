use super::evaluation::{partition_tasks, TaskType};
use crate::error::LandscapeError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// A model or dataset on the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubItem {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub likes: u64,
}

/// Hub search results for one task, merged across a language's codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubListing {
    pub items: Vec<HubItem>,
    pub total_count: u64,
    pub counts_by_code: BTreeMap<String, u64>,
}

/// `models.yaml`: listings for every task.
pub type ModelsFile = BTreeMap<TaskType, HubListing>;

/// `datasets.yaml`: listings for the speech tasks.
pub type DatasetsFile = BTreeMap<TaskType, HubListing>;

impl HubListing {
    /// Fold one code's search results into the listing.
    ///
    /// Items already seen under another code are not duplicated, but still
    /// count towards that code's total.
    pub fn add_code_results(&mut self, code: &str, items: Vec<HubItem>) {
        self.counts_by_code.insert(code.to_string(), items.len() as u64);
        self.total_count = self.counts_by_code.values().sum();

        let mut seen: HashSet<String> = self.items.iter().map(|i| i.name.clone()).collect();
        for item in items {
            if seen.insert(item.name.clone()) {
                self.items.push(item);
            }
        }
        self.sort_items();
    }

    /// Most downloaded first, then by name for a stable order.
    pub fn sort_items(&mut self) {
        self.items
            .sort_by(|a, b| b.downloads.cmp(&a.downloads).then_with(|| a.name.cmp(&b.name)));
    }

    /// How many more results the hub has beyond the listed items.
    pub fn more_count(&self) -> u64 {
        self.total_count.saturating_sub(self.items.len() as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.total_count == 0
    }

    /// Parse a task-keyed listings file, skipping keys outside the task set.
    pub fn parse_file(
        raw: &str,
        path: &Path,
    ) -> Result<(BTreeMap<TaskType, HubListing>, Vec<LandscapeError>), LandscapeError> {
        if raw.trim().is_empty() {
            return Ok((BTreeMap::new(), Vec::new()));
        }
        let parsed: Option<BTreeMap<String, HubListing>> =
            serde_yaml::from_str(raw).map_err(|e| LandscapeError::malformed(path, e))?;
        let (known, rejected) = partition_tasks(parsed.unwrap_or_default(), path);
        Ok((known.into_iter().collect(), rejected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, downloads: u64) -> HubItem {
        HubItem {
            name: name.to_string(),
            url: format!("https://huggingface.co/{}", name),
            downloads,
            likes: 0,
        }
    }

    #[test]
    fn test_add_code_results_dedupes_and_counts() {
        let mut listing = HubListing::default();
        listing.add_code_results("ha", vec![item("a/asr", 10), item("b/asr", 50)]);
        listing.add_code_results("hau", vec![item("a/asr", 10), item("c/asr", 20)]);

        let names: Vec<&str> = listing.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["b/asr", "c/asr", "a/asr"]);
        assert_eq!(listing.counts_by_code["ha"], 2);
        assert_eq!(listing.counts_by_code["hau"], 2);
        assert_eq!(listing.total_count, 4);
    }

    #[test]
    fn test_sort_ties_by_name() {
        let mut listing = HubListing {
            items: vec![item("z", 5), item("a", 5)],
            ..Default::default()
        };
        listing.sort_items();
        assert_eq!(listing.items[0].name, "a");
    }

    #[test]
    fn test_more_count() {
        let listing = HubListing {
            items: vec![item("a", 1)],
            total_count: 31,
            counts_by_code: BTreeMap::new(),
        };
        assert_eq!(listing.more_count(), 30);
    }

    #[test]
    fn test_parse_file_reads_legacy_translation_key() {
        let raw = "asr:\n  items: []\n  total_count: 0\ntranslation:\n  items:\n    - name: m/mt\n      url: https://huggingface.co/m/mt\n      downloads: 3\n  total_count: 1\n";
        let (listings, skipped) = HubListing::parse_file(raw, Path::new("models.yaml")).unwrap();
        assert!(skipped.is_empty());
        assert_eq!(listings[&TaskType::Mt].items[0].name, "m/mt");
        assert!(listings[&TaskType::Asr].is_empty());
    }
}
