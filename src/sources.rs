//! Source catalog (`Source data/sources.yaml`): benchmarks and data sources
//! with their curation status.

use crate::error::{LandscapeError, LandscapeResult};
use crate::records::{SourceCatalog, SourceCatalogEntry, SourceStatus};
use serde_yaml::Value;
use std::path::Path;
use tracing::warn;

/// Catalog entries of one status.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusGroup<'a> {
    pub status: SourceStatus,
    pub entries: Vec<&'a SourceCatalogEntry>,
}

impl SourceCatalog {
    /// Load the catalog. A missing file is an empty catalog; both a bare list
    /// and a `sources:` mapping are accepted. Entries that do not match the
    /// entry schema are skipped and returned.
    pub fn load(path: &Path) -> LandscapeResult<(Self, Vec<LandscapeError>)> {
        let Some(raw) = crate::store::read_optional(path)? else {
            warn!("Source catalog not found at {}", path.display());
            return Ok((Self::default(), Vec::new()));
        };
        Self::from_yaml(&raw, path)
    }

    pub fn from_yaml(raw: &str, path: &Path) -> LandscapeResult<(Self, Vec<LandscapeError>)> {
        if raw.trim().is_empty() {
            return Ok((Self::default(), Vec::new()));
        }
        let value: Value = serde_yaml::from_str(raw).map_err(|e| LandscapeError::malformed(path, e))?;
        let items = match value {
            Value::Null => Vec::new(),
            Value::Sequence(items) => items,
            Value::Mapping(mut map) => match map.remove("sources") {
                Some(Value::Sequence(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(_) => return Err(LandscapeError::malformed(path, "`sources` must be a list")),
            },
            _ => return Err(LandscapeError::malformed(path, "expected a list of sources")),
        };

        let mut sources = Vec::with_capacity(items.len());
        let mut skipped = Vec::new();
        for (i, item) in items.into_iter().enumerate() {
            match serde_yaml::from_value::<SourceCatalogEntry>(item) {
                Ok(entry) => sources.push(entry),
                Err(e) => {
                    warn!("Skipping source entry {} in {}: {}", i + 1, path.display(), e);
                    skipped.push(LandscapeError::SchemaMismatch {
                        path: path.to_path_buf(),
                        message: format!("entry {}: {}", i + 1, e),
                    });
                }
            }
        }
        Ok((Self { sources }, skipped))
    }

    /// Entries grouped by status in display order; empty groups are omitted.
    /// Entries keep file order within a group.
    pub fn by_status(&self) -> Vec<StatusGroup<'_>> {
        SourceStatus::ALL
            .iter()
            .map(|status| StatusGroup {
                status: *status,
                entries: self.sources.iter().filter(|s| s.status == *status).collect(),
            })
            .filter(|group| !group.entries.is_empty())
            .collect()
    }

    pub fn count(&self, status: SourceStatus) -> usize {
        self.sources.iter().filter(|s| s.status == status).count()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
