use serde::{Deserialize, Serialize};

/// Curation state of a benchmark or data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceStatus {
    Included,
    Placeholder,
    #[serde(alias = "to_extract")]
    ToExtract,
    Noted,
    Blocked,
}

impl SourceStatus {
    pub const ALL: [SourceStatus; 5] = [
        SourceStatus::Included,
        SourceStatus::Placeholder,
        SourceStatus::ToExtract,
        SourceStatus::Noted,
        SourceStatus::Blocked,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SourceStatus::Included => "included",
            SourceStatus::Placeholder => "placeholder",
            SourceStatus::ToExtract => "to-extract",
            SourceStatus::Noted => "noted",
            SourceStatus::Blocked => "blocked",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceStatus::Included => "Included",
            SourceStatus::Placeholder => "Placeholder",
            SourceStatus::ToExtract => "To extract",
            SourceStatus::Noted => "Noted",
            SourceStatus::Blocked => "Blocked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCatalogEntry {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub status: SourceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `Source data/sources.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceCatalog {
    pub sources: Vec<SourceCatalogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_keys() {
        let entries: Vec<SourceCatalogEntry> = serde_yaml::from_str(
            "- name: FLORES-200\n  status: included\n- name: AfriSpeech\n  status: to-extract\n- name: Old\n  status: to_extract\n",
        )
        .unwrap();
        assert_eq!(entries[0].status, SourceStatus::Included);
        assert_eq!(entries[1].status, SourceStatus::ToExtract);
        assert_eq!(entries[2].status, SourceStatus::ToExtract);
        assert_eq!(serde_yaml::to_string(&SourceStatus::ToExtract).unwrap(), "to-extract\n");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result: Result<SourceCatalogEntry, _> =
            serde_yaml::from_str("name: X\nstatus: maybe\n");
        assert!(result.is_err());
    }
}
