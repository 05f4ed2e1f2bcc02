use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// An organization profile (`Research/Actors/{slug}.yaml`). Fully hand-written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorRecord {
    /// Slug; defaults to the file stem when absent.
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub github: Option<String>,
    pub huggingface: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub founded: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub organization_size: Option<String>,
    pub funding: Option<String>,
    pub contact: Option<Contact>,
    /// ISO 3166-1 alpha-2 codes
    pub countries: Vec<String>,
    /// ISO 639-3 codes
    pub languages: Vec<String>,
    pub projects: Vec<ProjectRef>,
    pub projects_url: Option<String>,
    pub publications: Vec<Publication>,
    pub publications_url: Option<String>,
    pub key_people: Vec<Person>,
    pub partnerships: Vec<String>,
    pub openness: Option<String>,
    pub maturity: Option<String>,
    pub engagement_status: Option<String>,
    #[serde(alias = "unicef_relevance")]
    pub relevance: Option<String>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub last_updated: Option<String>,
    pub scores: Option<DimensionScores>,
}

impl ActorRecord {
    pub fn works_on(&self, iso: &str) -> bool {
        self.languages.iter().any(|l| l == iso)
    }

    /// Display form of the organization type (`research_group` → "Research Group").
    pub fn kind_label(&self) -> String {
        self.kind
            .as_deref()
            .map(|k| {
                k.split(|c| c == '_' || c == '-')
                    .filter(|w| !w.is_empty())
                    .map(capitalize)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }
}

/// Accept `founded: 2019` as well as `founded: "2019"`.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Contact is either a bare address or a set of channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contact {
    Channels {
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        mailing_list: Option<String>,
        #[serde(default)]
        slack: Option<String>,
    },
    Plain(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectRef {
    Detailed {
        name: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    Plain(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Publication {
    Detailed {
        title: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        venue: Option<String>,
    },
    Plain(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Person {
    Detailed {
        name: String,
        #[serde(default)]
        role: Option<String>,
        #[serde(default)]
        affiliation: Option<String>,
        #[serde(default)]
        note: Option<String>,
    },
    Plain(String),
}

/// Stored for a dimension whose value is not an integer (`2.5`, `high`).
/// It lies outside 0-3, so the scorer flags the dimension.
pub const INVALID_DIMENSION: i64 = -1;

/// Hand-entered prioritization points, 0 to 3 per dimension.
///
/// Values are read leniently so bad entries reach the scorer and get flagged
/// instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionScores {
    #[serde(deserialize_with = "lenient_score")]
    pub language_coverage: Option<i64>,
    #[serde(deserialize_with = "lenient_score")]
    pub technical_capacity: Option<i64>,
    #[serde(deserialize_with = "lenient_score")]
    pub openness: Option<i64>,
    #[serde(deserialize_with = "lenient_score")]
    pub regional_presence: Option<i64>,
    #[serde(deserialize_with = "lenient_score")]
    pub child_relevance: Option<i64>,
    #[serde(deserialize_with = "lenient_score")]
    pub partnership_readiness: Option<i64>,
}

fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(n.as_i64().unwrap_or(INVALID_DIMENSION)),
        Some(Value::String(s)) => Some(s.trim().parse().unwrap_or(INVALID_DIMENSION)),
        Some(_) => Some(INVALID_DIMENSION),
    })
}

impl DimensionScores {
    /// Dimension names and values in display order.
    pub fn dimensions(&self) -> [(&'static str, Option<i64>); 6] {
        [
            ("language_coverage", self.language_coverage),
            ("technical_capacity", self.technical_capacity),
            ("openness", self.openness),
            ("regional_presence", self.regional_presence),
            ("child_relevance", self.child_relevance),
            ("partnership_readiness", self.partnership_readiness),
        ]
    }
}
