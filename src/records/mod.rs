//! Serde types for every file the toolkit reads or writes.
//!
//! Auto-generated files (owned by the fetch stage) and manual files (owned by
//! the researcher) share these types; ownership is enforced by `store`.

mod actor;
mod evaluation;
mod hub;
mod language;
mod source;

pub use actor::{ActorRecord, Contact, DimensionScores, Person, ProjectRef, Publication};
pub use evaluation::{
    BenchmarksFile, BulkEvaluationFile, BulkModelEntry, CommonVoiceStats, EvaluationEntry,
    ManualEvaluationsFile, Metric, MetricValue, Provenance, TaskEvaluations, TaskType, TestResult,
    partition_tasks,
};
pub use hub::{DatasetsFile, HubItem, HubListing, ModelsFile};
pub use language::{LanguageInfo, TechResource, WcaLanguage, WcaLanguageList, WikiInfo};
pub use source::{SourceCatalog, SourceCatalogEntry, SourceStatus};
