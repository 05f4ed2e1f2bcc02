use crate::error::LandscapeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Task category of a model, dataset or benchmark result.
///
/// Closed set. The legacy key `translation` is read as `Mt`; writes always
/// use the canonical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Asr,
    Tts,
    #[serde(alias = "translation")]
    Mt,
    Llm,
}

impl TaskType {
    /// Rendering order.
    pub const ALL: [TaskType; 4] = [TaskType::Asr, TaskType::Tts, TaskType::Mt, TaskType::Llm];

    /// Tasks for which the hub publishes dataset listings we track.
    pub const WITH_DATASETS: [TaskType; 2] = [TaskType::Asr, TaskType::Tts];

    pub fn key(&self) -> &'static str {
        match self {
            TaskType::Asr => "asr",
            TaskType::Tts => "tts",
            TaskType::Mt => "mt",
            TaskType::Llm => "llm",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskType::Asr => "Automatic Speech Recognition",
            TaskType::Tts => "Text-to-Speech",
            TaskType::Mt => "Machine Translation",
            TaskType::Llm => "Language Models",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            TaskType::Asr => "ASR",
            TaskType::Tts => "TTS",
            TaskType::Mt => "MT",
            TaskType::Llm => "LLM",
        }
    }

    /// Hub pipeline tag used when querying models and datasets.
    pub fn pipeline_tag(&self) -> &'static str {
        match self {
            TaskType::Asr => "automatic-speech-recognition",
            TaskType::Tts => "text-to-speech",
            TaskType::Mt => "translation",
            TaskType::Llm => "text-generation",
        }
    }

    /// Validate a task key read from `path`.
    pub fn parse_in(raw: &str, path: &Path) -> Result<TaskType, LandscapeError> {
        raw.parse().map_err(|_| LandscapeError::UnknownTask {
            task: raw.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// Split a task-keyed map read from `path` into known tasks and rejected keys.
///
/// Readers of auto-generated files use this to skip stale keys instead of
/// dropping the whole file.
pub fn partition_tasks<T>(
    raw: BTreeMap<String, T>,
    path: &Path,
) -> (Vec<(TaskType, T)>, Vec<LandscapeError>) {
    let mut known = Vec::with_capacity(raw.len());
    let mut rejected = Vec::new();
    for (key, value) in raw {
        match TaskType::parse_in(&key, path) {
            Ok(task) => known.push((task, value)),
            Err(e) => rejected.push(e),
        }
    }
    (known, rejected)
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asr" => Ok(TaskType::Asr),
            "tts" => Ok(TaskType::Tts),
            "mt" | "translation" => Ok(TaskType::Mt),
            "llm" => Ok(TaskType::Llm),
            other => Err(format!("unknown task type '{}'", other)),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Where a result comes from: published by the authors or measured by us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Reported,
    Measured,
}

impl Provenance {
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Reported => "reported",
            Provenance::Measured => "measured",
        }
    }
}

/// Metric values are numbers in most files, but papers sometimes publish text ("n/a", "12.3*").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
}

/// One model evaluated on one test set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_set: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Provenance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

/// A model's results for one language and one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationEntry {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    #[serde(default)]
    pub results: Vec<TestResult>,
}

/// Evaluation entries grouped by task.
pub type TaskEvaluations = BTreeMap<TaskType, Vec<EvaluationEntry>>;

/// Speech-corpus statistics for one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonVoiceStats {
    pub locale: String,
    pub total_hours: f64,
    pub validated_clips: u64,
    pub total_clips: u64,
    pub train_clips: u64,
    pub dev_clips: u64,
    pub test_clips: u64,
    pub male_percent: f64,
    pub female_percent: f64,
}

/// `benchmarks.yaml`: corpus statistics plus the auto-distributed evaluations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarksFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_voice: Option<CommonVoiceStats>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub evaluations: TaskEvaluations,
}

#[derive(Debug, Default, Deserialize)]
struct RawBenchmarksFile {
    #[serde(default)]
    common_voice: Option<CommonVoiceStats>,
    #[serde(default)]
    evaluations: BTreeMap<String, Vec<EvaluationEntry>>,
}

impl BenchmarksFile {
    /// Parse `benchmarks.yaml`, skipping task keys outside the closed set.
    ///
    /// Skipped keys are returned so the caller can report them.
    pub fn parse(raw: &str, path: &Path) -> Result<(Self, Vec<LandscapeError>), LandscapeError> {
        if raw.trim().is_empty() {
            return Ok((Self::default(), Vec::new()));
        }
        let parsed: Option<RawBenchmarksFile> =
            serde_yaml::from_str(raw).map_err(|e| LandscapeError::malformed(path, e))?;
        let parsed = parsed.unwrap_or_default();

        let (known, rejected) = partition_tasks(parsed.evaluations, path);
        let mut evaluations = TaskEvaluations::new();
        for (task, entries) in known {
            evaluations.entry(task).or_default().extend(entries);
        }
        Ok((
            Self {
                common_voice: parsed.common_voice,
                evaluations,
            },
            rejected,
        ))
    }
}

/// `manual_evaluations.yaml`: researcher-entered results, keyed by task.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ManualEvaluationsFile {
    pub evaluations: TaskEvaluations,
}

#[derive(Debug, Default, Deserialize)]
struct RawManualFile {
    #[serde(default)]
    evaluations: BTreeMap<String, Vec<EvaluationEntry>>,
}

impl ManualEvaluationsFile {
    /// Parse a manual override file. Task keys outside the closed set are
    /// skipped and returned; overrides under known keys still apply.
    pub fn parse(raw: &str, path: &Path) -> Result<(Self, Vec<LandscapeError>), LandscapeError> {
        if raw.trim().is_empty() {
            return Ok((Self::default(), Vec::new()));
        }
        let parsed: Option<RawManualFile> =
            serde_yaml::from_str(raw).map_err(|e| LandscapeError::malformed(path, e))?;

        let (known, rejected) = partition_tasks(parsed.unwrap_or_default().evaluations, path);
        let mut evaluations = TaskEvaluations::new();
        for (task, entries) in known {
            evaluations.entry(task).or_default().extend(entries);
        }
        Ok((Self { evaluations }, rejected))
    }
}

/// One model inside a bulk evaluation file: results keyed by ISO 639-3 code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkModelEntry {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    pub task: TaskType,
    #[serde(default)]
    pub results: BTreeMap<String, Vec<TestResult>>,
}

impl BulkModelEntry {
    pub fn entry_for(&self, iso: &str) -> Option<EvaluationEntry> {
        self.results.get(iso).map(|results| EvaluationEntry {
            model: self.model.clone(),
            model_url: self.model_url.clone(),
            results: results.clone(),
        })
    }
}

/// A bulk evaluation file: one paper or leaderboard, many languages.
///
/// Two layouts exist on disk: a single model at the top level, or a
/// `models:` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkEvaluationFile {
    pub models: Vec<BulkModelEntry>,
}

#[derive(Debug, Deserialize)]
struct RawBulkEntry {
    #[serde(default)]
    model: String,
    #[serde(default)]
    model_url: Option<String>,
    #[serde(default)]
    task: Option<String>,
    #[serde(default)]
    results: BTreeMap<String, Vec<TestResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBulkFile {
    Multi { models: Vec<RawBulkEntry> },
    Single(RawBulkEntry),
}

impl BulkEvaluationFile {
    /// Parse a bulk file. Model entries without a valid task are skipped and
    /// returned; the other entries of the file still count.
    pub fn parse(raw: &str, path: &Path) -> Result<(Self, Vec<LandscapeError>), LandscapeError> {
        if raw.trim().is_empty() {
            return Ok((Self::default(), Vec::new()));
        }
        let parsed: RawBulkFile =
            serde_yaml::from_str(raw).map_err(|e| LandscapeError::malformed(path, e))?;
        let raw_entries = match parsed {
            RawBulkFile::Multi { models } => models,
            RawBulkFile::Single(entry) => vec![entry],
        };

        let mut models = Vec::with_capacity(raw_entries.len());
        let mut rejected = Vec::new();
        for entry in raw_entries {
            let task = match entry.task.as_deref() {
                Some(task) => TaskType::parse_in(task, path),
                None => Err(LandscapeError::SchemaMismatch {
                    path: path.to_path_buf(),
                    message: format!("model '{}' has no task", entry.model),
                }),
            };
            match task {
                Ok(task) => models.push(BulkModelEntry {
                    model: entry.model,
                    model_url: entry.model_url,
                    task,
                    results: entry.results,
                }),
                Err(e) => rejected.push(e),
            }
        }
        Ok((Self { models }, rejected))
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== TaskType Tests ====================

    #[test]
    fn test_task_type_accepts_legacy_translation_key() {
        let parsed: BTreeMap<TaskType, u32> = serde_yaml::from_str("translation: 1\nasr: 2\n").unwrap();
        assert_eq!(parsed.get(&TaskType::Mt), Some(&1));
        assert_eq!(parsed.get(&TaskType::Asr), Some(&2));
    }

    #[test]
    fn test_task_type_writes_canonical_key() {
        let mut map = BTreeMap::new();
        map.insert(TaskType::Mt, 1);
        assert_eq!(serde_yaml::to_string(&map).unwrap(), "mt: 1\n");
    }

    #[test]
    fn test_task_type_labels() {
        assert_eq!(TaskType::Mt.label(), "Machine Translation");
        assert_eq!(TaskType::Llm.pipeline_tag(), "text-generation");
        assert_eq!("ASR".parse::<TaskType>(), Ok(TaskType::Asr));
        assert!("summarization".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_partition_tasks_keeps_known_keys() {
        let mut raw = BTreeMap::new();
        raw.insert("translation".to_string(), 1);
        raw.insert("ocr".to_string(), 2);
        let (known, rejected) = partition_tasks(raw, Path::new("models.yaml"));
        assert_eq!(known, vec![(TaskType::Mt, 1)]);
        assert_eq!(rejected.len(), 1);
        assert!(rejected[0].to_string().contains("ocr"));
    }

    #[test]
    fn test_task_type_order_matches_all() {
        let mut sorted = TaskType::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, TaskType::ALL.to_vec());
    }

    // ==================== MetricValue Tests ====================

    #[test]
    fn test_metric_value_display() {
        assert_eq!(MetricValue::Number(12.5).to_string(), "12.5");
        assert_eq!(MetricValue::Number(40.0).to_string(), "40");
        assert_eq!(MetricValue::Text("n/a".into()).to_string(), "n/a");
    }

    #[test]
    fn test_metric_value_untagged() {
        let metrics: Vec<Metric> =
            serde_yaml::from_str("- name: WER\n  value: 31.2\n- name: note\n  value: pending\n").unwrap();
        assert_eq!(metrics[0].value, MetricValue::Number(31.2));
        assert_eq!(metrics[1].value, MetricValue::Text("pending".into()));
    }

    // ==================== Manual File Tests ====================

    #[test]
    fn test_manual_file_skips_unknown_task_and_keeps_others() {
        let raw = "evaluations:\n  summarization:\n    - model: x\n  asr:\n    - model: y\n";
        let (file, skipped) =
            ManualEvaluationsFile::parse(raw, Path::new("wol/manual_evaluations.yaml")).unwrap();

        assert_eq!(skipped.len(), 1);
        assert!(matches!(skipped[0], LandscapeError::UnknownTask { ref task, .. } if task == "summarization"));
        assert_eq!(file.evaluations[&TaskType::Asr][0].model, "y");
        assert_eq!(file.evaluations.len(), 1);
    }

    #[test]
    fn test_manual_file_merges_alias_with_canonical_key() {
        let raw = "evaluations:\n  mt:\n    - model: a\n  translation:\n    - model: b\n";
        let (file, _) = ManualEvaluationsFile::parse(raw, Path::new("m.yaml")).unwrap();
        let models: Vec<&str> = file.evaluations[&TaskType::Mt].iter().map(|e| e.model.as_str()).collect();
        assert_eq!(models.len(), 2);
        assert!(models.contains(&"a") && models.contains(&"b"));
    }

    #[test]
    fn test_manual_file_empty_and_syntax_error() {
        assert!(ManualEvaluationsFile::parse("", Path::new("m.yaml")).unwrap().0.evaluations.is_empty());
        let err = ManualEvaluationsFile::parse("evaluations: [", Path::new("m.yaml")).unwrap_err();
        assert!(matches!(err, LandscapeError::MalformedFile { .. }));
    }

    // ==================== Bulk File Tests ====================

    #[test]
    fn test_bulk_single_model_layout() {
        let raw = r#"
model: facebook/nllb-200-3.3B
model_url: https://huggingface.co/facebook/nllb-200-3.3B
task: mt
results:
  wol:
    - test_set: FLORES-200
      source: reported
      metrics:
        - name: chrF++
          value: 40.1
"#;
        let (file, _) = BulkEvaluationFile::parse(raw, Path::new("nllb.yaml")).unwrap();
        assert_eq!(file.models.len(), 1);
        assert_eq!(file.models[0].task, TaskType::Mt);
        let entry = file.models[0].entry_for("wol").unwrap();
        assert_eq!(entry.results[0].source, Some(Provenance::Reported));
        assert!(file.models[0].entry_for("hau").is_none());
    }

    #[test]
    fn test_bulk_multi_model_layout() {
        let raw = r#"
models:
  - model: a
    task: asr
    results:
      hau: []
  - model: b
    task: translation
    results: {}
"#;
        let (file, skipped) = BulkEvaluationFile::parse(raw, Path::new("multi.yaml")).unwrap();
        assert!(skipped.is_empty());
        assert_eq!(file.models.len(), 2);
        assert_eq!(file.models[1].task, TaskType::Mt);
    }

    #[test]
    fn test_bulk_unknown_task_names_file() {
        let raw = "model: a\ntask: ocr\nresults: {}\n";
        let (file, skipped) = BulkEvaluationFile::parse(raw, Path::new("Evaluations/ocr.yaml")).unwrap();
        assert!(file.is_empty());
        assert!(skipped[0].to_string().contains("Evaluations/ocr.yaml"));
        assert!(matches!(skipped[0], LandscapeError::UnknownTask { .. }));
    }

    #[test]
    fn test_bulk_missing_task_is_schema_mismatch() {
        let (_, skipped) = BulkEvaluationFile::parse("model: a\nresults: {}\n", Path::new("x.yaml")).unwrap();
        assert!(matches!(skipped[0], LandscapeError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_bulk_bad_entry_does_not_drop_other_models() {
        let raw = r#"
models:
  - model: a
    task: ocr
    results: {}
  - model: b
    task: asr
    results:
      wol: []
  - model: c
    results: {}
"#;
        let (file, skipped) = BulkEvaluationFile::parse(raw, Path::new("multi.yaml")).unwrap();
        assert_eq!(file.models.len(), 1);
        assert_eq!(file.models[0].model, "b");
        assert_eq!(skipped.len(), 2);
    }

    // ==================== BenchmarksFile Tests ====================

    #[test]
    fn test_benchmarks_file_reads_legacy_keys() {
        let raw = "common_voice:\n  locale: ha\n  total_hours: 12.5\nflores: null\nevaluations:\n  translation:\n    - model: m\n";
        let file: BenchmarksFile = serde_yaml::from_str(raw).unwrap();
        assert_eq!(file.common_voice.unwrap().locale, "ha");
        assert_eq!(file.evaluations[&TaskType::Mt][0].model, "m");
    }

    #[test]
    fn test_benchmarks_parse_skips_unknown_task() {
        let raw = "evaluations:\n  asr:\n    - model: whisper\n  ocr:\n    - model: tesseract\n";
        let (file, skipped) = BenchmarksFile::parse(raw, Path::new("hau/benchmarks.yaml")).unwrap();
        assert_eq!(file.evaluations.len(), 1);
        assert_eq!(file.evaluations[&TaskType::Asr][0].model, "whisper");
        assert_eq!(skipped.len(), 1);
    }
}
