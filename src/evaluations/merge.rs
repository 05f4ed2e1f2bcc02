//! Override-wins merge of auto-distributed and manual evaluations, and the
//! per-task benchmark table built from the merged rows.

use crate::records::{EvaluationEntry, Metric, Provenance, TaskEvaluations, TaskType, TestResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Placeholder for a cell without a value.
pub const EMPTY_CELL: &str = "—";

/// Which track a merged row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Auto,
    Manual,
}

/// One (model, test set) row of the merged view.
///
/// `test_set` is `None` for a known model that has no results yet.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub model: String,
    pub model_url: Option<String>,
    pub test_set: Option<String>,
    pub source: Option<Provenance>,
    pub source_url: Option<String>,
    pub metrics: Vec<Metric>,
    pub origin: Origin,
}

impl MergedRow {
    fn from_result(entry: &EvaluationEntry, result: &TestResult, origin: Origin) -> Self {
        Self {
            model: entry.model.clone(),
            model_url: entry.model_url.clone(),
            test_set: Some(result.test_set.clone()),
            source: result.source,
            source_url: result.source_url.clone(),
            metrics: result.metrics.clone(),
            origin,
        }
    }

    fn placeholder(entry: &EvaluationEntry, origin: Origin) -> Self {
        Self {
            model: entry.model.clone(),
            model_url: entry.model_url.clone(),
            test_set: None,
            source: None,
            source_url: None,
            metrics: Vec::new(),
            origin,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.test_set.is_none()
    }

    fn key_matches(&self, model: &str, test_set: &str) -> bool {
        self.model == model && self.test_set.as_deref() == Some(test_set)
    }
}

/// Merge one task's entries. Rows are keyed by (model, test set): a manual
/// result replaces every auto result with the same key, other manual results
/// are appended in file order. A model without any result keeps one
/// placeholder row until a result for it appears.
pub fn merge(auto: &[EvaluationEntry], manual: &[EvaluationEntry]) -> Vec<MergedRow> {
    let mut rows: Vec<MergedRow> = Vec::new();

    for entry in auto {
        rows.extend(
            entry
                .results
                .iter()
                .map(|r| MergedRow::from_result(entry, r, Origin::Auto)),
        );
        if entry.results.is_empty() {
            rows.push(MergedRow::placeholder(entry, Origin::Auto));
        }
    }

    for entry in manual {
        for result in &entry.results {
            let mut row = MergedRow::from_result(entry, result, Origin::Manual);
            match rows
                .iter()
                .position(|r| r.key_matches(&entry.model, &result.test_set))
            {
                Some(index) => {
                    if row.model_url.is_none() {
                        row.model_url = rows[index].model_url.take();
                    }
                    rows[index] = row;
                    // several bulk files may report the same key
                    rows.retain(|r| {
                        r.origin == Origin::Manual || !r.key_matches(&entry.model, &result.test_set)
                    });
                }
                None => rows.push(row),
            }
        }
        if entry.results.is_empty() && !rows.iter().any(|r| r.model == entry.model) {
            rows.push(MergedRow::placeholder(entry, Origin::Manual));
        }
    }

    let scored: Vec<String> = rows
        .iter()
        .filter(|r| !r.is_placeholder())
        .map(|r| r.model.clone())
        .collect();
    rows.retain(|r| !r.is_placeholder() || !scored.contains(&r.model));
    rows
}

/// Merge every task. Each task is present in the result, possibly empty.
pub fn merge_all(auto: &TaskEvaluations, manual: &TaskEvaluations) -> BTreeMap<TaskType, Vec<MergedRow>> {
    TaskType::ALL
        .iter()
        .map(|task| {
            let auto = auto.get(task).map(Vec::as_slice).unwrap_or_default();
            let manual = manual.get(task).map(Vec::as_slice).unwrap_or_default();
            (*task, merge(auto, manual))
        })
        .collect()
}

/// A rendered row of a [`BenchmarkTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub model: String,
    pub model_url: Option<String>,
    pub test_set: String,
    /// One cell per metric column, in column order
    pub cells: Vec<String>,
    pub source: String,
    pub source_url: Option<String>,
    pub origin: Origin,
}

/// Benchmark table for one task: `Model, Test set, <metrics...>, Source`.
///
/// Metric columns are the union of metric names over the task's rows, in
/// first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkTable {
    pub task: TaskType,
    pub metric_names: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl BenchmarkTable {
    pub fn build(task: TaskType, merged: &[MergedRow]) -> Self {
        let metric_names = metric_union(merged);

        let rows = merged
            .iter()
            .map(|row| {
                let cells = metric_names
                    .iter()
                    .map(|name| {
                        row.metrics
                            .iter()
                            .find(|m| &m.name == name)
                            .map(|m| m.value.to_string())
                            .unwrap_or_else(|| EMPTY_CELL.to_string())
                    })
                    .collect();
                TableRow {
                    model: row.model.clone(),
                    model_url: row.model_url.clone(),
                    test_set: row.test_set.clone().unwrap_or_else(|| EMPTY_CELL.to_string()),
                    cells,
                    source: row
                        .source
                        .map(|s| s.label().to_string())
                        .unwrap_or_else(|| EMPTY_CELL.to_string()),
                    source_url: row.source_url.clone(),
                    origin: row.origin,
                }
            })
            .collect();

        Self {
            task,
            metric_names,
            rows,
        }
    }

    /// Header labels, metric columns included.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec!["Model".to_string(), "Test set".to_string()];
        columns.extend(self.metric_names.iter().cloned());
        columns.push("Source".to_string());
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn metric_union(rows: &[MergedRow]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for metric in rows.iter().flat_map(|r| &r.metrics) {
        if !names.contains(&metric.name) {
            names.push(metric.name.clone());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MetricValue;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn metric(name: &str, value: f64) -> Metric {
        Metric {
            name: name.to_string(),
            value: MetricValue::Number(value),
        }
    }

    fn result(test_set: &str, metrics: Vec<Metric>) -> TestResult {
        TestResult {
            test_set: test_set.to_string(),
            source: Some(Provenance::Reported),
            source_url: None,
            metrics,
        }
    }

    fn entry(model: &str, results: Vec<TestResult>) -> EvaluationEntry {
        EvaluationEntry {
            model: model.to_string(),
            model_url: Some(format!("https://huggingface.co/{}", model)),
            results,
        }
    }

    // ==================== merge Tests ====================

    #[test]
    fn test_manual_replaces_matching_auto_row() {
        let auto = vec![entry(
            "openai/whisper-large-v3",
            vec![
                result("FLEURS", vec![metric("WER", 60.0)]),
                result("Kallaama", vec![metric("WER", 70.0)]),
            ],
        )];
        let manual = vec![EvaluationEntry {
            model: "openai/whisper-large-v3".to_string(),
            model_url: None,
            results: vec![result("FLEURS", vec![metric("WER", 41.5)])],
        }];

        let rows = merge(&auto, &manual);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].test_set.as_deref(), Some("FLEURS"));
        assert_eq!(rows[0].metrics, vec![metric("WER", 41.5)]);
        assert_eq!(rows[0].origin, Origin::Manual);
        // url inherited from the shadowed auto row
        assert!(rows[0].model_url.is_some());
        assert_eq!(rows[1].origin, Origin::Auto);
    }

    #[test]
    fn test_manual_replaces_every_auto_row_with_same_key() {
        let auto = vec![
            entry("m/asr", vec![result("FLEURS", vec![metric("WER", 60.0)])]),
            entry("m/asr", vec![result("FLEURS", vec![metric("WER", 61.0)])]),
        ];
        let manual = vec![entry("m/asr", vec![result("FLEURS", vec![metric("WER", 40.0)])])];

        let rows = merge(&auto, &manual);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].origin, Origin::Manual);
        assert_eq!(rows[0].metrics, vec![metric("WER", 40.0)]);
    }

    #[test]
    fn test_unmatched_manual_rows_are_appended() {
        let auto = vec![entry("a/asr", vec![result("FLEURS", vec![metric("WER", 50.0)])])];
        let manual = vec![entry("b/asr", vec![result("FLEURS", vec![metric("WER", 30.0)])])];

        let rows = merge(&auto, &manual);
        let models: Vec<&str> = rows.iter().map(|r| r.model.as_str()).collect();
        assert_eq!(models, vec!["a/asr", "b/asr"]);
    }

    #[test]
    fn test_entry_without_results_becomes_placeholder() {
        let manual = vec![entry("lab/new-mt", vec![])];
        let rows = merge(&[], &manual);

        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_placeholder());
        assert!(rows[0].metrics.is_empty());
    }

    #[test]
    fn test_placeholder_dropped_once_model_has_results() {
        let auto = vec![entry("lab/new-mt", vec![])];
        let manual = vec![entry("lab/new-mt", vec![result("FLORES-200", vec![metric("chrF++", 38.2)])])];

        let rows = merge(&auto, &manual);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].test_set.as_deref(), Some("FLORES-200"));
    }

    #[test]
    fn test_merge_all_covers_every_task() {
        let merged = merge_all(&TaskEvaluations::new(), &TaskEvaluations::new());
        assert_eq!(merged.len(), TaskType::ALL.len());
        assert!(merged.values().all(Vec::is_empty));
    }

    // ==================== BenchmarkTable Tests ====================

    #[test]
    fn test_table_columns_union_in_first_seen_order() {
        let auto = vec![
            entry("a/asr", vec![result("FLEURS", vec![metric("WER", 50.0)])]),
            entry(
                "b/asr",
                vec![result("FLEURS", vec![metric("CER", 12.0), metric("WER", 40.0)])],
            ),
        ];
        let table = BenchmarkTable::build(TaskType::Asr, &merge(&auto, &[]));

        assert_eq!(table.columns(), vec!["Model", "Test set", "WER", "CER", "Source"]);
        assert_eq!(table.rows[0].cells, vec!["50", EMPTY_CELL]);
        assert_eq!(table.rows[1].cells, vec!["40", "12"]);
        assert_eq!(table.rows[0].source, "reported");
    }

    #[test]
    fn test_placeholder_row_renders_dashes() {
        let table = BenchmarkTable::build(TaskType::Mt, &merge(&[entry("m/mt", vec![])], &[]));
        assert_eq!(table.columns(), vec!["Model", "Test set", "Source"]);
        assert_eq!(table.rows[0].test_set, EMPTY_CELL);
        assert_eq!(table.rows[0].source, EMPTY_CELL);
    }

    #[test]
    fn test_text_metric_values_are_kept() {
        let auto = vec![entry(
            "m/llm",
            vec![result(
                "AfroBench",
                vec![Metric {
                    name: "Accuracy".to_string(),
                    value: MetricValue::Text("n/a".to_string()),
                }],
            )],
        )];
        let table = BenchmarkTable::build(TaskType::Llm, &merge(&auto, &[]));
        assert_eq!(table.rows[0].cells, vec!["n/a"]);
    }

    // ==================== Property Tests ====================

    fn arb_metrics() -> impl Strategy<Value = Vec<Metric>> {
        prop::collection::vec(
            (prop::sample::select(vec!["WER", "CER", "BLEU", "chrF++", "UTMOS"]), 0.0f64..100.0),
            0..4,
        )
        .prop_map(|pairs| pairs.into_iter().map(|(n, v)| metric(n, v)).collect())
    }

    fn arb_entries() -> impl Strategy<Value = Vec<EvaluationEntry>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["m/a", "m/b", "m/c"]),
                prop::collection::vec(
                    (prop::sample::select(vec!["FLEURS", "CV", "FLORES"]), arb_metrics()),
                    0..3,
                ),
            ),
            0..4,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .map(|(model, results)| {
                    entry(
                        model,
                        results.into_iter().map(|(t, m)| result(t, m)).collect(),
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_manual_values_win(auto in arb_entries(), manual in arb_entries()) {
            let rows = merge(&auto, &manual);
            for entry in &manual {
                for result in &entry.results {
                    // the last manual result for a key is the one exposed
                    let expected = manual
                        .iter()
                        .filter(|e| e.model == entry.model)
                        .flat_map(|e| &e.results)
                        .filter(|r| r.test_set == result.test_set)
                        .last()
                        .map(|r| &r.metrics);
                    let row = rows
                        .iter()
                        .find(|r| r.key_matches(&entry.model, &result.test_set))
                        .expect("manual row present");
                    prop_assert_eq!(Some(&row.metrics), expected);
                    prop_assert_eq!(row.origin, Origin::Manual);
                    prop_assert!(rows
                        .iter()
                        .filter(|r| r.key_matches(&entry.model, &result.test_set))
                        .all(|r| r.origin == Origin::Manual));
                }
            }
        }

        #[test]
        fn prop_auto_rows_survive_unless_shadowed(auto in arb_entries(), manual in arb_entries()) {
            let rows = merge(&auto, &manual);
            for entry in &auto {
                for result in &entry.results {
                    prop_assert!(rows.iter().any(|r| r.key_matches(&entry.model, &result.test_set)));
                }
            }
        }

        #[test]
        fn prop_columns_equal_metric_union(auto in arb_entries(), manual in arb_entries()) {
            let rows = merge(&auto, &manual);
            let table = BenchmarkTable::build(TaskType::Asr, &rows);

            let expected: BTreeSet<&str> = rows
                .iter()
                .flat_map(|r| &r.metrics)
                .map(|m| m.name.as_str())
                .collect();
            let actual: BTreeSet<&str> = table.metric_names.iter().map(String::as_str).collect();

            prop_assert_eq!(table.metric_names.len(), expected.len());
            prop_assert_eq!(actual, expected);
            prop_assert!(table.rows.iter().all(|r| r.cells.len() == table.metric_names.len()));
        }
    }
}
