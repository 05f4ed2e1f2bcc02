//! SimbaBench leaderboard import: converts the leaderboard API payload into a
//! bulk evaluation file (`Source data/Evaluations/simbabench.yaml`).

use crate::config::Config;
use crate::error::{LandscapeError, LandscapeResult};
use crate::records::{BulkEvaluationFile, BulkModelEntry, Metric, MetricValue, Provenance, TaskType, TestResult};
use crate::report::RunReport;
use crate::retry::{with_retry, RetryConfig};
use crate::store;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

const SPACE_URL: &str = "https://huggingface.co/spaces/UBC-NLP/SimbaBench";
const PAPER_URL: &str = "https://arxiv.org/abs/2505.18436";
pub const OUTPUT_FILE: &str = "simbabench.yaml";
const CACHE_FILE: &str = "simbabench_api.json";

/// Leaderboard language name → (ISO 639-3, test set label). One name may
/// feed several languages.
const ASR_LANGUAGES: &[(&str, &[(&str, &str)])] = &[
    ("Hausa", &[("hau", "Common Voice 19")]),
    ("Yoruba", &[("yor", "Yoruba Voice")]),
    ("Igbo", &[("ibo", "Common Voice 19")]),
    (
        "Akuapim-twi",
        &[
            ("aka", "FinancialSpeech, Akuapem Twi"),
            ("twi", "FinancialSpeech, Akuapem Twi"),
        ],
    ),
    ("Asante-twi", &[("twi", "FinancialSpeech, Asante Twi")]),
    ("Twi", &[("twi", "FLEURS, Twi")]),
    ("Ga", &[("gaa", "FinancialSpeech")]),
    ("Wolof", &[("wol", "Kallaama")]),
    ("Pulaar", &[("fuc", "Kallaama, Pulaar")]),
    ("Pular", &[("fuf", "Nicolingua-WA, Pular")]),
    ("Fon", &[("fon", "ALFFA")]),
    ("Dyula", &[("dyu", "Common Voice 19")]),
    ("Ewe", &[("ewe", "bibleTTS")]),
    ("Lingala", &[("lin", "bibleTTS")]),
];

const TTS_LANGUAGES: &[(&str, &[(&str, &str)])] = &[
    ("Ewe", &[("ewe", "bibleTTS, Ewe")]),
    ("Yoruba", &[("yor", "bibleTTS, Yoruba")]),
    ("Hausa", &[("hau", "bibleTTS, Hausa")]),
    ("Lingala", &[("lin", "bibleTTS, Lingala")]),
    ("Asante-twi", &[("twi", "bibleTTS, Asante Twi")]),
    (
        "Akuapim-twi",
        &[
            ("aka", "bibleTTS, Akuapem Twi"),
            ("twi", "bibleTTS, Akuapem Twi"),
        ],
    ),
];

/// Leaderboard model name → hub repository id.
const ASR_MODELS: &[(&str, &str)] = &[
    ("mms-1b-all", "facebook/mms-1b-all"),
    ("whisper-large-v3", "openai/whisper-large-v3"),
    ("whisper-large-v3-turbo", "openai/whisper-large-v3-turbo"),
    ("seamless-m4t-v2-large", "facebook/seamless-m4t-v2-large"),
    ("Simba-S", "UBC-NLP/Simba-S"),
    ("Simba-M", "UBC-NLP/Simba-M"),
    ("omniASR_LLM_7B_v2", "UBC-NLP/omniASR_LLM_7B_v2"),
    ("omniASR_LLM_1B_v2", "UBC-NLP/omniASR_LLM_1B_v2"),
    ("omniASR_LLM_300M_v2", "UBC-NLP/omniASR_LLM_300M_v2"),
    ("omniASR_CTC_7B_v2", "UBC-NLP/omniASR_CTC_7B_v2"),
    ("omniASR_CTC_3B_v2", "UBC-NLP/omniASR_CTC_3B_v2"),
    ("omniASR_CTC_1B_v2", "UBC-NLP/omniASR_CTC_1B_v2"),
];

const TTS_MODELS: &[(&str, &str)] = &[
    ("MMS-TTS", "facebook/mms-tts"),
    ("Simba-TTS", "UBC-NLP/Simba-TTS"),
];

fn lookup<'a>(table: &'a [(&str, &'a [(&str, &str)])], name: &str) -> Option<&'a [(&'a str, &'a str)]> {
    table.iter().find(|(n, _)| *n == name).map(|(_, targets)| *targets)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn result(test_label: &str, metrics: Vec<Metric>) -> TestResult {
    TestResult {
        test_set: format!("SimbaBench ({})", test_label),
        source: Some(Provenance::Reported),
        source_url: Some(SPACE_URL.to_string()),
        metrics,
    }
}

fn metric(name: &str, value: f64) -> Metric {
    Metric {
        name: name.to_string(),
        value: MetricValue::Number(value),
    }
}

fn asr_entry(data: &Value, short_name: &str, repo: &str, hub_url: &str) -> BulkModelEntry {
    let mut results: BTreeMap<String, Vec<TestResult>> = BTreeMap::new();

    let families = data
        .pointer("/asr/by_family")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|f| f.values());
    for family in families {
        let rows = family.get("data").and_then(Value::as_array).into_iter().flatten();
        for row in rows.filter(|r| r.get("Model").and_then(Value::as_str) == Some(short_name)) {
            let Some(row) = row.as_object() else { continue };
            for (key, value) in row {
                let Some(language) = key.strip_prefix("WER_") else { continue };
                let (Some(targets), Some(wer)) = (lookup(ASR_LANGUAGES, language), value.as_f64()) else {
                    continue;
                };
                let cer = row.get(&format!("CER_{}", language)).and_then(Value::as_f64);
                for (iso, label) in targets {
                    let mut metrics = vec![metric("WER", round2(wer))];
                    if let Some(cer) = cer {
                        metrics.push(metric("CER", round2(cer)));
                    }
                    results.entry(iso.to_string()).or_default().push(result(label, metrics));
                }
            }
        }
    }

    BulkModelEntry {
        model: repo.to_string(),
        model_url: Some(format!("{}/{}", hub_url, repo)),
        task: TaskType::Asr,
        results,
    }
}

fn tts_entry(data: &Value, short_name: &str, repo: &str, hub_url: &str) -> BulkModelEntry {
    let mut results: BTreeMap<String, Vec<TestResult>> = BTreeMap::new();

    let rows = data
        .get("tts")
        .and_then(|t| t.get(short_name))
        .and_then(Value::as_array)
        .into_iter()
        .flatten();
    for row in rows {
        let Some(targets) = row
            .get("language")
            .and_then(Value::as_str)
            .and_then(|l| lookup(TTS_LANGUAGES, l))
        else {
            continue;
        };
        let metrics: Vec<Metric> = [("WER", "wer"), ("UTMOS", "utmos"), ("PESQ", "pesq")]
            .iter()
            .filter_map(|(name, key)| row.get(*key).and_then(Value::as_f64).map(|v| metric(name, v)))
            .collect();
        for (iso, label) in targets {
            results
                .entry(iso.to_string())
                .or_default()
                .push(result(label, metrics.clone()));
        }
    }

    BulkModelEntry {
        model: repo.to_string(),
        model_url: Some(format!("{}/{}", hub_url, repo)),
        task: TaskType::Tts,
        results,
    }
}

/// Convert a leaderboard payload. Models without any tracked language are dropped.
pub fn convert(data: &Value, hub_url: &str) -> BulkEvaluationFile {
    let hub_url = hub_url.trim_end_matches('/');
    let asr = ASR_MODELS
        .iter()
        .map(|(short, repo)| asr_entry(data, short, repo, hub_url));
    let tts = TTS_MODELS
        .iter()
        .map(|(short, repo)| tts_entry(data, short, repo, hub_url));

    BulkEvaluationFile {
        models: asr.chain(tts).filter(|m| !m.results.is_empty()).collect(),
    }
}

pub async fn fetch_leaderboard(client: &reqwest::Client, url: &str) -> LandscapeResult<Value> {
    with_retry(&RetryConfig::leaderboard_api(), "SimbaBench API", || async {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| LandscapeError::upstream("SimbaBench", url, format!("request failed: {}", e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(LandscapeError::upstream("SimbaBench", url, format!("HTTP {}", status)));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| LandscapeError::upstream("SimbaBench", url, format!("bad response: {}", e)))
    })
    .await
}

fn cache_path(config: &Config) -> PathBuf {
    config.source_data_dir().join(CACHE_FILE)
}

fn header(config: &Config) -> String {
    format!(
        "# SimbaBench ASR + TTS benchmark results\n# API: {}\n# Space: {}\n# Paper: {}\n#\n# Generated by: wca-nlp-landscape import-simbabench\n# Metrics: ASR WER/CER (lower is better), TTS WER (lower is better), UTMOS/PESQ (higher is better)\n\n",
        config.simbabench_api_url, SPACE_URL, PAPER_URL
    )
}

/// Import the leaderboard from the API (caching the payload) or from a saved payload.
pub async fn run_import(
    config: &Config,
    client: &reqwest::Client,
    json_path: Option<&Path>,
) -> anyhow::Result<RunReport> {
    let mut report = RunReport::new("import-simbabench");

    let data = match json_path {
        Some(path) => {
            info!("Loading leaderboard from {}", path.display());
            let raw = std::fs::read_to_string(path).map_err(|e| LandscapeError::io(path, e))?;
            serde_json::from_str(&raw).map_err(|e| LandscapeError::malformed(path, e))?
        }
        None => {
            info!("Fetching leaderboard from {}", config.simbabench_api_url);
            let data = fetch_leaderboard(client, &config.simbabench_api_url).await?;
            let cache = cache_path(config);
            store::write_text(&cache, &serde_json::to_string_pretty(&data)?)?;
            info!("Cached API response to {}", cache.display());
            data
        }
    };

    let bulk = convert(&data, &config.hf_base_url);
    for model in &bulk.models {
        info!(
            "  {} {}: {} languages",
            model.task.short_label(),
            model.model,
            model.results.len()
        );
        report.complete(&format!("{} {}", model.task, model.model));
    }
    if bulk.is_empty() {
        report.partial("simbabench", "no tracked language in the leaderboard payload");
    }

    let output = config.evaluations_dir().join(OUTPUT_FILE);
    let yaml = serde_yaml::to_string(&bulk)?;
    store::write_text(&output, &format!("{}{}", header(config), yaml))?;
    info!("Written {} ({} model entries)", output.display(), bulk.models.len());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn payload() -> Value {
        json!({
            "asr": {
                "by_family": {
                    "Niger-Congo": {
                        "data": [
                            {"Model": "whisper-large-v3", "WER_Wolof": 61.234, "CER_Wolof": 24.5, "WER_Swahili": 30.0},
                            {"Model": "Simba-M", "WER_Akuapim-twi": 35.0}
                        ]
                    }
                }
            },
            "tts": {
                "MMS-TTS": [
                    {"language": "Ewe", "wer": 40.1, "utmos": 2.9, "pesq": 1.3},
                    {"language": "Klingon", "wer": 1.0, "utmos": 1.0, "pesq": 1.0}
                ]
            }
        })
    }

    // ==================== convert Tests ====================

    #[test]
    fn test_convert_asr_rows() {
        let bulk = convert(&payload(), "https://huggingface.co");
        let whisper = bulk
            .models
            .iter()
            .find(|m| m.model == "openai/whisper-large-v3")
            .unwrap();

        assert_eq!(whisper.task, TaskType::Asr);
        assert_eq!(
            whisper.model_url.as_deref(),
            Some("https://huggingface.co/openai/whisper-large-v3")
        );
        let wol = &whisper.results["wol"][0];
        assert_eq!(wol.test_set, "SimbaBench (Kallaama)");
        assert_eq!(wol.metrics[0].value, MetricValue::Number(61.23));
        assert_eq!(wol.metrics[1].name, "CER");
        assert_eq!(whisper.results.len(), 1);
    }

    #[test]
    fn test_convert_fans_out_shared_names() {
        let bulk = convert(&payload(), "https://huggingface.co");
        let simba = bulk.models.iter().find(|m| m.model == "UBC-NLP/Simba-M").unwrap();
        assert!(simba.results.contains_key("aka"));
        assert!(simba.results.contains_key("twi"));
    }

    #[test]
    fn test_convert_tts_and_drops_empty_models() {
        let bulk = convert(&payload(), "https://huggingface.co");
        let mms = bulk.models.iter().find(|m| m.model == "facebook/mms-tts").unwrap();
        assert_eq!(mms.task, TaskType::Tts);
        let names: Vec<&str> = mms.results["ewe"][0].metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["WER", "UTMOS", "PESQ"]);
        assert_eq!(bulk.models.len(), 3);
    }

    #[test]
    fn test_converted_file_reads_back_as_bulk() {
        let bulk = convert(&payload(), "https://huggingface.co");
        let yaml = serde_yaml::to_string(&bulk).unwrap();
        let (parsed, _) = BulkEvaluationFile::parse(&yaml, Path::new("simbabench.yaml")).unwrap();
        assert_eq!(parsed, bulk);
    }

    // ==================== run_import Tests ====================

    #[tokio::test]
    async fn test_run_import_from_api_writes_files() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
            .mount(&mock_server)
            .await;

        let dir = TempDir::new().unwrap();
        let mut config = Config::for_root(dir.path());
        config.simbabench_api_url = format!("{}/api/data", mock_server.uri());

        let client = reqwest::Client::new();
        let report = run_import(&config, &client, None).await.unwrap();

        assert_eq!(report.entries().len(), 3);
        let written = std::fs::read_to_string(config.evaluations_dir().join(OUTPUT_FILE)).unwrap();
        assert!(written.starts_with("# SimbaBench"));
        assert!(cache_path(&config).exists());
    }

    #[tokio::test]
    async fn test_run_import_from_cached_json() {
        let dir = TempDir::new().unwrap();
        let config = Config::for_root(dir.path());
        let cached = dir.path().join("cached.json");
        std::fs::write(&cached, payload().to_string()).unwrap();

        let client = reqwest::Client::new();
        run_import(&config, &client, Some(&cached)).await.unwrap();

        let raw = std::fs::read_to_string(config.evaluations_dir().join(OUTPUT_FILE)).unwrap();
        let (parsed, _) = BulkEvaluationFile::parse(&raw, Path::new("simbabench.yaml")).unwrap();
        assert_eq!(parsed.models.len(), 3);
    }
}
