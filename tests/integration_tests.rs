//! Integration tests for the landscape toolkit
//!
//! These tests run whole commands (fetch, distribute, site, score) against a
//! temporary project root, with the remote sources served by a mock server.

use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use wca_nlp_landscape::actors::{scoring::PriorityTier, ActorRegistry};
use wca_nlp_landscape::config::Config;
use wca_nlp_landscape::evaluations::run_distribute;
use wca_nlp_landscape::fetch::{run_fetch, FetchOptions};
use wca_nlp_landscape::languages::LanguageRegistry;
use wca_nlp_landscape::render::render_site;
use wca_nlp_landscape::report::Status;

// ==================== Test Helpers ====================

const GRID: &str = r#"
languages:
  - name: Wolof
    iso_639_3: wol
    iso_639_1: wo
    countries: Senegal, Gambia
    population: 5,500,000
  - name: Hausa
    iso_639_3: hau
    iso_639_1: ha
    countries: Nigeria, Niger
    population: 50,000,000
"#;

const MT_BULK: &str = r#"
model: nllb-200
model_url: https://huggingface.co/facebook/nllb-200-distilled-600M
task: mt
results:
  wol:
    - test_set: FLORES-200
      source: reported
      metrics:
        - name: chrF++
          value: 41.2
"#;

const ASR_BULK: &str = r#"
models:
  - model: mms-1b-all
    task: asr
    results:
      wol:
        - test_set: FLEURS
          source: reported
          metrics:
            - name: WER
              value: 32.1
      hau:
        - test_set: FLEURS
          source: reported
          metrics:
            - name: CER
              value: 9.8
"#;

/// Create a project root with the given focus languages
fn create_project(focus: &str) -> (TempDir, Config, LanguageRegistry) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config::for_root(dir.path());
    let registry = LanguageRegistry::from_yaml(focus).expect("Invalid focus list");
    std::fs::create_dir_all(config.evaluations_dir()).unwrap();
    (dir, config, registry)
}

fn write_bulk(config: &Config, name: &str, content: &str) {
    std::fs::write(config.evaluations_dir().join(name), content).unwrap();
}

fn write_language_file(config: &Config, iso: &str, file: &str, content: &str) {
    let dir = config.language_dir(iso);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(file), content).unwrap();
}

fn read_language_file(config: &Config, iso: &str, file: &str) -> String {
    std::fs::read_to_string(config.language_dir(iso).join(file)).unwrap()
}

fn read_output(config: &Config, rel: &str) -> String {
    std::fs::read_to_string(config.output_dir().join(rel)).unwrap()
}

async fn mount_empty_hub(mock_server: &MockServer) {
    for api in ["/api/models", "/api/datasets"] {
        Mock::given(method("GET"))
            .and(path(api))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(mock_server)
            .await;
    }
}

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 14, 9, 0, 0).unwrap()
}

// ==================== Evaluation Distribution Tests ====================

#[test]
fn test_mt_bulk_result_renders_machine_translation_section() {
    let (_dir, config, registry) = create_project("priority: [wol]\n");
    write_bulk(&config, "nllb.yaml", MT_BULK);
    write_language_file(&config, "wol", "info.yaml", "name: Wolof\niso_639_3: wol\n");

    let report = run_distribute(&config, &registry.codes()).unwrap();
    assert_eq!(report.status_of("wol"), Some(Status::Complete));
    assert!(read_language_file(&config, "wol", "benchmarks.yaml").contains("mt:"));

    render_site(&config, &registry, fixed_time()).unwrap();
    let page = read_output(&config, "lang/wol.html");

    let section = page.find("Machine Translation").expect("MT section missing");
    let result = page.find("FLORES-200").expect("MT result missing");
    assert!(section < result);
    assert!(page.contains("<td>41.2</td>"));
}

#[test]
fn test_language_without_evaluations_renders_empty_benchmarks() {
    let (_dir, config, registry) = create_project("priority: [wol, hau]\n");
    write_bulk(&config, "nllb.yaml", MT_BULK);
    write_language_file(&config, "hau", "info.yaml", "name: Hausa\niso_639_3: hau\n");

    run_distribute(&config, &registry.codes()).unwrap();
    render_site(&config, &registry, fixed_time()).unwrap();

    let page = read_output(&config, "lang/hau.html");
    assert!(page.contains("<h2>Benchmarks</h2>"));
    assert_eq!(page.matches("No benchmark results yet.").count(), 4);
    assert!(!page.contains("nllb-200"));
}

#[test]
fn test_distribute_twice_is_byte_identical() {
    let (_dir, config, registry) = create_project("priority: [wol, hau]\n");
    write_bulk(&config, "nllb.yaml", MT_BULK);
    write_bulk(&config, "mms.yaml", ASR_BULK);

    run_distribute(&config, &registry.codes()).unwrap();
    let first = read_language_file(&config, "wol", "benchmarks.yaml");

    run_distribute(&config, &registry.codes()).unwrap();
    let second = read_language_file(&config, "wol", "benchmarks.yaml");

    assert_eq!(first, second);
    assert_eq!(second.matches("FLORES-200").count(), 1);
    assert_eq!(second.matches("FLEURS").count(), 1);
}

#[test]
fn test_removed_bulk_file_is_removed_from_languages() {
    let (_dir, config, registry) = create_project("priority: [wol]\n");
    write_bulk(&config, "nllb.yaml", MT_BULK);
    run_distribute(&config, &registry.codes()).unwrap();

    std::fs::remove_file(config.evaluations_dir().join("nllb.yaml")).unwrap();
    run_distribute(&config, &registry.codes()).unwrap();

    assert!(!read_language_file(&config, "wol", "benchmarks.yaml").contains("nllb-200"));
}

#[test]
fn test_manual_override_wins_and_manual_file_untouched() {
    let (_dir, config, registry) = create_project("priority: [wol]\n");
    write_bulk(&config, "nllb.yaml", MT_BULK);
    write_language_file(&config, "wol", "info.yaml", "name: Wolof\niso_639_3: wol\n");
    let manual = r#"evaluations:
  mt:
    - model: nllb-200
      results:
        - test_set: FLORES-200
          source: measured
          metrics:
            - name: chrF++
              value: 45.0
            - name: BLEU
              value: 18.3
    - model: madlad-400
      results: []
"#;
    write_language_file(&config, "wol", "manual_evaluations.yaml", manual);

    run_distribute(&config, &registry.codes()).unwrap();
    render_site(&config, &registry, fixed_time()).unwrap();

    assert_eq!(read_language_file(&config, "wol", "manual_evaluations.yaml"), manual);

    let page = read_output(&config, "lang/wol.html");
    assert!(page.contains("<td>45</td>"));
    assert!(page.contains("<td>18.3</td>"));
    assert!(!page.contains("<td>41.2</td>"));
    assert!(page.contains("<th>BLEU</th>"));
    // model without scores still listed
    assert!(page.contains("madlad-400"));
}

#[test]
fn test_metric_columns_are_union_of_entries() {
    let (_dir, config, registry) = create_project("priority: [wol]\n");
    write_bulk(&config, "mms.yaml", ASR_BULK);
    write_bulk(
        &config,
        "whisper.yaml",
        "model: whisper-small\ntask: asr\nresults:\n  wol:\n    - test_set: ALFFA\n      source: measured\n      metrics:\n        - name: CER\n          value: 12.5\n",
    );
    write_language_file(&config, "wol", "info.yaml", "name: Wolof\niso_639_3: wol\n");

    run_distribute(&config, &registry.codes()).unwrap();
    render_site(&config, &registry, fixed_time()).unwrap();

    let page = read_output(&config, "lang/wol.html");
    assert_eq!(page.matches("<th>WER</th>").count(), 1);
    assert_eq!(page.matches("<th>CER</th>").count(), 1);
}

// ==================== Fetch Pipeline Tests ====================

#[tokio::test]
async fn test_fetch_twice_is_idempotent_and_keeps_manual_files() {
    let mock_server = MockServer::start().await;
    mount_empty_hub(&mock_server).await;

    let (_dir, mut config, registry) = create_project("priority: [wol]\n");
    config.hf_base_url = mock_server.uri();
    config.wikipedia_base_url = format!("{}/wiki", mock_server.uri());
    std::fs::create_dir_all(config.grid_path().parent().unwrap()).unwrap();
    std::fs::write(config.grid_path(), GRID).unwrap();
    write_bulk(&config, "nllb.yaml", MT_BULK);

    let options = FetchOptions {
        lang: None,
        force: true,
    };
    let report = run_fetch(&config, &registry, &options).await.unwrap();
    assert_ne!(report.status_of("wol"), Some(Status::Failed));

    let info = read_language_file(&config, "wol", "info.yaml");
    let benchmarks = read_language_file(&config, "wol", "benchmarks.yaml");
    assert!(info.contains("name: Wolof"));
    assert!(benchmarks.contains("nllb-200"));

    let notes = "# Wolof\n\nStrong community of volunteers in Dakar.\n";
    std::fs::write(config.language_dir("wol").join("notes.md"), notes).unwrap();

    run_fetch(&config, &registry, &options).await.unwrap();

    assert_eq!(read_language_file(&config, "wol", "info.yaml"), info);
    assert_eq!(read_language_file(&config, "wol", "benchmarks.yaml"), benchmarks);
    assert_eq!(read_language_file(&config, "wol", "notes.md"), notes);
}

// ==================== Actor Prioritization Tests ====================

#[test]
fn test_actor_tier_scenarios() {
    let (_dir, config, _registry) = create_project("priority: [wol]\n");
    let actors_dir = config.actors_dir();
    std::fs::create_dir_all(&actors_dir).unwrap();

    for (id, scores) in [
        ("sixteen", [3, 3, 3, 2, 3, 2]),
        ("ten", [2, 2, 2, 1, 2, 1]),
        ("fourteen", [3, 3, 3, 2, 2, 1]),
        ("thirteen", [3, 3, 2, 2, 2, 1]),
    ] {
        let yaml = format!(
            "name: {}\nscores:\n  language_coverage: {}\n  technical_capacity: {}\n  openness: {}\n  regional_presence: {}\n  child_relevance: {}\n  partnership_readiness: {}\n",
            id, scores[0], scores[1], scores[2], scores[3], scores[4], scores[5]
        );
        std::fs::write(actors_dir.join(format!("{}.yaml", id)), yaml).unwrap();
    }

    let (registry, problems) = ActorRegistry::load(&actors_dir).unwrap();
    assert!(problems.is_empty());

    let tier = |id: &str| registry.get(id).unwrap().score.tier();
    assert_eq!(registry.get("sixteen").unwrap().score.total(), Some(16));
    assert_eq!(tier("sixteen"), Some(PriorityTier::Tier1));
    assert_eq!(tier("ten"), Some(PriorityTier::Tier2));
    assert_eq!(tier("fourteen"), Some(PriorityTier::Tier1));
    assert_eq!(tier("thirteen"), Some(PriorityTier::Tier2));
}
