//! Source fetchers and the fetch batch.
//!
//! # Architecture
//!
//! - `grid`: language-metadata reference dataset (local YAML)
//! - `wikipedia`: encyclopedia infobox scrape (remote)
//! - `huggingface`: model/dataset hub search (remote JSON API)
//! - `common_voice`: speech-corpus statistics (local JSON)
//! - `coverage`: coverage lists of large multilingual models (local YAML)
//! - `simbabench`: leaderboard import into a bulk evaluation file
//!
//! [`run_fetch`] processes languages one after another. Every fetcher treats
//! "no data" as a recorded outcome; a language with problems is reported as
//! partial or failed and the batch moves on.

pub mod common_voice;
pub mod coverage;
pub mod grid;
pub mod huggingface;
pub mod simbabench;
pub mod wikipedia;

use crate::config::Config;
use crate::error::LandscapeError;
use crate::evaluations;
use crate::languages::{is_valid_iso_639_3, LanguageRegistry};
use crate::records::{BenchmarksFile, LanguageInfo, WcaLanguageList};
use crate::report::RunReport;
use crate::store::{self, LanguageFiles};
use anyhow::{bail, Context, Result};
use common_voice::CommonVoiceData;
use coverage::CoverageIndex;
use grid::LanguageGrid;
use huggingface::{search_codes, HubClient};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Process only this ISO 639-3 code
    pub lang: Option<String>,
    /// Re-query the hub even when listings already exist
    pub force: bool,
}

/// HTTP client shared by the remote fetchers.
pub fn http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .context("Failed to build HTTP client")
}

/// Local reference data loaded once per run.
struct ReferenceData {
    grid: LanguageGrid,
    common_voice: CommonVoiceData,
    coverage: CoverageIndex,
}

impl ReferenceData {
    fn load(config: &Config, report: &mut RunReport) -> Result<Self> {
        let grid = LanguageGrid::load(&config.grid_path()).context("Failed to load language grid")?;
        info!("Loaded {} languages from the language grid", grid.len());

        let common_voice = match CommonVoiceData::load(&config.common_voice_path()) {
            Ok(data) => data,
            Err(e) => {
                warn!("Corpus statistics unavailable: {}", e);
                report.partial("common voice", e);
                CommonVoiceData::default()
            }
        };
        info!("Loaded {} Common Voice locales", common_voice.len());

        let (coverage, problems) = CoverageIndex::load(&config.coverage_dir())?;
        for problem in problems {
            report.partial("model coverage", problem);
        }

        Ok(Self {
            grid,
            common_voice,
            coverage,
        })
    }
}

/// Languages to process: the focus list, or the one `--lang` names.
fn resolve_languages(
    registry: &LanguageRegistry,
    grid: &LanguageGrid,
    lang: Option<&str>,
) -> Result<Vec<(String, String)>> {
    let Some(code) = lang else {
        return Ok(registry
            .list_all()
            .iter()
            .map(|l| (l.code.clone(), l.name.clone()))
            .collect());
    };

    let code = code.trim().to_lowercase();
    if !is_valid_iso_639_3(&code) {
        bail!("'{}' is not an ISO 639-3 code", code);
    }
    if let Some(language) = registry.get_by_code(&code) {
        return Ok(vec![(code, language.name.clone())]);
    }
    match grid.language_info(&code) {
        Some(info) => Ok(vec![(code, info.name)]),
        None => bail!(
            "Language '{}' is neither a focus language nor in the language grid",
            code
        ),
    }
}

struct LanguageFetcher<'a> {
    config: &'a Config,
    client: &'a reqwest::Client,
    hub: HubClient<'a>,
    reference: &'a ReferenceData,
    force: bool,
}

impl LanguageFetcher<'_> {
    async fn process(&self, iso: &str, registry_name: &str, report: &mut RunReport) {
        let files = LanguageFiles::new(self.config, iso);
        if let Err(e) = files.ensure_dir() {
            report.failed(iso, e);
            return;
        }

        let previous = match store::load_yaml::<LanguageInfo>(&files.info()) {
            Ok(previous) => previous,
            Err(e) => {
                // keep the file so the researcher can repair hand-edited notes
                warn!("{}: existing record unreadable, leaving it untouched", iso);
                report.failed(iso, e);
                return;
            }
        };

        let info = self.build_info(iso, registry_name, previous.as_ref(), report).await;
        match store::write_yaml(&files.info(), &info) {
            Ok(()) => debug!("{}: wrote {}", iso, files.info().display()),
            Err(e) => {
                report.failed(iso, e);
                return;
            }
        }

        self.fetch_listings(&files, &info, report).await;
        self.refresh_corpus_stats(&files, &info, report);

        match store::create_once(&files.notes(), &store::notes_stub(&info)) {
            Ok(true) => debug!("{}: created notes stub", iso),
            Ok(false) => {}
            Err(e) => report.partial(iso, e),
        }

        report.complete(iso);
    }

    async fn build_info(
        &self,
        iso: &str,
        registry_name: &str,
        previous: Option<&LanguageInfo>,
        report: &mut RunReport,
    ) -> LanguageInfo {
        let mut info = match self.reference.grid.language_info(iso) {
            Some(info) => info,
            None => {
                report.partial(iso, "not in the language grid");
                LanguageInfo {
                    name: registry_name.to_string(),
                    iso_639_3: iso.to_string(),
                    ..Default::default()
                }
            }
        };

        match wikipedia::fetch_language_info(self.client, &self.config.wikipedia_base_url, &info.name).await {
            Ok(Some(wiki)) => {
                if info.glottocode.is_none() {
                    info.glottocode = wiki.glottolog.clone();
                }
                let grid_url = info.wikipedia.take().and_then(|w| w.url);
                info.wikipedia = Some(crate::records::WikiInfo {
                    url: grid_url.or(wiki.url.clone()),
                    ..wiki
                });
            }
            Ok(None) => debug!("{}: no encyclopedia page", iso),
            Err(e) => {
                warn!("{}: {}", iso, e);
                report.partial(iso, &e);
                if let Some(previous_wiki) = previous.and_then(|p| p.wikipedia.clone()) {
                    info.wikipedia = Some(previous_wiki);
                }
            }
        }

        info.model_coverage = self.reference.coverage.labels_for(iso);
        if let Some(previous) = previous {
            info.preserve_manual_fields(previous);
        }
        info
    }

    async fn fetch_listings(&self, files: &LanguageFiles, info: &LanguageInfo, report: &mut RunReport) {
        let iso = files.iso();
        let codes = search_codes(&info.iso_639_3, info.iso_639_1.as_deref());

        let models_path = files.models();
        if models_path.exists() && !self.force {
            debug!("{}: models present, skipping (use --force to re-fetch)", iso);
        } else {
            match self.hub.models_for(&codes).await {
                Ok(models) => {
                    if let Err(e) = store::write_yaml(&models_path, &models) {
                        report.partial(iso, e);
                    }
                }
                Err(e) => {
                    warn!("{}: models not refreshed: {}", iso, e);
                    report.partial(iso, e);
                }
            }
        }

        let datasets_path = files.datasets();
        if datasets_path.exists() && !self.force {
            debug!("{}: datasets present, skipping (use --force to re-fetch)", iso);
        } else {
            match self.hub.datasets_for(&codes).await {
                Ok(datasets) => {
                    if let Err(e) = store::write_yaml(&datasets_path, &datasets) {
                        report.partial(iso, e);
                    }
                }
                Err(e) => {
                    warn!("{}: datasets not refreshed: {}", iso, e);
                    report.partial(iso, e);
                }
            }
        }
    }

    /// Replace the corpus statistics; the evaluations section belongs to the distributor.
    fn refresh_corpus_stats(&self, files: &LanguageFiles, info: &LanguageInfo, report: &mut RunReport) {
        let iso = files.iso();
        let path = files.benchmarks();
        let mut benchmarks = match store::read_optional(&path)
            .and_then(|raw| BenchmarksFile::parse(raw.as_deref().unwrap_or(""), &path))
        {
            Ok((benchmarks, _)) => benchmarks,
            Err(e) => {
                warn!("{}: regenerating unreadable {}: {}", iso, path.display(), e);
                BenchmarksFile::default()
            }
        };

        benchmarks.common_voice = self
            .reference
            .common_voice
            .stats_for(&info.iso_639_3, info.iso_639_1.as_deref());
        if benchmarks.common_voice.is_none() {
            debug!("{}: no Common Voice locale", iso);
        }

        if let Err(e) = store::write_yaml(&path, &benchmarks) {
            report.partial(iso, e);
        }
    }
}

fn write_wca_list(config: &Config, grid: &LanguageGrid) -> Result<usize, LandscapeError> {
    let languages = grid.wca_languages();
    let list = WcaLanguageList {
        total: languages.len(),
        languages,
    };
    store::write_yaml(&config.wca_languages_path(), &list)?;
    Ok(list.total)
}

/// Fetch every focus language (or the one in `options.lang`), regenerate the
/// regional language list and redistribute bulk evaluations.
pub async fn run_fetch(
    config: &Config,
    registry: &LanguageRegistry,
    options: &FetchOptions,
) -> Result<RunReport> {
    let mut report = RunReport::new("fetch");
    let reference = ReferenceData::load(config, &mut report)?;
    let languages = resolve_languages(registry, &reference.grid, options.lang.as_deref())?;
    let client = http_client(config)?;

    let fetcher = LanguageFetcher {
        config,
        client: &client,
        hub: HubClient::new(&client, &config.hf_base_url, config.hub_page_limit),
        reference: &reference,
        force: options.force,
    };

    let total = languages.len();
    info!("Fetching {} languages", total);
    for (i, (iso, name)) in languages.iter().enumerate() {
        let progress = i + 1;
        info!("[{}/{}] {} ({})...", progress, total, name, iso);
        fetcher.process(iso, name, &mut report).await;

        match report.status_of(iso) {
            Some(crate::report::Status::Complete) => info!("[{}/{}] ✓ {}", progress, total, iso),
            Some(status) => warn!("[{}/{}] ✗ {} - {}", progress, total, iso, status.label()),
            None => {}
        }

        if progress < total && config.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.request_delay_ms)).await;
        }
    }

    if reference.grid.is_empty() {
        warn!("Language grid is empty, regional language list not regenerated");
    } else {
        match write_wca_list(config, &reference.grid) {
            Ok(count) => info!("Generated {} WCA languages", count),
            Err(e) => report.failed("wca_all_languages", e),
        }
    }

    let focus = registry.codes();
    report.absorb(evaluations::run_distribute(config, &focus)?);

    Ok(report)
}
