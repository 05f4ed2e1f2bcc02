//! Static site renderer.
//!
//! Reads the current YAML state and writes `output/index.html`,
//! `output/lang/{iso}.html` and `output/actor/{id}.html`. Output depends only
//! on the files on disk and the timestamp passed in, so re-running without
//! changes reproduces the same bytes.
//!
//! A language whose files cannot be read gets no page; the index still
//! lists it, unlinked, and the run report names the file.

pub mod format;
pub mod markdown;
mod site;
pub mod views;

pub use site::SiteRenderer;

use crate::actors::{report_actors, ActorRegistry};
use crate::config::Config;
use crate::evaluations::tracked_languages;
use crate::languages::LanguageRegistry;
use crate::records::{SourceCatalog, WcaLanguageList};
use crate::report::RunReport;
use crate::store::{self, LanguageData};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use views::SiteData;

/// Timestamp format printed on every page.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

fn load_wca_list(config: &Config, report: &mut RunReport) -> WcaLanguageList {
    match store::load_yaml::<WcaLanguageList>(&config.wca_languages_path()) {
        Ok(Some(list)) => list,
        Ok(None) => {
            warn!("No regional language list yet; run fetch first");
            WcaLanguageList::default()
        }
        Err(e) => {
            report.failed("wca_all_languages", &e);
            WcaLanguageList::default()
        }
    }
}

fn load_sources(config: &Config, report: &mut RunReport) -> SourceCatalog {
    match SourceCatalog::load(&config.sources_path()) {
        Ok((catalog, skipped)) => {
            for problem in &skipped {
                report.partial("sources", problem);
            }
            catalog
        }
        Err(e) => {
            report.failed("sources", &e);
            SourceCatalog::default()
        }
    }
}

fn record_language(data: &LanguageData, report: &mut RunReport) {
    if data.is_failed() {
        for problem in &data.problems {
            report.failed(&data.iso, problem);
        }
    } else if data.info.is_none() {
        report.partial(&data.iso, "no info.yaml, rendered with placeholders");
    } else {
        for problem in &data.problems {
            report.partial(&data.iso, problem);
        }
    }
}

/// Regenerate the whole site.
pub fn render_site(
    config: &Config,
    registry: &LanguageRegistry,
    generated_at: DateTime<Utc>,
) -> Result<RunReport> {
    let mut report = RunReport::new("site");

    let languages: Vec<LanguageData> = tracked_languages(config, &registry.codes())
        .iter()
        .map(|iso| store::load_language(config, iso))
        .collect();
    let wca = load_wca_list(config, &mut report);
    let (actors, actor_problems) =
        ActorRegistry::load(&config.actors_dir()).context("Failed to read actor profiles")?;
    report_actors(&actors, &actor_problems, &mut report);
    let sources = load_sources(config, &mut report);

    let site = SiteData {
        config,
        registry,
        languages: &languages,
        wca: &wca,
        actors: &actors,
        sources: &sources,
        generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
    };
    let renderer = SiteRenderer::new()?;
    let output_dir = config.output_dir();

    let index_html = renderer.index(&views::index(&site))?;
    store::write_text(&output_dir.join("index.html"), &index_html)
        .context("Failed to write the site index")?;

    let total = languages.len();
    for (i, data) in languages.iter().enumerate() {
        record_language(data, &mut report);
        if data.is_failed() {
            warn!("[{}/{}] {} ✗ not rendered", i + 1, total, data.iso);
            continue;
        }

        let path = output_dir.join("lang").join(format!("{}.html", data.iso));
        let written = renderer
            .language(&views::language_page(&site, data))
            .and_then(|html| store::write_text(&path, &html).map_err(Into::into));
        match written {
            Ok(()) => {
                info!("[{}/{}] {} ✓", i + 1, total, data.iso);
                report.complete(&data.iso);
            }
            Err(e) => {
                warn!("[{}/{}] {} ✗ {}", i + 1, total, data.iso, e);
                report.failed(&data.iso, e);
            }
        }
    }

    for actor in actors.actors() {
        let path = output_dir.join("actor").join(format!("{}.html", actor.id));
        let written = renderer
            .actor(&views::actor_page(&site, actor))
            .and_then(|html| store::write_text(&path, &html).map_err(Into::into));
        if let Err(e) = written {
            report.failed(&format!("actor {}", actor.id), e);
        }
    }

    info!(
        "Site written to {} ({} language pages, {} actor pages)",
        output_dir.display(),
        languages.iter().filter(|l| !l.is_failed()).count(),
        actors.len()
    );
    Ok(report)
}
