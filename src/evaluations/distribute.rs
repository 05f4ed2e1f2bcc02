//! Fan-out of bulk evaluation files into per-language evaluation sections.

use crate::config::Config;
use crate::error::{LandscapeError, LandscapeResult};
use crate::records::{BenchmarksFile, BulkEvaluationFile, TaskEvaluations};
use crate::report::RunReport;
use crate::store::{self, LanguageFiles};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Per-language evaluations produced by [`distribute`], keyed by ISO 639-3 code.
pub type Distribution = BTreeMap<String, TaskEvaluations>;

/// Load every bulk file in `dir`, in file-name order.
///
/// Files that cannot be read or parsed are skipped and returned with their
/// error, as are model entries without a valid task.
pub fn load_bulk_files(
    dir: &Path,
) -> LandscapeResult<(Vec<(PathBuf, BulkEvaluationFile)>, Vec<LandscapeError>)> {
    let mut files = Vec::new();
    let mut problems = Vec::new();

    if !dir.exists() {
        debug!("No evaluation directory at {}", dir.display());
        return Ok((files, problems));
    }

    for path in store::yaml_files(dir)? {
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                let e = LandscapeError::io(&path, e);
                warn!("Skipping bulk evaluation file: {}", e);
                problems.push(e);
                continue;
            }
        };
        match BulkEvaluationFile::parse(&raw, &path) {
            Ok((bulk, skipped)) => {
                debug!("{}: {} model entries", path.display(), bulk.models.len());
                for e in &skipped {
                    warn!("Skipping bulk evaluation entry: {}", e);
                }
                problems.extend(skipped);
                files.push((path, bulk));
            }
            Err(e) => {
                warn!("Skipping bulk evaluation file: {}", e);
                problems.push(e);
            }
        }
    }
    Ok((files, problems))
}

/// Fan bulk files out by language. Entries keep file order, then model order.
pub fn distribute<'a>(files: impl IntoIterator<Item = &'a BulkEvaluationFile>) -> Distribution {
    let mut by_language = Distribution::new();
    for bulk in files {
        for model in &bulk.models {
            for iso in model.results.keys() {
                if let Some(entry) = model.entry_for(iso) {
                    by_language
                        .entry(iso.clone())
                        .or_default()
                        .entry(model.task)
                        .or_default()
                        .push(entry);
                }
            }
        }
    }
    by_language
}

/// Replace the evaluations section of each language's `benchmarks.yaml`.
///
/// A language with no results gets an empty section; its directory is not
/// created just for that. Corpus statistics in the file are kept.
pub fn write_distribution(config: &Config, languages: &[String], distribution: &Distribution) -> RunReport {
    let mut report = RunReport::new("distribute");

    for iso in languages {
        let files = LanguageFiles::new(config, iso);
        let evaluations = distribution.get(iso).cloned().unwrap_or_default();
        if evaluations.is_empty() && !files.dir().exists() {
            continue;
        }

        match rewrite_section(&files, evaluations) {
            Ok(count) => {
                debug!("{}: {} evaluation entries", iso, count);
                report.complete(iso);
            }
            Err(e) => {
                warn!("{}: evaluations not written: {}", iso, e);
                report.failed(iso, e);
            }
        }
    }

    let untracked: Vec<&str> = distribution
        .keys()
        .filter(|iso| !languages.contains(iso))
        .map(String::as_str)
        .collect();
    if !untracked.is_empty() {
        debug!("Bulk results for untracked languages ignored: {}", untracked.join(", "));
    }

    report
}

fn rewrite_section(files: &LanguageFiles, evaluations: TaskEvaluations) -> LandscapeResult<usize> {
    let path = files.benchmarks();
    let raw = store::read_optional(&path)?;
    let (mut benchmarks, skipped) = BenchmarksFile::parse(raw.as_deref().unwrap_or(""), &path)?;
    for stale in &skipped {
        debug!("Dropping stale section: {}", stale);
    }

    let count = evaluations.values().map(Vec::len).sum();
    benchmarks.evaluations = evaluations;
    files.ensure_dir()?;
    store::write_yaml(&path, &benchmarks)?;
    Ok(count)
}

/// Languages whose evaluations are rebuilt: the focus list plus any other
/// language directory already on disk.
pub fn tracked_languages(config: &Config, focus: &[&str]) -> Vec<String> {
    let mut languages: Vec<String> = focus.iter().map(|c| c.to_string()).collect();

    let mut on_disk: Vec<String> = std::fs::read_dir(config.languages_dir())
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| crate::languages::is_valid_iso_639_3(name) && !languages.contains(name))
        .collect();
    on_disk.sort();
    languages.extend(on_disk);
    languages
}

/// Load, distribute and write in one pass.
pub fn run_distribute(config: &Config, focus: &[&str]) -> LandscapeResult<RunReport> {
    let (bulk_files, problems) = load_bulk_files(&config.evaluations_dir())?;
    info!("Loaded {} bulk evaluation files", bulk_files.len());

    let distribution = distribute(bulk_files.iter().map(|(_, bulk)| bulk));
    let languages = tracked_languages(config, focus);
    let mut report = write_distribution(config, &languages, &distribution);

    // Unreadable files are failed; files with rejected entries still count.
    for problem in problems {
        match &problem {
            LandscapeError::MalformedFile { path, .. } | LandscapeError::Io { path, .. } => {
                report.failed(&path.display().to_string(), &problem)
            }
            LandscapeError::UnknownTask { path, .. } | LandscapeError::SchemaMismatch { path, .. } => {
                report.partial(&path.display().to_string(), &problem)
            }
            other => report.failed(&other.to_string(), other),
        }
    }

    let with_results = languages.iter().filter(|iso| distribution.contains_key(*iso)).count();
    info!(
        "Distributed evaluations to {} of {} languages",
        with_results,
        languages.len()
    );
    Ok(report)
}
