//! On-disk layout of the research tree and the file ownership rules.
//!
//! Auto-generated files belong to the fetch stage and may be replaced on
//! every run. Manual files belong to the researcher: they are created at most
//! once (as a stub) and never rewritten. Every write goes to a temporary file
//! in the target directory and is renamed over the target, so an interrupted
//! run leaves the previous file intact.

use crate::config::Config;
use crate::error::{LandscapeError, LandscapeResult};
use crate::records::{
    BenchmarksFile, DatasetsFile, HubListing, LanguageInfo, ManualEvaluationsFile, ModelsFile,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub const INFO_FILE: &str = "info.yaml";
pub const MODELS_FILE: &str = "models.yaml";
pub const DATASETS_FILE: &str = "datasets.yaml";
pub const BENCHMARKS_FILE: &str = "benchmarks.yaml";
pub const MANUAL_EVALUATIONS_FILE: &str = "manual_evaluations.yaml";
pub const NOTES_FILE: &str = "notes.md";

/// Files the researcher owns. The fetch stage may create them, never replace them.
const MANUAL_FILES: &[&str] = &[MANUAL_EVALUATIONS_FILE, NOTES_FILE, "focused_languages.yaml"];

pub fn is_manual_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| MANUAL_FILES.contains(&n))
        .unwrap_or(false)
}

/// Paths of one language's files.
#[derive(Debug, Clone)]
pub struct LanguageFiles {
    iso: String,
    dir: PathBuf,
}

impl LanguageFiles {
    pub fn new(config: &Config, iso: &str) -> Self {
        Self {
            iso: iso.to_string(),
            dir: config.language_dir(iso),
        }
    }

    pub fn iso(&self) -> &str {
        &self.iso
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn info(&self) -> PathBuf {
        self.dir.join(INFO_FILE)
    }

    pub fn models(&self) -> PathBuf {
        self.dir.join(MODELS_FILE)
    }

    pub fn datasets(&self) -> PathBuf {
        self.dir.join(DATASETS_FILE)
    }

    pub fn benchmarks(&self) -> PathBuf {
        self.dir.join(BENCHMARKS_FILE)
    }

    pub fn manual_evaluations(&self) -> PathBuf {
        self.dir.join(MANUAL_EVALUATIONS_FILE)
    }

    pub fn notes(&self) -> PathBuf {
        self.dir.join(NOTES_FILE)
    }

    pub fn ensure_dir(&self) -> LandscapeResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| LandscapeError::io(&self.dir, e))
    }
}

/// Read a file, treating "not found" as absence.
pub fn read_optional(path: &Path) -> LandscapeResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LandscapeError::io(path, e)),
    }
}

/// Parse a YAML file if it exists. Syntax errors name the file.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> LandscapeResult<Option<T>> {
    let Some(raw) = read_optional(path)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_yaml::from_str(&raw)
        .map(Some)
        .map_err(|e| LandscapeError::malformed(path, e))
}

/// Atomically replace `path` with `content`.
///
/// Refuses to replace an existing researcher-owned file.
pub fn write_text(path: &Path, content: &str) -> LandscapeResult<()> {
    if is_manual_file(path) && path.exists() {
        return Err(LandscapeError::io(
            path,
            std::io::Error::new(ErrorKind::AlreadyExists, "manual file is never overwritten"),
        ));
    }

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| LandscapeError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| LandscapeError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| LandscapeError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| LandscapeError::io(path, e.error))?;

    debug!("Saved {}", path.display());
    Ok(())
}

/// Serialize `value` and atomically replace `path`.
pub fn write_yaml<T: Serialize>(path: &Path, value: &T) -> LandscapeResult<()> {
    let yaml = serde_yaml::to_string(value).map_err(|e| LandscapeError::malformed(path, e))?;
    write_text(path, &yaml)
}

/// Create a file only if it does not exist yet. Returns whether it was created.
pub fn create_once(path: &Path, content: &str) -> LandscapeResult<bool> {
    if path.exists() {
        return Ok(false);
    }
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| LandscapeError::io(dir, e))?;

    // create_new fails instead of truncating if the file appeared meanwhile
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(mut file) => {
            file.write_all(content.as_bytes())
                .map_err(|e| LandscapeError::io(path, e))?;
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(LandscapeError::io(path, e)),
    }
}

/// `*.yaml` files of a directory, sorted by name.
pub fn yaml_files(dir: &Path) -> LandscapeResult<Vec<PathBuf>> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| LandscapeError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "yaml"))
        .collect();
    files.sort();
    Ok(files)
}

/// Initial content of a language's `notes.md`.
pub fn notes_stub(info: &LanguageInfo) -> String {
    let countries = info
        .countries
        .iter()
        .take(5)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "# {}\n\nISO 639-3: {}\nCountries: {}\n\n## Observations\n\n(Add manual observations here)\n\n## Gaps\n\n(Note any gaps in available resources)\n\n## Recommendations\n\n(Add recommendations here)\n",
        info.name, info.iso_639_3, countries
    )
}

/// Everything on disk about one language, as read for rendering.
#[derive(Debug, Default)]
pub struct LanguageData {
    pub iso: String,
    pub info: Option<LanguageInfo>,
    pub models: ModelsFile,
    pub datasets: DatasetsFile,
    pub benchmarks: BenchmarksFile,
    pub manual: ManualEvaluationsFile,
    pub notes: Option<String>,
    /// Files that could not be used. Malformed files make the record fail;
    /// stale task keys only degrade it.
    pub problems: Vec<LandscapeError>,
}

impl LanguageData {
    pub fn is_failed(&self) -> bool {
        self.problems
            .iter()
            .any(|p| matches!(p, LandscapeError::MalformedFile { .. } | LandscapeError::Io { .. }))
    }

    pub fn is_partial(&self) -> bool {
        self.info.is_none() || !self.problems.is_empty()
    }
}

/// Load a language's files. Never fails: problems are collected on the result.
pub fn load_language(config: &Config, iso: &str) -> LanguageData {
    let files = LanguageFiles::new(config, iso);
    let mut data = LanguageData {
        iso: iso.to_string(),
        ..Default::default()
    };

    match load_yaml::<LanguageInfo>(&files.info()) {
        Ok(info) => data.info = info,
        Err(e) => data.problems.push(e),
    }

    for (path, target) in [
        (files.models(), &mut data.models),
        (files.datasets(), &mut data.datasets),
    ] {
        match read_optional(&path).and_then(|raw| match raw {
            Some(raw) => HubListing::parse_file(&raw, &path),
            None => Ok(Default::default()),
        }) {
            Ok((listings, skipped)) => {
                *target = listings;
                data.problems.extend(skipped);
            }
            Err(e) => data.problems.push(e),
        }
    }

    let benchmarks_path = files.benchmarks();
    match read_optional(&benchmarks_path)
        .and_then(|raw| BenchmarksFile::parse(raw.as_deref().unwrap_or(""), &benchmarks_path))
    {
        Ok((benchmarks, skipped)) => {
            data.benchmarks = benchmarks;
            data.problems.extend(skipped);
        }
        Err(e) => data.problems.push(e),
    }

    let manual_path = files.manual_evaluations();
    match read_optional(&manual_path)
        .and_then(|raw| ManualEvaluationsFile::parse(raw.as_deref().unwrap_or(""), &manual_path))
    {
        Ok((manual, skipped)) => {
            data.manual = manual;
            data.problems.extend(skipped);
        }
        Err(e) => data.problems.push(e),
    }

    match read_optional(&files.notes()) {
        Ok(notes) => data.notes = notes,
        Err(e) => data.problems.push(e),
    }

    for problem in &data.problems {
        warn!("{}: {}", iso, problem);
    }
    data
}
