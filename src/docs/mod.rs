//! Office documents: one for the focus languages, one for the actors.
//!
//! Each document is written as pandoc Markdown (`output/docs/*.md`) with a
//! summary table whose name cells link to per-entity sections, then converted
//! to `.docx` by the external converter. A missing or failing converter keeps
//! the Markdown and is reported; it never aborts the run.

mod actors;
mod languages;
pub mod markdown;
mod pandoc;

pub use actors::actors_markdown;
pub use languages::languages_markdown;
pub use pandoc::convert;

use crate::actors::{report_actors, ActorRegistry};
use crate::config::Config;
use crate::languages::LanguageRegistry;
use crate::render::TIMESTAMP_FORMAT;
use crate::report::RunReport;
use crate::store::{self, LanguageData};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Which documents to produce. Neither flag set means both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocSelection {
    pub languages: bool,
    pub actors: bool,
}

impl DocSelection {
    pub fn from_flags(languages: bool, actors: bool) -> Self {
        if !languages && !actors {
            Self {
                languages: true,
                actors: true,
            }
        } else {
            Self { languages, actors }
        }
    }
}

const LANGUAGES_DOC: &str = "languages";
const ACTORS_DOC: &str = "actors";

/// Write `{name}.md` and convert it. Only a failed Markdown write is an error.
fn publish(config: &Config, name: &str, content: &str, report: &mut RunReport) -> Result<()> {
    let docs_dir = config.docs_dir();
    let md_path = docs_dir.join(format!("{}.md", name));
    let docx_path = docs_dir.join(format!("{}.docx", name));

    store::write_text(&md_path, content)
        .with_context(|| format!("Failed to write {}", md_path.display()))?;
    info!("Wrote {}", md_path.display());

    let subject = file_name(&docx_path);
    match convert(&config.pandoc_path, &md_path, &docx_path) {
        Ok(()) => {
            info!("Converted {}", docx_path.display());
            report.complete(&subject);
        }
        Err(e) => {
            warn!("{} (Markdown kept at {})", e, md_path.display());
            report.failed(&subject, e);
        }
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Focus languages that could be read, sorted by display name.
fn load_focus_languages(
    config: &Config,
    registry: &LanguageRegistry,
    report: &mut RunReport,
) -> Vec<LanguageData> {
    let mut languages: Vec<LanguageData> = Vec::new();
    for code in registry.codes() {
        let data = store::load_language(config, code);
        if data.is_failed() {
            for problem in &data.problems {
                report.failed(code, problem);
            }
            continue;
        }
        if data.info.is_none() {
            report.partial(code, "no info.yaml, documented with placeholders");
        }
        report.complete(code);
        languages.push(data);
    }
    languages.sort_by_key(|data| {
        data.info
            .as_ref()
            .map(|i| i.name.to_lowercase())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| data.iso.clone())
    });
    languages
}

/// Generate the selected documents.
pub fn run_docs(
    config: &Config,
    registry: &LanguageRegistry,
    selection: DocSelection,
    generated_at: DateTime<Utc>,
) -> Result<RunReport> {
    let mut report = RunReport::new("docs");
    let generated_at = generated_at.format(TIMESTAMP_FORMAT).to_string();

    let languages = load_focus_languages(config, registry, &mut report);
    let (actors, actor_problems) =
        ActorRegistry::load(&config.actors_dir()).context("Failed to read actor profiles")?;

    if selection.languages {
        let refs: Vec<&LanguageData> = languages.iter().collect();
        let content = languages_markdown(config, &refs, &actors, &generated_at);
        publish(config, LANGUAGES_DOC, &content, &mut report)?;
    }

    if selection.actors {
        report_actors(&actors, &actor_problems, &mut report);
        let names: BTreeMap<String, String> = languages
            .iter()
            .filter_map(|data| data.info.as_ref().map(|i| (data.iso.clone(), i.name.clone())))
            .collect();
        let content = actors_markdown(config, &actors, &names, &generated_at);
        publish(config, ACTORS_DOC, &content, &mut report)?;
    }

    Ok(report)
}
