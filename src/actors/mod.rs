//! Actor registry: hand-written organization profiles under `Research/Actors/`.
//!
//! Profiles are never generated. Each one is loaded, keyed by its slug (the
//! `id` field, or the file stem) and scored for prioritization. A profile
//! that does not parse is reported with its path and left out.

pub mod scoring;

use crate::config::Config;
use crate::error::{LandscapeError, LandscapeResult};
use crate::records::ActorRecord;
use crate::report::RunReport;
use crate::store;
use scoring::{score, Score};
use std::path::Path;
use tracing::{debug, info, warn};

/// File in the actors directory that documents the schema.
const TEMPLATE_FILE: &str = "actor-template.yaml";

/// A loaded profile with its prioritization score.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: String,
    pub record: ActorRecord,
    pub score: Score,
}

impl Actor {
    pub fn new(id: impl Into<String>, record: ActorRecord) -> Self {
        let score = score(record.scores.as_ref());
        Self {
            id: id.into(),
            record,
            score,
        }
    }

    pub fn name(&self) -> &str {
        if self.record.name.is_empty() {
            &self.id
        } else {
            &self.record.name
        }
    }
}

/// All actors, sorted by display name.
#[derive(Debug, Clone, Default)]
pub struct ActorRegistry {
    actors: Vec<Actor>,
}

impl ActorRegistry {
    /// Load every profile in `dir`. A missing directory yields no actors.
    pub fn load(dir: &Path) -> LandscapeResult<(Self, Vec<LandscapeError>)> {
        let mut actors = Vec::new();
        let mut problems = Vec::new();

        if !dir.exists() {
            warn!("Actors directory not found at {}", dir.display());
            return Ok((Self::default(), problems));
        }

        for path in store::yaml_files(dir)? {
            if path.file_name().is_some_and(|n| n == TEMPLATE_FILE) {
                continue;
            }
            match store::load_yaml::<ActorRecord>(&path) {
                Ok(Some(record)) => {
                    let stem = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or_default()
                        .to_string();
                    let id = record.id.clone().filter(|id| !id.is_empty()).unwrap_or(stem);
                    actors.push(Actor::new(id, record));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping actor profile: {}", e);
                    problems.push(e);
                }
            }
        }
        debug!("Loaded {} actor profiles", actors.len());
        Ok((Self::from_actors(actors), problems))
    }

    pub fn from_actors(mut actors: Vec<Actor>) -> Self {
        actors.sort_by(|a, b| {
            a.name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Self { actors }
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn get(&self, id: &str) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// Actors that list `iso` among their languages.
    pub fn for_language(&self, iso: &str) -> Vec<&Actor> {
        self.actors.iter().filter(|a| a.record.works_on(iso)).collect()
    }

    /// Actors ordered by tier, then total (highest first), then name.
    /// Incomplete actors come last.
    pub fn ranking(&self) -> Vec<&Actor> {
        let mut ranked: Vec<&Actor> = self.actors.iter().collect();
        ranked.sort_by_key(|a| (a.score.tier().is_none(), a.score.tier(), std::cmp::Reverse(a.score.total())));
        ranked
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

/// Record every actor in a report: incomplete scores are partial, unreadable
/// profiles failed.
pub fn report_actors(registry: &ActorRegistry, problems: &[LandscapeError], report: &mut RunReport) {
    for actor in registry.actors() {
        let subject = format!("actor {}", actor.id);
        match &actor.score {
            Score::Scored { .. } => report.complete(&subject),
            Score::Incomplete { .. } => report.partial(&subject, &actor.score),
        }
    }
    for problem in problems {
        let subject = match problem {
            LandscapeError::MalformedFile { path, .. } | LandscapeError::Io { path, .. } => {
                let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
                format!("actor {}", stem)
            }
            other => other.to_string(),
        };
        report.failed(&subject, problem);
    }
}

/// Plain-text ranking table.
pub fn ranking_table(registry: &ActorRegistry) -> String {
    let mut out = format!("{:<4} {:<40} {:<10} {}\n", "#", "Actor", "Score", "Tier");
    for (i, actor) in registry.ranking().iter().enumerate() {
        let (total, tier) = match &actor.score {
            Score::Scored { total, tier } => (
                format!("{}/{}", total, scoring::MAX_TOTAL),
                format!("{} - {}", tier, tier.description()),
            ),
            Score::Incomplete { .. } => ("—".to_string(), actor.score.to_string()),
        };
        out.push_str(&format!("{:<4} {:<40} {:<10} {}\n", i + 1, actor.name(), total, tier));
    }
    out
}

/// Load and score every actor.
pub fn run_score(config: &Config) -> LandscapeResult<(ActorRegistry, RunReport)> {
    let mut report = RunReport::new("score");
    let (registry, problems) = ActorRegistry::load(&config.actors_dir())?;
    report_actors(&registry, &problems, &mut report);

    let scored = registry.actors().iter().filter(|a| a.score.is_complete()).count();
    info!("Scored {} of {} actors", scored, registry.len());
    Ok((registry, report))
}
