use super::markdown::{cell, document_header, field_list, heading, link, table};
use crate::actors::ActorRegistry;
use crate::config::Config;
use crate::evaluations::{merge_all, BenchmarkTable};
use crate::languages::countries::filter_wca;
use crate::records::{LanguageInfo, TaskType, TechResource};
use crate::render::format::{compact_count, hub_search_url, DASH};
use crate::render::markdown::is_stub;
use crate::store::LanguageData;

/// Models listed per task in a language section.
const LISTED_MODELS: usize = 5;

/// Anchor of a language section.
pub fn anchor(iso: &str) -> String {
    format!("lang_{}", iso)
}

fn display_name(data: &LanguageData) -> String {
    data.info
        .as_ref()
        .map(|i| i.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| data.iso.clone())
}

fn speakers(info: &LanguageInfo) -> String {
    let wiki = info.wikipedia.as_ref();
    match (
        wiki.and_then(|w| w.speakers_l1.as_deref()),
        wiki.and_then(|w| w.speakers_l2.as_deref()),
    ) {
        (Some(l1), Some(l2)) => format!("{} / {}", l1, l2),
        (Some(l1), None) => l1.to_string(),
        _ => DASH.to_string(),
    }
}

fn countries_summary(info: &LanguageInfo) -> String {
    let wca = filter_wca(&info.countries);
    let mut out = wca.iter().take(5).copied().collect::<Vec<_>>().join(", ");
    if wca.len() > 5 {
        out.push_str(&format!(" +{}", wca.len() - 5));
    }
    out
}

fn model_total(data: &LanguageData) -> u64 {
    data.models.values().map(|l| l.total_count).sum()
}

fn benchmark_rows(data: &LanguageData) -> usize {
    merge_all(&data.benchmarks.evaluations, &data.manual.evaluations)
        .values()
        .flatten()
        .filter(|r| !r.is_placeholder())
        .count()
}

/// Languages document: summary table, then one section per language.
/// `languages` must already be sorted for display.
pub fn languages_markdown(
    config: &Config,
    languages: &[&LanguageData],
    actors: &ActorRegistry,
    generated_at: &str,
) -> String {
    let mut out = document_header(
        "WCA NLP Landscape: Languages",
        generated_at,
        &config.repo_url,
        &config.live_url,
    );

    out.push_str(&heading(1, "Summary", None));
    out.push_str(&format!("{} focus languages covered.\n\n", languages.len()));

    let fallback = LanguageInfo::default();
    let rows: Vec<Vec<String>> = languages
        .iter()
        .map(|data| {
            let info = data.info.as_ref().unwrap_or(&fallback);
            vec![
                link(&display_name(data), &format!("#{}", anchor(&data.iso))),
                cell(&data.iso),
                cell(&countries_summary(info)),
                cell(info.family().unwrap_or_default()),
                cell(&speakers(info)),
                model_total(data).to_string(),
                if benchmark_rows(data) > 0 { "✓" } else { "✗" }.to_string(),
            ]
        })
        .collect();
    out.push_str(&table(
        &["Language", "ISO", "Countries", "Family", "Speakers (L1/L2)", "HF Models", "Benchmarks"],
        &rows,
    ));

    for data in languages {
        out.push_str(&language_section(config, data, actors));
    }
    out
}

/// Researcher notes demoted below the section headings. The leading
/// `# {name}` heading of `notes.md` is dropped.
fn notes_markdown(notes: &str, name: &str) -> String {
    let mut out = String::new();
    for line in notes.trim().lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("# ") && trimmed[2..].trim() == name {
            continue;
        }
        if trimmed.starts_with('#') {
            out.push_str("##");
        }
        out.push_str(line);
        out.push('\n');
    }
    format!("{}\n", out.trim())
}

/// One language section. Every subsection is always present, in the same
/// order as the language page of the site.
fn language_section(config: &Config, data: &LanguageData, actors: &ActorRegistry) -> String {
    let fallback = LanguageInfo::default();
    let info = data.info.as_ref().unwrap_or(&fallback);
    let name = display_name(data);

    let mut out = heading(1, &format!("{} ({})", name, data.iso), Some(&anchor(&data.iso)));

    out.push_str(&heading(2, "General Information", None));
    let mut fields = vec![
        ("ISO 639-1", info.iso_639_1.clone()),
        ("French name", info.name_french.clone()),
        ("Alternative names", Some(info.altnames.join(", "))),
        ("Countries", Some(info.countries.join(", "))),
        ("Population", info.population.clone()),
        ("Endangerment", info.endangerment.clone()),
        ("Official status", info.official_status.clone()),
        (
            "Glottocode",
            info.glottocode.as_deref().map(|code| match &info.glottocode_url {
                Some(url) => link(code, url),
                None => code.to_string(),
            }),
        ),
    ];
    fields.extend(
        info.resource_links
            .iter()
            .map(|(label, url)| (label.as_str(), Some(link(url, url)))),
    );
    let general = field_list(&fields);
    out.push_str(if general.is_empty() { "No general information recorded.\n\n" } else { &general });

    out.push_str(&heading(2, "Usage Context", None));
    let wiki = info.wikipedia.clone().unwrap_or_default();
    let usage = field_list(&[
        ("Language family", wiki.family.clone()),
        ("L1 speakers", wiki.speakers_l1.clone()),
        ("L2 speakers", wiki.speakers_l2.clone()),
        ("Writing system", wiki.writing_system.clone()),
        ("Wikipedia", wiki.url.as_deref().map(|u| link(u, u))),
    ]);
    out.push_str(if usage.is_empty() { "No encyclopedia data.\n\n" } else { &usage });
    for notes in [info.notes.as_deref(), data.notes.as_deref()].into_iter().flatten() {
        if !is_stub(notes) {
            out.push_str(&notes_markdown(notes, &name));
            out.push('\n');
        }
    }

    let language_actors = actors.for_language(&data.iso);
    out.push_str(&heading(2, &format!("Actors ({})", language_actors.len()), None));
    if language_actors.is_empty() {
        out.push_str("No actors recorded for this language.\n\n");
    } else {
        for actor in language_actors {
            let name = match &actor.record.website {
                Some(url) => link(actor.name(), url),
                None => actor.name().to_string(),
            };
            out.push_str(&format!("- {} ({})\n", name, actor.score));
        }
        out.push('\n');
    }

    out.push_str(&heading(2, "Tech Resources", None));
    if info.tech_resources.is_empty() && info.model_coverage.is_empty() {
        out.push_str("No tech resources recorded.\n\n");
    } else {
        for (label, resource) in &info.tech_resources {
            let value = match (resource, resource.link()) {
                (_, Some(url)) => link(url, url),
                (TechResource::Text(text), None) => text.clone(),
                (TechResource::Flag(true), None) => "✓".to_string(),
                (TechResource::Flag(false), None) => "✗".to_string(),
            };
            out.push_str(&format!("- **{}:** {}\n", label, value));
        }
        if !info.model_coverage.is_empty() {
            out.push_str(&format!("- **Covered by:** {}\n", info.model_coverage.join(", ")));
        }
        out.push('\n');
    }

    out.push_str(&heading(2, "Corpus Statistics", None));
    match &data.benchmarks.common_voice {
        Some(cv) => out.push_str(&table(
            &["Locale", "Hours", "Validated clips", "Total clips", "Train / Dev / Test", "Male / Female"],
            &[vec![
                cell(&cv.locale),
                format!("{:.1}", cv.total_hours),
                cv.validated_clips.to_string(),
                cv.total_clips.to_string(),
                format!("{} / {} / {}", cv.train_clips, cv.dev_clips, cv.test_clips),
                format!("{:.0}% / {:.0}%", cv.male_percent, cv.female_percent),
            ]],
        )),
        None => out.push_str("No Common Voice data.\n\n"),
    }

    out.push_str(&heading(2, "Benchmarks", None));
    for (task, rows) in merge_all(&data.benchmarks.evaluations, &data.manual.evaluations) {
        let bench = BenchmarkTable::build(task, &rows);
        out.push_str(&heading(3, task.label(), None));
        if bench.is_empty() {
            out.push_str("No benchmark results yet.\n\n");
            continue;
        }
        let columns = bench.columns();
        let headers: Vec<&str> = columns.iter().map(String::as_str).collect();
        let rows: Vec<Vec<String>> = bench
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    match &row.model_url {
                        Some(url) => link(&row.model, url),
                        None => cell(&row.model),
                    },
                    cell(&row.test_set),
                ];
                cells.extend(row.cells.iter().map(|c| cell(c)));
                cells.push(match &row.source_url {
                    Some(url) => link(&row.source, url),
                    None => cell(&row.source),
                });
                cells
            })
            .collect();
        out.push_str(&table(&headers, &rows));
    }

    let code = info
        .iso_639_1
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| data.iso.clone());

    out.push_str(&heading(2, "Models", None));
    for task in TaskType::ALL {
        let listing = data.models.get(&task).cloned().unwrap_or_default();
        let search = hub_search_url(&config.hf_base_url, false, task, &code);
        out.push_str(&format!(
            "- **{}:** {} ({})\n",
            task.short_label(),
            listing.total_count,
            link("search", &search)
        ));
        for item in listing.items.iter().take(LISTED_MODELS) {
            out.push_str(&format!(
                "    - {} ({} downloads)\n",
                link(&item.name, &item.url),
                compact_count(item.downloads)
            ));
        }
    }
    out.push('\n');

    out.push_str(&heading(2, "Datasets", None));
    for task in TaskType::WITH_DATASETS {
        let total = data.datasets.get(&task).map(|l| l.total_count).unwrap_or(0);
        let search = hub_search_url(&config.hf_base_url, true, task, &code);
        out.push_str(&format!(
            "- **{}:** {} ({})\n",
            task.short_label(),
            total,
            link("search", &search)
        ));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn language(iso: &str, info: &str) -> LanguageData {
        LanguageData {
            iso: iso.to_string(),
            info: Some(serde_yaml::from_str(info).unwrap()),
            ..Default::default()
        }
    }

    // ==================== Section Tests ====================

    #[test]
    fn test_sections_follow_site_order_even_when_empty() {
        let config = Config::for_root("/tmp/landscape");
        let data = language("fuc", "name: Pulaar\niso_639_3: fuc\n");
        let md = language_section(&config, &data, &ActorRegistry::default());

        let positions: Vec<usize> = [
            "## General Information",
            "## Usage Context",
            "## Actors (0)",
            "## Tech Resources",
            "## Corpus Statistics",
            "## Benchmarks",
            "## Models",
            "## Datasets",
        ]
        .iter()
        .map(|h| md.find(h).unwrap_or_else(|| panic!("missing {}", h)))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(md.contains("No encyclopedia data."));
        assert!(md.contains("No actors recorded for this language."));
        assert!(md.contains("No Common Voice data."));
    }

    #[test]
    fn test_usage_context_carries_encyclopedia_and_notes() {
        let config = Config::for_root("/tmp/landscape");
        let mut data = language(
            "wol",
            "name: Wolof\niso_639_3: wol\nwikipedia:\n  family: Niger-Congo\n  writing_system: Latin\n",
        );
        data.notes = Some("# Wolof\n\n## Radio\n\nWidely used on community radio.\n".to_string());
        let md = language_section(&config, &data, &ActorRegistry::default());

        let usage = md.find("## Usage Context").unwrap();
        let actors = md.find("## Actors").unwrap();
        let family = md.find("Niger-Congo").unwrap();
        let notes = md.find("Widely used on community radio.").unwrap();
        assert!(usage < family && family < actors);
        assert!(usage < notes && notes < actors);
        assert!(md.contains("#### Radio"));
        assert!(!md.contains("\n# Wolof\n"));
    }

    #[test]
    fn test_stub_notes_are_left_out() {
        let config = Config::for_root("/tmp/landscape");
        let mut data = language("wol", "name: Wolof\niso_639_3: wol\n");
        data.notes = Some("# Wolof\n\n(Add manual observations here)\n".to_string());
        let md = language_section(&config, &data, &ActorRegistry::default());
        assert!(!md.contains("(Add manual"));
    }
}
