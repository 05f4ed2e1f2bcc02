//! Serde view models handed to the site templates.
//!
//! Every value a template prints is computed here: templates only loop and
//! branch. Hrefs are relative to the page that shows them (`lang/x.html` from
//! the index, `../actor/y.html` from a detail page).

use super::format::{compact_count, hub_search_url, or_dash, summarize_list, truncate, url_handle, DASH};
use super::markdown;
use crate::actors::{Actor, ActorRegistry};
use crate::config::Config;
use crate::evaluations::{merge_all, BenchmarkTable};
use crate::languages::countries::{country_name, wca_code, wca_countries};
use crate::languages::LanguageRegistry;
use crate::records::{
    CommonVoiceStats, Contact, HubListing, LanguageInfo, Person, ProjectRef, Publication,
    SourceCatalog, TaskType, WcaLanguageList,
};
use crate::store::LanguageData;
use serde::Serialize;
use std::collections::BTreeMap;

/// Items listed per hub task before the "more on the hub" link.
const LISTED_ITEMS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub label: String,
    pub href: Option<String>,
}

/// A labelled value; `href` turns the value into a link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
    pub href: Option<String>,
}

impl Field {
    fn text(label: &str, value: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            value: or_dash(value),
            href: None,
        }
    }

    fn link(label: &str, value: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            href: Some(href.to_string()),
        }
    }
}

/// Everything the site needs, loaded once per run.
pub struct SiteData<'a> {
    pub config: &'a Config,
    pub registry: &'a LanguageRegistry,
    pub languages: &'a [LanguageData],
    pub wca: &'a WcaLanguageList,
    pub actors: &'a ActorRegistry,
    pub sources: &'a SourceCatalog,
    pub generated_at: String,
}

impl SiteData<'_> {
    pub fn language(&self, iso: &str) -> Option<&LanguageData> {
        self.languages.iter().find(|l| l.iso == iso)
    }

    /// Languages whose files could be read get a page.
    pub fn has_page(&self, iso: &str) -> bool {
        self.language(iso).is_some_and(|l| !l.is_failed())
    }

    pub fn language_name(&self, iso: &str) -> String {
        self.language(iso)
            .and_then(|l| l.info.as_ref())
            .map(|info| info.name.clone())
            .filter(|name| !name.is_empty())
            .or_else(|| self.registry.get_by_code(iso).map(|l| l.name.clone()))
            .or_else(|| {
                self.wca
                    .languages
                    .iter()
                    .find(|l| l.iso_639_3 == iso)
                    .map(|l| l.name.clone())
            })
            .unwrap_or_else(|| iso.to_string())
    }

    fn language_href(&self, iso: &str, prefix: &str) -> Option<String> {
        self.has_page(iso).then(|| format!("{}lang/{}.html", prefix, iso))
    }
}

// ==================== Index ====================

#[derive(Debug, Serialize)]
pub struct TaskCount {
    pub label: &'static str,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct LanguageCard {
    pub iso: String,
    pub name: String,
    pub href: Option<String>,
    pub tier: &'static str,
    pub family: String,
    pub population: String,
    pub countries: String,
    pub search: String,
    pub models: Vec<TaskCount>,
    pub datasets: Vec<TaskCount>,
    pub corpus: Option<String>,
    pub actor_count: usize,
    pub benchmark_count: usize,
    pub status: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct AllLanguageRow {
    pub iso: String,
    pub name: String,
    pub href: Option<String>,
    pub countries: String,
    pub population: String,
    pub population_value: u64,
    pub endangerment: String,
    pub focus: bool,
}

#[derive(Debug, Serialize)]
pub struct CountryLanguage {
    pub iso: String,
    pub name: String,
    pub href: Option<String>,
    pub population: String,
    pub focus: bool,
}

#[derive(Debug, Serialize)]
pub struct CountryView {
    pub code: &'static str,
    pub name: &'static str,
    pub count: usize,
    pub languages: Vec<CountryLanguage>,
}

#[derive(Debug, Serialize)]
pub struct ActorCard {
    pub id: String,
    pub name: String,
    pub href: String,
    pub kind: String,
    pub location: String,
    pub languages: String,
    pub description: String,
    pub score: Option<String>,
    pub tier: String,
    pub tier_class: String,
    pub search: String,
}

#[derive(Debug, Serialize)]
pub struct SourceView {
    pub name: String,
    pub url: Option<String>,
    pub kind: String,
    pub languages: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SourceGroupView {
    pub key: &'static str,
    pub label: &'static str,
    pub count: usize,
    pub entries: Vec<SourceView>,
}

#[derive(Debug, Serialize)]
pub struct IndexView {
    pub title: String,
    pub generated_at: String,
    pub repo_url: String,
    pub live_url: String,
    pub root: &'static str,
    pub focus: Vec<LanguageCard>,
    pub all_languages: Vec<AllLanguageRow>,
    pub countries: Vec<CountryView>,
    pub actors: Vec<ActorCard>,
    pub sources: Vec<SourceGroupView>,
    pub source_count: usize,
}

pub fn index(site: &SiteData<'_>) -> IndexView {
    IndexView {
        title: "West and Central Africa NLP Landscape".to_string(),
        generated_at: site.generated_at.clone(),
        repo_url: site.config.repo_url.clone(),
        live_url: site.config.live_url.clone(),
        root: "",
        focus: focus_cards(site),
        all_languages: all_language_rows(site),
        countries: country_views(site),
        actors: site.actors.actors().iter().map(|a| actor_card(site, a)).collect(),
        sources: source_groups(site.sources),
        source_count: site.sources.len(),
    }
}

fn focus_cards(site: &SiteData<'_>) -> Vec<LanguageCard> {
    site.registry
        .list_all()
        .iter()
        .map(|lang| {
            let data = site.language(&lang.code);
            let info = data.and_then(|d| d.info.as_ref());
            let name = site.language_name(&lang.code);

            let mut search = vec![name.to_lowercase(), lang.code.clone()];
            if let Some(info) = info {
                search.extend(info.altnames.iter().map(|a| a.to_lowercase()));
                search.extend(info.countries.iter().map(|c| c.to_lowercase()));
            }

            let status = data.and_then(|d| {
                if d.is_failed() {
                    Some("failed")
                } else if d.is_partial() {
                    Some("partial")
                } else {
                    None
                }
            });

            LanguageCard {
                iso: lang.code.clone(),
                href: site.language_href(&lang.code, ""),
                tier: lang.tier.label(),
                family: or_dash(info.and_then(|i| i.family())),
                population: or_dash(info.and_then(|i| i.population.as_deref())),
                countries: info
                    .map(|i| summarize_list(&i.countries, 3))
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| DASH.to_string()),
                search: search.join(" "),
                models: task_counts(data.map(|d| &d.models), &TaskType::ALL),
                datasets: task_counts(data.map(|d| &d.datasets), &TaskType::WITH_DATASETS),
                corpus: data
                    .and_then(|d| d.benchmarks.common_voice.as_ref())
                    .map(|cv| format!("{:.1}h Common Voice", cv.total_hours)),
                actor_count: site.actors.for_language(&lang.code).len(),
                benchmark_count: data.map(benchmark_count).unwrap_or(0),
                status,
                name,
            }
        })
        .collect()
}

fn task_counts(listings: Option<&BTreeMap<TaskType, HubListing>>, tasks: &[TaskType]) -> Vec<TaskCount> {
    tasks
        .iter()
        .map(|task| TaskCount {
            label: task.short_label(),
            count: listings
                .and_then(|l| l.get(task))
                .map(|l| l.total_count)
                .unwrap_or(0),
        })
        .collect()
}

fn benchmark_count(data: &LanguageData) -> usize {
    merge_all(&data.benchmarks.evaluations, &data.manual.evaluations)
        .values()
        .flatten()
        .filter(|row| !row.is_placeholder())
        .count()
}

fn all_language_rows(site: &SiteData<'_>) -> Vec<AllLanguageRow> {
    let mut rows: Vec<AllLanguageRow> = site
        .wca
        .languages
        .iter()
        .map(|lang| AllLanguageRow {
            iso: lang.iso_639_3.clone(),
            name: lang.name.clone(),
            href: site.language_href(&lang.iso_639_3, ""),
            countries: lang.wca_countries.join(", "),
            population: or_dash(lang.population.as_deref()),
            population_value: lang.population_value(),
            endangerment: or_dash(lang.endangerment.as_deref()),
            focus: site.registry.contains(&lang.iso_639_3),
        })
        .collect();

    // Tracked languages missing from the regional list still get a row.
    for data in site.languages {
        if rows.iter().any(|r| r.iso == data.iso) {
            continue;
        }
        let info = data.info.as_ref();
        rows.push(AllLanguageRow {
            iso: data.iso.clone(),
            name: site.language_name(&data.iso),
            href: site.language_href(&data.iso, ""),
            countries: info.map(|i| i.countries.join(", ")).unwrap_or_default(),
            population: or_dash(info.and_then(|i| i.population.as_deref())),
            population_value: info.map(LanguageInfo::population_value).unwrap_or(0),
            endangerment: or_dash(info.and_then(|i| i.endangerment.as_deref())),
            focus: site.registry.contains(&data.iso),
        });
    }

    rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.iso.cmp(&b.iso)));
    rows
}

fn country_views(site: &SiteData<'_>) -> Vec<CountryView> {
    wca_countries()
        .iter()
        .map(|&(code, name)| {
            let mut spoken: Vec<_> = site
                .wca
                .languages
                .iter()
                .filter(|l| l.wca_countries.iter().any(|c| wca_code(c) == Some(code)))
                .collect();
            spoken.sort_by(|a, b| {
                b.population_value()
                    .cmp(&a.population_value())
                    .then_with(|| a.name.cmp(&b.name))
            });

            let languages: Vec<CountryLanguage> = spoken
                .into_iter()
                .map(|l| CountryLanguage {
                    iso: l.iso_639_3.clone(),
                    name: l.name.clone(),
                    href: site.language_href(&l.iso_639_3, ""),
                    population: or_dash(l.population.as_deref()),
                    focus: site.registry.contains(&l.iso_639_3),
                })
                .collect();

            CountryView {
                code,
                name,
                count: languages.len(),
                languages,
            }
        })
        .collect()
}

fn actor_card(site: &SiteData<'_>, actor: &Actor) -> ActorCard {
    let record = &actor.record;
    let language_names: Vec<String> = record.languages.iter().map(|iso| site.language_name(iso)).collect();

    let mut search = vec![actor.name().to_lowercase(), actor.id.clone()];
    search.extend(language_names.iter().map(|n| n.to_lowercase()));
    search.extend(record.languages.iter().cloned());
    search.extend(record.countries.iter().map(|c| country_name(c).to_lowercase()));

    let (tier, tier_class) = match actor.score.tier() {
        Some(tier) => (tier.to_string(), format!("tier-{}", tier.number())),
        None => ("Incomplete".to_string(), "incomplete".to_string()),
    };

    ActorCard {
        id: actor.id.clone(),
        name: actor.name().to_string(),
        href: format!("actor/{}.html", actor.id),
        kind: record.kind_label(),
        location: or_dash(record.location.as_deref()),
        languages: summarize_list(&language_names, 5),
        description: record
            .description
            .as_deref()
            .map(|d| truncate(d.trim(), 160))
            .unwrap_or_default(),
        score: actor
            .score
            .total()
            .map(|total| format!("{}/{}", total, crate::actors::scoring::MAX_TOTAL)),
        tier,
        tier_class,
        search: search.join(" "),
    }
}

fn source_groups(catalog: &SourceCatalog) -> Vec<SourceGroupView> {
    catalog
        .by_status()
        .into_iter()
        .map(|group| SourceGroupView {
            key: group.status.key(),
            label: group.status.label(),
            count: group.entries.len(),
            entries: group
                .entries
                .into_iter()
                .map(|entry| SourceView {
                    name: entry.name.clone(),
                    url: entry.url.clone(),
                    kind: entry.kind.clone().unwrap_or_default(),
                    languages: summarize_list(&entry.languages, 8),
                    notes: entry.notes.clone(),
                })
                .collect(),
        })
        .collect()
}

// ==================== Language page ====================

#[derive(Debug, Serialize)]
pub struct ActorLink {
    pub name: String,
    pub href: String,
    pub kind: String,
    pub score: String,
}

#[derive(Debug, Serialize)]
pub struct TechView {
    pub label: String,
    pub available: bool,
    pub href: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CorpusView {
    pub locale: String,
    pub hours: String,
    pub validated_clips: u64,
    pub total_clips: u64,
    pub train_clips: u64,
    pub dev_clips: u64,
    pub test_clips: u64,
    pub male_percent: String,
    pub female_percent: String,
}

impl From<&CommonVoiceStats> for CorpusView {
    fn from(cv: &CommonVoiceStats) -> Self {
        Self {
            locale: cv.locale.clone(),
            hours: format!("{:.1}", cv.total_hours),
            validated_clips: cv.validated_clips,
            total_clips: cv.total_clips,
            train_clips: cv.train_clips,
            dev_clips: cv.dev_clips,
            test_clips: cv.test_clips,
            male_percent: format!("{:.0}%", cv.male_percent),
            female_percent: format!("{:.0}%", cv.female_percent),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BenchmarkRowView {
    pub model: String,
    pub model_url: Option<String>,
    pub test_set: String,
    pub cells: Vec<String>,
    pub source: String,
    pub source_url: Option<String>,
    pub manual: bool,
}

#[derive(Debug, Serialize)]
pub struct BenchmarkSection {
    pub key: &'static str,
    pub label: &'static str,
    pub columns: Vec<String>,
    pub rows: Vec<BenchmarkRowView>,
}

impl From<BenchmarkTable> for BenchmarkSection {
    fn from(table: BenchmarkTable) -> Self {
        Self {
            key: table.task.key(),
            label: table.task.label(),
            columns: table.columns(),
            rows: table
                .rows
                .into_iter()
                .map(|row| BenchmarkRowView {
                    manual: row.origin == crate::evaluations::Origin::Manual,
                    model: row.model,
                    model_url: row.model_url,
                    test_set: row.test_set,
                    cells: row.cells,
                    source: row.source,
                    source_url: row.source_url,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HubItemView {
    pub name: String,
    pub url: String,
    pub downloads: String,
    pub likes: u64,
}

#[derive(Debug, Serialize)]
pub struct ListingSection {
    pub key: &'static str,
    pub label: &'static str,
    pub total: u64,
    pub items: Vec<HubItemView>,
    pub more: u64,
    pub searches: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct LanguagePageView {
    pub title: String,
    pub iso: String,
    pub generated_at: String,
    pub root: &'static str,
    pub problems: Vec<String>,
    pub general: Vec<Field>,
    pub usage: Vec<Field>,
    pub notes_html: Option<String>,
    pub actors: Vec<ActorLink>,
    pub tech: Vec<TechView>,
    pub model_coverage: Vec<String>,
    pub corpus: Option<CorpusView>,
    pub benchmarks: Vec<BenchmarkSection>,
    pub models: Vec<ListingSection>,
    pub datasets: Vec<ListingSection>,
}

pub fn language_page(site: &SiteData<'_>, data: &LanguageData) -> LanguagePageView {
    let fallback = LanguageInfo::default();
    let info = data.info.as_ref().unwrap_or(&fallback);
    let title = site.language_name(&data.iso);

    let mut general = vec![
        Field::text("ISO 639-3", Some(data.iso.as_str())),
        Field::text("ISO 639-1", info.iso_639_1.as_deref()),
        Field::text("French name", info.name_french.as_deref()),
        Field::text("Alternative names", Some(info.altnames.join(", ").as_str())),
        Field::text("Countries", Some(info.countries.join(", ").as_str())),
        Field::text("Population", info.population.as_deref()),
        Field::text("Population rank", info.population_order.as_deref()),
        Field::text("Endangerment", info.endangerment.as_deref()),
        Field::text("Official status", info.official_status.as_deref()),
    ];
    general.push(match (&info.glottocode, &info.glottocode_url) {
        (Some(code), Some(url)) => Field::link("Glottocode", code, url),
        (code, _) => Field::text("Glottocode", code.as_deref()),
    });
    if let Some(tier) = site.registry.tier_of(&data.iso) {
        general.push(Field::text("Focus tier", Some(tier.label())));
    }
    if let Some(url) = &info.scriptsource_url {
        general.push(Field::link("ScriptSource", url_handle(url), url));
    }
    general.extend(
        info.resource_links
            .iter()
            .map(|(label, url)| Field::link(label, url, url)),
    );

    let usage = info
        .wikipedia
        .as_ref()
        .filter(|w| !w.is_empty())
        .map(|wiki| {
            let mut fields = vec![
                Field::text("Language family", wiki.family.as_deref()),
                Field::text("L1 speakers", wiki.speakers_l1.as_deref()),
                Field::text("L2 speakers", wiki.speakers_l2.as_deref()),
                Field::text("Writing system", wiki.writing_system.as_deref()),
            ];
            if let Some(url) = &wiki.url {
                fields.push(Field::link("Wikipedia", url, url));
            }
            fields
        })
        .unwrap_or_default();

    let notes_html = [info.notes.as_deref(), data.notes.as_deref()]
        .into_iter()
        .flatten()
        .filter(|notes| !markdown::is_stub(notes))
        .map(|notes| markdown::to_html(notes, &title))
        .reduce(|a, b| a + &b);

    let actors = site
        .actors
        .for_language(&data.iso)
        .into_iter()
        .map(|actor| ActorLink {
            name: actor.name().to_string(),
            href: format!("../actor/{}.html", actor.id),
            kind: actor.record.kind_label(),
            score: actor.score.to_string(),
        })
        .collect();

    let tech = info
        .tech_resources
        .iter()
        .map(|(label, resource)| TechView {
            label: label.clone(),
            available: resource.is_available(),
            href: resource.link().map(str::to_string),
            text: match resource {
                crate::records::TechResource::Text(t) if resource.link().is_none() => Some(t.clone()),
                _ => None,
            },
        })
        .collect();

    let benchmarks = merge_all(&data.benchmarks.evaluations, &data.manual.evaluations)
        .into_iter()
        .map(|(task, rows)| BenchmarkTable::build(task, &rows).into())
        .collect();

    let codes = language_codes(&data.iso, info);
    let hf_base = &site.config.hf_base_url;

    LanguagePageView {
        iso: data.iso.clone(),
        generated_at: site.generated_at.clone(),
        root: "../",
        problems: data.problems.iter().map(|p| p.to_string()).collect(),
        general,
        usage,
        notes_html,
        actors,
        tech,
        model_coverage: info.model_coverage.clone(),
        corpus: data.benchmarks.common_voice.as_ref().map(CorpusView::from),
        benchmarks,
        models: TaskType::ALL
            .iter()
            .map(|task| listing_section(hf_base, false, *task, data.models.get(task), &codes))
            .collect(),
        datasets: TaskType::WITH_DATASETS
            .iter()
            .map(|task| listing_section(hf_base, true, *task, data.datasets.get(task), &codes))
            .collect(),
        title,
    }
}

fn language_codes(iso: &str, info: &LanguageInfo) -> Vec<String> {
    let mut codes = Vec::new();
    if let Some(code) = info.iso_639_1.as_deref().filter(|c| !c.is_empty()) {
        codes.push(code.to_string());
    }
    codes.push(iso.to_string());
    codes
}

fn listing_section(
    hf_base_url: &str,
    datasets: bool,
    task: TaskType,
    listing: Option<&HubListing>,
    codes: &[String],
) -> ListingSection {
    let fallback = HubListing::default();
    let listing = listing.unwrap_or(&fallback);

    let searches = if listing.counts_by_code.is_empty() {
        codes
            .iter()
            .map(|code| Link {
                label: code.clone(),
                href: Some(hub_search_url(hf_base_url, datasets, task, code)),
            })
            .collect()
    } else {
        listing
            .counts_by_code
            .iter()
            .map(|(code, count)| Link {
                label: format!("{} ({})", code, count),
                href: Some(hub_search_url(hf_base_url, datasets, task, code)),
            })
            .collect()
    };

    let items: Vec<HubItemView> = listing
        .items
        .iter()
        .take(LISTED_ITEMS)
        .map(|item| HubItemView {
            name: item.name.clone(),
            url: item.url.clone(),
            downloads: compact_count(item.downloads),
            likes: item.likes,
        })
        .collect();

    ListingSection {
        key: task.key(),
        label: task.label(),
        total: listing.total_count,
        more: listing.total_count.saturating_sub(items.len() as u64),
        items,
        searches,
    }
}

// ==================== Actor page ====================

#[derive(Debug, Serialize)]
pub struct ScoreView {
    pub summary: String,
    pub tier: Option<String>,
    pub description: Option<&'static str>,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct DimensionView {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ItemView {
    pub label: String,
    pub href: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActorPageView {
    pub title: String,
    pub id: String,
    pub generated_at: String,
    pub root: &'static str,
    pub info: Vec<Field>,
    pub contact: Vec<Field>,
    pub countries: String,
    pub languages: Vec<Link>,
    pub score: ScoreView,
    pub dimensions: Vec<DimensionView>,
    pub description: Option<String>,
    pub relevance: Option<String>,
    pub people: Vec<ItemView>,
    pub projects: Vec<ItemView>,
    pub projects_url: Option<String>,
    pub publications: Vec<ItemView>,
    pub publications_url: Option<String>,
    pub partnerships: Vec<String>,
    pub notes_html: Option<String>,
    pub last_updated: String,
}

pub fn actor_page(site: &SiteData<'_>, actor: &Actor) -> ActorPageView {
    let record = &actor.record;

    let mut info = vec![
        Field::text("Type", Some(record.kind_label().as_str())),
        Field::text("Location", record.location.as_deref()),
        Field::text("Founded", record.founded.as_deref()),
        Field::text("Size", record.organization_size.as_deref()),
        Field::text("Funding", record.funding.as_deref()),
        Field::text("Openness", record.openness.as_deref()),
        Field::text("Maturity", record.maturity.as_deref()),
        Field::text("Engagement", record.engagement_status.as_deref()),
    ];
    for (label, url) in [
        ("Website", &record.website),
        ("GitHub", &record.github),
        ("Hugging Face", &record.huggingface),
    ] {
        if let Some(url) = url {
            let shown = if label == "Website" { url.as_str() } else { url_handle(url) };
            info.push(Field::link(label, shown, url));
        }
    }

    let languages = record
        .languages
        .iter()
        .map(|iso| Link {
            label: format!("{} ({})", site.language_name(iso), iso),
            href: site.language_href(iso, "../"),
        })
        .collect();

    let score = ScoreView {
        summary: actor.score.to_string(),
        tier: actor.score.tier().map(|t| t.to_string()),
        description: actor.score.tier().map(|t| t.description()),
        complete: actor.score.is_complete(),
    };

    let dimensions = record
        .scores
        .as_ref()
        .map(|scores| {
            scores
                .dimensions()
                .iter()
                .map(|(name, value)| DimensionView {
                    label: dimension_label(name),
                    value: crate::actors::scoring::dimension_display(*value)
                        .unwrap_or_else(|| DASH.to_string()),
                })
                .collect()
        })
        .unwrap_or_default();

    let countries: Vec<String> = record
        .countries
        .iter()
        .map(|code| country_name(code).to_string())
        .collect();

    ActorPageView {
        title: actor.name().to_string(),
        id: actor.id.clone(),
        generated_at: site.generated_at.clone(),
        root: "../",
        info,
        contact: contact_fields(record.contact.as_ref()),
        countries: or_dash(Some(countries.join(", ").as_str())),
        languages,
        score,
        dimensions,
        description: record.description.clone(),
        relevance: record.relevance.clone(),
        people: record.key_people.iter().map(person_view).collect(),
        projects: record.projects.iter().map(project_view).collect(),
        projects_url: record.projects_url.clone(),
        publications: record.publications.iter().map(publication_view).collect(),
        publications_url: record.publications_url.clone(),
        partnerships: record.partnerships.clone(),
        notes_html: record
            .notes
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .map(|n| markdown::to_html(n, actor.name())),
        last_updated: or_dash(record.last_updated.as_deref()),
    }
}

/// `partnership_readiness` → "Partnership readiness"
fn dimension_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn contact_href(value: &str) -> Option<String> {
    if value.starts_with("http") {
        Some(value.to_string())
    } else if value.contains('@') {
        Some(format!("mailto:{}", value))
    } else {
        None
    }
}

fn contact_fields(contact: Option<&Contact>) -> Vec<Field> {
    let entries: Vec<(&str, &String)> = match contact {
        None => Vec::new(),
        Some(Contact::Plain(value)) => vec![("Contact", value)],
        Some(Contact::Channels {
            email,
            mailing_list,
            slack,
        }) => [("Email", email), ("Mailing list", mailing_list), ("Slack", slack)]
            .into_iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| (label, v)))
            .collect(),
    };
    entries
        .into_iter()
        .map(|(label, value)| Field {
            label: label.to_string(),
            value: value.clone(),
            href: contact_href(value),
        })
        .collect()
}

fn person_view(person: &Person) -> ItemView {
    match person {
        Person::Plain(name) => ItemView {
            label: name.clone(),
            href: None,
            detail: None,
        },
        Person::Detailed {
            name,
            role,
            affiliation,
            note,
        } => {
            let detail: Vec<&str> = [role, affiliation, note]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect();
            ItemView {
                label: name.clone(),
                href: None,
                detail: (!detail.is_empty()).then(|| detail.join(", ")),
            }
        }
    }
}

fn project_view(project: &ProjectRef) -> ItemView {
    match project {
        ProjectRef::Plain(name) => ItemView {
            label: name.clone(),
            href: None,
            detail: None,
        },
        ProjectRef::Detailed {
            name,
            url,
            description,
        } => ItemView {
            label: name.clone(),
            href: url.clone(),
            detail: description.clone(),
        },
    }
}

fn publication_view(publication: &Publication) -> ItemView {
    match publication {
        Publication::Plain(title) => ItemView {
            label: title.clone(),
            href: None,
            detail: None,
        },
        Publication::Detailed { title, url, venue } => ItemView {
            label: title.clone(),
            href: url.clone(),
            detail: venue.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{EvaluationEntry, HubItem, Metric, MetricValue, Provenance, TestResult, WcaLanguage};

    fn registry() -> LanguageRegistry {
        LanguageRegistry::from_yaml("priority: [wol]\nextended: [fuc]\n").unwrap()
    }

    fn wolof() -> LanguageData {
        let mut data = LanguageData {
            iso: "wol".to_string(),
            info: Some(LanguageInfo {
                name: "Wolof".to_string(),
                iso_639_3: "wol".to_string(),
                iso_639_1: Some("wo".to_string()),
                countries: vec!["Senegal".to_string(), "Gambia".to_string()],
                population: Some("5,400,000".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        data.benchmarks.evaluations.insert(
            TaskType::Mt,
            vec![EvaluationEntry {
                model: "nllb-200".to_string(),
                model_url: None,
                results: vec![TestResult {
                    test_set: "FLORES-200".to_string(),
                    source: Some(Provenance::Reported),
                    source_url: None,
                    metrics: vec![Metric {
                        name: "chrF++".to_string(),
                        value: MetricValue::Number(41.2),
                    }],
                }],
            }],
        );
        data
    }

    fn site_with<'a>(
        config: &'a Config,
        registry: &'a LanguageRegistry,
        languages: &'a [LanguageData],
        wca: &'a WcaLanguageList,
        actors: &'a ActorRegistry,
        sources: &'a SourceCatalog,
    ) -> SiteData<'a> {
        SiteData {
            config,
            registry,
            languages,
            wca,
            actors,
            sources,
            generated_at: "2026-01-01 00:00 UTC".to_string(),
        }
    }

    // ==================== Language Page Tests ====================

    #[test]
    fn test_language_page_has_every_task_section() {
        let config = Config::for_root("/tmp/landscape");
        let registry = registry();
        let languages = vec![wolof()];
        let wca = WcaLanguageList::default();
        let actors = ActorRegistry::default();
        let sources = SourceCatalog::default();
        let site = site_with(&config, &registry, &languages, &wca, &actors, &sources);

        let page = language_page(&site, &languages[0]);
        let labels: Vec<&str> = page.benchmarks.iter().map(|b| b.label).collect();
        assert_eq!(
            labels,
            vec!["Automatic Speech Recognition", "Text-to-Speech", "Machine Translation", "Language Models"]
        );
        assert_eq!(page.benchmarks[2].columns, vec!["Model", "Test set", "chrF++", "Source"]);
        assert_eq!(page.benchmarks[2].rows[0].cells, vec!["41.2"]);
        assert!(page.benchmarks[0].rows.is_empty());
        assert_eq!(page.models.len(), 4);
        assert_eq!(page.datasets.len(), 2);
        assert_eq!(page.models[0].searches.len(), 2);
        assert!(page.usage.is_empty());
    }

    #[test]
    fn test_stub_notes_are_not_rendered() {
        let config = Config::for_root("/tmp/landscape");
        let registry = registry();
        let mut data = wolof();
        data.notes = Some("# Wolof\n\n(Add manual observations here)\n".to_string());
        let languages = vec![data];
        let wca = WcaLanguageList::default();
        let actors = ActorRegistry::default();
        let sources = SourceCatalog::default();
        let site = site_with(&config, &registry, &languages, &wca, &actors, &sources);

        assert!(language_page(&site, &languages[0]).notes_html.is_none());
    }

    #[test]
    fn test_listing_section_counts_and_searches() {
        let mut listing = HubListing::default();
        listing.add_code_results(
            "wo",
            vec![HubItem {
                name: "a/wolof-asr".to_string(),
                url: "https://huggingface.co/a/wolof-asr".to_string(),
                downloads: 1_500,
                likes: 2,
            }],
        );
        let section = listing_section("https://huggingface.co", false, TaskType::Asr, Some(&listing), &[]);

        assert_eq!(section.total, 1);
        assert_eq!(section.more, 0);
        assert_eq!(section.items[0].downloads, "1.5K");
        assert_eq!(section.searches[0].label, "wo (1)");
    }

    // ==================== Index Tests ====================

    #[test]
    fn test_index_links_only_loadable_languages() {
        let config = Config::for_root("/tmp/landscape");
        let registry = registry();
        let languages = vec![wolof()];
        let wca = WcaLanguageList {
            languages: vec![
                WcaLanguage {
                    name: "Wolof".to_string(),
                    iso_639_3: "wol".to_string(),
                    wca_countries: vec!["Senegal".to_string()],
                    population: Some("5,400,000".to_string()),
                    ..Default::default()
                },
                WcaLanguage {
                    name: "Serer".to_string(),
                    iso_639_3: "srr".to_string(),
                    wca_countries: vec!["Senegal".to_string()],
                    population: Some("1,300,000".to_string()),
                    ..Default::default()
                },
            ],
            total: 2,
        };
        let actors = ActorRegistry::default();
        let sources = SourceCatalog::default();
        let site = site_with(&config, &registry, &languages, &wca, &actors, &sources);

        let view = index(&site);
        assert_eq!(view.focus.len(), 2);
        assert_eq!(view.focus[0].href.as_deref(), Some("lang/wol.html"));
        assert_eq!(view.focus[0].benchmark_count, 1);
        assert!(view.focus[1].href.is_none());

        let serer = view.all_languages.iter().find(|r| r.iso == "srr").unwrap();
        assert!(serer.href.is_none());
        assert!(!serer.focus);

        let senegal = view.countries.iter().find(|c| c.code == "SN").unwrap();
        assert_eq!(senegal.count, 2);
        assert_eq!(senegal.languages[0].iso, "wol");
    }

    // ==================== Actor Page Tests ====================

    #[test]
    fn test_actor_page_with_partial_profile() {
        let config = Config::for_root("/tmp/landscape");
        let registry = registry();
        let languages = vec![wolof()];
        let wca = WcaLanguageList::default();
        let actors = ActorRegistry::default();
        let sources = SourceCatalog::default();
        let site = site_with(&config, &registry, &languages, &wca, &actors, &sources);

        let record: crate::records::ActorRecord = serde_yaml::from_str(
            "name: GalsenAI\nlanguages: [wol, srr]\ncontact: team@galsen.ai\nscores:\n  openness: 3\n",
        )
        .unwrap();
        let actor = Actor::new("galsenai", record);
        let page = actor_page(&site, &actor);

        assert_eq!(page.languages[0].href.as_deref(), Some("../lang/wol.html"));
        assert!(page.languages[1].href.is_none());
        assert_eq!(page.contact[0].href.as_deref(), Some("mailto:team@galsen.ai"));
        assert!(!page.score.complete);
        assert_eq!(page.dimensions[2].value, "3/3");
        assert_eq!(page.dimensions[0].value, DASH);
        assert_eq!(page.dimensions[5].label, "Partnership readiness");
        assert_eq!(page.countries, DASH);
    }
}
