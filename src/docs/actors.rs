use super::markdown::{cell, document_header, field_list, heading, link, table};
use crate::actors::scoring::{dimension_display, MAX_TOTAL};
use crate::actors::{Actor, ActorRegistry};
use crate::config::Config;
use crate::languages::countries::country_name;
use crate::records::{Contact, Person, ProjectRef, Publication};
use crate::render::format::DASH;
use std::collections::BTreeMap;

/// Anchor of an actor section.
pub fn anchor(id: &str) -> String {
    format!("actor_{}", id)
}

fn limited(items: &[String], shown: usize) -> String {
    let mut out = items.iter().take(shown).cloned().collect::<Vec<_>>().join(", ");
    if items.len() > shown {
        out.push_str(&format!(" +{}", items.len() - shown));
    }
    out
}

fn contact_text(contact: Option<&Contact>) -> Option<String> {
    match contact? {
        Contact::Plain(value) => Some(value.clone()),
        Contact::Channels {
            email,
            mailing_list,
            slack,
        } => {
            let mut parts = Vec::new();
            if let Some(email) = email {
                parts.push(email.clone());
            }
            if let Some(list) = mailing_list {
                parts.push(format!("Mailing list: {}", list));
            }
            if let Some(slack) = slack {
                parts.push(format!("Slack: {}", slack));
            }
            (!parts.is_empty()).then(|| parts.join(" | "))
        }
    }
}

fn priority(actor: &Actor) -> String {
    match (actor.score.total(), actor.score.tier()) {
        (Some(total), Some(tier)) => format!("{}/{} ({})", total, MAX_TOTAL, tier),
        _ => "Incomplete".to_string(),
    }
}

/// Actors document: summary table, then one section per actor in registry order.
///
/// `language_names` maps ISO codes to display names for the coverage lines.
pub fn actors_markdown(
    config: &Config,
    registry: &ActorRegistry,
    language_names: &BTreeMap<String, String>,
    generated_at: &str,
) -> String {
    let mut out = document_header(
        "WCA NLP Landscape: Actors",
        generated_at,
        &config.repo_url,
        &config.live_url,
    );

    out.push_str(&heading(1, "Summary", None));
    out.push_str(&format!("{} actors mapped.\n\n", registry.len()));

    let rows: Vec<Vec<String>> = registry
        .actors()
        .iter()
        .map(|actor| {
            let record = &actor.record;
            let countries: Vec<String> = record
                .countries
                .iter()
                .map(|c| country_name(c).to_string())
                .collect();
            vec![
                link(actor.name(), &format!("#{}", anchor(&actor.id))),
                cell(&record.kind_label()),
                cell(&limited(&countries, 5)),
                cell(&limited(&record.languages, 8)),
                cell(record.openness.as_deref().unwrap_or_default()),
                cell(record.maturity.as_deref().unwrap_or_default()),
                cell(record.engagement_status.as_deref().unwrap_or_default()),
                cell(&priority(actor)),
            ]
        })
        .collect();
    out.push_str(&table(
        &["Actor", "Type", "Countries", "Languages", "Openness", "Maturity", "Engagement", "Priority"],
        &rows,
    ));

    for actor in registry.actors() {
        out.push_str(&actor_section(actor, language_names));
    }
    out
}

fn actor_section(actor: &Actor, language_names: &BTreeMap<String, String>) -> String {
    let record = &actor.record;
    let mut out = heading(1, actor.name(), Some(&anchor(&actor.id)));

    let url_field = |url: &Option<String>| url.as_deref().map(|u| link(u, u));
    out.push_str(&field_list(&[
        ("Type", Some(record.kind_label())),
        ("Location", record.location.clone()),
        ("Founded", record.founded.clone()),
        ("Size", record.organization_size.clone()),
        ("Funding", record.funding.clone()),
        ("Website", url_field(&record.website)),
        ("GitHub", url_field(&record.github)),
        ("Hugging Face", url_field(&record.huggingface)),
        ("Contact", contact_text(record.contact.as_ref())),
        ("Openness", record.openness.clone()),
        ("Maturity", record.maturity.clone()),
        ("Engagement", record.engagement_status.clone()),
        ("Last updated", record.last_updated.clone()),
    ]));

    out.push_str(&heading(2, "Prioritization", None));
    match &record.scores {
        Some(scores) => {
            out.push_str(&format!("**{}**\n\n", actor.score));
            let rows: Vec<Vec<String>> = scores
                .dimensions()
                .iter()
                .map(|(name, value)| {
                    vec![
                        cell(&name.replace('_', " ")),
                        dimension_display(*value).unwrap_or_else(|| DASH.to_string()),
                    ]
                })
                .collect();
            out.push_str(&table(&["Dimension", "Score"], &rows));
        }
        None => out.push_str("Not scored yet.\n\n"),
    }

    if let Some(description) = record.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str(&heading(2, "Description", None));
        out.push_str(&format!("{}\n\n", description.trim()));
    }

    if let Some(relevance) = record.relevance.as_deref().filter(|r| !r.trim().is_empty()) {
        out.push_str(&heading(2, "Relevance", None));
        out.push_str(&format!("{}\n\n", relevance.trim()));
    }

    if !record.countries.is_empty() || !record.languages.is_empty() {
        out.push_str(&heading(2, "Coverage", None));
        let countries: Vec<&str> = record.countries.iter().map(|c| country_name(c)).collect();
        let languages: Vec<String> = record
            .languages
            .iter()
            .map(|iso| match language_names.get(iso) {
                Some(name) => format!("{} ({})", name, iso),
                None => iso.clone(),
            })
            .collect();
        out.push_str(&field_list(&[
            ("Countries", Some(countries.join(", "))),
            ("Languages", Some(languages.join(", "))),
        ]));
    }

    if !record.key_people.is_empty() {
        out.push_str(&heading(2, "Key People", None));
        for person in &record.key_people {
            let line = match person {
                Person::Plain(name) => name.clone(),
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
                    if detail.is_empty() {
                        name.clone()
                    } else {
                        format!("{} ({})", name, detail.join(", "))
                    }
                }
            };
            out.push_str(&format!("- {}\n", line));
        }
        out.push('\n');
    }

    if !record.projects.is_empty() {
        out.push_str(&heading(2, "Projects", None));
        for project in &record.projects {
            let line = match project {
                ProjectRef::Plain(name) => name.clone(),
                ProjectRef::Detailed {
                    name,
                    url,
                    description,
                } => {
                    let title = url.as_deref().map(|u| link(name, u)).unwrap_or_else(|| name.clone());
                    match description {
                        Some(d) => format!("{}: {}", title, d),
                        None => title,
                    }
                }
            };
            out.push_str(&format!("- {}\n", line));
        }
        if let Some(url) = &record.projects_url {
            out.push_str(&format!("- {}\n", link("All projects", url)));
        }
        out.push('\n');
    }

    if !record.publications.is_empty() {
        out.push_str(&heading(2, "Publications", None));
        for publication in &record.publications {
            let line = match publication {
                Publication::Plain(title) => title.clone(),
                Publication::Detailed { title, url, venue } => {
                    let title = url.as_deref().map(|u| link(title, u)).unwrap_or_else(|| title.clone());
                    match venue {
                        Some(v) => format!("{} ({})", title, v),
                        None => title,
                    }
                }
            };
            out.push_str(&format!("- {}\n", line));
        }
        if let Some(url) = &record.publications_url {
            out.push_str(&format!("- {}\n", link("All publications", url)));
        }
        out.push('\n');
    }

    if !record.partnerships.is_empty() {
        out.push_str(&heading(2, "Partnerships", None));
        for partner in &record.partnerships {
            out.push_str(&format!("- {}\n", partner));
        }
        out.push('\n');
    }

    if let Some(notes) = record.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        out.push_str(&heading(2, "Notes", None));
        out.push_str(&format!("{}\n\n", notes.trim()));
    }
    out
}
