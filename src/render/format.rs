//! Small text helpers shared by the HTML and Markdown renderers.

use crate::records::TaskType;

/// Placeholder for an empty value.
pub const DASH: &str = "—";

/// Compact count: 1234 → "1.2K", 2_500_000 → "2.5M".
pub fn compact_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// The value, or a dash when empty.
pub fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => DASH.to_string(),
    }
}

/// Cut to at most `max` characters, adding "..." when something was cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

/// Names with a "(+N)" suffix when the list is longer than `shown`.
pub fn summarize_list(items: &[String], shown: usize) -> String {
    let mut out = items.iter().take(shown).cloned().collect::<Vec<_>>().join(", ");
    if items.len() > shown {
        out.push_str(&format!(" (+{})", items.len() - shown));
    }
    out
}

/// Hub search page for a task and language code.
pub fn hub_search_url(hf_base_url: &str, datasets: bool, task: TaskType, code: &str) -> String {
    let base = hf_base_url.trim_end_matches('/');
    let tag = task.pipeline_tag();
    if datasets {
        format!(
            "{}/datasets?task_categories=task_categories:{}&language=language:{}&sort=trending",
            base, tag, code
        )
    } else {
        format!("{}/models?pipeline_tag={}&language={}&sort=trending", base, tag, code)
    }
}

/// Last path segment of a profile URL (`https://huggingface.co/masakhane` → "masakhane").
pub fn url_handle(url: &str) -> &str {
    url.trim_end_matches('/').rsplit('/').next().unwrap_or(url)
}
