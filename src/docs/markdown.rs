//! Pandoc Markdown building blocks.

use crate::render::format::DASH;

/// Text safe inside a pipe-table cell.
pub fn cell(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return DASH.to_string();
    }
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// `[text](target)`; brackets in the label are escaped.
pub fn link(text: &str, target: &str) -> String {
    let label = text.replace('[', "\\[").replace(']', "\\]");
    format!("[{}]({})", label, target)
}

/// Heading with an explicit anchor: `# Wolof (wol) {#lang_wol}`.
pub fn heading(level: usize, text: &str, anchor: Option<&str>) -> String {
    let hashes = "#".repeat(level);
    match anchor {
        Some(anchor) => format!("{} {} {{#{}}}\n\n", hashes, text, anchor),
        None => format!("{} {}\n\n", hashes, text),
    }
}

/// Pipe table. Cells must already be escaped with [`cell`] or be links.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = format!("| {} |\n", headers.join(" | "));
    out.push_str(&format!("|{}\n", "---|".repeat(headers.len())));
    for row in rows {
        out.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    out.push('\n');
    out
}

/// `- **Label:** value` lines, skipping empty values.
pub fn field_list(fields: &[(&str, Option<String>)]) -> String {
    let mut out = String::new();
    for (label, value) in fields {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            out.push_str(&format!("- **{}:** {}\n", label, value));
        }
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Document header: pandoc title block, timestamp and project links.
pub fn document_header(title: &str, generated_at: &str, repo_url: &str, live_url: &str) -> String {
    format!(
        "---\ntitle: \"{}\"\n---\n\nGenerated: {}\n\nSource: <{}>\n\nLive site: <{}>\n\n",
        title.replace('"', "\\\""),
        generated_at,
        repo_url,
        live_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_escapes_pipes_and_newlines() {
        assert_eq!(cell("a | b\nc"), "a \\| b c");
        assert_eq!(cell("  "), DASH);
    }

    #[test]
    fn test_heading_anchor() {
        assert_eq!(heading(1, "Wolof (wol)", Some("lang_wol")), "# Wolof (wol) {#lang_wol}\n\n");
        assert_eq!(heading(2, "Summary", None), "## Summary\n\n");
    }

    #[test]
    fn test_table_layout() {
        let t = table(&["A", "B"], &[vec!["1".into(), link("x", "#lang_x")]]);
        assert_eq!(t, "| A | B |\n|---|---|\n| 1 | [x](#lang_x) |\n\n");
    }

    #[test]
    fn test_field_list_skips_empty() {
        let out = field_list(&[("Family", Some("Niger-Congo".into())), ("Script", None), ("Size", Some(" ".into()))]);
        assert_eq!(out, "- **Family:** Niger-Congo\n\n");
    }
}
