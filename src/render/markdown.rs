//! Minimal Markdown to HTML for researcher notes.
//!
//! Supports headings, paragraphs, `-`/`*` bullet lists, `**bold**`,
//! `*italic*` and `[text](url)` links. Everything else is escaped text.

use regex::Regex;
use std::sync::OnceLock;

static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static BOLD_REGEX: OnceLock<Regex> = OnceLock::new();
static ITALIC_REGEX: OnceLock<Regex> = OnceLock::new();

/// Marker left in the generated stub until the researcher writes real notes.
const STUB_MARKER: &str = "(Add ";

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether `notes` is still the untouched stub.
pub fn is_stub(notes: &str) -> bool {
    notes.trim().is_empty() || notes.contains(STUB_MARKER)
}

fn inline(text: &str) -> String {
    let escaped = escape_html(text);

    let link_regex = LINK_REGEX.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap());
    let bold_regex = BOLD_REGEX.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
    let italic_regex = ITALIC_REGEX.get_or_init(|| Regex::new(r"\*([^*\s][^*]*?)\*").unwrap());

    let linked = link_regex.replace_all(&escaped, r#"<a href="$2" target="_blank">$1</a>"#);
    let bold = bold_regex.replace_all(&linked, "<strong>$1</strong>");
    italic_regex.replace_all(&bold, "<em>$1</em>").into_owned()
}

/// Convert notes to HTML. The first `#` heading is dropped when it only
/// repeats the page title.
pub fn to_html(markdown: &str, title: &str) -> String {
    let mut html = String::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut list: Vec<&str> = Vec::new();

    fn flush_paragraph(html: &mut String, paragraph: &mut Vec<&str>) {
        if !paragraph.is_empty() {
            html.push_str(&format!("<p>{}</p>\n", inline(&paragraph.join(" "))));
            paragraph.clear();
        }
    }

    fn flush_list(html: &mut String, list: &mut Vec<&str>) {
        if !list.is_empty() {
            html.push_str("<ul>\n");
            for item in list.iter() {
                html.push_str(&format!("<li>{}</li>\n", inline(item)));
            }
            html.push_str("</ul>\n");
            list.clear();
        }
    }

    for line in markdown.lines() {
        let trimmed = line.trim();

        if let Some((level, text)) = heading(trimmed) {
            flush_paragraph(&mut html, &mut paragraph);
            flush_list(&mut html, &mut list);
            if level == 1 && text == title {
                continue;
            }
            // page headings are h1/h2 already
            let tag = (level + 1).min(6);
            html.push_str(&format!("<h{tag}>{}</h{tag}>\n", inline(text)));
        } else if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            flush_paragraph(&mut html, &mut paragraph);
            list.push(item);
        } else if trimmed.is_empty() {
            flush_paragraph(&mut html, &mut paragraph);
            flush_list(&mut html, &mut list);
        } else {
            flush_list(&mut html, &mut list);
            paragraph.push(trimmed);
        }
    }
    flush_paragraph(&mut html, &mut paragraph);
    flush_list(&mut html, &mut list);
    html
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..].strip_prefix(' ').map(|text| (level, text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>R&D</b>"), "&lt;b&gt;R&amp;D&lt;/b&gt;");
    }

    #[test]
    fn test_headings_lists_and_inline() {
        let md = "# Wolof\n\n## Observations\n\nStrong **community** work, see [GalsenAI](https://galsen.ai).\n\n- one\n- *two*\n";
        let html = to_html(md, "Wolof");

        assert!(!html.contains("<h2>Wolof</h2>"));
        assert!(html.contains("<h3>Observations</h3>"));
        assert!(html.contains("<strong>community</strong>"));
        assert!(html.contains(r#"<a href="https://galsen.ai" target="_blank">GalsenAI</a>"#));
        assert!(html.contains("<ul>\n<li>one</li>\n<li><em>two</em></li>\n</ul>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = to_html("<script>alert(1)</script>", "X");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_paragraph_lines_are_joined() {
        assert_eq!(to_html("first line\nsecond line\n", "X"), "<p>first line second line</p>\n");
    }

    #[test]
    fn test_is_stub() {
        assert!(is_stub("# Hausa\n\n(Add manual observations here)\n"));
        assert!(is_stub("  \n"));
        assert!(!is_stub("Met the team in Kano."));
    }
}
