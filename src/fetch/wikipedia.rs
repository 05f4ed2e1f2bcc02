//! Encyclopedia infobox scraper: family, speakers, writing system, Glottolog code.

use crate::error::{LandscapeError, LandscapeResult};
use crate::records::WikiInfo;
use crate::retry::{with_retry_if, RetryConfig};
use regex::Regex;
use reqwest::StatusCode;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

static INFOBOX_REGEX: OnceLock<Regex> = OnceLock::new();
static ROW_REGEX: OnceLock<Regex> = OnceLock::new();
static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
static CELL_REGEX: OnceLock<Regex> = OnceLock::new();
static ANCHOR_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static CITATION_REGEX: OnceLock<Regex> = OnceLock::new();
static L1_REGEX: OnceLock<Regex> = OnceLock::new();
static L2_REGEX: OnceLock<Regex> = OnceLock::new();
static MAGNITUDE_REGEX: OnceLock<Regex> = OnceLock::new();
static DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();

/// Page URL for a language name: `Wolof` → `{base}/Wolof_language`.
pub fn page_url(base_url: &str, language_name: &str) -> String {
    let clean = language_name.split('(').next().unwrap_or("").trim();
    format!(
        "{}/{}_language",
        base_url.trim_end_matches('/'),
        clean.replace(' ', "_")
    )
}

#[derive(Debug)]
enum PageError {
    NotFound,
    Transient(String),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::NotFound => f.write_str("page not found"),
            PageError::Transient(reason) => f.write_str(reason),
        }
    }
}

async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, PageError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| PageError::Transient(format!("request failed: {}", e)))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(PageError::NotFound);
    }
    if !status.is_success() {
        return Err(PageError::Transient(format!("HTTP {}", status)));
    }
    response
        .text()
        .await
        .map_err(|e| PageError::Transient(format!("failed to read body: {}", e)))
}

/// Fetch and parse the encyclopedia page for a language.
///
/// A missing page is `Ok(None)`. Other failures are retried, then returned
/// as `UpstreamUnavailable`.
pub async fn fetch_language_info(
    client: &reqwest::Client,
    base_url: &str,
    language_name: &str,
) -> LandscapeResult<Option<WikiInfo>> {
    let url = page_url(base_url, language_name);
    let result = with_retry_if(
        &RetryConfig::encyclopedia_page(),
        &format!("Encyclopedia {}", language_name),
        || fetch_page(client, &url),
        |e| matches!(e, PageError::Transient(_)),
    )
    .await;

    match result {
        Ok(html) => Ok(Some(parse_infobox(&html, &url))),
        Err(PageError::NotFound) => {
            debug!("No encyclopedia page for {}", language_name);
            Ok(None)
        }
        Err(PageError::Transient(reason)) => Err(LandscapeError::upstream(
            "Encyclopedia",
            language_name,
            reason,
        )),
    }
}

/// Extract infobox fields from a page. Fields the page lacks stay `None`.
pub fn parse_infobox(html: &str, url: &str) -> WikiInfo {
    let mut info = WikiInfo {
        url: Some(url.to_string()),
        ..Default::default()
    };

    let infobox_regex = INFOBOX_REGEX.get_or_init(|| {
        Regex::new(r#"(?s)<table[^>]*class="[^"]*infobox[^"]*"[^>]*>(.*?)</table>"#).unwrap()
    });
    let Some(infobox) = infobox_regex.captures(html).and_then(|c| c.get(1)) else {
        return info;
    };

    let row_regex = ROW_REGEX.get_or_init(|| Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").unwrap());
    let header_regex = HEADER_REGEX.get_or_init(|| Regex::new(r"(?s)<th[^>]*>(.*?)</th>").unwrap());
    let cell_regex = CELL_REGEX.get_or_init(|| Regex::new(r"(?s)<td[^>]*>(.*?)</td>").unwrap());

    for row in row_regex.captures_iter(infobox.as_str()) {
        let row = &row[1];
        let (Some(th), Some(td)) = (header_regex.captures(row), cell_regex.captures(row)) else {
            continue;
        };
        let header = strip_tags(&th[1]).to_lowercase();
        let cell = &td[1];

        if header.contains("native speakers") || header == "speakers" {
            let (l1, l2) = parse_speakers(&strip_citations(&strip_tags(cell)));
            info.speakers_l1 = l1;
            info.speakers_l2 = l2;
        } else if header.contains("family") {
            info.family = first_anchor_text(cell).or_else(|| non_empty(truncate(&strip_tags(cell), 100)));
        } else if header.contains("writing system") {
            let text = strip_citations(&strip_tags(cell));
            let lower = text.to_lowercase();
            if !text.is_empty() && lower != "none" && lower != "unwritten" {
                info.writing_system = Some(truncate(&text, 150));
            }
        } else if header.contains("glottolog") {
            info.glottolog = first_anchor_text(cell).or_else(|| {
                let text = strip_tags(cell);
                let lower = text.to_lowercase();
                (lower != "none" && text != "—").then_some(text).and_then(non_empty)
            });
        }
    }

    info
}

fn parse_speakers(text: &str) -> (Option<String>, Option<String>) {
    let l1_regex = L1_REGEX
        .get_or_init(|| Regex::new(r"(?i)L1[:\s]*([\d,\.]+)\s*(million|billion)").unwrap());
    let l2_regex = L2_REGEX
        .get_or_init(|| Regex::new(r"(?i)L2[:\s]*([\d,\.]+)\s*(million|billion)").unwrap());
    let magnitude_regex = MAGNITUDE_REGEX
        .get_or_init(|| Regex::new(r"(?i)([\d,\.]+)\s*(million|billion)").unwrap());
    let digits_regex = DIGITS_REGEX.get_or_init(|| Regex::new(r"(\d[\d,]*)").unwrap());

    let magnitude = |c: regex::Captures| format!("{} {}", &c[1], c[2].to_lowercase());

    let l1 = l1_regex
        .captures(text)
        .or_else(|| magnitude_regex.captures(text))
        .map(magnitude)
        .or_else(|| digits_regex.captures(text).map(|c| c[1].to_string()));
    let l2 = l2_regex.captures(text).map(magnitude);
    (l1, l2)
}

fn first_anchor_text(html: &str) -> Option<String> {
    let anchor_regex = ANCHOR_REGEX.get_or_init(|| Regex::new(r"(?s)<a[^>]*>(.*?)</a>").unwrap());
    anchor_regex
        .captures(html)
        .map(|c| strip_tags(&c[1]))
        .and_then(non_empty)
}

/// Visible text of an HTML fragment, whitespace collapsed.
fn strip_tags(html: &str) -> String {
    let tag_regex = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());
    let text = tag_regex
        .replace_all(html, " ")
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&#91;", "[")
        .replace("&#93;", "]")
        .replace("&amp;", "&");
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" ,", ",")
}

fn strip_citations(text: &str) -> String {
    let citation_regex = CITATION_REGEX.get_or_init(|| Regex::new(r"\s*\[\d+\]").unwrap());
    citation_regex
        .replace_all(text, "")
        .replace(" ,", ",")
        .trim()
        .to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const PAGE: &str = r#"<html><body>
<table class="infobox vevent">
<tr><th colspan="2">Wolof</th></tr>
<tr><th scope="row">Native to</th><td>Senegal, Gambia</td></tr>
<tr><th scope="row">Native speakers</th><td>5.4 million (2021)<sup>[1]</sup><br>L2: 12&#160;million</td></tr>
<tr><th scope="row">Language family</th><td><a href="/wiki/Niger-Congo">Niger–Congo</a><ul><li>Atlantic</li></ul></td></tr>
<tr><th scope="row">Writing system</th><td>Latin<sup>[2]</sup>, Arabic (Wolofal)</td></tr>
<tr><th scope="row"><a href="/wiki/Glottolog">Glottolog</a></th><td><a href="https://glottolog.org/wolo1247">wolo1247</a></td></tr>
</table>
</body></html>"#;

    // ==================== page_url Tests ====================

    #[test]
    fn test_page_url() {
        assert_eq!(
            page_url("https://en.wikipedia.org/wiki/", "Wolof"),
            "https://en.wikipedia.org/wiki/Wolof_language"
        );
        assert_eq!(
            page_url("https://en.wikipedia.org/wiki", "Pulaar (Senegal)"),
            "https://en.wikipedia.org/wiki/Pulaar_language"
        );
        assert_eq!(
            page_url("http://x", "Central Kanuri"),
            "http://x/Central_Kanuri_language"
        );
    }

    // ==================== parse_infobox Tests ====================

    #[test]
    fn test_parse_infobox() {
        let info = parse_infobox(PAGE, "https://w/Wolof_language");

        assert_eq!(info.url.as_deref(), Some("https://w/Wolof_language"));
        assert_eq!(info.speakers_l1.as_deref(), Some("5.4 million"));
        assert_eq!(info.speakers_l2.as_deref(), Some("12 million"));
        assert_eq!(info.family.as_deref(), Some("Niger–Congo"));
        assert_eq!(info.writing_system.as_deref(), Some("Latin, Arabic (Wolofal)"));
        assert_eq!(info.glottolog.as_deref(), Some("wolo1247"));
    }

    #[test]
    fn test_parse_page_without_infobox() {
        let info = parse_infobox("<html><p>Stub</p></html>", "u");
        assert_eq!(info.url.as_deref(), Some("u"));
        assert!(info.family.is_none());
    }

    #[test]
    fn test_parse_speakers_plain_number() {
        let (l1, l2) = parse_speakers("120,000 (2019)");
        assert_eq!(l1.as_deref(), Some("120,000"));
        assert!(l2.is_none());
    }

    #[test]
    fn test_unwritten_language() {
        let html = r#"<table class="infobox"><tr><th>Writing system</th><td>Unwritten</td></tr></table>"#;
        assert!(parse_infobox(html, "u").writing_system.is_none());
    }

    // ==================== fetch_language_info Tests ====================

    #[tokio::test]
    async fn test_fetch_language_info_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wiki/Wolof_language"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let info = fetch_language_info(&client, &format!("{}/wiki", mock_server.uri()), "Wolof")
            .await
            .expect("should fetch")
            .expect("page exists");

        assert_eq!(info.family.as_deref(), Some("Niger–Congo"));
    }

    #[tokio::test]
    async fn test_fetch_language_info_404_is_absence() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wiki/Fon_language"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let result = fetch_language_info(&client, &format!("{}/wiki", mock_server.uri()), "Fon")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_language_info_server_error_is_upstream() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let err = fetch_language_info(&client, &mock_server.uri(), "Ewe")
            .await
            .unwrap_err();

        assert!(err.is_absence());
        assert!(err.to_string().contains("503"));
    }
}
