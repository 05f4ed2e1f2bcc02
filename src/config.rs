use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    // Layout
    pub root_dir: PathBuf,

    // Remote sources
    pub hf_base_url: String,
    pub wikipedia_base_url: String,
    pub simbabench_api_url: String,
    pub user_agent: String,
    pub http_timeout_secs: u64,

    // Fetch pacing
    pub hub_page_limit: u32,
    pub request_delay_ms: u64,

    // Local reference data
    pub common_voice_file: String,

    // Document conversion
    pub pandoc_path: String,

    // Links printed in generated artefacts
    pub repo_url: String,
    pub live_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            root_dir: PathBuf::from(
                std::env::var("LANDSCAPE_ROOT").unwrap_or_else(|_| ".".to_string()),
            ),

            hf_base_url: std::env::var("HF_BASE_URL")
                .unwrap_or_else(|_| "https://huggingface.co".to_string()),
            wikipedia_base_url: std::env::var("WIKIPEDIA_BASE_URL")
                .unwrap_or_else(|_| "https://en.wikipedia.org/wiki".to_string()),
            simbabench_api_url: std::env::var("SIMBABENCH_API_URL")
                .unwrap_or_else(|_| "https://ubc-nlp-simbabench.hf.space/api/data".to_string()),
            user_agent: std::env::var("USER_AGENT").unwrap_or_else(|_| {
                format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            }),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", 15)?,

            hub_page_limit: parse_var("HUB_PAGE_LIMIT", 30)?,
            request_delay_ms: parse_var("REQUEST_DELAY_MS", 1000)?,

            common_voice_file: std::env::var("COMMON_VOICE_FILE")
                .unwrap_or_else(|_| "cv-corpus.json".to_string()),

            pandoc_path: std::env::var("PANDOC_PATH").unwrap_or_else(|_| "pandoc".to_string()),

            repo_url: std::env::var("REPO_URL").unwrap_or_else(|_| {
                "https://github.com/translatorswb/wca-nlp-landscape".to_string()
            }),
            live_url: std::env::var("LIVE_URL").unwrap_or_else(|_| {
                "https://translatorswb.github.io/wca-nlp-landscape/".to_string()
            }),
        })
    }

    /// Config rooted at `root` with default remote endpoints and no pacing delay.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root.into(),
            hf_base_url: "https://huggingface.co".to_string(),
            wikipedia_base_url: "https://en.wikipedia.org/wiki".to_string(),
            simbabench_api_url: "https://ubc-nlp-simbabench.hf.space/api/data".to_string(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            http_timeout_secs: 15,
            hub_page_limit: 30,
            request_delay_ms: 0,
            common_voice_file: "cv-corpus.json".to_string(),
            pandoc_path: "pandoc".to_string(),
            repo_url: "https://github.com/translatorswb/wca-nlp-landscape".to_string(),
            live_url: "https://translatorswb.github.io/wca-nlp-landscape/".to_string(),
        }
    }

    pub fn research_dir(&self) -> PathBuf {
        self.root_dir.join("Research")
    }

    pub fn languages_dir(&self) -> PathBuf {
        self.research_dir().join("Languages")
    }

    pub fn actors_dir(&self) -> PathBuf {
        self.research_dir().join("Actors")
    }

    pub fn focused_languages_path(&self) -> PathBuf {
        self.research_dir().join("focused_languages.yaml")
    }

    pub fn wca_languages_path(&self) -> PathBuf {
        self.research_dir().join("wca_all_languages.yaml")
    }

    pub fn source_data_dir(&self) -> PathBuf {
        self.root_dir.join("Source data")
    }

    pub fn grid_path(&self) -> PathBuf {
        self.source_data_dir()
            .join("African-language-grid")
            .join("all_africa.yaml")
    }

    pub fn coverage_dir(&self) -> PathBuf {
        self.source_data_dir().join("Multilingual-models")
    }

    pub fn evaluations_dir(&self) -> PathBuf {
        self.source_data_dir().join("Evaluations")
    }

    pub fn sources_path(&self) -> PathBuf {
        self.source_data_dir().join("sources.yaml")
    }

    pub fn common_voice_path(&self) -> PathBuf {
        self.source_data_dir().join(&self.common_voice_file)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root_dir.join("output")
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.output_dir().join("docs")
    }

    /// Directory of a single language record.
    pub fn language_dir(&self, iso: &str) -> PathBuf {
        self.languages_dir().join(iso)
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}
