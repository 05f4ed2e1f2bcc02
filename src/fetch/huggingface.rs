//! Model/dataset hub search through its JSON API.
//!
//! The hub tags languages inconsistently (some repos use ISO 639-1, others
//! ISO 639-3), so every query runs once per code and the results are merged.

use crate::error::{LandscapeError, LandscapeResult};
use crate::records::{DatasetsFile, HubItem, HubListing, ModelsFile, TaskType};
use crate::retry::{with_retry, RetryConfig};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubKind {
    Models,
    Datasets,
}

impl HubKind {
    fn api_path(&self) -> &'static str {
        match self {
            HubKind::Models => "api/models",
            HubKind::Datasets => "api/datasets",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            HubKind::Models => "models",
            HubKind::Datasets => "datasets",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiItem {
    id: String,
    #[serde(default)]
    downloads: u64,
    #[serde(default)]
    likes: u64,
}

pub struct HubClient<'a> {
    client: &'a reqwest::Client,
    base_url: String,
    limit: u32,
}

impl<'a> HubClient<'a> {
    pub fn new(client: &'a reqwest::Client, base_url: &str, limit: u32) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limit,
        }
    }

    fn item_url(&self, kind: HubKind, id: &str) -> String {
        match kind {
            HubKind::Models => format!("{}/{}", self.base_url, id),
            HubKind::Datasets => format!("{}/datasets/{}", self.base_url, id),
        }
    }

    async fn search_once(
        &self,
        kind: HubKind,
        task: TaskType,
        code: &str,
    ) -> LandscapeResult<Vec<HubItem>> {
        let url = format!("{}/{}", self.base_url, kind.api_path());
        let limit = self.limit.to_string();
        let mut request = self.client.get(&url).query(&[
            ("sort", "downloads"),
            ("direction", "-1"),
            ("limit", limit.as_str()),
        ]);
        request = match kind {
            HubKind::Models => {
                request.query(&[("pipeline_tag", task.pipeline_tag()), ("language", code)])
            }
            HubKind::Datasets => request.query(&[
                ("filter", format!("task_categories:{}", task.pipeline_tag())),
                ("filter", format!("language:{}", code)),
            ]),
        };

        let source = format!("Hub {}", kind.label());
        let response = request
            .send()
            .await
            .map_err(|e| LandscapeError::upstream(&source, code, format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LandscapeError::upstream(&source, code, format!("HTTP {}", status)));
        }

        let items: Vec<ApiItem> = response
            .json()
            .await
            .map_err(|e| LandscapeError::upstream(&source, code, format!("bad response: {}", e)))?;

        Ok(items
            .into_iter()
            .map(|item| HubItem {
                url: self.item_url(kind, &item.id),
                name: item.id,
                downloads: item.downloads,
                likes: item.likes,
            })
            .collect())
    }

    /// Search one task for every code and merge the results.
    pub async fn listing(
        &self,
        kind: HubKind,
        task: TaskType,
        codes: &[&str],
    ) -> LandscapeResult<HubListing> {
        let mut listing = HubListing::default();
        for code in codes {
            let items = with_retry(
                &RetryConfig::hub_query(),
                &format!("Hub {} {} {}", kind.label(), task, code),
                || self.search_once(kind, task, code),
            )
            .await?;
            debug!("{} {} for '{}': {} items", task, kind.label(), code, items.len());
            listing.add_code_results(code, items);
        }
        Ok(listing)
    }

    /// Model listings for every task.
    pub async fn models_for(&self, codes: &[&str]) -> LandscapeResult<ModelsFile> {
        let mut models = ModelsFile::new();
        for task in TaskType::ALL {
            models.insert(task, self.listing(HubKind::Models, task, codes).await?);
        }
        Ok(models)
    }

    /// Dataset listings for the speech tasks.
    pub async fn datasets_for(&self, codes: &[&str]) -> LandscapeResult<DatasetsFile> {
        let mut datasets = DatasetsFile::new();
        for task in TaskType::WITH_DATASETS {
            datasets.insert(task, self.listing(HubKind::Datasets, task, codes).await?);
        }
        Ok(datasets)
    }
}

/// Codes to query for a language: ISO 639-1 first when it exists, then 639-3.
pub fn search_codes<'a>(iso_639_3: &'a str, iso_639_1: Option<&'a str>) -> Vec<&'a str> {
    iso_639_1
        .filter(|c| !c.is_empty())
        .into_iter()
        .chain(std::iter::once(iso_639_3))
        .collect()
}
