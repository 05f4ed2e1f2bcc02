use super::views::{ActorPageView, IndexView, LanguagePageView};
use anyhow::{anyhow, Result};
use handlebars::Handlebars;
use serde::Serialize;

const INDEX_TEMPLATE: &str = "index";
const LANGUAGE_TEMPLATE: &str = "language";
const ACTOR_TEMPLATE: &str = "actor";

/// Handlebars registry with the site templates compiled in.
///
/// Every `{{value}}` is HTML-escaped by the engine; only the pre-rendered
/// notes are inserted raw.
pub struct SiteRenderer {
    handlebars: Handlebars<'static>,
}

impl SiteRenderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        handlebars
            .register_partial("styles", include_str!("../../templates/styles.css"))
            .map_err(|e| anyhow!("Failed to register styles: {}", e))?;
        handlebars
            .register_partial("header", include_str!("../../templates/header.hbs"))
            .map_err(|e| anyhow!("Failed to register header: {}", e))?;

        for (name, source) in [
            (INDEX_TEMPLATE, include_str!("../../templates/index.hbs")),
            (LANGUAGE_TEMPLATE, include_str!("../../templates/language.hbs")),
            (ACTOR_TEMPLATE, include_str!("../../templates/actor.hbs")),
        ] {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| anyhow!("Failed to compile template '{}': {}", name, e))?;
        }

        Ok(Self { handlebars })
    }

    fn render<T: Serialize>(&self, template: &str, view: &T) -> Result<String> {
        self.handlebars
            .render(template, view)
            .map_err(|e| anyhow!("Template render error in '{}': {}", template, e))
    }

    pub fn index(&self, view: &IndexView) -> Result<String> {
        self.render(INDEX_TEMPLATE, view)
    }

    pub fn language(&self, view: &LanguagePageView) -> Result<String> {
        self.render(LANGUAGE_TEMPLATE, view)
    }

    pub fn actor(&self, view: &ActorPageView) -> Result<String> {
        self.render(ACTOR_TEMPLATE, view)
    }
}
