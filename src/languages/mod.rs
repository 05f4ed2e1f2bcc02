//! Language registry: which languages the research tracks and where they are spoken.
//!
//! # Architecture
//!
//! - `registry`: focus languages with their grouping tier, loaded from
//!   `Research/focused_languages.yaml` with a built-in default list
//! - `countries`: West and Central Africa country table (names, ISO 3166 codes)
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::languages::{LanguageRegistry, Tier};
//!
//! let registry = LanguageRegistry::load(&config.focused_languages_path())?;
//! for lang in registry.by_tier(Tier::Priority) {
//!     println!("{} ({})", lang.name, lang.code);
//! }
//! ```

pub mod countries;
mod registry;

pub use registry::{is_valid_iso_639_3, LanguageConfig, LanguageRegistry, Tier};
