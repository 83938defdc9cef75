mod catalog;
mod directory;

use rand::seq::IndexedRandom;
use rand::RngCore;
use serde::Serialize;
use std::path::PathBuf;

use crate::types::Template;

pub use catalog::{find_by_stem, CatalogEntry, CLASSIC_CATALOG};
pub use directory::DirectoryProvider;

/// Errors raised while reading template content.
///
/// Providers log these and fall back; they never reach the game.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read template folder {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Number of templates available in one category
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryStats {
    pub category: String,
    pub count: usize,
}

/// Source of meme templates.
///
/// Calls run inside a room's critical section, so implementations must be
/// fast and local. They must always return a usable template.
pub trait ContentProvider: Send + Sync {
    /// Draw a random template for the given category
    fn get_template(&self, category: &str, rng: &mut dyn RngCore) -> Template;

    /// Categories this provider knows about
    fn categories(&self) -> Vec<CategoryStats>;

    /// Get the name of this provider
    fn name(&self) -> &str;
}

/// Provider serving a fixed list of templates, regardless of category
#[derive(Debug, Clone)]
pub struct FixedProvider {
    templates: Vec<Template>,
}

impl FixedProvider {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }
}

impl ContentProvider for FixedProvider {
    fn get_template(&self, category: &str, rng: &mut dyn RngCore) -> Template {
        self.templates
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| Template::placeholder(category))
    }

    fn categories(&self) -> Vec<CategoryStats> {
        vec![CategoryStats {
            category: "fixed".to_string(),
            count: self.templates.len(),
        }]
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
