use rand::seq::IndexedRandom;
use rand::RngCore;
use std::path::{Component, Path, PathBuf};

use super::catalog::{find_by_stem, CLASSIC_CATALOG};
use super::{CategoryStats, ContentError, ContentProvider};
use crate::types::{ImageKind, Template};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const CLASSIC: &str = "classic";

/// Templates backed by image folders, one subfolder per category.
///
/// `<root>/classic/drake.jpg` is served as `classic/drake.jpg`. Classic images
/// whose stem matches the built-in catalog pick up its name and description.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// List image file names in a category folder, sorted
    fn list_images(&self, category: &str) -> Result<Vec<String>, ContentError> {
        // Only direct subfolders of the root
        let mut components = Path::new(category).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            tracing::warn!("Refusing template category {:?}", category);
            return Ok(Vec::new());
        }

        let path = self.root.join(category);
        if !path.is_dir() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&path).map_err(|source| ContentError::ReadDir {
            path: path.clone(),
            source,
        })?;

        let mut images: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_image(name))
            .collect();
        images.sort();
        Ok(images)
    }

    fn images_or_empty(&self, category: &str) -> Vec<String> {
        match self.list_images(category) {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!("{}", e);
                Vec::new()
            }
        }
    }

    fn template_for_image(category: &str, file: &str) -> Template {
        let stem = file_stem(file);
        let image = Some(format!("{}/{}", category, file));

        if category == CLASSIC {
            if let Some(entry) = find_by_stem(&stem) {
                return Template {
                    name: entry.name.to_string(),
                    description: entry.description.to_string(),
                    category: entry.group.to_string(),
                    image,
                    image_kind: ImageKind::Classic,
                };
            }
            return Template {
                name: title_case(&stem),
                description: "Write a funny caption for this classic meme!".to_string(),
                category: "Classics".to_string(),
                image,
                image_kind: ImageKind::Classic,
            };
        }

        Template {
            name: title_case(&stem),
            description: "Write a funny caption for this image!".to_string(),
            category: category.to_string(),
            image,
            image_kind: ImageKind::Custom,
        }
    }
}

impl ContentProvider for DirectoryProvider {
    fn get_template(&self, category: &str, rng: &mut dyn RngCore) -> Template {
        let images = self.images_or_empty(category);
        if let Some(file) = images.choose(rng) {
            return Self::template_for_image(category, file);
        }

        // Classic falls back to the catalog without images
        if category == CLASSIC {
            if let Some(entry) = CLASSIC_CATALOG.choose(rng) {
                return Template {
                    name: entry.name.to_string(),
                    description: entry.description.to_string(),
                    category: entry.group.to_string(),
                    image: None,
                    image_kind: ImageKind::Classic,
                };
            }
        }

        tracing::debug!("No templates for category '{}', using placeholder", category);
        Template::placeholder(category)
    }

    fn categories(&self) -> Vec<CategoryStats> {
        let mut names: Vec<String> = std::fs::read_dir(&self.root)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.path().is_dir())
                    .filter_map(|entry| entry.file_name().into_string().ok())
                    .collect()
            })
            .unwrap_or_default();
        if !names.iter().any(|n| n == CLASSIC) {
            names.push(CLASSIC.to_string());
        }
        names.sort();

        names
            .into_iter()
            .map(|category| {
                let count = self.images_or_empty(&category).len();
                CategoryStats { category, count }
            })
            .collect()
    }

    fn name(&self) -> &str {
        "directory"
    }
}

fn is_image(file: &str) -> bool {
    Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn file_stem(file: &str) -> String {
    Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file)
        .to_string()
}

/// "woman-yelling_cat" -> "Woman Yelling Cat"
fn title_case(stem: &str) -> String {
    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
