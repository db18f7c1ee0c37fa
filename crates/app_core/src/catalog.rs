//! Catalog store: the loaded catalog and its derived image views

use crate::AppError;
use app_fs::CategoryRecord;
use std::collections::HashMap;
use std::ops::Range;

/// Canonical identifier of an image: unique across the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey {
    pub category_id: String,
    pub name: String,
}

impl ImageKey {
    pub fn new(category_id: &str, name: &str) -> Self {
        Self {
            category_id: category_id.to_string(),
            name: name.to_string(),
        }
    }
}

/// An image tagged with its owning category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub category_id: String,
    pub display_name: String,
    pub path: String,
    pub name: String,
    pub filename: String,
}

impl GalleryImage {
    pub fn is(&self, category_id: &str, name: &str) -> bool {
        self.category_id == category_id && self.name == name
    }
}

/// What a selection was computed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionScope {
    All,
    Category(String),
}

/// Ordered subset of the catalog shown by the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    scope: SelectionScope,
    images: Vec<GalleryImage>,
}

impl Selection {
    pub fn scope(&self) -> &SelectionScope {
        &self.scope
    }

    /// Category id when the selection is a single category
    pub fn category_id(&self) -> Option<&str> {
        match &self.scope {
            SelectionScope::Category(id) => Some(id),
            SelectionScope::All => None,
        }
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn get(&self, index: usize) -> Option<&GalleryImage> {
        self.images.get(index)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Position of an image by identity of (category id, name)
    pub fn position(&self, category_id: &str, name: &str) -> Option<usize> {
        self.images.iter().position(|img| img.is(category_id, name))
    }
}

/// Category list card model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCard {
    pub id: String,
    pub display_name: String,
    pub image_count: usize,
    /// First image of the category
    pub preview: Option<String>,
}

/// Gallery header model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMeta {
    pub id: String,
    pub display_name: String,
    pub image_count: usize,
}

/// Immutable catalog with its flattened image list
#[derive(Debug)]
pub struct CatalogStore {
    categories: Vec<CategoryRecord>,
    all_images: Vec<GalleryImage>,
    by_key: HashMap<ImageKey, usize>,
    by_category: HashMap<String, Range<usize>>,
}

impl CatalogStore {
    /// Parse a catalog document
    pub fn load(json: &str) -> Result<Self, AppError> {
        let records = app_fs::read_catalog(json)?;
        Self::from_records(records)
    }

    /// Build the store from already parsed records, checking identifier uniqueness
    pub fn from_records(mut categories: Vec<CategoryRecord>) -> Result<Self, AppError> {
        let mut all_images = Vec::new();
        let mut by_key = HashMap::new();
        let mut by_category = HashMap::new();

        for category in &mut categories {
            if category.id.is_empty() {
                return Err(AppError::MalformedCatalog("category with empty id".into()));
            }
            if category.display_name.is_empty() {
                category.display_name = category.id.clone();
            }

            let start = all_images.len();
            for image in &category.images {
                if image.path.is_empty() || image.name.is_empty() {
                    return Err(AppError::MalformedCatalog(format!(
                        "image without path or name in category {}",
                        category.id
                    )));
                }

                let key = ImageKey::new(&category.id, &image.name);
                if by_key.insert(key, all_images.len()).is_some() {
                    return Err(AppError::MalformedCatalog(format!(
                        "duplicate image {}/{}",
                        category.id, image.name
                    )));
                }

                all_images.push(GalleryImage {
                    category_id: category.id.clone(),
                    display_name: category.display_name.clone(),
                    path: image.path.clone(),
                    name: image.name.clone(),
                    filename: image.filename.clone(),
                });
            }

            if by_category
                .insert(category.id.clone(), start..all_images.len())
                .is_some()
            {
                return Err(AppError::MalformedCatalog(format!(
                    "duplicate category {}",
                    category.id
                )));
            }
        }

        tracing::info!(
            "Catalog loaded: {} images in {} categories",
            all_images.len(),
            categories.len()
        );

        Ok(Self {
            categories,
            all_images,
            by_key,
            by_category,
        })
    }

    /// Look an image up by its canonical identifier
    pub fn find_image(&self, category_id: &str, name: &str) -> Option<&GalleryImage> {
        self.by_key
            .get(&ImageKey::new(category_id, name))
            .map(|&i| &self.all_images[i])
    }

    /// Images of one category, in catalog order
    pub fn select_category(&self, category_id: &str) -> Result<Selection, AppError> {
        let range = self
            .by_category
            .get(category_id)
            .ok_or_else(|| AppError::CategoryNotFound(category_id.to_string()))?;

        Ok(Selection {
            scope: SelectionScope::Category(category_id.to_string()),
            images: self.all_images[range.clone()].to_vec(),
        })
    }

    /// Every image of the catalog
    pub fn select_all(&self) -> Selection {
        Selection {
            scope: SelectionScope::All,
            images: self.all_images.clone(),
        }
    }

    /// Position of `image` within `selection`
    pub fn index_within(selection: &Selection, image: &GalleryImage) -> Option<usize> {
        selection.position(&image.category_id, &image.name)
    }

    pub fn category(&self, category_id: &str) -> Option<&CategoryRecord> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    pub fn has_category(&self, category_id: &str) -> bool {
        self.by_category.contains_key(category_id)
    }

    pub fn categories(&self) -> &[CategoryRecord] {
        &self.categories
    }

    pub fn all_images(&self) -> &[GalleryImage] {
        &self.all_images
    }

    pub fn image_count(&self) -> usize {
        self.all_images.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Gallery header for a category
    pub fn category_meta(&self, category_id: &str) -> Option<CategoryMeta> {
        self.category(category_id).map(|c| CategoryMeta {
            id: c.id.clone(),
            display_name: c.display_name.clone(),
            image_count: c.images.len(),
        })
    }

    /// Category cards, ordered by `order` first and by display name after
    pub fn category_cards(&self, order: &[String]) -> Vec<CategoryCard> {
        let rank = |id: &str| order.iter().position(|o| o == id);

        let mut sorted: Vec<&CategoryRecord> = self.categories.iter().collect();
        sorted.sort_by(|a, b| match (rank(&a.id), rank(&b.id)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.display_name.cmp(&b.display_name),
        });

        sorted
            .into_iter()
            .map(|c| CategoryCard {
                id: c.id.clone(),
                display_name: c.display_name.clone(),
                image_count: c.images.len(),
                preview: c.images.first().map(|img| img.path.clone()),
            })
            .collect()
    }
}
