//! Rendering collaborator boundary

use crate::catalog::{CategoryCard, CategoryMeta, Selection};

/// Instructions the core gives to whatever draws the gallery
///
/// Calls are fire-and-forget: the core never waits for paint or image load.
pub trait Renderer {
    /// Show the category cards and hide the gallery grid
    fn show_category_list(&mut self, cards: &[CategoryCard]);

    /// Show the gallery grid for a selection
    fn show_gallery(&mut self, selection: &Selection, meta: &CategoryMeta);

    /// Show the gallery header with a "no images" placeholder instead of a grid
    fn show_empty_gallery(&mut self, meta: &CategoryMeta);

    /// Open (or update) the lightbox on `selection[index]`
    fn show_lightbox(&mut self, selection: &Selection, index: usize);

    fn hide_lightbox(&mut self);

    /// Persistent error in place of the gallery
    fn show_error(&mut self, message: &str);
}

/// One recorded renderer instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    CategoryList { card_ids: Vec<String> },
    Gallery { category_id: String, image_names: Vec<String> },
    EmptyGallery { category_id: String },
    Lightbox { category_id: String, name: String, index: usize },
    HideLightbox,
    Error { message: String },
}

/// Renderer that records instructions instead of drawing
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    pub fn last(&self) -> Option<&RenderCall> {
        self.calls.last()
    }
}

impl Renderer for RecordingRenderer {
    fn show_category_list(&mut self, cards: &[CategoryCard]) {
        self.calls.push(RenderCall::CategoryList {
            card_ids: cards.iter().map(|c| c.id.clone()).collect(),
        });
    }

    fn show_gallery(&mut self, selection: &Selection, meta: &CategoryMeta) {
        self.calls.push(RenderCall::Gallery {
            category_id: meta.id.clone(),
            image_names: selection.images().iter().map(|i| i.name.clone()).collect(),
        });
    }

    fn show_empty_gallery(&mut self, meta: &CategoryMeta) {
        self.calls.push(RenderCall::EmptyGallery {
            category_id: meta.id.clone(),
        });
    }

    fn show_lightbox(&mut self, selection: &Selection, index: usize) {
        if let Some(image) = selection.get(index) {
            self.calls.push(RenderCall::Lightbox {
                category_id: image.category_id.clone(),
                name: image.name.clone(),
                index,
            });
        }
    }

    fn hide_lightbox(&mut self) {
        self.calls.push(RenderCall::HideLightbox);
    }

    fn show_error(&mut self, message: &str) {
        self.calls.push(RenderCall::Error {
            message: message.to_string(),
        });
    }
}
