//! Navigation state machine: category list, gallery and lightbox
//!
//! `Navigator` owns the view state and keeps the history URL isomorphic to
//! it. Every mutating operation takes a [`UrlSync`]: user interaction passes
//! `Write`, anything caused by the URL itself (boot, back/forward) passes
//! `Silent` so a URL change never feeds back into another URL write.

use crate::catalog::{CatalogStore, CategoryCard, Selection};
use crate::history::History;
use crate::render::Renderer;
use crate::route::{Route, RoutingMode, UrlCodec};
use crate::AppError;

/// Which of the three views is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    CategoryList,
    Gallery,
    Lightbox,
}

/// Current view with exactly the data valid for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    CategoryList,
    Gallery { selection: Selection },
    Lightbox { selection: Selection, index: usize },
}

impl ViewState {
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewState::CategoryList => ViewKind::CategoryList,
            ViewState::Gallery { .. } => ViewKind::Gallery,
            ViewState::Lightbox { .. } => ViewKind::Lightbox,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            ViewState::CategoryList => None,
            ViewState::Gallery { selection } | ViewState::Lightbox { selection, .. } => {
                Some(selection)
            }
        }
    }

    fn into_selection(self) -> Option<Selection> {
        match self {
            ViewState::CategoryList => None,
            ViewState::Gallery { selection } | ViewState::Lightbox { selection, .. } => {
                Some(selection)
            }
        }
    }

    pub fn category_id(&self) -> Option<&str> {
        self.selection().and_then(Selection::category_id)
    }

    /// Lightbox index; `None` outside the lightbox
    pub fn index(&self) -> Option<usize> {
        match self {
            ViewState::Lightbox { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Route this state is shown at
    pub fn route(&self) -> Route {
        match self {
            ViewState::CategoryList => Route::Home,
            ViewState::Gallery { selection } => match selection.category_id() {
                Some(id) => Route::category(id),
                None => Route::Home,
            },
            ViewState::Lightbox { selection, index } => match selection.get(*index) {
                Some(image) => Route::image(&image.category_id, &image.name),
                None => Route::Home,
            },
        }
    }
}

/// Whether a transition also writes the URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSync {
    /// User interaction: record the new state in history
    Write,
    /// Caused by a URL change: leave history alone
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryWrite {
    Push,
    Replace,
}

/// The view-state engine
pub struct Navigator<R: Renderer, H: History> {
    store: CatalogStore,
    codec: UrlCodec,
    renderer: R,
    history: H,
    cards: Vec<CategoryCard>,
    state: ViewState,
    /// Set while a URL is being applied; URL writes are refused meanwhile
    resolving: bool,
}

impl<R: Renderer, H: History> Navigator<R, H> {
    pub fn new(
        store: CatalogStore,
        codec: UrlCodec,
        renderer: R,
        history: H,
        category_order: &[String],
    ) -> Self {
        let cards = store.category_cards(category_order);
        Self {
            store,
            codec,
            renderer,
            history,
            cards,
            state: ViewState::CategoryList,
            resolving: false,
        }
    }

    /// Show the initial view for the current URL
    ///
    /// `redirect` is the path a share page handed over; it replaces the
    /// current entry before being resolved.
    pub fn boot(&mut self, redirect: Option<&str>) {
        self.renderer.show_category_list(&self.cards);

        if let Some(path) = redirect {
            // Share pages hand over a location path whatever the routing mode
            let route = UrlCodec::new(RoutingMode::Path, self.codec.base()).parse(path);
            let url = self.codec.format(&route);
            tracing::info!("Restoring redirected deep link {}", url);
            self.write_url(&url, HistoryWrite::Replace);
        }

        let url = self.history.current_url();
        self.apply_url(&url);
    }

    /// Reconcile with a URL the browser moved to (back/forward)
    pub fn on_pop_state(&mut self, url: &str) {
        tracing::debug!("Pop state to {}", url);
        self.apply_url(url);
    }

    fn apply_url(&mut self, url: &str) {
        let route = self.codec.parse(url);
        self.resolving = true;
        self.apply_route(&route);
        self.resolving = false;
    }

    fn apply_route(&mut self, route: &Route) {
        match route {
            Route::Home => {
                if self.state.kind() != ViewKind::CategoryList {
                    self.go_home(UrlSync::Silent);
                }
            }
            Route::Category { category_id } => {
                if let Err(e) = self.open_category(category_id, UrlSync::Silent) {
                    tracing::warn!("Deep link fallback to home: {}", e);
                    self.fallback_home();
                }
            }
            Route::Image { category_id, name } => self.resolve_deep_link(category_id, name),
        }
    }

    fn fallback_home(&mut self) {
        if self.state.kind() != ViewKind::CategoryList {
            self.go_home(UrlSync::Silent);
        }
    }

    /// Establish the gallery of the image's category, then open the lightbox on it
    fn resolve_deep_link(&mut self, category_id: &str, name: &str) {
        if !self.store.has_category(category_id) {
            tracing::warn!("Deep link to unknown category {}, showing home", category_id);
            self.fallback_home();
            return;
        }

        let image = match self.store.find_image(category_id, name) {
            Some(image) => image.clone(),
            None => {
                let err = AppError::ImageNotFound {
                    category: category_id.to_string(),
                    name: name.to_string(),
                };
                tracing::warn!("Deep link left unchanged: {}", err);
                return;
            }
        };

        if self.state.category_id() != Some(category_id) {
            if let Err(e) = self.open_category(category_id, UrlSync::Silent) {
                tracing::warn!("Cannot open category for deep link: {}", e);
                return;
            }
        }

        match self
            .state
            .selection()
            .and_then(|selection| CatalogStore::index_within(selection, &image))
        {
            Some(index) => self.open_image(index, UrlSync::Silent),
            None => tracing::warn!("Image {}/{} missing from its selection", category_id, name),
        }
    }

    /// Category list -> gallery of `category_id`
    pub fn open_category(&mut self, category_id: &str, sync: UrlSync) -> Result<(), AppError> {
        let selection = self.store.select_category(category_id)?;
        let meta = self
            .store
            .category_meta(category_id)
            .ok_or_else(|| AppError::CategoryNotFound(category_id.to_string()))?;

        if self.state.kind() == ViewKind::Lightbox {
            self.renderer.hide_lightbox();
        }

        if selection.is_empty() {
            self.renderer.show_empty_gallery(&meta);
        } else {
            self.renderer.show_gallery(&selection, &meta);
        }

        tracing::debug!("Open category {} ({} images)", category_id, selection.len());
        self.state = ViewState::Gallery { selection };

        if sync == UrlSync::Write {
            let url = self.codec.format(&Route::category(category_id));
            self.write_url(&url, HistoryWrite::Push);
        }
        Ok(())
    }

    /// Any view -> category list
    pub fn go_home(&mut self, sync: UrlSync) {
        if self.state.kind() == ViewKind::Lightbox {
            self.renderer.hide_lightbox();
        }

        self.state = ViewState::CategoryList;
        self.renderer.show_category_list(&self.cards);

        if sync == UrlSync::Write {
            let url = self.codec.format(&Route::Home);
            self.write_url(&url, HistoryWrite::Push);
        }
    }

    /// Gallery (or lightbox) -> lightbox on `selection[index]`
    ///
    /// `index` must be valid for the current selection; callers resolve it
    /// from the selection they were shown.
    pub fn open_image(&mut self, index: usize, sync: UrlSync) {
        let len = self.state.selection().map(Selection::len);
        let valid = matches!(len, Some(len) if index < len);
        debug_assert!(valid, "lightbox index {} out of range for {:?}", index, len);
        if !valid {
            tracing::error!("Ignoring lightbox index {} out of range for {:?}", index, len);
            return;
        }

        let state = std::mem::replace(&mut self.state, ViewState::CategoryList);
        let Some(selection) = state.into_selection() else {
            return;
        };

        self.renderer.show_lightbox(&selection, index);
        self.state = ViewState::Lightbox { selection, index };

        if sync == UrlSync::Write {
            let url = self.codec.format(&self.state.route());
            self.write_url(&url, HistoryWrite::Push);
        }
    }

    /// Lightbox -> gallery, at the category URL of the image that was shown
    pub fn close_lightbox(&mut self, sync: UrlSync) {
        let ViewState::Lightbox { .. } = self.state else {
            tracing::debug!("Close requested without an open lightbox");
            return;
        };

        let state = std::mem::replace(&mut self.state, ViewState::CategoryList);
        let ViewState::Lightbox { selection, index } = state else {
            return;
        };

        let category_id = selection.get(index).map(|img| img.category_id.clone());
        self.renderer.hide_lightbox();
        self.state = ViewState::Gallery { selection };

        if sync == UrlSync::Write {
            if let Some(category_id) = category_id {
                let url = self.codec.format(&Route::category(&category_id));
                self.write_url(&url, HistoryWrite::Push);
            }
        }
    }

    /// Lightbox step to the following image, wrapping at the end
    pub fn next_image(&mut self, sync: UrlSync) {
        self.step(1, sync);
    }

    /// Lightbox step to the preceding image, wrapping at the start
    pub fn prev_image(&mut self, sync: UrlSync) {
        self.step(-1, sync);
    }

    fn step(&mut self, delta: isize, sync: UrlSync) {
        let ViewState::Lightbox { selection, index } = &mut self.state else {
            tracing::debug!("Step requested without an open lightbox");
            return;
        };

        let len = selection.len() as isize;
        if len == 0 {
            return;
        }
        *index = (*index as isize + delta).rem_euclid(len) as usize;
        self.renderer.show_lightbox(selection, *index);

        if sync == UrlSync::Write {
            let url = self.codec.format(&self.state.route());
            self.write_url(&url, HistoryWrite::Replace);
        }
    }

    fn write_url(&mut self, url: &str, write: HistoryWrite) {
        if self.resolving {
            tracing::warn!("Refusing URL write to {} while applying a URL", url);
            return;
        }

        match write {
            HistoryWrite::Push => self.history.push(url),
            HistoryWrite::Replace => self.history.replace(url),
        }
        tracing::debug!("History {:?} {}", write, url);
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view_kind(&self) -> ViewKind {
        self.state.kind()
    }

    pub fn active_category_id(&self) -> Option<&str> {
        self.state.category_id()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.index()
    }

    pub fn is_lightbox_open(&self) -> bool {
        self.state.kind() == ViewKind::Lightbox
    }

    pub fn has_selection(&self) -> bool {
        self.state.selection().is_some()
    }

    /// Route derived from the view state
    pub fn current_route(&self) -> Route {
        self.state.route()
    }

    pub fn current_url(&self) -> String {
        self.history.current_url()
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn codec(&self) -> &UrlCodec {
        &self.codec
    }

    pub fn cards(&self) -> &[CategoryCard] {
        &self.cards
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::SAMPLE;
    use crate::history::MemoryHistory;
    use crate::render::{RecordingRenderer, RenderCall};

    type TestNavigator = Navigator<RecordingRenderer, MemoryHistory>;

    fn navigator_at(url: &str) -> TestNavigator {
        let store = CatalogStore::load(SAMPLE).unwrap();
        let codec = UrlCodec::new(RoutingMode::Path, "/");
        let mut nav = Navigator::new(store, codec, RecordingRenderer::new(), MemoryHistory::new(url), &[]);
        nav.boot(None);
        nav
    }

    fn assert_isomorphic(nav: &TestNavigator) {
        assert_eq!(nav.codec().parse(&nav.current_url()), nav.current_route());
    }

    #[test]
    fn test_open_category_pushes() {
        let mut nav = navigator_at("/");
        nav.open_category("vyakti", UrlSync::Write).unwrap();

        assert_eq!(nav.view_kind(), ViewKind::Gallery);
        assert_eq!(nav.current_url(), "/category/vyakti");
        assert_eq!(nav.history().push_count(), 1);
        assert_isomorphic(&nav);
    }

    #[test]
    fn test_open_unknown_category_keeps_state() {
        let mut nav = navigator_at("/category/kodi");
        let err = nav.open_category("nope", UrlSync::Write).unwrap_err();

        assert!(matches!(err, AppError::CategoryNotFound(_)));
        assert_eq!(nav.active_category_id(), Some("kodi"));
        assert_eq!(nav.history().write_count(), 0);
    }

    #[test]
    fn test_empty_category_shows_placeholder() {
        let store = CatalogStore::load(r#"[{"category": "empty", "images": []}]"#).unwrap();
        let codec = UrlCodec::new(RoutingMode::Path, "/");
        let mut nav = Navigator::new(store, codec, RecordingRenderer::new(), MemoryHistory::new("/"), &[]);
        nav.boot(None);
        nav.open_category("empty", UrlSync::Write).unwrap();

        assert_eq!(
            nav.renderer().last(),
            Some(&RenderCall::EmptyGallery { category_id: "empty".into() })
        );
        assert_eq!(nav.view_kind(), ViewKind::Gallery);
    }

    #[test]
    fn test_next_wraps_and_is_idempotent_over_cycle() {
        let mut nav = navigator_at("/");
        nav.open_category("vyakti", UrlSync::Write).unwrap();
        nav.open_image(1, UrlSync::Write);

        let len = nav.state().selection().unwrap().len();
        for _ in 0..len {
            nav.next_image(UrlSync::Write);
        }
        assert_eq!(nav.active_index(), Some(1));

        nav.next_image(UrlSync::Write);
        assert_eq!(nav.active_index(), Some(0));
        nav.prev_image(UrlSync::Write);
        assert_eq!(nav.active_index(), Some(1));
        assert_isomorphic(&nav);
    }

    #[test]
    fn test_stepping_replaces_history() {
        let mut nav = navigator_at("/");
        nav.open_category("vyakti", UrlSync::Write).unwrap();
        nav.open_image(0, UrlSync::Write);
        let depth = nav.history().depth();

        for _ in 0..25 {
            nav.next_image(UrlSync::Write);
        }

        assert!(nav.history().depth() <= depth + 1);
        assert_eq!(nav.history().depth(), depth);
        assert_isomorphic(&nav);
    }

    #[test]
    fn test_close_pushes_category_url() {
        let mut nav = navigator_at("/image/vyakti/b");
        nav.close_lightbox(UrlSync::Write);

        assert_eq!(nav.view_kind(), ViewKind::Gallery);
        assert_eq!(nav.current_url(), "/category/vyakti");
        assert_eq!(nav.history().push_count(), 1);
        assert_eq!(nav.renderer().last(), Some(&RenderCall::HideLightbox));
    }

    #[test]
    fn test_close_without_lightbox_is_noop() {
        let mut nav = navigator_at("/category/kodi");
        nav.close_lightbox(UrlSync::Write);
        nav.next_image(UrlSync::Write);

        assert_eq!(nav.view_kind(), ViewKind::Gallery);
        assert_eq!(nav.history().write_count(), 0);
    }

    #[test]
    fn test_go_home_from_lightbox() {
        let mut nav = navigator_at("/image/kodi/c");
        nav.go_home(UrlSync::Write);

        assert_eq!(nav.view_kind(), ViewKind::CategoryList);
        assert_eq!(nav.current_url(), "/");
        assert!(nav.renderer().calls().contains(&RenderCall::HideLightbox));
    }

    #[test]
    fn test_pop_state_does_not_write() {
        let mut nav = navigator_at("/");
        nav.open_category("vyakti", UrlSync::Write).unwrap();
        nav.open_image(1, UrlSync::Write);
        let writes = nav.history().write_count();

        let url = nav.history_mut().back().unwrap();
        nav.on_pop_state(&url);
        assert_eq!(nav.view_kind(), ViewKind::Gallery);

        let url = nav.history_mut().forward().unwrap();
        nav.on_pop_state(&url);
        assert_eq!(nav.view_kind(), ViewKind::Lightbox);
        assert_eq!(nav.active_index(), Some(1));

        assert_eq!(nav.history().write_count(), writes);
        assert_isomorphic(&nav);
    }

    #[test]
    fn test_pop_state_switches_category_under_lightbox() {
        let mut nav = navigator_at("/image/vyakti/a");
        nav.on_pop_state("/image/kodi/c");

        assert_eq!(nav.active_category_id(), Some("kodi"));
        assert_eq!(nav.active_index(), Some(0));
        assert_eq!(nav.history().write_count(), 0);
    }

    #[test]
    fn test_unknown_image_leaves_view_unchanged() {
        let mut nav = navigator_at("/category/vyakti");
        nav.on_pop_state("/image/vyakti/zzz");

        assert_eq!(nav.view_kind(), ViewKind::Gallery);
        assert_eq!(nav.active_category_id(), Some("vyakti"));
        assert_eq!(nav.history().write_count(), 0);
    }

    #[test]
    fn test_unknown_category_falls_back_home() {
        let mut nav = navigator_at("/category/vyakti");
        nav.on_pop_state("/category/missing");
        assert_eq!(nav.view_kind(), ViewKind::CategoryList);

        let mut nav = navigator_at("/image/kodi/c");
        nav.on_pop_state("/image/missing/c");
        assert_eq!(nav.view_kind(), ViewKind::CategoryList);
        assert_eq!(nav.history().write_count(), 0);
    }

    #[test]
    fn test_redirect_restore_replaces_once() {
        let store = CatalogStore::load(SAMPLE).unwrap();
        let codec = UrlCodec::new(RoutingMode::Path, "/phalakpages/");
        let mut nav = Navigator::new(
            store,
            codec,
            RecordingRenderer::new(),
            MemoryHistory::new("/phalakpages/"),
            &[],
        );
        nav.boot(Some("/phalakpages/image/kodi/c"));

        assert_eq!(nav.view_kind(), ViewKind::Lightbox);
        assert_eq!(nav.current_url(), "/phalakpages/image/kodi/c");
        assert_eq!(nav.history().replace_count(), 1);
        assert_eq!(nav.history().push_count(), 0);
        assert_eq!(nav.history().len(), 1);
    }

    #[test]
    fn test_redirect_restore_in_hash_mode() {
        let store = CatalogStore::load(SAMPLE).unwrap();
        let codec = UrlCodec::new(RoutingMode::Hash, "/phalakpages/");
        let mut nav = Navigator::new(
            store,
            codec,
            RecordingRenderer::new(),
            MemoryHistory::new("/phalakpages/"),
            &[],
        );
        nav.boot(Some("/phalakpages/image/kodi/c"));

        assert_eq!(nav.view_kind(), ViewKind::Lightbox);
        assert_eq!(nav.active_category_id(), Some("kodi"));
        assert_eq!(nav.current_url(), "/phalakpages/#image/kodi/c");
        assert_eq!(nav.history().replace_count(), 1);
        assert_eq!(nav.history().push_count(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_open_image_out_of_range_is_contract_violation() {
        let mut nav = navigator_at("/category/kodi");
        nav.open_image(5, UrlSync::Write);
    }
}
