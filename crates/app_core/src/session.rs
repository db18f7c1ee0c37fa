//! Gallery session: loading phase, input translation and the command table

use crate::catalog::{CatalogStore, Selection};
use crate::command::{Command, CommandDispatcher, CommandId, Dispatch};
use crate::config::AppConfig;
use crate::history::History;
use crate::input::{InputEvent, InputHandler};
use crate::loader::CatalogFetcher;
use crate::navigation::{Navigator, UrlSync};
use crate::render::Renderer;
use crate::route::UrlCodec;
use crate::AppError;

/// Lifecycle phase of a session
pub enum SessionState<R: Renderer, H: History> {
    /// Catalog fetch in flight; input is ignored
    Loading { renderer: R, history: H },
    Ready(Box<Navigator<R, H>>),
    /// Catalog could not be loaded; terminal until reload
    Failed { renderer: R, history: H, error: AppError },
}

/// One browser session of the gallery
pub struct Session<R: Renderer + 'static, H: History + 'static> {
    codec: UrlCodec,
    category_order: Vec<String>,
    redirect: Option<String>,
    input: InputHandler,
    commands: CommandDispatcher<Navigator<R, H>>,
    state: SessionState<R, H>,
}

impl<R: Renderer + 'static, H: History + 'static> Session<R, H> {
    /// Session in the loading phase
    pub fn new(config: &AppConfig, renderer: R, history: H) -> Self {
        Self {
            codec: config.routing.codec(),
            category_order: config.display.category_order.clone(),
            redirect: None,
            input: InputHandler::new(&config.keybindings, config.navigation.swipe_threshold_px),
            commands: navigation_commands(),
            state: SessionState::Loading { renderer, history },
        }
    }

    /// Deep link handed over by a share page, restored on boot
    pub fn with_redirect(mut self, path: Option<String>) -> Self {
        self.redirect = path;
        self
    }

    /// Fetch the catalog and complete loading
    pub async fn load<F: CatalogFetcher + ?Sized>(self, fetcher: &F, catalog_url: &str) -> Self {
        let result = fetcher.fetch(catalog_url).await;
        self.complete_load(result)
    }

    /// Finish the loading phase with the fetched document
    pub fn complete_load(mut self, document: Result<String, AppError>) -> Self {
        let (mut renderer, history) = match self.state {
            SessionState::Loading { renderer, history } => (renderer, history),
            other => {
                tracing::warn!("Catalog load completed outside the loading phase");
                self.state = other;
                return self;
            }
        };

        self.state = match document.and_then(|json| CatalogStore::load(&json)) {
            Ok(store) => {
                let mut navigator = Navigator::new(
                    store,
                    self.codec.clone(),
                    renderer,
                    history,
                    &self.category_order,
                );
                navigator.boot(self.redirect.as_deref());
                SessionState::Ready(Box::new(navigator))
            }
            Err(error) => {
                tracing::error!("Error loading catalog: {}", error);
                renderer.show_error(&error.user_message());
                SessionState::Failed {
                    renderer,
                    history,
                    error,
                }
            }
        };
        self
    }

    /// Feed one input event through the command table
    pub fn handle(&mut self, event: InputEvent) -> Result<Dispatch, AppError> {
        let navigator = match &mut self.state {
            SessionState::Ready(navigator) => navigator,
            SessionState::Loading { .. } => {
                tracing::debug!("Ignoring {:?} while the catalog loads", event);
                return Ok(Dispatch::Rejected);
            }
            SessionState::Failed { .. } => {
                tracing::debug!("Ignoring {:?} after a failed load", event);
                return Ok(Dispatch::Rejected);
            }
        };

        match self.input.translate(event) {
            Some(cmd) => self.commands.dispatch(navigator.as_mut(), &cmd),
            None => Ok(Dispatch::Rejected),
        }
    }

    pub fn state(&self) -> &SessionState<R, H> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading { .. })
    }

    pub fn navigator(&self) -> Option<&Navigator<R, H>> {
        match &self.state {
            SessionState::Ready(navigator) => Some(navigator.as_ref()),
            _ => None,
        }
    }

    pub fn navigator_mut(&mut self) -> Option<&mut Navigator<R, H>> {
        match &mut self.state {
            SessionState::Ready(navigator) => Some(navigator.as_mut()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match &self.state {
            SessionState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn renderer(&self) -> &R {
        match &self.state {
            SessionState::Loading { renderer, .. } | SessionState::Failed { renderer, .. } => renderer,
            SessionState::Ready(navigator) => navigator.renderer(),
        }
    }

    pub fn history(&self) -> &H {
        match &self.state {
            SessionState::Loading { history, .. } | SessionState::Failed { history, .. } => history,
            SessionState::Ready(navigator) => navigator.history(),
        }
    }

    pub fn history_mut(&mut self) -> &mut H {
        match &mut self.state {
            SessionState::Loading { history, .. } | SessionState::Failed { history, .. } => history,
            SessionState::Ready(navigator) => navigator.history_mut(),
        }
    }
}

/// Index parameter checked against the shown selection
fn checked_index<R: Renderer, H: History>(
    navigator: &Navigator<R, H>,
    cmd: &Command,
) -> Result<usize, AppError> {
    let index = cmd.index_param()?;
    let len = navigator.state().selection().map(Selection::len).unwrap_or(0);

    if index >= len {
        return Err(AppError::InvalidCommand {
            command: cmd.id.as_str().to_string(),
            reason: format!("index {} outside selection of {}", index, len),
        });
    }
    Ok(index)
}

/// The handler table wiring user commands to navigator transitions
pub fn navigation_commands<R, H>() -> CommandDispatcher<Navigator<R, H>>
where
    R: Renderer + 'static,
    H: History + 'static,
{
    let mut table = CommandDispatcher::new();

    table.register_fn(CommandId::NAV_HOME, Navigator::has_selection, |nav, _| {
        nav.go_home(UrlSync::Write);
        Ok(())
    });

    table.register_fn(CommandId::NAV_OPEN_CATEGORY, |_| true, |nav, cmd| {
        nav.open_category(cmd.string_param()?, UrlSync::Write)
    });

    table.register_fn(CommandId::NAV_OPEN_IMAGE, Navigator::has_selection, |nav, cmd| {
        let index = checked_index(nav, cmd)?;
        nav.open_image(index, UrlSync::Write);
        Ok(())
    });

    table.register_fn(CommandId::NAV_SELECT_IMAGE, Navigator::is_lightbox_open, |nav, cmd| {
        let index = checked_index(nav, cmd)?;
        nav.open_image(index, UrlSync::Write);
        Ok(())
    });

    table.register_fn(CommandId::NAV_CLOSE_LIGHTBOX, Navigator::is_lightbox_open, |nav, _| {
        nav.close_lightbox(UrlSync::Write);
        Ok(())
    });

    table.register_fn(CommandId::NAV_NEXT_IMAGE, Navigator::is_lightbox_open, |nav, _| {
        nav.next_image(UrlSync::Write);
        Ok(())
    });

    table.register_fn(CommandId::NAV_PREV_IMAGE, Navigator::is_lightbox_open, |nav, _| {
        nav.prev_image(UrlSync::Write);
        Ok(())
    });

    table.register_fn(CommandId::NAV_POP_STATE, |_| true, |nav, cmd| {
        nav.on_pop_state(cmd.string_param()?);
        Ok(())
    });

    table
}
