//! Input handling: renderer-reported events to commands

use crate::command::{Command, CommandId};
use std::collections::HashMap;

/// Discrete input the rendering collaborator reports
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Category card clicked
    CategoryClicked { category_id: String },
    /// Gallery item clicked, by position in the shown selection
    ImageClicked { index: usize },
    /// Lightbox thumbnail strip item clicked
    ThumbnailClicked { index: usize },
    /// Key pressed, named like `KeyboardEvent.key`
    Key { key: String },
    TouchStart { x: f32 },
    TouchEnd { x: f32 },
    /// Click inside the lightbox overlay
    LightboxClicked { on_content: bool },
    /// Close or back button of the lightbox
    CloseRequested,
    NextClicked,
    PrevClicked,
    /// "Back to categories"
    HomeRequested,
    /// Browser moved through history
    PopState { url: String },
}

/// Horizontal swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved left: next image
    Left,
    /// Finger moved right: previous image
    Right,
}

/// Classifies a touch start/end pair by horizontal displacement only
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    start_x: Option<f32>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Finish a gesture; `None` below the threshold or without a start
    pub fn end(&mut self, x: f32) -> Option<SwipeDirection> {
        let start = self.start_x.take()?;
        let diff = start - x;

        if diff.abs() > self.threshold {
            Some(if diff > 0.0 {
                SwipeDirection::Left
            } else {
                SwipeDirection::Right
            })
        } else {
            None
        }
    }
}

/// Input handler that maps events to commands
pub struct InputHandler {
    /// Key bindings: key string -> command ID
    bindings: HashMap<String, String>,

    swipe: SwipeTracker,
}

impl InputHandler {
    /// Create a new input handler with bindings (command -> keys)
    pub fn new(bindings: &HashMap<String, Vec<String>>, swipe_threshold: f32) -> Self {
        // Invert the bindings map: command -> keys becomes key -> command
        let mut key_to_command = HashMap::new();

        for (command, keys) in bindings {
            for key in keys {
                key_to_command.insert(key.to_lowercase(), command.clone());
            }
        }

        Self {
            bindings: key_to_command,
            swipe: SwipeTracker::new(swipe_threshold),
        }
    }

    /// Translate an event into the command it triggers
    pub fn translate(&mut self, event: InputEvent) -> Option<Command> {
        match event {
            InputEvent::CategoryClicked { category_id } => {
                Some(Command::new(CommandId::NAV_OPEN_CATEGORY).with_string(&category_id))
            }
            InputEvent::ImageClicked { index } => {
                Some(Command::new(CommandId::NAV_OPEN_IMAGE).with_int(index as i64))
            }
            InputEvent::ThumbnailClicked { index } => {
                Some(Command::new(CommandId::NAV_SELECT_IMAGE).with_int(index as i64))
            }
            InputEvent::Key { key } => self.handle_key(&key),
            InputEvent::TouchStart { x } => {
                self.swipe.begin(x);
                None
            }
            InputEvent::TouchEnd { x } => self.swipe.end(x).map(|direction| match direction {
                SwipeDirection::Left => Command::new(CommandId::NAV_NEXT_IMAGE),
                SwipeDirection::Right => Command::new(CommandId::NAV_PREV_IMAGE),
            }),
            InputEvent::LightboxClicked { on_content: false } | InputEvent::CloseRequested => {
                Some(Command::new(CommandId::NAV_CLOSE_LIGHTBOX))
            }
            InputEvent::LightboxClicked { on_content: true } => None,
            InputEvent::NextClicked => Some(Command::new(CommandId::NAV_NEXT_IMAGE)),
            InputEvent::PrevClicked => Some(Command::new(CommandId::NAV_PREV_IMAGE)),
            InputEvent::HomeRequested => Some(Command::new(CommandId::NAV_HOME)),
            InputEvent::PopState { url } => {
                Some(Command::new(CommandId::NAV_POP_STATE).with_string(&url))
            }
        }
    }

    fn handle_key(&self, key: &str) -> Option<Command> {
        tracing::debug!("Key pressed: {}", key);

        self.bindings
            .get(&key.to_lowercase())
            .map(|cmd_id| Command::new(cmd_id))
    }
}
