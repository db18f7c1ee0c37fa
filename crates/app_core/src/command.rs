//! Command system for user actions

use crate::AppError;
use std::collections::HashMap;

/// Command identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandId(pub String);

impl CommandId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // View transitions
    pub const NAV_HOME: &'static str = "nav.home";
    pub const NAV_OPEN_CATEGORY: &'static str = "nav.open_category";
    pub const NAV_OPEN_IMAGE: &'static str = "nav.open_image";

    // Lightbox
    pub const NAV_SELECT_IMAGE: &'static str = "nav.select_image";
    pub const NAV_CLOSE_LIGHTBOX: &'static str = "nav.close_lightbox";
    pub const NAV_NEXT_IMAGE: &'static str = "nav.next_image";
    pub const NAV_PREV_IMAGE: &'static str = "nav.prev_image";

    // History
    pub const NAV_POP_STATE: &'static str = "nav.pop_state";
}

/// Command with optional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub id: CommandId,
    pub params: CommandParams,
}

/// Command parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandParams {
    pub int_value: Option<i64>,
    pub string_value: Option<String>,
}

impl Command {
    pub fn new(id: &str) -> Self {
        Self {
            id: CommandId::new(id),
            params: CommandParams::default(),
        }
    }

    pub fn with_int(mut self, value: i64) -> Self {
        self.params.int_value = Some(value);
        self
    }

    pub fn with_string(mut self, value: &str) -> Self {
        self.params.string_value = Some(value.to_string());
        self
    }

    /// String parameter, required
    pub fn string_param(&self) -> Result<&str, AppError> {
        self.params
            .string_value
            .as_deref()
            .ok_or_else(|| self.invalid("missing string parameter"))
    }

    /// Non-negative integer parameter, required
    pub fn index_param(&self) -> Result<usize, AppError> {
        let value = self
            .params
            .int_value
            .ok_or_else(|| self.invalid("missing index parameter"))?;
        usize::try_from(value).map_err(|_| self.invalid("negative index"))
    }

    fn invalid(&self, reason: &str) -> AppError {
        AppError::InvalidCommand {
            command: self.id.as_str().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Command handler trait
pub trait CommandHandler<T> {
    fn execute(&self, target: &mut T, cmd: &Command) -> Result<(), AppError>;
    fn can_execute(&self, target: &T, cmd: &Command) -> bool;
}

/// Handler built from a guard and an action
pub struct FnHandler<T> {
    guard: fn(&T) -> bool,
    run: fn(&mut T, &Command) -> Result<(), AppError>,
}

impl<T> FnHandler<T> {
    pub fn new(guard: fn(&T) -> bool, run: fn(&mut T, &Command) -> Result<(), AppError>) -> Self {
        Self { guard, run }
    }
}

impl<T> CommandHandler<T> for FnHandler<T> {
    fn execute(&self, target: &mut T, cmd: &Command) -> Result<(), AppError> {
        (self.run)(target, cmd)
    }

    fn can_execute(&self, target: &T, _cmd: &Command) -> bool {
        (self.guard)(target)
    }
}

/// Outcome of a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Executed,
    /// The handler's guard refused the command in the current state
    Rejected,
    Unknown,
}

/// Command dispatcher: the explicit table from command ids to handlers
pub struct CommandDispatcher<T> {
    handlers: HashMap<String, Box<dyn CommandHandler<T>>>,
}

impl<T> CommandDispatcher<T> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<H: CommandHandler<T> + 'static>(&mut self, command_id: &str, handler: H) {
        self.handlers.insert(command_id.to_string(), Box::new(handler));
    }

    pub fn register_fn(
        &mut self,
        command_id: &str,
        guard: fn(&T) -> bool,
        run: fn(&mut T, &Command) -> Result<(), AppError>,
    ) where
        T: 'static,
    {
        self.register(command_id, FnHandler::new(guard, run));
    }

    pub fn dispatch(&self, target: &mut T, cmd: &Command) -> Result<Dispatch, AppError> {
        if let Some(handler) = self.handlers.get(cmd.id.as_str()) {
            if handler.can_execute(target, cmd) {
                handler.execute(target, cmd)?;
                Ok(Dispatch::Executed)
            } else {
                tracing::debug!("Command {} cannot be executed in current context", cmd.id.as_str());
                Ok(Dispatch::Rejected)
            }
        } else {
            tracing::warn!("Unknown command: {}", cmd.id.as_str());
            Ok(Dispatch::Unknown)
        }
    }

    pub fn can_execute(&self, target: &T, cmd: &Command) -> bool {
        self.handlers
            .get(cmd.id.as_str())
            .map(|h| h.can_execute(target, cmd))
            .unwrap_or(false)
    }
}

impl<T> Default for CommandDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        value: i64,
        locked: bool,
    }

    fn table() -> CommandDispatcher<Counter> {
        let mut table: CommandDispatcher<Counter> = CommandDispatcher::new();
        table.register_fn("count.add", |c: &Counter| !c.locked, |c: &mut Counter, cmd: &Command| {
            c.value += cmd.params.int_value.unwrap_or(1);
            Ok(())
        });
        table.register_fn("count.set", |_: &Counter| true, |c: &mut Counter, cmd: &Command| {
            c.value = cmd.index_param()? as i64;
            Ok(())
        });
        table
    }

    #[test]
    fn test_dispatch_runs_handler() {
        let table = table();
        let mut counter = Counter::default();

        let outcome = table.dispatch(&mut counter, &Command::new("count.add").with_int(3)).unwrap();
        assert_eq!(outcome, Dispatch::Executed);
        assert_eq!(counter.value, 3);
    }

    #[test]
    fn test_guard_rejects() {
        let table = table();
        let mut counter = Counter { value: 0, locked: true };

        let cmd = Command::new("count.add");
        assert!(!table.can_execute(&counter, &cmd));
        assert_eq!(table.dispatch(&mut counter, &cmd).unwrap(), Dispatch::Rejected);
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn test_unknown_and_invalid() {
        let table = table();
        let mut counter = Counter::default();

        assert_eq!(table.dispatch(&mut counter, &Command::new("count.mul")).unwrap(), Dispatch::Unknown);

        let err = table
            .dispatch(&mut counter, &Command::new("count.set").with_int(-2))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCommand { .. }));
    }
}
