pub mod command;
pub mod dispatch;
pub mod port;
pub mod protocol;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{Action, ActionKind, CommandDescriptor, ControlType, ParamSpec};
pub use dispatch::{CancelToken, DispatchConfig, Dispatcher, Outcome, SkipReason};
pub use table::CommandTable;
