//! Command execution: registry, context, and the three execution modes

mod args;
mod context;
mod core_commands;
mod manager;
mod output;
mod registry;
mod state_view;

pub use args::CommandArgs;
pub use context::{CommandContext, ContextCan, ContextChain, ExecutionMode};
pub use core_commands::CoreCommands;
pub use manager::{Can, Chain, CommandInvoker, Commands};
pub use output::CommandOutput;
pub use registry::{step, BoxedStep, CommandEntry, CommandFactory, CommandRegistry, CommandSet};
pub use state_view::{ChainedState, StateRead, StateView};
