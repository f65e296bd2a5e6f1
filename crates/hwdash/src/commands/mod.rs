//! Command dispatch: bridges CLI args -> backend calls -> output formatting.

pub mod config_cmd;
pub mod groups;
pub mod metrics;
pub mod nodes;
pub mod resources;
pub mod switches;
pub mod util;

use hwdash_core::Backend;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    backend: &Backend,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Nodes(args) => nodes::handle(backend, args, global).await,
        Command::Switches(args) => switches::handle(backend, args, global).await,
        Command::Resources(args) => resources::handle(backend, args, global).await,
        Command::Groups(args) => groups::handle(backend, args, global).await,
        Command::Metrics(args) => metrics::handle(backend, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
