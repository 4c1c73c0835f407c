//! Command handlers, one module per command group.

pub mod auth;
pub mod config_cmd;
pub mod events;
pub mod sessions;
pub mod util;

use eventos_core::AppContext;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Route a command that talks to the API.
pub async fn dispatch(
    cmd: Command,
    ctx: &AppContext,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(ctx, args, resolved, global).await,
        Command::Logout => auth::logout(ctx, global),
        Command::Whoami => auth::whoami(ctx, global),
        Command::Register(args) => auth::register(ctx, args, global).await,
        Command::Events(args) => events::handle(ctx, args, global).await,
        Command::Sessions(args) => sessions::handle(ctx, args, global).await,
        // Handled before a context is built
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
