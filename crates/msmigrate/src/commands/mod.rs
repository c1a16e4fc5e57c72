//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod display;
pub mod migrate;
pub mod tag;
pub mod util;

use msmigrate_api::DashboardClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    client: &DashboardClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Display(args) => display::handle(client, args, global).await,
        Command::Migrate(args) => migrate::handle(client, args, global).await,
        Command::Tag(args) => tag::handle(client, &args, global).await,
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
