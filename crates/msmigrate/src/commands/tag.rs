//! `tag` command handler.

use msmigrate_api::DashboardClient;
use msmigrate_core::{TagOutcome, UNDEPLOYED_TAG, tag_undeployed};

use crate::cli::{GlobalOpts, TagArgs};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::{display, util};

pub async fn handle(
    client: &DashboardClient,
    args: &TagArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let serial = util::parse_serial(&args.serial, "DEVICE_SERIAL")?;
    let outcome = tag_undeployed(client, &serial).await?;

    let painter = Painter::stderr(global.color);
    match &outcome {
        TagOutcome::AlreadyTagged(_) => eprintln!(
            "{}",
            painter.dim(&format!(
                "{serial} already carries the '{UNDEPLOYED_TAG}' tag, nothing to write"
            ))
        ),
        TagOutcome::Tagged { .. } => eprintln!(
            "{} Tagged {serial} as '{UNDEPLOYED_TAG}'",
            painter.ok("✓")
        ),
    }

    output::print_output(&display::device_detail(outcome.device()), false);
    Ok(())
}
