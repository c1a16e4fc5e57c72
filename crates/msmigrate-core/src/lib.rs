//! Switch migration logic between `msmigrate-api` and the CLI.
//!
//! - **[`fetch_switch`]** reads a device record plus its ports.
//! - **[`plan_migration`]** performs every read a migration needs and returns
//!   a [`MigrationPlan`]: device attributes to copy, the merged tag set, the
//!   port pairing, and the chosen [`Strategy`].
//! - **[`execute_plan`]** performs the plan's writes in order, stopping at the
//!   first failure.
//! - **[`tag_undeployed`]** marks a switch as safe to overwrite.

pub mod error;
pub mod migrate;
pub mod plan;
pub mod ports;
pub mod serial;
pub mod snapshot;
pub mod tagging;
pub mod tags;

pub use error::CoreError;
pub use migrate::{
    MigrationReport, StepEvent, StepStatus, execute_plan, plan_migration, resolve_organization,
};
pub use plan::{
    AttributeChange, Guard, MigrationPlan, MigrationRequest, Step, Strategy, build_plan,
    check_guards,
};
pub use ports::{PortCopy, PortMatch, match_ports};
pub use serial::Serial;
pub use snapshot::{SwitchSnapshot, fetch_switch};
pub use tagging::{TagOutcome, tag_undeployed};
pub use tags::{UNDEPLOYED_TAG, merge_tags, migration_marker};
