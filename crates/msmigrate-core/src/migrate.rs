// ── Migration ──
//
// Two phases: `plan_migration` performs every read and returns the pending
// changes; `execute_plan` performs the writes in order and stops at the
// first failure. Nothing is rolled back.

use tracing::{error, info, warn};

use msmigrate_api::{DashboardClient, Organization};

use crate::error::CoreError;
use crate::plan::{MigrationPlan, MigrationRequest, Step, build_plan};
use crate::snapshot::fetch_switch;

/// Where a step is in its lifecycle when the progress callback fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Started,
    Succeeded,
}

/// Progress notification for one write.
#[derive(Debug, Clone, Copy)]
pub struct StepEvent<'a> {
    pub step: &'a Step,
    /// Zero-based position of the step.
    pub index: usize,
    pub total: usize,
    pub status: StepStatus,
}

/// What a successful execution did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    pub completed: Vec<Step>,
    pub skipped_ports: Vec<String>,
}

/// Perform all reads for a migration and compute the plan.
///
/// Fetches both switches, resolves the organization when the clone path
/// applies, and checks the target's guards. Issues no writes.
pub async fn plan_migration(
    client: &DashboardClient,
    request: &MigrationRequest,
) -> Result<MigrationPlan, CoreError> {
    request.validate()?;

    let source = fetch_switch(client, &request.source).await?;
    let target = fetch_switch(client, &request.target).await?;

    let mut warnings = Vec::new();
    let same_model = source.device.model.is_some() && source.device.model == target.device.model;

    let organization = match request.organization.as_deref() {
        Some(wanted) if same_model => Some(resolve_organization(client, wanted).await?),
        Some(_) => {
            let note = format!(
                "models differ ({} -> {}); organization ignored, copying field by field",
                source.device.model.as_deref().unwrap_or("unknown"),
                target.device.model.as_deref().unwrap_or("unknown"),
            );
            info!("{note}");
            warnings.push(note);
            None
        }
        None => None,
    };

    let mut plan = build_plan(source, target, organization)?;

    if !plan.guards.is_empty() {
        let reason = plan
            .guards
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" and ");
        if request.strict {
            return Err(CoreError::TargetInUse {
                serial: request.target.to_string(),
                reason,
            });
        }
        warnings.push(format!("target {} may be in use: {reason}", request.target));
    }

    for port_id in &plan.ports.skipped {
        warn!(port_id = %port_id, target = %request.target, "source port has no counterpart on target, skipping");
    }

    plan.warnings.extend(warnings);
    Ok(plan)
}

/// Resolve an organization given by id or, failing that, by unique name.
pub async fn resolve_organization(
    client: &DashboardClient,
    wanted: &str,
) -> Result<Organization, CoreError> {
    match client.get_organization(wanted).await {
        Ok(org) => return Ok(org),
        Err(err) if err.is_not_found() => {}
        Err(err) => return Err(err.into()),
    }

    let orgs = client.list_organizations().await?;
    let matches: Vec<&Organization> = orgs
        .iter()
        .filter(|o| o.id == wanted || o.name.eq_ignore_ascii_case(wanted))
        .collect();

    match matches.as_slice() {
        [org] => Ok((*org).clone()),
        [] => Err(CoreError::NotFound {
            entity_type: "organization".into(),
            identifier: wanted.into(),
        }),
        _ => Err(CoreError::ValidationFailed {
            message: format!("organization name '{wanted}' is ambiguous; pass its id instead"),
        }),
    }
}

/// Perform the plan's writes in order, reporting progress through `on_step`.
///
/// The first failing write aborts the sequence; earlier writes stay applied.
pub async fn execute_plan(
    client: &DashboardClient,
    plan: &MigrationPlan,
    mut on_step: impl FnMut(StepEvent<'_>),
) -> Result<MigrationReport, CoreError> {
    let steps = plan.steps();
    let total = steps.len();
    let mut report = MigrationReport {
        completed: Vec::with_capacity(total),
        skipped_ports: plan.ports.skipped.clone(),
    };

    for (index, step) in steps.iter().enumerate() {
        on_step(StepEvent {
            step,
            index,
            total,
            status: StepStatus::Started,
        });

        let result = match step {
            Step::Clone {
                organization_id,
                source,
                target,
            } => client
                .clone_switch_devices(organization_id, source, &[target.as_str()])
                .await
                .map(drop),
            Step::UpdatePort {
                serial,
                port_id,
                attributes,
            } => client
                .update_switch_port(serial, port_id, attributes)
                .await
                .map(drop),
            Step::UpdateDevice { serial, update } => {
                client.update_device(serial, update).await.map(drop)
            }
        };

        if let Err(err) = result {
            error!(%step, completed = index, total, error = %err, "write failed, aborting");
            return Err(CoreError::StepFailed {
                step: step.to_string(),
                completed: index,
                total,
                status: err.status(),
                message: err.to_string(),
            });
        }

        info!(%step, "done");
        on_step(StepEvent {
            step,
            index,
            total,
            status: StepStatus::Succeeded,
        });
        report.completed.push(step.clone());
    }

    Ok(report)
}
