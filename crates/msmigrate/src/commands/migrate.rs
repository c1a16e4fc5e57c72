//! `migrate` command handler: plan, confirm, execute with progress.

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use msmigrate_api::DashboardClient;
use msmigrate_core::{
    MigrationPlan, MigrationRequest, StepStatus, Strategy, SwitchSnapshot, execute_plan,
    plan_migration,
};

use crate::cli::{GlobalOpts, MigrateArgs};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AttributeRow {
    #[tabled(rename = "Attribute")]
    name: String,
    #[tabled(rename = "Current")]
    from: String,
    #[tabled(rename = "New")]
    to: String,
}

#[derive(Tabled)]
struct PortChangeRow {
    #[tabled(rename = "Port")]
    port_id: String,
    #[tabled(rename = "Changed attributes")]
    changed: String,
}

// ── Plan summary ────────────────────────────────────────────────────

fn describe_switch(side: &SwitchSnapshot) -> String {
    let d = &side.device;
    match (&d.name, &d.model) {
        (Some(name), Some(model)) => format!("{} ({name}, {model})", d.serial),
        (None, Some(model)) => format!("{} ({model})", d.serial),
        (Some(name), None) => format!("{} ({name})", d.serial),
        (None, None) => d.serial.clone(),
    }
}

fn summary(plan: &MigrationPlan, painter: Painter) -> String {
    let mut out = vec![
        painter.heading("Migration plan"),
        output::key_values(&[
            ("Source", describe_switch(&plan.source)),
            ("Target", describe_switch(&plan.target)),
            (
                "Strategy",
                match &plan.strategy {
                    Strategy::FieldByField => "field by field".into(),
                    Strategy::Clone { organization } => format!(
                        "clone via organization {} ({})",
                        organization.name, organization.id
                    ),
                },
            ),
            ("Tags", plan.tags.join(", ")),
        ]),
        String::new(),
    ];

    out.push(painter.heading("Device attributes"));
    if plan.device_changes.is_empty() {
        out.push(painter.dim("(no changes)"));
    } else {
        let rows: Vec<AttributeRow> = plan
            .device_changes
            .iter()
            .map(|c| AttributeRow {
                name: c.name.to_owned(),
                from: c.from.clone().unwrap_or_else(|| "-".into()),
                to: c.to.clone(),
            })
            .collect();
        out.push(output::render_table(&rows));
    }
    out.push(String::new());

    match &plan.strategy {
        Strategy::Clone { .. } => {
            out.push(painter.heading(&format!(
                "Ports ({} copied by the clone operation)",
                plan.source.ports.len()
            )));
            out.push(painter.dim(
                "Device attributes and tags above are still written after the clone.",
            ));
        }
        Strategy::FieldByField => {
            out.push(painter.heading(&format!(
                "Ports ({} to write, {} with changes)",
                plan.ports.copies.len(),
                plan.ports.changed_count()
            )));
            let rows: Vec<PortChangeRow> = plan
                .ports
                .copies
                .iter()
                .map(|c| PortChangeRow {
                    port_id: c.port_id.clone(),
                    changed: if c.changed.is_empty() {
                        "(unchanged)".into()
                    } else {
                        c.changed.join(", ")
                    },
                })
                .collect();
            if !rows.is_empty() {
                out.push(output::render_table(&rows));
            }
        }
    }

    if !plan.ports.skipped.is_empty() {
        out.push(painter.warn(&format!(
            "Skipped source ports (not on target): {}",
            plan.ports.skipped.join(", ")
        )));
    }
    for warning in &plan.warnings {
        out.push(painter.warn(&format!("warning: {warning}")));
    }

    out.join("\n")
}

// ── Progress ────────────────────────────────────────────────────────

fn progress_bar(total: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(u64::try_from(total).unwrap_or(u64::MAX));
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &DashboardClient,
    args: MigrateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let yes = args.yes;
    run_migration(client, args, global, |prompt| {
        util::confirm(prompt, "migrate", yes)
    })
    .await
}

/// Plan, summarize, ask `confirm`, then execute. A `false` answer ends the
/// run before any write.
async fn run_migration(
    client: &DashboardClient,
    args: MigrateArgs,
    global: &GlobalOpts,
    confirm: impl FnOnce(&str) -> Result<bool, CliError>,
) -> Result<(), CliError> {
    let request = MigrationRequest {
        source: util::parse_serial(&args.source, "SOURCE_SERIAL")?,
        target: util::parse_serial(&args.target, "TARGET_SERIAL")?,
        organization: args.org_id,
        strict: args.strict,
    };

    let plan = plan_migration(client, &request).await?;
    let total = plan.steps().len();

    if !(args.quiet && args.yes) {
        output::print_output(&summary(&plan, Painter::stdout(global.color)), false);
    }

    let prompt = format!(
        "Apply {total} write(s) to {}? Earlier writes are not rolled back if one fails",
        request.target
    );
    if !confirm(&prompt)? {
        return Err(CliError::Aborted);
    }

    let painter = Painter::stderr(global.color);
    let bar = progress_bar(total, args.quiet);
    let result = execute_plan(client, &plan, |event| match event.status {
        StepStatus::Started => bar.set_message(event.step.to_string()),
        StepStatus::Succeeded => {
            if !args.quiet {
                let line = format!(
                    "{} [{}/{}] {}",
                    painter.ok("✓"),
                    event.index + 1,
                    event.total,
                    event.step
                );
                if bar.is_hidden() {
                    eprintln!("{line}");
                } else {
                    bar.println(line);
                }
            }
            bar.inc(1);
        }
    })
    .await;
    bar.finish_and_clear();
    let report = result?;

    if !args.quiet {
        eprintln!(
            "{} Migrated {} -> {}: {} write(s), {} port(s) skipped",
            painter.ok("✓"),
            request.source,
            request.target,
            report.completed.len(),
            report.skipped_ports.len()
        );
    }
    Ok(())
}
