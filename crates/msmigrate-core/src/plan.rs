// ── Migration plan ──
//
// Everything `migrate` will write, computed from reads alone. Building a
// plan never touches the service; executing one is the only write path.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use msmigrate_api::{Device, DeviceUpdate, Organization};

use crate::error::CoreError;
use crate::ports::{PortMatch, match_ports};
use crate::serial::Serial;
use crate::snapshot::SwitchSnapshot;
use crate::tags::{UNDEPLOYED_TAG, merge_tags, migration_marker};

/// What the user asked `migrate` to do.
#[derive(Debug, Clone)]
pub struct MigrationRequest {
    pub source: Serial,
    pub target: Serial,
    /// Organization id or name; enables the clone path for same-model pairs.
    pub organization: Option<String>,
    /// Refuse targets that look deployed instead of only warning.
    pub strict: bool,
}

impl MigrationRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.source == self.target {
            return Err(CoreError::ValidationFailed {
                message: format!("source and target are the same switch ({})", self.source),
            });
        }
        Ok(())
    }
}

/// How port configuration reaches the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// One port update per matched port.
    FieldByField,
    /// The service's same-model bulk clone.
    Clone { organization: Organization },
}

/// A device-level attribute whose value will change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChange {
    pub name: &'static str,
    pub from: Option<String>,
    pub to: String,
}

/// Reasons a target may already be in service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Guard {
    NameIsMac,
    MissingUndeployedTag,
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameIsMac => f.write_str("its name equals its MAC address"),
            Self::MissingUndeployedTag => {
                write!(f, "it does not carry the '{UNDEPLOYED_TAG}' tag")
            }
        }
    }
}

/// Check a target device against the "safe to overwrite" conventions.
pub fn check_guards(target: &Device) -> Vec<Guard> {
    let mut violations = Vec::new();
    if target.name.is_some() && target.name == target.mac {
        violations.push(Guard::NameIsMac);
    }
    if !target.has_tag(UNDEPLOYED_TAG) {
        violations.push(Guard::MissingUndeployedTag);
    }
    violations
}

/// A single write, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Clone {
        organization_id: String,
        source: String,
        target: String,
    },
    UpdatePort {
        serial: String,
        port_id: String,
        attributes: Map<String, Value>,
    },
    UpdateDevice {
        serial: String,
        update: DeviceUpdate,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clone {
                organization_id,
                source,
                target,
            } => write!(
                f,
                "clone {source} onto {target} (organization {organization_id})"
            ),
            Self::UpdatePort {
                serial, port_id, ..
            } => write!(f, "update port {port_id} on {serial}"),
            Self::UpdateDevice { serial, .. } => write!(f, "update device {serial}"),
        }
    }
}

/// The full set of pending changes for one migration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationPlan {
    pub source: SwitchSnapshot,
    pub target: SwitchSnapshot,
    pub strategy: Strategy,
    pub device_update: DeviceUpdate,
    pub device_changes: Vec<AttributeChange>,
    pub tags: Vec<String>,
    pub ports: PortMatch,
    pub guards: Vec<Guard>,
    pub warnings: Vec<String>,
}

impl MigrationPlan {
    /// The writes this plan performs, in order: clone, ports, device.
    pub fn steps(&self) -> Vec<Step> {
        let target = self.target.device.serial.clone();
        let mut steps = Vec::new();

        match &self.strategy {
            Strategy::Clone { organization } => steps.push(Step::Clone {
                organization_id: organization.id.clone(),
                source: self.source.device.serial.clone(),
                target: target.clone(),
            }),
            Strategy::FieldByField => {
                steps.extend(self.ports.copies.iter().map(|copy| Step::UpdatePort {
                    serial: target.clone(),
                    port_id: copy.port_id.clone(),
                    attributes: copy.attributes.clone(),
                }));
            }
        }

        if !self.device_update.is_empty() {
            steps.push(Step::UpdateDevice {
                serial: target,
                update: self.device_update.clone(),
            });
        }
        steps
    }
}

fn display_f64(v: Option<f64>) -> Option<String> {
    v.map(|v| v.to_string())
}

/// Assemble a plan from two snapshots. Pure: no I/O.
///
/// `organization` is the already-resolved organization when the caller asked
/// for the clone path and the models match; `None` otherwise.
pub fn build_plan(
    source: SwitchSnapshot,
    target: SwitchSnapshot,
    organization: Option<Organization>,
) -> Result<MigrationPlan, CoreError> {
    let strategy = organization.map_or(Strategy::FieldByField, |organization| {
        Strategy::Clone { organization }
    });

    if strategy == Strategy::FieldByField && source.ports.is_empty() {
        return Err(CoreError::NoPorts {
            serial: source.device.serial.clone(),
        });
    }

    let src = &source.device;
    let dst = &target.device;

    let mut update = DeviceUpdate::default();
    let mut changes = Vec::new();

    let text_attrs: [(&'static str, &Option<String>, &Option<String>, &mut Option<String>); 3] = [
        ("name", &src.name, &dst.name, &mut update.name),
        ("address", &src.address, &dst.address, &mut update.address),
        ("notes", &src.notes, &dst.notes, &mut update.notes),
    ];
    for (name, from_src, on_dst, slot) in text_attrs {
        if let Some(value) = from_src {
            *slot = Some(value.clone());
            if on_dst.as_ref() != Some(value) {
                changes.push(AttributeChange {
                    name,
                    from: on_dst.clone(),
                    to: value.clone(),
                });
            }
        }
    }

    let coord_attrs: [(&'static str, Option<f64>, Option<f64>, &mut Option<f64>); 2] = [
        ("lat", src.lat, dst.lat, &mut update.lat),
        ("lng", src.lng, dst.lng, &mut update.lng),
    ];
    for (name, from_src, on_dst, slot) in coord_attrs {
        if let Some(value) = from_src {
            *slot = Some(value);
            #[allow(clippy::float_cmp)]
            let same = on_dst == Some(value);
            if !same {
                changes.push(AttributeChange {
                    name,
                    from: display_f64(on_dst),
                    to: value.to_string(),
                });
            }
        }
    }

    let marker = [migration_marker(&src.serial)];
    let tags = merge_tags([&dst.tags[..], &src.tags[..], &marker[..]]);
    if tags != dst.tags {
        update.tags = Some(tags.clone());
        changes.push(AttributeChange {
            name: "tags",
            from: Some(dst.tags.join(", ")),
            to: tags.join(", "),
        });
    }

    let ports = match_ports(&source.ports, &target.ports);
    let guards = check_guards(dst);

    Ok(MigrationPlan {
        source,
        target,
        strategy,
        device_update: update,
        device_changes: changes,
        tags,
        ports,
        guards,
        warnings: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn snapshot(device: Value, ports: Value) -> SwitchSnapshot {
        SwitchSnapshot {
            device: serde_json::from_value(device).unwrap(),
            ports: serde_json::from_value(ports).unwrap(),
        }
    }

    fn source() -> SwitchSnapshot {
        snapshot(
            json!({
                "serial": "Q2AA-AAAA-AAAA",
                "name": "idf-2",
                "model": "MS120-24",
                "mac": "00:18:0a:00:00:01",
                "tags": ["voice"],
                "address": "1 Main St",
                "notes": "rack 4",
                "lat": 37.5,
                "lng": -122.1
            }),
            json!([{"portId": "1", "vlan": 10}, {"portId": "2", "vlan": 20}]),
        )
    }

    fn target() -> SwitchSnapshot {
        snapshot(
            json!({
                "serial": "Q2BB-BBBB-BBBB",
                "name": "00:18:0a:00:00:02",
                "model": "MS120-24",
                "mac": "00:18:0a:00:00:02",
                "tags": ["undeployed"]
            }),
            json!([{"portId": "1", "vlan": 1}, {"portId": "2", "vlan": 1}]),
        )
    }

    #[test]
    fn field_by_field_plan_copies_attributes_and_merges_tags() {
        let plan = build_plan(source(), target(), None).unwrap();

        assert_eq!(plan.strategy, Strategy::FieldByField);
        assert_eq!(plan.device_update.name.as_deref(), Some("idf-2"));
        assert_eq!(plan.device_update.address.as_deref(), Some("1 Main St"));
        assert_eq!(plan.device_update.notes.as_deref(), Some("rack 4"));
        assert_eq!(plan.device_update.lat, Some(37.5));
        assert_eq!(
            plan.tags,
            vec!["undeployed", "voice", "migrated-from-Q2AA-AAAA-AAAA"]
        );
        assert_eq!(plan.guards, vec![Guard::NameIsMac]);

        let steps: Vec<String> = plan.steps().iter().map(ToString::to_string).collect();
        assert_eq!(
            steps,
            vec![
                "update port 1 on Q2BB-BBBB-BBBB",
                "update port 2 on Q2BB-BBBB-BBBB",
                "update device Q2BB-BBBB-BBBB",
            ]
        );
    }

    #[test]
    fn clone_plan_replaces_port_writes() {
        let org = Organization {
            id: "123".into(),
            name: "Acme".into(),
            url: None,
        };
        let plan = build_plan(source(), target(), Some(org)).unwrap();

        let steps = plan.steps();
        assert_eq!(steps.len(), 2);
        assert!(matches!(steps[0], Step::Clone { ref organization_id, .. } if organization_id == "123"));
        assert!(matches!(steps[1], Step::UpdateDevice { .. }));
    }

    #[test]
    fn empty_source_port_list_is_rejected() {
        let mut src = source();
        src.ports.clear();
        let err = build_plan(src, target(), None).unwrap_err();
        assert!(matches!(err, CoreError::NoPorts { .. }));
    }

    #[test]
    fn same_serial_request_is_invalid() {
        let serial: Serial = "Q2AA-AAAA-AAAA".parse().unwrap();
        let request = MigrationRequest {
            source: serial.clone(),
            target: serial,
            organization: None,
            strict: false,
        };
        assert!(request.validate().is_err());
    }
}
