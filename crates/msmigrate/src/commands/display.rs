//! `display` command handler.

use tabled::Tabled;

use msmigrate_api::{DashboardClient, Device, SwitchPort};
use msmigrate_core::{SwitchSnapshot, fetch_switch};

use crate::cli::{DisplayArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    port_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Type")]
    port_type: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Voice")]
    voice_vlan: String,
    #[tabled(rename = "Allowed VLANs")]
    allowed_vlans: String,
    #[tabled(rename = "PoE")]
    poe: String,
}

impl From<&SwitchPort> for PortRow {
    fn from(p: &SwitchPort) -> Self {
        Self {
            port_id: p.port_id.clone(),
            name: util::cell(p.get("name")),
            enabled: util::cell(p.get("enabled")),
            port_type: util::cell(p.get("type")),
            vlan: util::cell(p.get("vlan")),
            voice_vlan: util::cell(p.get("voiceVlan")),
            allowed_vlans: util::cell(p.get("allowedVlans")),
            poe: util::cell(p.get("poeEnabled")),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

/// Key/value view of a device record.
pub fn device_detail(d: &Device) -> String {
    let dash = |v: Option<&str>| v.unwrap_or("-").to_owned();
    let mut pairs = vec![
        ("Serial", d.serial.clone()),
        ("Name", dash(d.name.as_deref())),
        ("Model", dash(d.model.as_deref())),
        ("MAC", dash(d.mac.as_deref())),
        ("LAN IP", dash(d.lan_ip.as_deref())),
        ("Firmware", dash(d.firmware.as_deref())),
        ("Network", dash(d.network_id.as_deref())),
        (
            "Tags",
            if d.tags.is_empty() {
                "-".into()
            } else {
                d.tags.join(", ")
            },
        ),
        ("Address", dash(d.address.as_deref())),
        ("Notes", dash(d.notes.as_deref())),
    ];
    if let (Some(lat), Some(lng)) = (d.lat, d.lng) {
        pairs.push(("Location", format!("{lat}, {lng}")));
    }
    if let Some(floor_plan) = d.floor_plan_id.as_deref() {
        pairs.push(("Floor plan", floor_plan.to_owned()));
    }

    let mut pairs: Vec<(String, String)> = pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();
    pairs.extend(
        d.extra
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), util::cell(Some(v)))),
    );
    output::key_values(&pairs)
}

/// Key/value view of every non-null attribute of a port.
fn port_detail(port: &SwitchPort) -> String {
    let pairs: Vec<(&str, String)> = port
        .attributes
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.as_str(), util::cell(Some(v))))
        .collect();
    if pairs.is_empty() {
        "(no attributes)".into()
    } else {
        output::key_values(&pairs)
    }
}

fn switch_detail(snapshot: &SwitchSnapshot, painter: Painter) -> String {
    let mut out = vec![
        painter.heading("Device"),
        device_detail(&snapshot.device),
        String::new(),
        painter.heading(&format!("Ports ({})", snapshot.ports.len())),
    ];
    if snapshot.ports.is_empty() {
        out.push(painter.dim("(no ports)"));
        return out.join("\n");
    }

    let rows: Vec<PortRow> = snapshot.ports.iter().map(PortRow::from).collect();
    out.push(output::render_table(&rows));
    for port in &snapshot.ports {
        out.push(String::new());
        out.push(painter.heading(&format!("Port {}", port.port_id)));
        out.push(port_detail(port));
    }
    out.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &DashboardClient,
    args: DisplayArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let serial = util::parse_serial(&args.serial, "DEVICE_SERIAL")?;
    let snapshot = fetch_switch(client, &serial).await?;

    let painter = Painter::stdout(global.color);
    let out = output::render_single(args.format, &snapshot, |s| switch_detail(s, painter))?;
    output::print_output(&out, false);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::cli::ColorMode;

    #[test]
    fn device_detail_shows_dash_for_missing_values() {
        let device: Device = serde_json::from_value(json!({
            "serial": "Q2AA-AAAA-AAAA",
            "name": "idf-2",
            "tags": ["voice", "undeployed"]
        }))
        .unwrap();

        let text = device_detail(&device);
        assert!(text.contains("Serial:   Q2AA-AAAA-AAAA"), "{text}");
        assert!(text.contains("Model:    -"), "{text}");
        assert!(text.contains("Tags:     voice, undeployed"), "{text}");
        assert!(!text.contains("Location"), "{text}");
    }

    #[test]
    fn device_detail_lists_extra_attributes() {
        let device: Device = serde_json::from_value(json!({
            "serial": "Q2AA-AAAA-AAAA",
            "url": "https://n1.meraki.com/idf-2",
            "beaconIdParams": {"major": 7},
            "details": null
        }))
        .unwrap();

        let text = device_detail(&device);
        assert!(text.contains("https://n1.meraki.com/idf-2"), "{text}");
        assert!(text.contains(r#"{"major":7}"#), "{text}");
        assert!(!text.contains("details"), "{text}");
    }

    #[test]
    fn switch_detail_lists_every_port_attribute() {
        let snapshot = SwitchSnapshot {
            device: serde_json::from_value(json!({"serial": "Q2AA-AAAA-AAAA"})).unwrap(),
            ports: serde_json::from_value(json!([
                {
                    "portId": "1",
                    "name": "desk",
                    "stpGuard": "bpdu guard",
                    "stormControlEnabled": true,
                    "accessPolicyType": "Open",
                    "linkNegotiation": null
                },
                {"portId": "2"}
            ]))
            .unwrap(),
        };

        let text = switch_detail(&snapshot, Painter::stdout(ColorMode::Never));
        assert!(text.contains("Port 1"), "{text}");
        assert!(text.contains("stpGuard:"), "{text}");
        assert!(text.contains("bpdu guard"), "{text}");
        assert!(text.contains("stormControlEnabled: true"), "{text}");
        assert!(text.contains("accessPolicyType:"), "{text}");
        assert!(!text.contains("linkNegotiation"), "{text}");
        assert!(text.contains("Port 2\n(no attributes)"), "{text}");
    }
}
