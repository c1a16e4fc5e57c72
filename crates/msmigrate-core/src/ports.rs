// ── Port matching ──
//
// Source port N maps onto target port N by `portId`. Ports that exist only
// on the source are skipped (never created); ports that exist only on the
// target are left alone.

use serde::Serialize;
use serde_json::{Map, Value};

use msmigrate_api::SwitchPort;

/// One pending port write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortCopy {
    pub port_id: String,
    /// Body of the update: the source port's writable attributes.
    pub attributes: Map<String, Value>,
    /// Attribute names whose value differs on the target today.
    pub changed: Vec<String>,
}

/// Result of lining up source ports against target ports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortMatch {
    /// Ports present on both switches, in source order.
    pub copies: Vec<PortCopy>,
    /// Source port ids with no counterpart on the target.
    pub skipped: Vec<String>,
    /// Target port ids with no counterpart on the source.
    pub untouched: Vec<String>,
}

impl PortMatch {
    /// Number of copies that would actually change something.
    pub fn changed_count(&self) -> usize {
        self.copies.iter().filter(|c| !c.changed.is_empty()).count()
    }
}

/// Pair up source and target ports by id.
pub fn match_ports(source: &[SwitchPort], target: &[SwitchPort]) -> PortMatch {
    let mut result = PortMatch::default();

    for port in source {
        let Some(existing) = target.iter().find(|t| t.port_id == port.port_id) else {
            result.skipped.push(port.port_id.clone());
            continue;
        };

        let attributes = port.writable_attributes();
        let changed = attributes
            .iter()
            .filter(|(name, value)| existing.get(name) != Some(*value))
            .map(|(name, _)| name.clone())
            .collect();

        result.copies.push(PortCopy {
            port_id: port.port_id.clone(),
            attributes,
            changed,
        });
    }

    result.untouched = target
        .iter()
        .filter(|t| !source.iter().any(|s| s.port_id == t.port_id))
        .map(|t| t.port_id.clone())
        .collect();

    result
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn port(value: Value) -> SwitchPort {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn extra_source_ports_are_skipped() {
        let source = vec![
            port(json!({"portId": "1", "vlan": 10})),
            port(json!({"portId": "2", "vlan": 20})),
            port(json!({"portId": "3", "vlan": 30})),
        ];
        let target = vec![
            port(json!({"portId": "1", "vlan": 1})),
            port(json!({"portId": "2", "vlan": 20})),
        ];

        let matched = match_ports(&source, &target);

        let ids: Vec<&str> = matched.copies.iter().map(|c| c.port_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(matched.skipped, vec!["3"]);
        assert!(matched.untouched.is_empty());
        assert_eq!(matched.copies[0].changed, vec!["vlan"]);
        assert!(matched.copies[1].changed.is_empty());
        assert_eq!(matched.changed_count(), 1);
    }

    #[test]
    fn extra_target_ports_are_untouched() {
        let source = vec![port(json!({"portId": "1", "type": "trunk"}))];
        let target = vec![
            port(json!({"portId": "1", "type": "access"})),
            port(json!({"portId": "9", "type": "access"})),
        ];

        let matched = match_ports(&source, &target);
        assert_eq!(matched.untouched, vec!["9"]);
        assert_eq!(matched.copies.len(), 1);
        assert_eq!(matched.copies[0].attributes.get("type"), Some(&json!("trunk")));
    }
}
