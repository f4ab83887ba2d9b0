use crate::core::domain::{NormalizedRecord, RawNodeEntry, ServiceStatusEntry};

pub const DISK_SERVICE: &str = "DISK_USAGE";
pub const CPU_SERVICE: &str = "CPU_USAGE";
pub const MEMORY_SERVICE: &str = "MEMORY";

pub fn normalize_all(entries: &[RawNodeEntry]) -> Vec<NormalizedRecord> {
    entries.iter().map(normalize).collect()
}

/// Flattens one member. Never fails: anything missing becomes "".
pub fn normalize(entry: &RawNodeEntry) -> NormalizedRecord {
    let node = entry.node_info.as_deref().and_then(|n| n.first());
    let node_services = node.and_then(|n| n.service_status.as_deref()).unwrap_or(&[]);
    let dhcp = entry.service_status.as_deref().and_then(|s| s.first());

    let (disk_status, disk_usage) = status_pair(find_service(node_services, DISK_SERVICE));
    let (cpu_status, cpu_usage) = status_pair(find_service(node_services, CPU_SERVICE));
    let (memory_status, memory_usage) = status_pair(find_service(node_services, MEMORY_SERVICE));
    let (dhcp_status, dhcp_description) = status_pair(dhcp);

    NormalizedRecord {
        host_name: text(entry.host_name.as_ref()),
        hwtype: text(node.and_then(|n| n.hwtype.as_ref())),
        node_status: text(node_services.first().and_then(|s| s.status.as_ref())),
        disk_status,
        disk_usage,
        cpu_status,
        cpu_usage,
        memory_status,
        memory_usage,
        dhcp_status,
        dhcp_description,
    }
}

/// First entry whose `service` matches; later duplicates are ignored.
pub fn find_service<'a>(services: &'a [ServiceStatusEntry], name: &str) -> Option<&'a ServiceStatusEntry> {
    services.iter().find(|s| s.service.as_deref() == Some(name))
}

fn status_pair(entry: Option<&ServiceStatusEntry>) -> (String, String) {
    match entry {
        Some(e) => (text(e.status.as_ref()), text(e.description.as_ref())),
        None => (String::new(), String::new()),
    }
}

fn text(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::NodeInfo;

    fn svc(service: &str, status: &str, description: &str) -> ServiceStatusEntry {
        ServiceStatusEntry {
            service: Some(service.into()),
            status: Some(status.into()),
            description: Some(description.into()),
        }
    }

    #[test]
    fn empty_entry_normalizes_to_blank_record() {
        let rec = normalize(&RawNodeEntry::default());
        assert_eq!(rec, NormalizedRecord::default());
    }

    #[test]
    fn empty_node_info_array_does_not_panic() {
        let entry = RawNodeEntry {
            host_name: Some("gm".into()),
            node_info: Some(vec![]),
            service_status: Some(vec![]),
        };
        let rec = normalize(&entry);
        assert_eq!(rec.host_name, "gm");
        assert_eq!(rec.hwtype, "");
        assert_eq!(rec.dhcp_status, "");
    }

    #[test]
    fn null_fields_inside_service_entries_become_empty() {
        let entry = RawNodeEntry {
            node_info: Some(vec![NodeInfo {
                hwtype: None,
                service_status: Some(vec![ServiceStatusEntry {
                    service: Some("DISK_USAGE".into()),
                    status: None,
                    description: Some("Used: 12%".into()),
                }]),
            }]),
            ..Default::default()
        };
        let rec = normalize(&entry);
        assert_eq!(rec.node_status, "");
        assert_eq!(rec.disk_status, "");
        assert_eq!(rec.disk_usage, "Used: 12%");
        assert_eq!(rec.cpu_usage, "");
    }

    #[test]
    fn first_matching_service_wins() {
        let services = vec![
            svc("NODE_STATUS", "Working", "Running"),
            svc("CPU_USAGE", "Working", "Used: 10%"),
            svc("CPU_USAGE", "Failed", "Used: 99%"),
        ];
        let found = find_service(&services, CPU_SERVICE).unwrap();
        assert_eq!(found.description.as_deref(), Some("Used: 10%"));

        let entry = RawNodeEntry {
            node_info: Some(vec![NodeInfo {
                hwtype: Some("IB-825".into()),
                service_status: Some(services),
            }]),
            ..Default::default()
        };
        let rec = normalize(&entry);
        assert_eq!(rec.cpu_status, "Working");
        assert_eq!(rec.cpu_usage, "Used: 10%");
    }

    #[test]
    fn node_status_is_first_node_service() {
        let entry = RawNodeEntry {
            node_info: Some(vec![NodeInfo {
                hwtype: None,
                service_status: Some(vec![svc("NODE_STATUS", "Warning", "HA broken")]),
            }]),
            service_status: Some(vec![svc("DHCP", "Running", "DHCP Service is working")]),
            ..Default::default()
        };
        let rec = normalize(&entry);
        assert_eq!(rec.node_status, "Warning");
        assert_eq!(rec.dhcp_status, "Running");
        assert_eq!(rec.dhcp_description, "DHCP Service is working");
    }

    #[test]
    fn null_elements_from_wapi_normalize_to_blanks() {
        let raw: Vec<RawNodeEntry> = serde_json::from_str(
            r#"[{"host_name":"gm","node_info":[null],"service_status":[null]},
                {"host_name":"m2","node_info":[{"hwtype":"IB-825","service_status":[null,
                    {"service":"CPU_USAGE","status":"Working","description":"Used: 3%"}]}]}]"#,
        )
        .unwrap();
        let records = normalize_all(&raw);

        assert_eq!(records[0], NormalizedRecord { host_name: "gm".into(), ..Default::default() });
        assert_eq!(records[1].node_status, "");
        assert_eq!(records[1].cpu_status, "Working");
        assert_eq!(records[1].cpu_usage, "Used: 3%");
        assert_eq!(records[1].disk_usage, "");
    }

    #[test]
    fn one_record_per_entry_in_order() {
        let entries = vec![
            RawNodeEntry { host_name: Some("a".into()), ..Default::default() },
            RawNodeEntry { host_name: Some("b".into()), ..Default::default() },
        ];
        let names: Vec<_> = normalize_all(&entries).into_iter().map(|r| r.host_name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
