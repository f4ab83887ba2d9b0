use serde::{Deserialize, Deserializer, Serialize};

/// One element of the `member` array returned by the WAPI.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct RawNodeEntry {
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default, deserialize_with = "nullable_items")]
    pub node_info: Option<Vec<NodeInfo>>,
    /// Member-level services; the first entry is DHCP.
    #[serde(default, deserialize_with = "nullable_items")]
    pub service_status: Option<Vec<ServiceStatusEntry>>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct NodeInfo {
    #[serde(default)]
    pub hwtype: Option<String>,
    #[serde(default, deserialize_with = "nullable_items")]
    pub service_status: Option<Vec<ServiceStatusEntry>>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ServiceStatusEntry {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Array whose elements may be `null`; a null element reads as an all-empty one.
fn nullable_items<'de, D, T>(de: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(de)?;
    Ok(items.map(|v| v.into_iter().map(Option::unwrap_or_default).collect()))
}

/// Columns of the report, in display order.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Field {
    HostName,
    Hwtype,
    NodeStatus,
    DiskStatus,
    DiskUsage,
    CpuStatus,
    CpuUsage,
    MemoryStatus,
    MemoryUsage,
    DhcpStatus,
    DhcpDescription,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::HostName,
        Field::Hwtype,
        Field::NodeStatus,
        Field::DiskStatus,
        Field::DiskUsage,
        Field::CpuStatus,
        Field::CpuUsage,
        Field::MemoryStatus,
        Field::MemoryUsage,
        Field::DhcpStatus,
        Field::DhcpDescription,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::HostName => "HOST_NAME",
            Field::Hwtype => "HWTYPE",
            Field::NodeStatus => "NODE_STATUS",
            Field::DiskStatus => "DISK_STATUS",
            Field::DiskUsage => "DISK_USAGE",
            Field::CpuStatus => "CPU_STATUS",
            Field::CpuUsage => "CPU_USAGE",
            Field::MemoryStatus => "MEMORY_STATUS",
            Field::MemoryUsage => "MEMORY_USAGE",
            Field::DhcpStatus => "DHCP_STATUS",
            Field::DhcpDescription => "DHCP_DESCRIPTION",
        }
    }
}

/// Flat per-node row. Absent values are empty strings, never missing.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct NormalizedRecord {
    pub host_name: String,
    pub hwtype: String,
    pub node_status: String,
    pub disk_status: String,
    pub disk_usage: String,
    pub cpu_status: String,
    pub cpu_usage: String,
    pub memory_status: String,
    pub memory_usage: String,
    pub dhcp_status: String,
    pub dhcp_description: String,
}

impl NormalizedRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::HostName => &self.host_name,
            Field::Hwtype => &self.hwtype,
            Field::NodeStatus => &self.node_status,
            Field::DiskStatus => &self.disk_status,
            Field::DiskUsage => &self.disk_usage,
            Field::CpuStatus => &self.cpu_status,
            Field::CpuUsage => &self.cpu_usage,
            Field::MemoryStatus => &self.memory_status,
            Field::MemoryUsage => &self.memory_usage,
            Field::DhcpStatus => &self.dhcp_status,
            Field::DhcpDescription => &self.dhcp_description,
        }
    }

    /// `(field, value)` pairs in column order.
    pub fn cells(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}
