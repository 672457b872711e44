//! The tool catalog, one module per group.
//!
//! Each group module exposes `PREFIXES`, `descriptors()` and `dispatch()`;
//! [`ToolGroup`] ties them together in routing order.

pub mod args;
pub mod backup;
pub mod containers;
pub mod error;
pub mod network;
pub mod nodes;
pub mod schema;
pub mod storage;
pub mod vms;

pub use args::Arguments;
pub use error::ToolError;
pub use schema::{InputSchema, SchemaProperty, ToolDescriptor};

use crate::proxmox::{ProxmoxGateway, TaskHandle};
use serde_json::{json, Value};

/// `{"task": "<upid>"}`
pub(crate) fn task(handle: TaskHandle) -> Value {
    json!({ "task": handle })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolGroup {
    Nodes,
    Vms,
    Containers,
    Storage,
    Network,
    Backup,
}

impl ToolGroup {
    /// Catalog and routing order.
    pub const ALL: [ToolGroup; 6] = [
        ToolGroup::Nodes,
        ToolGroup::Vms,
        ToolGroup::Containers,
        ToolGroup::Storage,
        ToolGroup::Network,
        ToolGroup::Backup,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ToolGroup::Nodes => "nodes",
            ToolGroup::Vms => "vms",
            ToolGroup::Containers => "containers",
            ToolGroup::Storage => "storage",
            ToolGroup::Network => "network",
            ToolGroup::Backup => "backup",
        }
    }

    pub fn prefixes(&self) -> &'static [&'static str] {
        match self {
            ToolGroup::Nodes => nodes::PREFIXES,
            ToolGroup::Vms => vms::PREFIXES,
            ToolGroup::Containers => containers::PREFIXES,
            ToolGroup::Storage => storage::PREFIXES,
            ToolGroup::Network => network::PREFIXES,
            ToolGroup::Backup => backup::PREFIXES,
        }
    }

    pub fn claims(&self, tool: &str) -> bool {
        self.prefixes().iter().any(|p| tool.starts_with(p))
    }

    /// First group, in routing order, whose prefixes match `tool`.
    pub fn owning(tool: &str) -> Option<ToolGroup> {
        Self::ALL.into_iter().find(|g| g.claims(tool))
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        match self {
            ToolGroup::Nodes => nodes::descriptors(),
            ToolGroup::Vms => vms::descriptors(),
            ToolGroup::Containers => containers::descriptors(),
            ToolGroup::Storage => storage::descriptors(),
            ToolGroup::Network => network::descriptors(),
            ToolGroup::Backup => backup::descriptors(),
        }
    }

    pub async fn dispatch(
        &self,
        gateway: &ProxmoxGateway,
        name: &str,
        args: &Arguments,
    ) -> Result<Value, ToolError> {
        match self {
            ToolGroup::Nodes => nodes::dispatch(gateway, name, args).await,
            ToolGroup::Vms => vms::dispatch(gateway, name, args).await,
            ToolGroup::Containers => containers::dispatch(gateway, name, args).await,
            ToolGroup::Storage => storage::dispatch(gateway, name, args).await,
            ToolGroup::Network => network::dispatch(gateway, name, args).await,
            ToolGroup::Backup => backup::dispatch(gateway, name, args).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique_and_owned_by_their_group() {
        let mut seen = HashSet::new();
        for group in ToolGroup::ALL {
            for d in group.descriptors() {
                assert!(seen.insert(d.name), "duplicate tool {}", d.name);
                assert_eq!(ToolGroup::owning(d.name), Some(group), "{}", d.name);
                assert!(d.name.starts_with("pve_"));
            }
        }
        assert_eq!(seen.len(), 30);
    }

    #[test]
    fn test_backup_group_has_two_prefixes() {
        assert_eq!(
            ToolGroup::owning("pve_snapshot_list"),
            Some(ToolGroup::Backup)
        );
        assert_eq!(ToolGroup::owning("pve_backup_list"), Some(ToolGroup::Backup));
        assert_eq!(ToolGroup::owning("pve_cluster_status"), None);
        assert_eq!(ToolGroup::owning("vm_list"), None);
    }

    #[test]
    fn test_required_fields_are_declared_properties() {
        for group in ToolGroup::ALL {
            for d in group.descriptors() {
                for field in d.input_schema.required_fields() {
                    assert!(
                        d.input_schema.property(field).is_some(),
                        "{} requires undeclared {}",
                        d.name,
                        field
                    );
                }
            }
        }
    }

    #[test]
    fn test_snapshot_tools_advertise_type_default() {
        for d in backup::descriptors() {
            if !d.name.starts_with("pve_snapshot_") {
                continue;
            }
            let prop = d.input_schema.property("type").unwrap();
            assert_eq!(prop.allowed, Some(&["qemu", "lxc"][..]));
            assert_eq!(prop.default, Some(json!("qemu")));
        }
    }
}
