//! Backup and snapshot tools. One group, two name prefixes.
//!
//! Every snapshot tool takes an optional `type` (`qemu` or `lxc`, default
//! `qemu`) that picks between the VM and the container snapshot endpoints.

use super::args::Arguments;
use super::error::ToolError;
use super::schema::{InputSchema, SchemaProperty, ToolDescriptor};
use super::task;
use crate::proxmox::ProxmoxGateway;
use serde_json::{json, Value};

pub const PREFIXES: &[&str] = &["pve_backup_", "pve_snapshot_"];

fn guest_type() -> SchemaProperty {
    SchemaProperty::string("Type: qemu (VM) or lxc (container)")
        .one_of(&["qemu", "lxc"])
        .with_default(json!("qemu"))
}

fn snapshot_target() -> InputSchema {
    InputSchema::new()
        .required("node", SchemaProperty::string("Node name"))
        .required("vmid", SchemaProperty::integer("VM/Container ID"))
        .required("name", SchemaProperty::string("Snapshot name"))
}

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "pve_backup_list",
            "List backups in a storage pool",
            InputSchema::new()
                .required("node", SchemaProperty::string("Node name"))
                .required("storage", SchemaProperty::string("Storage pool name")),
        ),
        ToolDescriptor::new(
            "pve_backup_create",
            "Create a backup of a VM or container",
            InputSchema::new()
                .required("node", SchemaProperty::string("Node name"))
                .required("vmid", SchemaProperty::integer("VM/Container ID"))
                .required("storage", SchemaProperty::string("Target storage pool"))
                .optional(
                    "mode",
                    SchemaProperty::string("Backup mode: snapshot, suspend, or stop")
                        .one_of(&["snapshot", "suspend", "stop"]),
                )
                .optional(
                    "compress",
                    SchemaProperty::string("Compression: 0 (none), gzip, lzo, zstd"),
                )
                .optional("notes", SchemaProperty::string("Backup notes")),
        ),
        ToolDescriptor::new(
            "pve_snapshot_list",
            "List snapshots for a VM or container",
            InputSchema::new()
                .required("node", SchemaProperty::string("Node name"))
                .required("vmid", SchemaProperty::integer("VM/Container ID"))
                .optional("type", guest_type()),
        ),
        ToolDescriptor::new(
            "pve_snapshot_create",
            "Create a snapshot of a VM or container",
            snapshot_target()
                .optional("description", SchemaProperty::string("Snapshot description"))
                .optional("type", guest_type())
                .optional(
                    "vmstate",
                    SchemaProperty::boolean("Include VM state (RAM) in snapshot"),
                ),
        ),
        ToolDescriptor::new(
            "pve_snapshot_rollback",
            "Rollback to a snapshot. WARNING: This reverts the VM/container to the snapshot state!",
            snapshot_target().optional("type", guest_type()),
        ),
        ToolDescriptor::new(
            "pve_snapshot_delete",
            "Delete a snapshot",
            snapshot_target().optional("type", guest_type()),
        ),
    ]
}

pub async fn dispatch(
    gateway: &ProxmoxGateway,
    name: &str,
    args: &Arguments,
) -> Result<Value, ToolError> {
    match name {
        "pve_backup_list" => {
            let node = args.require_str("node")?;
            let storage = args.require_str("storage")?;
            Ok(Value::Array(gateway.list_backups(node, storage).await?))
        }
        "pve_backup_create" => {
            let (node, vmid) = args.guest_target()?;
            let storage = args.require_str("storage")?;
            let params = args.without(&["node", "vmid", "storage"]);
            Ok(task(gateway.create_backup(node, vmid, storage, params).await?))
        }
        "pve_snapshot_list" => {
            let (node, vmid) = args.guest_target()?;
            let kind = args.guest_kind()?;
            Ok(Value::Array(gateway.list_snapshots(node, vmid, kind).await?))
        }
        "pve_snapshot_create" => {
            let (node, vmid) = args.guest_target()?;
            let snapname = args.require_str("name")?;
            let kind = args.guest_kind()?;
            let params = args.pick(&["description", "vmstate"]);
            Ok(task(
                gateway
                    .create_snapshot(node, vmid, snapname, kind, params)
                    .await?,
            ))
        }
        "pve_snapshot_rollback" => {
            let (node, vmid) = args.guest_target()?;
            let snapname = args.require_str("name")?;
            let kind = args.guest_kind()?;
            Ok(task(
                gateway.rollback_snapshot(node, vmid, snapname, kind).await?,
            ))
        }
        "pve_snapshot_delete" => {
            let (node, vmid) = args.guest_target()?;
            let snapname = args.require_str("name")?;
            let kind = args.guest_kind()?;
            Ok(task(
                gateway.delete_snapshot(node, vmid, snapname, kind).await?,
            ))
        }
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}
