//! QEMU virtual machine tools.

use super::args::Arguments;
use super::error::ToolError;
use super::schema::{InputSchema, SchemaProperty, ToolDescriptor};
use super::task;
use crate::proxmox::ProxmoxGateway;
use serde_json::{json, Value};

pub const PREFIXES: &[&str] = &["pve_vm_"];

fn vm_target() -> InputSchema {
    InputSchema::new()
        .required("node", SchemaProperty::string("Node name"))
        .required("vmid", SchemaProperty::integer("VM ID"))
}

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "pve_vm_list",
            "List all virtual machines across all nodes",
            InputSchema::new().optional(
                "node",
                SchemaProperty::string("Optional: filter by node name"),
            ),
        ),
        ToolDescriptor::new(
            "pve_vm_status",
            "Get detailed status for a specific VM",
            vm_target(),
        ),
        ToolDescriptor::new(
            "pve_vm_config",
            "Get configuration for a specific VM",
            vm_target(),
        ),
        ToolDescriptor::new("pve_vm_start", "Start a virtual machine", vm_target()),
        ToolDescriptor::new(
            "pve_vm_stop",
            "Gracefully shutdown a virtual machine",
            vm_target(),
        ),
        ToolDescriptor::new(
            "pve_vm_force_stop",
            "Force stop a virtual machine (immediate power off)",
            vm_target(),
        ),
        ToolDescriptor::new("pve_vm_restart", "Restart a virtual machine", vm_target()),
        ToolDescriptor::new(
            "pve_vm_create",
            "Create a new virtual machine. WARNING: This creates a new VM.",
            vm_target()
                .optional("name", SchemaProperty::string("VM name"))
                .optional("memory", SchemaProperty::integer("Memory in MB"))
                .optional("cores", SchemaProperty::integer("Number of CPU cores"))
                .optional(
                    "sockets",
                    SchemaProperty::integer("Number of CPU sockets").with_default(json!(1)),
                )
                .optional(
                    "ostype",
                    SchemaProperty::string("OS type (l26, win10, etc.)"),
                )
                .optional(
                    "iso",
                    SchemaProperty::string("ISO image path (e.g., local:iso/ubuntu.iso)"),
                )
                .optional("scsi0", SchemaProperty::string("SCSI disk config"))
                .optional(
                    "net0",
                    SchemaProperty::string("Network config (e.g., virtio,bridge=vmbr0)"),
                ),
        ),
        ToolDescriptor::new(
            "pve_vm_delete",
            "Delete a virtual machine. WARNING: This permanently deletes the VM!",
            vm_target(),
        ),
        ToolDescriptor::new(
            "pve_vm_clone",
            "Clone an existing virtual machine",
            InputSchema::new()
                .required("node", SchemaProperty::string("Node name"))
                .required("vmid", SchemaProperty::integer("Source VM ID"))
                .required("newid", SchemaProperty::integer("New VM ID"))
                .optional("name", SchemaProperty::string("New VM name"))
                .optional(
                    "full",
                    SchemaProperty::boolean("Full clone (true) or linked clone (false)"),
                )
                .optional("target", SchemaProperty::string("Target node (optional)")),
        ),
    ]
}

pub async fn dispatch(
    gateway: &ProxmoxGateway,
    name: &str,
    args: &Arguments,
) -> Result<Value, ToolError> {
    match name {
        "pve_vm_list" => Ok(Value::Array(
            gateway.list_vms(args.optional_filter("node")?).await?,
        )),
        "pve_vm_status" => {
            let (node, vmid) = args.guest_target()?;
            Ok(gateway.get_vm_status(node, vmid).await?)
        }
        "pve_vm_config" => {
            let (node, vmid) = args.guest_target()?;
            Ok(gateway.get_vm_config(node, vmid).await?)
        }
        "pve_vm_start" => {
            let (node, vmid) = args.guest_target()?;
            Ok(task(gateway.start_vm(node, vmid).await?))
        }
        "pve_vm_stop" => {
            let (node, vmid) = args.guest_target()?;
            Ok(task(gateway.stop_vm(node, vmid).await?))
        }
        "pve_vm_force_stop" => {
            let (node, vmid) = args.guest_target()?;
            Ok(task(gateway.force_stop_vm(node, vmid).await?))
        }
        "pve_vm_restart" => {
            let (node, vmid) = args.guest_target()?;
            Ok(task(gateway.restart_vm(node, vmid).await?))
        }
        "pve_vm_create" => {
            let (node, vmid) = args.guest_target()?;
            let params = args.without(&["node", "vmid"]);
            Ok(task(gateway.create_vm(node, vmid, params).await?))
        }
        "pve_vm_delete" => {
            let (node, vmid) = args.guest_target()?;
            Ok(task(gateway.delete_vm(node, vmid).await?))
        }
        "pve_vm_clone" => {
            let (node, vmid) = args.guest_target()?;
            let newid = args.require_id("newid")?;
            let params = args.without(&["node", "vmid", "newid"]);
            Ok(task(gateway.clone_vm(node, vmid, newid, params).await?))
        }
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}
