//! LXC container tools.

use super::args::Arguments;
use super::error::ToolError;
use super::schema::{InputSchema, SchemaProperty, ToolDescriptor};
use super::task;
use crate::proxmox::ProxmoxGateway;
use serde_json::Value;

pub const PREFIXES: &[&str] = &["pve_container_"];

fn container_target() -> InputSchema {
    InputSchema::new()
        .required("node", SchemaProperty::string("Node name"))
        .required("vmid", SchemaProperty::integer("Container ID"))
}

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "pve_container_list",
            "List all LXC containers across all nodes",
            InputSchema::new().optional(
                "node",
                SchemaProperty::string("Optional: filter by node name"),
            ),
        ),
        ToolDescriptor::new(
            "pve_container_status",
            "Get detailed status for a specific container",
            container_target(),
        ),
        ToolDescriptor::new(
            "pve_container_config",
            "Get configuration for a specific container",
            container_target(),
        ),
        ToolDescriptor::new(
            "pve_container_start",
            "Start a container",
            container_target(),
        ),
        ToolDescriptor::new(
            "pve_container_stop",
            "Gracefully shutdown a container",
            container_target(),
        ),
        ToolDescriptor::new(
            "pve_container_force_stop",
            "Force stop a container (immediate)",
            container_target(),
        ),
        ToolDescriptor::new(
            "pve_container_create",
            "Create a new LXC container. WARNING: This creates a new container.",
            container_target()
                .required(
                    "ostemplate",
                    SchemaProperty::string(
                        "Template (e.g., local:vztmpl/ubuntu-22.04-standard_22.04-1_amd64.tar.zst)",
                    ),
                )
                .optional("hostname", SchemaProperty::string("Container hostname"))
                .optional("memory", SchemaProperty::integer("Memory in MB"))
                .optional("cores", SchemaProperty::integer("Number of CPU cores"))
                .optional(
                    "rootfs",
                    SchemaProperty::string("Root filesystem config (e.g., local-lvm:8)"),
                )
                .optional("net0", SchemaProperty::string("Network config"))
                .optional("password", SchemaProperty::string("Root password"))
                .optional("ssh_public_keys", SchemaProperty::string("SSH public keys"))
                .optional(
                    "unprivileged",
                    SchemaProperty::boolean("Unprivileged container"),
                ),
        ),
        ToolDescriptor::new(
            "pve_container_delete",
            "Delete a container. WARNING: This permanently deletes the container!",
            container_target(),
        ),
    ]
}

pub async fn dispatch(
    gateway: &ProxmoxGateway,
    name: &str,
    args: &Arguments,
) -> Result<Value, ToolError> {
    match name {
        "pve_container_list" => Ok(Value::Array(
            gateway.list_containers(args.optional_filter("node")?).await?,
        )),
        "pve_container_status" => {
            let (node, vmid) = args.guest_target()?;
            Ok(gateway.get_container_status(node, vmid).await?)
        }
        "pve_container_config" => {
            let (node, vmid) = args.guest_target()?;
            Ok(gateway.get_container_config(node, vmid).await?)
        }
        "pve_container_start" => {
            let (node, vmid) = args.guest_target()?;
            Ok(task(gateway.start_container(node, vmid).await?))
        }
        "pve_container_stop" => {
            let (node, vmid) = args.guest_target()?;
            Ok(task(gateway.stop_container(node, vmid).await?))
        }
        "pve_container_force_stop" => {
            let (node, vmid) = args.guest_target()?;
            Ok(task(gateway.force_stop_container(node, vmid).await?))
        }
        "pve_container_create" => {
            let (node, vmid) = args.guest_target()?;
            args.require_str("ostemplate")?;
            // ostemplate travels with the rest of the body
            let params = args.without(&["node", "vmid"]);
            Ok(task(gateway.create_container(node, vmid, params).await?))
        }
        "pve_container_delete" => {
            let (node, vmid) = args.guest_target()?;
            Ok(task(gateway.delete_container(node, vmid).await?))
        }
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}
