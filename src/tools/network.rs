//! Network tools.

use super::args::Arguments;
use super::error::ToolError;
use super::schema::{InputSchema, SchemaProperty, ToolDescriptor};
use crate::proxmox::ProxmoxGateway;
use serde_json::Value;

pub const PREFIXES: &[&str] = &["pve_network_"];

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "pve_network_list",
            "List network interfaces and bridges on a node",
            InputSchema::new().required("node", SchemaProperty::string("Node name")),
        ),
        ToolDescriptor::new(
            "pve_network_vm",
            "Get network configuration for a specific VM",
            InputSchema::new()
                .required("node", SchemaProperty::string("Node name"))
                .required("vmid", SchemaProperty::integer("VM ID")),
        ),
    ]
}

pub async fn dispatch(
    gateway: &ProxmoxGateway,
    name: &str,
    args: &Arguments,
) -> Result<Value, ToolError> {
    match name {
        "pve_network_list" => Ok(Value::Array(
            gateway.list_networks(args.require_str("node")?).await?,
        )),
        "pve_network_vm" => {
            let (node, vmid) = args.guest_target()?;
            Ok(Value::Object(gateway.get_vm_network(node, vmid).await?))
        }
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}
