//! Node tools.

use super::args::Arguments;
use super::error::ToolError;
use super::schema::{InputSchema, SchemaProperty, ToolDescriptor};
use crate::proxmox::ProxmoxGateway;
use serde_json::Value;

pub const PREFIXES: &[&str] = &["pve_node_"];

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "pve_node_list",
            "List all nodes in the Proxmox cluster with their status",
            InputSchema::new(),
        ),
        ToolDescriptor::new(
            "pve_node_status",
            "Get detailed status for a specific node (CPU, memory, uptime)",
            InputSchema::new().required("node", SchemaProperty::string("Node name")),
        ),
    ]
}

pub async fn dispatch(
    gateway: &ProxmoxGateway,
    name: &str,
    args: &Arguments,
) -> Result<Value, ToolError> {
    match name {
        "pve_node_list" => Ok(Value::Array(gateway.list_nodes().await?)),
        "pve_node_status" => Ok(gateway.get_node_status(args.require_str("node")?).await?),
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}
