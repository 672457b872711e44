//! Storage tools.

use super::args::Arguments;
use super::error::ToolError;
use super::schema::{InputSchema, SchemaProperty, ToolDescriptor};
use crate::proxmox::ProxmoxGateway;
use serde_json::Value;

pub const PREFIXES: &[&str] = &["pve_storage_"];

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "pve_storage_list",
            "List all storage pools in the cluster",
            InputSchema::new().optional(
                "node",
                SchemaProperty::string("Optional: filter by node name"),
            ),
        ),
        ToolDescriptor::new(
            "pve_storage_content",
            "List contents of a storage pool (ISOs, templates, backups, disk images)",
            InputSchema::new()
                .required("node", SchemaProperty::string("Node name"))
                .required("storage", SchemaProperty::string("Storage pool name")),
        ),
    ]
}

pub async fn dispatch(
    gateway: &ProxmoxGateway,
    name: &str,
    args: &Arguments,
) -> Result<Value, ToolError> {
    match name {
        "pve_storage_list" => Ok(Value::Array(
            gateway.list_storage(args.optional_filter("node")?).await?,
        )),
        "pve_storage_content" => {
            let node = args.require_str("node")?;
            let storage = args.require_str("storage")?;
            Ok(Value::Array(gateway.get_storage_content(node, storage).await?))
        }
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}
