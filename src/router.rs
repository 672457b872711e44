use crate::proxmox::ProxmoxGateway;
use crate::tools::{Arguments, ToolDescriptor, ToolError, ToolGroup};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Outcome of one tool call: the backend payload or `{"error": "..."}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum InvocationResult {
    Success(Value),
    Error { error: String },
}

impl InvocationResult {
    pub fn is_error(&self) -> bool {
        matches!(self, InvocationResult::Error { .. })
    }

    /// Two-space indented JSON, as handed back to the client.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|e| format!("{{\n  \"error\": \"{}\"\n}}", e))
    }
}

impl From<Result<Value, ToolError>> for InvocationResult {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(value) => InvocationResult::Success(value),
            Err(e) => InvocationResult::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Entry point for tool discovery and invocation.
pub struct ToolRouter {
    gateway: Arc<ProxmoxGateway>,
    catalog: Vec<ToolDescriptor>,
}

impl ToolRouter {
    pub fn new(gateway: Arc<ProxmoxGateway>) -> Self {
        let catalog = ToolGroup::ALL
            .iter()
            .flat_map(|g| g.descriptors())
            .collect();
        Self { gateway, catalog }
    }

    pub fn list_all_tools(&self) -> &[ToolDescriptor] {
        &self.catalog
    }

    /// Runs one tool. Never fails: every error is folded into
    /// [`InvocationResult::Error`].
    pub async fn route(&self, name: &str, arguments: Value) -> InvocationResult {
        info!("Calling tool {}", name);
        let result = self.try_route(name, arguments).await;
        if let Err(e) = &result {
            warn!("Tool {} failed: {}", name, e);
        }
        result.into()
    }

    async fn try_route(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let group = ToolGroup::owning(name)
            .filter(|_| self.catalog.iter().any(|d| d.name == name))
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        debug!("Routing {} to the {} group", name, group.label());

        let args = Arguments::from_value(arguments)?;
        group.dispatch(&self.gateway, name, &args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxmox::ConnectionSettings;
    use serde_json::json;

    fn router_without_token() -> ToolRouter {
        let settings = ConnectionSettings {
            host: "pve.example".to_string(),
            port: 8006,
            user: "root@pam".to_string(),
            token_name: None,
            token_value: None,
            verify_ssl: false,
        };
        ToolRouter::new(Arc::new(ProxmoxGateway::new(settings)))
    }

    #[test]
    fn test_catalog_follows_group_order() {
        let router = router_without_token();
        let names: Vec<&str> = router.list_all_tools().iter().map(|d| d.name).collect();
        assert_eq!(names.len(), 30);
        assert_eq!(names[0], "pve_node_list");
        assert_eq!(names[2], "pve_vm_list");
        assert_eq!(names.last(), Some(&"pve_snapshot_delete"));

        let first_container = names.iter().position(|n| n.starts_with("pve_container_"));
        let last_vm = names.iter().rposition(|n| n.starts_with("pve_vm_"));
        assert!(last_vm < first_container);
    }

    #[tokio::test]
    async fn test_unknown_prefix_is_an_error_payload() {
        let router = router_without_token();
        let result = router.route("pve_cluster_status", json!({})).await;
        assert_eq!(
            result,
            InvocationResult::Error {
                error: "Unknown tool: pve_cluster_status".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_action_in_known_group() {
        let router = router_without_token();
        let result = router.route("pve_vm_migrate", json!({})).await;
        assert_eq!(
            result,
            InvocationResult::Error {
                error: "Unknown tool: pve_vm_migrate".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_action_wins_over_bad_arguments() {
        let router = router_without_token();
        let result = router.route("pve_vm_migrate", json!([1])).await;
        assert_eq!(
            result,
            InvocationResult::Error {
                error: "Unknown tool: pve_vm_migrate".to_string()
            }
        );

        let result = router.route("pve_vm_list", json!([1])).await;
        assert!(result.to_pretty_json().contains("Invalid argument 'arguments'"));
    }

    #[tokio::test]
    async fn test_missing_argument_is_reported() {
        let router = router_without_token();
        let result = router.route("pve_node_status", json!({})).await;
        assert_eq!(
            result,
            InvocationResult::Error {
                error: "Missing required argument: node".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_configuration_failure_is_caught() {
        let router = router_without_token();
        let result = router.route("pve_node_list", Value::Null).await;
        assert!(result.is_error());
        assert!(result.to_pretty_json().contains("PROXMOX_TOKEN_NAME"));
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        let ok = InvocationResult::Success(json!({ "task": "UPID:pve1" }));
        assert_eq!(ok.to_pretty_json(), "{\n  \"task\": \"UPID:pve1\"\n}");

        let err = InvocationResult::Error {
            error: "boom".to_string(),
        };
        assert_eq!(err.to_pretty_json(), "{\n  \"error\": \"boom\"\n}");
    }
}
