use super::gateway::ProxmoxGateway;
use super::path::ApiPath;
use crate::proxmox::error::{ProxmoxError, Result};
use reqwest::Method;
use serde_json::Value;

impl ProxmoxGateway {
    pub async fn list_nodes(&self) -> Result<Vec<Value>> {
        self.request(Method::GET, &ApiPath::root("nodes"), None)
            .await
    }

    pub async fn get_node_status(&self, node: &str) -> Result<Value> {
        let path = ApiPath::node(node).push("status");
        self.request(Method::GET, &path, None).await
    }

    pub(crate) async fn node_names(&self) -> Result<Vec<String>> {
        let nodes = self.list_nodes().await?;
        nodes
            .iter()
            .map(|n| {
                n.get("node")
                    .and_then(|v| v.as_str())
                    .map(String::from)
                    .ok_or_else(|| {
                        ProxmoxError::UnexpectedResponse(format!("node entry without a name: {}", n))
                    })
            })
            .collect()
    }
}
