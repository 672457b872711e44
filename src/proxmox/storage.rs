use super::client::TaskHandle;
use super::gateway::ProxmoxGateway;
use super::path::ApiPath;
use crate::proxmox::error::Result;
use reqwest::Method;
use serde_json::{json, Map, Value};

impl ProxmoxGateway {
    /// Storage pools visible from `node`, or the cluster-wide storage
    /// configuration when no node is given.
    pub async fn list_storage(&self, node: Option<&str>) -> Result<Vec<Value>> {
        let path = match node {
            Some(n) => ApiPath::node(n).push("storage"),
            None => ApiPath::root("storage"),
        };
        self.request(Method::GET, &path, None).await
    }

    pub async fn get_storage_content(&self, node: &str, storage: &str) -> Result<Vec<Value>> {
        let path = ApiPath::node(node)
            .push("storage")
            .push(storage)
            .push("content");
        self.request(Method::GET, &path, None).await
    }

    // --- Backup Management ---

    pub async fn list_backups(&self, node: &str, storage: &str) -> Result<Vec<Value>> {
        let content = self.get_storage_content(node, storage).await?;
        Ok(content
            .into_iter()
            .filter(|item| item.get("content").and_then(|c| c.as_str()) == Some("backup"))
            .collect())
    }

    /// Starts a vzdump job for one guest. `params` is passed through as-is
    /// (mode, compress, notes, ...).
    pub async fn create_backup(
        &self,
        node: &str,
        vmid: i64,
        storage: &str,
        params: Map<String, Value>,
    ) -> Result<TaskHandle> {
        let path = ApiPath::node(node).push("vzdump");
        let mut body = Map::new();
        body.insert("vmid".to_string(), json!(vmid));
        body.insert("storage".to_string(), json!(storage));
        body.extend(params);
        self.request(Method::POST, &path, Some(&Value::Object(body)))
            .await
    }
}
