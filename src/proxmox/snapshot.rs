use super::client::TaskHandle;
use super::gateway::ProxmoxGateway;
use super::guest::{guest_path, GuestKind};
use crate::proxmox::error::Result;
use reqwest::Method;
use serde_json::{json, Map, Value};

impl ProxmoxGateway {
    pub async fn list_snapshots(&self, node: &str, vmid: i64, kind: GuestKind) -> Result<Vec<Value>> {
        let path = guest_path(node, kind, vmid).push("snapshot");
        self.request(Method::GET, &path, None).await
    }

    pub async fn create_snapshot(
        &self,
        node: &str,
        vmid: i64,
        name: &str,
        kind: GuestKind,
        params: Map<String, Value>,
    ) -> Result<TaskHandle> {
        let path = guest_path(node, kind, vmid).push("snapshot");
        let mut body = Map::new();
        body.insert("snapname".to_string(), json!(name));
        body.extend(params);
        self.request(Method::POST, &path, Some(&Value::Object(body)))
            .await
    }

    pub async fn rollback_snapshot(
        &self,
        node: &str,
        vmid: i64,
        name: &str,
        kind: GuestKind,
    ) -> Result<TaskHandle> {
        let path = guest_path(node, kind, vmid)
            .push("snapshot")
            .push(name)
            .push("rollback");
        self.request(Method::POST, &path, None).await
    }

    pub async fn delete_snapshot(
        &self,
        node: &str,
        vmid: i64,
        name: &str,
        kind: GuestKind,
    ) -> Result<TaskHandle> {
        let path = guest_path(node, kind, vmid).push("snapshot").push(name);
        self.request(Method::DELETE, &path, None).await
    }
}
