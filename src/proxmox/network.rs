use super::gateway::ProxmoxGateway;
use super::guest::{guest_path, GuestKind};
use super::path::ApiPath;
use crate::proxmox::error::Result;
use reqwest::Method;
use serde_json::{Map, Value};

impl ProxmoxGateway {
    // --- Network Management ---

    pub async fn list_networks(&self, node: &str) -> Result<Vec<Value>> {
        let path = ApiPath::node(node).push("network");
        self.request(Method::GET, &path, None).await
    }

    /// The `netN` entries of a VM's configuration, in the order the API
    /// returned them.
    pub async fn get_vm_network(&self, node: &str, vmid: i64) -> Result<Map<String, Value>> {
        let path = guest_path(node, GuestKind::Qemu, vmid).push("config");
        let config: Map<String, Value> = self.request(Method::GET, &path, None).await?;
        Ok(config
            .into_iter()
            .filter(|(key, _)| key.starts_with("net"))
            .collect())
    }
}
