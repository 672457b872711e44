use super::client::TaskHandle;
use super::gateway::ProxmoxGateway;
use super::guest::GuestKind;
use crate::proxmox::error::Result;
use serde_json::{Map, Value};

const KIND: GuestKind = GuestKind::Lxc;

impl ProxmoxGateway {
    pub async fn list_containers(&self, node: Option<&str>) -> Result<Vec<Value>> {
        self.list_guests(KIND, node).await
    }

    pub async fn get_container_status(&self, node: &str, vmid: i64) -> Result<Value> {
        self.guest_status(node, KIND, vmid).await
    }

    pub async fn get_container_config(&self, node: &str, vmid: i64) -> Result<Value> {
        self.guest_config(node, KIND, vmid).await
    }

    pub async fn start_container(&self, node: &str, vmid: i64) -> Result<TaskHandle> {
        self.guest_action(node, KIND, vmid, "start").await
    }

    pub async fn stop_container(&self, node: &str, vmid: i64) -> Result<TaskHandle> {
        self.guest_action(node, KIND, vmid, "shutdown").await
    }

    pub async fn force_stop_container(&self, node: &str, vmid: i64) -> Result<TaskHandle> {
        self.guest_action(node, KIND, vmid, "stop").await
    }

    /// `params` must already carry `ostemplate`.
    pub async fn create_container(
        &self,
        node: &str,
        vmid: i64,
        params: Map<String, Value>,
    ) -> Result<TaskHandle> {
        self.create_guest(node, KIND, vmid, params).await
    }

    pub async fn delete_container(&self, node: &str, vmid: i64) -> Result<TaskHandle> {
        self.delete_guest(node, KIND, vmid).await
    }
}
