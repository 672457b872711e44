use super::client::TaskHandle;
use super::gateway::ProxmoxGateway;
use super::guest::{guest_path, GuestKind};
use crate::proxmox::error::Result;
use reqwest::Method;
use serde_json::{json, Map, Value};

const KIND: GuestKind = GuestKind::Qemu;

impl ProxmoxGateway {
    pub async fn list_vms(&self, node: Option<&str>) -> Result<Vec<Value>> {
        self.list_guests(KIND, node).await
    }

    pub async fn get_vm_status(&self, node: &str, vmid: i64) -> Result<Value> {
        self.guest_status(node, KIND, vmid).await
    }

    pub async fn get_vm_config(&self, node: &str, vmid: i64) -> Result<Value> {
        self.guest_config(node, KIND, vmid).await
    }

    pub async fn start_vm(&self, node: &str, vmid: i64) -> Result<TaskHandle> {
        self.guest_action(node, KIND, vmid, "start").await
    }

    /// Graceful ACPI shutdown.
    pub async fn stop_vm(&self, node: &str, vmid: i64) -> Result<TaskHandle> {
        self.guest_action(node, KIND, vmid, "shutdown").await
    }

    /// Immediate power off.
    pub async fn force_stop_vm(&self, node: &str, vmid: i64) -> Result<TaskHandle> {
        self.guest_action(node, KIND, vmid, "stop").await
    }

    pub async fn restart_vm(&self, node: &str, vmid: i64) -> Result<TaskHandle> {
        self.guest_action(node, KIND, vmid, "reboot").await
    }

    pub async fn create_vm(
        &self,
        node: &str,
        vmid: i64,
        params: Map<String, Value>,
    ) -> Result<TaskHandle> {
        self.create_guest(node, KIND, vmid, params).await
    }

    pub async fn delete_vm(&self, node: &str, vmid: i64) -> Result<TaskHandle> {
        self.delete_guest(node, KIND, vmid).await
    }

    pub async fn clone_vm(
        &self,
        node: &str,
        vmid: i64,
        newid: i64,
        params: Map<String, Value>,
    ) -> Result<TaskHandle> {
        let path = guest_path(node, KIND, vmid).push("clone");
        let mut body = Map::new();
        body.insert("newid".to_string(), json!(newid));
        body.extend(params);
        self.request(Method::POST, &path, Some(&Value::Object(body)))
            .await
    }
}
