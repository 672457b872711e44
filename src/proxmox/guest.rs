use super::client::TaskHandle;
use super::gateway::ProxmoxGateway;
use super::path::ApiPath;
use crate::proxmox::error::Result;
use futures::future::try_join_all;
use reqwest::Method;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// The two guest flavours Proxmox manages. Their API subtrees mirror each
/// other, only the path segment differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuestKind {
    #[default]
    Qemu,
    Lxc,
}

impl GuestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuestKind::Qemu => "qemu",
            GuestKind::Lxc => "lxc",
        }
    }
}

impl fmt::Display for GuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuestKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "qemu" => Ok(GuestKind::Qemu),
            "lxc" => Ok(GuestKind::Lxc),
            other => Err(format!("expected 'qemu' or 'lxc', got '{}'", other)),
        }
    }
}

/// `/nodes/{node}/{qemu|lxc}/{vmid}`
pub(crate) fn guest_path(node: &str, kind: GuestKind, vmid: i64) -> ApiPath {
    ApiPath::node(node).push(kind).push(vmid)
}

impl ProxmoxGateway {
    /// Lists guests of one kind. Without a node every cluster node is
    /// queried; the first failing node fails the whole listing.
    pub(crate) async fn list_guests(&self, kind: GuestKind, node: Option<&str>) -> Result<Vec<Value>> {
        let nodes = match node {
            Some(n) => vec![n.to_string()],
            None => self.node_names().await?,
        };

        let per_node = try_join_all(nodes.iter().map(|n| self.list_guests_on(kind, n))).await?;
        Ok(per_node.into_iter().flatten().collect())
    }

    async fn list_guests_on(&self, kind: GuestKind, node: &str) -> Result<Vec<Value>> {
        let path = ApiPath::node(node).push(kind);
        let mut guests: Vec<Value> = self.request(Method::GET, &path, None).await?;
        // Per-node listings do not say which node they came from.
        for guest in &mut guests {
            if let Some(obj) = guest.as_object_mut() {
                obj.insert("node".to_string(), json!(node));
            }
        }
        Ok(guests)
    }

    pub(crate) async fn guest_status(&self, node: &str, kind: GuestKind, vmid: i64) -> Result<Value> {
        let path = guest_path(node, kind, vmid).push("status").push("current");
        self.request(Method::GET, &path, None).await
    }

    pub(crate) async fn guest_config(&self, node: &str, kind: GuestKind, vmid: i64) -> Result<Value> {
        let path = guest_path(node, kind, vmid).push("config");
        self.request(Method::GET, &path, None).await
    }

    /// POST `status/{action}` (start, shutdown, stop, reboot).
    pub(crate) async fn guest_action(
        &self,
        node: &str,
        kind: GuestKind,
        vmid: i64,
        action: &str,
    ) -> Result<TaskHandle> {
        let path = guest_path(node, kind, vmid).push("status").push(action);
        self.request(Method::POST, &path, None).await
    }

    pub(crate) async fn create_guest(
        &self,
        node: &str,
        kind: GuestKind,
        vmid: i64,
        params: Map<String, Value>,
    ) -> Result<TaskHandle> {
        let path = ApiPath::node(node).push(kind);
        let mut body = Map::new();
        body.insert("vmid".to_string(), json!(vmid));
        body.extend(params);
        self.request(Method::POST, &path, Some(&Value::Object(body)))
            .await
    }

    pub(crate) async fn delete_guest(&self, node: &str, kind: GuestKind, vmid: i64) -> Result<TaskHandle> {
        let path = guest_path(node, kind, vmid);
        self.request(Method::DELETE, &path, None).await
    }
}
