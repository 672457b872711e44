use crate::proxmox::error::{ProxmoxError, Result};
use std::fmt;
use url::Url;

/// A Proxmox API resource path, kept as raw segments until it is joined onto
/// the `/api2/json/` base so that every segment gets percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    pub fn root(segment: impl ToString) -> Self {
        Self {
            segments: vec![segment.to_string()],
        }
    }

    /// `/nodes/{node}`
    pub fn node(node: &str) -> Self {
        Self::root("nodes").push(node)
    }

    pub fn push(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    pub fn to_url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| ProxmoxError::Config(format!("{} cannot be used as a base URL", base)))?
            .pop_if_empty()
            .extend(&self.segments);
        Ok(url)
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://pve.example:8006/api2/json/").unwrap()
    }

    #[test]
    fn test_joins_segments_onto_base() {
        let path = ApiPath::node("pve1").push("qemu").push(100).push("config");
        assert_eq!(path.to_string(), "/nodes/pve1/qemu/100/config");
        assert_eq!(
            path.to_url(&base()).unwrap().as_str(),
            "https://pve.example:8006/api2/json/nodes/pve1/qemu/100/config"
        );
    }

    #[test]
    fn test_escapes_each_segment() {
        let path = ApiPath::node("pve1")
            .push("lxc")
            .push(200)
            .push("snapshot")
            .push("before upgrade/1");
        assert_eq!(
            path.to_url(&base()).unwrap().path(),
            "/api2/json/nodes/pve1/lxc/200/snapshot/before%20upgrade%2F1"
        );
    }

    #[test]
    fn test_cluster_wide_root() {
        let url = ApiPath::root("storage").to_url(&base()).unwrap();
        assert_eq!(url.path(), "/api2/json/storage");
    }
}
