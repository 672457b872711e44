use crate::proxmox::client::{ConnectionSettings, ProxmoxClient};
use crate::proxmox::error::{ProxmoxError, Result};
use crate::proxmox::path::ApiPath;
use log::{error, info};
use reqwest::Method;
use serde_json::Value;
use std::sync::OnceLock;

/// Typed façade over the Proxmox REST API.
///
/// The underlying connection is opened on first use and kept for the life of
/// the gateway. The outcome of that first attempt, success or failure, is
/// what every later caller sees: a missing token is not retried.
pub struct ProxmoxGateway {
    settings: Option<ConnectionSettings>,
    connection: OnceLock<std::result::Result<ProxmoxClient, String>>,
}

impl ProxmoxGateway {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            settings: Some(settings),
            connection: OnceLock::new(),
        }
    }

    /// Wraps an already connected client.
    pub fn with_client(client: ProxmoxClient) -> Self {
        let connection = OnceLock::new();
        let _ = connection.set(Ok(client));
        Self {
            settings: None,
            connection,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection.get(), Some(Ok(_)))
    }

    pub fn api(&self) -> Result<&ProxmoxClient> {
        let outcome = self.connection.get_or_init(|| {
            let Some(settings) = &self.settings else {
                return Err("No Proxmox connection settings available".to_string());
            };
            info!("Opening Proxmox API connection to {}", settings.host);
            ProxmoxClient::connect(settings).map_err(|e| {
                error!("Failed to set up Proxmox connection: {}", e);
                e.to_string()
            })
        });

        outcome
            .as_ref()
            .map_err(|msg| ProxmoxError::Init(msg.clone()))
    }

    pub(crate) async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &ApiPath,
        body: Option<&Value>,
    ) -> Result<T> {
        self.api()?.request(method, path, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(token_value: Option<&str>) -> ConnectionSettings {
        ConnectionSettings {
            host: "pve.example".to_string(),
            port: 8006,
            user: "root@pam".to_string(),
            token_name: Some("mcp".to_string()),
            token_value: token_value.map(String::from),
            verify_ssl: false,
        }
    }

    #[test]
    fn test_connects_lazily() {
        let gateway = ProxmoxGateway::new(settings(Some("secret")));
        assert!(!gateway.is_connected());

        let first = gateway.api().unwrap() as *const ProxmoxClient;
        let second = gateway.api().unwrap() as *const ProxmoxClient;
        assert!(gateway.is_connected());
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_token_fails_every_time() {
        let gateway = ProxmoxGateway::new(settings(None));

        let first = gateway.api().err().unwrap().to_string();
        let second = gateway.api().err().unwrap().to_string();
        assert!(first.contains("PROXMOX_TOKEN_NAME and PROXMOX_TOKEN_VALUE"));
        assert_eq!(first, second);
        assert!(!gateway.is_connected());
    }

    #[test]
    fn test_concurrent_first_use_sees_one_client() {
        let gateway = std::sync::Arc::new(ProxmoxGateway::new(settings(Some("secret"))));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gw = gateway.clone();
                std::thread::spawn(move || gw.api().unwrap() as *const ProxmoxClient as usize)
            })
            .collect();

        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }
}
