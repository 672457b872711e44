use crate::proxmox::error::{ProxmoxError, Result};
use crate::proxmox::path::ApiPath;
use log::{debug, info};
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

pub const DEFAULT_PORT: u16 = 8006;

/// Everything needed to open a connection to the Proxmox API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Host name or address, optionally prefixed with `http://` or `https://`.
    pub host: String,
    pub port: u16,
    pub user: String,
    pub token_name: Option<String>,
    pub token_value: Option<String>,
    pub verify_ssl: bool,
}

/// UPID of an asynchronous backend task. Never tracked or polled here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct TaskHandle(pub String);

#[derive(Clone)]
pub struct ProxmoxClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    api_token: Option<String>,
}

impl ProxmoxClient {
    pub fn new(host: &str, port: u16, verify_ssl: bool) -> Result<Self> {
        let scheme = if host.starts_with("http://") {
            "http"
        } else {
            "https"
        };

        let host_cleaned = if let Some(stripped) = host.strip_prefix("http://") {
            stripped
        } else if let Some(stripped) = host.strip_prefix("https://") {
            stripped
        } else {
            host
        };
        let host_cleaned = host_cleaned.trim_end_matches('/');

        let base_url = Url::parse(&format!(
            "{}://{}:{}/api2/json/",
            scheme, host_cleaned, port
        ))?;

        let client = Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_token: None,
        })
    }

    /// Builds an API-token authenticated client. Both halves of the token are
    /// mandatory; there is no password login.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let (token_name, token_value) = match (&settings.token_name, &settings.token_value) {
            (Some(name), Some(value)) if !name.is_empty() && !value.is_empty() => (name, value),
            _ => {
                return Err(ProxmoxError::Config(
                    "PROXMOX_TOKEN_NAME and PROXMOX_TOKEN_VALUE environment variables required"
                        .to_string(),
                ))
            }
        };

        let mut client = Self::new(&settings.host, settings.port, settings.verify_ssl)?;
        client.set_api_token(&settings.user, token_name, token_value);
        info!(
            "Connected to Proxmox at {} as {}!{}",
            client.base_url, settings.user, token_name
        );
        Ok(client)
    }

    pub fn set_api_token(&mut self, user: &str, token_name: &str, token_value: &str) {
        self.api_token = Some(format!(
            "PVEAPIToken={}!{}={}",
            user, token_name, token_value
        ));
    }

    pub(crate) async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &ApiPath,
        body: Option<&Value>,
    ) -> Result<T> {
        let url = path.to_url(&self.base_url)?;
        debug!("{} {}", method, path);
        let mut req = self.client.request(method, url);

        if let Some(token) = &self.api_token {
            req = req.header("Authorization", token);
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(ProxmoxError::from_transport)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            if status == StatusCode::UNAUTHORIZED {
                return Err(ProxmoxError::Auth(format!("{} - {}", status, text)));
            }
            return Err(ProxmoxError::Api(status, text));
        }

        let v: Value = resp.json().await?;
        match v {
            Value::Object(mut envelope) if envelope.contains_key("data") => {
                let data = envelope.remove("data").unwrap_or(Value::Null);
                Ok(serde_json::from_value(data)?)
            }
            other => Ok(serde_json::from_value(other)?),
        }
    }
}
