use crate::cli::Args;
use crate::proxmox::client::DEFAULT_PORT;
use crate::proxmox::ConnectionSettings;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "https://localhost:8006";
pub const DEFAULT_USER: &str = "root@pam";
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerType {
    #[default]
    Stdio,
    Http,
}

impl FromStr for ServerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Ok(ServerType::Stdio),
            "http" => Ok(ServerType::Http),
            other => Err(format!(
                "Unknown server type '{}' (expected stdio or http)",
                other
            )),
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerType::Stdio => write!(f, "stdio"),
            ServerType::Http => write!(f, "http"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub token_name: Option<String>,
    pub token_value: Option<String>,
    pub verify_ssl: Option<bool>,
    pub server_type: Option<String>,
    pub http_host: Option<String>,
    pub http_port: Option<u16>,
    pub http_auth_token: Option<String>,
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut s = Config::builder();

        // An explicitly named file must exist; the default one is optional.
        if let Some(path) = config_path {
            s = s.add_source(File::with_name(path).required(true));
        } else {
            s = s.add_source(File::with_name("config").required(false));
        }

        // PROXMOX_TOKEN_NAME -> token_name. No separator, keys stay flat.
        s = s.add_source(Environment::with_prefix("PROXMOX").try_parsing(true));

        s.build()?.try_deserialize()
    }

    /// Command line values win over file and environment values.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = &args.host {
            self.host = Some(host.clone());
        }
        if let Some(port) = args.port {
            self.port = Some(port);
        }
        if let Some(user) = &args.user {
            self.user = Some(user.clone());
        }
        if let Some(token_name) = &args.token_name {
            self.token_name = Some(token_name.clone());
        }
        if let Some(token_value) = &args.token_value {
            self.token_value = Some(token_value.clone());
        }
        // A false flag keeps whatever the file said.
        if args.verify_ssl {
            self.verify_ssl = Some(true);
        }
        if let Some(server_type) = &args.server_type {
            self.server_type = Some(server_type.clone());
        }
        if let Some(http_host) = &args.http_host {
            self.http_host = Some(http_host.clone());
        }
        if let Some(http_port) = args.http_port {
            self.http_port = Some(http_port);
        }
        if let Some(token) = &args.http_auth_token {
            self.http_auth_token = Some(token.clone());
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.server_type()?;
        if let Some(host) = &self.host {
            if host.trim().is_empty() {
                return Err("Host must not be empty".to_string());
            }
        }
        Ok(())
    }

    pub fn server_type(&self) -> Result<ServerType, String> {
        match self.server_type.as_deref() {
            None | Some("") => Ok(ServerType::Stdio),
            Some(s) => s.parse(),
        }
    }

    pub fn http_addr(&self) -> String {
        format!(
            "{}:{}",
            non_empty(&self.http_host).unwrap_or(DEFAULT_HTTP_HOST),
            self.http_port.unwrap_or(DEFAULT_HTTP_PORT)
        )
    }

    pub fn http_auth_token(&self) -> Option<String> {
        non_empty(&self.http_auth_token).map(String::from)
    }

    pub fn has_api_token(&self) -> bool {
        non_empty(&self.token_name).is_some() && non_empty(&self.token_value).is_some()
    }

    /// Resolves the backend address. An explicit port beats one embedded in
    /// the host, which beats 8006.
    pub fn connection(&self) -> ConnectionSettings {
        let raw = non_empty(&self.host).unwrap_or(DEFAULT_HOST);
        let (host, embedded_port) = split_host_port(raw);

        ConnectionSettings {
            host,
            port: self.port.or(embedded_port).unwrap_or(DEFAULT_PORT),
            user: non_empty(&self.user).unwrap_or(DEFAULT_USER).to_string(),
            token_name: non_empty(&self.token_name).map(String::from),
            token_value: non_empty(&self.token_value).map(String::from),
            verify_ssl: self.verify_ssl.unwrap_or(false),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `https://pve:8006/` -> (`https://pve`, Some(8006)). The scheme is kept.
fn split_host_port(raw: &str) -> (String, Option<u16>) {
    let trimmed = raw.trim_end_matches('/');
    let (scheme, rest) = match trimmed.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, trimmed),
    };

    let (name, port) = match rest.rsplit_once(':') {
        Some((name, port)) if !name.is_empty() && !name.contains(':') => {
            match port.parse::<u16>() {
                Ok(p) => (name, Some(p)),
                Err(_) => (rest, None),
            }
        }
        _ => (rest, None),
    };

    let host = match scheme {
        Some(scheme) => format!("{}://{}", scheme, name),
        None => name.to_string(),
    };
    (host, port)
}
