use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file path
    #[arg(short, long, env = "PROXMOX_CONFIG")]
    pub config: Option<String>,

    /// Proxmox Host, optionally with scheme and port (e.g., https://192.168.1.10:8006)
    #[arg(short = 'H', long, env = "PROXMOX_HOST")]
    pub host: Option<String>,

    /// Proxmox Port (default: 8006)
    #[arg(short = 'p', long, env = "PROXMOX_PORT")]
    pub port: Option<u16>,

    /// Proxmox User owning the API token (default: root@pam)
    #[arg(short = 'u', long, env = "PROXMOX_USER")]
    pub user: Option<String>,

    /// API Token Name (e.g., mytoken)
    #[arg(short = 'n', long, env = "PROXMOX_TOKEN_NAME")]
    pub token_name: Option<String>,

    /// API Token Value (UUID)
    #[arg(short = 'v', long, env = "PROXMOX_TOKEN_VALUE", hide_env_values = true)]
    pub token_value: Option<String>,

    /// Verify the Proxmox TLS certificate (off by default for self-signed certs)
    #[arg(short = 'k', long, env = "PROXMOX_VERIFY_SSL", default_value_t = false)]
    pub verify_ssl: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short = 'L', long, env = "PROXMOX_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable logging to a file
    #[arg(long, env = "PROXMOX_LOG_FILE_ENABLE", default_value_t = false)]
    pub log_file_enable: bool,

    /// Log file directory
    #[arg(long, env = "PROXMOX_LOG_DIR", default_value = ".")]
    pub log_dir: String,

    /// Log filename prefix
    #[arg(long, env = "PROXMOX_LOG_FILENAME", default_value = "pve-mcp.log")]
    pub log_filename: String,

    /// Log rotation strategy (daily, hourly, never)
    #[arg(long, env = "PROXMOX_LOG_ROTATE", default_value = "daily")]
    pub log_rotate: String,

    /// Server type (stdio or http)
    #[arg(short = 't', long, env = "PROXMOX_SERVER_TYPE")]
    pub server_type: Option<String>,

    /// HTTP Host (only for http type)
    #[arg(long, env = "PROXMOX_HTTP_HOST")]
    pub http_host: Option<String>,

    /// HTTP Port (only for http type)
    #[arg(short = 'l', long, env = "PROXMOX_HTTP_PORT")]
    pub http_port: Option<u16>,

    /// HTTP Auth Token (only for http type)
    #[arg(long, env = "PROXMOX_HTTP_AUTH_TOKEN", hide_env_values = true)]
    pub http_auth_token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// The shell to generate the script for
        #[arg(value_enum)]
        shell: Shell,
    },
}
