//! Model Context Protocol server exposing Proxmox VE management operations
//! as named tools.

pub mod cli;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod proxmox;
pub mod router;
pub mod settings;
pub mod tools;
