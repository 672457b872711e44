pub mod client;
pub mod container;
pub mod error;
pub mod gateway;
pub mod guest;
pub mod network;
pub mod node;
pub mod path;
pub mod snapshot;
pub mod storage;
pub mod vm;

pub use client::{ConnectionSettings, ProxmoxClient, TaskHandle};
pub use error::{ProxmoxError, Result as PveResult};
pub use gateway::ProxmoxGateway;
pub use guest::GuestKind;
