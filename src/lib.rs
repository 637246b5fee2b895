//! localdrop - a LAN content-sharing service
//!
//! Peers on the same network post short text messages and drop files; any
//! peer can list, fetch, and delete them. The crate provides:
//! - Two independent in-memory registries (messages, files) with
//!   monotonic ids and newest-first listing
//! - A flat-directory blob store addressed by generated storage keys,
//!   decoupled from client-supplied filenames
//! - A REST API with multipart upload support
//!
//! State is intentionally volatile; nothing survives a restart.

pub mod api;
pub mod blob_store;
pub mod config;
pub mod registry;

use config::Config;
use registry::{FileRegistry, MessageRegistry};

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub messages: MessageRegistry,
    pub files: FileRegistry,
}
