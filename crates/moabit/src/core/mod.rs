//! Core functionality: configuration, MIME tables, and the side file.

pub mod config;
pub mod mime;
pub mod sidecar;
pub mod table;
