//! Plugin system for the document consumption pipeline.
//!
//! The host selects a parser per document by MIME type; this module carries
//! the contract that selection runs on:
//!
//! - [`Plugin`] - base trait: identity and lifecycle
//! - [`DocumentParser`] - thumbnail + text extraction entry points
//! - [`registry`] - weight-arbitrated MIME type lookup
//!
//! Parsers are stored in `Arc<dyn DocumentParser>` and accessed concurrently,
//! so implementations must be `Send + Sync` and keep mutable state behind
//! interior mutability.

pub mod registry;

mod parser;
mod traits;

pub use parser::{DocumentParser, clear_parsers, list_parsers, register_parser, unregister_parser};
pub use traits::Plugin;
