//! Content extraction routines.

pub mod text;
