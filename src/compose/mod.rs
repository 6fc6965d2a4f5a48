//! Docker Compose compatible data model
//!
//! This module provides the validated compose document types and the
//! parser that loads and emits them.

pub mod config;
pub mod parser;

pub use config::{Build, ComposeSpec, DockerCompose, Network, Service, ServiceSpec};
pub use parser::{ComposeParser, OutputFormat};
