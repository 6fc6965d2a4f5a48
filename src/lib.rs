//! compose-model - Validated Docker Compose style documents
//!
//! This crate models the shape of a compose document (services, builds and
//! networks) and enforces the one rule that ties them together:
//!
//! - Every service must name a build context, an image, or both
//! - A document is only constructed when all of its services are valid
//! - Documents load from and emit to YAML or JSON

pub mod compose;
pub mod error;

pub use compose::{
    Build, ComposeParser, ComposeSpec, DockerCompose, Network, OutputFormat, Service, ServiceSpec,
};
pub use error::{ComposeError, Result};
