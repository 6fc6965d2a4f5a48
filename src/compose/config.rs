//! Docker Compose configuration types
//!
//! Unvalidated field bags ([`ServiceSpec`], [`ComposeSpec`]) deserialize with
//! per-field defaults. Validated records ([`Service`], [`DockerCompose`]) can
//! only be obtained by passing those bags through the build/image check.

use crate::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default compose version tag
pub const DEFAULT_VERSION: &str = "3";

/// Default network name
pub const DEFAULT_NETWORK: &str = "app_network";

/// Build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Build {
    /// Build context directory
    pub context: String,
    /// Dockerfile path, relative to the context
    pub dockerfile: String,
}

impl Default for Build {
    fn default() -> Self {
        Self {
            context: ".".to_string(),
            dockerfile: "DockerFile".to_string(),
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    /// Driver
    pub driver: String,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            driver: "bridge".to_string(),
        }
    }
}

/// Service fields before validation.
///
/// Omitted fields take their default; a field explicitly set to `null`
/// is absent (`None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSpec {
    /// Build configuration
    pub build: Option<Build>,
    /// Image name
    pub image: Option<String>,
    /// Container name
    pub container_name: Option<String>,
    /// Command to run
    pub command: Option<String>,
    /// Volume mounts (host:container)
    pub volumes: Option<Vec<String>>,
    /// Environment variables
    pub environment: Option<BTreeMap<String, String>>,
    /// Port mappings (host:container)
    pub ports: Option<Vec<String>>,
    /// Networks to connect to
    pub networks: Option<Vec<String>>,
    /// Build arguments
    pub args: Option<BTreeMap<String, String>>,
    /// Service dependencies
    pub depends_on: Option<Vec<String>>,
}

impl Default for ServiceSpec {
    fn default() -> Self {
        Self {
            build: Some(Build::default()),
            image: Some("nginx:latest".to_string()),
            container_name: Some("web_server".to_string()),
            command: Some("command...".to_string()),
            volumes: Some(vec!["./foo:bar".to_string()]),
            environment: Some(sample_map()),
            ports: Some(vec!["80:80".to_string()]),
            networks: Some(vec![DEFAULT_NETWORK.to_string()]),
            args: Some(sample_map()),
            depends_on: Some(vec!["service 0".to_string()]),
        }
    }
}

fn sample_map() -> BTreeMap<String, String> {
    BTreeMap::from([("foo".to_string(), "bar".to_string())])
}

impl ServiceSpec {
    /// A spec with every field absent. Not valid on its own: set `build`
    /// or `image` before validating.
    pub fn empty() -> Self {
        Self {
            build: None,
            image: None,
            container_name: None,
            command: None,
            volumes: None,
            environment: None,
            ports: None,
            networks: None,
            args: None,
            depends_on: None,
        }
    }

    /// Check the build/image rule. Both may be present; only both absent fails.
    pub fn validate(&self) -> Result<()> {
        if self.build.is_none() && self.image.is_none() {
            return Err(ComposeError::MissingBuildOrImage);
        }
        Ok(())
    }
}

/// Validated service configuration.
///
/// Holds at least one of `build` or `image` for its whole lifetime: every
/// constructor and mutator re-runs [`ServiceSpec::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ServiceSpec", into = "ServiceSpec")]
pub struct Service {
    spec: ServiceSpec,
}

impl Service {
    /// Validate a spec into a service
    pub fn new(spec: ServiceSpec) -> Result<Self> {
        if let Err(e) = spec.validate() {
            tracing::warn!("Rejected service configuration: {}", e);
            return Err(e);
        }
        tracing::debug!(
            "Validated service (build: {}, image: {:?})",
            spec.build.is_some(),
            spec.image
        );
        Ok(Self { spec })
    }

    /// Build a service from a field-name to value mapping.
    ///
    /// Shape errors are reported as [`ComposeError::ComposeParse`], the
    /// build/image rule as [`ComposeError::MissingBuildOrImage`].
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let spec: ServiceSpec = serde_json::from_value(value)
            .map_err(|e| ComposeError::ComposeParse(format!("Invalid service: {}", e)))?;
        Self::new(spec)
    }

    /// Build configuration
    pub fn build(&self) -> Option<&Build> {
        self.spec.build.as_ref()
    }

    /// Image name
    pub fn image(&self) -> Option<&str> {
        self.spec.image.as_deref()
    }

    pub fn container_name(&self) -> Option<&str> {
        self.spec.container_name.as_deref()
    }

    pub fn command(&self) -> Option<&str> {
        self.spec.command.as_deref()
    }

    pub fn volumes(&self) -> Option<&[String]> {
        self.spec.volumes.as_deref()
    }

    pub fn environment(&self) -> Option<&BTreeMap<String, String>> {
        self.spec.environment.as_ref()
    }

    pub fn ports(&self) -> Option<&[String]> {
        self.spec.ports.as_deref()
    }

    /// Network names. Not checked against the document's networks.
    pub fn networks(&self) -> Option<&[String]> {
        self.spec.networks.as_deref()
    }

    pub fn args(&self) -> Option<&BTreeMap<String, String>> {
        self.spec.args.as_ref()
    }

    /// Service dependencies. Not checked against the document's services.
    pub fn depends_on(&self) -> Option<&[String]> {
        self.spec.depends_on.as_deref()
    }

    /// Borrow all fields
    pub fn spec(&self) -> &ServiceSpec {
        &self.spec
    }

    /// Give back the fields
    pub fn into_spec(self) -> ServiceSpec {
        self.spec
    }

    /// Apply an edit and re-validate. On failure the service is unchanged.
    pub fn update<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut ServiceSpec),
    {
        let mut spec = self.spec.clone();
        edit(&mut spec);
        spec.validate()?;
        self.spec = spec;
        Ok(())
    }

    /// Replace the build section
    pub fn set_build(&mut self, build: Option<Build>) -> Result<()> {
        self.update(|spec| spec.build = build)
    }

    /// Replace the image
    pub fn set_image(&mut self, image: Option<String>) -> Result<()> {
        self.update(|spec| spec.image = image)
    }
}

impl Default for Service {
    fn default() -> Self {
        // The default spec always carries both build and image.
        Self {
            spec: ServiceSpec::default(),
        }
    }
}

impl TryFrom<ServiceSpec> for Service {
    type Error = ComposeError;

    fn try_from(spec: ServiceSpec) -> Result<Self> {
        Self::new(spec)
    }
}

impl From<Service> for ServiceSpec {
    fn from(service: Service) -> Self {
        service.spec
    }
}

/// Compose document fields before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeSpec {
    /// Compose file version
    pub version: String,
    /// Services
    pub services: BTreeMap<String, ServiceSpec>,
    /// Networks
    pub networks: Option<BTreeMap<String, Network>>,
}

impl Default for ComposeSpec {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            services: BTreeMap::from([
                ("web".to_string(), ServiceSpec::default()),
                ("web2".to_string(), ServiceSpec::default()),
            ]),
            networks: Some(default_networks()),
        }
    }
}

fn default_networks() -> BTreeMap<String, Network> {
    BTreeMap::from([(DEFAULT_NETWORK.to_string(), Network::default())])
}

/// Docker Compose document
///
/// Every service in `services` is a validated [`Service`], so a document
/// cannot hold a service lacking both build and image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ComposeSpec")]
pub struct DockerCompose {
    /// Compose file version
    pub version: String,
    /// Services
    pub services: BTreeMap<String, Service>,
    /// Networks
    pub networks: Option<BTreeMap<String, Network>>,
}

impl DockerCompose {
    /// Validate services in iteration order, stopping at the first invalid one.
    ///
    /// A repeated name replaces the earlier entry.
    pub fn new<I, K>(
        version: impl Into<String>,
        services: I,
        networks: Option<BTreeMap<String, Network>>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, ServiceSpec)>,
        K: Into<String>,
    {
        let mut validated = BTreeMap::new();
        for (name, spec) in services {
            let name = name.into();
            let service = Service::new(spec).map_err(|e| e.in_service(&name))?;
            validated.insert(name, service);
        }

        let version = version.into();
        tracing::debug!(
            "Validated compose document version {} with {} services",
            version,
            validated.len()
        );

        Ok(Self {
            version,
            services: validated,
            networks,
        })
    }

    /// Build a document from a field-name to value mapping
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let spec: ComposeSpec = serde_json::from_value(value)
            .map_err(|e| ComposeError::ComposeParse(format!("Invalid compose document: {}", e)))?;
        Self::try_from(spec)
    }

    /// Look up a service by name
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.get(name)
    }

    /// Look up a network by name
    pub fn network(&self, name: &str) -> Option<&Network> {
        self.networks.as_ref().and_then(|n| n.get(name))
    }

    /// Give back the unvalidated fields
    pub fn into_spec(self) -> ComposeSpec {
        ComposeSpec {
            version: self.version,
            services: self
                .services
                .into_iter()
                .map(|(name, service)| (name, service.into_spec()))
                .collect(),
            networks: self.networks,
        }
    }
}

impl Default for DockerCompose {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            services: BTreeMap::from([
                ("web".to_string(), Service::default()),
                ("web2".to_string(), Service::default()),
            ]),
            networks: Some(default_networks()),
        }
    }
}

impl TryFrom<ComposeSpec> for DockerCompose {
    type Error = ComposeError;

    fn try_from(spec: ComposeSpec) -> Result<Self> {
        Self::new(spec.version, spec.services, spec.networks)
    }
}
