//! Docker Compose file parser

use super::config::{ComposeSpec, DockerCompose};
use crate::error::{ComposeError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default compose file names
pub const DEFAULT_COMPOSE_FILES: &[&str] = &[
    "compose.yaml",
    "compose.yml",
    "docker-compose.yaml",
    "docker-compose.yml",
];

/// Serialization format for compose documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(ComposeError::ComposeParse(format!(
                "Unknown format '{}' (expected yaml or json)",
                other
            ))),
        }
    }
}

/// Compose file parser
pub struct ComposeParser;

impl ComposeParser {
    /// Find compose file in directory
    pub fn find_compose_file(dir: &Path) -> Option<PathBuf> {
        DEFAULT_COMPOSE_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Parse compose file from path. `.json` files are read as JSON,
    /// anything else as YAML.
    pub fn parse_file(path: &Path) -> Result<DockerCompose> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ComposeError::ComposeParse(format!("Failed to read file: {}", e)))?;

        tracing::debug!("Parsing compose file {}", path.display());
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&content),
            _ => Self::parse_str(&content),
        }
    }

    /// Parse compose document from YAML (or JSON) text
    pub fn parse_str(content: &str) -> Result<DockerCompose> {
        let spec: ComposeSpec = serde_yaml::from_str(content)
            .map_err(|e| ComposeError::ComposeParse(format!("Failed to parse YAML: {}", e)))?;
        DockerCompose::try_from(spec)
    }

    /// Parse compose document from JSON text
    pub fn parse_json(content: &str) -> Result<DockerCompose> {
        let spec: ComposeSpec = serde_json::from_str(content)
            .map_err(|e| ComposeError::ComposeParse(format!("Failed to parse JSON: {}", e)))?;
        DockerCompose::try_from(spec)
    }

    /// Emit a document as YAML
    pub fn to_yaml(compose: &DockerCompose) -> Result<String> {
        serde_yaml::to_string(compose).map_err(|e| ComposeError::Yaml(e.to_string()))
    }

    /// Emit a document as pretty-printed JSON
    pub fn to_json(compose: &DockerCompose) -> Result<String> {
        Ok(serde_json::to_string_pretty(compose)?)
    }

    /// Emit a document in the given format
    pub fn render(compose: &DockerCompose, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Yaml => Self::to_yaml(compose),
            OutputFormat::Json => Self::to_json(compose),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::config::Build;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_compose() {
        let yaml = r#"
version: "3.8"
services:
  web:
    image: nginx:latest
    ports:
      - "8080:80"
  db:
    build: ~
    image: postgres:13
    environment:
      POSTGRES_PASSWORD: secret
"#;

        let config = ComposeParser::parse_str(yaml).unwrap();
        assert_eq!(config.version, "3.8");
        assert_eq!(config.services.len(), 2);

        let web = config.service("web").unwrap();
        assert_eq!(web.ports(), Some(&["8080:80".to_string()][..]));
        assert_eq!(web.build(), Some(&Build::default()));

        let db = config.service("db").unwrap();
        assert!(db.build().is_none());
        assert_eq!(db.environment().unwrap()["POSTGRES_PASSWORD"], "secret");
        assert_eq!(config.network("app_network").unwrap().driver, "bridge");
    }

    #[test]
    fn test_parse_missing_build_and_image() {
        let yaml = r#"
services:
  web:
    build: null
    image: null
    ports:
      - "80:80"
"#;

        let err = ComposeParser::parse_str(yaml).unwrap_err();
        assert!(err.is_validation());
        assert!(err
            .to_string()
            .contains("one of the build or image sections must be present!"));
    }

    #[test]
    fn test_parse_wrong_shape_is_parse_error() {
        let yaml = r#"
services:
  web:
    volumes: "./data:/data"
"#;

        let err = ComposeParser::parse_str(yaml).unwrap_err();
        assert!(matches!(err, ComposeError::ComposeParse(_)));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"version": "3", "services": {"api": {"build": {"context": "./api"}, "image": null}}}"#;
        let config = ComposeParser::parse_json(json).unwrap();
        let api = config.service("api").unwrap();
        assert_eq!(api.build().unwrap().context, "./api");
        assert!(api.image().is_none());
    }

    #[test]
    fn test_yaml_round_trip() {
        let original = ComposeParser::parse_str(
            r#"
services:
  cache:
    build: null
    image: redis:7
    networks: null
networks:
  backend:
    driver: overlay
"#,
        )
        .unwrap();

        let yaml = ComposeParser::to_yaml(&original).unwrap();
        let again = ComposeParser::parse_str(&yaml).unwrap();
        assert_eq!(again, original);
    }

    #[test]
    fn test_default_document_round_trip() {
        let defaults = DockerCompose::default();
        for format in [OutputFormat::Yaml, OutputFormat::Json] {
            let text = ComposeParser::render(&defaults, format).unwrap();
            let again = ComposeParser::parse_str(&text).unwrap();
            assert_eq!(again, defaults);
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("yaml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("YML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("toml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_find_and_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ComposeParser::find_compose_file(dir.path()).is_none());

        let path = dir.path().join("docker-compose.yml");
        std::fs::write(&path, "services:\n  web:\n    image: nginx:alpine\n").unwrap();

        let found = ComposeParser::find_compose_file(dir.path()).unwrap();
        assert_eq!(found, path);

        let config = ComposeParser::parse_file(&found).unwrap();
        assert_eq!(config.service("web").unwrap().image(), Some("nginx:alpine"));
    }

    #[test]
    fn test_parse_json_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.json");
        std::fs::write(&path, r#"{"services": {"web": {"image": null}}}"#).unwrap();

        let config = ComposeParser::parse_file(&path).unwrap();
        assert!(config.service("web").unwrap().image().is_none());
    }

    #[test]
    fn test_parse_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ComposeParser::parse_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ComposeError::ComposeParse(_)));
    }
}
