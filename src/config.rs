//! Service configuration.
//!
//! Loaded from TOML, then overridden by `ONTOQUERY_*` environment variables,
//! then by command-line flags. Every field has a default, so an empty file
//! (or no file at all) is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::oracle::OracleSettings;
use crate::transport::DEFAULT_MAX_FRAME_BYTES;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Ontology document to load.
    pub ontology: PathBuf,
    /// Entity namespace. Derived from the ontology IRI when absent.
    pub namespace: Option<String>,
    /// Preferred language tag for labels and comments.
    pub language: String,
    /// Attribute whose first value labels an individual.
    pub name_attribute: String,
    pub bind: String,
    pub port: u16,
    /// Largest accepted request frame in bytes.
    pub max_frame_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            ontology: PathBuf::from("ontology.owl"),
            namespace: None,
            language: "vi".into(),
            name_attribute: "name".into(),
            bind: "127.0.0.1".into(),
            port: 2002,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl ServiceConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(path) = lookup("ONTOQUERY_ONTOLOGY") {
            self.ontology = PathBuf::from(path);
        }
        if let Some(bind) = lookup("ONTOQUERY_BIND") {
            self.bind = bind;
        }
        if let Some(port) = lookup("ONTOQUERY_PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "port".into(),
                message: format!("ONTOQUERY_PORT is not a port number: {port}"),
            })?;
        }
        if let Some(language) = lookup("ONTOQUERY_LANGUAGE") {
            self.language = language;
        }
        if let Some(name) = lookup("ONTOQUERY_NAME_ATTRIBUTE") {
            self.name_attribute = name;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(invalid("port", "must be non-zero"));
        }
        if self.name_attribute.trim().is_empty() {
            return Err(invalid("name_attribute", "must not be empty"));
        }
        if self.max_frame_bytes == 0 {
            return Err(invalid("max_frame_bytes", "must be non-zero"));
        }
        Ok(())
    }

    /// `bind:port` as a listen address.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn oracle_settings(&self) -> OracleSettings {
        OracleSettings {
            namespace: self.namespace.clone(),
            language: self.language.clone(),
        }
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.into(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.listen_addr(), "127.0.0.1:2002");
        assert_eq!(config.oracle_settings().language, "vi");
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [
            ("ONTOQUERY_PORT", "9000"),
            ("ONTOQUERY_NAME_ATTRIBUTE", "ten"),
            ("ONTOQUERY_ONTOLOGY", "/srv/rice.owl"),
        ]
        .into();
        let mut config = ServiceConfig::default();
        config
            .apply_env_from(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.name_attribute, "ten");
        assert_eq!(config.ontology, PathBuf::from("/srv/rice.owl"));
        assert_eq!(config.bind, "127.0.0.1");
    }

    #[test]
    fn bad_port_in_env() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_env_from(|k| (k == "ONTOQUERY_PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "port"));
    }

    #[test]
    fn validation_rejects_zeroes() {
        let config = ServiceConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServiceConfig {
            name_attribute: " ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServiceConfig {
            max_frame_bytes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
