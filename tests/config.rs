//! Configuration loading from TOML files.

use std::io::Write;
use std::path::PathBuf;

use ontoquery::config::ServiceConfig;
use ontoquery::error::ConfigError;

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn partial_file_keeps_defaults() {
    let file = write_config(
        r#"
ontology = "/srv/ontology/rice.owl"
port = 3003
name_attribute = "ten"
"#,
    );
    let config = ServiceConfig::load(file.path()).unwrap();
    assert_eq!(config.ontology, PathBuf::from("/srv/ontology/rice.owl"));
    assert_eq!(config.port, 3003);
    assert_eq!(config.name_attribute, "ten");
    assert_eq!(config.language, "vi");
    assert_eq!(config.bind, "127.0.0.1");
    assert!(config.namespace.is_none());
    config.validate().unwrap();
}

#[test]
fn empty_file_is_default() {
    let file = write_config("");
    assert_eq!(
        ServiceConfig::load(file.path()).unwrap(),
        ServiceConfig::default()
    );
}

#[test]
fn namespace_flows_into_oracle_settings() {
    let file = write_config("namespace = \"http://example.org/rice#\"\nlanguage = \"en\"\n");
    let settings = ServiceConfig::load(file.path()).unwrap().oracle_settings();
    assert_eq!(settings.namespace.as_deref(), Some("http://example.org/rice#"));
    assert_eq!(settings.language, "en");
}

#[test]
fn malformed_toml_is_parse_error() {
    let file = write_config("port = \"not a number\"");
    let err = ServiceConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_file_is_read_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = ServiceConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
