//! Loading and persisting the configuration document.
//!
//! Writes go through a sibling `.tmp` file that is renamed into place, so
//! a crash mid-write never leaves a truncated document. Concurrent
//! invocations against the same file are not arbitrated: the last writer
//! wins.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::StoreError;
use crate::types::Configuration;

/// Load a configuration from a file.
pub fn load(path: &Path) -> Result<Configuration, StoreError> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

/// Parse a configuration from YAML text.
///
/// An empty document parses to the empty configuration; everything else
/// must be a valid `namespaces` document.
pub fn parse(content: &str) -> Result<Configuration, StoreError> {
    if content.trim().is_empty() {
        return Ok(Configuration::default());
    }
    serde_yaml::from_str(content).map_err(|e| StoreError::Parse(e.to_string()))
}

/// Serialize a configuration to YAML text.
pub fn serialize(config: &Configuration) -> Result<String, StoreError> {
    serde_yaml::to_string(config).map_err(|e| StoreError::Parse(e.to_string()))
}

/// Serialize and overwrite the file at `path` atomically.
pub fn save(path: &Path, config: &Configuration) -> Result<(), StoreError> {
    let content = serialize(config)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Agent, Controller, Microservice, Namespace};

    fn make_temp_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fleetcfg_file_{}_{}", std::process::id(), suffix
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_config() -> Configuration {
        Configuration {
            namespaces: vec![
                Namespace {
                    name: "default".into(),
                    controllers: vec![Controller {
                        name: "ctrl1".into(),
                        user: "admin".into(),
                        host: "10.0.0.1".into(),
                        key_file: "/keys/ctrl1".into(),
                        kube_config: "/kube/config".into(),
                    }],
                    agents: vec![
                        Agent {
                            name: "a1".into(),
                            user: "edge".into(),
                            host: "10.0.1.1".into(),
                            key_file: "/keys/a1".into(),
                        },
                        Agent {
                            name: "a2".into(),
                            user: "edge".into(),
                            host: "10.0.1.2".into(),
                            key_file: "/keys/a2".into(),
                        },
                    ],
                    microservices: vec![Microservice {
                        name: "detector".into(),
                        flow: "video".into(),
                    }],
                },
                Namespace::new("staging"),
            ],
        }
    }

    #[test]
    fn parse_full_document() {
        let yaml = "\
namespaces:
  - name: default
    controllers:
      - name: ctrl1
        user: admin
        host: 10.0.0.1
        keyFile: /keys/ctrl1
        kubeConfig: /kube/config
    agents:
      - name: a1
        user: edge
        host: 10.0.1.1
        keyFile: /keys/a1
    microservices:
      - name: detector
        flow: video
  - name: staging
";
        let cfg = parse(yaml).unwrap();
        assert_eq!(cfg.namespaces.len(), 2);
        let ns = &cfg.namespaces[0];
        assert_eq!(ns.name, "default");
        assert_eq!(ns.controllers[0].kube_config, "/kube/config");
        assert_eq!(ns.agents[0].key_file, "/keys/a1");
        assert_eq!(ns.microservices[0].flow, "video");
        assert!(cfg.namespaces[1].controllers.is_empty());
    }

    #[test]
    fn parse_empty_document() {
        assert_eq!(parse("").unwrap(), Configuration::default());
        assert_eq!(parse("  \n\n").unwrap(), Configuration::default());
    }

    #[test]
    fn parse_invalid_yaml_fails() {
        let result = parse("namespaces: [not: closed");
        assert!(matches!(result, Err(StoreError::Parse(_))));
    }

    #[test]
    fn load_missing_file_errors() {
        let result = load(Path::new("/nonexistent/fleetcfg_xyz"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = make_temp_dir("round_trip");
        let path = dir.join("config.yaml");

        let original = sample_config();
        save(&path, &original).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, original);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_leaves_no_tmp_file() {
        let dir = make_temp_dir("no_tmp");
        let path = dir.join("config.yaml");

        save(&path, &sample_config()).unwrap();
        assert!(path.is_file());
        assert!(!tmp_path(&path).exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_overwrites_existing() {
        let dir = make_temp_dir("overwrite");
        let path = dir.join("config.yaml");

        save(&path, &sample_config()).unwrap();
        let mut smaller = sample_config();
        smaller.namespaces.truncate(1);
        save(&path, &smaller).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.namespaces.len(), 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn serialized_document_uses_wire_names() {
        let text = serialize(&sample_config()).unwrap();
        assert!(text.starts_with("namespaces:"));
        assert!(text.contains("keyFile:"));
        assert!(text.contains("kubeConfig:"));
    }

    #[test]
    fn empty_config_round_trips() {
        let text = serialize(&Configuration::default()).unwrap();
        let back = parse(&text).unwrap();
        assert_eq!(back, Configuration::default());
    }
}
