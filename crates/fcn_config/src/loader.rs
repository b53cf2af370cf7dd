//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{ExactConfig, PortListConfig};
use std::path::Path;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "exact.toml";

/// Loads and validates `<dir>/exact.toml`.
pub fn load_config(dir: &Path) -> Result<ExactConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<ExactConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ExactConfig, ConfigError> {
    let config: ExactConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ExactConfig) -> Result<(), ConfigError> {
    let exact = &config.exact;
    if exact.scheme.trim().is_empty() {
        return Err(ConfigError::MissingField("exact.scheme".to_string()));
    }
    if exact.upper_bound_area == 0 || exact.upper_bound_x == 0 || exact.upper_bound_y == 0 {
        return Err(ConfigError::ValidationError(
            "upper bounds must be positive".to_string(),
        ));
    }
    if exact.num_threads == 0 {
        return Err(ConfigError::ValidationError(
            "num_threads must be at least 1".to_string(),
        ));
    }
    if exact.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "timeout_ms must be positive".to_string(),
        ));
    }
    for entry in &config.blacklist {
        if entry.ports.iter().any(PortListConfig::is_empty) {
            return Err(ConfigError::ValidationError(format!(
                "blacklist entry at ({},{}) has a port list without directions",
                entry.x, entry.y
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GateFunction, PortDirection, Technology, TopologyKind};

    #[test]
    fn empty_file_gives_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.exact.scheme, "2DDWave");
        assert_eq!(config.exact.num_threads, 1);
        assert!(config.exact.io_pins);
        assert!(!config.exact.crossings);
        assert_eq!(config.exact.upper_bound_x, u16::MAX);
        assert_eq!(config.exact.timeout_ms, 4_294_967);
        assert_eq!(config.exact.technology, Technology::None);
        assert!(config.blacklist.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[exact]
scheme = "use"
upper_bound_area = 30
upper_bound_x = 6
upper_bound_y = 5
num_threads = 4
crossings = true
border_io = true
synchronization_elements = true
straight_inverters = true
minimize_wires = true
technology = "topolinano"
topology = "shifted_cartesian"
max_synchronization_delay = 3
timeout_ms = 10000

[[blacklist]]
x = 2
y = 2
function = "and"

[[blacklist]]
x = 1
y = 2
function = "or"
ports = [{ inputs = ["north", "west"], outputs = ["south"] }]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.exact.scheme, "use");
        assert_eq!(config.exact.upper_bound_area, 30);
        assert_eq!(config.exact.num_threads, 4);
        assert!(config.exact.synchronization_elements);
        assert_eq!(config.exact.technology, Technology::Topolinano);
        assert_eq!(config.exact.topology, TopologyKind::ShiftedCartesian);
        assert_eq!(config.blacklist.len(), 2);
        assert_eq!(config.blacklist[0].function, GateFunction::And);
        assert_eq!(
            config.blacklist[1].ports[0].inputs,
            vec![PortDirection::North, PortDirection::West]
        );
    }

    #[test]
    fn empty_scheme_errors() {
        let err = load_config_from_str("[exact]\nscheme = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn zero_threads_errors() {
        let err = load_config_from_str("[exact]\nnum_threads = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_bound_errors() {
        let err = load_config_from_str("[exact]\nupper_bound_y = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_port_list_errors() {
        let toml = r#"
[[blacklist]]
x = 0
y = 0
function = "wire"
ports = [{}]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn unknown_technology_errors() {
        let err = load_config_from_str("[exact]\ntechnology = \"qca\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[exact]\nscheme = \"RES\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.exact.scheme, "RES");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
