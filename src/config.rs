// src/config.rs - TOML configuration for the dispatch service
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::PrinterStatus;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Top-level configuration: web server, simulated executor, and the
/// printer inventory seeded at startup.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub printers: Vec<PrinterSeed>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutorConfig {
    /// Simulated per-document print time in milliseconds.
    #[serde(default = "default_print_latency_ms")]
    pub print_latency_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            print_latency_ms: default_print_latency_ms(),
        }
    }
}

/// One printer created in the registry at startup. Seeded printers
/// always start idle; a stale busy flag from a previous run must not
/// wedge the printer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrinterSeed {
    pub id: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_printer_status")]
    pub status: PrinterStatus,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_print_latency_ms() -> u64 {
    10_000
}

fn default_printer_status() -> PrinterStatus {
    PrinterStatus::Enabled
}

pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::error!("Failed to parse config TOML: {}", e);
                Err(ConfigError::Toml(e))
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            Err(ConfigError::Io(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.executor.print_latency_ms, 10_000);
        assert!(config.printers.is_empty());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("printhub.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(
            file,
            r#"
[server]
bind = "127.0.0.1:8080"

[executor]
print_latency_ms = 250

[[printers]]
id = "printer-001"
brand_name = "HP"
model = "LaserJet Pro M404dn"
status = "ENABLED"

[[printers]]
id = "printer-002"
status = "MAINTENANCE"
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = load_config(file_path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.executor.print_latency_ms, 250);
        assert_eq!(config.printers.len(), 2);
        assert_eq!(config.printers[0].id, "printer-001");
        assert_eq!(config.printers[0].status, PrinterStatus::Enabled);
        assert_eq!(config.printers[1].status, PrinterStatus::Maintenance);
        assert!(config.printers[1].brand_name.is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/printhub.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "not a valid toml").unwrap();
        file.flush().unwrap();
        let result = load_config(file_path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}
