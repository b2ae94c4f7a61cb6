//! Application configuration management.

use serde::Deserialize;

use crate::blobstore::StorageProvider;
use crate::validation::FileKind;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Blob-store backend configuration.
    pub storage: StorageProvider,
    /// Content encryption configuration.
    pub crypto: CryptoConfig,
    /// Content validation configuration.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Content encryption configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CryptoConfig {
    /// Base64-encoded 256-bit master key. Acquired once at process start;
    /// the cipher built from it is shared by reference afterwards.
    pub master_key: String,
}

/// Content validation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// File kinds accepted for upload.
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<FileKind>,
    /// Virus scan service endpoint. Scanning is skipped when unset.
    #[serde(default)]
    pub scan_url: Option<String>,
}

fn default_max_file_size() -> u64 {
    16 * 1024 * 1024 // 16 MiB
}

fn default_allowed_types() -> Vec<FileKind> {
    vec![FileKind::Pdf, FileKind::Png, FileKind::Jpeg]
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            allowed_types: default_allowed_types(),
            scan_url: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DEPOT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_defaults() {
        let config = ValidationConfig::default();
        assert_eq!(config.max_file_size, 16 * 1024 * 1024);
        assert_eq!(
            config.allowed_types,
            vec![FileKind::Pdf, FileKind::Png, FileKind::Jpeg]
        );
        assert!(config.scan_url.is_none());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let raw = r#"
            [storage]
            type = "local_fs"
            root = "/tmp/depot"

            [crypto]
            master_key = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="

            [validation]
            max_file_size = 1024
            allowed_types = ["pdf"]
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(matches!(config.storage, StorageProvider::LocalFs { .. }));
        assert_eq!(config.validation.max_file_size, 1024);
        assert_eq!(config.validation.allowed_types, vec![FileKind::Pdf]);
    }
}
