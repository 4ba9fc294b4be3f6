//! Configuration structures for the extraction pipeline.
//!
//! API keys are never stored in the config file; they are read from the
//! environment through [`Credentials::from_env`].

use serde::{Deserialize, Serialize};

use crate::error::ErpScanError;

/// Environment variable holding the Document Intelligence key.
pub const AZURE_KEY_VAR: &str = "AZURE_DOCUMENT_INTELLIGENCE_KEY";
/// Environment variable holding the Document Intelligence endpoint.
pub const AZURE_ENDPOINT_VAR: &str = "AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT";
/// Environment variable holding the OpenRouter key.
pub const OPENROUTER_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Main configuration for the erpscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErpScanConfig {
    /// Upload validation.
    pub upload: UploadConfig,

    /// OCR provider configuration.
    pub ocr: OcrConfig,

    /// Text-generation provider configuration.
    pub structuring: StructuringConfig,
}

/// Upload validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Accepted file extensions, lowercase, without the dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["pdf".to_string()],
        }
    }
}

/// OCR provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Service endpoint; overridden by `AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT`.
    pub endpoint: String,

    /// Analysis model.
    pub model_id: String,

    /// REST API version.
    pub api_version: String,

    /// Delay between result polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum number of result polls before giving up.
    pub max_polls: u32,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            model_id: "prebuilt-layout".to_string(),
            api_version: "2024-11-30".to_string(),
            poll_interval_ms: 1000,
            max_polls: 120,
            timeout_secs: 60,
        }
    }
}

/// Text-generation provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuringConfig {
    /// OpenAI-compatible API base URL.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StructuringConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "deepseek/deepseek-r1-0528-qwen3-8b:free".to_string(),
            timeout_secs: 300,
        }
    }
}

impl ErpScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

/// Secrets for the remote providers.
#[derive(Clone)]
pub struct Credentials {
    pub azure_key: String,
    pub azure_endpoint: String,
    pub openrouter_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("azure_key", &"<redacted>")
            .field("azure_endpoint", &self.azure_endpoint)
            .field("openrouter_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// The endpoint falls back to `config.ocr.endpoint`. All missing
    /// variables are reported in a single error.
    pub fn from_env(config: &ErpScanConfig) -> Result<Self, ErpScanError> {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(config: &ErpScanConfig, lookup: F) -> Result<Self, ErpScanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let azure_key = get(AZURE_KEY_VAR);
        let azure_endpoint = get(AZURE_ENDPOINT_VAR).or_else(|| {
            Some(config.ocr.endpoint.clone()).filter(|e| !e.trim().is_empty())
        });
        let openrouter_key = get(OPENROUTER_KEY_VAR);

        let mut missing = Vec::new();
        if azure_key.is_none() {
            missing.push(AZURE_KEY_VAR);
        }
        if azure_endpoint.is_none() {
            missing.push(AZURE_ENDPOINT_VAR);
        }
        if openrouter_key.is_none() {
            missing.push(OPENROUTER_KEY_VAR);
        }

        match (azure_key, azure_endpoint, openrouter_key) {
            (Some(azure_key), Some(azure_endpoint), Some(openrouter_key)) => Ok(Self {
                azure_key,
                azure_endpoint,
                openrouter_key,
            }),
            _ => Err(ErpScanError::Config(format!(
                "missing environment variables: {}",
                missing.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ErpScanConfig::default();
        assert_eq!(config.upload.allowed_extensions, vec!["pdf"]);
        assert_eq!(config.ocr.model_id, "prebuilt-layout");
        assert_eq!(config.structuring.base_url, "https://openrouter.ai/api/v1");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ErpScanConfig =
            serde_json::from_str(r#"{"ocr": {"max_polls": 5}}"#).unwrap();
        assert_eq!(config.ocr.max_polls, 5);
        assert_eq!(config.ocr.model_id, "prebuilt-layout");
        assert_eq!(config.upload.allowed_extensions, vec!["pdf"]);
    }

    #[test]
    fn test_credentials_all_present() {
        let config = ErpScanConfig::default();
        let creds = Credentials::from_lookup(
            &config,
            lookup(&[
                (AZURE_KEY_VAR, "k"),
                (AZURE_ENDPOINT_VAR, "https://example.cognitiveservices.azure.com"),
                (OPENROUTER_KEY_VAR, "o"),
            ]),
        )
        .unwrap();
        assert_eq!(creds.azure_endpoint, "https://example.cognitiveservices.azure.com");
        assert!(!format!("{:?}", creds).contains("\"k\""));
    }

    #[test]
    fn test_credentials_endpoint_from_config() {
        let mut config = ErpScanConfig::default();
        config.ocr.endpoint = "https://configured.example".to_string();
        let creds = Credentials::from_lookup(
            &config,
            lookup(&[(AZURE_KEY_VAR, "k"), (OPENROUTER_KEY_VAR, "o")]),
        )
        .unwrap();
        assert_eq!(creds.azure_endpoint, "https://configured.example");
    }

    #[test]
    fn test_credentials_reports_all_missing() {
        let config = ErpScanConfig::default();
        let err = Credentials::from_lookup(&config, lookup(&[(AZURE_KEY_VAR, "  ")])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(AZURE_KEY_VAR));
        assert!(message.contains(AZURE_ENDPOINT_VAR));
        assert!(message.contains(OPENROUTER_KEY_VAR));
    }
}
