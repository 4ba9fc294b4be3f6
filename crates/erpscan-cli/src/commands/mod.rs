//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;
pub mod parse;

use erpscan_core::ErpScanConfig;

/// Load the config from an explicit path, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ErpScanConfig> {
    if let Some(path) = config_path {
        return Ok(ErpScanConfig::from_file(std::path::Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(ErpScanConfig::from_file(&default_path)?)
    } else {
        Ok(ErpScanConfig::default())
    }
}
