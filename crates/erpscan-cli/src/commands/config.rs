//! Config command - inspect and edit the JSON configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use erpscan_core::models::config::{AZURE_ENDPOINT_VAR, AZURE_KEY_VAR, ErpScanConfig, OPENROUTER_KEY_VAR};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Get a configuration value by dotted key (e.g. "ocr.max_polls")
    Get { key: String },

    /// Set a configuration value by dotted key
    Set { key: String, value: String },

    /// Show configuration file path
    Path,

    /// Check that provider credentials are present in the environment
    Env,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path.map(PathBuf::from).unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                println!("{} No config file found, showing defaults.", style("ℹ").blue());
            }
            println!("{}", serde_json::to_string_pretty(&load_or_default(&path)?)?);
        }
        ConfigCommand::Init { output, force } => init_config(output.unwrap_or(path), force)?,
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(load_or_default(&path)?)?;
            println!("{}", serde_json::to_string_pretty(lookup_key(&json, &key)?)?);
        }
        ConfigCommand::Set { key, value } => {
            let mut json = serde_json::to_value(load_or_default(&path)?)?;
            let parsed = set_key(&mut json, &key, &value)?;
            let config: ErpScanConfig = serde_json::from_value(json)?;

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            config.save(&path)?;
            println!("{} Set {} = {}", style("✓").green(), key, serde_json::to_string(&parsed)?);
        }
        ConfigCommand::Path => {
            println!("Configuration file: {}", path.display());
            if path.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!();
                println!("Run 'erpscan config init' to create a configuration file.");
            }
        }
        ConfigCommand::Env => {
            for name in [AZURE_KEY_VAR, AZURE_ENDPOINT_VAR, OPENROUTER_KEY_VAR] {
                let set = std::env::var(name).is_ok_and(|v| !v.trim().is_empty());
                let status = if set { style("set").green() } else { style("missing").red() };
                println!("{:<40} {}", name, status);
            }
        }
    }

    Ok(())
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("erpscan")
        .join("config.json")
}

fn load_or_default(path: &std::path::Path) -> anyhow::Result<ErpScanConfig> {
    if path.exists() {
        Ok(ErpScanConfig::from_file(path)?)
    } else {
        Ok(ErpScanConfig::default())
    }
}

fn init_config(output_path: PathBuf, force: bool) -> anyhow::Result<()> {
    if output_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    ErpScanConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// Resolve a dotted key inside a JSON object.
fn lookup_key<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(json, |current, part| {
        current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

/// Set a dotted key; the value is parsed as JSON, falling back to a string.
fn set_key(json: &mut Value, key: &str, raw: &str) -> anyhow::Result<Value> {
    let parsed: Value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let (parent_key, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };

    let parent = match parent_key {
        Some(parent_key) => parent_key.split('.').try_fold(&mut *json, |current, part| {
            current
                .get_mut(part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))
        })?,
        None => json,
    };

    let object = parent
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path"))?;
    if !object.contains_key(leaf) {
        anyhow::bail!("Configuration key not found: {}", key);
    }
    object.insert(leaf.to_string(), parsed.clone());

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn default_json() -> Value {
        serde_json::to_value(ErpScanConfig::default()).unwrap()
    }

    #[test]
    fn test_lookup_key() {
        let json = default_json();
        assert_eq!(lookup_key(&json, "ocr.model_id").unwrap(), "prebuilt-layout");
        assert!(lookup_key(&json, "ocr.nope").is_err());
    }

    #[test]
    fn test_set_key_parses_json_values() {
        let mut json = default_json();

        set_key(&mut json, "ocr.max_polls", "10").unwrap();
        set_key(&mut json, "structuring.model", "openai/gpt-4o-mini").unwrap();
        set_key(&mut json, "upload.allowed_extensions", r#"["pdf", "tiff"]"#).unwrap();

        let config: ErpScanConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.ocr.max_polls, 10);
        assert_eq!(config.structuring.model, "openai/gpt-4o-mini");
        assert_eq!(config.upload.allowed_extensions, vec!["pdf", "tiff"]);
    }

    #[test]
    fn test_set_key_rejects_unknown_keys() {
        let mut json = default_json();
        assert!(set_key(&mut json, "ocr.unknown", "1").is_err());
        assert!(set_key(&mut json, "missing.key", "1").is_err());
        assert!(set_key(&mut json, "ocr.max_polls.deeper", "1").is_err());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        init_config(path.clone(), false).unwrap();
        assert!(ErpScanConfig::from_file(&path).is_ok());
        assert!(init_config(path.clone(), false).is_err());
        assert!(init_config(path, true).is_ok());
    }
}
