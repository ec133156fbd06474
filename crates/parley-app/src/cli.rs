//! CLI argument definitions for the Parley REPL.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Parley: a slot-filling assistant driven by typed intents.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Seed for reply selection and mock weather, for reproducible runs.
    #[arg(short = 's', long = "seed")]
    pub seed: Option<u64>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > PARLEY_CONFIG env var > ~/.parley/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("PARLEY_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log filter.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".parley").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".parley").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_path_wins() {
        let args = CliArgs::parse_from(["parley", "--config", "/tmp/parley.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/parley.toml"));
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let args = CliArgs::parse_from(["parley"]);
        assert_eq!(args.resolve_log_level("warn"), "warn");

        let args = CliArgs::parse_from(["parley", "-l", "debug", "--seed", "7"]);
        assert_eq!(args.resolve_log_level("warn"), "debug");
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn test_default_path_ends_in_parley_config() {
        assert!(default_config_path().ends_with("config.toml"));
    }
}
