use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default = "default_true")]
    pub pretty: bool,
    /// Print the recovered original-message header next to the records.
    #[serde(default = "default_true")]
    pub include_rfc822: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => anyhow::bail!("unknown output format: {other}"),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_format: OutputFormat::Json,
            pretty: true,
            include_rfc822: true,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path`, or the defaults when `path` is the unmodified default
    /// location and nothing is there.
    pub fn load_or_default(path: &str, explicit: bool) -> anyhow::Result<Self> {
        if !explicit && !Path::new(path).exists() {
            log::info!("No configuration at {path}, using defaults");
            return Ok(Config::default());
        }
        Self::from_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.pretty);
        assert!(config.include_rfc822);
    }

    #[test]
    fn test_yaml_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!(
            "exchange-bounce-config-{}.yaml",
            std::process::id()
        ));
        let path = path.to_str().unwrap();

        let config = Config {
            output_format: OutputFormat::Yaml,
            pretty: false,
            include_rfc822: false,
        };
        config.to_file(path).unwrap();
        let loaded = Config::from_file(path).unwrap();
        std::fs::remove_file(path).unwrap();

        assert_eq!(loaded.output_format, OutputFormat::Yaml);
        assert!(!loaded.pretty);
        assert!(!loaded.include_rfc822);
    }

    #[test]
    fn test_missing_default_file() {
        let config = Config::load_or_default("/nonexistent/exchange-bounce.yaml", false).unwrap();
        assert!(config.include_rfc822);
        assert!(Config::load_or_default("/nonexistent/exchange-bounce.yaml", true).is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
