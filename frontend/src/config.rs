use lazy_tree::TreeConfig;
use log::LevelFilter;
use serde::Deserialize;

const DEMO_CONFIG: &str = include_str!("../tree.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub log_level: String,
    /// Simulated listing delay.
    pub latency_ms: u32,
    pub tree: TreeConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            latency_ms: 300,
            tree: TreeConfig::default(),
        }
    }
}

impl DemoConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_toml_str(DEMO_CONFIG)
    }

    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_tree::StalePopulationPolicy;

    #[test]
    fn embedded_config_parses() {
        let config = DemoConfig::load().unwrap();
        assert_eq!(config.log_level(), LevelFilter::Debug);
        assert_eq!(config.tree.indent_px, 16);
        assert_eq!(config.tree.stale_populations, StalePopulationPolicy::Discard);
    }

    #[test]
    fn missing_tree_table_uses_tree_defaults() {
        let config = DemoConfig::from_toml_str("latency_ms = 0").unwrap();
        assert_eq!(config.latency_ms, 0);
        assert_eq!(config.tree, TreeConfig::default());
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = DemoConfig::from_toml_str(r#"log_level = "chatty""#).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Info);
    }
}
