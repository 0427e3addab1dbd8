//! Game configuration loader.

use std::path::Path;

use rpg_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load rule constants from a TOML file. Keys left out keep their
    /// defaults, so an empty file yields [`GameConfig::default`].
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            crit_multiplier = 3
            tick_seconds = 0.5

            [experience]
            base_threshold = 80
            "#,
        )
        .unwrap();

        assert_eq!(config.crit_multiplier, 3);
        assert_eq!(config.tick_seconds, 0.5);
        assert_eq!(config.experience.base_threshold, 80);
        assert_eq!(config.experience.health_per_level, 10);
        assert_eq!(config.inventory_capacity, GameConfig::DEFAULT_INVENTORY_CAPACITY);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(ConfigLoader::parse("").unwrap(), GameConfig::default());
    }
}
