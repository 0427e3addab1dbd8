//! CLI configuration.
use std::env;
use std::path::PathBuf;

use rpg_runtime::SaveFormat;

/// Settings for the terminal client.
///
/// Built from defaults, then `RPG_*` environment variables, then command-line
/// flags, each layer overriding the previous one.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Directory holding `config.toml`, the catalogs and `scenes/`.
    pub data_dir: PathBuf,
    pub save_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Scene started when no save is loaded.
    pub scene: String,
    /// Archetype tag of the hero; the scene's own hero when unset.
    pub character: Option<String>,
    pub save_format: SaveFormat,
    /// Lines of the message log shown under the map.
    pub log_lines: usize,
    pub color: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        let dirs = directories::ProjectDirs::from("", "", "rpg");
        Self {
            data_dir: PathBuf::from("crates/game/content/data"),
            save_dir: dirs
                .as_ref()
                .map(|d| d.data_dir().join("saves"))
                .unwrap_or_else(|| PathBuf::from("./save_data")),
            log_dir: dirs
                .as_ref()
                .map(|d| d.cache_dir().join("logs"))
                .unwrap_or_else(|| PathBuf::from("/tmp/rpg/logs")),
            scene: "aethelgard".to_string(),
            character: None,
            save_format: SaveFormat::Binary,
            log_lines: 5,
            color: true,
        }
    }
}

impl CliConfig {
    /// Construct CLI configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RPG_DATA_DIR` - Content directory
    /// - `RPG_SAVE_DIR` - Save directory (default: platform data dir)
    /// - `RPG_LOG_DIR` - Diagnostic log directory (default: platform cache dir)
    /// - `RPG_SCENE` - Starting scene (default: aethelgard)
    /// - `RPG_CHARACTER` - Playable archetype tag (default: the scene's hero)
    /// - `RPG_SAVE_FORMAT` - `binary` or `json` (default: binary)
    /// - `RPG_LOG_LINES` - Message log lines (default: 5)
    /// - `RPG_COLOR` - `false` disables colors
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("RPG_DATA_DIR") {
            config.data_dir = dir;
        }
        if let Some(dir) = read_env::<PathBuf>("RPG_SAVE_DIR") {
            config.save_dir = dir;
        }
        if let Some(dir) = read_env::<PathBuf>("RPG_LOG_DIR") {
            config.log_dir = dir;
        }
        if let Some(scene) = read_env::<String>("RPG_SCENE") {
            config.scene = scene;
        }
        if let Some(character) = read_env::<String>("RPG_CHARACTER") {
            config.character = Some(character);
        }
        if let Some(format) = read_env::<SaveFormat>("RPG_SAVE_FORMAT") {
            config.save_format = format;
        }
        if let Some(lines) = read_env::<usize>("RPG_LOG_LINES") {
            config.log_lines = lines.max(1);
        }
        if let Some(color) = read_env::<bool>("RPG_COLOR") {
            config.color = color;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
