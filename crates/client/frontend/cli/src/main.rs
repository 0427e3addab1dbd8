//! Terminal client entry point.
//!
//! Composition root: loads configuration and content, builds the
//! [`Runtime`] and hands it to the read-eval-draw loop.
mod app;
mod config;
mod input;
mod logging;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rpg_content::ContentFactory;
use rpg_runtime::{Runtime, RuntimeConfig, SaveFormat};

use app::CliApp;
use config::CliConfig;

/// Turn-based ASCII role-playing game
#[derive(Parser)]
#[command(name = "rpg")]
#[command(version)]
struct Args {
    /// Content directory (config.toml, catalogs, scenes/)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Scene to start in
    #[arg(long, value_name = "NAME")]
    scene: Option<String>,

    /// Playable hero to start as (see --list-characters)
    #[arg(long, value_name = "TAG")]
    character: Option<String>,

    /// Resume from a save slot instead of starting fresh
    #[arg(long, value_name = "SLOT")]
    load: Option<String>,

    /// Directory for save files (defaults to platform-specific location)
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,

    /// Seed for a new game; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Save file format: binary or json
    #[arg(long, value_name = "FORMAT")]
    save_format: Option<SaveFormat>,

    /// Print the available scenes and exit
    #[arg(long)]
    list_scenes: bool,

    /// Print the playable characters and exit
    #[arg(long)]
    list_characters: bool,

    /// Disable colors
    #[arg(long)]
    no_color: bool,
}

impl Args {
    fn apply(&self, config: &mut CliConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(scene) = &self.scene {
            config.scene = scene.clone();
        }
        if let Some(character) = &self.character {
            config.character = Some(character.clone());
        }
        if let Some(dir) = &self.save_dir {
            config.save_dir = dir.clone();
        }
        if let Some(format) = self.save_format {
            config.save_format = format;
        }
        if self.no_color {
            config.color = false;
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = CliConfig::from_env();
    args.apply(&mut config);

    let factory = ContentFactory::new(config.data_dir.clone());
    if args.list_scenes {
        for scene in factory.list_scenes()? {
            println!("{}", scene);
        }
        return Ok(());
    }

    logging::setup_logging(&config.log_dir)?;
    tracing::info!("Starting rpg client");
    tracing::info!("Content: {}", config.data_dir.display());
    tracing::info!("Saves: {} ({})", config.save_dir.display(), config.save_format);

    let catalog = factory
        .load_catalog()
        .with_context(|| format!("Failed to load content from {}", config.data_dir.display()))?;
    if args.list_characters {
        for hero in catalog.playable() {
            println!("{:<12} {}", hero.tag, hero.name);
        }
        return Ok(());
    }

    let mut spec = factory.load_scene(&config.scene)?;
    if let Some(character) = &config.character {
        spec = spec.with_player(character.as_str());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("New game: scene={} seed={}", spec.name, seed);
    let new_game = catalog.new_game(&spec, seed)?;

    let mut runtime = Runtime::builder()
        .config(RuntimeConfig {
            log_capacity: config.log_lines,
            save_format: config.save_format,
            ..RuntimeConfig::default()
        })
        .content(&catalog)?
        .initial_state(new_game.state)
        .intro(new_game.intro)
        .save_dir(config.save_dir.clone())
        .build()?;

    if let Some(slot) = &args.load {
        runtime
            .load(slot)
            .with_context(|| format!("Failed to load save '{}'", slot))?;
    }

    CliApp::new(runtime, &config).run()
}
