//! Read-eval-draw loop of the terminal client.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use rpg_core::{GameOutcome, Role};
use rpg_runtime::Runtime;
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::input::{self, Command, HELP};
use crate::render::Renderer;

enum Flow {
    Continue,
    Quit,
}

pub struct CliApp {
    runtime: Runtime,
    renderer: Renderer,
}

impl CliApp {
    pub fn new(runtime: Runtime, config: &CliConfig) -> Self {
        Self {
            runtime,
            renderer: Renderer::new(config.color),
        }
    }

    /// Draws, reads a line, handles it; until `quit` or end of input.
    pub fn run(mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut line = String::new();

        loop {
            self.renderer.draw(&mut stdout, &self.runtime.snapshot())?;
            write!(stdout, "\nAction: ")?;
            stdout.flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            if let Flow::Quit = self.handle(&line) {
                break;
            }
        }

        info!(tick = self.runtime.state().turn.tick.0, "Session ended");
        Ok(())
    }

    fn handle(&mut self, line: &str) -> Flow {
        let in_conversation = self.runtime.state().conversation.is_some();
        let command = match input::parse(line, in_conversation) {
            Ok(command) => command,
            Err(err) => {
                self.runtime.push_message(err.to_string());
                return Flow::Continue;
            }
        };

        match command {
            Command::Game(intent) => {
                let was_running = self.runtime.outcome() == GameOutcome::InProgress;
                // Rejections are already in the message log.
                if self.runtime.submit(&intent).is_ok()
                    && was_running
                    && self.runtime.outcome() != GameOutcome::InProgress
                {
                    self.runtime
                        .push_message("Type 'load <slot>' to continue from a save, or 'quit'.");
                }
            }
            Command::Save(slot) => {
                if let Err(err) = self.runtime.save(&slot) {
                    warn!(%slot, error = %err, "Save failed");
                    self.runtime.push_message(format!("Save failed: {}", err));
                }
            }
            Command::Load(slot) => {
                if let Err(err) = self.runtime.load(&slot) {
                    warn!(%slot, error = %err, "Load failed");
                    self.runtime.push_message(format!("Load failed: {}", err));
                }
            }
            Command::Saves => self.list_saves(),
            Command::Status => self.status(),
            Command::Help => {
                for line in HELP {
                    self.runtime.push_message(*line);
                }
            }
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn list_saves(&mut self) {
        match self.runtime.list_saves() {
            Ok(saves) if saves.is_empty() => self.runtime.push_message("No saves yet."),
            Ok(saves) => {
                for save in saves {
                    self.runtime.push_message(format!(
                        "{}: {} at tick {} ({})",
                        save.slot,
                        save.scene,
                        save.tick,
                        save.saved_at.format("%Y-%m-%d %H:%M")
                    ));
                }
            }
            Err(err) => self
                .runtime
                .push_message(format!("Could not list saves: {}", err)),
        }
    }

    /// Health of the player and every visible enemy.
    fn status(&mut self) {
        let snapshot = self.runtime.snapshot();
        let player = &snapshot.player;
        self.runtime.push_message(format!(
            "{} - HP: {}/{}, Mana: {}/{}",
            player.name, player.health, player.max_health, player.mana, player.max_mana
        ));
        for enemy in snapshot.entities.iter().filter(|e| e.role == Role::Enemy) {
            let statuses = if enemy.statuses.is_empty() {
                String::new()
            } else {
                format!(" [{}]", enemy.statuses.join(", "))
            };
            self.runtime.push_message(format!(
                "{} - HP: {}/{}{}",
                enemy.name, enemy.health, enemy.max_health, statuses
            ));
        }
    }
}
