//! ASCII renderer.
//!
//! Draws a [`RenderSnapshot`] as a character grid, a status block, the
//! message log and the open conversation. Layout is computed as plain lines
//! so it can be tested; [`Renderer::draw`] only adds screen control and
//! colors.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use rpg_core::{GameOutcome, QuestStatus, Role};
use rpg_runtime::RenderSnapshot;

const FLOOR: char = '.';

/// The map as one string per row, top row first.
pub fn map_rows(snapshot: &RenderSnapshot) -> Vec<String> {
    let width = snapshot.width as usize;
    let height = snapshot.height as usize;
    let mut grid = vec![vec![FLOOR; width]; height];

    // Items first so anything standing on them is drawn over.
    let (items, solid): (Vec<_>, Vec<_>) = snapshot
        .entities
        .iter()
        .partition(|e| e.role == Role::Item);
    for entity in items.into_iter().chain(solid) {
        let (x, y) = entity.tile;
        if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
            grid[y as usize][x as usize] = entity.symbol;
        }
    }
    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

/// Player summary shown beside the log.
pub fn status_lines(snapshot: &RenderSnapshot) -> Vec<String> {
    let p = &snapshot.player;
    let mut lines = vec![
        format!(
            "{}  Lv {}  XP {}/{}",
            p.name, p.level, p.experience, p.next_level_at
        ),
        format!(
            "HP {}/{}  MP {}/{}  SP {}/{}",
            p.health, p.max_health, p.mana, p.max_mana, p.stamina, p.max_stamina
        ),
        format!(
            "Weapon: {}  Armor: {}",
            p.weapon.as_deref().unwrap_or("-"),
            p.armor.as_deref().unwrap_or("-")
        ),
    ];
    if !p.statuses.is_empty() {
        lines.push(format!("Status: {}", p.statuses.join(", ")));
    }
    if !p.inventory.is_empty() {
        lines.push(format!("Pack: {}", p.inventory.join(", ")));
    }
    if !p.abilities.is_empty() {
        lines.push(format!("Abilities: {}", p.abilities.join(", ")));
    }
    for quest in p.quests.iter().filter(|q| q.status != QuestStatus::Inactive) {
        let mark = if quest.status == QuestStatus::Completed {
            "x"
        } else {
            " "
        };
        lines.push(format!("[{}] {} ({})", mark, quest.title, quest.progress.join(", ")));
    }
    lines
}

/// Conversation box, options numbered from 1.
pub fn dialogue_lines(snapshot: &RenderSnapshot) -> Vec<String> {
    let Some(dialogue) = &snapshot.dialogue else {
        return Vec::new();
    };
    let mut lines = vec![format!("{}: \"{}\"", dialogue.speaker, dialogue.text)];
    lines.extend(
        dialogue
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("  {}. {}", i + 1, option)),
    );
    lines
}

fn symbol_color(role: Role) -> Color {
    match role {
        Role::Player => Color::Cyan,
        Role::Enemy => Color::Red,
        Role::Npc => Color::Green,
        Role::Item => Color::Yellow,
        Role::Prop => Color::DarkGrey,
    }
}

pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn draw(&self, out: &mut impl Write, snapshot: &RenderSnapshot) -> io::Result<()> {
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        queue!(
            out,
            Print(format!("== {} ==  tick {}\n", snapshot.scene, snapshot.tick))
        )?;

        for (y, row) in map_rows(snapshot).iter().enumerate() {
            if self.color {
                self.draw_row(out, snapshot, y as i32, row)?;
            } else {
                queue!(out, Print(row))?;
            }
            queue!(out, Print("\n"))?;
        }

        queue!(out, Print("\n"))?;
        for line in status_lines(snapshot) {
            queue!(out, Print(line), Print("\n"))?;
        }
        queue!(out, Print("\n"))?;
        for line in &snapshot.log {
            queue!(out, Print(format!("> {}\n", line)))?;
        }

        let dialogue = dialogue_lines(snapshot);
        if !dialogue.is_empty() {
            queue!(out, Print("\n"))?;
            for line in dialogue {
                queue!(out, Print(line), Print("\n"))?;
            }
        }

        match snapshot.outcome {
            GameOutcome::Victory => self.banner(out, "*** VICTORY ***", Color::Green)?,
            GameOutcome::Defeat => self.banner(out, "*** DEFEAT ***", Color::Red)?,
            GameOutcome::InProgress => {}
        }
        out.flush()
    }

    fn draw_row(
        &self,
        out: &mut impl Write,
        snapshot: &RenderSnapshot,
        y: i32,
        row: &str,
    ) -> io::Result<()> {
        for (x, symbol) in row.chars().enumerate() {
            match snapshot.entity_at((x as i32, y)) {
                Some(entity) => queue!(
                    out,
                    SetForegroundColor(symbol_color(entity.role)),
                    Print(symbol),
                    ResetColor
                )?,
                None => queue!(out, Print(symbol))?,
            }
        }
        Ok(())
    }

    fn banner(&self, out: &mut impl Write, text: &str, color: Color) -> io::Result<()> {
        queue!(out, Print("\n"))?;
        if self.color {
            queue!(out, SetForegroundColor(color), Print(text), ResetColor)?;
        } else {
            queue!(out, Print(text))?;
        }
        queue!(out, Print("\n"))
    }
}
