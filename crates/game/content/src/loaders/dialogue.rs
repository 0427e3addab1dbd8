//! Dialogue tree loader.

use std::path::Path;

use rpg_core::DialogueTree;
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Deserialize)]
struct DialogueFile {
    dialogues: Vec<DialogueTree>,
}

/// Loader for dialogue trees from RON files.
///
/// Trees are validated on load: the start node must exist and every option
/// must lead to an existing node or end the conversation.
pub struct DialogueLoader;

impl DialogueLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<DialogueTree>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<DialogueTree>> {
        let file: DialogueFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse dialogue RON: {}", e))?;

        for tree in &file.dialogues {
            if !tree.nodes.contains_key(&tree.start) {
                anyhow::bail!(
                    "Dialogue '{}' starts at missing node '{}'",
                    tree.id,
                    tree.start
                );
            }
            let dangling = tree.dangling_links();
            if !dangling.is_empty() {
                anyhow::bail!(
                    "Dialogue '{}' links to missing nodes: {}",
                    tree.id,
                    dangling.join(", ")
                );
            }
        }
        Ok(file.dialogues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_branching_tree() {
        let trees = DialogueLoader::parse(
            r#"(
                dialogues: [
                    (
                        id: "elder_greeting",
                        start: "start",
                        nodes: {
                            "start": (
                                speaker: "Elder",
                                text: "Traveler, the goblins grow bold.",
                                options: [
                                    (label: "I will deal with them.", next: Some("thanks")),
                                    (label: "Not my problem.", next: None),
                                ],
                            ),
                            "thanks": (speaker: "Elder", text: "May the winds guide you.", options: []),
                        },
                    ),
                ],
            )"#,
        )
        .unwrap();

        let tree = &trees[0];
        assert_eq!(tree.id, "elder_greeting");
        assert_eq!(tree.nodes["start"].options.len(), 2);
        assert!(tree.nodes["thanks"].options.is_empty());
    }

    #[test]
    fn dangling_option_is_rejected() {
        let result = DialogueLoader::parse(
            r#"(dialogues: [(
                id: "broken",
                start: "start",
                nodes: {
                    "start": (speaker: "Guard", text: "Halt!", options: [(label: "Why?", next: Some("reason"))]),
                },
            )])"#,
        );
        let message = result.unwrap_err().to_string();
        assert!(message.contains("reason"));
    }

    #[test]
    fn missing_start_node_is_rejected() {
        let result = DialogueLoader::parse(
            r#"(dialogues: [(id: "empty", start: "start", nodes: {})])"#,
        );
        assert!(result.is_err());
    }
}
