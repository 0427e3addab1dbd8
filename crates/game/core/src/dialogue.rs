//! Branching dialogue.
//!
//! A [`DialogueTree`] is static content; a [`DialogueManager`] walks one
//! conversation through it. Options are ordered, so the index a player picks
//! always refers to the same line.

use std::collections::HashMap;

use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogueOption {
    pub label: String,
    /// Node reached by picking this option; `None` ends the conversation.
    pub next: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogueNode {
    pub speaker: String,
    pub text: String,
    pub options: Vec<DialogueOption>,
}

impl DialogueNode {
    pub const DEFAULT_SPEAKER: &'static str = "Narrator";

    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn option(mut self, label: impl Into<String>, next: Option<&str>) -> Self {
        self.options.push(DialogueOption {
            label: label.into(),
            next: next.map(str::to_string),
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogueTree {
    pub id: String,
    pub start: String,
    pub nodes: HashMap<String, DialogueNode>,
}

impl DialogueTree {
    pub const DEFAULT_START: &'static str = "start";

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start: Self::DEFAULT_START.to_string(),
            nodes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn node(mut self, key: impl Into<String>, node: DialogueNode) -> Self {
        self.nodes.insert(key.into(), node);
        self
    }

    /// Option targets that name no node.
    pub fn dangling_links(&self) -> Vec<String> {
        self.nodes
            .values()
            .flat_map(|n| n.options.iter())
            .filter_map(|o| o.next.as_ref())
            .filter(|next| !self.nodes.contains_key(*next))
            .cloned()
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DialogueError {
    #[error("option {index} is not available ({available} options)")]
    InvalidOption { index: usize, available: usize },

    #[error("the conversation has ended")]
    Finished,

    #[error("dialogue node '{0}' does not exist")]
    MissingNode(String),
}

impl GameError for DialogueError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            DialogueError::InvalidOption { .. } | DialogueError::Finished => {
                ErrorSeverity::Validation
            }
            DialogueError::MissingNode(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DialogueError::InvalidOption { .. } => "DIALOGUE_INVALID_OPTION",
            DialogueError::Finished => "DIALOGUE_FINISHED",
            DialogueError::MissingNode(_) => "DIALOGUE_MISSING_NODE",
        }
    }
}

/// Cursor over a dialogue tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueManager {
    tree: DialogueTree,
    current: Option<String>,
}

impl DialogueManager {
    pub fn new(tree: DialogueTree) -> Result<Self, DialogueError> {
        if !tree.nodes.contains_key(&tree.start) {
            return Err(DialogueError::MissingNode(tree.start.clone()));
        }
        let current = Some(tree.start.clone());
        Ok(Self { tree, current })
    }

    pub fn tree_id(&self) -> &str {
        &self.tree.id
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_node(&self) -> Option<&DialogueNode> {
        self.current.as_ref().and_then(|key| self.tree.nodes.get(key))
    }

    pub fn option_count(&self) -> usize {
        self.current_node().map(|n| n.options.len()).unwrap_or(0)
    }

    pub fn is_finished(&self) -> bool {
        self.current_node().is_none()
    }

    /// Follows option `index` (zero-based). Returns the new node, or `None`
    /// when the option ends the conversation. On error the cursor stays put.
    pub fn select(&mut self, index: usize) -> Result<Option<&DialogueNode>, DialogueError> {
        let node = self.current_node().ok_or(DialogueError::Finished)?;
        let option = node.options.get(index).ok_or(DialogueError::InvalidOption {
            index,
            available: node.options.len(),
        })?;

        match option.next.clone() {
            Some(next) if !self.tree.nodes.contains_key(&next) => {
                Err(DialogueError::MissingNode(next))
            }
            next => {
                self.current = next;
                Ok(self.current_node())
            }
        }
    }
}
