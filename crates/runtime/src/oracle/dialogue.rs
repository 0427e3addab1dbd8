//! DialogueOracle implementation backed by loaded dialogue trees.

use std::collections::HashMap;

use rpg_core::{DialogueOracle, DialogueTree};

/// Dialogue trees keyed by id.
#[derive(Debug, Clone, Default)]
pub struct DialogueLibrary {
    trees: HashMap<String, DialogueTree>,
}

impl DialogueLibrary {
    pub fn new(trees: impl IntoIterator<Item = DialogueTree>) -> Self {
        Self {
            trees: trees
                .into_iter()
                .map(|tree| (tree.id.clone(), tree))
                .collect(),
        }
    }

    pub fn insert(&mut self, tree: DialogueTree) {
        self.trees.insert(tree.id.clone(), tree);
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl DialogueOracle for DialogueLibrary {
    fn tree(&self, id: &str) -> Option<DialogueTree> {
        self.trees.get(id).cloned()
    }
}
