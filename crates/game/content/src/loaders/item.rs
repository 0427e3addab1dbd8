//! Item catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use rpg_core::Item;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item definitions keyed by content id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: BTreeMap<String, Item>,
}

impl ItemCatalog {
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// A fresh copy of item `id`, or an error naming the missing id.
    pub fn instantiate(&self, id: &str) -> LoadResult<Item> {
        self.get(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown item id '{}'", id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        Ok(catalog)
    }
}
