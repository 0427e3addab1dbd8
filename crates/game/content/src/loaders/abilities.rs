//! Ability catalog loader.

use std::path::Path;

use rpg_core::Ability;
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Deserialize)]
struct AbilityCatalog {
    abilities: Vec<Ability>,
}

/// Loader for ability definitions from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Ability>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses the catalog and rejects duplicate names, since abilities are
    /// looked up by name when cast.
    pub fn parse(content: &str) -> LoadResult<Vec<Ability>> {
        let catalog: AbilityCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        for (index, ability) in catalog.abilities.iter().enumerate() {
            if catalog.abilities[..index]
                .iter()
                .any(|other| other.is_named(&ability.name))
            {
                anyhow::bail!("Duplicate ability '{}'", ability.name);
            }
        }
        Ok(catalog.abilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::{AbilityEffect, ResourceKind};

    #[test]
    fn parses_costs_and_levels() {
        let abilities = AbilityLoader::parse(
            r#"(
                abilities: [
                    (
                        name: "Fireball",
                        description: "Hurls a ball of flame.",
                        cost: 20,
                        cost_type: Mana,
                        required_level: 1,
                        effect: Damage(30),
                    ),
                    (
                        name: "Second Wind",
                        description: "",
                        cost: 15,
                        cost_type: Stamina,
                        required_level: 3,
                        effect: Heal(25),
                    ),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(abilities.len(), 2);
        assert_eq!(abilities[0].effect, AbilityEffect::Damage(30));
        assert_eq!(abilities[1].cost_type, ResourceKind::Stamina);
        assert_eq!(abilities[1].required_level, 3);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = AbilityLoader::parse(
            r#"(abilities: [
                (name: "Heal", description: "", cost: 10, cost_type: Mana, required_level: 1, effect: Heal(20)),
                (name: "heal", description: "", cost: 10, cost_type: Mana, required_level: 2, effect: Heal(30)),
            ])"#,
        );
        assert!(result.is_err());
    }
}
