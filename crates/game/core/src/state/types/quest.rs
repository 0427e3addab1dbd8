//! Quests, objectives and the per-character journal.

use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestStatus {
    #[default]
    Inactive,
    Active,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectiveKind {
    Defeat,
    Collect,
    Talk,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub target: String,
    pub current: u32,
    pub required: u32,
}

impl Objective {
    pub fn new(kind: ObjectiveKind, target: impl Into<String>, required: u32) -> Self {
        Self {
            kind,
            target: target.into(),
            current: 0,
            required,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.current >= self.required
    }

    fn matches(&self, kind: ObjectiveKind, target: &str) -> bool {
        self.kind == kind && self.target.eq_ignore_ascii_case(target)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quest {
    pub title: String,
    pub description: String,
    pub objectives: Vec<Objective>,
    pub reward_experience: u32,
    pub status: QuestStatus,
}

impl Quest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            objectives: Vec::new(),
            reward_experience: 0,
            status: QuestStatus::Inactive,
        }
    }

    #[must_use]
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objectives.push(objective);
        self
    }

    #[must_use]
    pub fn with_reward(mut self, experience: u32) -> Self {
        self.reward_experience = experience;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.status == QuestStatus::Active && self.objectives.iter().all(Objective::is_satisfied)
    }

    pub fn activate(&mut self) -> Result<(), QuestError> {
        self.transition(QuestStatus::Inactive, QuestStatus::Active)
    }

    pub fn complete(&mut self) -> Result<(), QuestError> {
        if self.status == QuestStatus::Active && !self.is_ready() {
            return Err(QuestError::ObjectivesIncomplete(self.title.clone()));
        }
        self.transition(QuestStatus::Active, QuestStatus::Completed)
    }

    fn transition(&mut self, from: QuestStatus, to: QuestStatus) -> Result<(), QuestError> {
        if self.status != from {
            return Err(QuestError::InvalidTransition {
                quest: self.title.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Advances matching objectives by one, capped at their requirement.
    /// Returns true if any objective moved.
    pub fn record(&mut self, kind: ObjectiveKind, target: &str) -> bool {
        let mut progressed = false;
        for objective in self
            .objectives
            .iter_mut()
            .filter(|o| o.matches(kind, target) && !o.is_satisfied())
        {
            objective.current = (objective.current + 1).min(objective.required);
            progressed = true;
        }
        progressed
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestError {
    #[error("quest '{quest}' cannot move from {from} to {to}")]
    InvalidTransition {
        quest: String,
        from: QuestStatus,
        to: QuestStatus,
    },

    #[error("quest '{0}' still has unfinished objectives")]
    ObjectivesIncomplete(String),

    #[error("no quest titled '{0}'")]
    UnknownQuest(String),
}

impl GameError for QuestError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            QuestError::UnknownQuest(_) => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            QuestError::InvalidTransition { .. } => "QUEST_INVALID_TRANSITION",
            QuestError::ObjectivesIncomplete(_) => "QUEST_OBJECTIVES_INCOMPLETE",
            QuestError::UnknownQuest(_) => "QUEST_UNKNOWN",
        }
    }
}

/// Quests known to a character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestJournal {
    quests: Vec<Quest>,
}

impl QuestJournal {
    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter()
    }

    pub fn get(&self, title: &str) -> Option<&Quest> {
        self.quests
            .iter()
            .find(|q| q.title.eq_ignore_ascii_case(title))
    }

    /// Adds a quest and activates it.
    pub fn accept(&mut self, mut quest: Quest) -> Result<(), QuestError> {
        quest.activate()?;
        self.quests.push(quest);
        Ok(())
    }

    /// Restores a quest in whatever status it was saved in.
    pub fn insert(&mut self, quest: Quest) {
        self.quests.push(quest);
    }

    /// Advances every active quest with a matching objective, returning the
    /// titles that progressed.
    pub fn record(&mut self, kind: ObjectiveKind, target: &str) -> Vec<String> {
        self.quests
            .iter_mut()
            .filter(|q| q.status == QuestStatus::Active)
            .filter_map(|q| q.record(kind, target).then(|| q.title.clone()))
            .collect()
    }

    /// Completes every active quest whose objectives are all satisfied.
    pub fn complete_ready(&mut self) -> Vec<Quest> {
        let mut completed = Vec::new();
        for quest in self.quests.iter_mut().filter(|q| q.is_ready()) {
            if quest.complete().is_ok() {
                completed.push(quest.clone());
            }
        }
        completed
    }

    pub fn complete(&mut self, title: &str) -> Result<&Quest, QuestError> {
        let quest = self
            .quests
            .iter_mut()
            .find(|q| q.title.eq_ignore_ascii_case(title))
            .ok_or_else(|| QuestError::UnknownQuest(title.to_string()))?;
        quest.complete()?;
        Ok(quest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn troll_hunt() -> Quest {
        Quest::new("Troll Hunt", "Clear the cave")
            .with_objective(Objective::new(ObjectiveKind::Defeat, "Troll", 2))
            .with_reward(50)
    }

    #[test]
    fn transitions_only_move_forward() {
        let mut quest = troll_hunt();
        assert!(quest.complete().is_err());
        quest.activate().unwrap();
        assert!(matches!(
            quest.activate(),
            Err(QuestError::InvalidTransition { .. })
        ));
        assert_eq!(
            quest.complete(),
            Err(QuestError::ObjectivesIncomplete("Troll Hunt".into()))
        );
    }

    #[test]
    fn progress_caps_and_completes() {
        let mut journal = QuestJournal::default();
        journal.accept(troll_hunt()).unwrap();

        for _ in 0..3 {
            journal.record(ObjectiveKind::Defeat, "troll");
        }
        let quest = journal.get("troll hunt").unwrap();
        assert_eq!(quest.objectives[0].current, 2);

        let completed = journal.complete_ready();
        assert_eq!(completed.len(), 1);
        assert_eq!(
            journal.get("Troll Hunt").map(|q| q.status),
            Some(QuestStatus::Completed)
        );
        assert!(journal.complete_ready().is_empty());
    }

    #[test]
    fn inactive_quests_do_not_progress() {
        let mut journal = QuestJournal::default();
        journal.insert(troll_hunt());
        assert!(journal.record(ObjectiveKind::Defeat, "Troll").is_empty());
    }
}
