//! Conversation index
//!
//! The skill-check count is a substring heuristic over entry conditions,
//! not an exact detector.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::database::{DialogueEntry, RawConversation};
use crate::field::{normalize, FieldValue};

/// One line of `conversations_index.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: i64,
    pub title: FieldValue,
    pub description: FieldValue,
    pub articy_id: FieldValue,
    pub num_entries: usize,
    pub num_skill_checks: usize,
    /// Distinct speaking actors, ascending
    pub actor_ids: Vec<i64>,
}

/// Whether an entry's condition looks like a skill check
pub fn is_probable_skill_check(entry: &DialogueEntry) -> bool {
    match entry.conditions.as_deref() {
        Some(cond) if !cond.is_empty() => {
            cond.contains("Variable") || cond.to_lowercase().contains("skill")
        }
        _ => false,
    }
}

pub fn summarize_conversation(conversation: &RawConversation) -> ConversationSummary {
    let fields = normalize(&conversation.fields);
    let entries = &conversation.dialogue_entries;

    let num_skill_checks = entries.iter().filter(|e| is_probable_skill_check(e)).count();
    let actors: BTreeSet<i64> = entries
        .iter()
        .map(|e| e.actor_id)
        .filter(|id| *id != 0)
        .collect();

    ConversationSummary {
        id: conversation.id,
        title: fields.value_or_empty("Title"),
        description: fields.value_or_empty("Description"),
        articy_id: fields.value_or_empty("Articy Id"),
        num_entries: entries.len(),
        num_skill_checks,
        actor_ids: actors.into_iter().collect(),
    }
}

pub fn summarize_conversations(conversations: &[RawConversation]) -> Vec<ConversationSummary> {
    conversations.iter().map(summarize_conversation).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::RawField;

    fn entry(cond: Option<&str>, actor_id: i64) -> DialogueEntry {
        DialogueEntry {
            conditions: cond.map(str::to_string),
            actor_id,
        }
    }

    #[test]
    fn test_skill_check_heuristic() {
        assert!(is_probable_skill_check(&entry(Some("Variable[\"TASK.x\"] == true"), 1)));
        assert!(is_probable_skill_check(&entry(Some("CheckSkill(\"Logic\")"), 1)));
        assert!(is_probable_skill_check(&entry(Some("SKILL_RHETORIC >= 3"), 1)));
        // "Variable" is case-sensitive, "skill" is not
        assert!(!is_probable_skill_check(&entry(Some("variable == 1"), 1)));
        assert!(!is_probable_skill_check(&entry(Some(""), 1)));
        assert!(!is_probable_skill_check(&entry(None, 1)));
    }

    #[test]
    fn test_summary() {
        let conversation = RawConversation {
            id: 77,
            fields: vec![
                RawField::new("Title", "WHIRLING F1 / GARTE INTRO", 0),
                RawField::new("Articy Id", "0x01000000", 0),
            ],
            dialogue_entries: vec![
                entry(None, 0),
                entry(Some("Variable[\"whirling.garte_greeted\"]"), 12),
                entry(Some("IsSkillAbove(\"Empathy\", 2)"), 3),
                entry(Some("true"), 12),
                entry(None, 1),
            ],
        };
        let summary = summarize_conversation(&conversation);

        assert_eq!(summary.id, 77);
        assert_eq!(summary.title, "WHIRLING F1 / GARTE INTRO");
        assert_eq!(summary.description, "");
        assert_eq!(summary.num_entries, 5);
        assert_eq!(summary.num_skill_checks, 2);
        assert_eq!(summary.actor_ids, vec![1, 3, 12]);
    }

    #[test]
    fn test_empty_conversation() {
        let summary = summarize_conversation(&RawConversation {
            id: 1,
            fields: vec![],
            dialogue_entries: vec![],
        });
        assert_eq!(summary.num_entries, 0);
        assert!(summary.actor_ids.is_empty());
    }
}
