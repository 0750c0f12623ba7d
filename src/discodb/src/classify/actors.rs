//! Actor classification

use serde::{Deserialize, Serialize};

use crate::database::RawRecord;
use crate::field::{normalize, FieldValue};
use crate::reference::{ClassifierTables, MAJOR_NPC_COLOR, PLAYER_COLOR, PLAYER_NAME, VOICE_COLOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorCategory {
    Player,
    Skill,
    Voice,
    NpcMajor,
    NpcMinor,
}

/// An actor as written to the `actors_*.json` files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorEntry {
    pub id: i64,
    pub name: String,
    pub display_name: FieldValue,
    pub articy_id: FieldValue,
    pub short_name: FieldValue,
    pub description: FieldValue,
    pub long_description: FieldValue,
    pub portrait: FieldValue,
    pub is_female: FieldValue,
    pub category: ActorCategory,
    /// Skills only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_group: Option<String>,
    /// Skills only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_attribute: Option<bool>,
}

/// Actors split by category, each list in input order
#[derive(Debug, Clone, Default)]
pub struct ActorCategories {
    pub skills: Vec<ActorEntry>,
    pub npcs_major: Vec<ActorEntry>,
    pub npcs_minor: Vec<ActorEntry>,
    pub player: Vec<ActorEntry>,
    pub voices: Vec<ActorEntry>,
}

impl ActorCategories {
    fn push(&mut self, entry: ActorEntry) {
        let list = match entry.category {
            ActorCategory::Player => &mut self.player,
            ActorCategory::Skill => &mut self.skills,
            ActorCategory::Voice => &mut self.voices,
            ActorCategory::NpcMajor => &mut self.npcs_major,
            ActorCategory::NpcMinor => &mut self.npcs_minor,
        };
        list.push(entry);
    }

    pub fn total(&self) -> usize {
        self.skills.len()
            + self.npcs_major.len()
            + self.npcs_minor.len()
            + self.player.len()
            + self.voices.len()
    }
}

/// Pick an actor's category. Rules are checked in order; the first match wins.
pub fn actor_category(name: &str, color: Option<f64>, tables: &ClassifierTables) -> ActorCategory {
    if color == Some(PLAYER_COLOR) || name == PLAYER_NAME {
        ActorCategory::Player
    } else if tables.is_skill(name) {
        ActorCategory::Skill
    } else if tables.is_brain_voice(name) || color == Some(VOICE_COLOR) {
        ActorCategory::Voice
    } else if color == Some(MAJOR_NPC_COLOR) {
        ActorCategory::NpcMajor
    } else {
        ActorCategory::NpcMinor
    }
}

/// Build the output entry for one actor
pub fn classify_actor(actor: &RawRecord, tables: &ClassifierTables) -> ActorEntry {
    let fields = normalize(&actor.fields);
    let name = fields.text("Name");
    let color = fields.number("color");
    let category = actor_category(&name, color, tables);

    let (attribute_group, is_attribute) = if category == ActorCategory::Skill {
        (
            Some(tables.attribute_group(color).to_string()),
            Some(tables.is_attribute(&name)),
        )
    } else {
        (None, None)
    };

    ActorEntry {
        id: actor.id,
        display_name: fields.value_or("Display Name", FieldValue::from(name.as_str())),
        articy_id: fields.value_or_empty("Articy Id"),
        short_name: fields.value_or_empty("character_short_name"),
        description: fields.value_or_empty("short_description"),
        long_description: fields.value_or_empty("LongDescription"),
        portrait: fields.value_or_empty("Pictures"),
        is_female: fields.value_or("IsFemale", FieldValue::Bool(false)),
        category,
        attribute_group,
        is_attribute,
        name,
    }
}

/// Classify every actor
pub fn classify_actors(actors: &[RawRecord], tables: &ClassifierTables) -> ActorCategories {
    let mut categories = ActorCategories::default();
    for actor in actors {
        categories.push(classify_actor(actor, tables));
    }
    categories
}
