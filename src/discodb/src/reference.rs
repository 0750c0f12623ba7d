//! Reference data for classifying dialogue database records
//!
//! Hardcoded name sets and lookup tables taken from the game's data
//! conventions. They are bundled into a [`ClassifierTables`] value that the
//! classifiers receive explicitly, so tests and callers can swap them out.

use std::collections::{HashMap, HashSet};

// ============================================================================
// Actors
// ============================================================================

/// The four attributes
pub const ATTRIBUTE_NAMES: &[&str] = &["Fysique", "Intellect", "Psyche", "Motorics"];

/// All 24 skills plus the four attributes
pub const SKILL_NAMES: &[&str] = &[
    // Attributes
    "Fysique",
    "Intellect",
    "Psyche",
    "Motorics",
    // INT
    "Logic",
    "Encyclopedia",
    "Rhetoric",
    "Drama",
    "Conceptualization",
    "Visual Calculus",
    // PSY
    "Volition",
    "Inland Empire",
    "Empathy",
    "Authority",
    "Esprit de Corps",
    "Suggestion",
    // FYS
    "Endurance",
    "Pain Threshold",
    "Physical Instrument",
    "Shivers",
    "Electrochemistry",
    "Half Light",
    // MOT
    "Hand/Eye Coordination",
    "Perception",
    "Reaction Speed",
    "Savoir Faire",
    "Interfacing",
    "Composure",
];

/// Voices in the player's head that are not skills
pub const BRAIN_VOICES: &[&str] = &[
    "Ancient Reptilian Brain",
    "Limbic System",
    "Spinal Cord",
    "Tutorial Agent",
    "Horrific Necktie",
    "Beautiful Necktie",
];

/// Actor `color` tag to attribute group
pub const ATTRIBUTE_COLORS: &[(f64, &str)] = &[(2.0, "INT"), (3.0, "PSY"), (4.0, "FYS"), (5.0, "MOT")];

/// Group used when a skill's color is not in [`ATTRIBUTE_COLORS`]
pub const DEFAULT_ATTRIBUTE_GROUP: &str = "MOT";

/// Actor color marking the player character
pub const PLAYER_COLOR: f64 = 7.0;

/// Player actor name
pub const PLAYER_NAME: &str = "You";

/// Actor color shared by the Motorics skills and the non-skill voices
pub const VOICE_COLOR: f64 = 5.0;

/// Actor color marking major NPCs
pub const MAJOR_NPC_COLOR: f64 = 1.0;

// ============================================================================
// Items
// ============================================================================

/// Thought Cabinet `thoughtType` labels
pub const THOUGHT_TYPES: &[(f64, &str)] = &[
    (1.0, "INT"),
    (2.0, "PSY"),
    (3.0, "MOT"),
    (4.0, "FYS"),
    (5.0, "other"),
];

/// Item fields never copied through to the item output
pub const ITEM_EXCLUDED_FIELDS: &[&str] = &["Name", "Display Name", "IsItem", "Is Item"];

// ============================================================================
// Variables
// ============================================================================

/// Output bucket for a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariableBucket {
    Tasks,
    Xp,
    Reputation,
    Character,
    Stats,
    Inventory,
    Auto,
    Globals,
    Conventions,
    Tutorials,
    Locations,
}

impl VariableBucket {
    pub const ALL: [VariableBucket; 11] = [
        VariableBucket::Tasks,
        VariableBucket::Xp,
        VariableBucket::Reputation,
        VariableBucket::Character,
        VariableBucket::Stats,
        VariableBucket::Inventory,
        VariableBucket::Auto,
        VariableBucket::Globals,
        VariableBucket::Conventions,
        VariableBucket::Tutorials,
        VariableBucket::Locations,
    ];

    pub fn key(self) -> &'static str {
        match self {
            VariableBucket::Tasks => "tasks",
            VariableBucket::Xp => "xp",
            VariableBucket::Reputation => "reputation",
            VariableBucket::Character => "character",
            VariableBucket::Stats => "stats",
            VariableBucket::Inventory => "inventory",
            VariableBucket::Auto => "auto",
            VariableBucket::Globals => "globals",
            VariableBucket::Conventions => "conventions",
            VariableBucket::Tutorials => "tutorials",
            VariableBucket::Locations => "locations",
        }
    }

    pub fn file_name(self) -> String {
        format!("variables_{}.json", self.key())
    }
}

/// Variable name prefix (text before the first `.`) to bucket
pub const VARIABLE_PREFIXES: &[(&str, VariableBucket)] = &[
    ("TASK", VariableBucket::Tasks),
    ("XP", VariableBucket::Xp),
    ("reputation", VariableBucket::Reputation),
    ("character", VariableBucket::Character),
    ("stats", VariableBucket::Stats),
    ("inventory", VariableBucket::Inventory),
    ("auto", VariableBucket::Auto),
    ("globals", VariableBucket::Globals),
    ("conventions", VariableBucket::Conventions),
    ("tutorials", VariableBucket::Tutorials),
];

/// Prefix used for variable names without a `.`
pub const NO_PREFIX: &str = "_other";

/// Known location prefixes, compared lowercased
pub const LOCATION_PREFIXES: &[&str] = &[
    "whirling",
    "plaza",
    "yard",
    "seafort",
    "village",
    "jam",
    "doomed",
    "coast",
    "pier",
    "cargo",
    "gates",
    "ice",
    "boardwalk",
    "church",
    "apt",
    "canal",
    "backyard",
    "tc",
    "kimswitch",
    "southcoast",
    "containeryard",
    "lair",
    "office",
    "hq",
    "kineema",
    "lands-end",
    "nethouse",
    "pawnshop",
    "shack",
    "walkway",
    "westcoast",
    "dream",
    "daychange",
    "lifeline",
    "initiation",
    "evrart",
    "joyce",
    "measurehead",
    "racist",
    "fritte",
    "garys-apartment",
];

/// Immutable lookup tables injected into the classifiers
#[derive(Debug, Clone)]
pub struct ClassifierTables {
    pub skills: HashSet<String>,
    pub attributes: HashSet<String>,
    pub brain_voices: HashSet<String>,
    /// `(color, group)` pairs, matched by exact value
    pub attribute_colors: Vec<(f64, String)>,
    pub default_attribute_group: String,
    pub thought_types: Vec<(f64, String)>,
    pub item_excluded_fields: HashSet<String>,
    pub variable_prefixes: HashMap<String, VariableBucket>,
    /// Lowercased location prefixes
    pub location_prefixes: HashSet<String>,
}

fn owned_set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn owned_pairs(pairs: &[(f64, &str)]) -> Vec<(f64, String)> {
    pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
}

impl ClassifierTables {
    /// Tables for the shipped game data
    pub fn builtin() -> Self {
        Self {
            skills: owned_set(SKILL_NAMES),
            attributes: owned_set(ATTRIBUTE_NAMES),
            brain_voices: owned_set(BRAIN_VOICES),
            attribute_colors: owned_pairs(ATTRIBUTE_COLORS),
            default_attribute_group: DEFAULT_ATTRIBUTE_GROUP.to_string(),
            thought_types: owned_pairs(THOUGHT_TYPES),
            item_excluded_fields: owned_set(ITEM_EXCLUDED_FIELDS),
            variable_prefixes: VARIABLE_PREFIXES
                .iter()
                .map(|(p, b)| (p.to_string(), *b))
                .collect(),
            location_prefixes: LOCATION_PREFIXES.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    pub fn is_skill(&self, name: &str) -> bool {
        self.skills.contains(name)
    }

    pub fn is_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    pub fn is_brain_voice(&self, name: &str) -> bool {
        self.brain_voices.contains(name)
    }

    /// Attribute group for an actor color, falling back to the default group
    pub fn attribute_group(&self, color: Option<f64>) -> &str {
        color
            .and_then(|c| self.attribute_colors.iter().find(|(k, _)| *k == c))
            .map(|(_, group)| group.as_str())
            .unwrap_or(&self.default_attribute_group)
    }

    /// Label for a numeric thought type
    pub fn thought_label(&self, thought_type: f64) -> Option<&str> {
        self.thought_types
            .iter()
            .find(|(k, _)| *k == thought_type)
            .map(|(_, label)| label.as_str())
    }

    pub fn is_item_excluded(&self, title: &str) -> bool {
        self.item_excluded_fields.contains(title)
    }

    pub fn variable_bucket(&self, prefix: &str) -> Option<VariableBucket> {
        self.variable_prefixes.get(prefix).copied()
    }

    /// Whether a prefix names a known location (case-insensitive, plus `Plaza`)
    pub fn is_location(&self, prefix: &str) -> bool {
        prefix == "Plaza" || self.location_prefixes.contains(&prefix.to_lowercase())
    }
}

impl Default for ClassifierTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_sizes() {
        let tables = ClassifierTables::builtin();
        assert_eq!(tables.skills.len(), 28);
        assert_eq!(tables.attributes.len(), 4);
        assert!(tables.attributes.iter().all(|a| tables.is_skill(a)));
        assert_eq!(tables.variable_prefixes.len(), 10);
        assert_eq!(tables.location_prefixes.len(), LOCATION_PREFIXES.len());
    }

    #[test]
    fn test_attribute_group_lookup() {
        let tables = ClassifierTables::builtin();
        assert_eq!(tables.attribute_group(Some(2.0)), "INT");
        assert_eq!(tables.attribute_group(Some(4.0)), "FYS");
        assert_eq!(tables.attribute_group(Some(9.0)), "MOT");
        assert_eq!(tables.attribute_group(None), "MOT");
    }

    #[test]
    fn test_thought_label_lookup() {
        let tables = ClassifierTables::builtin();
        assert_eq!(tables.thought_label(2.0), Some("PSY"));
        assert_eq!(tables.thought_label(5.0), Some("other"));
        assert_eq!(tables.thought_label(6.0), None);
    }

    #[test]
    fn test_location_prefixes_case_insensitive() {
        let tables = ClassifierTables::builtin();
        assert!(tables.is_location("whirling"));
        assert!(tables.is_location("WHIRLING"));
        assert!(tables.is_location("Plaza"));
        assert!(tables.is_location("lands-end"));
        assert!(!tables.is_location("TASK"));
    }

    #[test]
    fn test_bucket_files() {
        assert_eq!(VariableBucket::Xp.file_name(), "variables_xp.json");
        assert_eq!(VariableBucket::Locations.file_name(), "variables_locations.json");
        let tables = ClassifierTables::builtin();
        assert_eq!(tables.variable_bucket("TASK"), Some(VariableBucket::Tasks));
        assert_eq!(tables.variable_bucket("task"), None);
    }
}
