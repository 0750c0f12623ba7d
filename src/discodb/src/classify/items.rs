//! Item and thought classification
//!
//! The items table holds both inventory items and Thought Cabinet thoughts.
//! Item schemas vary between item groups, so item entries carry every
//! normalized field they did not map to a named output key.

use serde::{Deserialize, Serialize};

use crate::database::RawRecord;
use crate::field::{format_number, normalize, FieldValue, Fields};
use crate::reference::ClassifierTables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Item,
    Thought,
}

/// Output keys of an item entry; source fields with these titles are not copied
const ITEM_OUTPUT_KEYS: &[&str] = &[
    "id",
    "name",
    "display_name",
    "articy_id",
    "short_name",
    "description",
    "category",
    "item_type",
    "item_group",
    "item_value",
    "equip_slot",
    "bonus",
    "skill_modifier",
    "is_quest_item",
];

/// An inventory item as written to `items_inventory.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub id: i64,
    pub name: String,
    pub display_name: FieldValue,
    pub articy_id: FieldValue,
    pub short_name: FieldValue,
    pub description: FieldValue,
    pub category: ItemCategory,
    pub item_type: FieldValue,
    pub item_group: FieldValue,
    pub item_value: FieldValue,
    pub equip_slot: FieldValue,
    pub bonus: FieldValue,
    pub skill_modifier: FieldValue,
    pub is_quest_item: FieldValue,
    /// Remaining source fields, verbatim
    #[serde(flatten)]
    pub extra: Fields,
}

/// A thought as written to `items_thoughts.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThoughtEntry {
    pub id: i64,
    pub name: String,
    pub display_name: FieldValue,
    pub articy_id: FieldValue,
    pub short_name: FieldValue,
    pub description: FieldValue,
    pub category: ItemCategory,
    pub thought_type: String,
    pub thought_type_raw: FieldValue,
    pub bonus_while_processing: FieldValue,
    pub bonus_when_completed: FieldValue,
    pub completion_description: FieldValue,
    pub time_to_internalize: FieldValue,
    pub requirement: FieldValue,
    pub is_cursed: FieldValue,
}

#[derive(Debug, Clone, Default)]
pub struct ItemCategories {
    pub inventory: Vec<ItemEntry>,
    pub thoughts: Vec<ThoughtEntry>,
}

/// Fields shared by items and thoughts
struct Common {
    id: i64,
    name: String,
    display_name: FieldValue,
    articy_id: FieldValue,
    short_name: FieldValue,
    description: FieldValue,
}

impl Common {
    fn new(id: i64, fields: &Fields) -> Self {
        let name = fields.text("Name");
        Self {
            id,
            display_name: fields.value_or("Display Name", FieldValue::from(name.as_str())),
            articy_id: fields.value_or_empty("Articy Id"),
            short_name: fields.value_or_empty("character_short_name"),
            description: fields.value_or_empty("description"),
            name,
        }
    }
}

/// A record is a thought when `isThought` or `thoughtType` is truthy
pub fn is_thought(fields: &Fields) -> bool {
    fields.flag("isThought") || fields.flag("thoughtType")
}

/// Label for a raw thought type, or its string form when unknown
pub fn thought_type_label(raw: &FieldValue, tables: &ClassifierTables) -> String {
    match raw {
        FieldValue::Number(n) => tables
            .thought_label(*n)
            .map(str::to_string)
            .unwrap_or_else(|| format_number(*n)),
        FieldValue::Integer(n) => tables
            .thought_label(*n as f64)
            .map(str::to_string)
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

fn thought_entry(common: Common, fields: &Fields, tables: &ClassifierTables) -> ThoughtEntry {
    let raw = fields.value_or("thoughtType", FieldValue::Integer(0));

    ThoughtEntry {
        id: common.id,
        name: common.name,
        display_name: common.display_name,
        articy_id: common.articy_id,
        short_name: common.short_name,
        description: common.description,
        category: ItemCategory::Thought,
        thought_type: thought_type_label(&raw, tables),
        thought_type_raw: raw,
        bonus_while_processing: fields.value_or_empty("bonus"),
        bonus_when_completed: fields.value_or_empty("fixtureBonus"),
        completion_description: fields.value_or_empty("fixtureDescription"),
        time_to_internalize: fields.value_or("timeLeft", FieldValue::Integer(0)),
        requirement: fields.value_or_empty("requirement"),
        is_cursed: fields.value_or("Cursed", FieldValue::Bool(false)),
    }
}

fn item_entry(common: Common, fields: &Fields, tables: &ClassifierTables) -> ItemEntry {
    let extra = fields
        .iter()
        .filter(|(title, _)| !ITEM_OUTPUT_KEYS.contains(title) && !tables.is_item_excluded(title))
        .map(|(title, value)| (title.to_string(), value.clone()))
        .collect();

    ItemEntry {
        id: common.id,
        name: common.name,
        display_name: common.display_name,
        articy_id: common.articy_id,
        short_name: common.short_name,
        description: common.description,
        category: ItemCategory::Item,
        item_type: fields.value_or_empty("itemType"),
        item_group: fields.value_or_empty("itemGroup"),
        item_value: fields.value_or_empty("itemValue"),
        equip_slot: fields.value_or_empty("equipOrb"),
        bonus: fields.value_or_empty("bonus"),
        skill_modifier: fields.value_or_empty("skillModifier"),
        is_quest_item: fields.value_or("isQuestItem", FieldValue::Bool(false)),
        extra,
    }
}

/// Classify every item into inventory items and thoughts
pub fn classify_items(items: &[RawRecord], tables: &ClassifierTables) -> ItemCategories {
    let mut categories = ItemCategories::default();

    for item in items {
        let fields = normalize(&item.fields);
        let common = Common::new(item.id, &fields);

        if is_thought(&fields) {
            categories.thoughts.push(thought_entry(common, &fields, tables));
        } else {
            categories.inventory.push(item_entry(common, &fields, tables));
        }
    }

    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::RawField;

    fn record(id: i64, fields: Vec<RawField>) -> RawRecord {
        RawRecord { id, fields }
    }

    #[test]
    fn test_thought_from_thought_type() {
        let items = vec![record(
            1,
            vec![
                RawField::new("Name", "Bottle of Cheap Wine", 0),
                RawField::new("thoughtType", "2.0", 1),
            ],
        )];
        let result = classify_items(&items, &ClassifierTables::builtin());

        assert!(result.inventory.is_empty());
        let thought = &result.thoughts[0];
        assert_eq!(thought.category, ItemCategory::Thought);
        assert_eq!(thought.thought_type, "PSY");
        assert_eq!(thought.thought_type_raw, FieldValue::Number(2.0));
        assert_eq!(thought.time_to_internalize, FieldValue::Integer(0));
        assert_eq!(thought.is_cursed, FieldValue::Bool(false));
        assert_eq!(thought.display_name, "Bottle of Cheap Wine");
    }

    #[test]
    fn test_thought_from_is_thought_flag() {
        let items = vec![record(
            2,
            vec![
                RawField::new("Name", "Volumetric Shit Compressor", 0),
                RawField::new("isThought", "True", 3),
                RawField::new("bonus", "+1 Logic", 0),
                RawField::new("fixtureBonus", "+1 Encyclopedia", 0),
                RawField::new("timeLeft", "180", 1),
                RawField::new("Cursed", "true", 3),
            ],
        )];
        let result = classify_items(&items, &ClassifierTables::builtin());
        let thought = &result.thoughts[0];

        // No thoughtType: raw defaults to the integer 0
        assert_eq!(thought.thought_type, "0");
        assert_eq!(thought.thought_type_raw, FieldValue::Integer(0));
        assert_eq!(thought.bonus_while_processing, "+1 Logic");
        assert_eq!(thought.bonus_when_completed, "+1 Encyclopedia");
        assert_eq!(thought.time_to_internalize, FieldValue::Number(180.0));
        assert_eq!(thought.is_cursed, FieldValue::Bool(true));
    }

    #[test]
    fn test_missing_thought_fields_default_to_integer_zero() {
        let items = vec![record(
            6,
            vec![
                RawField::new("Name", "Hobocop", 0),
                RawField::new("isThought", "true", 3),
            ],
        )];
        let result = classify_items(&items, &ClassifierTables::builtin());
        let json = serde_json::to_value(&result.thoughts[0]).unwrap();

        assert_eq!(json["thought_type"], "0");
        assert_eq!(json["thought_type_raw"], serde_json::json!(0));
        assert!(json["thought_type_raw"].is_i64());
        assert!(json["time_to_internalize"].is_i64());
        assert_eq!(json["time_to_internalize"], serde_json::json!(0));
    }

    #[test]
    fn test_unknown_thought_type_stringified() {
        let tables = ClassifierTables::builtin();
        assert_eq!(thought_type_label(&FieldValue::Number(9.0), &tables), "9.0");
        assert_eq!(thought_type_label(&FieldValue::Integer(7), &tables), "7");
        assert_eq!(thought_type_label(&FieldValue::Integer(3), &tables), "MOT");
        assert_eq!(thought_type_label(&FieldValue::from("weird"), &tables), "weird");
    }

    #[test]
    fn test_false_flags_stay_items() {
        let items = vec![record(
            3,
            vec![
                RawField::new("Name", "Tare Flask", 0),
                RawField::new("isThought", "false", 3),
                RawField::new("thoughtType", "0", 1),
            ],
        )];
        let result = classify_items(&items, &ClassifierTables::builtin());
        assert_eq!(result.inventory.len(), 1);
        assert!(result.thoughts.is_empty());

        // Falsy source fields still pass through
        let item = &result.inventory[0];
        assert_eq!(item.extra.get("isThought"), Some(&FieldValue::Bool(false)));
        assert_eq!(item.extra.get("thoughtType"), Some(&FieldValue::Number(0.0)));
    }

    #[test]
    fn test_item_pass_through() {
        let items = vec![record(
            4,
            vec![
                RawField::new("Name", "Horrific Necktie", 0),
                RawField::new("Display Name", "Horrific Necktie", 0),
                RawField::new("IsItem", "true", 3),
                RawField::new("description", "It talks.", 0),
                RawField::new("itemType", "3", 1),
                RawField::new("equipOrb", "neck", 0),
                RawField::new("bonus", "+1 Electrochemistry", 0),
                RawField::new("isQuestItem", "false", 3),
                RawField::new("MediumTextValue", "Ugly", 0),
                RawField::new("substance", "true", 3),
            ],
        )];
        let result = classify_items(&items, &ClassifierTables::builtin());
        let item = &result.inventory[0];

        assert_eq!(item.category, ItemCategory::Item);
        assert_eq!(item.item_type, FieldValue::Number(3.0));
        assert_eq!(item.equip_slot, "neck");
        assert_eq!(item.item_group, "");
        assert_eq!(item.is_quest_item, FieldValue::Bool(false));

        let extra: Vec<&str> = item.extra.iter().map(|(t, _)| t).collect();
        assert_eq!(
            extra,
            vec!["itemType", "equipOrb", "isQuestItem", "MediumTextValue", "substance"]
        );

        // Every normalized field outside the exclusion set shows up verbatim
        let json = serde_json::to_value(item).unwrap();
        let fields = normalize(&items[0].fields);
        for (title, value) in fields.iter() {
            if ["Name", "Display Name", "IsItem", "Is Item"].contains(&title) {
                continue;
            }
            assert_eq!(json[title], serde_json::to_value(value).unwrap(), "field {}", title);
        }
        assert!(json.get("IsItem").is_none());
        assert!(json.get("Name").is_none());
    }

    #[test]
    fn test_item_entry_round_trip() {
        let items = vec![record(
            5,
            vec![
                RawField::new("Name", "Ledger of Failure", 0),
                RawField::new("itemValue", "12", 1),
                RawField::new("flavour", "smells of money", 0),
            ],
        )];
        let result = classify_items(&items, &ClassifierTables::builtin());
        let json = serde_json::to_string_pretty(&result.inventory).unwrap();
        let back: Vec<ItemEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result.inventory);
    }
}
