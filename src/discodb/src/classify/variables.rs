//! Variable classification
//!
//! Variables are named `<prefix>.<rest>`. The prefix selects a bucket from
//! the prefix table; anything else is treated as location state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::database::RawRecord;
use crate::field::{normalize, FieldValue};
use crate::reference::{ClassifierTables, VariableBucket, NO_PREFIX};

/// A variable as written to the `variables_*.json` files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableEntry {
    pub id: i64,
    pub name: String,
    pub initial_value: FieldValue,
    pub description: FieldValue,
    /// XP bucket only: the description, which holds the point value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp_points: Option<FieldValue>,
    /// Locations bucket only: the raw name prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VariableCategories {
    /// Every variable, annotated, in input order
    pub all: Vec<VariableEntry>,
    pub buckets: BTreeMap<VariableBucket, Vec<VariableEntry>>,
    /// Variables whose prefix is neither a bucket nor a known location
    pub unrecognized: usize,
}

impl VariableCategories {
    pub fn bucket(&self, bucket: VariableBucket) -> &[VariableEntry] {
        self.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Text before the first `.`, or `_other` for undotted names
pub fn variable_prefix(name: &str) -> &str {
    name.split_once('.').map(|(prefix, _)| prefix).unwrap_or(NO_PREFIX)
}

/// Bucket for a prefix; unknown prefixes are locations
pub fn variable_bucket(prefix: &str, tables: &ClassifierTables) -> VariableBucket {
    tables
        .variable_bucket(prefix)
        .unwrap_or(VariableBucket::Locations)
}

/// Classify every variable
pub fn classify_variables(variables: &[RawRecord], tables: &ClassifierTables) -> VariableCategories {
    let mut categories = VariableCategories::default();

    for var in variables {
        let fields = normalize(&var.fields);
        let name = fields.text("Name");
        let description = fields.value_or_empty("Description");

        let prefix = variable_prefix(&name).to_string();
        let bucket = variable_bucket(&prefix, tables);

        let mut entry = VariableEntry {
            id: var.id,
            initial_value: fields.value_or_empty("Initial Value"),
            description: description.clone(),
            xp_points: None,
            location: None,
            name,
        };

        match bucket {
            VariableBucket::Xp => {
                entry.xp_points = Some(if description.is_truthy() {
                    description
                } else {
                    FieldValue::empty()
                });
            }
            VariableBucket::Locations => {
                if !tables.is_location(&prefix) {
                    tracing::debug!(prefix = %prefix, variable = %entry.name, "Unrecognized variable prefix, filing under locations");
                    categories.unrecognized += 1;
                }
                entry.location = Some(prefix);
            }
            _ => {}
        }

        categories.buckets.entry(bucket).or_default().push(entry.clone());
        categories.all.push(entry);
    }

    categories
}
