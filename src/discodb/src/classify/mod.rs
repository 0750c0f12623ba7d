//! Record classification
//!
//! Four independent passes over the decoded database. Each pass normalizes
//! the fields of one entity kind and files every record into exactly one
//! output category, producing fresh entries; the database is never touched.
//!
//! - `actors` - player, skills, brain voices, major and minor NPCs
//! - `items` - inventory items and Thought Cabinet thoughts
//! - `variables` - Lua variables bucketed by name prefix
//! - `conversations` - per-conversation summary with a skill-check estimate

pub mod actors;
pub mod conversations;
pub mod items;
pub mod variables;

pub use actors::{classify_actors, ActorCategories, ActorCategory, ActorEntry};
pub use conversations::{summarize_conversations, ConversationSummary};
pub use items::{classify_items, ItemCategories, ItemCategory, ItemEntry, ThoughtEntry};
pub use variables::{classify_variables, VariableCategories, VariableEntry};

use crate::database::DialogueDatabase;
use crate::reference::ClassifierTables;

/// Output of all classification passes
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub actors: ActorCategories,
    pub items: ItemCategories,
    pub variables: VariableCategories,
    pub conversations: Vec<ConversationSummary>,
}

/// Run every classifier over the database
pub fn run(db: &DialogueDatabase, tables: &ClassifierTables) -> Extraction {
    tracing::info!(count = db.actors.len(), "Processing actors");
    let actors = classify_actors(&db.actors, tables);

    tracing::info!(count = db.items.len(), "Processing items");
    let items = classify_items(&db.items, tables);

    tracing::info!(count = db.variables.len(), "Processing variables");
    let variables = classify_variables(&db.variables, tables);

    tracing::info!(count = db.conversations.len(), "Processing conversations");
    let conversations = summarize_conversations(&db.conversations);

    Extraction {
        actors,
        items,
        variables,
        conversations,
    }
}
