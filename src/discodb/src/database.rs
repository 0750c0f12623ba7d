//! The PixelCrushers dialogue database
//!
//! [`DatabaseLoader`] produces the decoded database tree, either from the
//! JSON cache left by an earlier run or by decoding the dialogue bundle.
//! [`DialogueDatabase`] is the typed view over that tree used by the
//! classifiers.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::bundle::{find_bundle, DIALOGUE_BUNDLE_PREFIX};
use crate::decoder::BundleDecoder;
use crate::field::RawField;
use crate::{Error, Result};

/// Cache file written next to the extracted category files
pub const CACHE_FILE_NAME: &str = "dialogue_db_typetree.json";

/// Unity class holding the database
pub const DATABASE_OBJECT_TYPE: &str = "MonoBehaviour";

/// Top-level lists every database must have
const REQUIRED_LISTS: &[&str] = &["actors", "items", "variables", "conversations"];

/// An actor, item or variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: i64,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// A conversation and its dialogue entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConversation {
    pub id: i64,
    #[serde(default)]
    pub fields: Vec<RawField>,
    #[serde(rename = "dialogueEntries", default)]
    pub dialogue_entries: Vec<DialogueEntry>,
}

/// The parts of a dialogue entry the summarizer looks at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueEntry {
    #[serde(rename = "conditionsString", default)]
    pub conditions: Option<String>,
    /// Speaking actor; 0 means none
    #[serde(rename = "ActorID", default)]
    pub actor_id: i64,
}

/// Typed view of the decoded database
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueDatabase {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub author: String,
    pub actors: Vec<RawRecord>,
    pub items: Vec<RawRecord>,
    pub variables: Vec<RawRecord>,
    pub conversations: Vec<RawConversation>,
}

impl DialogueDatabase {
    /// Build the typed view over a decoded tree
    pub fn from_tree(tree: &serde_json::Value) -> Result<Self> {
        let object = tree
            .as_object()
            .ok_or_else(|| Error::MalformedDatabase("top level is not an object".into()))?;

        for list in REQUIRED_LISTS {
            match object.get(*list) {
                Some(serde_json::Value::Array(_)) => {}
                Some(_) => {
                    return Err(Error::MalformedDatabase(format!("'{}' is not a list", list)))
                }
                None => return Err(Error::MalformedDatabase(format!("missing '{}' list", list))),
            }
        }

        Ok(DialogueDatabase::deserialize(tree)?)
    }

    pub fn total_dialogue_entries(&self) -> usize {
        self.conversations
            .iter()
            .map(|c| c.dialogue_entries.len())
            .sum()
    }
}

/// Loads the raw database tree, decoding the bundle only when no cache exists
#[derive(Debug, Clone)]
pub struct DatabaseLoader {
    bundle_dir: PathBuf,
    output_dir: PathBuf,
    refresh: bool,
}

impl DatabaseLoader {
    pub fn new(bundle_dir: &Path, output_dir: &Path) -> Self {
        Self {
            bundle_dir: bundle_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            refresh: false,
        }
    }

    /// Ignore an existing cache and decode the bundle again
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn cache_path(&self) -> PathBuf {
        self.output_dir.join(CACHE_FILE_NAME)
    }

    /// Produce the decoded database tree
    ///
    /// An existing cache is trusted as-is; it is not compared against the
    /// bundle. Without a cache the dialogue bundle is located, the first
    /// `MonoBehaviour` in it is decoded through its type tree, and the
    /// result is cached before being returned.
    pub fn load(&self, decoder: Option<&dyn BundleDecoder>) -> Result<serde_json::Value> {
        let cache_path = self.cache_path();

        if !self.refresh && cache_path.is_file() {
            let size = fs::metadata(&cache_path)?.len();
            tracing::info!(
                path = %cache_path.display(),
                "Loading cached database ({:.1} MB)",
                size as f64 / 1024.0 / 1024.0
            );
            let reader = BufReader::new(File::open(&cache_path)?);
            return Ok(serde_json::from_reader(reader)?);
        }

        let bundle = find_bundle(&self.bundle_dir, DIALOGUE_BUNDLE_PREFIX)?;
        let decoder = decoder.ok_or_else(|| Error::NoDecoder {
            cache: cache_path.clone(),
        })?;

        tracing::info!(bundle = %bundle.display(), backend = decoder.name(), "Extracting dialogue database");

        let object = decoder
            .objects(&bundle)?
            .into_iter()
            .find(|o| o.type_name == DATABASE_OBJECT_TYPE)
            .ok_or_else(|| Error::NoDatabaseObject {
                bundle: bundle.clone(),
                type_name: DATABASE_OBJECT_TYPE.to_string(),
            })?;

        let tree = decoder.read_typetree(&bundle, &object)?;

        fs::create_dir_all(&self.output_dir)?;
        let mut writer = BufWriter::new(File::create(&cache_path)?);
        serde_json::to_writer_pretty(&mut writer, &tree)?;
        writer.flush()?;

        tracing::info!(path = %cache_path.display(), "Cached decoded database");

        Ok(tree)
    }
}
