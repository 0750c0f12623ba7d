//! Bundle exploration and extraction reports
//!
//! Diagnostic passes over a single bundle. Neither pass stops on a bad
//! object: read failures are logged and recorded, then skipped.

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::decoder::{BundleDecoder, ObjectInfo};
use crate::Result;

pub const REPORT_FILE_NAME: &str = "_extraction_report.json";

/// Object types whose names are listed when exploring
pub const NAMED_OBJECT_TYPES: &[&str] = &["MonoBehaviour", "TextAsset", "MonoScript"];

/// Top-level keys that mark a tree as a dialogue database
pub const DATABASE_KEYS: &[&str] = &["conversations", "actors", "items", "variables"];

const UNKNOWN_NAME: &str = "???";
const UNNAMED: &str = "unnamed";
const MAX_REPORTED_KEYS: usize = 20;
const MAX_PRINTABLE_RUNS: usize = 50;
const PRINTABLE_SCAN_BYTES: usize = 100_000;
const MAX_RUN_CHARS: usize = 120;
const PREVIEW_CHARS: usize = 500;

fn string_field<'a>(tree: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    tree.get(key).and_then(|v| v.as_str())
}

/// Display name of a decoded object: `m_Name`, then `m_ClassName`, then `???`
pub fn object_name(tree: &serde_json::Value) -> String {
    string_field(tree, "m_Name")
        .or_else(|| string_field(tree, "m_ClassName"))
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}

/// Whether a decoded tree has any dialogue database list
pub fn looks_like_database(tree: &serde_json::Value) -> bool {
    DATABASE_KEYS.iter().any(|k| tree.get(*k).is_some())
}

// ============================================================================
// Explore
// ============================================================================

/// An object from [`NAMED_OBJECT_TYPES`] and its decoded name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedObject {
    pub info: ObjectInfo,
    /// The name, or the read error
    pub name: std::result::Result<String, String>,
}

/// Contents of one bundle
#[derive(Debug, Clone)]
pub struct BundleListing {
    pub bundle: PathBuf,
    pub object_count: usize,
    pub named: Vec<NamedObject>,
    /// Object count per type, sorted by type name
    pub type_counts: BTreeMap<String, usize>,
}

/// List a bundle's objects, naming the script-like ones
pub fn explore_bundle(decoder: &dyn BundleDecoder, bundle: &Path) -> Result<BundleListing> {
    let objects = decoder.objects(bundle)?;
    let mut type_counts = BTreeMap::new();
    let mut named = Vec::new();

    for info in &objects {
        *type_counts.entry(info.type_name.clone()).or_insert(0) += 1;

        if !NAMED_OBJECT_TYPES.contains(&info.type_name.as_str()) {
            continue;
        }

        let name = match decoder.read_typetree(bundle, info) {
            Ok(tree) => Ok(object_name(&tree)),
            Err(e) => {
                tracing::warn!(path_id = info.path_id, type_name = %info.type_name, "Failed to read object: {}", e);
                Err(e.to_string())
            }
        };
        named.push(NamedObject {
            info: info.clone(),
            name,
        });
    }

    Ok(BundleListing {
        bundle: bundle.to_path_buf(),
        object_count: objects.len(),
        named,
        type_counts,
    })
}

// ============================================================================
// Extraction report
// ============================================================================

/// Report line for a MonoBehaviour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonoBehaviourReport {
    pub path_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_dialogue_db: bool,
    /// First top-level keys of the decoded tree
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    /// Length of every top-level list, databases only
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub list_lengths: BTreeMap<String, usize>,
    /// Raw fallback: object size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_size: Option<usize>,
    /// Raw fallback: readable ASCII runs near the start of the object
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAssetReport {
    pub path_id: i64,
    pub name: String,
    pub size: usize,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptReport {
    pub path_id: i64,
    pub name: String,
    pub namespace: String,
}

/// An object that could not be read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectError {
    pub path_id: i64,
    #[serde(rename = "type")]
    pub type_name: String,
    pub error: String,
}

/// Per-object findings for one bundle, written as `_extraction_report.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub bundle: String,
    pub object_count: usize,
    pub monobehaviours: Vec<MonoBehaviourReport>,
    pub text_assets: Vec<TextAssetReport>,
    pub scripts: Vec<ScriptReport>,
    pub other: Vec<ObjectInfo>,
    pub errors: Vec<ObjectError>,
}

impl ExtractionReport {
    /// Number of MonoBehaviours that look like a dialogue database
    pub fn database_count(&self) -> usize {
        self.monobehaviours.iter().filter(|m| m.is_dialogue_db).count()
    }

    /// Write as pretty JSON into `output_dir`
    pub fn save(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(REPORT_FILE_NAME);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

static PRINTABLE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x20-\x7E]{10,}").expect("printable run pattern is valid"));

/// Printable ASCII runs of at least 10 bytes in the first 100000 bytes
pub fn printable_runs(raw: &[u8]) -> Vec<String> {
    let window = &raw[..raw.len().min(PRINTABLE_SCAN_BYTES)];

    PRINTABLE_RUN
        .find_iter(window)
        .take(MAX_PRINTABLE_RUNS)
        .map(|m| {
            String::from_utf8_lossy(m.as_bytes())
                .chars()
                .take(MAX_RUN_CHARS)
                .collect()
        })
        .collect()
}

fn typetree_report(info: &ObjectInfo, tree: &serde_json::Value) -> MonoBehaviourReport {
    let name = string_field(tree, "m_Name").unwrap_or(UNNAMED).to_string();
    let is_dialogue_db = looks_like_database(tree);

    let mut report = MonoBehaviourReport {
        path_id: info.path_id,
        name: Some(name),
        is_dialogue_db,
        ..Default::default()
    };

    if let Some(map) = tree.as_object() {
        report.keys = map.keys().take(MAX_REPORTED_KEYS).cloned().collect();
        if is_dialogue_db {
            report.list_lengths = map
                .iter()
                .filter_map(|(k, v)| v.as_array().map(|list| (k.clone(), list.len())))
                .collect();
        }
    }

    report
}

fn monobehaviour_report(decoder: &dyn BundleDecoder, bundle: &Path, info: &ObjectInfo) -> MonoBehaviourReport {
    let typetree_error = match decoder.read_typetree(bundle, info) {
        Ok(tree) => return typetree_report(info, &tree),
        Err(e) => e,
    };
    tracing::warn!(path_id = info.path_id, "Type tree read failed, trying raw read: {}", typetree_error);

    let mut report = MonoBehaviourReport {
        path_id: info.path_id,
        ..Default::default()
    };

    match decoder.read_raw(bundle, info) {
        Ok(raw) => {
            report.raw_size = Some(raw.len());
            report.strings = printable_runs(&raw);
        }
        Err(e) => {
            tracing::warn!(path_id = info.path_id, "Raw read failed: {}", e);
            report.error = Some(e.to_string());
        }
    }

    report
}

fn text_asset_report(tree: &serde_json::Value, info: &ObjectInfo) -> TextAssetReport {
    let script = string_field(tree, "m_Script").unwrap_or_default();
    TextAssetReport {
        path_id: info.path_id,
        name: string_field(tree, "m_Name").unwrap_or(UNNAMED).to_string(),
        size: script.len(),
        preview: script.chars().take(PREVIEW_CHARS).collect(),
    }
}

fn script_report(tree: &serde_json::Value, info: &ObjectInfo) -> ScriptReport {
    ScriptReport {
        path_id: info.path_id,
        name: object_name(tree),
        namespace: string_field(tree, "m_Namespace").unwrap_or_default().to_string(),
    }
}

/// Inspect every object in a bundle
pub fn build_report(decoder: &dyn BundleDecoder, bundle: &Path) -> Result<ExtractionReport> {
    let objects = decoder.objects(bundle)?;
    tracing::info!(bundle = %bundle.display(), count = objects.len(), "Building extraction report");

    let mut report = ExtractionReport {
        bundle: bundle
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        object_count: objects.len(),
        ..Default::default()
    };

    for info in &objects {
        match info.type_name.as_str() {
            "MonoBehaviour" => {
                report
                    .monobehaviours
                    .push(monobehaviour_report(decoder, bundle, info));
            }
            kind @ ("TextAsset" | "MonoScript") => match decoder.read_typetree(bundle, info) {
                Ok(tree) if kind == "TextAsset" => report.text_assets.push(text_asset_report(&tree, info)),
                Ok(tree) => report.scripts.push(script_report(&tree, info)),
                Err(e) => {
                    tracing::warn!(path_id = info.path_id, type_name = kind, "Failed to read object: {}", e);
                    report.errors.push(ObjectError {
                        path_id: info.path_id,
                        type_name: kind.to_string(),
                        error: e.to_string(),
                    });
                }
            },
            _ => report.other.push(info.clone()),
        }
    }

    Ok(report)
}
