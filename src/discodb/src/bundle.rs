//! Locating asset bundles on disk
//!
//! Addressables bundles live flat in one directory, named
//! `<category>_assets_all_<hash>.bundle`.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Filename prefix of the bundle holding the dialogue database
pub const DIALOGUE_BUNDLE_PREFIX: &str = "dialoguebundle";

/// Extension of addressables bundles (without the dot)
pub const BUNDLE_EXTENSION: &str = "bundle";

/// Separator between a bundle's category and its hash
const CATEGORY_SEPARATOR: &str = "_assets_all_";

/// Regular files directly inside `dir`, sorted by filename
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::BundleDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    Ok(files)
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == extension)
        .unwrap_or(false)
}

/// Find the first bundle in `dir` whose name starts with `prefix`
///
/// Only the directory itself is scanned. Candidates are taken in filename
/// order, so the result is stable across runs.
pub fn find_bundle(dir: &Path, prefix: &str) -> Result<PathBuf> {
    list_files(dir)?
        .into_iter()
        .find(|path| file_name(path).starts_with(prefix) && has_extension(path, BUNDLE_EXTENSION))
        .ok_or_else(|| Error::BundleNotFound {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
            extension: BUNDLE_EXTENSION.to_string(),
        })
}

/// Aggregate of all bundles sharing a category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleCategory {
    pub category: String,
    pub count: usize,
    pub total_size: u64,
    /// First bundle seen in this category
    pub example: String,
}

impl BundleCategory {
    pub fn size_mb(&self) -> f64 {
        self.total_size as f64 / (1024.0 * 1024.0)
    }
}

/// Category of a bundle filename: everything before `_assets_all_`
pub fn bundle_category(file_name: &str) -> &str {
    file_name
        .split_once(CATEGORY_SEPARATOR)
        .map(|(category, _)| category)
        .unwrap_or(file_name)
}

/// Group every bundle in `dir` by category, sorted by category name
pub fn survey_bundles(dir: &Path) -> Result<Vec<BundleCategory>> {
    let mut categories: BTreeMap<String, BundleCategory> = BTreeMap::new();

    for path in list_files(dir)? {
        if !has_extension(&path, BUNDLE_EXTENSION) {
            continue;
        }

        let name = file_name(&path).to_string();
        let size = fs::metadata(&path)?.len();
        let category = bundle_category(&name).to_string();

        let entry = categories
            .entry(category.clone())
            .or_insert_with(|| BundleCategory {
                category,
                count: 0,
                total_size: 0,
                example: name.clone(),
            });
        entry.count += 1;
        entry.total_size += size;
    }

    Ok(categories.into_values().collect())
}
