//! Dialogue database extraction command
//!
//! Loads (or decodes and caches) the database, classifies every record and
//! writes the category files plus `_manifest.json`.

use anyhow::{Context, Result};
use discodb::reference::VariableBucket;
use discodb::{classify, BundleDecoder, ClassifierTables, DatabaseLoader, DialogueDatabase, Extraction, Manifest, ReportWriter};

use crate::config::Settings;

/// Everything produced by one extraction
#[derive(Debug)]
pub struct ExtractionRun {
    pub db: DialogueDatabase,
    pub extraction: Extraction,
    pub manifest: Manifest,
}

/// Run the full pipeline
pub fn run(settings: &Settings, refresh: bool, decoder: Option<&dyn BundleDecoder>) -> Result<ExtractionRun> {
    let loader = DatabaseLoader::new(&settings.bundle_dir, &settings.output_dir).with_refresh(refresh);
    let tree = loader.load(decoder).context("Failed to load dialogue database")?;
    let db = DialogueDatabase::from_tree(&tree).context("Failed to read dialogue database")?;
    drop(tree);

    let tables = ClassifierTables::builtin();
    let extraction = classify::run(&db, &tables);

    let manifest = ReportWriter::new(&settings.output_dir)
        .write_extraction(&db, &extraction)
        .with_context(|| format!("Failed to write output to {}", settings.output_dir.display()))?;

    Ok(ExtractionRun {
        db,
        extraction,
        manifest,
    })
}

/// Handle the extract command
pub fn handle(settings: &Settings, refresh: bool) -> Result<()> {
    println!("Bundle directory: {}", settings.bundle_dir.display());
    println!("Output directory: {}", settings.output_dir.display());

    let decoder = settings.decoder();
    let result = run(settings, refresh, decoder.as_ref().map(|d| d as &dyn BundleDecoder))?;

    print_summary(&result);
    Ok(())
}

fn print_summary(result: &ExtractionRun) {
    let ExtractionRun {
        db,
        extraction,
        manifest,
    } = result;
    let actors = &extraction.actors;
    let variables = &extraction.variables;

    println!();
    println!("=== Extraction Summary ===");
    println!("  Database version: {}", db.version);
    if !db.author.is_empty() {
        println!("  Author: {}", db.author);
    }
    println!(
        "  Actors: {} ({} skills, {} major NPCs, {} minor NPCs, {} player, {} voices)",
        actors.total(),
        actors.skills.len(),
        actors.npcs_major.len(),
        actors.npcs_minor.len(),
        actors.player.len(),
        actors.voices.len()
    );
    println!("  Items: {}", extraction.items.inventory.len());
    println!("  Thoughts: {}", extraction.items.thoughts.len());
    println!(
        "  Conversations: {} ({} dialogue entries)",
        extraction.conversations.len(),
        db.total_dialogue_entries()
    );
    println!("  Variables: {}", variables.all.len());
    for bucket in VariableBucket::ALL {
        println!("    {:<12} {}", bucket.key(), variables.bucket(bucket).len());
    }
    if variables.unrecognized > 0 {
        println!("  Unrecognized variable prefixes: {}", variables.unrecognized);
    }

    println!();
    println!("Files:");
    for (name, entry) in manifest.files.iter() {
        println!("  {:<28} {:>6} entries {:>10.1} KB", name, entry.count, entry.size_kb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use discodb::{MemoryDecoder, ObjectInfo, CACHE_FILE_NAME, MANIFEST_FILE_NAME};
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn settings(root: &Path) -> Settings {
        Settings {
            game_dir: root.to_path_buf(),
            bundle_dir: root.join("bundles"),
            output_dir: root.join("out"),
            decoder: None,
        }
    }

    fn database() -> serde_json::Value {
        json!({
            "version": "1.0",
            "actors": [{"id": 1, "fields": [{"title": "Name", "value": "You", "type": 0}]}],
            "items": [],
            "variables": [{"id": 2, "fields": [{"title": "Name", "value": "XP.found_body", "type": 0},
                                               {"title": "Description", "value": "10", "type": 0}]}],
            "conversations": []
        })
    }

    #[test]
    fn test_extract_from_cache_without_decoder() {
        let dir = TempDir::new().unwrap();
        let settings = settings(dir.path());
        fs::create_dir_all(&settings.output_dir).unwrap();
        fs::write(settings.output_dir.join(CACHE_FILE_NAME), database().to_string()).unwrap();

        let result = run(&settings, false, None).unwrap();
        assert_eq!(result.extraction.actors.player.len(), 1);
        assert_eq!(result.manifest.files["variables_xp.json"].count, 1);
        assert!(settings.output_dir.join(MANIFEST_FILE_NAME).is_file());
        print_summary(&result);
    }

    #[test]
    fn test_extract_decodes_bundle() {
        let dir = TempDir::new().unwrap();
        let settings = settings(dir.path());
        fs::create_dir_all(&settings.bundle_dir).unwrap();
        let bundle = settings.bundle_dir.join("dialoguebundle_assets_all_0.bundle");
        fs::write(&bundle, b"UnityFS").unwrap();

        let decoder = MemoryDecoder::new().with_tree(&bundle, ObjectInfo::new(7, "MonoBehaviour"), database());
        let result = run(&settings, false, Some(&decoder)).unwrap();

        assert_eq!(result.db.version, "1.0");
        assert!(settings.output_dir.join(CACHE_FILE_NAME).is_file());
    }

    #[test]
    fn test_missing_bundle_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let settings = settings(dir.path());
        fs::create_dir_all(&settings.bundle_dir).unwrap();

        let err = run(&settings, false, None).unwrap_err();
        assert!(format!("{:#}", err).contains("dialoguebundle"));
        assert!(!settings.output_dir.exists());
    }
}
