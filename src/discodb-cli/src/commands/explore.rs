//! Bundle exploration command

use anyhow::{Context, Result};
use discodb::{explore_bundle, find_bundle, BundleDecoder, BundleListing};

use crate::config::Settings;

pub fn handle(settings: &Settings, prefix: &str) -> Result<()> {
    let decoder = super::require_decoder(settings)?;
    let listing = explore(settings, prefix, &decoder)?;
    print_listing(&listing);
    Ok(())
}

pub fn explore(settings: &Settings, prefix: &str, decoder: &dyn BundleDecoder) -> Result<BundleListing> {
    let bundle = find_bundle(&settings.bundle_dir, prefix)?;
    explore_bundle(decoder, &bundle).with_context(|| format!("Failed to explore {}", bundle.display()))
}

fn print_listing(listing: &BundleListing) {
    let name = listing
        .bundle
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    println!();
    println!("Bundle: {}", name);
    println!("  Objects: {}", listing.object_count);

    for object in &listing.named {
        match &object.name {
            Ok(name) => println!("    {}: {}", object.info.type_name, name),
            Err(e) => println!("    {}: ERROR reading - {}", object.info.type_name, e),
        }
    }

    for (type_name, count) in &listing.type_counts {
        println!("  {}: {}", type_name, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use discodb::{MemoryDecoder, ObjectInfo};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explore_prefix() {
        let dir = TempDir::new().unwrap();
        let bundle = dir.path().join("fonts_assets_all_9.bundle");
        fs::write(&bundle, b"UnityFS").unwrap();

        let decoder = MemoryDecoder::new()
            .with_tree(&bundle, ObjectInfo::new(1, "MonoScript"), json!({"m_ClassName": "FontLoader"}))
            .with_tree(&bundle, ObjectInfo::new(2, "Font"), json!({}));
        let settings = Settings {
            game_dir: dir.path().to_path_buf(),
            bundle_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("out"),
            decoder: None,
        };

        let listing = explore(&settings, "fonts", &decoder).unwrap();
        assert_eq!(listing.object_count, 2);
        assert_eq!(listing.named[0].name, Ok("FontLoader".to_string()));
        print_listing(&listing);

        assert!(explore(&settings, "nothing", &decoder).is_err());
    }

    #[test]
    fn test_explore_requires_decoder() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            game_dir: dir.path().to_path_buf(),
            bundle_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("out"),
            decoder: None,
        };
        let err = handle(&settings, "dialoguebundle").unwrap_err();
        assert!(err.to_string().contains("No decoder configured"));
    }
}
