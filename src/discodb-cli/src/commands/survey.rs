//! Bundle survey command

use anyhow::{Context, Result};
use discodb::{survey_bundles, BundleCategory};

use crate::config::Settings;

pub fn handle(settings: &Settings) -> Result<()> {
    let categories = survey_bundles(&settings.bundle_dir)
        .with_context(|| format!("Failed to survey {}", settings.bundle_dir.display()))?;

    print_categories(&categories);
    Ok(())
}

fn print_categories(categories: &[BundleCategory]) {
    println!();
    println!("=== Bundle Categories ===");
    for cat in categories {
        println!(
            "  {}: {} bundles, {:.2} MB (e.g. {})",
            cat.category,
            cat.count,
            cat.size_mb(),
            cat.example
        );
    }

    let total: usize = categories.iter().map(|c| c.count).sum();
    println!("  {} categories, {} bundles", categories.len(), total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_survey_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("fonts_assets_all_1.bundle"), [0u8; 64]).unwrap();
        fs::write(dir.path().join("dialoguebundle_assets_all_2.bundle"), [0u8; 8]).unwrap();

        let settings = Settings {
            game_dir: dir.path().to_path_buf(),
            bundle_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("out"),
            decoder: None,
        };
        handle(&settings).unwrap();
    }

    #[test]
    fn test_survey_missing_directory() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            game_dir: dir.path().to_path_buf(),
            bundle_dir: dir.path().join("nope"),
            output_dir: dir.path().join("out"),
            decoder: None,
        };
        assert!(handle(&settings).is_err());
    }
}
