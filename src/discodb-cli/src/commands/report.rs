//! Extraction report command

use anyhow::{Context, Result};
use discodb::{build_report, find_bundle, BundleDecoder, ExtractionReport};
use std::path::PathBuf;

use crate::config::Settings;

pub fn handle(settings: &Settings, prefix: &str) -> Result<()> {
    let decoder = super::require_decoder(settings)?;
    let (report, path) = write_report(settings, prefix, &decoder)?;
    print_report(&report);
    println!();
    println!("Results saved to {}", path.display());
    Ok(())
}

pub fn write_report(
    settings: &Settings,
    prefix: &str,
    decoder: &dyn BundleDecoder,
) -> Result<(ExtractionReport, PathBuf)> {
    let bundle = find_bundle(&settings.bundle_dir, prefix)?;
    let report = build_report(decoder, &bundle)
        .with_context(|| format!("Failed to inspect {}", bundle.display()))?;
    let path = report
        .save(&settings.output_dir)
        .with_context(|| format!("Failed to write report to {}", settings.output_dir.display()))?;
    Ok((report, path))
}

fn print_report(report: &ExtractionReport) {
    println!();
    println!("Bundle: {} ({} objects)", report.bundle, report.object_count);

    for mb in &report.monobehaviours {
        let name = mb.name.as_deref().unwrap_or("unnamed");
        if mb.is_dialogue_db {
            println!("  MonoBehaviour (typetree): {} >>> DIALOGUE DATABASE <<<", name);
            for (key, len) in &mb.list_lengths {
                println!("    {}: list[{}]", key, len);
            }
        } else if let Some(size) = mb.raw_size {
            println!("  MonoBehaviour (raw): {} bytes, {} readable strings", size, mb.strings.len());
        } else if let Some(e) = &mb.error {
            println!("  MonoBehaviour: ERROR - {}", e);
        } else {
            println!("  MonoBehaviour (typetree): {}", name);
        }
    }
    for text in &report.text_assets {
        println!("  TextAsset: {} ({} bytes)", text.name, text.size);
    }
    for script in &report.scripts {
        println!("  MonoScript: {}.{}", script.namespace, script.name);
    }
    for failed in &report.errors {
        println!("  {}: ERROR - {}", failed.type_name, failed.error);
    }
    if !report.other.is_empty() {
        println!("  Other objects: {}", report.other.len());
    }
}
