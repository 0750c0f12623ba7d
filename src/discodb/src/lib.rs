//! # discodb
//!
//! Disco Elysium dialogue database extraction library.
//!
//! The game ships its design data (actors, items, variables, conversations)
//! inside a PixelCrushers `DialogueDatabase` stored in a Unity asset bundle.
//! This crate does not parse Unity bundles itself; decoding is delegated to a
//! [`BundleDecoder`] backend. What it does:
//!
//! - Locate the dialogue bundle on disk ([`bundle`])
//! - Load the decoded database tree, caching it as JSON ([`database`])
//! - Normalize PixelCrushers field lists ([`field`])
//! - Classify records into categories ([`classify`])
//! - Write one JSON file per category plus a manifest ([`report`])
//! - Survey bundles and inspect their objects ([`bundle`], [`explore`])
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let decoder = discodb::ExecDecoder::new("unity-bundle-dump");
//! let loader = discodb::DatabaseLoader::new(
//!     Path::new("disco_Data/StreamingAssets/aa/StandaloneWindows64"),
//!     Path::new("output/game_assets"),
//! );
//! let tree = loader.load(Some(&decoder))?;
//! let db = discodb::DialogueDatabase::from_tree(&tree)?;
//!
//! let tables = discodb::ClassifierTables::builtin();
//! let extraction = discodb::classify::run(&db, &tables);
//! let writer = discodb::ReportWriter::new(Path::new("output/game_assets"));
//! let manifest = writer.write_extraction(&db, &extraction)?;
//! println!("{} files written", manifest.files.len());
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod classify;
pub mod database;
pub mod decoder;
pub mod explore;
pub mod field;
pub mod reference;
pub mod report;

#[doc(inline)]
pub use bundle::{find_bundle, survey_bundles, BundleCategory, BUNDLE_EXTENSION, DIALOGUE_BUNDLE_PREFIX};
#[doc(inline)]
pub use classify::Extraction;
#[doc(inline)]
pub use database::{
    DatabaseLoader, DialogueDatabase, DialogueEntry, RawConversation, RawRecord,
    CACHE_FILE_NAME, DATABASE_OBJECT_TYPE,
};
#[doc(inline)]
pub use decoder::{BundleDecoder, ExecDecoder, MemoryDecoder, ObjectInfo};
#[doc(inline)]
pub use explore::{build_report, explore_bundle, BundleListing, ExtractionReport, REPORT_FILE_NAME};
#[doc(inline)]
pub use field::{normalize, FieldValue, Fields, RawField};
#[doc(inline)]
pub use reference::ClassifierTables;
#[doc(inline)]
pub use report::{Manifest, ManifestEntry, ManifestFiles, ReportWriter, MANIFEST_FILE_NAME};

use std::path::PathBuf;

/// Errors from dialogue database extraction
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No '{prefix}*.{extension}' bundle found in {}", dir.display())]
    BundleNotFound {
        dir: PathBuf,
        prefix: String,
        extension: String,
    },

    #[error("Cannot read bundle directory {}: {source}", dir.display())]
    BundleDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("No {type_name} object found in {}", bundle.display())]
    NoDatabaseObject { bundle: PathBuf, type_name: String },

    #[error("No decoder configured and no cached database at {}", cache.display())]
    NoDecoder { cache: PathBuf },

    #[error("Decoder '{backend}' failed: {message}")]
    Decoder {
        backend: &'static str,
        message: String,
    },

    #[error("Malformed dialogue database: {0}")]
    MalformedDatabase(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
