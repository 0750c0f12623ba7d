//! Category file and manifest writing

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::classify::Extraction;
use crate::database::DialogueDatabase;
use crate::reference::VariableBucket;
use crate::Result;

pub const MANIFEST_FILE_NAME: &str = "_manifest.json";

/// Manifest line for one written file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub count: usize,
    /// File size in kilobytes, one decimal
    pub size_kb: f64,
}

impl ManifestEntry {
    pub fn new(count: usize, size_bytes: u64) -> Self {
        let kb = size_bytes as f64 / 1024.0;
        Self {
            count,
            size_kb: (kb * 10.0).round() / 10.0,
        }
    }
}

/// Manifest entries keyed by file name, in write order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestFiles {
    entries: Vec<(String, ManifestEntry)>,
}

impl ManifestFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. A replaced name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, entry: ManifestEntry) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((name, entry)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::ops::Index<&str> for ManifestFiles {
    type Output = ManifestEntry;

    fn index(&self, name: &str) -> &ManifestEntry {
        match self.get(name) {
            Some(entry) => entry,
            None => panic!("no manifest entry for {}", name),
        }
    }
}

impl Serialize for ManifestFiles {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ManifestFiles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FilesVisitor;

        impl<'de> Visitor<'de> for FilesVisitor {
            type Value = ManifestFiles;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of file names to manifest entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<ManifestFiles, A::Error> {
                let mut files = ManifestFiles::new();
                while let Some((name, entry)) = access.next_entry::<String, ManifestEntry>()? {
                    files.insert(name, entry);
                }
                Ok(files)
            }
        }

        deserializer.deserialize_map(FilesVisitor)
    }
}

/// Index of every category file written in one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub author: String,
    pub files: ManifestFiles,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Writes category files into an output directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> Result<u64> {
        let path = self.output_dir.join(file_name);
        let mut writer = BufWriter::new(fs::File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        drop(writer);

        Ok(fs::metadata(&path)?.len())
    }

    /// Write one category as a pretty JSON array
    pub fn write_category<T: Serialize>(&self, file_name: &str, entries: &[T]) -> Result<ManifestEntry> {
        let size = self.write_json(file_name, entries)?;
        tracing::debug!(file = file_name, count = entries.len(), size, "Wrote category");
        Ok(ManifestEntry::new(entries.len(), size))
    }

    fn add_category<T: Serialize>(
        &self,
        files: &mut ManifestFiles,
        file_name: &str,
        entries: &[T],
    ) -> Result<()> {
        let entry = self.write_category(file_name, entries)?;
        files.insert(file_name, entry);
        Ok(())
    }

    /// Write every category file and the manifest
    pub fn write_extraction(&self, db: &DialogueDatabase, extraction: &Extraction) -> Result<Manifest> {
        fs::create_dir_all(&self.output_dir)?;

        let mut files = ManifestFiles::new();

        let actors = &extraction.actors;
        self.add_category(&mut files, "actors_skills.json", &actors.skills)?;
        self.add_category(&mut files, "actors_npcs_major.json", &actors.npcs_major)?;
        self.add_category(&mut files, "actors_npcs_minor.json", &actors.npcs_minor)?;
        self.add_category(&mut files, "actors_player.json", &actors.player)?;
        self.add_category(&mut files, "actors_voices.json", &actors.voices)?;

        let items = &extraction.items;
        self.add_category(&mut files, "items_inventory.json", &items.inventory)?;
        self.add_category(&mut files, "items_thoughts.json", &items.thoughts)?;

        self.add_category(&mut files, "conversations_index.json", &extraction.conversations)?;

        let variables = &extraction.variables;
        for bucket in VariableBucket::ALL {
            self.add_category(&mut files, &bucket.file_name(), variables.bucket(bucket))?;
        }
        self.add_category(&mut files, "variables_all.json", &variables.all)?;

        let manifest = Manifest {
            version: db.version.clone(),
            author: db.author.clone(),
            files,
        };
        self.write_json(MANIFEST_FILE_NAME, &manifest)?;

        tracing::info!(
            dir = %self.output_dir.display(),
            files = manifest.files.len(),
            "Extraction written"
        );

        Ok(manifest)
    }
}
