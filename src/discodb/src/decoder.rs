//! Asset bundle decoding abstraction
//!
//! Unity bundle parsing is not done in this crate. A [`BundleDecoder`]
//! backend enumerates the objects in a bundle and decodes them, either
//! through the embedded type tree (structured JSON) or as raw bytes.
//!
//! Backends:
//! - `ExecDecoder`: runs an external helper command (any Unity asset tool
//!   wrapped to speak the protocol below)
//! - `MemoryDecoder`: serves pre-decoded objects from memory

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{Error, Result};

/// An object inside a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub path_id: i64,
    /// Declared Unity class name (e.g. "MonoBehaviour")
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ObjectInfo {
    pub fn new(path_id: i64, type_name: &str) -> Self {
        Self {
            path_id,
            type_name: type_name.to_string(),
        }
    }
}

/// Trait for reading objects out of an asset bundle
pub trait BundleDecoder {
    /// Backend name for diagnostics
    fn name(&self) -> &'static str;

    /// List the objects contained in a bundle, in bundle order
    fn objects(&self, bundle: &Path) -> Result<Vec<ObjectInfo>>;

    /// Decode an object through its type tree into nested JSON data
    fn read_typetree(&self, bundle: &Path, object: &ObjectInfo) -> Result<serde_json::Value>;

    /// Read an object's raw serialized bytes
    fn read_raw(&self, bundle: &Path, object: &ObjectInfo) -> Result<Vec<u8>>;
}

/// External command-based decoder
///
/// # Protocol
///
/// The command string is split on whitespace; extra words are passed as
/// leading arguments. It is invoked as:
/// ```text
/// <command> objects <bundle>
/// <command> typetree <bundle> <path_id>
/// <command> raw <bundle> <path_id>
/// ```
///
/// - `objects` prints a JSON array of `{"path_id": <int>, "type": "<name>"}`
/// - `typetree` prints the decoded object as JSON
/// - `raw` prints the raw object bytes
/// - Exit code 0 indicates success; stderr is reported on failure
pub struct ExecDecoder {
    command: String,
}

impl ExecDecoder {
    pub fn new<S: Into<String>>(command: S) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn error(&self, message: String) -> Error {
        Error::Decoder {
            backend: self.name(),
            message,
        }
    }

    fn run(&self, args: &[&str], bundle: &Path) -> Result<Vec<u8>> {
        let parts: Vec<&str> = self.command.split_whitespace().collect();
        let (program, prefix_args) = parts
            .split_first()
            .ok_or_else(|| self.error("Empty decoder command".into()))?;

        let mut cmd = Command::new(program);
        cmd.args(prefix_args).arg(args[0]).arg(bundle).args(&args[1..]);

        tracing::debug!(command = %self.command, action = args[0], bundle = %bundle.display(), "running decoder");

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| self.error(format!("Failed to spawn command '{}': {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.error(format!(
                "Command '{}' failed with exit code {:?}: {}",
                self.command,
                output.status.code(),
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

impl std::fmt::Debug for ExecDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecDecoder")
            .field("command", &self.command)
            .finish()
    }
}

impl BundleDecoder for ExecDecoder {
    fn name(&self) -> &'static str {
        "exec"
    }

    fn objects(&self, bundle: &Path) -> Result<Vec<ObjectInfo>> {
        let stdout = self.run(&["objects"], bundle)?;
        serde_json::from_slice(&stdout)
            .map_err(|e| self.error(format!("Invalid object listing: {}", e)))
    }

    fn read_typetree(&self, bundle: &Path, object: &ObjectInfo) -> Result<serde_json::Value> {
        let path_id = object.path_id.to_string();
        let stdout = self.run(&["typetree", &path_id], bundle)?;
        serde_json::from_slice(&stdout).map_err(|e| {
            self.error(format!("Invalid type tree for object {}: {}", object.path_id, e))
        })
    }

    fn read_raw(&self, bundle: &Path, object: &ObjectInfo) -> Result<Vec<u8>> {
        let path_id = object.path_id.to_string();
        self.run(&["raw", &path_id], bundle)
    }
}

/// One object served by a [`MemoryDecoder`]
#[derive(Debug, Clone)]
pub struct MemoryObject {
    pub info: ObjectInfo,
    /// `None` makes `read_typetree` fail for this object
    pub tree: Option<serde_json::Value>,
    /// `None` makes `read_raw` fail for this object
    pub raw: Option<Vec<u8>>,
}

/// In-memory decoder keyed by bundle path
#[derive(Debug, Default)]
pub struct MemoryDecoder {
    bundles: HashMap<PathBuf, Vec<MemoryObject>>,
}

impl MemoryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object decodable through its type tree
    pub fn with_tree(mut self, bundle: &Path, info: ObjectInfo, tree: serde_json::Value) -> Self {
        self.push(bundle, MemoryObject { info, tree: Some(tree), raw: None });
        self
    }

    /// Register an object that only has raw bytes
    pub fn with_raw(mut self, bundle: &Path, info: ObjectInfo, raw: Vec<u8>) -> Self {
        self.push(bundle, MemoryObject { info, tree: None, raw: Some(raw) });
        self
    }

    /// Register an object that fails every read
    pub fn with_broken(mut self, bundle: &Path, info: ObjectInfo) -> Self {
        self.push(bundle, MemoryObject { info, tree: None, raw: None });
        self
    }

    pub fn push(&mut self, bundle: &Path, object: MemoryObject) {
        self.bundles.entry(bundle.to_path_buf()).or_default().push(object);
    }

    fn find(&self, bundle: &Path, object: &ObjectInfo) -> Result<&MemoryObject> {
        self.bundles
            .get(bundle)
            .and_then(|objects| objects.iter().find(|o| o.info.path_id == object.path_id))
            .ok_or_else(|| Error::Decoder {
                backend: self.name(),
                message: format!("No object {} in {}", object.path_id, bundle.display()),
            })
    }
}

impl BundleDecoder for MemoryDecoder {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn objects(&self, bundle: &Path) -> Result<Vec<ObjectInfo>> {
        self.bundles
            .get(bundle)
            .map(|objects| objects.iter().map(|o| o.info.clone()).collect())
            .ok_or_else(|| Error::Decoder {
                backend: self.name(),
                message: format!("Unknown bundle {}", bundle.display()),
            })
    }

    fn read_typetree(&self, bundle: &Path, object: &ObjectInfo) -> Result<serde_json::Value> {
        self.find(bundle, object)?
            .tree
            .clone()
            .ok_or_else(|| Error::Decoder {
                backend: self.name(),
                message: format!("Object {} has no type tree", object.path_id),
            })
    }

    fn read_raw(&self, bundle: &Path, object: &ObjectInfo) -> Result<Vec<u8>> {
        self.find(bundle, object)?
            .raw
            .clone()
            .ok_or_else(|| Error::Decoder {
                backend: self.name(),
                message: format!("Object {} has no raw data", object.path_id),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exec_decoder_empty_command() {
        let decoder = ExecDecoder::new("");
        let result = decoder.objects(Path::new("x.bundle"));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Empty decoder command"), "got: {}", err);
    }

    #[test]
    fn test_exec_decoder_missing_program() {
        let decoder = ExecDecoder::new("nonexistent_bundle_helper --flag");
        let result = decoder.objects(Path::new("x.bundle"));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to spawn"), "got: {}", err);
        assert!(err.contains("exec"), "got: {}", err);
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_decoder_end_to_end() {
        use std::os::unix::fs::PermissionsExt;

        // $1=action $2=bundle $3=path_id
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("helper.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             case \"$1\" in\n\
             objects) echo '[{\"path_id\": 7, \"type\": \"MonoBehaviour\"}]' ;;\n\
             typetree) echo \"{\\\"m_Name\\\": \\\"obj$3\\\"}\" ;;\n\
             raw) printf 'RAW' ;;\n\
             *) echo \"bad action\" >&2; exit 2 ;;\n\
             esac\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let decoder = ExecDecoder::new(script.to_str().unwrap());
        let bundle = Path::new("dialoguebundle.bundle");

        let objects = decoder.objects(bundle).unwrap();
        assert_eq!(objects, vec![ObjectInfo::new(7, "MonoBehaviour")]);

        let tree = decoder.read_typetree(bundle, &objects[0]).unwrap();
        assert_eq!(tree, json!({"m_Name": "obj7"}));

        let raw = decoder.read_raw(bundle, &objects[0]).unwrap();
        assert_eq!(raw, b"RAW");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_decoder_reports_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("failing.sh");
        std::fs::write(&script, "#!/bin/sh\necho 'cannot open bundle' >&2\nexit 3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let decoder = ExecDecoder::new(script.to_str().unwrap());
        let err = decoder.objects(Path::new("b.bundle")).unwrap_err().to_string();
        assert!(err.contains("cannot open bundle"), "got: {}", err);
        assert!(err.contains("Some(3)"), "got: {}", err);
    }

    #[test]
    fn test_memory_decoder_reads() {
        let bundle = Path::new("a.bundle");
        let decoder = MemoryDecoder::new()
            .with_tree(bundle, ObjectInfo::new(1, "MonoBehaviour"), json!({"m_Name": "db"}))
            .with_raw(bundle, ObjectInfo::new(2, "TextAsset"), vec![1, 2, 3])
            .with_broken(bundle, ObjectInfo::new(3, "MonoScript"));

        let objects = decoder.objects(bundle).unwrap();
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[1].type_name, "TextAsset");

        assert_eq!(decoder.read_typetree(bundle, &objects[0]).unwrap()["m_Name"], "db");
        assert!(decoder.read_typetree(bundle, &objects[1]).is_err());
        assert_eq!(decoder.read_raw(bundle, &objects[1]).unwrap(), vec![1, 2, 3]);
        assert!(decoder.read_raw(bundle, &objects[2]).is_err());
        assert!(decoder.objects(Path::new("other.bundle")).is_err());
    }
}
