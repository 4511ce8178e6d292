//! Target Manifest collaborator: given a target name,
//! resolves `full_path`/`get_file_contents` against that target's folder.
//!
//! Grounded on `examples/original_source/mew_pl/targetmgr.py`'s
//! `TargetManager`: a target-folder lookup relative to the tool's own
//! install location, plus a "read this file from the target, or fail"
//! helper. The optional `manifest.json` layer (extra include paths /
//! preprocessor defines) has no counterpart in the original — it's the
//! ambient `serde`/`serde_json` stack applied to the one place this CLI
//! has a file format to parse, the way `logicaffeine-cli`'s
//! `project/manifest.rs` uses `serde` for its own project file.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_TARGET: &str = "c99";

/// Optional `manifest.json` inside a target folder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetManifestFile {
    #[serde(default)]
    pub include_paths: Vec<String>,
    #[serde(default)]
    pub defines: HashMap<String, String>,
}

/// A resolved target's folder on disk, plus its optional extra manifest.
pub struct TargetManifest {
    target: String,
    folder: PathBuf,
    pub extra: TargetManifestFile,
}

impl TargetManifest {
    /// Resolves `<binary-dir>/targets/<target>/`, mirroring
    /// `TargetManager.__init__`'s module-directory-relative lookup.
    pub fn new(target: &str) -> Result<Self, String> {
        let exe = env::current_exe().map_err(|e| e.to_string())?;
        let binary_dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::resolve(&binary_dir.join("targets"), target)
    }

    /// Resolves `<targets_dir>/<target>/` directly, for tests (and any
    /// future override) that don't want to depend on `current_exe`.
    pub fn resolve(targets_dir: &Path, target: &str) -> Result<Self, String> {
        let folder = targets_dir.join(target);
        if !folder.is_dir() {
            return Err(format!("Target `{}` not found! ({})", target, folder.display()));
        }
        let extra = fs::read_to_string(folder.join("manifest.json"))
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Ok(TargetManifest { target: target.to_string(), folder, extra })
    }

    /// Absolute path to a named file inside the target folder — the
    /// include path the emitter's preamble splices into `#include "..."`.
    pub fn full_path(&self, name: &str) -> PathBuf {
        self.folder.join(name)
    }

    /// Reads a file out of the target folder. Unused by the core pipeline;
    /// available for targets that want to splice extra runtime text
    /// (matches `TargetManager.get_file_contents`).
    pub fn get_file_contents(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.folder.join(name))
    }

    pub fn name(&self) -> &str {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_target_directory_is_an_error() {
        let dir = std::env::temp_dir().join("mew_cli_test_missing_target_dir");
        let err = TargetManifest::resolve(&dir, "nope").unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn resolves_full_paths_and_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target_dir = dir.path().join("c99");
        fs::create_dir_all(&target_dir).unwrap();
        fs::write(target_dir.join("defs.h"), "// defs\n").unwrap();
        fs::write(target_dir.join("alloc.h"), "// alloc\n").unwrap();

        let manifest = TargetManifest::resolve(dir.path(), "c99").unwrap();
        assert!(manifest.full_path("defs.h").ends_with("defs.h"));
        assert_eq!(manifest.get_file_contents("defs.h").unwrap(), "// defs\n");
        assert!(manifest.extra.include_paths.is_empty());
    }

    #[test]
    fn missing_file_in_an_existing_target_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let target_dir = dir.path().join("c99");
        fs::create_dir_all(&target_dir).unwrap();
        let manifest = TargetManifest::resolve(dir.path(), "c99").unwrap();
        assert!(manifest.get_file_contents("alloc.h").is_err());
    }

    #[test]
    fn extra_manifest_json_is_parsed_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let target_dir = dir.path().join("c99");
        fs::create_dir_all(&target_dir).unwrap();
        fs::write(
            target_dir.join("manifest.json"),
            r#"{"include_paths": ["extra/"], "defines": {"DEBUG": "1"}}"#,
        )
        .unwrap();

        let manifest = TargetManifest::resolve(dir.path(), "c99").unwrap();
        assert_eq!(manifest.extra.include_paths, vec!["extra/".to_string()]);
        assert_eq!(manifest.extra.defines.get("DEBUG"), Some(&"1".to_string()));
    }
}
