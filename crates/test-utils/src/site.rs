//! A throwaway static site on disk, laid out like the deployed `static/` tree.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

use crate::fixtures::catalog_json;
use crate::generators::mission_track;

/// Temporary directory holding `static/json/...` files.
pub struct StaticSite {
    dir: TempDir,
}

impl StaticSite {
    /// Empty site.
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Site with the fixture catalog and both Alberto missions.
    pub fn with_fixtures() -> Self {
        let site = Self::empty();
        site.write_json("static/json/storm_catalog.json", &catalog_json());
        site.write_json(
            "static/json/Alberto/AL012024_01.json",
            &mission_track("ALBERTO", "01", 3, 40),
        );
        site.write_json(
            "static/json/Alberto/AL012024_02.json",
            &mission_track("ALBERTO", "02", 2, 90),
        );
        site
    }

    /// Root directory; request paths are resolved relative to it.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a JSON document at a path relative to the root.
    pub fn write_json(&self, rel: &str, value: &Value) -> PathBuf {
        self.write_raw(rel, &serde_json::to_string_pretty(value).expect("serializable"))
    }

    /// Write raw text at a path relative to the root.
    pub fn write_raw(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture dir");
        }
        std::fs::write(&path, content).expect("Failed to write fixture");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_site_layout() {
        let site = StaticSite::with_fixtures();
        assert!(site.root().join("static/json/storm_catalog.json").exists());
        assert!(site.root().join("static/json/Alberto/AL012024_02.json").exists());
    }
}
