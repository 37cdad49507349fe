//! Testing utilities for the keypath workspace
//!
//! Shared fixtures: temp JSON files and preconfigured engines.

#![allow(missing_docs)]

use keypath_ops::{EngineConfig, OperationEngine};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const FILE_NAME: &str = "translations.json";

/// JSON file inside its own temp directory, removed on drop
#[derive(Debug)]
pub struct TestFile {
    dir: TempDir,
    path: PathBuf,
}

impl TestFile {
    pub fn with_content(content: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, content).unwrap();
        Self { dir, path }
    }

    pub fn with_json(value: &Value) -> Self {
        Self::with_content(&serde_json::to_string_pretty(value).unwrap())
    }

    /// Path inside a fresh temp directory, no file created
    pub fn missing() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn read_bytes(&self) -> Vec<u8> {
        fs::read(&self.path).unwrap()
    }

    pub fn read_string(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }

    pub fn read_json(&self) -> Value {
        serde_json::from_slice(&self.read_bytes()).unwrap()
    }

    /// Overwrite content from outside the engine
    pub fn write_external(&self, content: &str) {
        fs::write(&self.path, content).unwrap();
    }

    /// Root keys in file order
    pub fn root_keys(&self) -> Vec<String> {
        match self.read_json() {
            Value::Object(map) => map.keys().cloned().collect(),
            other => panic!("root is not an object: {other}"),
        }
    }
}

pub fn dashboard_document() -> Value {
    json!({
        "dashboard": {
            "title": "Dashboard",
            "subtitle": "Overview"
        }
    })
}

pub fn setup_test_engine() -> OperationEngine {
    OperationEngine::new(EngineConfig::new())
}

pub fn setup_uncached_engine() -> OperationEngine {
    OperationEngine::new(EngineConfig::new().with_cache(false))
}
