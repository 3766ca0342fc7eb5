//! Package descriptors as provided by the host package manager.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Extra-metadata key naming the binary to expose in the bin directory.
const BIN_NAME_KEY: &str = "bin-name";

/// Manifest file describing a package inside its install directory.
const MANIFEST_FILE: &str = "package.json";

/// An installed package: its name, where its files live on disk, and the
/// free-form extra metadata it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    pub install_path: PathBuf,
    pub extra: Map<String, Value>,
}

/// On-disk manifest shape. Only the fields this installer consumes.
#[derive(Deserialize)]
struct Manifest {
    name: String,
    #[serde(default)]
    extra: Map<String, Value>,
}

impl Package {
    pub fn new(name: impl Into<String>, install_path: impl Into<PathBuf>) -> Self {
        Package {
            name: name.into(),
            install_path: install_path.into(),
            extra: Map::new(),
        }
    }

    /// Load a package descriptor from the manifest in its install directory.
    #[tracing::instrument(skip(runtime, install_path))]
    pub fn load<R: Runtime>(runtime: &R, install_path: &Path) -> Result<Self> {
        let manifest_path = install_path.join(MANIFEST_FILE);
        let raw = runtime
            .read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read package manifest {:?}", manifest_path))?;
        let manifest: Manifest = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid package manifest {:?}", manifest_path))?;

        Ok(Package {
            name: manifest.name,
            install_path: install_path.to_path_buf(),
            extra: manifest.extra,
        })
    }

    /// The declared binary name override, when the package has one.
    pub fn bin_name(&self) -> Option<&str> {
        self.extra.get(BIN_NAME_KEY).and_then(Value::as_str)
    }
}
