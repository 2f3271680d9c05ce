//! `stoneydsp.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stoneydsp_core::ExportMode;

/// File name searched for when locating a project.
pub const MANIFEST_NAME: &str = "stoneydsp.toml";

/// The top-level manifest of a project consuming StoneyDSP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoneyManifest {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub header: HeaderConfig,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Export mode of the artifact this project builds.
    #[serde(default)]
    pub export_mode: Option<ExportMode>,
    /// Default target: a triple or the name of a definition in `targets/`.
    #[serde(default)]
    pub target: Option<String>,
    /// Default target definition file, relative to the project directory.
    #[serde(default)]
    pub signals: Option<PathBuf>,
}

/// `[header]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HeaderConfig {
    /// Where `stoneydsp header` writes, relative to the project directory.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl StoneyManifest {
    /// Search upward from `start_dir` for a `stoneydsp.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_NAME);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: StoneyManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                tracing::debug!(path = %candidate.display(), "loaded project manifest");
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing stoneydsp.toml")
    }
}
