//! CLI command implementations.

pub mod describe;
pub mod header;
pub mod target;
pub mod types;
pub mod version;

use std::path::Path;

use anyhow::{bail, Context, Result};
use stoneydsp_core::parse::{load_target_toml, TARGET_SUFFIX};
use stoneydsp_core::{ExportMode, TargetSignals};

use crate::manifest::StoneyManifest;

/// Output format of the inspection commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn parse(format: Option<&str>) -> Result<Self> {
        match format {
            None | Some("text") | Some("human") => Ok(Self::Text),
            Some("json") => Ok(Self::Json),
            Some(other) => bail!("unknown format '{other}' (expected 'text' or 'json')"),
        }
    }
}

/// The target a command operates on.
#[derive(Debug, Clone)]
pub struct SelectedTarget {
    /// Definition name, triple, or "host".
    pub label: String,
    pub signals: TargetSignals,
}

impl SelectedTarget {
    pub fn host() -> Self {
        Self {
            label: "host".into(),
            signals: TargetSignals::host(),
        }
    }
}

/// Pick the target: `--signals` file, then `--target`, then the manifest's
/// `[build]` section, then the host.
pub fn select_target(
    project_dir: &Path,
    manifest: Option<&StoneyManifest>,
    target: Option<&str>,
    signals: Option<&Path>,
) -> Result<SelectedTarget> {
    if let Some(path) = signals {
        return from_file(path);
    }
    if let Some(name) = target {
        return by_name(project_dir, name);
    }
    if let Some(build) = manifest.map(|m| &m.build) {
        if let Some(path) = &build.signals {
            return from_file(&project_dir.join(path));
        }
        if let Some(name) = &build.target {
            return by_name(project_dir, name);
        }
    }
    Ok(SelectedTarget::host())
}

/// Look a target up by name. A definition in `targets/` wins over a triple
/// of the same spelling.
pub fn by_name(project_dir: &Path, name: &str) -> Result<SelectedTarget> {
    if name == "host" {
        return Ok(SelectedTarget::host());
    }
    let path = project_dir
        .join("targets")
        .join(format!("{name}{TARGET_SUFFIX}"));
    if path.is_file() {
        return from_file(&path);
    }
    let signals = TargetSignals::from_triple(name).with_context(|| {
        format!("'{name}' is neither a definition in targets/ nor a target triple")
    })?;
    Ok(SelectedTarget {
        label: name.to_string(),
        signals,
    })
}

fn from_file(path: &Path) -> Result<SelectedTarget> {
    let def = load_target_toml(path).with_context(|| format!("loading {}", path.display()))?;
    Ok(SelectedTarget {
        label: def.name,
        signals: def.signals,
    })
}

/// Pick the export mode: `--export-mode`, then the manifest, then the
/// `STONEYDSP_EXPORTS` / `STONEYDSP_IMPORTS` / `STONEYDSP_LOCAL` environment.
pub fn select_export_mode(
    flag: Option<&str>,
    manifest: Option<&StoneyManifest>,
) -> Result<ExportMode> {
    select_export_mode_with(flag, manifest, |name| std::env::var(name).ok())
}

/// As [`select_export_mode`] with an injected variable lookup. Nothing set
/// anywhere is an error.
pub fn select_export_mode_with(
    flag: Option<&str>,
    manifest: Option<&StoneyManifest>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ExportMode> {
    if let Some(flag) = flag {
        return Ok(flag.parse()?);
    }
    if let Some(mode) = manifest.and_then(|m| m.build.export_mode) {
        return Ok(mode);
    }
    ExportMode::from_env_with(lookup).context(
        "no export mode: pass --export-mode, set [build] export-mode in stoneydsp.toml, \
         or set STONEYDSP_EXPORTS, STONEYDSP_IMPORTS or STONEYDSP_LOCAL",
    )
}
