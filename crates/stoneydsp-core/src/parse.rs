//! TOML loading, serialization and discovery for target definitions.
//!
//! A target definition names a set of [`TargetSignals`] so a cross build can
//! be described once and checked into a project. Definitions live as
//! `<name>.target.toml` files in the project's `targets/` directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::platform::{resolve, Configuration};
use crate::signals::TargetSignals;

/// File suffix of target definitions.
pub const TARGET_SUFFIX: &str = ".target.toml";

/// A named set of target signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub signals: TargetSignals,
}

impl TargetDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        signals: TargetSignals,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            signals,
        }
    }
}

/// Load a target definition from a `.target.toml` file.
pub fn load_target_toml(path: &Path) -> Result<TargetDefinition> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let def = parse_target_toml(&content)?;
    tracing::debug!(path = %path.display(), name = %def.name, "loaded target definition");
    Ok(def)
}

/// Parse a target definition from a TOML string.
pub fn parse_target_toml(toml_str: &str) -> Result<TargetDefinition> {
    let def: TargetDefinition = toml::from_str(toml_str)?;
    Ok(def)
}

/// Serialize a target definition to pretty TOML.
pub fn target_to_toml(def: &TargetDefinition) -> Result<String> {
    let toml_str = toml::to_string_pretty(def)?;
    Ok(toml_str)
}

/// Resolve a definition's signals, rejecting definitions that do not name a
/// supported configuration.
pub fn validate_target(def: &TargetDefinition) -> Result<Configuration> {
    if def.name.trim().is_empty() {
        return Err(ConfigError::InvalidDefinition {
            detail: "the name is empty".into(),
        });
    }
    resolve(&def.signals)
}

/// Generate a template `.target.toml` seeded from the host's signals.
pub fn generate_template(name: &str) -> Result<String> {
    let def = TargetDefinition::new(
        name,
        format!("{name} (generated from {}-{})", std::env::consts::ARCH, std::env::consts::OS),
        TargetSignals::host(),
    );
    target_to_toml(&def)
}

/// Discover all `.target.toml` files in a project's `targets/` directory.
///
/// Returns `(target_name, file_path)` pairs sorted by name.
pub fn discover_targets(project_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let targets_dir = project_dir.join("targets");
    if !targets_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut targets = Vec::new();
    for entry in std::fs::read_dir(&targets_dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(TARGET_SUFFIX));
        if let Some(name) = name {
            targets.push((name.to_string(), path.clone()));
        }
    }
    targets.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{CpuFamily, Platform, HOST};

    #[test]
    fn round_trip_definition() {
        let original = TargetDefinition::new(
            "pi",
            "Raspberry Pi 4",
            TargetSignals::from_triple("aarch64-unknown-linux-gnu").unwrap(),
        );
        let toml_str = target_to_toml(&original).unwrap();
        assert_eq!(parse_target_toml(&toml_str).unwrap(), original);
    }

    #[test]
    fn parse_minimal_toml() {
        let toml_str = r#"
name = "minimal-arm"

[signals]
os = "linux"
arch = "arm"
pointer-width = 32
endian = "little"
"#;
        let def = parse_target_toml(toml_str).unwrap();
        assert_eq!(def.name, "minimal-arm");
        assert!(def.description.is_empty());
        assert_eq!(def.signals.vendor, "unknown");
        let config = validate_target(&def).unwrap();
        assert_eq!(config.cpu, CpuFamily::Arm);
        assert_eq!(config.platform, Platform::Linux);
    }

    #[test]
    fn parse_compiler_override() {
        let toml_str = r#"
name = "clang-linux"

[signals]
os = "linux"
arch = "x86_64"
pointer-width = 64
endian = "little"
env = "gnu"
compiler = "clang"
"#;
        let def = parse_target_toml(toml_str).unwrap();
        let config = validate_target(&def).unwrap();
        assert_eq!(config.compiler, crate::platform::Compiler::Clang);
    }

    #[test]
    fn parse_invalid_returns_error() {
        assert!(matches!(
            parse_target_toml("this is not valid toml [[["),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn parse_missing_field_returns_error() {
        assert!(parse_target_toml("name = \"incomplete\"\n").is_err());
    }

    #[test]
    fn validate_rejects_unsupported_arch() {
        let def = TargetDefinition::new(
            "ppc",
            "",
            TargetSignals::from_triple("powerpc64le-unknown-linux-gnu").unwrap(),
        );
        assert!(matches!(
            validate_target(&def),
            Err(ConfigError::UnsupportedArchitecture { .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let def = TargetDefinition::new("  ", "", TargetSignals::host());
        let err = validate_target(&def).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDefinition { .. }));
        assert_eq!(err.to_string(), "invalid target definition: the name is empty");
    }

    #[test]
    fn generate_template_is_valid() {
        let toml_str = generate_template("my-host").unwrap();
        let def = parse_target_toml(&toml_str).unwrap();
        assert_eq!(def.name, "my-host");
        assert_eq!(validate_target(&def).unwrap(), HOST);
    }

    #[test]
    fn discover_targets_finds_files() {
        let dir = tempfile::tempdir().unwrap();
        let targets_dir = dir.path().join("targets");
        std::fs::create_dir_all(&targets_dir).unwrap();

        let template = generate_template("board-a").unwrap();
        std::fs::write(targets_dir.join("board-b.target.toml"), &template).unwrap();
        std::fs::write(targets_dir.join("board-a.target.toml"), &template).unwrap();
        std::fs::write(targets_dir.join("notes.txt"), "ignore me").unwrap();

        let targets = discover_targets(dir.path()).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].0, "board-a");
        assert_eq!(targets[1].0, "board-b");
    }

    #[test]
    fn discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_targets(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn load_not_found() {
        let result = load_target_toml(Path::new("/nonexistent/path.target.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.target.toml");
        std::fs::write(&path, generate_template("file-test").unwrap()).unwrap();

        let def = load_target_toml(&path).unwrap();
        assert_eq!(def.name, "file-test");
    }
}
