//! `stoneydsp target`: listing, creation and validation of targets.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use stoneydsp_core::parse::{
    discover_targets, generate_template, load_target_toml, target_to_toml, validate_target,
    TargetDefinition, TARGET_SUFFIX,
};
use stoneydsp_core::signals::BUILTIN_TARGETS;
use stoneydsp_core::{resolve, Configuration, TargetSignals};

/// List built-in triples and the project's own definitions.
pub fn list(project_dir: &Path) -> Result<()> {
    print!("{}", listing(project_dir)?);
    Ok(())
}

pub fn listing(project_dir: &Path) -> Result<String> {
    let mut text = String::from("Built-in targets:\n\n");
    for (triple, description) in BUILTIN_TARGETS {
        text.push_str(&format!("  {triple:<32} {description}\n"));
    }

    let project = discover_targets(project_dir)?;
    if !project.is_empty() {
        text.push_str("\nProject targets:\n\n");
        for (name, path) in &project {
            let description = load_target_toml(path)
                .map(|def| def.description)
                .unwrap_or_else(|e| format!("(unreadable: {e})"));
            text.push_str(&format!("  {name:<32} {description}\n"));
        }
    }
    text.push_str("\nUse 'stoneydsp describe --target <name>' for details.\n");
    Ok(text)
}

/// Create `targets/<name>.target.toml`, seeded from `triple` or the host.
pub fn new(name: &str, triple: Option<&str>, project_dir: &Path, force: bool) -> Result<PathBuf> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        bail!("invalid target name '{name}' (use letters, digits, '-', '_' and '.')");
    }

    let path = project_dir
        .join("targets")
        .join(format!("{name}{TARGET_SUFFIX}"));
    if path.exists() && !force {
        bail!("{} already exists (pass --force to overwrite)", path.display());
    }

    let content = match triple {
        Some(triple) => {
            let signals = TargetSignals::from_triple(triple)?;
            let def = TargetDefinition::new(name, triple, signals);
            validate_target(&def).with_context(|| format!("'{triple}' is not a supported target"))?;
            target_to_toml(&def)?
        }
        None => generate_template(name)?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(path)
}

/// Resolve a project definition or a triple, failing if it is unsupported.
pub fn validate(name: &str, project_dir: &Path) -> Result<Configuration> {
    let path = project_dir
        .join("targets")
        .join(format!("{name}{TARGET_SUFFIX}"));
    let config = if path.is_file() {
        let def = load_target_toml(&path)?;
        validate_target(&def).with_context(|| format!("validating {}", path.display()))?
    } else {
        let signals = TargetSignals::from_triple(name).with_context(|| {
            format!("'{name}' is neither a definition in targets/ nor a target triple")
        })?;
        resolve(&signals).with_context(|| format!("validating '{name}'"))?
    };
    println!("{name}: ok ({config})");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoneydsp_core::{Platform, HOST};

    #[test]
    fn list_includes_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let text = listing(dir.path()).unwrap();
        assert!(text.contains("x86_64-unknown-linux-gnu"));
        assert!(!text.contains("Project targets"));
    }

    #[test]
    fn new_then_validate_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = new("pi", Some("aarch64-unknown-linux-gnu"), dir.path(), false).unwrap();
        assert!(path.is_file());

        let config = validate("pi", dir.path()).unwrap();
        assert_eq!(config.platform, Platform::Linux);

        let text = listing(dir.path()).unwrap();
        assert!(text.contains("Project targets"));
        assert!(text.contains("pi "));
    }

    #[test]
    fn new_from_host_template() {
        let dir = tempfile::tempdir().unwrap();
        new("local", None, dir.path(), false).unwrap();
        assert_eq!(validate("local", dir.path()).unwrap(), HOST);
    }

    #[test]
    fn new_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        new("board", None, dir.path(), false).unwrap();
        assert!(new("board", None, dir.path(), false).is_err());
        assert!(new("board", Some("wasm32-wasip1"), dir.path(), true).is_ok());
    }

    #[test]
    fn new_rejects_bad_names_and_targets() {
        let dir = tempfile::tempdir().unwrap();
        assert!(new("../escape", None, dir.path(), false).is_err());
        assert!(new("ppc", Some("powerpc-unknown-linux-gnu"), dir.path(), false).is_err());
        assert!(!dir.path().join("targets/ppc.target.toml").exists());
    }

    #[test]
    fn validate_triples() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate("x86_64-pc-windows-gnu", dir.path()).unwrap().mingw);
        assert!(validate("mips-unknown-linux-gnu", dir.path()).is_err());
        assert!(validate("nonexistent", dir.path()).is_err());
    }
}
