//! `stoneydsp header`: render the C configuration header.

use std::path::Path;

use anyhow::{Context, Result};
use stoneydsp_core::{render_config_header, resolve, ExportMode, VERSION};

use super::SelectedTarget;

/// Render the header for `selected`; write it to `output` when given,
/// otherwise print it.
pub fn run(selected: &SelectedTarget, mode: ExportMode, output: Option<&Path>) -> Result<()> {
    let text = render(selected, mode)?;
    match output {
        Some(path) => {
            write(path, &text)?;
            println!("Wrote {} ({}, {mode})", path.display(), selected.label);
        }
        None => print!("{text}"),
    }
    Ok(())
}

pub fn render(selected: &SelectedTarget, mode: ExportMode) -> Result<String> {
    let config = resolve(&selected.signals)
        .with_context(|| format!("resolving target '{}'", selected.label))?;
    Ok(render_config_header(&config, mode, &VERSION))
}

fn write(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = text.len(), "wrote configuration header");
    Ok(())
}
