//! `stoneydsp describe`: resolve a target and show the result.

use anyhow::{Context, Result};
use serde_json::json;
use stoneydsp_core::{resolve, ExportMode, PublicAnnotations};

use super::{Format, SelectedTarget};

pub fn run(selected: &SelectedTarget, mode: ExportMode, format: Format) -> Result<()> {
    print!("{}", render(selected, mode, format)?);
    Ok(())
}

pub fn render(selected: &SelectedTarget, mode: ExportMode, format: Format) -> Result<String> {
    let config = resolve(&selected.signals)
        .with_context(|| format!("resolving target '{}'", selected.label))?;
    let annotations = PublicAnnotations::resolve(mode, &config);

    if format == Format::Json {
        let value = json!({
            "target": selected.label,
            "signals": selected.signals,
            "configuration": config,
            "defines": config.defines(),
            "annotations": annotations,
        });
        return Ok(format!("{}\n", serde_json::to_string_pretty(&value)?));
    }

    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let or_none = |s: &str| if s.is_empty() { "(none)".to_string() } else { s.to_string() };
    let compiler = config.compiler;

    let mut text = String::new();
    text.push_str(&format!("=== Target: {} ===\n", selected.label));
    text.push_str(&format!("{config}\n\n"));
    text.push_str(&format!("  Platform:    {}\n", config.platform));
    text.push_str(&format!("  Word width:  {}\n", config.word_width));
    text.push_str(&format!("  Byte order:  {}\n", config.byte_order));
    text.push_str(&format!("  CPU family:  {}\n", config.cpu));
    text.push_str(&format!("  Compiler:    {}\n", compiler));
    text.push_str(&format!("  MinGW:       {}\n", yes_no(config.mingw)));
    text.push_str(&format!("  Debug:       {}\n", yes_no(config.debug)));
    text.push('\n');

    text.push_str("Defines:\n");
    for define in config.defines() {
        text.push_str(&format!("  {define}\n"));
    }
    text.push('\n');

    text.push_str(&format!("Public entry points ({mode}):\n"));
    text.push_str(&format!(
        "  Visibility:  {:<12} {}\n",
        annotations.visibility.to_string(),
        or_none(annotations.visibility.c_attribute(compiler))
    ));
    text.push_str(&format!(
        "  Calltype:    {:<12} {}\n",
        annotations.calltype.to_string(),
        or_none(annotations.calltype.c_attribute(compiler))
    ));
    text.push_str(&format!(
        "  Cdecl:       {:<12} {}\n",
        annotations.cdecl.to_string(),
        or_none(annotations.cdecl.c_attribute(compiler))
    ));
    Ok(text)
}
