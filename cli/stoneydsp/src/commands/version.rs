//! `stoneydsp version`: print the library version descriptor.

use anyhow::Result;
use serde_json::json;
use stoneydsp_core::{ExportMode, HOST, VERSION};

use super::Format;

pub fn run(format: Format) -> Result<()> {
    print!("{}", render(format)?);
    Ok(())
}

pub fn render(format: Format) -> Result<String> {
    if format == Format::Json {
        let value = json!({
            "version": VERSION.to_string(),
            "major": VERSION.major,
            "minor": VERSION.minor,
            "patch": VERSION.patch,
            "pre": VERSION.pre,
            "hex": VERSION.hex(),
            "long": VERSION.long(),
            "release": VERSION.is_release(),
        });
        return Ok(format!("{}\n", serde_json::to_string_pretty(&value)?));
    }

    let mut text = String::new();
    text.push_str(&format!("{}\n", VERSION.banner()));
    text.push_str(&format!("  hex:    0x{:06X}\n", VERSION.hex()));
    text.push_str(&format!("  long:   {}\n", VERSION.long()));
    text.push_str(&format!("  built:  {HOST} ({})\n", ExportMode::CURRENT));
    Ok(text)
}
