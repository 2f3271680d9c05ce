//! `stoneydsp types`: print the semantic type table.

use anyhow::Result;
use stoneydsp_core::types::{TypeKind, TYPE_TABLE};

use super::Format;

pub fn run(format: Format) -> Result<()> {
    print!("{}", render(format)?);
    Ok(())
}

pub fn render(format: Format) -> Result<String> {
    if format == Format::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(TYPE_TABLE)?));
    }

    let mut text = String::new();
    text.push_str(&format!(
        "{:<16} {:>4} {:<9} {:>5}  {:<6} {}\n",
        "NAME", "BITS", "SIGNED", "ALIGN", "KIND", "C TYPE"
    ));
    for t in TYPE_TABLE {
        let kind = match t.kind {
            TypeKind::Fixed => "fixed",
            TypeKind::Native => "native",
            TypeKind::Float => "float",
        };
        text.push_str(&format!(
            "{:<16} {:>4} {:<9} {:>5}  {:<6} {}\n",
            t.name,
            t.width_bits,
            t.signedness.to_string(),
            t.align,
            kind,
            t.c_name
        ));
    }
    Ok(text)
}
