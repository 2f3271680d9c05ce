//! C configuration header rendering.
//!
//! Emits the `STONEYDSP_*` macros a C or C++ consumer needs to agree with a
//! resolved configuration: platform flags, version and copyright, calling
//! convention and visibility, struct packing, allocator and alignment
//! attributes, and the fixed-width typedefs.

use crate::export::{ExportMode, PublicAnnotations};
use crate::platform::{Compiler, Configuration};
use crate::types::{TypeKind, TYPE_TABLE};
use crate::version::{Version, COPYRIGHT};

/// Include guard of the generated header.
pub const HEADER_GUARD: &str = "STONEYDSP_CONFIG_H_INCLUDED";

/// Render the configuration header. Same inputs, byte-identical output.
pub fn render_config_header(
    config: &Configuration,
    mode: ExportMode,
    version: &Version,
) -> String {
    let annotations = PublicAnnotations::resolve(mode, config);
    let compiler = config.compiler;
    let mut text = String::new();

    text.push_str("/* Generated by stoneydsp. Do not edit. */\n");
    text.push_str(&format!("/* Target: {config} ({mode}) */\n\n"));
    text.push_str(&format!("#ifndef {HEADER_GUARD}\n#define {HEADER_GUARD}\n\n"));
    text.push_str("#include <stddef.h>\n#include <stdint.h>\n\n");

    for define in config.defines() {
        text.push_str(&format!("#define {define} 1\n"));
    }
    text.push_str(&format!(
        "#define STONEYDSP_COMPILER \"{}\"\n",
        compiler.display_name()
    ));
    match mode {
        ExportMode::Export => text.push_str("#define STONEYDSP_EXPORTS 1\n"),
        ExportMode::Import => text.push_str("#define STONEYDSP_IMPORTS 1\n"),
        ExportMode::Local => {}
    }
    text.push('\n');

    text.push_str(&format!("#define STONEYDSP_VERSION_MAJOR {}\n", version.major));
    text.push_str(&format!("#define STONEYDSP_VERSION_MINOR {}\n", version.minor));
    text.push_str(&format!("#define STONEYDSP_VERSION_PATCH {}\n", version.patch));
    let tweak = if version.is_release() {
        String::new()
    } else {
        format!("-{}", version.pre)
    };
    text.push_str(&format!("#define STONEYDSP_VERSION_TWEAK \"{tweak}\"\n"));
    text.push_str(&format!("#define STONEYDSP_VERSION_STRING \"{version}\"\n"));
    text.push_str(&format!("#define STONEYDSP_VERSION_HEX 0x{:06X}\n", version.hex()));
    text.push_str(&format!("#define STONEYDSP_VERSION_LONG {}\n", version.long()));
    text.push_str(&format!(
        "#define STONEYDSP_VERSION_IS_RELEASE {}\n",
        u8::from(version.is_release())
    ));
    text.push_str(&format!("#define STONEYDSP_COPYRIGHT \"{COPYRIGHT}\"\n\n"));

    text.push_str(&define_line(
        "STONEYDSP_CALLTYPE",
        annotations.calltype.c_attribute(compiler),
    ));
    text.push_str(&define_line(
        "STONEYDSP_CDECL",
        annotations.cdecl.c_attribute(compiler),
    ));
    text.push_str(&define_line(
        "STONEYDSP_API",
        annotations.visibility.c_attribute(compiler),
    ));
    text.push_str("#define STONEYDSP_PUBLIC_FUNCTION STONEYDSP_API STONEYDSP_CALLTYPE\n");
    text.push_str(&format!("#define STONEYDSP_ALIGN(n) {}\n", align_attribute(compiler)));
    let (packed_begin, packed_end) = packed_struct(compiler);
    text.push_str(&define_line("STONEYDSP_PACKED_STRUCT_BEGIN", packed_begin));
    text.push_str(&define_line("STONEYDSP_PACKED_STRUCT_END", packed_end));
    text.push_str(&define_line("STONEYDSP_MALLOC_ATTR", malloc_attribute(compiler)));
    text.push('\n');

    text.push_str("#ifdef __cplusplus\n");
    text.push_str("#define STONEYDSP_STATIC_ASSERT(c, m) static_assert(c, m)\n");
    text.push_str("#else\n");
    text.push_str("#define STONEYDSP_STATIC_ASSERT(c, m) _Static_assert(c, m)\n");
    text.push_str("#endif\n\n");

    let word_bits = config.word_width.bits();
    let typedefs: Vec<(&str, &str, u32)> = TYPE_TABLE
        .iter()
        .filter_map(|t| match (t.kind, t.name) {
            (TypeKind::Fixed | TypeKind::Float, _) => Some((t.name, t.c_name, t.width_bits)),
            (TypeKind::Native, "size_t" | "ptrdiff_t") => Some((t.name, t.c_name, word_bits)),
            (TypeKind::Native, _) => None,
        })
        .collect();

    for (name, c_name, _) in &typedefs {
        text.push_str(&format!("typedef {c_name} stoneydsp_{name};\n"));
    }
    // No Rust type mirrors max_align_t (it covers long double), so it is
    // forwarded from <stddef.h> rather than sized here.
    text.push_str("typedef max_align_t stoneydsp_max_align_t;\n\n");
    for (name, _, bits) in &typedefs {
        text.push_str(&format!(
            "STONEYDSP_STATIC_ASSERT(sizeof(stoneydsp_{name}) * 8 == {bits}, \
             \"stoneydsp_{name} must be {bits} bits\");\n"
        ));
    }

    text.push_str(&format!("\n#endif /* {HEADER_GUARD} */\n"));
    text
}

fn define_line(name: &str, value: &str) -> String {
    if value.is_empty() {
        format!("#define {name}\n")
    } else {
        format!("#define {name} {value}\n")
    }
}

fn align_attribute(compiler: Compiler) -> &'static str {
    match compiler {
        Compiler::Msvc => "__declspec(align(n))",
        Compiler::Clang | Compiler::Gcc => "__attribute__((aligned(n)))",
    }
}

/// Text placed before and after a struct declaration to pack it to 1 byte.
fn packed_struct(compiler: Compiler) -> (&'static str, &'static str) {
    match compiler {
        Compiler::Msvc => ("__pragma(pack(push, 1))", "__pragma(pack(pop))"),
        Compiler::Clang | Compiler::Gcc => ("", "__attribute__((packed))"),
    }
}

fn malloc_attribute(compiler: Compiler) -> &'static str {
    match compiler {
        Compiler::Msvc => "__declspec(restrict)",
        Compiler::Clang | Compiler::Gcc => "__attribute__((malloc))",
    }
}
