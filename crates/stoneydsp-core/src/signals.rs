//! Target-environment signals.
//!
//! The raw inputs to resolution: what the compiler (or a build script, or a
//! target triple) says about the OS, architecture, pointer width, byte order,
//! ABI environment and vendor. Values mirror the `CARGO_CFG_TARGET_*`
//! spellings so all three sources agree.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::platform::Compiler;

/// Named target triples that resolve to a supported configuration.
pub const BUILTIN_TARGETS: &[(&str, &str)] = &[
    ("x86_64-unknown-linux-gnu", "Linux x86-64 (GNU)"),
    ("i686-unknown-linux-gnu", "Linux x86 32-bit (GNU)"),
    ("aarch64-unknown-linux-gnu", "Linux AArch64 (GNU)"),
    ("armv7-unknown-linux-gnueabihf", "Linux ARMv7 hard-float (GNU)"),
    ("x86_64-pc-windows-msvc", "Windows x64 (MSVC)"),
    ("i686-pc-windows-msvc", "Windows x86 (MSVC)"),
    ("x86_64-pc-windows-gnu", "Windows x64 (MinGW)"),
    ("x86_64-apple-darwin", "macOS on Intel"),
    ("aarch64-apple-darwin", "macOS on Apple silicon"),
    ("aarch64-apple-ios", "iOS"),
    ("aarch64-linux-android", "Android AArch64"),
    ("x86_64-unknown-freebsd", "FreeBSD x86-64"),
    ("wasm32-unknown-unknown", "WebAssembly (no OS)"),
    ("wasm32-wasip1", "WebAssembly (WASI)"),
];

const KNOWN_VENDORS: &[&str] = &[
    "pc", "unknown", "apple", "uwp", "nvidia", "fortanix", "sun", "wrs", "kmc", "sony",
    "nintendo", "espressif", "openwrt",
];

fn default_vendor() -> String {
    "unknown".to_string()
}

/// The bag of signals a target configuration is resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetSignals {
    /// Operating system (`target_os`), e.g. "linux", "windows", "macos".
    pub os: String,
    /// Architecture (`target_arch`), e.g. "x86_64", "aarch64", "wasm32".
    pub arch: String,
    /// Pointer width in bits (`target_pointer_width`).
    pub pointer_width: u32,
    /// "little" or "big" (`target_endian`).
    pub endian: String,
    /// ABI environment (`target_env`), e.g. "gnu", "msvc", "musl", or empty.
    #[serde(default)]
    pub env: String,
    /// Vendor (`target_vendor`), e.g. "apple", "pc", "unknown".
    #[serde(default = "default_vendor")]
    pub vendor: String,
    /// Explicit compiler identity supplied by build tooling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<Compiler>,
    /// Debug build.
    #[serde(default)]
    pub debug: bool,
}

impl TargetSignals {
    /// Signals of the compilation target.
    pub fn host() -> Self {
        let os = match std::env::consts::OS {
            "" => "unknown",
            os => os,
        };
        let env = if cfg!(target_env = "msvc") {
            "msvc"
        } else if cfg!(target_env = "gnu") {
            "gnu"
        } else if cfg!(target_env = "musl") {
            "musl"
        } else if cfg!(target_env = "uclibc") {
            "uclibc"
        } else {
            ""
        };
        let vendor = if cfg!(target_vendor = "apple") {
            "apple"
        } else if cfg!(target_vendor = "pc") {
            "pc"
        } else {
            "unknown"
        };

        Self {
            os: os.into(),
            arch: std::env::consts::ARCH.into(),
            pointer_width: usize::BITS,
            endian: if cfg!(target_endian = "big") { "big" } else { "little" }.into(),
            env: env.into(),
            vendor: vendor.into(),
            compiler: None,
            debug: cfg!(debug_assertions),
        }
    }

    /// Signals of the target a build script is compiling for.
    ///
    /// Reads the `CARGO_CFG_TARGET_*` variables Cargo sets for build scripts,
    /// plus an optional `STONEYDSP_COMPILER` override.
    pub fn from_cargo_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Like [`from_cargo_env`](Self::from_cargo_env), with a custom lookup.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::MissingSignal { name });

        let os = required("CARGO_CFG_TARGET_OS")?;
        let arch = required("CARGO_CFG_TARGET_ARCH")?;
        let width = required("CARGO_CFG_TARGET_POINTER_WIDTH")?;
        let pointer_width = width.parse().map_err(|_| ConfigError::InvalidSignal {
            name: "CARGO_CFG_TARGET_POINTER_WIDTH",
            value: width.clone(),
        })?;
        let endian = required("CARGO_CFG_TARGET_ENDIAN")?;
        let env = lookup("CARGO_CFG_TARGET_ENV").unwrap_or_default();
        let vendor = lookup("CARGO_CFG_TARGET_VENDOR").unwrap_or_else(default_vendor);
        let compiler = match lookup("STONEYDSP_COMPILER") {
            Some(value) => Some(
                Compiler::parse(&value).ok_or(ConfigError::UnknownCompiler { value })?,
            ),
            None => None,
        };
        let debug = lookup("CARGO_CFG_DEBUG_ASSERTIONS").is_some();

        Ok(Self {
            os,
            arch,
            pointer_width,
            endian,
            env,
            vendor,
            compiler,
            debug,
        })
    }

    /// Decompose a target triple such as `x86_64-unknown-linux-gnu`.
    ///
    /// Accepts the four-part form as well as the common shorter ones
    /// (`aarch64-linux-android`, `wasm32-wasip1`). Pointer width and byte
    /// order come from the architecture, except that an x32 or ILP32
    /// environment (`gnux32`, `gnu_ilp32`) narrows pointers to 32 bits.
    pub fn from_triple(triple: &str) -> Result<Self> {
        let invalid = |detail: String| ConfigError::InvalidTriple {
            triple: triple.to_string(),
            detail,
        };

        let mut parts = triple.trim().split('-').filter(|p| !p.is_empty());
        let raw_arch = parts
            .next()
            .ok_or_else(|| invalid("empty triple".into()))?;
        let (arch, pointer_width, endian) = arch_layout(raw_arch)
            .ok_or_else(|| invalid(format!("unknown architecture '{raw_arch}'")))?;

        let mut rest: Vec<&str> = parts.collect();
        if rest.is_empty() {
            return Err(invalid("missing operating system".into()));
        }
        let vendor = if rest.len() >= 2 && KNOWN_VENDORS.contains(&rest[0]) {
            rest.remove(0).to_string()
        } else {
            default_vendor()
        };

        let mut os = normalize_os(rest[0]).to_string();
        let mut env = rest[1..].join("-");
        if env.starts_with("android") {
            os = "android".into();
            env.clear();
        }
        let pointer_width = if is_ilp32_env(&env) { 32 } else { pointer_width };
        let env = normalize_env(&env).to_string();

        tracing::debug!(triple, %arch, %os, %env, "decomposed target triple");
        Ok(Self {
            os,
            arch: arch.to_string(),
            pointer_width,
            endian: endian.to_string(),
            env,
            vendor,
            compiler: None,
            debug: false,
        })
    }
}

/// Normalized architecture name, pointer width and byte order.
fn arch_layout(arch: &str) -> Option<(&'static str, u32, &'static str)> {
    let layout = match arch {
        "x86_64" | "amd64" => ("x86_64", 64, "little"),
        "x86" | "i386" | "i486" | "i586" | "i686" => ("x86", 32, "little"),
        "aarch64" | "arm64" => ("aarch64", 64, "little"),
        "aarch64_be" => ("aarch64", 64, "big"),
        "arm64ec" => ("arm64ec", 64, "little"),
        "wasm32" => ("wasm32", 32, "little"),
        "wasm64" => ("wasm64", 64, "little"),
        "powerpc" => ("powerpc", 32, "big"),
        "powerpc64" => ("powerpc64", 64, "big"),
        "powerpc64le" => ("powerpc64", 64, "little"),
        "mips" => ("mips", 32, "big"),
        "mipsel" => ("mips", 32, "little"),
        "mips64" => ("mips64", 64, "big"),
        "mips64el" => ("mips64", 64, "little"),
        "s390x" => ("s390x", 64, "big"),
        "sparc64" => ("sparc64", 64, "big"),
        a if a.starts_with("armeb") || a.starts_with("thumbeb") => ("arm", 32, "big"),
        a if a.starts_with("arm") || a.starts_with("thumb") => ("arm", 32, "little"),
        a if a.starts_with("riscv32") => ("riscv32", 32, "little"),
        a if a.starts_with("riscv64") => ("riscv64", 64, "little"),
        _ => return None,
    };
    Some(layout)
}

fn normalize_os(os: &str) -> &str {
    match os {
        o if o.starts_with("darwin") || o == "macosx" => "macos",
        "wasi" | "wasip1" | "wasip2" => "wasi",
        o if o.starts_with("freebsd") => "freebsd",
        o if o.starts_with("openbsd") => "openbsd",
        o if o.starts_with("netbsd") => "netbsd",
        o => o,
    }
}

/// 32-bit pointer ABIs layered on a 64-bit architecture.
fn is_ilp32_env(env: &str) -> bool {
    env.ends_with("x32") || env.contains("ilp32")
}

fn normalize_env(env: &str) -> &str {
    match env {
        e if e.starts_with("gnu") => "gnu",
        e if e.starts_with("musl") => "musl",
        e if e.starts_with("uclibc") => "uclibc",
        "msvc" => "msvc",
        // eabi/eabihf, sim, macabi and friends describe the ABI, not the libc
        _ => "",
    }
}
