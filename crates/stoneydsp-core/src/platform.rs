//! Platform, compiler and architecture resolution.
//!
//! Turns a [`TargetSignals`] bag into a [`Configuration`] with exactly one
//! value per category. The compilation target is resolved once, at compile
//! time, into [`HOST`]; [`resolve`] performs the same mapping for any other
//! target (cross builds, build scripts, the CLI).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::signals::TargetSignals;

#[cfg(not(any(
    windows,
    target_os = "android",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly",
    target_os = "linux",
    target_os = "macos",
    target_os = "ios",
    target_os = "tvos",
    target_os = "watchos",
    target_os = "visionos",
    target_arch = "wasm32",
    target_arch = "wasm64",
)))]
compile_error!(
    "unknown platform: StoneyDSP supports Windows, macOS, iOS, Linux, Android, BSD and WebAssembly"
);

#[cfg(not(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "arm",
    target_arch = "aarch64",
    target_arch = "arm64ec",
    target_arch = "wasm32",
    target_arch = "wasm64",
)))]
compile_error!("unsupported architecture: StoneyDSP requires an Intel or ARM target");

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("unsupported word width: StoneyDSP requires a 32-bit or 64-bit target");

#[cfg(all(
    any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "arm64ec"),
    target_pointer_width = "32"
))]
compile_error!("unsupported data model: StoneyDSP does not support x32 or ILP32 targets");

#[cfg(all(windows, target_endian = "big"))]
compile_error!("contradictory target: Windows targets are little-endian");

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Windows,
    #[serde(rename = "macos")]
    MacOs,
    Ios,
    Linux,
    Android,
    /// FreeBSD, OpenBSD, NetBSD and DragonFly.
    Bsd,
    /// WebAssembly, with or without WASI/Emscripten.
    Wasm,
}

impl Platform {
    const fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(any(
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )) {
            Self::Bsd
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(any(
            target_os = "ios",
            target_os = "tvos",
            target_os = "watchos",
            target_os = "visionos"
        )) {
            Self::Ios
        } else {
            Self::Wasm
        }
    }

    /// Name of the `STONEYDSP_*` flag set for this platform.
    pub fn macro_name(&self) -> &'static str {
        match self {
            Self::Windows => "STONEYDSP_WINDOWS",
            Self::MacOs => "STONEYDSP_MAC",
            Self::Ios => "STONEYDSP_IOS",
            Self::Linux => "STONEYDSP_LINUX",
            Self::Android => "STONEYDSP_ANDROID",
            Self::Bsd => "STONEYDSP_BSD",
            Self::Wasm => "STONEYDSP_WASM",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => write!(f, "Windows"),
            Self::MacOs => write!(f, "macOS"),
            Self::Ios => write!(f, "iOS"),
            Self::Linux => write!(f, "Linux"),
            Self::Android => write!(f, "Android"),
            Self::Bsd => write!(f, "BSD"),
            Self::Wasm => write!(f, "WebAssembly"),
        }
    }
}

/// Native word (pointer) width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WordWidth {
    Bits32,
    Bits64,
}

impl WordWidth {
    const fn host() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::Bits64
        } else {
            Self::Bits32
        }
    }

    /// Width in bits.
    pub const fn bits(&self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// Name of the `STONEYDSP_*` flag set for this width.
    pub fn macro_name(&self) -> &'static str {
        match self {
            Self::Bits32 => "STONEYDSP_32BIT",
            Self::Bits64 => "STONEYDSP_64BIT",
        }
    }
}

impl fmt::Display for WordWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Byte ordering of multi-byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    const fn host() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// Byte order of the compilation target.
    pub const fn native() -> Self {
        Self::host()
    }

    /// Name of the `STONEYDSP_*` flag set for this byte order.
    pub fn macro_name(&self) -> &'static str {
        match self {
            Self::Little => "STONEYDSP_LITTLE_ENDIAN",
            Self::Big => "STONEYDSP_BIG_ENDIAN",
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => write!(f, "little-endian"),
            Self::Big => write!(f, "big-endian"),
        }
    }
}

/// Processor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CpuFamily {
    /// x86 and x86-64.
    Intel,
    /// 32-bit ARM and AArch64.
    Arm,
    /// WebAssembly virtual machine (only on the Wasm platform).
    Wasm,
}

impl CpuFamily {
    const fn host() -> Self {
        if cfg!(any(target_arch = "x86", target_arch = "x86_64")) {
            Self::Intel
        } else if cfg!(any(
            target_arch = "arm",
            target_arch = "aarch64",
            target_arch = "arm64ec"
        )) {
            Self::Arm
        } else {
            Self::Wasm
        }
    }

    /// Name of the `STONEYDSP_*` flag set for this family.
    pub fn macro_name(&self) -> &'static str {
        match self {
            Self::Intel => "STONEYDSP_INTEL",
            Self::Arm => "STONEYDSP_ARM",
            Self::Wasm => "STONEYDSP_WASM_ARCH",
        }
    }
}

impl fmt::Display for CpuFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intel => write!(f, "Intel"),
            Self::Arm => write!(f, "ARM"),
            Self::Wasm => write!(f, "wasm"),
        }
    }
}

/// C toolchain family whose ABI conventions the target follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compiler {
    Clang,
    Gcc,
    Msvc,
}

impl Compiler {
    const fn host() -> Self {
        if cfg!(target_env = "msvc") {
            Self::Msvc
        } else if cfg!(target_vendor = "apple") {
            Self::Clang
        } else if cfg!(any(
            target_env = "gnu",
            target_env = "musl",
            target_env = "uclibc"
        )) {
            Self::Gcc
        } else {
            Self::Clang
        }
    }

    /// Human-readable vendor name, as reported in `STONEYDSP_COMPILER`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Clang => "Clang",
            Self::Gcc => "GNU",
            Self::Msvc => "MSVC",
        }
    }

    /// Name of the `STONEYDSP_*` flag set for this compiler.
    pub fn macro_name(&self) -> &'static str {
        match self {
            Self::Clang => "STONEYDSP_CLANG",
            Self::Gcc => "STONEYDSP_GCC",
            Self::Msvc => "STONEYDSP_MSVC",
        }
    }

    /// Parse a compiler identity from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "clang" | "llvm" => Some(Self::Clang),
            "gcc" | "gnu" => Some(Self::Gcc),
            "msvc" | "cl" => Some(Self::Msvc),
            _ => None,
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A fully resolved target configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    pub platform: Platform,
    pub word_width: WordWidth,
    pub byte_order: ByteOrder,
    pub cpu: CpuFamily,
    pub compiler: Compiler,
    /// Windows target built with a GNU toolchain.
    pub mingw: bool,
    /// Debug build.
    pub debug: bool,
}

/// Configuration of the compilation target, fixed at compile time.
pub const HOST: Configuration = Configuration {
    platform: Platform::host(),
    word_width: WordWidth::host(),
    byte_order: ByteOrder::host(),
    cpu: CpuFamily::host(),
    compiler: Compiler::host(),
    mingw: cfg!(all(windows, target_env = "gnu")),
    debug: cfg!(debug_assertions),
};

static_assertions::const_assert_eq!(HOST.word_width.bits() as usize, usize::BITS as usize);

impl Configuration {
    /// The `STONEYDSP_*` flags that are set, one per category, followed by
    /// the optional `STONEYDSP_MINGW` and `STONEYDSP_DEBUG`.
    pub fn defines(&self) -> Vec<&'static str> {
        let mut defines = vec![
            self.platform.macro_name(),
            self.word_width.macro_name(),
            self.byte_order.macro_name(),
            self.cpu.macro_name(),
            self.compiler.macro_name(),
        ];
        if self.mingw {
            defines.push("STONEYDSP_MINGW");
        }
        if self.debug {
            defines.push("STONEYDSP_DEBUG");
        }
        defines
    }

    /// Whether this configuration is the compilation target's.
    pub fn is_host(&self) -> bool {
        *self == HOST
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}, {}, {}",
            self.platform, self.word_width, self.cpu, self.byte_order, self.compiler
        )?;
        if self.mingw {
            write!(f, " (MinGW)")?;
        }
        if self.debug {
            write!(f, " [debug]")?;
        }
        Ok(())
    }
}

/// Resolve target signals into a configuration.
///
/// Deterministic and side-effect free: the same signals always yield the
/// same answer. Unrecognized or contradictory signals are an error, never a
/// default.
pub fn resolve(signals: &TargetSignals) -> Result<Configuration> {
    let platform = resolve_platform(signals)?;
    let word_width = match signals.pointer_width {
        32 => WordWidth::Bits32,
        64 => WordWidth::Bits64,
        bits => return Err(ConfigError::UnsupportedWordWidth { bits }),
    };
    let byte_order = match signals.endian.as_str() {
        "little" => ByteOrder::Little,
        "big" => ByteOrder::Big,
        other => {
            return Err(ConfigError::UnknownByteOrder {
                value: other.to_string(),
            })
        }
    };
    if platform == Platform::Windows && byte_order == ByteOrder::Big {
        return Err(ConfigError::Contradictory {
            detail: "Windows targets are little-endian".into(),
        });
    }

    let cpu = resolve_cpu(signals, platform)?;
    if word_width == WordWidth::Bits32 && is_64_bit_arch(&signals.arch) {
        return Err(ConfigError::UnsupportedDataModel {
            arch: signals.arch.clone(),
            bits: signals.pointer_width,
        });
    }
    let compiler = resolve_compiler(signals, platform)?;
    let mingw = platform == Platform::Windows && signals.env == "gnu";

    let config = Configuration {
        platform,
        word_width,
        byte_order,
        cpu,
        compiler,
        mingw,
        debug: signals.debug,
    };
    tracing::debug!(
        os = %signals.os,
        arch = %signals.arch,
        %config,
        "resolved target configuration"
    );
    Ok(config)
}

fn resolve_platform(signals: &TargetSignals) -> Result<Platform> {
    let platform = match signals.os.as_str() {
        "windows" => Platform::Windows,
        "android" => Platform::Android,
        "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Platform::Bsd,
        "linux" => Platform::Linux,
        "macos" | "darwin" => Platform::MacOs,
        "ios" | "tvos" | "watchos" | "visionos" => Platform::Ios,
        _ if is_wasm_arch(&signals.arch) => Platform::Wasm,
        _ => {
            return Err(ConfigError::UnknownPlatform {
                os: signals.os.clone(),
                arch: signals.arch.clone(),
            })
        }
    };
    Ok(platform)
}

fn resolve_cpu(signals: &TargetSignals, platform: Platform) -> Result<CpuFamily> {
    match signals.arch.as_str() {
        "x86" | "x86_64" => Ok(CpuFamily::Intel),
        "arm" | "aarch64" | "arm64ec" => Ok(CpuFamily::Arm),
        arch if is_wasm_arch(arch) && platform == Platform::Wasm => Ok(CpuFamily::Wasm),
        arch => Err(ConfigError::UnsupportedArchitecture {
            arch: arch.to_string(),
        }),
    }
}

fn resolve_compiler(signals: &TargetSignals, platform: Platform) -> Result<Compiler> {
    if let Some(compiler) = signals.compiler {
        if compiler == Compiler::Msvc && platform != Platform::Windows {
            return Err(ConfigError::Contradictory {
                detail: format!("MSVC cannot target {platform}"),
            });
        }
        return Ok(compiler);
    }
    if platform == Platform::Windows && signals.env.is_empty() {
        tracing::warn!("Windows target without an environment signal; assuming Clang");
    }
    let compiler = match (signals.env.as_str(), signals.vendor.as_str()) {
        ("msvc", _) => Compiler::Msvc,
        (_, "apple") => Compiler::Clang,
        ("gnu" | "musl" | "uclibc", _) => Compiler::Gcc,
        _ => Compiler::Clang,
    };
    Ok(compiler)
}

fn is_wasm_arch(arch: &str) -> bool {
    matches!(arch, "wasm32" | "wasm64")
}

fn is_64_bit_arch(arch: &str) -> bool {
    matches!(arch, "x86_64" | "aarch64" | "arm64ec" | "wasm64")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux_gnu_x86_64() -> TargetSignals {
        TargetSignals {
            os: "linux".into(),
            arch: "x86_64".into(),
            pointer_width: 64,
            endian: "little".into(),
            env: "gnu".into(),
            vendor: "unknown".into(),
            compiler: None,
            debug: false,
        }
    }

    #[test]
    fn host_signals_resolve_to_host() {
        let config = resolve(&TargetSignals::host()).unwrap();
        assert_eq!(config, HOST);
        assert!(config.is_host());
    }

    #[test]
    fn resolution_is_idempotent() {
        let signals = linux_gnu_x86_64();
        let first = resolve(&signals).unwrap();
        for _ in 0..4 {
            assert_eq!(resolve(&signals).unwrap(), first);
        }
    }

    #[test]
    fn linux_gnu_x86_64_resolves() {
        let config = resolve(&linux_gnu_x86_64()).unwrap();
        assert_eq!(config.platform, Platform::Linux);
        assert_eq!(config.word_width, WordWidth::Bits64);
        assert_eq!(config.byte_order, ByteOrder::Little);
        assert_eq!(config.cpu, CpuFamily::Intel);
        assert_eq!(config.compiler, Compiler::Gcc);
        assert!(!config.mingw);
    }

    #[test]
    fn windows_msvc_and_mingw() {
        let mut signals = linux_gnu_x86_64();
        signals.os = "windows".into();
        signals.vendor = "pc".into();
        signals.env = "msvc".into();
        let msvc = resolve(&signals).unwrap();
        assert_eq!(msvc.platform, Platform::Windows);
        assert_eq!(msvc.compiler, Compiler::Msvc);
        assert!(!msvc.mingw);

        signals.env = "gnu".into();
        let mingw = resolve(&signals).unwrap();
        assert_eq!(mingw.compiler, Compiler::Gcc);
        assert!(mingw.mingw);
    }

    #[test]
    fn apple_targets_use_clang() {
        let mut signals = linux_gnu_x86_64();
        signals.os = "macos".into();
        signals.arch = "aarch64".into();
        signals.vendor = "apple".into();
        signals.env = String::new();
        let config = resolve(&signals).unwrap();
        assert_eq!(config.platform, Platform::MacOs);
        assert_eq!(config.cpu, CpuFamily::Arm);
        assert_eq!(config.compiler, Compiler::Clang);

        signals.os = "ios".into();
        assert_eq!(resolve(&signals).unwrap().platform, Platform::Ios);
    }

    #[test]
    fn bsd_and_android() {
        let mut signals = linux_gnu_x86_64();
        signals.env = String::new();
        for os in ["freebsd", "openbsd", "netbsd", "dragonfly"] {
            signals.os = os.into();
            assert_eq!(resolve(&signals).unwrap().platform, Platform::Bsd, "{os}");
        }
        signals.os = "android".into();
        signals.arch = "aarch64".into();
        let config = resolve(&signals).unwrap();
        assert_eq!(config.platform, Platform::Android);
        assert_eq!(config.compiler, Compiler::Clang);
    }

    #[test]
    fn wasm_resolves_only_on_wasm_platform() {
        let signals = TargetSignals {
            os: "unknown".into(),
            arch: "wasm32".into(),
            pointer_width: 32,
            endian: "little".into(),
            env: String::new(),
            vendor: "unknown".into(),
            compiler: None,
            debug: false,
        };
        let config = resolve(&signals).unwrap();
        assert_eq!(config.platform, Platform::Wasm);
        assert_eq!(config.cpu, CpuFamily::Wasm);
        assert_eq!(config.word_width, WordWidth::Bits32);

        let mut linux_wasm = signals.clone();
        linux_wasm.os = "linux".into();
        assert!(matches!(
            resolve(&linux_wasm),
            Err(ConfigError::UnsupportedArchitecture { .. })
        ));
    }

    #[test]
    fn unsupported_architecture_is_an_error() {
        for arch in ["riscv64", "powerpc64", "mips", "s390x"] {
            let mut signals = linux_gnu_x86_64();
            signals.arch = arch.into();
            let err = resolve(&signals).unwrap_err();
            assert!(
                matches!(&err, ConfigError::UnsupportedArchitecture { arch: a } if a == arch),
                "{arch}: {err}"
            );
        }
    }

    #[test]
    fn unknown_platform_is_an_error() {
        let mut signals = linux_gnu_x86_64();
        signals.os = "haiku".into();
        let err = resolve(&signals).unwrap_err();
        assert!(err.to_string().contains("haiku"));
        assert!(matches!(err, ConfigError::UnknownPlatform { .. }));
    }

    #[test]
    fn bad_word_width_and_byte_order() {
        let mut signals = linux_gnu_x86_64();
        signals.pointer_width = 16;
        assert!(matches!(
            resolve(&signals),
            Err(ConfigError::UnsupportedWordWidth { bits: 16 })
        ));

        let mut signals = linux_gnu_x86_64();
        signals.endian = "middle".into();
        assert!(matches!(
            resolve(&signals),
            Err(ConfigError::UnknownByteOrder { .. })
        ));
    }

    #[test]
    fn x32_data_model_is_rejected() {
        let mut signals = linux_gnu_x86_64();
        signals.pointer_width = 32;
        let err = resolve(&signals).unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::UnsupportedDataModel { arch, bits: 32 } if arch == "x86_64"
        ));
        assert!(err.to_string().contains("x86_64"));

        signals.arch = "x86".into();
        assert_eq!(resolve(&signals).unwrap().word_width, WordWidth::Bits32);
    }

    #[test]
    fn contradictory_signals() {
        let mut signals = linux_gnu_x86_64();
        signals.os = "windows".into();
        signals.endian = "big".into();
        assert!(matches!(
            resolve(&signals),
            Err(ConfigError::Contradictory { .. })
        ));

        let mut signals = linux_gnu_x86_64();
        signals.compiler = Some(Compiler::Msvc);
        let err = resolve(&signals).unwrap_err();
        assert!(err.to_string().contains("MSVC"));
    }

    #[test]
    fn explicit_compiler_signal_wins() {
        let mut signals = linux_gnu_x86_64();
        signals.compiler = Some(Compiler::Clang);
        assert_eq!(resolve(&signals).unwrap().compiler, Compiler::Clang);
    }

    #[test]
    fn defines_have_one_flag_per_category() {
        let config = resolve(&linux_gnu_x86_64()).unwrap();
        assert_eq!(
            config.defines(),
            vec![
                "STONEYDSP_LINUX",
                "STONEYDSP_64BIT",
                "STONEYDSP_LITTLE_ENDIAN",
                "STONEYDSP_INTEL",
                "STONEYDSP_GCC",
            ]
        );

        let mut debug = config;
        debug.debug = true;
        assert_eq!(debug.defines().last(), Some(&"STONEYDSP_DEBUG"));
    }

    #[test]
    fn compiler_parse_and_display() {
        assert_eq!(Compiler::parse("GCC"), Some(Compiler::Gcc));
        assert_eq!(Compiler::parse("clang"), Some(Compiler::Clang));
        assert_eq!(Compiler::parse("MSVC"), Some(Compiler::Msvc));
        assert_eq!(Compiler::parse("icc"), None);
        assert_eq!(Compiler::Gcc.to_string(), "GNU");
    }

    #[test]
    fn configuration_display() {
        let config = resolve(&linux_gnu_x86_64()).unwrap();
        assert_eq!(config.to_string(), "Linux 64-bit Intel, little-endian, GNU");
    }
}
