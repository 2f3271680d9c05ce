//! Symbol visibility and calling convention for the public C boundary.
//!
//! One [`PublicAnnotations`] pair (visibility + calling convention) is
//! resolved per configuration and applied to every public entry point. In
//! Rust code the pair is applied by [`public_function!`](crate::public_function);
//! the C header renders the same pair as `STONEYDSP_PUBLIC_FUNCTION`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::platform::{Compiler, Configuration, CpuFamily, Platform, WordWidth};

/// Environment variable requesting export mode.
pub const EXPORTS_ENV: &str = "STONEYDSP_EXPORTS";
/// Environment variable requesting import mode.
pub const IMPORTS_ENV: &str = "STONEYDSP_IMPORTS";
/// Environment variable requesting local mode.
pub const LOCAL_ENV: &str = "STONEYDSP_LOCAL";

/// Role of the artifact being built with respect to the public symbols.
///
/// There is no default: exactly one mode has to be selected, through the
/// `export` / `import` / `local` cargo features at build time or the
/// matching `STONEYDSP_*` variables for tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    /// Building the shared library that provides the symbols.
    Export,
    /// Consuming a prebuilt shared library.
    Import,
    /// Static or internal use; nothing crosses a library boundary.
    Local,
}

/// The mode selected by exactly one of three flags, evaluated at compile
/// time. Any other combination aborts const evaluation, which is how this
/// crate refuses to build without exactly one of its `export`, `import` and
/// `local` features.
///
/// ```
/// use stoneydsp_core::export::{require_single_export_mode, ExportMode};
///
/// const MODE: ExportMode = require_single_export_mode(false, false, true);
/// assert_eq!(MODE, ExportMode::Local);
/// ```
///
/// Two modes at once do not build:
///
/// ```compile_fail
/// use stoneydsp_core::export::{require_single_export_mode, ExportMode};
///
/// const MODE: ExportMode = require_single_export_mode(true, true, false);
/// # fn main() { let _ = MODE; }
/// ```
///
/// Neither does no mode at all:
///
/// ```compile_fail
/// use stoneydsp_core::export::{require_single_export_mode, ExportMode};
///
/// const MODE: ExportMode = require_single_export_mode(false, false, false);
/// # fn main() { let _ = MODE; }
/// ```
pub const fn require_single_export_mode(exports: bool, imports: bool, local: bool) -> ExportMode {
    match (exports, imports, local) {
        (true, false, false) => ExportMode::Export,
        (false, true, false) => ExportMode::Import,
        (false, false, true) => ExportMode::Local,
        (false, false, false) => {
            panic!("no export mode selected: enable the `export`, `import` or `local` feature")
        }
        _ => panic!(
            "export modes are mutually exclusive: enable only one of the `export`, `import` or \
             `local` features (use `default-features = false` with `export` or `import`)"
        ),
    }
}

const _: ExportMode = ExportMode::CURRENT;

impl ExportMode {
    /// Mode selected by this crate's cargo features.
    pub const CURRENT: ExportMode = require_single_export_mode(
        cfg!(feature = "export"),
        cfg!(feature = "import"),
        cfg!(feature = "local"),
    );

    /// Mode from three build flags; exactly one must be set.
    pub fn from_flags(exports: bool, imports: bool, local: bool) -> Result<Self> {
        match (exports, imports, local) {
            (true, false, false) => Ok(Self::Export),
            (false, true, false) => Ok(Self::Import),
            (false, false, true) => Ok(Self::Local),
            (false, false, false) => Err(ConfigError::ExportModeUnset),
            _ => Err(ConfigError::ConflictingExportMode),
        }
    }

    /// Mode from `STONEYDSP_EXPORTS` / `STONEYDSP_IMPORTS` / `STONEYDSP_LOCAL`
    /// in the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Mode from an arbitrary variable lookup. A variable counts as set
    /// unless it is empty, `0`, `false` or `off`. None set is an error.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let is_set = |name: &str| {
            lookup(name).is_some_and(|v| {
                let v = v.trim().to_ascii_lowercase();
                !matches!(v.as_str(), "" | "0" | "false" | "off")
            })
        };
        let mode = Self::from_flags(is_set(EXPORTS_ENV), is_set(IMPORTS_ENV), is_set(LOCAL_ENV))?;
        tracing::debug!(%mode, "export mode from environment");
        Ok(mode)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::Import => "import",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "export" | "exports" => Ok(Self::Export),
            "import" | "imports" => Ok(Self::Import),
            "local" | "static" | "none" => Ok(Self::Local),
            _ => Err(ConfigError::UnknownExportMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Calling convention of public entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallingConvention {
    /// 32-bit x86 callee-cleanup.
    Stdcall,
    /// 32-bit x86 caller-cleanup.
    Cdecl,
    /// Microsoft x64.
    Win64,
    /// System V AMD64.
    #[serde(rename = "sysv64")]
    SysV64,
    /// 32-bit ARM procedure call standard.
    Aapcs,
    /// The platform's default C convention.
    C,
}

impl CallingConvention {
    /// Convention applied to public entry points on `config`.
    pub fn resolve(config: &Configuration) -> Self {
        match (config.cpu, config.word_width) {
            (CpuFamily::Wasm, _) => Self::C,
            (CpuFamily::Intel, WordWidth::Bits32) => Self::Stdcall,
            (CpuFamily::Arm, WordWidth::Bits32) => Self::Aapcs,
            (CpuFamily::Intel, WordWidth::Bits64) if config.platform == Platform::Windows => {
                Self::Win64
            }
            (CpuFamily::Intel, WordWidth::Bits64) => Self::SysV64,
            (CpuFamily::Arm, WordWidth::Bits64) => Self::C,
        }
    }

    /// Caller-cleanup companion convention on `config`: cdecl on 32-bit x86
    /// and on Windows x64, the default convention on 32-bit ARM, otherwise
    /// the same as [`resolve`](Self::resolve).
    pub fn resolve_cdecl(config: &Configuration) -> Self {
        match Self::resolve(config) {
            Self::Stdcall | Self::Win64 => Self::Cdecl,
            Self::Aapcs => Self::C,
            other => other,
        }
    }

    /// ABI string for `extern "..."`.
    pub fn rust_abi(&self) -> &'static str {
        match self {
            Self::Stdcall => "stdcall",
            Self::Cdecl => "cdecl",
            Self::Win64 => "win64",
            Self::SysV64 => "sysv64",
            Self::Aapcs => "aapcs",
            Self::C => "C",
        }
    }

    /// C spelling of the convention for `compiler` (empty when the default
    /// convention already applies).
    pub fn c_attribute(&self, compiler: Compiler) -> &'static str {
        match (self, compiler) {
            (Self::Stdcall, Compiler::Msvc) => "__stdcall",
            (Self::Stdcall, _) => "__attribute__((stdcall))",
            (Self::Cdecl, Compiler::Msvc) => "__cdecl",
            (Self::Cdecl, _) => "__attribute__((cdecl))",
            (Self::Win64, Compiler::Msvc) => "",
            (Self::Win64, _) => "__attribute__((ms_abi))",
            (Self::SysV64, _) => "__attribute__((sysv_abi))",
            (Self::Aapcs, Compiler::Msvc) => "",
            (Self::Aapcs, _) => "__attribute__((pcs(\"aapcs\")))",
            (Self::C, _) => "",
        }
    }
}

impl fmt::Display for CallingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_abi())
    }
}

/// Symbol visibility of public entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    DllExport,
    DllImport,
    /// ELF/Mach-O default visibility.
    Default,
    /// ELF/Mach-O hidden visibility.
    Hidden,
    Unannotated,
}

impl Visibility {
    pub fn resolve(mode: ExportMode, platform: Platform) -> Self {
        match (platform, mode) {
            (Platform::Windows, ExportMode::Export) => Self::DllExport,
            (Platform::Windows, ExportMode::Import) => Self::DllImport,
            (Platform::Windows, ExportMode::Local) => Self::Unannotated,
            (_, ExportMode::Export) => Self::Default,
            (_, ExportMode::Import) => Self::Unannotated,
            (_, ExportMode::Local) => Self::Hidden,
        }
    }

    pub fn c_attribute(&self, compiler: Compiler) -> &'static str {
        match (self, compiler) {
            (Self::DllExport, Compiler::Msvc) => "__declspec(dllexport)",
            (Self::DllExport, _) => "__attribute__((dllexport))",
            (Self::DllImport, Compiler::Msvc) => "__declspec(dllimport)",
            (Self::DllImport, _) => "__attribute__((dllimport))",
            (Self::Default, _) => "__attribute__((visibility(\"default\")))",
            (Self::Hidden, _) => "__attribute__((visibility(\"hidden\")))",
            (Self::Unannotated, _) => "",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DllExport => write!(f, "dllexport"),
            Self::DllImport => write!(f, "dllimport"),
            Self::Default => write!(f, "default"),
            Self::Hidden => write!(f, "hidden"),
            Self::Unannotated => write!(f, "unannotated"),
        }
    }
}

/// The visibility/convention pair shared by every public entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PublicAnnotations {
    pub mode: ExportMode,
    pub visibility: Visibility,
    pub calltype: CallingConvention,
    pub cdecl: CallingConvention,
}

impl PublicAnnotations {
    pub fn resolve(mode: ExportMode, config: &Configuration) -> Self {
        Self {
            mode,
            visibility: Visibility::resolve(mode, config.platform),
            calltype: CallingConvention::resolve(config),
            cdecl: CallingConvention::resolve_cdecl(config),
        }
    }

    /// C prefix for a public function declaration (`API CALLTYPE`).
    pub fn c_prefix(&self, compiler: Compiler) -> String {
        [
            self.visibility.c_attribute(compiler),
            self.calltype.c_attribute(compiler),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// ABI string used by [`public_function!`](crate::public_function) on this
/// target.
pub const PUBLIC_ABI: &str = crate::__public_function_abi!(@abi);

/// Declare functions on the public C boundary.
///
/// Every function gets the target's public calling convention. With the
/// `export` feature the functions are exported unmangled; with `import` they
/// become `extern` declarations resolved from the prebuilt library (bodies are
/// discarded and calls need `unsafe`); with `local` they are plain Rust
/// functions.
///
/// This crate is an `rlib`. Exported symbols reach a shared library only
/// when a downstream crate with `crate-type = ["cdylib"]` links it with the
/// `export` feature.
///
/// ```
/// stoneydsp_core::public_function! {
///     pub fn stoneydsp_gain(sample: f32, gain: f32) -> f32 {
///         sample * gain
///     }
/// }
/// # #[cfg(not(feature = "import"))]
/// assert_eq!(stoneydsp_gain(0.5, 2.0), 1.0);
/// ```
#[macro_export]
macro_rules! public_function {
    ($($body:tt)*) => {
        $crate::__public_function_abi! { $($body)* }
    };
}

#[cfg(target_arch = "x86")]
#[doc(hidden)]
#[macro_export]
macro_rules! __public_function_abi {
    (@abi) => { "stdcall" };
    ($($body:tt)*) => { $crate::__public_function_mode! { "stdcall"; $($body)* } };
}

#[cfg(all(target_arch = "x86_64", windows))]
#[doc(hidden)]
#[macro_export]
macro_rules! __public_function_abi {
    (@abi) => { "win64" };
    ($($body:tt)*) => { $crate::__public_function_mode! { "win64"; $($body)* } };
}

#[cfg(all(target_arch = "x86_64", not(windows)))]
#[doc(hidden)]
#[macro_export]
macro_rules! __public_function_abi {
    (@abi) => { "sysv64" };
    ($($body:tt)*) => { $crate::__public_function_mode! { "sysv64"; $($body)* } };
}

#[cfg(target_arch = "arm")]
#[doc(hidden)]
#[macro_export]
macro_rules! __public_function_abi {
    (@abi) => { "aapcs" };
    ($($body:tt)*) => { $crate::__public_function_mode! { "aapcs"; $($body)* } };
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "arm")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __public_function_abi {
    (@abi) => { "C" };
    ($($body:tt)*) => { $crate::__public_function_mode! { "C"; $($body)* } };
}

#[cfg(feature = "export")]
#[doc(hidden)]
#[macro_export]
macro_rules! __public_function_mode {
    ($abi:tt; $(
        $(#[$attr:meta])*
        $vis:vis fn $name:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)? $body:block
    )*) => {
        $(
            $(#[$attr])*
            #[no_mangle]
            $vis extern $abi fn $name($($arg: $ty),*) $(-> $ret)? $body
        )*
    };
}

#[cfg(all(feature = "import", not(feature = "export")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __public_function_mode {
    ($abi:tt; $(
        $(#[$attr:meta])*
        $vis:vis fn $name:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)? $body:block
    )*) => {
        extern $abi {
            $(
                $(#[$attr])*
                $vis fn $name($($arg: $ty),*) $(-> $ret)?;
            )*
        }
    };
}

// Also the fallback when no mode feature is set, so the only error left is
// the one from `require_single_export_mode`.
#[cfg(not(any(feature = "export", feature = "import")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __public_function_mode {
    ($abi:tt; $(
        $(#[$attr:meta])*
        $vis:vis fn $name:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)? $body:block
    )*) => {
        $(
            $(#[$attr])*
            $vis fn $name($($arg: $ty),*) $(-> $ret)? $body
        )*
    };
}
