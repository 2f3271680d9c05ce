//! Configuration error types.
//!
//! Every variant is fatal: a configuration that fails to resolve must stop
//! the build rather than fall back to a default.

use std::path::PathBuf;

/// Errors produced while resolving or loading a target configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No platform identity matches the OS/architecture signals.
    #[error("unknown platform: os '{os}' on architecture '{arch}'")]
    UnknownPlatform {
        /// The OS signal.
        os: String,
        /// The architecture signal.
        arch: String,
    },

    /// Architecture is neither Intel nor ARM (nor wasm on a wasm platform).
    #[error("unsupported architecture '{arch}' (expected an Intel or ARM target)")]
    UnsupportedArchitecture {
        /// The architecture signal.
        arch: String,
    },

    /// Pointer width is neither 32 nor 64 bits.
    #[error("unsupported word width: {bits} bits (expected 32 or 64)")]
    UnsupportedWordWidth {
        /// The pointer width signal.
        bits: u32,
    },

    /// Endianness signal is not "little" or "big".
    #[error("unknown byte order '{value}' (expected 'little' or 'big')")]
    UnknownByteOrder {
        /// The endian signal.
        value: String,
    },

    /// A 64-bit architecture running a 32-bit pointer ABI (x32, ILP32).
    #[error("unsupported data model: {bits}-bit pointers on 64-bit architecture '{arch}'")]
    UnsupportedDataModel {
        /// The architecture signal.
        arch: String,
        /// The pointer width signal.
        bits: u32,
    },

    /// Signals parse individually but cannot coexist.
    #[error("contradictory target signals: {detail}")]
    Contradictory {
        /// Description of the contradiction.
        detail: String,
    },

    /// Compiler identity supplied by build tooling is not recognized.
    #[error("unknown compiler '{value}' (expected clang, gcc or msvc)")]
    UnknownCompiler {
        /// The rejected name.
        value: String,
    },

    /// More than one export mode was requested for one artifact.
    #[error("export mode is ambiguous: more than one of export, import and local was requested")]
    ConflictingExportMode,

    /// No export mode was requested; local mode must be chosen explicitly.
    #[error(
        "export mode is not set: select exactly one of export, import or local \
         (STONEYDSP_EXPORTS, STONEYDSP_IMPORTS or STONEYDSP_LOCAL)"
    )]
    ExportModeUnset,

    /// Export mode name could not be parsed.
    #[error("unknown export mode '{value}' (expected 'export', 'import' or 'local')")]
    UnknownExportMode {
        /// The rejected name.
        value: String,
    },

    /// A target triple could not be decomposed into signals.
    #[error("invalid target triple '{triple}': {detail}")]
    InvalidTriple {
        /// The rejected triple.
        triple: String,
        /// What went wrong.
        detail: String,
    },

    /// A required build-environment variable is unset.
    #[error("missing build signal: {name} is not set")]
    MissingSignal {
        /// Name of the environment variable.
        name: &'static str,
    },

    /// A build-environment variable is set to an unusable value.
    #[error("invalid build signal: {name} = '{value}'")]
    InvalidSignal {
        /// Name of the environment variable.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A target definition file is well-formed TOML but not a usable definition.
    #[error("invalid target definition: {detail}")]
    InvalidDefinition {
        /// What is wrong with the definition.
        detail: String,
    },

    /// Version string is not valid semver.
    #[error("invalid version: {0}")]
    InvalidVersion(#[from] semver::Error),

    /// Version components do not fit the packed hex encoding.
    #[error("version {version} is out of range (major <= 65535, minor and patch <= 255)")]
    VersionOutOfRange {
        /// The rejected version.
        version: String,
    },

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading/writing target files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Target file not found.
    #[error("target file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
