//! StoneyDSP core capability facade.
//!
//! Resolves exactly one platform, word width, byte order, CPU family and
//! compiler for the compilation target, exposes fixed-width semantic types
//! with build-time width checks, and controls how public entry points are
//! exported across the C boundary.
//!
//! ## Modules
//!
//! - [`signals`]: raw target signals (host, build-script environment, triples)
//! - [`platform`]: resolution of signals into a [`Configuration`]
//! - [`types`]: the semantic type table and byte-level access
//! - [`float`]: IEEE-754 limits and special values
//! - [`export`]: export mode, visibility, calling convention, [`public_function!`]
//! - [`version`]: the structured version descriptor
//! - [`header`]: C configuration header rendering
//! - [`parse`]: `.target.toml` target definitions

pub mod error;
pub mod export;
pub mod float;
pub mod header;
pub mod parse;
pub mod platform;
pub mod signals;
pub mod types;
pub mod version;

#[doc(hidden)]
pub use static_assertions as __static_assertions;

// Re-export key types for convenience
pub use error::{ConfigError, Result};
pub use export::{CallingConvention, ExportMode, PublicAnnotations, Visibility};
pub use float::IeeeFloat;
pub use header::render_config_header;
pub use parse::TargetDefinition;
pub use platform::{
    resolve, ByteOrder, Compiler, Configuration, CpuFamily, Platform, WordWidth, HOST,
};
pub use signals::TargetSignals;
pub use types::{FixedInt, FixedWidth, SemanticType, Wrapping, TYPE_TABLE};
pub use version::{Version, COPYRIGHT, VERSION};
