//! S2E Project: configuration rules for new S2E analysis projects
//!
//! Sits between target/image selection and template rendering. Given the
//! project kind of a target binary it decides which guest images can run
//! the binary, fixes up the project configuration, and records facts about
//! the binary that the bootstrap and Lua templates need.
//!
//! ## Key Components
//!
//! - [`ProjectKind`]: Windows, Linux or CGC; dispatches all per-kind rules
//! - [`ProjectConfig`]: JSON option map mutated in place by the rules
//! - [`is_valid_arch`] / [`OsDescriptor`]: image compatibility
//! - [`BinaryAnalyzer`]: scoped binary inspection, [`ElfAnalyzer`] for ELF
//! - [`ImageCatalog`]: image descriptors filtered by compatibility

pub mod analyzer;
pub mod compat;
pub mod config;
pub mod error;
pub mod image;
pub mod kind;
pub mod telemetry;

pub use analyzer::{AnalyzedBinary, BinaryAnalyzer, ElfAnalyzer};
pub use compat::{is_valid_arch, OsDescriptor};
pub use config::{keys, ProjectConfig};
pub use error::{AnalyzerError, ProjectError, Result};
pub use image::{ImageCatalog, ImageDescriptor};
pub use kind::{ProjectKind, ValidationReport};
pub use telemetry::init_tracing;
