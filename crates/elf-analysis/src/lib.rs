//! ELF-Analysis: scoped ELF inspection for S2E project creation
//!
//! Opens a target binary, keeps its bytes for the lifetime of an
//! [`ElfAnalysis`] value, and answers the two questions project creation
//! asks of a Linux target:
//!
//! - is it dynamically linked?
//! - which of its imports have function models in S2E?
//!
//! The file buffer is released when the [`ElfAnalysis`] is dropped, so the
//! value doubles as the scope of the analysis.

mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod parse;

pub use error::ElfError;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::parse::{machine_name, ElfLayout, PT_DYNAMIC};

/// Result type for elf-analysis operations
pub type Result<T> = std::result::Result<T, ElfError>;

/// Library functions the S2E `FunctionModels` plugin can replace with models.
pub const MODELLED_FUNCTIONS: &[&str] = &[
    "strcpy", "strncpy", "strlen", "strcmp", "strncmp", "memcmp", "memcpy", "memset", "strcat",
    "strncat", "printf", "fprintf", "crc16", "crc32",
];

/// An opened and header-parsed ELF file.
#[derive(Debug)]
pub struct ElfAnalysis {
    path: PathBuf,
    bytes: Vec<u8>,
    layout: ElfLayout,
}

impl ElfAnalysis {
    /// Read `path` and parse its headers.
    ///
    /// Fails with a format error when the file is not a readable ELF image.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let layout = ElfLayout::parse(&bytes)?;
        debug!(
            path = %path.display(),
            size = bytes.len(),
            sections = layout.sections.len(),
            "Opened ELF file"
        );
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
            layout,
        })
    }

    /// Whether the binary carries a `PT_DYNAMIC` segment.
    pub fn is_dynamically_linked(&self) -> bool {
        self.layout.has_segment(PT_DYNAMIC)
    }

    /// Imported functions that appear in [`MODELLED_FUNCTIONS`].
    pub fn modelled_functions(&self) -> Result<BTreeSet<String>> {
        let modelled: BTreeSet<String> = self
            .layout
            .imported_functions(&self.bytes)?
            .into_iter()
            .filter(|name| MODELLED_FUNCTIONS.contains(name))
            .map(str::to_string)
            .collect();
        debug!(
            path = %self.path.display(),
            count = modelled.len(),
            "Collected modelled functions"
        );
        Ok(modelled)
    }

    /// Architecture name from `e_machine`, if it is one S2E images use.
    pub fn arch(&self) -> Option<&'static str> {
        machine_name(self.layout.header.machine)
    }
}
