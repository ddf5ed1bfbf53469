//! Binary analyzer contract used by project kinds that inspect their target.
//!
//! An analyzer opens a handle scoped to one binary. The handle owns whatever
//! the analysis needs (file contents, parsed tables) and releases it on drop,
//! so every exit path out of the caller's scope frees it.

use std::collections::BTreeSet;
use std::path::Path;

use elf_analysis::{ElfAnalysis, ElfError};

use crate::error::{AnalyzerError, ProjectError, Result};

/// Facts about one opened binary.
pub trait AnalyzedBinary {
    fn is_dynamically_linked(&self) -> bool;

    /// Library functions referenced by the binary that S2E has models for.
    fn modelled_functions(&self) -> std::result::Result<BTreeSet<String>, AnalyzerError>;
}

/// Opens binaries for analysis.
pub trait BinaryAnalyzer {
    fn open(&self, path: &Path) -> Result<Box<dyn AnalyzedBinary>>;
}

/// [`BinaryAnalyzer`] for ELF targets, backed by `elf-analysis`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElfAnalyzer;

impl BinaryAnalyzer for ElfAnalyzer {
    fn open(&self, path: &Path) -> Result<Box<dyn AnalyzedBinary>> {
        let elf = ElfAnalysis::open(path).map_err(ProjectError::analysis)?;
        Ok(Box::new(elf))
    }
}

impl AnalyzedBinary for ElfAnalysis {
    fn is_dynamically_linked(&self) -> bool {
        ElfAnalysis::is_dynamically_linked(self)
    }

    fn modelled_functions(&self) -> std::result::Result<BTreeSet<String>, AnalyzerError> {
        ElfAnalysis::modelled_functions(self).map_err(|e: ElfError| Box::new(e) as AnalyzerError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elf_analysis::fixtures::ElfFixture;
    use std::error::Error as _;
    use tempfile::tempdir;

    #[test]
    fn test_elf_analyzer_opens_fixture() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app");
        ElfFixture::new()
            .dynamic(true)
            .import("strlen")
            .write_to(&path)
            .unwrap();

        let binary = ElfAnalyzer.open(&path).unwrap();
        assert!(binary.is_dynamically_linked());
        assert!(binary.modelled_functions().unwrap().contains("strlen"));
    }

    #[test]
    fn test_elf_analyzer_wraps_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain text").unwrap();

        let err = ElfAnalyzer.open(&path).err().unwrap();
        let source = err.source().unwrap();
        assert!(matches!(
            source.downcast_ref::<ElfError>(),
            Some(ElfError::NotElf)
        ));
    }
}
