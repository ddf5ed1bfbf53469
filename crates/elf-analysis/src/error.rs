//! Error types for elf-analysis

use thiserror::Error;

/// Errors that can occur while opening or inspecting an ELF file
#[derive(Error, Debug)]
pub enum ElfError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Magic bytes do not match `\x7fELF`
    #[error("not an ELF file")]
    NotElf,

    /// `EI_CLASS` is neither ELFCLASS32 nor ELFCLASS64
    #[error("unsupported ELF class: {0}")]
    UnsupportedClass(u8),

    /// `EI_DATA` is neither little nor big endian
    #[error("unsupported ELF data encoding: {0}")]
    UnsupportedEncoding(u8),

    /// A header or table extends past the end of the file
    #[error("truncated ELF file: {what} extends past end of file")]
    Truncated { what: &'static str },

    /// A section header references something that does not exist
    #[error("invalid section: {0}")]
    InvalidSection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_error_names_structure() {
        let err = ElfError::Truncated {
            what: "program header table",
        };
        assert!(err.to_string().contains("program header table"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ElfError = io.into();
        assert!(matches!(err, ElfError::Io(_)));
    }
}
