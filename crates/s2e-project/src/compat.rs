//! Image compatibility checks.
//!
//! Decides whether a virtual-machine image described by an [`OsDescriptor`]
//! can host a target binary. Only the architecture half lives here; the
//! binary-format half depends on the project kind (see
//! [`ProjectKind::is_valid_binary`](crate::ProjectKind::is_valid_binary)).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const ARCH_X86_64: &str = "x86_64";

pub const FORMAT_PE: &str = "pe";
pub const FORMAT_ELF: &str = "elf";
pub const FORMAT_DECREE: &str = "decree";

/// CPU architecture and binary formats of a guest image.
///
/// Image catalogs carry more fields (name, version, build); they are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OsDescriptor {
    pub arch: String,
    #[serde(default)]
    pub binary_formats: BTreeSet<String>,
}

impl OsDescriptor {
    pub fn new<I, S>(arch: &str, binary_formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            arch: arch.to_string(),
            binary_formats: binary_formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn supports_format(&self, format: &str) -> bool {
        self.binary_formats.contains(format)
    }
}

/// Whether an image's architecture is consistent with the target binary.
///
/// The one rejected combination is an x86_64 binary on a non-x86_64 image.
/// Every other pairing, unknown architectures included, passes.
pub fn is_valid_arch(target_arch: &str, os: &OsDescriptor) -> bool {
    !(target_arch == ARCH_X86_64 && os.arch != ARCH_X86_64)
}
