//! Guest image catalog.
//!
//! Images are described in a JSON document keyed by image name:
//!
//! ```json
//! { "images": { "debian-9.2.1-x86_64": { "name": "Debian 9.2.1 x86_64",
//!                                       "os": { "arch": "x86_64", "binary_formats": ["elf"] } } } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compat::OsDescriptor;
use crate::error::{ProjectError, Result};
use crate::kind::ProjectKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageDescriptor {
    #[serde(default)]
    pub name: String,
    pub os: OsDescriptor,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageCatalog {
    #[serde(default)]
    pub images: BTreeMap<String, ImageDescriptor>,
}

impl ImageCatalog {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ProjectError::Catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Images that can host a `target_arch` binary of the given kind, by image id.
    pub fn compatible_images(
        &self,
        kind: ProjectKind,
        target_arch: &str,
    ) -> Vec<(&str, &ImageDescriptor)> {
        let compatible: Vec<_> = self
            .images
            .iter()
            .filter(|(_, image)| kind.is_valid_binary(target_arch, &image.os))
            .map(|(id, image)| (id.as_str(), image))
            .collect();
        debug!(
            kind = %kind,
            target_arch,
            total = self.images.len(),
            compatible = compatible.len(),
            "Filtered image catalog"
        );
        compatible
    }
}
