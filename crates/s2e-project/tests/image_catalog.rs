use s2e_project::{ImageCatalog, ProjectError, ProjectKind};
use std::error::Error as _;
use std::io::Write;
use tempfile::NamedTempFile;

const CATALOG: &str = r#"{
    "images": {
        "debian-9.2.1-i386": {
            "name": "Debian i386 image",
            "os": { "name": "debian", "arch": "i386", "binary_formats": ["elf"] }
        },
        "debian-9.2.1-x86_64": {
            "name": "Debian x86_64 image",
            "os": { "name": "debian", "arch": "x86_64", "binary_formats": ["elf", "decree"] }
        },
        "windows-7sp1ent-x86_64": {
            "name": "Windows 7 Enterprise SP1 x86_64",
            "os": { "name": "windows", "arch": "x86_64", "binary_formats": ["pe"] }
        }
    }
}"#;

fn ids(catalog: &ImageCatalog, kind: ProjectKind, arch: &str) -> Vec<String> {
    catalog
        .compatible_images(kind, arch)
        .into_iter()
        .map(|(id, _)| id.to_string())
        .collect()
}

#[test]
fn linux_x86_64_binary_only_matches_x86_64_elf_image() {
    let catalog = ImageCatalog::from_json_str(CATALOG).unwrap();
    assert_eq!(
        ids(&catalog, ProjectKind::Linux, "x86_64"),
        vec!["debian-9.2.1-x86_64"]
    );
}

#[test]
fn linux_i386_binary_matches_both_elf_images_in_id_order() {
    let catalog = ImageCatalog::from_json_str(CATALOG).unwrap();
    assert_eq!(
        ids(&catalog, ProjectKind::Linux, "i386"),
        vec!["debian-9.2.1-i386", "debian-9.2.1-x86_64"]
    );
}

#[test]
fn cgc_and_windows_match_by_format() {
    let catalog = ImageCatalog::from_json_str(CATALOG).unwrap();
    assert_eq!(
        ids(&catalog, ProjectKind::Cgc, "i386"),
        vec!["debian-9.2.1-x86_64"]
    );
    assert_eq!(
        ids(&catalog, ProjectKind::Windows, "x86_64"),
        vec!["windows-7sp1ent-x86_64"]
    );
}

#[test]
fn descriptor_fields_are_available() {
    let catalog = ImageCatalog::from_json_str(CATALOG).unwrap();
    let image = &catalog.images["windows-7sp1ent-x86_64"];
    assert_eq!(image.name, "Windows 7 Enterprise SP1 x86_64");
    assert!(image.os.supports_format("pe"));
    assert!(!catalog.images.contains_key("missing"));
}

#[test]
fn load_reads_catalog_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();

    let catalog = ImageCatalog::load(file.path()).unwrap();
    assert_eq!(catalog.images.len(), 3);
}

#[test]
fn malformed_catalog_is_a_catalog_error() {
    let err = ImageCatalog::from_json_str(r#"{"images": {"x": {"os": 5}}}"#).unwrap_err();
    assert!(matches!(err, ProjectError::Catalog(_)));
    let source = err.source().expect("catalog error keeps its parse error");
    assert!(source.downcast_ref::<serde_json::Error>().is_some());
}

#[test]
fn empty_catalog_has_no_compatible_images() {
    let catalog = ImageCatalog::from_json_str("{}").unwrap();
    assert!(catalog.compatible_images(ProjectKind::Linux, "x86_64").is_empty());
}
