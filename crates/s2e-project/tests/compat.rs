use s2e_project::{is_valid_arch, OsDescriptor, ProjectKind};

const ARCHES: &[&str] = &["x86_64", "i386", "arm", "aarch64", "", "unknown"];
const FORMATS: &[&str] = &["pe", "elf", "decree"];

/// Every subset of the known formats.
fn format_sets() -> Vec<Vec<&'static str>> {
    (0..1u8 << FORMATS.len())
        .map(|mask| {
            FORMATS
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, f)| *f)
                .collect()
        })
        .collect()
}

// ── is_valid_arch ───────────────────────────────────────────────────────

#[test]
fn x86_64_target_rejected_on_every_other_image_arch() {
    for image_arch in ARCHES.iter().filter(|a| **a != "x86_64") {
        let os = OsDescriptor::new(image_arch, ["elf"]);
        assert!(
            !is_valid_arch("x86_64", &os),
            "x86_64 binary accepted on {image_arch} image"
        );
    }
}

#[test]
fn other_targets_accepted_on_every_image_arch() {
    for target in ARCHES.iter().filter(|a| **a != "x86_64") {
        for image_arch in ARCHES {
            let os = OsDescriptor::new(image_arch, Vec::<String>::new());
            assert!(is_valid_arch(target, &os), "{target} on {image_arch}");
        }
    }
}

// ── is_valid_binary ─────────────────────────────────────────────────────

fn assert_kind_requires(kind: ProjectKind, token: &str) {
    for target in ARCHES {
        for image_arch in ARCHES {
            for formats in format_sets() {
                let os = OsDescriptor::new(image_arch, formats.iter().copied());
                let expected = is_valid_arch(target, &os) && formats.contains(&token);
                assert_eq!(
                    kind.is_valid_binary(target, &os),
                    expected,
                    "{kind} target={target} image={image_arch} formats={formats:?}"
                );
            }
        }
    }
}

#[test]
fn windows_requires_pe() {
    assert_kind_requires(ProjectKind::Windows, "pe");
}

#[test]
fn linux_requires_elf() {
    assert_kind_requires(ProjectKind::Linux, "elf");
}

#[test]
fn cgc_requires_decree() {
    assert_kind_requires(ProjectKind::Cgc, "decree");
}

#[test]
fn format_match_does_not_override_arch_mismatch() {
    let os = OsDescriptor::new("i386", ["pe", "elf", "decree"]);
    for kind in ProjectKind::ALL {
        assert!(!kind.is_valid_binary("x86_64", &os));
        assert!(kind.is_valid_binary("i386", &os));
    }
}
