//! Synthetic ELF64 images for tests
//!
//! Builds the smallest little-endian ELF64 file the analyzer can read: a
//! file header, a `PT_LOAD` segment (plus `PT_DYNAMIC` when dynamic), and an
//! optional `.dynsym`/`.dynstr` pair.

use std::path::Path;

use crate::parse::{EM_X86_64, PT_DYNAMIC, SHT_DYNSYM, SHT_STRTAB, STT_FUNC};

const EHDR_SIZE: usize = 64;
const PHDR_SIZE: usize = 56;
const SHDR_SIZE: usize = 64;
const SYM_SIZE: usize = 24;
const PT_LOAD: u32 = 1;
const STB_GLOBAL: u8 = 1;

/// Builder for a minimal ELF64 image.
#[derive(Debug, Clone)]
pub struct ElfFixture {
    machine: u16,
    dynamic: bool,
    imports: Vec<String>,
    exports: Vec<String>,
}

impl Default for ElfFixture {
    fn default() -> Self {
        Self {
            machine: EM_X86_64,
            dynamic: false,
            imports: Vec::new(),
            exports: Vec::new(),
        }
    }
}

impl ElfFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn machine(mut self, machine: u16) -> Self {
        self.machine = machine;
        self
    }

    /// Emit a `PT_DYNAMIC` segment.
    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Add an undefined function symbol to `.dynsym`.
    pub fn import(mut self, name: &str) -> Self {
        self.imports.push(name.to_string());
        self
    }

    /// Add a defined function symbol to `.dynsym`.
    pub fn export(mut self, name: &str) -> Self {
        self.exports.push(name.to_string());
        self
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }

    pub fn build(&self) -> Vec<u8> {
        let has_symbols = !self.imports.is_empty() || !self.exports.is_empty();
        let phnum: u16 = if self.dynamic { 2 } else { 1 };

        // .dynstr and the symbol table that indexes into it
        let mut dynstr = vec![0u8];
        let mut symbols = vec![0u8; SYM_SIZE];
        let named = self
            .imports
            .iter()
            .map(|n| (n, 0u16))
            .chain(self.exports.iter().map(|n| (n, 1u16)));
        for (name, shndx) in named {
            let name_off = dynstr.len() as u32;
            dynstr.extend_from_slice(name.as_bytes());
            dynstr.push(0);

            symbols.extend_from_slice(&name_off.to_le_bytes());
            symbols.push((STB_GLOBAL << 4) | STT_FUNC);
            symbols.push(0);
            symbols.extend_from_slice(&shndx.to_le_bytes());
            symbols.extend_from_slice(&0u64.to_le_bytes());
            symbols.extend_from_slice(&0u64.to_le_bytes());
        }

        let shstrtab = b"\0.dynstr\0.dynsym\0.shstrtab\0";
        let (dynstr_name, dynsym_name, shstrtab_name) = (1u32, 9u32, 17u32);

        let mut out = vec![0u8; EHDR_SIZE + PHDR_SIZE * usize::from(phnum)];
        let dynstr_off = out.len();
        let mut dynsym_off = 0;
        if has_symbols {
            out.extend_from_slice(&dynstr);
            pad_to(&mut out, 8);
            dynsym_off = out.len();
            out.extend_from_slice(&symbols);
        }
        let shstrtab_off = out.len();
        out.extend_from_slice(shstrtab);
        pad_to(&mut out, 8);
        let shoff = out.len();
        let file_size = shoff as u64;

        let mut sections = vec![[0u8; SHDR_SIZE]];
        if has_symbols {
            sections.push(shdr(dynstr_name, SHT_STRTAB, dynstr_off, dynstr.len(), 0, 0));
            sections.push(shdr(
                dynsym_name,
                SHT_DYNSYM,
                dynsym_off,
                symbols.len(),
                1,
                SYM_SIZE,
            ));
        }
        let shstrndx = sections.len() as u16;
        sections.push(shdr(
            shstrtab_name,
            SHT_STRTAB,
            shstrtab_off,
            shstrtab.len(),
            0,
            0,
        ));
        for section in &sections {
            out.extend_from_slice(section);
        }

        // File header
        out[..4].copy_from_slice(b"\x7fELF");
        out[4] = 2; // ELFCLASS64
        out[5] = 1; // ELFDATA2LSB
        out[6] = 1; // EV_CURRENT
        put(&mut out, 16, &3u16.to_le_bytes()); // ET_DYN
        put(&mut out, 18, &self.machine.to_le_bytes());
        put(&mut out, 20, &1u32.to_le_bytes());
        put(&mut out, 32, &(EHDR_SIZE as u64).to_le_bytes());
        put(&mut out, 40, &(shoff as u64).to_le_bytes());
        put(&mut out, 52, &(EHDR_SIZE as u16).to_le_bytes());
        put(&mut out, 54, &(PHDR_SIZE as u16).to_le_bytes());
        put(&mut out, 56, &phnum.to_le_bytes());
        put(&mut out, 58, &(SHDR_SIZE as u16).to_le_bytes());
        put(&mut out, 60, &(sections.len() as u16).to_le_bytes());
        put(&mut out, 62, &shstrndx.to_le_bytes());

        // Program headers
        let load = EHDR_SIZE;
        put(&mut out, load, &PT_LOAD.to_le_bytes());
        put(&mut out, load + 32, &file_size.to_le_bytes());
        put(&mut out, load + 40, &file_size.to_le_bytes());
        if self.dynamic {
            put(&mut out, load + PHDR_SIZE, &PT_DYNAMIC.to_le_bytes());
        }

        out
    }
}

fn shdr(
    name: u32,
    sh_type: u32,
    offset: usize,
    size: usize,
    link: u32,
    entsize: usize,
) -> [u8; SHDR_SIZE] {
    let mut h = [0u8; SHDR_SIZE];
    h[0..4].copy_from_slice(&name.to_le_bytes());
    h[4..8].copy_from_slice(&sh_type.to_le_bytes());
    h[24..32].copy_from_slice(&(offset as u64).to_le_bytes());
    h[32..40].copy_from_slice(&(size as u64).to_le_bytes());
    h[40..44].copy_from_slice(&link.to_le_bytes());
    h[56..64].copy_from_slice(&(entsize as u64).to_le_bytes());
    h
}

fn put(out: &mut [u8], at: usize, bytes: &[u8]) {
    out[at..at + bytes.len()].copy_from_slice(bytes);
}

fn pad_to(out: &mut Vec<u8>, align: usize) {
    while out.len() % align != 0 {
        out.push(0);
    }
}
