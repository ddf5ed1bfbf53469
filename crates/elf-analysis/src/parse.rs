//! Minimal ELF header, segment and section parsing
//!
//! Reads only what linkage and import analysis needs. Both ELF32 and ELF64
//! in either byte order are accepted; every read is bounds-checked against
//! the file buffer.

use crate::error::ElfError;
use crate::Result;

pub const ELFMAG: [u8; 4] = [0x7f, b'E', b'L', b'F'];

pub const EI_CLASS: usize = 4;
pub const EI_DATA: usize = 5;
pub const EI_NIDENT: usize = 16;

pub const ELFCLASS32: u8 = 1;
pub const ELFCLASS64: u8 = 2;
pub const ELFDATA2LSB: u8 = 1;
pub const ELFDATA2MSB: u8 = 2;

pub const EM_386: u16 = 3;
pub const EM_MIPS: u16 = 8;
pub const EM_PPC: u16 = 20;
pub const EM_ARM: u16 = 40;
pub const EM_X86_64: u16 = 62;
pub const EM_AARCH64: u16 = 183;

pub const PT_DYNAMIC: u32 = 2;
pub const PN_XNUM: u16 = 0xffff;

pub const SHT_STRTAB: u32 = 3;
pub const SHT_DYNSYM: u32 = 11;

pub const SHN_UNDEF: u16 = 0;
pub const STT_FUNC: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Elf32,
    Elf64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Bounds-checked reader over the raw file bytes.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    class: Class,
    endian: Endian,
}

impl<'a> Reader<'a> {
    fn slice(&self, off: u64, len: usize, what: &'static str) -> Result<&'a [u8]> {
        let start = usize::try_from(off).map_err(|_| ElfError::Truncated { what })?;
        let end = start.checked_add(len).ok_or(ElfError::Truncated { what })?;
        self.bytes.get(start..end).ok_or(ElfError::Truncated { what })
    }

    fn array<const N: usize>(&self, off: u64, what: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(off, N, what)?);
        Ok(out)
    }

    pub fn u8(&self, off: u64, what: &'static str) -> Result<u8> {
        Ok(self.slice(off, 1, what)?[0])
    }

    pub fn u16(&self, off: u64, what: &'static str) -> Result<u16> {
        let b = self.array::<2>(off, what)?;
        Ok(match self.endian {
            Endian::Little => u16::from_le_bytes(b),
            Endian::Big => u16::from_be_bytes(b),
        })
    }

    pub fn u32(&self, off: u64, what: &'static str) -> Result<u32> {
        let b = self.array::<4>(off, what)?;
        Ok(match self.endian {
            Endian::Little => u32::from_le_bytes(b),
            Endian::Big => u32::from_be_bytes(b),
        })
    }

    pub fn u64(&self, off: u64, what: &'static str) -> Result<u64> {
        let b = self.array::<8>(off, what)?;
        Ok(match self.endian {
            Endian::Little => u64::from_le_bytes(b),
            Endian::Big => u64::from_be_bytes(b),
        })
    }

    /// Address/offset-sized word: 4 bytes for ELF32, 8 for ELF64.
    pub fn word(&self, off: u64, what: &'static str) -> Result<u64> {
        match self.class {
            Class::Elf32 => self.u32(off, what).map(u64::from),
            Class::Elf64 => self.u64(off, what),
        }
    }

    /// Raw bytes of the NUL-terminated string starting at `off`.
    pub fn cstr(&self, off: u64, what: &'static str) -> Result<&'a [u8]> {
        let start = usize::try_from(off).map_err(|_| ElfError::Truncated { what })?;
        let tail = self.bytes.get(start..).ok_or(ElfError::Truncated { what })?;
        let len = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(ElfError::Truncated { what })?;
        Ok(&tail[..len])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub class: Class,
    pub endian: Endian,
    pub machine: u16,
    pub phoff: u64,
    pub shoff: u64,
    pub phentsize: u16,
    /// Program header count, after `PN_XNUM` resolution.
    pub phnum: u32,
    pub shentsize: u16,
    /// Section header count, after extended numbering resolution.
    pub shnum: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    pub sh_type: u32,
    pub offset: u64,
    pub size: u64,
    pub link: u32,
    pub entsize: u64,
}

/// Parsed view of an ELF file. Owns nothing but the header tables.
#[derive(Debug, Clone)]
pub struct ElfLayout {
    pub header: FileHeader,
    pub segment_types: Vec<u32>,
    pub sections: Vec<SectionHeader>,
}

impl ElfLayout {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < EI_NIDENT || bytes[..4] != ELFMAG {
            return Err(ElfError::NotElf);
        }
        let class = match bytes[EI_CLASS] {
            ELFCLASS32 => Class::Elf32,
            ELFCLASS64 => Class::Elf64,
            other => return Err(ElfError::UnsupportedClass(other)),
        };
        let endian = match bytes[EI_DATA] {
            ELFDATA2LSB => Endian::Little,
            ELFDATA2MSB => Endian::Big,
            other => return Err(ElfError::UnsupportedEncoding(other)),
        };

        let header = parse_file_header(Reader {
            bytes,
            class,
            endian,
        })?;
        let reader = header.reader(bytes);
        let segment_types = parse_segment_types(reader, &header)?;
        let sections = parse_sections(reader, &header)?;

        Ok(Self {
            header,
            segment_types,
            sections,
        })
    }

    pub fn reader<'a>(&self, bytes: &'a [u8]) -> Reader<'a> {
        self.header.reader(bytes)
    }

    pub fn has_segment(&self, p_type: u32) -> bool {
        self.segment_types.contains(&p_type)
    }

    pub fn section(&self, index: u32) -> Result<&SectionHeader> {
        self.sections
            .get(index as usize)
            .ok_or_else(|| ElfError::InvalidSection(format!("section index {index} out of range")))
    }

    /// Names of imported function symbols in the dynamic symbol table.
    ///
    /// Returns an empty list when the file has no `SHT_DYNSYM` section.
    /// Names that are not valid UTF-8 are skipped.
    pub fn imported_functions<'a>(&self, bytes: &'a [u8]) -> Result<Vec<&'a str>> {
        let Some(dynsym) = self.sections.iter().find(|s| s.sh_type == SHT_DYNSYM) else {
            return Ok(Vec::new());
        };
        let strtab = self.section(dynsym.link)?;
        if strtab.sh_type != SHT_STRTAB {
            return Err(ElfError::InvalidSection(
                "dynamic symbol table is not linked to a string table".to_string(),
            ));
        }

        let reader = self.reader(bytes);
        let entsize = match (dynsym.entsize, self.header.class) {
            (0, Class::Elf32) => 16,
            (0, Class::Elf64) => 24,
            (n, _) => n,
        };
        let count = dynsym.size / entsize;

        let mut names = Vec::new();
        // Entry 0 is the reserved null symbol
        for i in 1..count {
            let sym = dynsym.offset.saturating_add(i.saturating_mul(entsize));
            let (info, shndx) = match self.header.class {
                Class::Elf32 => (
                    reader.u8(sym.saturating_add(12), "dynamic symbol")?,
                    reader.u16(sym.saturating_add(14), "dynamic symbol")?,
                ),
                Class::Elf64 => (
                    reader.u8(sym.saturating_add(4), "dynamic symbol")?,
                    reader.u16(sym.saturating_add(6), "dynamic symbol")?,
                ),
            };
            if info & 0xf != STT_FUNC || shndx != SHN_UNDEF {
                continue;
            }
            let name_off = u64::from(reader.u32(sym, "dynamic symbol")?);
            if name_off >= strtab.size {
                return Err(ElfError::InvalidSection(format!(
                    "symbol name offset {name_off} outside string table"
                )));
            }
            let raw = reader.cstr(
                strtab.offset.saturating_add(name_off),
                "dynamic string table",
            )?;
            match std::str::from_utf8(raw) {
                Ok(name) if !name.is_empty() => names.push(name),
                _ => continue,
            }
        }
        Ok(names)
    }
}

impl FileHeader {
    fn reader<'a>(&self, bytes: &'a [u8]) -> Reader<'a> {
        Reader {
            bytes,
            class: self.class,
            endian: self.endian,
        }
    }
}

fn parse_file_header(r: Reader<'_>) -> Result<FileHeader> {
    const WHAT: &str = "file header";
    let machine = r.u16(18, WHAT)?;
    let header = match r.class {
        Class::Elf32 => FileHeader {
            class: r.class,
            endian: r.endian,
            machine,
            phoff: u64::from(r.u32(28, WHAT)?),
            shoff: u64::from(r.u32(32, WHAT)?),
            phentsize: r.u16(42, WHAT)?,
            phnum: u32::from(r.u16(44, WHAT)?),
            shentsize: r.u16(46, WHAT)?,
            shnum: u64::from(r.u16(48, WHAT)?),
        },
        Class::Elf64 => FileHeader {
            class: r.class,
            endian: r.endian,
            machine,
            phoff: r.u64(32, WHAT)?,
            shoff: r.u64(40, WHAT)?,
            phentsize: r.u16(54, WHAT)?,
            phnum: u32::from(r.u16(56, WHAT)?),
            shentsize: r.u16(58, WHAT)?,
            shnum: u64::from(r.u16(60, WHAT)?),
        },
    };
    resolve_extended_numbering(r, header)
}

/// Counts that overflow the file header live in section header 0:
/// `sh_size` holds the section count, `sh_info` the program header count.
fn resolve_extended_numbering(r: Reader<'_>, mut h: FileHeader) -> Result<FileHeader> {
    const WHAT: &str = "initial section header";
    let extended_shnum = h.shnum == 0 && h.shoff != 0;
    let extended_phnum = h.phnum == u32::from(PN_XNUM);
    if !extended_shnum && !extended_phnum {
        return Ok(h);
    }
    if h.shoff == 0 {
        return Err(ElfError::InvalidSection(
            "PN_XNUM program header count without a section header table".to_string(),
        ));
    }

    let (size_off, info_off) = match h.class {
        Class::Elf32 => (20, 28),
        Class::Elf64 => (32, 44),
    };
    if extended_shnum {
        h.shnum = r.word(h.shoff.saturating_add(size_off), WHAT)?;
    }
    if extended_phnum {
        h.phnum = r.u32(h.shoff.saturating_add(info_off), WHAT)?;
    }
    Ok(h)
}

fn parse_segment_types(r: Reader<'_>, h: &FileHeader) -> Result<Vec<u32>> {
    if h.phoff == 0 {
        return Ok(Vec::new());
    }
    (0..u64::from(h.phnum))
        .map(|i| r.u32(
            h.phoff.saturating_add(i.saturating_mul(u64::from(h.phentsize))),
            "program header table",
        ))
        .collect()
}

fn parse_sections(r: Reader<'_>, h: &FileHeader) -> Result<Vec<SectionHeader>> {
    const WHAT: &str = "section header table";
    if h.shoff == 0 {
        return Ok(Vec::new());
    }

    let mut sections = Vec::new();
    for i in 0..h.shnum {
        let base = h.shoff.saturating_add(i.saturating_mul(u64::from(h.shentsize)));
        let section = match h.class {
            Class::Elf32 => SectionHeader {
                sh_type: r.u32(base.saturating_add(4), WHAT)?,
                offset: r.word(base.saturating_add(16), WHAT)?,
                size: r.word(base.saturating_add(20), WHAT)?,
                link: r.u32(base.saturating_add(24), WHAT)?,
                entsize: r.word(base.saturating_add(36), WHAT)?,
            },
            Class::Elf64 => SectionHeader {
                sh_type: r.u32(base.saturating_add(4), WHAT)?,
                offset: r.word(base.saturating_add(24), WHAT)?,
                size: r.word(base.saturating_add(32), WHAT)?,
                link: r.u32(base.saturating_add(40), WHAT)?,
                entsize: r.word(base.saturating_add(56), WHAT)?,
            },
        };
        sections.push(section);
    }
    Ok(sections)
}

/// Architecture name as used by S2E image descriptors.
pub fn machine_name(machine: u16) -> Option<&'static str> {
    match machine {
        EM_386 => Some("i386"),
        EM_X86_64 => Some("x86_64"),
        EM_ARM => Some("arm"),
        EM_AARCH64 => Some("aarch64"),
        EM_MIPS => Some("mips"),
        EM_PPC => Some("powerpc"),
        _ => None,
    }
}
