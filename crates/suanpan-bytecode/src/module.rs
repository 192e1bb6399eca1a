//! Loading and validating compiled containers.

use thiserror::Error;

use crate::checksum::checksum;
use crate::container::{
    HEADER_SIZE, Header, MAGIC, Note, SECTION_ALIGN, SECTION_HEADER_SIZE, Section, SectionFlags,
    SectionType, align_up,
};
use crate::instruction::INSTRUCTION_SIZE;

/// Errors surfaced while loading a container.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModuleError {
    #[error("container too small ({0} bytes)")]
    TooSmall(usize),
    #[error("bad magic bytes")]
    BadMagic,
    #[error("declared size {declared} does not match buffer length {actual}")]
    SizeMismatch { declared: u32, actual: usize },
    #[error("checksum mismatch (stored {stored:#010x}, computed {computed:#010x})")]
    ChecksumMismatch { stored: u32, computed: u32 },
    #[error("truncated section header at offset {0}")]
    TruncatedSection(usize),
    #[error("unknown section type {0}")]
    UnknownSectionType(u8),
    #[error("section content overruns container at offset {0}")]
    SectionOverrun(usize),
    #[error("header declares {declared} sections, container holds {actual}")]
    SectionCount { declared: u32, actual: u32 },
    #[error("missing {0} section")]
    MissingSection(&'static str),
    #[error("more than one executable code section")]
    DuplicateCode,
    #[error("malformed string table")]
    BadStringTable,
}

#[derive(Debug, Clone, Copy)]
struct SectionEntry {
    header: Section,
    content_start: usize,
}

/// A section header together with its content bytes.
///
/// Virtual sections expose an empty slice.
#[derive(Debug, Clone, Copy)]
pub struct SectionView<'a> {
    pub header: Section,
    pub content: &'a [u8],
}

/// A loaded, validated container.
///
/// Loading verifies the magic, total size and checksum, walks every
/// section, indexes the string table and locates the single executable
/// code section; execution can then assume a structurally sound binary
/// and only bounds-check operands.
#[derive(Debug)]
pub struct Module {
    bytes: Vec<u8>,
    header: Header,
    sections: Vec<SectionEntry>,
    strings: Vec<(usize, usize)>,
    code: (usize, usize),
    stack_size: u32,
}

impl Module {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ModuleError> {
        if bytes.len() < HEADER_SIZE {
            return Err(ModuleError::TooSmall(bytes.len()));
        }
        if bytes[..4] != MAGIC {
            return Err(ModuleError::BadMagic);
        }

        let mut raw = [0u8; HEADER_SIZE];
        raw.copy_from_slice(&bytes[..HEADER_SIZE]);
        let header = Header::from_bytes(&raw);

        if header.total_size as usize != bytes.len() {
            return Err(ModuleError::SizeMismatch {
                declared: header.total_size,
                actual: bytes.len(),
            });
        }
        let computed = checksum(&bytes[HEADER_SIZE..]);
        if computed != header.checksum {
            return Err(ModuleError::ChecksumMismatch {
                stored: header.checksum,
                computed,
            });
        }

        let sections = Self::walk_sections(&bytes)?;
        if sections.len() as u32 != header.section_count {
            return Err(ModuleError::SectionCount {
                declared: header.section_count,
                actual: sections.len() as u32,
            });
        }

        let stack_size = sections
            .iter()
            .find(|s| s.header.kind == SectionType::Stack)
            .map(|s| s.header.size)
            .ok_or(ModuleError::MissingSection(".stack"))?;

        let strtab = sections
            .iter()
            .find(|s| s.header.kind == SectionType::Strtab)
            .ok_or(ModuleError::MissingSection(".strtab"))?;
        let strings = Self::index_strings(&bytes, strtab)?;

        let mut code = None;
        for section in &sections {
            if section.header.kind == SectionType::Bits && section.header.is_executable() {
                if code.is_some() {
                    return Err(ModuleError::DuplicateCode);
                }
                code = Some((section.content_start, section.header.size as usize));
            }
        }
        let code = code.ok_or(ModuleError::MissingSection(".code"))?;

        Ok(Self {
            bytes,
            header,
            sections,
            strings,
            code,
            stack_size,
        })
    }

    fn walk_sections(bytes: &[u8]) -> Result<Vec<SectionEntry>, ModuleError> {
        let mut sections = Vec::new();
        let mut pos = HEADER_SIZE;

        while pos < bytes.len() {
            if pos + SECTION_HEADER_SIZE > bytes.len() {
                return Err(ModuleError::TruncatedSection(pos));
            }
            let mut raw = [0u8; SECTION_HEADER_SIZE];
            raw.copy_from_slice(&bytes[pos..pos + SECTION_HEADER_SIZE]);
            let header = Section::from_bytes(&raw)
                .ok_or(ModuleError::UnknownSectionType(raw[2]))?;

            let content_start = pos + SECTION_HEADER_SIZE;
            pos = if header.is_virtual() {
                content_start
            } else {
                let end = content_start + align_up(header.size as usize, SECTION_ALIGN);
                if content_start + header.size as usize > bytes.len() {
                    return Err(ModuleError::SectionOverrun(content_start));
                }
                end.min(bytes.len())
            };
            sections.push(SectionEntry {
                header,
                content_start,
            });
        }
        Ok(sections)
    }

    fn index_strings(
        bytes: &[u8],
        strtab: &SectionEntry,
    ) -> Result<Vec<(usize, usize)>, ModuleError> {
        let start = strtab.content_start;
        let end = start + strtab.header.size as usize;
        let content = &bytes[start..end];

        if !content.is_empty() && content[content.len() - 1] != 0 {
            return Err(ModuleError::BadStringTable);
        }

        let mut strings = Vec::new();
        let mut cursor = 0usize;
        for (i, &byte) in content.iter().enumerate() {
            if byte == 0 {
                std::str::from_utf8(&content[cursor..i])
                    .map_err(|_| ModuleError::BadStringTable)?;
                strings.push((start + cursor, start + i));
                cursor = i + 1;
            }
        }
        Ok(strings)
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Sections in container order.
    pub fn sections(&self) -> impl Iterator<Item = SectionView<'_>> {
        self.sections.iter().map(|entry| {
            let content = if entry.header.is_virtual() {
                &[][..]
            } else {
                let end = entry.content_start + entry.header.size as usize;
                &self.bytes[entry.content_start..end]
            };
            SectionView {
                header: entry.header,
                content,
            }
        })
    }

    /// Declared register-file size.
    #[inline]
    pub fn stack_size(&self) -> u32 {
        self.stack_size
    }

    #[inline]
    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    /// Resolve a string-table index. UTF-8 validity was checked at load.
    pub fn string(&self, index: usize) -> Option<&str> {
        let &(start, end) = self.strings.get(index)?;
        // Checked during index_strings.
        std::str::from_utf8(&self.bytes[start..end]).ok()
    }

    /// Content of the executable code section.
    #[inline]
    pub fn code(&self) -> &[u8] {
        let (start, len) = self.code;
        &self.bytes[start..start + len]
    }

    /// Number of whole instruction words in the code section.
    #[inline]
    pub fn instruction_count(&self) -> usize {
        self.code().len() / INSTRUCTION_SIZE
    }

    /// Fetch the instruction word at `ip`, or `None` past the code end.
    pub fn word(&self, ip: usize) -> Option<u32> {
        if ip >= self.instruction_count() {
            return None;
        }
        let code = self.code();
        let offset = ip * INSTRUCTION_SIZE;
        Some(u32::from_le_bytes([
            code[offset],
            code[offset + 1],
            code[offset + 2],
            code[offset + 3],
        ]))
    }

    /// Every annotation pair across all `.notes` sections, in order.
    pub fn notes(&self) -> impl Iterator<Item = Note> + '_ {
        self.sections()
            .filter(|view| {
                view.header.kind == SectionType::Notes
                    && view.header.flags.contains(SectionFlags::READ)
            })
            .flat_map(|view| {
                view.content.chunks_exact(Note::SIZE).map(|chunk| {
                    let mut raw = [0u8; Note::SIZE];
                    raw.copy_from_slice(chunk);
                    Note::from_bytes(&raw)
                })
            })
    }
}
