//! On-disk layout of the container: header, section headers and notes.
//!
//! All multi-byte fields are little-endian. The header is 16 bytes and
//! every section header is 8, so section content always starts on an
//! 8-byte boundary as long as writers pad content to `SECTION_ALIGN`.

/// Magic bytes at offset 0 of every container.
pub const MAGIC: [u8; 4] = *b"ABC\0";

/// Size of the container header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Size of a section header in bytes.
pub const SECTION_HEADER_SIZE: usize = 8;

/// Alignment of section content within the container.
pub const SECTION_ALIGN: usize = 8;

/// Round `value` up to the next multiple of `align` (a power of two).
#[inline]
pub const fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

/// Container header. The magic bytes precede these fields in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    /// XOR-fold checksum of every byte after the header.
    pub checksum: u32,
    /// Number of sections in the container.
    pub section_count: u32,
    /// Total container size in bytes, header included.
    pub total_size: u32,
}

impl Header {
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&MAGIC);
        bytes[4..8].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.section_count.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        bytes
    }

    /// Decode the fields following the magic. Callers validate the magic.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            checksum: read_u32_le(bytes, 4),
            section_count: read_u32_le(bytes, 8),
            total_size: read_u32_le(bytes, 12),
        }
    }
}

/// What a section's content means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SectionType {
    /// Raw bits; executable code when flagged with `EXECUTE`.
    Bits = 0,
    /// Virtual section whose size declares the register-file length.
    Stack = 1,
    /// NUL-terminated string table.
    Strtab = 2,
    /// Key/value annotation pairs, ignored by execution.
    Notes = 3,
}

impl SectionType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Bits),
            1 => Some(Self::Stack),
            2 => Some(Self::Strtab),
            3 => Some(Self::Notes),
            _ => None,
        }
    }
}

/// Section permission and shape flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionFlags(u8);

impl SectionFlags {
    pub const READ: Self = Self(1 << 0);
    pub const WRITE: Self = Self(1 << 1);
    pub const EXECUTE: Self = Self(1 << 2);
    /// The section has no content bytes; its size is a semantic count.
    pub const VIRTUAL: Self = Self(1 << 3);

    /// Read-only data (string tables, notes).
    pub const DATA: Self = Self(1 << 0);
    /// Executable code.
    pub const CODE: Self = Self(1 << 0 | 1 << 2);
    /// Virtual zero-fill (the register stack declaration).
    pub const BSS: Self = Self(1 << 0 | 1 << 1 | 1 << 3);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A section header: name (string-table index), type, flags and size.
///
/// For virtual sections `size` is a count with no backing bytes; for all
/// others it is the exact content length, and readers skip the content
/// plus its padding up to `SECTION_ALIGN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub name: u16,
    pub kind: SectionType,
    pub flags: SectionFlags,
    pub size: u32,
}

impl Section {
    #[inline]
    pub fn is_virtual(&self) -> bool {
        self.flags.contains(SectionFlags::VIRTUAL)
    }

    #[inline]
    pub fn is_executable(&self) -> bool {
        self.flags.contains(SectionFlags::EXECUTE)
    }

    pub fn to_bytes(&self) -> [u8; SECTION_HEADER_SIZE] {
        let mut bytes = [0u8; SECTION_HEADER_SIZE];
        bytes[0..2].copy_from_slice(&self.name.to_le_bytes());
        bytes[2] = self.kind as u8;
        bytes[3] = self.flags.bits();
        bytes[4..8].copy_from_slice(&self.size.to_le_bytes());
        bytes
    }

    /// Returns `None` when the type byte is not a known section type.
    pub fn from_bytes(bytes: &[u8; SECTION_HEADER_SIZE]) -> Option<Self> {
        Some(Self {
            name: u16::from_le_bytes([bytes[0], bytes[1]]),
            kind: SectionType::from_u8(bytes[2])?,
            flags: SectionFlags::from_bits(bytes[3]),
            size: read_u32_le(bytes, 4),
        })
    }
}

/// One entry of a `.notes` section: two string-table indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub key: u16,
    pub value: u16,
}

impl Note {
    pub const SIZE: usize = 4;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..2].copy_from_slice(&self.key.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.value.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        Self {
            key: u16::from_le_bytes([bytes[0], bytes[1]]),
            value: u16::from_le_bytes([bytes[2], bytes[3]]),
        }
    }
}

#[inline]
fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

const _: () = assert!(HEADER_SIZE % SECTION_ALIGN == 0);
const _: () = assert!(SECTION_HEADER_SIZE % SECTION_ALIGN == 0);
