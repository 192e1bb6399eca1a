//! Incremental container writer with size backpatching.
//!
//! Sections are written front to back into a growable buffer. A section's
//! size is not known until its content is complete, so `begin_section`
//! writes a zero size and `finish`/the next `begin_*` call patches the
//! true content length back into the header before padding the stream to
//! the section alignment.

use suanpan_bytecode::{
    HEADER_SIZE, Header, Section, SectionFlags, SectionType, align_up, checksum, SECTION_ALIGN,
};

#[derive(Debug)]
struct OpenSection {
    header_at: usize,
    content_at: usize,
}

/// Builds a container in memory, one section at a time.
#[derive(Debug)]
pub struct ContainerWriter {
    buf: Vec<u8>,
    section_count: u32,
    current: Option<OpenSection>,
}

impl Default for ContainerWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerWriter {
    pub fn new() -> Self {
        Self {
            // Header space; patched in finish().
            buf: vec![0u8; HEADER_SIZE],
            section_count: 0,
            current: None,
        }
    }

    /// Open a content-bearing section. Its size field is backpatched when
    /// the section is closed.
    pub fn begin_section(&mut self, name: u16, kind: SectionType, flags: SectionFlags) {
        self.close_section();
        let header_at = self.buf.len();
        let header = Section {
            name,
            kind,
            flags,
            size: 0,
        };
        self.buf.extend_from_slice(&header.to_bytes());
        self.section_count += 1;
        self.current = Some(OpenSection {
            header_at,
            content_at: self.buf.len(),
        });
    }

    /// Emit a virtual section: a header whose size is a semantic count,
    /// with no content bytes.
    pub fn virtual_section(&mut self, name: u16, kind: SectionType, flags: SectionFlags, size: u32) {
        self.close_section();
        debug_assert!(flags.contains(SectionFlags::VIRTUAL));
        let header = Section {
            name,
            kind,
            flags,
            size,
        };
        self.buf.extend_from_slice(&header.to_bytes());
        self.section_count += 1;
    }

    /// Append raw bytes to the open section.
    pub fn write(&mut self, bytes: &[u8]) {
        debug_assert!(self.current.is_some(), "write outside a section");
        self.buf.extend_from_slice(bytes);
    }

    /// Append one little-endian instruction word to the open section.
    pub fn put_word(&mut self, word: u32) {
        self.write(&word.to_le_bytes());
    }

    fn close_section(&mut self) {
        let Some(open) = self.current.take() else {
            return;
        };
        let size = (self.buf.len() - open.content_at) as u32;
        self.buf[open.header_at + 4..open.header_at + 8].copy_from_slice(&size.to_le_bytes());
        let padded = align_up(self.buf.len(), SECTION_ALIGN);
        self.buf.resize(padded, 0);
    }

    /// Close the last section and seal the header.
    pub fn finish(mut self) -> Vec<u8> {
        self.close_section();
        let header = Header {
            checksum: checksum(&self.buf[HEADER_SIZE..]),
            section_count: self.section_count,
            total_size: self.buf.len() as u32,
        };
        self.buf[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
        self.buf
    }
}
