//! Hand-rolled container construction for loader and dump tests.

use crate::checksum::checksum;
use crate::container::{
    HEADER_SIZE, Header, Note, SECTION_ALIGN, Section, SectionFlags, SectionType, align_up,
};

pub(crate) fn push_section(buf: &mut Vec<u8>, section: Section) {
    buf.extend_from_slice(&section.to_bytes());
}

pub(crate) fn pad(buf: &mut Vec<u8>) {
    buf.resize(align_up(buf.len(), SECTION_ALIGN), 0);
}

/// Seal a raw section buffer with a valid header and checksum.
pub(crate) fn seal(mut buf: Vec<u8>, section_count: u32) -> Vec<u8> {
    let header = Header {
        checksum: checksum(&buf[HEADER_SIZE..]),
        section_count,
        total_size: buf.len() as u32,
    };
    buf[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
    buf
}

pub(crate) fn strtab_blob(strings: &[&str]) -> Vec<u8> {
    let mut blob = Vec::new();
    for s in strings {
        blob.extend_from_slice(s.as_bytes());
        blob.push(0);
    }
    blob
}

/// Build a well-formed container.
///
/// The string table is `.code`, then `payload`, then `.stack`, `.strtab`
/// and (when notes are present) `.notes`, so payload indices start at 1.
pub(crate) fn build_container(
    code: &[u32],
    payload: &[&str],
    stack: u32,
    notes: &[(u16, u16)],
) -> Vec<u8> {
    let mut strings: Vec<&str> = vec![".code"];
    strings.extend_from_slice(payload);
    let stack_name = strings.len() as u16;
    strings.push(".stack");
    let strtab_name = strings.len() as u16;
    strings.push(".strtab");
    let notes_name = strings.len() as u16;
    if !notes.is_empty() {
        strings.push(".notes");
    }

    let mut buf = vec![0u8; HEADER_SIZE];
    let mut count = 0u32;

    push_section(
        &mut buf,
        Section {
            name: 0,
            kind: SectionType::Bits,
            flags: SectionFlags::CODE,
            size: (code.len() * 4) as u32,
        },
    );
    for word in code {
        buf.extend_from_slice(&word.to_le_bytes());
    }
    pad(&mut buf);
    count += 1;

    push_section(
        &mut buf,
        Section {
            name: stack_name,
            kind: SectionType::Stack,
            flags: SectionFlags::BSS,
            size: stack,
        },
    );
    count += 1;

    let blob = strtab_blob(&strings);
    push_section(
        &mut buf,
        Section {
            name: strtab_name,
            kind: SectionType::Strtab,
            flags: SectionFlags::DATA,
            size: blob.len() as u32,
        },
    );
    buf.extend_from_slice(&blob);
    pad(&mut buf);
    count += 1;

    if !notes.is_empty() {
        push_section(
            &mut buf,
            Section {
                name: notes_name,
                kind: SectionType::Notes,
                flags: SectionFlags::DATA,
                size: (notes.len() * Note::SIZE) as u32,
            },
        );
        for &(key, value) in notes {
            buf.extend_from_slice(&Note { key, value }.to_bytes());
        }
        pad(&mut buf);
        count += 1;
    }

    seal(buf, count)
}
