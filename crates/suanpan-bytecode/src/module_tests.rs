use crate::container::{
    HEADER_SIZE, Note, Section, SectionFlags, SectionType,
};
use crate::instruction::Instruction;
use crate::module::{Module, ModuleError};
use crate::testutil::{build_container, pad, push_section, seal, strtab_blob};

fn sample_code() -> Vec<u32> {
    vec![
        Instruction::LoadK { a: 0, bx: 1 }.encode(),
        Instruction::Return { a: 0 }.encode(),
    ]
}

fn sample_container() -> Vec<u8> {
    build_container(&sample_code(), &["42"], 1, &[])
}

#[test]
fn loads_well_formed_container() {
    let module = Module::from_bytes(sample_container()).unwrap();

    assert_eq!(module.header().section_count, 3);
    assert_eq!(module.stack_size(), 1);
    assert_eq!(module.instruction_count(), 2);
    assert_eq!(module.string(0), Some(".code"));
    assert_eq!(module.string(1), Some("42"));
    assert_eq!(module.string(4), None);
}

#[test]
fn section_content_is_aligned() {
    let bytes = sample_container();
    let module = Module::from_bytes(bytes).unwrap();
    assert_eq!(module.header().total_size as usize % 8, 0);
    for view in module.sections() {
        if !view.header.is_virtual() && !view.content.is_empty() {
            let offset = view.content.as_ptr() as usize - module.as_bytes().as_ptr() as usize;
            assert_eq!(offset % 8, 0, "misaligned {:?} section", view.header.kind);
        }
    }
}

#[test]
fn rejects_short_buffer() {
    assert_eq!(
        Module::from_bytes(vec![0; 4]).unwrap_err(),
        ModuleError::TooSmall(4)
    );
}

#[test]
fn rejects_bad_magic() {
    let mut bytes = sample_container();
    bytes[0] = b'X';
    assert_eq!(Module::from_bytes(bytes).unwrap_err(), ModuleError::BadMagic);
}

#[test]
fn rejects_truncated_buffer() {
    let mut bytes = sample_container();
    bytes.pop();
    assert!(matches!(
        Module::from_bytes(bytes),
        Err(ModuleError::SizeMismatch { .. })
    ));
}

#[test]
fn rejects_corrupted_content() {
    let mut bytes = sample_container();
    // Flip one code byte without refreshing the stored checksum.
    bytes[HEADER_SIZE + 8] ^= 0x01;
    assert!(matches!(
        Module::from_bytes(bytes),
        Err(ModuleError::ChecksumMismatch { .. })
    ));
}

#[test]
fn rejects_unknown_section_type() {
    let mut bytes = sample_container();
    // Type byte of the first section header, then reseal so the
    // checksum and size checks pass.
    bytes[HEADER_SIZE + 2] = 9;
    let bytes = seal(bytes, 3);
    assert_eq!(
        Module::from_bytes(bytes).unwrap_err(),
        ModuleError::UnknownSectionType(9)
    );
}

#[test]
fn rejects_missing_stack_section() {
    let strings = [".code", ".strtab"];
    let mut buf = vec![0u8; HEADER_SIZE];
    push_section(
        &mut buf,
        Section {
            name: 0,
            kind: SectionType::Bits,
            flags: SectionFlags::CODE,
            size: 0,
        },
    );
    let blob = strtab_blob(&strings);
    push_section(
        &mut buf,
        Section {
            name: 1,
            kind: SectionType::Strtab,
            flags: SectionFlags::DATA,
            size: blob.len() as u32,
        },
    );
    buf.extend_from_slice(&blob);
    pad(&mut buf);

    assert_eq!(
        Module::from_bytes(seal(buf, 2)).unwrap_err(),
        ModuleError::MissingSection(".stack")
    );
}

#[test]
fn rejects_two_code_sections() {
    let strings = [".code", ".stack", ".strtab"];
    let mut buf = vec![0u8; HEADER_SIZE];
    for _ in 0..2 {
        push_section(
            &mut buf,
            Section {
                name: 0,
                kind: SectionType::Bits,
                flags: SectionFlags::CODE,
                size: 0,
            },
        );
    }
    push_section(
        &mut buf,
        Section {
            name: 1,
            kind: SectionType::Stack,
            flags: SectionFlags::BSS,
            size: 1,
        },
    );
    let blob = strtab_blob(&strings);
    push_section(
        &mut buf,
        Section {
            name: 2,
            kind: SectionType::Strtab,
            flags: SectionFlags::DATA,
            size: blob.len() as u32,
        },
    );
    buf.extend_from_slice(&blob);
    pad(&mut buf);

    assert_eq!(
        Module::from_bytes(seal(buf, 4)).unwrap_err(),
        ModuleError::DuplicateCode
    );
}

#[test]
fn rejects_unterminated_string_table() {
    let mut buf = vec![0u8; HEADER_SIZE];
    push_section(
        &mut buf,
        Section {
            name: 0,
            kind: SectionType::Bits,
            flags: SectionFlags::CODE,
            size: 0,
        },
    );
    push_section(
        &mut buf,
        Section {
            name: 0,
            kind: SectionType::Stack,
            flags: SectionFlags::BSS,
            size: 1,
        },
    );
    let blob = b".code\0.stack".to_vec(); // missing final NUL
    push_section(
        &mut buf,
        Section {
            name: 0,
            kind: SectionType::Strtab,
            flags: SectionFlags::DATA,
            size: blob.len() as u32,
        },
    );
    buf.extend_from_slice(&blob);
    pad(&mut buf);

    assert_eq!(
        Module::from_bytes(seal(buf, 3)).unwrap_err(),
        ModuleError::BadStringTable
    );
}

#[test]
fn rejects_section_count_mismatch() {
    let bytes = seal(sample_container(), 5);
    assert_eq!(
        Module::from_bytes(bytes).unwrap_err(),
        ModuleError::SectionCount {
            declared: 5,
            actual: 3
        }
    );
}

#[test]
fn word_fetch_is_bounded() {
    let module = Module::from_bytes(sample_container()).unwrap();
    assert!(module.word(0).is_some());
    assert!(module.word(1).is_some());
    assert_eq!(module.word(2), None);
}

#[test]
fn notes_round_trip() {
    let bytes = build_container(&sample_code(), &["42", "author", "demo"], 1, &[(2, 3)]);
    let module = Module::from_bytes(bytes).unwrap();

    let notes: Vec<Note> = module.notes().collect();
    assert_eq!(notes, vec![Note { key: 2, value: 3 }]);
    assert_eq!(module.string(2), Some("author"));
    assert_eq!(module.string(3), Some("demo"));

    // The extra section must not disturb code or stack lookup.
    assert_eq!(module.instruction_count(), 2);
    assert_eq!(module.stack_size(), 1);
}

#[test]
fn virtual_sections_have_no_content() {
    let module = Module::from_bytes(sample_container()).unwrap();
    let stack = module
        .sections()
        .find(|v| v.header.kind == SectionType::Stack)
        .unwrap();
    assert!(stack.header.is_virtual());
    assert!(stack.content.is_empty());
    assert_eq!(stack.header.size, 1);
}
