//! Human-readable rendering of a loaded container.

use std::fmt::Write;

use crate::container::SectionType;
use crate::instruction::Instruction;
use crate::module::Module;

/// Render every section of `module` as text.
///
/// Code sections get one line per instruction with string-table operands
/// resolved in a trailing comment; `LOADK`/`LOADF` string indices outside
/// the table render as `<bad index>` rather than failing, so the dump is
/// usable on binaries the interpreter would reject.
pub fn disassemble(module: &Module) -> String {
    let mut out = String::new();
    let header = module.header();
    let _ = writeln!(
        out,
        "; {} sections, {} bytes, checksum {:#010x}",
        header.section_count, header.total_size, header.checksum
    );

    for view in module.sections() {
        let name = module
            .string(view.header.name as usize)
            .unwrap_or("<bad index>");
        match view.header.kind {
            SectionType::Bits if view.header.is_executable() => {
                let count = view.content.len() / 4;
                let _ = writeln!(out, "{name}: {count} instructions");
                for (ip, chunk) in view.content.chunks_exact(4).enumerate() {
                    let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                    let _ = writeln!(out, "  [{ip}] {}", render(module, word));
                }
            }
            SectionType::Bits => {
                let _ = writeln!(out, "{name}: {} data bytes", view.content.len());
            }
            SectionType::Stack => {
                let _ = writeln!(out, "{name}: {} registers", view.header.size);
            }
            SectionType::Strtab => {
                let _ = writeln!(out, "{name}: {} strings", module.string_count());
                for index in 0..module.string_count() {
                    let text = module.string(index).unwrap_or("<bad index>");
                    let _ = writeln!(out, "  [{index}] {text:?}");
                }
            }
            SectionType::Notes => {
                let _ = writeln!(out, "{name}: {} notes", view.content.len() / 4);
                for note in module.notes() {
                    let key = module.string(note.key as usize).unwrap_or("<bad index>");
                    let value = module.string(note.value as usize).unwrap_or("<bad index>");
                    let _ = writeln!(out, "  {key:?} = {value:?}");
                }
            }
        }
    }
    out
}

fn render(module: &Module, word: u32) -> String {
    let Some(instruction) = Instruction::decode(word) else {
        return format!("<unknown opcode {:#010x}>", word);
    };

    let mnemonic = instruction.opcode().mnemonic();
    match instruction {
        Instruction::Nop => mnemonic.to_string(),
        Instruction::Move { a, b } => format!("{mnemonic:<6} {a} {b}"),
        Instruction::LoadK { a, bx } | Instruction::LoadF { a, bx } => {
            let text = module.string(bx as usize).unwrap_or("<bad index>");
            format!("{mnemonic:<6} {a} {bx}        ; {text:?}")
        }
        Instruction::Call { a, b, c } => format!("{mnemonic:<6} {a} {b} {c}"),
        Instruction::Return { a } => format!("{mnemonic:<6} {a}"),
    }
}

/// Decoded instructions of the code section, for programmatic inspection.
///
/// Words that do not decode come back as `None` in place.
pub fn decode_code(module: &Module) -> Vec<Option<Instruction>> {
    (0..module.instruction_count())
        .map(|ip| module.word(ip).and_then(Instruction::decode))
        .collect()
}
