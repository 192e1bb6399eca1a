//! Instruction words.
//!
//! Every instruction is one little-endian 32-bit word. The opcode lives
//! in bits 0-5; the remaining 26 bits hold the operands in one of two
//! layouts:
//!
//! - ABC:  A in bits 6-13 (8 bits), B in 14-22 (9 bits), C in 23-31 (9 bits)
//! - ABx:  A in bits 6-13, Bx in 14-31 (18 bits)
//!
//! A third layout, AsBx (sign bit 14, 17-bit magnitude), is reserved and
//! has no current opcode.

/// Width of one instruction in the `.code` section, in bytes.
pub const INSTRUCTION_SIZE: usize = 4;

/// Largest value representable in the wide Bx operand (18 bits).
pub const BX_MAX: u32 = (1 << 18) - 1;

const OPCODE_BITS: u32 = 6;
const A_SHIFT: u32 = OPCODE_BITS;
const B_SHIFT: u32 = A_SHIFT + 8;
const C_SHIFT: u32 = B_SHIFT + 9;

const OPCODE_MASK: u32 = (1 << OPCODE_BITS) - 1;
const A_MASK: u32 = 0xFF;
const B_MASK: u32 = 0x1FF;
const C_MASK: u32 = 0x1FF;
const BX_MASK: u32 = BX_MAX;

/// Operation selector, bits 0-5 of the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Nop = 0,
    Move = 1,
    LoadK = 2,
    LoadF = 3,
    Call = 4,
    Return = 5,
}

impl Opcode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Nop),
            1 => Some(Self::Move),
            2 => Some(Self::LoadK),
            3 => Some(Self::LoadF),
            4 => Some(Self::Call),
            5 => Some(Self::Return),
            _ => None,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::Move => "MOVE",
            Self::LoadK => "LOADK",
            Self::LoadF => "LOADF",
            Self::Call => "CALL",
            Self::Return => "RETURN",
        }
    }
}

/// A decoded instruction.
///
/// Register operands are `u16` where the encoding gives them 9 bits even
/// though the register file itself is capped at 256 entries; the extra
/// bit belongs to the format, and the interpreter bounds-checks every
/// operand against the declared register-file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Does nothing.
    Nop,
    /// `R(a) := R(b)`
    Move { a: u8, b: u16 },
    /// `R(a) := decode(strtab[bx])`
    LoadK { a: u8, bx: u32 },
    /// `R(a) := callable named strtab[bx]`
    LoadF { a: u8, bx: u32 },
    /// `R(a) := invoke(R(a), R(b) .. R(b + c - 1))`
    Call { a: u8, b: u16, c: u16 },
    /// Finish, delivering `R(a)`.
    Return { a: u8 },
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Nop => Opcode::Nop,
            Self::Move { .. } => Opcode::Move,
            Self::LoadK { .. } => Opcode::LoadK,
            Self::LoadF { .. } => Opcode::LoadF,
            Self::Call { .. } => Opcode::Call,
            Self::Return { .. } => Opcode::Return,
        }
    }

    /// Encode into a 32-bit word.
    pub fn encode(&self) -> u32 {
        match *self {
            Self::Nop => abc(Opcode::Nop, 0, 0, 0),
            Self::Move { a, b } => abc(Opcode::Move, a, b, 0),
            Self::LoadK { a, bx } => abx(Opcode::LoadK, a, bx),
            Self::LoadF { a, bx } => abx(Opcode::LoadF, a, bx),
            Self::Call { a, b, c } => abc(Opcode::Call, a, b, c),
            Self::Return { a } => abc(Opcode::Return, a, 0, 0),
        }
    }

    /// Decode a 32-bit word. Returns `None` for an unknown opcode.
    pub fn decode(word: u32) -> Option<Self> {
        let opcode = Opcode::from_u8((word & OPCODE_MASK) as u8)?;
        let a = ((word >> A_SHIFT) & A_MASK) as u8;
        let b = ((word >> B_SHIFT) & B_MASK) as u16;
        let c = ((word >> C_SHIFT) & C_MASK) as u16;
        let bx = (word >> B_SHIFT) & BX_MASK;

        Some(match opcode {
            Opcode::Nop => Self::Nop,
            Opcode::Move => Self::Move { a, b },
            Opcode::LoadK => Self::LoadK { a, bx },
            Opcode::LoadF => Self::LoadF { a, bx },
            Opcode::Call => Self::Call { a, b, c },
            Opcode::Return => Self::Return { a },
        })
    }
}

fn abc(opcode: Opcode, a: u8, b: u16, c: u16) -> u32 {
    debug_assert!(u32::from(b) <= B_MASK);
    debug_assert!(u32::from(c) <= C_MASK);
    opcode as u32
        | (u32::from(a) << A_SHIFT)
        | ((u32::from(b) & B_MASK) << B_SHIFT)
        | ((u32::from(c) & C_MASK) << C_SHIFT)
}

fn abx(opcode: Opcode, a: u8, bx: u32) -> u32 {
    debug_assert!(bx <= BX_MASK);
    opcode as u32 | (u32::from(a) << A_SHIFT) | ((bx & BX_MASK) << B_SHIFT)
}
