//! # Opcodes
//!
//! Opcodes are 16 bits, fetched big-endian from two consecutive bytes. They are
//! classified by their top nibble, and some classes further by the bottom
//! nibble or bottom byte. The remaining nibbles carry operands:
//! - `(_, n, n, n)` a 12-bit address, `NNN`
//! - `(_, _, n, n)` an 8-bit immediate, `NN`
//! - `(_, n, _, _)` the register Vx, or the range V0..=Vx
//! - `(_, _, n, _)` the register Vy
//! - `(_, _, _, n)` a 4-bit immediate, `N`

use crate::error::Error;

/// Field accessors on a raw opcode word.
pub trait Nibbles {
    /// The word's component nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[_x__]`
    fn x(&self) -> u8;

    /// `[__y_]`
    fn y(&self) -> u8;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__nn]`
    fn nn(&self) -> u8;

    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Nibbles for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (((self & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn nn(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

/// Register index, `0x0..=0xF`.
pub type Reg = u8;

/// A decoded instruction. Register operands are indices, immediates are
/// already extracted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEqImm(Reg, u8),
    /// 4XNN
    SkipNeImm(Reg, u8),
    /// 5XY_
    SkipEqReg(Reg, Reg),
    /// 6XNN
    SetImm(Reg, u8),
    /// 7XNN
    AddImm(Reg, u8),
    /// 8XY0
    Copy(Reg, Reg),
    /// 8XY1
    Or(Reg, Reg),
    /// 8XY2
    And(Reg, Reg),
    /// 8XY3
    Xor(Reg, Reg),
    /// 8XY4
    Add(Reg, Reg),
    /// 8XY5
    Sub(Reg, Reg),
    /// 8XY6
    ShiftRight(Reg),
    /// 8XY7
    SubN(Reg, Reg),
    /// 8XYE
    ShiftLeft(Reg),
    /// 9XY0
    SkipNeReg(Reg, Reg),
    /// ANNN
    SetIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    Random(Reg, u8),
    /// DXYN
    Draw(Reg, Reg, u8),
    /// EX9E
    SkipPressed(Reg),
    /// EXA1
    SkipNotPressed(Reg),
    /// FX07
    GetDelay(Reg),
    /// FX0A
    WaitKey(Reg),
    /// FX15
    SetDelay(Reg),
    /// FX18
    SetSound(Reg),
    /// FX1E
    AddIndex(Reg),
    /// FX29
    FontChar(Reg),
    /// FX33
    Bcd(Reg),
    /// FX55
    Store(Reg),
    /// FX65
    Load(Reg),
}

impl Opcode {
    /// Selects the instruction for a raw word, or `UnknownOpcode` carrying the
    /// word when nothing matches.
    pub fn decode(op: u16) -> Result<Opcode, Error> {
        let (x, y, nn, nnn) = (op.x(), op.y(), op.nn(), op.nnn());
        let opcode = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Opcode::ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Opcode::Return,
            (0x1, ..) => Opcode::Jump(nnn),
            (0x2, ..) => Opcode::Call(nnn),
            (0x3, ..) => Opcode::SkipEqImm(x, nn),
            (0x4, ..) => Opcode::SkipNeImm(x, nn),
            // the low nibble is not checked here
            (0x5, ..) => Opcode::SkipEqReg(x, y),
            (0x6, ..) => Opcode::SetImm(x, nn),
            (0x7, ..) => Opcode::AddImm(x, nn),
            (0x8, .., 0x0) => Opcode::Copy(x, y),
            (0x8, .., 0x1) => Opcode::Or(x, y),
            (0x8, .., 0x2) => Opcode::And(x, y),
            (0x8, .., 0x3) => Opcode::Xor(x, y),
            (0x8, .., 0x4) => Opcode::Add(x, y),
            (0x8, .., 0x5) => Opcode::Sub(x, y),
            (0x8, .., 0x6) => Opcode::ShiftRight(x),
            (0x8, .., 0x7) => Opcode::SubN(x, y),
            (0x8, .., 0xE) => Opcode::ShiftLeft(x),
            (0x9, .., 0x0) => Opcode::SkipNeReg(x, y),
            (0xA, ..) => Opcode::SetIndex(nnn),
            (0xB, ..) => Opcode::JumpOffset(nnn),
            (0xC, ..) => Opcode::Random(x, nn),
            (0xD, .., n) => Opcode::Draw(x, y, n),
            (0xE, _, 0x9, 0xE) => Opcode::SkipPressed(x),
            (0xE, _, 0xA, 0x1) => Opcode::SkipNotPressed(x),
            (0xF, _, 0x0, 0x7) => Opcode::GetDelay(x),
            (0xF, _, 0x0, 0xA) => Opcode::WaitKey(x),
            (0xF, _, 0x1, 0x5) => Opcode::SetDelay(x),
            (0xF, _, 0x1, 0x8) => Opcode::SetSound(x),
            (0xF, _, 0x1, 0xE) => Opcode::AddIndex(x),
            (0xF, _, 0x2, 0x9) => Opcode::FontChar(x),
            (0xF, _, 0x3, 0x3) => Opcode::Bcd(x),
            (0xF, _, 0x5, 0x5) => Opcode::Store(x),
            (0xF, _, 0x6, 0x5) => Opcode::Load(x),
            _ => return Err(Error::UnknownOpcode { opcode: op }),
        };
        Ok(opcode)
    }
}
